use bevy::prelude::*;

mod combat;
mod core;
mod crafting;
mod data;
mod equipment;
mod interaction;
mod interface;
mod inventory;
mod world;

use crate::core::states;
use crate::core::CorePlugin;
use combat::CombatPlugin;
use crafting::CraftingPlugin;
use equipment::EquipmentPlugin;
use interaction::InteractionPlugin;
use interface::debug_cli::DebugCliPlugin;
use inventory::InventoryPlugin;
use world::WorldPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                visible: false,
                ..default()
            }), // visible窗口，实现“无 UI”
            ..default()
        }))
        .add_plugins(CorePlugin)
        .add_plugins(DebugCliPlugin)
        .add_plugins(data::DataPlugin)
        .add_plugins(InventoryPlugin)
        .add_plugins(InteractionPlugin)
        .add_plugins(EquipmentPlugin)
        .add_plugins(CraftingPlugin)
        .add_plugins(CombatPlugin)
        .add_plugins(WorldPlugin)
        .add_systems(Update, forward_log_event) // 简单打印
        .add_systems(Startup, |mut next: ResMut<NextState<states::AppState>>| {
            next.set(states::AppState::Loading);
        })
        .run();
}

fn forward_log_event(mut reader: EventReader<crate::core::events::LogEvent>) {
    for e in reader.read() {
        println!("> {}", e.0);
    }
}
