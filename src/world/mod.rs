pub mod components;
pub mod events;
pub mod systems;

use bevy::prelude::*;

use crate::core::states::AppState;
use components::LastFacing;
use events::*;
use systems::*;

pub struct WorldPlugin;
impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LastFacing>()
            .add_event::<SpawnDropEvent>()
            .add_event::<LootEvent>()
            .add_systems(OnEnter(AppState::InGame), setup_world)
            .add_systems(
                Update,
                (spawn_drops, loot_drops).run_if(in_state(AppState::InGame)),
            );
    }
}
