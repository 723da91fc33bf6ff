pub mod components;
pub mod events;
pub mod item;
mod systems;

use bevy::prelude::*;

use crate::core::states::AppState;
use components::*;
use events::*;
use systems::*;

pub struct InventoryPlugin;
impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Inventory>()
            .add_event::<GiveItemEvent>()
            .add_event::<RemoveItemEvent>()
            .add_event::<SelectHotbarEvent>()
            .add_event::<ListInventoryEvent>()
            .add_event::<RefreshHotbarEvent>()
            .add_systems(
                Update,
                (
                    give_item,
                    remove_item,
                    select_hotbar,
                    print_inventory,
                    print_hotbar,
                )
                    .run_if(in_state(AppState::InGame)),
            );
    }
}
