pub mod components;
pub mod events;
mod systems;

use bevy::prelude::*;

use crate::core::states::AppState;
use components::Cursor;
use events::*;
use systems::*;

pub struct InteractionPlugin;
impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Cursor>()
            .add_event::<PickupSlotEvent>()
            .add_event::<PlaceSlotEvent>()
            .add_event::<SplitSlotEvent>()
            .add_event::<DropSlotEvent>()
            .add_event::<CloseInventoryEvent>()
            .add_systems(
                Update,
                (
                    handle_pickup,
                    handle_place,
                    handle_split,
                    handle_drop,
                    handle_close,
                )
                    .run_if(in_state(AppState::InGame)),
            );
    }
}
