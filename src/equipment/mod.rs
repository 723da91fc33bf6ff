pub mod events;
pub mod systems;

use bevy::prelude::*;

use crate::core::states::AppState;
use events::*;
use systems::*;

pub struct EquipmentPlugin;
impl Plugin for EquipmentPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EquipFromCursorEvent>()
            .add_event::<UnequipBackpackEvent>()
            .add_systems(
                Update,
                (equip_from_cursor, unequip_backpack).run_if(in_state(AppState::InGame)),
            );
    }
}
