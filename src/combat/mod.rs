pub mod events;
pub mod systems;

use bevy::prelude::*;

use crate::core::states::AppState;
use events::*;
use systems::*;

pub struct CombatPlugin;
impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AttackEvent>()
            .add_event::<HarvestEvent>()
            .add_systems(
                Update,
                (handle_attack, handle_harvest).run_if(in_state(AppState::InGame)),
            );
    }
}
