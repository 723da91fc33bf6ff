pub mod events;
pub mod systems;

use bevy::prelude::*;

use crate::core::states::AppState;
use events::*;
use systems::*;

pub struct CraftingPlugin;
impl Plugin for CraftingPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CraftEvent>()
            .add_event::<ListRecipesEvent>()
            .add_systems(
                Update,
                (handle_craft, print_recipes).run_if(in_state(AppState::InGame)),
            );
    }
}
