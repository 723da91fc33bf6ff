use bevy::prelude::*;

pub mod events;
pub mod resources;
pub mod states;

/// 核心插件：注册全局资源 / 事件 / 状态
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        use states::AppState;

        app.init_state::<AppState>()
            .add_event::<events::LogEvent>()
            .insert_resource(resources::GameConfig::load())
            .init_resource::<resources::TickClock>()
            .init_resource::<resources::ActionGate>()
            .add_systems(Update, resources::advance_tick);
    }
}
