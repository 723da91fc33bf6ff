pub mod schema;
pub mod tables;

use bevy::prelude::*;

use crate::core::states::AppState;

// --------------------------- 插件 ---------------------------
pub struct DataPlugin;
impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::Loading), validate_tables);
    }
}

// --------------------------- 系统 ---------------------------
// 静态表写错属于编程错误，直接 panic 而不是带病进游戏
fn validate_tables(mut next: ResMut<NextState<AppState>>) {
    tables::validate().expect("static game tables must be valid");
    println!("✔ Tables loaded: {} tiers, {} recipes", tables::TIERS.len(), tables::RECIPES.len());
    next.set(AppState::InGame);
}
