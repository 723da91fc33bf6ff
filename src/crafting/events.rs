use bevy::prelude::*;

#[derive(Event)]
pub struct CraftEvent {
    pub recipe_index: usize,
}

/// 让 CLI 请求打印配方表
#[derive(Event)]
pub struct ListRecipesEvent;
