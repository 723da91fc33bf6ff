use bevy::prelude::*;

use crate::data::schema::ItemKind;

/// 世界生成服务：丢弃 / 溢出 / 死亡掉落都从这里走
#[derive(Event)]
pub struct SpawnDropEvent {
    pub kind: ItemKind,
    pub count: u32,
    pub position: Vec2,
    /// Some 表示定向抛出，None 表示原地随机散落
    pub direction: Option<Vec2>,
}

/// 把脚边的掉落物扫进仓库
#[derive(Event)]
pub struct LootEvent;
