use bevy::prelude::*;

use crate::data::schema::{Category, ItemKind};

/// 玩家标记
#[derive(Component)]
pub struct Player;

/// 玩家最后的面朝方向，丢弃物品时决定抛出轨迹
#[derive(Resource)]
pub struct LastFacing(pub Vec2);

impl Default for LastFacing {
    fn default() -> Self {
        Self(Vec2::X)
    }
}

/// 可攻击/可采集实体的血量
#[derive(Component)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.current = (self.current - amount).max(0);
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }
}

/// 目标分类（效率表的列）
#[derive(Component, Debug, Clone, Copy)]
pub struct TargetCategory(pub Category);

/// 掉在地上的一堆物品
#[derive(Component, Debug)]
pub struct ItemDrop {
    pub kind: ItemKind,
    pub count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_clamps_at_zero() {
        let mut health = Health::new(5);
        health.take_damage(3);
        assert!(health.is_alive());
        health.take_damage(10);
        assert_eq!(health.current, 0);
        assert!(!health.is_alive());
    }
}
