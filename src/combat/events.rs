use bevy::prelude::*;

/// 用当前工具攻击一个生物
#[derive(Event)]
pub struct AttackEvent {
    pub target: Entity,
}

/// 用当前工具采集一个资源点（走同一条耐久/损坏路径）
#[derive(Event)]
pub struct HarvestEvent {
    pub target: Entity,
}
