use bevy::prelude::*;

#[derive(Event)]
pub struct PickupSlotEvent {
    pub slot: usize,
}

#[derive(Event)]
pub struct PlaceSlotEvent {
    pub slot: usize,
}

#[derive(Event)]
pub struct SplitSlotEvent {
    pub slot: usize,
}

/// 把指定格整格丢到世界里（要求光标为空）
#[derive(Event)]
pub struct DropSlotEvent {
    pub slot: usize,
}

/// 关闭仓库界面：悬着的光标物品要先塞回格子
#[derive(Event)]
pub struct CloseInventoryEvent;
