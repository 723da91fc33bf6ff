use bevy::prelude::*;

use crate::data::schema::ItemKind;

#[derive(Event)]
pub struct GiveItemEvent {
    pub kind: ItemKind,
    pub count: u32,
}

#[derive(Event)]
pub struct RemoveItemEvent {
    pub slot: usize,
    pub count: u32,
}

#[derive(Event)]
pub struct SelectHotbarEvent {
    pub index: usize,
}

/// 让 CLI 请求打印仓库
#[derive(Event)]
pub struct ListInventoryEvent;

/// hotbar/耐久条需要重画（纯展示，核心状态已经写完）
#[derive(Event)]
pub struct RefreshHotbarEvent;
