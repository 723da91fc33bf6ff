use bevy::prelude::*;

/// 把光标上的背包装进背包槽
#[derive(Event)]
pub struct EquipFromCursorEvent;

/// 卸下背包槽里的背包
#[derive(Event)]
pub struct UnequipBackpackEvent;
