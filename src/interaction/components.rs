use bevy::prelude::*;
use serde::Serialize;

use crate::inventory::item::Item;

/// 光标物品：拿起/拆分与放下/丢弃之间最多悬着一件
#[derive(Resource, Default, Serialize)]
pub struct Cursor(pub Option<Item>);

impl Cursor {
    pub fn is_holding(&self) -> bool {
        self.0.is_some()
    }

    pub fn item(&self) -> Option<&Item> {
        self.0.as_ref()
    }
}
