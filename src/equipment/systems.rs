use bevy::prelude::*;
use thiserror::Error;

use super::events::*;
use crate::core::events::LogEvent;
use crate::data::schema::ItemKind;
use crate::data::tables::{tier_def, BASE_TIER};
use crate::interaction::components::Cursor;
use crate::inventory::components::Inventory;
use crate::inventory::events::RefreshHotbarEvent;
use crate::inventory::item::Item;
use crate::world::components::Player;
use crate::world::events::SpawnDropEvent;

#[derive(Debug, Error, PartialEq)]
pub enum EquipError {
    #[error("只能在这里装备背包")]
    NotABackpack,
    #[error("未知的背包等级")]
    UnknownTier,
    #[error("先卸下当前背包")]
    AlreadyEquipped,
}

/// 卸下背包的结算：溢出物、背包本体的去向
#[derive(Debug)]
pub struct UnequipOutcome {
    pub spilled: Vec<Item>,
    pub returned_slot: Option<usize>,
    pub dropped_backpack: Option<ItemKind>,
}

/// 装备一个背包物品：解析等级、占住背包槽、按新等级扩缩格子。
/// 返回被挤出去的物品，由调用方撒到世界里——绝不悄悄丢掉
pub fn equip(inventory: &mut Inventory, item: &Item) -> Result<Vec<Item>, EquipError> {
    let kind = item.kind.ok_or(EquipError::NotABackpack)?;
    let tier = kind.backpack_tier().ok_or(EquipError::NotABackpack)?;
    if tier_def(tier).is_none() {
        return Err(EquipError::UnknownTier);
    }
    if inventory.backpack().is_some() {
        return Err(EquipError::AlreadyEquipped);
    }

    inventory.set_backpack(Some(kind));
    Ok(inventory.resize(tier))
}

/// 卸下背包：先把基础等级装不下的格子溢出，再缩格，
/// 最后把背包本体放进基础区间的第一个空位，放不下就一并落地
pub fn unequip(inventory: &mut Inventory) -> Option<UnequipOutcome> {
    let kind = inventory.backpack()?;

    let spilled = inventory.resize(BASE_TIER);
    inventory.set_backpack(None);

    let base_slots = tier_def(BASE_TIER)
        .expect("base tier always exists")
        .slot_count;
    match inventory.find_empty_slot_in_range(0, base_slots) {
        Some(index) => {
            inventory.put_slot(index, Item::new(kind, 1));
            Some(UnequipOutcome {
                spilled,
                returned_slot: Some(index),
                dropped_backpack: None,
            })
        }
        None => Some(UnequipOutcome {
            spilled,
            returned_slot: None,
            dropped_backpack: Some(kind),
        }),
    }
}

/* ---------------------------- 事件处理 ---------------------------- */

pub fn equip_from_cursor(
    mut ev_equip: EventReader<EquipFromCursorEvent>,
    mut inventory: ResMut<Inventory>,
    mut cursor: ResMut<Cursor>,
    mut log_event: EventWriter<LogEvent>,
    mut spawn_drop: EventWriter<SpawnDropEvent>,
    mut refresh: EventWriter<RefreshHotbarEvent>,
    player_query: Query<&Transform, With<Player>>,
) {
    for _ in ev_equip.read() {
        let Some(held) = cursor.item() else {
            log_event.write(LogEvent("手上没有物品".to_string()));
            continue;
        };

        match equip(&mut inventory, held) {
            Ok(overflow) => {
                cursor.0 = None;
                let position = player_query
                    .single()
                    .map(|t| t.translation.truncate())
                    .unwrap_or_default();
                for item in overflow {
                    spawn_drop.write(SpawnDropEvent {
                        kind: item.kind.expect("overflow items are non-empty"),
                        count: item.count,
                        position,
                        direction: None,
                    });
                }
                let tier = inventory.tier();
                log_event.write(LogEvent(format!(
                    "🎒 背包已装备：{}（{} 格）",
                    tier.name, tier.slot_count
                )));
                refresh.write(RefreshHotbarEvent);
            }
            Err(e) => {
                log_event.write(LogEvent(format!("❌ {e}")));
            }
        }
    }
}

pub fn unequip_backpack(
    mut ev_unequip: EventReader<UnequipBackpackEvent>,
    mut inventory: ResMut<Inventory>,
    mut log_event: EventWriter<LogEvent>,
    mut spawn_drop: EventWriter<SpawnDropEvent>,
    mut refresh: EventWriter<RefreshHotbarEvent>,
    player_query: Query<&Transform, With<Player>>,
) {
    for _ in ev_unequip.read() {
        let Some(outcome) = unequip(&mut inventory) else {
            log_event.write(LogEvent("背包槽为空".to_string()));
            continue;
        };

        let position = player_query
            .single()
            .map(|t| t.translation.truncate())
            .unwrap_or_default();

        let spill_count = outcome.spilled.len();
        for item in outcome.spilled {
            spawn_drop.write(SpawnDropEvent {
                kind: item.kind.expect("spilled items are non-empty"),
                count: item.count,
                position,
                direction: None,
            });
        }
        if spill_count > 0 {
            log_event.write(LogEvent(format!("📦 {spill_count} 堆物品掉在了地上")));
        }

        match (outcome.returned_slot, outcome.dropped_backpack) {
            (Some(index), _) => {
                log_event.write(LogEvent(format!("📦 背包已卸下，放回格 {index}")));
            }
            (None, Some(kind)) => {
                spawn_drop.write(SpawnDropEvent {
                    kind,
                    count: 1,
                    position,
                    direction: None,
                });
                log_event.write(LogEvent("📦 没有空位，背包掉在了地上".to_string()));
            }
            (None, None) => unreachable!("unequip must place or drop the backpack"),
        }
        refresh.write(RefreshHotbarEvent);
    }
}
