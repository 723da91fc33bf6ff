use bevy::prelude::*;

use super::{components::Cursor, events::*};
use crate::core::events::LogEvent;
use crate::inventory::components::Inventory;
use crate::inventory::events::RefreshHotbarEvent;
use crate::inventory::item::Item;
use crate::world::components::{LastFacing, Player};
use crate::world::events::SpawnDropEvent;

/* ---------------------------- 状态机核心 ---------------------------- */

/// Empty → Holding：整格拿起（移动，不是复制）
pub fn pickup(inventory: &mut Inventory, cursor: &mut Cursor, index: usize) -> bool {
    if cursor.is_holding() {
        return false;
    }
    match inventory.slot(index) {
        Some(slot) if !slot.is_empty() => {
            cursor.0 = Some(inventory.take_slot(index));
            true
        }
        _ => false,
    }
}

/// Holding → Empty/Holding：空格整移、同类并堆、异类整体互换
pub fn place(inventory: &mut Inventory, cursor: &mut Cursor, index: usize) -> bool {
    if inventory.slot(index).is_none() {
        return false;
    }
    let Some(mut held) = cursor.0.take() else {
        return false;
    };

    let target = inventory.slot(index).expect("index checked above");
    if target.is_empty() {
        inventory.put_slot(index, held);
        return true;
    }

    if target.can_stack_with(&held) {
        inventory.merge_into_slot(index, &mut held);
        if !held.is_empty() {
            cursor.0 = Some(held);
        }
        return true;
    }

    // 不兼容的非空格：光标与格子整体互换，停留在 Holding
    let swapped_out = inventory.put_slot(index, held);
    cursor.0 = Some(swapped_out);
    true
}

/// Empty → Holding：拆出一半（向下取整），原格留下剩余
pub fn split(inventory: &mut Inventory, cursor: &mut Cursor, index: usize) -> bool {
    if cursor.is_holding() {
        return false;
    }
    let Some(slot) = inventory.slot(index) else {
        return false;
    };
    if slot.is_empty() || slot.count <= 1 {
        return false;
    }

    let kind = slot.kind.expect("non-empty item has a kind");
    let durability = slot.durability;
    let half = slot.count / 2;

    assert!(inventory.remove_item(index, half), "split removal cannot fail");
    cursor.0 = Some(Item::with_durability(kind, half, durability));
    true
}

/// 关闭界面时自动安置光标物品：先找空位，再按升序并堆。
/// 光标物品本来就出自格子，总容量必定装得下——装不下就是核心 bug
pub fn close_return(inventory: &mut Inventory, cursor: &mut Cursor) {
    let Some(mut held) = cursor.0.take() else {
        return;
    };

    if let Some(empty) = inventory.find_empty_slot() {
        inventory.put_slot(empty, held);
        return;
    }

    for index in 0..inventory.slots().len() {
        if inventory.slot(index).expect("in range").can_stack_with(&held) {
            inventory.merge_into_slot(index, &mut held);
            if held.is_empty() {
                return;
            }
        }
    }

    panic!(
        "cursor item has nowhere to go on close: {:?} ×{}",
        held.kind, held.count
    );
}

/* ---------------------------- 事件处理 ---------------------------- */

pub fn handle_pickup(
    mut ev_pickup: EventReader<PickupSlotEvent>,
    mut inventory: ResMut<Inventory>,
    mut cursor: ResMut<Cursor>,
    mut log_event: EventWriter<LogEvent>,
    mut refresh: EventWriter<RefreshHotbarEvent>,
) {
    for ev in ev_pickup.read() {
        if pickup(&mut inventory, &mut cursor, ev.slot) {
            let item = cursor.item().expect("pickup just filled the cursor");
            let kind = item.kind.expect("picked item has a kind");
            log_event.write(LogEvent(format!("拿起 {} ×{}", kind.name(), item.count)));
            refresh.write(RefreshHotbarEvent);
        } else if cursor.is_holding() {
            log_event.write(LogEvent("手上已有物品".to_string()));
        } else {
            log_event.write(LogEvent("该格为空或索引无效".to_string()));
        }
    }
}

pub fn handle_place(
    mut ev_place: EventReader<PlaceSlotEvent>,
    mut inventory: ResMut<Inventory>,
    mut cursor: ResMut<Cursor>,
    mut log_event: EventWriter<LogEvent>,
    mut refresh: EventWriter<RefreshHotbarEvent>,
) {
    for ev in ev_place.read() {
        if !cursor.is_holding() {
            log_event.write(LogEvent("手上没有物品".to_string()));
            continue;
        }
        if place(&mut inventory, &mut cursor, ev.slot) {
            match cursor.item() {
                None => {
                    log_event.write(LogEvent(format!("放入格 {}", ev.slot)));
                }
                Some(rest) => {
                    let kind = rest.kind.expect("held item has a kind");
                    log_event.write(LogEvent(format!(
                        "放入格 {}，手上还剩 {} ×{}",
                        ev.slot,
                        kind.name(),
                        rest.count
                    )));
                }
            }
            refresh.write(RefreshHotbarEvent);
        } else {
            log_event.write(LogEvent("格子索引无效".to_string()));
        }
    }
}

pub fn handle_split(
    mut ev_split: EventReader<SplitSlotEvent>,
    mut inventory: ResMut<Inventory>,
    mut cursor: ResMut<Cursor>,
    mut log_event: EventWriter<LogEvent>,
    mut refresh: EventWriter<RefreshHotbarEvent>,
) {
    for ev in ev_split.read() {
        if split(&mut inventory, &mut cursor, ev.slot) {
            let item = cursor.item().expect("split just filled the cursor");
            let kind = item.kind.expect("split item has a kind");
            log_event.write(LogEvent(format!("拆出 {} ×{}", kind.name(), item.count)));
            refresh.write(RefreshHotbarEvent);
        } else {
            log_event.write(LogEvent("该格无法拆分".to_string()));
        }
    }
}

/// 光标为空时把指定格整格抛向面朝方向
pub fn handle_drop(
    mut ev_drop: EventReader<DropSlotEvent>,
    mut inventory: ResMut<Inventory>,
    cursor: Res<Cursor>,
    facing: Res<LastFacing>,
    mut log_event: EventWriter<LogEvent>,
    mut spawn_drop: EventWriter<SpawnDropEvent>,
    mut refresh: EventWriter<RefreshHotbarEvent>,
    player_query: Query<&Transform, With<Player>>,
) {
    for ev in ev_drop.read() {
        if cursor.is_holding() {
            log_event.write(LogEvent("先放下手上的物品".to_string()));
            continue;
        }
        let occupied = inventory.slot(ev.slot).is_some_and(|s| !s.is_empty());
        if !occupied {
            log_event.write(LogEvent("该格为空或索引无效".to_string()));
            continue;
        }

        // 位置先定下来，查询失败也不能让物品蒸发
        let position = player_query
            .single()
            .map(|t| t.translation.truncate())
            .unwrap_or_default();
        let item = inventory.take_slot(ev.slot);
        let kind = item.kind.expect("non-empty item has a kind");
        spawn_drop.write(SpawnDropEvent {
            kind,
            count: item.count,
            position,
            direction: Some(facing.0),
        });
        log_event.write(LogEvent(format!("丢出 {} ×{}", kind.name(), item.count)));
        refresh.write(RefreshHotbarEvent);
    }
}

pub fn handle_close(
    mut ev_close: EventReader<CloseInventoryEvent>,
    mut inventory: ResMut<Inventory>,
    mut cursor: ResMut<Cursor>,
    mut log_event: EventWriter<LogEvent>,
    mut refresh: EventWriter<RefreshHotbarEvent>,
) {
    for _ in ev_close.read() {
        if !cursor.is_holding() {
            continue;
        }
        close_return(&mut inventory, &mut cursor);
        log_event.write(LogEvent("光标物品已放回仓库".to_string()));
        refresh.write(RefreshHotbarEvent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::ItemKind;
    use crate::data::tables::BASE_TIER;

    fn setup() -> (Inventory, Cursor) {
        (Inventory::new(BASE_TIER), Cursor::default())
    }

    #[test]
    fn pickup_moves_the_stack_out_of_the_slot() {
        let (mut inv, mut cursor) = setup();
        inv.add_item(ItemKind::Wood, 12);
        let id = inv.slot(0).unwrap().id;

        assert!(pickup(&mut inv, &mut cursor, 0));
        assert!(inv.slot(0).unwrap().is_empty());
        let held = cursor.item().unwrap();
        assert_eq!(held.id, id);
        assert_eq!(held.count, 12);
    }

    #[test]
    fn pickup_rejects_empty_slot_and_busy_cursor() {
        let (mut inv, mut cursor) = setup();
        assert!(!pickup(&mut inv, &mut cursor, 0));

        inv.add_item(ItemKind::Wood, 1);
        inv.add_item(ItemKind::Stone, 1);
        assert!(pickup(&mut inv, &mut cursor, 0));
        assert!(!pickup(&mut inv, &mut cursor, 1));
    }

    #[test]
    fn place_into_empty_slot_empties_the_cursor() {
        let (mut inv, mut cursor) = setup();
        inv.add_item(ItemKind::Wood, 12);
        pickup(&mut inv, &mut cursor, 0);

        assert!(place(&mut inv, &mut cursor, 3));
        assert!(!cursor.is_holding());
        assert_eq!(inv.slot(3).unwrap().count, 12);
    }

    #[test]
    fn place_merges_and_keeps_the_remainder() {
        let (mut inv, mut cursor) = setup();
        inv.put_slot(0, Item::new(ItemKind::Wood, 60));
        cursor.0 = Some(Item::new(ItemKind::Wood, 10));

        assert!(place(&mut inv, &mut cursor, 0));
        assert_eq!(inv.slot(0).unwrap().count, 64);
        assert_eq!(cursor.item().unwrap().count, 6);
    }

    #[test]
    fn place_swaps_incompatible_stacks_wholesale() {
        let (mut inv, mut cursor) = setup();
        inv.put_slot(0, Item::new(ItemKind::Stone, 5));
        cursor.0 = Some(Item::new(ItemKind::Wood, 7));

        assert!(place(&mut inv, &mut cursor, 0));
        assert_eq!(inv.slot(0).unwrap().kind, Some(ItemKind::Wood));
        assert_eq!(inv.slot(0).unwrap().count, 7);
        let held = cursor.item().unwrap();
        assert_eq!(held.kind, Some(ItemKind::Stone));
        assert_eq!(held.count, 5);
    }

    #[test]
    fn split_halves_down_and_place_back_restores_the_stack() {
        let (mut inv, mut cursor) = setup();
        inv.add_item(ItemKind::Wood, 13);

        assert!(split(&mut inv, &mut cursor, 0));
        assert_eq!(cursor.item().unwrap().count, 6);
        assert_eq!(inv.slot(0).unwrap().count, 7);

        assert!(place(&mut inv, &mut cursor, 0));
        assert!(!cursor.is_holding());
        assert_eq!(inv.slot(0).unwrap().count, 13);
        assert_eq!(inv.count_of_kind(ItemKind::Wood), 13);
    }

    #[test]
    fn split_requires_more_than_one() {
        let (mut inv, mut cursor) = setup();
        inv.add_item(ItemKind::StoneAxe, 1);
        assert!(!split(&mut inv, &mut cursor, 0));
        assert!(!cursor.is_holding());
    }

    #[test]
    fn close_prefers_the_first_empty_slot() {
        let (mut inv, mut cursor) = setup();
        inv.add_item(ItemKind::Wood, 5);
        cursor.0 = Some(Item::new(ItemKind::Stone, 3));

        close_return(&mut inv, &mut cursor);
        assert!(!cursor.is_holding());
        assert_eq!(inv.slot(1).unwrap().kind, Some(ItemKind::Stone));
    }

    #[test]
    fn close_merges_ascending_when_no_empty_slot_remains() {
        let (mut inv, mut cursor) = setup();
        for i in 0..10 {
            inv.put_slot(i, Item::new(ItemKind::Wood, 62));
        }
        cursor.0 = Some(Item::new(ItemKind::Wood, 6));

        close_return(&mut inv, &mut cursor);
        assert!(!cursor.is_holding());
        assert_eq!(inv.slot(0).unwrap().count, 64);
        assert_eq!(inv.slot(1).unwrap().count, 64);
        assert_eq!(inv.slot(2).unwrap().count, 64);
        assert_eq!(inv.slot(3).unwrap().count, 62);
    }

    #[test]
    fn drop_spills_even_without_a_player_entity() {
        // 玩家实体缺失时用默认位置，物品照样落地
        let mut app = App::new();
        app.add_event::<DropSlotEvent>()
            .add_event::<SpawnDropEvent>()
            .add_event::<LogEvent>()
            .add_event::<RefreshHotbarEvent>()
            .init_resource::<Cursor>()
            .init_resource::<LastFacing>()
            .add_systems(Update, handle_drop);

        let mut inv = Inventory::new(BASE_TIER);
        inv.add_item(ItemKind::Wood, 5);
        app.insert_resource(inv);

        app.world_mut().send_event(DropSlotEvent { slot: 0 });
        app.update();

        let drops = app.world().resource::<Events<SpawnDropEvent>>();
        assert_eq!(drops.len(), 1);
        assert!(app
            .world()
            .resource::<Inventory>()
            .slot(0)
            .unwrap()
            .is_empty());
    }

    #[test]
    #[should_panic(expected = "nowhere to go")]
    fn close_with_an_unplaceable_cursor_is_a_bug() {
        let (mut inv, mut cursor) = setup();
        for i in 0..10 {
            inv.put_slot(i, Item::new(ItemKind::Wood, 64));
        }
        // 外部凭空塞进来的物品破坏了容量守恒，必须炸
        cursor.0 = Some(Item::new(ItemKind::Stone, 1));
        close_return(&mut inv, &mut cursor);
    }
}
