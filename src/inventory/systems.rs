use bevy::prelude::*;

use super::{components::*, events::*};
use crate::core::events::LogEvent;
use crate::world::components::Player;
use crate::world::events::SpawnDropEvent;

/// 处理 "give"——往仓库里塞物品，塞不下的掉在脚下
pub fn give_item(
    mut ev_give: EventReader<GiveItemEvent>,
    mut inventory: ResMut<Inventory>,
    mut log_event: EventWriter<LogEvent>,
    mut spawn_drop: EventWriter<SpawnDropEvent>,
    mut refresh: EventWriter<RefreshHotbarEvent>,
    player_query: Query<&Transform, With<Player>>,
) {
    for ev in ev_give.read() {
        let added = inventory.add_item(ev.kind, ev.count);
        if added > 0 {
            log_event.write(LogEvent(format!("获得 {} ×{}", ev.kind.name(), added)));
        }

        let leftover = ev.count - added;
        if leftover > 0 {
            log_event.write(LogEvent(format!(
                "仓库已满，{} ×{} 掉在了地上",
                ev.kind.name(),
                leftover
            )));
            let position = player_query
                .single()
                .map(|t| t.translation.truncate())
                .unwrap_or_default();
            spawn_drop.write(SpawnDropEvent {
                kind: ev.kind,
                count: leftover,
                position,
                direction: None,
            });
        }
        refresh.write(RefreshHotbarEvent);
    }
}

pub fn remove_item(
    mut ev_remove: EventReader<RemoveItemEvent>,
    mut inventory: ResMut<Inventory>,
    mut log_event: EventWriter<LogEvent>,
    mut refresh: EventWriter<RefreshHotbarEvent>,
) {
    for ev in ev_remove.read() {
        if inventory.remove_item(ev.slot, ev.count) {
            log_event.write(LogEvent(format!("移除了格 {} 的 {} 个", ev.slot, ev.count)));
            refresh.write(RefreshHotbarEvent);
        } else {
            log_event.write(LogEvent("格子索引无效或数量不足".to_string()));
        }
    }
}

pub fn select_hotbar(
    mut ev_select: EventReader<SelectHotbarEvent>,
    mut inventory: ResMut<Inventory>,
    mut log_event: EventWriter<LogEvent>,
    mut refresh: EventWriter<RefreshHotbarEvent>,
) {
    for ev in ev_select.read() {
        if !inventory.select_hotbar_slot(ev.index) {
            log_event.write(LogEvent("hotbar 索引超出范围".to_string()));
            continue;
        }

        let tool = inventory.current_tool();
        let label = tool.kind.map_or("徒手", |k| k.name());
        log_event.write(LogEvent(format!("选中格 {}：{}", ev.index, label)));
        refresh.write(RefreshHotbarEvent);
    }
}

/// 打印仓库内容
pub fn print_inventory(mut ev_list: EventReader<ListInventoryEvent>, inventory: Res<Inventory>) {
    if ev_list.is_empty() {
        return;
    }
    ev_list.clear();

    let tier = inventory.tier();
    println!(
        "仓库（{}，{}x{}，{} 格）",
        tier.name, tier.rows, tier.columns, tier.slot_count
    );

    match inventory.backpack() {
        Some(kind) => println!("  背包槽: {} (Nv.{})", kind.name(), kind.backpack_tier().unwrap_or(0)),
        None => println!("  背包槽: (empty)"),
    }

    let mut empty = true;
    for (idx, item) in inventory.slots().iter().enumerate() {
        if item.is_empty() {
            continue;
        }
        empty = false;
        let kind = item.kind.expect("non-empty item has a kind");
        match (item.durability, item.max_durability) {
            (Some(d), Some(m)) => {
                println!("  [{idx}] {} ×{} 耐久 {d}/{m} (id={})", kind.name(), item.count, kind.id())
            }
            _ => println!("  [{idx}] {} ×{} (id={})", kind.name(), item.count, kind.id()),
        }
    }

    if empty {
        println!("  (empty)");
    }
}

/// hotbar 文字重画：选中标记 + 耐久条
pub fn print_hotbar(mut ev_refresh: EventReader<RefreshHotbarEvent>, inventory: Res<Inventory>) {
    if ev_refresh.is_empty() {
        return;
    }
    ev_refresh.clear();

    let selected = inventory.selected_hotbar_slot();
    let mut line = String::from("hotbar:");
    for (idx, item) in inventory.hotbar().iter().enumerate() {
        let marker = if idx == selected { '>' } else { ' ' };
        if item.is_empty() {
            line.push_str(&format!(" {marker}[{idx}]--"));
        } else {
            let kind = item.kind.expect("non-empty item has a kind");
            line.push_str(&format!(" {marker}[{idx}]{}×{}", kind.name(), item.count));
            if item.max_durability.is_some() {
                line.push_str(&format!("({:.0}%)", item.durability_percent() * 100.0));
            }
        }
    }
    println!("{line}");

    let tool = inventory.current_tool();
    match (tool.kind, tool.durability, tool.max_durability) {
        (Some(kind), Some(d), Some(m)) => println!("当前工具: {} 耐久 {d}/{m}", kind.name()),
        (Some(kind), _, _) => println!("当前工具: {}", kind.name()),
        _ => println!("当前工具: 徒手"),
    }
}
