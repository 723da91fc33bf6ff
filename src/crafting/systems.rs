use bevy::prelude::*;
use thiserror::Error;

use super::events::*;
use crate::core::events::LogEvent;
use crate::data::schema::{ItemKind, Recipe};
use crate::data::tables::RECIPES;
use crate::inventory::components::Inventory;
use crate::inventory::events::RefreshHotbarEvent;
use crate::world::components::Player;
use crate::world::events::SpawnDropEvent;

#[derive(Debug, Error, PartialEq)]
pub enum CraftError {
    #[error("缺少材料")]
    MissingMaterials,
    #[error("仓库已满")]
    InventoryFull,
}

/// 每种材料的库存都够才算可制作
pub fn can_craft(inventory: &Inventory, recipe: &Recipe) -> bool {
    recipe
        .materials
        .iter()
        .all(|&(kind, required)| inventory.count_of_kind(kind) >= required)
}

/// 按格子升序扣材料，扣空的格子归位为空。
/// 只允许在 can_craft 通过之后调用：扣到一半发现不够是核心 bug
pub fn consume(inventory: &mut Inventory, materials: &[(ItemKind, u32)]) {
    for &(kind, required) in materials {
        let mut needed = required;
        for index in 0..inventory.slots().len() {
            if needed == 0 {
                break;
            }
            let slot = inventory.slot(index).expect("index in range");
            if slot.is_empty() || slot.kind != Some(kind) {
                continue;
            }
            let take = needed.min(slot.count);
            assert!(
                inventory.remove_item(index, take),
                "material removal cannot fail mid-consumption"
            );
            needed -= take;
        }
        assert_eq!(
            needed, 0,
            "consume ran without a successful can_craft: {} short by {needed}",
            kind.id()
        );
    }
}

/// 校验 → 扣料 → 产出。返回没能放进仓库的产物数量，
/// 由调用方撒到世界里；一个都放不下按仓库已满报告
pub fn craft(inventory: &mut Inventory, recipe: &Recipe) -> Result<u32, CraftError> {
    if !can_craft(inventory, recipe) {
        return Err(CraftError::MissingMaterials);
    }

    consume(inventory, &recipe.materials);

    let added = inventory.add_item(recipe.output, recipe.output_count);
    if added == 0 {
        return Err(CraftError::InventoryFull);
    }
    Ok(recipe.output_count - added)
}

/* ---------------------------- 事件处理 ---------------------------- */

pub fn handle_craft(
    mut ev_craft: EventReader<CraftEvent>,
    mut inventory: ResMut<Inventory>,
    mut log_event: EventWriter<LogEvent>,
    mut spawn_drop: EventWriter<SpawnDropEvent>,
    mut refresh: EventWriter<RefreshHotbarEvent>,
    player_query: Query<&Transform, With<Player>>,
) {
    for ev in ev_craft.read() {
        let Some(recipe) = RECIPES.get(ev.recipe_index) else {
            log_event.write(LogEvent("配方索引无效".to_string()));
            continue;
        };

        match craft(&mut inventory, recipe) {
            Ok(0) => {
                log_event.write(LogEvent(format!("✅ {} 制作完成！", recipe.name)));
                refresh.write(RefreshHotbarEvent);
            }
            Ok(leftover) => {
                // 放不下的产物落地，数量绝不蒸发
                let position = player_query
                    .single()
                    .map(|t| t.translation.truncate())
                    .unwrap_or_default();
                spawn_drop.write(SpawnDropEvent {
                    kind: recipe.output,
                    count: leftover,
                    position,
                    direction: None,
                });
                log_event.write(LogEvent(format!(
                    "✅ {} 制作完成，{} 个掉在了地上",
                    recipe.name, leftover
                )));
                refresh.write(RefreshHotbarEvent);
            }
            Err(CraftError::InventoryFull) => {
                let position = player_query
                    .single()
                    .map(|t| t.translation.truncate())
                    .unwrap_or_default();
                spawn_drop.write(SpawnDropEvent {
                    kind: recipe.output,
                    count: recipe.output_count,
                    position,
                    direction: None,
                });
                log_event.write(LogEvent(format!("❌ {}", CraftError::InventoryFull)));
                refresh.write(RefreshHotbarEvent);
            }
            Err(e) => {
                log_event.write(LogEvent(format!("❌ {e}")));
            }
        }
    }
}

/// 打印配方表和材料缺口
pub fn print_recipes(mut ev_list: EventReader<ListRecipesEvent>, inventory: Res<Inventory>) {
    if ev_list.is_empty() {
        return;
    }
    ev_list.clear();

    for (index, recipe) in RECIPES.iter().enumerate() {
        let ok = if can_craft(&inventory, recipe) { "✓" } else { "✗" };
        let materials: Vec<String> = recipe
            .materials
            .iter()
            .map(|&(kind, required)| {
                format!("{} {}/{}", kind.name(), inventory.count_of_kind(kind), required)
            })
            .collect();
        println!("[{index}] {ok} {} ← {}", recipe.name, materials.join(", "));
    }
}
