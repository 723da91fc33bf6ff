use anyhow::{bail, ensure, Result};
use once_cell::sync::Lazy;

use super::schema::{Category, ItemKind, Recipe, TierDef, ToolCategory};

/// 未装备背包时的基础等级
pub const BASE_TIER: u8 = 1;

pub const TIERS: [TierDef; 5] = [
    TierDef { tier: 1, rows: 2, columns: 5, slot_count: 10, name: "基础" },
    TierDef { tier: 2, rows: 3, columns: 4, slot_count: 12, name: "小型" },
    TierDef { tier: 3, rows: 4, columns: 5, slot_count: 20, name: "中型" },
    TierDef { tier: 4, rows: 5, columns: 6, slot_count: 30, name: "大型" },
    TierDef { tier: 5, rows: 6, columns: 7, slot_count: 42, name: "史诗" },
];

pub fn tier_def(tier: u8) -> Option<&'static TierDef> {
    TIERS.iter().find(|t| t.tier == tier)
}

pub static RECIPES: Lazy<Vec<Recipe>> = Lazy::new(|| {
    vec![
        Recipe {
            name: "石斧",
            output: ItemKind::StoneAxe,
            output_count: 1,
            materials: vec![(ItemKind::Wood, 1), (ItemKind::Stone, 2)],
        },
        Recipe {
            name: "石镐",
            output: ItemKind::StonePickaxe,
            output_count: 1,
            materials: vec![(ItemKind::Wood, 1), (ItemKind::Stone, 2)],
        },
        Recipe {
            name: "石剑",
            output: ItemKind::StoneSword,
            output_count: 1,
            materials: vec![(ItemKind::Wood, 2), (ItemKind::Stone, 1)],
        },
        Recipe {
            name: "小背包",
            output: ItemKind::BackpackTier2,
            output_count: 1,
            materials: vec![(ItemKind::Leather, 5), (ItemKind::Thread, 3)],
        },
        Recipe {
            name: "中背包",
            output: ItemKind::BackpackTier3,
            output_count: 1,
            materials: vec![(ItemKind::Leather, 10), (ItemKind::Iron, 2)],
        },
    ]
});

/// 战斗效率表（工具分类 × 目标分类），缺省 1.0
pub fn combat_effectiveness(tool: ToolCategory, target: Category) -> f32 {
    use Category::*;
    use ToolCategory::*;
    match (tool, target) {
        (Axe, Wood) => 1.5,
        (Axe, Stone) => 0.5,
        (Axe, Sheep) => 0.8,
        (Pickaxe, Wood) => 0.5,
        (Pickaxe, Stone) => 1.5,
        (Pickaxe, Sheep) => 0.6,
        (Sword, Wood) => 0.3,
        (Sword, Stone) => 0.3,
        (Sword, Sheep) => 1.2,
        (Hand, Wood) => 0.5,
        (Hand, Stone) => 0.3,
        (Hand, Sheep) => 0.3,
    }
}

/// 采集效率表：徒手 1.0，对口工具 1.5，其余 0.5
pub fn harvest_effectiveness(tool: ToolCategory, resource: Category) -> f32 {
    use Category::*;
    use ToolCategory::*;
    match (tool, resource) {
        (Hand, _) => 1.0,
        (Axe, Wood) => 1.5,
        (Pickaxe, Stone) => 1.5,
        _ => 0.5,
    }
}

/// 启动时校验所有静态表，配置写错直接拒绝进入游戏
pub fn validate() -> Result<()> {
    ensure!(tier_def(BASE_TIER).is_some(), "基础等级 {BASE_TIER} 不在等级表里");

    let mut prev_slots = 0;
    for def in &TIERS {
        ensure!(
            def.slot_count == def.rows * def.columns,
            "等级 {} 的格子数 {} != {}x{}",
            def.tier,
            def.slot_count,
            def.rows,
            def.columns
        );
        ensure!(
            def.columns <= def.slot_count,
            "等级 {} 的 hotbar 宽度超过格子总数",
            def.tier
        );
        ensure!(
            def.slot_count > prev_slots,
            "等级表必须按容量递增排列，等级 {} 违例",
            def.tier
        );
        prev_slots = def.slot_count;
    }

    for kind in ItemKind::ALL {
        if kind.is_tool() {
            ensure!(
                kind.max_durability().is_some(),
                "工具 {} 缺少耐久上限",
                kind.id()
            );
            ensure!(kind.max_stack() == 1, "工具 {} 不允许堆叠", kind.id());
        }
        if let Some(tier) = kind.backpack_tier() {
            ensure!(
                tier_def(tier).is_some(),
                "背包 {} 指向未知等级 {}",
                kind.id(),
                tier
            );
        }
    }

    for recipe in RECIPES.iter() {
        ensure!(recipe.output_count > 0, "配方 {} 产出为 0", recipe.name);
        ensure!(!recipe.materials.is_empty(), "配方 {} 没有材料", recipe.name);
        for (i, (kind, count)) in recipe.materials.iter().enumerate() {
            ensure!(*count > 0, "配方 {} 的材料 {} 数量为 0", recipe.name, kind.id());
            if recipe.materials[..i].iter().any(|(k, _)| k == kind) {
                bail!("配方 {} 的材料 {} 重复", recipe.name, kind.id());
            }
        }
    }

    Ok(())
}
