use serde::Serialize;

/// 物品种类静态表：堆叠上限、工具属性、背包等级都从这里查
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ItemKind {
    Wood,
    Stone,
    Meat,
    Leather,
    Thread,
    Iron,
    StoneAxe,
    StonePickaxe,
    StoneSword,
    BackpackTier2,
    BackpackTier3,
    BackpackTier4,
    BackpackTier5,
}

/// 工具分类，决定效率表的行
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ToolCategory {
    Hand,
    Axe,
    Pickaxe,
    Sword,
}

/// 攻击/采集目标的分类（效率表的列）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Wood,
    Stone,
    Sheep,
}

impl ItemKind {
    pub const ALL: [ItemKind; 13] = [
        ItemKind::Wood,
        ItemKind::Stone,
        ItemKind::Meat,
        ItemKind::Leather,
        ItemKind::Thread,
        ItemKind::Iron,
        ItemKind::StoneAxe,
        ItemKind::StonePickaxe,
        ItemKind::StoneSword,
        ItemKind::BackpackTier2,
        ItemKind::BackpackTier3,
        ItemKind::BackpackTier4,
        ItemKind::BackpackTier5,
    ];

    /// CLI / 日志里用的稳定 id
    pub fn id(self) -> &'static str {
        match self {
            ItemKind::Wood => "wood",
            ItemKind::Stone => "stone",
            ItemKind::Meat => "meat",
            ItemKind::Leather => "leather",
            ItemKind::Thread => "thread",
            ItemKind::Iron => "iron",
            ItemKind::StoneAxe => "stone_axe",
            ItemKind::StonePickaxe => "stone_pickaxe",
            ItemKind::StoneSword => "stone_sword",
            ItemKind::BackpackTier2 => "backpack_tier2",
            ItemKind::BackpackTier3 => "backpack_tier3",
            ItemKind::BackpackTier4 => "backpack_tier4",
            ItemKind::BackpackTier5 => "backpack_tier5",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ItemKind::Wood => "木头",
            ItemKind::Stone => "石头",
            ItemKind::Meat => "肉",
            ItemKind::Leather => "皮革",
            ItemKind::Thread => "线",
            ItemKind::Iron => "铁",
            ItemKind::StoneAxe => "石斧",
            ItemKind::StonePickaxe => "石镐",
            ItemKind::StoneSword => "石剑",
            ItemKind::BackpackTier2 => "小背包",
            ItemKind::BackpackTier3 => "中背包",
            ItemKind::BackpackTier4 => "大背包",
            ItemKind::BackpackTier5 => "史诗背包",
        }
    }

    pub fn parse(token: &str) -> Option<ItemKind> {
        ItemKind::ALL
            .into_iter()
            .find(|k| k.id().eq_ignore_ascii_case(token))
    }

    /// 工具和背包不可堆叠：工具各自带耐久，合并会丢信息
    pub fn max_stack(self) -> u32 {
        if self.is_tool() || self.is_backpack() {
            1
        } else {
            64
        }
    }

    pub fn tool_category(self) -> Option<ToolCategory> {
        match self {
            ItemKind::StoneAxe => Some(ToolCategory::Axe),
            ItemKind::StonePickaxe => Some(ToolCategory::Pickaxe),
            ItemKind::StoneSword => Some(ToolCategory::Sword),
            _ => None,
        }
    }

    pub fn is_tool(self) -> bool {
        self.tool_category().is_some()
    }

    pub fn tool_power(self) -> u32 {
        match self {
            ItemKind::StoneAxe | ItemKind::StonePickaxe => 2,
            ItemKind::StoneSword => 3,
            _ => 1,
        }
    }

    /// 只有工具有有限耐久，其余种类永远返回 None（无限）
    pub fn max_durability(self) -> Option<u32> {
        match self {
            ItemKind::StoneAxe | ItemKind::StonePickaxe => Some(20),
            ItemKind::StoneSword => Some(30),
            _ => None,
        }
    }

    pub fn backpack_tier(self) -> Option<u8> {
        match self {
            ItemKind::BackpackTier2 => Some(2),
            ItemKind::BackpackTier3 => Some(3),
            ItemKind::BackpackTier4 => Some(4),
            ItemKind::BackpackTier5 => Some(5),
            _ => None,
        }
    }

    pub fn is_backpack(self) -> bool {
        self.backpack_tier().is_some()
    }
}

impl Category {
    pub fn id(self) -> &'static str {
        match self {
            Category::Wood => "wood",
            Category::Stone => "stone",
            Category::Sheep => "sheep",
        }
    }
}

/// 背包等级定义，hotbar 宽度恒等于 columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierDef {
    pub tier: u8,
    pub rows: usize,
    pub columns: usize,
    pub slot_count: usize,
    pub name: &'static str,
}

/// 配方：材料表 → 产物
#[derive(Debug, Clone)]
pub struct Recipe {
    pub name: &'static str,
    pub output: ItemKind,
    pub output_count: u32,
    pub materials: Vec<(ItemKind, u32)>,
}
