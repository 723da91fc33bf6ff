use bevy::prelude::*;
use serde::Serialize;

use super::item::{Item, ItemId};
use crate::data::schema::{ItemKind, TierDef, ToolCategory};
use crate::data::tables::{tier_def, BASE_TIER};

/// 当前选中工具的视图。不持有独立的耐久计数：
/// 耐久只通过 item_id 回查仓库里的本体读写
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub kind: Option<ItemKind>,
    pub category: ToolCategory,
    pub power: u32,
    pub durability: Option<u32>,
    pub max_durability: Option<u32>,
    pub item_id: Option<ItemId>,
}

impl ToolDescriptor {
    /// 徒手哨兵：空槽或越界时的兜底工具
    pub fn hand() -> Self {
        Self {
            kind: None,
            category: ToolCategory::Hand,
            power: 1,
            durability: None,
            max_durability: None,
            item_id: None,
        }
    }

    pub fn from_item(item: &Item) -> Self {
        let kind = item.kind.expect("descriptor from an empty item");
        Self {
            kind: Some(kind),
            category: kind.tool_category().unwrap_or(ToolCategory::Hand),
            power: kind.tool_power(),
            durability: item.durability,
            max_durability: item.max_durability,
            item_id: Some(item.id),
        }
    }

    pub fn is_hand(&self) -> bool {
        self.item_id.is_none()
    }
}

/// 一次耐久磨损的结果
#[derive(Debug, PartialEq)]
pub enum ToolWear {
    Worn { remaining: u32 },
    Broke { kind: ItemKind },
}

/// 玩家仓库（挂在 Resource）。格子数由当前背包等级决定，
/// 已装备的背包本体永远不在格子序列里
#[derive(Resource, Serialize)]
pub struct Inventory {
    slots: Vec<Item>,
    tier: u8,
    backpack: Option<ItemKind>,
    selected_hotbar_slot: usize,
    current_tool: ToolDescriptor,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(BASE_TIER)
    }
}

impl Inventory {
    pub fn new(tier: u8) -> Self {
        let def = tier_def(tier).expect("inventory created with unknown tier");
        Self {
            slots: (0..def.slot_count).map(|_| Item::empty()).collect(),
            tier,
            backpack: None,
            selected_hotbar_slot: 0,
            current_tool: ToolDescriptor::hand(),
        }
    }

    pub fn tier(&self) -> &'static TierDef {
        tier_def(self.tier).expect("current tier missing from table")
    }

    pub fn hotbar_size(&self) -> usize {
        self.tier().columns
    }

    pub fn slots(&self) -> &[Item] {
        &self.slots
    }

    /// hotbar 投影：格子序列的前 columns 个
    pub fn hotbar(&self) -> &[Item] {
        &self.slots[..self.hotbar_size()]
    }

    pub fn slot(&self, index: usize) -> Option<&Item> {
        self.slots.get(index)
    }

    pub fn selected_hotbar_slot(&self) -> usize {
        self.selected_hotbar_slot
    }

    pub fn current_tool(&self) -> &ToolDescriptor {
        &self.current_tool
    }

    pub fn backpack(&self) -> Option<ItemKind> {
        self.backpack
    }

    /// 装上/取下背包本体。被装备的那一件在调用前已移出格子，
    /// 同种类的另一个背包留在格子里是合法状态
    pub fn set_backpack(&mut self, kind: Option<ItemKind>) {
        if let Some(kind) = kind {
            assert!(
                kind.is_backpack(),
                "{} is not a backpack kind",
                kind.id()
            );
        }
        self.backpack = kind;
    }

    /// 先补满已有同类堆（升序），再填空位，返回实际吸收量。
    /// 吸收不完的部分由调用方处理（通常是留在世界里）
    pub fn add_item(&mut self, kind: ItemKind, count: u32) -> u32 {
        let mut remaining = count;

        for slot in &mut self.slots {
            if remaining == 0 {
                break;
            }
            if !slot.is_empty() && slot.kind == Some(kind) {
                remaining -= slot.add(remaining);
            }
        }

        for slot in &mut self.slots {
            if remaining == 0 {
                break;
            }
            if slot.is_empty() {
                let put = remaining.min(kind.max_stack());
                *slot = Item::new(kind, put);
                remaining -= put;
            }
        }

        self.refresh_tool();
        count - remaining
    }

    /// 从指定格取走 count 个；数量不足或越界时不做任何改动
    pub fn remove_item(&mut self, slot_index: usize, count: u32) -> bool {
        let Some(slot) = self.slots.get_mut(slot_index) else {
            return false;
        };
        if slot.is_empty() || slot.count < count {
            return false;
        }

        slot.remove(count);
        if slot.is_empty() {
            *slot = Item::empty();
        }
        self.refresh_tool();
        true
    }

    pub fn count_of_kind(&self, kind: ItemKind) -> u32 {
        self.slots
            .iter()
            .filter(|s| !s.is_empty() && s.kind == Some(kind))
            .map(|s| s.count)
            .sum()
    }

    pub fn find_empty_slot(&self) -> Option<usize> {
        self.slots.iter().position(|s| s.is_empty())
    }

    /// [lo, hi) 里第一个空位
    pub fn find_empty_slot_in_range(&self, lo: usize, hi: usize) -> Option<usize> {
        let hi = hi.min(self.slots.len());
        (lo..hi).find(|&i| self.slots[i].is_empty())
    }

    pub fn find_slot_by_id(&self, id: ItemId) -> Option<usize> {
        self.slots.iter().position(|s| s.id == id)
    }

    /// 整格取出（移动语义），原格变空
    pub fn take_slot(&mut self, index: usize) -> Item {
        let taken = std::mem::replace(&mut self.slots[index], Item::empty());
        self.refresh_tool();
        taken
    }

    /// 整格放入，返回被换出的旧内容
    pub fn put_slot(&mut self, index: usize, item: Item) -> Item {
        let old = std::mem::replace(&mut self.slots[index], item);
        self.refresh_tool();
        old
    }

    /// 把 incoming 并进指定格，转移 min(余量, incoming.count)
    pub fn merge_into_slot(&mut self, index: usize, incoming: &mut Item) -> u32 {
        let moved = self.slots[index].add(incoming.count);
        incoming.count -= moved;
        self.refresh_tool();
        moved
    }

    /// 切换到新等级：尾部截断/补空位，幸存格子绝不移动。
    /// 被截掉的非空物品按索引升序返回，由调用方撒到世界里
    pub fn resize(&mut self, tier: u8) -> Vec<Item> {
        let def = tier_def(tier).expect("resize to unknown tier");
        self.tier = tier;

        let mut overflow = Vec::new();
        if def.slot_count < self.slots.len() {
            overflow = self
                .slots
                .drain(def.slot_count..)
                .filter(|item| !item.is_empty())
                .collect();
        } else {
            while self.slots.len() < def.slot_count {
                self.slots.push(Item::empty());
            }
        }

        if self.selected_hotbar_slot >= self.hotbar_size() {
            self.selected_hotbar_slot = 0;
        }
        self.refresh_tool();
        overflow
    }

    /// 选中 hotbar 格并重算工具视图，越界时忽略
    pub fn select_hotbar_slot(&mut self, index: usize) -> bool {
        if index >= self.hotbar_size() {
            return false;
        }
        self.selected_hotbar_slot = index;
        self.refresh_tool();
        true
    }

    /// 从选中格重新推导工具视图。每次改动格子后都会走到这里，
    /// 保证视图永远跟本体一致
    pub fn refresh_tool(&mut self) {
        let slot = &self.slots[self.selected_hotbar_slot];
        self.current_tool = if self.selected_hotbar_slot < self.hotbar_size() && !slot.is_empty() {
            ToolDescriptor::from_item(slot)
        } else {
            ToolDescriptor::hand()
        };
    }

    /// 给当前工具磨 1 点耐久。视图必须指向一个在格子里的本体，
    /// 否则就是上游契约被破坏
    pub fn reduce_tool_durability(&mut self) -> ToolWear {
        let id = self
            .current_tool
            .item_id
            .expect("durability reduction without a canonical item");
        let index = self
            .find_slot_by_id(id)
            .expect("tool descriptor points at an item missing from the grid");

        let alive = self.slots[index].reduce_durability(1);
        self.current_tool.durability = self.slots[index].durability;

        if alive {
            ToolWear::Worn {
                remaining: self.slots[index].durability.unwrap_or(0),
            }
        } else {
            let kind = self.slots[index].kind.expect("breaking an empty slot");
            self.slots[index] = Item::empty();
            self.current_tool = ToolDescriptor::hand();
            ToolWear::Broke { kind }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_inventory() -> Inventory {
        Inventory::new(BASE_TIER)
    }

    #[test]
    fn add_tops_up_existing_stacks_before_empty_slots() {
        let mut inv = base_inventory();
        inv.put_slot(2, Item::new(ItemKind::Wood, 60));

        assert_eq!(inv.add_item(ItemKind::Wood, 10), 10);
        assert_eq!(inv.slot(2).unwrap().count, 64);
        assert_eq!(inv.slot(0).unwrap().count, 6);
    }

    #[test]
    fn add_reports_absorbed_amount_when_full() {
        let mut inv = base_inventory();
        for i in 0..10 {
            inv.put_slot(i, Item::new(ItemKind::Stone, 64));
        }
        inv.remove_item(9, 64);
        inv.put_slot(9, Item::new(ItemKind::Stone, 60));

        assert_eq!(inv.add_item(ItemKind::Stone, 10), 4);
        assert_eq!(inv.count_of_kind(ItemKind::Stone), 64 * 10);
    }

    #[test]
    fn add_and_remove_conserve_totals() {
        let mut inv = base_inventory();
        let added = inv.add_item(ItemKind::Wood, 100);
        assert_eq!(added, 100);
        assert!(inv.remove_item(0, 40));
        assert_eq!(inv.count_of_kind(ItemKind::Wood), 60);
    }

    #[test]
    fn remove_fails_without_mutation_when_short() {
        let mut inv = base_inventory();
        inv.add_item(ItemKind::Wood, 5);

        assert!(!inv.remove_item(0, 6));
        assert_eq!(inv.slot(0).unwrap().count, 5);
        assert!(!inv.remove_item(99, 1));
    }

    #[test]
    fn empty_slot_search_respects_range() {
        let mut inv = base_inventory();
        for i in 0..4 {
            inv.put_slot(i, Item::new(ItemKind::Wood, 1));
        }
        assert_eq!(inv.find_empty_slot(), Some(4));
        assert_eq!(inv.find_empty_slot_in_range(0, 4), None);
        assert_eq!(inv.find_empty_slot_in_range(4, 10), Some(4));
    }

    #[test]
    fn resize_returns_overflow_in_ascending_order() {
        let mut inv = Inventory::new(3);
        for i in 0..20 {
            inv.put_slot(i, Item::new(ItemKind::Wood, (i + 1) as u32));
        }

        let overflow = inv.resize(BASE_TIER);
        assert_eq!(overflow.len(), 10);
        let counts: Vec<u32> = overflow.iter().map(|i| i.count).collect();
        assert_eq!(counts, (11..=20).collect::<Vec<u32>>());
        assert_eq!(inv.slots().len(), 10);
    }

    #[test]
    fn resize_down_and_up_keeps_survivors_untouched() {
        let mut inv = Inventory::new(3);
        inv.add_item(ItemKind::Wood, 12);
        inv.add_item(ItemKind::StoneAxe, 1);
        let before: Vec<(Option<ItemKind>, u32, super::ItemId)> = inv.slots()[..10]
            .iter()
            .map(|s| (s.kind, s.count, s.id))
            .collect();

        inv.resize(BASE_TIER);
        inv.resize(3);

        let after: Vec<(Option<ItemKind>, u32, super::ItemId)> = inv.slots()[..10]
            .iter()
            .map(|s| (s.kind, s.count, s.id))
            .collect();
        assert_eq!(before, after);
        assert!(inv.slots()[10..].iter().all(|s| s.is_empty()));
    }

    #[test]
    fn selecting_a_tool_builds_its_descriptor() {
        let mut inv = base_inventory();
        inv.add_item(ItemKind::StoneAxe, 1);

        assert!(inv.select_hotbar_slot(0));
        let tool = inv.current_tool();
        assert_eq!(tool.kind, Some(ItemKind::StoneAxe));
        assert_eq!(tool.category, ToolCategory::Axe);
        assert_eq!(tool.power, 2);
        assert_eq!(tool.durability, Some(20));
        assert_eq!(tool.item_id, Some(inv.slot(0).unwrap().id));
    }

    #[test]
    fn empty_or_out_of_range_selection_falls_back_to_hand() {
        let mut inv = base_inventory();
        assert!(inv.select_hotbar_slot(1));
        assert!(inv.current_tool().is_hand());
        assert_eq!(inv.current_tool().power, 1);

        assert!(!inv.select_hotbar_slot(5)); // base tier hotbar 是 5 格
    }

    #[test]
    fn non_tool_selection_acts_like_hand_with_an_id() {
        let mut inv = base_inventory();
        inv.add_item(ItemKind::Wood, 3);
        inv.select_hotbar_slot(0);

        let tool = inv.current_tool();
        assert_eq!(tool.category, ToolCategory::Hand);
        assert_eq!(tool.durability, None);
        assert!(tool.item_id.is_some());
    }

    #[test]
    fn wear_mirrors_into_descriptor_and_breaks_at_zero() {
        let mut inv = base_inventory();
        inv.add_item(ItemKind::StoneAxe, 1);
        inv.select_hotbar_slot(0);

        for expected in (1..20).rev() {
            match inv.reduce_tool_durability() {
                ToolWear::Worn { remaining } => {
                    assert_eq!(remaining, expected);
                    assert_eq!(inv.current_tool().durability, Some(expected));
                }
                ToolWear::Broke { .. } => panic!("broke too early"),
            }
        }

        assert_eq!(
            inv.reduce_tool_durability(),
            ToolWear::Broke {
                kind: ItemKind::StoneAxe
            }
        );
        assert!(inv.slot(0).unwrap().is_empty());
        assert!(inv.current_tool().is_hand());
    }

    #[test]
    #[should_panic(expected = "without a canonical item")]
    fn wearing_the_hand_sentinel_is_a_bug() {
        let mut inv = base_inventory();
        inv.reduce_tool_durability();
    }

    #[test]
    fn grid_mutation_keeps_descriptor_in_sync() {
        let mut inv = base_inventory();
        inv.add_item(ItemKind::StoneAxe, 1);
        inv.select_hotbar_slot(0);
        assert!(!inv.current_tool().is_hand());

        inv.remove_item(0, 1);
        assert!(inv.current_tool().is_hand());
    }

    #[test]
    fn equipped_backpack_never_doubles_into_the_grid() {
        let mut inv = base_inventory();
        inv.set_backpack(Some(ItemKind::BackpackTier2));
        assert_eq!(inv.backpack(), Some(ItemKind::BackpackTier2));
        inv.set_backpack(None);
    }

    #[test]
    fn a_same_kind_backpack_may_stay_in_the_grid() {
        // 背包槽里的是一件具体物品，格子里的同类备用背包不受影响
        let mut inv = base_inventory();
        inv.add_item(ItemKind::BackpackTier2, 1);
        inv.set_backpack(Some(ItemKind::BackpackTier2));
        assert_eq!(inv.backpack(), Some(ItemKind::BackpackTier2));
        assert_eq!(inv.count_of_kind(ItemKind::BackpackTier2), 1);
    }
}
