use serde::Serialize;
use uuid::Uuid;

use crate::data::schema::ItemKind;

/// 物品实例的稳定 id，耐久回写只认这个
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// 运行时物品实例。空槽用 kind=None / count=0 占位
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub id: ItemId,
    pub kind: Option<ItemKind>,
    pub count: u32,
    pub max_stack: u32,
    /// None 表示无限耐久（非工具和徒手哨兵）
    pub durability: Option<u32>,
    pub max_durability: Option<u32>,
}

impl Item {
    pub fn new(kind: ItemKind, count: u32) -> Self {
        let max_durability = kind.max_durability();
        Self {
            id: ItemId::new(),
            kind: Some(kind),
            count,
            max_stack: kind.max_stack(),
            durability: max_durability,
            max_durability,
        }
    }

    /// 指定剩余耐久的实例（用于拆分已磨损的工具等场景）
    pub fn with_durability(kind: ItemKind, count: u32, durability: Option<u32>) -> Self {
        let mut item = Self::new(kind, count);
        if item.max_durability.is_some() {
            item.durability = durability;
        }
        item
    }

    pub fn empty() -> Self {
        Self {
            id: ItemId::new(),
            kind: None,
            count: 0,
            max_stack: 64,
            durability: None,
            max_durability: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_none() || self.count == 0
    }

    /// other 非空、同类、且自己还有堆叠余量
    pub fn can_stack_with(&self, other: &Item) -> bool {
        !other.is_empty() && other.kind == self.kind && self.count < self.max_stack
    }

    /// 往本堆加 amount，返回实际加入量（按余量截断）
    pub fn add(&mut self, amount: u32) -> u32 {
        let added = amount.min(self.max_stack - self.count);
        self.count += added;
        added
    }

    /// 从本堆取 amount，返回实际取出量（按现量截断）
    pub fn remove(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.count);
        self.count -= removed;
        removed
    }

    /// 磨损耐久，返回是否还能用。无限耐久是空操作
    pub fn reduce_durability(&mut self, amount: u32) -> bool {
        let Some(durability) = self.durability else {
            return true;
        };
        let remaining = durability.saturating_sub(amount);
        self.durability = Some(remaining);
        remaining > 0
    }

    pub fn durability_percent(&self) -> f32 {
        match (self.durability, self.max_durability) {
            (Some(d), Some(m)) if m > 0 => d as f32 / m as f32,
            _ => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_when_kind_missing_or_count_zero() {
        assert!(Item::empty().is_empty());

        let mut wood = Item::new(ItemKind::Wood, 3);
        assert!(!wood.is_empty());
        wood.count = 0;
        assert!(wood.is_empty());
    }

    #[test]
    fn add_clamps_to_remaining_capacity() {
        let mut wood = Item::new(ItemKind::Wood, 60);
        assert_eq!(wood.add(10), 4);
        assert_eq!(wood.count, 64);
        assert_eq!(wood.add(1), 0);
    }

    #[test]
    fn remove_clamps_to_current_count() {
        let mut stone = Item::new(ItemKind::Stone, 5);
        assert_eq!(stone.remove(8), 5);
        assert_eq!(stone.count, 0);
        assert!(stone.is_empty());
    }

    #[test]
    fn stacking_requires_same_kind_and_room() {
        let wood = Item::new(ItemKind::Wood, 10);
        let more_wood = Item::new(ItemKind::Wood, 1);
        let stone = Item::new(ItemKind::Stone, 1);
        let full = Item::with_durability(ItemKind::Wood, 64, None);

        assert!(wood.can_stack_with(&more_wood));
        assert!(!wood.can_stack_with(&stone));
        assert!(!wood.can_stack_with(&Item::empty()));
        assert!(!full.can_stack_with(&more_wood));
    }

    #[test]
    fn tools_never_stack() {
        let axe = Item::new(ItemKind::StoneAxe, 1);
        let other_axe = Item::new(ItemKind::StoneAxe, 1);
        assert_eq!(axe.max_stack, 1);
        assert!(!axe.can_stack_with(&other_axe));
    }

    #[test]
    fn tools_start_at_max_durability() {
        let axe = Item::new(ItemKind::StoneAxe, 1);
        assert_eq!(axe.durability, Some(20));
        assert_eq!(axe.max_durability, Some(20));

        let wood = Item::new(ItemKind::Wood, 1);
        assert_eq!(wood.durability, None);
    }

    #[test]
    fn durability_wears_down_and_never_goes_negative() {
        let mut sword = Item::new(ItemKind::StoneSword, 1);
        for _ in 0..29 {
            assert!(sword.reduce_durability(1));
        }
        assert!(!sword.reduce_durability(1));
        assert_eq!(sword.durability, Some(0));
        assert!(!sword.reduce_durability(1));
        assert_eq!(sword.durability, Some(0));
    }

    #[test]
    fn infinite_durability_is_a_noop() {
        let mut meat = Item::new(ItemKind::Meat, 1);
        assert!(meat.reduce_durability(1));
        assert_eq!(meat.durability, None);
        assert_eq!(meat.durability_percent(), 1.0);
    }
}
