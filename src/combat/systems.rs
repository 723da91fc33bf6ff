use bevy::prelude::*;

use super::events::*;
use crate::core::events::LogEvent;
use crate::core::resources::{ActionGate, GameConfig, TickClock};
use crate::data::schema::{Category, ItemKind};
use crate::data::tables::{combat_effectiveness, harvest_effectiveness};
use crate::inventory::components::{Inventory, ToolDescriptor, ToolWear};
use crate::inventory::events::RefreshHotbarEvent;
use crate::world::components::{Health, TargetCategory};
use crate::world::events::SpawnDropEvent;

/// 伤害 = floor(工具威力 × 效率)
pub fn damage_for(tool: &ToolDescriptor, target: Category, harvesting: bool) -> i32 {
    let effectiveness = if harvesting {
        harvest_effectiveness(tool.category, target)
    } else {
        combat_effectiveness(tool.category, target)
    };
    (tool.power as f32 * effectiveness).floor() as i32
}

/// 目标倒下/耗尽时的掉落
pub fn death_drops(category: Category) -> (ItemKind, u32) {
    match category {
        Category::Wood => (ItemKind::Wood, 2),
        Category::Stone => (ItemKind::Stone, 2),
        Category::Sheep => (ItemKind::Meat, 1),
    }
}

/// 攻击与采集共用的一次挥动：忙碌门 → 伤害 → 磨耐久 → 收尾。
/// 表现层的闪烁/飘字不在这里，核心只做状态
#[allow(clippy::too_many_arguments)]
fn perform_swing(
    harvesting: bool,
    target: Entity,
    commands: &mut Commands,
    inventory: &mut Inventory,
    clock: &TickClock,
    gate: &mut ActionGate,
    config: &GameConfig,
    targets: &mut Query<(&mut Health, &TargetCategory, &Transform)>,
    log_event: &mut EventWriter<LogEvent>,
    spawn_drop: &mut EventWriter<SpawnDropEvent>,
    refresh: &mut EventWriter<RefreshHotbarEvent>,
) {
    if gate.is_busy(clock.0) {
        log_event.write(LogEvent("上一次挥动还没结束".to_string()));
        return;
    }

    let Ok((mut health, category, transform)) = targets.get_mut(target) else {
        log_event.write(LogEvent("目标不存在".to_string()));
        return;
    };
    if !health.is_alive() {
        log_event.write(LogEvent("目标已经倒下".to_string()));
        return;
    }

    gate.occupy(clock.0, config.swing_ticks);

    let tool = inventory.current_tool().clone();
    let damage = damage_for(&tool, category.0, harvesting);
    health.take_damage(damage);
    info!(
        "swing: tool={:?} target={} damage={} hp={}/{}",
        tool.category,
        category.0.id(),
        damage,
        health.current,
        health.max
    );

    // 无限耐久（徒手、非工具）不磨损
    if tool.durability.is_some() {
        match inventory.reduce_tool_durability() {
            ToolWear::Broke { kind } => {
                log_event.write(LogEvent(format!("💥 {} 坏了！", kind.name())));
            }
            ToolWear::Worn { .. } => {}
        }
        refresh.write(RefreshHotbarEvent);
    }

    if !health.is_alive() {
        let (kind, count) = death_drops(category.0);
        spawn_drop.write(SpawnDropEvent {
            kind,
            count,
            position: transform.translation.truncate(),
            direction: None,
        });
        log_event.write(LogEvent(format!(
            "{} 倒下了，掉落 {} ×{}",
            category.0.id(),
            kind.name(),
            count
        )));
        commands.entity(target).despawn();
    }
}

pub fn handle_attack(
    mut ev_attack: EventReader<AttackEvent>,
    mut commands: Commands,
    mut inventory: ResMut<Inventory>,
    clock: Res<TickClock>,
    mut gate: ResMut<ActionGate>,
    config: Res<GameConfig>,
    mut targets: Query<(&mut Health, &TargetCategory, &Transform)>,
    mut log_event: EventWriter<LogEvent>,
    mut spawn_drop: EventWriter<SpawnDropEvent>,
    mut refresh: EventWriter<RefreshHotbarEvent>,
) {
    for ev in ev_attack.read() {
        perform_swing(
            false,
            ev.target,
            &mut commands,
            &mut inventory,
            &clock,
            &mut gate,
            &config,
            &mut targets,
            &mut log_event,
            &mut spawn_drop,
            &mut refresh,
        );
    }
}

pub fn handle_harvest(
    mut ev_harvest: EventReader<HarvestEvent>,
    mut commands: Commands,
    mut inventory: ResMut<Inventory>,
    clock: Res<TickClock>,
    mut gate: ResMut<ActionGate>,
    config: Res<GameConfig>,
    mut targets: Query<(&mut Health, &TargetCategory, &Transform)>,
    mut log_event: EventWriter<LogEvent>,
    mut spawn_drop: EventWriter<SpawnDropEvent>,
    mut refresh: EventWriter<RefreshHotbarEvent>,
) {
    for ev in ev_harvest.read() {
        perform_swing(
            true,
            ev.target,
            &mut commands,
            &mut inventory,
            &clock,
            &mut gate,
            &config,
            &mut targets,
            &mut log_event,
            &mut spawn_drop,
            &mut refresh,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::ToolCategory;
    use crate::data::tables::BASE_TIER;
    use crate::inventory::item::Item;

    fn descriptor_for(kind: ItemKind) -> ToolDescriptor {
        ToolDescriptor::from_item(&Item::new(kind, 1))
    }

    #[test]
    fn damage_floors_the_effectiveness_product() {
        let axe = descriptor_for(ItemKind::StoneAxe);
        assert_eq!(damage_for(&axe, Category::Wood, false), 3); // 2 × 1.5
        assert_eq!(damage_for(&axe, Category::Stone, false), 1); // 2 × 0.5

        let sword = descriptor_for(ItemKind::StoneSword);
        assert_eq!(damage_for(&sword, Category::Sheep, false), 3); // 3 × 1.2 = 3.6

        let hand = ToolDescriptor::hand();
        assert_eq!(hand.category, ToolCategory::Hand);
        assert_eq!(damage_for(&hand, Category::Stone, false), 0); // 1 × 0.3
    }

    #[test]
    fn harvest_table_diverges_from_combat_table() {
        let hand = ToolDescriptor::hand();
        assert_eq!(damage_for(&hand, Category::Wood, true), 1);
        assert_eq!(damage_for(&hand, Category::Wood, false), 0);

        let pickaxe = descriptor_for(ItemKind::StonePickaxe);
        assert_eq!(damage_for(&pickaxe, Category::Stone, true), 3); // 2 × 1.5
        assert_eq!(damage_for(&pickaxe, Category::Wood, true), 1); // 2 × 0.5
    }

    #[test]
    fn last_swing_breaks_the_tool_and_resets_to_hand() {
        let mut inv = Inventory::new(BASE_TIER);
        inv.put_slot(0, Item::with_durability(ItemKind::StoneAxe, 1, Some(1)));
        inv.select_hotbar_slot(0);

        let tool = inv.current_tool().clone();
        let mut target = Health::new(10);
        target.take_damage(damage_for(&tool, Category::Sheep, false));
        assert_eq!(target.current, 9); // 2 × 0.8 = 1.6 → 1

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
    fn every_category_drops_something_on_death() {
        assert_eq!(death_drops(Category::Wood), (ItemKind::Wood, 2));
        assert_eq!(death_drops(Category::Stone), (ItemKind::Stone, 2));
        assert_eq!(death_drops(Category::Sheep), (ItemKind::Meat, 1));
    }
}
