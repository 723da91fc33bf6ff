use bevy::prelude::*;
use rand::Rng;

use super::{components::*, events::*};
use crate::core::events::LogEvent;
use crate::core::resources::GameConfig;
use crate::data::schema::{Category, ItemKind};
use crate::inventory::components::Inventory;
use crate::inventory::events::RefreshHotbarEvent;

/// 开局物资
pub const STARTING_KIT: [(ItemKind, u32); 5] = [
    (ItemKind::BackpackTier2, 1),
    (ItemKind::Wood, 12),
    (ItemKind::Stone, 8),
    (ItemKind::Meat, 3),
    (ItemKind::StoneAxe, 1),
];

/// 分类对应的初始血量
pub fn target_health(category: Category) -> i32 {
    match category {
        Category::Wood => 10,
        Category::Stone => 15,
        Category::Sheep => 20,
    }
}

pub fn spawn_target(commands: &mut Commands, category: Category, position: Vec2) {
    commands.spawn((
        Health::new(target_health(category)),
        TargetCategory(category),
        Transform::from_translation(position.extend(0.0)),
    ));
}

/// 进入游戏时布置玩家、初始物资和几个试手的目标
pub fn setup_world(
    mut commands: Commands,
    mut inventory: ResMut<Inventory>,
    mut log_event: EventWriter<LogEvent>,
) {
    commands.spawn((Player, Transform::default()));

    for (kind, count) in STARTING_KIT {
        inventory.add_item(kind, count);
    }

    spawn_target(&mut commands, Category::Wood, Vec2::new(80.0, 0.0));
    spawn_target(&mut commands, Category::Wood, Vec2::new(-60.0, 40.0));
    spawn_target(&mut commands, Category::Stone, Vec2::new(0.0, 90.0));
    spawn_target(&mut commands, Category::Stone, Vec2::new(50.0, -70.0));
    spawn_target(&mut commands, Category::Sheep, Vec2::new(-90.0, -30.0));

    log_event.write(LogEvent("进入世界，输入 help 查看命令".to_string()));
}

/// 把掉落事件落成实体：定向抛出或原地散落
pub fn spawn_drops(
    mut ev_spawn: EventReader<SpawnDropEvent>,
    mut commands: Commands,
    config: Res<GameConfig>,
) {
    let mut rng = rand::thread_rng();
    for ev in ev_spawn.read() {
        let landing = match ev.direction {
            Some(dir) => ev.position + dir.normalize_or_zero() * config.throw_distance,
            None => {
                ev.position
                    + Vec2::new(
                        rng.gen_range(-config.drop_scatter..=config.drop_scatter),
                        rng.gen_range(-config.drop_scatter..=config.drop_scatter),
                    )
            }
        };

        commands.spawn((
            ItemDrop {
                kind: ev.kind,
                count: ev.count,
            },
            Transform::from_translation(landing.extend(0.0)),
        ));
        info!("掉落 {} ×{} 于 ({:.0}, {:.0})", ev.kind.id(), ev.count, landing.x, landing.y);
    }
}

/// 扫掉落物进仓库，塞不下的留在原地
pub fn loot_drops(
    mut ev_loot: EventReader<LootEvent>,
    mut commands: Commands,
    mut drops: Query<(Entity, &mut ItemDrop)>,
    mut inventory: ResMut<Inventory>,
    mut log_event: EventWriter<LogEvent>,
    mut refresh: EventWriter<RefreshHotbarEvent>,
) {
    if ev_loot.is_empty() {
        return;
    }
    ev_loot.clear();

    let mut picked_any = false;
    for (entity, mut drop) in &mut drops {
        let added = inventory.add_item(drop.kind, drop.count);
        if added == 0 {
            continue;
        }
        picked_any = true;
        log_event.write(LogEvent(format!("捡起 {} ×{}", drop.kind.name(), added)));

        if added == drop.count {
            commands.entity(entity).despawn();
        } else {
            drop.count -= added;
        }
    }

    if picked_any {
        refresh.write(RefreshHotbarEvent);
    } else {
        log_event.write(LogEvent("地上没有能捡的东西".to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tables::BASE_TIER;

    #[test]
    fn starting_kit_fits_the_base_inventory() {
        let mut inv = Inventory::new(BASE_TIER);
        for (kind, count) in STARTING_KIT {
            assert_eq!(inv.add_item(kind, count), count);
        }
        assert_eq!(inv.count_of_kind(ItemKind::BackpackTier2), 1);
        assert_eq!(inv.count_of_kind(ItemKind::Wood), 12);
        assert_eq!(inv.count_of_kind(ItemKind::Stone), 8);
        assert_eq!(inv.count_of_kind(ItemKind::Meat), 3);
        assert_eq!(inv.count_of_kind(ItemKind::StoneAxe), 1);
    }
}
