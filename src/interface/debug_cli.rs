//! 文字 CLI：读取 stdin → 解析命令 → 分发事件并打印

use bevy::app::AppExit;
use bevy::prelude::*;
use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::num::NonZero;
use std::sync::{Arc, Mutex};

use crate::core::resources::{ActionGate, TickClock};
use crate::core::{events::LogEvent, states::AppState};
use crate::data::schema::{Category, ItemKind};
use crate::interaction::components::Cursor;
use crate::inventory::components::Inventory;
use crate::world::components::{Health, LastFacing, TargetCategory};
use crate::world::systems::spawn_target;

static CLI_BUFFER: Lazy<Arc<Mutex<VecDeque<String>>>> =
    Lazy::new(|| Arc::new(Mutex::new(VecDeque::new())));

/// 插件入口
pub struct DebugCliPlugin;
impl Plugin for DebugCliPlugin {
    fn build(&self, app: &mut App) {
        {
            let buffer = CLI_BUFFER.clone();
            std::thread::spawn(move || {
                use std::io::{self, BufRead};
                let stdin = io::stdin();
                for line_result in stdin.lock().lines() {
                    if let Ok(line) = line_result {
                        let line = line.trim();
                        if !line.is_empty() {
                            let mut buf = buffer.lock().unwrap();
                            buf.push_back(line.to_string());
                        }
                    }
                }
            });
        }
        app
            // 事件：原始输入行 → 已解析命令
            .add_event::<CliLine>()
            .add_event::<CliCommand>()
            // 每帧从 buffer 取出所有命令行写入事件
            .add_systems(Update, (read_stdin, parse_lines).chain())
            // 仅在 InGame 处理命令；每个分发器只认自己那一组
            .add_systems(
                Update,
                (
                    dispatch_meta,
                    dispatch_inventory,
                    dispatch_interaction,
                    dispatch_world,
                )
                    .after(parse_lines)
                    .run_if(in_state(AppState::InGame)),
            );
    }
}

/* ---------------------------- 事件与枚举 ---------------------------- */

/// 终端敲的一整行
#[derive(Event)]
struct CliLine(String);

/// 我们支持的命令
#[derive(Event, Clone)]
enum CliCommand {
    Help,
    Status,
    Exit,
    Items(Option<String>), // None=全部；Some(token)=按 id/名称 查询
    Give { kind: ItemKind, count: u32 },
    Remove { slot: usize, count: u32 },
    Inventory,
    Select { index: usize },
    Pickup { slot: usize },
    Place { slot: usize },
    Split { slot: usize },
    Drop { slot: usize },
    Close,
    Pack,
    Craft { recipe_index: usize },
    CraftList,
    Attack { category: Option<Category> },
    Harvest { category: Option<Category> },
    Loot,
    Spawn { category: Category },
    Face { direction: Vec2 },
    Dump,
    Unsupported(String),
}

/* ---------------------------- 读取与解析 ---------------------------- */

fn read_stdin(mut writer: EventWriter<CliLine>) {
    let mut buffer = CLI_BUFFER.lock().unwrap();
    while let Some(line) = buffer.pop_front() {
        writer.write(CliLine(line));
    }
}

fn parse_lines(
    mut line_reader: EventReader<CliLine>,
    mut commands: EventWriter<CliCommand>,
    mut log: EventWriter<LogEvent>,
) {
    for CliLine(input) in line_reader.read() {
        match parse_command(input) {
            Ok(cmd) => {
                commands.write(cmd);
            }
            Err(msg) => {
                log.write(LogEvent(msg));
            }
        }
    }
}

fn parse_command(input: &str) -> Result<CliCommand, String> {
    let mut parts = input.split_whitespace();
    let cmd = parts.next().unwrap_or("").to_lowercase();

    let parse_slot = |parts: &mut std::str::SplitWhitespace| -> Result<usize, String> {
        parts
            .next()
            .ok_or_else(|| "缺少格子序号".to_string())?
            .parse()
            .map_err(|_| "格子序号要是数字".to_string())
    };

    match cmd.as_str() {
        "help" | "h" | "?" => Ok(CliCommand::Help),
        "status" | "s" => Ok(CliCommand::Status),
        "exit" | "quit" | "q" => Ok(CliCommand::Exit),
        "items" | "item" | "i" => Ok(CliCommand::Items(parts.next().map(|s| s.to_string()))),
        "give" => {
            let token = parts.next().ok_or_else(|| "用法: give <id> [count]".to_string())?;
            let kind = ItemKind::parse(token).ok_or_else(|| format!("未知物品: {token}"))?;
            let count = parts.next().unwrap_or("1").parse().unwrap_or(1);
            Ok(CliCommand::Give { kind, count })
        }
        "remove" | "rm" => {
            let slot = parse_slot(&mut parts)?;
            let count = parts.next().unwrap_or("1").parse().unwrap_or(1);
            Ok(CliCommand::Remove { slot, count })
        }
        "inventory" | "inv" => Ok(CliCommand::Inventory),
        "select" | "sel" => Ok(CliCommand::Select {
            index: parse_slot(&mut parts)?,
        }),
        "pickup" => Ok(CliCommand::Pickup {
            slot: parse_slot(&mut parts)?,
        }),
        "place" => Ok(CliCommand::Place {
            slot: parse_slot(&mut parts)?,
        }),
        "split" => Ok(CliCommand::Split {
            slot: parse_slot(&mut parts)?,
        }),
        "drop" => Ok(CliCommand::Drop {
            slot: parse_slot(&mut parts)?,
        }),
        "close" => Ok(CliCommand::Close),
        "pack" => Ok(CliCommand::Pack),
        "craft" => match parts.next() {
            None | Some("list") => Ok(CliCommand::CraftList),
            Some(token) => token
                .parse()
                .map(|recipe_index| CliCommand::Craft { recipe_index })
                .map_err(|_| "用法: craft <序号> 或 craft list".to_string()),
        },
        "attack" | "atk" => Ok(CliCommand::Attack {
            category: parts.next().map(parse_category).transpose()?,
        }),
        "harvest" | "hv" => Ok(CliCommand::Harvest {
            category: parts.next().map(parse_category).transpose()?,
        }),
        "loot" => Ok(CliCommand::Loot),
        "spawn" => {
            let token = parts
                .next()
                .ok_or_else(|| "用法: spawn <tree|rock|sheep>".to_string())?;
            Ok(CliCommand::Spawn {
                category: parse_category(token)?,
            })
        }
        "face" => {
            let dx: f32 = parts
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| "用法: face <dx> <dy>".to_string())?;
            let dy: f32 = parts
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| "用法: face <dx> <dy>".to_string())?;
            Ok(CliCommand::Face {
                direction: Vec2::new(dx, dy),
            })
        }
        "dump" => Ok(CliCommand::Dump),
        other => Ok(CliCommand::Unsupported(other.into())),
    }
}

fn parse_category(token: &str) -> Result<Category, String> {
    match token.to_lowercase().as_str() {
        "tree" | "wood" => Ok(Category::Wood),
        "rock" | "stone" => Ok(Category::Stone),
        "sheep" => Ok(Category::Sheep),
        other => Err(format!("未知目标分类: {other}")),
    }
}

/* ---------------------------- 命令分发 ---------------------------- */

fn dispatch_meta(
    mut reader: EventReader<CliCommand>,
    mut app_exit: EventWriter<AppExit>,
    mut log: EventWriter<LogEvent>,
    state: Res<State<AppState>>,
    clock: Res<TickClock>,
    gate: Res<ActionGate>,
    inventory: Res<Inventory>,
    cursor: Res<Cursor>,
    mut facing: ResMut<LastFacing>,
) {
    for cmd in reader.read() {
        match cmd {
            CliCommand::Help => {
                log.write(LogEvent(
                    "命令列表:
  help                   查看帮助
  status                 查看当前状态
  exit / quit            退出程序
  items [token]          列出物品表 / 查询单个物品
  give <id> [count]      给予物品
  remove <slot> [count]  移除指定格物品
  inventory              查看仓库
  select <n>             选中 hotbar 第 n 格
  pickup <slot>          拿起整格到光标
  place <slot>           光标物品放入指定格
  split <slot>           拆一半到光标
  drop <slot>            把指定格丢到世界
  close                  关仓库（光标物品自动回格）
  pack                   光标有背包则装备，否则卸下当前背包
  craft [list|序号]      列配方 / 按序号合成
  attack [分类]          攻击最近的目标
  harvest [分类]         采集最近的目标
  loot                   捡起脚边掉落
  spawn <tree|rock|sheep> 生成一个目标
  face <dx> <dy>         设置面朝方向
  dump                   导出仓库与光标的 JSON 快照
  "
                    .into(),
                ));
            }

            CliCommand::Status => {
                log.write(LogEvent(format!(
                    "State: {:?}, Tick: {}, Busy: {}, Tier: {}, Selected: {}",
                    state.get(),
                    clock.0,
                    gate.is_busy(clock.0),
                    inventory.tier().name,
                    inventory.selected_hotbar_slot(),
                )));
            }

            CliCommand::Exit => {
                log.write(LogEvent("Bye~".into()));
                app_exit.write(AppExit::Error(NonZero::<u8>::MIN));
            }

            CliCommand::Items(token) => match token {
                None => {
                    for kind in ItemKind::ALL {
                        log.write(LogEvent(format!("{} | {}", kind.id(), kind.name())));
                    }
                }
                Some(t) => match ItemKind::parse(t) {
                    Some(kind) => {
                        log.write(LogEvent(format!(
                            "==================================================
ID    : {}
Name  : {}
Stack : {}
Tool  : {:?}
Dura  : {:?}
Pack  : {:?}
==================================================",
                            kind.id(),
                            kind.name(),
                            kind.max_stack(),
                            kind.tool_category(),
                            kind.max_durability(),
                            kind.backpack_tier(),
                        )));
                    }
                    None => {
                        log.write(LogEvent("未找到匹配物品".into()));
                    }
                },
            },

            CliCommand::Face { direction } => {
                facing.0 = *direction;
                log.write(LogEvent(format!(
                    "面朝 ({:.1}, {:.1})",
                    direction.x, direction.y
                )));
            }

            CliCommand::Dump => {
                let snapshot = serde_json::json!({
                    "inventory": &*inventory,
                    "cursor": &*cursor,
                });
                match serde_json::to_string_pretty(&snapshot) {
                    Ok(json) => log.write(LogEvent(json)),
                    Err(err) => log.write(LogEvent(format!("导出失败: {err}"))),
                };
            }

            CliCommand::Unsupported(cmd) => {
                log.write(LogEvent(format!("不支持的命令: {cmd}")));
            }

            _ => {}
        }
    }
}

fn dispatch_inventory(
    mut reader: EventReader<CliCommand>,
    mut ev_give: EventWriter<crate::inventory::events::GiveItemEvent>,
    mut ev_remove: EventWriter<crate::inventory::events::RemoveItemEvent>,
    mut ev_list: EventWriter<crate::inventory::events::ListInventoryEvent>,
    mut ev_select: EventWriter<crate::inventory::events::SelectHotbarEvent>,
    mut ev_craft: EventWriter<crate::crafting::events::CraftEvent>,
    mut ev_recipes: EventWriter<crate::crafting::events::ListRecipesEvent>,
) {
    for cmd in reader.read() {
        match cmd {
            CliCommand::Give { kind, count } => {
                ev_give.write(crate::inventory::events::GiveItemEvent {
                    kind: *kind,
                    count: *count,
                });
            }
            CliCommand::Remove { slot, count } => {
                ev_remove.write(crate::inventory::events::RemoveItemEvent {
                    slot: *slot,
                    count: *count,
                });
            }
            CliCommand::Inventory => {
                ev_list.write(crate::inventory::events::ListInventoryEvent);
            }
            CliCommand::Select { index } => {
                ev_select.write(crate::inventory::events::SelectHotbarEvent { index: *index });
            }
            CliCommand::Craft { recipe_index } => {
                ev_craft.write(crate::crafting::events::CraftEvent {
                    recipe_index: *recipe_index,
                });
            }
            CliCommand::CraftList => {
                ev_recipes.write(crate::crafting::events::ListRecipesEvent);
            }
            _ => {}
        }
    }
}

fn dispatch_interaction(
    mut reader: EventReader<CliCommand>,
    cursor: Res<Cursor>,
    mut ev_pickup: EventWriter<crate::interaction::events::PickupSlotEvent>,
    mut ev_place: EventWriter<crate::interaction::events::PlaceSlotEvent>,
    mut ev_split: EventWriter<crate::interaction::events::SplitSlotEvent>,
    mut ev_drop: EventWriter<crate::interaction::events::DropSlotEvent>,
    mut ev_close: EventWriter<crate::interaction::events::CloseInventoryEvent>,
    mut ev_equip: EventWriter<crate::equipment::events::EquipFromCursorEvent>,
    mut ev_unequip: EventWriter<crate::equipment::events::UnequipBackpackEvent>,
) {
    for cmd in reader.read() {
        match cmd {
            CliCommand::Pickup { slot } => {
                ev_pickup.write(crate::interaction::events::PickupSlotEvent { slot: *slot });
            }
            CliCommand::Place { slot } => {
                ev_place.write(crate::interaction::events::PlaceSlotEvent { slot: *slot });
            }
            CliCommand::Split { slot } => {
                ev_split.write(crate::interaction::events::SplitSlotEvent { slot: *slot });
            }
            CliCommand::Drop { slot } => {
                ev_drop.write(crate::interaction::events::DropSlotEvent { slot: *slot });
            }
            CliCommand::Close => {
                ev_close.write(crate::interaction::events::CloseInventoryEvent);
            }
            // pack 是个开关：光标有东西走装备路径，否则卸下
            CliCommand::Pack => {
                if cursor.is_holding() {
                    ev_equip.write(crate::equipment::events::EquipFromCursorEvent);
                } else {
                    ev_unequip.write(crate::equipment::events::UnequipBackpackEvent);
                }
            }
            _ => {}
        }
    }
}

fn dispatch_world(
    mut reader: EventReader<CliCommand>,
    mut commands: Commands,
    targets: Query<(Entity, &Health, &TargetCategory)>,
    mut ev_attack: EventWriter<crate::combat::events::AttackEvent>,
    mut ev_harvest: EventWriter<crate::combat::events::HarvestEvent>,
    mut ev_loot: EventWriter<crate::world::events::LootEvent>,
    mut log: EventWriter<LogEvent>,
) {
    // 没有定位系统，就按查询顺序取第一个还活着的目标
    let find_target = |wanted: Option<Category>| {
        targets
            .iter()
            .find(|(_, health, category)| {
                health.is_alive() && wanted.is_none_or(|w| category.0 == w)
            })
            .map(|(entity, _, _)| entity)
    };

    for cmd in reader.read() {
        match cmd {
            CliCommand::Attack { category } => match find_target(*category) {
                Some(target) => {
                    ev_attack.write(crate::combat::events::AttackEvent { target });
                }
                None => {
                    log.write(LogEvent("附近没有可攻击的目标".into()));
                }
            },
            CliCommand::Harvest { category } => match find_target(*category) {
                Some(target) => {
                    ev_harvest.write(crate::combat::events::HarvestEvent { target });
                }
                None => {
                    log.write(LogEvent("附近没有可采集的目标".into()));
                }
            },
            CliCommand::Loot => {
                ev_loot.write(crate::world::events::LootEvent);
            }
            CliCommand::Spawn { category } => {
                spawn_target(&mut commands, *category, Vec2::ZERO);
                log.write(LogEvent(format!("生成了一个 {}", category.id())));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_give_with_default_count() {
        match parse_command("give wood") {
            Ok(CliCommand::Give { kind, count }) => {
                assert_eq!(kind, ItemKind::Wood);
                assert_eq!(count, 1);
            }
            _ => panic!("expected give"),
        }
    }

    #[test]
    fn rejects_unknown_item_id() {
        assert!(parse_command("give vibranium 3").is_err());
    }

    #[test]
    fn craft_without_argument_lists_recipes() {
        assert!(matches!(parse_command("craft"), Ok(CliCommand::CraftList)));
        assert!(matches!(
            parse_command("craft list"),
            Ok(CliCommand::CraftList)
        ));
        assert!(matches!(
            parse_command("craft 2"),
            Ok(CliCommand::Craft { recipe_index: 2 })
        ));
    }

    #[test]
    fn slot_commands_need_a_numeric_slot() {
        assert!(parse_command("pickup").is_err());
        assert!(parse_command("pickup abc").is_err());
        assert!(matches!(
            parse_command("pickup 7"),
            Ok(CliCommand::Pickup { slot: 7 })
        ));
    }

    #[test]
    fn category_tokens_cover_aliases() {
        assert_eq!(parse_category("tree"), Ok(Category::Wood));
        assert_eq!(parse_category("ROCK"), Ok(Category::Stone));
        assert!(parse_category("dragon").is_err());
    }
}
