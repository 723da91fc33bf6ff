use bevy::prelude::*;
use serde::Deserialize;

/// 可调参数，优先读 config.toml，缺失时用默认值
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// 一次挥动占用的 tick 数（攻击/采集共用的忙碌窗口）
    pub swing_ticks: u64,
    /// 溢出物散落的最大偏移（世界坐标）
    pub drop_scatter: f32,
    /// 主动丢弃时抛出的距离
    pub throw_distance: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            swing_ticks: 30,
            drop_scatter: 20.0,
            throw_distance: 50.0,
        }
    }
}

impl GameConfig {
    pub fn load() -> Self {
        match std::fs::read_to_string("config.toml") {
            Ok(text) => match toml::from_str(&text) {
                Ok(config) => config,
                Err(e) => {
                    warn!("config.toml 解析失败，使用默认配置: {e}");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

/// 逻辑 tick 计数，每帧 Update 加一
#[derive(Resource, Default)]
pub struct TickClock(pub u64);

/// 动作忙碌门：挥动期间拒绝再次进入动作
#[derive(Resource, Default)]
pub struct ActionGate {
    pub busy_until: u64,
}

impl ActionGate {
    pub fn is_busy(&self, now: u64) -> bool {
        now < self.busy_until
    }

    pub fn occupy(&mut self, now: u64, ticks: u64) {
        self.busy_until = now + ticks;
    }
}

pub fn advance_tick(mut clock: ResMut<TickClock>) {
    clock.0 += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_blocks_until_deadline() {
        let mut gate = ActionGate::default();
        assert!(!gate.is_busy(0));

        gate.occupy(10, 30);
        assert!(gate.is_busy(39));
        assert!(!gate.is_busy(40));
    }

    #[test]
    fn config_defaults_apply() {
        let config: GameConfig = toml::from_str("swing_ticks = 12").unwrap();
        assert_eq!(config.swing_ticks, 12);
        assert_eq!(config.drop_scatter, GameConfig::default().drop_scatter);
    }
}
