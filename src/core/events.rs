use bevy::prelude::*;

/// 面向玩家的通知，由 main 里的转发系统打印
#[derive(Event)]
pub struct LogEvent(pub String);
