//! Core: 配置、状态、后台任务

pub mod config;
pub mod state;
pub mod tasks;

pub use config::Config;
pub use state::EngineState;
pub use tasks::{BackgroundTasks, TaskKind};

use crate::eod::EodScheduler;

/// 启动所有后台任务 (当前只有 EOD 调度器)
pub fn start_background_tasks(state: &EngineState) -> BackgroundTasks {
    let mut tasks = BackgroundTasks::new();
    let scheduler = EodScheduler::new(state.clone(), tasks.shutdown_token());
    tasks.spawn("eod_scheduler", TaskKind::Periodic, scheduler.run());
    tasks
}
