//! Register Engine - 收银钱箱与班次对账引擎
//!
//! Cash register lifecycle, append-only transaction ledger, staff shift
//! check-in/check-out and the end-of-day forced-closure sweep, on embedded
//! SQLite. Multi-tenant by restaurant.
//!
//! ## 模块结构
//!
//! - [`core`] - 配置、共享状态、后台任务管理
//! - [`db`] - SQLite 连接池与仓储层
//! - [`balance`] - 余额计算 (pure folds over the ledger)
//! - [`services`] - 业务操作 (register lifecycle, shifts)
//! - [`eod`] - 日结扫描与调度器
//! - [`sync`] - 同步事件广播
//! - [`utils`] - 错误、日志、时间、校验

pub mod balance;
pub mod core;
pub mod db;
pub mod eod;
pub mod services;
pub mod sync;
pub mod utils;

pub use crate::core::{Config, EngineState, start_background_tasks};
pub use crate::utils::{AppError, AppResult};
