use chrono_tz::Tz;

use crate::utils::time;

/// 引擎配置
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/register-engine | 工作目录 |
/// | DB_PATH | <WORK_DIR>/register.db | SQLite 数据库路径 |
/// | BUSINESS_TIMEZONE | Asia/Kolkata | 默认业务时区 (餐厅行可覆盖) |
/// | EOD_CUTOFF | 02:00 | 默认营业日边界, EOD 调度触发时间 |
/// | ENVIRONMENT | development | 运行环境 |
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// SQLite 数据库路径
    pub db_path: String,
    /// 默认业务时区 (per-restaurant timezone overrides this)
    pub timezone: Tz,
    /// 默认营业日边界 "HH:MM"，EOD 扫描在此时间点触发
    pub eod_cutoff: String,
    /// 运行环境: development | staging | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置，未设置时使用默认值
    pub fn from_env() -> Self {
        let work_dir =
            std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/register-engine".into());
        let db_path =
            std::env::var("DB_PATH").unwrap_or_else(|_| format!("{work_dir}/register.db"));
        let fallback: Tz = chrono_tz::Asia::Kolkata;
        let timezone = std::env::var("BUSINESS_TIMEZONE")
            .map(|name| time::parse_timezone(&name, fallback))
            .unwrap_or(fallback);

        Self {
            work_dir,
            db_path,
            timezone,
            eod_cutoff: std::env::var("EOD_CUTOFF").unwrap_or_else(|_| "02:00".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }
}
