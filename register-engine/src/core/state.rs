use std::sync::Arc;

use tokio::sync::Notify;

use crate::core::Config;
use crate::db::DbService;
use crate::sync::SyncService;
use crate::utils::AppResult;

/// 引擎状态 - 持有所有服务的共享引用
///
/// Cloning is shallow (Arc/pool handles); every service operation takes
/// `&EngineState`.
#[derive(Clone, Debug)]
pub struct EngineState {
    /// 引擎配置
    pub config: Config,
    /// SQLite 数据库服务
    pub db: DbService,
    /// Sync 广播 (cache invalidation / push)
    pub sync: SyncService,
    /// 配置变更信号 (EOD 调度器重算下次触发时间)
    pub config_notify: Arc<Notify>,
}

impl EngineState {
    /// 初始化引擎状态 (打开数据库, 应用迁移)
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db = DbService::new(&config.db_path).await?;
        Ok(Self {
            config: config.clone(),
            db,
            sync: SyncService::default(),
            config_notify: Arc::new(Notify::new()),
        })
    }

    pub fn pool(&self) -> &sqlx::SqlitePool {
        &self.db.pool
    }

    /// 广播餐厅范围的同步事件 (fire-and-forget)
    pub fn broadcast_sync(
        &self,
        restaurant_id: i64,
        resource: &str,
        action: &str,
        id: impl ToString,
    ) {
        self.sync.publish(restaurant_id, resource, action, id);
    }
}
