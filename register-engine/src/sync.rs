//! Sync broadcast
//!
//! After every state change the engine emits a restaurant-scoped
//! invalidation event. The cache/push layer that consumes these is out of
//! scope; delivery is fire-and-forget and the engine never depends on it
//! succeeding (a send with no subscribers is not an error).

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::broadcast;

/// 资源版本管理器
///
/// 每种资源类型维护独立的版本号，原子递增。客户端通过版本号判断数据新旧。
#[derive(Debug, Default)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    pub fn new() -> Self {
        Self {
            versions: DashMap::new(),
        }
    }

    /// 递增指定资源的版本号并返回新值
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// 获取指定资源的当前版本号
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }
}

/// One restaurant-scoped invalidation event
#[derive(Debug, Clone, Serialize)]
pub struct SyncEvent {
    pub restaurant_id: i64,
    /// Resource kind, e.g. "register" / "check_in"
    pub resource: String,
    /// What happened, e.g. "opened" / "closed" / "force_closed"
    pub action: String,
    /// Affected record id
    pub id: String,
    /// Monotonic per-resource version
    pub version: u64,
    pub timestamp: i64,
}

/// Broadcast channel for sync events
#[derive(Debug, Clone)]
pub struct SyncService {
    tx: broadcast::Sender<SyncEvent>,
    versions: Arc<ResourceVersions>,
}

impl SyncService {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            versions: Arc::new(ResourceVersions::new()),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.tx.subscribe()
    }

    /// Publish an event; dropped silently when nobody is listening
    pub fn publish(&self, restaurant_id: i64, resource: &str, action: &str, id: impl ToString) {
        let event = SyncEvent {
            restaurant_id,
            resource: resource.to_string(),
            action: action.to_string(),
            id: id.to_string(),
            version: self.versions.increment(resource),
            timestamp: shared::util::now_millis(),
        };
        tracing::debug!(
            resource = %event.resource,
            action = %event.action,
            id = %event.id,
            version = event.version,
            "sync event"
        );
        let _ = self.tx.send(event);
    }
}

impl Default for SyncService {
    fn default() -> Self {
        Self::new(256)
    }
}
