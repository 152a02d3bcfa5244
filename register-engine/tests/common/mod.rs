//! Shared test harness: engine on a throwaway SQLite file + seed helpers.

use register_engine::core::{Config, EngineState};
use register_engine::db::repository::restaurant;
use shared::models::{Restaurant, Staff};
use shared::util::snowflake_id;
use tempfile::TempDir;

pub struct TestEngine {
    pub state: EngineState,
    _dir: TempDir,
}

pub async fn engine() -> TestEngine {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("register.db");
    let config = Config {
        work_dir: dir.path().to_string_lossy().into_owned(),
        db_path: db_path.to_string_lossy().into_owned(),
        timezone: chrono_tz::Asia::Kolkata,
        eod_cutoff: "02:00".into(),
        environment: "test".into(),
    };
    let state = EngineState::initialize(&config)
        .await
        .expect("engine init");
    TestEngine { state, _dir: dir }
}

/// Restaurant with a midnight cutoff, so the business date is the calendar
/// date and tests are not flaky around 02:00.
pub async fn seed_restaurant(state: &EngineState, name: &str) -> Restaurant {
    let mut conn = state.pool().acquire().await.expect("conn");
    restaurant::create(&mut conn, name, "Asia/Kolkata", "00:00")
        .await
        .expect("seed restaurant")
}

pub async fn seed_staff(state: &EngineState, restaurant_id: i64, name: &str) -> Staff {
    let mut conn = state.pool().acquire().await.expect("conn");
    restaurant::create_staff(&mut conn, restaurant_id, name)
        .await
        .expect("seed staff")
}

/// Admin user with access to the given restaurant; returns the user id.
pub async fn seed_admin(state: &EngineState, restaurant_id: i64) -> i64 {
    let user_id = snowflake_id();
    let mut conn = state.pool().acquire().await.expect("conn");
    restaurant::grant_admin_access(&mut conn, user_id, restaurant_id)
        .await
        .expect("seed admin");
    user_id
}

/// Today's business date string as the engine computes it for seeded
/// restaurants (midnight cutoff).
pub fn today() -> String {
    register_engine::utils::time::current_business_date_string(
        chrono::NaiveTime::MIN,
        chrono_tz::Asia::Kolkata,
    )
}
