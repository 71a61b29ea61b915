// crates/jobboard/tests/site_settings.rs
mod common;

use common::{setup_db, SITE};
use jobboard::scheduler::{scheduler_state, SchedulerState};
use jobboard::settings::{SettingsSource, SiteSettings, SiteSettingsRepo};
use serial_test::serial;

#[tokio::test]
#[serial]
#[ignore = "requires TEST_DATABASE_URL"]
async fn missing_row_gets_defaults() {
    let pool = setup_db().await;
    let repo = SiteSettingsRepo::new(pool);

    assert!(repo.get(SITE).await.unwrap().is_none());
    let settings = repo.site_settings(SITE).await.unwrap();
    assert_eq!(settings, SiteSettings::defaults_for(SITE));
    assert_eq!(scheduler_state(false, &settings), SchedulerState::Inactive);
}

#[tokio::test]
#[serial]
#[ignore = "requires TEST_DATABASE_URL"]
async fn upsert_then_read_back() {
    let pool = setup_db().await;
    let repo = SiteSettingsRepo::new(pool);

    let mut settings = SiteSettings {
        enable_scheduler: true,
        time_zone: Some("Europe/Berlin".into()),
        date_format: Some("dd.mm.yyyy".into()),
        language: Some("de".into()),
        ..SiteSettings::defaults_for(SITE)
    };
    repo.upsert(&settings).await.unwrap();
    assert_eq!(repo.site_settings(SITE).await.unwrap(), settings);
    assert_eq!(scheduler_state(false, &settings), SchedulerState::Active);

    settings.maintenance_mode = true;
    repo.upsert(&settings).await.unwrap();
    let stored = repo.get(SITE).await.unwrap().unwrap();
    assert!(stored.maintenance_mode);
    assert_eq!(scheduler_state(false, &stored), SchedulerState::Inactive);
}
