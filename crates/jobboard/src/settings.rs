use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;

/// Per-site settings the board needs.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SiteSettings {
    pub site: String,
    pub enable_scheduler: bool,
    pub maintenance_mode: bool,
    pub pause_scheduler: bool,
    pub time_zone: Option<String>,
    pub date_format: Option<String>,
    pub language: Option<String>,
}

impl SiteSettings {
    /// What a site without a settings row gets: scheduler off, UTC, `dd-mm-yyyy`.
    pub fn defaults_for(site: &str) -> Self {
        Self {
            site: site.to_string(),
            enable_scheduler: false,
            maintenance_mode: false,
            pause_scheduler: false,
            time_zone: None,
            date_format: None,
            language: None,
        }
    }
}

#[async_trait]
pub trait SettingsSource: Send + Sync {
    async fn site_settings(&self, site: &str) -> anyhow::Result<SiteSettings>;
}

#[derive(Clone)]
pub struct SiteSettingsRepo {
    pool: PgPool,
}

impl SiteSettingsRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, site: &str) -> anyhow::Result<Option<SiteSettings>> {
        let row = sqlx::query_as::<_, SiteSettings>(
            r#"
            SELECT site, enable_scheduler, maintenance_mode, pause_scheduler,
                   time_zone, date_format, language
            FROM site_settings
            WHERE site = $1
            "#,
        )
        .bind(site)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn upsert(&self, s: &SiteSettings) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO site_settings (
                site, enable_scheduler, maintenance_mode, pause_scheduler,
                time_zone, date_format, language
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (site) DO UPDATE
            SET enable_scheduler = EXCLUDED.enable_scheduler,
                maintenance_mode = EXCLUDED.maintenance_mode,
                pause_scheduler = EXCLUDED.pause_scheduler,
                time_zone = EXCLUDED.time_zone,
                date_format = EXCLUDED.date_format,
                language = EXCLUDED.language,
                updated_at = now()
            "#,
        )
        .bind(&s.site)
        .bind(s.enable_scheduler)
        .bind(s.maintenance_mode)
        .bind(s.pause_scheduler)
        .bind(&s.time_zone)
        .bind(&s.date_format)
        .bind(&s.language)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl SettingsSource for SiteSettingsRepo {
    async fn site_settings(&self, site: &str) -> anyhow::Result<SiteSettings> {
        Ok(self
            .get(site)
            .await?
            .unwrap_or_else(|| SiteSettings::defaults_for(site)))
    }
}

/// Fixed settings table, for tests and single-site setups.
#[derive(Clone, Debug, Default)]
pub struct StaticSettings {
    sites: HashMap<String, SiteSettings>,
}

impl StaticSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, settings: SiteSettings) {
        self.sites.insert(settings.site.clone(), settings);
    }
}

#[async_trait]
impl SettingsSource for StaticSettings {
    async fn site_settings(&self, site: &str) -> anyhow::Result<SiteSettings> {
        Ok(self
            .sites
            .get(site)
            .cloned()
            .unwrap_or_else(|| SiteSettings::defaults_for(site)))
    }
}
