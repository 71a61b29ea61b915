use std::path::PathBuf;

// Config is the runtime configuration of the board.
// Every value comes from the environment (a .env file is honored).
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub install_path: PathBuf,
    pub queue_namespace: Option<String>,
    pub listen_addr: String,
    pub default_site: Option<String>,
    pub disable_scheduler: bool,
    pub translations_dir: Option<PathBuf>,
    pub migrate_on_startup: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(&env_var)
    }

    /// Same resolution as `from_env`, over any key source.
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url =
            database_url(lookup).ok_or_else(|| anyhow::anyhow!("DATABASE_URL is missing"))?;

        let listen_addr = first_set(lookup, &["JOBBOARD_LISTEN_ADDR", "LISTEN_ADDR"])
            .unwrap_or_else(|| "127.0.0.1:8000".to_string());

        let default_site = lookup("JOBBOARD_DEFAULT_SITE").and_then(|s| normalize_optional(&s));

        let disable_scheduler = lookup("JOBBOARD_DISABLE_SCHEDULER")
            .map(|v| is_truthy(&v))
            .unwrap_or(false);

        let translations_dir = lookup("JOBBOARD_TRANSLATIONS_DIR")
            .and_then(|s| normalize_optional(&s))
            .map(PathBuf::from);

        let migrate_on_startup = lookup("JOBBOARD_MIGRATE_ON_STARTUP")
            .map(|v| is_truthy(&v))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            redis_url: redis_url(lookup),
            install_path: install_path(lookup)?,
            queue_namespace: queue_namespace(lookup),
            listen_addr,
            default_site,
            disable_scheduler,
            translations_dir,
            migrate_on_startup,
        })
    }
}

// The resolvers below are shared by the server and `jobboardctl`, so both
// always agree on which Redis, which database and which queue names to use.

pub fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

pub fn database_url(lookup: &dyn Fn(&str) -> Option<String>) -> Option<String> {
    first_set(lookup, &["JOBBOARD_DATABASE_URL", "DATABASE_URL"])
}

pub fn redis_url(lookup: &dyn Fn(&str) -> Option<String>) -> String {
    first_set(lookup, &["JOBBOARD_REDIS_URL", "REDIS_URL"])
        .unwrap_or_else(|| "redis://127.0.0.1:6379/".to_string())
}

/// Installation root the queue hash is derived from; the working
/// directory when neither variable is set.
pub fn install_path(lookup: &dyn Fn(&str) -> Option<String>) -> anyhow::Result<PathBuf> {
    match first_set(lookup, &["JOBBOARD_INSTALL_PATH", "BENCH_PATH"]) {
        Some(p) => Ok(PathBuf::from(p.trim())),
        None => Ok(std::env::current_dir()?),
    }
}

/// Explicit queue prefix, overriding the install-path hash.
pub fn queue_namespace(lookup: &dyn Fn(&str) -> Option<String>) -> Option<String> {
    lookup("JOBBOARD_QUEUE_NAMESPACE").and_then(|s| normalize_optional(&s))
}

fn first_set(lookup: &dyn Fn(&str) -> Option<String>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| lookup(k).filter(|s| !s.trim().is_empty()))
}

/// Loose truthiness used for env flags and request flags alike.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn normalize_optional(value: &str) -> Option<String> {
    let v = value.trim();
    if v.is_empty() {
        return None;
    }
    if matches!(v.to_lowercase().as_str(), "off" | "none") {
        return None;
    }
    Some(v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn truthy_values() {
        for v in ["1", "true", "TRUE", " yes ", "On"] {
            assert!(is_truthy(v), "{v} should be truthy");
        }
        for v in ["", "0", "false", "no", "2", "maybe"] {
            assert!(!is_truthy(v), "{v} should be falsy");
        }
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn prefixed_variables_win_over_plain_ones() {
        let lookup = vars(&[
            ("JOBBOARD_DATABASE_URL", "postgres://board"),
            ("DATABASE_URL", "postgres://plain"),
            ("REDIS_URL", "redis://cache:6379/"),
        ]);
        assert_eq!(database_url(&lookup).as_deref(), Some("postgres://board"));
        assert_eq!(redis_url(&lookup), "redis://cache:6379/");

        let only_prefixed = vars(&[("JOBBOARD_DATABASE_URL", "postgres://board")]);
        assert_eq!(database_url(&only_prefixed).as_deref(), Some("postgres://board"));
        assert_eq!(database_url(&vars(&[("DATABASE_URL", "  ")])), None);
    }

    #[test]
    fn bench_path_is_the_install_path_fallback() {
        let lookup = vars(&[("BENCH_PATH", "/srv/bench")]);
        assert_eq!(install_path(&lookup).unwrap(), PathBuf::from("/srv/bench"));

        let both = vars(&[("JOBBOARD_INSTALL_PATH", "/opt/a"), ("BENCH_PATH", "/srv/bench")]);
        assert_eq!(install_path(&both).unwrap(), PathBuf::from("/opt/a"));
    }

    #[test]
    fn none_namespace_means_unset() {
        assert_eq!(queue_namespace(&vars(&[("JOBBOARD_QUEUE_NAMESPACE", "none")])), None);
        assert_eq!(
            queue_namespace(&vars(&[("JOBBOARD_QUEUE_NAMESPACE", " pinned ")])).as_deref(),
            Some("pinned")
        );
    }

    #[test]
    fn config_requires_a_database() {
        assert!(Config::from_lookup(&vars(&[("BENCH_PATH", "/srv/bench")])).is_err());

        let cfg = Config::from_lookup(&vars(&[
            ("JOBBOARD_DATABASE_URL", "postgres://board"),
            ("BENCH_PATH", "/srv/bench"),
            ("JOBBOARD_DISABLE_SCHEDULER", "yes"),
        ]))
        .unwrap();
        assert_eq!(cfg.install_path, PathBuf::from("/srv/bench"));
        assert_eq!(cfg.queue_namespace, None);
        assert!(cfg.disable_scheduler);
        assert_eq!(cfg.listen_addr, "127.0.0.1:8000");
    }

    #[test]
    fn optional_values_are_trimmed() {
        assert_eq!(normalize_optional("  site.local "), Some("site.local".into()));
        assert_eq!(normalize_optional("   "), None);
        assert_eq!(normalize_optional("none"), None);
    }
}
