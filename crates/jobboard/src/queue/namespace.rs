use sha2::{Digest, Sha256};
use std::path::Path;

use crate::config::{self, Config};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueKind {
    Background,
    Long,
    Default,
    Short,
}

/// Every queue kind, in listing order.
pub const QUEUE_KINDS: [QueueKind; 4] = [
    QueueKind::Background,
    QueueKind::Long,
    QueueKind::Default,
    QueueKind::Short,
];

impl QueueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueKind::Background => "background",
            QueueKind::Long => "long",
            QueueKind::Default => "default",
            QueueKind::Short => "short",
        }
    }
}

/// Hex digest identifying one installation; all of its queues share it.
pub fn instance_hash(install_path: &Path) -> String {
    let digest = Sha256::digest(install_path.to_string_lossy().as_bytes());
    hex::encode(digest)
}

/// Queue names of one installation: `<prefix>-<kind>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueNamespace {
    prefix: String,
}

impl QueueNamespace {
    pub fn for_install_path(install_path: &Path) -> Self {
        Self {
            prefix: instance_hash(install_path),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        match &cfg.queue_namespace {
            Some(prefix) => Self::with_prefix(prefix.clone()),
            None => Self::for_install_path(&cfg.install_path),
        }
    }

    /// Resolve from the environment the way `Config::from_env` does,
    /// without requiring the rest of the configuration.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(&config::env_var)
    }

    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        Ok(match config::queue_namespace(lookup) {
            Some(prefix) => Self::with_prefix(prefix),
            None => Self::for_install_path(&config::install_path(lookup)?),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn queue_name(&self, kind: QueueKind) -> String {
        format!("{}-{}", self.prefix, kind.as_str())
    }

    pub fn queue_names(&self) -> Vec<String> {
        QUEUE_KINDS.iter().map(|k| self.queue_name(*k)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_per_path() {
        let a = instance_hash(Path::new("/home/frappe/bench"));
        let b = instance_hash(Path::new("/home/frappe/bench"));
        let c = instance_hash(Path::new("/home/frappe/bench-2"));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn namespace_matches_server_config() {
        let lookup = |key: &str| match key {
            "BENCH_PATH" => Some("/srv/bench".to_string()),
            "DATABASE_URL" => Some("postgres://board".to_string()),
            _ => None,
        };
        let cfg = Config::from_lookup(&lookup).unwrap();
        let ns = QueueNamespace::from_lookup(&lookup).unwrap();

        assert_eq!(ns, QueueNamespace::from_config(&cfg));
        assert_eq!(ns.prefix(), instance_hash(Path::new("/srv/bench")));

        let literal_none = |key: &str| match key {
            "JOBBOARD_QUEUE_NAMESPACE" => Some("none".to_string()),
            "BENCH_PATH" => Some("/srv/bench".to_string()),
            _ => None,
        };
        assert_eq!(QueueNamespace::from_lookup(&literal_none).unwrap(), ns);
    }

    #[test]
    fn queue_names_follow_kind_order() {
        let ns = QueueNamespace::with_prefix("abc");
        assert_eq!(
            ns.queue_names(),
            vec!["abc-background", "abc-long", "abc-default", "abc-short"]
        );
    }
}
