// Key layout of the queue system's Redis state.

pub const KEY_PREFIX: &str = "rq";
pub const WORKER_KEY_PREFIX: &str = "rq:worker:";

pub fn queue_key(queue: &str) -> String {
    format!("{KEY_PREFIX}:queue:{queue}")
}

pub fn queue_workers_key(queue: &str) -> String {
    format!("{KEY_PREFIX}:workers:{queue}")
}

pub fn worker_key(name: &str) -> String {
    format!("{WORKER_KEY_PREFIX}{name}")
}

pub fn failed_registry_key(queue: &str) -> String {
    format!("{KEY_PREFIX}:failed:{queue}")
}

pub fn job_key(id: &str) -> String {
    format!("{KEY_PREFIX}:job:{id}")
}

/// Worker name from its registry key; keys without the prefix are taken as-is.
pub fn worker_name(key: &str) -> &str {
    key.strip_prefix(WORKER_KEY_PREFIX).unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_keys_round_trip() {
        let key = worker_key("host.1234");
        assert_eq!(key, "rq:worker:host.1234");
        assert_eq!(worker_name(&key), "host.1234");
        assert_eq!(worker_name("stray"), "stray");
    }

    #[test]
    fn queue_scoped_keys() {
        assert_eq!(queue_key("abc-short"), "rq:queue:abc-short");
        assert_eq!(queue_workers_key("abc-short"), "rq:workers:abc-short");
        assert_eq!(failed_registry_key("abc-short"), "rq:failed:abc-short");
        assert_eq!(job_key("42"), "rq:job:42");
    }
}
