use async_trait::async_trait;

use crate::jobs::RawJob;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerInfo {
    pub name: String,
    pub current_job: Option<String>,
}

/// Read-only view over the queue system's persisted state.
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Workers registered on `queue`, sorted by name.
    async fn workers(&self, queue: &str) -> anyhow::Result<Vec<WorkerInfo>>;

    /// Pending job ids in enqueue order.
    async fn queued_job_ids(&self, queue: &str) -> anyhow::Result<Vec<String>>;

    /// The first `limit` entries of the queue's failed registry.
    async fn failed_job_ids(&self, queue: &str, limit: usize) -> anyhow::Result<Vec<String>>;

    /// `None` when the job's metadata has expired or never existed.
    async fn job(&self, id: &str) -> anyhow::Result<Option<RawJob>>;
}

/// Hands out a request-scoped store.
#[async_trait]
pub trait QueueBackend: Send + Sync {
    async fn connect(&self) -> anyhow::Result<Box<dyn QueueStore>>;
}
