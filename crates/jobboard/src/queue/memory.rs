use async_trait::async_trait;
use std::collections::HashMap;

use crate::jobs::RawJob;
use crate::queue::store::{QueueBackend, QueueStore, WorkerInfo};

/// Queue state held in memory. Fill it up front, then read it through
/// the same traits as the Redis store.
#[derive(Clone, Debug, Default)]
pub struct MemoryQueueStore {
    jobs: HashMap<String, RawJob>,
    queued: HashMap<String, Vec<String>>,
    failed: HashMap<String, Vec<String>>,
    workers: HashMap<String, Vec<WorkerInfo>>,
}

impl MemoryQueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store job metadata without placing it on any queue.
    pub fn insert_job(&mut self, job: RawJob) {
        self.jobs.insert(job.id.clone(), job);
    }

    pub fn enqueue(&mut self, queue: &str, job: RawJob) {
        self.queued
            .entry(queue.to_string())
            .or_default()
            .push(job.id.clone());
        self.insert_job(job);
    }

    pub fn add_failed(&mut self, queue: &str, job: RawJob) {
        self.failed
            .entry(queue.to_string())
            .or_default()
            .push(job.id.clone());
        self.insert_job(job);
    }

    /// Register a worker on `queue`, optionally busy with `current`.
    pub fn add_worker(&mut self, queue: &str, name: &str, current: Option<RawJob>) {
        let current_job = current.map(|job| {
            let id = job.id.clone();
            self.insert_job(job);
            id
        });
        self.workers
            .entry(queue.to_string())
            .or_default()
            .push(WorkerInfo {
                name: name.to_string(),
                current_job,
            });
    }

    /// Drop a job's metadata while leaving its id wherever it was listed.
    pub fn expire_job(&mut self, id: &str) {
        self.jobs.remove(id);
    }
}

#[async_trait]
impl QueueStore for MemoryQueueStore {
    async fn workers(&self, queue: &str) -> anyhow::Result<Vec<WorkerInfo>> {
        let mut workers = self.workers.get(queue).cloned().unwrap_or_default();
        workers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(workers)
    }

    async fn queued_job_ids(&self, queue: &str) -> anyhow::Result<Vec<String>> {
        Ok(self.queued.get(queue).cloned().unwrap_or_default())
    }

    async fn failed_job_ids(&self, queue: &str, limit: usize) -> anyhow::Result<Vec<String>> {
        Ok(self
            .failed
            .get(queue)
            .map(|ids| ids.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn job(&self, id: &str) -> anyhow::Result<Option<RawJob>> {
        Ok(self.jobs.get(id).cloned())
    }
}

#[async_trait]
impl QueueBackend for MemoryQueueStore {
    async fn connect(&self) -> anyhow::Result<Box<dyn QueueStore>> {
        Ok(Box::new(self.clone()))
    }
}
