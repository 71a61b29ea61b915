use anyhow::Context;
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::FromRedisValue;
use std::collections::HashMap;

use crate::jobs::RawJob;
use crate::queue::keys;
use crate::queue::store::{QueueBackend, QueueStore, WorkerInfo};

#[derive(Clone, Debug)]
pub struct RedisQueueBackend {
    client: redis::Client,
}

impl RedisQueueBackend {
    pub fn open(url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(url)
            .with_context(|| format!("invalid redis url for queue store: {url}"))?;
        Ok(Self { client })
    }

    pub async fn connect_store(&self) -> anyhow::Result<RedisQueueStore> {
        let conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .context("failed to open redis connection for queue store")?;
        tracing::debug!("queue store connected");
        Ok(RedisQueueStore::new(conn))
    }
}

#[async_trait]
impl QueueBackend for RedisQueueBackend {
    async fn connect(&self) -> anyhow::Result<Box<dyn QueueStore>> {
        Ok(Box::new(self.connect_store().await?))
    }
}

/// Queue store bound to one connection; lives for a single request.
#[derive(Clone)]
pub struct RedisQueueStore {
    conn: MultiplexedConnection,
}

impl RedisQueueStore {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }

    async fn run<T>(&self, operation: &'static str, cmd: redis::Cmd) -> anyhow::Result<T>
    where
        T: FromRedisValue + Send,
    {
        let mut conn = self.conn.clone();
        let value: T = cmd
            .query_async(&mut conn)
            .await
            .with_context(|| format!("redis {operation} failed"))?;
        Ok(value)
    }
}

#[async_trait]
impl QueueStore for RedisQueueStore {
    async fn workers(&self, queue: &str) -> anyhow::Result<Vec<WorkerInfo>> {
        let mut cmd = redis::cmd("SMEMBERS");
        cmd.arg(keys::queue_workers_key(queue));
        let mut worker_keys: Vec<String> = self.run("SMEMBERS", cmd).await?;
        worker_keys.sort();

        let mut out = Vec::with_capacity(worker_keys.len());
        for key in worker_keys {
            let mut cmd = redis::cmd("HGET");
            cmd.arg(&key).arg("current_job");
            let current_job: Option<String> = self.run("HGET", cmd).await?;
            out.push(WorkerInfo {
                name: keys::worker_name(&key).to_string(),
                current_job: current_job.filter(|id| !id.is_empty()),
            });
        }
        Ok(out)
    }

    async fn queued_job_ids(&self, queue: &str) -> anyhow::Result<Vec<String>> {
        let mut cmd = redis::cmd("LRANGE");
        cmd.arg(keys::queue_key(queue)).arg(0).arg(-1);
        self.run("LRANGE", cmd).await
    }

    async fn failed_job_ids(&self, queue: &str, limit: usize) -> anyhow::Result<Vec<String>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let stop = i64::try_from(limit).unwrap_or(i64::MAX) - 1;
        let mut cmd = redis::cmd("ZRANGE");
        cmd.arg(keys::failed_registry_key(queue)).arg(0).arg(stop);
        self.run("ZRANGE", cmd).await
    }

    async fn job(&self, id: &str) -> anyhow::Result<Option<RawJob>> {
        let mut cmd = redis::cmd("HGETALL");
        cmd.arg(keys::job_key(id));
        let fields: HashMap<String, String> = self.run("HGETALL", cmd).await?;
        if fields.is_empty() {
            return Ok(None);
        }
        Ok(Some(RawJob::from_fields(id, fields)))
    }
}
