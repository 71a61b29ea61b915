pub mod keys;
pub mod memory;
pub mod namespace;
pub mod redis_store;
pub mod store;

pub use memory::MemoryQueueStore;
pub use namespace::{instance_hash, QueueKind, QueueNamespace, QUEUE_KINDS};
pub use redis_store::{RedisQueueBackend, RedisQueueStore};
pub use store::{QueueBackend, QueueStore, WorkerInfo};
