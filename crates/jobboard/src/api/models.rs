// crates/jobboard/src/api/models.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct InfoQuery {
    pub show_failed: Option<String>,
}

/// Remote method results are wrapped as `{"message": ...}`.
#[derive(Debug, Serialize)]
pub struct MethodResponse<T> {
    pub message: T,
}

impl<T> MethodResponse<T> {
    pub fn new(message: T) -> Self {
        Self { message }
    }
}
