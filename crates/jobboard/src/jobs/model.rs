use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Job metadata as the queue system persisted it.
/// Every field except the id may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawJob {
    pub id: String,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub exc_info: Option<String>,
    pub kwargs: Value,
}

impl RawJob {
    /// Build from the fields of a `rq:job:<id>` hash.
    pub fn from_fields(id: &str, mut fields: HashMap<String, String>) -> Self {
        let kwargs = match fields.remove("kwargs") {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(job_id = %id, error = %e, "job kwargs are not valid json");
                Value::Null
            }),
            None => Value::Null,
        };

        let created_at = fields.remove("created_at").and_then(|raw| {
            let parsed = parse_timestamp(&raw);
            if parsed.is_none() {
                tracing::warn!(job_id = %id, value = %raw, "unparseable job created_at");
            }
            parsed
        });

        Self {
            id: id.to_string(),
            status: non_empty(fields.remove("status")),
            created_at,
            exc_info: non_empty(fields.remove("exc_info")),
            kwargs,
        }
    }

    /// Tenant recorded when the job was enqueued.
    pub fn site(&self) -> Option<&str> {
        self.kwargs.get("site").and_then(Value::as_str)
    }

    /// Name shown in the listing: the playbook method a job wraps, if any,
    /// else whatever was stored as `job_name`.
    pub fn display_name(&self) -> String {
        let playbook_method = self
            .kwargs
            .get("kwargs")
            .and_then(|inner| inner.get("playbook_method"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty());

        if let Some(method) = playbook_method {
            return method.to_string();
        }

        match self.kwargs.get("job_name") {
            Some(Value::String(s)) => s.clone(),
            None | Some(Value::Null) => "None".to_string(),
            Some(other) => other.to_string(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Timestamps are written as `2024-03-01T09:15:00.123456Z`; older entries
/// may lack the fraction or use a space separator.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = raw.trim_end_matches('Z');
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .map(|dt| dt.and_utc())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Started,
    Finished,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Started => "started",
            JobStatus::Finished => "finished",
            JobStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "queued" => Some(JobStatus::Queued),
            "started" => Some(JobStatus::Started),
            "finished" => Some(JobStatus::Finished),
            "failed" => Some(JobStatus::Failed),
            _ => None,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            JobStatus::Queued => "orange",
            JobStatus::Failed => "red",
            JobStatus::Started => "blue",
            JobStatus::Finished => "green",
        }
    }
}

/// One row of the background jobs view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSummary {
    pub job_name: String,
    pub status: JobStatus,
    pub queue: String,
    pub creation: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exc_info: Option<String>,
}
