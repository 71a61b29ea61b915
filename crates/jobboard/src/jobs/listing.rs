use std::collections::HashSet;

use crate::datetime::CreationFormatter;
use crate::jobs::model::{JobStatus, JobSummary, RawJob};
use crate::queue::{QueueNamespace, QueueStore};

/// Failed jobs looked at per listing, across all queues.
pub const MAX_FAILED_JOBS: usize = 10;

pub struct ListingContext<'a> {
    pub site: &'a str,
    pub namespace: &'a QueueNamespace,
    pub formatter: &'a CreationFormatter,
}

/// Running jobs first (one per busy worker), then pending jobs per queue,
/// then, if asked, failed jobs. Only jobs enqueued by `ctx.site` are kept.
pub async fn collect_jobs(
    store: &dyn QueueStore,
    ctx: &ListingContext<'_>,
    show_failed: bool,
) -> anyhow::Result<Vec<JobSummary>> {
    let queues = ctx.namespace.queue_names();
    let mut jobs = Vec::new();

    // a worker listening on several queues is registered under each of them
    let mut seen_workers = HashSet::new();
    for queue in &queues {
        for worker in store.workers(queue).await? {
            if !seen_workers.insert(worker.name.clone()) {
                continue;
            }
            let Some(job_id) = worker.current_job else {
                continue;
            };
            if let Some(job) = store.job(&job_id).await? {
                push_summary(&mut jobs, ctx, &job, &worker.name);
            }
        }
    }

    for queue in &queues {
        for id in store.queued_job_ids(queue).await? {
            if let Some(job) = store.job(&id).await? {
                push_summary(&mut jobs, ctx, &job, queue);
            }
        }
    }

    if show_failed {
        let mut remaining = MAX_FAILED_JOBS;
        for queue in &queues {
            if remaining == 0 {
                break;
            }
            let ids = store.failed_job_ids(queue, remaining).await?;
            remaining = remaining.saturating_sub(ids.len());
            for id in ids {
                if let Some(job) = store.job(&id).await? {
                    push_summary(&mut jobs, ctx, &job, queue);
                }
            }
        }
    }

    Ok(jobs)
}

fn push_summary(jobs: &mut Vec<JobSummary>, ctx: &ListingContext<'_>, job: &RawJob, queue: &str) {
    if let Some(summary) = summarize(ctx, job, queue) {
        jobs.push(summary);
    }
}

/// `None` for other sites' jobs and for statuses the view has no color for.
pub fn summarize(ctx: &ListingContext<'_>, job: &RawJob, queue: &str) -> Option<JobSummary> {
    if job.site() != Some(ctx.site) {
        return None;
    }

    let raw_status = job.status.as_deref().unwrap_or_default();
    let Some(status) = JobStatus::parse(raw_status) else {
        tracing::warn!(
            job_id = %job.id,
            status = %raw_status,
            queue,
            "skipping job with unknown status"
        );
        return None;
    };

    Some(JobSummary {
        job_name: job.display_name(),
        status,
        queue: queue.to_string(),
        creation: job
            .created_at
            .map(|at| ctx.formatter.format(at))
            .unwrap_or_default(),
        color: status.color().to_string(),
        exc_info: job.exc_info.clone(),
    })
}
