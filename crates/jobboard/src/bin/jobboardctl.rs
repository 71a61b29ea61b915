use chrono::Utc;
use jobboard::datetime::CreationFormatter;
use jobboard::jobs::{collect_jobs, ListingContext};
use jobboard::queue::keys;
use jobboard::queue::{QueueKind, QueueNamespace, RedisQueueBackend, QUEUE_KINDS};
use jobboard::settings::{SettingsSource, SiteSettings, SiteSettingsRepo};
use jobboard::config::{self, is_truthy};
use jobboard::db;
use redis::aio::MultiplexedConnection;
use serde_json::json;
use std::env;
use uuid::Uuid;

const DEMO_WORKER: &str = "demo-worker";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!(
            "jobboardctl <command>\n\
             Commands:\n\
             - namespace\n\
             - reset\n\
             - seed <site> [n]\n\
             - info <site> [--failed]\n\
             - scheduler <site> <on|off>\n\
             \n\
             Reads the same environment as the server: JOBBOARD_REDIS_URL / REDIS_URL,\n\
             JOBBOARD_DATABASE_URL / DATABASE_URL, JOBBOARD_QUEUE_NAMESPACE,\n\
             JOBBOARD_INSTALL_PATH / BENCH_PATH.\n"
        );
        std::process::exit(2);
    }

    let namespace = QueueNamespace::from_env()?;
    let redis_url = config::redis_url(&config::env_var);

    match args[1].as_str() {
        "namespace" => {
            println!("prefix: {}", namespace.prefix());
            for q in namespace.queue_names() {
                println!("  {q}");
            }
        }
        "reset" => {
            let mut conn = connect(&redis_url).await?;
            reset(&mut conn, &namespace).await?;
        }
        "seed" => {
            let site = args.get(2).ok_or_else(|| usage("seed <site> [n]"))?;
            let n: usize = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(10);
            let mut conn = connect(&redis_url).await?;
            seed(&mut conn, &namespace, site, n).await?;
        }
        "info" => {
            let site = args.get(2).ok_or_else(|| usage("info <site> [--failed]"))?;
            let show_failed = args.iter().skip(3).any(|a| a == "--failed");
            print_info(&redis_url, &namespace, site, show_failed).await?;
        }
        "scheduler" => {
            let site = args.get(2).ok_or_else(|| usage("scheduler <site> <on|off>"))?;
            let flag = args.get(3).ok_or_else(|| usage("scheduler <site> <on|off>"))?;
            set_scheduler(site, is_truthy(flag)).await?;
        }
        other => {
            eprintln!("Unknown command: {other}");
            std::process::exit(2);
        }
    }

    Ok(())
}

fn usage(cmd: &str) -> anyhow::Error {
    anyhow::anyhow!("usage: jobboardctl {cmd}")
}

async fn connect(url: &str) -> anyhow::Result<MultiplexedConnection> {
    let client = redis::Client::open(url)?;
    Ok(client.get_multiplexed_async_connection().await?)
}

async fn reset(conn: &mut MultiplexedConnection, namespace: &QueueNamespace) -> anyhow::Result<()> {
    let mut doomed: Vec<String> = Vec::new();

    for queue in namespace.queue_names() {
        let queued: Vec<String> = redis::cmd("LRANGE")
            .arg(keys::queue_key(&queue))
            .arg(0)
            .arg(-1)
            .query_async(conn)
            .await?;
        let failed: Vec<String> = redis::cmd("ZRANGE")
            .arg(keys::failed_registry_key(&queue))
            .arg(0)
            .arg(-1)
            .query_async(conn)
            .await?;
        let workers: Vec<String> = redis::cmd("SMEMBERS")
            .arg(keys::queue_workers_key(&queue))
            .query_async(conn)
            .await?;

        for worker_key in &workers {
            let current: Option<String> = redis::cmd("HGET")
                .arg(worker_key)
                .arg("current_job")
                .query_async(conn)
                .await?;
            doomed.extend(current.map(|id| keys::job_key(&id)));
        }

        doomed.extend(queued.iter().chain(failed.iter()).map(|id| keys::job_key(id)));
        doomed.extend(workers);
        doomed.push(keys::queue_key(&queue));
        doomed.push(keys::failed_registry_key(&queue));
        doomed.push(keys::queue_workers_key(&queue));
    }

    doomed.sort();
    doomed.dedup();
    let deleted: i64 = redis::cmd("DEL").arg(&doomed).query_async(conn).await?;

    println!("reset OK (deleted {deleted} keys)");
    Ok(())
}

async fn seed(
    conn: &mut MultiplexedConnection,
    namespace: &QueueNamespace,
    site: &str,
    n: usize,
) -> anyhow::Result<()> {
    let created_at = Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string();
    let mut pipe = redis::pipe();

    for i in 0..n {
        let queue = namespace.queue_name(QUEUE_KINDS[i % QUEUE_KINDS.len()]);
        let id = Uuid::new_v4().to_string();
        let kwargs = if i % 4 == 3 {
            json!({
                "site": site,
                "job_name": "run_playbook",
                "kwargs": { "playbook_method": format!("demo_playbook_{i}") }
            })
        } else {
            json!({ "site": site, "job_name": format!("demo_job_{i}"), "kwargs": {} })
        };

        let failed = i % 3 == 2;
        let status = if failed { "failed" } else { "queued" };

        pipe.cmd("HSET")
            .arg(keys::job_key(&id))
            .arg("status")
            .arg(status)
            .arg("origin")
            .arg(&queue)
            .arg("created_at")
            .arg(&created_at)
            .arg("kwargs")
            .arg(kwargs.to_string())
            .ignore();

        if failed {
            pipe.cmd("HSET")
                .arg(keys::job_key(&id))
                .arg("exc_info")
                .arg(format!("Traceback (most recent call last):\n  demo_job_{i}\nRuntimeError: simulated failure"))
                .ignore();
            pipe.cmd("ZADD")
                .arg(keys::failed_registry_key(&queue))
                .arg(Utc::now().timestamp())
                .arg(&id)
                .ignore();
        } else {
            pipe.cmd("RPUSH").arg(keys::queue_key(&queue)).arg(&id).ignore();
        }

        println!("+ {status} job id={id} queue={queue}");
    }

    // one job currently held by a worker
    let queue = namespace.queue_name(QueueKind::Default);
    let id = Uuid::new_v4().to_string();
    let worker_key = keys::worker_key(DEMO_WORKER);
    pipe.cmd("HSET")
        .arg(keys::job_key(&id))
        .arg("status")
        .arg("started")
        .arg("origin")
        .arg(&queue)
        .arg("created_at")
        .arg(&created_at)
        .arg("kwargs")
        .arg(json!({ "site": site, "job_name": "demo_running_job", "kwargs": {} }).to_string())
        .ignore();
    pipe.cmd("HSET")
        .arg(&worker_key)
        .arg("current_job")
        .arg(&id)
        .arg("state")
        .arg("busy")
        .ignore();
    pipe.cmd("SADD")
        .arg(keys::queue_workers_key(&queue))
        .arg(&worker_key)
        .ignore();

    let _: () = pipe.query_async(conn).await?;
    println!("+ started job id={id} worker={DEMO_WORKER}");
    Ok(())
}

async fn print_info(
    redis_url: &str,
    namespace: &QueueNamespace,
    site: &str,
    show_failed: bool,
) -> anyhow::Result<()> {
    let formatter = match config::database_url(&config::env_var) {
        Some(url) => {
            let repo = SiteSettingsRepo::new(db::make_pool(&url).await?);
            let s = repo.site_settings(site).await?;
            CreationFormatter::from_settings(s.time_zone.as_deref(), s.date_format.as_deref())
        }
        None => CreationFormatter::default(),
    };

    let store = RedisQueueBackend::open(redis_url)?.connect_store().await?;
    let ctx = ListingContext {
        site,
        namespace,
        formatter: &formatter,
    };
    let jobs = collect_jobs(&store, &ctx, show_failed).await?;

    if jobs.is_empty() {
        println!("no jobs for {site}");
    }
    for j in jobs {
        println!(
            "{:<9} {:<40} {:<30} {} ({})",
            j.status.as_str(),
            j.job_name,
            j.queue,
            j.creation,
            j.color
        );
        if let Some(trace) = j.exc_info {
            for line in trace.lines() {
                println!("          | {line}");
            }
        }
    }
    Ok(())
}

async fn set_scheduler(site: &str, enabled: bool) -> anyhow::Result<()> {
    let url = config::database_url(&config::env_var)
        .ok_or_else(|| anyhow::anyhow!("JOBBOARD_DATABASE_URL or DATABASE_URL must be set"))?;
    let pool = db::make_pool(&url).await?;
    db::run_migrations(&pool).await?;

    let repo = SiteSettingsRepo::new(pool);
    let current = repo
        .get(site)
        .await?
        .unwrap_or_else(|| SiteSettings::defaults_for(site));
    repo.upsert(&SiteSettings {
        enable_scheduler: enabled,
        ..current
    })
    .await?;

    println!(
        "scheduler for {site}: {}",
        if enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}
