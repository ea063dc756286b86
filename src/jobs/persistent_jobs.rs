use apalis::{prelude::*, redis::RedisStorage};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::mail::{CancellationContext, CancellationSender, Mailer};

/// Durable copy of a cancellation notice. The synchronous send in the
/// cancel handler can be lost if SMTP hiccups; this job re-delivers the
/// same message from the queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationMail {
    pub to: String,
    pub context: CancellationContext,
}

impl Job for CancellationMail {
    const NAME: &'static str = "cancellation_mail";
}

/// Producer seam over the durable queue, so enqueueing can be observed in
/// tests without Redis.
#[async_trait::async_trait]
pub trait CancellationQueue {
    async fn enqueue(&mut self, job: CancellationMail) -> anyhow::Result<()>;
}

#[async_trait::async_trait]
impl CancellationQueue for RedisStorage<CancellationMail> {
    async fn enqueue(&mut self, job: CancellationMail) -> anyhow::Result<()> {
        self.push(job).await?;
        Ok(())
    }
}

async fn process_cancellation_job(
    job: CancellationMail,
    _ctx: JobContext,
) -> anyhow::Result<(), JobError> {
    log::info!("sending cancellation mail to {:?}", &job.to);
    let config = config::Config::init();

    let mailer = match Mailer::new(&config) {
        Ok(mailer) => mailer,
        Err(e) => {
            log::error!("Error building mailer for queued job: {:?}", e);
            return Ok(());
        }
    };

    if let Err(e) = mailer.send_cancellation(&job.to, &job.context).await {
        log::error!("Error sending queued cancellation mail: {:?}", e);
    }
    Ok(())
}

pub(crate) async fn start_processing_email_queue(
    redis_url: &str,
) -> anyhow::Result<RedisStorage<CancellationMail>> {
    let storage = RedisStorage::connect(redis_url.to_string()).await?;
    log::info!("Connected to redis");
    log::info!("Starting cancellation mail job handler");

    // create job monitor(s) and attach the cancellation mail handler
    let monitor = Monitor::new().register_with_count(2, {
        let storage = storage.clone();
        move |n| {
            WorkerBuilder::new(format!("job-handler-{n}"))
                .with_storage(storage.clone())
                .build_fn(process_cancellation_job)
        }
    });

    // spawn job monitor into background
    // the monitor manages itself otherwise so we don't need to return a join handle
    #[allow(clippy::let_underscore_future)]
    let _ = tokio::spawn(monitor.run());

    Ok(storage)
}
