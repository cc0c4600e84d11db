// src/application/worker.rs
use crate::application::{
    commands::articles::ArticleCommandService,
    dto::jobs::PublishOutcome,
    error::ApplicationResult,
    ports::queue::{ClaimedJob, PublishQueue, RetryDecision},
};
use crate::domain::article::ArticleId;
use std::{sync::Arc, time::Duration};
use tokio::{sync::watch, task::JoinHandle};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Pulls publish jobs from the queue and drives them through the shared
/// publish transition. Several loops may run against the same queue; the
/// broker's claim semantics hand each job to exactly one of them, and the
/// conditional write keeps racing claims on the same article safe.
pub struct PublishWorker {
    queue: Arc<dyn PublishQueue>,
    articles: Arc<ArticleCommandService>,
    poll_interval: Duration,
}

impl PublishWorker {
    pub fn new(queue: Arc<dyn PublishQueue>, articles: Arc<ArticleCommandService>) -> Self {
        Self {
            queue,
            articles,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Start `concurrency` poll loops. The returned handle stops them.
    pub fn spawn(self, concurrency: usize) -> WorkerHandle {
        let worker = Arc::new(self);
        let (stop_tx, stop_rx) = watch::channel(false);
        let tasks = (0..concurrency.max(1))
            .map(|index| {
                let worker = Arc::clone(&worker);
                let stop = stop_rx.clone();
                tokio::spawn(async move { worker.run(index, stop).await })
            })
            .collect();
        tracing::info!(concurrency, "publish worker started");
        WorkerHandle { stop_tx, tasks }
    }

    async fn run(&self, index: usize, mut stop: watch::Receiver<bool>) {
        loop {
            if *stop.borrow() {
                break;
            }
            match self.tick().await {
                // Drained a job; immediately look for the next one.
                Ok(true) => {}
                Ok(false) => {
                    tokio::select! {
                        _ = tokio::time::sleep(self.poll_interval) => {}
                        _ = stop.changed() => {}
                    }
                }
                Err(err) => {
                    tracing::error!(worker = index, error = %err, "worker poll failed");
                    tokio::select! {
                        _ = tokio::time::sleep(self.poll_interval) => {}
                        _ = stop.changed() => {}
                    }
                }
            }
        }
        tracing::debug!(worker = index, "publish worker loop stopped");
    }

    /// Claim and process at most one job. Returns whether a job was
    /// processed. Exposed so tests can drive the worker deterministically.
    pub async fn tick(&self) -> ApplicationResult<bool> {
        let Some(job) = self.queue.claim_next().await? else {
            return Ok(false);
        };
        self.process(job).await?;
        Ok(true)
    }

    async fn process(&self, job: ClaimedJob) -> ApplicationResult<()> {
        tracing::info!(
            job_id = %job.id,
            article_id = job.payload.article_id,
            user_id = job.payload.user_id,
            attempt = job.attempt,
            "processing publish job"
        );

        let result = match ArticleId::new(job.payload.article_id) {
            Ok(article_id) => self.articles.publish_now(article_id, job.payload.user_id).await,
            Err(err) => Err(err.into()),
        };

        match result {
            Ok(article) => {
                tracing::info!(job_id = %job.id, "publish job completed");
                self.queue
                    .complete(
                        &job.id,
                        PublishOutcome {
                            success: true,
                            published_at: article.published_at,
                        },
                    )
                    .await
            }
            Err(err) if err.is_retryable() => {
                let reason = err.to_string();
                match self.queue.retry_or_fail(&job, &reason).await? {
                    RetryDecision::Retried { delay } => {
                        tracing::warn!(
                            job_id = %job.id,
                            attempt = job.attempt,
                            backoff_ms = delay.as_millis() as u64,
                            %reason,
                            "publish job failed, retrying"
                        );
                    }
                    RetryDecision::Exhausted => {
                        tracing::error!(job_id = %job.id, %reason, "publish job failed permanently");
                    }
                }
                Ok(())
            }
            Err(err) => {
                // Precondition failures are terminal: a duplicate delivery
                // of an already-published article must not burn retries.
                let reason = err.to_string();
                tracing::error!(job_id = %job.id, %reason, "publish job failed");
                self.queue.fail(&job.id, &reason).await
            }
        }
    }
}

pub struct WorkerHandle {
    stop_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Signal all loops to stop and wait for in-flight jobs to finish.
    pub async fn shutdown(self) {
        let _ = self.stop_tx.send(true);
        for task in self.tasks {
            let _ = task.await;
        }
        tracing::info!("publish worker stopped");
    }
}
