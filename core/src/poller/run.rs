use std::future::Future;

use tokio::sync::mpsc;
use tokio::time::Instant;

use super::options::{PollOptions, PollOutcome, PollState};
use crate::error::{PollError, ProviderError};
use crate::provider::{TaskSnapshot, VideoProvider};

type ProgressFn<'a> = Box<dyn FnMut(&TaskSnapshot) + Send + 'a>;

/// Drives one task from "handle obtained" to a terminal state.
///
/// ```text
/// Polling --succeeded--> Succeeded
/// Polling --failed-----> Failed
/// Polling --abort/cutoff--> Aborted
/// Polling --N consecutive fetch errors--> PollingExhausted (error)
/// ```
pub struct Poller<'a> {
    provider: &'a dyn VideoProvider,
    options: PollOptions,
    on_progress: Option<ProgressFn<'a>>,
    abort_rx: Option<mpsc::Receiver<String>>,
}

impl<'a> Poller<'a> {
    pub fn new(provider: &'a dyn VideoProvider, options: PollOptions) -> Self {
        Self {
            provider,
            options,
            on_progress: None,
            abort_rx: None,
        }
    }

    /// Called with every successfully fetched snapshot, terminal one included.
    pub fn on_progress<F>(mut self, f: F) -> Self
    where
        F: FnMut(&TaskSnapshot) + Send + 'a,
    {
        self.on_progress = Some(Box::new(f));
        self
    }

    /// Any message on `rx` stops the loop at the next suspend point.
    /// Dropping the sender does not abort.
    pub fn with_abort(mut self, rx: mpsc::Receiver<String>) -> Self {
        self.abort_rx = Some(rx);
        self
    }

    pub async fn run(mut self, task_id: &str) -> Result<PollOutcome, PollError> {
        let provider = self.provider;
        let started = Instant::now();
        let deadline = self.options.max_wait.map(|d| started + d);
        let ceiling = self.options.max_consecutive_errors.max(1);
        let mut queries: u32 = 0;
        let mut consecutive_errors: u32 = 0;

        tracing::info!(
            target: "framecast.poll",
            stage = "poll.start",
            provider = provider.name(),
            task_id = %task_id,
            interval_ms = self.options.poll_interval.as_millis() as u64,
            max_consecutive_errors = ceiling,
            max_wait_ms = ?self.options.max_wait.map(|d| d.as_millis() as u64)
        );

        loop {
            queries += 1;
            let fetched = match suspend(
                provider.get_task_status(task_id),
                deadline,
                &mut self.abort_rx,
            )
            .await
            {
                Ok(fetched) => fetched,
                Err(interrupt) => return Err(interrupted(interrupt, task_id, started, queries)),
            };

            match fetched {
                Ok(snapshot) => {
                    consecutive_errors = 0;
                    let next = PollState::after(&snapshot.status);
                    tracing::debug!(
                        target: "framecast.poll",
                        stage = "poll.tick",
                        provider = provider.name(),
                        task_id = %task_id,
                        query = queries,
                        status = %snapshot.status,
                        state = next.as_str()
                    );
                    if let Some(cb) = self.on_progress.as_mut() {
                        cb(&snapshot);
                    }
                    if next.is_terminal() {
                        tracing::info!(
                            target: "framecast.poll",
                            stage = "poll.done",
                            provider = provider.name(),
                            task_id = %task_id,
                            state = next.as_str(),
                            queries = queries
                        );
                        return Ok(PollOutcome {
                            state: next,
                            snapshot,
                            queries,
                        });
                    }
                }
                Err(ProviderError::Config(message)) => {
                    tracing::error!(
                        target: "framecast.poll",
                        stage = "poll.config_error",
                        provider = provider.name(),
                        task_id = %task_id,
                        error = %message
                    );
                    return Err(PollError::Config(message));
                }
                Err(err) => {
                    consecutive_errors += 1;
                    tracing::warn!(
                        target: "framecast.poll",
                        stage = "poll.error",
                        provider = provider.name(),
                        task_id = %task_id,
                        query = queries,
                        consecutive = consecutive_errors,
                        max = ceiling,
                        error.kind = err.kind(),
                        error.message = %err
                    );
                    if consecutive_errors >= ceiling {
                        return Err(PollError::PollingExhausted {
                            attempts: consecutive_errors,
                            last_error: err,
                        });
                    }
                }
            }

            if let Err(interrupt) = suspend(
                tokio::time::sleep(self.options.poll_interval),
                deadline,
                &mut self.abort_rx,
            )
            .await
            {
                return Err(interrupted(interrupt, task_id, started, queries));
            }
        }
    }
}

/// Poll `task_id` on `provider` until it finishes, reporting every snapshot.
pub async fn wait_for_task<F>(
    provider: &dyn VideoProvider,
    task_id: &str,
    options: PollOptions,
    on_progress: F,
) -> Result<PollOutcome, PollError>
where
    F: FnMut(&TaskSnapshot) + Send,
{
    Poller::new(provider, options)
        .on_progress(on_progress)
        .run(task_id)
        .await
}

#[derive(Debug, PartialEq, Eq)]
enum Interrupt {
    TimedOut,
    Aborted(String),
}

fn interrupted(interrupt: Interrupt, task_id: &str, started: Instant, queries: u32) -> PollError {
    let waited_ms = started.elapsed().as_millis() as u64;
    tracing::warn!(
        target: "framecast.poll",
        stage = "poll.interrupted",
        task_id = %task_id,
        state = PollState::Aborted.as_str(),
        reason = ?interrupt,
        waited_ms = waited_ms,
        queries = queries
    );
    match interrupt {
        Interrupt::TimedOut => PollError::TimedOut {
            task_id: task_id.to_string(),
            waited_ms,
        },
        Interrupt::Aborted(reason) => PollError::Aborted(reason),
    }
}

/// Await `fut` unless the deadline passes or an abort message arrives first.
async fn suspend<F: Future>(
    fut: F,
    deadline: Option<Instant>,
    abort_rx: &mut Option<mpsc::Receiver<String>>,
) -> Result<F::Output, Interrupt> {
    tokio::pin!(fut);
    loop {
        let sender_gone = tokio::select! {
            out = &mut fut => return Ok(out),
            _ = sleep_until_deadline(deadline) => return Err(Interrupt::TimedOut),
            msg = recv_abort(abort_rx.as_mut()) => match msg {
                Some(reason) => return Err(Interrupt::Aborted(reason)),
                None => true,
            },
        };
        if sender_gone {
            *abort_rx = None;
        }
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(d) => tokio::time::sleep_until(d).await,
        None => std::future::pending().await,
    }
}

async fn recv_abort(rx: Option<&mut mpsc::Receiver<String>>) -> Option<String> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
