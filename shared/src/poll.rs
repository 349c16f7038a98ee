//! Fixed-interval polling of video jobs.

use std::cell::RefCell;
use std::rc::Rc;

use crate::api::DetectionApi;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::models::{JobId, JobStatus, PredictionResponse};

/// Suspends the current task. The browser build waits on a `gloo-timers` future.
#[allow(async_fn_in_trait)]
pub trait Timer {
    async fn sleep(&self, millis: u32);
}

#[derive(Debug, Default)]
struct SlotState {
    generation: u64,
    active: bool,
}

/// Holds the single poll allowed for an upload slot.
///
/// Starting a poll supersedes whatever the slot was running, so at most one
/// handle is ever current.
#[derive(Debug, Clone, Default)]
pub struct PollSlot {
    inner: Rc<RefCell<SlotState>>,
}

impl PollSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, job_id: &JobId) -> PollHandle {
        let mut state = self.inner.borrow_mut();
        if state.active {
            log::debug!(
                "Poll generation {} superseded by job {}",
                state.generation,
                job_id
            );
        }
        state.generation += 1;
        state.active = true;
        PollHandle {
            slot: self.clone(),
            generation: state.generation,
        }
    }

    /// Stops the current poll, if any. Returns whether one was running.
    pub fn invalidate(&self) -> bool {
        let mut state = self.inner.borrow_mut();
        std::mem::replace(&mut state.active, false)
    }

    pub fn is_polling(&self) -> bool {
        self.inner.borrow().active
    }

    pub fn generation(&self) -> u64 {
        self.inner.borrow().generation
    }
}

#[derive(Debug, Clone)]
pub struct PollHandle {
    slot: PollSlot,
    generation: u64,
}

impl PollHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        let state = self.slot.inner.borrow();
        state.active && state.generation == self.generation
    }

    /// Idempotent: only the first call on a current handle has an effect.
    pub fn cancel(&self) -> bool {
        if !self.is_current() {
            return false;
        }
        self.slot.inner.borrow_mut().active = false;
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval_ms: u32,
    pub max_attempts: Option<u32>,
}

impl From<&ClientConfig> for PollSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            interval_ms: config.poll_interval_ms,
            max_attempts: config.max_poll_attempts,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Complete(PredictionResponse),
    /// The job reached `error`, or completed without a usable result.
    Failed(ClientError),
    /// A newer poll took over the slot; the UI must not be touched.
    Superseded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollReport {
    pub job_id: JobId,
    pub generation: u64,
    pub attempts: u32,
    pub outcome: PollOutcome,
}

/// Polls `job_id` every `settings.interval_ms` until it completes, fails,
/// the transport breaks, the attempt bound is hit, or `handle` stops being
/// current. The handle is cancelled on every exit path it still owns.
pub async fn poll_until_terminal<A, T>(
    api: &A,
    timer: &T,
    job_id: &JobId,
    settings: PollSettings,
    handle: &PollHandle,
) -> PollReport
where
    A: DetectionApi,
    T: Timer,
{
    let mut attempts = 0u32;
    let outcome = loop {
        timer.sleep(settings.interval_ms).await;
        if !handle.is_current() {
            break PollOutcome::Superseded;
        }

        attempts += 1;
        let polled = api.poll_job(job_id).await;
        if !handle.is_current() {
            break PollOutcome::Superseded;
        }

        match polled {
            Err(err) => {
                log::warn!("Polling job {} failed: {}", job_id, err);
                handle.cancel();
                break PollOutcome::Failed(err);
            }
            Ok(Some(job)) if job.status == JobStatus::Complete => {
                handle.cancel();
                break match job.prediction() {
                    Some(prediction) => {
                        log::info!("Job {} complete after {} polls", job_id, attempts);
                        PollOutcome::Complete(prediction)
                    }
                    None => PollOutcome::Failed(ClientError::Job(
                        "Job completed without a result".to_string(),
                    )),
                };
            }
            Ok(Some(job)) if job.status == JobStatus::Error => {
                handle.cancel();
                let message = job.error_message();
                log::warn!("Job {} failed: {}", job_id, message);
                break PollOutcome::Failed(ClientError::Job(message));
            }
            Ok(_) => {
                log::debug!("Job {} not ready (poll {})", job_id, attempts);
            }
        }

        if let Some(max) = settings.max_attempts {
            if attempts >= max {
                handle.cancel();
                log::warn!("Job {} still pending after {} polls", job_id, attempts);
                break PollOutcome::Failed(ClientError::PollTimeout { attempts });
            }
        }
    };

    PollReport {
        job_id: job_id.clone(),
        generation: handle.generation(),
        attempts,
        outcome,
    }
}
