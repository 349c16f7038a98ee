//! Upload workflow controller.
//!
//! The controller is a plain state machine. The UI calls [`UploadController::begin`]
//! on form submission, runs [`submit`] (and, for videos, the poll loop) on its
//! event loop, and feeds each report back in. Everything the user sees is read
//! from [`UploadController::view`].

use uuid::Uuid;

use crate::api::DetectionApi;
use crate::error::{ClientError, Result};
use crate::models::{JobId, MediaType, PredictionResponse};
use crate::poll::{PollHandle, PollOutcome, PollReport, PollSlot};
use crate::render::{ResultView, render_prediction};

pub const SELECT_FILE_NOTICE: &str = "Please select a file.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadState {
    #[default]
    Idle,
    Validating,
    Submitting(MediaType),
    /// Video accepted, result pending on the poll loop.
    AwaitingJob(JobId),
    Rendering,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Submitting,
    Pending,
    Complete,
    Failed,
}

pub struct UploadTask<F> {
    pub id: Uuid,
    pub media_type: MediaType,
    pub file: F,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadView {
    pub loader_visible: bool,
    pub notice: Option<Notice>,
    pub result: Option<ResultView>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Image(Result<PredictionResponse>),
    Video(Result<JobId>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReport {
    pub task_id: Uuid,
    pub submission: Submission,
}

/// Sends the task's file to the endpoint matching its media type.
pub async fn submit<A: DetectionApi>(api: &A, task: &UploadTask<A::File>) -> SubmissionReport {
    log::info!("Submitting {} (task {})", task.media_type.noun(), task.id);
    let submission = match task.media_type {
        MediaType::Image => Submission::Image(api.submit_image(&task.file).await),
        MediaType::Video => Submission::Video(api.submit_video(&task.file).await),
    };
    SubmissionReport {
        task_id: task.id,
        submission,
    }
}

/// A poll the caller must run with [`crate::poll::poll_until_terminal`].
#[derive(Debug, Clone)]
pub struct PollRequest {
    pub job_id: JobId,
    pub handle: PollHandle,
}

#[derive(Debug, Clone, Copy)]
struct ActiveTask {
    id: Uuid,
    media_type: MediaType,
    state: TaskState,
}

#[derive(Debug, Default)]
pub struct UploadController {
    state: UploadState,
    view: UploadView,
    slot: PollSlot,
    task: Option<ActiveTask>,
    last_error: Option<ClientError>,
}

impl UploadController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> UploadState {
        self.state.clone()
    }

    pub fn view(&self) -> &UploadView {
        &self.view
    }

    pub fn task_state(&self) -> Option<TaskState> {
        self.task.map(|t| t.state)
    }

    pub fn last_error(&self) -> Option<&ClientError> {
        self.last_error.as_ref()
    }

    pub fn poll_slot(&self) -> &PollSlot {
        &self.slot
    }

    /// Submit controls are disabled only while a submission request is in flight.
    pub fn controls_enabled(&self) -> bool {
        !matches!(self.state, UploadState::Submitting(_))
    }

    /// Validates the selection and switches the view to "analyzing".
    ///
    /// Returns the task to submit, or `None` when nothing should be sent.
    pub fn begin<F>(&mut self, media_type: MediaType, file: Option<F>) -> Option<UploadTask<F>> {
        if !self.controls_enabled() {
            log::warn!("Ignoring {} submission while another is in flight", media_type.noun());
            return None;
        }

        let Some(file) = file else {
            self.last_error = Some(ClientError::Validation(SELECT_FILE_NOTICE.to_string()));
            // A pending job keeps its poll and loader.
            if let UploadState::AwaitingJob(job_id) = &self.state {
                log::info!("Empty {} selection while job {} is pending", media_type.noun(), job_id);
                self.view.notice = Some(Notice::new(NoticeKind::Warning, SELECT_FILE_NOTICE));
                return None;
            }
            self.transition(UploadState::Validating);
            self.view = UploadView {
                loader_visible: false,
                notice: Some(Notice::new(NoticeKind::Warning, SELECT_FILE_NOTICE)),
                result: None,
            };
            self.transition(UploadState::Failed);
            self.transition(UploadState::Idle);
            return None;
        };
        self.transition(UploadState::Validating);

        if self.slot.invalidate() {
            log::info!("New submission replaces the pending video job");
        }

        let task = UploadTask {
            id: Uuid::new_v4(),
            media_type,
            file,
        };
        self.task = Some(ActiveTask {
            id: task.id,
            media_type,
            state: TaskState::Submitting,
        });
        self.last_error = None;
        self.view = UploadView {
            loader_visible: true,
            notice: Some(Notice::new(
                NoticeKind::Info,
                format!(
                    "Analyzing {}... This may take a few moments.",
                    media_type.noun()
                ),
            )),
            result: None,
        };
        self.transition(UploadState::Submitting(media_type));
        Some(task)
    }

    /// Applies the response of [`submit`]. For an accepted video, returns the
    /// poll to start.
    pub fn finish_submission(&mut self, report: SubmissionReport) -> Option<PollRequest> {
        let current = match self.task {
            Some(task) if task.id == report.task_id && task.state == TaskState::Submitting => task,
            _ => {
                log::warn!("Dropping response for stale task {}", report.task_id);
                return None;
            }
        };

        match report.submission {
            Submission::Image(Ok(prediction)) => {
                self.render(&prediction);
                None
            }
            Submission::Video(Ok(job_id)) => {
                let handle = self.slot.start(&job_id);
                self.set_task_state(TaskState::Pending);
                self.view.loader_visible = true;
                self.view.notice = Some(Notice::new(
                    NoticeKind::Info,
                    format!(
                        "Video received (job {}). Checking for results...",
                        job_id
                    ),
                ));
                log::info!(
                    "Task {} ({}) waiting on job {}",
                    current.id,
                    current.media_type.noun(),
                    job_id
                );
                self.transition(UploadState::AwaitingJob(job_id.clone()));
                Some(PollRequest { job_id, handle })
            }
            Submission::Image(Err(err)) | Submission::Video(Err(err)) => {
                self.fail(err);
                None
            }
        }
    }

    pub fn finish_poll(&mut self, report: PollReport) {
        let awaiting = matches!(
            &self.state,
            UploadState::AwaitingJob(job_id) if *job_id == report.job_id
        );
        if !awaiting || report.generation != self.slot.generation() {
            log::debug!(
                "Ignoring poll result for job {} (generation {})",
                report.job_id,
                report.generation
            );
            return;
        }

        match report.outcome {
            PollOutcome::Complete(prediction) => self.render(&prediction),
            PollOutcome::Failed(err) => self.fail(err),
            PollOutcome::Superseded => {}
        }
    }

    fn render(&mut self, prediction: &PredictionResponse) {
        self.transition(UploadState::Rendering);
        let result = render_prediction(prediction);
        log::info!("Verdict {} ({})", result.label(), result.confidence);
        self.view = UploadView {
            loader_visible: false,
            notice: None,
            result: Some(result),
        };
        self.last_error = None;
        self.set_task_state(TaskState::Complete);
        self.transition(UploadState::Idle);
    }

    fn fail(&mut self, err: ClientError) {
        log::error!("Upload failed: {}", err);
        self.transition(UploadState::Failed);
        self.view = UploadView {
            loader_visible: false,
            notice: Some(Notice::new(NoticeKind::Error, err.user_message())),
            result: None,
        };
        self.set_task_state(TaskState::Failed);
        self.last_error = Some(err);
        self.transition(UploadState::Idle);
    }

    fn set_task_state(&mut self, state: TaskState) {
        if let Some(task) = self.task.as_mut() {
            task.state = state;
        }
    }

    fn transition(&mut self, next: UploadState) {
        log::debug!("Upload workflow: {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Verdict;

    fn prediction(verdict: Verdict) -> PredictionResponse {
        PredictionResponse {
            verdict,
            confidence: "91.00%".into(),
            original_face_b64: None,
            heatmap_b64: None,
            overlaid_b64: None,
            suspicious_frames: Vec::new(),
        }
    }

    #[test]
    fn empty_selection_shows_notice_and_stays_idle() {
        let mut ctl = UploadController::new();
        let task = ctl.begin::<()>(MediaType::Image, None);
        assert!(task.is_none());
        assert_eq!(ctl.state(), UploadState::Idle);
        assert_eq!(
            ctl.view().notice.as_ref().map(|n| n.text.as_str()),
            Some(SELECT_FILE_NOTICE)
        );
        assert!(!ctl.view().loader_visible);
        assert!(ctl.controls_enabled());
        assert!(matches!(ctl.last_error(), Some(ClientError::Validation(_))));
    }

    #[test]
    fn empty_selection_keeps_pending_job() {
        let mut ctl = UploadController::new();
        let task = ctl.begin(MediaType::Video, Some("clip.mp4")).expect("task");
        let request = ctl
            .finish_submission(SubmissionReport {
                task_id: task.id,
                submission: Submission::Video(Ok(JobId::from("job-1"))),
            })
            .expect("poll request");

        assert!(ctl.begin::<&str>(MediaType::Image, None).is_none());
        assert_eq!(ctl.state(), UploadState::AwaitingJob(JobId::from("job-1")));
        assert!(request.handle.is_current());
        assert!(ctl.view().loader_visible);
        assert_eq!(
            ctl.view().notice.as_ref().map(|n| n.kind),
            Some(NoticeKind::Warning)
        );

        ctl.finish_poll(PollReport {
            job_id: request.job_id.clone(),
            generation: request.handle.generation(),
            attempts: 1,
            outcome: PollOutcome::Complete(prediction(Verdict::Real)),
        });
        assert_eq!(ctl.state(), UploadState::Idle);
        assert!(ctl.view().result.is_some());
        assert!(ctl.last_error().is_none());
    }

    #[test]
    fn begin_shows_loader_before_any_request() {
        let mut ctl = UploadController::new();
        let task = ctl.begin(MediaType::Video, Some("clip.mp4")).expect("task");
        assert_eq!(task.media_type, MediaType::Video);
        assert!(ctl.view().loader_visible);
        assert_eq!(
            ctl.view().notice.as_ref().map(|n| n.text.as_str()),
            Some("Analyzing video... This may take a few moments.")
        );
        assert_eq!(ctl.state(), UploadState::Submitting(MediaType::Video));
        assert!(!ctl.controls_enabled());
        assert_eq!(ctl.task_state(), Some(TaskState::Submitting));
    }

    #[test]
    fn second_submission_is_refused_while_in_flight() {
        let mut ctl = UploadController::new();
        ctl.begin(MediaType::Image, Some("a.jpg")).expect("task");
        assert!(ctl.begin(MediaType::Image, Some("b.jpg")).is_none());
    }

    #[test]
    fn image_result_renders_and_returns_to_idle() {
        let mut ctl = UploadController::new();
        let task = ctl.begin(MediaType::Image, Some("a.jpg")).expect("task");
        let poll = ctl.finish_submission(SubmissionReport {
            task_id: task.id,
            submission: Submission::Image(Ok(prediction(Verdict::Fake))),
        });
        assert!(poll.is_none());
        assert_eq!(ctl.state(), UploadState::Idle);
        assert_eq!(ctl.task_state(), Some(TaskState::Complete));
        let view = ctl.view();
        assert!(!view.loader_visible);
        assert_eq!(view.result.as_ref().map(|r| r.css_class()), Some("fake"));
    }

    #[test]
    fn server_error_is_written_verbatim() {
        let mut ctl = UploadController::new();
        let task = ctl.begin(MediaType::Image, Some("a.jpg")).expect("task");
        ctl.finish_submission(SubmissionReport {
            task_id: task.id,
            submission: Submission::Image(Err(ClientError::server(400, "No face detected"))),
        });
        let notice = ctl.view().notice.clone().expect("notice");
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.text, "Error: No face detected");
        assert!(!ctl.view().loader_visible);
        assert_eq!(ctl.state(), UploadState::Idle);
        assert_eq!(ctl.task_state(), Some(TaskState::Failed));
    }

    #[test]
    fn stale_submission_report_is_ignored() {
        let mut ctl = UploadController::new();
        let first = ctl.begin(MediaType::Video, Some("a.mp4")).expect("task");
        let request = ctl
            .finish_submission(SubmissionReport {
                task_id: first.id,
                submission: Submission::Video(Ok(JobId::from("job-1"))),
            })
            .expect("poll request");
        assert!(request.handle.is_current());

        let second = ctl.begin(MediaType::Image, Some("b.jpg")).expect("task");
        assert!(!request.handle.is_current());

        // Late duplicate for the first task.
        ctl.finish_submission(SubmissionReport {
            task_id: first.id,
            submission: Submission::Video(Ok(JobId::from("job-9"))),
        });
        assert_eq!(ctl.state(), UploadState::Submitting(MediaType::Image));
        assert!(!ctl.poll_slot().is_polling());
        assert_ne!(first.id, second.id);
    }
}
