use super::preview::spawn_decode;
use super::state::{Notice, PreviewStatus, ResultView, UploadState};
use crate::error::UploadError;
use crate::upload::{ContactCard, ContactRequest, ProcessingEndpoint, ProcessingResult, StagedFile};
use std::future::Future;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use tracing::{debug, info, warn};

type Outcome<T> = Result<T, UploadError>;

/// Owns one upload-and-display cycle: the staged image, its preview, the
/// request in flight and the rendered results.
///
/// Every transition happens on the caller's thread. Decoding and requests run
/// on worker threads and are picked up by [`UploadController::poll`].
pub struct UploadController {
    endpoint: Arc<dyn ProcessingEndpoint>,
    state: UploadState,
    staged: Option<StagedFile>,
    preview: PreviewStatus,
    preview_generation: u64,
    result: Option<ProcessingResult>,
    view: Option<ResultView>,
    contact_card: Option<ContactCard>,
    notice: Option<Notice>,
    preview_receiver: Option<Receiver<PreviewStatus>>,
    process_receiver: Option<Receiver<Outcome<ProcessingResult>>>,
    contact_receiver: Option<Receiver<Outcome<ContactCard>>>,
}

impl UploadController {
    pub fn new(endpoint: Arc<dyn ProcessingEndpoint>) -> Self {
        Self {
            endpoint,
            state: UploadState::Empty,
            staged: None,
            preview: PreviewStatus::None,
            preview_generation: 0,
            result: None,
            view: None,
            contact_card: None,
            notice: None,
            preview_receiver: None,
            process_receiver: None,
            contact_receiver: None,
        }
    }

    /// Stage `file` if it declares an image type and start decoding its
    /// preview. Any previous file and results are replaced.
    pub fn accept_file(&mut self, file: StagedFile) -> Result<(), UploadError> {
        if self.state == UploadState::Processing {
            debug!("Ignoring '{}' while a request is in flight", file.name);
            return Err(UploadError::Busy);
        }

        if !file.is_image() {
            warn!("Rejected '{}' ({})", file.name, file.content_type);
            self.notice = Some(Notice::new("Unsupported file", "Please upload an image file."));
            return Err(UploadError::InvalidInput {
                name: file.name,
                content_type: file.content_type,
            });
        }

        info!(
            "Staged '{}' ({}, {} bytes)",
            file.name,
            file.content_type,
            file.size()
        );
        self.preview_receiver = Some(spawn_decode(file.bytes.clone()));
        self.preview = PreviewStatus::Decoding;
        self.preview_generation += 1;
        self.staged = Some(file);
        self.discard_results();
        self.state = UploadState::Previewing;
        Ok(())
    }

    /// Back to an empty drop zone, from any state. A request still in flight
    /// is abandoned and its outcome ignored.
    pub fn clear(&mut self) {
        info!("Clearing staged image");
        self.staged = None;
        self.preview = PreviewStatus::None;
        self.preview_generation += 1;
        self.preview_receiver = None;
        self.process_receiver = None;
        self.discard_results();
        self.state = UploadState::Empty;
    }

    /// Submit the staged file. The outcome arrives through [`Self::poll`].
    pub fn process(&mut self) -> Result<(), UploadError> {
        if self.state == UploadState::Processing {
            return Err(UploadError::Busy);
        }
        let file = self.staged.clone().ok_or(UploadError::NoFileStaged)?;

        info!("Processing '{}'", file.name);
        self.state = UploadState::Processing;
        self.contact_card = None;
        self.contact_receiver = None;

        let endpoint = Arc::clone(&self.endpoint);
        self.process_receiver = Some(spawn_request(move || async move {
            endpoint.process(&file).await
        }));
        Ok(())
    }

    /// Ask the server to format the current fields as a contact card.
    pub fn request_contact_card(&mut self) -> Result<(), UploadError> {
        if self.contact_receiver.is_some() || self.state == UploadState::Processing {
            return Err(UploadError::Busy);
        }
        let request = match (&self.state, &self.result) {
            (UploadState::ResultsShown, Some(result)) => ContactRequest::from(&result.parsed_fields),
            _ => return Err(UploadError::NoResults),
        };

        let endpoint = Arc::clone(&self.endpoint);
        self.contact_receiver = Some(spawn_request(move || async move {
            endpoint.format_contact(&request).await
        }));
        Ok(())
    }

    /// Apply whatever the workers have finished. Returns true if anything
    /// visible changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;

        if let Some(message) = drain(&mut self.preview_receiver) {
            self.preview = message
                .unwrap_or_else(|| PreviewStatus::Unavailable("decoder stopped".to_string()));
            changed = true;
        }

        if let Some(message) = drain(&mut self.process_receiver) {
            self.finish_processing(message.unwrap_or_else(worker_gone));
            changed = true;
        }

        if let Some(message) = drain(&mut self.contact_receiver) {
            self.finish_contact(message.unwrap_or_else(worker_gone));
            changed = true;
        }

        changed
    }

    /// Raise a notice for a failure that happened outside the controller,
    /// such as an unreadable file.
    pub fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    fn finish_processing(&mut self, outcome: Outcome<ProcessingResult>) {
        // The trigger and spinner follow `state`, so leaving Processing here
        // restores them on every path.
        match outcome {
            Ok(result) => {
                info!("Processing finished");
                self.view = Some(ResultView::render(&result));
                self.result = Some(result);
                self.state = UploadState::ResultsShown;
            }
            Err(e) => {
                warn!("Processing failed: {}", e);
                self.notice = Some(Notice::new(
                    "Processing failed",
                    format!("Error processing image: {}", e),
                ));
                self.state = UploadState::Previewing;
            }
        }
    }

    fn finish_contact(&mut self, outcome: Outcome<ContactCard>) {
        match outcome {
            Ok(card) => {
                info!("Contact card received ({})", card.status);
                self.contact_card = Some(card);
            }
            Err(e) => {
                warn!("Contact card failed: {}", e);
                self.notice = Some(Notice::new(
                    "Contact card failed",
                    format!("Error formatting contact: {}", e),
                ));
            }
        }
    }

    fn discard_results(&mut self) {
        self.result = None;
        self.view = None;
        self.contact_card = None;
        self.contact_receiver = None;
    }

    pub fn state(&self) -> UploadState {
        self.state
    }

    pub fn staged(&self) -> Option<&StagedFile> {
        self.staged.as_ref()
    }

    pub fn preview(&self) -> &PreviewStatus {
        &self.preview
    }

    /// Bumped whenever the preview image is replaced or removed.
    pub fn preview_generation(&self) -> u64 {
        self.preview_generation
    }

    pub fn result(&self) -> Option<&ProcessingResult> {
        self.result.as_ref()
    }

    pub fn view(&self) -> Option<&ResultView> {
        self.view.as_ref()
    }

    pub fn contact_card(&self) -> Option<&ContactCard> {
        self.contact_card.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn drop_zone_visible(&self) -> bool {
        !self.preview_visible()
    }

    pub fn preview_visible(&self) -> bool {
        self.staged.is_some() && self.preview.is_settled()
    }

    pub fn results_visible(&self) -> bool {
        self.view.is_some()
    }

    pub fn process_enabled(&self) -> bool {
        self.preview_visible() && self.state != UploadState::Processing
    }

    pub fn is_busy(&self) -> bool {
        self.state == UploadState::Processing
    }

    pub fn contact_pending(&self) -> bool {
        self.contact_receiver.is_some()
    }

    /// Something is still running in the background.
    pub fn has_pending_work(&self) -> bool {
        self.preview_receiver.is_some()
            || self.process_receiver.is_some()
            || self.contact_receiver.is_some()
    }
}

/// `None` while nothing has arrived, `Some(None)` if the worker hung up.
fn drain<T>(slot: &mut Option<Receiver<T>>) -> Option<Option<T>> {
    let message = match slot.as_ref()?.try_recv() {
        Ok(message) => Some(message),
        Err(TryRecvError::Empty) => return None,
        Err(TryRecvError::Disconnected) => None,
    };
    *slot = None;
    Some(message)
}

fn worker_gone<T>() -> Outcome<T> {
    Err(UploadError::Worker(
        "worker exited without a result".to_string(),
    ))
}

/// Run an endpoint call on its own thread and runtime.
fn spawn_request<T, F, Fut>(task: F) -> Receiver<Outcome<T>>
where
    T: Send + 'static,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Outcome<T>>,
{
    let (sender, receiver) = mpsc::channel();
    std::thread::spawn(move || {
        let outcome = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt.block_on(task()),
            Err(e) => Err(UploadError::Worker(format!(
                "failed to start runtime: {}",
                e
            ))),
        };
        let _ = sender.send(outcome);
    });
    receiver
}
