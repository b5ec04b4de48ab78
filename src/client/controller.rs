// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Generation controller: the client-side workflow state machine
//!
//! The controller owns the page's workflow state and is the only place
//! that talks to the generation endpoint. Every failure path ends in a
//! state transition plus an optional [`ControllerSignal`]; nothing is
//! thrown past this boundary.

use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::preview::{ImageFile, ImagePreview, ImagePreviewDecoder, PreviewDecoder};
use super::session::SessionProvider;
use super::state::{ControllerError, ControllerSignal, SubmitOutcome, WorkflowState};
use super::transport::{GenerationTransport, TransportError};
use crate::config::ClientConfig;
use crate::generation::{GenerationRequest, GenerationResult};
use crate::i18n::{self, Catalog, Translate};

/// The screenshot currently selected, with its decoded preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    pub file: ImageFile,
    pub preview: ImagePreview,
}

/// A request that passed the submit preconditions and awaits dispatch
#[derive(Debug, Clone)]
pub struct PendingSubmit {
    request: GenerationRequest,
    credential: String,
}

impl PendingSubmit {
    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }
}

/// First half of a submit
#[derive(Debug, Clone)]
pub enum SubmitStep {
    /// Preconditions held; state is now `Generating`
    Send(PendingSubmit),
    /// Nothing to send
    Done(SubmitOutcome),
}

pub struct GenerationController {
    config: ClientConfig,
    session: Arc<dyn SessionProvider>,
    transport: Arc<dyn GenerationTransport>,
    decoder: Arc<dyn PreviewDecoder>,
    translate: Arc<dyn Translate>,
    state: WorkflowState,
    image: Option<SelectedImage>,
    last_prompt: Option<String>,
    last_request: Option<GenerationRequest>,
    signals: broadcast::Sender<ControllerSignal>,
}

impl GenerationController {
    pub fn new(
        config: ClientConfig,
        session: Arc<dyn SessionProvider>,
        transport: Arc<dyn GenerationTransport>,
    ) -> Self {
        let (signals, _) = broadcast::channel(16);
        Self {
            config,
            session,
            transport,
            decoder: Arc::new(ImagePreviewDecoder),
            translate: Arc::new(Catalog),
            state: WorkflowState::Idle,
            image: None,
            last_prompt: None,
            last_request: None,
            signals,
        }
    }

    pub fn with_decoder(mut self, decoder: Arc<dyn PreviewDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_translator(mut self, translate: Arc<dyn Translate>) -> Self {
        self.translate = translate;
        self
    }

    /// Listen for signals (sign-in prompts, missing input)
    pub fn subscribe(&self) -> broadcast::Receiver<ControllerSignal> {
        self.signals.subscribe()
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn image(&self) -> Option<&SelectedImage> {
        self.image.as_ref()
    }

    pub fn preview(&self) -> Option<&ImagePreview> {
        self.image.as_ref().map(|i| &i.preview)
    }

    /// Payload of the most recently sent request
    pub fn last_request(&self) -> Option<&GenerationRequest> {
        self.last_request.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_generating()
    }

    /// Whether the generate button is enabled
    pub fn can_submit(&self) -> bool {
        self.image.is_some() && !self.is_busy()
    }

    /// Decode and store a screenshot.
    ///
    /// A file that cannot be decoded is reported to the caller and leaves
    /// the workflow state untouched.
    pub async fn select_image(
        &mut self,
        file: ImageFile,
        cancel: &CancellationToken,
    ) -> Result<(), ControllerError> {
        if self.is_busy() {
            return Err(ControllerError::Busy);
        }

        let decoder = Arc::clone(&self.decoder);
        let preview = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Preview decoding cancelled for {}", file.name);
                return Err(ControllerError::Cancelled);
            }
            decoded = decoder.decode(&file) => decoded?,
        };

        info!(
            "Screenshot selected: {} ({}x{}, {} bytes)",
            file.name, preview.width, preview.height, preview.size_bytes
        );
        self.image = Some(SelectedImage { file, preview });
        self.state = WorkflowState::ImageSelected;
        Ok(())
    }

    /// Clear the screenshot and its preview
    pub fn remove_image(&mut self) -> Result<(), ControllerError> {
        if self.is_busy() {
            return Err(ControllerError::Busy);
        }
        self.image = None;
        self.state = WorkflowState::Idle;
        Ok(())
    }

    /// Check preconditions and, if they hold, move to `Generating`.
    ///
    /// Order: already generating (no-op), session, screenshot.
    pub fn begin_submit(&mut self, prompt: &str) -> SubmitStep {
        if self.is_busy() {
            debug!("Submit ignored: generation already in flight");
            return SubmitStep::Done(SubmitOutcome::Ignored);
        }

        let Some(session) = self.session.current() else {
            info!("Submit blocked: no session");
            let signal = self.session_required(i18n::LOGIN_TO_GET_CREDITS);
            return SubmitStep::Done(SubmitOutcome::Rejected(signal));
        };

        let Some(image) = self.image.as_ref() else {
            info!("Submit blocked: no screenshot selected");
            let signal = ControllerSignal::MissingInput {
                message: self.lookup(i18n::MISSING_SCREENSHOT),
            };
            self.publish(&signal);
            return SubmitStep::Done(SubmitOutcome::Rejected(signal));
        };

        let request = GenerationRequest::new(prompt, image.file.name.clone(), &self.config.settings);
        info!(
            "Starting tutorial generation: image={}, prompt_len={}",
            request.image_name,
            request.prompt.len()
        );

        self.last_prompt = Some(prompt.to_string());
        self.last_request = Some(request.clone());
        self.state = WorkflowState::Generating;

        SubmitStep::Send(PendingSubmit {
            request,
            credential: session.token,
        })
    }

    /// Issue the outbound call for a pending submit, bounded by the
    /// configured timeout.
    pub async fn dispatch(
        &self,
        pending: &PendingSubmit,
    ) -> Result<GenerationResult, TransportError> {
        let call = self
            .transport
            .send(&pending.request, &pending.credential, self.config.locale);

        match tokio::time::timeout(self.config.request_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "Generation request timed out after {}s",
                    self.config.request_timeout.as_secs()
                );
                Err(TransportError::Timeout)
            }
        }
    }

    /// Apply the endpoint's answer (or a transport failure)
    pub fn finish_submit(
        &mut self,
        response: Result<GenerationResult, TransportError>,
    ) -> SubmitOutcome {
        if !self.is_busy() {
            warn!("Dropping generation response: no request in flight");
            return SubmitOutcome::Ignored;
        }

        let signal = match response {
            Ok(GenerationResult::Success { video_url }) => {
                info!("Tutorial video ready: {}", video_url);
                self.state = WorkflowState::Succeeded { video_url };
                None
            }
            Ok(GenerationResult::AuthExpired { message }) => {
                warn!("Session expired during generation");
                self.state = WorkflowState::Failed {
                    message: message.clone(),
                };
                Some(self.session_required_with(message))
            }
            Ok(GenerationResult::ValidationFailed { message })
            | Ok(GenerationResult::InternalError { message }) => {
                warn!("Generation failed: {}", message);
                self.state = WorkflowState::Failed { message };
                None
            }
            Err(e) => {
                warn!("Generation transport error: {}", e);
                self.state = WorkflowState::Failed {
                    message: self.lookup(i18n::GENERATION_ERROR),
                };
                None
            }
        };

        SubmitOutcome::Settled {
            state: self.state.clone(),
            signal,
        }
    }

    /// Submit the current inputs: exactly one outbound call when the
    /// preconditions hold, none otherwise.
    pub async fn submit(&mut self, prompt: &str) -> SubmitOutcome {
        match self.begin_submit(prompt) {
            SubmitStep::Done(outcome) => outcome,
            SubmitStep::Send(pending) => {
                let response = self.dispatch(&pending).await;
                self.finish_submit(response)
            }
        }
    }

    /// Submit again with the last prompt and the current screenshot
    pub async fn retry(&mut self) -> Result<SubmitOutcome, ControllerError> {
        match &self.state {
            WorkflowState::Generating => return Err(ControllerError::Busy),
            state if !state.is_terminal() => return Err(ControllerError::NothingToRetry),
            _ => {}
        }
        let prompt = self
            .last_prompt
            .clone()
            .ok_or(ControllerError::NothingToRetry)?;
        Ok(self.submit(&prompt).await)
    }

    fn lookup(&self, key: &str) -> String {
        self.translate.lookup(self.config.locale, key)
    }

    fn session_required(&self, key: &str) -> ControllerSignal {
        self.session_required_with(self.lookup(key))
    }

    fn session_required_with(&self, message: String) -> ControllerSignal {
        self.session.remember_redirect(&self.config.current_path);
        let signal = ControllerSignal::SessionRequired {
            redirect_to: self.config.current_path.clone(),
            message,
        };
        self.publish(&signal);
        signal
    }

    fn publish(&self, signal: &ControllerSignal) {
        // No subscribers is fine
        let _ = self.signals.send(signal.clone());
    }
}
