// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Workflow states, UI signals and controller errors

use super::preview::PreviewError;

/// Generation workflow state, one per page visit
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WorkflowState {
    /// No image selected, nothing in flight
    #[default]
    Idle,
    /// Image present, nothing in flight
    ImageSelected,
    /// Request in flight; re-submission is disabled
    Generating,
    Succeeded { video_url: String },
    Failed { message: String },
}

impl WorkflowState {
    pub fn is_generating(&self) -> bool {
        matches!(self, WorkflowState::Generating)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkflowState::Succeeded { .. } | WorkflowState::Failed { .. }
        )
    }

    pub fn video_url(&self) -> Option<&str> {
        match self {
            WorkflowState::Succeeded { video_url } => Some(video_url),
            _ => None,
        }
    }
}

/// Signals for the surrounding UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerSignal {
    /// Show a sign-in prompt; return to `redirect_to` afterwards
    SessionRequired { redirect_to: String, message: String },
    /// No screenshot selected
    MissingInput { message: String },
}

/// What a submit call did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A request is already in flight; nothing was sent
    Ignored,
    /// A precondition failed; nothing was sent and state is unchanged
    Rejected(ControllerSignal),
    /// The request completed (successfully or not)
    Settled {
        state: WorkflowState,
        signal: Option<ControllerSignal>,
    },
}

impl SubmitOutcome {
    pub fn signal(&self) -> Option<&ControllerSignal> {
        match self {
            SubmitOutcome::Ignored => None,
            SubmitOutcome::Rejected(signal) => Some(signal),
            SubmitOutcome::Settled { signal, .. } => signal.as_ref(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("A generation request is in flight")]
    Busy,

    #[error("Nothing to retry")]
    NothingToRetry,

    #[error("Could not read screenshot: {0}")]
    Preview(#[from] PreviewError),

    #[error("Operation cancelled")]
    Cancelled,
}
