// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client side of the screenshot-to-tutorial workflow

pub mod controller;
pub mod download;
pub mod preview;
pub mod session;
pub mod state;
pub mod transport;

pub use controller::{GenerationController, PendingSubmit, SelectedImage, SubmitStep};
pub use download::{suggested_file_name, DownloadError, VideoDownloader};
pub use preview::{ImageFile, ImagePreview, ImagePreviewDecoder, PreviewDecoder, PreviewError};
pub use session::{Session, SessionProvider, StaticSession, StoredSession};
pub use state::{ControllerError, ControllerSignal, SubmitOutcome, WorkflowState};
pub use transport::{GenerationTransport, HttpTransport, TransportError};
