//! Live editing of a template configuration
//!
//! [`EditSession`] is a deterministic state machine: every operation takes
//! the current instant, and [`EditSession::poll`] fires whatever timers have
//! expired. [`spawn`] runs a session on a tokio task against the real clock.

mod debounce;
mod driver;
mod edit;

pub use debounce::Debouncer;
pub use driver::{spawn, SessionHandle};
pub use edit::{EditSession, EditState, Outputs, SessionEvent, SessionSnapshot};

use thiserror::Error;

use crate::template::CatalogError;

/// Errors returned by session operations
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("stylesheet of template '{template}' is not editable")]
    StylesheetNotEditable { template: String },

    #[error("session task has stopped")]
    Closed,
}
