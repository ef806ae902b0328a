//! Shared application state type.

use crate::bootstrap::AxumContext;
use std::sync::Arc;

/// Application state shared across all handlers.
///
/// An Arc-wrapped [`AxumContext`] holding the configuration readers, the
/// settings service, the stream manager and the token issuer.
pub type AppState = Arc<AxumContext>;
