//! Host-surface seams: cells, elements, and focus capture.
//!
//! The bridge never creates or destroys cells; it only resolves them and
//! attaches rendered output. What an element actually is belongs to the host
//! surface, so it stays an opaque trait object here.

use std::sync::Arc;

use serde_json::Value;

/// Opaque handle to a rendered piece of UI.
pub trait Element: Send + Sync {}

/// A cell's output-routing handle.
pub trait OutputRouter: Send + Sync {
    fn handle_output(&self, content: &Value);
    fn handle_clear_output(&self, wait: bool);
}

/// A UI unit of execution and output in the host surface.
pub trait Cell: Send + Sync {
    fn output_router(&self) -> Arc<dyn OutputRouter>;

    /// Attach a rendered element to this cell's display region.
    fn attach(&self, element: &Arc<dyn Element>);
}

/// The host surface's execution-tracking index: which cell produced a
/// given request message.
pub trait NotebookSurface: Send + Sync {
    fn cell_for_message(&self, msg_id: &str) -> Option<Arc<dyn Cell>>;
}

/// The host's keyboard/focus-capture subsystem. Registering a region
/// suspends global keyboard handling over it so the view captures input
/// directly.
pub trait FocusCapture: Send + Sync {
    fn register_interactive_region(&self, element: &Arc<dyn Element>);
}
