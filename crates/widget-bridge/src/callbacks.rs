//! Response-routing callback bundles.
//!
//! A bundle travels with an outgoing message and tells the transport where
//! backend-generated events for that message should land: stream output and
//! clear-output go to the originating cell's output router, and `get_cell`
//! lets the manager recover the cell itself for messages that did not come
//! from ordinary cell execution.

use std::sync::Arc;

use serde_json::Value;

use crate::cell::Cell;

type OutputFn = Box<dyn Fn(&Value) + Send + Sync>;
type ClearOutputFn = Box<dyn Fn(bool) + Send + Sync>;
type GetCellFn = Box<dyn Fn() -> Option<Arc<dyn Cell>> + Send + Sync>;

/// Callback bundle for routing backend-originated events.
///
/// All handlers are optional; an empty bundle is a no-op sink and invoking
/// any helper on it does nothing.
#[derive(Default)]
pub struct Callbacks {
    pub on_output: Option<OutputFn>,
    pub on_clear_output: Option<ClearOutputFn>,
    pub get_cell: Option<GetCellFn>,
}

impl Callbacks {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn handle_output(&self, content: &Value) {
        if let Some(handler) = &self.on_output {
            handler(content);
        }
    }

    pub fn handle_clear_output(&self, wait: bool) {
        if let Some(handler) = &self.on_clear_output {
            handler(wait);
        }
    }

    /// The cell captured by this bundle, if any.
    pub fn cell(&self) -> Option<Arc<dyn Cell>> {
        self.get_cell.as_ref().and_then(|lookup| lookup())
    }
}
