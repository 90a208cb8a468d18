//! Error types for model/view resolution and display.

/// Errors that can occur while creating or displaying widget models and views.
///
/// All three failure kinds (resolution, context, transport) surface as typed
/// values to the caller. Transport-driven paths with no caller log and drop
/// them instead, so a single failed widget never takes down the session.
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error("unknown model type {name:?} (module {module:?})")]
    UnknownModel {
        name: String,
        module: Option<String>,
    },

    #[error("unknown view type {name:?} (module {module:?})")]
    UnknownView {
        name: String,
        module: Option<String>,
    },

    #[error("failed to load module {module:?}: {source}")]
    ModuleLoad {
        module: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("comm_open payload carries no model_name")]
    MissingModelName,

    #[error("model state names no view")]
    MissingViewName,

    #[error("message has no parent header to resolve a cell from")]
    NoParentHeader,

    #[error("no originating cell for message {msg_id}")]
    NoCell { msg_id: String },

    #[error("transport error: {0}")]
    Transport(#[source] anyhow::Error),

    #[error("render failed: {0}")]
    Render(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, WidgetError>;
