//! widget-bridge - Bidirectional model/view synchronization for comm-backed
//! notebook widgets.
//!
//! This crate mediates between a remote execution backend and an interactive
//! front-end surface: it keeps named widget models alive and synchronized
//! over asynchronous comm channels, and renders them through view
//! implementations resolved by name, either from a local registry or from
//! dynamically loaded modules.
//!
//! The host surface (cells, display regions), keyboard focus capture, the
//! channel transport, and module loading are all external collaborators
//! consumed through traits; this crate owns the registry, the model table,
//! message-to-cell correlation, and model/view lifecycle wiring.

pub mod callbacks;
pub mod cell;
pub mod channel;
pub mod error;
pub mod lifecycle;
pub mod loader;
pub mod manager;
pub mod message;
pub mod model;
pub mod registry;
pub mod view;

mod resolver;

pub use callbacks::Callbacks;
pub use cell::{Cell, Element, FocusCapture, NotebookSurface, OutputRouter};
pub use channel::{Channel, ChannelTransport, CommHandler};
pub use error::{Result, WidgetError};
pub use lifecycle::{LifecycleEvent, Subscription};
pub use loader::{ModuleExports, ModuleLoader};
pub use manager::{WidgetManager, WIDGET_TARGET};
pub use message::{CommOpenData, Header, Message};
pub use model::{Model, ModelContext, StateModel, WidgetModel};
pub use registry::{ModelCtor, TypeRegistry, ViewCtor};
pub use view::{View, ViewContext, ViewOptions, WidgetView};
