//! Channel transport seam.
//!
//! The transport owns the wire: opening comm channels against backend
//! targets, sending payload frames, and delivering comm events to registered
//! handlers. It also keeps the per-message callback table that routes
//! backend-originated stream output back to the requesting cell.

use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::callbacks::Callbacks;
use crate::message::Message;

/// A bidirectional, named communication link to the backend.
pub trait Channel: Send + Sync {
    /// The comm id identifying this channel (and the model bound to it).
    fn id(&self) -> &str;

    /// Send a payload frame. `callbacks` are registered with the transport's
    /// per-message table under the returned msg_id, so replies and stream
    /// output can be routed back.
    fn send(&self, content: Value, callbacks: Option<Arc<Callbacks>>) -> anyhow::Result<String>;

    fn close(&self);
}

/// Handler for comm events delivered by the transport to a registered target.
pub trait CommHandler: Send + Sync {
    /// A backend-initiated open; `msg.content.data` carries the declared
    /// target, model name, module, and initial state.
    fn on_comm_open(&self, channel: Arc<dyn Channel>, msg: Message) -> BoxFuture<'_, ()>;

    /// A payload frame on an open channel.
    fn on_comm_msg(&self, comm_id: &str, content: Value);

    /// The backend closed the channel.
    fn on_comm_close(&self, comm_id: &str);
}

/// The channel transport consumed by the manager.
pub trait ChannelTransport: Send + Sync {
    /// Register a handler for backend-initiated opens against `target_name`.
    fn register_target(&self, target_name: &str, handler: Arc<dyn CommHandler>);

    /// Open a fresh channel against `target_name`, announcing `data`.
    fn open_channel(
        &self,
        target_name: &str,
        data: Value,
    ) -> BoxFuture<'_, anyhow::Result<Arc<dyn Channel>>>;

    /// The callback bundle registered by an in-flight request for `msg_id`,
    /// if any. Backs the second tier of originating-cell resolution.
    fn message_callbacks(&self, msg_id: &str) -> Option<Arc<Callbacks>>;
}
