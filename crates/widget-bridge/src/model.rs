//! Widget models: backend-synchronized state bound to a comm channel.
//!
//! A [`Model`] pairs a comm channel with a widget implementation resolved by
//! name. The model's state is opaque to the bridge; the bridge only routes
//! update deltas and custom messages to it, and fires the destroy lifecycle
//! event when the channel goes away.

use std::sync::{Arc, Mutex, Weak};

use log::debug;
use serde_json::Value;

use crate::callbacks::Callbacks;
use crate::channel::Channel;
use crate::error::{Result, WidgetError};
use crate::lifecycle::{LifecycleEvent, Subscription};
use crate::manager::WidgetManager;

/// Context handed to a model constructor at instantiation.
pub struct ModelContext {
    pub comm_id: String,
    /// Initial state from the comm_open payload; null for front-end
    /// initiated creations.
    pub initial_state: Value,
}

/// A widget model implementation, registered by name.
pub trait WidgetModel: Send + Sync {
    /// Current synchronized state.
    fn state(&self) -> Value;

    /// Apply a state delta from the backend.
    fn apply_update(&mut self, delta: &Value);

    /// Name of the view that renders this model, read from current state.
    fn view_name(&self) -> Option<String>;

    /// Module the view implementation must be loaded from, if any.
    fn view_module(&self) -> Option<String> {
        None
    }

    /// A backend message that is not a state update.
    fn on_custom_message(&mut self, _content: &Value) {}
}

/// A live model: widget implementation plus its backing channel.
///
/// Identity is the channel's comm id. A model is owned by exactly one
/// manager; views hold it shared and react to its destroy event.
pub struct Model {
    id: String,
    channel: Arc<dyn Channel>,
    widget: Mutex<Box<dyn WidgetModel>>,
    destroy: LifecycleEvent,
    manager: Weak<WidgetManager>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.id)
            .field("destroyed", &self.destroy.has_fired())
            .finish_non_exhaustive()
    }
}

impl Model {
    pub(crate) fn new(
        channel: Arc<dyn Channel>,
        widget: Box<dyn WidgetModel>,
        manager: Weak<WidgetManager>,
    ) -> Arc<Self> {
        Arc::new(Model {
            id: channel.id().to_string(),
            channel,
            widget: Mutex::new(widget),
            destroy: LifecycleEvent::new(),
            manager,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The manager this model belongs to, unless it has been dropped.
    pub fn manager(&self) -> Option<Arc<WidgetManager>> {
        self.manager.upgrade()
    }

    pub fn state(&self) -> Value {
        self.widget.lock().unwrap().state()
    }

    pub fn view_name(&self) -> Option<String> {
        self.widget.lock().unwrap().view_name()
    }

    pub fn view_module(&self) -> Option<String> {
        self.widget.lock().unwrap().view_module()
    }

    /// Send a payload frame on the model's channel. Returns the msg_id the
    /// transport assigned; `callbacks` are registered under it.
    pub fn send(&self, content: Value, callbacks: Option<Arc<Callbacks>>) -> Result<String> {
        self.channel
            .send(content, callbacks)
            .map_err(WidgetError::Transport)
    }

    /// Register a hook on the model's destroy event. Dropping the returned
    /// subscription cancels the hook.
    pub fn on_destroy(&self, hook: impl FnOnce() + Send + 'static) -> Subscription {
        self.destroy.subscribe(hook)
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroy.has_fired()
    }

    /// Front-end initiated close: closes the channel and fires destroy,
    /// which removes the model from its manager's table.
    pub fn close(&self) {
        self.channel.close();
        self.destroy.fire();
    }

    pub(crate) fn fire_destroy(&self) {
        self.destroy.fire();
    }

    /// Route an inbound comm_msg payload. `method: "update"` merges a state
    /// delta, `method: "custom"` dispatches to the widget, anything else is
    /// logged and dropped.
    pub(crate) fn handle_comm_msg(&self, content: &Value) {
        let data = content.get("data").unwrap_or(content);
        let method = data.get("method").and_then(|m| m.as_str());
        match method {
            Some("update") => {
                let delta = data.get("state").cloned().unwrap_or(Value::Null);
                self.widget.lock().unwrap().apply_update(&delta);
            }
            Some("custom") => {
                let custom = data.get("content").cloned().unwrap_or(Value::Null);
                self.widget.lock().unwrap().on_custom_message(&custom);
            }
            other => {
                debug!("comm {}: ignoring message method {:?}", self.id, other);
            }
        }
    }
}

/// Generic model keeping raw JSON state and merging update deltas.
///
/// Deltas update only the keys they carry; untouched keys are preserved.
/// The rendering view is read from `_view_name` / `_view_module` in state.
pub struct StateModel {
    state: Value,
}

impl StateModel {
    pub fn new(initial: Value) -> Self {
        let state = if initial.is_object() {
            initial
        } else {
            Value::Object(Default::default())
        };
        StateModel { state }
    }

    /// A registry-ready constructor building a `StateModel` from the
    /// comm_open initial state.
    pub fn ctor() -> crate::registry::ModelCtor {
        Arc::new(|ctx: ModelContext| {
            Box::new(StateModel::new(ctx.initial_state)) as Box<dyn WidgetModel>
        })
    }

    fn state_str(&self, key: &str) -> Option<String> {
        self.state
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }
}

impl WidgetModel for StateModel {
    fn state(&self) -> Value {
        self.state.clone()
    }

    fn apply_update(&mut self, delta: &Value) {
        if let (Some(existing), Some(delta)) = (self.state.as_object_mut(), delta.as_object()) {
            for (key, value) in delta {
                existing.insert(key.clone(), value.clone());
            }
        }
    }

    fn view_name(&self) -> Option<String> {
        self.state_str("_view_name")
    }

    fn view_module(&self) -> Option<String> {
        self.state_str("_view_module")
    }
}
