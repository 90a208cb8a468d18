//! The widget manager: aggregate root tying the registry, transport, host
//! surface, and focus capture together.
//!
//! One manager owns one comm-target registration and the table of live
//! models keyed by comm id. Models enter the table when a channel opens
//! (backend-initiated) or is opened (front-end initiated), and leave it when
//! their channel closes. Views are created per display request and are never
//! tracked here; their only lifecycle link is the model's destroy event.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use futures::future::BoxFuture;
use log::{debug, info, warn};
use serde_json::{json, Value};

use crate::callbacks::Callbacks;
use crate::cell::{Cell, FocusCapture, NotebookSurface};
use crate::channel::{Channel, ChannelTransport, CommHandler};
use crate::error::{Result, WidgetError};
use crate::loader::ModuleLoader;
use crate::message::{CommOpenData, Message};
use crate::model::{Model, ModelContext};
use crate::registry::{ModelCtor, TypeRegistry};
use crate::resolver::TypeResolver;
use crate::view::{View, ViewOptions};

/// The comm target widget channels are registered against.
pub const WIDGET_TARGET: &str = "ipython.widget";

struct ModelEntry {
    model: Arc<Model>,
    /// Removes the model from the table when its channel closes.
    _close_guard: crate::lifecycle::Subscription,
}

pub struct WidgetManager {
    transport: Arc<dyn ChannelTransport>,
    surface: Arc<dyn NotebookSurface>,
    focus: Arc<dyn FocusCapture>,
    resolver: TypeResolver,
    models: Mutex<HashMap<String, ModelEntry>>,
    weak_self: Weak<WidgetManager>,
}

impl WidgetManager {
    /// Construct a manager and register it with the transport for the
    /// widget comm target.
    pub fn new(
        transport: Arc<dyn ChannelTransport>,
        surface: Arc<dyn NotebookSurface>,
        focus: Arc<dyn FocusCapture>,
        registry: Arc<TypeRegistry>,
        loader: Arc<dyn ModuleLoader>,
    ) -> Arc<Self> {
        let manager = Arc::new_cyclic(|weak| WidgetManager {
            transport: transport.clone(),
            surface,
            focus,
            resolver: TypeResolver::new(registry, loader),
            models: Mutex::new(HashMap::new()),
            weak_self: weak.clone(),
        });
        transport.register_target(WIDGET_TARGET, manager.clone());
        manager
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        self.resolver.registry()
    }

    /// Front-end initiated model creation: resolve the constructor, open a
    /// fresh channel against `target_name`, and insert the model.
    pub async fn create_model(
        &self,
        model_name: &str,
        model_module: Option<&str>,
        target_name: &str,
    ) -> Result<Arc<Model>> {
        let ctor = self.resolver.resolve_model(model_name, model_module).await?;
        let data = json!({
            "model_name": model_name,
            "model_module": model_module,
        });
        let channel = self
            .transport
            .open_channel(target_name, data)
            .await
            .map_err(WidgetError::Transport)?;
        info!("opened comm {} for model {}", channel.id(), model_name);
        Ok(self.insert_model(channel, ctor, Value::Null))
    }

    /// Backend-initiated model creation from a comm_open payload.
    ///
    /// Fails if the payload names no model or the named implementation
    /// cannot be resolved; unresolved local names are errors here, same as
    /// on the view path.
    pub async fn handle_comm_open(
        &self,
        channel: Arc<dyn Channel>,
        data: CommOpenData,
    ) -> Result<Arc<Model>> {
        let name = data.model_name.ok_or(WidgetError::MissingModelName)?;
        let ctor = self
            .resolver
            .resolve_model(&name, data.model_module.as_deref())
            .await?;
        debug!("comm_open {}: model {}", channel.id(), name);
        Ok(self.insert_model(channel, ctor, data.state))
    }

    fn insert_model(
        &self,
        channel: Arc<dyn Channel>,
        ctor: ModelCtor,
        initial_state: Value,
    ) -> Arc<Model> {
        let id = channel.id().to_string();
        let widget = ctor(ModelContext {
            comm_id: id.clone(),
            initial_state,
        });
        let model = Model::new(channel, widget, self.weak_self.clone());

        // Destroying the model (channel close, either side) removes it from
        // the table.
        let guard = model.on_destroy({
            let weak = self.weak_self.clone();
            let id = id.clone();
            move || {
                if let Some(manager) = weak.upgrade() {
                    manager.models.lock().unwrap().remove(&id);
                }
            }
        });

        self.models.lock().unwrap().insert(
            id,
            ModelEntry {
                model: model.clone(),
                _close_guard: guard,
            },
        );
        model
    }

    /// The live model with the given comm id.
    pub fn get_model(&self, id: &str) -> Option<Arc<Model>> {
        let models = self.models.lock().unwrap();
        let entry = models.get(id)?;
        // Tolerate an entry whose id drifted from its table key.
        if entry.model.id() != id {
            return None;
        }
        Some(entry.model.clone())
    }

    /// Resolve the cell that originated a message, if any.
    ///
    /// Two tiers: the host surface's execution-tracking index first, then
    /// the per-message callback bundle a widget-initiated round-trip may
    /// have registered with the transport.
    pub fn get_msg_cell(&self, msg_id: &str) -> Option<Arc<dyn Cell>> {
        if let Some(cell) = self.surface.cell_for_message(msg_id) {
            return Some(cell);
        }
        self.transport
            .message_callbacks(msg_id)
            .and_then(|callbacks| callbacks.cell())
    }

    /// Build the callback bundle for messages sent on behalf of `view`.
    ///
    /// Without a cell there is nowhere to route output, so the bundle is an
    /// empty no-op sink.
    pub fn callbacks_for(&self, view: Option<&View>) -> Arc<Callbacks> {
        let Some(cell) = view.and_then(|v| v.cell()) else {
            return Callbacks::empty();
        };
        let output_router = cell.output_router();
        let clear_router = cell.output_router();
        let captured = cell.clone();
        Arc::new(Callbacks {
            on_output: Some(Box::new(move |content| output_router.handle_output(content))),
            on_clear_output: Some(Box::new(move |wait| clear_router.handle_clear_output(wait))),
            get_cell: Some(Box::new(move || Some(captured.clone()))),
        })
    }

    /// Resolve, instantiate, and render a view of `model`.
    pub async fn create_view(&self, model: Arc<Model>, options: ViewOptions) -> Result<Arc<View>> {
        // A nested view always renders in its ancestor's cell: the parent's
        // cell wins over any cell passed alongside it, settled before
        // instantiation.
        let cell = match &options.parent {
            Some(parent) => parent.cell(),
            None => options.cell.clone(),
        };

        let name = model.view_name().ok_or(WidgetError::MissingViewName)?;
        let ctor = self
            .resolver
            .resolve_view(&name, model.view_module().as_deref())
            .await?;

        let widget = ctor(crate::view::ViewContext {
            model: model.clone(),
            cell: cell.clone(),
        });
        View::create(model, cell, widget)
    }

    /// Display a view of `model` in the cell that originated `msg`.
    ///
    /// Resolves the cell from the message's parent id, creates the view,
    /// registers its root element and auxiliary regions with focus capture,
    /// attaches it to the cell's display region, and fires the displayed
    /// notification. Nested views created via [`ViewOptions::parent`] go
    /// through [`WidgetManager::create_view`] directly and do not
    /// re-register with focus capture.
    pub async fn display_view(&self, msg: &Message, model: &Arc<Model>) -> Result<Arc<View>> {
        let parent_id = msg.parent_msg_id().ok_or(WidgetError::NoParentHeader)?;
        let Some(cell) = self.get_msg_cell(parent_id) else {
            warn!("no cell for message {parent_id}; widget not displayed");
            return Err(WidgetError::NoCell {
                msg_id: parent_id.to_string(),
            });
        };

        let view = self
            .create_view(
                model.clone(),
                ViewOptions {
                    cell: Some(cell.clone()),
                    parent: None,
                },
            )
            .await?;

        if view.is_removed() {
            // The model went away while resolution was in flight; the view
            // already tore itself down, so there is nothing to attach.
            debug!("model {} destroyed during view creation", model.id());
            return Ok(view);
        }

        if let Some(element) = view.element() {
            self.focus.register_interactive_region(&element);
            for region in view.interactive_regions() {
                self.focus.register_interactive_region(&region);
            }
            cell.attach(&element);
        }
        view.notify_displayed();
        Ok(view)
    }
}

impl CommHandler for WidgetManager {
    fn on_comm_open(&self, channel: Arc<dyn Channel>, msg: Message) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            let data = CommOpenData::from_message(&msg);
            let comm_id = channel.id().to_string();
            if let Err(err) = self.handle_comm_open(channel, data).await {
                // A failed widget degrades to "not materialized", never
                // fatal to the session.
                warn!("comm_open {comm_id} dropped: {err}");
            }
        })
    }

    fn on_comm_msg(&self, comm_id: &str, content: Value) {
        match self.get_model(comm_id) {
            Some(model) => model.handle_comm_msg(&content),
            None => debug!("comm_msg for unknown comm {comm_id}"),
        }
    }

    fn on_comm_close(&self, comm_id: &str) {
        let entry = self.models.lock().unwrap().remove(comm_id);
        match entry {
            Some(entry) => {
                debug!("comm {comm_id} closed");
                entry.model.fire_destroy();
            }
            None => debug!("comm_close for unknown comm {comm_id}"),
        }
    }
}
