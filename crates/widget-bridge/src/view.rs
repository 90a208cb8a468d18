//! Widget views: renderings of a model bound to a cell.
//!
//! A [`View`] wraps a widget view implementation resolved by name, the cell
//! it renders into, and the destroy subscription tying it to its model. The
//! model does not own its views; the subscription is the only link, and it
//! is cancelled if the view is discarded first.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::cell::{Cell, Element};
use crate::error::{Result, WidgetError};
use crate::lifecycle::Subscription;
use crate::model::Model;

/// Context handed to a view constructor at instantiation.
pub struct ViewContext {
    pub model: Arc<Model>,
    pub cell: Option<Arc<dyn Cell>>,
}

/// A widget view implementation, registered by name.
pub trait WidgetView: Send + Sync {
    /// Produce the view's rendered element.
    fn render(&mut self) -> anyhow::Result<Arc<dyn Element>>;

    /// Auxiliary elements that should capture focus in addition to the
    /// rendered root.
    fn interactive_regions(&self) -> Vec<Arc<dyn Element>> {
        Vec::new()
    }

    /// Called exactly once, after the rendered element is attached to a
    /// cell's display region.
    fn on_displayed(&mut self) {}

    /// Tear down. Called when the model is destroyed, or at most once via
    /// [`View::remove`].
    fn on_remove(&mut self) {}
}

/// Options for view creation.
#[derive(Default, Clone)]
pub struct ViewOptions {
    pub cell: Option<Arc<dyn Cell>>,
    /// Nested views always render in their parent's cell; setting this
    /// overrides `cell`.
    pub parent: Option<Arc<View>>,
}

/// A live rendering of a model.
pub struct View {
    model: Arc<Model>,
    cell: Option<Arc<dyn Cell>>,
    widget: Mutex<Box<dyn WidgetView>>,
    element: Mutex<Option<Arc<dyn Element>>>,
    removed: AtomicBool,
    displayed: AtomicBool,
    destroy_guard: Mutex<Option<Subscription>>,
}

impl std::fmt::Debug for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View")
            .field("model", &self.model.id())
            .field("removed", &self.is_removed())
            .finish_non_exhaustive()
    }
}

impl View {
    /// Wrap an instantiated widget view, render it, and link removal to the
    /// model's destroy event.
    ///
    /// If the model was destroyed while view resolution was in flight, the
    /// destroy hook runs immediately and the view comes back already
    /// removed. Creation is never cancelled; late completions tear down on
    /// arrival.
    pub(crate) fn create(
        model: Arc<Model>,
        cell: Option<Arc<dyn Cell>>,
        widget: Box<dyn WidgetView>,
    ) -> Result<Arc<Self>> {
        let view = Arc::new(View {
            model: model.clone(),
            cell,
            widget: Mutex::new(widget),
            element: Mutex::new(None),
            removed: AtomicBool::new(false),
            displayed: AtomicBool::new(false),
            destroy_guard: Mutex::new(None),
        });

        let element = view
            .widget
            .lock()
            .unwrap()
            .render()
            .map_err(WidgetError::Render)?;
        *view.element.lock().unwrap() = Some(element);

        let weak = Arc::downgrade(&view);
        let guard = model.on_destroy(move || {
            if let Some(view) = weak.upgrade() {
                view.remove();
            }
        });
        *view.destroy_guard.lock().unwrap() = Some(guard);

        Ok(view)
    }

    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    pub fn cell(&self) -> Option<Arc<dyn Cell>> {
        self.cell.clone()
    }

    /// The rendered root element. Present on every view returned by the
    /// factory; absent only mid-construction.
    pub fn element(&self) -> Option<Arc<dyn Element>> {
        self.element.lock().unwrap().clone()
    }

    pub fn interactive_regions(&self) -> Vec<Arc<dyn Element>> {
        self.widget.lock().unwrap().interactive_regions()
    }

    /// Tear the view down. Idempotent; also runs when the model is
    /// destroyed.
    pub fn remove(&self) {
        if self.removed.swap(true, Ordering::SeqCst) {
            return;
        }
        // The destroy hook has served its purpose (or is being cancelled
        // because the view goes away first).
        self.destroy_guard.lock().unwrap().take();
        self.widget.lock().unwrap().on_remove();
    }

    pub fn is_removed(&self) -> bool {
        self.removed.load(Ordering::SeqCst)
    }

    /// Fire the widget's displayed notification, exactly once.
    pub(crate) fn notify_displayed(&self) {
        if !self.displayed.swap(true, Ordering::SeqCst) {
            self.widget.lock().unwrap().on_displayed();
        }
    }
}
