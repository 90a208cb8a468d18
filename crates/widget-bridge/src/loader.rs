//! Dynamic module loading seam.
//!
//! Some widget implementations live outside the local registry and are
//! fetched on demand by name. Loading is an opaque asynchronous lookup
//! producing a bag of named exports; locating modules, caching, and
//! de-duplicating concurrent loads for the same name are all the loader's
//! concern, not this crate's.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::registry::{ModelCtor, ViewCtor};

/// The named model and view constructors exported by a loaded module.
#[derive(Default)]
pub struct ModuleExports {
    models: HashMap<String, ModelCtor>,
    views: HashMap<String, ViewCtor>,
}

impl ModuleExports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn export_model(mut self, name: impl Into<String>, ctor: ModelCtor) -> Self {
        self.models.insert(name.into(), ctor);
        self
    }

    pub fn export_view(mut self, name: impl Into<String>, ctor: ViewCtor) -> Self {
        self.views.insert(name.into(), ctor);
        self
    }

    pub fn model(&self, name: &str) -> Option<ModelCtor> {
        self.models.get(name).cloned()
    }

    pub fn view(&self, name: &str) -> Option<ViewCtor> {
        self.views.get(name).cloned()
    }
}

/// Asynchronous module lookup by name.
pub trait ModuleLoader: Send + Sync {
    /// Load the named module, failing if it cannot be located.
    fn load(&self, module: &str) -> BoxFuture<'_, anyhow::Result<Arc<ModuleExports>>>;
}
