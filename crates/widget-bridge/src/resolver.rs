//! Constructor resolution shared by the model and view factories.
//!
//! Resolution is a two-branch strategy with identical semantics for both
//! namespaces: a name with a declared module goes through the asynchronous
//! module loader and the named export is extracted; a name alone is looked up
//! in the local registry. Both branches report failures as typed errors,
//! for models and views alike.

use std::sync::Arc;

use crate::error::{Result, WidgetError};
use crate::loader::ModuleLoader;
use crate::registry::{ModelCtor, TypeRegistry, ViewCtor};

pub(crate) struct TypeResolver {
    registry: Arc<TypeRegistry>,
    loader: Arc<dyn ModuleLoader>,
}

impl TypeResolver {
    pub(crate) fn new(registry: Arc<TypeRegistry>, loader: Arc<dyn ModuleLoader>) -> Self {
        TypeResolver { registry, loader }
    }

    pub(crate) fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    pub(crate) async fn resolve_model(
        &self,
        name: &str,
        module: Option<&str>,
    ) -> Result<ModelCtor> {
        match module {
            Some(module) => {
                let exports = self.load(module).await?;
                exports.model(name).ok_or_else(|| WidgetError::UnknownModel {
                    name: name.to_string(),
                    module: Some(module.to_string()),
                })
            }
            None => self
                .registry
                .lookup_model(name)
                .ok_or_else(|| WidgetError::UnknownModel {
                    name: name.to_string(),
                    module: None,
                }),
        }
    }

    pub(crate) async fn resolve_view(&self, name: &str, module: Option<&str>) -> Result<ViewCtor> {
        match module {
            Some(module) => {
                let exports = self.load(module).await?;
                exports.view(name).ok_or_else(|| WidgetError::UnknownView {
                    name: name.to_string(),
                    module: Some(module.to_string()),
                })
            }
            None => self
                .registry
                .lookup_view(name)
                .ok_or_else(|| WidgetError::UnknownView {
                    name: name.to_string(),
                    module: None,
                }),
        }
    }

    async fn load(&self, module: &str) -> Result<Arc<crate::loader::ModuleExports>> {
        self.loader
            .load(module)
            .await
            .map_err(|source| WidgetError::ModuleLoad {
                module: module.to_string(),
                source,
            })
    }
}
