//! Name-to-constructor registry for widget model and view implementations.
//!
//! The registry is an explicit, injectable object shared by reference between
//! managers; there is no ambient global table. Model and view names live in
//! independent namespaces. Registration performs no validation of the
//! constructor; a bad constructor only surfaces at instantiation time.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::model::{ModelContext, WidgetModel};
use crate::view::{ViewContext, WidgetView};

/// Constructor for a widget model implementation.
pub type ModelCtor = Arc<dyn Fn(ModelContext) -> Box<dyn WidgetModel> + Send + Sync>;

/// Constructor for a widget view implementation.
pub type ViewCtor = Arc<dyn Fn(ViewContext) -> Box<dyn WidgetView> + Send + Sync>;

/// Registry of locally available model and view constructors.
///
/// The last registration for a given name wins; entries persist for the
/// registry's lifetime (there is no removal operation).
#[derive(Default)]
pub struct TypeRegistry {
    models: Mutex<HashMap<String, ModelCtor>>,
    views: Mutex<HashMap<String, ViewCtor>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_model(&self, name: impl Into<String>, ctor: ModelCtor) {
        self.models.lock().unwrap().insert(name.into(), ctor);
    }

    pub fn register_view(&self, name: impl Into<String>, ctor: ViewCtor) {
        self.views.lock().unwrap().insert(name.into(), ctor);
    }

    pub fn lookup_model(&self, name: &str) -> Option<ModelCtor> {
        self.models.lock().unwrap().get(name).cloned()
    }

    pub fn lookup_view(&self, name: &str) -> Option<ViewCtor> {
        self.views.lock().unwrap().get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StateModel;

    fn tagged_ctor(tag: &str) -> ModelCtor {
        let tag = tag.to_string();
        Arc::new(move |_ctx| {
            Box::new(StateModel::new(serde_json::json!({ "tag": tag.clone() })))
                as Box<dyn WidgetModel>
        })
    }

    #[test]
    fn test_lookup_unregistered_is_none() {
        let registry = TypeRegistry::new();
        assert!(registry.lookup_model("Missing").is_none());
        assert!(registry.lookup_view("Missing").is_none());
    }

    #[test]
    fn test_last_registration_wins() {
        let registry = TypeRegistry::new();
        registry.register_model("M", tagged_ctor("first"));
        registry.register_model("M", tagged_ctor("second"));

        let ctor = registry.lookup_model("M").unwrap();
        let model = ctor(ModelContext {
            comm_id: "c1".to_string(),
            initial_state: serde_json::Value::Null,
        });
        assert_eq!(model.state()["tag"], "second");
    }
}
