//! Resource event adapters.
//!
//! The event source is polymorphic over resource kind while the
//! materializer is not. Each adapter turns a typed add/update/delete
//! notification into materializer calls and fires the change callback
//! when the tree on disk actually changed.

pub mod configmap;
pub mod secret;

use std::sync::Arc;

use log::info;

use crate::resource::Resource;
use crate::storage::FileMaterializer;

pub use configmap::ConfigMapHandler;
pub use secret::SecretHandler;

/// Invoked after an event changed at least one file.
pub trait ChangeCallback: Send + Sync {
    fn on_change(&self);
}

impl<F> ChangeCallback for F
where
    F: Fn() + Send + Sync,
{
    fn on_change(&self) {
        self()
    }
}

/// The three callbacks an event source delivers for one resource kind.
pub trait ResourceEventHandler<K: Resource>: Send + Sync {
    fn on_add(&self, obj: &K, is_initial_list: bool);
    fn on_update(&self, old: &K, new: &K);
    fn on_delete(&self, obj: &K);
}

/// Shared materializer plus the callback to fire on change. Cheap to clone;
/// both adapters hold one pointing at the same materializer.
#[derive(Clone)]
pub struct ChangeSink {
    materializer: Arc<FileMaterializer>,
    callback: Arc<dyn ChangeCallback>,
}

impl ChangeSink {
    pub fn new(materializer: Arc<FileMaterializer>, callback: Arc<dyn ChangeCallback>) -> Self {
        Self {
            materializer,
            callback,
        }
    }

    fn added<K: Resource>(&self, obj: &K, is_initial_list: bool) {
        let meta = obj.metadata();
        info!("Adding {} {}", K::KIND, meta.qualified_name());
        self.fire_if(self.materializer.on_add(meta, &obj.payload(), is_initial_list));
    }

    fn updated<K: Resource>(&self, old: &K, new: &K) {
        let meta = new.metadata();
        info!("Updating {} {}", K::KIND, meta.qualified_name());
        self.fire_if(self.materializer.on_update(meta, &old.payload(), &new.payload()));
    }

    fn deleted<K: Resource>(&self, obj: &K) {
        let meta = obj.metadata();
        info!("Deleting {} {}", K::KIND, meta.qualified_name());
        self.fire_if(self.materializer.on_delete(meta, &obj.payload()));
    }

    fn fire_if(&self, changed: bool) {
        if changed {
            self.callback.on_change();
        }
    }
}
