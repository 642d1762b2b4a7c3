use super::{ChangeSink, ResourceEventHandler};
use crate::resource::ConfigMap;

/// Adapts ConfigMap events: `data` is the text map, `binaryData` the binary one.
#[derive(Clone)]
pub struct ConfigMapHandler {
    sink: ChangeSink,
}

impl ConfigMapHandler {
    pub fn new(sink: ChangeSink) -> Self {
        Self { sink }
    }
}

impl ResourceEventHandler<ConfigMap> for ConfigMapHandler {
    fn on_add(&self, obj: &ConfigMap, is_initial_list: bool) {
        self.sink.added(obj, is_initial_list);
    }

    fn on_update(&self, old: &ConfigMap, new: &ConfigMap) {
        self.sink.updated(old, new);
    }

    fn on_delete(&self, obj: &ConfigMap) {
        self.sink.deleted(obj);
    }
}
