use super::{ChangeSink, ResourceEventHandler};
use crate::resource::Secret;

/// Adapts Secret events: `stringData` is the text map, `data` the binary one.
#[derive(Clone)]
pub struct SecretHandler {
    sink: ChangeSink,
}

impl SecretHandler {
    pub fn new(sink: ChangeSink) -> Self {
        Self { sink }
    }
}

impl ResourceEventHandler<Secret> for SecretHandler {
    fn on_add(&self, obj: &Secret, is_initial_list: bool) {
        self.sink.added(obj, is_initial_list);
    }

    fn on_update(&self, old: &Secret, new: &Secret) {
        self.sink.updated(old, new);
    }

    fn on_delete(&self, obj: &Secret) {
        self.sink.deleted(obj);
    }
}
