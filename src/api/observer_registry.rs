use tracing::debug;

use crate::error::{ChartError, ChartResult};
use crate::extensions::ChartObserver;
use crate::render::Renderer;

use super::{ChartController, DataSource};

impl<R: Renderer, S: DataSource> ChartController<R, S> {
    /// Adds `observer` after the ones already registered. Ids must be
    /// non-empty and unique.
    pub fn register_observer(&mut self, observer: Box<dyn ChartObserver>) -> ChartResult<()> {
        match observer.id() {
            "" => Err(ChartError::InvalidData(
                "observer id must not be empty".to_owned(),
            )),
            id if self.has_observer(id) => Err(ChartError::InvalidData(format!(
                "observer `{id}` is already registered"
            ))),
            id => {
                debug!(observer = id, position = self.observers.len(), "register observer");
                self.observers.push(observer);
                Ok(())
            }
        }
    }

    /// Returns `true` when an observer with `observer_id` was removed.
    pub fn unregister_observer(&mut self, observer_id: &str) -> bool {
        if !self.has_observer(observer_id) {
            return false;
        }
        self.observers.retain(|observer| observer.id() != observer_id);
        debug!(observer = observer_id, "unregister observer");
        true
    }

    /// Registered ids in dispatch order.
    pub fn observer_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.observers.iter().map(|observer| observer.id())
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn has_observer(&self, observer_id: &str) -> bool {
        self.observer_ids().any(|id| id == observer_id)
    }
}
