use std::sync::Arc;

use sidechat_common::{EventBus, StoreId};

use crate::types::Turn;

const HISTORY_BUS_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryChange {
    /// Full snapshot after the mutation.
    Updated(Vec<Turn>),
    Cleared,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEvent {
    pub key: String,
    pub origin: StoreId,
    pub change: HistoryChange,
}

impl HistoryEvent {
    /// Turns the event leaves behind in a mirroring store.
    pub fn turns(&self) -> &[Turn] {
        match &self.change {
            HistoryChange::Updated(turns) => turns,
            HistoryChange::Cleared => &[],
        }
    }
}

pub type HistoryBus = Arc<EventBus<HistoryEvent>>;

pub fn new_history_bus() -> HistoryBus {
    Arc::new(EventBus::new(HISTORY_BUS_CAPACITY))
}
