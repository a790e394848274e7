/// Store Events
///
/// Describes which mutation triggered a broadcast. Listeners always receive
/// the full collection; the event is used for diagnostics.
use crate::modules::meme::model::Counter;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// A meme was prepended to the collection
    Added { id: String },
    /// A patch was applied (or ignored because the id was unknown)
    Updated { id: String, matched: bool },
    /// One or more memes were removed
    Deleted { ids: Vec<String>, removed: usize },
    /// A view or download counter was bumped
    CounterBumped { id: String, counter: Counter, value: Option<u64> },
}

impl StoreEvent {
    pub fn name(&self) -> &'static str {
        match self {
            StoreEvent::Added { .. } => "added",
            StoreEvent::Updated { .. } => "updated",
            StoreEvent::Deleted { .. } => "deleted",
            StoreEvent::CounterBumped { .. } => "counter-bumped",
        }
    }
}
