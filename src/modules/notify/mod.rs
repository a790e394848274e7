/// Change notification
///
/// - `registry`: ordered listener registry with unsubscribe handles
/// - `events`: the mutation kinds broadcast by the store
pub mod events;
pub mod registry;

pub use events::StoreEvent;
pub use registry::{ListenerRegistry, Subscription};
