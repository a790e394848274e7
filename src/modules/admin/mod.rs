pub mod activity;
pub mod pin;
pub mod session;

pub use activity::{ActivityEntry, ActivityLog, ActivityStatus};
pub use pin::PinPrompt;
pub use session::{ActivityKind, AdminGate, SessionConfig};
