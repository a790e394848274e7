//! Line-oriented console standing in for the browser views: `route` parses
//! a line into a `Command`, `handle` runs it against the shared context.
pub mod handle;
pub mod route;

pub use handle::{handle, Reply};
pub use route::{Command, HELP};
