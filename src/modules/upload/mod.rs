pub mod model;
pub mod probe;
pub mod schema;
pub mod service;

pub use model::{UploadConfig, UploadFile};
pub use probe::{MediaProbe, SimulatedProbe};
pub use schema::{ProbedMedia, UploadProgress, UploadStage};
pub use service::UploadService;
