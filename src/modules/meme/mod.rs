pub mod model;
pub mod query;
pub mod repository;
pub mod repository_mem;
pub mod schema;
pub mod service;

pub use model::{Counter, MemePatch, NewMeme};
pub use query::{GridFilter, MemeQuery, SortKey, SortOrder, StatusFilter};
pub use repository::MemeRepository;
pub use repository_mem::MemeStore;
pub use schema::{CardSize, MemeCategory, MemeEntity, MemeFormat, MemeStatus};
pub use service::MemeService;
