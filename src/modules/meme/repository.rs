use crate::{
    api::error,
    modules::meme::{
        model::{Counter, MemePatch},
        schema::MemeEntity,
    },
    modules::notify::Subscription,
};

pub type MemeListener = Box<dyn Fn(&[MemeEntity]) + Send + Sync>;

/// Canonical meme collection. Every mutating call broadcasts the full
/// collection to the subscribed listeners, whether or not it matched anything.
pub trait MemeRepository {
    /// Prepend a meme. Fails with `Conflict` when the id is already taken.
    fn insert(&self, meme: MemeEntity) -> Result<(), error::SystemError>;

    /// Merge `patch` into the meme with `id`. Returns false if no meme matched.
    fn update(&self, id: &str, patch: &MemePatch) -> bool;

    /// Add one to a counter, returning the new value if the meme exists
    fn increment(&self, id: &str, counter: Counter) -> Option<u64>;

    /// Remove every meme whose id is in `ids`, returning how many were removed
    fn delete_many(&self, ids: &[String]) -> usize;

    fn find_by_id(&self, id: &str) -> Option<MemeEntity>;

    /// Snapshot of the collection, newest insert first
    fn find_all(&self) -> Vec<MemeEntity>;

    fn count(&self) -> usize;

    fn subscribe(&self, listener: MemeListener) -> Subscription;
}
