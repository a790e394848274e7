use std::sync::{PoisonError, RwLock, RwLockWriteGuard};

use crate::{
    api::error,
    modules::meme::{
        model::{Counter, MemePatch},
        repository::{MemeListener, MemeRepository},
        schema::MemeEntity,
    },
    modules::notify::{ListenerRegistry, StoreEvent, Subscription},
};

/// In-memory meme store. Contents live as long as the process.
pub struct MemeStore {
    memes: RwLock<Vec<MemeEntity>>,
    listeners: ListenerRegistry<[MemeEntity]>,
}

impl MemeStore {
    pub fn new() -> Self {
        Self { memes: RwLock::new(Vec::new()), listeners: ListenerRegistry::new() }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<MemeEntity>> {
        self.memes.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_all(&self) -> Vec<MemeEntity> {
        self.memes.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Broadcast the collection as it is after `event`. The lock is released
    /// before any listener runs.
    fn publish(&self, event: StoreEvent, snapshot: Vec<MemeEntity>) {
        tracing::debug!(
            event = event.name(),
            size = snapshot.len(),
            listeners = self.listeners.len(),
            "Store changed: {:?}",
            event
        );
        self.listeners.notify(&snapshot);
    }
}

impl Default for MemeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemeRepository for MemeStore {
    fn insert(&self, meme: MemeEntity) -> Result<(), error::SystemError> {
        let id = meme.id.clone();
        let snapshot = {
            let mut memes = self.write();
            if memes.iter().any(|existing| existing.id == id) {
                return Err(error::SystemError::conflict(format!("Meme {id} already exists")));
            }
            memes.insert(0, meme);
            memes.clone()
        };

        self.publish(StoreEvent::Added { id }, snapshot);
        Ok(())
    }

    fn update(&self, id: &str, patch: &MemePatch) -> bool {
        let (matched, snapshot) = {
            let mut memes = self.write();
            let matched = match memes.iter_mut().find(|meme| meme.id == id) {
                Some(meme) => {
                    patch.apply_to(meme);
                    true
                }
                None => false,
            };
            (matched, memes.clone())
        };

        self.publish(StoreEvent::Updated { id: id.to_string(), matched }, snapshot);
        matched
    }

    fn increment(&self, id: &str, counter: Counter) -> Option<u64> {
        let (value, snapshot) = {
            let mut memes = self.write();
            let value = memes.iter_mut().find(|meme| meme.id == id).map(|meme| {
                let slot = match counter {
                    Counter::Views => &mut meme.view_count,
                    Counter::Downloads => &mut meme.download_count,
                };
                *slot = slot.saturating_add(1);
                *slot
            });
            (value, memes.clone())
        };

        self.publish(StoreEvent::CounterBumped { id: id.to_string(), counter, value }, snapshot);
        value
    }

    fn delete_many(&self, ids: &[String]) -> usize {
        let (removed, snapshot) = {
            let mut memes = self.write();
            let before = memes.len();
            memes.retain(|meme| !ids.contains(&meme.id));
            (before - memes.len(), memes.clone())
        };

        self.publish(StoreEvent::Deleted { ids: ids.to_vec(), removed }, snapshot);
        removed
    }

    fn find_by_id(&self, id: &str) -> Option<MemeEntity> {
        self.memes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|meme| meme.id == id)
            .cloned()
    }

    fn find_all(&self) -> Vec<MemeEntity> {
        self.read_all()
    }

    fn count(&self) -> usize {
        self.memes.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn subscribe(&self, listener: MemeListener) -> Subscription {
        self.listeners.subscribe(move |memes: &[MemeEntity]| listener(memes))
    }
}
