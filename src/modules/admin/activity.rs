use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

use crate::constants::ACTIVITY_LOG_CAPACITY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    pub id: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub action: String,
    pub status: ActivityStatus,
    pub message: String,
    pub user: String,
}

/// System log of the admin panel, newest first, bounded
#[derive(Debug)]
pub struct ActivityLog {
    entries: Mutex<VecDeque<ActivityEntry>>,
    capacity: usize,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::with_capacity(ACTIVITY_LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Mutex::new(VecDeque::with_capacity(capacity)), capacity }
    }

    pub fn record(&self, action: &str, status: ActivityStatus, message: impl Into<String>) {
        let entry = ActivityEntry {
            id: format!("log-{}", Uuid::now_v7()),
            timestamp: chrono::Utc::now(),
            action: action.to_string(),
            status,
            message: message.into(),
            user: "Admin".to_string(),
        };

        match status {
            ActivityStatus::Success => log::info!("[admin] {}: {}", entry.action, entry.message),
            ActivityStatus::Error => log::warn!("[admin] {}: {}", entry.action, entry.message),
        }

        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.push_front(entry);
        entries.truncate(self.capacity);
    }

    pub fn success(&self, action: &str, message: impl Into<String>) {
        self.record(action, ActivityStatus::Success, message);
    }

    pub fn error(&self, action: &str, message: impl Into<String>) {
        self.record(action, ActivityStatus::Error, message);
    }

    pub fn entries(&self) -> Vec<ActivityEntry> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}
