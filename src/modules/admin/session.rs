/// Admin Session Gate
///
/// One PIN unlocks the admin panel. The session locks itself again after a
/// period without user activity (30 minutes by default); any pointer, key,
/// scroll or touch activity while unlocked pushes the deadline back.
/// Locking never touches the meme store.
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

use crate::api::error;
use crate::modules::admin::activity::ActivityLog;
use crate::utils::{hash_password, verify_password};
use crate::ENV;

pub const INVALID_PIN_MESSAGE: &str = "Invalid PIN. Please try again.";

/// User interactions that count as activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    PointerDown,
    PointerMove,
    KeyPress,
    Scroll,
    TouchStart,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub timeout: Duration,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        Self { timeout: Duration::from_secs(ENV.session_timeout_secs) }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30 * 60) }
    }
}

pub struct AdminGate {
    pin_hash: String,
    config: SessionConfig,
    /// Inactivity deadline of the open session, `None` while locked
    deadline: Mutex<Option<Instant>>,
    log: ActivityLog,
}

impl AdminGate {
    /// The PIN is only kept as an argon2 hash
    pub fn new(pin: &str, config: SessionConfig) -> Result<Self, error::SystemError> {
        Ok(Self {
            pin_hash: hash_password(pin)?,
            config,
            deadline: Mutex::new(None),
            log: ActivityLog::new(),
        })
    }

    pub fn from_env() -> Result<Self, error::SystemError> {
        Self::new(&ENV.admin_pin, SessionConfig::from_env())
    }

    pub fn activity_log(&self) -> &ActivityLog {
        &self.log
    }

    fn state(&self) -> MutexGuard<'_, Option<Instant>> {
        self.deadline.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Check the PIN. A mismatch is reported and can be retried at will.
    pub fn login(&self, pin: &str) -> Result<(), error::SystemError> {
        if !verify_password(&self.pin_hash, pin)? {
            self.log.error("Authentication failed", "PIN mismatch");
            return Err(error::SystemError::unauthorized(INVALID_PIN_MESSAGE));
        }

        *self.state() = Some(Instant::now() + self.config.timeout);
        self.log.success("User authenticated", "PIN authentication successful");
        Ok(())
    }

    pub fn logout(&self) {
        let was_open = self.state().take().is_some();
        if was_open {
            self.log.success("User logged out", "Session ended");
        }
    }

    /// True while a session is open and its deadline has not passed. An
    /// expired session is locked on the spot.
    pub fn is_authenticated(&self) -> bool {
        let mut state = self.state();
        let Some(deadline) = *state else {
            return false;
        };
        if Instant::now() < deadline {
            return true;
        }

        *state = None;
        drop(state);
        tracing::info!("Admin session expired after inactivity");
        self.log.success("Session expired", "Logged out after inactivity");
        false
    }

    /// Push the deadline back. Ignored while locked.
    pub fn record_activity(&self, kind: ActivityKind) -> bool {
        if !self.is_authenticated() {
            return false;
        }
        let mut state = self.state();
        if let Some(deadline) = state.as_mut() {
            *deadline = Instant::now() + self.config.timeout;
            tracing::trace!("Session extended by {:?}", kind);
            return true;
        }
        false
    }

    /// Time left before the session locks
    pub fn remaining(&self) -> Option<Duration> {
        if !self.is_authenticated() {
            return None;
        }
        let deadline = *self.state();
        deadline.map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Wall clock time at which the session will lock if nothing happens
    pub fn session_expiry(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        let remaining = chrono::Duration::from_std(self.remaining()?).ok()?;
        Some(chrono::Utc::now() + remaining)
    }

    /// Lock the gate as soon as the deadline passes. The task ends once the
    /// gate is locked, by timeout or by logout.
    pub fn spawn_expiry_watcher(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let gate = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                let Some(deadline) = *gate.state() else {
                    break;
                };
                tokio::time::sleep_until(deadline).await;
                if !gate.is_authenticated() {
                    break;
                }
            }
            tracing::debug!("Session watcher stopped");
        })
    }
}
