//! The session gate.
//!
//! In hosted mode the gate only lets the protected UI render while the
//! session holder contains a credential. It migrates a legacy credential out
//! of the persistent holder at mount, accepts new credentials from the login
//! form, and wipes both holders whenever the `unauthorized` signal fires.
//! In desktop mode it always passes and never touches storage.

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::events::{UnauthorizedSignal, UnauthorizedSubscription};
use crate::mode::ExecutionMode;
use crate::storage::{SlotStore, ADMIN_API_KEY_SLOT};

use super::credential::Credential;
use super::resolve::resolve_credential;

/// Whether the protected UI may render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    Unauthenticated,
    Authenticated,
}

impl GateState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, GateState::Authenticated)
    }
}

/// What the wrapping capability produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateView<T> {
    /// The protected subtree, built because the gate passed
    Protected(T),
    /// The credential-entry view must be shown instead
    Blocked,
}

/// Result of a login form submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input; nothing was written and no reload was requested
    Rejected,
    /// Credential stored and a full reload requested
    Accepted,
    /// Desktop mode, the form does not apply
    Ignored,
}

/// Rebuilds every already-initialized collaborator so they pick up a new
/// credential. Implemented by the composition root.
pub trait Reloader: Send + Sync {
    fn reload(&self);
}

pub struct SessionGate {
    mode: ExecutionMode,
    session: Arc<dyn SlotStore>,
    persistent: Arc<dyn SlotStore>,
    reloader: Arc<dyn Reloader>,
    signals: UnauthorizedSubscription,
}

impl SessionGate {
    /// Mount the gate.
    ///
    /// Hosted mode resolves the two holders first, moving a legacy credential
    /// into the session holder. The gate subscribes to `signal` for as long as
    /// it lives.
    pub fn mount(
        mode: ExecutionMode,
        session: Arc<dyn SlotStore>,
        persistent: Arc<dyn SlotStore>,
        signal: &UnauthorizedSignal,
        reloader: Arc<dyn Reloader>,
    ) -> Result<Self> {
        let gate = Self {
            mode,
            session,
            persistent,
            reloader,
            signals: signal.subscribe(),
        };

        if mode.is_desktop() {
            debug!("Desktop mode, gate bypassed");
            return Ok(gate);
        }

        gate.migrate_legacy()?;
        Ok(gate)
    }

    fn migrate_legacy(&self) -> Result<()> {
        let current = self.session.get(ADMIN_API_KEY_SLOT)?;
        let legacy = match self.persistent.get(ADMIN_API_KEY_SLOT) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Legacy credential holder unreadable, skipping migration");
                None
            }
        };

        let resolution = resolve_credential(current.as_deref(), legacy.as_deref());

        if resolution.session != current {
            match resolution.session.as_deref() {
                Some(value) => self.session.set(ADMIN_API_KEY_SLOT, value)?,
                None => self.session.remove(ADMIN_API_KEY_SLOT)?,
            }
        }
        if legacy.is_some() {
            self.clear_legacy();
        }

        if resolution.migrated {
            info!("Migrated legacy admin credential into session storage");
        } else if legacy.is_some() {
            debug!("Dropped legacy admin credential, session already holds one");
        }
        debug!(
            has_credential = resolution.credential.is_some(),
            "Credential resolution applied"
        );
        Ok(())
    }

    /// Empty the legacy holder. Failures are logged, never returned.
    fn clear_legacy(&self) {
        if let Err(e) = self.persistent.remove(ADMIN_API_KEY_SLOT) {
            warn!(error = %e, "Failed to clear legacy credential holder");
        }
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Current state, re-derived from the session holder on every call.
    pub fn state(&self) -> Result<GateState> {
        if self.mode.is_desktop() {
            return Ok(GateState::Authenticated);
        }
        let state = match self.session.get_non_empty(ADMIN_API_KEY_SLOT)? {
            Some(_) => GateState::Authenticated,
            None => GateState::Unauthenticated,
        };
        Ok(state)
    }

    /// Handle a login form submission.
    pub fn submit(&self, input: &str) -> Result<SubmitOutcome> {
        if self.mode.is_desktop() {
            return Ok(SubmitOutcome::Ignored);
        }
        let Some(credential) = Credential::parse(input) else {
            debug!("Blank credential submitted, ignoring");
            return Ok(SubmitOutcome::Rejected);
        };

        self.session.set(ADMIN_API_KEY_SLOT, credential.expose())?;
        self.clear_legacy();
        info!("Admin credential accepted, reloading");

        self.reloader.reload();
        Ok(SubmitOutcome::Accepted)
    }

    /// Wipe both holders after the backend rejected the credential.
    /// Safe to call any number of times.
    pub fn handle_unauthorized(&self) -> Result<()> {
        if self.mode.is_desktop() {
            debug!("Unauthorized signal ignored in desktop mode");
            return Ok(());
        }
        self.session.remove(ADMIN_API_KEY_SLOT)?;
        self.clear_legacy();
        info!("Admin credential cleared after unauthorized response");
        Ok(())
    }

    /// Apply every unauthorized signal raised since the last poll.
    /// Returns how many were seen.
    pub fn poll_signals(&mut self) -> Result<usize> {
        let seen = self.signals.drain();
        if seen > 0 {
            if seen > 1 {
                warn!(count = seen, "Multiple unauthorized signals since last poll");
            }
            self.handle_unauthorized()?;
        }
        Ok(seen)
    }

    /// Build the protected subtree only if the gate passes.
    ///
    /// `protected` is not called at all while unauthenticated.
    pub fn view<T>(&self, protected: impl FnOnce() -> T) -> Result<GateView<T>> {
        if self.state()?.is_authenticated() {
            Ok(GateView::Protected(protected()))
        } else {
            Ok(GateView::Blocked)
        }
    }
}
