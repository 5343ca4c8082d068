//! Core library for keygate.
//!
//! keygate puts a credential gate in front of the hosted (browser, Docker,
//! headless) admin mode of the account manager. This crate holds everything
//! that is not presentation:
//!
//! - `auth`: the `SessionGate` state machine and credential resolution
//! - `storage`: string-keyed slot stores (session-scoped and persistent)
//! - `events`: the process-wide `unauthorized` signal
//! - `api`: the request layer that reads the credential slot
//! - `locale`: the closed set of UI locales and the active-locale setting
//! - `config`: on-disk configuration and execution mode

pub mod api;
pub mod auth;
pub mod config;
pub mod events;
pub mod locale;
pub mod mode;
pub mod models;
pub mod storage;

pub use api::{ApiClient, ApiError};
pub use auth::{
    resolve_credential, Credential, GateState, GateView, Reloader, Resolution, SessionGate,
    SubmitOutcome,
};
pub use config::{Config, PersistentBackend};
pub use events::{UnauthorizedSignal, UnauthorizedSubscription};
pub use locale::{Locale, LocalePicker, LocaleSetting};
pub use mode::ExecutionMode;
pub use models::AccountSummary;
pub use storage::{FileStore, KeyringStore, MemoryStore, SlotStore, ADMIN_API_KEY_SLOT};
