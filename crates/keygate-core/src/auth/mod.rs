//! Authentication module for the hosted admin mode.
//!
//! This module provides:
//! - `SessionGate`: decides whether the protected UI may render
//! - `resolve_credential`: the one-time migration out of the legacy holder
//! - `Credential`: the validated, non-empty admin API key
//!
//! Authentication state is never stored; it is derived from the session
//! holder every time it is asked for.

pub mod credential;
pub mod gate;
pub mod resolve;

pub use credential::Credential;
pub use gate::{GateState, GateView, Reloader, SessionGate, SubmitOutcome};
pub use resolve::{resolve_credential, Resolution};
