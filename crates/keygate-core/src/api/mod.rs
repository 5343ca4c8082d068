//! REST client for the admin server.
//!
//! `ApiClient` is the credential consumer: it reads the session holder's
//! `admin_api_key` slot when building every request and raises the
//! `unauthorized` signal whenever the server answers 401.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
