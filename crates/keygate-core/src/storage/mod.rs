//! String-keyed slot stores for the admin credential.
//!
//! Two holders coexist in hosted mode:
//! - a session-scoped holder (`MemoryStore`), alive for the process lifetime
//! - a legacy persistent holder (`FileStore` or `KeyringStore`), only read
//!   once at mount to migrate an old credential into the session holder
//!
//! Both use the same slot key, `ADMIN_API_KEY_SLOT`.

pub mod file;
pub mod keychain;
pub mod memory;

use anyhow::Result;

pub use self::file::FileStore;
pub use self::keychain::KeyringStore;
pub use self::memory::MemoryStore;

/// Slot holding the raw admin credential in every store.
pub const ADMIN_API_KEY_SLOT: &str = "admin_api_key";

/// A string-keyed holder of string values.
///
/// Removing an absent key must succeed.
pub trait SlotStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Read a slot, treating an empty string the same as a missing value.
    fn get_non_empty(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key)?.filter(|v| !v.is_empty()))
    }
}
