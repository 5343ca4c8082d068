/// Outcome of resolving the two holders at startup.
///
/// `session` and `persistent` are the values each holder should contain
/// afterwards; `None` means the slot should be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The credential the gate starts with, equal to `session`
    pub credential: Option<String>,
    pub session: Option<String>,
    pub persistent: Option<String>,
    /// True when the legacy persistent value was moved into the session holder
    pub migrated: bool,
}

/// Decide what the session and persistent holders should contain.
///
/// The persistent holder always ends up empty. A value already in the session
/// holder wins over a legacy one; otherwise the legacy value moves over.
/// Empty strings count as absent. Applying the function to its own output
/// yields the same output.
pub fn resolve_credential(session: Option<&str>, persistent: Option<&str>) -> Resolution {
    let session = session.filter(|v| !v.is_empty());
    let persistent = persistent.filter(|v| !v.is_empty());

    let (resolved, migrated) = match (session, persistent) {
        (Some(current), _) => (Some(current.to_string()), false),
        (None, Some(legacy)) => (Some(legacy.to_string()), true),
        (None, None) => (None, false),
    };

    Resolution {
        credential: resolved.clone(),
        session: resolved,
        persistent: None,
        migrated,
    }
}
