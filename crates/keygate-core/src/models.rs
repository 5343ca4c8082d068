use serde::{Deserialize, Serialize};

/// One managed account as listed by the admin server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub proxy_disabled: bool,
}

impl AccountSummary {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.email)
    }

    pub fn status_label(&self) -> &'static str {
        if self.disabled {
            "disabled"
        } else if self.proxy_disabled {
            "proxy off"
        } else {
            "active"
        }
    }
}

/// The admin server wraps lists in an `accounts` field; older builds return
/// a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum AccountsResponse {
    Wrapped { accounts: Vec<AccountSummary> },
    Bare(Vec<AccountSummary>),
}

impl AccountsResponse {
    pub(crate) fn into_accounts(self) -> Vec<AccountSummary> {
        match self {
            AccountsResponse::Wrapped { accounts } => accounts,
            AccountsResponse::Bare(accounts) => accounts,
        }
    }
}
