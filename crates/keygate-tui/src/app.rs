//! Application state management for keygate.
//!
//! `Root` is the composition root: it owns everything that must outlive an
//! application reload (session holder, unauthorized signal, active locale,
//! reload flag). `App` owns the collaborators that are rebuilt on reload
//! (session gate, API client, UI state).

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use keygate_core::auth::credential::can_add_credential_char;
use keygate_core::config::CONFIG_FILE;
use keygate_core::{
    AccountSummary, ApiClient, ApiError, Config, FileStore, GateState, KeyringStore, Locale,
    LocalePicker, LocaleSetting, MemoryStore, PersistentBackend, Reloader, SessionGate,
    SlotStore, SubmitOutcome, UnauthorizedSignal,
};

use crate::texts::{login_texts, LoginTexts};

// ============================================================================
// Constants
// ============================================================================

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Buffer size for background refresh results
const CHANNEL_BUFFER_SIZE: usize = 8;

/// What a background accounts fetch sends back
type AccountsResult = Result<Vec<AccountSummary>, ApiError>;

// ============================================================================
// Composition root
// ============================================================================

/// Set by the gate when a new credential is accepted; the main loop
/// rebuilds the `App` when it sees it.
#[derive(Debug, Clone, Default)]
pub struct ReloadFlag(Arc<AtomicBool>);

impl ReloadFlag {
    /// Returns true once per requested reload
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

impl Reloader for ReloadFlag {
    fn reload(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Process-lifetime services shared by every `App` instance
pub struct Root {
    pub config: Config,
    pub data_dir: PathBuf,
    pub session: MemoryStore,
    pub signal: UnauthorizedSignal,
    pub locale: LocaleSetting,
    pub reload: ReloadFlag,
}

impl Root {
    pub fn new(config: Config, data_dir: PathBuf) -> Self {
        let locale = LocaleSetting::new(config.language);
        Self {
            config,
            data_dir,
            session: MemoryStore::new(),
            signal: UnauthorizedSignal::new(),
            locale,
            reload: ReloadFlag::default(),
        }
    }

    /// The legacy holder selected in configuration
    pub fn persistent_store(&self) -> Arc<dyn SlotStore> {
        match self.config.persistent_backend {
            PersistentBackend::File => Arc::new(FileStore::in_dir(&self.data_dir)),
            PersistentBackend::Keyring => Arc::new(KeyringStore::default()),
        }
    }
}

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Key,
    Button,
    Language,
}

impl LoginFocus {
    pub fn next(&self) -> Self {
        match self {
            LoginFocus::Key => LoginFocus::Button,
            LoginFocus::Button => LoginFocus::Language,
            LoginFocus::Language => LoginFocus::Key,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            LoginFocus::Key => LoginFocus::Language,
            LoginFocus::Button => LoginFocus::Key,
            LoginFocus::Language => LoginFocus::Button,
        }
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    // Core services
    pub config: Config,
    pub data_dir: PathBuf,
    pub gate: SessionGate,
    pub api: ApiClient,
    pub locale: LocaleSetting,

    // UI State
    pub state: AppState,
    pub gate_state: GateState,

    // Login form state
    pub login_input: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,
    pub locale_picker: LocalePicker,

    // Protected view
    pub accounts: Vec<AccountSummary>,
    pub account_selection: usize,
    pub refreshing: bool,

    // Background task channel
    refresh_rx: mpsc::Receiver<AccountsResult>,
    refresh_tx: mpsc::Sender<AccountsResult>,

    // Status message
    pub status_message: Option<String>,
}

impl App {
    /// Build every reloadable collaborator from the root
    pub fn new(root: &Root) -> Result<Self> {
        debug!(mode = %root.config.mode, "App::new() starting");

        let session: Arc<dyn SlotStore> = Arc::new(root.session.clone());
        let gate = SessionGate::mount(
            root.config.mode,
            session.clone(),
            root.persistent_store(),
            &root.signal,
            Arc::new(root.reload.clone()),
        )?;
        let gate_state = gate.state()?;
        debug!(?gate_state, "Gate mounted");

        let api = ApiClient::new(&root.config.api_base_url, session, root.signal.clone())?;
        let (refresh_tx, refresh_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Ok(Self {
            config: root.config.clone(),
            data_dir: root.data_dir.clone(),
            gate,
            api,
            locale: root.locale.clone(),

            state: AppState::Normal,
            gate_state,

            login_input: String::new(),
            login_focus: LoginFocus::Key,
            login_error: None,
            locale_picker: LocalePicker::new(),

            accounts: Vec::new(),
            account_selection: 0,
            refreshing: false,

            refresh_rx,
            refresh_tx,

            status_message: None,
        })
    }

    pub fn texts(&self) -> LoginTexts {
        login_texts(self.locale.get())
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.gate_state.is_authenticated()
    }

    /// Apply pending unauthorized signals and re-derive the gate state.
    pub fn sync_gate(&mut self) {
        if let Err(e) = self.gate.poll_signals() {
            error!(error = %e, "Failed to clear credential after unauthorized signal");
            self.status_message = Some(format!("Storage error: {}", e));
        }
        let next = match self.gate.state() {
            Ok(state) => state,
            Err(e) => {
                error!(error = %e, "Failed to read session credential");
                GateState::Unauthenticated
            }
        };
        if self.gate_state.is_authenticated() && !next.is_authenticated() {
            info!("Session ended, showing credential entry");
            self.start_login();
        }
        self.gate_state = next;
    }

    /// Submit the login form
    pub fn attempt_login(&mut self) {
        match self.gate.submit(&self.login_input) {
            Ok(SubmitOutcome::Accepted) => {
                self.login_input.clear();
                self.login_error = None;
            }
            Ok(SubmitOutcome::Rejected) => {
                self.login_error = Some(self.texts().empty_key.to_string());
            }
            Ok(SubmitOutcome::Ignored) => {}
            Err(e) => {
                error!(error = %e, "Failed to store credential");
                self.login_error = Some(format!("{}", e));
            }
        }
    }

    /// Reset the login form and drop everything the protected view held
    pub fn start_login(&mut self) {
        self.accounts.clear();
        self.account_selection = 0;
        self.login_input.clear();
        self.login_focus = LoginFocus::Key;
        self.login_error = None;
        self.locale_picker.close();
        self.state = AppState::Normal;
    }

    pub fn push_login_char(&mut self, c: char) {
        if can_add_credential_char(self.login_input.chars().count(), c) {
            self.login_input.push(c);
        }
    }

    // =========================================================================
    // Locale
    // =========================================================================

    pub fn toggle_locale_picker(&mut self) {
        self.locale_picker.toggle(self.locale.get());
    }

    /// Make the highlighted locale active and remember it
    pub fn confirm_locale(&mut self) {
        let locale = self.locale_picker.confirm(&self.locale);
        self.remember_locale(locale);
    }

    fn remember_locale(&mut self, locale: Locale) {
        self.config.language = locale;
        if let Err(e) = self.config.save_to(&self.data_dir.join(CONFIG_FILE)) {
            warn!(error = %e, "Failed to save config");
        }
        // Error text was rendered in the previous language
        self.login_error = None;
    }

    // =========================================================================
    // Protected view
    // =========================================================================

    /// Start fetching accounts in the background.
    ///
    /// Must be called from within the tokio runtime. The result is picked up
    /// by `check_background_tasks`.
    pub fn refresh_accounts(&mut self) {
        if !self.is_authenticated() || self.refreshing {
            return;
        }
        let api = self.api.clone();
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            let result = api.list_accounts().await;
            if tx.send(result).await.is_err() {
                debug!("App rebuilt before accounts arrived, dropping result");
            }
        });

        self.refreshing = true;
        self.status_message = Some("Refreshing...".to_string());
    }

    /// Apply every finished background fetch without blocking
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.refresh_rx.try_recv() {
            self.process_accounts_result(result);
        }
    }

    fn process_accounts_result(&mut self, result: AccountsResult) {
        self.refreshing = false;
        match result {
            Ok(accounts) => {
                if !self.is_authenticated() {
                    debug!("Gate closed while fetching, discarding accounts");
                    return;
                }
                info!(count = accounts.len(), "Accounts loaded");
                self.status_message = Some(format!("{} accounts", accounts.len()));
                self.accounts = accounts;
                self.account_selection = self
                    .account_selection
                    .min(self.accounts.len().saturating_sub(1));
            }
            Err(ApiError::Unauthorized) => {
                // Signal already raised by the client
                self.sync_gate();
            }
            Err(e) => {
                warn!(error = %e, "Failed to load accounts");
                self.status_message = Some(format!("Error: {}", e));
            }
        }
    }

    pub fn select_next_account(&mut self, step: usize) {
        let max_index = self.accounts.len().saturating_sub(1);
        self.account_selection = (self.account_selection + step).min(max_index);
    }

    pub fn select_prev_account(&mut self, step: usize) {
        self.account_selection = self.account_selection.saturating_sub(step);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use keygate_core::storage::file::STORAGE_FILE;
    use keygate_core::{ExecutionMode, ADMIN_API_KEY_SLOT};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn root_against(mode: ExecutionMode, dir: &std::path::Path, server: &MockServer) -> Root {
        let config = Config {
            mode,
            api_base_url: server.uri(),
            ..Config::default()
        };
        Root::new(config, dir.to_path_buf())
    }

    /// Wait for the in-flight fetch and apply it the way the main loop would
    async fn finish_refresh(app: &mut App) {
        let result = app.refresh_rx.recv().await.unwrap();
        app.process_accounts_result(result);
    }

    fn hosted_root(dir: &std::path::Path) -> Root {
        let config = Config {
            mode: ExecutionMode::Hosted,
            ..Config::default()
        };
        Root::new(config, dir.to_path_buf())
    }

    #[test]
    fn test_login_focus_cycle() {
        assert_eq!(LoginFocus::Key.next(), LoginFocus::Button);
        assert_eq!(LoginFocus::Language.next(), LoginFocus::Key);
        assert_eq!(LoginFocus::Key.prev(), LoginFocus::Language);
        assert_eq!(LoginFocus::Button.prev(), LoginFocus::Key);
    }

    #[test]
    fn test_reload_flag_take_once() {
        let flag = ReloadFlag::default();
        assert!(!flag.take());
        flag.reload();
        assert!(flag.take());
        assert!(!flag.take());
    }

    #[test]
    fn test_blank_login_shows_hint_without_reload() {
        let dir = tempfile::tempdir().unwrap();
        let root = hosted_root(dir.path());
        let mut app = App::new(&root).unwrap();

        app.login_input = "   ".to_string();
        app.attempt_login();

        assert!(app.login_error.is_some());
        assert!(!root.reload.take());
        assert!(!app.is_authenticated());
    }

    #[test]
    fn test_login_requests_reload_and_survives_rebuild() {
        let dir = tempfile::tempdir().unwrap();
        let root = hosted_root(dir.path());
        let mut app = App::new(&root).unwrap();
        assert!(!app.is_authenticated());

        app.login_input = "xyz789".to_string();
        app.attempt_login();
        assert!(app.login_input.is_empty());
        assert!(root.reload.take());

        // What the main loop does on reload
        drop(app);
        let app = App::new(&root).unwrap();
        assert!(app.is_authenticated());
        assert_eq!(root.signal.subscriber_count(), 1);
    }

    #[test]
    fn test_signal_returns_to_login_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let root = hosted_root(dir.path());
        root.session.set(ADMIN_API_KEY_SLOT, "xyz789").unwrap();
        let mut app = App::new(&root).unwrap();
        app.accounts = vec![AccountSummary {
            id: "a1".to_string(),
            email: "one@example.com".to_string(),
            name: None,
            disabled: false,
            proxy_disabled: false,
        }];
        assert!(app.is_authenticated());

        root.signal.raise();
        app.sync_gate();

        assert!(!app.is_authenticated());
        assert!(app.accounts.is_empty());
        assert_eq!(app.login_focus, LoginFocus::Key);
        assert!(!root.reload.take());
    }

    #[test]
    fn test_legacy_file_credential_is_migrated() {
        let dir = tempfile::tempdir().unwrap();
        FileStore::in_dir(dir.path())
            .set(ADMIN_API_KEY_SLOT, "abc123")
            .unwrap();
        let root = hosted_root(dir.path());

        let app = App::new(&root).unwrap();

        assert!(app.is_authenticated());
        assert_eq!(
            root.session.get(ADMIN_API_KEY_SLOT).unwrap().as_deref(),
            Some("abc123")
        );
        assert_eq!(FileStore::in_dir(dir.path()).get(ADMIN_API_KEY_SLOT).unwrap(), None);
    }

    #[test]
    fn test_push_login_char_filters_control() {
        let dir = tempfile::tempdir().unwrap();
        let root = hosted_root(dir.path());
        let mut app = App::new(&root).unwrap();
        app.push_login_char('a');
        app.push_login_char('\n');
        assert_eq!(app.login_input, "a");
    }

    #[test]
    fn test_confirm_locale_saves_config() {
        let dir = tempfile::tempdir().unwrap();
        let root = hosted_root(dir.path());
        let mut app = App::new(&root).unwrap();
        app.login_error = Some("Please enter an API key".to_string());

        app.toggle_locale_picker();
        app.locale_picker.next();
        app.confirm_locale();

        assert_eq!(root.locale.get(), Locale::Ja);
        assert_eq!(app.texts().login_button, "ログイン");
        assert!(app.login_error.is_none());
        let saved = Config::load_from(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(saved.language, Locale::Ja);
    }

    #[test]
    fn test_account_selection_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let root = hosted_root(dir.path());
        let mut app = App::new(&root).unwrap();
        app.accounts = (0..3)
            .map(|i| AccountSummary {
                id: format!("a{}", i),
                email: format!("{}@example.com", i),
                name: None,
                disabled: false,
                proxy_disabled: false,
            })
            .collect();

        app.select_next_account(PAGE_SCROLL_SIZE);
        assert_eq!(app.account_selection, 2);
        app.select_prev_account(1);
        assert_eq!(app.account_selection, 1);
        app.select_prev_account(PAGE_SCROLL_SIZE);
        assert_eq!(app.account_selection, 0);
    }

    #[tokio::test]
    async fn test_refresh_does_not_wait_for_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/accounts"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("[]")
                    .set_delay(Duration::from_secs(30)),
            )
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let root = root_against(ExecutionMode::Desktop, dir.path(), &server);
        let mut app = App::new(&root).unwrap();

        let started = Instant::now();
        app.refresh_accounts();
        app.check_background_tasks();

        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(app.refreshing);
        assert_eq!(app.status_message.as_deref(), Some("Refreshing..."));
        assert!(app.accounts.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_loads_accounts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/accounts"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"accounts":[{"id":"a1","email":"one@example.com"},{"id":"a2","email":"two@example.com"}]}"#,
            ))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let root = root_against(ExecutionMode::Desktop, dir.path(), &server);
        let mut app = App::new(&root).unwrap();

        app.refresh_accounts();
        finish_refresh(&mut app).await;

        assert!(!app.refreshing);
        assert_eq!(app.accounts.len(), 2);
        assert_eq!(app.status_message.as_deref(), Some("2 accounts"));
    }

    #[tokio::test]
    async fn test_refresh_rejected_returns_to_login() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/accounts"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let root = root_against(ExecutionMode::Hosted, dir.path(), &server);
        root.session.set(ADMIN_API_KEY_SLOT, "revoked").unwrap();
        let mut app = App::new(&root).unwrap();
        assert!(app.is_authenticated());

        app.refresh_accounts();
        finish_refresh(&mut app).await;

        assert!(!app.is_authenticated());
        assert_eq!(root.session.get(ADMIN_API_KEY_SLOT).unwrap(), None);
        assert!(!root.reload.take());
    }

    #[test]
    fn test_corrupt_legacy_file_still_shows_login() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(STORAGE_FILE), "{not json").unwrap();
        let root = hosted_root(dir.path());

        let mut app = App::new(&root).unwrap();
        assert!(!app.is_authenticated());

        app.login_input = "xyz789".to_string();
        app.attempt_login();
        assert!(app.login_error.is_none());
        assert!(root.reload.take());
        assert!(App::new(&root).unwrap().is_authenticated());
    }
}
