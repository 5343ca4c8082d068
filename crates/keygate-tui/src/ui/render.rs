use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use keygate_core::{AccountSummary, GateView, Locale};

use crate::app::{App, AppState, LoginFocus};

use super::styles;

/// Width of the masked key field
const KEY_FIELD_WIDTH: usize = 24;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(8),    // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);

    // Anything but a clear pass keeps the protected view closed
    match app.gate.view(|| account_items(&app.accounts)) {
        Ok(GateView::Protected(items)) => {
            render_accounts(frame, app, items, chunks[1]);
            render_status_bar(frame, app, chunks[2]);
        }
        Ok(GateView::Blocked) | Err(_) => {
            render_login(frame, app, chunks[1]);
            if app.locale_picker.is_open() {
                render_locale_picker(frame, app);
            }
        }
    }

    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  keygate";
    let mode = app.gate.mode();
    let mode_hint = format!("[{}]", mode);
    let title_len = title.len();

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title_len as u16 + mode_hint.len() as u16 + 4)
                as usize,
        )),
        Span::styled(mode_hint, styles::mode_badge_style(mode)),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

// ============================================================================
// Protected view
// ============================================================================

fn account_items(accounts: &[AccountSummary]) -> Vec<ListItem<'static>> {
    accounts
        .iter()
        .map(|account| {
            let label = account.status_label();
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<32}", account.display_name()),
                    styles::list_item_style(),
                ),
                Span::styled(format!("{:<28}", account.email), styles::muted_style()),
                Span::styled(label, styles::account_status_style(label)),
            ]))
        })
        .collect()
}

fn render_accounts(frame: &mut Frame, app: &App, items: Vec<ListItem<'static>>, area: Rect) {
    let block = Block::default()
        .title(Span::styled(" Accounts ", styles::title_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if items.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "  No accounts loaded. Press [r] to refresh.",
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(styles::selected_style());
    let mut state = ListState::default().with_selected(Some(app.account_selection));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let message = app.status_message.clone().unwrap_or_default();
    let line = Line::from(vec![
        Span::styled(format!(" {} ", message), styles::status_bar_style()),
        Span::styled(
            "  [r] refresh  [?] help  [q] quit",
            styles::muted_style(),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

// ============================================================================
// Credential entry
// ============================================================================

fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    let texts = app.texts();
    let height = if app.login_error.is_some() { 13 } else { 11 };
    let dialog = centered_rect_fixed(52, height, area);

    frame.render_widget(Clear, dialog);

    let mut lines = vec![
        Line::from(Span::styled(format!("  {}", texts.title), styles::title_style())),
        Line::from(Span::styled(format!("  {}", texts.prompt), styles::muted_style())),
        Line::from(""),
    ];

    // Key field, always masked
    let key_focused = app.login_focus == LoginFocus::Key;
    let masked: String = "*".repeat(app.login_input.chars().count().min(KEY_FIELD_WIDTH));
    let cursor = if key_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::styled(format!("  {}: [", texts.key_label), styles::muted_style()),
        Span::styled(
            format!("{:<width$}{}", masked, cursor, width = KEY_FIELD_WIDTH),
            styles::field_style(key_focused),
        ),
        Span::styled("]", styles::muted_style()),
    ]));

    // Submit button
    let button_focused = app.login_focus == LoginFocus::Button;
    let button_label = if button_focused {
        format!(" ▶ {} ◀ ", texts.login_button)
    } else {
        format!("   {}   ", texts.login_button)
    };
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("               ["),
        Span::styled(button_label, styles::field_style(button_focused)),
        Span::raw("]"),
    ]));

    // Language selector
    let language_focused = app.login_focus == LoginFocus::Language;
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(format!("  {}: ", texts.language_label), styles::muted_style()),
        Span::styled(
            format!(" {} ▾ ", app.locale.get().display_name()),
            styles::field_style(language_focused),
        ),
    ]));

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), dialog);
}

fn render_locale_picker(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(28, Locale::ALL.len() as u16 + 2, frame.area());
    frame.render_widget(Clear, area);

    let active = app.locale.get();
    let items: Vec<ListItem> = Locale::ALL
        .iter()
        .map(|locale| {
            let marker = if *locale == active { "✓" } else { " " };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", marker), styles::success_style()),
                Span::styled(format!("{:<6}", locale.code()), styles::muted_style()),
                Span::styled(locale.display_name(), styles::list_item_style()),
            ]))
        })
        .collect();

    let highlighted = Locale::ALL
        .iter()
        .position(|l| *l == app.locale_picker.highlighted());

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .highlight_style(styles::selected_style());
    let mut state = ListState::default().with_selected(highlighted);
    frame.render_stateful_widget(list, area, &mut state);
}

// ============================================================================
// Overlays
// ============================================================================

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(44, 12, frame.area());
    frame.render_widget(Clear, area);

    let entries = [
        ("↑/↓ j/k", "Move selection"),
        ("PgUp/PgDn", "Scroll a page"),
        ("r", "Refresh accounts"),
        ("?", "Toggle this help"),
        ("q", "Quit"),
        ("Ctrl+C", "Quit immediately"),
    ];

    let mut lines = vec![
        Line::from(Span::styled("  Keys", styles::title_style())),
        Line::from(""),
    ];
    for (key, desc) in entries {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<12}", key), styles::help_key_style()),
            Span::styled(desc, styles::help_desc_style()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Press ", styles::muted_style()),
        Span::styled("[Esc]", styles::help_key_style()),
        Span::styled(" to close", styles::muted_style()),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(44, 6, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fixed() {
        let r = centered_rect_fixed(20, 10, Rect::new(0, 0, 100, 50));
        assert_eq!(r, Rect::new(40, 20, 20, 10));

        // Clamped to the available area
        let r = centered_rect_fixed(200, 10, Rect::new(0, 0, 100, 50));
        assert_eq!(r.width, 100);
    }

    #[test]
    fn test_account_items_one_per_account() {
        let accounts = vec![AccountSummary {
            id: "a1".to_string(),
            email: "one@example.com".to_string(),
            name: None,
            disabled: false,
            proxy_disabled: false,
        }];
        assert_eq!(account_items(&accounts).len(), 1);
        assert!(account_items(&[]).is_empty());
    }
}
