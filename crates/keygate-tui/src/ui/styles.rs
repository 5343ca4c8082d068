use ratatui::style::{Color, Modifier, Style};

use keygate_core::ExecutionMode;

// Color palette
pub const BRAND: Color = Color::Rgb(86, 156, 214);
pub const OK: Color = Color::Rgb(106, 170, 100);
pub const WARN: Color = Color::Rgb(214, 170, 70);
pub const DANGER: Color = Color::Rgb(204, 80, 80);
pub const DIM: Color = Color::Rgb(120, 120, 130);
pub const FOCUS_BG: Color = Color::Rgb(40, 44, 60);
pub const BAR_BG: Color = Color::Rgb(28, 30, 38);

pub fn title_style() -> Style {
    Style::default().fg(BRAND).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default().bg(FOCUS_BG).add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn muted_style() -> Style {
    Style::default().fg(DIM)
}

pub fn highlight_style() -> Style {
    Style::default().fg(WARN)
}

pub fn success_style() -> Style {
    Style::default().fg(OK)
}

pub fn error_style() -> Style {
    Style::default().fg(DANGER).add_modifier(Modifier::BOLD)
}

pub fn border_style(focused: bool) -> Style {
    Style::default().fg(if focused { BRAND } else { DIM })
}

/// Login form widgets: key field, button and language selector
pub fn field_style(focused: bool) -> Style {
    if focused {
        selected_style().fg(BRAND)
    } else {
        list_item_style()
    }
}

pub fn status_bar_style() -> Style {
    Style::default().bg(BAR_BG).fg(Color::White)
}

pub fn help_key_style() -> Style {
    Style::default().fg(WARN).add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    list_item_style()
}

/// Desktop mode runs without a gate, so it is flagged in the title bar
pub fn mode_badge_style(mode: ExecutionMode) -> Style {
    match mode {
        ExecutionMode::Desktop => Style::default().fg(WARN),
        ExecutionMode::Hosted => muted_style(),
    }
}

pub fn account_status_style(label: &str) -> Style {
    match label {
        "active" => success_style(),
        "disabled" => error_style(),
        _ => highlight_style(),
    }
}
