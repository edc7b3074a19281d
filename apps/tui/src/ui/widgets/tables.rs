use ratatui::style::{Color, Modifier, Style};

/// First row to draw so that `selected_index` stays on screen.
pub const fn scroll_offset(
    total_rows: usize,
    max_visible_rows: usize,
    selected_index: usize,
) -> usize {
    if total_rows <= max_visible_rows || max_visible_rows == 0 {
        return 0;
    }

    if selected_index >= max_visible_rows {
        return selected_index + 1 - max_visible_rows;
    }

    0
}

pub fn header_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default()
        .bg(Color::Rgb(0, 0, 238))
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Shortens `value` to `width` characters, marking the cut with `…`.
pub fn truncate(value: &str, width: usize) -> String {
    let single_line = value.replace(['\r', '\n'], " ");
    if single_line.chars().count() <= width {
        return single_line;
    }
    let mut cut: String = single_line.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
