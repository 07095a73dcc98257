//! UI rendering

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};
use ratatui_image::StatefulImage;
use rotomdex_catalog::{CatalogEntry, LoadStatus};
use std::time::Instant;

use super::app::App;
use crate::display::{physical_summary, tui_badge, EntryDisplay};

const BRAND_RED: Color = Color::Rgb(0xf1, 0x22, 0x28);

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Length(1), // Search input
            Constraint::Min(5),    // List + preview
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Toast line
        ])
        .split(frame.area());

    render_title(frame, rows[0]);
    render_search_input(frame, app, rows[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[2]);

    render_list(frame, app, body[0]);
    render_preview_panel(frame, app, body[1]);
    render_status_bar(frame, app, rows[3]);
    render_toast_line(frame, app, rows[4]);
}

fn render_title(frame: &mut Frame, area: Rect) {
    let style = Style::default()
        .fg(Color::White)
        .bg(BRAND_RED)
        .add_modifier(Modifier::BOLD);
    let title = Paragraph::new(" RotomDex ").style(style);
    frame.render_widget(title, area);
}

/// Search input (minimal, thick bar on left)
fn render_search_input(frame: &mut Frame, app: &App, area: Rect) {
    let cursor_style = Style::default().fg(Color::White).bg(Color::DarkGray);
    let text_style = Style::default().fg(Color::White);

    let (before, after) = app.search_input.text.split_at(app.search_input.cursor);
    let cursor_char = after.chars().next();
    let after_cursor = cursor_char.map(|c| &after[c.len_utf8()..]).unwrap_or("");

    let mut spans = vec![Span::styled("▌ ", Style::default().fg(BRAND_RED))];

    if before.is_empty() && after.is_empty() {
        spans.push(Span::styled("█", Style::default().fg(Color::White)));
        spans.push(Span::styled(
            " Search by name",
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
        return;
    }

    if !before.is_empty() {
        spans.push(Span::styled(before, text_style));
    }
    match cursor_char {
        Some(c) => spans.push(Span::styled(c.to_string(), cursor_style)),
        None => spans.push(Span::styled("█", Style::default().fg(Color::White))),
    }
    if !after_cursor.is_empty() {
        spans.push(Span::styled(after_cursor, text_style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(Color::Gray).add_modifier(Modifier::DIM))
        .title(title)
}

/// Text shown in place of the list when there is nothing to show
fn empty_message(app: &App) -> Option<(String, Style)> {
    let dim = Style::default().fg(Color::DarkGray);
    if !app.visible().is_empty() {
        return None;
    }
    let message = match app.catalog.status() {
        LoadStatus::Loading => ("Loading...".to_string(), dim),
        LoadStatus::Failed(msg) => (
            format!("Could not load the catalog\n\n{}\n\nCtrl+R to retry", msg),
            Style::default().fg(Color::Red),
        ),
        LoadStatus::Ready if app.catalog.is_filtered() => (
            format!("No matches for '{}'", app.catalog.query().trim()),
            dim,
        ),
        LoadStatus::Ready => ("Catalog is empty".to_string(), dim),
    };
    Some(message)
}

fn render_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = panel(" Entries ");

    if let Some((message, style)) = empty_message(app) {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let para = Paragraph::new(message)
            .style(style)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(para, inner);
        return;
    }

    let items: Vec<ListItem> = app
        .visible()
        .iter()
        .map(|entry| ListItem::new(EntryDisplay::from_entry(entry).to_tui_line()))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Rgb(38, 38, 38)))
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_preview_panel(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = panel(" Details ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(entry) = app.selected_entry().cloned() else {
        let empty = Paragraph::new("Nothing selected")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    };

    // 2 char left padding
    let padded = Rect {
        x: inner.x + 2,
        width: inner.width.saturating_sub(2),
        ..inner
    };

    let lines = detail_lines(&entry);
    let text_height = (lines.len() as u16 + 1).min(padded.height);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(text_height), Constraint::Min(0)])
        .split(padded);

    frame.render_widget(Paragraph::new(lines), chunks[0]);

    if let Some(protocol) = app.sprite.as_mut() {
        frame.render_stateful_widget(StatefulImage::default(), chunks[1], protocol);
    } else if app.picker.is_none() && entry.image_ref.is_some() {
        let hint = Paragraph::new("(sprite needs a kitty-compatible terminal)")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, chunks[1]);
    }
}

fn detail_lines(entry: &CatalogEntry) -> Vec<Line<'static>> {
    let display = EntryDisplay::from_entry(entry);
    let dim = Style::default().fg(Color::DarkGray);

    let mut lines = vec![Line::from(vec![
        Span::styled(
            display.name.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(display.number.clone(), dim),
    ])];

    let mut badges = Vec::new();
    for (i, badge) in display.badges.iter().enumerate() {
        if i > 0 {
            badges.push(Span::raw(" "));
        }
        badges.push(tui_badge(badge));
    }
    lines.push(Line::from(badges));

    if let Some(summary) = physical_summary(entry) {
        lines.push(Line::from(Span::styled(summary, dim)));
    }
    lines
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    let bracket = Style::default().fg(Color::DarkGray);

    let mut spans = vec![Span::styled(
        format!(
            "  {} / {}",
            app.visible().len(),
            app.catalog.entries().len()
        ),
        Style::default().fg(Color::White),
    )];

    let report = app.catalog.report();
    match app.catalog.status() {
        LoadStatus::Loading => {
            spans.push(Span::styled(" [", bracket));
            spans.push(Span::styled(
                format!("{} Loading", spinner_frame(app.load_started)),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::DIM),
            ));
            spans.push(Span::styled("]", bracket));
        }
        LoadStatus::Ready => {
            let style = if report.is_complete() {
                dim
            } else {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::DIM)
            };
            spans.push(Span::styled(" [", bracket));
            spans.push(Span::styled(report.to_string(), style));
            spans.push(Span::styled("]", bracket));
        }
        LoadStatus::Failed(_) => {
            spans.push(Span::styled(" [", bracket));
            spans.push(Span::styled(
                "✗ Failed",
                Style::default().fg(Color::Red).add_modifier(Modifier::DIM),
            ));
            spans.push(Span::styled("]", bracket));
        }
    }

    for hint in ["↑↓ select", "Enter copy", "^r reload", "Esc quit"] {
        spans.push(Span::styled(" [", bracket));
        spans.push(Span::styled(hint, dim));
        spans.push(Span::styled("]", bracket));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_toast_line(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(ref toast) = app.toast {
        let bracket = Style::default().fg(Color::DarkGray);
        let toast_style = if toast.is_error {
            Style::default().fg(Color::Red).add_modifier(Modifier::DIM)
        } else {
            Style::default().fg(Color::Blue).add_modifier(Modifier::DIM)
        };

        let spans = vec![
            Span::styled("  [", bracket),
            Span::styled(toast.message.as_str(), toast_style),
            Span::styled("]", bracket),
        ];
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn spinner_frame(started_at: Instant) -> &'static str {
    const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let idx = (started_at.elapsed().as_millis() / 80) as usize % FRAMES.len();
    FRAMES[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_lines_include_badges_and_size() {
        let mut entry = CatalogEntry::new("pikachu").with_categories(["electric"]);
        entry.extra.insert("id".into(), 25.into());
        entry.extra.insert("height".into(), 4.into());
        entry.extra.insert("weight".into(), 60.into());

        let lines = detail_lines(&entry);
        let text: Vec<String> = lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert_eq!(text, vec!["pikachu  #025", " ELECTRIC ", "0.4 m · 6.0 kg"]);
    }

    #[test]
    fn test_spinner_starts_at_first_frame() {
        assert_eq!(spinner_frame(Instant::now()), "⠋");
    }
}
