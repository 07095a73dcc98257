//! Entry formatting shared by the CLI commands and the TUI

use colored::Colorize;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use rotomdex_catalog::{badge_text, category_color_or_fallback, CatalogEntry, Rgb};
use serde_json::{json, Value};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub text: String,
    pub color: Rgb,
}

/// Display form of one catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDisplay {
    pub number: String,
    pub name: String,
    pub badges: Vec<Badge>,
}

impl EntryDisplay {
    pub fn from_entry(entry: &CatalogEntry) -> Self {
        let number = entry
            .id()
            .map(|id| format!("#{:03}", id))
            .unwrap_or_else(|| "#---".to_string());

        let badges = entry
            .categories
            .iter()
            .map(|label| Badge {
                text: badge_text(label),
                color: category_color_or_fallback(label),
            })
            .collect();

        Self {
            number,
            name: entry.name.clone(),
            badges,
        }
    }

    /// Single terminal line; `name_width` pads names into a column
    pub fn to_cli_line(&self, name_width: usize, color: bool) -> String {
        let pad = name_width.saturating_sub(self.name.width());
        let (number, name) = if color {
            (self.number.dimmed().to_string(), self.name.bold().to_string())
        } else {
            (self.number.clone(), self.name.clone())
        };

        let mut line = format!("{} {}{}", number, name, " ".repeat(pad));
        if !self.badges.is_empty() {
            let badges: Vec<String> = self
                .badges
                .iter()
                .map(|b| cli_badge(b, color))
                .collect();
            line.push_str("  ");
            line.push_str(&badges.join(" "));
        }
        line.trim_end().to_string()
    }

    pub fn to_tui_line(&self) -> Line<'static> {
        let mut spans = vec![
            Span::styled(
                format!("{} ", self.number),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                self.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
        ];
        for (i, badge) in self.badges.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(tui_badge(badge));
        }
        Line::from(spans)
    }
}

fn cli_badge(badge: &Badge, color: bool) -> String {
    if color {
        let Rgb { r, g, b } = badge.color;
        format!(" {} ", badge.text)
            .white()
            .bold()
            .on_truecolor(r, g, b)
            .to_string()
    } else {
        format!("[{}]", badge.text)
    }
}

pub fn tui_badge(badge: &Badge) -> Span<'static> {
    let Rgb { r, g, b } = badge.color;
    Span::styled(
        format!(" {} ", badge.text),
        Style::default()
            .fg(Color::White)
            .bg(Color::Rgb(r, g, b))
            .add_modifier(Modifier::BOLD),
    )
}

/// Render entries as aligned lines
pub fn render_lines(entries: &[&CatalogEntry], color: bool) -> Vec<String> {
    let displays: Vec<EntryDisplay> = entries.iter().map(|e| EntryDisplay::from_entry(e)).collect();
    let width = displays.iter().map(|d| d.name.width()).max().unwrap_or(0);
    displays
        .iter()
        .map(|d| d.to_cli_line(width, color))
        .collect()
}

/// JSON form used by `--json`
pub fn entries_json(entries: &[&CatalogEntry]) -> Value {
    Value::Array(
        entries
            .iter()
            .map(|e| {
                json!({
                    "id": e.id(),
                    "name": e.name,
                    "image": e.image_ref,
                    "categories": e.categories,
                })
            })
            .collect(),
    )
}

/// Height is reported upstream in decimetres, weight in hectograms
pub fn physical_summary(entry: &CatalogEntry) -> Option<String> {
    let height = entry.extra_u64("height")?;
    let weight = entry.extra_u64("weight")?;
    Some(format!(
        "{:.1} m · {:.1} kg",
        height as f64 / 10.0,
        weight as f64 / 10.0
    ))
}
