use std::borrow::Cow;

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use super::app::App;
use super::tree_widget::NodeKind;
use crate::theme;

struct Shortcut {
    key: &'static str,
    desc: Cow<'static, str>,
}

impl Shortcut {
    fn new(key: &'static str, desc: impl Into<Cow<'static, str>>) -> Self {
        Self {
            key,
            desc: desc.into(),
        }
    }

    /// Width this shortcut occupies: " key " (padded badge) + space + desc
    fn width(&self) -> usize {
        1 + self.key.chars().count() + 1 + 1 + self.desc.chars().count()
    }
}

fn get_shortcuts(app: &App) -> Vec<Shortcut> {
    let mut shortcuts = Vec::new();

    if app.search.is_editing() {
        shortcuts.push(Shortcut::new("ESC", "Clear"));
        shortcuts.push(Shortcut::new("ENTER", "Accept"));
        return shortcuts;
    }

    if !app.marked.is_empty() {
        shortcuts.push(Shortcut::new(
            "ENTER",
            Cow::Owned(format!("Run marked ({})", app.marked.len())),
        ));
    }

    let toggle_label = match app.visible_nodes.get(app.cursor).map(|n| &n.kind) {
        Some(NodeKind::Action { marked: true, .. }) => Some("Unmark"),
        Some(NodeKind::Action { marked: false, .. }) => Some("Mark"),
        Some(NodeKind::Catalog { marked, total, .. }) if marked < total => Some("Mark all"),
        Some(NodeKind::Catalog { .. }) => Some("Unmark all"),
        None => None,
    };
    if let Some(label) = toggle_label {
        shortcuts.push(Shortcut::new("SPACE", label));
    }

    let next = app
        .categories()
        .into_iter()
        .skip_while(|category| *category != app.category)
        .nth(1)
        .unwrap_or_default();
    shortcuts.push(Shortcut::new("TAB", app.category_label(next)));

    if app.search.is_filtering() {
        shortcuts.push(Shortcut::new("/", "Edit filter"));
        shortcuts.push(Shortcut::new("ESC", "Clear filter"));
    } else {
        shortcuts.push(Shortcut::new("/", "Search"));
    }
    shortcuts.push(Shortcut::new("Q", "Quit"));

    shortcuts
}

/// Separator between shortcuts
const SEP: &str = "  ";

pub fn build_toolbar_line(app: &App, width: u16) -> Line<'static> {
    let shortcuts = get_shortcuts(app);
    let max_width = width as usize;

    let key_style = Style::default()
        .fg(theme::TOOLBAR_KEY_FG)
        .bg(theme::TOOLBAR_KEY_BG)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default()
        .fg(theme::TOOLBAR_DESC)
        .bg(theme::TOOLBAR_BG);
    let bg_style = Style::default().bg(theme::TOOLBAR_BG);

    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut x = 0usize;

    for (i, shortcut) in shortcuts.iter().enumerate() {
        let sep_width = if i > 0 { SEP.len() } else { 0 };
        let needed = sep_width + shortcut.width();

        if x + needed > max_width {
            break;
        }

        if i > 0 {
            spans.push(Span::styled(SEP, bg_style));
            x += sep_width;
        }

        // Key rendered as a badge: " KEY " on dark background
        spans.push(Span::styled(format!(" {} ", shortcut.key), key_style));
        spans.push(Span::styled(" ", bg_style));
        spans.push(Span::styled(shortcut.desc.clone(), desc_style));

        x += shortcut.width();
    }

    // Fill remaining width with background
    if x < max_width {
        let padding = " ".repeat(max_width - x);
        spans.push(Span::styled(padding, bg_style));
    }

    Line::from(spans)
}
