use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};

use super::app::App;
use super::toolbar;
use super::tree_widget::TreeWidget;
use crate::theme;

fn render_scrollbar(frame: &mut Frame, area: Rect, total: usize, position: usize) {
    let mut state = ScrollbarState::new(total).position(position);
    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .thumb_style(Style::default().fg(theme::ACCENT)),
        area,
        &mut state,
    );
}

impl App {
    /// Category tabs, the active one highlighted, with the run id under the cursor
    #[must_use]
    pub fn header_line(&self) -> Line<'static> {
        let mut spans = Vec::new();
        for (i, category) in self.categories().into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", Style::default().fg(theme::DIM)));
            }
            let style = if category == self.category {
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme::CATEGORY)
            };
            spans.push(Span::styled(self.category_label(category), style));
        }
        if let Some(id) = self.current_action_id() {
            spans.push(Span::styled(
                format!("   {id}"),
                Style::default().fg(theme::DIM),
            ));
        }
        Line::from(spans)
    }

    /// Render the app
    pub fn render(&mut self, frame: &mut Frame) {
        if self.tree_dirty {
            self.rebuild_visible_nodes();
        }
        let size = frame.area();

        let search_height = u16::from(self.search.has_query());
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(search_height),
                Constraint::Length(1),
            ])
            .split(size);
        let (header_area, tree_area, search_area, toolbar_area) =
            (outer[0], outer[1], outer[2], outer[3]);

        frame.render_widget(Paragraph::new(self.header_line()), header_area);

        self.scroll_to_cursor(tree_area.height as usize);
        if self.visible_nodes.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "Nothing to show",
                    Style::default().fg(theme::DIM),
                )),
                tree_area,
            );
        } else {
            frame.render_widget(
                TreeWidget::new(&self.visible_nodes, self.cursor, self.tree_scroll),
                tree_area,
            );
            if self.visible_nodes.len() > tree_area.height as usize {
                render_scrollbar(frame, tree_area, self.visible_nodes.len(), self.cursor);
            }
        }

        if let Some(query) = self.search.query() {
            let cursor = if self.search.is_editing() { "▏" } else { "" };
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled("/", Style::default().fg(theme::ACCENT)),
                    Span::raw(format!("{query}{cursor}")),
                ])),
                search_area,
            );
        }

        frame.render_widget(
            Paragraph::new(toolbar::build_toolbar_line(self, toolbar_area.width)),
            toolbar_area,
        );
    }
}
