use crate::theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

/// The type and display data for a tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Catalog {
        caption: String,
        marked: usize,
        total: usize,
    },
    Action {
        name: String,
        title: String,
        marked: bool,
    },
}

/// A flattened tree node ready for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleNode {
    /// Catalog id for catalogs, run id for actions
    pub id: String,
    pub is_last_sibling: bool,
    pub kind: NodeKind,
}

impl VisibleNode {
    fn guide(&self) -> &'static str {
        match (&self.kind, self.is_last_sibling) {
            (NodeKind::Catalog { .. }, _) => "",
            (NodeKind::Action { .. }, true) => "└─",
            (NodeKind::Action { .. }, false) => "├─",
        }
    }
}

/// Ratatui widget that renders the catalog tree
pub struct TreeWidget<'a> {
    nodes: &'a [VisibleNode],
    cursor: usize,
    scroll_offset: usize,
}

impl<'a> TreeWidget<'a> {
    #[must_use]
    pub fn new(nodes: &'a [VisibleNode], cursor: usize, scroll_offset: usize) -> Self {
        Self {
            nodes,
            cursor,
            scroll_offset,
        }
    }
}

/// Plain text representation of a node, for testing.
#[cfg(test)]
#[must_use]
pub fn render_node_text(node: &VisibleNode) -> String {
    let mut text = node.guide().to_string();
    match &node.kind {
        NodeKind::Catalog {
            caption,
            marked,
            total,
        } => {
            text.push_str(&format!("{caption} ({marked}/{total})"));
        }
        NodeKind::Action {
            name,
            title,
            marked,
        } => {
            text.push_str(if *marked { "● " } else { "○ " });
            text.push_str(name);
            if !title.is_empty() {
                text.push_str("  ");
                text.push_str(title);
            }
        }
    }
    text
}

impl Widget for TreeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible_height = area.height as usize;
        let visible_nodes = self
            .nodes
            .iter()
            .skip(self.scroll_offset)
            .take(visible_height);

        for (i, node) in visible_nodes.enumerate() {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "row index bounded by area.height which is u16"
            )]
            let y = area.y + i as u16;
            let is_highlighted = i + self.scroll_offset == self.cursor;

            let highlight_style = if is_highlighted {
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::UNDERLINED)
            } else {
                Style::default()
            };

            let mut spans = vec![Span::styled(
                node.guide(),
                Style::default().fg(theme::CATEGORY),
            )];
            match &node.kind {
                NodeKind::Catalog {
                    caption,
                    marked,
                    total,
                } => {
                    spans.push(Span::styled(
                        caption.as_str(),
                        highlight_style.add_modifier(Modifier::BOLD),
                    ));
                    spans.push(Span::styled(
                        format!(" ({marked}/{total})"),
                        Style::default().fg(theme::DIM),
                    ));
                }
                NodeKind::Action {
                    name,
                    title,
                    marked,
                } => {
                    let (indicator, indicator_style) = if *marked {
                        ("● ", Style::default().fg(theme::MARKED))
                    } else {
                        ("○ ", Style::default().fg(theme::DIM))
                    };
                    spans.push(Span::styled(indicator, indicator_style));
                    spans.push(Span::styled(name.as_str(), highlight_style));
                    if !title.is_empty() {
                        spans.push(Span::styled(
                            format!("  {title}"),
                            Style::default().fg(theme::DIM),
                        ));
                    }
                }
            }

            let line = Line::from(spans);
            buf.set_line(area.x, y, &line, area.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action_node(name: &str, title: &str, marked: bool, last: bool) -> VisibleNode {
        VisibleNode {
            id: format!("test:{name}"),
            is_last_sibling: last,
            kind: NodeKind::Action {
                name: name.to_string(),
                title: title.to_string(),
                marked,
            },
        }
    }

    #[test]
    fn test_catalog_node() {
        let node = VisibleNode {
            id: "disk".to_string(),
            is_last_sibling: false,
            kind: NodeKind::Catalog {
                caption: "Disks".to_string(),
                marked: 1,
                total: 4,
            },
        };
        assert_eq!(render_node_text(&node), "Disks (1/4)");
    }

    #[test]
    fn test_action_guides_and_markers() {
        assert_eq!(
            render_node_text(&action_node("df", "Usage", true, false)),
            "├─● df  Usage"
        );
        assert_eq!(
            render_node_text(&action_node("swap", "", false, true)),
            "└─○ swap"
        );
    }

    #[test]
    fn test_widget_draws_visible_rows() {
        let nodes = vec![
            action_node("one", "", false, false),
            action_node("two", "", true, true),
        ];
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        TreeWidget::new(&nodes, 1, 1).render(area, &mut buf);
        let row: String = (0..area.width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect();
        assert!(row.starts_with("└─● two"));
    }
}
