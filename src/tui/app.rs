use std::collections::HashSet;

use log::debug;

use crate::catalog::Catalog;
use crate::catalog::action::Action;

use super::tree_state::{TreeContext, flatten_catalog};
use super::tree_widget::{NodeKind, VisibleNode};

/// Which actions the tree shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    All,
    /// Only the actions marked to run
    ToRun,
    /// Only the actions of the catalog at this index
    Catalog(usize),
}

/// State machine for the search / filter bar
#[derive(Debug, Clone, Default)]
pub enum SearchState {
    #[default]
    Inactive,
    /// User is typing in the search bar
    Editing(String),
    /// Filter applied, navigating results
    Active(String),
}

impl SearchState {
    /// The current query string, if any.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        match self {
            SearchState::Inactive => None,
            SearchState::Editing(q) | SearchState::Active(q) => Some(q),
        }
    }

    /// Whether the user is actively typing in the search bar.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        matches!(self, SearchState::Editing(_))
    }

    /// Whether a filter is applied but the user is not editing.
    #[must_use]
    pub fn is_filtering(&self) -> bool {
        matches!(self, SearchState::Active(_))
    }

    /// Whether any search/filter is active (editing or applied).
    #[must_use]
    pub fn has_query(&self) -> bool {
        !matches!(self, SearchState::Inactive)
    }

    /// Append a character (only meaningful while editing).
    pub fn push_char(&mut self, c: char) {
        if let SearchState::Editing(q) = self {
            q.push(c);
        }
    }

    /// Remove the last character (only meaningful while editing).
    pub fn pop_char(&mut self) {
        if let SearchState::Editing(q) = self {
            q.pop();
        }
    }

    /// Accept the current query: transition Editing → Active.
    pub fn accept(&mut self) {
        if let SearchState::Editing(q) = self {
            *self = SearchState::Active(std::mem::take(q));
        }
    }

    /// Resume editing: transition Active → Editing.
    pub fn resume_editing(&mut self) {
        if let SearchState::Active(q) = self {
            *self = SearchState::Editing(std::mem::take(q));
        }
    }
}

/// Picker over every catalog's actions
pub struct App {
    pub catalogs: Vec<Catalog>,
    pub lang: String,
    pub visible_nodes: Vec<VisibleNode>,
    pub cursor: usize,
    pub tree_scroll: usize,
    /// Run ids marked to run
    pub marked: HashSet<String>,
    pub category: Category,
    pub search: SearchState,
    pub should_quit: bool,
    /// The user asked to run the marked actions
    pub confirmed: bool,
    pub(super) tree_dirty: bool,
}

impl App {
    #[must_use]
    pub fn new(catalogs: Vec<Catalog>, lang: &str) -> Self {
        let mut app = App {
            catalogs,
            lang: lang.to_string(),
            visible_nodes: Vec::new(),
            cursor: 0,
            tree_scroll: 0,
            marked: HashSet::new(),
            category: Category::All,
            search: SearchState::Inactive,
            should_quit: false,
            confirmed: false,
            tree_dirty: false,
        };
        app.rebuild_visible_nodes();
        app
    }

    /// Mark the tree as needing a rebuild (lazy, happens at next render)
    pub fn mark_tree_dirty(&mut self) {
        self.tree_dirty = true;
    }

    /// Rebuild the flat `visible_nodes` list from the catalogs
    pub fn rebuild_visible_nodes(&mut self) {
        self.visible_nodes.clear();
        let mut ctx = TreeContext {
            marked: &self.marked,
            category: self.category,
            filter: self.search.query(),
            lang: &self.lang,
            nodes: &mut self.visible_nodes,
        };
        for (index, catalog) in self.catalogs.iter().enumerate() {
            flatten_catalog(catalog, index, &mut ctx);
        }
        self.cursor = self.cursor.min(self.visible_nodes.len().saturating_sub(1));
        self.tree_dirty = false;
    }

    /// Label of the active category, as shown in the header
    #[must_use]
    pub fn category_label(&self, category: Category) -> String {
        match category {
            Category::All => "All".to_string(),
            Category::ToRun => "To run…".to_string(),
            Category::Catalog(index) => self
                .catalogs
                .get(index)
                .map_or_else(String::new, |catalog| catalog.caption.clone()),
        }
    }

    /// Every category in display order
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        [Category::All, Category::ToRun]
            .into_iter()
            .chain((0..self.catalogs.len()).map(Category::Catalog))
            .collect()
    }

    /// Move to the next category, wrapping around
    pub fn cycle_category(&mut self) {
        self.category = match self.category {
            Category::All => Category::ToRun,
            Category::ToRun if self.catalogs.is_empty() => Category::All,
            Category::ToRun => Category::Catalog(0),
            Category::Catalog(index) if index + 1 < self.catalogs.len() => {
                Category::Catalog(index + 1)
            }
            Category::Catalog(_) => Category::All,
        };
        debug!("Category: {}", self.category_label(self.category));
        self.cursor = 0;
        self.tree_scroll = 0;
        self.rebuild_visible_nodes();
    }

    /// Toggle the action under the cursor, or every action of the catalog under it
    pub fn toggle_current_node(&mut self) {
        let Some(node) = self.visible_nodes.get(self.cursor) else {
            return;
        };
        match &node.kind {
            NodeKind::Action { marked, .. } => {
                if *marked {
                    self.marked.remove(&node.id);
                } else {
                    self.marked.insert(node.id.clone());
                }
            }
            NodeKind::Catalog { marked, total, .. } => {
                let mark_all = marked < total;
                if let Some(catalog) = self.catalogs.iter().find(|c| c.id == node.id) {
                    for action in &catalog.actions {
                        let id = catalog.run_id(action);
                        if mark_all {
                            self.marked.insert(id);
                        } else {
                            self.marked.remove(&id);
                        }
                    }
                }
            }
        }
        self.mark_tree_dirty();
    }

    /// Run id of the action under the cursor
    #[must_use]
    pub fn current_action_id(&self) -> Option<&str> {
        self.visible_nodes
            .get(self.cursor)
            .filter(|node| matches!(node.kind, NodeKind::Action { .. }))
            .map(|node| node.id.as_str())
    }

    /// Confirm and quit when something is marked
    pub fn run_marked(&mut self) {
        if self.marked.is_empty() {
            debug!("Nothing marked to run");
            return;
        }
        self.confirmed = true;
        self.should_quit = true;
    }

    /// Marked actions in catalog order
    #[must_use]
    pub fn marked_actions(&self) -> Vec<Action> {
        self.catalogs
            .iter()
            .flat_map(|catalog| {
                catalog
                    .actions
                    .iter()
                    .filter(|action| self.marked.contains(&catalog.run_id(action)))
            })
            .cloned()
            .collect()
    }

    /// Keep the cursor inside a viewport of `height` rows
    pub fn scroll_to_cursor(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.cursor < self.tree_scroll {
            self.tree_scroll = self.cursor;
        } else if self.cursor >= self.tree_scroll + height {
            self.tree_scroll = self.cursor + 1 - height;
        }
    }
}
