use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, SearchState};

impl App {
    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Phase 1: Search editing mode, typing in the search bar
        if self.search.is_editing() {
            match key.code {
                KeyCode::Enter => {
                    self.search.accept();
                    return;
                }
                KeyCode::Esc => {
                    self.search = SearchState::Inactive;
                    self.mark_tree_dirty();
                    return;
                }
                KeyCode::Backspace => {
                    self.search.pop_char();
                    self.cursor = 0;
                    self.mark_tree_dirty();
                    return;
                }
                KeyCode::Char(c) => {
                    self.search.push_char(c);
                    self.cursor = 0;
                    self.mark_tree_dirty();
                    return;
                }
                // Allow navigation keys to pass through
                KeyCode::Down | KeyCode::Up => {}
                _ => return,
            }
        }

        // Phase 2: Filter active but not editing, Esc clears the filter
        if self.search.is_filtering() {
            match key.code {
                KeyCode::Char('/') => {
                    self.search.resume_editing();
                    return;
                }
                KeyCode::Esc => {
                    self.search = SearchState::Inactive;
                    self.mark_tree_dirty();
                    return;
                }
                _ => {}
            }
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if self.cursor + 1 < self.visible_nodes.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Char(' ') => {
                self.toggle_current_node();
            }
            KeyCode::Tab => {
                self.cycle_category();
            }
            KeyCode::Char('/') => {
                self.search = SearchState::Editing(String::new());
            }
            KeyCode::Enter => {
                self.run_marked();
            }
            _ => {}
        }
    }
}
