//! Terminal picker: a category-filtered tree of every catalog's actions
//!
//! The binary owns the terminal and event loop; this module holds the state
//! machine, key handling and rendering.

pub mod app;
pub mod key_handler;
pub mod render;
pub mod toolbar;
pub mod tree_state;
pub mod tree_widget;
