use std::collections::HashSet;

use crate::catalog::Catalog;
use crate::catalog::action::Action;

use super::app::Category;
use super::tree_widget::{NodeKind, VisibleNode};

/// Shared state passed through tree flattening
pub(super) struct TreeContext<'a> {
    pub marked: &'a HashSet<String>,
    pub category: Category,
    pub filter: Option<&'a str>,
    pub lang: &'a str,
    pub nodes: &'a mut Vec<VisibleNode>,
}

/// Check if an action matches the filter query (case-insensitive)
fn action_matches_filter(action: &Action, query: &str, lang: &str) -> bool {
    action.haystack(lang).to_lowercase().contains(query)
}

fn catalog_matches_filter(catalog: &Catalog, query: &str) -> bool {
    catalog.caption.to_lowercase().contains(query) || catalog.id.to_lowercase().contains(query)
}

/// Actions of `catalog` shown under the current category and filter
pub(super) fn visible_actions<'c>(
    catalog: &'c Catalog,
    index: usize,
    ctx: &TreeContext<'_>,
) -> Vec<&'c Action> {
    let in_category = |action: &Action| match ctx.category {
        Category::All => true,
        Category::ToRun => ctx.marked.contains(&catalog.run_id(action)),
        Category::Catalog(selected) => selected == index,
    };
    let query = ctx
        .filter
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);
    let whole_catalog = query
        .as_deref()
        .is_none_or(|q| catalog_matches_filter(catalog, q));

    catalog
        .actions
        .iter()
        .filter(|action| in_category(action))
        .filter(|action| {
            whole_catalog
                || query
                    .as_deref()
                    .is_some_and(|q| action_matches_filter(action, q, ctx.lang))
        })
        .collect()
}

/// Push the catalog node and its visible actions; catalogs with none are skipped
pub(super) fn flatten_catalog(catalog: &Catalog, index: usize, ctx: &mut TreeContext<'_>) {
    let actions = visible_actions(catalog, index, ctx);
    if actions.is_empty() {
        return;
    }

    let marked = catalog
        .actions
        .iter()
        .filter(|action| ctx.marked.contains(&catalog.run_id(action)))
        .count();
    ctx.nodes.push(VisibleNode {
        id: catalog.id.clone(),
        is_last_sibling: false,
        kind: NodeKind::Catalog {
            caption: catalog.caption.clone(),
            marked,
            total: catalog.actions.len(),
        },
    });

    let last = actions.len() - 1;
    for (i, action) in actions.into_iter().enumerate() {
        let id = catalog.run_id(action);
        ctx.nodes.push(VisibleNode {
            kind: NodeKind::Action {
                name: action.name.clone(),
                title: action.title.get(ctx.lang).to_string(),
                marked: ctx.marked.contains(&id),
            },
            id,
            is_last_sibling: i == last,
        });
    }
}
