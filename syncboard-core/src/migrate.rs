//! One-off cleanup pass for titles left behind by earlier runs of the
//! presence simulation (e.g. "card Revised", "card WIP"). Rewrites them to
//! the default card title. Runs once at load time; not a migration engine.

use crate::store::{CardPatch, Stores};
use crate::types::DEFAULT_CARD_TITLE;

const SIMULATION_SUFFIXES: &[&str] = &[" Revised", " WIP", " Done", " In review", " Updated"];

fn is_simulation_title(title: &str) -> bool {
    SIMULATION_SUFFIXES.iter().any(|s| title.ends_with(s))
}

/// Returns whether any card title was rewritten, so the caller knows to
/// persist.
pub fn migrate_simulation_titles(stores: &mut Stores) -> bool {
    let affected: Vec<String> = stores
        .cards
        .iter()
        .filter(|c| is_simulation_title(&c.title))
        .map(|c| c.id.clone())
        .collect();
    if affected.is_empty() {
        return false;
    }
    log::info!(
        "[syncboard.migrate.titles] Rewriting {} simulation-artifact card titles",
        affected.len()
    );
    for id in affected {
        stores.cards.update(
            &id,
            CardPatch {
                title: Some(DEFAULT_CARD_TITLE.to_string()),
                ..Default::default()
            },
        );
    }
    true
}
