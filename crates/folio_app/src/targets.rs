//! Event target ids
//!
//! Inbound [`Event`](folio_core::Event)s address page parts by these ids.

pub const WINDOW: u64 = 1;
pub const THEME_TOGGLE: u64 = 2;

const DECK_CARD_BASE: u64 = 1_000;
const PROJECT_BASE: u64 = 2_000;
const RANGE: u64 = 1_000;

pub fn deck_card(index: usize) -> u64 {
    DECK_CARD_BASE + index as u64
}

pub fn project(index: usize) -> u64 {
    PROJECT_BASE + index as u64
}

pub fn deck_card_index(target: u64) -> Option<usize> {
    index_in(target, DECK_CARD_BASE)
}

pub fn project_index(target: u64) -> Option<usize> {
    index_in(target, PROJECT_BASE)
}

fn index_in(target: u64, base: u64) -> Option<usize> {
    (base..base + RANGE)
        .contains(&target)
        .then(|| (target - base) as usize)
}
