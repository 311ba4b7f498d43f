use std::collections::BTreeMap;

use crate::bridge::{Bridge, BridgeTypeId};

/// The fixed pool of bridge tokens a puzzle owns.
///
/// Token counts per type are set at construction and never change; only placement state does.
#[derive(Clone, Debug, Default)]
pub struct Inventory {
    bridges: Vec<Bridge>,
}

impl Inventory {
    /// Create `count` tokens per type, named `{type}-{n}` with `n` counting from 1.
    pub fn with_counts<'a>(counts: impl IntoIterator<Item = (&'a str, usize)>) -> Self {
        let bridges = counts.into_iter()
            .flat_map(|(type_id, count)| (1..=count).map(move |n| Bridge::new(format!("{type_id}-{n}"), type_id.to_owned())))
            .collect();
        Self { bridges }
    }

    /// The token with `id`, placed or not.
    pub fn get(&self, id: &str) -> Option<&Bridge> {
        self.bridges.iter().find(|b| b.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Bridge> {
        self.bridges.iter_mut().find(|b| b.id == id)
    }

    /// The first unplaced token of `type_id`, or `None` when that type is exhausted.
    pub fn take(&self, type_id: &str) -> Option<&Bridge> {
        self.bridges.iter().find(|b| b.type_id == type_id && !b.is_placed())
    }

    /// Clear a token's endpoints so it can be taken again. Returns `false` for an unknown id.
    pub(crate) fn give_back(&mut self, id: &str) -> bool {
        match self.get_mut(id) {
            Some(bridge) => {
                bridge.span = None;
                true
            }
            None => false,
        }
    }

    /// Every token in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Bridge> {
        self.bridges.iter()
    }

    /// Tokens currently on the board.
    pub fn placed(&self) -> impl Iterator<Item = &Bridge> {
        self.bridges.iter().filter(|b| b.is_placed())
    }

    /// Tokens of `type_id`, placed or not.
    pub fn of_type<'a>(&'a self, type_id: &'a str) -> impl Iterator<Item = &'a Bridge> {
        self.bridges.iter().filter(move |b| b.type_id == type_id)
    }

    /// Unplaced tokens per type. Every type in the inventory appears, exhausted ones with 0.
    pub fn available_counts(&self) -> BTreeMap<BridgeTypeId, usize> {
        let mut counts = BTreeMap::new();
        for bridge in &self.bridges {
            *counts.entry(bridge.type_id.clone()).or_insert(0) += usize::from(!bridge.is_placed());
        }
        counts
    }

    /// Total tokens, placed or not.
    pub fn len(&self) -> usize {
        self.bridges.len()
    }

    /// Whether the inventory holds no tokens at all.
    pub fn is_empty(&self) -> bool {
        self.bridges.is_empty()
    }
}
