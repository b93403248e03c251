// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Two-scan placement protocol with container chaining.
//!
//! States are `Empty` and `Holding(item)`. A resolved scan while holding
//! something either replaces the selection or, when the scanned record is a
//! container, stores the held item into it. After a successful store the
//! container itself becomes the held item, so `item -> box -> shelf -> room`
//! can be placed in one continuous session.
//!
//! The machine is pure: [`PlacementChain::plan`] decides what a resolved
//! scan means and the caller performs the store command before committing
//! the result with [`PlacementChain::hold`].

use boxbuddy_core::ItemRef;

/// State of the placement chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChainState {
    #[default]
    Empty,
    Holding(ItemRef),
}

/// What a resolved scan asks the caller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainStep {
    /// Make `0` the current holding. No command is issued.
    Hold(ItemRef),
    /// Store `item` into `container`; on success hold `container`.
    Store { item: ItemRef, container: ItemRef },
}

/// The place-in chain owned by a single scanning session.
#[derive(Debug, Clone, Default)]
pub struct PlacementChain {
    state: ChainState,
}

impl PlacementChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ChainState {
        &self.state
    }

    /// The currently held item, if any.
    pub fn holding(&self) -> Option<&ItemRef> {
        match &self.state {
            ChainState::Empty => None,
            ChainState::Holding(item) => Some(item),
        }
    }

    /// Decides the transition for a successfully resolved record.
    ///
    /// Re-scanning the held record is treated as replacing the selection with
    /// the same value; it never stores a record into itself.
    pub fn plan(&self, scanned: ItemRef) -> ChainStep {
        match &self.state {
            ChainState::Empty => ChainStep::Hold(scanned),
            ChainState::Holding(held) if held.id == scanned.id => ChainStep::Hold(scanned),
            ChainState::Holding(held) if scanned.is_container => ChainStep::Store {
                item: held.clone(),
                container: scanned,
            },
            ChainState::Holding(_) => ChainStep::Hold(scanned),
        }
    }

    /// Commits `item` as the current holding.
    pub fn hold(&mut self, item: ItemRef) {
        self.state = ChainState::Holding(item);
    }

    /// Drops any holding.
    pub fn clear(&mut self) {
        self.state = ChainState::Empty;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> ItemRef {
        ItemRef {
            id: id.into(),
            name: format!("item {id}"),
            is_container: false,
        }
    }

    fn container(id: &str) -> ItemRef {
        ItemRef {
            id: id.into(),
            name: format!("box {id}"),
            is_container: true,
        }
    }

    #[test]
    fn empty_holds_whatever_is_scanned() {
        let chain = PlacementChain::new();
        assert_eq!(chain.plan(item("i")), ChainStep::Hold(item("i")));
        assert_eq!(chain.plan(container("c")), ChainStep::Hold(container("c")));
    }

    #[test]
    fn holding_then_container_stores() {
        let mut chain = PlacementChain::new();
        chain.hold(item("i"));
        assert_eq!(
            chain.plan(container("c")),
            ChainStep::Store {
                item: item("i"),
                container: container("c")
            }
        );
    }

    #[test]
    fn holding_then_plain_item_replaces() {
        let mut chain = PlacementChain::new();
        chain.hold(item("i"));
        assert_eq!(chain.plan(item("j")), ChainStep::Hold(item("j")));
    }

    #[test]
    fn container_chains_into_container() {
        let mut chain = PlacementChain::new();
        chain.hold(container("c1"));
        assert_eq!(
            chain.plan(container("c2")),
            ChainStep::Store {
                item: container("c1"),
                container: container("c2")
            }
        );
    }

    #[test]
    fn rescanning_held_container_is_a_replace() {
        let mut chain = PlacementChain::new();
        chain.hold(container("c"));
        assert_eq!(chain.plan(container("c")), ChainStep::Hold(container("c")));
    }

    #[test]
    fn clear_returns_to_empty() {
        let mut chain = PlacementChain::new();
        chain.hold(item("i"));
        chain.clear();
        assert_eq!(chain.state(), &ChainState::Empty);
        assert!(chain.holding().is_none());
    }
}
