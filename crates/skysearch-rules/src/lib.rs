//! Placement rules for skysearch boards.
//!
//! A [`Rule`] restricts where space objects may sit on a circular board.
//! Each rule can both check a board ([`Rule::is_satisfied`]) and extend a
//! partial board with every minimal safe placement of the objects it
//! governs ([`Rule::fill_board`]). The [`check_board`] helper runs a full
//! rule set against a candidate board.
//!
//! The [`combin`] module holds the shared combinatorial primitives the
//! fill algorithms are built from.

// Sector arithmetic moves between usize and isize for circular indexing,
// and boards never exceed 32 sectors.
#![allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]

pub use self::{
    qualifier::{Precision, Qualifier},
    rule::{
        AdjacentRule, AdjacentSelfRule, BandRule, FillError, NeighborExclusionRule, OppositeRule,
        Rule, SectorsRule, WithinRule, check_board,
    },
};

pub mod combin;
mod qualifier;
mod rule;
