//! Core board model for the skysearch survey deduction game.
//!
//! This crate provides the circular [`Board`] of sectors, the [`SpaceObject`]
//! kinds that occupy them, and the [`ObjectCounts`] multiset used to describe
//! how many of each object a board must contain. Placement rules and board
//! generation live in the `skysearch-rules` and `skysearch-generator` crates.

pub use self::{board::*, counts::*, object::*};

mod board;
mod counts;
mod object;
