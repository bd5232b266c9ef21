//! Board generation for skysearch.
//!
//! A [`BoardType`] fixes the object multiset and rule set for one board
//! size. From there this crate offers two ways to produce boards:
//!
//! - exhaustive enumeration through a staged constraint pipeline, either
//!   in memory ([`BoardType::generate_all`]) or streamed through stage
//!   files on disk ([`BoardType::generate_to_file`]) with optional
//!   index-modulo sharding for coarse parallelism;
//! - reproducible random sampling ([`BoardSampler`]) driven by a hashed
//!   [`BoardSeed`].

// Sector arithmetic moves between usize and isize for circular indexing.
#![allow(clippy::cast_possible_wrap)]

pub use self::{
    board_type::BoardType,
    pipeline::{GenerateConfig, GenerateError, GenerateReport, Shard},
    sampler::{BoardSampler, BoardSeed, ParseSeedError},
};

mod board_type;
mod pipeline;
mod sampler;
