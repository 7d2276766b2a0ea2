//! Connection puzzles built from a classified character roster.
//!
//! The pipeline has two halves:
//!
//! - [`classifier`] turns harvested [`Entity`] records into [`TaggedEntity`]
//!   records, once per roster version.
//! - [`generator`] picks four tags from distinct dimensions and four carriers
//!   per tag, retrying until the board has exactly one valid partition.
//!
//! ```no_run
//! use crewlink_core::{Generator, Roster};
//! use std::path::Path;
//!
//! let roster = Roster::load(Path::new("onepiece_characters_tagged.json"))?;
//! let puzzle = Generator::new(&roster).generate(Some("demo"))?;
//! println!("{}", serde_json::to_string_pretty(&puzzle)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod classifier;
pub mod entity;
pub mod generator;
pub mod puzzle;
pub mod rng;
pub mod roster;
pub mod taxonomy;

#[cfg(test)]
pub(crate) mod fixtures;

pub use classifier::{classify, classify_all};
pub use entity::{Entity, EntityId, EntitySummary, TaggedEntity};
pub use generator::{
    generate, AttemptFailure, GenerateError, Generator, GeneratorConfig, DEFAULT_MAX_ATTEMPTS,
};
pub use puzzle::{
    Puzzle, PuzzleGroup, PuzzleViolation, ResolvedPuzzle, BOARD_SIZE, GROUP_COUNT, GROUP_SIZE,
};
pub use rng::{ClockEntropy, EntropySource, FixedEntropy, Prng, SystemEntropy};
pub use roster::{load_entities, save_tagged, Roster, RosterError, TagIndex, TagReport};
pub use taxonomy::{Difficulty, Dimension, Tag, TagInfo};
