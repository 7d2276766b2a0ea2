use crate::entity::EntityId;
use crate::puzzle::{find_ambiguity, Puzzle, PuzzleGroup, GROUP_COUNT, GROUP_SIZE};
use crate::rng::{unix_millis, EntropySource, Prng, SystemEntropy};
use crate::roster::{Roster, TagIndex};
use crate::taxonomy::{Dimension, Tag};
use std::borrow::Cow;
use std::collections::HashSet;

/// Default cap on construction attempts per puzzle
pub const DEFAULT_MAX_ATTEMPTS: usize = 200;

/// Configuration for puzzle generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Maximum attempts before giving up
    pub max_attempts: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Why a single construction attempt was discarded
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttemptFailure {
    #[error("only {found} tags from distinct eligible dimensions have enough carriers")]
    NotEnoughTags { found: usize },
    #[error("only {available} unclaimed carriers left for {tag}")]
    PoolExhausted { tag: Tag, available: usize },
    #[error("{count} board entities carry {tag}")]
    Ambiguous { tag: Tag, count: usize },
}

/// Generation gave up
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error(
        "no unique-solution puzzle after {attempts} attempts (seed {}){}",
        .seed.as_deref().unwrap_or("<none>"),
        .last_failure.as_ref().map(|f| format!(": {}", f)).unwrap_or_default()
    )]
    Exhausted {
        attempts: usize,
        seed: Option<String>,
        last_failure: Option<AttemptFailure>,
    },
}

/// Builds puzzles from a tagged roster
pub struct Generator<'r> {
    roster: &'r Roster,
    config: GeneratorConfig,
    entropy: Box<dyn EntropySource + Send + Sync>,
    index: Option<&'r TagIndex>,
}

impl<'r> Generator<'r> {
    /// Create a generator with the default configuration
    pub fn new(roster: &'r Roster) -> Self {
        Self::with_config(roster, GeneratorConfig::default())
    }

    /// Create a generator with a custom configuration
    pub fn with_config(roster: &'r Roster, config: GeneratorConfig) -> Self {
        Self {
            roster,
            config,
            entropy: Box::new(SystemEntropy),
            index: None,
        }
    }

    /// Replace the seed source used when no seed is given
    pub fn with_entropy(mut self, entropy: impl EntropySource + Send + Sync + 'static) -> Self {
        self.entropy = Box::new(entropy);
        self
    }

    /// Reuse a prebuilt index instead of rebuilding it per call.
    ///
    /// The index must have been built from the same roster.
    pub fn with_index(mut self, index: &'r TagIndex) -> Self {
        self.index = Some(index);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate one puzzle.
    ///
    /// With a seed the result is fully determined by the seed and the roster;
    /// without one the generator draws a fresh seed from its entropy source.
    pub fn generate(&self, seed: Option<&str>) -> Result<Puzzle, GenerateError> {
        let index = match self.index {
            Some(index) => Cow::Borrowed(index),
            None => Cow::Owned(TagIndex::build(self.roster)),
        };

        let (mut rng, id) = match seed {
            Some(seed) => (Prng::from_seed(seed), seed.to_string()),
            None => {
                let rng = Prng::from_entropy(self.entropy.as_ref());
                let id = format!("p-{}-{:08x}", unix_millis(), rng.state());
                (rng, id)
            }
        };

        let mut last_failure = None;
        for attempt in 1..=self.config.max_attempts {
            match self.attempt(&index, &mut rng) {
                Ok(groups) => {
                    let mut all_member_ids: Vec<EntityId> = groups
                        .iter()
                        .flat_map(|g| g.member_ids.iter().copied())
                        .collect();
                    rng.shuffle(&mut all_member_ids);

                    let puzzle = Puzzle {
                        id,
                        groups,
                        all_member_ids,
                    };
                    debug_assert_eq!(puzzle.check_invariants(self.roster), Ok(()));
                    tracing::info!(puzzle = %puzzle.id, attempts = attempt, "generated puzzle");
                    return Ok(puzzle);
                }
                Err(failure) => {
                    tracing::trace!(attempt, %failure, "attempt discarded");
                    last_failure = Some(failure);
                }
            }
        }

        tracing::warn!(
            attempts = self.config.max_attempts,
            seed = seed.unwrap_or("<none>"),
            "puzzle generation exhausted"
        );
        Err(GenerateError::Exhausted {
            attempts: self.config.max_attempts,
            seed: seed.map(str::to_string),
            last_failure,
        })
    }

    /// One independent construction attempt
    fn attempt(
        &self,
        index: &TagIndex,
        rng: &mut Prng,
    ) -> Result<Vec<PuzzleGroup>, AttemptFailure> {
        let tags = pick_tags(index, rng)?;

        let mut claimed = HashSet::new();
        let mut groups = Vec::with_capacity(GROUP_COUNT);
        for (position, tag) in tags.into_iter().enumerate() {
            let members = pick_members(tag, index, &mut claimed, rng)?;
            groups.push(PuzzleGroup::new(position, tag, members));
        }

        match find_ambiguity(&groups, self.roster) {
            Some((tag, count)) => Err(AttemptFailure::Ambiguous { tag, count }),
            None => Ok(groups),
        }
    }
}

/// Choose four tags from distinct board-eligible dimensions, each with
/// enough carriers, scanning the catalog in shuffled order
fn pick_tags(index: &TagIndex, rng: &mut Prng) -> Result<Vec<Tag>, AttemptFailure> {
    let mut catalog = Tag::ALL.to_vec();
    rng.shuffle(&mut catalog);

    let mut chosen = Vec::with_capacity(GROUP_COUNT);
    let mut used_dimensions: HashSet<Dimension> = HashSet::new();
    for tag in catalog {
        let dimension = tag.dimension();
        if !dimension.is_board_eligible() {
            continue;
        }
        if index.pool_size(tag) < GROUP_SIZE {
            continue;
        }
        if !used_dimensions.insert(dimension) {
            continue;
        }
        chosen.push(tag);
        if chosen.len() == GROUP_COUNT {
            return Ok(chosen);
        }
    }

    Err(AttemptFailure::NotEnoughTags {
        found: chosen.len(),
    })
}

/// Take the first four unclaimed carriers of `tag` in shuffled order
fn pick_members(
    tag: Tag,
    index: &TagIndex,
    claimed: &mut HashSet<EntityId>,
    rng: &mut Prng,
) -> Result<Vec<EntityId>, AttemptFailure> {
    let mut pool = index.pool(tag).to_vec();
    rng.shuffle(&mut pool);

    let mut members = Vec::with_capacity(GROUP_SIZE);
    for id in pool {
        if claimed.insert(id) {
            members.push(id);
            if members.len() == GROUP_SIZE {
                return Ok(members);
            }
        }
    }

    Err(AttemptFailure::PoolExhausted {
        tag,
        available: members.len(),
    })
}

/// Generate with the default configuration
pub fn generate(roster: &Roster, seed: Option<&str>) -> Result<Puzzle, GenerateError> {
    Generator::new(roster).generate(seed)
}
