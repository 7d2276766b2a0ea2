use crewlink_core::{
    classify_all, Difficulty, Entity, EntityId, Generator, Puzzle, PuzzleGroup, Roster,
    RosterError, TagIndex, GROUP_COUNT,
};
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

uniffi::setup_scaffolding!();

/// Wrong guesses allowed before the game ends
pub const MAX_MISTAKES: u32 = 4;

/// Errors surfaced to the host app
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum PuzzleError {
    #[error("roster error: {message}")]
    Roster { message: String },
    #[error("generation failed: {message}")]
    Generation { message: String },
}

impl From<RosterError> for PuzzleError {
    fn from(e: RosterError) -> Self {
        PuzzleError::Roster {
            message: e.to_string(),
        }
    }
}

/// Difficulty of a group's connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum GroupDifficulty {
    Easy,
    Medium,
    Hard,
}

impl From<Difficulty> for GroupDifficulty {
    fn from(d: Difficulty) -> Self {
        match d {
            Difficulty::Easy => GroupDifficulty::Easy,
            Difficulty::Medium => GroupDifficulty::Medium,
            Difficulty::Hard => GroupDifficulty::Hard,
        }
    }
}

/// One answer group
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct GameGroup {
    pub id: String,
    /// Tag id, e.g. `affiliation:straw-hats`
    pub tag: String,
    pub label: String,
    pub difficulty: GroupDifficulty,
    pub member_ids: Vec<u64>,
}

impl From<&PuzzleGroup> for GameGroup {
    fn from(group: &PuzzleGroup) -> Self {
        GameGroup {
            id: group.id.clone(),
            tag: group.tag.id().to_string(),
            label: group.label.clone(),
            difficulty: group.difficulty.into(),
            member_ids: group.member_ids.clone(),
        }
    }
}

/// A board cell ready for display
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct GameCell {
    pub id: u64,
    pub name: String,
    pub image_url: Option<String>,
}

/// A generated puzzle with its cells in board order
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct GamePuzzle {
    pub id: String,
    pub groups: Vec<GameGroup>,
    pub cells: Vec<GameCell>,
}

fn game_puzzle(puzzle: &Puzzle, roster: &Roster) -> GamePuzzle {
    let resolved = puzzle.resolve(roster);
    GamePuzzle {
        id: resolved.id,
        groups: resolved.groups.iter().map(GameGroup::from).collect(),
        cells: resolved
            .cells
            .into_iter()
            .map(|c| GameCell {
                id: c.id,
                name: c.name,
                image_url: c.image_url,
            })
            .collect(),
    }
}

/// Outcome of submitting a selection
#[derive(Debug, Clone, PartialEq, uniffi::Enum)]
pub enum GuessResult {
    /// The selection is exactly one group
    Correct { group: GameGroup },
    /// Three of the four share a group
    OneAway,
    Incorrect,
    /// That group was already found
    AlreadySolved,
    /// Not four distinct unsolved cells on this board
    InvalidSelection,
    /// No more guesses are accepted
    GameOver,
}

/// Loaded roster that can deal puzzles
#[derive(uniffi::Object)]
pub struct PuzzleService {
    roster: Roster,
    index: TagIndex,
}

impl PuzzleService {
    fn with_roster(roster: Roster) -> Arc<Self> {
        let index = TagIndex::build(&roster);
        Arc::new(Self { roster, index })
    }

    /// An empty seed asks for a new puzzle, same as no seed
    fn build(&self, seed: Option<String>) -> Result<Puzzle, PuzzleError> {
        let seed = seed.filter(|s| !s.is_empty());
        Generator::new(&self.roster)
            .with_index(&self.index)
            .generate(seed.as_deref())
            .map_err(|e| PuzzleError::Generation {
                message: e.to_string(),
            })
    }
}

#[uniffi::export]
impl PuzzleService {
    /// Load a tagged roster from JSON text
    #[uniffi::constructor]
    pub fn from_json(json: String) -> Result<Arc<Self>, PuzzleError> {
        Ok(Self::with_roster(Roster::from_json(&json)?))
    }

    /// Load a tagged roster file
    #[uniffi::constructor]
    pub fn from_path(path: String) -> Result<Arc<Self>, PuzzleError> {
        Ok(Self::with_roster(Roster::load(Path::new(&path))?))
    }

    pub fn entity_count(&self) -> u64 {
        self.roster.len() as u64
    }

    /// Generate a puzzle. The same seed always yields the same puzzle.
    pub fn generate(&self, seed: Option<String>) -> Result<GamePuzzle, PuzzleError> {
        let puzzle = self.build(seed)?;
        Ok(game_puzzle(&puzzle, &self.roster))
    }

    /// Generate a puzzle and start a game on it
    pub fn new_game(&self, seed: Option<String>) -> Result<Arc<ConnectionsGame>, PuzzleError> {
        let puzzle = self.build(seed)?;
        Ok(ConnectionsGame::start(&puzzle, &self.roster))
    }
}

/// Tag a harvested roster; returns the tagged roster as JSON
#[uniffi::export]
pub fn tag_roster_json(raw_json: String) -> Result<String, PuzzleError> {
    let entities: Vec<Entity> =
        serde_json::from_str(&raw_json).map_err(|e| PuzzleError::Roster {
            message: e.to_string(),
        })?;
    serde_json::to_string(&classify_all(&entities)).map_err(|e| PuzzleError::Roster {
        message: e.to_string(),
    })
}

#[derive(Debug, Default)]
struct GameState {
    /// Indices into `groups`, in the order they were found
    solved: Vec<usize>,
    mistakes: u32,
}

impl GameState {
    fn is_over(&self) -> bool {
        self.solved.len() == GROUP_COUNT || self.mistakes >= MAX_MISTAKES
    }
}

/// One play-through of a puzzle
#[derive(uniffi::Object)]
pub struct ConnectionsGame {
    puzzle: GamePuzzle,
    state: Mutex<GameState>,
}

impl ConnectionsGame {
    fn start(puzzle: &Puzzle, roster: &Roster) -> Arc<Self> {
        Arc::new(Self {
            puzzle: game_puzzle(puzzle, roster),
            state: Mutex::new(GameState::default()),
        })
    }

    fn state(&self) -> MutexGuard<'_, GameState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn group_of(&self, id: EntityId) -> Option<usize> {
        self.puzzle
            .groups
            .iter()
            .position(|g| g.member_ids.contains(&id))
    }
}

#[uniffi::export]
impl ConnectionsGame {
    pub fn puzzle_id(&self) -> String {
        self.puzzle.id.clone()
    }

    /// Cells in board order
    pub fn cells(&self) -> Vec<GameCell> {
        self.puzzle.cells.clone()
    }

    /// Submit four cell ids as a guess
    pub fn submit_guess(&self, ids: Vec<u64>) -> GuessResult {
        let mut state = self.state();
        if state.is_over() {
            return GuessResult::GameOver;
        }

        let distinct: HashSet<u64> = ids.iter().copied().collect();
        if ids.len() != 4 || distinct.len() != ids.len() {
            return GuessResult::InvalidSelection;
        }
        let Some(owners) = ids
            .iter()
            .map(|id| self.group_of(*id))
            .collect::<Option<Vec<usize>>>()
        else {
            return GuessResult::InvalidSelection;
        };

        let first = owners[0];
        if owners.iter().all(|g| *g == first) {
            if state.solved.contains(&first) {
                return GuessResult::AlreadySolved;
            }
            state.solved.push(first);
            return GuessResult::Correct {
                group: self.puzzle.groups[first].clone(),
            };
        }
        if owners.iter().any(|g| state.solved.contains(g)) {
            return GuessResult::InvalidSelection;
        }

        state.mistakes += 1;
        let best = owners
            .iter()
            .map(|g| owners.iter().filter(|o| *o == g).count())
            .max()
            .unwrap_or(0);
        if best == 3 {
            GuessResult::OneAway
        } else {
            GuessResult::Incorrect
        }
    }

    /// Groups found so far, in the order they were found
    pub fn solved_groups(&self) -> Vec<GameGroup> {
        self.state()
            .solved
            .iter()
            .map(|&g| self.puzzle.groups[g].clone())
            .collect()
    }

    pub fn mistakes_remaining(&self) -> u32 {
        MAX_MISTAKES.saturating_sub(self.state().mistakes)
    }

    pub fn is_won(&self) -> bool {
        self.state().solved.len() == GROUP_COUNT
    }

    pub fn is_over(&self) -> bool {
        self.state().is_over()
    }

    /// All groups, for the reveal once the game is over
    pub fn answer(&self) -> Vec<GameGroup> {
        self.puzzle.groups.clone()
    }
}
