use crate::entity::{EntityId, EntitySummary};
use crate::roster::Roster;
use crate::taxonomy::{Difficulty, Dimension, Tag};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Groups per board
pub const GROUP_COUNT: usize = 4;
/// Members per group
pub const GROUP_SIZE: usize = 4;
/// Cells on the board
pub const BOARD_SIZE: usize = GROUP_COUNT * GROUP_SIZE;

/// One answer set: four entities sharing `tag`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleGroup {
    pub id: String,
    pub tag: Tag,
    pub label: String,
    pub difficulty: Difficulty,
    pub member_ids: Vec<EntityId>,
}

impl PuzzleGroup {
    /// Group at board position `index`, labelled from the catalog
    pub fn new(index: usize, tag: Tag, member_ids: Vec<EntityId>) -> Self {
        let info = tag.info();
        Self {
            id: format!("g{}", index),
            tag,
            label: info.label.to_string(),
            difficulty: info.difficulty,
            member_ids,
        }
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.member_ids.contains(&id)
    }
}

/// A generated board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    pub id: String,
    pub groups: Vec<PuzzleGroup>,
    /// Board order of every member
    pub all_member_ids: Vec<EntityId>,
}

/// Board with member ids resolved for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPuzzle {
    pub id: String,
    pub groups: Vec<PuzzleGroup>,
    pub cells: Vec<EntitySummary>,
}

/// A broken puzzle invariant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PuzzleViolation {
    #[error("expected 4 groups, found {0}")]
    GroupCount(usize),
    #[error("group {group} has {size} members, expected 4")]
    GroupSize { group: String, size: usize },
    #[error("entity {0} appears more than once")]
    DuplicateMember(EntityId),
    #[error("board order is not a permutation of the group members")]
    BoardMismatch,
    #[error("dimension {0} is used by more than one group")]
    RepeatedDimension(Dimension),
    #[error("tag {0} cannot form a group on its own")]
    IneligibleTag(Tag),
    #[error("entity {id} in group {group} does not carry its tag")]
    MemberLacksTag { group: String, id: EntityId },
    #[error("{count} board entities carry {tag}, expected 4")]
    Ambiguous { tag: Tag, count: usize },
}

/// For each group, how many board entities carry the group's tag
pub fn group_tag_counts(groups: &[PuzzleGroup], roster: &Roster) -> Vec<(Tag, usize)> {
    groups
        .iter()
        .map(|group| {
            let count = groups
                .iter()
                .flat_map(|g| g.member_ids.iter())
                .filter(|id| roster.carries(**id, group.tag))
                .count();
            (group.tag, count)
        })
        .collect()
}

/// First group tag carried by more (or fewer) than [`GROUP_SIZE`] board
/// entities. `None` means every group has exactly one valid assignment.
pub fn find_ambiguity(groups: &[PuzzleGroup], roster: &Roster) -> Option<(Tag, usize)> {
    group_tag_counts(groups, roster)
        .into_iter()
        .find(|(_, count)| *count != GROUP_SIZE)
}

impl Puzzle {
    /// Verify every structural and uniqueness invariant against `roster`
    pub fn check_invariants(&self, roster: &Roster) -> Result<(), PuzzleViolation> {
        if self.groups.len() != GROUP_COUNT {
            return Err(PuzzleViolation::GroupCount(self.groups.len()));
        }

        let mut seen = HashSet::new();
        let mut dimensions = HashSet::new();
        for group in &self.groups {
            if group.member_ids.len() != GROUP_SIZE {
                return Err(PuzzleViolation::GroupSize {
                    group: group.id.clone(),
                    size: group.member_ids.len(),
                });
            }
            let dimension = group.tag.dimension();
            if !dimension.is_board_eligible() {
                return Err(PuzzleViolation::IneligibleTag(group.tag));
            }
            if !dimensions.insert(dimension) {
                return Err(PuzzleViolation::RepeatedDimension(dimension));
            }
            for &id in &group.member_ids {
                if !seen.insert(id) {
                    return Err(PuzzleViolation::DuplicateMember(id));
                }
                if !roster.carries(id, group.tag) {
                    return Err(PuzzleViolation::MemberLacksTag {
                        group: group.id.clone(),
                        id,
                    });
                }
            }
        }

        let mut board = self.all_member_ids.clone();
        let mut members: Vec<EntityId> = seen.into_iter().collect();
        board.sort_unstable();
        members.sort_unstable();
        if board != members {
            return Err(PuzzleViolation::BoardMismatch);
        }

        match find_ambiguity(&self.groups, roster) {
            Some((tag, count)) => Err(PuzzleViolation::Ambiguous { tag, count }),
            None => Ok(()),
        }
    }

    /// Expand the board into display cells. Ids missing from the roster are
    /// dropped.
    pub fn resolve(&self, roster: &Roster) -> ResolvedPuzzle {
        ResolvedPuzzle {
            id: self.id.clone(),
            groups: self.groups.clone(),
            cells: self
                .all_member_ids
                .iter()
                .filter_map(|id| roster.get(*id))
                .map(|e| e.entity.summary())
                .collect(),
        }
    }

    /// The group whose members are exactly `selection`, in any order
    pub fn group_for(&self, selection: &[EntityId]) -> Option<&PuzzleGroup> {
        let picked: HashSet<EntityId> = selection.iter().copied().collect();
        if selection.len() != GROUP_SIZE || picked.len() != GROUP_SIZE {
            return None;
        }
        self.groups
            .iter()
            .find(|g| g.member_ids.iter().all(|id| picked.contains(id)))
    }

    /// Largest number of `selection` ids that fall into a single group
    pub fn best_overlap(&self, selection: &[EntityId]) -> usize {
        let picked: HashSet<EntityId> = selection.iter().copied().collect();
        self.groups
            .iter()
            .map(|g| g.member_ids.iter().filter(|id| picked.contains(*id)).count())
            .max()
            .unwrap_or(0)
    }
}
