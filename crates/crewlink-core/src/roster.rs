//! Roster files and the tag index built over them.

use crate::entity::{Entity, EntityId, TaggedEntity};
use crate::taxonomy::{Dimension, Tag, TagInfo};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors loading or saving roster files
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed roster data in {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize roster: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("duplicate entity id {0}")]
    DuplicateId(EntityId),
}

/// Read-only tagged roster with lookup by id
#[derive(Debug, Clone, Default)]
pub struct Roster {
    entities: Vec<TaggedEntity>,
    by_id: HashMap<EntityId, usize>,
}

impl Roster {
    pub fn from_entities(entities: Vec<TaggedEntity>) -> Result<Self, RosterError> {
        let mut by_id = HashMap::with_capacity(entities.len());
        for (idx, entity) in entities.iter().enumerate() {
            if by_id.insert(entity.id(), idx).is_some() {
                return Err(RosterError::DuplicateId(entity.id()));
            }
        }
        Ok(Self { entities, by_id })
    }

    /// Parse a tagged roster from JSON text
    pub fn from_json(json: &str) -> Result<Self, RosterError> {
        let entities = parse_json(json, "inline JSON")?;
        Self::from_entities(entities)
    }

    /// Load a tagged roster file
    pub fn load(path: &Path) -> Result<Self, RosterError> {
        let entities = read_json(path)?;
        let roster = Self::from_entities(entities)?;
        tracing::debug!(path = %path.display(), entities = roster.len(), "loaded tagged roster");
        Ok(roster)
    }

    pub fn get(&self, id: EntityId) -> Option<&TaggedEntity> {
        self.by_id.get(&id).map(|&idx| &self.entities[idx])
    }

    pub fn entities(&self) -> &[TaggedEntity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Whether `id` is in the roster and carries `tag`
    pub fn carries(&self, id: EntityId, tag: Tag) -> bool {
        self.get(id).is_some_and(|e| e.has(tag))
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(json: &str, origin: &str) -> Result<T, RosterError> {
    serde_json::from_str(json).map_err(|source| RosterError::Parse {
        origin: origin.to_string(),
        source,
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, RosterError> {
    let json = fs::read_to_string(path).map_err(|source| RosterError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_json(&json, &path.display().to_string())
}

/// Load the harvester's raw entity file
pub fn load_entities(path: &Path) -> Result<Vec<Entity>, RosterError> {
    let entities: Vec<Entity> = read_json(path)?;
    tracing::debug!(path = %path.display(), entities = entities.len(), "loaded raw roster");
    Ok(entities)
}

/// Write a tagged roster as pretty JSON
pub fn save_tagged(path: &Path, entities: &[TaggedEntity]) -> Result<(), RosterError> {
    let json = serde_json::to_string_pretty(entities).map_err(RosterError::Serialize)?;
    fs::write(path, json).map_err(|source| RosterError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Carriers of every tag, in roster order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagIndex {
    pools: HashMap<Tag, Vec<EntityId>>,
}

impl TagIndex {
    pub fn build(roster: &Roster) -> Self {
        let mut pools: HashMap<Tag, Vec<EntityId>> = HashMap::new();
        for entity in roster.entities() {
            for tag in &entity.tags {
                pools.entry(*tag).or_default().push(entity.id());
            }
        }
        Self { pools }
    }

    pub fn pool(&self, tag: Tag) -> &[EntityId] {
        self.pools.get(&tag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn pool_size(&self, tag: Tag) -> usize {
        self.pool(tag).len()
    }
}

/// Carrier count of every catalog tag
#[derive(Debug, Clone)]
pub struct TagReport {
    pub entities: usize,
    pub rows: Vec<(TagInfo, usize)>,
}

impl TagReport {
    pub fn new(roster: &Roster) -> Self {
        let index = TagIndex::build(roster);
        Self {
            entities: roster.len(),
            rows: Tag::catalog()
                .map(|info| (info, index.pool_size(info.tag)))
                .collect(),
        }
    }

    /// Tags that can form a group on their own: board-eligible with at least
    /// `min_pool` carriers
    pub fn usable(&self, min_pool: usize) -> impl Iterator<Item = &TagInfo> {
        self.rows
            .iter()
            .filter(move |(info, count)| info.dimension.is_board_eligible() && *count >= min_pool)
            .map(|(info, _)| info)
    }

    /// Distinct board-eligible dimensions that have at least one usable tag
    pub fn usable_dimensions(&self, min_pool: usize) -> Vec<Dimension> {
        let mut dims: Vec<Dimension> = self.usable(min_pool).map(|info| info.dimension).collect();
        dims.sort();
        dims.dedup();
        dims
    }
}

impl fmt::Display for TagReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} entities", self.entities)?;
        for (info, count) in &self.rows {
            writeln!(f, "{:>5}  {:<36} {}", count, info.tag.id(), info.label)?;
        }
        Ok(())
    }
}
