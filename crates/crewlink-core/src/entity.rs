use crate::taxonomy::Tag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Stable roster identifier (the wiki page id)
pub type EntityId = u64;

/// One harvested character record.
///
/// Field names on the wire follow the harvester's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Crews, organizations and families
    #[serde(rename = "crews", default)]
    pub affiliations: Vec<String>,
    #[serde(rename = "roles", default)]
    pub occupations: Vec<String>,
    /// Devil fruit category as written by the harvester
    #[serde(rename = "devilFruitType", default)]
    pub power_type: Option<String>,
    #[serde(rename = "hasAwakenedFruit", default)]
    pub awakened: Option<bool>,
    /// Haki categories
    #[serde(rename = "hakiTypes", default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub race: Option<String>,
    /// Ranking value. A multi-bounty history arrives as one number that can
    /// exceed `u64`.
    #[serde(rename = "bountyNumber", default)]
    pub bounty: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
}

impl Entity {
    /// Minimal record with every optional field empty
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            image_url: None,
            affiliations: Vec::new(),
            occupations: Vec::new(),
            power_type: None,
            awakened: None,
            abilities: Vec::new(),
            race: None,
            bounty: None,
            status: None,
            origin: None,
        }
    }

    pub fn summary(&self) -> EntitySummary {
        EntitySummary {
            id: self.id,
            name: self.name.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

/// Entity plus the tags the classifier assigned to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedEntity {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(default)]
    pub tags: BTreeSet<Tag>,
}

impl TaggedEntity {
    pub fn id(&self) -> EntityId {
        self.entity.id
    }

    pub fn has(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }
}

/// Display shape of an entity: what a board cell needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySummary {
    pub id: EntityId,
    pub name: String,
    pub image_url: Option<String>,
}

/// Devil fruit categories the classifier recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerType {
    Paramecia,
    Logia,
    Zoan,
    MythicalZoan,
}

impl PowerType {
    /// Exact match against the harvester's labels
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Paramecia" => Some(PowerType::Paramecia),
            "Logia" => Some(PowerType::Logia),
            "Zoan" => Some(PowerType::Zoan),
            "Mythical Zoan" => Some(PowerType::MythicalZoan),
            _ => None,
        }
    }

    pub fn is_zoan(&self) -> bool {
        matches!(self, PowerType::Zoan | PowerType::MythicalZoan)
    }
}

/// Haki categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ability {
    Observation,
    Armament,
    Conqueror,
}

impl Ability {
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Observation" => Some(Ability::Observation),
            "Armament" => Some(Ability::Armament),
            "Conqueror" => Some(Ability::Conqueror),
            _ => None,
        }
    }
}
