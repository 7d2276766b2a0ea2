//! Builders and rosters shared by the unit tests.

use crate::entity::{Entity, EntityId, TaggedEntity};
use crate::taxonomy::Tag;

pub struct EntityBuilder {
    entity: Entity,
}

impl EntityBuilder {
    pub fn new(id: EntityId, name: &str) -> Self {
        Self {
            entity: Entity::new(id, name),
        }
    }

    pub fn affiliations(mut self, values: &[&str]) -> Self {
        self.entity.affiliations = values.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn occupations(mut self, values: &[&str]) -> Self {
        self.entity.occupations = values.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn power_type(mut self, value: &str) -> Self {
        self.entity.power_type = Some(value.to_string());
        self
    }

    pub fn awakened(mut self, value: Option<bool>) -> Self {
        self.entity.awakened = value;
        self
    }

    pub fn abilities(mut self, values: &[&str]) -> Self {
        self.entity.abilities = values.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn race(mut self, value: &str) -> Self {
        self.entity.race = Some(value.to_string());
        self
    }

    pub fn status(mut self, value: &str) -> Self {
        self.entity.status = Some(value.to_string());
        self
    }

    pub fn origin(mut self, value: &str) -> Self {
        self.entity.origin = Some(value.to_string());
        self
    }

    pub fn build(self) -> Entity {
        self.entity
    }
}

/// A handful of realistic harvested records
pub fn sample_roster() -> Vec<Entity> {
    vec![
        EntityBuilder::new(1, "Monkey D. Luffy")
            .affiliations(&["Straw Hat Pirates", "Four Emperors"])
            .occupations(&["Captain", "Emperor"])
            .power_type("Mythical Zoan")
            .awakened(Some(true))
            .abilities(&["Observation", "Armament", "Conqueror"])
            .race("Human")
            .status("Alive")
            .origin("Foosha Village, East Blue")
            .build(),
        EntityBuilder::new(2, "Roronoa Zoro")
            .affiliations(&["Straw Hat Pirates"])
            .occupations(&["Combatant", "Swordsman"])
            .abilities(&["Observation", "Armament", "Conqueror"])
            .race("Human")
            .origin("Shimotsuki Village, East Blue")
            .build(),
        EntityBuilder::new(3, "Nico Robin")
            .affiliations(&["Straw Hat Pirates", "Revolutionary Army"])
            .occupations(&["Archaeologist"])
            .power_type("Paramecia")
            .race("Human")
            .status("Alive")
            .origin("Ohara, West Blue")
            .build(),
        EntityBuilder::new(4, "Gol D. Roger")
            .affiliations(&["Roger Pirates"])
            .occupations(&["Captain", "Pirate King"])
            .abilities(&["Observation", "Armament", "Conqueror"])
            .race("Human")
            .status("Deceased")
            .origin("Loguetown, East Blue")
            .build(),
        EntityBuilder::new(5, "Jinbe")
            .affiliations(&["Straw Hat Pirates", "Sun Pirates", "Warlords of the Sea"])
            .occupations(&["Helmsman", "Captain"])
            .abilities(&["Observation", "Armament"])
            .race("Fish-Man")
            .status("Alive")
            .origin("Fish-Man Island")
            .build(),
        EntityBuilder::new(6, "Borsalino")
            .affiliations(&["Marines"])
            .occupations(&["Admiral"])
            .power_type("Logia")
            .abilities(&["Observation", "Armament"])
            .race("Human")
            .build(),
    ]
}

/// Tagged entity with exactly the given tags, bypassing the classifier
pub fn tagged(id: EntityId, tags: &[Tag]) -> TaggedEntity {
    TaggedEntity {
        entity: Entity::new(id, format!("Entity {}", id)),
        tags: tags.iter().copied().collect(),
    }
}
