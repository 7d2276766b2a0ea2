//! Rule-based tagging of harvested entities.
//!
//! Classification runs in two stages. The base stage evaluates every
//! single-field rule and records the results in [`BaseTraits`]; the composite
//! stage then evaluates conjunctions over that snapshot, so a composite rule
//! always sees the complete set of base tags.

use crate::entity::{Ability, Entity, PowerType, TaggedEntity};
use crate::taxonomy::Tag;
use std::collections::BTreeSet;

/// Affiliation tags and the keywords that select them
const AFFILIATION_RULES: &[(Tag, &[&str])] = &[
    (Tag::StrawHats, &["straw hat pirates"]),
    (Tag::RedHair, &["red hair pirates"]),
    (Tag::Beasts, &["beasts pirates"]),
    (Tag::BigMom, &["big mom pirates"]),
    (Tag::Blackbeard, &["blackbeard pirates"]),
    (Tag::Donquixote, &["donquixote pirates"]),
    (Tag::Roger, &["roger pirates"]),
    (Tag::Heart, &["heart pirates"]),
    (Tag::Kid, &["kid pirates"]),
    (Tag::Whitebeard, &["whitebeard pirates"]),
    (Tag::Marines, &["marines"]),
    (Tag::RevolutionaryArmy, &["revolutionary army"]),
    (Tag::CipherPol, &["cipher pol", "cp-0", "cp 0", "cp9", "cp 9"]),
    (Tag::Warlords, WARLORD_KEYWORDS),
    (Tag::EmperorCrews, &["emperor crew", "yonko"]),
    (Tag::KouzukiFamily, &["kouzuki family"]),
    (Tag::NefertariFamily, &["nefertari family"]),
    (Tag::RikuFamily, &["riku family"]),
    (Tag::VinsmokeFamily, &["vinsmoke family"]),
    (Tag::FishmanIsland, &["ryugu kingdom", "fish-man island"]),
    (Tag::AlabastaFactions, &["arabasta", "alabasta"]),
    (Tag::DressrosaFactions, &["dressrosa"]),
    (Tag::FiveElders, &["five elders"]),
    (Tag::KnightsOfGod, &["knights of god", "knight of god"]),
];

const WARLORD_KEYWORDS: &[&str] = &["warlords of the sea", "shichibukai"];

/// Role tags and the occupation keywords that select them
const ROLE_RULES: &[(Tag, &[&str])] = &[
    (Tag::Captain, &["captain"]),
    (Tag::FirstMate, &["first mate", "first-mate"]),
    (Tag::Helmsman, &["helmsman"]),
    (Tag::Sniper, &["sniper"]),
    (Tag::Swordsman, &["swordsman", "swordswoman"]),
    (Tag::Cook, &["cook", "chef"]),
    (Tag::Doctor, &["doctor", "ship doctor", "physician"]),
    (Tag::Shipwright, &["shipwright", "carpenter"]),
    (Tag::Navigator, &["navigator"]),
    (Tag::FleetAdmiral, &["fleet admiral"]),
    (Tag::Admiral, &["admiral"]),
    (Tag::ViceAdmiral, &["vice admiral"]),
    (Tag::Warden, &["warden", "chief guard"]),
    (Tag::Royalty, &["king", "queen", "princess", "prince"]),
];

/// Race keywords, most specific first. The first match wins.
const LINEAGE_RULES: &[(&[&str], Tag)] = &[
    (&["fish-man", "fishman"], Tag::Fishman),
    (&["merfolk"], Tag::Merfolk),
    (&["giant"], Tag::Giant),
    (&["mink"], Tag::Mink),
    (&["lunarian"], Tag::Lunarian),
    (&["half-", "hybrid"], Tag::MixedLineage),
    (&["human"], Tag::Human),
];

/// Origin label to region. The first match wins.
const ORIGIN_RULES: &[(&str, Tag)] = &[
    ("east blue", Tag::EastBlue),
    ("west blue", Tag::WestBlue),
    ("north blue", Tag::NorthBlue),
    ("south blue", Tag::SouthBlue),
    ("new world", Tag::NewWorld),
    ("grand line", Tag::GrandLine),
    ("dressrosa", Tag::FromDressrosa),
    ("alabasta", Tag::FromAlabasta),
    ("wano", Tag::FromWano),
    ("skypiea", Tag::FromSkypiea),
];

/// Conjunctions over the base stage
const COMPOSITE_RULES: &[(Tag, fn(&BaseTraits<'_>) -> bool)] = &[
    (Tag::ClanOfD, |t| t.name.contains(" D. ")),
    (Tag::Emperors, |t| {
        any_contains(&t.affiliations, &["four emperors"])
            || any_contains(&t.occupations, &["emperor"])
    }),
    (Tag::FormerWarlords, |t| {
        any_contains(&t.affiliations, WARLORD_KEYWORDS)
    }),
    (Tag::WorstGeneration, |t| {
        any_contains(&t.affiliations, &["worst generation"])
            || any_contains(&t.occupations, &["worst generation"])
    }),
    (Tag::DeceasedConqueror, |t| {
        t.has(Tag::Deceased) && t.has(Tag::Conqueror)
    }),
    (Tag::DeceasedAllThree, |t| {
        t.has(Tag::Deceased) && t.has(Tag::AllThreeHaki)
    }),
    (Tag::DeceasedLogia, |t| {
        t.has(Tag::Deceased) && t.power_type == Some(PowerType::Logia)
    }),
    (Tag::DeceasedParamecia, |t| {
        t.has(Tag::Deceased) && t.power_type == Some(PowerType::Paramecia)
    }),
    (Tag::DeceasedZoan, |t| {
        t.has(Tag::Deceased) && t.power_type.is_some_and(|p| p.is_zoan())
    }),
    (Tag::DeceasedCaptain, |t| {
        t.has(Tag::Deceased) && t.has(Tag::Captain)
    }),
    (Tag::DeceasedAdmiral, |t| {
        t.has(Tag::Deceased) && t.has(Tag::Admiral)
    }),
    (Tag::StrawHatsEastBlue, |t| {
        t.has(Tag::StrawHats) && t.has(Tag::EastBlue)
    }),
    (Tag::StrawHatsGrandLine, |t| {
        t.has(Tag::StrawHats) && t.has(Tag::GrandLine)
    }),
    (Tag::MarinesGrandLine, |t| {
        t.has(Tag::Marines) && t.has(Tag::GrandLine)
    }),
    (Tag::MarinesNewWorld, |t| {
        t.has(Tag::Marines) && t.has(Tag::NewWorld)
    }),
];

/// Output of the base stage: every base tag plus the normalized fields the
/// composite rules read.
#[derive(Debug, Clone)]
pub struct BaseTraits<'a> {
    pub name: &'a str,
    pub affiliations: Vec<String>,
    pub occupations: Vec<String>,
    pub power_type: Option<PowerType>,
    pub tags: BTreeSet<Tag>,
}

impl BaseTraits<'_> {
    pub fn has(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }
}

fn lowercase_all(values: &[String]) -> Vec<String> {
    values.iter().map(|s| s.to_lowercase()).collect()
}

/// Whether any (already lowercased) haystack contains any needle
fn any_contains(haystacks: &[String], needles: &[&str]) -> bool {
    needles
        .iter()
        .any(|needle| haystacks.iter().any(|hay| hay.contains(needle)))
}

fn lowercase_field(value: &Option<String>) -> String {
    value
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default()
}

/// Region tag for an origin label, if the label maps to a known region
pub fn normalize_origin(origin: Option<&str>) -> Option<Tag> {
    let origin = origin?.to_lowercase();
    ORIGIN_RULES
        .iter()
        .find(|(needle, _)| origin.contains(needle))
        .map(|(_, tag)| *tag)
}

fn lineage(race: &Option<String>) -> Option<Tag> {
    let race = lowercase_field(race);
    if race.is_empty() {
        return None;
    }
    LINEAGE_RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| race.contains(n)))
        .map(|(_, tag)| *tag)
}

fn life_status(status: &Option<String>) -> Option<Tag> {
    let status = lowercase_field(status);
    if status.is_empty() || status.contains("alive") {
        Some(Tag::Alive)
    } else if status.contains("deceased") || status.contains("dead") {
        Some(Tag::Deceased)
    } else {
        None
    }
}

/// Evaluate every base-dimension rule
pub fn base_traits(entity: &Entity) -> BaseTraits<'_> {
    let affiliations = lowercase_all(&entity.affiliations);
    let occupations = lowercase_all(&entity.occupations);
    let mut tags = BTreeSet::new();

    for (tag, needles) in AFFILIATION_RULES {
        if any_contains(&affiliations, needles) {
            tags.insert(*tag);
        }
    }

    for (tag, needles) in ROLE_RULES {
        if any_contains(&occupations, needles) {
            tags.insert(*tag);
        }
    }

    let power_type = entity.power_type.as_deref().and_then(PowerType::parse);
    if let Some(power) = power_type {
        tags.insert(match power {
            PowerType::Paramecia => Tag::Paramecia,
            PowerType::Logia => Tag::Logia,
            PowerType::Zoan => Tag::Zoan,
            PowerType::MythicalZoan => Tag::MythicalZoan,
        });
        if entity.awakened == Some(true) {
            if power == PowerType::Paramecia {
                tags.insert(Tag::AwakenedParamecia);
            }
            if power.is_zoan() {
                tags.insert(Tag::AwakenedZoan);
            }
        }
    }

    let abilities: Vec<Ability> = entity
        .abilities
        .iter()
        .filter_map(|a| Ability::parse(a))
        .collect();
    for ability in &abilities {
        tags.insert(match ability {
            Ability::Observation => Tag::Observation,
            Ability::Armament => Tag::Armament,
            Ability::Conqueror => Tag::Conqueror,
        });
    }
    if [Ability::Observation, Ability::Armament, Ability::Conqueror]
        .iter()
        .all(|required| abilities.contains(required))
    {
        tags.insert(Tag::AllThreeHaki);
    }

    tags.extend(lineage(&entity.race));
    tags.extend(life_status(&entity.status));
    tags.extend(normalize_origin(entity.origin.as_deref()));

    BaseTraits {
        name: &entity.name,
        affiliations,
        occupations,
        power_type,
        tags,
    }
}

/// Evaluate composite rules over a finished base stage
pub fn composite_tags(traits: &BaseTraits<'_>) -> BTreeSet<Tag> {
    COMPOSITE_RULES
        .iter()
        .filter(|(_, rule)| rule(traits))
        .map(|(tag, _)| *tag)
        .collect()
}

/// Assign every matching tag to one entity.
///
/// Total and deterministic: unrecognized or empty fields simply contribute
/// no tags.
pub fn classify(entity: &Entity) -> TaggedEntity {
    let traits = base_traits(entity);
    let mut tags = composite_tags(&traits);
    tags.extend(traits.tags);

    TaggedEntity {
        entity: entity.clone(),
        tags,
    }
}

/// Classify a whole roster, preserving input order
pub fn classify_all(entities: &[Entity]) -> Vec<TaggedEntity> {
    let tagged: Vec<TaggedEntity> = entities.iter().map(classify).collect();
    tracing::debug!(
        entities = tagged.len(),
        tags = tagged.iter().map(|t| t.tags.len()).sum::<usize>(),
        "classified roster"
    );
    tagged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::EntityBuilder;
    use crate::taxonomy::Dimension;

    #[test]
    fn test_affiliation_keywords_case_insensitive() {
        let e = EntityBuilder::new(1, "Jinbe")
            .affiliations(&["STRAW HAT PIRATES", "Sun Pirates", "Ryugu Kingdom"])
            .build();
        let tagged = classify(&e);
        assert!(tagged.has(Tag::StrawHats));
        assert!(tagged.has(Tag::FishmanIsland));
        assert!(!tagged.has(Tag::Marines));
    }

    #[test]
    fn test_cipher_pol_aliases() {
        for crew in ["CP9", "CP-0", "Cipher Pol Aigis 0"] {
            let e = EntityBuilder::new(1, "Agent").affiliations(&[crew]).build();
            assert!(classify(&e).has(Tag::CipherPol), "{}", crew);
        }
    }

    #[test]
    fn test_role_synonyms() {
        let e = EntityBuilder::new(1, "Tashigi")
            .occupations(&["Swordswoman", "Marine Captain"])
            .build();
        let tagged = classify(&e);
        assert!(tagged.has(Tag::Swordsman));
        assert!(tagged.has(Tag::Captain));
    }

    #[test]
    fn test_admiral_keyword_also_matches_ranks() {
        let e = EntityBuilder::new(1, "Sengoku")
            .occupations(&["Fleet Admiral"])
            .build();
        let tagged = classify(&e);
        assert!(tagged.has(Tag::FleetAdmiral));
        assert!(tagged.has(Tag::Admiral));
        assert!(!tagged.has(Tag::ViceAdmiral));
    }

    #[test]
    fn test_power_type_exact_match() {
        let e = EntityBuilder::new(1, "Ace").power_type("Logia").build();
        assert!(classify(&e).has(Tag::Logia));

        let e = EntityBuilder::new(2, "Someone").power_type("logia").build();
        let tags = classify(&e).tags;
        assert!(tags.iter().all(|t| t.dimension() != Dimension::PowerType));
    }

    #[test]
    fn test_awakening_requires_flag_and_type() {
        let e = EntityBuilder::new(1, "Doflamingo")
            .power_type("Paramecia")
            .awakened(Some(true))
            .build();
        let tagged = classify(&e);
        assert!(tagged.has(Tag::Paramecia));
        assert!(tagged.has(Tag::AwakenedParamecia));
        assert!(!tagged.has(Tag::AwakenedZoan));

        let e = EntityBuilder::new(2, "Kaido")
            .power_type("Mythical Zoan")
            .awakened(Some(true))
            .build();
        let tagged = classify(&e);
        assert!(tagged.has(Tag::MythicalZoan));
        assert!(tagged.has(Tag::AwakenedZoan));

        let e = EntityBuilder::new(3, "Crocodile")
            .power_type("Logia")
            .awakened(Some(true))
            .build();
        let tagged = classify(&e);
        assert!(!tagged.has(Tag::AwakenedParamecia));
        assert!(!tagged.has(Tag::AwakenedZoan));

        let e = EntityBuilder::new(4, "Law")
            .power_type("Paramecia")
            .awakened(None)
            .build();
        assert!(!classify(&e).has(Tag::AwakenedParamecia));
    }

    #[test]
    fn test_all_three_haki_needs_every_category() {
        let e = EntityBuilder::new(1, "Zoro")
            .abilities(&["Observation", "Armament", "Conqueror"])
            .build();
        let tagged = classify(&e);
        assert!(tagged.has(Tag::AllThreeHaki));
        assert!(tagged.has(Tag::Observation));

        let e = EntityBuilder::new(2, "Sanji")
            .abilities(&["Observation", "Armament"])
            .build();
        assert!(!classify(&e).has(Tag::AllThreeHaki));
    }

    #[test]
    fn test_lineage_priority() {
        let cases = [
            ("Fish-Man", Some(Tag::Fishman)),
            ("Human/Giant", Some(Tag::Giant)),
            ("Half-Fish-Man", Some(Tag::Fishman)),
            ("Half-Giant Human", Some(Tag::Giant)),
            ("Hybrid (Human/Snakeneck)", Some(Tag::MixedLineage)),
            ("Mink (Dog)", Some(Tag::Mink)),
            ("Human", Some(Tag::Human)),
            ("Dragon", None),
        ];
        for (race, expected) in cases {
            let e = EntityBuilder::new(1, "X").race(race).build();
            let lineages: Vec<Tag> = classify(&e)
                .tags
                .into_iter()
                .filter(|t| t.dimension() == Dimension::Lineage)
                .collect();
            assert_eq!(lineages, expected.into_iter().collect::<Vec<_>>(), "{}", race);
        }
    }

    #[test]
    fn test_life_status_defaults_and_exclusivity() {
        let cases = [
            (None, Some(Tag::Alive)),
            (Some("  "), Some(Tag::Alive)),
            (Some("Alive"), Some(Tag::Alive)),
            (Some("Deceased"), Some(Tag::Deceased)),
            (Some("dead"), Some(Tag::Deceased)),
            (Some("Unknown"), None),
        ];
        for (status, expected) in cases {
            let mut builder = EntityBuilder::new(1, "X");
            if let Some(s) = status {
                builder = builder.status(s);
            }
            let statuses: Vec<Tag> = classify(&builder.build())
                .tags
                .into_iter()
                .filter(|t| t.dimension() == Dimension::LifeStatus)
                .collect();
            assert_eq!(statuses, expected.into_iter().collect::<Vec<_>>(), "{:?}", status);
        }
    }

    #[test]
    fn test_origin_lookup() {
        assert_eq!(normalize_origin(Some("Foosha Village, East Blue")), Some(Tag::EastBlue));
        assert_eq!(normalize_origin(Some("Wano Country, New World")), Some(Tag::NewWorld));
        assert_eq!(normalize_origin(Some("Skypiea")), Some(Tag::FromSkypiea));
        assert_eq!(normalize_origin(Some("Elbaf")), None);
        assert_eq!(normalize_origin(None), None);
    }

    #[test]
    fn test_composites_see_base_tags() {
        let e = EntityBuilder::new(1, "Portgas D. Ace")
            .affiliations(&["Whitebeard Pirates", "Spade Pirates"])
            .occupations(&["Captain", "Second Division Commander"])
            .power_type("Logia")
            .abilities(&["Observation", "Armament", "Conqueror"])
            .status("Deceased")
            .origin("South Blue")
            .build();
        let tagged = classify(&e);
        for tag in [
            Tag::ClanOfD,
            Tag::DeceasedLogia,
            Tag::DeceasedConqueror,
            Tag::DeceasedAllThree,
            Tag::DeceasedCaptain,
            Tag::Deceased,
            Tag::SouthBlue,
        ] {
            assert!(tagged.has(tag), "missing {}", tag);
        }
        assert!(!tagged.has(Tag::Alive));
        assert!(!tagged.has(Tag::DeceasedParamecia));
    }

    #[test]
    fn test_affiliation_origin_composites() {
        let e = EntityBuilder::new(1, "Usopp")
            .affiliations(&["Straw Hat Pirates"])
            .origin("Syrup Village, East Blue")
            .build();
        let tagged = classify(&e);
        assert!(tagged.has(Tag::StrawHatsEastBlue));
        assert!(!tagged.has(Tag::StrawHatsGrandLine));

        let e = EntityBuilder::new(2, "Fujitora")
            .affiliations(&["Marines"])
            .origin("New World")
            .build();
        assert!(classify(&e).has(Tag::MarinesNewWorld));
    }

    #[test]
    fn test_meta_affiliation_composites() {
        let e = EntityBuilder::new(1, "Shanks")
            .affiliations(&["Red Hair Pirates", "Four Emperors"])
            .occupations(&["Captain"])
            .build();
        assert!(classify(&e).has(Tag::Emperors));

        let e = EntityBuilder::new(2, "Kid")
            .affiliations(&["Kid Pirates"])
            .occupations(&["Captain", "Worst Generation"])
            .build();
        assert!(classify(&e).has(Tag::WorstGeneration));

        let e = EntityBuilder::new(3, "Mihawk")
            .affiliations(&["Seven Warlords of the Sea"])
            .build();
        let tagged = classify(&e);
        assert!(tagged.has(Tag::Warlords));
        assert!(tagged.has(Tag::FormerWarlords));
    }

    #[test]
    fn test_empty_entity_is_alive_only() {
        let tagged = classify(&Entity::new(1, "Nobody"));
        assert_eq!(tagged.tags.into_iter().collect::<Vec<_>>(), vec![Tag::Alive]);
    }

    #[test]
    fn test_classification_is_deterministic() {
        for entity in crate::fixtures::sample_roster() {
            assert_eq!(classify(&entity).tags, classify(&entity).tags);
        }
    }

    #[test]
    fn test_classify_all_preserves_order() {
        let roster = crate::fixtures::sample_roster();
        let tagged = classify_all(&roster);
        let ids: Vec<_> = tagged.iter().map(|t| t.id()).collect();
        let expected: Vec<_> = roster.iter().map(|e| e.id).collect();
        assert_eq!(ids, expected);
        for t in &tagged {
            assert!(!(t.has(Tag::Alive) && t.has(Tag::Deceased)));
        }
    }
}
