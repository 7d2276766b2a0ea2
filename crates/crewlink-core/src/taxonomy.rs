//! Static tag catalog.
//!
//! Every tag belongs to exactly one [`Dimension`]. The declaration order of
//! [`Tag`] is the catalog order: the generator shuffles `Tag::ALL`, so
//! reordering variants changes which puzzle a given seed produces.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Category of mutually comparable tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dimension {
    Affiliation,
    Role,
    PowerType,
    Ability,
    Lineage,
    LifeStatus,
    Origin,
    Composite,
}

impl Dimension {
    pub fn all() -> &'static [Dimension] {
        &[
            Dimension::Affiliation,
            Dimension::Role,
            Dimension::PowerType,
            Dimension::Ability,
            Dimension::Lineage,
            Dimension::LifeStatus,
            Dimension::Origin,
            Dimension::Composite,
        ]
    }

    /// Whether a tag of this dimension may form a group on its own.
    ///
    /// Life status and origin only surface through composite tags.
    pub fn is_board_eligible(&self) -> bool {
        !matches!(self, Dimension::LifeStatus | Dimension::Origin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Affiliation => "affiliation",
            Dimension::Role => "role",
            Dimension::PowerType => "power-type",
            Dimension::Ability => "ability",
            Dimension::Lineage => "lineage",
            Dimension::LifeStatus => "life-status",
            Dimension::Origin => "origin",
            Dimension::Composite => "composite",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static difficulty label attached to each tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

/// Catalog entry for a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TagInfo {
    pub tag: Tag,
    pub dimension: Dimension,
    pub label: &'static str,
    pub difficulty: Difficulty,
}

/// Error returned when parsing an unknown tag id
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tag id `{0}`")]
pub struct UnknownTag(pub String);

macro_rules! catalog {
    ($( $variant:ident => $id:literal, $dim:ident, $label:literal, $diff:ident; )+) => {
        /// Every known tag
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Tag {
            $( $variant, )+
        }

        impl Tag {
            /// All tags in catalog order
            pub const ALL: &'static [Tag] = &[ $( Tag::$variant, )+ ];

            /// Stable identifier, `"<dimension>:<slug>"`
            pub fn id(&self) -> &'static str {
                match self {
                    $( Tag::$variant => $id, )+
                }
            }

            pub fn info(&self) -> TagInfo {
                match self {
                    $(
                        Tag::$variant => TagInfo {
                            tag: Tag::$variant,
                            dimension: Dimension::$dim,
                            label: $label,
                            difficulty: Difficulty::$diff,
                        },
                    )+
                }
            }
        }

        impl FromStr for Tag {
            type Err = UnknownTag;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $id => Ok(Tag::$variant), )+
                    other => Err(UnknownTag(other.to_string())),
                }
            }
        }
    };
}

catalog! {
    // Affiliation
    StrawHats => "affiliation:straw-hats", Affiliation, "Straw Hat Pirates", Easy;
    RedHair => "affiliation:red-hair", Affiliation, "Red Hair Pirates", Medium;
    Beasts => "affiliation:beasts", Affiliation, "Beasts Pirates", Medium;
    BigMom => "affiliation:big-mom", Affiliation, "Big Mom Pirates", Medium;
    Blackbeard => "affiliation:blackbeard", Affiliation, "Blackbeard Pirates", Medium;
    Donquixote => "affiliation:donquixote", Affiliation, "Donquixote Pirates", Medium;
    Roger => "affiliation:roger", Affiliation, "Roger Pirates", Hard;
    Heart => "affiliation:heart", Affiliation, "Heart Pirates", Medium;
    Kid => "affiliation:kid", Affiliation, "Kid Pirates", Medium;
    Whitebeard => "affiliation:whitebeard", Affiliation, "Whitebeard Pirates", Medium;
    Marines => "affiliation:marines", Affiliation, "Marines", Easy;
    RevolutionaryArmy => "affiliation:revolutionary-army", Affiliation, "Revolutionary Army", Medium;
    CipherPol => "affiliation:cipher-pol", Affiliation, "Cipher Pol", Hard;
    Warlords => "affiliation:warlords", Affiliation, "Former Warlords of the Sea", Medium;
    EmperorCrews => "affiliation:emperor-crews", Affiliation, "Emperor Crews", Hard;
    KouzukiFamily => "affiliation:kouzuki-family", Affiliation, "Kouzuki Family", Hard;
    NefertariFamily => "affiliation:nefertari-family", Affiliation, "Nefertari Family", Hard;
    RikuFamily => "affiliation:riku-family", Affiliation, "Riku Family", Hard;
    VinsmokeFamily => "affiliation:vinsmoke-family", Affiliation, "Vinsmoke Family", Hard;
    FishmanIsland => "affiliation:fishman-island", Affiliation, "Fish-Man Island factions", Medium;
    AlabastaFactions => "affiliation:alabasta", Affiliation, "Alabasta factions", Medium;
    DressrosaFactions => "affiliation:dressrosa", Affiliation, "Dressrosa factions", Medium;
    FiveElders => "affiliation:five-elders", Affiliation, "Five Elders", Hard;
    KnightsOfGod => "affiliation:knights-of-god", Affiliation, "Knights of God", Hard;
    VegapunkSatellites => "affiliation:vegapunk-satellites", Affiliation, "Vegapunk Satellites", Hard;

    // Role
    Captain => "role:captain", Role, "Captains", Easy;
    FirstMate => "role:first-mate", Role, "First Mates", Medium;
    Helmsman => "role:helmsman", Role, "Helmsmen", Hard;
    Sniper => "role:sniper", Role, "Snipers", Medium;
    Swordsman => "role:swordsman", Role, "Swordsmen", Easy;
    Cook => "role:cook", Role, "Cooks", Easy;
    Doctor => "role:doctor", Role, "Doctors", Easy;
    Shipwright => "role:shipwright", Role, "Shipwrights", Medium;
    Navigator => "role:navigator", Role, "Navigators", Easy;
    FleetAdmiral => "role:fleet-admiral", Role, "Fleet Admirals", Hard;
    Admiral => "role:admiral", Role, "Admirals", Medium;
    ViceAdmiral => "role:vice-admiral", Role, "Vice Admirals", Medium;
    Warden => "role:warden", Role, "Impel Down Wardens", Medium;
    Royalty => "role:royalty", Role, "Royalty", Medium;

    // Power type
    Paramecia => "power-type:paramecia", PowerType, "Paramecia users", Easy;
    Logia => "power-type:logia", PowerType, "Logia users", Medium;
    Zoan => "power-type:zoan", PowerType, "Zoan users", Medium;
    MythicalZoan => "power-type:mythical-zoan", PowerType, "Mythical Zoan users", Hard;
    AwakenedParamecia => "power-type:awakened-paramecia", PowerType, "Awakened Paramecia users", Hard;
    AwakenedZoan => "power-type:awakened-zoan", PowerType, "Awakened Zoan users", Hard;

    // Ability
    Observation => "ability:observation", Ability, "Observation Haki users", Easy;
    Armament => "ability:armament", Ability, "Armament Haki users", Easy;
    Conqueror => "ability:conqueror", Ability, "Conqueror's Haki users", Medium;
    AllThreeHaki => "ability:all-three", Ability, "Users of all three Haki types", Hard;

    // Lineage
    Human => "lineage:human", Lineage, "Humans", Easy;
    Fishman => "lineage:fishman", Lineage, "Fish-Men", Medium;
    Merfolk => "lineage:merfolk", Lineage, "Merfolk", Medium;
    Giant => "lineage:giant", Lineage, "Giants", Medium;
    Mink => "lineage:mink", Lineage, "Minks", Medium;
    Lunarian => "lineage:lunarian", Lineage, "Lunarians", Hard;
    MixedLineage => "lineage:mixed", Lineage, "Mixed race", Hard;

    // Life status
    Alive => "life-status:alive", LifeStatus, "Alive", Easy;
    Deceased => "life-status:deceased", LifeStatus, "Deceased", Easy;

    // Origin
    EastBlue => "origin:east-blue", Origin, "From East Blue", Easy;
    WestBlue => "origin:west-blue", Origin, "From West Blue", Medium;
    NorthBlue => "origin:north-blue", Origin, "From North Blue", Medium;
    SouthBlue => "origin:south-blue", Origin, "From South Blue", Medium;
    GrandLine => "origin:grand-line", Origin, "From the Grand Line", Medium;
    NewWorld => "origin:new-world", Origin, "From the New World", Medium;
    FromDressrosa => "origin:dressrosa", Origin, "From Dressrosa", Hard;
    FromAlabasta => "origin:alabasta", Origin, "From Alabasta", Hard;
    FromWano => "origin:wano", Origin, "From Wano", Hard;
    FromSkypiea => "origin:skypiea", Origin, "From Skypiea", Hard;

    // Composite
    ClanOfD => "composite:clan-of-d", Composite, "Bearers of the D.", Medium;
    Emperors => "composite:emperors", Composite, "Four Emperors", Hard;
    FormerWarlords => "composite:former-warlords", Composite, "Former Warlords", Medium;
    WorstGeneration => "composite:worst-generation", Composite, "Worst Generation members", Medium;
    DeceasedConqueror => "composite:deceased-conqueror", Composite, "Deceased Conqueror's Haki users", Hard;
    DeceasedAllThree => "composite:deceased-all-three", Composite, "Deceased users of all three Haki types", Hard;
    DeceasedLogia => "composite:deceased-logia", Composite, "Deceased Logia users", Hard;
    DeceasedParamecia => "composite:deceased-paramecia", Composite, "Deceased Paramecia users", Medium;
    DeceasedZoan => "composite:deceased-zoan", Composite, "Deceased Zoan users", Medium;
    DeceasedCaptain => "composite:deceased-captain", Composite, "Deceased Captains", Hard;
    DeceasedAdmiral => "composite:deceased-admiral", Composite, "Deceased Admirals", Hard;
    StrawHatsEastBlue => "composite:straw-hats-east-blue", Composite, "Straw Hat Pirates from East Blue", Medium;
    StrawHatsGrandLine => "composite:straw-hats-grand-line", Composite, "Straw Hat Pirates from Grand Line", Medium;
    MarinesGrandLine => "composite:marines-grand-line", Composite, "Marines from Grand Line", Medium;
    MarinesNewWorld => "composite:marines-new-world", Composite, "Marines from New World", Hard;
    Traitors => "composite:traitors", Composite, "Traitors", Hard;
}

impl Tag {
    pub fn dimension(&self) -> Dimension {
        self.info().dimension
    }

    pub fn label(&self) -> &'static str {
        self.info().label
    }

    pub fn difficulty(&self) -> Difficulty {
        self.info().difficulty
    }

    /// Catalog entries in catalog order
    pub fn catalog() -> impl Iterator<Item = TagInfo> {
        Tag::ALL.iter().map(Tag::info)
    }

    /// Tags belonging to one dimension, in catalog order
    pub fn in_dimension(dimension: Dimension) -> impl Iterator<Item = Tag> {
        Tag::ALL
            .iter()
            .copied()
            .filter(move |t| t.dimension() == dimension)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        id.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<&str> = Tag::ALL.iter().map(Tag::id).collect();
        assert_eq!(ids.len(), Tag::ALL.len());
    }

    #[test]
    fn test_id_prefix_matches_dimension() {
        for tag in Tag::ALL {
            let prefix = tag.id().split(':').next().unwrap_or_default();
            assert_eq!(prefix, tag.dimension().as_str(), "{}", tag);
        }
    }

    #[test]
    fn test_every_dimension_is_populated() {
        for dim in Dimension::all() {
            assert!(Tag::in_dimension(*dim).count() > 0, "{} is empty", dim);
        }
    }

    #[test]
    fn test_catalog_size() {
        assert_eq!(Tag::ALL.len(), 84);
        assert_eq!(Tag::in_dimension(Dimension::LifeStatus).count(), 2);
    }

    #[test]
    fn test_parse_roundtrip() {
        for tag in Tag::ALL {
            assert_eq!(tag.id().parse::<Tag>(), Ok(*tag));
        }
        assert_eq!(
            "crew:straw-hats".parse::<Tag>(),
            Err(UnknownTag("crew:straw-hats".to_string()))
        );
    }

    #[test]
    fn test_serde_uses_ids() {
        let json = serde_json::to_string(&Tag::MythicalZoan).unwrap();
        assert_eq!(json, "\"power-type:mythical-zoan\"");
        let back: Tag = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Tag::MythicalZoan);
        assert!(serde_json::from_str::<Tag>("\"power-type:unknown\"").is_err());
    }

    #[test]
    fn test_board_eligibility() {
        assert!(!Dimension::LifeStatus.is_board_eligible());
        assert!(!Dimension::Origin.is_board_eligible());
        assert!(Dimension::Composite.is_board_eligible());
        assert_eq!(
            serde_json::to_string(&Dimension::PowerType).unwrap(),
            "\"power-type\""
        );
    }
}
