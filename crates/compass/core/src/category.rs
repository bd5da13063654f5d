//! Category kinds and canonical category identifiers.

use std::fmt;

use crate::error::CategoryError;

/// The two kinds of locatable features.
///
/// Both behave identically for tracking purposes; they differ only in which
/// locator resolves them and in which [`SearchLane`] that locator runs.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum CategoryKind {
    #[default]
    Structure,
    Biome,
}

impl CategoryKind {
    pub const fn lane(self) -> SearchLane {
        match self {
            CategoryKind::Structure => SearchLane::Inline,
            CategoryKind::Biome => SearchLane::Background,
        }
    }

    /// Lowercase noun used in player messages.
    pub const fn noun(self) -> &'static str {
        match self {
            CategoryKind::Structure => "structure",
            CategoryKind::Biome => "biome",
        }
    }

    /// Display name with the kind spelled out where it reads better
    /// (`Dark Forest biome`, but plain `Igloo`).
    pub fn labelled(self, category: &CategoryId) -> String {
        match self {
            CategoryKind::Structure => category.display_name(),
            CategoryKind::Biome => format!("{} {}", category.display_name(), self.noun()),
        }
    }
}

/// Where a locator call is allowed to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchLane {
    /// On the worker that owns player state; cheap enough to block it.
    Inline,
    /// On a blocking pool; the result must be handed back to the worker.
    Background,
}

/// Canonical uppercase category identifier, e.g. `ANCIENT_CITY`.
///
/// The human-readable form is always derived with [`CategoryId::display_name`]
/// and never stored.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct CategoryId(String);

impl CategoryId {
    /// Normalizes `input` to the canonical uppercase form.
    pub fn new(input: &str) -> Result<Self, CategoryError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CategoryError::Empty);
        }
        if let Some(found) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
        {
            return Err(CategoryError::InvalidCharacter {
                input: input.to_string(),
                found,
            });
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase registry key, as players type it (`ancient_city`).
    pub fn key(&self) -> String {
        self.0.to_ascii_lowercase()
    }

    /// Title-cased words split on underscores (`Ancient City`).
    pub fn display_name(&self) -> String {
        self.0
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => {
                        let mut out = first.to_ascii_uppercase().to_string();
                        out.push_str(&chars.as_str().to_ascii_lowercase());
                        out
                    }
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CategoryId {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CategoryId {
    type Error = CategoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CategoryId> for String {
    fn from(id: CategoryId) -> Self {
        id.0
    }
}

impl AsRef<str> for CategoryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_is_canonicalized_to_uppercase() {
        let id = CategoryId::new("ancient_city").unwrap();
        assert_eq!(id.as_str(), "ANCIENT_CITY");
        assert_eq!(id.key(), "ancient_city");
    }

    #[test]
    fn display_name_is_title_case() {
        assert_eq!(CategoryId::new("DARK_FOREST").unwrap().display_name(), "Dark Forest");
        assert_eq!(CategoryId::new("igloo").unwrap().display_name(), "Igloo");
        assert_eq!(
            CategoryId::new("village_plains").unwrap().display_name(),
            "Village Plains"
        );
    }

    #[test]
    fn rejects_empty_and_namespaced_input() {
        assert_eq!(CategoryId::new("  "), Err(CategoryError::Empty));
        assert!(matches!(
            CategoryId::new("minecraft:igloo"),
            Err(CategoryError::InvalidCharacter { found: ':', .. })
        ));
    }

    #[test]
    fn biomes_run_in_the_background_lane() {
        assert_eq!(CategoryKind::Structure.lane(), SearchLane::Inline);
        assert_eq!(CategoryKind::Biome.lane(), SearchLane::Background);
        assert_eq!(CategoryKind::Biome.to_string(), "BIOME");
        assert_eq!("structure".parse::<CategoryKind>(), Ok(CategoryKind::Structure));
    }

    #[test]
    fn only_biomes_are_labelled_with_their_kind() {
        let cherry = CategoryId::new("cherry_grove").unwrap();
        assert_eq!(CategoryKind::Biome.labelled(&cherry), "Cherry Grove biome");
        assert_eq!(CategoryKind::Structure.labelled(&cherry), "Cherry Grove");
        assert_eq!(CategoryKind::Structure.noun(), "structure");
    }
}
