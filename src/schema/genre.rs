use serde::{Deserialize, Serialize};

/// The closed set of genres the studio has templates for.
///
/// "No genre selected" is represented as `Option::<GenreTag>::None` by
/// callers; there is deliberately no `Unset` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenreTag {
    Fantasy,
    #[serde(rename = "scifi")]
    SciFi,
    Romance,
    Mystery,
    Poetry,
    Adventure,
}

impl GenreTag {
    /// Every genre, in the order the catalog presents them.
    pub const ALL: [GenreTag; 6] = [
        Self::Fantasy,
        Self::SciFi,
        Self::Romance,
        Self::Mystery,
        Self::Poetry,
        Self::Adventure,
    ];

    /// Stable lookup key (e.g. "scifi").
    pub fn id(&self) -> &'static str {
        match self {
            Self::Fantasy => "fantasy",
            Self::SciFi => "scifi",
            Self::Romance => "romance",
            Self::Mystery => "mystery",
            Self::Poetry => "poetry",
            Self::Adventure => "adventure",
        }
    }

    /// Human-facing label (e.g. "Sci-Fi").
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Fantasy => "Fantasy",
            Self::SciFi => "Sci-Fi",
            Self::Romance => "Romance",
            Self::Mystery => "Mystery",
            Self::Poetry => "Poetry",
            Self::Adventure => "Adventure",
        }
    }

    /// Resolve a lookup key. Matching is exact: ids are lowercase and
    /// anything else, including the empty string, is unrecognized.
    pub fn from_id(id: &str) -> Option<GenreTag> {
        Self::ALL.into_iter().find(|genre| genre.id() == id)
    }
}

impl std::fmt::Display for GenreTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
