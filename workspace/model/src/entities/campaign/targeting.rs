//! Structured JSON columns of a campaign.
//!
//! These used to be free-form blobs. Each shape now has named fields and a
//! `version` so that readers can tell old rows from new ones if it evolves.

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Current shape version written by this crate.
pub const SHAPE_VERSION: u16 = 1;

fn shape_version() -> u16 {
    SHAPE_VERSION
}

/// Ordered list of strings stored as a JSON array (regions, image URLs).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema)]
pub struct StringList(pub Vec<String>);

impl StringList {
    /// Builds a list keeping the first occurrence of each non-blank entry.
    pub fn deduplicated<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for item in items {
            let item = item.into().trim().to_string();
            if !item.is_empty() && !out.contains(&item) {
                out.push(item);
            }
        }
        Self(out)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|v| v == value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

/// Demographic targeting. Used for display and filtering only, never to
/// restrict who may apply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema)]
pub struct TargetDemographics {
    #[serde(default = "shape_version")]
    pub version: u16,
    #[serde(default)]
    pub age_groups: Vec<String>,
    #[serde(default)]
    pub income_levels: Vec<String>,
    /// Free text, e.g. "fitness, home cooking".
    #[serde(default)]
    pub interests: String,
}

impl Default for TargetDemographics {
    fn default() -> Self {
        Self {
            version: SHAPE_VERSION,
            age_groups: Vec::new(),
            income_levels: Vec::new(),
            interests: String::new(),
        }
    }
}

impl TargetDemographics {
    /// Drops blank and repeated age groups and income levels.
    pub fn normalized(self) -> Self {
        Self {
            version: SHAPE_VERSION,
            age_groups: StringList::deduplicated(self.age_groups).0,
            income_levels: StringList::deduplicated(self.income_levels).0,
            interests: self.interests.trim().to_string(),
        }
    }
}

/// Links to material sellers use when pitching the product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema)]
pub struct SalesMaterials {
    #[serde(default = "shape_version")]
    pub version: u16,
    pub brochures: Option<String>,
    pub videos: Option<String>,
    pub training_docs: Option<String>,
}

impl Default for SalesMaterials {
    fn default() -> Self {
        Self {
            version: SHAPE_VERSION,
            brochures: None,
            videos: None,
            training_docs: None,
        }
    }
}

impl SalesMaterials {
    /// Empty strings from a form mean "no link".
    pub fn normalized(self) -> Self {
        fn link(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            version: SHAPE_VERSION,
            brochures: link(self.brochures),
            videos: link(self.videos),
            training_docs: link(self.training_docs),
        }
    }
}
