use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Closed set of market categories offered by the creation form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Crypto,
    Politics,
    Technology,
    Science,
    Sports,
    Entertainment,
    Other,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 7] = [
        Category::Crypto,
        Category::Politics,
        Category::Technology,
        Category::Science,
        Category::Sports,
        Category::Entertainment,
        Category::Other,
    ];

    /// Wire code, as submitted and stored.
    pub fn code(self) -> &'static str {
        match self {
            Category::Crypto => "crypto",
            Category::Politics => "politics",
            Category::Technology => "technology",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Entertainment => "entertainment",
            Category::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Crypto => "Crypto",
            Category::Politics => "Politics",
            Category::Technology => "Technology",
            Category::Science => "Science",
            Category::Sports => "Sports",
            Category::Entertainment => "Entertainment",
            Category::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.code() == wanted)
            .ok_or_else(|| Error::InvalidCategory(s.to_string()))
    }
}
