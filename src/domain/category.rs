use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of spending categories. Free-form strings are rejected at the
/// boundary; everything past it carries the tagged variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    Food,
    Grocery,
    Rent,
    Education,
    Health,
    Entertainment,
    Transportation,
    Miscellaneous,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Grocery,
        Category::Rent,
        Category::Education,
        Category::Health,
        Category::Entertainment,
        Category::Transportation,
        Category::Miscellaneous,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Grocery => "Grocery",
            Category::Rent => "Rent",
            Category::Education => "Education",
            Category::Health => "Health",
            Category::Entertainment => "Entertainment",
            Category::Transportation => "Transportation",
            Category::Miscellaneous => "Miscellaneous",
        }
    }

    /// Comma-separated list of the valid names, for error messages.
    pub fn valid_names() -> String {
        Category::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive membership test over the closed set.
impl FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(value.trim()))
            .copied()
            .ok_or_else(|| format!("category must be one of: {}", Category::valid_names()))
    }
}
