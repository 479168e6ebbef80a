use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

/// Fixed enumeration of supplier component categories. Categories are
/// never created or deleted at runtime; both norms and validation
/// records key against them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Pins,
    Attachment,
    Undercarriage,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Pins,
        Category::Attachment,
        Category::Undercarriage,
    ];

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(ValidationError("category must not be empty".to_string()));
        }
        match s.to_ascii_lowercase().as_str() {
            "pins" => Ok(Category::Pins),
            "attachment" => Ok(Category::Attachment),
            "undercarriage" => Ok(Category::Undercarriage),
            other => Err(ValidationError(format!("unknown category: {other}"))),
        }
    }

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Category::Pins => "pins",
            Category::Attachment => "attachment",
            Category::Undercarriage => "undercarriage",
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Category::Pins => "Pins",
            Category::Attachment => "Attachment",
            Category::Undercarriage => "Undercarriage",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

pub fn parse_category(input: &str) -> Result<Category, ValidationError> {
    Category::parse(input)
}
