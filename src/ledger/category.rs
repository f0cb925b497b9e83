use std::fmt;

use serde::{Deserialize, Serialize};

/// Categorises ledger activity for display and reporting.
///
/// Values outside the built-in set are kept verbatim in [`Category::Custom`]
/// so that payloads written by other tools survive a load/save cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Entertainment,
    Bills,
    Salary,
    Freelance,
    Investment,
    Other,
    Custom(String),
}

impl Category {
    /// Built-in categories in the order they are offered to the user.
    pub const BUILT_IN: [Category; 9] = [
        Category::Food,
        Category::Transport,
        Category::Shopping,
        Category::Entertainment,
        Category::Bills,
        Category::Salary,
        Category::Freelance,
        Category::Investment,
        Category::Other,
    ];

    pub fn parse(raw: &str) -> Self {
        match raw {
            "food" => Category::Food,
            "transport" => Category::Transport,
            "shopping" => Category::Shopping,
            "entertainment" => Category::Entertainment,
            "bills" => Category::Bills,
            "salary" => Category::Salary,
            "freelance" => Category::Freelance,
            "investment" => Category::Investment,
            "other" => Category::Other,
            _ => Category::Custom(raw.to_string()),
        }
    }

    /// Storage key of the category.
    pub fn as_str(&self) -> &str {
        match self {
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Shopping => "shopping",
            Category::Entertainment => "entertainment",
            Category::Bills => "bills",
            Category::Salary => "salary",
            Category::Freelance => "freelance",
            Category::Investment => "investment",
            Category::Other => "other",
            Category::Custom(raw) => raw,
        }
    }

    /// Human readable label, without decoration.
    pub fn label(&self) -> &str {
        match self {
            Category::Food => "Food & Dining",
            Category::Transport => "Transportation",
            Category::Shopping => "Shopping",
            Category::Entertainment => "Entertainment",
            Category::Bills => "Bills & Utilities",
            Category::Salary => "Salary",
            Category::Freelance => "Freelance",
            Category::Investment => "Investment",
            Category::Other => "Other",
            Category::Custom(raw) => raw,
        }
    }

    pub fn icon(&self) -> Option<&'static str> {
        match self {
            Category::Food => Some("🍔"),
            Category::Transport => Some("🚗"),
            Category::Shopping => Some("🛍️"),
            Category::Entertainment => Some("🎬"),
            Category::Bills => Some("📄"),
            Category::Salary => Some("💰"),
            Category::Freelance => Some("💼"),
            Category::Investment => Some("📈"),
            Category::Other => Some("📌"),
            Category::Custom(_) => None,
        }
    }

    /// Label prefixed with the category icon, as shown in the transaction list.
    pub fn display_label(&self) -> String {
        match self.icon() {
            Some(icon) => format!("{icon} {}", self.label()),
            None => self.label().to_string(),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Category::Custom(_))
    }
}

impl From<String> for Category {
    fn from(raw: String) -> Self {
        match Category::parse(&raw) {
            Category::Custom(_) => Category::Custom(raw),
            known => known,
        }
    }
}

impl From<&str> for Category {
    fn from(raw: &str) -> Self {
        Category::parse(raw)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Custom(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_keys_round_trip() {
        for category in Category::BUILT_IN {
            assert_eq!(Category::parse(category.as_str()), category);
            assert!(!category.is_custom());
        }
    }

    #[test]
    fn unknown_values_pass_through_verbatim() {
        let category = Category::from("Pet Care".to_string());
        assert_eq!(category, Category::Custom("Pet Care".into()));
        assert_eq!(category.label(), "Pet Care");
        assert_eq!(category.display_label(), "Pet Care");
        assert_eq!(serde_json::to_string(&category).unwrap(), "\"Pet Care\"");
    }

    #[test]
    fn keys_are_case_sensitive() {
        assert_eq!(Category::parse("Food"), Category::Custom("Food".into()));
    }

    #[test]
    fn display_label_includes_icon() {
        assert_eq!(Category::Food.display_label(), "🍔 Food & Dining");
        assert_eq!(Category::Bills.label(), "Bills & Utilities");
    }
}
