use serde::{Deserialize, Serialize};

/// One of the two databases taking part in a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The first (left-hand) database.
    One,
    /// The second (right-hand) database.
    Two,
}

impl Side {
    /// Ordinal used in report text ("database 1", "database 2").
    pub const fn number(self) -> u8 {
        match self {
            Side::One => 1,
            Side::Two => 2,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "database {}", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_as_database_ordinal() {
        assert_eq!(Side::One.to_string(), "database 1");
        assert_eq!(Side::Two.to_string(), "database 2");
    }
}
