use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Independent toggles gating each comparison phase.
///
/// A disabled phase leaves its category maps empty in the resulting
/// [`Differences`](crate::differences::Differences). Passed explicitly to the
/// builder; the engine never reads configuration from anywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareOptions {
    /// Compare table columns
    #[serde(default = "default_true")]
    pub columns: bool,

    /// Compare foreign-key relations
    #[serde(default = "default_true")]
    pub relations: bool,

    /// Compare views, functions and stored procedures
    #[serde(default = "default_true")]
    pub objects: bool,

    #[serde(default = "default_true")]
    pub indexes: bool,

    #[serde(default = "default_true")]
    pub permissions: bool,

    /// Compare extended properties at every level
    #[serde(default = "default_true")]
    pub properties: bool,

    #[serde(default = "default_true")]
    pub triggers: bool,

    #[serde(default = "default_true")]
    pub synonyms: bool,

    /// Report columns whose ordinal position moved
    #[serde(default = "default_true")]
    pub ordinal_positions: bool,

    #[serde(default = "default_true")]
    pub user_types: bool,

    /// Compare column and user-type collations
    #[serde(default = "default_true")]
    pub collation: bool,

    /// Collapse whitespace runs before comparing definition bodies
    #[serde(default = "default_true")]
    pub ignore_whitespace: bool,
}

impl CompareOptions {
    /// Every phase enabled.
    pub const fn all() -> Self {
        Self {
            columns: true,
            relations: true,
            objects: true,
            indexes: true,
            permissions: true,
            properties: true,
            triggers: true,
            synonyms: true,
            ordinal_positions: true,
            user_types: true,
            collation: true,
            ignore_whitespace: true,
        }
    }

    /// Every phase disabled; only table existence is compared.
    pub const fn none() -> Self {
        Self {
            columns: false,
            relations: false,
            objects: false,
            indexes: false,
            permissions: false,
            properties: false,
            triggers: false,
            synonyms: false,
            ordinal_positions: false,
            user_types: false,
            collation: false,
            ignore_whitespace: true,
        }
    }
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_toggles_default_to_enabled() {
        let options: CompareOptions = toml::from_str("indexes = false\ncollation = false").unwrap();
        assert!(!options.indexes);
        assert!(!options.collation);
        assert!(options.columns);
        assert!(options.ignore_whitespace);
    }

    #[test]
    fn test_none_keeps_whitespace_normalisation() {
        let options = CompareOptions::none();
        assert!(!options.columns);
        assert!(options.ignore_whitespace);
    }
}
