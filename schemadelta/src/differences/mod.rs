//! Difference model produced by one comparison run.
//!
//! Every node embeds an [`Existence`] and adds only the capabilities its
//! category needs: a scalar value pair, a discrepancy list, nested property
//! and permission maps, or a pair of definition bodies. Whether a node is
//! different is always derived from its current state; nothing is cached.
//!
//! Maps are insertion-ordered: keys from database 1 first, then keys found
//! only in database 2.

mod render;

use indexmap::IndexMap;
use serde::Serialize;

use crate::definition::definitions_differ;
use crate::types::Side;

pub use render::render_report;

/// Which of the two databases contain an object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Existence {
    pub in_side1: bool,
    pub in_side2: bool,
}

impl Existence {
    pub const fn new(in_side1: bool, in_side2: bool) -> Self {
        Self { in_side1, in_side2 }
    }

    pub const fn both() -> Self {
        Self::new(true, true)
    }

    /// Present on `side` only.
    pub const fn only(side: Side) -> Self {
        match side {
            Side::One => Self::new(true, false),
            Side::Two => Self::new(false, true),
        }
    }

    pub const fn in_both(&self) -> bool {
        self.in_side1 && self.in_side2
    }

    pub const fn is_different(&self) -> bool {
        !self.in_both()
    }

    /// The side the object is missing from, when it exists on exactly one.
    pub const fn missing_from(&self) -> Option<Side> {
        match (self.in_side1, self.in_side2) {
            (true, false) => Some(Side::Two),
            (false, true) => Some(Side::One),
            _ => None,
        }
    }
}

/// Common interface of every difference node.
pub trait Diff {
    fn existence(&self) -> Existence;

    fn is_different(&self) -> bool;
}

/// Node kinds that can be created from existence alone, for objects that are
/// present on one side only.
pub trait FromExistence {
    fn from_existence(existence: Existence) -> Self;
}

/// Number of different nodes in a map.
pub fn count_different<D: Diff>(map: &IndexMap<String, D>) -> usize {
    map.values().filter(|node| node.is_different()).count()
}

fn any_different<D: Diff>(map: &IndexMap<String, D>) -> bool {
    map.values().any(Diff::is_different)
}

/// Existence-only node, used for permissions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PermissionDifference {
    #[serde(flatten)]
    pub existence: Existence,
}

impl Diff for PermissionDifference {
    fn existence(&self) -> Existence {
        self.existence
    }

    fn is_different(&self) -> bool {
        self.existence.is_different()
    }
}

impl FromExistence for PermissionDifference {
    fn from_existence(existence: Existence) -> Self {
        Self { existence }
    }
}

/// Existence plus a value from each side, used for extended properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValueDifference {
    #[serde(flatten)]
    pub existence: Existence,
    pub value1: Option<String>,
    pub value2: Option<String>,
}

impl ValueDifference {
    pub fn new(value1: impl Into<String>, value2: impl Into<String>) -> Self {
        Self {
            existence: Existence::both(),
            value1: Some(value1.into()),
            value2: Some(value2.into()),
        }
    }
}

impl Diff for ValueDifference {
    fn existence(&self) -> Existence {
        self.existence
    }

    fn is_different(&self) -> bool {
        self.existence.is_different() || self.value1 != self.value2
    }
}

impl FromExistence for ValueDifference {
    fn from_existence(existence: Existence) -> Self {
        Self {
            existence,
            value1: None,
            value2: None,
        }
    }
}

/// Existence plus free-text descriptions of every attribute that differs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttributeDifference {
    #[serde(flatten)]
    pub existence: Existence,
    pub discrepancies: Vec<String>,
}

impl AttributeDifference {
    /// Node for an object present on both sides, with no discrepancies yet.
    pub fn matched() -> Self {
        Self::from_existence(Existence::both())
    }

    pub fn push(&mut self, discrepancy: impl Into<String>) {
        self.discrepancies.push(discrepancy.into());
    }
}

impl Diff for AttributeDifference {
    fn existence(&self) -> Existence {
        self.existence
    }

    fn is_different(&self) -> bool {
        self.existence.is_different() || !self.discrepancies.is_empty()
    }
}

impl FromExistence for AttributeDifference {
    fn from_existence(existence: Existence) -> Self {
        Self {
            existence,
            discrepancies: Vec::new(),
        }
    }
}

/// Attribute differences plus nested extended properties (columns, indexes).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetailedDifference {
    #[serde(flatten)]
    pub attributes: AttributeDifference,
    pub properties: IndexMap<String, ValueDifference>,
}

impl DetailedDifference {
    pub fn new(attributes: AttributeDifference) -> Self {
        Self {
            attributes,
            properties: IndexMap::new(),
        }
    }
}

impl Diff for DetailedDifference {
    fn existence(&self) -> Existence {
        self.attributes.existence
    }

    fn is_different(&self) -> bool {
        self.attributes.is_different() || any_different(&self.properties)
    }
}

impl FromExistence for DetailedDifference {
    fn from_existence(existence: Existence) -> Self {
        Self::new(AttributeDifference::from_existence(existence))
    }
}

pub type ColumnDifference = DetailedDifference;
pub type IndexDifference = DetailedDifference;
pub type RelationDifference = AttributeDifference;
pub type TriggerDifference = AttributeDifference;
pub type UserTypeDifference = AttributeDifference;

/// View, function, procedure or synonym: definition bodies plus nested
/// extended properties and permissions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ObjectDifference {
    #[serde(flatten)]
    pub existence: Existence,
    pub definition1: Option<String>,
    pub definition2: Option<String>,
    /// Whitespace runs are collapsed before the bodies are compared
    pub ignore_whitespace: bool,
    pub properties: IndexMap<String, ValueDifference>,
    pub permissions: IndexMap<String, PermissionDifference>,
}

impl ObjectDifference {
    pub fn new(definition1: impl Into<String>, definition2: impl Into<String>, ignore_whitespace: bool) -> Self {
        Self {
            existence: Existence::both(),
            definition1: Some(definition1.into()),
            definition2: Some(definition2.into()),
            ignore_whitespace,
            properties: IndexMap::new(),
            permissions: IndexMap::new(),
        }
    }

    /// Whether the cleaned definition bodies differ. Only meaningful when the
    /// object exists on both sides.
    pub fn definitions_are_different(&self) -> bool {
        match (&self.definition1, &self.definition2) {
            (Some(first), Some(second)) => definitions_differ(first, second, self.ignore_whitespace),
            _ => false,
        }
    }
}

impl Diff for ObjectDifference {
    fn existence(&self) -> Existence {
        self.existence
    }

    fn is_different(&self) -> bool {
        self.existence.is_different()
            || self.definitions_are_different()
            || any_different(&self.properties)
            || any_different(&self.permissions)
    }
}

impl FromExistence for ObjectDifference {
    fn from_existence(existence: Existence) -> Self {
        Self {
            existence,
            ..Default::default()
        }
    }
}

/// Everything that differs about one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableDifference {
    #[serde(flatten)]
    pub existence: Existence,
    pub columns: IndexMap<String, ColumnDifference>,
    pub indexes: IndexMap<String, IndexDifference>,
    pub relations: IndexMap<String, RelationDifference>,
    pub triggers: IndexMap<String, TriggerDifference>,
    pub properties: IndexMap<String, ValueDifference>,
    pub permissions: IndexMap<String, PermissionDifference>,
}

impl Diff for TableDifference {
    fn existence(&self) -> Existence {
        self.existence
    }

    fn is_different(&self) -> bool {
        self.existence.is_different()
            || any_different(&self.columns)
            || any_different(&self.indexes)
            || any_different(&self.relations)
            || any_different(&self.triggers)
            || any_different(&self.properties)
            || any_different(&self.permissions)
    }
}

impl FromExistence for TableDifference {
    fn from_existence(existence: Existence) -> Self {
        Self {
            existence,
            ..Default::default()
        }
    }
}

/// Top-level report categories, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Properties,
    Permissions,
    Tables,
    UserTypes,
    Views,
    Functions,
    Procedures,
    Synonyms,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Properties,
        Category::Permissions,
        Category::Tables,
        Category::UserTypes,
        Category::Views,
        Category::Functions,
        Category::Procedures,
        Category::Synonyms,
    ];

    /// Stable identifier, matching the serialized form.
    pub const fn key(self) -> &'static str {
        match self {
            Category::Properties => "properties",
            Category::Permissions => "permissions",
            Category::Tables => "tables",
            Category::UserTypes => "user_types",
            Category::Views => "views",
            Category::Functions => "functions",
            Category::Procedures => "procedures",
            Category::Synonyms => "synonyms",
        }
    }

    /// Section heading used in the report.
    pub const fn heading(self) -> &'static str {
        match self {
            Category::Properties => "Extended properties",
            Category::Permissions => "Permissions",
            Category::Tables => "Tables",
            Category::UserTypes => "User types",
            Category::Views => "Views",
            Category::Functions => "Functions",
            Category::Procedures => "Procedures",
            Category::Synonyms => "Synonyms",
        }
    }

    /// Entry label used in the report.
    pub const fn label(self) -> &'static str {
        match self {
            Category::Properties => "Property",
            Category::Permissions => "Permission",
            Category::Tables => "Table",
            Category::UserTypes => "User type",
            Category::Views => "View",
            Category::Functions => "Function",
            Category::Procedures => "Procedure",
            Category::Synonyms => "Synonym",
        }
    }
}

/// Per-category tally, used for summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    /// Objects matched across both databases (present on either side)
    pub compared: usize,
    /// Objects that differ
    pub different: usize,
}

/// Root of the difference tree for one comparison run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Differences {
    /// Friendly name of database 1
    pub database1: String,
    /// Friendly name of database 2
    pub database2: String,
    pub properties: IndexMap<String, ValueDifference>,
    pub permissions: IndexMap<String, PermissionDifference>,
    pub tables: IndexMap<String, TableDifference>,
    pub user_types: IndexMap<String, UserTypeDifference>,
    pub functions: IndexMap<String, ObjectDifference>,
    pub procedures: IndexMap<String, ObjectDifference>,
    pub views: IndexMap<String, ObjectDifference>,
    pub synonyms: IndexMap<String, ObjectDifference>,
}

impl Differences {
    pub fn new(database1: impl Into<String>, database2: impl Into<String>) -> Self {
        Self {
            database1: database1.into(),
            database2: database2.into(),
            ..Default::default()
        }
    }

    /// Whether any category contains a difference.
    pub fn has_differences(&self) -> bool {
        Category::ALL.iter().any(|category| self.count(*category).different > 0)
    }

    /// Tally for one category.
    pub fn count(&self, category: Category) -> CategoryCount {
        let (compared, different) = match category {
            Category::Properties => (self.properties.len(), count_different(&self.properties)),
            Category::Permissions => (self.permissions.len(), count_different(&self.permissions)),
            Category::Tables => (self.tables.len(), count_different(&self.tables)),
            Category::UserTypes => (self.user_types.len(), count_different(&self.user_types)),
            Category::Views => (self.views.len(), count_different(&self.views)),
            Category::Functions => (self.functions.len(), count_different(&self.functions)),
            Category::Procedures => (self.procedures.len(), count_different(&self.procedures)),
            Category::Synonyms => (self.synonyms.len(), count_different(&self.synonyms)),
        };
        CategoryCount {
            category,
            compared,
            different,
        }
    }

    /// Tallies for every category, in report order.
    pub fn summary(&self) -> Vec<CategoryCount> {
        Category::ALL.iter().map(|category| self.count(*category)).collect()
    }
}

impl std::fmt::Display for Differences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&render_report(self))
    }
}

/// Raw before/after bodies of an object whose cleaned definitions differ,
/// handed to an external diff viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefinitionPair {
    pub before: String,
    pub after: String,
}
