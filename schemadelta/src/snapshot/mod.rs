//! In-memory schema snapshot of one database.
//!
//! A snapshot is built once per database (usually deserialized from a JSON
//! dump, see [`loader`]) and is read-only afterwards. Collections are
//! insertion-ordered maps keyed by each object's identity key so that the
//! difference builder can match objects across the two sides.

pub mod keyed;
pub mod loader;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::CompareError;
use crate::keys::{canonical_name, permission_key, property_key, qualified_name, quote};
use crate::types::Side;

pub use keyed::Keyed;

/// Complete inventory of one database's schema objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    /// Server the snapshot was taken from
    pub server: String,

    /// Database name on that server
    pub database: String,

    /// When the snapshot was taken
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<DateTime<Utc>>,

    /// Tables keyed by `[schema].[name]`
    #[serde(with = "keyed")]
    pub tables: IndexMap<String, Table>,

    /// User-defined types keyed by `[schema].[name]`
    #[serde(with = "keyed")]
    pub user_types: IndexMap<String, UserType>,

    /// View name -> definition text
    #[serde(deserialize_with = "keyed::unique_map")]
    pub views: IndexMap<String, String>,

    /// Synonym name -> target object text
    #[serde(deserialize_with = "keyed::unique_map")]
    pub synonyms: IndexMap<String, String>,

    /// Function and procedure name -> kind and definition text
    #[serde(deserialize_with = "keyed::unique_map")]
    pub routines: IndexMap<String, Routine>,

    pub permissions: Vec<Permission>,

    pub extended_properties: Vec<ExtendedProperty>,
}

impl SchemaSnapshot {
    /// Create an empty snapshot for the given server and database.
    pub fn new(server: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            database: database.into(),
            captured_at: None,
            tables: IndexMap::new(),
            user_types: IndexMap::new(),
            views: IndexMap::new(),
            synonyms: IndexMap::new(),
            routines: IndexMap::new(),
            permissions: Vec::new(),
            extended_properties: Vec::new(),
        }
    }

    /// Human-readable identity used to label the report.
    pub fn friendly_name(&self) -> String {
        format!("{}.{}", self.server, self.database)
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.insert(table.qualified_name(), table);
        self
    }

    pub fn with_user_type(mut self, user_type: UserType) -> Self {
        self.user_types.insert(user_type.qualified_name(), user_type);
        self
    }

    pub fn with_view(mut self, name: impl Into<String>, definition: impl Into<String>) -> Self {
        self.views.insert(name.into(), definition.into());
        self
    }

    pub fn with_synonym(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.synonyms.insert(name.into(), target.into());
        self
    }

    pub fn with_routine(
        mut self,
        name: impl Into<String>,
        kind: RoutineKind,
        definition: impl Into<String>,
    ) -> Self {
        self.routines.insert(
            name.into(),
            Routine {
                kind,
                definition: definition.into(),
            },
        );
        self
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.push(permission);
        self
    }

    pub fn with_property(mut self, property: ExtendedProperty) -> Self {
        self.extended_properties.push(property);
        self
    }

    /// Check that every keyed collection is keyed by its items' own identity.
    pub fn validate(&self, side: Side) -> Result<(), CompareError> {
        if self.server.trim().is_empty() {
            return Err(CompareError::MissingIdentity { side, field: "server" });
        }
        if self.database.trim().is_empty() {
            return Err(CompareError::MissingIdentity { side, field: "database" });
        }

        let inconsistent = |category: &'static str, key: &str, expected: String| CompareError::InconsistentSnapshot {
            side,
            category,
            detail: format!("entry '{key}' identifies itself as '{expected}'"),
        };

        for (key, table) in &self.tables {
            let expected = table.qualified_name();
            if *key != expected {
                return Err(inconsistent("tables", key, expected));
            }
            check_keys(&table.columns).map_err(|(k, e)| inconsistent("columns", &k, e))?;
            check_keys(&table.indexes).map_err(|(k, e)| inconsistent("indexes", &k, e))?;
            check_keys(&table.relations).map_err(|(k, e)| inconsistent("relations", &k, e))?;
            check_keys(&table.triggers).map_err(|(k, e)| inconsistent("triggers", &k, e))?;
            for index in table.indexes.values() {
                check_keys(&index.columns).map_err(|(k, e)| inconsistent("indexes", &k, e))?;
                check_keys(&index.included_columns)
                    .map_err(|(k, e)| inconsistent("indexes", &k, e))?;
            }
        }
        check_keys(&self.user_types).map_err(|(k, e)| inconsistent("user types", &k, e))?;
        check_names(self.views.keys()).map_err(|(k, e)| inconsistent("views", &k, e))?;
        check_names(self.synonyms.keys()).map_err(|(k, e)| inconsistent("synonyms", &k, e))?;
        check_names(self.routines.keys()).map_err(|(k, e)| inconsistent("routines", &k, e))?;

        Ok(())
    }
}

fn check_keys<T: Keyed>(map: &IndexMap<String, T>) -> Result<(), (String, String)> {
    for (key, item) in map {
        let expected = item.key();
        if *key != expected {
            return Err((key.clone(), expected));
        }
    }
    Ok(())
}

/// Definition-bearing objects are keyed by their canonical `[schema].[name]`.
fn check_names<'k>(keys: impl Iterator<Item = &'k String>) -> Result<(), (String, String)> {
    for key in keys {
        let expected = canonical_name(key);
        if *key != expected {
            return Err((key.clone(), expected));
        }
    }
    Ok(())
}

/// A table and everything nested under it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    pub schema: String,
    pub name: String,
    #[serde(default, with = "keyed")]
    pub columns: IndexMap<String, Column>,
    #[serde(default, with = "keyed")]
    pub indexes: IndexMap<String, Index>,
    #[serde(default, with = "keyed")]
    pub relations: IndexMap<String, Relation>,
    #[serde(default, with = "keyed")]
    pub triggers: IndexMap<String, Trigger>,
}

impl Table {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn qualified_name(&self) -> String {
        qualified_name(&self.schema, &self.name)
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.insert(column.name.clone(), column);
        self
    }

    pub fn with_index(mut self, index: Index) -> Self {
        self.indexes.insert(index.name.clone(), index);
        self
    }

    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relations.insert(relation.name.clone(), relation);
        self
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.triggers.insert(trigger.name.clone(), trigger);
        self
    }
}

impl Keyed for Table {
    fn key(&self) -> String {
        self.qualified_name()
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

fn default_true() -> bool {
    true
}

/// Column metadata as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,

    #[serde(default)]
    pub ordinal_position: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    #[serde(default = "default_true")]
    pub is_nullable: bool,

    pub data_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_maximum_length: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_octet_length: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_precision: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_precision_radix: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_scale: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime_precision: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_set_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collation_name: Option<String>,

    /// Schema of the user-defined type the column is declared with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_schema: Option<String>,

    /// Name of the user-defined type the column is declared with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_identity: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_seed: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_increment: Option<i64>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_computed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computed_definition: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_rowguid: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_sparse: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ordinal_position: 0,
            default_value: None,
            is_nullable: true,
            data_type: data_type.into(),
            character_maximum_length: None,
            character_octet_length: None,
            numeric_precision: None,
            numeric_precision_radix: None,
            numeric_scale: None,
            datetime_precision: None,
            character_set_name: None,
            collation_name: None,
            domain_schema: None,
            domain_name: None,
            is_identity: false,
            identity_seed: None,
            identity_increment: None,
            is_computed: false,
            computed_definition: None,
            is_rowguid: false,
            is_sparse: false,
        }
    }

    /// Fully-qualified user-defined type, when the column uses one.
    pub fn custom_data_type(&self) -> Option<String> {
        self.domain_name.as_deref().map(|name| match self.domain_schema.as_deref() {
            Some(schema) => qualified_name(schema, name),
            None => quote(name),
        })
    }
}

impl Keyed for Column {
    fn key(&self) -> String {
        self.name.clone()
    }
}

/// Index (including primary keys and unique constraints).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,

    /// Catalog type description, e.g. `CLUSTERED` or `NONCLUSTERED`
    pub kind: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_primary_key: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_unique: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_unique_constraint: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_disabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_factor: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_definition: Option<String>,

    /// Key columns in key order
    #[serde(default, with = "keyed")]
    pub columns: IndexMap<String, IndexColumn>,

    /// Non-key columns stored at the leaf level
    #[serde(default, with = "keyed")]
    pub included_columns: IndexMap<String, IndexColumn>,
}

impl Index {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            is_primary_key: false,
            is_unique: false,
            is_unique_constraint: false,
            is_disabled: false,
            fill_factor: None,
            filter_definition: None,
            columns: IndexMap::new(),
            included_columns: IndexMap::new(),
        }
    }

    pub fn with_column(mut self, name: impl Into<String>, is_descending: bool) -> Self {
        let column = IndexColumn {
            name: name.into(),
            is_descending,
        };
        self.columns.insert(column.name.clone(), column);
        self
    }

    pub fn with_included_column(mut self, name: impl Into<String>) -> Self {
        let column = IndexColumn {
            name: name.into(),
            is_descending: false,
        };
        self.included_columns.insert(column.name.clone(), column);
        self
    }
}

impl Keyed for Index {
    fn key(&self) -> String {
        self.name.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexColumn {
    pub name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_descending: bool,
}

impl Keyed for IndexColumn {
    fn key(&self) -> String {
        self.name.clone()
    }
}

/// Foreign-key relation from the owning table to a referenced table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub name: String,

    /// Referenced table as `[schema].[name]`
    pub referenced_table: String,

    pub column_pairs: Vec<ColumnPair>,

    #[serde(default = "default_rule")]
    pub delete_rule: String,

    #[serde(default = "default_rule")]
    pub update_rule: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_disabled: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_not_trusted: bool,
}

fn default_rule() -> String {
    "NO_ACTION".to_string()
}

impl Relation {
    pub fn new(name: impl Into<String>, referenced_table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            referenced_table: referenced_table.into(),
            column_pairs: Vec::new(),
            delete_rule: default_rule(),
            update_rule: default_rule(),
            is_disabled: false,
            is_not_trusted: false,
        }
    }

    pub fn with_pair(mut self, column: impl Into<String>, referenced_column: impl Into<String>) -> Self {
        self.column_pairs.push(ColumnPair {
            column: column.into(),
            referenced_column: referenced_column.into(),
        });
        self
    }
}

impl Keyed for Relation {
    fn key(&self) -> String {
        self.name.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPair {
    pub column: String,
    pub referenced_column: String,
}

impl std::fmt::Display for ColumnPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", quote(&self.column), quote(&self.referenced_column))
    }
}

/// DML trigger attached to a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub name: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_insert: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_update: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_delete: bool,

    /// `AFTER` trigger when true, `INSTEAD OF` otherwise
    #[serde(default = "default_true")]
    pub is_after: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_disabled: bool,

    pub definition: String,
}

impl Trigger {
    pub fn new(name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_insert: false,
            is_update: false,
            is_delete: false,
            is_after: true,
            is_disabled: false,
            definition: definition.into(),
        }
    }
}

impl Keyed for Trigger {
    fn key(&self) -> String {
        self.name.clone()
    }
}

/// User-defined data type or table type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserType {
    pub schema: String,
    pub name: String,
    pub base_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<i32>,
    #[serde(default = "default_true")]
    pub is_nullable: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_table_type: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collation_name: Option<String>,
}

impl UserType {
    pub fn new(schema: impl Into<String>, name: impl Into<String>, base_type: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            base_type: base_type.into(),
            max_length: None,
            precision: None,
            scale: None,
            is_nullable: true,
            is_table_type: false,
            collation_name: None,
        }
    }

    pub fn qualified_name(&self) -> String {
        qualified_name(&self.schema, &self.name)
    }
}

impl Keyed for UserType {
    fn key(&self) -> String {
        self.qualified_name()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutineKind {
    Function,
    Procedure,
}

impl std::fmt::Display for RoutineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoutineKind::Function => write!(f, "function"),
            RoutineKind::Procedure => write!(f, "procedure"),
        }
    }
}

/// Stored procedure or user-defined function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    pub kind: RoutineKind,
    pub definition: String,
}

/// The securable or metadata owner a flat record is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Owner {
    Database,
    Schema(String),
    Object(String),
    Column { object: String, column: String },
    Index { object: String, index: String },
    Parameter { object: String, parameter: String },
}

impl Owner {
    /// Path used as the owner part of matching keys.
    pub fn path(&self) -> String {
        match self {
            Owner::Database => "database".to_string(),
            Owner::Schema(schema) => format!("schema {}", quote(schema)),
            Owner::Object(object) => object.clone(),
            Owner::Column { object, column } => format!("{object} column {}", quote(column)),
            Owner::Index { object, index } => format!("{object} index {}", quote(index)),
            Owner::Parameter { object, parameter } => format!("{object} parameter {parameter}"),
        }
    }
}

fn object_owner(schema: Option<&str>, object: Option<&str>) -> Owner {
    match (schema, object) {
        (_, Some(object)) => Owner::Object(qualified_name(schema.unwrap_or("dbo"), object)),
        (Some(schema), None) => Owner::Schema(schema.to_string()),
        (None, None) => Owner::Database,
    }
}

/// A GRANT/DENY/REVOKE row from the permission catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Role or user the permission applies to
    pub principal: String,

    /// Permission name, e.g. `SELECT` or `EXECUTE`
    pub permission: String,

    /// `GRANT`, `DENY` or `GRANT_WITH_GRANT_OPTION`
    pub state: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

impl Permission {
    /// Database-level permission.
    pub fn new(principal: impl Into<String>, permission: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
            permission: permission.into(),
            state: state.into(),
            schema: None,
            object: None,
            column: None,
        }
    }

    pub fn on_object(mut self, schema: impl Into<String>, object: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self.object = Some(object.into());
        self
    }

    pub fn on_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn owner(&self) -> Owner {
        object_owner(self.schema.as_deref(), self.object.as_deref())
    }
}

impl Keyed for Permission {
    fn key(&self) -> String {
        permission_key(
            &self.principal,
            &self.permission,
            &self.state,
            &self.owner().path(),
            self.column.as_deref(),
        )
    }
}

/// Sub-object of a schema object that an extended property can describe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinorItem {
    Column(String),
    Index(String),
    Parameter(String),
}

/// An `sp_addextendedproperty` name/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedProperty {
    pub name: String,

    #[serde(default)]
    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minor: Option<MinorItem>,
}

impl ExtendedProperty {
    /// Database-level property.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            schema: None,
            object: None,
            minor: None,
        }
    }

    pub fn on_object(mut self, schema: impl Into<String>, object: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self.object = Some(object.into());
        self
    }

    pub fn on_minor(mut self, minor: MinorItem) -> Self {
        self.minor = Some(minor);
        self
    }

    pub fn owner(&self) -> Owner {
        let owner = object_owner(self.schema.as_deref(), self.object.as_deref());
        match (owner, &self.minor) {
            (Owner::Object(object), Some(MinorItem::Column(column))) => Owner::Column {
                object,
                column: column.clone(),
            },
            (Owner::Object(object), Some(MinorItem::Index(index))) => Owner::Index {
                object,
                index: index.clone(),
            },
            (Owner::Object(object), Some(MinorItem::Parameter(parameter))) => Owner::Parameter {
                object,
                parameter: parameter.clone(),
            },
            (owner, _) => owner,
        }
    }
}

impl Keyed for ExtendedProperty {
    fn key(&self) -> String {
        property_key(&self.owner().path(), &self.name)
    }
}
