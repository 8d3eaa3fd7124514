//! Relational storage backend.
//!
//! Lays components out the way a relational store would: an `entities`
//! table of live ids, plus one `<type>_components` table per component
//! type, keyed by `entity_id` with one typed column per field. Writes are
//! upserts, reads are primary-key selects, and value queries are `WHERE`
//! scans over the columns. [`TableStorage::ddl`] renders the matching
//! schema as SQL.
//!
//! Column types:
//!
//! | Field kind   | Column    |
//! |--------------|-----------|
//! | `bool`       | `INTEGER` |
//! | `int`        | `INTEGER` |
//! | `entity-ref` | `INTEGER` |
//! | `float`      | `REAL`    |
//! | `text`       | `TEXT`    |

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

use ecm_foundation::{Component, ComponentType, EntityId, EntitySet, FieldKind, Value};
use tracing::trace;

use crate::backend::Storage;
use crate::schema::ComponentSchema;

/// SQL column type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SqlType {
    /// 64-bit integer.
    Integer,
    /// 64-bit float.
    Real,
    /// UTF-8 text.
    Text,
}

impl SqlType {
    /// Returns the column type used for a field kind.
    #[must_use]
    pub const fn for_kind(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Bool | FieldKind::Int | FieldKind::EntityRef => Self::Integer,
            FieldKind::Float => Self::Real,
            FieldKind::Text => Self::Text,
        }
    }

    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Text => "TEXT",
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value as stored in a column.
///
/// Reals compare by bit pattern, matching [`Value`] equality.
#[derive(Clone, Debug)]
pub enum SqlValue {
    /// Integer cell.
    Integer(i64),
    /// Real cell.
    Real(f64),
    /// Text cell.
    Text(Arc<str>),
}

impl SqlValue {
    /// Encodes a field value. Entity references become their raw id.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn encode(value: &Value) -> Self {
        match value {
            Value::Bool(b) => Self::Integer(i64::from(*b)),
            Value::Int(n) => Self::Integer(*n),
            Value::Float(n) => Self::Real(*n),
            Value::Text(s) => Self::Text(s.clone()),
            Value::EntityRef(id) => Self::Integer(id.index() as i64),
        }
    }

    /// Decodes a cell of a column declared with `kind`.
    #[must_use]
    #[allow(clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn decode(&self, kind: FieldKind) -> Value {
        match (kind, self) {
            (FieldKind::Bool, Self::Integer(n)) => Value::Bool(*n != 0),
            (FieldKind::EntityRef, Self::Integer(n)) => Value::EntityRef(EntityId::new(*n as u64)),
            (FieldKind::Float, Self::Integer(n)) => Value::Float(*n as f64),
            (_, Self::Integer(n)) => Value::Int(*n),
            (_, Self::Real(n)) => Value::Float(*n),
            (_, Self::Text(s)) => Value::Text(s.clone()),
        }
    }
}

impl PartialEq for SqlValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Real(a), Self::Real(b)) => a.to_bits() == b.to_bits(),
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for SqlValue {}

/// A column of a component table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    /// Column name (the field name).
    pub name: Arc<str>,
    /// Declared field kind.
    pub kind: FieldKind,
}

impl Column {
    /// Returns the SQL column type.
    #[must_use]
    pub const fn sql_type(&self) -> SqlType {
        SqlType::for_kind(self.kind)
    }
}

/// Row table for one component type.
#[derive(Clone, Debug)]
pub struct Table {
    name: String,
    ty: ComponentType,
    columns: Vec<Column>,
    rows: BTreeMap<EntityId, Vec<SqlValue>>,
    indexed: bool,
}

impl Table {
    fn for_schema(schema: &ComponentSchema) -> Self {
        Self {
            name: table_name(schema.name.as_str()),
            ty: schema.name.clone(),
            columns: schema
                .fields
                .iter()
                .map(|f| Column {
                    name: f.name.clone(),
                    kind: f.kind,
                })
                .collect(),
            rows: BTreeMap::new(),
            indexed: schema.indexed,
        }
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the columns after `entity_id`, in field order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns true if the table carries column indexes.
    #[must_use]
    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Selects the row for an entity.
    #[must_use]
    pub fn row(&self, entity: EntityId) -> Option<&[SqlValue]> {
        self.rows.get(&entity).map(Vec::as_slice)
    }

    /// Renders the `CREATE TABLE` statement.
    #[must_use]
    pub fn create_statement(&self) -> String {
        let mut sql = format!(
            "CREATE TABLE {} (entity_id INTEGER PRIMARY KEY REFERENCES entities(id)",
            self.name
        );
        for column in &self.columns {
            let _ = write!(sql, ", {} {} NOT NULL", column.name, column.sql_type());
        }
        sql.push_str(");");
        sql
    }

    /// Renders one `CREATE INDEX` statement per column of an indexed table.
    #[must_use]
    pub fn index_statements(&self) -> Vec<String> {
        if !self.indexed {
            return Vec::new();
        }
        self.columns
            .iter()
            .map(|c| {
                format!(
                    "CREATE INDEX {table}_{column} ON {table} ({column});",
                    table = self.name,
                    column = c.name
                )
            })
            .collect()
    }

    fn encode(component: &Component) -> Vec<SqlValue> {
        component.values().map(SqlValue::encode).collect()
    }

    fn decode(&self, row: &[SqlValue]) -> Component {
        Component::from_fields(
            &self.ty,
            self.columns
                .iter()
                .zip(row)
                .map(|(column, cell)| (column.name.clone(), cell.decode(column.kind))),
        )
    }

    fn upsert(&mut self, entity: EntityId, row: Vec<SqlValue>) -> Option<Vec<SqlValue>> {
        self.rows.insert(entity, row)
    }

    fn delete(&mut self, entity: EntityId) -> Option<Vec<SqlValue>> {
        self.rows.remove(&entity)
    }

    fn select_where<'a>(
        &'a self,
        filters: &'a [(usize, SqlValue)],
    ) -> impl Iterator<Item = EntityId> + 'a {
        self.rows.iter().filter_map(move |(entity, row)| {
            filters
                .iter()
                .all(|(position, cell)| row.get(*position) == Some(cell))
                .then_some(*entity)
        })
    }
}

/// Converts a type name to a snake-case table name: `MoveDestination`
/// becomes `move_destination_components`.
#[must_use]
pub fn table_name(ty: &str) -> String {
    let mut name = String::with_capacity(ty.len() + 12);
    let mut previous: Option<char> = None;
    for c in ty.chars() {
        if c.is_uppercase() {
            if previous.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
                name.push('_');
            }
            name.extend(c.to_lowercase());
        } else if c.is_alphanumeric() {
            name.push(c);
        } else {
            name.push('_');
        }
        previous = Some(c);
    }
    name.push_str("_components");
    name
}

/// Relational-layout storage backend.
#[derive(Clone, Debug, Default)]
pub struct TableStorage {
    entities: BTreeSet<EntityId>,
    tables: HashMap<ComponentType, Table>,
    /// Table creation order, for DDL output.
    order: Vec<ComponentType>,
}

impl TableStorage {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the table for a component type.
    #[must_use]
    pub fn table(&self, ty: &str) -> Option<&Table> {
        self.tables.get(ty)
    }

    /// Returns the number of rows in the `entities` table.
    #[must_use]
    pub fn entity_rows(&self) -> usize {
        self.entities.len()
    }

    /// Renders the full schema as SQL, one statement per line.
    #[must_use]
    pub fn ddl(&self) -> String {
        let mut lines = vec!["CREATE TABLE entities (id INTEGER PRIMARY KEY);".to_string()];
        for table in self.order.iter().filter_map(|ty| self.tables.get(ty)) {
            lines.push(table.create_statement());
            lines.extend(table.index_statements());
        }
        lines.join("\n")
    }

    fn table_for(&self, schema: &ComponentSchema) -> Option<&Table> {
        self.tables.get(&schema.name)
    }
}

impl Storage for TableStorage {
    const NAME: &'static str = "relational";

    fn register(&mut self, schema: &ComponentSchema, _slots: usize) {
        let table = Table::for_schema(schema);
        trace!(table = %table.name, "create table");
        if self.tables.insert(schema.name.clone(), table).is_none() {
            self.order.push(schema.name.clone());
        }
    }

    fn enable_index(&mut self, schema: &ComponentSchema) {
        if let Some(table) = self.tables.get_mut(&schema.name) {
            table.indexed = true;
        }
    }

    fn entity_created(&mut self, id: EntityId) {
        self.entities.insert(id);
    }

    fn entity_removed(&mut self, id: EntityId) {
        self.entities.remove(&id);
    }

    fn write(
        &mut self,
        schema: &ComponentSchema,
        id: EntityId,
        component: Component,
    ) -> Option<Component> {
        debug_assert!(self.entities.contains(&id));
        let table = self.tables.get_mut(&schema.name)?;
        let old = table.upsert(id, Table::encode(&component))?;
        Some(table.decode(&old))
    }

    fn clear(&mut self, schema: &ComponentSchema, id: EntityId) -> Option<Component> {
        let table = self.tables.get_mut(&schema.name)?;
        let old = table.delete(id)?;
        Some(table.decode(&old))
    }

    fn read(&self, schema: &ComponentSchema, id: EntityId) -> Option<Component> {
        let table = self.table_for(schema)?;
        table.row(id).map(|row| table.decode(row))
    }

    fn contains(&self, schema: &ComponentSchema, id: EntityId) -> bool {
        self.table_for(schema).is_some_and(|t| t.rows.contains_key(&id))
    }

    fn members(&self, schema: &ComponentSchema) -> EntitySet {
        self.table_for(schema)
            .map(|t| t.rows.keys().copied().collect())
            .unwrap_or_default()
    }

    fn lookup(&self, schema: &ComponentSchema, constraints: &[(usize, Value)]) -> EntitySet {
        let Some(table) = self.table_for(schema) else {
            return EntitySet::new();
        };
        let filters: Vec<(usize, SqlValue)> = constraints
            .iter()
            .map(|(position, value)| (*position, SqlValue::encode(value)))
            .collect();
        table.select_where(&filters).collect()
    }
}
