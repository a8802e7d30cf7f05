use crate::eager::RelationDef;
use crate::value::Value;

/// Mapping contract between a storage-shaped record and a domain entity.
///
/// Every persisted type implements this once; the generic repository builds
/// all of its SQL from the table name, column list, and value extraction
/// declared here, and maps rows back to entities via `to_entity`.
///
/// `from_entity(to_entity(m))` must reproduce `m` on every entity-exposed
/// field (round-trip law). Fields deliberately kept out of the domain view
/// (derived transport fields, attached relations) are the only allowed
/// exceptions and must be documented on the implementing type.
///
/// # Example
///
/// ```ignore
/// impl Model for CategoryRecord {
///     type Entity = Category;
///     type Key = i64;
///
///     fn table_name() -> &'static str { "categories" }
///     fn columns() -> &'static [&'static str] { &["name", "status"] }
///     fn values(&self) -> Vec<Value> { vec![self.name.clone().into(), self.status.into()] }
///     fn key(&self) -> i64 { self.id }
///     fn to_entity(&self) -> Category { /* … */ }
///     fn from_entity(e: &Category) -> Self { /* … */ }
/// }
/// ```
pub trait Model: Sized + Send + Sync + Unpin + 'static {
    type Entity: Clone + Send + Sync + 'static;
    type Key: Clone + Into<Value> + Send + Sync + 'static;

    /// Storage location of this type; constant per type.
    fn table_name() -> &'static str;

    fn id_column() -> &'static str {
        "id"
    }

    /// Insertable columns, excluding the generated key column. Order must
    /// match [`values`](Model::values).
    fn columns() -> &'static [&'static str];

    /// Current field values, aligned one-to-one with [`columns`](Model::columns).
    fn values(&self) -> Vec<Value>;

    fn key(&self) -> Self::Key;

    fn to_entity(&self) -> Self::Entity;

    fn from_entity(entity: &Self::Entity) -> Self;

    /// Relations this model can eager-load. Empty by default.
    fn relations() -> &'static [RelationDef] {
        &[]
    }
}
