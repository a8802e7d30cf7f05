use crate::condition::Condition;

/// Declares a related-entity prefetch for a single read operation.
///
/// The repository resolves the relation name against the model's
/// [`RelationDef`](crate::eager::RelationDef) table and fetches all related
/// rows in one batched query as part of the same logical read, so iterating
/// the result set never issues per-row queries.
///
/// ```
/// use admix_data::condition::equal;
/// use admix_data::eager::EagerLoad;
///
/// let load = EagerLoad::new("admin")
///     .filter(equal("status", 10))
///     .columns(&["id", "name"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EagerLoad {
    pub relation: String,
    pub filter: Option<Condition>,
    pub columns: Vec<String>,
}

impl EagerLoad {
    pub fn new(relation: &str) -> Self {
        Self {
            relation: relation.to_string(),
            filter: None,
            columns: vec!["*".to_string()],
        }
    }

    /// Restricts which related rows are attached, independent of the root
    /// filter.
    pub fn filter(mut self, condition: Condition) -> Self {
        self.filter = Some(condition);
        self
    }

    /// Projects the related query to the given columns. The relation's join
    /// column is always fetched so rows can be matched back to their parent.
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }
}

/// A named relation declared by a model: related rows live in `table` and
/// join on `remote_key = parent.local_key`.
///
/// Covers both directions: a belongs-to declares
/// `{ table: "admins", remote_key: "id", local_key: "admin_id" }`, a has-many
/// the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationDef {
    pub name: &'static str,
    pub table: &'static str,
    pub remote_key: &'static str,
    pub local_key: &'static str,
}
