use crate::eager::EagerLoad;

/// Optional knobs for a listing operation: eager loads, orderings, paging.
///
/// Replaces loosely-typed variadic trailing arguments with named fields that
/// are checked at the call site:
///
/// ```
/// use admix_data::eager::EagerLoad;
/// use admix_data::options::QueryOptions;
///
/// let opts = QueryOptions::new()
///     .with(EagerLoad::new("admin"))
///     .order_by("created_at", false)
///     .paginate(1, 20);
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub eager_loads: Vec<EagerLoad>,
    /// `(column, ascending)` pairs, applied in the given sequence.
    pub order_by: Vec<(String, bool)>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, load: EagerLoad) -> Self {
        self.eager_loads.push(load);
        self
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order_by.push((column.to_string(), ascending));
        self
    }

    pub fn paginate(mut self, page: i64, per_page: i64) -> Self {
        self.page = Some(page);
        self.per_page = Some(per_page);
        self
    }

    /// Paging is in effect only when both parameters were supplied.
    pub fn is_paged(&self) -> bool {
        self.page.is_some() && self.per_page.is_some()
    }
}
