//! Statement assembly for rendered condition fragments.
//!
//! Conditions render to a portable fragment with `?` placeholders and a
//! value list; this module turns that pair into an executable statement for
//! a concrete backend: list parameters are expanded into one placeholder per
//! element and placeholders are renumbered to the dialect's style.

use admix_data::condition::Condition;
use admix_data::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Generic SQL using `?` placeholders.
    Generic,
    /// SQLite-style `?` placeholders.
    Sqlite,
    /// MySQL-style `?` placeholders.
    MySql,
    /// Postgres-style `$1, $2, ...` placeholders.
    Postgres,
}

impl Dialect {
    /// Sniffs the dialect from a connection URL scheme.
    pub fn from_url(url: &str) -> Self {
        if url.starts_with("postgres") {
            Dialect::Postgres
        } else if url.starts_with("mysql") || url.starts_with("mariadb") {
            Dialect::MySql
        } else if url.starts_with("sqlite") {
            Dialect::Sqlite
        } else {
            Dialect::Generic
        }
    }

    fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::Generic | Dialect::Sqlite | Dialect::MySql => "?".to_string(),
        }
    }

    /// Whether `INSERT ... RETURNING` / `UPDATE ... RETURNING` can be used to
    /// rehydrate written rows in one round trip.
    pub fn supports_returning(self) -> bool {
        matches!(self, Dialect::Postgres | Dialect::Sqlite)
    }
}

/// Builds full statements for one table in one dialect.
///
/// ```
/// use admix_data::condition::equal;
/// use admix_data_sqlx::sql::{Dialect, SqlBuilder};
///
/// let (sql, params) = SqlBuilder::new("categories", Dialect::Postgres)
///     .condition(equal("status", 10))
///     .order_by("name", true)
///     .limit(10)
///     .build_select("*");
/// assert_eq!(
///     sql,
///     "SELECT * FROM categories WHERE status = $1 ORDER BY name ASC LIMIT 10"
/// );
/// assert_eq!(params.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SqlBuilder {
    table: &'static str,
    dialect: Dialect,
    condition: Option<Condition>,
    order: Vec<(String, bool)>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl SqlBuilder {
    pub fn new(table: &'static str, dialect: Dialect) -> Self {
        Self {
            table,
            dialect,
            condition: None,
            order: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order.push((column.to_string(), ascending));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Builds a SELECT returning `(sql, bind_values)`. `columns` is the raw
    /// projection (e.g. `"*"` or `"id, name"`).
    pub fn build_select(&self, columns: &str) -> (String, Vec<Value>) {
        let mut sql = format!("SELECT {columns} FROM {}", self.table);
        let mut params = Vec::new();
        let mut index = 1usize;
        self.append_where(&mut sql, &mut params, &mut index);
        self.append_order(&mut sql);
        self.append_limit_offset(&mut sql);
        (sql, params)
    }

    pub fn build_count(&self) -> (String, Vec<Value>) {
        let mut sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let mut params = Vec::new();
        let mut index = 1usize;
        self.append_where(&mut sql, &mut params, &mut index);
        (sql, params)
    }

    /// Multi-row INSERT; appends `RETURNING *` on dialects that support it.
    pub fn build_insert(
        &self,
        columns: &[&'static str],
        rows: &[Vec<Value>],
    ) -> (String, Vec<Value>) {
        let mut sql = format!("INSERT INTO {} ({}) VALUES ", self.table, columns.join(", "));
        let mut params = Vec::new();
        let mut index = 1usize;
        for (r, row) in rows.iter().enumerate() {
            if r > 0 {
                sql.push_str(", ");
            }
            sql.push('(');
            for (i, value) in row.iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                sql.push_str(&self.dialect.placeholder(index));
                index += 1;
                params.push(value.clone());
            }
            sql.push(')');
        }
        if self.dialect.supports_returning() {
            sql.push_str(" RETURNING *");
        }
        (sql, params)
    }

    /// Single-row UPDATE by key; appends `RETURNING *` on dialects that
    /// support it.
    pub fn build_update(
        &self,
        columns: &[&'static str],
        values: Vec<Value>,
        id_column: &str,
        key: Value,
    ) -> (String, Vec<Value>) {
        let mut sql = format!("UPDATE {} SET ", self.table);
        let mut params = Vec::new();
        let mut index = 1usize;
        for (i, (column, value)) in columns.iter().zip(values).enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&format!("{column} = {}", self.dialect.placeholder(index)));
            index += 1;
            params.push(value);
        }
        sql.push_str(&format!(" WHERE {id_column} = {}", self.dialect.placeholder(index)));
        params.push(key);
        if self.dialect.supports_returning() {
            sql.push_str(" RETURNING *");
        }
        (sql, params)
    }

    /// Multi-row UPDATE constrained by the builder's condition instead of a
    /// key; never rehydrates, so no `RETURNING`.
    pub fn build_update_where(
        &self,
        columns: &[&'static str],
        values: Vec<Value>,
    ) -> (String, Vec<Value>) {
        let mut sql = format!("UPDATE {} SET ", self.table);
        let mut params = Vec::new();
        let mut index = 1usize;
        for (i, (column, value)) in columns.iter().zip(values).enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&format!("{column} = {}", self.dialect.placeholder(index)));
            index += 1;
            params.push(value);
        }
        self.append_where(&mut sql, &mut params, &mut index);
        (sql, params)
    }

    pub fn build_delete(&self, id_column: &str, key: Value) -> (String, Vec<Value>) {
        let sql = format!(
            "DELETE FROM {} WHERE {id_column} = {}",
            self.table,
            self.dialect.placeholder(1)
        );
        (sql, vec![key])
    }

    fn append_where(&self, sql: &mut String, params: &mut Vec<Value>, index: &mut usize) {
        if let Some(condition) = &self.condition {
            let (fragment, values) = condition.render();
            sql.push_str(" WHERE ");
            append_expanded(sql, &fragment, values, params, self.dialect, index);
        }
    }

    fn append_order(&self, sql: &mut String) {
        if self.order.is_empty() {
            return;
        }
        sql.push_str(" ORDER BY ");
        let clauses: Vec<_> = self
            .order
            .iter()
            .map(|(column, ascending)| {
                if *ascending {
                    format!("{column} ASC")
                } else {
                    format!("{column} DESC")
                }
            })
            .collect();
        sql.push_str(&clauses.join(", "));
    }

    fn append_limit_offset(&self, sql: &mut String) {
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }
    }
}

/// Copies a rendered fragment into `sql`, replacing each `?` with the
/// dialect placeholder for its parameter. A `Value::List` expands to one
/// placeholder per element; an empty list becomes `NULL`, which matches no
/// rows under `IN`.
fn append_expanded(
    sql: &mut String,
    fragment: &str,
    values: Vec<Value>,
    params: &mut Vec<Value>,
    dialect: Dialect,
    index: &mut usize,
) {
    let mut pending = values.into_iter();
    for ch in fragment.chars() {
        if ch != '?' {
            sql.push(ch);
            continue;
        }
        match pending.next() {
            Some(Value::List(items)) => {
                if items.is_empty() {
                    sql.push_str("NULL");
                } else {
                    for (i, item) in items.into_iter().enumerate() {
                        if i > 0 {
                            sql.push_str(", ");
                        }
                        sql.push_str(&dialect.placeholder(*index));
                        *index += 1;
                        params.push(item);
                    }
                }
            }
            Some(value) => {
                sql.push_str(&dialect.placeholder(*index));
                *index += 1;
                params.push(value);
            }
            // render() guarantees a value per placeholder
            None => sql.push('?'),
        }
    }
}
