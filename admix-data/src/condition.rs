//! Composable query predicates.
//!
//! A [`Condition`] is an immutable expression tree built from the free
//! functions in this module and rendered to a backend-agnostic SQL fragment
//! plus an ordered parameter list:
//!
//! ```
//! use admix_data::condition::{and, equal, not, Value};
//!
//! let c = and([equal("name", "a"), not(equal("age", 30))]);
//! let (fragment, values) = c.render();
//! assert_eq!(fragment, "(name = ? AND  NOT (age = ?))");
//! assert_eq!(values, vec![Value::Text("a".into()), Value::Int(30)]);
//! ```
//!
//! Field names are interpolated verbatim into the fragment while operand
//! values are always bound as parameters. Never build a condition from an
//! unsanitized external string: fields and operators are trusted code-level
//! literals, values are not.

pub use crate::value::Value;

/// A single node of a predicate expression tree.
///
/// Kept as plain data rather than closures so trees can be constructed,
/// compared, and unit-tested independently of any backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Binary {
        field: String,
        op: BinaryOp,
        value: Value,
    },
    Range {
        field: String,
        negated: bool,
        from: Value,
        to: Value,
    },
    Set {
        field: String,
        negated: bool,
        values: Vec<Value>,
    },
    Null {
        field: String,
    },
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
}

impl BinaryOp {
    fn as_sql(self) -> &'static str {
        match self {
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "!=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Like => "LIKE",
        }
    }
}

fn binary(field: &str, op: BinaryOp, value: impl Into<Value>) -> Condition {
    Condition::Binary {
        field: field.to_string(),
        op,
        value: value.into(),
    }
}

pub fn equal(field: &str, value: impl Into<Value>) -> Condition {
    binary(field, BinaryOp::Eq, value)
}

pub fn not_equal(field: &str, value: impl Into<Value>) -> Condition {
    binary(field, BinaryOp::Ne, value)
}

pub fn greater_than(field: &str, value: impl Into<Value>) -> Condition {
    binary(field, BinaryOp::Gt, value)
}

pub fn greater_or_equal(field: &str, value: impl Into<Value>) -> Condition {
    binary(field, BinaryOp::Ge, value)
}

pub fn less_than(field: &str, value: impl Into<Value>) -> Condition {
    binary(field, BinaryOp::Lt, value)
}

pub fn less_or_equal(field: &str, value: impl Into<Value>) -> Condition {
    binary(field, BinaryOp::Le, value)
}

/// Substring match. The substring is wrapped in `%`…`%` and any pattern
/// metacharacter in it (`%`, `_`, and the `!` escape itself) is escaped, so
/// callers always get literal-substring semantics. Case sensitivity is
/// backend-defined.
pub fn contains(field: &str, substring: &str) -> Condition {
    let mut pattern = String::with_capacity(substring.len() + 2);
    pattern.push('%');
    for c in substring.chars() {
        if matches!(c, '%' | '_' | '!') {
            pattern.push('!');
        }
        pattern.push(c);
    }
    pattern.push('%');
    binary(field, BinaryOp::Like, pattern)
}

/// Inclusive range test, two ordered parameters.
pub fn between(field: &str, from: impl Into<Value>, to: impl Into<Value>) -> Condition {
    Condition::Range {
        field: field.to_string(),
        negated: false,
        from: from.into(),
        to: to.into(),
    }
}

pub fn not_between(field: &str, from: impl Into<Value>, to: impl Into<Value>) -> Condition {
    Condition::Range {
        field: field.to_string(),
        negated: true,
        from: from.into(),
        to: to.into(),
    }
}

/// Set membership. The values collapse to a single list parameter; the
/// backend expands it into one placeholder per element.
pub fn is_in<V: Into<Value>>(field: &str, values: impl IntoIterator<Item = V>) -> Condition {
    Condition::Set {
        field: field.to_string(),
        negated: false,
        values: values.into_iter().map(Into::into).collect(),
    }
}

pub fn not_in<V: Into<Value>>(field: &str, values: impl IntoIterator<Item = V>) -> Condition {
    Condition::Set {
        field: field.to_string(),
        negated: true,
        values: values.into_iter().map(Into::into).collect(),
    }
}

pub fn is_null(field: &str) -> Condition {
    Condition::Null {
        field: field.to_string(),
    }
}

/// Joins the children with `AND`, parenthesizing the group. An empty list
/// renders as a no-op (always true) predicate.
pub fn and(conditions: impl IntoIterator<Item = Condition>) -> Condition {
    Condition::And(conditions.into_iter().collect())
}

/// Joins the children with `OR`, parenthesizing the group. An empty list
/// renders as a no-op (always true) predicate.
pub fn or(conditions: impl IntoIterator<Item = Condition>) -> Condition {
    Condition::Or(conditions.into_iter().collect())
}

/// Negates a single child; its parameters pass through unchanged.
pub fn not(condition: Condition) -> Condition {
    Condition::Not(Box::new(condition))
}

impl Condition {
    /// Renders the tree to a fragment and its ordered parameter list.
    ///
    /// Placeholders correspond 1:1, left to right, with the returned values;
    /// values are collected in recursive preorder, so nested trees of any
    /// depth render consistently.
    pub fn render(&self) -> (String, Vec<Value>) {
        let mut sql = String::new();
        let mut values = Vec::new();
        self.write_to(&mut sql, &mut values);
        (sql, values)
    }

    fn write_to(&self, sql: &mut String, values: &mut Vec<Value>) {
        match self {
            Condition::Binary { field, op, value } => {
                if *op == BinaryOp::Like {
                    sql.push_str(&format!("{field} LIKE ? ESCAPE '!'"));
                } else {
                    sql.push_str(&format!("{field} {} ?", op.as_sql()));
                }
                values.push(value.clone());
            }
            Condition::Range {
                field,
                negated,
                from,
                to,
            } => {
                let op = if *negated { "NOT BETWEEN" } else { "BETWEEN" };
                sql.push_str(&format!("{field} {op} ? AND ?"));
                values.push(from.clone());
                values.push(to.clone());
            }
            Condition::Set {
                field,
                negated,
                values: members,
            } => {
                let op = if *negated { "NOT IN" } else { "IN" };
                sql.push_str(&format!("{field} {op} (?)"));
                values.push(Value::List(members.clone()));
            }
            Condition::Null { field } => {
                sql.push_str(&format!("{field} IS NULL"));
            }
            Condition::And(children) => write_group(children, "AND", sql, values),
            Condition::Or(children) => write_group(children, "OR", sql, values),
            Condition::Not(child) => {
                sql.push_str(" NOT (");
                child.write_to(sql, values);
                sql.push(')');
            }
        }
    }
}

fn write_group(children: &[Condition], separator: &str, sql: &mut String, values: &mut Vec<Value>) {
    if children.is_empty() {
        sql.push_str("(1 = 1)");
        return;
    }
    sql.push('(');
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            sql.push_str(&format!(" {separator} "));
        }
        child.write_to(sql, values);
    }
    sql.push(')');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal() {
        let (sql, values) = equal("name", "test").render();
        assert_eq!(sql, "name = ?");
        assert_eq!(values, vec![Value::Text("test".into())]);
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(greater_than("id", 10).render().0, "id > ?");
        assert_eq!(greater_or_equal("id", 10).render().0, "id >= ?");
        assert_eq!(less_than("id", 10).render().0, "id < ?");
        assert_eq!(less_or_equal("id", 10).render().0, "id <= ?");
        assert_eq!(not_equal("id", 10).render().0, "id != ?");
    }

    #[test]
    fn test_contains_wraps_and_escapes() {
        let (sql, values) = contains("name", "a%b_c!d").render();
        assert_eq!(sql, "name LIKE ? ESCAPE '!'");
        assert_eq!(values, vec![Value::Text("%a!%b!_c!!d%".into())]);
    }

    #[test]
    fn test_between() {
        let (sql, values) = between("created_at", "2023-01-01", "2023-12-31").render();
        assert_eq!(sql, "created_at BETWEEN ? AND ?");
        assert_eq!(
            values,
            vec![
                Value::Text("2023-01-01".into()),
                Value::Text("2023-12-31".into())
            ]
        );
        assert_eq!(
            not_between("id", 1, 5).render().0,
            "id NOT BETWEEN ? AND ?"
        );
    }

    #[test]
    fn test_in_collapses_values() {
        let (sql, values) = is_in("status", vec![10, 11]).render();
        assert_eq!(sql, "status IN (?)");
        assert_eq!(
            values,
            vec![Value::List(vec![Value::Int(10), Value::Int(11)])]
        );
        assert_eq!(not_in("id", vec![1]).render().0, "id NOT IN (?)");
    }

    #[test]
    fn test_is_null_has_no_parameters() {
        let (sql, values) = is_null("deleted_at").render();
        assert_eq!(sql, "deleted_at IS NULL");
        assert!(values.is_empty());
    }

    #[test]
    fn test_and_with_not() {
        let c = and([equal("name", "a"), not(equal("age", 30))]);
        let (sql, values) = c.render();
        assert_eq!(sql, "(name = ? AND  NOT (age = ?))");
        assert_eq!(values, vec![Value::Text("a".into()), Value::Int(30)]);
    }

    #[test]
    fn test_value_order_is_recursive_preorder() {
        let c = or([
            and([equal("a", 1), equal("b", 2)]),
            not(between("c", 3, 4)),
            equal("d", 5),
        ]);
        let (sql, values) = c.render();
        assert_eq!(
            sql,
            "((a = ? AND b = ?) OR  NOT (c BETWEEN ? AND ?) OR d = ?)"
        );
        assert_eq!(
            values,
            vec![
                Value::Int(1),
                Value::Int(2),
                Value::Int(3),
                Value::Int(4),
                Value::Int(5)
            ]
        );
    }

    #[test]
    fn test_group_values_concatenate() {
        let c1 = equal("x", 1);
        let c2 = and([equal("y", 2), equal("z", 3)]);
        let (_, v1) = c1.render();
        let (_, v2) = c2.render();
        let (_, joined) = and([c1, c2]).render();
        let mut expected = v1;
        expected.extend(v2);
        assert_eq!(joined, expected);
    }

    #[test]
    fn test_empty_group_is_noop() {
        let (sql, values) = and(Vec::new()).render();
        assert_eq!(sql, "(1 = 1)");
        assert!(values.is_empty());
        assert_eq!(or(Vec::new()).render().0, "(1 = 1)");
    }

    #[test]
    fn test_deep_nesting() {
        let c = not(and([or([equal("a", 1), is_null("b")]), not_in("c", vec!["x"])]));
        let (sql, values) = c.render();
        assert_eq!(sql, " NOT (((a = ? OR b IS NULL) AND c NOT IN (?)))");
        assert_eq!(
            values,
            vec![Value::Int(1), Value::List(vec![Value::Text("x".into())])]
        );
    }
}
