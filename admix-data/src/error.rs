/// Errors surfaced by the data layer.
///
/// "Zero rows matched" is never an error here: single-row lookups return
/// `Ok(None)` instead. `TransactionActive` and `NoTransaction` are misuse
/// errors for transaction-state violations; they are returned rather than
/// panicking so callers can log and abort the unit of work.
#[derive(Debug)]
pub enum DataError {
    /// Backend, connectivity, or query failure; not locally recoverable.
    Datasource(Box<dyn std::error::Error + Send + Sync>),
    /// The initial handshake exhausted its attempt budget.
    Connect {
        attempts: u32,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// `begin` was called while a transaction is already active.
    TransactionActive,
    /// `commit` or `rollback` was called with no active transaction.
    NoTransaction,
    /// An eager load named a relation the model does not declare.
    UnknownRelation(String),
}

impl DataError {
    /// Wraps any backend error into the `Datasource` class.
    pub fn datasource(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        DataError::Datasource(Box::new(err))
    }

    pub fn is_datasource(&self) -> bool {
        matches!(self, DataError::Datasource(_) | DataError::Connect { .. })
    }
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::Datasource(err) => write!(f, "datasource error: {err}"),
            DataError::Connect { attempts, source } => {
                write!(f, "database unreachable after {attempts} attempts: {source}")
            }
            DataError::TransactionActive => write!(f, "transaction already active"),
            DataError::NoTransaction => write!(f, "no active transaction"),
            DataError::UnknownRelation(name) => write!(f, "unknown relation: {name}"),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Datasource(err) => Some(err.as_ref()),
            DataError::Connect { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
