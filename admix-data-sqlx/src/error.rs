use admix_data::error::DataError;

/// Extension trait for converting `sqlx::Error` into [`DataError`].
///
/// Due to Rust's orphan rules, `From<sqlx::Error> for DataError` can't be
/// implemented here; use `.into_data_error()` at the boundary instead. The
/// "zero rows" signal is deliberately not an error class — repositories
/// check [`SqlxStore::is_not_found`](crate::store::SqlxStore::is_not_found)
/// first and map it to an absent result.
pub trait SqlxErrorExt {
    fn into_data_error(self) -> DataError;
}

impl SqlxErrorExt for sqlx::Error {
    fn into_data_error(self) -> DataError {
        DataError::datasource(self)
    }
}

/// Convenience alias for data-layer results.
pub type SqlxResult<T> = Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_as_datasource() {
        let err = sqlx::Error::PoolClosed.into_data_error();
        assert!(err.is_datasource());
    }
}
