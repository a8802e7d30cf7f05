use crate::condition::Condition;
use crate::eager::EagerLoad;
use crate::error::DataError;
use crate::options::QueryOptions;
use crate::page::PageList;
use std::future::Future;

/// Generic async repository over a domain entity `E` with primary key `Id`.
///
/// One implementation serves every model/entity pair; feature modules wrap a
/// concrete instance and add their domain-specific queries on top. Uses
/// RPITIT (return-position `impl Trait` in traits) — no `async-trait` needed.
///
/// Error policy: any backend failure distinct from "zero rows matched" comes
/// back as a [`DataError`]; a single-row lookup that matches nothing returns
/// `Ok(None)`. No operation retries, partially applies a write, or suppresses
/// an error.
pub trait Repository<E, Id>: Send + Sync
where
    E: Send + Sync + 'static,
    Id: Send + Sync + 'static,
{
    /// Lists every row, subject to the options' orderings and paging.
    /// Counting is skipped when paging was not requested.
    fn all(&self, opts: &QueryOptions) -> impl Future<Output = Result<PageList<E>, DataError>> + Send;

    /// Like [`all`](Repository::all), filtered by a condition.
    fn all_by(
        &self,
        condition: &Condition,
        opts: &QueryOptions,
    ) -> impl Future<Output = Result<PageList<E>, DataError>> + Send;

    /// First row matching the condition, or `None` when nothing matches.
    fn first_by(
        &self,
        condition: &Condition,
        loads: &[EagerLoad],
    ) -> impl Future<Output = Result<Option<E>, DataError>> + Send;

    fn find_by_id(
        &self,
        id: &Id,
        loads: &[EagerLoad],
    ) -> impl Future<Output = Result<Option<E>, DataError>> + Send;

    /// Writes the root row and returns the entity re-hydrated from the
    /// inserted row (generated id, column defaults). Associations are not
    /// cascaded.
    fn insert(&self, entity: &E) -> impl Future<Output = Result<E, DataError>> + Send;

    /// Batch insert with [`insert`](Repository::insert) semantics; succeeds
    /// or fails as a single unit.
    fn insert_many(&self, entities: &[E]) -> impl Future<Output = Result<Vec<E>, DataError>> + Send;

    /// Updates the root row identified by its primary key; association rows
    /// are not touched.
    fn update(&self, entity: &E) -> impl Future<Output = Result<E, DataError>> + Send;

    /// Deletes the root row only.
    fn delete(&self, entity: &E) -> impl Future<Output = Result<(), DataError>> + Send;

    /// Count-based existence check; never materializes matching rows.
    fn exists(&self, id: &Id) -> impl Future<Output = Result<bool, DataError>> + Send;

    fn exists_by(&self, condition: &Condition) -> impl Future<Output = Result<bool, DataError>> + Send;
}
