//! Generic repository over a [`Model`]/entity pair.
//!
//! One [`SqlxRepository`] instance serves one persisted type for the
//! lifetime of the enclosing use case. It owns no data: it composes the
//! condition algebra, the SQL builder, and the store's query handle into
//! the operation set every feature module needs, and maps rows back to
//! domain entities through the model contract.

use crate::sql::SqlBuilder;
use crate::store::{QueryHandle, SqlxStore};
use admix_data::condition::{and, equal, is_in, Condition};
use admix_data::eager::EagerLoad;
use admix_data::error::DataError;
use admix_data::model::Model;
use admix_data::options::QueryOptions;
use admix_data::page::{resolve_offset, PageList, DEFAULT_PER_PAGE};
use admix_data::repository::Repository;
use admix_data::value::Value;
use sqlx::any::AnyRow;
use sqlx::{FromRow, Row};
use std::marker::PhantomData;
use std::sync::Arc;

/// Marries the backend-agnostic [`Model`] contract to sqlx row decoding.
pub trait SqlxModel: Model + for<'r> FromRow<'r, AnyRow> {
    /// Receives the related rows matched to this record for one eager-loaded
    /// relation. The default drops them; models that declare relations
    /// decode and store what they need.
    fn attach_related(&mut self, _relation: &str, _rows: &[&AnyRow]) {}
}

/// A generic repository executing against a [`SqlxStore`].
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(SqlxStore::connect(&cfg).await?);
/// let repo = SqlxRepository::<CategoryRecord>::new(store.clone());
/// let page = repo.all_by(&equal("status", 10), &QueryOptions::new().paginate(1, 20)).await?;
/// ```
pub struct SqlxRepository<M: SqlxModel> {
    store: Arc<SqlxStore>,
    _marker: PhantomData<M>,
}

impl<M: SqlxModel> SqlxRepository<M> {
    pub fn new(store: Arc<SqlxStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// The store this repository executes against.
    pub fn store(&self) -> &Arc<SqlxStore> {
        &self.store
    }

    fn builder(&self) -> SqlBuilder {
        SqlBuilder::new(M::table_name(), self.store.dialect())
    }

    fn wrap(&self, err: sqlx::Error) -> DataError {
        tracing::error!(table = M::table_name(), error = %err, "query failed");
        DataError::datasource(err)
    }

    async fn list(
        &self,
        condition: Option<&Condition>,
        opts: &QueryOptions,
    ) -> Result<PageList<M::Entity>, DataError> {
        let mut handle = self.store.handle().await;

        // Counting happens only when paging was requested; an unpaged
        // listing costs a single round trip.
        let mut paging = None;
        if opts.is_paged() {
            let mut count = self.builder();
            if let Some(c) = condition {
                count = count.condition(c.clone());
            }
            let (sql, params) = count.build_count();
            let row = handle.fetch_one(&sql, &params).await.map_err(|e| self.wrap(e))?;
            let total: i64 = row.try_get(0).map_err(|e| self.wrap(e))?;
            let page = opts.page.filter(|p| *p >= 1).unwrap_or(1);
            let per_page = opts.per_page.filter(|p| *p >= 1).unwrap_or(DEFAULT_PER_PAGE);
            paging = Some((page, per_page, total));
        }

        let mut builder = self.builder();
        if let Some(c) = condition {
            builder = builder.condition(c.clone());
        }
        for (column, ascending) in &opts.order_by {
            builder = builder.order_by(column, *ascending);
        }
        if let Some((page, per_page, _)) = paging {
            builder = builder.limit(per_page).offset(resolve_offset(page, per_page));
        }
        let (sql, params) = builder.build_select("*");
        let rows = handle.fetch_all(&sql, &params).await.map_err(|e| self.wrap(e))?;
        let mut models = decode_rows::<M>(&rows)?;
        self.apply_eager_loads(&mut handle, &mut models, &opts.eager_loads)
            .await?;
        let list: Vec<M::Entity> = models.iter().map(M::to_entity).collect();
        Ok(match paging {
            Some((page, per_page, total)) => PageList::paged(list, page, per_page, total),
            None => PageList::unpaged(list),
        })
    }

    async fn first(
        &self,
        condition: &Condition,
        loads: &[EagerLoad],
    ) -> Result<Option<M::Entity>, DataError> {
        let mut handle = self.store.handle().await;
        let (sql, params) = self
            .builder()
            .condition(condition.clone())
            .limit(1)
            .build_select("*");
        match handle.fetch_one(&sql, &params).await {
            Ok(row) => {
                let model = M::from_row(&row).map_err(DataError::datasource)?;
                let mut models = vec![model];
                self.apply_eager_loads(&mut handle, &mut models, loads).await?;
                Ok(models.pop().map(|m| m.to_entity()))
            }
            Err(err) if self.store.is_not_found(&err) => Ok(None),
            Err(err) => Err(self.wrap(err)),
        }
    }

    async fn insert_one(&self, entity: &M::Entity) -> Result<M::Entity, DataError> {
        let model = M::from_entity(entity);
        let mut handle = self.store.handle().await;
        let (sql, params) = self.builder().build_insert(M::columns(), &[model.values()]);
        if self.store.dialect().supports_returning() {
            let row = handle.fetch_one(&sql, &params).await.map_err(|e| self.wrap(e))?;
            let inserted = M::from_row(&row).map_err(DataError::datasource)?;
            Ok(inserted.to_entity())
        } else {
            let result = handle.execute(&sql, &params).await.map_err(|e| self.wrap(e))?;
            let id = result.last_insert_id.ok_or_else(|| {
                DataError::Datasource("backend reported no generated id".into())
            })?;
            self.refetch(&mut handle, equal(M::id_column(), id)).await
        }
    }

    async fn insert_batch(&self, entities: &[M::Entity]) -> Result<Vec<M::Entity>, DataError> {
        if entities.is_empty() {
            return Ok(Vec::new());
        }
        if self.store.dialect().supports_returning() {
            let rows: Vec<Vec<Value>> = entities
                .iter()
                .map(|e| M::from_entity(e).values())
                .collect();
            let (sql, params) = self.builder().build_insert(M::columns(), &rows);
            let mut handle = self.store.handle().await;
            let fetched = handle.fetch_all(&sql, &params).await.map_err(|e| self.wrap(e))?;
            let models = decode_rows::<M>(&fetched)?;
            return Ok(models.iter().map(M::to_entity).collect());
        }
        // No single atomic batch with rehydration on this backend: run
        // per-row inserts inside one transaction so the call still succeeds
        // or fails as a unit.
        if self.store.is_transaction() {
            let mut out = Vec::with_capacity(entities.len());
            for entity in entities {
                out.push(self.insert_one(entity).await?);
            }
            return Ok(out);
        }
        self.store.begin().await?;
        let mut out = Vec::with_capacity(entities.len());
        for entity in entities {
            match self.insert_one(entity).await {
                Ok(inserted) => out.push(inserted),
                Err(err) => {
                    if let Err(rb) = self.store.rollback().await {
                        tracing::error!(error = %rb, "rollback failed");
                    }
                    return Err(err);
                }
            }
        }
        self.store.commit().await?;
        Ok(out)
    }

    async fn update_one(&self, entity: &M::Entity) -> Result<M::Entity, DataError> {
        let model = M::from_entity(entity);
        let mut handle = self.store.handle().await;
        let (sql, params) = self.builder().build_update(
            M::columns(),
            model.values(),
            M::id_column(),
            model.key().into(),
        );
        if self.store.dialect().supports_returning() {
            let rows = handle.fetch_all(&sql, &params).await.map_err(|e| self.wrap(e))?;
            match rows.first() {
                Some(row) => {
                    let updated = M::from_row(row).map_err(DataError::datasource)?;
                    Ok(updated.to_entity())
                }
                // no row carries the key; nothing to rehydrate
                None => Ok(model.to_entity()),
            }
        } else {
            handle.execute(&sql, &params).await.map_err(|e| self.wrap(e))?;
            self.refetch(&mut handle, equal(M::id_column(), model.key()))
                .await
        }
    }

    async fn delete_one(&self, entity: &M::Entity) -> Result<(), DataError> {
        let model = M::from_entity(entity);
        let mut handle = self.store.handle().await;
        let (sql, params) = self.builder().build_delete(M::id_column(), model.key().into());
        handle.execute(&sql, &params).await.map_err(|e| self.wrap(e))?;
        Ok(())
    }

    async fn count_by(&self, condition: &Condition) -> Result<i64, DataError> {
        let mut handle = self.store.handle().await;
        let (sql, params) = self.builder().condition(condition.clone()).build_count();
        let row = handle.fetch_one(&sql, &params).await.map_err(|e| self.wrap(e))?;
        row.try_get(0).map_err(|e| self.wrap(e))
    }

    async fn refetch(
        &self,
        handle: &mut QueryHandle<'_>,
        condition: Condition,
    ) -> Result<M::Entity, DataError> {
        let (sql, params) = self.builder().condition(condition).limit(1).build_select("*");
        let row = handle.fetch_one(&sql, &params).await.map_err(|e| self.wrap(e))?;
        let model = M::from_row(&row).map_err(DataError::datasource)?;
        Ok(model.to_entity())
    }

    /// Fetches each requested relation in one batched query and hands the
    /// matched rows to every parent record — related data arrives as part of
    /// the same logical read, never lazily per row.
    async fn apply_eager_loads(
        &self,
        handle: &mut QueryHandle<'_>,
        models: &mut [M],
        loads: &[EagerLoad],
    ) -> Result<(), DataError> {
        if loads.is_empty() || models.is_empty() {
            return Ok(());
        }
        for load in loads {
            let def = M::relations()
                .iter()
                .find(|r| r.name == load.relation)
                .ok_or_else(|| DataError::UnknownRelation(load.relation.clone()))?;
            let local_values: Vec<Value> = models
                .iter()
                .map(|m| local_value(m, def.local_key))
                .collect();
            let mut condition = is_in(def.remote_key, local_values.clone());
            if let Some(filter) = &load.filter {
                condition = and([condition, filter.clone()]);
            }
            let columns = projection(&load.columns, def.remote_key);
            let (sql, params) = SqlBuilder::new(def.table, self.store.dialect())
                .condition(condition)
                .build_select(&columns);
            let rows = handle.fetch_all(&sql, &params).await.map_err(|e| self.wrap(e))?;
            let keyed: Vec<(Value, AnyRow)> = rows
                .into_iter()
                .map(|row| Ok((column_value(&row, def.remote_key)?, row)))
                .collect::<Result<_, DataError>>()?;
            for (model, local) in models.iter_mut().zip(&local_values) {
                let matched: Vec<&AnyRow> = keyed
                    .iter()
                    .filter(|(key, _)| key == local)
                    .map(|(_, row)| row)
                    .collect();
                model.attach_related(&load.relation, &matched);
            }
        }
        Ok(())
    }
}

impl<M: SqlxModel> Clone for SqlxRepository<M> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _marker: PhantomData,
        }
    }
}

impl<M: SqlxModel> Repository<M::Entity, M::Key> for SqlxRepository<M> {
    async fn all(&self, opts: &QueryOptions) -> Result<PageList<M::Entity>, DataError> {
        self.list(None, opts).await
    }

    async fn all_by(
        &self,
        condition: &Condition,
        opts: &QueryOptions,
    ) -> Result<PageList<M::Entity>, DataError> {
        self.list(Some(condition), opts).await
    }

    async fn first_by(
        &self,
        condition: &Condition,
        loads: &[EagerLoad],
    ) -> Result<Option<M::Entity>, DataError> {
        self.first(condition, loads).await
    }

    async fn find_by_id(
        &self,
        id: &M::Key,
        loads: &[EagerLoad],
    ) -> Result<Option<M::Entity>, DataError> {
        self.first(&equal(M::id_column(), id.clone()), loads).await
    }

    async fn insert(&self, entity: &M::Entity) -> Result<M::Entity, DataError> {
        self.insert_one(entity).await
    }

    async fn insert_many(&self, entities: &[M::Entity]) -> Result<Vec<M::Entity>, DataError> {
        self.insert_batch(entities).await
    }

    async fn update(&self, entity: &M::Entity) -> Result<M::Entity, DataError> {
        self.update_one(entity).await
    }

    async fn delete(&self, entity: &M::Entity) -> Result<(), DataError> {
        self.delete_one(entity).await
    }

    async fn exists(&self, id: &M::Key) -> Result<bool, DataError> {
        Ok(self.count_by(&equal(M::id_column(), id.clone())).await? > 0)
    }

    async fn exists_by(&self, condition: &Condition) -> Result<bool, DataError> {
        Ok(self.count_by(condition).await? > 0)
    }
}

fn decode_rows<M: SqlxModel>(rows: &[AnyRow]) -> Result<Vec<M>, DataError> {
    rows.iter()
        .map(|row| M::from_row(row).map_err(DataError::datasource))
        .collect()
}

/// The parent-side join value for a relation: the key itself, or one of the
/// declared columns.
fn local_value<M: SqlxModel>(model: &M, column: &str) -> Value {
    if column == M::id_column() {
        return model.key().into();
    }
    M::columns()
        .iter()
        .position(|c| *c == column)
        .and_then(|i| model.values().into_iter().nth(i))
        .unwrap_or(Value::Null)
}

/// Reads a join-column value out of a related row without knowing its
/// schema; join keys are integers or strings in practice.
fn column_value(row: &AnyRow, column: &str) -> Result<Value, DataError> {
    if let Ok(v) = row.try_get::<i64, _>(column) {
        return Ok(Value::Int(v));
    }
    if let Ok(v) = row.try_get::<String, _>(column) {
        return Ok(Value::Text(v));
    }
    if let Ok(v) = row.try_get::<bool, _>(column) {
        return Ok(Value::Bool(v));
    }
    Err(DataError::Datasource(
        format!("cannot read join column {column}").into(),
    ))
}

/// The projection for a related query; the join column is always included
/// so rows can be matched back to their parents.
fn projection(columns: &[String], join_key: &str) -> String {
    if columns.iter().any(|c| c == "*" || c == join_key) {
        return columns.join(", ");
    }
    let mut all = columns.to_vec();
    all.push(join_key.to_string());
    all.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_appends_join_key() {
        assert_eq!(projection(&["*".into()], "admin_id"), "*");
        assert_eq!(
            projection(&["id".into(), "name".into()], "admin_id"),
            "id, name, admin_id"
        );
        assert_eq!(
            projection(&["id".into(), "admin_id".into()], "admin_id"),
            "id, admin_id"
        );
    }
}
