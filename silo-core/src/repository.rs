use crate::{
    AsValue, CmpOp, Cond, DeleteSpec, Engine, Entity, Error, InsertSpec, Page, Pool, QuerySpec,
    Record, Result, RowLabeled, RowsAffected, Statement, UpdateSpec,
    mapping::{first_entity, map_entities},
};
use std::marker::PhantomData;

/// Data-access facade for one entity type over an [`Engine`].
///
/// Every operation validates synchronously, renders fully, then executes
/// asynchronously; engine failures propagate unmasked.
pub struct Repository<'e, E: Entity, P: Pool> {
    engine: &'e Engine<P>,
    marker: PhantomData<fn() -> E>,
}

impl<'e, E: Entity, P: Pool> Repository<'e, E, P> {
    pub fn new(engine: &'e Engine<P>) -> Self {
        Self {
            engine,
            marker: PhantomData,
        }
    }

    fn primary_key_cond(id: impl AsValue) -> Result<Cond> {
        let pk = E::descriptor().primary_key_def();
        let value = id.as_value();
        if value.is_null() {
            return Err(Error::NullBound { column: pk.name() });
        }
        Ok(Cond::Cmp {
            column: pk.column_ref,
            op: CmpOp::Eq,
            value,
        })
    }

    pub async fn create_table(&self, if_not_exists: bool) -> Result<()> {
        self.engine
            .execute(Statement::CreateTable {
                descriptor: E::descriptor(),
                if_not_exists,
            })
            .await
            .map(|_| ())
    }

    pub async fn drop_table(&self, if_exists: bool) -> Result<()> {
        self.engine
            .execute(Statement::DropTable {
                descriptor: E::descriptor(),
                if_exists,
            })
            .await
            .map(|_| ())
    }

    pub async fn insert(&self, entity: &E) -> Result<RowsAffected> {
        self.engine
            .execute(Statement::Insert(InsertSpec {
                descriptor: E::descriptor(),
                rows: vec![entity.to_record()],
            }))
            .await
    }

    pub async fn insert_many<'a>(
        &self,
        entities: impl IntoIterator<Item = &'a E>,
    ) -> Result<RowsAffected>
    where
        E: 'a,
    {
        let rows: Vec<Record> = entities.into_iter().map(Entity::to_record).collect();
        if rows.is_empty() {
            return Ok(RowsAffected::default());
        }
        self.engine
            .execute(Statement::Insert(InsertSpec {
                descriptor: E::descriptor(),
                rows,
            }))
            .await
    }

    /// Update every non-null field of `entity`, addressed by its primary key.
    pub async fn update(&self, entity: &E) -> Result<RowsAffected> {
        let descriptor = E::descriptor();
        let pk = descriptor.primary_key_def();
        let cond = Self::primary_key_cond(entity.primary_key_value())?;
        let assignments: Record = entity
            .to_record()
            .into_iter()
            .filter(|(name, _)| *name != pk.name())
            .collect();
        self.engine
            .execute(Statement::Update(UpdateSpec {
                descriptor,
                assignments,
                cond,
            }))
            .await
    }

    pub async fn delete(&self, id: impl AsValue) -> Result<RowsAffected> {
        let cond = Self::primary_key_cond(id)?;
        self.engine
            .execute(Statement::Delete(DeleteSpec {
                descriptor: E::descriptor(),
                cond,
            }))
            .await
    }

    pub async fn find_by_id(&self, id: impl AsValue) -> Result<Option<E>> {
        let mut spec = QuerySpec::match_all(E::descriptor());
        spec.cond = Self::primary_key_cond(id)?;
        spec.limit = Some(1);
        let rows = self.engine.fetch(Statement::Select(spec)).await?;
        first_entity(&rows)
    }

    pub async fn find_all(&self) -> Result<Vec<E>> {
        self.find_by(QuerySpec::match_all(E::descriptor())).await
    }

    pub async fn find_by(&self, spec: QuerySpec) -> Result<Vec<E>> {
        let rows = self.engine.fetch(Statement::Select(spec)).await?;
        map_entities(&rows)
    }

    /// First row matching the spec, if any.
    pub async fn find_first(&self, mut spec: QuerySpec) -> Result<Option<E>> {
        spec.limit = Some(1);
        let rows = self.engine.fetch(Statement::Select(spec)).await?;
        first_entity(&rows)
    }

    pub async fn count(&self) -> Result<u64> {
        self.count_by(QuerySpec::match_all(E::descriptor())).await
    }

    /// Count over the spec's WHERE clause; ordering, projection and bounds do
    /// not apply to an aggregate.
    pub async fn count_by(&self, spec: QuerySpec) -> Result<u64> {
        let rows = self.engine.fetch(Statement::Count(spec)).await?;
        Self::scalar(rows)
    }

    pub async fn exists(&self, id: impl AsValue) -> Result<bool> {
        let mut spec = QuerySpec::match_all(E::descriptor());
        spec.cond = Self::primary_key_cond(id)?;
        self.exists_by(spec).await
    }

    pub async fn exists_by(&self, spec: QuerySpec) -> Result<bool> {
        let rows = self.engine.fetch(Statement::Exists(spec)).await?;
        Self::scalar(rows)
    }

    /// One page of the spec's result set.
    ///
    /// Runs the count first, then the bounded select over the same WHERE
    /// clause; a page past the end comes back empty with the correct total.
    pub async fn page(&self, spec: QuerySpec, number: u64, size: u64) -> Result<Page<E>> {
        if number == 0 || size == 0 {
            return Err(Error::InvalidPage { number, size });
        }
        let total = self.count_by(spec.clone()).await?;
        let mut bounded = spec;
        bounded.limit = Some(size);
        bounded.offset = Some((number - 1) * size);
        let items = self.find_by(bounded).await?;
        Ok(Page::new(items, total, number, size))
    }

    fn scalar<T: AsValue>(rows: Vec<RowLabeled>) -> Result<T> {
        let row = rows.into_iter().next().ok_or(Error::NotFound)?;
        let value = row.values().first().cloned().ok_or(Error::NotFound)?;
        T::try_from_value(value)
    }
}
