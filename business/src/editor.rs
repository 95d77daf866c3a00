//! Edit session for one fetched entity.
//!
//! The editor owns the entity while it is being changed. Row tables are handed
//! out seeded from the entity's current lists and report every update back
//! through a [`TableReader`]; [`EntityEditor::apply`] writes the newest list
//! into the entity. Saving posts the whole entity under the id it had when it
//! was loaded, so a rename is a plain update.

use console_states::{Position, RowTable, TableError, TableReader, table_channel};

use crate::api::{self, ApiClient, ApiError, MutationOutcome};
use crate::entity::{Entity, EntityId, HasTable, TableRow};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("{0} not found")]
    NotFound(EntityId),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Table(#[from] TableError),
}

#[derive(Debug, Clone)]
pub struct EntityEditor<E: Entity> {
    entity: E,
    original_id: EntityId,
    dirty: bool,
}

impl<E: Entity> EntityEditor<E> {
    pub fn new(entity: E) -> Self {
        let original_id = entity.id();
        Self {
            entity,
            original_id,
            dirty: false,
        }
    }

    /// Fetches `id` and starts a session on it.
    pub async fn load(client: &ApiClient, id: &EntityId) -> Result<Self, EditorError> {
        api::get_entity::<E>(client, id)
            .await?
            .map(Self::new)
            .ok_or(EditorError::NotFound(*id))
    }

    pub fn entity(&self) -> &E {
        &self.entity
    }

    /// The id the server currently knows this entity by.
    pub fn original_id(&self) -> EntityId {
        self.original_id
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn rows<R>(&self) -> &[R]
    where
        R: TableRow,
        E: HasTable<R>,
    {
        self.entity.table_rows()
    }

    /// A detached table over the current rows of `R`'s list.
    ///
    /// Updates arrive on the returned reader; pass them to [`apply`](Self::apply).
    pub fn table<R>(&self) -> (RowTable<'static, R>, TableReader<R>)
    where
        R: TableRow + Send + 'static,
        E: HasTable<R>,
    {
        let (updater, reader) = table_channel();
        let table = RowTable::from_optional(self.entity.table(), updater);
        (table, reader)
    }

    /// Replaces `R`'s list in the entity.
    pub fn apply<R>(&mut self, rows: Vec<R>)
    where
        R: TableRow,
        E: HasTable<R>,
    {
        log::debug!("{} now has {} row(s)", R::TABLE, rows.len());
        self.entity.set_table(rows);
        self.dirty = true;
    }

    /// Runs `edit` against `R`'s table and writes the result back.
    ///
    /// Operations that succeeded before an error are kept.
    pub fn edit_table<R, T>(
        &mut self,
        edit: impl FnOnce(&mut RowTable<'_, R>) -> Result<T, TableError>,
    ) -> Result<T, TableError>
    where
        R: TableRow + Send + 'static,
        E: HasTable<R>,
    {
        let (mut table, reader) = self.table::<R>();
        let result = edit(&mut table);
        drop(table);
        if let Some(rows) = reader.latest() {
            self.apply(rows);
        }
        result
    }

    /// Adds a fresh row built by [`TableRow::new_row`] and returns its index.
    pub fn insert_new_row<R>(&mut self, position: Position) -> usize
    where
        R: TableRow + Send + 'static,
        E: HasTable<R>,
    {
        let row = R::new_row(self.rows::<R>());
        self.insert_row(row, position)
    }

    /// Adds a user-defined row built by [`TableRow::custom_row`]; `None` when
    /// the table has no such rows.
    pub fn insert_custom_row<R>(&mut self, position: Position) -> Option<usize>
    where
        R: TableRow + Send + 'static,
        E: HasTable<R>,
    {
        let row = R::custom_row(self.rows::<R>())?;
        Some(self.insert_row(row, position))
    }

    fn insert_row<R>(&mut self, row: R, position: Position) -> usize
    where
        R: TableRow + Send + 'static,
        E: HasTable<R>,
    {
        let inserted = self.edit_table(|table: &mut RowTable<'_, R>| {
            Ok::<_, TableError>(table.add_row(row, position).len())
        });
        match (position, inserted) {
            (Position::Top, _) => 0,
            (Position::Bottom, Ok(len)) => len - 1,
            (Position::Bottom, Err(_)) => self.rows::<R>().len().saturating_sub(1),
        }
    }

    /// Edits scalar fields of the entity itself.
    pub fn update(&mut self, edit: impl FnOnce(&mut E)) {
        edit(&mut self.entity);
        self.dirty = true;
    }

    /// Posts the entity under its original id.
    ///
    /// On success the editor adopts the saved entity and its (possibly new)
    /// id. On failure the name is rolled back to the original one and the
    /// rest of the edit is kept.
    pub async fn save(&mut self, client: &ApiClient) -> Result<MutationOutcome, EditorError> {
        let mut outgoing = self.entity.clone();
        outgoing.prepare_for_save();

        match api::update_entity(client, &self.original_id, &outgoing).await {
            Ok(outcome) => {
                self.entity = outgoing;
                self.original_id = self.entity.id();
                self.dirty = false;
                Ok(outcome)
            }
            Err(err) => {
                log::warn!("Failed to save {} {}: {err}", E::KIND, self.original_id);
                self.entity.set_name(self.original_id.name.to_string());
                Err(err.into())
            }
        }
    }

    /// Deletes the entity as the server knows it.
    pub async fn delete(self, client: &ApiClient) -> Result<MutationOutcome, EditorError> {
        let mut target = self.entity;
        target.set_name(self.original_id.name.to_string());
        Ok(api::delete_entity(client, &target).await?)
    }
}
