//! In-memory storage for all entities.
//!
//! All tables live in a single [`Tables`] value owned by [`Database`] behind one mutex. Every
//! read or write goes through a [`Transaction`]: [`Database::begin`] locks the tables and starts
//! an undo journal on each table, [`Transaction::commit`] discards the journal, and dropping an
//! uncommitted transaction replays it backwards. Holding the lock for the whole transaction is
//! what makes username generation and the two-step User + profile insert atomic.
//!
//! Data is lost on restart.

use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::db::errors::{DbError, Result};
use crate::db::models::{
    trainees::Trainee, trainers::Trainer, training_types::TrainingTypeDBResponse, trainings::Training, users::UserDBResponse,
};

/// A row that can be stored in a [`Table`].
pub trait Record: Clone {
    /// The request type used to create a new row
    type CreateRequest;

    /// The row's identifier
    fn id(&self) -> i64;

    /// Build a row from a create request and a freshly assigned id
    fn from_create(id: i64, request: Self::CreateRequest) -> Self;
}

/// How to undo one write: the row previously stored under `id` (if any) and the id counter
/// before the write.
#[derive(Debug, Clone)]
struct Undo<T> {
    id: i64,
    previous: Option<T>,
    next_id: i64,
}

/// A single table keyed by auto-incrementing id.
///
/// Ids are never reused, so iteration order by id is insertion order. The table enforces no
/// uniqueness or referential integrity; repositories do that.
#[derive(Debug, Clone)]
pub struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
    journal: Option<Vec<Undo<T>>>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
            journal: None,
        }
    }
}

impl<T: Record> Table<T> {
    fn record(&mut self, id: i64, previous: Option<T>) {
        if let Some(journal) = &mut self.journal {
            journal.push(Undo {
                id,
                previous,
                next_id: self.next_id,
            });
        }
    }

    /// Assign the next id to a new row, store it and return the stored copy.
    pub fn insert(&mut self, request: T::CreateRequest) -> T {
        let id = self.next_id;
        self.record(id, None);
        self.next_id += 1;
        let row = T::from_create(id, request);
        self.rows.insert(id, row.clone());
        row
    }

    /// Store a row under its own id, replacing any existing row.
    pub fn save(&mut self, row: T) -> T {
        let id = row.id();
        let previous = self.rows.get(&id).cloned();
        self.record(id, previous);
        if id >= self.next_id {
            self.next_id = id + 1;
        }
        self.rows.insert(id, row.clone());
        row
    }

    pub fn find_by_id(&self, id: i64) -> Option<&T> {
        self.rows.get(&id)
    }

    /// All rows in insertion order.
    pub fn find_all(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    /// Overwrite an existing row by id.
    pub fn update(&mut self, row: T) -> Result<T> {
        let previous = self.rows.get(&row.id()).cloned().ok_or(DbError::NotFound)?;
        self.record(row.id(), Some(previous));
        self.rows.insert(row.id(), row.clone());
        Ok(row)
    }

    pub fn delete_by_id(&mut self, id: i64) -> Option<T> {
        let removed = self.rows.remove(&id)?;
        self.record(id, Some(removed.clone()));
        Some(removed)
    }

    /// Remove every row matching the predicate, returning the removed rows in id order.
    pub fn delete_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> Vec<T> {
        let ids: Vec<i64> = self.rows.iter().filter(|(_, row)| predicate(row)).map(|(id, _)| *id).collect();
        ids.into_iter().filter_map(|id| self.delete_by_id(id)).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn start_journal(&mut self) {
        self.journal = Some(Vec::new());
    }

    fn discard_journal(&mut self) {
        self.journal = None;
    }

    /// Undo every journaled write, newest first.
    fn roll_back(&mut self) {
        for undo in self.journal.take().into_iter().flatten().rev() {
            match undo.previous {
                Some(row) => self.rows.insert(undo.id, row),
                None => self.rows.remove(&undo.id),
            };
            self.next_id = undo.next_id;
        }
    }
}

/// Every table in the system.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub users: Table<UserDBResponse>,
    pub trainees: Table<Trainee>,
    pub trainers: Table<Trainer>,
    pub training_types: Table<TrainingTypeDBResponse>,
    pub trainings: Table<Training>,
}

impl Tables {
    fn start_journal(&mut self) {
        self.users.start_journal();
        self.trainees.start_journal();
        self.trainers.start_journal();
        self.training_types.start_journal();
        self.trainings.start_journal();
    }

    fn discard_journal(&mut self) {
        self.users.discard_journal();
        self.trainees.discard_journal();
        self.trainers.discard_journal();
        self.training_types.discard_journal();
        self.trainings.discard_journal();
    }

    fn roll_back(&mut self) {
        self.users.roll_back();
        self.trainees.roll_back();
        self.trainers.roll_back();
        self.training_types.roll_back();
        self.trainings.roll_back();
    }
}

/// Shared handle to the in-memory database. Cloning is cheap.
#[derive(Clone, Default)]
pub struct Database {
    tables: Arc<Mutex<Tables>>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the tables and start a transaction.
    ///
    /// The lock is held until the transaction is committed or dropped, so keep transactions
    /// short, never hash or verify passwords inside one, and never hold one across an `.await`.
    pub fn begin(&self) -> Transaction<'_> {
        let mut tables = self.tables.lock();
        tables.start_journal();
        Transaction {
            tables,
            roll_back_on_drop: true,
        }
    }

    /// Lock the tables without journaling.
    ///
    /// Nothing is rolled back when the returned transaction is dropped, so use it only for
    /// lookups.
    pub fn read(&self) -> Transaction<'_> {
        Transaction {
            tables: self.tables.lock(),
            roll_back_on_drop: false,
        }
    }
}

/// Exclusive access to the tables with rollback on drop.
pub struct Transaction<'a> {
    tables: MutexGuard<'a, Tables>,
    roll_back_on_drop: bool,
}

impl Transaction<'_> {
    /// Keep every change made through this transaction.
    pub fn commit(mut self) {
        self.tables.discard_journal();
        self.roll_back_on_drop = false;
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.roll_back_on_drop {
            self.tables.roll_back();
            tracing::trace!("Transaction rolled back");
        }
    }
}

impl Deref for Transaction<'_> {
    type Target = Tables;

    fn deref(&self) -> &Self::Target {
        &self.tables
    }
}

impl DerefMut for Transaction<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.tables
    }
}
