//! Repository implementations for store access.
//!
//! This module provides a repository struct for each entity in the system. Repositories follow a
//! consistent pattern and implement the [`Repository`] trait.
//!
//! # Design Pattern
//!
//! Each repository:
//! - Borrows the tables of an open [`Transaction`](crate::db::store::Transaction)
//! - Provides strongly-typed CRUD operations
//! - Enforces uniqueness and references between tables
//! - Returns joined models from [`crate::db::models`]
//!
//! # Available Repositories
//!
//! - [`Users`]: User identities and username lookups
//! - [`Trainees`]: Trainee profiles
//! - [`Trainers`]: Trainer profiles
//! - [`TrainingTypes`]: Training type catalogue
//! - [`Trainings`]: Training sessions
//!
//! # Common Pattern
//!
//! ```ignore
//! use gymctl::db::handlers::{Repository, Users};
//!
//! let mut tx = db.begin();
//! let mut repo = Users::new(&mut tx);
//! let user = repo.get_user_by_username("john.doe")?;
//! tx.commit();
//! ```

pub mod repository;
pub mod trainees;
pub mod trainers;
pub mod training_types;
pub mod trainings;
pub mod users;

pub use repository::{ListFilter, Repository};
pub use trainees::Trainees;
pub use trainers::Trainers;
pub use training_types::TrainingTypes;
pub use trainings::{TrainingFilter, Trainings};
pub use users::Users;
