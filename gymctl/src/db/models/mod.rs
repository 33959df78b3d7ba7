//! Record models stored in the in-memory tables.
//!
//! Each module holds the create/update request types accepted by a repository and the
//! response types it returns. Rows that join other tables (trainees, trainers, trainings) are
//! stored as flat records holding ids, and repositories resolve them into `*DBResponse`
//! values that embed the referenced user and training type.
//!
//! # Model Categories
//!
//! - [`users`]: User identities shared by trainees and trainers
//! - [`trainees`]: Trainee profiles
//! - [`trainers`]: Trainer profiles
//! - [`training_types`]: Named training specializations
//! - [`trainings`]: Training sessions
//!
//! # Conversion to API Models
//!
//! Record models implement `From` conversions into API models:
//!
//! ```ignore
//! use gymctl::api::models::trainees::TraineeResponse;
//!
//! let api_response: TraineeResponse = trainee_db_response.into();
//! ```

pub mod trainees;
pub mod trainers;
pub mod training_types;
pub mod trainings;
pub mod users;
