//! API request and response data models.
//!
//! These are the transfer objects that cross the HTTP boundary. They are built from the store's
//! `*DBResponse` types through `From` impls, so password hashes and internal ids of users never
//! leave the service. Field names are camelCase on the wire and dates use `dd-MM-yyyy`.
//!
//! # Modules
//!
//! - [`auth`]: Login, password change, registration credentials and activation
//! - [`pagination`]: `skip`/`limit` query parameters and the paged response wrapper
//! - [`trainees`]: Trainee profiles
//! - [`trainers`]: Trainer profiles
//! - [`training_types`]: Training types
//! - [`trainings`]: Training sessions and their list filters

pub mod auth;
pub mod pagination;
pub mod trainees;
pub mod trainers;
pub mod training_types;
pub mod trainings;
