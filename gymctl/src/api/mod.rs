//! API layer for HTTP request handling and data models.
//!
//! This module contains the REST API implementation, organized into:
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! - **Authentication** (`/authentication/*`): login and password changes
//! - **Trainees** (`/trainees/*`): registration, profiles, activation and trainee trainings
//! - **Trainers** (`/trainers/*`): registration, profiles, activation and trainer trainings
//! - **Training types** (`/training-types/*`): the training type catalogue
//! - **Trainings** (`/trainings/*`): adding and deleting trainings
//!
//! # OpenAPI Documentation
//!
//! All endpoints are documented with `utoipa` annotations. The generated document is served
//! at `/openapi.json`.

pub mod handlers;
pub mod models;
