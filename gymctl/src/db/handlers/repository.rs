//! Base repository trait for store operations.

/// Contains the Repository trait.
///
/// A repository is basically a data access layer for one in-memory table. It provides methods
/// for creating, reading, updating, and deleting entities, as well as listing them with simple
/// filters.
use crate::db::errors::Result;

/// Base repository trait providing common store operations
///
/// This trait has separate associated types for create requests, update requests, and responses.
pub trait Repository {
    /// The request type for creating entities
    type CreateRequest;

    /// The request type for updating entities
    type UpdateRequest;

    /// The response/DTO type returned by operations
    type Response;

    /// The identifier type for lookups
    type Id;

    /// The filter type for list operations
    type Filter;

    /// Create a new entity
    fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response>;

    /// Get an entity by ID
    fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>>;

    /// List entities with filtering and pagination
    fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>>;

    /// Delete an entity by ID
    fn delete(&mut self, id: Self::Id) -> Result<bool>;

    /// Update an entity by ID
    fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response>;
}

/// Pagination shared by the simple list operations
#[derive(Debug, Clone, Copy)]
pub struct ListFilter {
    pub skip: usize,
    pub limit: usize,
}

impl ListFilter {
    pub fn new(skip: usize, limit: usize) -> Self {
        Self { skip, limit }
    }
}

impl Default for ListFilter {
    fn default() -> Self {
        Self { skip: 0, limit: usize::MAX }
    }
}
