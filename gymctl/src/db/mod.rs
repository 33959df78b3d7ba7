//! Data layer for persistence and access.
//!
//! Everything lives in memory and is lost on restart. The layer follows the Repository pattern
//! so services never touch tables directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Services   │  (domain workflows)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers - constraints & lookups)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │   Models    │  (db::models - stored records)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │    Store    │  (db::store - tables behind one mutex)
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`store`]: Tables, the shared [`store::Database`] handle and transactions
//! - [`handlers`]: Repository implementations for CRUD operations
//! - [`models`]: Record structures stored in the tables
//! - [`errors`]: Store-specific error types
//!
//! # Transactions
//!
//! Repositories borrow an open transaction. Changes become visible to other callers only
//! after `commit()`; dropping the transaction rolls them back:
//!
//! ```ignore
//! let mut tx = db.begin();
//! let user = Users::new(&mut tx).create(&request)?;
//! Trainees::new(&mut tx).create(&profile)?; // on error the user insert is undone too
//! tx.commit();
//! ```

pub mod errors;
pub mod handlers;
pub mod models;
pub mod store;
