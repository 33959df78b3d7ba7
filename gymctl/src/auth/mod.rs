//! Authentication helpers.
//!
//! Every mutating operation is gated by a username + password check against the profile being
//! changed. This module holds the pieces that check is built from:
//!
//! - [`password`]: Argon2id hashing and verification, and random password generation
//! - [`credentials`]: The [`credentials::BasicCredentials`] extractor for `Authorization: Basic`
//!
//! Plaintext passwords are never stored. The generated password is returned once, in the
//! registration response.
//!
//! # Usage in Handlers
//!
//! ```ignore
//! use gymctl::auth::credentials::BasicCredentials;
//!
//! async fn handler(Path(username): Path<String>, creds: BasicCredentials) -> Result<(), Error> {
//!     creds.ensure_username(&username)?;
//!     // hand creds.password to the service, which verifies it against the stored hash
//!     Ok(())
//! }
//! ```

pub mod credentials;
pub mod password;
