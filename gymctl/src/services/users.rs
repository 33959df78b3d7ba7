//! User helpers shared by the trainee and trainer services.

use tracing::{debug, instrument};

use crate::auth::password;
use crate::config::PasswordConfig;
use crate::db::{
    handlers::{Repository, Users},
    models::users::{UserCreateDBRequest, UserDBResponse, UserUpdateDBRequest},
    store::{Database, Tables},
};
use crate::errors::{Error, Result};
use crate::services::{Attributes, FIRST_NAME, LAST_NAME, attribute};

/// Build a unique `firstname.lastname` username.
///
/// On collision the smallest non-negative integer suffix not yet taken is appended
/// (`john.doe`, `john.doe0`, `john.doe1`, ...). Must run in the same transaction as the insert.
pub fn generate_username(users: &Users<'_>, first_name: &str, last_name: &str) -> String {
    let base = format!("{}.{}", first_name.trim(), last_name.trim()).to_lowercase();
    if !users.username_exists(&base) {
        return base;
    }

    let mut suffix = 0u64;
    loop {
        let candidate = format!("{base}{suffix}");
        if !users.username_exists(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Generate a fresh password and its hash. Call this before opening a transaction.
pub fn new_password(policy: &PasswordConfig) -> Result<(String, String)> {
    let plaintext = password::generate_password(policy.generated_length);
    let hash = password::hash_string_with_params(&plaintext, Some(policy.argon2_params()))?;
    Ok((plaintext, hash))
}

/// Insert a user with a generated username and an already hashed password.
#[instrument(skip(tables, password_hash), err)]
pub fn create_user(tables: &mut Tables, first_name: &str, last_name: &str, password_hash: String) -> Result<UserDBResponse> {
    let mut users = Users::new(tables);
    let username = generate_username(&users, first_name, last_name);
    debug!(%username, "Generated username");

    let user = users.create(&UserCreateDBRequest {
        first_name: first_name.trim().to_string(),
        last_name: last_name.trim().to_string(),
        username,
        password_hash,
        is_active: true,
    })?;
    Ok(user)
}

/// Fail with `FailedAuthentication` unless the password matches the user's hash.
///
/// Verification is slow by construction, so call this on a row read earlier and never while a
/// transaction is open.
pub fn check_password(user: &UserDBResponse, password: &str) -> Result<()> {
    if password::verify_string(password, &user.password_hash)? {
        Ok(())
    } else {
        Err(Error::FailedAuthentication {
            username: user.username.clone(),
        })
    }
}

/// Look up any user by username and check the password.
///
/// The store is locked only for the lookup. Callers that go on to mutate must open a
/// transaction and call [`ensure_unchanged`] first.
#[instrument(skip(db, password), err)]
pub fn authenticate(db: &Database, username: &str, password: &str) -> Result<UserDBResponse> {
    let user = {
        let mut tx = db.read();
        Users::new(&mut tx).get_user_by_username(username)?
    }
    .ok_or_else(|| Error::NotFound {
        resource: "User".to_string(),
        id: username.to_string(),
    })?;
    check_password(&user, password)?;
    Ok(user)
}

/// Fail unless `verified` still exists with the password hash it was verified against.
///
/// Run this first inside the transaction that acts on a credential check made outside it.
pub fn ensure_unchanged(tables: &mut Tables, verified: &UserDBResponse) -> Result<()> {
    match Users::new(tables).get_by_id(verified.id)? {
        Some(current) if current.password_hash == verified.password_hash => Ok(()),
        Some(_) => Err(Error::FailedAuthentication {
            username: verified.username.clone(),
        }),
        None => Err(Error::NotFound {
            resource: "User".to_string(),
            id: verified.username.clone(),
        }),
    }
}

/// Enforce the password policy on a new password.
pub fn validate_new_password(policy: &PasswordConfig, new_password: &str) -> Result<()> {
    if new_password.chars().count() < policy.min_length {
        return Err(Error::InvalidPassword {
            message: format!("Password must be at least {} characters long", policy.min_length),
        });
    }
    Ok(())
}

/// Replace the password of a user verified by [`check_password`].
///
/// The new password is checked and hashed before the store is locked.
#[instrument(skip(db, verified, policy, new_password), fields(user_id = verified.id), err)]
pub fn change_password(db: &Database, verified: &UserDBResponse, policy: &PasswordConfig, new_password: &str) -> Result<()> {
    validate_new_password(policy, new_password)?;
    let password_hash = password::hash_string_with_params(new_password, Some(policy.argon2_params()))?;

    let mut tx = db.begin();
    ensure_unchanged(&mut tx, verified)?;
    Users::new(&mut tx).update(
        verified.id,
        &UserUpdateDBRequest {
            password_hash: Some(password_hash),
            ..Default::default()
        },
    )?;
    tx.commit();
    Ok(())
}

/// Name changes from an update map. The username is never regenerated.
pub fn name_update(attributes: &Attributes) -> UserUpdateDBRequest {
    UserUpdateDBRequest {
        first_name: attribute(attributes, FIRST_NAME).map(str::to_string),
        last_name: attribute(attributes, LAST_NAME).map(str::to_string),
        ..Default::default()
    }
}

/// Set a user's active flag.
pub fn set_active(tables: &mut Tables, user_id: i64, is_active: bool) -> Result<UserDBResponse> {
    Ok(Users::new(tables).update(
        user_id,
        &UserUpdateDBRequest {
            is_active: Some(is_active),
            ..Default::default()
        },
    )?)
}
