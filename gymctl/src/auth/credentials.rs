//! HTTP Basic credentials extractor.
//!
//! Mutating routes take `Authorization: Basic base64(username:password)`. The extractor only
//! decodes the header; checking the password is the job of the service that owns the profile.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose};
use tracing::instrument;

use crate::errors::{Error, Result};

/// Username and password decoded from an `Authorization: Basic` header.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl BasicCredentials {
    /// Decode the value of an `Authorization` header.
    pub fn parse(header_value: &str) -> Result<Self> {
        let encoded = header_value
            .strip_prefix("Basic ")
            .or_else(|| header_value.strip_prefix("basic "))
            .ok_or_else(|| unauthenticated("Expected Basic authorization"))?;

        let decoded = general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|_| unauthenticated("Malformed Basic credentials"))?;
        let decoded = String::from_utf8(decoded).map_err(|_| unauthenticated("Malformed Basic credentials"))?;

        let (username, password) = decoded
            .split_once(':')
            .ok_or_else(|| unauthenticated("Malformed Basic credentials"))?;

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Fail unless the credentials belong to the user named in the request path.
    pub fn ensure_username(&self, username: &str) -> Result<()> {
        if self.username == username {
            Ok(())
        } else {
            Err(Error::FailedAuthentication {
                username: self.username.clone(),
            })
        }
    }
}

fn unauthenticated(message: &str) -> Error {
    Error::Unauthenticated {
        message: Some(message.to_string()),
    }
}

impl<S> FromRequestParts<S> for BasicCredentials
where
    S: Send + Sync,
{
    type Rejection = Error;

    #[instrument(skip_all)]
    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        let value = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(Error::Unauthenticated { message: None })?
            .to_str()
            .map_err(|_| unauthenticated("Malformed Basic credentials"))?;

        Self::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(raw: &str) -> String {
        format!("Basic {}", general_purpose::STANDARD.encode(raw))
    }

    #[test]
    fn test_parse_valid_header() {
        let creds = BasicCredentials::parse(&encode("john.doe:s3cr3t:with:colons")).unwrap();
        assert_eq!(creds.username, "john.doe");
        assert_eq!(creds.password, "s3cr3t:with:colons");
    }

    #[test]
    fn test_parse_rejects_other_schemes_and_garbage() {
        assert!(matches!(
            BasicCredentials::parse("Bearer abc"),
            Err(Error::Unauthenticated { .. })
        ));
        assert!(matches!(
            BasicCredentials::parse("Basic !!!not-base64"),
            Err(Error::Unauthenticated { .. })
        ));
        assert!(matches!(
            BasicCredentials::parse(&encode("no-colon")),
            Err(Error::Unauthenticated { .. })
        ));
    }

    #[test]
    fn test_ensure_username() {
        let creds = BasicCredentials::parse(&encode("john.doe:pw")).unwrap();
        assert!(creds.ensure_username("john.doe").is_ok());
        assert!(matches!(
            creds.ensure_username("jane.doe"),
            Err(Error::FailedAuthentication { .. })
        ));
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = BasicCredentials::parse(&encode("john.doe:hunter2")).unwrap();
        assert!(!format!("{creds:?}").contains("hunter2"));
    }
}
