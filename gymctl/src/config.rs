//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The configuration
//! file path defaults to `config.yaml` but can be specified via `-f` flag or `GYMCTL_CONFIG`
//! environment variable.
//!
//! ## Loading Priority
//!
//! Configuration sources are merged in the following order (later sources override earlier ones):
//!
//! 1. **Defaults** - Every field has a default, so an empty or missing file is valid
//! 2. **YAML config file** - Base configuration (default: `config.yaml`)
//! 3. **Environment variables** - Variables prefixed with `GYMCTL_` override YAML values
//!
//! For nested config values, use double underscores in environment variables. For example,
//! `GYMCTL_SEED__MODE=strict` sets the `seed.mode` field.
//!
//! ## Usage
//!
//! ```no_run
//! use clap::Parser;
//! use gymctl::config::{Args, Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let args = Args::parse();
//! let config = Config::load(&args)?;
//!
//! println!("Server will bind to {}", config.bind_address());
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration Structure
//!
//! - **Server**: `host`, `port` - HTTP server binding configuration
//! - **Logging**: `log_format` - `text` or `json`
//! - **Seeding**: `seed.enabled`, `seed.path`, `seed.mode` - Startup data file
//! - **Passwords**: `auth.password.*` - Password policy and Argon2 cost
//! - **Workload**: `workload.enabled`, `workload.url`, `workload.timeout`, `workload.token` -
//!   Outbound training workload service
//!
//! ## Environment Variable Examples
//!
//! ```bash
//! GYMCTL_PORT=8080
//! GYMCTL_LOG_FORMAT=json
//! GYMCTL_WORKLOAD__ENABLED=true
//! GYMCTL_WORKLOAD__URL=http://workload:8081
//! GYMCTL_AUTH__PASSWORD__GENERATED_LENGTH=16
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};
use url::Url;

use crate::auth::password::Argon2Params;
use crate::errors::Error;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "GYMCTL_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// All fields have defaults defined in the `Default` implementation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Log output format
    pub log_format: LogFormat,
    /// Startup data file
    pub seed: SeedConfig,
    /// Password policy and hashing cost
    pub auth: AuthConfig,
    /// External training workload service
    pub workload: WorkloadConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// How seeding failures affect startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedMode {
    /// Any failure aborts startup
    Strict,
    /// Failures are logged and startup continues with whatever was loaded
    #[default]
    Lenient,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedConfig {
    pub enabled: bool,
    /// JSON file with `trainees`, `trainers` and `trainingTypes` arrays
    pub path: PathBuf,
    pub mode: SeedMode,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from("data.json"),
            mode: SeedMode::Lenient,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    pub password: PasswordConfig,
}

/// Password policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PasswordConfig {
    /// Minimum length accepted when a user changes their password
    pub min_length: usize,
    /// Length of passwords generated at registration
    pub generated_length: usize,
    /// Argon2 memory cost in KiB (default: 19456 KiB = 19 MB, secure for production)
    pub argon2_memory_kib: u32,
    /// Argon2 iterations (default: 2, secure for production)
    pub argon2_iterations: u32,
    /// Argon2 parallelism (default: 1)
    pub argon2_parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            min_length: 4,
            generated_length: 10,
            // Secure defaults for production (Argon2id RFC recommendations)
            argon2_memory_kib: 19456, // 19 MB
            argon2_iterations: 2,
            argon2_parallelism: 1,
        }
    }
}

impl PasswordConfig {
    pub fn argon2_params(&self) -> Argon2Params {
        Argon2Params {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }
}

/// Outbound training workload service.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkloadConfig {
    /// When false, only the logging fallback is used
    pub enabled: bool,
    /// Base URL; events are POSTed to `{url}/trainings`
    pub url: Url,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Service token sent as `Authorization: Bearer <token>`. Takes precedence over a bearer
    /// token forwarded from the incoming request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl std::fmt::Debug for WorkloadConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkloadConfig")
            .field("enabled", &self.enabled)
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: Url::parse("http://localhost:8081").expect("valid default workload url"),
            timeout: Duration::from_secs(5),
            token: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            log_format: LogFormat::default(),
            seed: SeedConfig::default(),
            auth: AuthConfig::default(),
            workload: WorkloadConfig::default(),
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> Result<(), Error> {
        let password = &self.auth.password;

        if password.min_length < 1 {
            return Err(Error::Internal {
                operation: "Config validation: Invalid password configuration: min_length must be at least 1".to_string(),
            });
        }

        if password.generated_length < password.min_length {
            return Err(Error::Internal {
                operation: format!(
                    "Config validation: Invalid password configuration: generated_length ({}) cannot be less than min_length ({})",
                    password.generated_length, password.min_length
                ),
            });
        }

        if password.argon2_iterations < 1 || password.argon2_parallelism < 1 {
            return Err(Error::Internal {
                operation: "Config validation: argon2_iterations and argon2_parallelism must be at least 1".to_string(),
            });
        }

        if password.argon2_memory_kib < 8 * password.argon2_parallelism {
            return Err(Error::Internal {
                operation: format!(
                    "Config validation: argon2_memory_kib must be at least 8 * argon2_parallelism ({})",
                    8 * password.argon2_parallelism
                ),
            });
        }

        if self.workload.enabled && !matches!(self.workload.url.scheme(), "http" | "https") {
            return Err(Error::Internal {
                operation: format!(
                    "Config validation: workload.url must be an http(s) URL, got '{}'",
                    self.workload.url
                ),
            });
        }

        if self.workload.timeout.is_zero() {
            return Err(Error::Internal {
                operation: "Config validation: workload.timeout must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables override specific values; GYMCTL_CONFIG names the file itself
            .merge(Env::prefixed("GYMCTL_").ignore(&["config"]).split("__"))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
