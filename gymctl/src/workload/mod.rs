//! Outbound notifications to the training workload service.
//!
//! Every added or deleted training is reported to an external service that tracks trainer
//! workload. The call is best effort: [`Workload`] tries the primary [`HttpWorkloadClient`] and,
//! on any failure, hands the event to the [`FallbackWorkloadClient`], which only logs. Callers
//! never see a workload error.
//!
//! ```ignore
//! let workload = Workload::from_config(&config.workload)?;
//! workload.action_training(&request, &transaction_id, authorization.as_deref()).await;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::WorkloadConfig;
use crate::types::dmy_date;

pub mod fallback;
pub mod http;

pub use fallback::FallbackWorkloadClient;
pub use http::HttpWorkloadClient;

/// Whether a training was added or deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionType {
    Add,
    Delete,
}

/// Body of a workload notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingRequest {
    pub trainer_username: String,
    pub trainer_first_name: String,
    pub trainer_last_name: String,
    pub is_active: bool,
    #[serde(with = "dmy_date")]
    pub training_date: NaiveDate,
    /// Minutes
    pub training_duration: i32,
    pub action_type: ActionType,
}

#[derive(Error, Debug)]
pub enum WorkloadError {
    #[error("workload request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("workload service returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// A destination for workload notifications.
#[async_trait]
pub trait WorkloadClient: Send + Sync {
    /// Report one training event.
    ///
    /// `transaction_id` is propagated as `X-Transaction-Id`. `authorization` is a bearer
    /// credential taken from the incoming request, if it carried one.
    async fn action_training(
        &self,
        request: &TrainingRequest,
        transaction_id: &str,
        authorization: Option<&str>,
    ) -> Result<(), WorkloadError>;
}

/// Primary client with a logging fallback.
#[derive(Clone)]
pub struct Workload {
    primary: Option<Arc<dyn WorkloadClient>>,
    fallback: Arc<dyn WorkloadClient>,
}

impl Workload {
    /// Use `primary` and fall back to logging when it fails.
    pub fn new(primary: Arc<dyn WorkloadClient>) -> Self {
        Self {
            primary: Some(primary),
            fallback: Arc::new(FallbackWorkloadClient),
        }
    }

    /// Only ever use the fallback.
    pub fn disabled() -> Self {
        Self {
            primary: None,
            fallback: Arc::new(FallbackWorkloadClient),
        }
    }

    pub fn from_config(config: &WorkloadConfig) -> Result<Self, WorkloadError> {
        if !config.enabled {
            return Ok(Self::disabled());
        }
        let client = HttpWorkloadClient::new(config.url.clone(), config.timeout, config.token.clone())?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Deliver an event. Failures are logged and swallowed.
    #[instrument(skip(self, request, authorization), fields(trainer = %request.trainer_username, action = ?request.action_type))]
    pub async fn action_training(&self, request: &TrainingRequest, transaction_id: &str, authorization: Option<&str>) {
        if let Some(primary) = &self.primary {
            match primary.action_training(request, transaction_id, authorization).await {
                Ok(()) => {
                    debug!("Workload service notified");
                    return;
                }
                Err(e) => warn!(error = %e, "Workload service call failed, using fallback"),
            }
        }

        if let Err(e) = self.fallback.action_training(request, transaction_id, authorization).await {
            warn!(error = %e, "Workload fallback failed");
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use parking_lot::Mutex;

    /// Record of a call made to the mock client.
    #[derive(Debug, Clone)]
    pub struct MockCall {
        pub request: TrainingRequest,
        pub transaction_id: String,
        pub authorization: Option<String>,
    }

    /// Records every call and optionally fails them.
    #[derive(Clone, Default)]
    pub struct MockWorkloadClient {
        calls: Arc<Mutex<Vec<MockCall>>>,
        fail: bool,
    }

    impl MockWorkloadClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn calls(&self) -> Vec<MockCall> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl WorkloadClient for MockWorkloadClient {
        async fn action_training(
            &self,
            request: &TrainingRequest,
            transaction_id: &str,
            authorization: Option<&str>,
        ) -> Result<(), WorkloadError> {
            self.calls.lock().push(MockCall {
                request: request.clone(),
                transaction_id: transaction_id.to_string(),
                authorization: authorization.map(str::to_string),
            });
            if self.fail {
                Err(WorkloadError::Status {
                    status: 503,
                    body: "unavailable".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockWorkloadClient;
    use super::*;

    fn sample_request(action_type: ActionType) -> TrainingRequest {
        TrainingRequest {
            trainer_username: "tom.hardy".to_string(),
            trainer_first_name: "Tom".to_string(),
            trainer_last_name: "Hardy".to_string(),
            is_active: true,
            training_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            training_duration: 60,
            action_type,
        }
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(sample_request(ActionType::Add)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "trainerUsername": "tom.hardy",
                "trainerFirstName": "Tom",
                "trainerLastName": "Hardy",
                "isActive": true,
                "trainingDate": "01-03-2024",
                "trainingDuration": 60,
                "actionType": "ADD"
            })
        );
    }

    #[tokio::test]
    async fn test_primary_receives_event() {
        let mock = MockWorkloadClient::new();
        let workload = Workload::new(Arc::new(mock.clone()));

        workload
            .action_training(&sample_request(ActionType::Delete), "tx-1", Some("Bearer abc"))
            .await;

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].transaction_id, "tx-1");
        assert_eq!(calls[0].authorization.as_deref(), Some("Bearer abc"));
        assert_eq!(calls[0].request.action_type, ActionType::Delete);
    }

    #[tokio::test]
    async fn test_failures_are_absorbed() {
        let mock = MockWorkloadClient::failing();
        let workload = Workload::new(Arc::new(mock.clone()));

        // Returns unit; nothing to propagate
        workload.action_training(&sample_request(ActionType::Add), "tx-2", None).await;
        assert_eq!(mock.calls().len(), 1);
    }

    #[test]
    fn test_disabled_config_uses_fallback_only() {
        let config = WorkloadConfig::default();
        assert!(!config.enabled);
        let workload = Workload::from_config(&config).unwrap();
        assert!(workload.primary.is_none());

        let enabled = WorkloadConfig {
            enabled: true,
            ..WorkloadConfig::default()
        };
        assert!(Workload::from_config(&enabled).unwrap().primary.is_some());
    }
}
