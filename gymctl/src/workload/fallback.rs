use async_trait::async_trait;
use tracing::warn;

use super::{TrainingRequest, WorkloadClient, WorkloadError};

/// Degraded client used when the workload service is disabled or unreachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackWorkloadClient;

#[async_trait]
impl WorkloadClient for FallbackWorkloadClient {
    async fn action_training(
        &self,
        request: &TrainingRequest,
        transaction_id: &str,
        _authorization: Option<&str>,
    ) -> Result<(), WorkloadError> {
        warn!(
            %transaction_id,
            trainer = %request.trainer_username,
            action = ?request.action_type,
            "Workload service is not available, event not delivered"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workload::ActionType;
    use chrono::NaiveDate;

    #[test_log::test(tokio::test)]
    async fn test_fallback_always_succeeds() {
        let request = TrainingRequest {
            trainer_username: "tom.hardy".to_string(),
            trainer_first_name: "Tom".to_string(),
            trainer_last_name: "Hardy".to_string(),
            is_active: false,
            training_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            training_duration: 30,
            action_type: ActionType::Add,
        };
        assert!(FallbackWorkloadClient.action_training(&request, "tx", None).await.is_ok());
    }
}
