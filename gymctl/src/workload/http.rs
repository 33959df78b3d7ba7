use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};
use url::Url;

use super::{TrainingRequest, WorkloadClient, WorkloadError};

/// Production workload client using reqwest.
///
/// Events are POSTed as JSON to `{base_url}/trainings`. A configured service `token` is sent as
/// the bearer credential; without one, the caller's forwarded bearer token is used.
#[derive(Clone)]
pub struct HttpWorkloadClient {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpWorkloadClient {
    pub fn new(base_url: Url, timeout: Duration, token: Option<String>) -> Result<Self, WorkloadError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let endpoint = format!("{}/trainings", base_url.as_str().trim_end_matches('/'));
        Ok(Self { client, endpoint, token })
    }

    fn authorization(&self, forwarded: Option<&str>) -> Option<String> {
        match &self.token {
            Some(token) => Some(format!("Bearer {token}")),
            None => forwarded.map(str::to_string),
        }
    }
}

#[async_trait]
impl WorkloadClient for HttpWorkloadClient {
    #[instrument(skip(self, request, authorization), fields(endpoint = %self.endpoint))]
    async fn action_training(
        &self,
        request: &TrainingRequest,
        transaction_id: &str,
        authorization: Option<&str>,
    ) -> Result<(), WorkloadError> {
        let mut req = self
            .client
            .post(&self.endpoint)
            .header("X-Transaction-Id", transaction_id)
            .json(request);

        if let Some(authorization) = self.authorization(authorization) {
            req = req.header("Authorization", authorization);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WorkloadError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), "Workload event delivered");
        Ok(())
    }
}
