use crate::domain::ports::PushService;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::error;

pub struct HttpPushService {
    client: Client,
    api_url: String,
}

impl HttpPushService {
    pub fn new(api_url: String) -> Self {
        Self { client: Client::new(), api_url }
    }
}

#[derive(Serialize)]
struct PushPayload {
    to: String,
    body: String,
}

#[async_trait]
impl PushService for HttpPushService {
    async fn send(&self, device_token: &str, message: &str) -> Result<(), AppError> {
        let payload = PushPayload {
            to: device_token.to_string(),
            body: message.to_string(),
        };

        let response = self
            .client
            .post(&self.api_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!("Push relay unreachable: {}", e);
                AppError::Internal
            })?;

        if !response.status().is_success() {
            error!("Push relay rejected message: {}", response.status());
            return Err(AppError::Internal);
        }

        Ok(())
    }
}
