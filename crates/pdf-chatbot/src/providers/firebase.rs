//! Firebase Identity Toolkit client
//!
//! Uses the public REST endpoints `accounts:signInWithPassword` and
//! `accounts:signUp`, authenticated by the project's web API key.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::IdentityConfig;
use crate::error::AuthError;
use crate::types::UserId;

use super::identity::IdentityProvider;

/// Firebase email/password authentication
pub struct FirebaseAuth {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl FirebaseAuth {
    /// Create a new client from configuration
    pub fn new(config: &IdentityConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/v1/accounts:{}", self.base_url, action)
    }

    async fn call(&self, action: &str, email: &str, password: &str) -> Result<UserId, AuthError> {
        let request = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };

        let response = self
            .client
            .post(self.endpoint(action))
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if !status.is_success() {
            // Firebase reports failures as {"error": {"message": "EMAIL_NOT_FOUND", ...}}
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or(body);
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let account: AccountResponse = serde_json::from_str(&body)
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        Ok(UserId::new(account.local_id))
    }
}

#[async_trait]
impl IdentityProvider for FirebaseAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserId, AuthError> {
        self.call("signInWithPassword", email, password).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<UserId, AuthError> {
        self.call("signUp", email, password).await
    }

    fn name(&self) -> &str {
        "firebase"
    }
}
