//! Identity provider trait for email/password accounts

use async_trait::async_trait;

use crate::error::AuthError;
use crate::types::UserId;

/// Trait for account backends
///
/// Implementations:
/// - `FirebaseAuth`: Firebase Identity Toolkit REST API
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify credentials and return the account's user id
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserId, AuthError>;

    /// Create an account and return its user id
    async fn sign_up(&self, email: &str, password: &str) -> Result<UserId, AuthError>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
