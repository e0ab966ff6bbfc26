use async_trait::async_trait;

use crate::error::AuthError;

/// Authenticates a credential tuple against a backing store.
///
/// The admin and the village sign-in flows are two implementations of this
/// trait. They differ in how the secret is checked (stored hash versus the
/// legacy login procedure) but share the contract: a validated identity, or an
/// [`AuthError`] whose internal reason is for logs only.
#[async_trait]
pub trait CredentialValidator: Send + Sync {
    type Credentials: Send + 'static;
    type Identity: Send + 'static;

    async fn authenticate(&self, credentials: Self::Credentials) -> Result<Self::Identity, AuthError>;
}
