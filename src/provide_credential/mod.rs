//! Credential providers: load a [`Credential`] from the environment, from an
//! `.edgerc` file, or from static values.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::{Context, Credential, Result};

mod default;
mod edgerc;
mod env;
mod r#static;

pub use default::DefaultCredentialProvider;
pub use edgerc::EdgercCredentialProvider;
pub use env::EnvCredentialProvider;
pub use r#static::StaticCredentialProvider;

/// Loads credentials from somewhere.
///
/// A provider that looked but found nothing returns `Ok(None)` so the caller
/// can try the next source; a provider that found a broken source (unreadable
/// file, invalid section) returns an error.
#[async_trait]
pub trait ProvideCredential: Debug + Send + Sync + 'static {
    /// Provide a credential, if this source has one.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Credential>>;
}
