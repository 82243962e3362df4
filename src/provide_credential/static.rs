use async_trait::async_trait;

use crate::credential::normalize_host;
use crate::{Context, Credential, Error, ProvideCredential, Result};

/// Holds credentials passed in directly by the caller.
///
/// Useful when credentials come from a secret store rather than an `.edgerc`
/// file or the process environment.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credential: Credential,
}

impl StaticCredentialProvider {
    /// Create a provider from the four credential values.
    ///
    /// The host is normalized like one loaded from an `.edgerc` file. All
    /// four values must be non-empty.
    pub fn new(
        client_token: impl Into<String>,
        client_secret: impl Into<String>,
        access_token: impl Into<String>,
        host: &str,
    ) -> Result<Self> {
        let credential = Credential {
            client_token: client_token.into(),
            client_secret: client_secret.into(),
            access_token: access_token.into(),
            host: normalize_host(host),
            ..Default::default()
        };
        if !credential.is_valid() {
            return Err(Error::config_missing_fields(
                "static credentials require client_token, client_secret, access_token and host",
            ));
        }
        Ok(Self { credential })
    }

    /// Override the content hash body cap.
    pub fn with_max_body(mut self, max_body: usize) -> Self {
        self.credential.max_body = max_body;
        self
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    async fn provide_credential(&self, _: &Context) -> Result<Option<Credential>> {
        Ok(Some(self.credential.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[tokio::test]
    async fn test_static_provider() {
        let provider = StaticCredentialProvider::new(
            "ct",
            "cs",
            "at",
            "akaa-xxxx.luna.akamaiapis.net/",
        )
        .unwrap()
        .with_max_body(2048);

        let cred = provider
            .provide_credential(&Context::new())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cred.host, "https://akaa-xxxx.luna.akamaiapis.net");
        assert_eq!(cred.max_body, 2048);
    }

    #[test]
    fn test_rejects_empty_fields() {
        let err = StaticCredentialProvider::new("ct", "", "at", "example.net").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigMissingFields);
    }
}
