use async_trait::async_trait;
use log::debug;

use crate::{
    Context, Credential, EdgercCredentialProvider, EnvCredentialProvider, Error,
    ProvideCredential, Result,
};

/// The standard credential resolution order.
///
/// Environment variables are consulted first; when the full `AKAMAI_*` set is
/// present the `.edgerc` file is never touched. Otherwise the configured file
/// is read. With no file configured and no complete environment, resolution
/// fails outright.
#[derive(Debug, Clone)]
pub struct DefaultCredentialProvider {
    section: String,
    edgerc_path: Option<String>,
}

impl DefaultCredentialProvider {
    /// Create a provider resolving the given section, environment only.
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            edgerc_path: None,
        }
    }

    /// Add an `.edgerc` file as the fallback source.
    pub fn with_edgerc_path(mut self, path: impl Into<String>) -> Self {
        self.edgerc_path = Some(path.into());
        self
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Credential>> {
        if let Some(cred) = EnvCredentialProvider::new(self.section.clone())
            .provide_credential(ctx)
            .await?
        {
            debug!("credential loaded from environment variables");
            return Ok(Some(cred));
        }

        let Some(path) = &self.edgerc_path else {
            return Err(Error::config_no_source(
                "either a path to an .edgerc file or AKAMAI_* environment variables \
                 must be provided",
            ));
        };

        EdgercCredentialProvider::new(path.clone(), self.section.clone())
            .provide_credential(ctx)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, StaticEnv, TokioFileRead};
    use std::collections::HashMap;
    use std::io::Write;

    #[tokio::test]
    async fn test_env_wins_over_file() {
        let envs = HashMap::from([
            ("AKAMAI_HOST".to_string(), "env.net".to_string()),
            ("AKAMAI_CLIENT_TOKEN".to_string(), "env-ct".to_string()),
            ("AKAMAI_CLIENT_SECRET".to_string(), "env-cs".to_string()),
            ("AKAMAI_ACCESS_TOKEN".to_string(), "env-at".to_string()),
        ]);
        let ctx = Context::new().with_env(StaticEnv {
            home_dir: None,
            envs,
        });

        // The file path is bogus on purpose: a complete environment means
        // it must never be read.
        let cred = DefaultCredentialProvider::new("default")
            .with_edgerc_path("/no/such/edgerc")
            .provide_credential(&ctx)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cred.host, "https://env.net");
    }

    #[tokio::test]
    async fn test_falls_back_to_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"[default]\nclient_secret = cs\nhost = file.net\n\
              access_token = at\nclient_token = ct\n",
        )
        .unwrap();

        let ctx = Context::new().with_file_read(TokioFileRead);
        let cred = DefaultCredentialProvider::new("default")
            .with_edgerc_path(file.path().to_string_lossy())
            .provide_credential(&ctx)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cred.host, "https://file.net");
    }

    #[tokio::test]
    async fn test_no_source() {
        let err = DefaultCredentialProvider::new("default")
            .provide_credential(&Context::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigNoSource);
    }
}
