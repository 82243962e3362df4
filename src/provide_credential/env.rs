use async_trait::async_trait;
use log::debug;

use crate::constants::{
    ENV_ACCESS_TOKEN, ENV_CLIENT_SECRET, ENV_CLIENT_TOKEN, ENV_HOST, ENV_PREFIX,
};
use crate::credential::normalize_host;
use crate::{Context, Credential, ProvideCredential, Result};

/// Loads credentials from `AKAMAI_*` environment variables.
///
/// For the `default` section the variables are `AKAMAI_HOST`,
/// `AKAMAI_CLIENT_TOKEN`, `AKAMAI_CLIENT_SECRET` and `AKAMAI_ACCESS_TOKEN`.
/// For any other section the uppercased section name sits between the prefix
/// and the key, e.g. `AKAMAI_TESTING_HOST`.
///
/// All four variables must be present and non-empty; otherwise this provider
/// yields nothing and the caller may fall back to an `.edgerc` file.
#[derive(Debug, Clone)]
pub struct EnvCredentialProvider {
    section: String,
}

impl EnvCredentialProvider {
    /// Create a provider reading variables for the given section.
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
        }
    }

    fn env_key(&self, key: &str) -> String {
        if self.section == "default" {
            format!("{ENV_PREFIX}{key}")
        } else {
            format!("{ENV_PREFIX}{}_{key}", self.section.to_uppercase())
        }
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Credential>> {
        let read = |key: &str| {
            let var = self.env_key(key);
            let value = ctx.env_var(&var).filter(|v| !v.is_empty());
            if value.is_none() {
                debug!("credential env var {var} not set, skipping environment source");
            }
            value
        };

        let (Some(host), Some(client_token), Some(client_secret), Some(access_token)) = (
            read(ENV_HOST),
            read(ENV_CLIENT_TOKEN),
            read(ENV_CLIENT_SECRET),
            read(ENV_ACCESS_TOKEN),
        ) else {
            return Ok(None);
        };

        Ok(Some(Credential {
            client_token,
            client_secret,
            access_token,
            host: normalize_host(&host),
            ..Default::default()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticEnv;
    use std::collections::HashMap;

    fn full_env(prefix: &str) -> HashMap<String, String> {
        HashMap::from([
            (format!("{prefix}HOST"), "env.luna.akamaiapis.net".to_string()),
            (format!("{prefix}CLIENT_TOKEN"), "env-client-token".to_string()),
            (format!("{prefix}CLIENT_SECRET"), "env-client-secret".to_string()),
            (format!("{prefix}ACCESS_TOKEN"), "env-access-token".to_string()),
        ])
    }

    #[tokio::test]
    async fn test_default_section() {
        let ctx = Context::new().with_env(StaticEnv {
            home_dir: None,
            envs: full_env("AKAMAI_"),
        });

        let cred = EnvCredentialProvider::new("default")
            .provide_credential(&ctx)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(cred.client_token, "env-client-token");
        assert_eq!(cred.host, "https://env.luna.akamaiapis.net");
        assert_eq!(cred.max_body, crate::DEFAULT_MAX_BODY);
    }

    #[tokio::test]
    async fn test_named_section() {
        let ctx = Context::new().with_env(StaticEnv {
            home_dir: None,
            envs: full_env("AKAMAI_TESTING_"),
        });

        let cred = EnvCredentialProvider::new("testing")
            .provide_credential(&ctx)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cred.access_token, "env-access-token");

        // The default section does not see the prefixed variables.
        let cred = EnvCredentialProvider::new("default")
            .provide_credential(&ctx)
            .await
            .unwrap();
        assert!(cred.is_none());
    }

    #[tokio::test]
    async fn test_incomplete_env_yields_nothing() {
        let mut envs = full_env("AKAMAI_");
        envs.remove("AKAMAI_CLIENT_SECRET");
        let ctx = Context::new().with_env(StaticEnv {
            home_dir: None,
            envs,
        });

        let cred = EnvCredentialProvider::new("default")
            .provide_credential(&ctx)
            .await
            .unwrap();
        assert!(cred.is_none());
    }

    #[tokio::test]
    async fn test_empty_value_counts_as_missing() {
        let mut envs = full_env("AKAMAI_");
        envs.insert("AKAMAI_HOST".to_string(), String::new());
        let ctx = Context::new().with_env(StaticEnv {
            home_dir: None,
            envs,
        });

        let cred = EnvCredentialProvider::new("default")
            .provide_credential(&ctx)
            .await
            .unwrap();
        assert!(cred.is_none());
    }
}
