use async_trait::async_trait;
use log::debug;

use crate::credential::normalize_host;
use crate::edgerc::parse_section;
use crate::{Context, Credential, Error, ProvideCredential, Result, DEFAULT_MAX_BODY};

/// Loads credentials from a section of an `.edgerc` file.
///
/// The path may start with `~/`, which is expanded against the context's
/// home directory. Unlike the environment provider, a configured file that
/// cannot be read or parsed is an error rather than a silent fallthrough:
/// the caller asked for this file specifically.
#[derive(Debug, Clone)]
pub struct EdgercCredentialProvider {
    path: String,
    section: String,
}

impl EdgercCredentialProvider {
    /// Create a provider reading the given section of the file at `path`.
    pub fn new(path: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            section: section.into(),
        }
    }
}

#[async_trait]
impl ProvideCredential for EdgercCredentialProvider {
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Credential>> {
        let path = ctx.expand_home_dir(&self.path).ok_or_else(|| {
            Error::config_file_not_found(format!(
                "cannot expand edgerc path {}: home directory unknown",
                self.path
            ))
        })?;

        let content = ctx.file_read_as_string(&path).await.map_err(|err| {
            Error::config_file_not_found(format!("failed to read edgerc file at {path}"))
                .with_source(err)
        })?;

        let section = parse_section(&content, &self.section)?;

        let field = |key: &str| section.get(key).filter(|v| !v.is_empty()).cloned();
        let missing: Vec<&str> = ["client_token", "client_secret", "access_token", "host"]
            .into_iter()
            .filter(|key| field(key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(Error::config_missing_fields(format!(
                "edgerc section [{}] is missing required fields: {}",
                self.section,
                missing.join(", ")
            )));
        }

        // Absent or unparsable max_body falls back to the default cap.
        let max_body = section
            .get("max_body")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_BODY);

        debug!("credential loaded from edgerc file at {path}");
        Ok(Some(Credential {
            client_token: field("client_token").unwrap_or_default(),
            client_secret: field("client_secret").unwrap_or_default(),
            access_token: field("access_token").unwrap_or_default(),
            host: normalize_host(&field("host").unwrap_or_default()),
            max_body,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, StaticEnv, TokioFileRead};
    use std::io::Write;

    fn write_edgerc(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(content.as_bytes()).expect("write temp file");
        file
    }

    fn ctx() -> Context {
        Context::new().with_file_read(TokioFileRead)
    }

    #[tokio::test]
    async fn test_load_section() {
        let file = write_edgerc(
            "[default]\n\
             client_secret = xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx=\n\
             host = akaa-baseurl-xxxxxxxxxxx-xxxxxxxxxxxxx.luna.akamaiapis.net/\n\
             access_token = akab-access-token-xxx-xxxxxxxxxxxxxxxx\n\
             client_token = akab-client-token-xxx-xxxxxxxxxxxxxxxx\n\
             max-body = 2048\n",
        );

        let cred =
            EdgercCredentialProvider::new(file.path().to_string_lossy(), "default")
                .provide_credential(&ctx())
                .await
                .unwrap()
                .unwrap();

        assert_eq!(
            cred.host,
            "https://akaa-baseurl-xxxxxxxxxxx-xxxxxxxxxxxxx.luna.akamaiapis.net"
        );
        assert_eq!(cred.client_token, "akab-client-token-xxx-xxxxxxxxxxxxxxxx");
        assert_eq!(cred.max_body, 2048);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = EdgercCredentialProvider::new("/no/such/edgerc", "default")
            .provide_credential(&ctx())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigFileNotFound);
    }

    #[tokio::test]
    async fn test_missing_section() {
        let file = write_edgerc("[default]\nclient_token = ct\n");
        let err = EdgercCredentialProvider::new(file.path().to_string_lossy(), "ccu")
            .provide_credential(&ctx())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigSectionNotFound);
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let file = write_edgerc("[default]\nclient_token = ct\nhost = example.net\n");
        let err = EdgercCredentialProvider::new(file.path().to_string_lossy(), "default")
            .provide_credential(&ctx())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigMissingFields);
        assert!(err.to_string().contains("client_secret"));
        assert!(err.to_string().contains("access_token"));
    }

    #[tokio::test]
    async fn test_home_dir_expansion() {
        let file = write_edgerc(
            "[default]\n\
             client_secret = cs\nhost = example.net\naccess_token = at\nclient_token = ct\n",
        );
        let dir = file.path().parent().expect("temp file has a parent");
        let name = file.path().file_name().expect("temp file has a name");

        let ctx = ctx().with_env(StaticEnv {
            home_dir: Some(dir.to_path_buf()),
            envs: Default::default(),
        });

        let cred = EdgercCredentialProvider::new(
            format!("~/{}", name.to_string_lossy()),
            "default",
        )
        .provide_credential(&ctx)
        .await
        .unwrap()
        .unwrap();
        assert_eq!(cred.host, "https://example.net");
    }
}
