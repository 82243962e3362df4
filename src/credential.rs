use std::fmt::Debug;

use crate::utils::Redact;

/// Default cap, in bytes, on how much of a request body participates in the
/// content hash. Matches the limit enforced by Akamai's API gateway.
pub const DEFAULT_MAX_BODY: usize = 131072;

/// Credential for an EdgeGrid API client.
///
/// All four string fields come from an `.edgerc` section or from `AKAMAI_*`
/// environment variables. `host` is normalized to carry an `https://` scheme
/// and no trailing slash.
#[derive(Clone)]
pub struct Credential {
    /// Client token issued for the API client.
    pub client_token: String,
    /// Secret used as the initial HMAC key.
    pub client_secret: String,
    /// Access token scoping the client to a set of APIs.
    pub access_token: String,
    /// Base URL of the account's API gateway.
    pub host: String,
    /// Cap on how much of the body participates in the content hash.
    pub max_body: usize,
}

impl Default for Credential {
    fn default() -> Self {
        Self {
            client_token: String::new(),
            client_secret: String::new(),
            access_token: String::new(),
            host: String::new(),
            max_body: DEFAULT_MAX_BODY,
        }
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("client_token", &Redact::from(&self.client_token))
            .field("client_secret", &Redact::from(&self.client_secret))
            .field("access_token", &Redact::from(&self.access_token))
            .field("host", &self.host)
            .field("max_body", &self.max_body)
            .finish()
    }
}

impl Credential {
    /// Check whether all required fields are present.
    pub fn is_valid(&self) -> bool {
        !self.client_token.is_empty()
            && !self.client_secret.is_empty()
            && !self.access_token.is_empty()
            && !self.host.is_empty()
    }
}

/// Normalize a host into a base URL: strip one trailing `/` and prepend
/// `https://` unless the value already carries it.
pub(crate) fn normalize_host(host: &str) -> String {
    let host = host.strip_suffix('/').unwrap_or(host);
    if host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_host() {
        assert_eq!(
            normalize_host("akaa-xxxx.luna.akamaiapis.net"),
            "https://akaa-xxxx.luna.akamaiapis.net"
        );
        assert_eq!(
            normalize_host("https://akaa-xxxx.luna.akamaiapis.net/"),
            "https://akaa-xxxx.luna.akamaiapis.net"
        );
        assert_eq!(
            normalize_host("https://akaa-xxxx.luna.akamaiapis.net"),
            "https://akaa-xxxx.luna.akamaiapis.net"
        );
    }

    #[test]
    fn test_credential_debug_redacts_secrets() {
        let cred = Credential {
            client_token: "akab-client-token-xxx-xxxxxxxxxxxxxxxx".to_string(),
            client_secret: "xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx=".to_string(),
            access_token: "akab-access-token-xxx-xxxxxxxxxxxxxxxx".to_string(),
            host: "https://akaa-xxxx.luna.akamaiapis.net".to_string(),
            max_body: DEFAULT_MAX_BODY,
        };

        let msg = format!("{cred:?}");
        assert!(!msg.contains("akab-client-token-xxx-xxxxxxxxxxxxxxxx"));
        assert!(msg.contains("aka***xxx"));
        assert!(msg.contains("https://akaa-xxxx.luna.akamaiapis.net"));
    }

    #[test]
    fn test_is_valid() {
        let mut cred = Credential {
            client_token: "ct".to_string(),
            client_secret: "cs".to_string(),
            access_token: "at".to_string(),
            host: "https://example.net".to_string(),
            max_body: DEFAULT_MAX_BODY,
        };
        assert!(cred.is_valid());

        cred.access_token = String::new();
        assert!(!cred.is_valid());
    }
}
