//! The EdgeGrid API client: resolves credentials, signs requests and
//! dispatches them, re-signing on every redirect hop.

use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, LOCATION, USER_AGENT};
use http::{HeaderMap, HeaderValue, StatusCode, Uri};
use log::debug;

use crate::constants::{
    AKAMAI_CLI, AKAMAI_CLI_COMMAND, AKAMAI_CLI_COMMAND_VERSION, AKAMAI_CLI_VERSION,
};
use crate::sign::RequestSigner;
use crate::{
    Context, Credential, DefaultCredentialProvider, Error, OutgoingRequest, ProvideCredential,
    Result, SignedRequest,
};

/// Observes requests and responses as the client dispatches them.
///
/// Both hooks default to doing nothing; implement only what you need.
pub trait RequestObserver: Send + Sync + 'static {
    /// Called with every request about to be sent, redirect hops included.
    fn on_request(&self, _request: &SignedRequest) {}

    /// Called with every response received, redirect hops included.
    fn on_response(&self, _status: StatusCode, _headers: &HeaderMap) {}
}

/// An EdgeGrid API client.
///
/// The credential is resolved lazily on the first signing call and cached
/// for the lifetime of the client. Cloning is cheap and clones share the
/// cache.
#[derive(Clone)]
pub struct EdgeGrid {
    ctx: Context,
    provider: Option<Arc<dyn ProvideCredential>>,
    credential: Arc<Mutex<Option<Credential>>>,
    observer: Option<Arc<dyn RequestObserver>>,
}

impl Debug for EdgeGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgeGrid")
            .field("ctx", &self.ctx)
            .field("provider", &self.provider)
            .field("credential", &self.credential)
            .finish_non_exhaustive()
    }
}

impl EdgeGrid {
    /// Create a client with a custom credential provider.
    pub fn new(ctx: Context, provider: impl ProvideCredential) -> Self {
        Self {
            ctx,
            provider: Some(Arc::new(provider)),
            credential: Arc::new(Mutex::new(None)),
            observer: None,
        }
    }

    /// Create a client from an `.edgerc` file section.
    ///
    /// `AKAMAI_*` environment variables still take precedence over the file,
    /// matching the standard resolution order.
    pub fn from_edgerc(ctx: Context, path: impl Into<String>, section: impl Into<String>) -> Self {
        Self::new(
            ctx,
            DefaultCredentialProvider::new(section).with_edgerc_path(path),
        )
    }

    /// Create a client from an already resolved credential.
    pub fn with_credential(ctx: Context, credential: Credential) -> Self {
        Self {
            ctx,
            provider: None,
            credential: Arc::new(Mutex::new(Some(credential))),
            observer: None,
        }
    }

    /// Attach an observer receiving every request and response.
    pub fn with_observer(mut self, observer: impl RequestObserver) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Sign a request without sending it.
    ///
    /// Default `Content-Type`, `Accept` and CLI `User-Agent` headers are
    /// applied first, so what is signed is exactly what [`send`](Self::send)
    /// would put on the wire.
    pub async fn auth(&self, req: OutgoingRequest) -> Result<SignedRequest> {
        let credential = self.credential().await?;
        let req = self.extend_default_headers(req)?;
        RequestSigner::new().sign(&req, &credential)
    }

    /// Send a signed request and return the final response.
    ///
    /// A 3xx response carrying a `Location` header is followed by signing a
    /// fresh request against the redirect target; the transport itself never
    /// follows redirects. The chain is followed until a non-redirect response
    /// arrives, with no hop limit.
    pub async fn send(&self, mut signed: SignedRequest) -> Result<http::Response<Bytes>> {
        loop {
            if let Some(observer) = &self.observer {
                observer.on_request(&signed);
            }

            let mut req = http::Request::builder()
                .method(signed.method.clone())
                .uri(signed.url.clone())
                .body(signed.body_bytes())?;
            *req.headers_mut() = signed.headers.clone();

            let resp = self.ctx.http_send(req).await?;

            if let Some(observer) = &self.observer {
                observer.on_response(resp.status(), resp.headers());
            }

            match redirect_location(&resp) {
                Some(location) => {
                    debug!("following {} redirect to {location}", resp.status());
                    signed = self.redirect(&signed, &location).await?;
                }
                None => return Ok(resp),
            }
        }
    }

    /// Resolve the credential, loading it through the provider on first use.
    async fn credential(&self) -> Result<Credential> {
        {
            let guard = self.credential.lock().expect("lock must be valid");
            if let Some(credential) = guard.as_ref() {
                if !credential.is_valid() {
                    return Err(Error::config_missing_fields(
                        "credential is missing required fields",
                    ));
                }
                return Ok(credential.clone());
            }
        }

        let Some(provider) = &self.provider else {
            return Err(Error::config_no_source("no credential source configured"));
        };
        let credential = provider
            .provide_credential(&self.ctx)
            .await?
            .ok_or_else(|| {
                Error::config_no_source("credential provider did not find any credentials")
            })?;
        if !credential.is_valid() {
            return Err(Error::config_missing_fields(
                "resolved credential is missing required fields",
            ));
        }

        *self.credential.lock().expect("lock must be valid") = Some(credential.clone());
        Ok(credential)
    }

    /// Apply the default headers every request carries unless overridden.
    fn extend_default_headers(&self, mut req: OutgoingRequest) -> Result<OutgoingRequest> {
        if !req.headers.contains_key(CONTENT_TYPE) {
            req.headers
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        if !req.headers.contains_key(ACCEPT) {
            req.headers
                .insert(ACCEPT, HeaderValue::from_static("application/json"));
        }

        let mut user_agents = Vec::new();
        if let Some(ua) = req.headers.get(USER_AGENT) {
            user_agents.push(ua.to_str()?.to_string());
        }
        if let (Some(_), Some(version)) = (
            self.ctx.env_var(AKAMAI_CLI),
            self.ctx.env_var(AKAMAI_CLI_VERSION),
        ) {
            user_agents.push(format!("AkamaiCLI/{version}"));
        }
        if let (Some(command), Some(version)) = (
            self.ctx.env_var(AKAMAI_CLI_COMMAND),
            self.ctx.env_var(AKAMAI_CLI_COMMAND_VERSION),
        ) {
            user_agents.push(format!("AkamaiCLI-{command}/{version}"));
        }
        if !user_agents.is_empty() {
            req.headers
                .insert(USER_AGENT, user_agents.join(" ").parse()?);
        }

        Ok(req)
    }

    /// Build and sign the follow-up request for a redirect.
    async fn redirect(&self, prior: &SignedRequest, location: &str) -> Result<SignedRequest> {
        // Absolute targets are reduced to path+query and re-resolved against
        // the credential host, like any other path.
        let path = if location.starts_with("https://") || location.starts_with("http://") {
            let uri: Uri = location.parse()?;
            uri.path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("/")
                .to_string()
        } else {
            location.to_string()
        };

        let mut headers = prior.headers.clone();
        headers.remove(AUTHORIZATION);

        let req = OutgoingRequest {
            method: prior.method.clone(),
            path,
            headers,
            query: Vec::new(),
            body: prior.body.clone(),
            headers_to_sign: prior.headers_to_sign.clone(),
        };

        let credential = self.credential().await?;
        RequestSigner::new().sign(&req, &credential)
    }
}

fn redirect_location(resp: &http::Response<Bytes>) -> Option<String> {
    if !matches!(resp.status().as_u16(), 300 | 301 | 302 | 303 | 307) {
        return None;
    }
    let location = resp.headers().get(LOCATION)?;
    location.to_str().ok().map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Body, StaticEnv};
    use http::Method;
    use std::collections::HashMap;

    fn credential() -> Credential {
        Credential {
            client_token: "ct".to_string(),
            client_secret: "cs".to_string(),
            access_token: "at".to_string(),
            host: "https://example.luna.akamaiapis.net".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_default_headers() {
        let client = EdgeGrid::with_credential(Context::new(), credential());

        let signed = client
            .auth(OutgoingRequest::new(Method::GET, "/t"))
            .await
            .unwrap();
        assert_eq!(signed.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(signed.headers()[ACCEPT], "application/json");
        assert!(signed.headers().get(USER_AGENT).is_none());
    }

    #[tokio::test]
    async fn test_default_headers_do_not_override() {
        let client = EdgeGrid::with_credential(Context::new(), credential());

        let req = OutgoingRequest::new(Method::POST, "/t")
            .with_header("content-type", "application/gzip")
            .unwrap()
            .with_body(Body::Bytes(Bytes::from_static(b"\x1f\x8b")));
        let signed = client.auth(req).await.unwrap();
        assert_eq!(signed.headers()[CONTENT_TYPE], "application/gzip");
    }

    #[tokio::test]
    async fn test_cli_user_agent() {
        let envs = HashMap::from([
            ("AKAMAI_CLI".to_string(), "1".to_string()),
            ("AKAMAI_CLI_VERSION".to_string(), "1.5.0".to_string()),
            ("AKAMAI_CLI_COMMAND".to_string(), "dns".to_string()),
            ("AKAMAI_CLI_COMMAND_VERSION".to_string(), "0.3.1".to_string()),
        ]);
        let ctx = Context::new().with_env(StaticEnv {
            home_dir: None,
            envs,
        });
        let client = EdgeGrid::with_credential(ctx, credential());

        let req = OutgoingRequest::new(Method::GET, "/t")
            .with_header("user-agent", "my-tool/2.0")
            .unwrap();
        let signed = client.auth(req).await.unwrap();
        assert_eq!(
            signed.headers()[USER_AGENT],
            "my-tool/2.0 AkamaiCLI/1.5.0 AkamaiCLI-dns/0.3.1"
        );
    }

    #[tokio::test]
    async fn test_invalid_seeded_credential() {
        let client = EdgeGrid::with_credential(Context::new(), Credential::default());
        let err = client
            .auth(OutgoingRequest::new(Method::GET, "/t"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::ConfigMissingFields);
    }
}
