use crate::{Error, HttpSend, Result};
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use reqwest::redirect::Policy;
use reqwest::{Client, Request};

/// Reqwest-based implementation of the [`HttpSend`] trait.
///
/// The default client disables reqwest's own redirect following: a redirected
/// request must be re-signed against the new target, which the [`EdgeGrid`]
/// client does itself.
///
/// [`EdgeGrid`]: crate::EdgeGrid
#[derive(Debug)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl Default for ReqwestHttpSend {
    fn default() -> Self {
        let client = Client::builder()
            .redirect(Policy::none())
            .build()
            .expect("default reqwest client must build");
        Self { client }
    }
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a caller-provided `reqwest::Client`.
    ///
    /// The client SHOULD have `redirect(Policy::none())` set; otherwise the
    /// transport will follow redirects with a stale signature.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = Request::try_from(req)
            .map_err(|e| Error::request_invalid("failed to convert request").with_source(e))?;
        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|e| Error::unexpected("failed to send request").with_source(e))?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| Error::unexpected("failed to read response body").with_source(e))?;
        Ok(http::Response::from_parts(parts, bs))
    }
}
