//! The EdgeGrid signing algorithm.
//!
//! Signing joins seven fields with tabs, in this order: method, scheme,
//! host, path+query, canonical signed headers, content hash, and the
//! still-unsigned authorization header. The string is HMAC'd with a key
//! derived from the client secret and the request timestamp, and the
//! resulting signature is appended to the authorization header.

use http::header::AUTHORIZATION;
use http::{HeaderValue, Method, Uri};
use log::{debug, warn};
use percent_encoding::utf8_percent_encode;

use crate::constants::URI_COMPONENT_ENCODE_SET;
use crate::hash::{base64_hmac_sha256, base64_sha256};
use crate::request::resolve_url;
use crate::time::{format_timestamp, now};
use crate::{Body, Credential, Error, OutgoingRequest, Result, SignedRequest};

const SIGNING_ALGORITHM: &str = "EG1-HMAC-SHA256";

/// Signs requests with a credential.
///
/// The signer never modifies the request it is given: the resolved url, the
/// possibly transformed body and the `Authorization` header all live on the
/// returned [`SignedRequest`].
#[derive(Debug, Default)]
pub struct RequestSigner {
    timestamp: Option<String>,
    nonce: Option<String>,
}

impl RequestSigner {
    /// Create a new signer. Timestamp and nonce are generated per request.
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    #[cfg(test)]
    fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    /// Sign `req` with `cred`, producing a request carrying its
    /// `Authorization` header.
    pub fn sign(&self, req: &OutgoingRequest, cred: &Credential) -> Result<SignedRequest> {
        let url = resolve_url(&cred.host, &req.path, &req.query)?;
        let body = prepare_body(&req.body);

        let timestamp = match &self.timestamp {
            Some(t) => t.clone(),
            None => format_timestamp(now()),
        };
        let nonce = match &self.nonce {
            Some(n) => n.clone(),
            None => uuid::Uuid::new_v4().to_string(),
        };

        let partial = format!(
            "{SIGNING_ALGORITHM} client_token={};access_token={};timestamp={timestamp};nonce={nonce};",
            cred.client_token, cred.access_token
        );

        let data_to_sign = data_to_sign(
            &req.method,
            &url,
            &canonical_headers(req)?,
            &content_hash(&req.method, &body, cred.max_body),
            &partial,
        )?;
        debug!("data to sign: {data_to_sign:?}");

        let signing_key = base64_hmac_sha256(cred.client_secret.as_bytes(), timestamp.as_bytes());
        let signature = base64_hmac_sha256(signing_key.as_bytes(), data_to_sign.as_bytes());

        let mut auth = HeaderValue::from_str(&format!("{partial}signature={signature}"))?;
        auth.set_sensitive(true);

        let mut headers = req.headers.clone();
        headers.insert(AUTHORIZATION, auth);

        Ok(SignedRequest {
            method: req.method.clone(),
            url,
            headers,
            body,
            headers_to_sign: req.headers_to_sign.clone(),
        })
    }
}

/// Transform a structured body into what actually goes on the wire.
///
/// A JSON object becomes form data: `key=<uri-encoded JSON of value>` pairs
/// joined with `&`, keys in insertion order. Any other JSON value becomes
/// its JSON text. Text and binary bodies pass through untouched.
fn prepare_body(body: &Body) -> Body {
    match body {
        Body::Json(serde_json::Value::Object(map)) => {
            let encoded = map
                .iter()
                .map(|(key, value)| {
                    let value = value.to_string();
                    let value = utf8_percent_encode(&value, &URI_COMPONENT_ENCODE_SET);
                    format!("{key}={value}")
                })
                .collect::<Vec<_>>()
                .join("&");
            Body::Text(encoded)
        }
        Body::Json(value) => Body::Text(value.to_string()),
        other => other.clone(),
    }
}

/// Compute the content hash field.
///
/// Only a POST with a non-empty body hashes anything; every other method
/// contributes an empty field, bodies included. Hashing caps the input at
/// `max_body` units (characters for text, bytes for binary) while the wire
/// body stays complete.
fn content_hash(method: &Method, body: &Body, max_body: usize) -> String {
    if *method != Method::POST || body.is_empty() {
        return String::new();
    }

    match body {
        Body::Text(s) => {
            let chars = s.chars().count();
            if chars > max_body {
                warn!("body length {chars} exceeds the {max_body} hashing cap, truncating");
                let truncated: String = s.chars().take(max_body).collect();
                base64_sha256(truncated.as_bytes())
            } else {
                base64_sha256(s.as_bytes())
            }
        }
        Body::Bytes(b) => {
            if b.len() > max_body {
                warn!("body length {} exceeds the {max_body} hashing cap, truncating", b.len());
                base64_sha256(&b[..max_body])
            } else {
                base64_sha256(b)
            }
        }
        // prepare_body already turned Json into Text.
        Body::Json(v) => content_hash(method, &Body::Text(v.to_string()), max_body),
        Body::Empty => String::new(),
    }
}

/// Build the canonical signed-headers field.
///
/// Only headers named in `headers_to_sign` participate, in the order given;
/// names absent from the request are skipped. Values are trimmed, unwrapped
/// from surrounding double quotes, and have interior whitespace runs
/// collapsed to a single space.
fn canonical_headers(req: &OutgoingRequest) -> Result<String> {
    let mut entries = Vec::with_capacity(req.headers_to_sign.len());
    for name in &req.headers_to_sign {
        let Some(value) = req.headers.get(name.as_str()) else {
            continue;
        };
        let value = value.to_str()?.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);
        let value = value.split_whitespace().collect::<Vec<_>>().join(" ");
        entries.push(format!("{}:{value}", name.to_lowercase()));
    }
    Ok(entries.join("\t"))
}

fn data_to_sign(
    method: &Method,
    url: &Uri,
    canonical_headers: &str,
    content_hash: &str,
    partial: &str,
) -> Result<String> {
    let authority = url
        .authority()
        .ok_or_else(|| Error::request_invalid(format!("url {url} has no authority")))?;
    let path_and_query = url.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    Ok([
        method.as_str(),
        url.scheme_str().unwrap_or("https"),
        authority.as_str(),
        path_and_query,
        canonical_headers,
        content_hash,
        partial,
    ]
    .join("\t"))
}
