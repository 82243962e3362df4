//! EdgeGrid request signing for Akamai APIs.
//!
//! This crate resolves EdgeGrid credentials (from an `.edgerc` file or from
//! `AKAMAI_*` environment variables), signs requests with the
//! `EG1-HMAC-SHA256` scheme, and dispatches them, re-signing on every
//! redirect hop.
//!
//! # Example
//!
//! ```no_run
//! use edgegrid::{Context, EdgeGrid, OsEnv, OutgoingRequest, ReqwestHttpSend, TokioFileRead};
//! use http::Method;
//!
//! #[tokio::main]
//! async fn main() -> edgegrid::Result<()> {
//!     let ctx = Context::new()
//!         .with_file_read(TokioFileRead)
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv);
//!     let client = EdgeGrid::from_edgerc(ctx, "~/.edgerc", "default");
//!
//!     let req = OutgoingRequest::new(Method::GET, "/identity-management/v3/user-profile");
//!     let signed = client.auth(req).await?;
//!     let resp = client.send(signed).await?;
//!     println!("{}", resp.status());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

mod client;
mod constants;
mod context;
mod credential;
mod edgerc;
mod error;
mod fs;
mod http_send;
mod provide_credential;
mod request;
mod sign;

pub mod hash;
pub mod time;
pub mod utils;

pub use client::{EdgeGrid, RequestObserver};
pub use context::{Context, Env, FileRead, HttpSend, OsEnv, StaticEnv};
pub use credential::{Credential, DEFAULT_MAX_BODY};
pub use error::{Error, ErrorKind, Result};
pub use fs::TokioFileRead;
pub use http_send::ReqwestHttpSend;
pub use provide_credential::{
    DefaultCredentialProvider, EdgercCredentialProvider, EnvCredentialProvider,
    ProvideCredential, StaticCredentialProvider,
};
pub use request::{Body, OutgoingRequest, SignedRequest};
pub use sign::RequestSigner;
