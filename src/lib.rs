//! Helpers for amending a generated OpenAPI 3.x document.
//!
//! The host generator builds a draft document from its discovered routes and
//! hands it to this crate together with one [`metadata::EndpointDescriptor`]
//! per operation. Amendments are expressed as transformers registered on an
//! [`transformer::OpenApiOptions`] configuration object:
//!
//! - document transformers mutate the whole document (info, servers,
//!   security-scheme definitions),
//! - operation transformers mutate one operation's entry (authorization
//!   responses and security requirements, phantom-parameter pruning).
//!
//! Transformers run sequentially in registration order against a single
//! mutable document instance. Nothing is cached across generation requests.
//!
//! ```rust,ignore
//! use oasamend::transformer::OpenApiOptions;
//!
//! let mut options = OpenApiOptions::new("v1");
//! let oauth2 = options.add_oauth2(flows);
//! options
//!     .set_info("Orders API", None)
//!     .use_path_base("/orders")
//!     .with_claims_binding_check()
//!     .with_authorize_check(oauth2);
//! ```

pub mod error;
pub mod metadata;
pub mod openapi;
pub mod scheme;
pub mod transformer;

const UNAUTHORIZED_KEY: &'static str = "401";
const FORBIDDEN_KEY: &'static str = "403";
const UNAUTHORIZED_DESCRIPTION: &'static str = "User is not authorised";
const FORBIDDEN_DESCRIPTION: &'static str = "User access to resource is forbidden";
const FALLBACK_VERSION: &'static str = "1.0.0";
const DEFAULT_SCHEME_NAME: &'static str = "securityScheme";
const VERSION_VARIABLE: &'static str = "CARGO_PKG_VERSION";
