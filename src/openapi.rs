use http::Method;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// OpenAPI 3.x Document
///
/// The subset of the document model touched by the amendment pipelines. The
/// host generator owns an instance for the duration of one generation
/// request; transformers mutate it in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenApiDocument {
    /// The semantic version number of the OpenAPI Specification version
    pub openapi: String,
    /// Metadata about the API
    pub info: Info,
    /// An array of Server Objects, which provide connectivity information to a target server
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    /// The available paths and operations for the API
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub paths: BTreeMap<String, PathItem>,
    /// An element to hold various schemas for the document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
    /// A declaration of which security mechanisms can be used across the API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,
}

impl Default for OpenApiDocument {
    fn default() -> Self {
        Self {
            openapi: String::from("3.1.0"),
            info: Info::default(),
            servers: Vec::new(),
            paths: BTreeMap::new(),
            components: None,
            security: None,
        }
    }
}

/// Info Object: provides metadata about the API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Info {
    /// The title of the API
    pub title: String,
    /// The version of the API
    pub version: String,
    /// A short summary of the API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// A description of the API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Server Object: object representing a server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    /// A URL to the target host
    pub url: String,
    /// An optional string describing the host
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Server {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: None,
        }
    }
}

/// Components Object: holds a set of reusable objects
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    /// An object to hold reusable Security Scheme Objects
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub security_schemes: BTreeMap<String, SecurityScheme>,
}

/// Path Item Object: describes the operations available on a single path
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation>,
}

impl PathItem {
    /// Returns the operation entry for the given HTTP method, if present.
    pub fn operation_mut(&mut self, method: &Method) -> Option<&mut Operation> {
        let slot = match method.as_str() {
            "GET" => &mut self.get,
            "PUT" => &mut self.put,
            "POST" => &mut self.post,
            "DELETE" => &mut self.delete,
            "OPTIONS" => &mut self.options,
            "HEAD" => &mut self.head,
            "PATCH" => &mut self.patch,
            "TRACE" => &mut self.trace,
            _ => return None,
        };
        slot.as_mut()
    }
}

/// Operation Object: describes a single API operation on a path
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Operation {
    /// Unique string used to identify the operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// A short summary of what the operation does
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// A list of parameters that are applicable for this operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
    /// The list of possible responses as they are returned from executing this operation
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub responses: BTreeMap<String, Response>,
    /// A declaration of which security mechanisms can be used for this operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,
}

impl Operation {
    /// Adds or updates a response entry for a status code.
    ///
    /// If the status code is absent a new response is created; if present
    /// its description is overwritten. The key is never duplicated.
    pub fn upsert_response(&mut self, status: &str, description: &str) {
        self.responses
            .entry(String::from(status))
            .and_modify(|response| response.description = String::from(description))
            .or_insert_with(|| Response::new(description));
    }
}

/// Response Object: describes a single response from an API operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// A description of the response
    pub description: String,
}

impl Response {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Parameter Object: describes a single operation parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    /// The name of the parameter
    pub name: String,
    /// The location of the parameter
    #[serde(rename = "in")]
    pub in_: ParameterLocation,
    /// A description of the parameter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether this parameter is mandatory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, in_: ParameterLocation) -> Self {
        Self {
            name: name.into(),
            in_,
            description: None,
            required: None,
        }
    }
}

/// Enum for parameter location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Header,
    Query,
    Cookie,
    Path,
}

impl Display for ParameterLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let str = String::from(match self {
            ParameterLocation::Header => "header",
            ParameterLocation::Query => "query",
            ParameterLocation::Cookie => "cookie",
            ParameterLocation::Path => "path",
        });
        write!(f, "{}", str)
    }
}

/// Security Scheme Object: defines a security scheme that can be used by the operations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityScheme {
    /// The type of the security scheme
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<SecuritySchemeType>,
    /// A description for security scheme
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The name of the header, query or cookie parameter to be used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The location of the API key
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub in_: Option<ParameterLocation>,
    /// The name of the HTTP Authorization scheme
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    /// A hint to the client to identify how the bearer token is formatted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer_format: Option<String>,
    /// OAuth Flows Object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flows: Option<OAuthFlows>,
    /// OpenID Connect URL to discover OAuth2 configuration values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_id_connect_url: Option<String>,
}

/// Enum for security scheme type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SecuritySchemeType {
    ApiKey,
    Http,
    #[serde(rename = "oauth2")]
    OAuth2,
    OpenIdConnect,
}

impl Display for SecuritySchemeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let str = String::from(match self {
            SecuritySchemeType::ApiKey => "apiKey",
            SecuritySchemeType::Http => "http",
            SecuritySchemeType::OAuth2 => "oauth2",
            SecuritySchemeType::OpenIdConnect => "openIdConnect",
        });
        write!(f, "{}", str)
    }
}

/// OAuth Flows Object: allows configuration of the supported OAuth Flows
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthFlows {
    /// Configuration for the OAuth Implicit flow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implicit: Option<OAuthFlow>,
    /// Configuration for the OAuth Resource Owner Password flow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<OAuthFlow>,
    /// Configuration for the OAuth Client Credentials flow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_credentials: Option<OAuthFlow>,
    /// Configuration for the OAuth Authorization Code flow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_code: Option<OAuthFlow>,
}

/// OAuth Flow Object: configuration details for a supported OAuth Flow
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthFlow {
    /// The authorization URL to be used for this flow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_url: Option<String>,
    /// The token URL to be used for this flow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,
    /// The URL to be used for obtaining refresh tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_url: Option<String>,
    /// The available scopes for the OAuth2 security scheme
    pub scopes: BTreeMap<String, String>,
}

/// Security Requirement Object: lists the required security schemes to execute this operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityRequirement {
    #[serde(flatten)]
    pub schemes: BTreeMap<String, Vec<String>>,
}

impl SecurityRequirement {
    /// A requirement referencing a single named scheme.
    pub fn single(name: impl Into<String>, scopes: Vec<String>) -> Self {
        let mut schemes = BTreeMap::new();
        schemes.insert(name.into(), scopes);
        Self { schemes }
    }
}
