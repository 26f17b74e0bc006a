use http::Method;
use std::fmt::{Display, Formatter};

/// A collection of OAuth2/OpenID-Connect scope identifiers attached to one
/// endpoint.
///
/// Multiple annotations may be attached to the same endpoint (for example a
/// group-level annotation plus a per-endpoint annotation); the authorize
/// check aggregates them all in attachment order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scopes {
    scopes: Vec<String>,
}

impl Scopes {
    pub fn new<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scopes: scopes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.scopes.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl Display for Scopes {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Scopes: {}", self.scopes.join(","))
    }
}

/// Authorization marker for an endpoint.
///
/// Presence of the marker is what drives the authorize check; the fields are
/// advisory metadata describing how the host enforces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Authorize {
    /// The name of the policy applied by the host, if any.
    pub policy: Option<String>,
    /// Roles allowed to access the endpoint.
    pub roles: Vec<String>,
    /// Authentication schemes accepted for the endpoint.
    pub authentication_schemes: Vec<String>,
}

#[derive(Debug, Clone)]
enum MetadataItem {
    Authorize(Authorize),
    Scopes(Scopes),
}

/// The metadata bag attached to one endpoint registration.
///
/// Items accumulate in attachment order and are queried by capability rather
/// than by runtime type inspection.
#[derive(Debug, Clone, Default)]
pub struct EndpointMetadata {
    items: Vec<MetadataItem>,
}

impl EndpointMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches an authorization marker.
    pub fn with_authorization(mut self, authorize: Authorize) -> Self {
        self.items.push(MetadataItem::Authorize(authorize));
        self
    }

    /// Attaches one scope annotation. Callable multiple times; annotations
    /// accumulate rather than replace.
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items.push(MetadataItem::Scopes(Scopes::new(scopes)));
        self
    }

    /// Whether any authorization marker is attached.
    pub fn has_authorization(&self) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item, MetadataItem::Authorize(_)))
    }

    /// All scope annotations in attachment order.
    pub fn scopes(&self) -> impl Iterator<Item = &Scopes> {
        self.items.iter().filter_map(|item| match item {
            MetadataItem::Scopes(scopes) => Some(scopes),
            _ => None,
        })
    }
}

/// Enum for the declared source of an endpoint parameter
///
/// `ClaimsBinding` marks parameters the host framework injects for
/// claims-based model binding; these never belong in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterSource {
    Query,
    Path,
    Header,
    Body,
    ClaimsBinding,
}

impl Display for ParameterSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let str = String::from(match self {
            ParameterSource::Query => "query",
            ParameterSource::Path => "path",
            ParameterSource::Header => "header",
            ParameterSource::Body => "body",
            ParameterSource::ClaimsBinding => "claimsBinding",
        });
        write!(f, "{}", str)
    }
}

/// A parameter as declared on the endpoint, before document generation.
#[derive(Debug, Clone)]
pub struct ParameterDescription {
    pub name: String,
    pub source: ParameterSource,
}

/// Read-only description of one discovered endpoint: its route, declared
/// metadata, and declared parameters.
#[derive(Debug, Clone)]
pub struct EndpointDescriptor {
    method: Method,
    route: String,
    metadata: EndpointMetadata,
    parameters: Vec<ParameterDescription>,
}

impl EndpointDescriptor {
    pub fn new(method: Method, route: impl Into<String>) -> Self {
        Self {
            method,
            route: route.into(),
            metadata: EndpointMetadata::new(),
            parameters: Vec::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: EndpointMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Attaches one scope annotation to the endpoint's metadata bag.
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metadata = self.metadata.with_scopes(scopes);
        self
    }

    /// Attaches an authorization marker to the endpoint's metadata bag.
    pub fn with_authorization(mut self, authorize: Authorize) -> Self {
        self.metadata = self.metadata.with_authorization(authorize);
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, source: ParameterSource) -> Self {
        self.parameters.push(ParameterDescription {
            name: name.into(),
            source,
        });
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn metadata(&self) -> &EndpointMetadata {
        &self.metadata
    }

    pub fn parameters(&self) -> &[ParameterDescription] {
        &self.parameters
    }
}
