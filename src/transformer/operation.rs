use crate::error::AmendError;
use crate::metadata::{EndpointDescriptor, ParameterSource};
use crate::openapi::{Operation, SecurityRequirement, SecurityScheme, SecuritySchemeType};
use crate::transformer::{OperationTransformer, ensure_active};
use crate::{
    FORBIDDEN_DESCRIPTION, FORBIDDEN_KEY, UNAUTHORIZED_DESCRIPTION, UNAUTHORIZED_KEY,
};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// A reference to a registered security scheme, by name.
///
/// The scheme itself is optional: a name-only reference still produces a
/// security requirement entry, but with no resolvable type its scope list is
/// always empty.
#[derive(Debug, Clone)]
pub struct SchemeReference {
    pub name: String,
    pub security_scheme: Option<SecurityScheme>,
}

impl From<&str> for SchemeReference {
    fn from(name: &str) -> Self {
        Self {
            name: String::from(name),
            security_scheme: None,
        }
    }
}

impl From<String> for SchemeReference {
    fn from(name: String) -> Self {
        Self {
            name,
            security_scheme: None,
        }
    }
}

impl From<(SecurityScheme, String)> for SchemeReference {
    fn from((security_scheme, name): (SecurityScheme, String)) -> Self {
        Self {
            name,
            security_scheme: Some(security_scheme),
        }
    }
}

/// Removes parameters the host framework injected for claims-based model
/// binding from the operation's parameter list.
pub struct ClaimsBindingCheck;

#[async_trait]
impl OperationTransformer for ClaimsBindingCheck {
    async fn transform(
        &self,
        operation: &mut Operation,
        descriptor: &EndpointDescriptor,
        cancel: &CancellationToken,
    ) -> Result<(), AmendError> {
        let names_to_remove: Vec<&str> = descriptor
            .parameters()
            .iter()
            .filter(|parameter| parameter.source == ParameterSource::ClaimsBinding)
            .map(|parameter| parameter.name.as_str())
            .collect();
        if names_to_remove.is_empty() {
            return Ok(());
        }
        let Some(parameters) = operation.parameters.as_mut() else {
            return Ok(());
        };
        for name in names_to_remove {
            ensure_active(cancel, "claims binding parameter removal")?;
            if let Some(position) = parameters.iter().position(|p| p.name == name) {
                log::debug!("Removing claims-bound parameter '{}'", name);
                parameters.remove(position);
            }
        }
        Ok(())
    }
}

/// Derives authorization responses and security requirements for operations
/// whose endpoint carries an authorization marker.
///
/// Endpoints without the marker are left untouched. For marked endpoints the
/// standard 401/403 responses are upserted; if the resolver yields a scheme
/// reference, one security requirement entry is appended. Stacked checks
/// append one entry each (OR semantics).
pub struct AuthorizeCheck {
    resolver: Box<dyn Fn() -> Option<SchemeReference> + Send + Sync>,
}

impl AuthorizeCheck {
    pub fn new(resolver: impl Fn() -> Option<SchemeReference> + Send + Sync + 'static) -> Self {
        Self {
            resolver: Box::new(resolver),
        }
    }

    /// Scopes only apply to OAuth2 and OpenID Connect schemes; every other
    /// scheme type gets an empty list regardless of attached annotations.
    fn aggregate_scopes(reference: &SchemeReference, descriptor: &EndpointDescriptor) -> Vec<String> {
        match reference
            .security_scheme
            .as_ref()
            .and_then(|scheme| scheme.type_)
        {
            Some(SecuritySchemeType::OAuth2 | SecuritySchemeType::OpenIdConnect) => descriptor
                .metadata()
                .scopes()
                .flat_map(|scopes| scopes.iter().map(String::from))
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[async_trait]
impl OperationTransformer for AuthorizeCheck {
    async fn transform(
        &self,
        operation: &mut Operation,
        descriptor: &EndpointDescriptor,
        _cancel: &CancellationToken,
    ) -> Result<(), AmendError> {
        if !descriptor.metadata().has_authorization() {
            return Ok(());
        }

        operation.upsert_response(UNAUTHORIZED_KEY, UNAUTHORIZED_DESCRIPTION);
        operation.upsert_response(FORBIDDEN_KEY, FORBIDDEN_DESCRIPTION);

        // Authorization is real even when no scheme is registered; the
        // responses stay either way.
        let Some(reference) = (self.resolver)() else {
            return Ok(());
        };

        let scopes = Self::aggregate_scopes(&reference, descriptor);
        operation
            .security
            .get_or_insert_with(Vec::new)
            .push(SecurityRequirement::single(reference.name, scopes));
        Ok(())
    }
}
