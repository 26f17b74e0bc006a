use crate::DEFAULT_SCHEME_NAME;
use crate::error::AmendError;
use crate::openapi::{Components, OAuthFlows, SecurityScheme, SecuritySchemeType};
use unicase::UniCase;

/// Derives the registry name for a security scheme.
///
/// Precedence, first non-empty wins: the explicit name, the scheme-type
/// identifier, the HTTP `scheme` sub-field, then a generic fallback.
pub fn derive_scheme_name(scheme: &SecurityScheme, explicit_name: Option<&str>) -> String {
    if let Some(name) = explicit_name.filter(|name| !name.is_empty()) {
        return String::from(name);
    }
    if let Some(type_) = &scheme.type_ {
        return type_.to_string();
    }
    if let Some(http_scheme) = scheme.scheme.as_deref().filter(|s| !s.is_empty()) {
        return String::from(http_scheme);
    }
    String::from(DEFAULT_SCHEME_NAME)
}

/// Inserts a security scheme into the document's scheme map.
///
/// Returns the effective name. Names compare case-insensitively; registering
/// a name that already exists fails with
/// [`AmendError::DuplicateSchemeName`] rather than overwriting.
pub fn register(
    components: &mut Components,
    scheme: SecurityScheme,
    explicit_name: Option<&str>,
) -> Result<String, AmendError> {
    let name = derive_scheme_name(&scheme, explicit_name);
    let duplicate = components
        .security_schemes
        .keys()
        .any(|existing| UniCase::new(existing.as_str()) == UniCase::new(name.as_str()));
    if duplicate {
        return Err(AmendError::duplicate_scheme_name(&name));
    }
    log::debug!("Registering security scheme '{}'", name);
    components.security_schemes.insert(name.clone(), scheme);
    Ok(name)
}

impl SecurityScheme {
    /// A scheme for an API key. The key name and location are left to the
    /// configuration callback.
    pub fn api_key() -> Self {
        Self {
            type_: Some(SecuritySchemeType::ApiKey),
            ..Self::default()
        }
    }

    /// An HTTP scheme defaulting to bearer authentication.
    pub fn http_bearer() -> Self {
        Self {
            type_: Some(SecuritySchemeType::Http),
            scheme: Some(String::from("bearer")),
            ..Self::default()
        }
    }

    /// An OAuth2 scheme with the given flow configuration.
    pub fn oauth2(flows: OAuthFlows) -> Self {
        Self {
            type_: Some(SecuritySchemeType::OAuth2),
            flows: Some(flows),
            ..Self::default()
        }
    }

    /// An OpenID Connect scheme with the given discovery URL.
    pub fn open_id_connect(url: impl Into<String>) -> Self {
        Self {
            type_: Some(SecuritySchemeType::OpenIdConnect),
            open_id_connect_url: Some(url.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_derive_name_prefers_explicit() {
        let scheme = SecurityScheme::oauth2(OAuthFlows::default());
        assert_eq!(derive_scheme_name(&scheme, Some("custom")), "custom");
    }

    #[test]
    fn test_derive_name_ignores_empty_explicit() {
        let scheme = SecurityScheme::oauth2(OAuthFlows::default());
        assert_eq!(derive_scheme_name(&scheme, Some("")), "oauth2");
    }

    #[test]
    fn test_derive_name_uses_type_identifier() {
        assert_eq!(derive_scheme_name(&SecurityScheme::api_key(), None), "apiKey");
        assert_eq!(
            derive_scheme_name(&SecurityScheme::open_id_connect("http://localhost"), None),
            "openIdConnect"
        );
    }

    #[test]
    fn test_derive_name_falls_back_to_http_scheme_field() {
        let scheme = SecurityScheme {
            scheme: Some(String::from("bearer")),
            ..SecurityScheme::default()
        };
        assert_eq!(derive_scheme_name(&scheme, None), "bearer");
    }

    #[test]
    fn test_derive_name_generic_fallback() {
        let scheme = SecurityScheme::default();
        assert_eq!(derive_scheme_name(&scheme, None), "securityScheme");
    }

    #[test]
    fn test_register_distinct_names() {
        let mut components = Components::default();
        let first = register(&mut components, SecurityScheme::http_bearer(), None).unwrap();
        let second = register(&mut components, SecurityScheme::api_key(), None).unwrap();

        assert_eq!(first, "http");
        assert_eq!(second, "apiKey");
        assert_eq!(components.security_schemes.len(), 2);
    }

    #[test]
    fn test_register_duplicate_name_fails() {
        let mut components = Components::default();
        register(&mut components, SecurityScheme::http_bearer(), None).unwrap();
        let result = register(&mut components, SecurityScheme::http_bearer(), None);

        assert_eq!(
            result,
            Err(AmendError::DuplicateSchemeName(String::from("http")))
        );
        assert_eq!(components.security_schemes.len(), 1);
    }

    #[test]
    fn test_register_duplicate_name_is_case_insensitive() {
        let mut components = Components::default();
        register(&mut components, SecurityScheme::http_bearer(), Some("Bearer")).unwrap();
        let result = register(&mut components, SecurityScheme::http_bearer(), Some("bearer"));

        assert!(matches!(result, Err(AmendError::DuplicateSchemeName(_))));
    }
}
