use crate::error::AmendError;
use crate::openapi::{Components, OpenApiDocument, SecurityScheme, Server};
use crate::scheme;
use crate::transformer::DocumentTransformer;
use crate::{FALLBACK_VERSION, VERSION_VARIABLE};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Resolves the running process's version, falling back to a literal when
/// the lookup yields nothing.
pub(crate) fn runtime_version() -> String {
    std::env::var(VERSION_VARIABLE)
        .ok()
        .filter(|version| !version.is_empty())
        .unwrap_or_else(|| String::from(FALLBACK_VERSION))
}

/// Sets the document title to `{title} | {version}` and the info version to
/// the effective version.
pub struct SetInfo {
    title: String,
    version: Option<String>,
}

impl SetInfo {
    pub fn new(title: impl Into<String>, version: Option<&str>) -> Self {
        Self {
            title: title.into(),
            version: version.map(String::from),
        }
    }
}

#[async_trait]
impl DocumentTransformer for SetInfo {
    async fn transform(
        &self,
        document: &mut OpenApiDocument,
        _cancel: &CancellationToken,
    ) -> Result<(), AmendError> {
        let version = self.version.clone().unwrap_or_else(runtime_version);
        document.info.title = format!("{} | {}", self.title, version);
        document.info.version = version;
        Ok(())
    }
}

/// Replaces the server list with a single entry for the configured path
/// base. Repeated application leaves exactly one server entry.
pub struct UsePathBase {
    base: String,
}

impl UsePathBase {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }
}

#[async_trait]
impl DocumentTransformer for UsePathBase {
    async fn transform(
        &self,
        document: &mut OpenApiDocument,
        _cancel: &CancellationToken,
    ) -> Result<(), AmendError> {
        document.servers.clear();
        document.servers.push(Server::new(&self.base));
        Ok(())
    }
}

/// Inserts a security scheme into the document's scheme map at generation
/// time. A name collision surfaces as a registration error.
pub struct AddSecurityScheme {
    security_scheme: SecurityScheme,
    name: String,
}

impl AddSecurityScheme {
    pub fn new(security_scheme: SecurityScheme, name: impl Into<String>) -> Self {
        Self {
            security_scheme,
            name: name.into(),
        }
    }
}

#[async_trait]
impl DocumentTransformer for AddSecurityScheme {
    async fn transform(
        &self,
        document: &mut OpenApiDocument,
        _cancel: &CancellationToken,
    ) -> Result<(), AmendError> {
        let components = document.components.get_or_insert_with(Components::default);
        scheme::register(components, self.security_scheme.clone(), Some(&self.name))?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::openapi::SecuritySchemeType;

    #[tokio::test]
    async fn test_set_info_with_explicit_version() {
        let mut document = OpenApiDocument::default();
        SetInfo::new("Test API", Some("v2"))
            .transform(&mut document, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(document.info.title, "Test API | v2");
        assert_eq!(document.info.version, "v2");
    }

    #[tokio::test]
    async fn test_set_info_resolves_process_version() {
        let expected = runtime_version();

        let mut document = OpenApiDocument::default();
        SetInfo::new("Test API", None)
            .transform(&mut document, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(document.info.title, format!("Test API | {}", expected));
        assert_eq!(document.info.version, expected);
    }

    #[test]
    fn test_runtime_version_is_never_empty() {
        assert!(!runtime_version().is_empty());
    }

    #[tokio::test]
    async fn test_use_path_base_replaces_servers() {
        let mut document = OpenApiDocument::default();
        document.servers.push(Server::new("/stale"));

        UsePathBase::new("/first")
            .transform(&mut document, &CancellationToken::new())
            .await
            .unwrap();
        UsePathBase::new("/second")
            .transform(&mut document, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(document.servers.len(), 1);
        assert_eq!(document.servers[0].url, "/second");
    }

    #[tokio::test]
    async fn test_add_security_scheme_creates_components() {
        let mut document = OpenApiDocument::default();
        AddSecurityScheme::new(SecurityScheme::http_bearer(), "http")
            .transform(&mut document, &CancellationToken::new())
            .await
            .unwrap();

        let components = document.components.as_ref().unwrap();
        let scheme = components.security_schemes.get("http").unwrap();
        assert_eq!(scheme.type_, Some(SecuritySchemeType::Http));
        assert_eq!(scheme.scheme.as_deref(), Some("bearer"));
    }

    #[tokio::test]
    async fn test_add_security_scheme_rejects_duplicate() {
        let mut document = OpenApiDocument::default();
        let transformer = AddSecurityScheme::new(SecurityScheme::http_bearer(), "http");
        transformer
            .transform(&mut document, &CancellationToken::new())
            .await
            .unwrap();

        let result = transformer
            .transform(&mut document, &CancellationToken::new())
            .await;
        assert_eq!(
            result,
            Err(AmendError::DuplicateSchemeName(String::from("http")))
        );
    }
}
