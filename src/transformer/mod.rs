pub mod document;
pub mod operation;

use crate::error::AmendError;
use crate::metadata::EndpointDescriptor;
use crate::openapi::{OAuthFlows, OpenApiDocument, Operation, SecurityScheme};
use crate::scheme;
use crate::transformer::document::{AddSecurityScheme, SetInfo, UsePathBase};
use crate::transformer::operation::{AuthorizeCheck, ClaimsBindingCheck, SchemeReference};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// A registered callback that mutates the whole in-progress document.
///
/// Transformers run sequentially in registration order; later transformers
/// may depend on earlier mutations. An error aborts generation for the
/// document and surfaces to the generation caller.
#[async_trait]
pub trait DocumentTransformer: Send + Sync {
    async fn transform(
        &self,
        document: &mut OpenApiDocument,
        cancel: &CancellationToken,
    ) -> Result<(), AmendError>;
}

/// A registered callback that mutates one operation's entry in the document.
///
/// Invoked once per discovered endpoint, in registration order within that
/// endpoint. The cancellation signal must be observed during bulk mutation.
#[async_trait]
pub trait OperationTransformer: Send + Sync {
    async fn transform(
        &self,
        operation: &mut Operation,
        descriptor: &EndpointDescriptor,
        cancel: &CancellationToken,
    ) -> Result<(), AmendError>;
}

#[async_trait]
impl<F> DocumentTransformer for F
where
    F: Fn(&mut OpenApiDocument) -> Result<(), AmendError> + Send + Sync,
{
    async fn transform(
        &self,
        document: &mut OpenApiDocument,
        _cancel: &CancellationToken,
    ) -> Result<(), AmendError> {
        self(document)
    }
}

#[async_trait]
impl<F> OperationTransformer for F
where
    F: Fn(&mut Operation, &EndpointDescriptor) -> Result<(), AmendError> + Send + Sync,
{
    async fn transform(
        &self,
        operation: &mut Operation,
        descriptor: &EndpointDescriptor,
        _cancel: &CancellationToken,
    ) -> Result<(), AmendError> {
        self(operation, descriptor)
    }
}

pub(crate) fn ensure_active(cancel: &CancellationToken, context: &str) -> Result<(), AmendError> {
    if cancel.is_cancelled() {
        return Err(AmendError::cancelled(context));
    }
    Ok(())
}

/// Per-document configuration: the ordered transformer pipelines plus the
/// registration API application code calls at startup.
///
/// Options are assembled once before any generation request and treated as
/// read-only thereafter; each generation request runs against its own
/// document instance.
pub struct OpenApiOptions {
    document_name: String,
    document_transformers: Vec<Box<dyn DocumentTransformer>>,
    operation_transformers: Vec<Box<dyn OperationTransformer>>,
}

impl OpenApiOptions {
    pub fn new(document_name: impl Into<String>) -> Self {
        Self {
            document_name: document_name.into(),
            document_transformers: Vec::new(),
            operation_transformers: Vec::new(),
        }
    }

    pub fn document_name(&self) -> &str {
        &self.document_name
    }

    /// Appends a document transformer to the pipeline.
    pub fn add_document_transformer(
        &mut self,
        transformer: impl DocumentTransformer + 'static,
    ) -> &mut Self {
        self.document_transformers.push(Box::new(transformer));
        self
    }

    /// Appends an operation transformer to the pipeline.
    pub fn add_operation_transformer(
        &mut self,
        transformer: impl OperationTransformer + 'static,
    ) -> &mut Self {
        self.operation_transformers.push(Box::new(transformer));
        self
    }

    /// Sets the document title and version.
    ///
    /// The effective version is the explicit one when given, otherwise the
    /// running process's version with a literal `1.0.0` fallback.
    pub fn set_info(&mut self, title: impl Into<String>, version: Option<&str>) -> &mut Self {
        self.add_document_transformer(SetInfo::new(title, version))
    }

    /// Replaces the server list with a single entry for the given path base.
    pub fn use_path_base(&mut self, base: impl Into<String>) -> &mut Self {
        self.add_document_transformer(UsePathBase::new(base))
    }

    pub fn add_api_key(&mut self) -> (SecurityScheme, String) {
        self.add_security_scheme(SecurityScheme::api_key(), None)
    }

    pub fn add_api_key_with(
        &mut self,
        name: Option<&str>,
        configure: impl FnOnce(&mut SecurityScheme),
    ) -> (SecurityScheme, String) {
        let mut security_scheme = SecurityScheme::api_key();
        configure(&mut security_scheme);
        self.add_security_scheme(security_scheme, name)
    }

    pub fn add_http(&mut self) -> (SecurityScheme, String) {
        self.add_security_scheme(SecurityScheme::http_bearer(), None)
    }

    pub fn add_http_with(
        &mut self,
        name: Option<&str>,
        configure: impl FnOnce(&mut SecurityScheme),
    ) -> (SecurityScheme, String) {
        let mut security_scheme = SecurityScheme::http_bearer();
        configure(&mut security_scheme);
        self.add_security_scheme(security_scheme, name)
    }

    pub fn add_oauth2(&mut self, flows: OAuthFlows) -> (SecurityScheme, String) {
        self.add_security_scheme(SecurityScheme::oauth2(flows), None)
    }

    pub fn add_oauth2_with(
        &mut self,
        flows: OAuthFlows,
        name: Option<&str>,
        configure: impl FnOnce(&mut SecurityScheme),
    ) -> (SecurityScheme, String) {
        let mut security_scheme = SecurityScheme::oauth2(flows);
        configure(&mut security_scheme);
        self.add_security_scheme(security_scheme, name)
    }

    pub fn add_open_id_connect(&mut self, url: impl Into<String>) -> (SecurityScheme, String) {
        self.add_security_scheme(SecurityScheme::open_id_connect(url), None)
    }

    pub fn add_open_id_connect_with(
        &mut self,
        url: impl Into<String>,
        name: Option<&str>,
        configure: impl FnOnce(&mut SecurityScheme),
    ) -> (SecurityScheme, String) {
        let mut security_scheme = SecurityScheme::open_id_connect(url);
        configure(&mut security_scheme);
        self.add_security_scheme(security_scheme, name)
    }

    /// Registers a document transformer that inserts the scheme into the
    /// document's scheme map under the derived name.
    ///
    /// The name is derived eagerly and returned with a copy of the scheme so
    /// the pair can be handed to [`Self::with_authorize_check`]. Insertion
    /// happens at generation time; a duplicate name surfaces there as
    /// [`AmendError::DuplicateSchemeName`].
    pub fn add_security_scheme(
        &mut self,
        security_scheme: SecurityScheme,
        name: Option<&str>,
    ) -> (SecurityScheme, String) {
        let name = scheme::derive_scheme_name(&security_scheme, name);
        self.add_document_transformer(AddSecurityScheme::new(security_scheme.clone(), &name));
        (security_scheme, name)
    }

    /// Registers the phantom-parameter pruning check.
    pub fn with_claims_binding_check(&mut self) -> &mut Self {
        self.add_operation_transformer(ClaimsBindingCheck)
    }

    /// Registers an authorize check resolving to the given scheme reference.
    pub fn with_authorize_check(&mut self, reference: impl Into<SchemeReference>) -> &mut Self {
        let reference = reference.into();
        self.with_authorize_check_with(move || Some(reference.clone()))
    }

    /// Registers an authorize check with a lazy scheme resolver.
    pub fn with_authorize_check_with(
        &mut self,
        resolver: impl Fn() -> Option<SchemeReference> + Send + Sync + 'static,
    ) -> &mut Self {
        self.add_operation_transformer(AuthorizeCheck::new(resolver))
    }

    /// Runs every document transformer, in registration order.
    pub async fn transform_document(
        &self,
        document: &mut OpenApiDocument,
        cancel: &CancellationToken,
    ) -> Result<(), AmendError> {
        for transformer in &self.document_transformers {
            ensure_active(cancel, "document transformation")?;
            transformer.transform(document, cancel).await?;
        }
        Ok(())
    }

    /// Runs every operation transformer against one operation, in
    /// registration order.
    pub async fn transform_operation(
        &self,
        operation: &mut Operation,
        descriptor: &EndpointDescriptor,
        cancel: &CancellationToken,
    ) -> Result<(), AmendError> {
        for transformer in &self.operation_transformers {
            ensure_active(cancel, "operation transformation")?;
            transformer
                .transform(operation, descriptor, cancel)
                .await?;
        }
        Ok(())
    }

    /// Drives one generation request: document transformers first, then the
    /// operation transformers for each endpoint descriptor.
    ///
    /// `None` means the host failed to supply a document for this document
    /// name. Descriptors with no matching operation in the document are
    /// skipped.
    pub async fn generate(
        &self,
        document: Option<OpenApiDocument>,
        endpoints: &[EndpointDescriptor],
        cancel: &CancellationToken,
    ) -> Result<OpenApiDocument, AmendError> {
        let mut document =
            document.ok_or_else(|| AmendError::missing_document(&self.document_name))?;
        self.transform_document(&mut document, cancel).await?;

        for descriptor in endpoints {
            let operation = document
                .paths
                .get_mut(descriptor.route())
                .and_then(|item| item.operation_mut(descriptor.method()));
            let Some(operation) = operation else {
                log::debug!(
                    "No operation at {} {} in document '{}'",
                    descriptor.method(),
                    descriptor.route(),
                    self.document_name
                );
                continue;
            };
            self.transform_operation(operation, descriptor, cancel)
                .await?;
        }
        Ok(document)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::metadata::{Authorize, EndpointMetadata};
    use crate::openapi::{PathItem, SecuritySchemeType};
    use http::Method;

    fn document_with_get(route: &str) -> OpenApiDocument {
        let mut document = OpenApiDocument::default();
        let mut item = PathItem::default();
        item.get = Some(Operation::default());
        document.paths.insert(String::from(route), item);
        document
    }

    #[tokio::test]
    async fn test_generate_without_document_fails() {
        let options = OpenApiOptions::new("v1");
        let result = options
            .generate(None, &[], &CancellationToken::new())
            .await;
        assert_eq!(
            result.unwrap_err(),
            AmendError::MissingDocument(String::from("v1"))
        );
    }

    #[tokio::test]
    async fn test_generate_applies_both_pipelines() {
        let mut options = OpenApiOptions::new("v1");
        let oauth2 = options.add_oauth2(OAuthFlows::default());
        options
            .set_info("Test API", Some("v1"))
            .use_path_base("/base")
            .with_authorize_check(oauth2);

        let endpoint = EndpointDescriptor::new(Method::GET, "/items").with_metadata(
            EndpointMetadata::new()
                .with_authorization(Authorize::default())
                .with_scopes(["read"]),
        );

        let document = options
            .generate(
                Some(document_with_get("/items")),
                &[endpoint],
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(document.info.title, "Test API | v1");
        assert_eq!(document.servers.len(), 1);
        assert!(
            document
                .components
                .as_ref()
                .unwrap()
                .security_schemes
                .contains_key("oauth2")
        );

        let operation = document.paths.get("/items").unwrap().get.as_ref().unwrap();
        assert!(operation.responses.contains_key("401"));
        assert_eq!(
            operation.security.as_ref().unwrap()[0]
                .schemes
                .get("oauth2")
                .unwrap(),
            &vec![String::from("read")]
        );
    }

    #[tokio::test]
    async fn test_generate_skips_unmatched_descriptors() {
        let mut options = OpenApiOptions::new("v1");
        options.with_claims_binding_check();

        let endpoint = EndpointDescriptor::new(Method::POST, "/missing");
        let document = options
            .generate(
                Some(document_with_get("/items")),
                &[endpoint],
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert!(document.paths.contains_key("/items"));
    }

    #[tokio::test]
    async fn test_document_transformers_run_in_registration_order() {
        let mut options = OpenApiOptions::new("v1");
        options
            .add_document_transformer(|document: &mut OpenApiDocument| -> Result<(), AmendError> {
                document.info.summary = Some(String::from("first"));
                Ok(())
            })
            .add_document_transformer(|document: &mut OpenApiDocument| -> Result<(), AmendError> {
                document.info.summary = Some(format!(
                    "{},second",
                    document.info.summary.as_deref().unwrap_or_default()
                ));
                Ok(())
            });

        let mut document = OpenApiDocument::default();
        options
            .transform_document(&mut document, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(document.info.summary.as_deref(), Some("first,second"));
    }

    #[tokio::test]
    async fn test_cancelled_token_aborts_pipeline() {
        let mut options = OpenApiOptions::new("v1");
        options.set_info("Test API", Some("v1"));

        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut document = OpenApiDocument::default();
        let result = options.transform_document(&mut document, &cancel).await;
        assert!(matches!(result, Err(AmendError::Cancelled(_))));
        assert!(document.info.title.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_scheme_registration_surfaces_at_generation() {
        let mut options = OpenApiOptions::new("v1");
        options.add_http();
        options.add_http();

        let result = options
            .generate(
                Some(OpenApiDocument::default()),
                &[],
                &CancellationToken::new(),
            )
            .await;
        assert_eq!(
            result.unwrap_err(),
            AmendError::DuplicateSchemeName(String::from("http"))
        );
    }

    #[tokio::test]
    async fn test_add_security_scheme_returns_derived_name() {
        let mut options = OpenApiOptions::new("v1");
        let (scheme, name) = options.add_open_id_connect("http://localhost");
        assert_eq!(name, "openIdConnect");
        assert_eq!(scheme.type_, Some(SecuritySchemeType::OpenIdConnect));

        let (_, named) = options.add_http_with(Some("bearer"), |scheme| {
            scheme.bearer_format = Some(String::from("JWT"));
        });
        assert_eq!(named, "bearer");
    }
}
