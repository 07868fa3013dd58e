//! Database facade that owns the record pipeline.
//!
//! [`Database::load`] wires the services from configuration;
//! [`Database::open`] checks connectivity under the start-up retry budget
//! and then registers the hooks. Registration happens at most once per
//! [`HookRegistry`], which is process-wide unless a facade is built with
//! [`Database::with_registry`].

use std::sync::Arc;
use std::time::Duration;

use enverify_common::resilience::{with_retries, RetryConfig};
use enverify_core::{
    CacheInvalidator, Cacher, FieldEncryptor, FieldRegistry, HmacSigner, KeyManager,
    MutationObserver, RecordPipeline, SecretResolver, SecretStore,
};
use enverify_domain::{
    Config, EnverifyError, ResolvedSecretSet, Result, SecretClass, StartupConfig,
};
use prometheus::Registry;
use tracing::{info, instrument, warn};

use super::probes::ConnectivityProbe;
use super::registration::HookRegistry;
use crate::cache::InMemoryCacher;
use crate::errors::StartupError;
use crate::keys::LocalKeyManager;
use crate::observability::metrics::{AuditEntryObserver, AuditMetrics};
use crate::secrets::InMemorySecretStore;

/// Deadline for the per-class key accessors.
pub const SECRET_ACCESS_DEADLINE: Duration = Duration::from_secs(5);

/// External collaborators the facade is wired to.
pub struct Collaborators {
    pub key_manager: Arc<dyn KeyManager>,
    pub secret_store: Arc<dyn SecretStore>,
    pub cacher: Arc<dyn Cacher>,
    pub observers: Vec<Arc<dyn MutationObserver>>,
}

impl Collaborators {
    pub fn new(
        key_manager: Arc<dyn KeyManager>,
        secret_store: Arc<dyn SecretStore>,
        cacher: Arc<dyn Cacher>,
    ) -> Self {
        Self { key_manager, secret_store, cacher, observers: Vec::new() }
    }

    /// Local key manager, inline secrets and an in-process cache.
    pub fn local(config: &Config) -> Result<Self> {
        Ok(Self::new(
            Arc::new(LocalKeyManager::from_config(&config.keys)?),
            Arc::new(InMemorySecretStore::from_config(&config.secrets)?),
            Arc::new(InMemoryCacher::default()),
        ))
    }

    pub fn with_observer(mut self, observer: Arc<dyn MutationObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Register the audit counter with `registry` and observe audit creates.
    pub fn with_audit_metrics(self, registry: &Registry) -> Result<Self> {
        let metrics = Arc::new(AuditMetrics::new(registry)?);
        Ok(self.with_observer(Arc::new(AuditEntryObserver::new(metrics))))
    }
}

pub struct Database {
    config: Config,
    resolver: Arc<SecretResolver>,
    pipeline: Arc<RecordPipeline>,
    registry: Arc<HookRegistry>,
}

impl Database {
    /// Validate `config` and build every service, registering into the
    /// process-wide slot.
    ///
    /// # Errors
    /// `Configuration` when the configuration is invalid.
    pub fn load(config: Config, collaborators: Collaborators) -> Result<Self> {
        Self::with_registry(config, collaborators, HookRegistry::process())
    }

    /// As [`Database::load`], registering into `registry`.
    pub fn with_registry(
        config: Config,
        collaborators: Collaborators,
        registry: Arc<HookRegistry>,
    ) -> Result<Self> {
        let fields = Arc::new(FieldRegistry::from_config(&config)?);
        let resolver =
            Arc::new(SecretResolver::from_config(collaborators.secret_store, &config.secrets));
        let encryptor = FieldEncryptor::new(
            collaborators.key_manager,
            config.keys.encryption_key_id.clone(),
            config.keys.crypto_timeout(),
        );

        let pipeline = collaborators.observers.into_iter().fold(
            RecordPipeline::new(
                fields,
                encryptor,
                HmacSigner::new(resolver.clone()),
                CacheInvalidator::new(collaborators.cacher),
            ),
            RecordPipeline::with_observer,
        );

        info!(
            tables = pipeline.registry().tables().len(),
            key_id = %config.keys.encryption_key_id,
            "Field encryption configured"
        );

        Ok(Self { config, resolver, pipeline: Arc::new(pipeline), registry })
    }

    /// Check every probe under the start-up retry budget, then register the
    /// hooks.
    ///
    /// Concurrent calls on facades sharing a registry are serialized; only
    /// the first runs its probes.
    ///
    /// # Errors
    /// - `StartupError::Connectivity` when a probe is rejected or exhausts
    ///   its attempts
    /// - `Configuration("hooks already registered")` once the registry holds
    ///   hooks
    #[instrument(skip_all, fields(probes = probes.len()))]
    pub async fn open(
        &self,
        probes: &[Arc<dyn ConnectivityProbe>],
    ) -> std::result::Result<Arc<RecordPipeline>, StartupError> {
        let retry = retry_config(&self.config.startup)?;
        let checks = async move {
            for probe in probes {
                with_retries(retry.clone(), move || probe.check()).await.map_err(|source| {
                    warn!(probe = probe.name(), attempts = source.attempts(), "Connectivity check failed");
                    StartupError::Connectivity { probe: probe.name().to_string(), source }
                })?;
                info!(probe = probe.name(), "Connectivity check passed");
            }
            Ok(())
        };

        let hooks = self.registry.register(self.pipeline.clone(), checks).await?;
        info!("Record hooks registered");
        Ok(hooks)
    }

    /// The registered pipeline.
    ///
    /// # Errors
    /// `Configuration` before [`Database::open`] succeeds.
    pub fn hooks(&self) -> Result<&RecordPipeline> {
        self.registry
            .get()
            .map(Arc::as_ref)
            .ok_or_else(|| EnverifyError::config("hooks not registered; call open first"))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn resolver(&self) -> &Arc<SecretResolver> {
        &self.resolver
    }

    async fn keys(&self, class: SecretClass) -> Result<Arc<ResolvedSecretSet>> {
        self.resolver.resolve_within(class, SECRET_ACCESS_DEADLINE).await
    }

    pub async fn cookie_keys(&self) -> Result<Arc<ResolvedSecretSet>> {
        self.keys(SecretClass::CookieKeys).await
    }

    pub async fn api_key_database_hmac(&self) -> Result<Arc<ResolvedSecretSet>> {
        self.keys(SecretClass::ApiKeyDatabaseHmac).await
    }

    pub async fn api_key_signature_hmac(&self) -> Result<Arc<ResolvedSecretSet>> {
        self.keys(SecretClass::ApiKeySignatureHmac).await
    }

    pub async fn phone_number_database_hmac(&self) -> Result<Arc<ResolvedSecretSet>> {
        self.keys(SecretClass::PhoneNumberDatabaseHmac).await
    }

    pub async fn verification_code_database_hmac(&self) -> Result<Arc<ResolvedSecretSet>> {
        self.keys(SecretClass::VerificationCodeDatabaseHmac).await
    }

    /// Signature to store for a new verification code.
    pub async fn generate_verification_code_hmac(&self, code: &str) -> Result<String> {
        HmacSigner::sign(code, &*self.verification_code_database_hmac().await?)
    }

    /// Every signature a stored verification code may carry.
    pub async fn all_verification_code_hmacs(&self, code: &str) -> Result<Vec<String>> {
        HmacSigner::all_signatures(code, &*self.verification_code_database_hmac().await?)
    }

    pub async fn generate_phone_number_hmac(&self, phone: &str) -> Result<String> {
        HmacSigner::sign(phone, &*self.phone_number_database_hmac().await?)
    }

    pub async fn all_phone_number_hmacs(&self, phone: &str) -> Result<Vec<String>> {
        HmacSigner::all_signatures(phone, &*self.phone_number_database_hmac().await?)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("pipeline", &self.pipeline)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

fn retry_config(startup: &StartupConfig) -> Result<RetryConfig> {
    RetryConfig::builder()
        .max_attempts(startup.max_attempts)
        .delay(startup.retry_delay())
        .build()
        .map_err(|e| EnverifyError::Configuration(format!("startup: {e:?}")))
}
