use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    config::Config,
    core::{
        guards::Badge,
        util::{Clock, SystemClock},
    },
    json_schema_validation::{JsonSchemaValidator, StructureValidator},
};

use result::{
    ExpirationStatus, Findings, RevocationStatus, ValidationReport, VerificationMethod,
    VerificationResult,
};

mod lifecycle;
mod ob2;
mod ob3;
pub mod result;

/// Errors that abort a verification run.
///
/// These never escape [BadgeVerifier::verify]; they are reported as a failed
/// [VerificationResult] with a single `Verification error: ...` message.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("structural validation could not run: {0:#}")]
    Structure(anyhow::Error),

    #[error("payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// What the content stage of either format produces.
#[derive(Debug, Default)]
pub(crate) struct ContentOutcome {
    /// Findings reported under `contentValidation`.
    pub content: Findings,
    /// Warnings about the verification process itself, reported at the top level.
    pub warnings: Vec<String>,
    pub verification_method: Option<VerificationMethod>,
    pub expiration_status: Option<ExpirationStatus>,
    pub revocation_status: Option<RevocationStatus>,
}

/// An Open Badges verifier.
///
/// Verification runs in two stages. The structural stage checks the payload against the schema
/// of its format; if that fails, the content stage is skipped. The content stage checks each part
/// of the badge, determines how it is meant to be verified, and checks expiration and revocation.
///
/// ```ignore
/// let verifier = BadgeVerifier::builder()
///     .with_clock(Arc::new(FixedClock(issued_at)))
///     .build();
///
/// let result = verifier.verify(&payload).await;
/// if !result.is_valid {
///     for error in &result.errors {
///         eprintln!("{error}");
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BadgeVerifier {
    structure_validator: Arc<dyn StructureValidator + Send + Sync>,
    clock: Arc<dyn Clock + Send + Sync>,
    config: Config,
}

impl Default for BadgeVerifier {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl BadgeVerifier {
    /// Build a new verifier.
    pub fn builder() -> BadgeVerifierBuilder {
        BadgeVerifierBuilder::default()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Verify a badge payload.
    ///
    /// Never fails: problems with the badge, and with the verification process itself, are
    /// reported in the returned [VerificationResult].
    pub async fn verify(&self, payload: &Value) -> VerificationResult {
        match self.try_verify(payload) {
            Ok(result) => {
                debug!(
                    is_valid = result.is_valid,
                    version = ?result.badge_version,
                    errors = result.errors.len(),
                    warnings = result.warnings.len(),
                    "badge verified"
                );
                result
            }
            Err(e) => Self::failure(e),
        }
    }

    /// Verify a badge given as JSON text.
    pub async fn verify_str(&self, payload: &str) -> VerificationResult {
        match serde_json::from_str::<Value>(payload) {
            Ok(payload) => self.verify(&payload).await,
            Err(e) => Self::failure(e.into()),
        }
    }

    fn failure(e: VerificationError) -> VerificationResult {
        warn!("badge verification aborted: {e}");
        VerificationResult::failure(format!("Verification error: {e}"))
    }

    fn try_verify(&self, payload: &Value) -> Result<VerificationResult, VerificationError> {
        let mut result = VerificationResult::default();

        let structure = self
            .structure_validator
            .validate(payload)
            .map_err(VerificationError::Structure)?;

        result.badge_version = structure.version;

        if !structure.is_valid {
            debug!(
                errors = structure.errors.len(),
                "structural validation failed, skipping content validation"
            );
            result.errors.push("Badge structure validation failed".into());
            result.errors.extend(structure.errors.iter().cloned());
            result.warnings.extend(structure.warnings.iter().cloned());
            result.structure_validation = ValidationReport {
                is_valid: false,
                errors: structure.errors,
                warnings: structure.warnings,
            };
            return Ok(result.conclude());
        }

        result.structure_validation = ValidationReport {
            is_valid: true,
            errors: structure.errors,
            warnings: structure.warnings,
        };

        let now = self.clock.now();
        let badge = Badge::classify(payload);
        let outcome = match badge {
            Badge::Ob2(assertion) => ob2::verify(&assertion, now),
            Badge::Ob3(credential) => ob3::verify(&credential, &self.config, now),
            Badge::Unknown => {
                result.errors.push("Unknown badge format".into());
                return Ok(result.conclude());
            }
        };

        let ContentOutcome {
            content,
            warnings,
            verification_method,
            expiration_status,
            revocation_status,
        } = outcome;

        result.badge_version = badge.format().version();
        result.verification_method = verification_method;
        result.expiration_status = expiration_status;
        result.revocation_status = revocation_status;
        result.warnings.extend(warnings);
        result.content_validation = content.into();

        Ok(result.conclude())
    }
}

/// Builder struct for [BadgeVerifier].
#[derive(Debug, Clone, Default)]
pub struct BadgeVerifierBuilder {
    structure_validator: Option<Arc<dyn StructureValidator + Send + Sync>>,
    clock: Option<Arc<dyn Clock + Send + Sync>>,
    config: Option<Config>,
}

impl BadgeVerifierBuilder {
    /// Build the verifier. Anything left unset falls back to its default.
    pub fn build(self) -> BadgeVerifier {
        let Self {
            structure_validator,
            clock,
            config,
        } = self;

        let config = config.unwrap_or_default();

        let structure_validator: Arc<dyn StructureValidator + Send + Sync> =
            match structure_validator {
                Some(structure_validator) => structure_validator,
                None => Arc::new(JsonSchemaValidator::new(config.ob2_context.clone())),
            };

        let clock: Arc<dyn Clock + Send + Sync> = match clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };

        BadgeVerifier {
            structure_validator,
            clock,
            config,
        }
    }

    /// Set the [StructureValidator] used by the structural stage. Defaults to
    /// [JsonSchemaValidator].
    pub fn with_structure_validator(
        mut self,
        structure_validator: Arc<dyn StructureValidator + Send + Sync>,
    ) -> Self {
        self.structure_validator = Some(structure_validator);
        self
    }

    /// Set the [Clock] that expiration is checked against. Defaults to [SystemClock].
    pub fn with_clock(mut self, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }
}
