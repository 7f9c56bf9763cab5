use serde::{Deserialize, Serialize};

use crate::core::guards::BadgeVersion;

/// Errors and warnings gathered by one or more checks.
///
/// Checks never stop at the first problem: each returns its own [Findings], and the results are
/// concatenated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Findings {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Append the findings of another check.
    pub fn extend(&mut self, other: Findings) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// The outcome of one validation stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl From<Findings> for ValidationReport {
    fn from(Findings { errors, warnings }: Findings) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

/// How a badge is meant to be verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationMethod {
    /// The Assertion is hosted at its `id` URL.
    Hosted,
    /// The badge carries a signature or proof.
    Signed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpirationStatus {
    Valid,
    Expired,
    /// The badge has no expiration date.
    NotApplicable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevocationStatus {
    Valid,
    Revoked,
    /// Revocation could not be determined.
    Unknown,
}

/// The complete verification report for a badge.
///
/// `is_valid` holds exactly when both stage reports are valid and there are no top-level errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge_version: Option<BadgeVersion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_method: Option<VerificationMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_status: Option<ExpirationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revocation_status: Option<RevocationStatus>,
    pub structure_validation: ValidationReport,
    pub content_validation: ValidationReport,
}

impl VerificationResult {
    /// A result carrying a single error, for failures of the verification process itself.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
            ..Default::default()
        }
    }

    /// Roll the content findings up into the top-level lists when content validation failed,
    /// then settle the overall verdict.
    pub(crate) fn conclude(mut self) -> Self {
        if !self.content_validation.is_valid {
            self.errors
                .extend(self.content_validation.errors.iter().cloned());
            self.warnings
                .extend(self.content_validation.warnings.iter().cloned());
        }

        self.is_valid = self.structure_validation.is_valid
            && self.content_validation.is_valid
            && self.errors.is_empty();
        self
    }
}
