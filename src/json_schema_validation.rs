//! Structural validation of badge payloads.
//!
//! This is the first stage of verification: it decides whether a payload has the overall shape of
//! an Open Badges 2.0 Assertion or an Open Badges 3.0 credential, using JSON Schemas embedded in
//! the crate. Deeper semantic checks are left to the [verifier](crate::verifier).

use std::{
    fmt::Debug,
    sync::{Arc, OnceLock},
};

use anyhow::Result;
use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{
    guards::BadgeVersion,
    ob2::OB2_CONTEXT,
    object::{as_object, ObjectExt},
};

const OB2_ASSERTION_SCHEMA: &str = include_str!("schemas/ob2_assertion.schema.json");
const OB3_CREDENTIAL_SCHEMA: &str = include_str!("schemas/ob3_credential.schema.json");

type CompiledSchema = Result<JSONSchema, Arc<SchemaError>>;

/// Compiled once per process and shared by every [JsonSchemaValidator].
static OB2_ASSERTION: OnceLock<CompiledSchema> = OnceLock::new();
static OB3_CREDENTIAL: OnceLock<CompiledSchema> = OnceLock::new();

/// The outcome of structural validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// The version whose schema the payload was checked against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<BadgeVersion>,
}

/// Structural validator, the first stage of [BadgeVerifier](crate::verifier::BadgeVerifier).
pub trait StructureValidator: Debug + Send + Sync {
    /// Check the overall shape of a payload.
    ///
    /// Returns an error only when the validator itself cannot run; a malformed payload is
    /// reported through [StructureReport::is_valid].
    fn validate(&self, payload: &Value) -> Result<StructureReport>;
}

/// Errors raised while preparing the embedded schemas.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("failed to parse the {0} schema: {1}")]
    Parse(&'static str, #[source] serde_json::Error),

    #[error("failed to compile the {0} schema: {1}")]
    Compile(&'static str, String),
}

/// [StructureValidator] backed by the OB2 Assertion and OB3 credential JSON Schemas.
#[derive(Debug, Clone)]
pub struct JsonSchemaValidator {
    ob2_context: String,
}

impl Default for JsonSchemaValidator {
    fn default() -> Self {
        Self::new(OB2_CONTEXT.to_owned())
    }
}

impl JsonSchemaValidator {
    /// Creates a validator that expects OB2 Assertions to use the given `@context`.
    pub fn new(ob2_context: String) -> Self {
        Self { ob2_context }
    }

    fn ob2_schema() -> Result<&'static JSONSchema, Arc<SchemaError>> {
        Self::cached(&OB2_ASSERTION, "Open Badges 2.0 Assertion", OB2_ASSERTION_SCHEMA)
    }

    fn ob3_schema() -> Result<&'static JSONSchema, Arc<SchemaError>> {
        Self::cached(&OB3_CREDENTIAL, "Open Badges 3.0 credential", OB3_CREDENTIAL_SCHEMA)
    }

    fn cached(
        cell: &'static OnceLock<CompiledSchema>,
        name: &'static str,
        text: &str,
    ) -> Result<&'static JSONSchema, Arc<SchemaError>> {
        cell.get_or_init(|| {
            tracing::debug!("compiling the {name} schema");
            Self::compile(name, text).map_err(Arc::new)
        })
        .as_ref()
        .map_err(Arc::clone)
    }

    fn compile(name: &'static str, text: &str) -> Result<JSONSchema, SchemaError> {
        let schema: Value =
            serde_json::from_str(text).map_err(|e| SchemaError::Parse(name, e))?;
        JSONSchema::compile(&schema).map_err(|e| SchemaError::Compile(name, e.to_string()))
    }

    fn check(schema: &JSONSchema, payload: &Value, report: &mut StructureReport) {
        if let Err(errors) = schema.validate(payload) {
            for error in errors {
                let path = error.instance_path.to_string();
                if path.is_empty() {
                    report.errors.push(error.to_string());
                } else {
                    report.errors.push(format!("{path}: {error}"));
                }
            }
        }
        report.is_valid = report.errors.is_empty();
    }

    fn ob2_warnings(&self, payload: &Value, report: &mut StructureReport) {
        match payload.get("@context") {
            None => report
                .warnings
                .push("Assertion @context is not specified".into()),
            Some(Value::String(context)) if *context == self.ob2_context => {}
            Some(Value::String(context)) => report
                .warnings
                .push(format!("Unexpected Open Badges 2.0 @context: {context}")),
            Some(_) => {}
        }
    }

    fn ob3_warnings(payload: &Value, report: &mut StructureReport) {
        if as_object(payload).is_some_and(|object| !object.has("id")) {
            report
                .warnings
                .push("Credential id is not specified".into());
        }
    }
}

impl StructureValidator for JsonSchemaValidator {
    fn validate(&self, payload: &Value) -> Result<StructureReport> {
        let mut report = StructureReport::default();

        match payload.get("type") {
            Some(Value::String(_)) => {
                let schema = Self::ob2_schema()?;
                report.version = Some(BadgeVersion::Ob2);
                Self::check(schema, payload, &mut report);
                self.ob2_warnings(payload, &mut report);
            }
            Some(Value::Array(_)) => {
                let schema = Self::ob3_schema()?;
                report.version = Some(BadgeVersion::Ob3);
                Self::check(schema, payload, &mut report);
                Self::ob3_warnings(payload, &mut report);
            }
            _ => {
                report.errors.push(
                    "Unrecognized badge format: expected an Open Badges 2.0 Assertion or an Open Badges 3.0 VerifiableCredential"
                        .into(),
                );
            }
        }

        tracing::debug!(
            version = ?report.version,
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "structural validation complete"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;

    #[test]
    fn embedded_schemas_compile() -> Result<()> {
        JsonSchemaValidator::compile("OB2", OB2_ASSERTION_SCHEMA)?;
        JsonSchemaValidator::compile("OB3", OB3_CREDENTIAL_SCHEMA)?;
        Ok(())
    }

    #[test]
    fn schemas_are_compiled_once() -> Result<()> {
        let first = JsonSchemaValidator::ob2_schema()?;
        JsonSchemaValidator::default().validate(&json!({ "type": "Assertion" }))?;
        JsonSchemaValidator::new("https://example.org/ob2".into())
            .validate(&json!({ "type": "Assertion" }))?;
        assert!(std::ptr::eq(first, JsonSchemaValidator::ob2_schema()?));

        let first = JsonSchemaValidator::ob3_schema()?;
        JsonSchemaValidator::default().validate(&json!({ "type": ["VerifiableCredential"] }))?;
        assert!(std::ptr::eq(first, JsonSchemaValidator::ob3_schema()?));

        Ok(())
    }

    #[test]
    fn minimal_ob2_passes() -> Result<()> {
        let payload = json!({
            "@context": "https://w3id.org/openbadges/v2",
            "type": "Assertion",
            "recipient": {},
            "badge": "https://example.org/badge",
            "verification": {},
            "issuedOn": "2024-01-01"
        });

        let report = JsonSchemaValidator::default().validate(&payload)?;
        assert!(report.is_valid, "{:?}", report.errors);
        assert_eq!(report.version, Some(BadgeVersion::Ob2));
        assert!(report.warnings.is_empty());

        Ok(())
    }

    #[test]
    fn ob2_shape_errors_are_collected() -> Result<()> {
        let payload = json!({
            "type": "Assertion",
            "recipient": "alice@example.org",
            "badge": 1,
            "verification": {}
        });

        let report = JsonSchemaValidator::default().validate(&payload)?;
        assert!(!report.is_valid);
        assert!(report.errors.len() >= 3, "{:?}", report.errors);
        assert!(report.errors.iter().any(|e| e.contains("recipient")));
        assert_eq!(report.warnings, vec!["Assertion @context is not specified"]);

        Ok(())
    }

    #[test]
    fn ob3_requires_verifiable_credential_type() -> Result<()> {
        let payload = json!({
            "@context": ["https://www.w3.org/2018/credentials/v1"],
            "type": ["OpenBadgeCredential"],
            "issuer": "https://example.org",
            "issuanceDate": "2024-01-01T00:00:00Z",
            "credentialSubject": {}
        });

        let report = JsonSchemaValidator::default().validate(&payload)?;
        assert!(!report.is_valid);
        assert_eq!(report.version, Some(BadgeVersion::Ob3));
        assert_eq!(report.warnings, vec!["Credential id is not specified"]);

        Ok(())
    }

    #[test]
    fn unrecognized_shape() -> Result<()> {
        let report = JsonSchemaValidator::default().validate(&json!({ "foo": "bar" }))?;
        assert!(!report.is_valid);
        assert!(report.version.is_none());
        assert_eq!(report.errors.len(), 1);

        Ok(())
    }
}
