//! Open Badges 3.0.
//!
//! OB3 badges are W3C Verifiable Credentials of type `OpenBadgeCredential`.
//!
//! See: [https://www.imsglobal.org/spec/ob/v3p0/](https://www.imsglobal.org/spec/ob/v3p0/)

use serde_json::Value;

use super::object::{ObjectExt, UntypedObject};

pub const VERIFIABLE_CREDENTIAL_TYPE: &str = "VerifiableCredential";
pub const OPEN_BADGE_CREDENTIAL_TYPE: &str = "OpenBadgeCredential";

/// W3C Verifiable Credentials contexts accepted in `@context`.
pub const CREDENTIAL_CONTEXTS: &[&str] = &[
    "https://www.w3.org/2018/credentials/v1",
    "https://www.w3.org/ns/credentials/v2",
];

/// Open Badges 3.0 contexts accepted in `@context`.
pub const OPEN_BADGES_CONTEXTS: &[&str] = &[
    "https://purl.imsglobal.org/spec/ob/v3p0/context.json",
    "https://purl.imsglobal.org/spec/ob/v3p0/context-3.0.1.json",
    "https://purl.imsglobal.org/spec/ob/v3p0/context-3.0.2.json",
    "https://purl.imsglobal.org/spec/ob/v3p0/context-3.0.3.json",
    "https://imsglobal.github.io/openbadges-specification/context.json",
];

/// Neither `null` nor an empty array.
fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

/// An OB3 Verifiable Credential payload.
#[derive(Debug, Clone, Copy)]
pub struct Ob3Credential<'a>(&'a UntypedObject);

impl<'a> Ob3Credential<'a> {
    pub(crate) fn new(object: &'a UntypedObject) -> Self {
        Self(object)
    }

    /// Return the underlying JSON object.
    pub fn as_object(&self) -> &'a UntypedObject {
        self.0
    }

    pub fn id(&self) -> Option<&'a str> {
        self.0.str_field("id")
    }

    pub fn context(&self) -> Option<&'a Value> {
        self.0.get("@context")
    }

    /// Return the `type` terms. Non-string entries are skipped.
    pub fn types(&self) -> Vec<&'a str> {
        self.0
            .get("type")
            .and_then(Value::as_array)
            .map(|types| types.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn issuer(&self) -> Option<&'a Value> {
        self.0.get("issuer")
    }

    pub fn issuance_date(&self) -> Option<&'a Value> {
        self.0.get("issuanceDate")
    }

    pub fn expiration_date(&self) -> Option<&'a Value> {
        self.0.get("expirationDate").filter(|value| !value.is_null())
    }

    pub fn credential_subject(&self) -> Option<&'a Value> {
        self.0.get("credentialSubject")
    }

    /// Return the achievement of the credential subject, which may be one object or an array.
    pub fn achievement(&self) -> Option<&'a Value> {
        self.0
            .object_field("credentialSubject")?
            .get("achievement")
            .filter(|value| has_content(value))
    }

    /// Return the proof, which may be one object or an array. An empty array counts as absent.
    pub fn proof(&self) -> Option<&'a Value> {
        self.0.get("proof").filter(|value| has_content(value))
    }

    pub fn credential_status(&self) -> Option<&'a Value> {
        self.0.get("credentialStatus").filter(|value| !value.is_null())
    }

    pub fn refresh_service(&self) -> Option<&'a Value> {
        self.0.get("refreshService")
    }

    pub fn terms_of_use(&self) -> Option<&'a Value> {
        self.0.get("termsOfUse")
    }

    pub fn evidence(&self) -> Option<&'a Value> {
        self.0.get("evidence")
    }
}
