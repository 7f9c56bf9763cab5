//! Structural type-guards for badge payloads.
//!
//! [classify] decides which of the two Open Badges formats a payload is in. The sub-guards perform
//! shallow checks on nested shapes (a non-null object plus the keys that identify it) and are used
//! by the content validation of the [verifier](crate::verifier).

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    ob2::Ob2Assertion,
    ob3::{Ob3Credential, VERIFIABLE_CREDENTIAL_TYPE},
    object::{as_object, ObjectExt, UntypedObject},
};

const ASSERTION_TYPE: &str = "Assertion";

/// The format of a badge payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BadgeFormat {
    /// Open Badges 2.0 Assertion.
    #[serde(rename = "OB2")]
    Ob2,
    /// Open Badges 3.0 Verifiable Credential.
    #[serde(rename = "OB3")]
    Ob3,
    /// Neither of the above.
    Unknown,
}

impl BadgeFormat {
    /// Return the badge version, if the format is a recognized one.
    pub fn version(&self) -> Option<BadgeVersion> {
        match self {
            BadgeFormat::Ob2 => Some(BadgeVersion::Ob2),
            BadgeFormat::Ob3 => Some(BadgeVersion::Ob3),
            BadgeFormat::Unknown => None,
        }
    }
}

/// A recognized Open Badges version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BadgeVersion {
    #[serde(rename = "OB2")]
    Ob2,
    #[serde(rename = "OB3")]
    Ob3,
}

impl fmt::Display for BadgeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BadgeFormat::Ob2 => write!(f, "OB2"),
            BadgeFormat::Ob3 => write!(f, "OB3"),
            BadgeFormat::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A classified badge payload.
///
/// Once classified, downstream code works with the concrete variant rather than the raw payload.
#[derive(Debug, Clone, Copy)]
pub enum Badge<'a> {
    Ob2(Ob2Assertion<'a>),
    Ob3(Ob3Credential<'a>),
    Unknown,
}

impl<'a> Badge<'a> {
    /// Classify a payload. Every payload maps to exactly one variant.
    pub fn classify(payload: &'a Value) -> Self {
        let Some(object) = as_object(payload) else {
            return Badge::Unknown;
        };

        if is_ob2_assertion(object) {
            Badge::Ob2(Ob2Assertion::new(object))
        } else if is_ob3_credential(object) {
            Badge::Ob3(Ob3Credential::new(object))
        } else {
            Badge::Unknown
        }
    }

    /// Return the format of the badge.
    pub fn format(&self) -> BadgeFormat {
        match self {
            Badge::Ob2(_) => BadgeFormat::Ob2,
            Badge::Ob3(_) => BadgeFormat::Ob3,
            Badge::Unknown => BadgeFormat::Unknown,
        }
    }
}

/// Classify a payload without keeping a view on it.
pub fn classify(payload: &Value) -> BadgeFormat {
    Badge::classify(payload).format()
}

/// An OB2 Assertion has `type: "Assertion"` and carries `recipient`, `badge`, `verification`
/// and `issuedOn`. Only presence is checked here.
pub fn is_ob2_assertion(object: &UntypedObject) -> bool {
    object.str_field("type") == Some(ASSERTION_TYPE)
        && object.has_all(&["recipient", "badge", "verification", "issuedOn"])
}

/// An OB3 credential has an `@context`, a `type` array including `VerifiableCredential`, and
/// carries `issuer`, `issuanceDate` and `credentialSubject`.
pub fn is_ob3_credential(object: &UntypedObject) -> bool {
    let has_vc_type = object
        .get("type")
        .and_then(Value::as_array)
        .is_some_and(|types| {
            types
                .iter()
                .any(|t| t.as_str() == Some(VERIFIABLE_CREDENTIAL_TYPE))
        });

    object.has("@context")
        && has_vc_type
        && object.has_all(&["issuer", "issuanceDate", "credentialSubject"])
}

fn is_object_with(value: &Value, keys: &[&str]) -> bool {
    as_object(value).is_some_and(|object| object.has_all(keys))
}

// OB2 sub-guards.

pub fn is_badge(value: &Value) -> bool {
    is_object_with(value, &[])
}

pub fn is_profile(value: &Value) -> bool {
    is_object_with(value, &[])
}

pub fn is_image(value: &Value) -> bool {
    is_object_with(value, &["id"])
}

pub fn is_criteria(value: &Value) -> bool {
    as_object(value).is_some_and(|object| object.has("id") || object.has("narrative"))
}

pub fn is_alignment_object(value: &Value) -> bool {
    is_object_with(value, &["targetName", "targetUrl"])
}

pub fn is_identity_object(value: &Value) -> bool {
    is_object_with(value, &["identity"])
}

pub fn is_verification_object(value: &Value) -> bool {
    is_object_with(value, &[])
}

/// Evidence is shared by both formats.
pub fn is_evidence(value: &Value) -> bool {
    is_object_with(value, &[])
}

// OB3 sub-guards.

pub fn is_issuer(value: &Value) -> bool {
    is_object_with(value, &[])
}

pub fn is_credential_subject(value: &Value) -> bool {
    is_object_with(value, &[])
}

pub fn is_achievement(value: &Value) -> bool {
    is_object_with(value, &[])
}

pub fn is_proof(value: &Value) -> bool {
    is_object_with(value, &[])
}

pub fn is_credential_status(value: &Value) -> bool {
    is_object_with(value, &[])
}

pub fn is_refresh_service(value: &Value) -> bool {
    is_object_with(value, &["id", "type"])
}

pub fn is_terms_of_use(value: &Value) -> bool {
    is_object_with(value, &["type"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ob2() -> Value {
        json!({
            "type": "Assertion",
            "recipient": {},
            "badge": "https://example.org/badge",
            "verification": {},
            "issuedOn": "2024-01-01"
        })
    }

    fn ob3() -> Value {
        json!({
            "@context": [],
            "type": ["VerifiableCredential"],
            "issuer": {},
            "issuanceDate": "2024-01-01",
            "credentialSubject": {}
        })
    }

    #[test]
    fn classifies_each_format() {
        assert_eq!(classify(&ob2()), BadgeFormat::Ob2);
        assert_eq!(classify(&ob3()), BadgeFormat::Ob3);
        assert_eq!(classify(&json!({ "foo": "bar" })), BadgeFormat::Unknown);
    }

    #[test]
    fn classification_is_total() {
        let payloads = [
            Value::Null,
            json!(true),
            json!(12),
            json!("Assertion"),
            json!([ob2()]),
            json!({}),
            json!({ "type": ["Assertion"] }),
        ];

        for payload in payloads {
            assert_eq!(classify(&payload), BadgeFormat::Unknown, "{payload}");
        }
    }

    #[test]
    fn ob2_requires_every_key() {
        for key in ["recipient", "badge", "verification", "issuedOn"] {
            let mut payload = ob2();
            payload.as_object_mut().unwrap().remove(key);
            assert_eq!(classify(&payload), BadgeFormat::Unknown, "missing {key}");
        }
    }

    #[test]
    fn ob3_requires_array_type_with_vc() {
        let mut payload = ob3();
        payload["type"] = json!("VerifiableCredential");
        assert_eq!(classify(&payload), BadgeFormat::Unknown);

        payload["type"] = json!(["OpenBadgeCredential"]);
        assert_eq!(classify(&payload), BadgeFormat::Unknown);

        let mut payload = ob3();
        payload.as_object_mut().unwrap().remove("@context");
        assert_eq!(classify(&payload), BadgeFormat::Unknown);
    }

    #[test]
    fn sub_guards() {
        assert!(is_image(&json!({ "id": "https://x/img.png" })));
        assert!(!is_image(&json!("https://x/img.png")));
        assert!(is_criteria(&json!({ "narrative": "Do the thing" })));
        assert!(!is_criteria(&json!({})));
        assert!(is_alignment_object(&json!({ "targetName": "n", "targetUrl": "u" })));
        assert!(!is_alignment_object(&json!({ "targetName": "n" })));
        assert!(is_identity_object(&json!({ "identity": "a@b.c" })));
        assert!(!is_identity_object(&json!([])));
        assert!(is_refresh_service(&json!({ "id": "x", "type": "y" })));
        assert!(!is_terms_of_use(&json!({ "id": "x" })));
        assert!(!is_proof(&Value::Null));
    }

    #[test]
    fn format_display() {
        assert_eq!(BadgeFormat::Ob2.to_string(), "OB2");
        assert_eq!(serde_json::to_value(BadgeFormat::Ob3).unwrap(), json!("OB3"));
    }
}
