//! Open Badges 2.0.
//!
//! [Ob2Assertion] is a borrowed view over a payload already classified as an OB2 Assertion. The
//! typed structs ([BadgeClass], [Assertion], ...) are used when issuing badges.
//!
//! See: [https://www.imsglobal.org/sites/default/files/Badges/OBv2p0Final/index.html](https://www.imsglobal.org/sites/default/files/Badges/OBv2p0Final/index.html)

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    guards::is_badge,
    object::{ObjectExt, UntypedObject},
};

/// The JSON-LD context of Open Badges 2.0.
pub const OB2_CONTEXT: &str = "https://w3id.org/openbadges/v2";

/// An OB2 Assertion payload.
#[derive(Debug, Clone, Copy)]
pub struct Ob2Assertion<'a>(&'a UntypedObject);

/// The `badge` property of an Assertion.
#[derive(Debug, Clone, Copy)]
pub enum BadgeClassRef<'a> {
    /// The BadgeClass is embedded in the Assertion.
    Inline(&'a UntypedObject),
    /// The BadgeClass is referenced by IRI.
    Reference(&'a str),
    /// Neither an object nor a string.
    Invalid(&'a Value),
}

impl<'a> Ob2Assertion<'a> {
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

    pub fn recipient(&self) -> Option<&'a Value> {
        self.0.get("recipient")
    }

    pub fn badge(&self) -> Option<BadgeClassRef<'a>> {
        let value = self.0.get("badge")?;
        Some(match value {
            Value::String(iri) => BadgeClassRef::Reference(iri),
            Value::Object(object) if is_badge(value) => BadgeClassRef::Inline(object),
            other => BadgeClassRef::Invalid(other),
        })
    }

    /// Return the embedded BadgeClass, if the badge is not given by reference.
    pub fn badge_class(&self) -> Option<&'a UntypedObject> {
        match self.badge()? {
            BadgeClassRef::Inline(object) => Some(object),
            _ => None,
        }
    }

    pub fn verification(&self) -> Option<&'a Value> {
        self.0.get("verification")
    }

    pub fn issued_on(&self) -> Option<&'a Value> {
        self.0.get("issuedOn")
    }

    pub fn expires(&self) -> Option<&'a Value> {
        self.0.get("expires").filter(|value| !value.is_null())
    }

    pub fn evidence(&self) -> Option<&'a Value> {
        self.0.get("evidence").filter(|value| !value.is_null())
    }

    /// Whether the Assertion is marked as revoked. Only a literal `true` counts.
    pub fn revoked(&self) -> bool {
        self.0.get("revoked").and_then(Value::as_bool) == Some(true)
    }

    pub fn revocation_reason(&self) -> Option<&'a str> {
        self.0.non_empty_str("revocationReason")
    }
}

/// A value given either by reference (IRI) or inline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RefOrInline<T> {
    Iri(String),
    Inline(T),
}

impl<T: Default> Default for RefOrInline<T> {
    fn default() -> Self {
        Self::Inline(T::default())
    }
}

/// A BadgeClass: the description of an achievement that can be awarded.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BadgeClass {
    #[serde(rename = "@context", skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(rename = "type")]
    pub type_: String,
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: RefOrInline<Image>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criteria: Option<Criteria>,
    pub issuer: RefOrInline<Profile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alignment: Vec<AlignmentObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// An image, either the BadgeClass image or an issuer image.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    pub id: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// The criteria for earning a badge.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Criteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub narrative: String,
}

/// The issuer Profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<RefOrInline<Image>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// An alignment of a BadgeClass with an external framework.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentObject {
    pub target_name: String,
    pub target_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_framework: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_code: Option<String>,
}

/// The recipient of an Assertion.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityObject {
    #[serde(rename = "type")]
    pub type_: String,
    pub identity: String,
    pub hashed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
}

/// How an Assertion can be verified.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerificationObject {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
}

/// An awarded badge.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Assertion {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub id: String,
    pub recipient: IdentityObject,
    pub badge: RefOrInline<BadgeClass>,
    pub issued_on: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
    pub verification: VerificationObject,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revoked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revocation_reason: Option<String>,
}
