//! Projection of a badge of either format onto a uniform display record.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    core::{
        guards::Badge,
        ob2::{BadgeClassRef, Ob2Assertion},
        ob3::Ob3Credential,
        object::{as_object, ObjectExt, UntypedObject},
        util::{to_iso_string, Clock, SystemClock},
    },
    utils::{first_of, first_string, resolve_ref_or_inline},
};

const UNKNOWN_BADGE: &str = "Unknown Badge";
const UNKNOWN_ISSUER: &str = "Unknown Issuer";

/// The display projection of a badge.
///
/// Every field is populated; missing data degrades to placeholders rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedBadge {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Image URL, empty when the badge has none.
    pub image: String,
    pub issuer: NormalizedIssuer,
    pub issued_on: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedIssuer {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl NormalizedIssuer {
    fn unknown() -> Self {
        Self {
            name: UNKNOWN_ISSUER.into(),
            ..Default::default()
        }
    }
}

/// Normalize a badge payload of any shape. Never fails.
pub fn normalize(payload: &Value) -> NormalizedBadge {
    normalize_with_clock(payload, &SystemClock)
}

/// Normalize a badge payload, stamping unrecognized payloads with the time given by `clock`.
pub fn normalize_with_clock(payload: &Value, clock: &dyn Clock) -> NormalizedBadge {
    match Badge::classify(payload) {
        Badge::Ob2(assertion) => normalize_ob2(assertion),
        Badge::Ob3(credential) => normalize_ob3(credential),
        Badge::Unknown => {
            tracing::debug!("badge format not recognized, using fallback record");
            unrecognized(clock)
        }
    }
}

/// Normalize a badge given as JSON text. Text that does not parse yields the fallback record.
pub fn normalize_str(payload: &str) -> NormalizedBadge {
    match serde_json::from_str::<Value>(payload) {
        Ok(value) => normalize(&value),
        Err(e) => {
            tracing::debug!("badge payload is not valid JSON: {e}");
            unrecognized(&SystemClock)
        }
    }
}

fn unrecognized(clock: &dyn Clock) -> NormalizedBadge {
    NormalizedBadge {
        id: "unknown".into(),
        name: UNKNOWN_BADGE.into(),
        description: "Badge format not recognized".into(),
        image: String::new(),
        issuer: NormalizedIssuer::unknown(),
        issued_on: to_iso_string(clock.now()),
        expires: None,
    }
}

fn string_or_empty(value: Option<&str>) -> String {
    value.unwrap_or_default().to_owned()
}

fn image_of(object: &UntypedObject) -> Option<String> {
    object
        .get("image")
        .and_then(resolve_ref_or_inline)
        .map(ToOwned::to_owned)
}

fn normalize_ob2(assertion: Ob2Assertion<'_>) -> NormalizedBadge {
    let (name, description, image, issuer) = match assertion.badge() {
        Some(BadgeClassRef::Inline(badge_class)) => (
            string_or_empty(badge_class.str_field("name")),
            string_or_empty(badge_class.str_field("description")),
            image_of(badge_class).unwrap_or_default(),
            badge_class
                .get("issuer")
                .map(ob2_issuer)
                .unwrap_or_else(NormalizedIssuer::unknown),
        ),
        // A referenced BadgeClass cannot be resolved without fetching it.
        _ => (
            UNKNOWN_BADGE.into(),
            String::new(),
            String::new(),
            NormalizedIssuer::unknown(),
        ),
    };

    NormalizedBadge {
        id: string_or_empty(assertion.id()),
        name,
        description,
        image,
        issuer,
        issued_on: string_or_empty(assertion.issued_on().and_then(Value::as_str)),
        expires: assertion
            .expires()
            .and_then(Value::as_str)
            .map(ToOwned::to_owned),
    }
}

fn ob2_issuer(issuer: &Value) -> NormalizedIssuer {
    let Some(profile) = as_object(issuer) else {
        return NormalizedIssuer::unknown();
    };

    NormalizedIssuer {
        name: profile
            .str_field("name")
            .unwrap_or(UNKNOWN_ISSUER)
            .to_owned(),
        url: profile.str_field("url").map(ToOwned::to_owned),
        image: image_of(profile),
    }
}

fn normalize_ob3(credential: Ob3Credential<'_>) -> NormalizedBadge {
    let achievement = credential.achievement();

    let name = achievement
        .and_then(first_of)
        .and_then(as_object)
        .and_then(|achievement| achievement.get("name"))
        .and_then(first_string)
        .unwrap_or(UNKNOWN_BADGE)
        .to_owned();

    // Only a single achievement object contributes a description and image.
    let single = achievement.and_then(as_object);
    let description = string_or_empty(single.and_then(|a| a.str_field("description")));
    let image = single.and_then(image_of).unwrap_or_default();

    NormalizedBadge {
        id: string_or_empty(credential.id()),
        name,
        description,
        image,
        issuer: credential
            .issuer()
            .map(ob3_issuer)
            .unwrap_or_else(NormalizedIssuer::unknown),
        issued_on: string_or_empty(credential.issuance_date().and_then(Value::as_str)),
        expires: credential
            .expiration_date()
            .and_then(Value::as_str)
            .map(ToOwned::to_owned),
    }
}

fn ob3_issuer(issuer: &Value) -> NormalizedIssuer {
    let Some(issuer) = as_object(issuer) else {
        return NormalizedIssuer::unknown();
    };

    NormalizedIssuer {
        name: issuer
            .str_field("name")
            .unwrap_or(UNKNOWN_ISSUER)
            .to_owned(),
        url: issuer.str_field("url").map(ToOwned::to_owned),
        image: image_of(issuer),
    }
}
