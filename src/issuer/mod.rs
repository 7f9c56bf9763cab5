//! Templates and checks for issuing Open Badges 2.0 badges.
//!
//! The templates are skeletons to be filled in by an issuing workflow. The validators only check
//! that required fields are filled in; use the [verifier](crate::verifier) for a full check of an
//! issued Assertion.

use uuid::Uuid;

use crate::core::{
    ob2::{
        Assertion, BadgeClass, Criteria, IdentityObject, Image, Profile, RefOrInline,
        VerificationObject, OB2_CONTEXT,
    },
    util::{to_iso_string, Clock, SystemClock},
};

const BADGE_CLASS_TYPE: &str = "BadgeClass";
const ASSERTION_TYPE: &str = "Assertion";
const IMAGE_TYPE: &str = "Image";
const PROFILE_TYPE: &str = "Profile";
const EMAIL_IDENTITY_TYPE: &str = "email";
const HOSTED_VERIFICATION_TYPE: &str = "hosted";

fn urn_uuid() -> String {
    Uuid::new_v4().urn().to_string()
}

/// Create an empty BadgeClass.
///
/// A fresh `urn:uuid:` identifier is used as the BadgeClass id, and as placeholder id for its
/// image and issuer.
pub fn create_badge_class_template() -> BadgeClass {
    let id = urn_uuid();

    BadgeClass {
        context: Some(OB2_CONTEXT.to_owned()),
        type_: BADGE_CLASS_TYPE.to_owned(),
        id: id.clone(),
        name: String::new(),
        description: String::new(),
        image: RefOrInline::Inline(Image {
            id: id.clone(),
            type_: Some(IMAGE_TYPE.to_owned()),
            caption: None,
        }),
        criteria: Some(Criteria {
            id: None,
            narrative: String::new(),
        }),
        issuer: RefOrInline::Inline(Profile {
            id: Some(id),
            type_: Some(PROFILE_TYPE.to_owned()),
            ..Default::default()
        }),
        alignment: Vec::new(),
        tags: Vec::new(),
    }
}

/// Create a hosted Assertion awarding `badge_class` to `recipient_email`, issued now.
pub fn create_assertion_template(badge_class: BadgeClass, recipient_email: &str) -> Assertion {
    create_assertion_template_with_clock(badge_class, recipient_email, &SystemClock)
}

/// Same as [create_assertion_template], reading the issue time from `clock`.
pub fn create_assertion_template_with_clock(
    badge_class: BadgeClass,
    recipient_email: &str,
    clock: &dyn Clock,
) -> Assertion {
    Assertion {
        context: OB2_CONTEXT.to_owned(),
        type_: ASSERTION_TYPE.to_owned(),
        id: urn_uuid(),
        recipient: IdentityObject {
            type_: EMAIL_IDENTITY_TYPE.to_owned(),
            identity: recipient_email.to_owned(),
            hashed: false,
            salt: None,
        },
        badge: RefOrInline::Inline(badge_class),
        issued_on: to_iso_string(clock.now()),
        expires: None,
        verification: VerificationObject {
            type_: HOSTED_VERIFICATION_TYPE.to_owned(),
            creator: None,
        },
        revoked: None,
        revocation_reason: None,
    }
}

/// Check that the required fields of a BadgeClass are filled in.
pub fn validate_badge_class(badge_class: &BadgeClass) -> Vec<String> {
    let mut errors = Vec::new();

    if badge_class.id.trim().is_empty() {
        errors.push("BadgeClass ID is required".to_owned());
    }
    if badge_class.name.trim().is_empty() {
        errors.push("Badge name is required".to_owned());
    }
    if badge_class.description.trim().is_empty() {
        errors.push("Badge description is required".to_owned());
    }

    let has_image = match &badge_class.image {
        RefOrInline::Iri(iri) => !iri.trim().is_empty(),
        RefOrInline::Inline(image) => !image.id.trim().is_empty(),
    };
    if !has_image {
        errors.push("Badge image is required".to_owned());
    }

    match &badge_class.issuer {
        RefOrInline::Iri(iri) if iri.trim().is_empty() => {
            errors.push("Issuer is required".to_owned());
        }
        RefOrInline::Iri(_) => {}
        RefOrInline::Inline(profile) => {
            if profile.name.trim().is_empty() {
                errors.push("Issuer name is required".to_owned());
            }
        }
    }

    errors
}

/// Check that the required fields of an Assertion are filled in, including those of an inline
/// BadgeClass.
pub fn validate_assertion(assertion: &Assertion) -> Vec<String> {
    let mut errors = Vec::new();

    if assertion.id.trim().is_empty() {
        errors.push("Assertion ID is required".to_owned());
    }
    if assertion.recipient.identity.trim().is_empty() {
        errors.push("Recipient identity is required".to_owned());
    }

    match &assertion.badge {
        RefOrInline::Iri(iri) if iri.trim().is_empty() => {
            errors.push("BadgeClass is required".to_owned());
        }
        RefOrInline::Iri(_) => {}
        RefOrInline::Inline(badge_class) => errors.extend(validate_badge_class(badge_class)),
    }

    if assertion.issued_on.trim().is_empty() {
        errors.push("Issue date is required".to_owned());
    }
    if assertion.verification.type_.trim().is_empty() {
        errors.push("Verification type is required".to_owned());
    }

    errors
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;
    use crate::core::{
        guards::{classify, BadgeFormat},
        util::FixedClock,
    };

    #[test]
    fn badge_class_template_reuses_one_id() {
        let badge_class = create_badge_class_template();

        assert!(badge_class.id.starts_with("urn:uuid:"));
        assert_eq!(
            badge_class.image,
            RefOrInline::Inline(Image {
                id: badge_class.id.clone(),
                type_: Some("Image".into()),
                caption: None,
            })
        );
        let RefOrInline::Inline(issuer) = &badge_class.issuer else {
            panic!("issuer should be inline");
        };
        assert_eq!(issuer.id.as_deref(), Some(badge_class.id.as_str()));
        assert_eq!(badge_class.criteria.as_ref().unwrap().narrative, "");

        assert_ne!(create_badge_class_template().id, badge_class.id);
    }

    #[test]
    fn empty_template_fails_validation() {
        assert_eq!(
            validate_badge_class(&create_badge_class_template()),
            vec![
                "Badge name is required",
                "Badge description is required",
                "Issuer name is required",
            ]
        );
    }

    #[test]
    fn assertion_template() {
        let mut badge_class = create_badge_class_template();
        badge_class.name = "Rust Basics".into();
        badge_class.description = "Wrote some Rust".into();
        if let RefOrInline::Inline(issuer) = &mut badge_class.issuer {
            issuer.name = "Example Org".into();
        }

        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        let assertion =
            create_assertion_template_with_clock(badge_class, "alice@example.org", &clock);

        assert!(assertion.id.starts_with("urn:uuid:"));
        assert_eq!(assertion.issued_on, "2024-05-01T12:00:00.000Z");
        assert_eq!(assertion.verification.type_, "hosted");
        assert_eq!(assertion.recipient.identity, "alice@example.org");
        assert!(validate_assertion(&assertion).is_empty());

        let payload = serde_json::to_value(&assertion).unwrap();
        assert_eq!(classify(&payload), BadgeFormat::Ob2);
        assert_eq!(payload["recipient"], json!({
            "type": "email",
            "identity": "alice@example.org",
            "hashed": false
        }));
    }

    #[test]
    fn assertion_checks() {
        let mut assertion =
            create_assertion_template(create_badge_class_template(), "");
        assertion.badge = RefOrInline::Iri("https://example.org/badges/1".into());
        assertion.verification.type_.clear();

        assert_eq!(
            validate_assertion(&assertion),
            vec![
                "Recipient identity is required",
                "Verification type is required",
            ]
        );
    }
}
