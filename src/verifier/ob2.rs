//! Content verification of Open Badges 2.0 Assertions.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{
    lifecycle::{check_expiration, check_ob2_revocation},
    result::{Findings, VerificationMethod},
    ContentOutcome,
};
use crate::{
    core::{
        guards::{
            is_alignment_object, is_criteria, is_evidence, is_identity_object, is_image,
            is_profile, is_verification_object,
        },
        ob2::{BadgeClassRef, Ob2Assertion},
        object::{as_object, is_present, ObjectExt, UntypedObject},
    },
    utils::{display_value, first_string, is_valid_url, one_or_many, parse_date_value},
};

/// Run every content check on an Assertion.
pub(crate) fn verify(assertion: &Ob2Assertion<'_>, now: DateTime<Utc>) -> ContentOutcome {
    let mut outcome = ContentOutcome::default();

    outcome.content.extend(validate_components(assertion));

    match resolve_verification_method(assertion.verification()) {
        Ok(method) => {
            tracing::debug!(?method, "resolved OB2 verification method");
            outcome.verification_method = Some(method);
            let findings = match method {
                VerificationMethod::Hosted => check_hosted(assertion),
                VerificationMethod::Signed => check_signed(assertion),
            };
            outcome.content.errors.extend(findings.errors);
            outcome.warnings.extend(findings.warnings);
        }
        Err(message) => outcome.content.error(message),
    }

    let (expiration, findings) = check_expiration(assertion.expires(), now);
    outcome.expiration_status = Some(expiration);
    outcome.content.extend(findings);

    let (revocation, findings) = check_ob2_revocation(assertion);
    outcome.revocation_status = Some(revocation);
    outcome.content.extend(findings);

    outcome
}

/// Structural and semantic checks on the parts of an Assertion.
pub(crate) fn validate_components(assertion: &Ob2Assertion<'_>) -> Findings {
    let mut findings = Findings::new();

    findings.extend(validate_badge(assertion));
    findings.extend(validate_recipient(assertion.recipient()));

    if !assertion.verification().is_some_and(is_verification_object) {
        findings.error("Verification is not a valid VerificationObject");
    }

    match assertion.issued_on() {
        Some(issued_on) if parse_date_value(issued_on).is_some() => {}
        Some(issued_on) => findings.error(format!(
            "Invalid issuedOn date: {}",
            display_value(issued_on)
        )),
        None => findings.error("Assertion is missing an issuedOn date"),
    }

    if let Some(evidence) = assertion.evidence() {
        for item in one_or_many(evidence) {
            if !(is_evidence(item) || is_iri(item)) {
                findings.error("Evidence is not a valid Evidence object");
            }
        }
    }

    findings
}

/// Whether the value is a string holding an absolute URL.
fn is_iri(value: &Value) -> bool {
    value.as_str().is_some_and(is_valid_url)
}

fn validate_badge(assertion: &Ob2Assertion<'_>) -> Findings {
    let mut findings = Findings::new();

    match assertion.badge() {
        Some(BadgeClassRef::Inline(badge_class)) => {
            findings.extend(validate_badge_class(badge_class));
        }
        Some(BadgeClassRef::Reference(iri)) => {
            if !is_valid_url(iri) {
                findings.error(format!("BadgeClass reference is not a valid URL: {iri}"));
            }
        }
        Some(BadgeClassRef::Invalid(_)) => findings.error("Invalid BadgeClass structure"),
        None => findings.error("Assertion is missing a BadgeClass"),
    }

    findings
}

fn validate_badge_class(badge_class: &UntypedObject) -> Findings {
    let mut findings = Findings::new();

    if badge_class.non_empty_str("name").is_none() {
        findings.error("BadgeClass is missing a name");
    }

    if badge_class.non_empty_str("description").is_none() {
        findings.error("BadgeClass is missing a description");
    }

    match badge_class.get("image") {
        _ if !is_present(badge_class, "image") => {
            findings.error("BadgeClass is missing an image");
        }
        Some(Value::String(_)) | None => {}
        Some(image) => {
            if !is_image(image) {
                findings.error("BadgeClass image is not a valid Image object");
            }
        }
    }

    if let Some(criteria) = badge_class.get("criteria").filter(|c| !c.is_null()) {
        if !(is_criteria(criteria) || is_iri(criteria)) {
            findings.error("BadgeClass criteria is not a valid Criteria object");
        }
    }

    findings.extend(validate_issuer(badge_class));

    if let Some(alignment) = badge_class.get("alignment") {
        for item in one_or_many(alignment) {
            if !is_alignment_object(item) {
                findings.error("BadgeClass alignment is not a valid AlignmentObject");
            }
        }
    }

    findings
}

fn validate_issuer(badge_class: &UntypedObject) -> Findings {
    let mut findings = Findings::new();

    if !is_present(badge_class, "issuer") {
        findings.error("BadgeClass is missing an issuer");
        return findings;
    }

    let Some(issuer) = badge_class.get("issuer") else {
        return findings;
    };

    // An issuer given by IRI is resolved elsewhere.
    if issuer.is_string() {
        return findings;
    }

    if !is_profile(issuer) {
        findings.error("Issuer is not a valid Profile object");
        return findings;
    }

    if let Some(profile) = as_object(issuer) {
        if profile.non_empty_str("name").is_none() {
            findings.error("Issuer is missing a name");
        }

        if let Some(url) = profile.get("url") {
            if !url.as_str().is_some_and(is_valid_url) {
                findings.error(format!("Issuer URL is not valid: {}", display_value(url)));
            }
        }
    }

    findings
}

fn validate_recipient(recipient: Option<&Value>) -> Findings {
    let mut findings = Findings::new();

    let Some(recipient) = recipient.filter(|r| is_identity_object(r)) else {
        findings.error("Recipient is not a valid IdentityObject");
        return findings;
    };

    if let Some(identity) = as_object(recipient) {
        if identity.non_empty_str("identity").is_none() {
            findings.error("Recipient is missing an identity");
        }
        if identity.non_empty_str("type").is_none() {
            findings.error("Recipient is missing a type");
        }
        if !identity.has("hashed") {
            findings.warn("Recipient hashed property is not specified");
        }
    }

    findings
}

/// Resolve `verification.type`, accepting the `hosted`/`HostedBadge` and `signed`/`SignedBadge`
/// spellings in any case.
pub(crate) fn resolve_verification_method(
    verification: Option<&Value>,
) -> Result<VerificationMethod, String> {
    let Some(type_) = verification
        .and_then(as_object)
        .and_then(|verification| verification.get("type"))
        .and_then(first_string)
        .filter(|t| !t.is_empty())
    else {
        return Err("Verification type is missing".into());
    };

    match type_.to_ascii_lowercase().as_str() {
        "hosted" | "hostedbadge" => Ok(VerificationMethod::Hosted),
        "signed" | "signedbadge" => Ok(VerificationMethod::Signed),
        _ => Err(format!("Unsupported verification type: {type_}")),
    }
}

fn check_hosted(assertion: &Ob2Assertion<'_>) -> Findings {
    let mut findings = Findings::new();

    if !assertion.id().is_some_and(|id| id.starts_with("http")) {
        findings.error("Hosted badge ID must be an HTTP(S) URL");
    }

    findings.warn("Hosted badge verification requires network access and is not fully implemented");
    findings
}

fn check_signed(assertion: &Ob2Assertion<'_>) -> Findings {
    let mut findings = Findings::new();

    let has_creator = assertion
        .verification()
        .and_then(as_object)
        .is_some_and(|verification| is_present(verification, "creator"));
    let has_issuer = assertion
        .badge_class()
        .is_some_and(|badge_class| is_present(badge_class, "issuer"));

    if !has_creator && has_issuer {
        findings.warn("Signing key (creator) is not specified in the verification object");
    }

    findings.warn(
        "Signed badge verification requires cryptographic libraries and is not fully implemented",
    );
    findings
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::{
        core::guards::Badge,
        verifier::result::{ExpirationStatus, RevocationStatus},
    };

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn assertion() -> Value {
        json!({
            "@context": "https://w3id.org/openbadges/v2",
            "type": "Assertion",
            "id": "https://example.org/assertions/1",
            "recipient": { "type": "email", "identity": "alice@example.org", "hashed": false },
            "badge": {
                "type": "BadgeClass",
                "id": "https://example.org/badges/1",
                "name": "Rust Basics",
                "description": "Wrote some Rust",
                "image": "https://example.org/badge.png",
                "criteria": { "narrative": "Write a crate" },
                "issuer": { "name": "Example Org", "url": "https://example.org" }
            },
            "verification": { "type": "hosted" },
            "issuedOn": "2024-01-01T00:00:00Z"
        })
    }

    fn run(payload: &Value) -> ContentOutcome {
        let Badge::Ob2(assertion) = Badge::classify(payload) else {
            panic!("not an OB2 assertion");
        };
        verify(&assertion, now())
    }

    #[test]
    fn valid_hosted_assertion() {
        let outcome = run(&assertion());

        assert!(outcome.content.errors.is_empty(), "{:?}", outcome.content.errors);
        assert!(outcome.content.warnings.is_empty());
        assert_eq!(outcome.verification_method, Some(VerificationMethod::Hosted));
        assert_eq!(outcome.expiration_status, Some(ExpirationStatus::NotApplicable));
        assert_eq!(outcome.revocation_status, Some(RevocationStatus::Valid));
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn collects_every_defect() {
        let mut payload = assertion();
        payload["badge"]["name"] = json!("");
        payload["badge"]["description"] = Value::Null;
        payload["badge"]["image"] = json!({ "caption": "no id" });
        payload["badge"]["issuer"]["url"] = json!("not a url");
        payload["recipient"] = json!({ "identity": "alice@example.org" });
        payload["issuedOn"] = json!("not a date");

        let outcome = run(&payload);
        assert_eq!(
            outcome.content.errors,
            vec![
                "BadgeClass is missing a name",
                "BadgeClass is missing a description",
                "BadgeClass image is not a valid Image object",
                "Issuer URL is not valid: not a url",
                "Recipient is missing a type",
                "Invalid issuedOn date: not a date",
            ]
        );
        assert_eq!(
            outcome.content.warnings,
            vec!["Recipient hashed property is not specified"]
        );
    }

    #[test]
    fn badge_class_reference_must_be_url() {
        let mut payload = assertion();
        payload["badge"] = json!("badge-1");

        let outcome = run(&payload);
        assert_eq!(
            outcome.content.errors,
            vec!["BadgeClass reference is not a valid URL: badge-1"]
        );
    }

    #[test]
    fn issuer_checks() {
        let mut payload = assertion();
        payload["badge"]["issuer"] = json!({ "url": "https://example.org" });
        assert_eq!(run(&payload).content.errors, vec!["Issuer is missing a name"]);

        payload["badge"]["issuer"] = json!(42);
        assert_eq!(
            run(&payload).content.errors,
            vec!["Issuer is not a valid Profile object"]
        );

        payload["badge"]["issuer"] = json!("https://example.org/issuer");
        assert!(run(&payload).content.errors.is_empty());

        payload["badge"].as_object_mut().unwrap().remove("issuer");
        assert_eq!(
            run(&payload).content.errors,
            vec!["BadgeClass is missing an issuer"]
        );
    }

    #[test]
    fn alignment_and_evidence_are_checked_per_item() {
        let mut payload = assertion();
        payload["badge"]["alignment"] = json!([
            { "targetName": "A", "targetUrl": "https://example.org/a" },
            { "targetName": "B" }
        ]);
        payload["evidence"] = json!([{ "narrative": "did it" }, 7]);

        let outcome = run(&payload);
        assert_eq!(
            outcome.content.errors,
            vec![
                "BadgeClass alignment is not a valid AlignmentObject",
                "Evidence is not a valid Evidence object",
            ]
        );
    }

    #[test]
    fn verification_type_aliases() {
        for (type_, method) in [
            (json!("hosted"), VerificationMethod::Hosted),
            (json!("HostedBadge"), VerificationMethod::Hosted),
            (json!(["SignedBadge"]), VerificationMethod::Signed),
            (json!("SIGNED"), VerificationMethod::Signed),
        ] {
            let verification = json!({ "type": type_ });
            assert_eq!(resolve_verification_method(Some(&verification)), Ok(method));
        }

        assert_eq!(
            resolve_verification_method(Some(&json!({ "type": "emailed" }))),
            Err("Unsupported verification type: emailed".into())
        );
        assert_eq!(
            resolve_verification_method(Some(&json!({}))),
            Err("Verification type is missing".into())
        );
    }

    #[test]
    fn hosted_requires_http_id() {
        let mut payload = assertion();
        payload["id"] = json!("urn:uuid:1234");

        let outcome = run(&payload);
        assert_eq!(
            outcome.content.errors,
            vec!["Hosted badge ID must be an HTTP(S) URL"]
        );
    }

    #[test]
    fn signed_without_creator_warns() {
        let mut payload = assertion();
        payload["verification"] = json!({ "type": "signed" });

        let outcome = run(&payload);
        assert!(outcome.content.errors.is_empty());
        assert_eq!(outcome.verification_method, Some(VerificationMethod::Signed));
        assert_eq!(outcome.warnings.len(), 2);

        payload["verification"]["creator"] = json!("https://example.org/key");
        assert_eq!(run(&payload).warnings.len(), 1);
    }

    #[test]
    fn expired_and_revoked() {
        let mut payload = assertion();
        payload["expires"] = json!("2020-06-01T00:00:00Z");
        payload["revoked"] = json!(true);
        payload["revocationReason"] = json!("Issued in error");

        let outcome = run(&payload);
        assert_eq!(outcome.expiration_status, Some(ExpirationStatus::Expired));
        assert_eq!(outcome.revocation_status, Some(RevocationStatus::Revoked));
        assert_eq!(
            outcome.content.errors,
            vec![
                "Badge has expired",
                "Badge has been revoked: Issued in error"
            ]
        );
    }
}
