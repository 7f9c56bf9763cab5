//! Content verification of Open Badges 3.0 credentials.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{
    lifecycle::{check_expiration, check_ob3_revocation},
    result::{Findings, VerificationMethod},
    ContentOutcome,
};
use crate::{
    config::Config,
    core::{
        guards::{
            is_achievement, is_credential_status, is_credential_subject, is_criteria,
            is_evidence, is_issuer, is_proof, is_refresh_service, is_terms_of_use,
        },
        ob3::{Ob3Credential, OPEN_BADGE_CREDENTIAL_TYPE, VERIFIABLE_CREDENTIAL_TYPE},
        object::{as_object, is_present, ObjectExt},
    },
    utils::{display_value, one_or_many, parse_date_value},
};

/// Run every content check on a credential.
pub(crate) fn verify(
    credential: &Ob3Credential<'_>,
    config: &Config,
    now: DateTime<Utc>,
) -> ContentOutcome {
    let mut outcome = ContentOutcome::default();

    outcome.content.extend(validate_components(credential, config));

    let (method, findings) = check_proof(credential);
    outcome.verification_method = method;
    outcome.content.errors.extend(findings.errors);
    outcome.warnings.extend(findings.warnings);

    let (expiration, findings) = check_expiration(credential.expiration_date(), now);
    outcome.expiration_status = Some(expiration);
    outcome.content.extend(findings);

    let findings = check_credential_status(credential);
    outcome.content.errors.extend(findings.errors);
    outcome.warnings.extend(findings.warnings);

    let (revocation, findings) = check_ob3_revocation(credential);
    outcome.revocation_status = Some(revocation);
    outcome.warnings.extend(findings.warnings);

    outcome
}

/// Structural and semantic checks on the parts of a credential.
pub(crate) fn validate_components(credential: &Ob3Credential<'_>, config: &Config) -> Findings {
    let mut findings = Findings::new();

    findings.extend(validate_context(credential.context(), config));

    let types = credential.types();
    if !types.contains(&VERIFIABLE_CREDENTIAL_TYPE) {
        findings.error("Credential type must include VerifiableCredential");
    }
    if !types.contains(&OPEN_BADGE_CREDENTIAL_TYPE) {
        findings.error("Credential type must include OpenBadgeCredential");
    }

    findings.extend(validate_issuer(credential.issuer()));

    if !credential
        .issuance_date()
        .and_then(parse_date_value)
        .is_some()
    {
        let shown = credential
            .issuance_date()
            .map(display_value)
            .unwrap_or_default();
        findings.error(format!("Invalid issuanceDate: {shown}"));
    }

    findings.extend(validate_credential_subject(credential));

    if let Some(refresh_service) = credential.refresh_service().filter(|v| !v.is_null()) {
        if !is_refresh_service(refresh_service) {
            findings.error("Refresh service is not a valid RefreshService object");
        }
    }

    if let Some(terms_of_use) = credential.terms_of_use() {
        for item in one_or_many(terms_of_use) {
            if !is_terms_of_use(item) {
                findings.error("Terms of use is not a valid TermsOfUse object");
            }
        }
    }

    if let Some(evidence) = credential.evidence() {
        for item in one_or_many(evidence) {
            if !is_evidence(item) {
                findings.error("Evidence is not a valid Evidence object");
            }
        }
    }

    findings
}

fn validate_context(context: Option<&Value>, config: &Config) -> Findings {
    let mut findings = Findings::new();

    let Some(Value::Array(contexts)) = context else {
        findings.error("Credential @context must be an array");
        return findings;
    };

    let uris: Vec<&str> = contexts.iter().filter_map(Value::as_str).collect();

    if !uris.iter().any(|uri| config.is_credential_context(uri)) {
        findings.error("Credential @context is missing the W3C Verifiable Credentials context");
    }
    if !uris.iter().any(|uri| config.is_open_badges_context(uri)) {
        findings.error("Credential @context is missing the Open Badges v3 context");
    }

    findings
}

fn validate_issuer(issuer: Option<&Value>) -> Findings {
    let mut findings = Findings::new();

    let Some(issuer) = issuer.filter(|i| is_issuer(i)).and_then(as_object) else {
        findings.error("Issuer is not a valid Issuer object");
        return findings;
    };

    if issuer.non_empty_str("id").is_none() {
        findings.error("Issuer is missing an id");
    }
    if !is_present(issuer, "type") {
        findings.error("Issuer is missing a type");
    }
    if !is_present(issuer, "name") {
        findings.warn("Issuer is missing a name");
    }

    findings
}

fn validate_credential_subject(credential: &Ob3Credential<'_>) -> Findings {
    let mut findings = Findings::new();

    let Some(subject) = credential
        .credential_subject()
        .filter(|s| is_credential_subject(s))
        .and_then(as_object)
    else {
        findings.error("Credential subject is not a valid CredentialSubject object");
        return findings;
    };

    if !is_present(subject, "type") {
        findings.error("Credential subject is missing a type");
    }

    match credential.achievement() {
        Some(achievement) => {
            for item in one_or_many(achievement) {
                findings.extend(validate_achievement(item));
            }
        }
        None => findings.error("Credential subject is missing an achievement"),
    }

    findings
}

fn validate_achievement(achievement: &Value) -> Findings {
    let mut findings = Findings::new();

    let Some(achievement) = as_object(achievement).filter(|_| is_achievement(achievement)) else {
        findings.error("Achievement is not a valid Achievement object");
        return findings;
    };

    if achievement.non_empty_str("id").is_none() {
        findings.error("Achievement is missing an id");
    }
    if !is_present(achievement, "type") {
        findings.error("Achievement is missing a type");
    }
    if !is_present(achievement, "name") {
        findings.error("Achievement is missing a name");
    }

    if let Some(criteria) = achievement.get("criteria").filter(|c| !c.is_null()) {
        if !is_criteria(criteria) {
            findings.error("Achievement criteria is not a valid Criteria object");
        }
    }

    match achievement.get("image") {
        None | Some(Value::Null) => findings.warn("Achievement is missing an image"),
        Some(Value::String(_)) => {}
        Some(image) => {
            let complete = as_object(image)
                .is_some_and(|image| is_present(image, "id") && is_present(image, "type"));
            if !complete {
                findings.error("Achievement image must have an id and type");
            }
        }
    }

    findings
}

/// Check the shape of the proof. The signature itself is not verified.
fn check_proof(credential: &Ob3Credential<'_>) -> (Option<VerificationMethod>, Findings) {
    let mut findings = Findings::new();

    let Some(proof) = credential.proof() else {
        findings.error("Credential is missing a proof");
        return (None, findings);
    };

    let mut method = None;
    for proof in one_or_many(proof) {
        let Some(proof) = as_object(proof).filter(|_| is_proof(proof)) else {
            findings.error("Proof is not a valid Proof object");
            continue;
        };

        if is_present(proof, "type") {
            method = Some(VerificationMethod::Signed);
        } else {
            findings.error("Proof is missing a type");
        }

        for (key, message) in [
            ("created", "Proof is missing a created date"),
            ("verificationMethod", "Proof is missing a verification method"),
            ("proofPurpose", "Proof is missing a proof purpose"),
            ("proofValue", "Proof is missing a proof value"),
        ] {
            if !is_present(proof, key) {
                findings.error(message);
            }
        }
    }

    findings.warn("Cryptographic proof verification is not fully implemented");
    (method, findings)
}

fn check_credential_status(credential: &Ob3Credential<'_>) -> Findings {
    let mut findings = Findings::new();

    let Some(status) = credential.credential_status() else {
        findings.warn("No credential status specified");
        return findings;
    };

    match as_object(status).filter(|_| is_credential_status(status)) {
        Some(status) => {
            if status.non_empty_str("id").is_none() {
                findings.error("Credential status is missing an id");
            }
            if !is_present(status, "type") {
                findings.error("Credential status is missing a type");
            }
        }
        None => findings.error("Credential status is not a valid CredentialStatus object"),
    }

    findings.warn("Credential status checking requires network access and is not fully implemented");
    findings
}
