//! Expiration and revocation checks shared by both formats.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::result::{ExpirationStatus, Findings, RevocationStatus};
use crate::{
    core::{ob2::Ob2Assertion, ob3::Ob3Credential},
    utils::{display_value, parse_date_value},
};

/// Check an expiration date (`expires` on OB2, `expirationDate` on OB3) against `now`.
///
/// A badge expiring exactly at `now` is still valid.
pub(crate) fn check_expiration(
    expires: Option<&Value>,
    now: DateTime<Utc>,
) -> (ExpirationStatus, Findings) {
    let mut findings = Findings::new();

    let Some(expires) = expires else {
        return (ExpirationStatus::NotApplicable, findings);
    };

    let Some(expires_at) = parse_date_value(expires) else {
        findings.error(format!(
            "Invalid expiration date: {}",
            display_value(expires)
        ));
        return (ExpirationStatus::NotApplicable, findings);
    };

    if expires_at < now {
        findings.error("Badge has expired");
        (ExpirationStatus::Expired, findings)
    } else {
        (ExpirationStatus::Valid, findings)
    }
}

/// OB2 Assertions carry their revocation state inline.
pub(crate) fn check_ob2_revocation(assertion: &Ob2Assertion<'_>) -> (RevocationStatus, Findings) {
    let mut findings = Findings::new();

    if !assertion.revoked() {
        return (RevocationStatus::Valid, findings);
    }

    match assertion.revocation_reason() {
        Some(reason) => findings.error(format!("Badge has been revoked: {reason}")),
        None => findings.error("Badge has been revoked"),
    }
    (RevocationStatus::Revoked, findings)
}

/// OB3 revocation is published through the credential status, which is not fetched, so the
/// outcome is always unknown.
pub(crate) fn check_ob3_revocation(
    credential: &Ob3Credential<'_>,
) -> (RevocationStatus, Findings) {
    let mut findings = Findings::new();

    if credential.credential_status().is_some() {
        findings.warn(
            "Revocation status cannot be determined without checking the credential status",
        );
    } else {
        findings.warn("Revocation status is unknown: no credential status specified");
    }

    (RevocationStatus::Unknown, findings)
}
