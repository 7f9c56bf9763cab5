//! This library verifies and displays [Open Badges], in both the 2.0 (Assertion) and 3.0
//! (Verifiable Credential) formats.
//!
//! [Open Badges]: <https://www.imsglobal.org/spec/ob/v3p0/>
//!
//! # Verification
//!
//! Badges are verified with the [`BadgeVerifier`] type:
//!
//! ```ignore
//! use open_badges::verifier::BadgeVerifier;
//!
//! let verifier = BadgeVerifier::builder().build();
//!
//! let result = verifier.verify(&payload).await;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! ```
//!
//! Verification never fails. Every problem found is reported in the returned
//! [`VerificationResult`], split into errors, which make the badge invalid, and warnings, which
//! don't. Checks are not fail-fast: a single call reports every defect of the badge.
//!
//! The structural stage can be replaced by implementing [`StructureValidator`], and the time
//! that expiration is checked against by implementing [`Clock`].
//!
//! [`BadgeVerifier`]: crate::verifier::BadgeVerifier
//! [`VerificationResult`]: crate::verifier::result::VerificationResult
//! [`StructureValidator`]: crate::json_schema_validation::StructureValidator
//! [`Clock`]: crate::core::util::Clock
//!
//! # Display
//!
//! [`normalize`] turns any payload into a [`NormalizedBadge`], a flat record for display. It
//! never fails either: fields that cannot be found are given placeholder values, and payloads in
//! an unrecognized format give a fixed placeholder record.
//!
//! [`normalize`]: crate::normalize::normalize
//! [`NormalizedBadge`]: crate::normalize::NormalizedBadge
//!
//! # Formats
//!
//! [`core::guards`] decides which format a payload is in. Once classified, a payload is handled
//! through a borrowed view: [`Ob2Assertion`] or [`Ob3Credential`].
//!
//! [`core::guards`]: crate::core::guards
//! [`Ob2Assertion`]: crate::core::ob2::Ob2Assertion
//! [`Ob3Credential`]: crate::core::ob3::Ob3Credential
//!
//! # Issuing
//!
//! The [`issuer`] module creates blank OB2 BadgeClass and Assertion templates.
//!
//! [`issuer`]: crate::issuer

pub mod config;
pub mod core;
pub mod issuer;
pub mod json_schema_validation;
pub mod normalize;
pub mod utils;
pub mod verifier;


pub use config::Config;
pub use crate::core::guards::{classify, Badge, BadgeFormat, BadgeVersion};
pub use normalize::{normalize, NormalizedBadge};
pub use verifier::{result::VerificationResult, BadgeVerifier};
