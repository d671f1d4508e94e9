//! Feature extraction for closure-probability estimation
//!
//! Turns the member, engagement and operational records of a
//! [`GapContext`](caregap_types::GapContext) plus the facts of a gap into
//! a flat, named numeric [`FeatureVector`].
//!
//! Extraction is a pure function of its inputs and `now`. Missing
//! input fields resolve to the defaults documented on the record types,
//! so extraction never fails.

#![deny(unsafe_code)]

pub mod extractor;
pub mod names;
pub mod vector;

pub use extractor::{FeatureExtractor, GapFacts};
pub use vector::FeatureVector;
