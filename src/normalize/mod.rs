//! Pure canonicalization helpers.
//!
//! Downstream comparison is format-agnostic because everything passes
//! through here first: identifiers via
//! [`CanonicalIdentifier::parse`](crate::core::CanonicalIdentifier::parse),
//! dates via [`date::parse_date`], free text (vendor names, descriptions,
//! lot numbers) via [`text::canonicalize`] and [`text::similarity`].
//!
//! Nothing in this module returns an error: failed normalization degrades to
//! `None` or a low-confidence value so matching can proceed on the
//! remaining signals.

pub mod date;
pub mod text;
