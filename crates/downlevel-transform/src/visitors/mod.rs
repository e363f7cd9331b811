//! The shipped rule catalogs.
//!
//! Each catalog is a module exposing an ordered `VISITOR_LIST: &[Rule]`,
//! plus any pure helpers other catalogs reuse. Catalogs are composed by name
//! through [`crate::registry`]; within a composed list the first matching
//! rule wins, so catalogs are curated to apply to disjoint node shapes.

pub mod concise_methods;
pub mod es3;
pub mod reserved_words;
pub mod rest_params;
pub mod spread;
pub mod trailing_commas;
