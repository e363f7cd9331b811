//! Named rule catalogs and the rule-set composer.
//!
//! Catalogs are addressable individually (`es6-rest-params`) or through the
//! bundle names the CLI exposes (`es6`, `utility`, `target:es3`). Composing
//! concatenates rule lists in the given order; that declaration order is the
//! tie-break priority inside the dispatch engine, where the first matching
//! rule wins.

use thiserror::Error;

use crate::rule::Rule;
use crate::visitors::{concise_methods, es3, rest_params, spread, trailing_commas};

/// Error from resolving rule-set names.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown rule set '{name}'")]
    UnknownRuleSet { name: String },
}

/// Individually addressable catalogs, in registration order.
static CATALOGS: &[(&str, &[Rule])] = &[
    ("es6-object-concise-methods", concise_methods::VISITOR_LIST),
    ("es6-rest-params", rest_params::VISITOR_LIST),
    ("es6-spread", spread::VISITOR_LIST),
    ("utility-trailing-commas", trailing_commas::VISITOR_LIST),
    ("target-es3-reserved-words", es3::VISITOR_LIST),
];

/// Named bundles, each an ordered list of catalogs.
static SETS: &[(&str, &[&[Rule]])] = &[
    (
        "es6",
        &[
            concise_methods::VISITOR_LIST,
            rest_params::VISITOR_LIST,
            spread::VISITOR_LIST,
        ],
    ),
    ("utility", &[trailing_commas::VISITOR_LIST]),
    ("target:es3", &[es3::VISITOR_LIST]),
];

/// Look up a single catalog by name.
pub fn catalog(name: &str) -> Option<&'static [Rule]> {
    CATALOGS
        .iter()
        .find(|(catalog_name, _)| *catalog_name == name)
        .map(|(_, rules)| *rules)
}

/// Resolve each name (bundle or catalog) and concatenate in the given
/// order. Later entries' rules are tried only after all earlier rules have
/// failed to match a node.
pub fn compose_rule_sets(names: &[&str]) -> Result<Vec<Rule>, RegistryError> {
    let mut rules = Vec::new();
    for &name in names {
        if let Some((_, lists)) = SETS.iter().find(|(set_name, _)| *set_name == name) {
            for list in *lists {
                rules.extend_from_slice(list);
            }
        } else if let Some(list) = catalog(name) {
            rules.extend_from_slice(list);
        } else {
            return Err(RegistryError::UnknownRuleSet {
                name: name.to_string(),
            });
        }
    }
    Ok(rules)
}

// ============================================================================
// Tests
// ============================================================================
