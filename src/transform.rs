//! High-level option processing and the single-call transform entry point.
//!
//! This is the layer that turns user-facing flags into composed rule sets,
//! the way the CLI and the library API both consume the engine, so the two
//! expose exactly the same set of options.

use std::collections::BTreeSet;

use downlevel_ast::Node;
use downlevel_transform::{compose_rule_sets, session, SourceType, TransformOptions, TransformOutput};

use crate::error::DlvError;

/// Target ECMAScript version.
///
/// `Es3` additionally quotes reserved words used as property names; it is
/// the target to use when IE8-era engines must parse the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    Es3,
    #[default]
    Es5,
}

/// User-facing transform options.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Turn on the available ES6 transforms (concise methods, rest
    /// parameters, spread).
    pub es6: bool,
    /// Turn on the utility transforms (trailing-comma stripping).
    pub utility: bool,
    pub target: Target,
    /// Parse as an ES6 module (implicit strict mode).
    pub es6_module: bool,
    /// Parse as an ES6 module without implicit strict mode. Useful when
    /// porting non-module code that has not been verified strict-safe.
    pub non_strict_es6_module: bool,
    /// Embed an inline source map in the transformed source.
    pub source_map_inline: bool,
    /// Escape non-ASCII characters in the output.
    pub ascii_only: bool,
    pub source_filename: Option<String>,
    /// Extra feature toggles forwarded to the catalogs
    /// (e.g. `spread-runtime`).
    pub features: BTreeSet<String>,
}

/// Transform `source` (described by `tree`) with the given options.
pub fn transform(
    tree: &Node,
    source: &str,
    options: &Options,
) -> Result<TransformOutput, DlvError> {
    let mut set_names: Vec<&str> = Vec::new();
    if options.es6 {
        set_names.push("es6");
    }
    if options.utility {
        set_names.push("utility");
    }
    if options.target == Target::Es3 {
        set_names.push("target:es3");
    }
    let rules = compose_rule_sets(&set_names)?;

    let source_type = if options.es6_module {
        SourceType::Module
    } else if options.non_strict_es6_module {
        SourceType::ModuleNoStrict
    } else {
        SourceType::Script
    };
    let transform_options = TransformOptions {
        source_type,
        ascii_only: options.ascii_only,
        es3: options.target == Target::Es3,
        features: options.features.clone(),
        filename: options.source_filename.clone(),
        inline_source_map: options.source_map_inline,
    };
    Ok(session::run(&rules, tree, source, &transform_options)?)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_for(source: &str) -> Node {
        // identity-transform trees need nothing but the root
        serde_json::from_str(&format!(
            r#"{{"type": "Program", "range": [0, {}], "body": []}}"#,
            source.len()
        ))
        .unwrap()
    }

    #[test]
    fn no_flags_is_the_identity_transform() {
        let source = "var x = [1, 2, ];\n";
        let output = transform(&tree_for(source), source, &Options::default()).unwrap();
        assert_eq!(output.code, source);
    }

    #[test]
    fn all_flags_still_identity_on_plain_source() {
        let source = "var x = 1;\n";
        let options = Options {
            es6: true,
            utility: true,
            target: Target::Es3,
            ..Options::default()
        };
        let output = transform(&tree_for(source), source, &options).unwrap();
        assert_eq!(output.code, source);
    }

    #[test]
    fn inline_source_map_flag_produces_comment() {
        let source = "f();\n";
        let options = Options {
            source_map_inline: true,
            source_filename: Some("input.js".to_string()),
            ..Options::default()
        };
        let output = transform(&tree_for(source), source, &options).unwrap();
        assert!(output
            .inline_source_map_comment
            .is_some_and(|c| c.starts_with("//# sourceMappingURL=data:application/json")));
        assert_eq!(
            output.source_map.map(|m| m.sources),
            Some(vec!["input.js".to_string()])
        );
    }

    #[test]
    fn ascii_only_escapes_output() {
        let source = "var s = '\u{e9}';";
        let options = Options {
            ascii_only: true,
            ..Options::default()
        };
        let output = transform(&tree_for(source), source, &options).unwrap();
        assert_eq!(output.code, "var s = '\\u00e9';");
    }
}
