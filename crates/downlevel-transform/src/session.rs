//! Transform session: one end-to-end invocation of the engine.
//!
//! A session wires the cursor to the source text, seeds the shared state
//! bag, runs the dispatch engine from the tree root, flushes the remaining
//! tail of the source, and returns the final text plus positional mapping
//! data. Sessions share nothing: state and cursor are created at session
//! start and discarded at session end, so rule lists can safely be reused
//! across concurrent sessions.

use std::collections::{BTreeMap, BTreeSet};

use downlevel_ast::Node;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cursor::Cursor;
use crate::engine::Traverser;
use crate::error::TransformError;
use crate::rule::{AncestorPath, Rule};
use crate::source_map::SourceMap;

/// How the external parser treated the input.
///
/// Carried for rule catalogs and parser glue to agree on; the core itself
/// does not branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceType {
    #[default]
    Script,
    Module,
    /// An ES module parsed without implicit strict mode.
    ModuleNoStrict,
}

/// Immutable options for one transform session.
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    pub source_type: SourceType,
    /// Escape non-ASCII output characters to `\uXXXX` form.
    pub ascii_only: bool,
    /// Targeting a low ECMAScript level (ES3): reserved words need quoting.
    pub es3: bool,
    /// Free-form feature toggles consumed by individual catalogs
    /// (e.g. `spread-runtime`).
    pub features: BTreeSet<String>,
    /// Source filename, used for source-map `sources` entries.
    pub filename: Option<String>,
    /// Produce a source map and its inline data-URI comment.
    pub inline_source_map: bool,
}

impl TransformOptions {
    pub fn has_feature(&self, name: &str) -> bool {
        self.features.contains(name)
    }
}

/// Catalog-keyed stacks of lexically scoped string tables.
///
/// Rule catalogs that track per-closure context (alias tables, scope marks)
/// push and pop scopes around the subtrees they traverse; the core stores
/// the tables but never interprets them. Keys are catalog identities, so
/// independently authored catalogs cannot collide.
#[derive(Debug, Default)]
pub struct SideTables {
    tables: BTreeMap<&'static str, Vec<BTreeMap<String, String>>>,
}

impl SideTables {
    /// Open a new innermost scope for `catalog`.
    pub fn push_scope(&mut self, catalog: &'static str) {
        self.tables.entry(catalog).or_default().push(BTreeMap::new());
    }

    /// Close the innermost scope for `catalog`, if one is open.
    pub fn pop_scope(&mut self, catalog: &'static str) {
        if let Some(stack) = self.tables.get_mut(catalog) {
            stack.pop();
        }
    }

    /// Bind `key` in the innermost scope for `catalog`, opening a root scope
    /// if none exists.
    pub fn insert(
        &mut self,
        catalog: &'static str,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        let stack = self.tables.entry(catalog).or_default();
        if stack.is_empty() {
            stack.push(BTreeMap::new());
        }
        if let Some(scope) = stack.last_mut() {
            scope.insert(key.into(), value.into());
        }
    }

    /// Resolve `key` against the scope stack for `catalog`, innermost first.
    pub fn lookup(&self, catalog: &'static str, key: &str) -> Option<&str> {
        let stack = self.tables.get(catalog)?;
        stack
            .iter()
            .rev()
            .find_map(|scope| scope.get(key))
            .map(String::as_str)
    }

    /// Number of open scopes for `catalog`.
    pub fn depth(&self, catalog: &'static str) -> usize {
        self.tables.get(catalog).map(Vec::len).unwrap_or(0)
    }
}

/// Mutable state threaded through every traversal call for one session.
#[derive(Debug)]
pub struct TransformState<'src> {
    pub options: TransformOptions,
    pub cursor: Cursor<'src>,
    /// Catalog-specific scoped tables; the core stores, catalogs interpret.
    pub scratch: SideTables,
    next_unique: u32,
}

impl<'src> TransformState<'src> {
    pub fn new(source: &'src str, options: TransformOptions) -> Self {
        let ascii_only = options.ascii_only;
        TransformState {
            options,
            cursor: Cursor::new(source, ascii_only),
            scratch: SideTables::default(),
            next_unique: 0,
        }
    }

    /// The source text under transformation.
    pub fn source(&self) -> &'src str {
        self.cursor.source()
    }

    /// Session-unique suffix for generated identifiers (`_this3`).
    ///
    /// A counter rather than a random value: sibling rewrites cannot
    /// collide, and repeated runs stay byte-for-byte identical.
    pub fn unique_suffix(&mut self) -> u32 {
        self.next_unique += 1;
        self.next_unique
    }
}

/// Result of one transform session.
#[derive(Debug)]
pub struct TransformOutput {
    pub code: String,
    pub source_map: Option<SourceMap>,
    pub inline_source_map_comment: Option<String>,
}

/// Run one transform session over `source` with the given composed rules.
///
/// The tree must describe `source`: node ranges are byte offsets into it.
/// On success the returned code accounts for every input byte (copied or
/// explicitly discarded by a rule); on any rule or cursor error the session
/// aborts with no output.
pub fn run(
    rules: &[Rule],
    root: &Node,
    source: &str,
    options: &TransformOptions,
) -> Result<TransformOutput, TransformError> {
    debug!(
        rules = rules.len(),
        source_len = source.len(),
        "transform session start"
    );
    let mut state = TransformState::new(source, options.clone());
    let traverser = Traverser::new(rules);
    let mut path = AncestorPath::new();
    traverser.traverse(root, &mut path, &mut state)?;

    // flush the untouched tail of the source
    state.cursor.catch_up(source.len())?;

    let TransformState { cursor, .. } = state;
    let (code, segments) = cursor.finish()?;

    let (source_map, inline_source_map_comment) = if options.inline_source_map {
        let map = SourceMap::from_segments(&segments, source, &code, options.filename.as_deref());
        let comment = map.to_inline_comment()?;
        (Some(map), Some(comment))
    } else {
        (None, None)
    };

    debug!(output_len = code.len(), "transform session complete");
    Ok(TransformOutput {
        code,
        source_map,
        inline_source_map_comment,
    })
}

// ============================================================================
// Tests
// ============================================================================
