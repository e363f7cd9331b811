//! Spread-operator desugaring backed by a shared runtime helper.
//!
//! ```text
//! [1, 2, ...xs]   Array.prototype.concat.apply([],
//!                     [1, 2, ____DOWNLEVEL_SPREAD_RUNTIME____.assertSpreadElement(xs)])
//! f(1, ...xs)     f.apply(undefined, Array.prototype.concat.apply([], [1, ...]))
//! o.m(...xs)      (function() { var _this1 = o; return _this1.m.apply(_this1, ...) })()
//! new C(...xs)    (function() { var _class1 = C, _result2 = Object.create(...) ... })()
//! ```
//!
//! Every call site references the named runtime helper instead of inlining
//! the array check. The runtime prologue is injected once per file when the
//! `spread-runtime` feature toggle is set; otherwise the host environment is
//! expected to load the runtime separately.
//!
//! The parens of a rewritten call become array brackets through a
//! character-level transform catch-up, which also rewrites parens inside
//! comments in that span; the layout survives either way.

use downlevel_ast::{Node, NodeKind};

use crate::engine::Traverser;
use crate::error::TransformError;
use crate::rule::{AncestorPath, Rule, VisitResult};
use crate::session::TransformState;

/// Name of the global the runtime prologue installs.
pub const RUNTIME_GLOBAL: &str = "____DOWNLEVEL_SPREAD_RUNTIME____";

/// Feature toggle that embeds the runtime prologue in the output.
pub const RUNTIME_FEATURE: &str = "spread-runtime";

/// The runtime helper source, injected once per file.
pub const SPREAD_RUNTIME: &str = r"/*global window, self */
(function (global) {
  function assertSpreadElement(array) {
    if (Array.isArray(array)) {
      return array;
    }
    throw new TypeError(array + ' is not an array');
  }
  global.____DOWNLEVEL_SPREAD_RUNTIME____ = {
    assertSpreadElement: assertSpreadElement
  };
})((function () {
  if (typeof window !== 'undefined') {
    return window;
  } else if (typeof global !== 'undefined') {
    return global;
  } else if (typeof self !== 'undefined') {
    return self;
  }
  return this;
})());
";

const SPREAD_ELEMENT_BEGIN: &str = "____DOWNLEVEL_SPREAD_RUNTIME____.assertSpreadElement(";
const SPREAD_ELEMENT_END: &str = ")";
const OUTER_ARRAY_BEGIN: &str = "Array.prototype.concat.apply([],";
const OUTER_ARRAY_END: &str = ")";
const CALL_EXPRESSION_END: &str = "))";
const CLOSURE_BEGIN: &str = "(function() { ";
const CLOSURE_END: &str = "})()";

fn call_expression_begin(context: &str) -> String {
    format!(".apply({context}, Array.prototype.concat.apply([],")
}

pub static VISITOR_LIST: &[Rule] = &[
    Rule {
        name: "spread.runtime-prologue",
        test: wants_runtime_prologue,
        action: visit_program_with_runtime,
    },
    Rule {
        name: "spread.array",
        test: is_array_with_spread,
        action: visit_array_with_spread,
    },
    Rule {
        name: "spread.call",
        test: is_call_with_spread,
        action: visit_call_with_spread,
    },
    Rule {
        name: "spread.new",
        test: is_new_with_spread,
        action: visit_new_with_spread,
    },
];

fn has_spread(nodes: &[Node]) -> bool {
    nodes
        .iter()
        .any(|node| matches!(node.kind, NodeKind::SpreadElement(_)))
}

// ----------------------------------------------------------------------------
// Runtime prologue
// ----------------------------------------------------------------------------

fn wants_runtime_prologue(
    node: &Node,
    _path: &AncestorPath<'_>,
    state: &TransformState<'_>,
) -> bool {
    matches!(node.kind, NodeKind::Program(_)) && state.options.has_feature(RUNTIME_FEATURE)
}

fn visit_program_with_runtime<'ast>(
    _traverser: &Traverser<'_>,
    _node: &'ast Node,
    _path: &mut AncestorPath<'ast>,
    state: &mut TransformState<'_>,
) -> Result<VisitResult, TransformError> {
    state.cursor.append(SPREAD_RUNTIME);
    state.scratch.insert("es6-spread", "runtime-injected", "1");
    Ok(VisitResult::Descend)
}

// ----------------------------------------------------------------------------
// Shared element emission
// ----------------------------------------------------------------------------

/// Emit a run of elements, wrapping each spread in the runtime assertion.
///
/// Every element subtree goes back through the engine before its trailing
/// catch-up, so nested rewrites (including nested spreads) land too.
fn emit_elements_with_spread<'ast>(
    traverser: &Traverser<'_>,
    items: &[&'ast Node],
    path: &mut AncestorPath<'ast>,
    state: &mut TransformState<'_>,
) -> Result<(), TransformError> {
    for item in items {
        state.cursor.catch_up(item.span.start)?;
        if let NodeKind::SpreadElement(spread) = &item.kind {
            state.cursor.append(SPREAD_ELEMENT_BEGIN);
            // skip the `...` marker
            state.cursor.move_to(item.span.start + 3)?;
            traverser.traverse(&spread.argument, path, state)?;
            state.cursor.catch_up(item.span.end)?;
            state.cursor.append(SPREAD_ELEMENT_END);
        } else {
            traverser.traverse(item, path, state)?;
            state.cursor.catch_up(item.span.end)?;
        }
    }
    Ok(())
}

// ----------------------------------------------------------------------------
// Array literals
// ----------------------------------------------------------------------------

fn is_array_with_spread(
    node: &Node,
    _path: &AncestorPath<'_>,
    _state: &TransformState<'_>,
) -> bool {
    match &node.kind {
        NodeKind::ArrayExpression(array) => array
            .elements
            .iter()
            .flatten()
            .any(|el| matches!(el.kind, NodeKind::SpreadElement(_))),
        _ => false,
    }
}

fn visit_array_with_spread<'ast>(
    traverser: &Traverser<'_>,
    node: &'ast Node,
    path: &mut AncestorPath<'ast>,
    state: &mut TransformState<'_>,
) -> Result<VisitResult, TransformError> {
    let NodeKind::ArrayExpression(array) = &node.kind else {
        return Ok(VisitResult::Descend);
    };
    state.cursor.catch_up(node.span.start)?;
    state.cursor.append(OUTER_ARRAY_BEGIN);
    let items: Vec<&Node> = array.elements.iter().flatten().collect();
    emit_elements_with_spread(traverser, &items, path, state)?;
    state.cursor.catch_up(node.span.end)?;
    state.cursor.append(OUTER_ARRAY_END);
    Ok(VisitResult::Handled)
}

// ----------------------------------------------------------------------------
// Call expressions
// ----------------------------------------------------------------------------

fn is_call_with_spread(
    node: &Node,
    _path: &AncestorPath<'_>,
    _state: &TransformState<'_>,
) -> bool {
    match &node.kind {
        NodeKind::CallExpression(call) => has_spread(&call.arguments),
        _ => false,
    }
}

fn visit_call_with_spread<'ast>(
    traverser: &Traverser<'_>,
    node: &'ast Node,
    path: &mut AncestorPath<'ast>,
    state: &mut TransformState<'_>,
) -> Result<VisitResult, TransformError> {
    let NodeKind::CallExpression(call) = &node.kind else {
        return Ok(VisitResult::Descend);
    };
    let Some(first_arg) = call.arguments.first() else {
        return Ok(VisitResult::Descend);
    };
    state.cursor.catch_up(node.span.start)?;

    let is_method_call = matches!(call.callee.kind, NodeKind::MemberExpression(_));
    if let NodeKind::MemberExpression(member) = &call.callee.kind {
        // capture the receiver so `this` survives the apply
        let this_ident = format!("_this{}", state.unique_suffix());
        state.cursor.append(CLOSURE_BEGIN);
        state.cursor.append(&format!("var {this_ident} = "));
        traverser.traverse(&member.object, path, state)?;
        state.cursor.catch_up(member.object.span.end)?;
        state.cursor.append(&format!("; return {this_ident}"));
        state.cursor.catch_up(call.callee.span.end)?;
        state.cursor.append(&call_expression_begin(&this_ident));
    } else {
        traverser.traverse(&call.callee, path, state)?;
        state.cursor.catch_up(call.callee.span.end)?;
        state.cursor.append(&call_expression_begin("undefined"));
    }

    state
        .cursor
        .catch_up_with(first_arg.span.start, |text| text.replace('(', "["))?;
    let items: Vec<&Node> = call.arguments.iter().collect();
    emit_elements_with_spread(traverser, &items, path, state)?;
    state
        .cursor
        .catch_up_with(node.span.end, |text| text.replace(')', "]"))?;
    state.cursor.append(CALL_EXPRESSION_END);
    if is_method_call {
        state.cursor.append(CLOSURE_END);
    }
    Ok(VisitResult::Handled)
}

// ----------------------------------------------------------------------------
// New expressions
// ----------------------------------------------------------------------------

fn is_new_with_spread(
    node: &Node,
    _path: &AncestorPath<'_>,
    _state: &TransformState<'_>,
) -> bool {
    match &node.kind {
        NodeKind::NewExpression(new_expr) => has_spread(&new_expr.arguments),
        _ => false,
    }
}

fn visit_new_with_spread<'ast>(
    traverser: &Traverser<'_>,
    node: &'ast Node,
    path: &mut AncestorPath<'ast>,
    state: &mut TransformState<'_>,
) -> Result<VisitResult, TransformError> {
    let NodeKind::NewExpression(new_expr) = &node.kind else {
        return Ok(VisitResult::Descend);
    };
    let Some(first_arg) = new_expr.arguments.first() else {
        return Ok(VisitResult::Descend);
    };
    let class_ident = format!("_class{}", state.unique_suffix());
    let result_ident = format!("_result{}", state.unique_suffix());

    state.cursor.catch_up(node.span.start)?;
    // drop the `new ` keyword; the instance comes from Object.create below
    state.cursor.move_to(node.span.start + 4)?;
    state.cursor.catch_up(new_expr.callee.span.start)?;
    state.cursor.append(CLOSURE_BEGIN);
    state.cursor.append(&format!("var {class_ident} = "));
    traverser.traverse(&new_expr.callee, path, state)?;
    state.cursor.catch_up(new_expr.callee.span.end)?;
    state.cursor.append(&format!(
        ", {result_ident} = Object.create({class_ident}.prototype), funcResult = \
         {class_ident}.apply({result_ident}, Array.prototype.concat.apply([],"
    ));
    state
        .cursor
        .catch_up_with(first_arg.span.start, |text| text.replace('(', "["))?;
    let items: Vec<&Node> = new_expr.arguments.iter().collect();
    emit_elements_with_spread(traverser, &items, path, state)?;
    state
        .cursor
        .catch_up_with(node.span.end, |text| text.replace(')', "]"))?;
    state.cursor.append(
        ")); if (typeof funcResult !== 'undefined') { return funcResult }",
    );
    state.cursor.append(&format!("; return {result_ident};"));
    state.cursor.append(CLOSURE_END);
    Ok(VisitResult::Handled)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::TransformOptions;
    use crate::testutil::{
        array, call, expr_stmt, ident_at, lit_at, member, new_expr, program, run_rules,
        run_rules_with, sp, spread_el,
    };

    const ASSERT: &str = "____DOWNLEVEL_SPREAD_RUNTIME____.assertSpreadElement";

    fn spread_of_array(src: &str, spread_needle: &str, inner_needle: &str) -> Node {
        let inner_span = sp(src, inner_needle);
        let inner = array(inner_span, vec![]);
        spread_el(sp(src, spread_needle), inner)
    }

    mod runtime_prologue {
        use super::*;

        fn runtime_options() -> TransformOptions {
            let mut options = TransformOptions::default();
            options.features.insert(RUNTIME_FEATURE.to_string());
            options
        }

        #[test]
        fn injected_when_feature_is_set() {
            let src = "";
            let root = program(src, vec![]);
            assert_eq!(
                run_rules_with(VISITOR_LIST, &root, src, &runtime_options()),
                SPREAD_RUNTIME
            );
        }

        #[test]
        fn not_injected_otherwise() {
            let src = "";
            let root = program(src, vec![]);
            assert_eq!(run_rules(VISITOR_LIST, &root, src), "");
        }

        #[test]
        fn prologue_precedes_rewritten_code() {
            let src = "[...xs];";
            let items = vec![Some(spread_el(sp(src, "...xs"), ident_at(src, "xs", 0)))];
            let root = program(src, vec![expr_stmt(array(sp(src, "[...xs]"), items))]);
            let output = run_rules_with(VISITOR_LIST, &root, src, &runtime_options());
            assert!(output.starts_with(SPREAD_RUNTIME));
            assert!(output.ends_with(&format!(
                "Array.prototype.concat.apply([],[{}(xs)]);",
                ASSERT
            )));
        }
    }

    mod array_spread {
        use super::*;

        #[test]
        fn concat_wraps_the_literal() {
            let src = "[1, 2, ...[3, 4]]";
            let spread = spread_of_array(src, "...[3, 4]", "[3, 4]");
            let items = vec![
                Some(lit_at(src, "1", 0)),
                Some(lit_at(src, "2", 0)),
                Some(spread),
            ];
            let root = program(src, vec![expr_stmt(array(sp(src, "[1, 2, ...[3, 4]]"), items))]);
            assert_eq!(
                run_rules(VISITOR_LIST, &root, src),
                format!(
                    "Array.prototype.concat.apply([],[1, 2, {}([3, 4])])",
                    ASSERT
                )
            );
        }

        #[test]
        fn only_spread_works() {
            let src = "[...[1, 2]]";
            let spread = spread_of_array(src, "...[1, 2]", "[1, 2]");
            let root = program(
                src,
                vec![expr_stmt(array(sp(src, "[...[1, 2]]"), vec![Some(spread)]))],
            );
            assert_eq!(
                run_rules(VISITOR_LIST, &root, src),
                format!("Array.prototype.concat.apply([],[{}([1, 2])])", ASSERT)
            );
        }

        #[test]
        fn line_breaks_and_comments_survive() {
            let src = "[1 /*mycomments*/, 2,\n...[3,\n 4]]";
            let inner_span = sp(src, "[3,\n 4]");
            let spread = spread_el(sp(src, "...[3,\n 4]"), array(inner_span, vec![]));
            let items = vec![
                Some(lit_at(src, "1", 0)),
                Some(lit_at(src, "2", 0)),
                Some(spread),
            ];
            let root = program(src, vec![expr_stmt(array(sp(src, src), items))]);
            assert_eq!(
                run_rules(VISITOR_LIST, &root, src),
                format!(
                    "Array.prototype.concat.apply([],[1 /*mycomments*/, 2,\n{}([3,\n 4])])",
                    ASSERT
                )
            );
        }
    }

    mod call_spread {
        use super::*;

        #[test]
        fn plain_call_applies_undefined() {
            let src = "returnArgs(1, 2,...[3, 4])";
            let spread = spread_of_array(src, "...[3, 4]", "[3, 4]");
            let root = program(
                src,
                vec![expr_stmt(call(
                    sp(src, src),
                    ident_at(src, "returnArgs", 0),
                    vec![lit_at(src, "1", 0), lit_at(src, "2", 0), spread],
                ))],
            );
            assert_eq!(
                run_rules(VISITOR_LIST, &root, src),
                format!(
                    "returnArgs.apply(undefined, Array.prototype.concat.apply([],\
                     [1, 2,{}([3, 4])]))",
                    ASSERT
                )
            );
        }

        #[test]
        fn comments_between_callee_and_args_survive() {
            let src = "returnArgs  /*comments*/(\n 1, 2,\n ...[3, 4]\n)";
            let spread = spread_of_array(src, "...[3, 4]", "[3, 4]");
            let root = program(
                src,
                vec![expr_stmt(call(
                    sp(src, src),
                    ident_at(src, "returnArgs", 0),
                    vec![lit_at(src, "1", 0), lit_at(src, "2", 0), spread],
                ))],
            );
            assert_eq!(
                run_rules(VISITOR_LIST, &root, src),
                format!(
                    "returnArgs.apply(undefined, Array.prototype.concat.apply([],  \
                     /*comments*/[\n 1, 2,\n {}([3, 4])\n]))",
                    ASSERT
                )
            );
        }

        #[test]
        fn method_call_captures_this() {
            let src = "object.returnArgsAndThis(1, 2,...[3, 4])";
            let callee = member(
                sp(src, "object.returnArgsAndThis"),
                ident_at(src, "object", 0),
                ident_at(src, "returnArgsAndThis", 0),
            );
            let spread = spread_of_array(src, "...[3, 4]", "[3, 4]");
            let root = program(
                src,
                vec![expr_stmt(call(
                    sp(src, src),
                    callee,
                    vec![lit_at(src, "1", 0), lit_at(src, "2", 0), spread],
                ))],
            );
            assert_eq!(
                run_rules(VISITOR_LIST, &root, src),
                format!(
                    "(function() {{ var _this1 = object; return _this1.returnArgsAndThis\
                     .apply(_this1, Array.prototype.concat.apply([],[1, 2,{}([3, 4])]))}})()",
                    ASSERT
                )
            );
        }
    }

    mod new_spread {
        use super::*;

        #[test]
        fn instance_built_with_object_create() {
            let src = "new MyClass(...[1, 2])";
            let spread = spread_of_array(src, "...[1, 2]", "[1, 2]");
            let root = program(
                src,
                vec![expr_stmt(new_expr(
                    sp(src, src),
                    ident_at(src, "MyClass", 0),
                    vec![spread],
                ))],
            );
            assert_eq!(
                run_rules(VISITOR_LIST, &root, src),
                format!(
                    "(function() {{ var _class1 = MyClass, _result2 = \
                     Object.create(_class1.prototype), funcResult = _class1.apply(_result2, \
                     Array.prototype.concat.apply([],[{}([1, 2])])); \
                     if (typeof funcResult !== 'undefined') {{ return funcResult }}\
                     ; return _result2;}})()",
                    ASSERT
                )
            );
        }
    }

    mod nesting {
        use super::*;

        #[test]
        fn spread_inside_spread_argument_is_rewritten() {
            let src = "[...[1, ...xs]]";
            let inner_spread = spread_el(sp(src, "...xs"), ident_at(src, "xs", 0));
            let inner = array(
                sp(src, "[1, ...xs]"),
                vec![Some(lit_at(src, "1", 0)), Some(inner_spread)],
            );
            let outer_spread = spread_el(sp(src, "...[1, ...xs]"), inner);
            let root = program(
                src,
                vec![expr_stmt(array(sp(src, src), vec![Some(outer_spread)]))],
            );
            assert_eq!(
                run_rules(VISITOR_LIST, &root, src),
                format!(
                    "Array.prototype.concat.apply([],[{assert}(\
                     Array.prototype.concat.apply([],[1, {assert}(xs)]))])",
                    assert = ASSERT
                )
            );
        }

        #[test]
        fn sibling_rewrites_get_distinct_temporaries() {
            let src = "o.m(...xs); p.n(...ys);";
            let first = call(
                sp(src, "o.m(...xs)"),
                member(sp(src, "o.m"), ident_at(src, "o", 0), ident_at(src, "m", 0)),
                vec![spread_el(sp(src, "...xs"), ident_at(src, "xs", 0))],
            );
            let second = call(
                sp(src, "p.n(...ys)"),
                member(sp(src, "p.n"), ident_at(src, "p", 0), ident_at(src, "n", 0)),
                vec![spread_el(sp(src, "...ys"), ident_at(src, "ys", 0))],
            );
            let root = program(src, vec![expr_stmt(first), expr_stmt(second)]);
            let output = run_rules(VISITOR_LIST, &root, src);
            assert!(output.contains("var _this1 = o"));
            assert!(output.contains("var _this2 = p"));
        }
    }
}
