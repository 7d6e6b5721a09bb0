//! Source transformer: move an agent from `BotAI` to `AresBot`.
//!
//! Three rewrites, all computed against the original syntax tree:
//!
//! 1. `from <old module> import <old base>` becomes the new base import.
//! 2. Every class deriving from the old (or new) base derives from the new
//!    base; the first such class names the synthesized base calls.
//! 3. Every recognized lifecycle hook declared directly in a top-level class
//!    gets `await super(Class, self).hook(args)` as its first statement,
//!    unless its body already chains to the base implementation.
//!
//! A file needing none of these is reported unchanged and never rewritten.
//!
//! Hooks are injected in every top-level class, and all of them use the one
//! captured class name. With several agent classes in one file the calls
//! for the second class name the first. A class deriving from neither base
//! that still receives calls is logged and listed in
//! [`TransformOutcome::unmatched_classes`].

use std::collections::HashSet;
use std::fs;
use std::ops::Range;
use std::path::Path;

use ast_grep_core::Node;
use botmig_config::CodemodConfig;
use botmig_core::hooks::find_hook;
use botmig_core::{HookInjection, LifecycleHook, TransformOutcome};
use tracing::{debug, info, warn};

use crate::edits::{self, Edit, indent_at, line_end, line_start, newline, starts_line};
use crate::error::CodemodError;
use crate::parser::{
    self, class_methods, first_error_line, is_async_function, is_docstring, parse_python,
    read_from_import, statements, top_level_classes,
};

const INDENT_UNIT: &str = "    ";

/// Rewritten source plus what changed.
#[derive(Debug, Clone)]
pub struct Transformed {
    pub source: String,
    pub outcome: TransformOutcome,
}

/// Transform the file at `path` in place. The file is written only when
/// its content changes.
pub fn transform_file(path: &Path, config: &CodemodConfig) -> Result<TransformOutcome, CodemodError> {
    let source = fs::read_to_string(path).map_err(|e| CodemodError::io(path, e))?;
    let transformed = transform_source(&source, config).map_err(|line| CodemodError::Syntax {
        path: path.to_path_buf(),
        line,
    })?;

    let mut outcome = transformed.outcome;
    outcome.path = path.to_path_buf();
    if outcome.changed {
        fs::write(path, &transformed.source).map_err(|e| CodemodError::io(path, e))?;
        info!(
            path = %path.display(),
            hooks = ?outcome.injected_hooks(),
            "agent source converted"
        );
    } else {
        info!(path = %path.display(), "agent source already migrated");
    }
    Ok(outcome)
}

/// Transform Python source text.
///
/// # Errors
/// Returns the 1-based line of the first syntax error when the source does
/// not parse cleanly.
pub fn transform_source(source: &str, config: &CodemodConfig) -> Result<Transformed, usize> {
    let tree = parse_python(source);
    let root = tree.root();
    if let Some(line) = first_error_line(&root) {
        return Err(line);
    }

    let mut edits = Vec::new();
    let mut outcome = TransformOutcome::default();

    let aliases = rewrite_imports(source, &root, config, &mut edits, &mut outcome);

    let mut captured = None;
    let mut agent_classes = HashSet::new();
    for class in top_level_classes(&root) {
        let rewritten = rewrite_bases(&class, config, &aliases, &mut edits);
        if let Some(rewritten) = rewritten {
            agent_classes.insert(class.range().start);
            outcome.bases_rewritten += rewritten;
            if captured.is_none() {
                captured = class.field("name").map(|n| n.text().to_string());
            }
        }
    }

    if outcome.bases_rewritten > 0 && !outcome.import_rewritten && !imports_new_base(&root, config)
    {
        edits.push(insert_new_import(source, &root, config));
        outcome.import_rewritten = true;
    }

    outcome.class_name_defaulted = captured.is_none();
    outcome.class_name = captured.unwrap_or_else(|| config.default_class_name.clone());
    if outcome.class_name_defaulted {
        debug!(
            default = %outcome.class_name,
            "no class derives from the old or new base; using default class name"
        );
    }

    for class in top_level_classes(&root) {
        let injected_before = outcome.injected.len();
        for method in class_methods(&class) {
            let Some(name) = method.field("name").map(|n| n.text().to_string()) else {
                continue;
            };
            let Some(hook) = find_hook(&config.hooks, &name) else {
                continue;
            };
            match chain_hook(source, &method, hook, &outcome.class_name) {
                HookEdit::AlreadyChained => outcome.already_chained.push(name),
                HookEdit::Inject {
                    edits: hook_edits,
                    injection,
                } => {
                    edits.extend(hook_edits);
                    outcome.injected.push(injection);
                }
            }
        }
        let got_calls = outcome.injected.len() > injected_before;
        if got_calls && !agent_classes.contains(&class.range().start) {
            let name = class
                .field("name")
                .map(|n| n.text().to_string())
                .unwrap_or_default();
            warn!(
                class = %name,
                base = %config.new_base,
                "base calls added to a class that does not derive from the new base"
            );
            outcome.unmatched_classes.push(name);
        }
    }

    outcome.changed = !edits.is_empty();
    let source = if outcome.changed {
        edits::apply(source, edits)
    } else {
        source.to_string()
    };
    Ok(Transformed { source, outcome })
}

/// Rewrite old-base imports. Returns every name the old base is bound to.
fn rewrite_imports<D: ast_grep_core::Doc>(
    source: &str,
    root: &Node<D>,
    config: &CodemodConfig,
    edits: &mut Vec<Edit>,
    outcome: &mut TransformOutcome,
) -> HashSet<String> {
    let mut aliases = HashSet::from([config.old_base.clone()]);
    let mut new_import_present = imports_new_base(root, config);
    let nl = newline(source);

    for node in parser::descendants_of_kind(root, "import_from_statement") {
        let Some(import) = read_from_import(&node) else {
            continue;
        };
        if !config.old_modules.contains(&import.module) {
            continue;
        }
        let Some(old) = import.names.iter().find(|n| n.name == config.old_base) else {
            continue;
        };
        aliases.insert(old.bound.clone());

        let range = node.range();
        let others: Vec<_> = import
            .names
            .iter()
            .filter(|n| n.name != config.old_base)
            .map(|n| &source[n.range.clone()])
            .collect();

        if others.is_empty() {
            if new_import_present {
                edits.push(Edit::replace(removal_span(source, range), ""));
            } else {
                edits.push(Edit::replace(range, config.new_import()));
            }
        } else {
            let kept = format!("from {} import {}", import.module, others.join(", "));
            if new_import_present {
                edits.push(Edit::replace(range, kept));
            } else {
                let indent = indent_at(source, range.start);
                edits.push(Edit::replace(
                    range,
                    format!("{kept}{nl}{indent}{}", config.new_import()),
                ));
            }
        }
        new_import_present = true;
        outcome.import_rewritten = true;
        debug!(module = %import.module, "old base import rewritten");
    }
    aliases
}

/// The span to delete to drop one simple statement: its whole line when it
/// stands alone, otherwise the statement and one adjoining `;` separator.
fn removal_span(source: &str, range: Range<usize>) -> Range<usize> {
    let end_of_line = line_end(source, range.end);
    let rest = &source[range.end..end_of_line];
    if starts_line(source, range.start) && rest.trim().is_empty() {
        let end = (end_of_line + newline(source).len()).min(source.len());
        return line_start(source, range.start)..end;
    }
    if let Some(tail) = rest.trim_start_matches([' ', '\t']).strip_prefix(';') {
        let end = end_of_line - tail.trim_start_matches([' ', '\t']).len();
        return range.start..end;
    }
    match source[..range.start]
        .trim_end_matches([' ', '\t'])
        .strip_suffix(';')
    {
        Some(head) => head.len()..range.end,
        None => range,
    }
}

fn imports_new_base<D: ast_grep_core::Doc>(root: &Node<D>, config: &CodemodConfig) -> bool {
    parser::from_imports(root).iter().any(|import| {
        import.module == config.new_module
            && import.names.iter().any(|n| n.name == config.new_base)
    })
}

/// Place the new import after the last top-level import, else after the
/// module docstring, else at the top.
fn insert_new_import<D: ast_grep_core::Doc>(
    source: &str,
    root: &Node<D>,
    config: &CodemodConfig,
) -> Edit {
    let nl = newline(source);
    let last_import = root
        .children()
        .filter(|c| {
            matches!(
                c.kind().as_ref(),
                "import_statement" | "import_from_statement" | "future_import_statement"
            )
        })
        .last();
    match last_import {
        Some(import) => Edit::insert(
            line_end(source, import.range().end),
            format!("{nl}{}", config.new_import()),
        ),
        None => match statements(root).first() {
            Some(doc) if is_docstring(doc) => Edit::insert(
                line_end(source, doc.range().end),
                format!("{nl}{}", config.new_import()),
            ),
            _ => Edit::insert(0, format!("{}{nl}", config.new_import())),
        },
    }
}

/// Normalize a class's base list. `None` when the class derives from
/// neither base; otherwise the number of edits made (possibly 0).
fn rewrite_bases<D: ast_grep_core::Doc>(
    class: &Node<D>,
    config: &CodemodConfig,
    aliases: &HashSet<String>,
    edits: &mut Vec<Edit>,
) -> Option<usize> {
    let superclasses = class.field("superclasses")?;
    let old_suffix = format!(".{}", config.old_base);
    let mut matched = false;
    let mut rewritten = 0;
    for base in superclasses
        .children()
        .filter(|c| matches!(c.kind().as_ref(), "identifier" | "attribute"))
    {
        let text = base.text();
        if text.as_ref() == config.new_base {
            matched = true;
        } else if aliases.contains(text.as_ref()) || text.ends_with(&old_suffix) {
            matched = true;
            rewritten += 1;
            edits.push(Edit::replace(base.range(), config.new_base.clone()));
        }
    }
    matched.then_some(rewritten)
}

enum HookEdit {
    AlreadyChained,
    Inject {
        edits: Vec<Edit>,
        injection: HookInjection,
    },
}

fn chain_hook<D: ast_grep_core::Doc>(
    source: &str,
    method: &Node<D>,
    hook: &LifecycleHook,
    class_name: &str,
) -> HookEdit {
    let Some(body) = method.field("body") else {
        return HookEdit::AlreadyChained;
    };
    if chains_to_base(&body, &hook.name) {
        return HookEdit::AlreadyChained;
    }

    let args = forwarded_args(method);
    if args.len() != hook.params.len() {
        debug!(hook = %hook.name, declared = ?args, canonical = ?hook.params, "hook signature differs from canonical");
    }
    let call = hook.render_call(class_name, &args);
    let nl = newline(source);
    let def_start = method.range().start;
    let mut edits = Vec::new();

    let made_async = !is_async_function(method);
    if made_async {
        edits.push(Edit::insert(def_start, "async "));
    }

    let stmts = statements(&body);
    let anchor = match stmts.as_slice() {
        [doc, next, ..] if is_docstring(doc) => Some(next),
        [doc] if is_docstring(doc) => {
            let at = doc.range().start;
            let indent = if starts_line(source, at) {
                indent_at(source, at).to_string()
            } else {
                // `def on_start(self): """doc"""`: move the docstring down first.
                let indent = format!("{}{INDENT_UNIT}", indent_at(source, def_start));
                let gap = source[..at].trim_end_matches([' ', '\t']).len();
                edits.push(Edit::replace(gap..at, format!("{nl}{indent}")));
                indent
            };
            edits.push(Edit::insert(
                line_end(source, doc.range().end),
                format!("{nl}{indent}{call}"),
            ));
            None
        }
        [first, ..] => Some(first),
        [] => None,
    };

    if let Some(stmt) = anchor {
        let at = stmt.range().start;
        if starts_line(source, at) {
            let indent = indent_at(source, at);
            edits.push(Edit::insert(
                line_start(source, at),
                format!("{indent}{call}{nl}"),
            ));
        } else {
            // One-line body (`def on_step(self, i): pass`): break it open.
            let indent = format!("{}{INDENT_UNIT}", indent_at(source, def_start));
            let gap = source[..at].trim_end_matches([' ', '\t']).len();
            edits.push(Edit::replace(
                gap..at,
                format!("{nl}{indent}{call}{nl}{indent}"),
            ));
        }
    }

    HookEdit::Inject {
        edits,
        injection: HookInjection {
            hook: hook.name.clone(),
            line: method.start_pos().line() + 1,
            call,
            made_async,
        },
    }
}

/// True when the body calls `super(...).<hook>(...)` anywhere.
fn chains_to_base<D: ast_grep_core::Doc>(body: &Node<D>, hook: &str) -> bool {
    parser::descendants_of_kind(body, "call").iter().any(|call| {
        let Some(function) = call.field("function") else {
            return false;
        };
        if function.kind().as_ref() != "attribute" {
            return false;
        }
        let named_hook = function
            .field("attribute")
            .is_some_and(|a| a.text().as_ref() == hook);
        let on_super = function.field("object").is_some_and(|object| {
            object.kind().as_ref() == "call"
                && object
                    .field("function")
                    .is_some_and(|f| f.text().as_ref() == "super")
        });
        named_hook && on_super
    })
}

/// Parameter names after `self`, as call arguments.
///
/// Annotations and defaults are dropped, splats keep their stars, and
/// keyword-only parameters are passed as `name=name`.
fn forwarded_args<D: ast_grep_core::Doc>(method: &Node<D>) -> Vec<String> {
    let Some(params) = method.field("parameters") else {
        return Vec::new();
    };
    let mut args = Vec::new();
    let mut keyword_only = false;
    for param in params
        .children()
        .filter(|c| c.is_named() && c.kind().as_ref() != "comment")
        .skip(1)
    {
        let text = param.text();
        let name = match param.kind().as_ref() {
            "default_parameter" | "typed_default_parameter" => param
                .field("name")
                .map(|n| n.text().to_string())
                .unwrap_or_default(),
            "typed_parameter" => text.split(':').next().unwrap_or_default().trim().to_string(),
            _ => text.trim().to_string(),
        };
        match name.as_str() {
            "" | "/" => {}
            "*" => keyword_only = true,
            splat if splat.starts_with('*') => {
                if !splat.starts_with("**") {
                    keyword_only = true;
                }
                args.push(splat.to_string());
            }
            plain if keyword_only => args.push(format!("{plain}={plain}")),
            plain => args.push(plain.to_string()),
        }
    }
    args
}
