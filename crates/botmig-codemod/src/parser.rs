//! ast-grep wrapper and Python syntax-tree helpers.

use ast_grep_core::Node;
use ast_grep_core::tree_sitter::StrDoc;
use ast_grep_language::SupportLang;

/// The concrete AST tree type returned by [`parse_python`].
pub type AstTree = ast_grep_core::AstGrep<StrDoc<SupportLang>>;

/// Parse Python source into an ast-grep tree.
#[must_use]
pub fn parse_python(source: &str) -> AstTree {
    use ast_grep_language::LanguageExt;
    SupportLang::Python.ast_grep(source)
}

/// 1-based line of the first error or missing node, if the tree has one.
pub fn first_error_line<D: ast_grep_core::Doc>(root: &Node<D>) -> Option<usize> {
    if root.is_error() || root.is_missing() {
        return Some(root.start_pos().line() + 1);
    }
    root.children().find_map(|child| first_error_line(&child))
}

/// Collect every descendant of `node` (including itself) with the given kind.
pub fn descendants_of_kind<'r, D: ast_grep_core::Doc>(
    node: &Node<'r, D>,
    kind: &str,
) -> Vec<Node<'r, D>> {
    let mut found = Vec::new();
    collect_kind(node, kind, &mut found);
    found
}

fn collect_kind<'r, D: ast_grep_core::Doc>(
    node: &Node<'r, D>,
    kind: &str,
    found: &mut Vec<Node<'r, D>>,
) {
    if node.kind().as_ref() == kind {
        found.push(node.clone());
    }
    for child in node.children() {
        collect_kind(&child, kind, found);
    }
}

/// Unwrap `decorated_definition` to the class or function it decorates.
pub fn definition<'r, D: ast_grep_core::Doc>(node: &Node<'r, D>) -> Option<Node<'r, D>> {
    match node.kind().as_ref() {
        "class_definition" | "function_definition" => Some(node.clone()),
        "decorated_definition" => node.children().find(|c| {
            let k = c.kind();
            k.as_ref() == "class_definition" || k.as_ref() == "function_definition"
        }),
        _ => None,
    }
}

/// Top-level class definitions, decorated or not.
pub fn top_level_classes<'r, D: ast_grep_core::Doc>(root: &Node<'r, D>) -> Vec<Node<'r, D>> {
    root.children()
        .filter_map(|child| definition(&child))
        .filter(|def| def.kind().as_ref() == "class_definition")
        .collect()
}

/// Methods declared directly in a class body, decorated or not.
pub fn class_methods<'r, D: ast_grep_core::Doc>(class: &Node<'r, D>) -> Vec<Node<'r, D>> {
    let Some(body) = class.field("body") else {
        return Vec::new();
    };
    body.children()
        .filter_map(|child| definition(&child))
        .filter(|def| def.kind().as_ref() == "function_definition")
        .collect()
}

/// Statements of a block, skipping comments and punctuation.
pub fn statements<'r, D: ast_grep_core::Doc>(block: &Node<'r, D>) -> Vec<Node<'r, D>> {
    block
        .children()
        .filter(|c| c.is_named() && c.kind().as_ref() != "comment")
        .collect()
}

/// True for an expression statement consisting of a single string literal.
pub fn is_docstring<D: ast_grep_core::Doc>(statement: &Node<D>) -> bool {
    if statement.kind().as_ref() != "expression_statement" {
        return false;
    }
    let mut named = statement.children().filter(|c| c.is_named());
    matches!(
        (named.next(), named.next()),
        (Some(only), None) if matches!(only.kind().as_ref(), "string" | "concatenated_string")
    )
}

/// True when a `def` carries the `async` keyword.
pub fn is_async_function<D: ast_grep_core::Doc>(function: &Node<D>) -> bool {
    function
        .children()
        .next()
        .is_some_and(|first| first.kind().as_ref() == "async")
}

/// A `from MODULE import NAME[, NAME...]` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FromImport {
    /// Module as written, including leading dots for relative imports.
    pub module: String,
    /// Number of leading dots; 0 for absolute imports.
    pub level: usize,
    pub names: Vec<ImportedName>,
}

/// One name of a `from` import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedName {
    /// Name in the source module.
    pub name: String,
    /// Name bound in the importing module (the alias, if any).
    pub bound: String,
    /// Byte range of the name (including `as alias`) in the source.
    pub range: std::ops::Range<usize>,
}

/// Read a `import_from_statement` node. Wildcard imports yield no names.
pub fn read_from_import<D: ast_grep_core::Doc>(node: &Node<D>) -> Option<FromImport> {
    if node.kind().as_ref() != "import_from_statement" {
        return None;
    }
    let module_node = node.field("module_name")?;
    let module = module_node.text().split_whitespace().collect::<String>();
    let level = module.chars().take_while(|c| *c == '.').count();

    let mut names = Vec::new();
    let mut after_import = false;
    for child in node.children() {
        let kind = child.kind();
        match kind.as_ref() {
            "import" => after_import = true,
            "dotted_name" if after_import => {
                let name = child.text().to_string();
                names.push(ImportedName {
                    bound: name.clone(),
                    name,
                    range: child.range(),
                });
            }
            "aliased_import" if after_import => {
                let Some(name) = child.field("name") else {
                    continue;
                };
                let name = name.text().to_string();
                let bound = child
                    .field("alias")
                    .map_or_else(|| name.clone(), |alias| alias.text().to_string());
                names.push(ImportedName {
                    name,
                    bound,
                    range: child.range(),
                });
            }
            _ => {}
        }
    }

    Some(FromImport {
        module,
        level,
        names,
    })
}

/// Every `from` import in the tree, in source order.
pub fn from_imports<D: ast_grep_core::Doc>(root: &Node<D>) -> Vec<FromImport> {
    descendants_of_kind(root, "import_from_statement")
        .iter()
        .filter_map(read_from_import)
        .collect()
}
