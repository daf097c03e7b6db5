use snafu::Snafu;
use tracing::{debug, warn};

use crate::parser::line_classifier::{
    DEFAULT_INDENT_WIDTH, LineClassifier, LineRecord, ParseWarning, WarningKind,
    starts_with_tree_glyph,
};
use crate::tree::{Node, NodeKind};

pub const DEFAULT_ROOT_NAME: &str = "my-project";

/// Result of a successful parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTree {
    pub root: Node,
    pub warnings: Vec<ParseWarning>,
}

#[derive(Debug, Clone)]
pub struct TreeParser {
    default_root_name: String,
}

impl Default for TreeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeParser {
    pub fn new() -> Self {
        TreeParser {
            default_root_name: DEFAULT_ROOT_NAME.to_string(),
        }
    }

    /// Name of the root synthesised when the input starts directly with branches.
    pub fn with_default_root_name(mut self, name: impl Into<String>) -> Self {
        self.default_root_name = name.into();
        self
    }

    pub fn parse(&self, input: &str) -> Result<ParsedTree, StructureError> {
        let lines = dedent(input);
        if lines.is_empty() {
            return EmptyInputSnafu.fail();
        }

        let mut classifier = LineClassifier::new().with_indent_width(infer_indent_width(&lines));
        let records = lines
            .iter()
            .enumerate()
            .filter_map(|(index, line)| classifier.classify(index + 1, line))
            .collect::<Vec<_>>();
        let mut warnings = classifier.into_warnings();

        let root = build_tree(records, &self.default_root_name, &mut warnings)?;
        debug!("Built tree with {} nodes", root.count());
        Ok(ParsedTree { root, warnings })
    }
}

/// Assembles classified records into a single rooted tree.
///
/// The first record is the root when it was classified as one; otherwise a
/// directory named `default_root_name` is put on top and a warning recorded.
pub fn build_tree(
    records: impl IntoIterator<Item = LineRecord>,
    default_root_name: &str,
    warnings: &mut Vec<ParseWarning>,
) -> Result<Node, StructureError> {
    let mut records = records.into_iter();

    let mut stack = match records.next() {
        None => return NoRootSnafu.fail(),
        Some(record) if record.is_root => {
            AncestorStack::new(Node::new(record.name, NodeKind::Directory, record.comment))
        }
        Some(record) => {
            warn!(
                "No root line found, creating '{}' to hold the tree",
                default_root_name
            );
            warnings.push(ParseWarning {
                line: record.line,
                kind: WarningKind::MissingRoot(default_root_name.to_string()),
            });
            let mut stack = AncestorStack::new(Node::directory(default_root_name));
            stack.attach(record);
            stack
        }
    };

    for record in records {
        stack.attach(record);
    }

    Ok(stack.finish())
}

struct OpenAncestor {
    depth: usize,
    node: Node,
}

/// Nodes whose subtree is still being filled, deepest last. The root sits
/// outside the stack at depth 0 and is never closed before `finish`.
struct AncestorStack {
    root: Node,
    open: Vec<OpenAncestor>,
}

impl AncestorStack {
    fn new(root: Node) -> Self {
        AncestorStack {
            root,
            open: Vec::new(),
        }
    }

    fn attach(&mut self, record: LineRecord) {
        // Unindented lines after the root are its children, never a second root.
        let depth = record.depth.max(1);
        while self.top_depth() >= depth {
            self.close_top();
        }

        if depth > self.top_depth() + 1 {
            debug!(
                "Line {} is indented past its parent, attaching '{}' to the deepest open entry",
                record.line, record.name
            );
        }

        self.open.push(OpenAncestor {
            depth,
            node: Node::new(record.name, record.kind, record.comment),
        });
    }

    fn top_depth(&self) -> usize {
        self.open.last().map_or(0, |ancestor| ancestor.depth)
    }

    fn parent_mut(&mut self) -> &mut Node {
        match self.open.last_mut() {
            Some(ancestor) => &mut ancestor.node,
            None => &mut self.root,
        }
    }

    fn close_top(&mut self) {
        if let Some(closed) = self.open.pop() {
            self.parent_mut().push_child(closed.node);
        }
    }

    fn finish(mut self) -> Node {
        while !self.open.is_empty() {
            self.close_top();
        }
        self.root
    }
}

/// Non-blank lines with the indentation they all share removed, so a tree
/// pasted from an indented block still starts at column zero. Blank lines are
/// kept so that line numbers in warnings match the input.
fn dedent(input: &str) -> Vec<&str> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let lines = input.lines().collect::<Vec<_>>();

    let common = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start_matches([' ', '\t']).len())
        .min();

    match common {
        None => Vec::new(),
        Some(common) => lines
            .into_iter()
            .map(|line| line.get(common..).unwrap_or(""))
            .collect(),
    }
}

/// Width of a plain-space indentation level, taken from the shallowest line
/// indented with spaces only. Drawn trees keep the default.
fn infer_indent_width(lines: &[&str]) -> usize {
    lines
        .iter()
        .filter(|line| !line.trim().is_empty() && !starts_with_tree_glyph(line))
        .map(|line| line.len() - line.trim_start_matches(' ').len())
        .filter(|width| *width > 0)
        .min()
        .filter(|width| (2..=DEFAULT_INDENT_WIDTH).contains(width))
        .unwrap_or(DEFAULT_INDENT_WIDTH)
}

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum StructureError {
    #[snafu(display("The input does not contain any tree lines"))]
    EmptyInput,
    #[snafu(display("No root entry could be derived from the input"))]
    NoRoot,
}
