//! ASCII tree parsing.
//!
//! Parsing happens in two steps: every line is classified on its own into a
//! depth, name, kind and comment, then the records are folded into a single
//! rooted tree with a stack of open ancestors.

mod line_classifier;
mod tree_builder;

pub use line_classifier::{ParseWarning, infer_kind, is_safe_root_name};
pub use tree_builder::{DEFAULT_ROOT_NAME, ParsedTree, StructureError, TreeParser};
