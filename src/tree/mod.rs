//! In-memory model of the hierarchy described by an ASCII tree.
//!
//! A parsed tree is a single root [`Node`] whose children mirror the textual
//! nesting, plus a renderer that turns a tree back into text.

mod node;
mod render;

pub use node::{Node, NodeKind};
pub use render::{RenderStyle, render};
