//! Acquisition of the tree text: built-in sample, file, or interactive paste.

mod source;

pub use source::{InputError, InputSource};
