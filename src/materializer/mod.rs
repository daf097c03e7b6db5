mod materializer;

pub use materializer::{
    DEFAULT_MARKER, MaterializeError, MaterializeOptions, MaterializeReport, Materializer,
};
