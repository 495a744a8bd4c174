//! Natural-language segment filter compiler: recognizers over free text,
//! deterministic compilation to filter expressions, and the agent-facing
//! query tool.

pub mod compiler;
pub mod recognizers;
pub mod tool;

pub use compiler::{compile, DEFAULT_RESULT_CAP};
pub use tool::SegmentQueryTool;
