//! Tools agents can call
//!
//! Every agent gets its own [`ToolRegistry`]; a tool bound to one role is
//! invisible to the others.

pub mod registry;
pub mod tool;

pub use registry::ToolRegistry;
pub use tool::{Tool, render_output};
