//! Types every crew crate shares: the [`Agent`] trait, the per-run
//! [`Context`] and the base [`Error`].

pub mod agent;
pub mod context;
pub mod error;

pub use agent::Agent;
pub use context::Context;
pub use error::{Error, Result};
