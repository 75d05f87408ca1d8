//! Multi-agent crews for stock-crew
//!
//! A [`Crew`] groups agent roles and tasks under a [`Process`]:
//!
//! - [`Process::Sequential`] runs each task with its assigned agent, in
//!   order, feeding earlier outputs forward as context.
//! - [`Process::Hierarchical`] hands every task to a manager that can only
//!   reach workers through the delegation tools. Routing goes through a
//!   [`CapabilityRegistry`] keyed by exact role strings, optionally
//!   constrained by an ordered [`DelegationPolicy`].
//!
//! Every run returns a single [`CrewOutput`].

pub mod crew;
pub mod delegation;
pub mod error;
pub mod process;
pub mod role;
pub mod task;

pub use crew::{Crew, CrewBuilder, CrewOutput, missing_planned};
pub use delegation::{
    AskQuestionTool, Capability, CapabilityRegistry, DelegateWorkTool, DelegationKind,
    DelegationLog, DelegationOutcome, DelegationRecord, Delegator,
};
pub use error::{CrewError, Result};
pub use process::{DelegationPolicy, Process};
pub use role::AgentRole;
pub use task::{Task, TaskOutput};
