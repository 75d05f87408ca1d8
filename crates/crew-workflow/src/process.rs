//! Execution processes

use crate::AgentRole;

/// Constraint on which coworker the manager may delegate to next
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DelegationPolicy {
    /// Any registered worker, any order
    #[default]
    Free,
    /// Exactly this order; each entry is consumed by one delegation
    Ordered(Vec<String>),
}

impl DelegationPolicy {
    /// Build an ordered plan from role strings
    pub fn ordered<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Ordered(roles.into_iter().map(Into::into).collect())
    }

    /// The planned roles, empty for [`DelegationPolicy::Free`]
    pub fn plan(&self) -> &[String] {
        match self {
            Self::Free => &[],
            Self::Ordered(plan) => plan,
        }
    }
}

/// How a crew executes its tasks
#[derive(Debug, Clone)]
pub enum Process {
    /// Tasks run in order, each by its assigned agent
    Sequential,
    /// Every task goes to the manager, which delegates to workers
    Hierarchical {
        manager: AgentRole,
        policy: DelegationPolicy,
    },
}

impl Process {
    /// Hierarchical process with free delegation
    pub fn hierarchical(manager: AgentRole) -> Self {
        Self::Hierarchical {
            manager,
            policy: DelegationPolicy::Free,
        }
    }

    /// Hierarchical process with an enforced delegation order
    pub fn hierarchical_ordered(manager: AgentRole, policy: DelegationPolicy) -> Self {
        Self::Hierarchical { manager, policy }
    }
}
