//! Manager-to-worker delegation
//!
//! Workers are reachable only through a [`CapabilityRegistry`]. The manager
//! names a coworker by role string; lookup is exact, with no trimming or
//! case folding. A name that does not match, or that breaks an ordered
//! [`DelegationPolicy`], is rejected before any worker runs and the manager
//! gets an error observation listing the valid roles.

use crate::DelegationPolicy;
use async_trait::async_trait;
use crew_core::{Agent, Context, Error};
use crew_llm::tools::schema;
use crew_prompt::Language;
use crew_prompt::crew::{ContextEntry, task_prompt};
use crew_tools::Tool;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// What a worker can do, as advertised to the manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    /// Exact role string; the routing key
    pub role: String,
    /// Interpolated goal
    pub goal: String,
    /// Names of the worker's tools
    pub tools: Vec<String>,
}

/// Registered workers, in registration order
#[derive(Default)]
pub struct CapabilityRegistry {
    entries: Vec<(Capability, Arc<dyn Agent>)>,
}

impl CapabilityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a worker; role strings must be unique
    pub fn register(&mut self, capability: Capability, agent: Arc<dyn Agent>) -> crate::Result<()> {
        if self.entries.iter().any(|(c, _)| c.role == capability.role) {
            return Err(crate::CrewError::DuplicateRole(capability.role));
        }
        self.entries.push((capability, agent));
        Ok(())
    }

    /// Exact-match lookup
    pub fn resolve(&self, role: &str) -> Option<(&Capability, Arc<dyn Agent>)> {
        self.entries
            .iter()
            .find(|(c, _)| c.role == role)
            .map(|(c, a)| (c, a.clone()))
    }

    /// Registered role strings
    pub fn roles(&self) -> Vec<&str> {
        self.entries.iter().map(|(c, _)| c.role.as_str()).collect()
    }

    /// Registered capabilities
    pub fn capabilities(&self) -> impl Iterator<Item = &Capability> {
        self.entries.iter().map(|(c, _)| c)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Which manager tool produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelegationKind {
    Work,
    Question,
}

/// How a delegation ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DelegationOutcome {
    /// The worker answered
    Completed { output: String },
    /// The worker ran and failed
    Failed { reason: String },
    /// No worker ran: unknown coworker or out-of-order request
    Rejected { reason: String },
}

/// One manager request to a coworker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationRecord {
    pub kind: DelegationKind,
    /// Coworker string exactly as the manager sent it
    pub coworker: String,
    pub task: String,
    pub context: String,
    pub outcome: DelegationOutcome,
}

impl DelegationRecord {
    /// Output text if the worker completed
    pub fn output(&self) -> Option<&str> {
        match &self.outcome {
            DelegationOutcome::Completed { output } => Some(output),
            _ => None,
        }
    }

    /// Whether a worker actually ran
    pub fn reached_worker(&self) -> bool {
        !matches!(self.outcome, DelegationOutcome::Rejected { .. })
    }
}

/// Shared, append-only record of one run's delegations
#[derive(Debug, Clone, Default)]
pub struct DelegationLog {
    records: Arc<Mutex<Vec<DelegationRecord>>>,
}

impl DelegationLog {
    pub fn new() -> Self {
        Self::default()
    }

    async fn push(&self, record: DelegationRecord) {
        self.records.lock().await.push(record);
    }

    /// Copy of every record so far
    pub async fn records(&self) -> Vec<DelegationRecord> {
        self.records.lock().await.clone()
    }

    /// Work delegations that reached a worker; these consume plan slots
    pub async fn accepted_work(&self) -> usize {
        self.records
            .lock()
            .await
            .iter()
            .filter(|r| r.kind == DelegationKind::Work && r.reached_worker())
            .count()
    }
}

/// Routes manager requests to workers
pub struct Delegator {
    registry: Arc<CapabilityRegistry>,
    policy: DelegationPolicy,
    log: DelegationLog,
    manager_role: String,
    base_context: Context,
    language: Language,
}

impl Delegator {
    /// Create a delegator
    ///
    /// `base_context` is cloned for every worker call, so workers see the
    /// run's inputs and id but not each other's scratch state.
    pub fn new(
        registry: Arc<CapabilityRegistry>,
        policy: DelegationPolicy,
        log: DelegationLog,
        manager_role: impl Into<String>,
        base_context: Context,
        language: Language,
    ) -> Self {
        Self {
            registry,
            policy,
            log,
            manager_role: manager_role.into(),
            base_context,
            language,
        }
    }

    /// The delegate-work and ask-question tools backed by this delegator
    pub fn tools(self: &Arc<Self>) -> Vec<Arc<dyn Tool>> {
        vec![
            Arc::new(DelegateWorkTool {
                delegator: self.clone(),
            }),
            Arc::new(AskQuestionTool {
                delegator: self.clone(),
            }),
        ]
    }

    /// The shared log
    pub fn log(&self) -> &DelegationLog {
        &self.log
    }

    fn coworker_schema(&self) -> Value {
        let roles = self.registry.roles();
        schema::string_enum(
            "Exact role of the coworker. Must match one of the listed values character for character.",
            &roles,
        )
    }

    async fn reject(&self, request: Request, reason: String) -> Error {
        warn!(
            coworker = %request.coworker,
            kind = ?request.kind,
            reason = %reason,
            "Delegation rejected"
        );
        let coworker = request.coworker.clone();
        self.log
            .push(request.into_record(DelegationOutcome::Rejected {
                reason: reason.clone(),
            }))
            .await;
        Error::DelegationFailed {
            coworker,
            message: reason,
        }
    }

    async fn dispatch(&self, request: Request) -> crew_core::Result<String> {
        let Some((capability, worker)) = self.registry.resolve(&request.coworker) else {
            let reason = format!(
                "Unknown coworker. Valid coworkers: [{}]",
                self.registry.roles().join(", ")
            );
            return Err(self.reject(request, reason).await);
        };

        if request.kind == DelegationKind::Work {
            if let DelegationPolicy::Ordered(plan) = &self.policy {
                let done = self.log.accepted_work().await;
                match plan.get(done) {
                    None => {
                        let reason =
                            format!("All {} planned delegations are done", plan.len());
                        return Err(self.reject(request, reason).await);
                    }
                    Some(expected) if *expected != capability.role => {
                        let reason = format!(
                            "Out of order. Step {} of {} must go to '{expected}'",
                            done + 1,
                            plan.len()
                        );
                        return Err(self.reject(request, reason).await);
                    }
                    Some(_) => {}
                }
            }
        }

        info!(
            manager = %self.manager_role,
            coworker = %capability.role,
            kind = ?request.kind,
            "Delegating to coworker"
        );

        let expected = match (request.kind, &self.language) {
            (DelegationKind::Work, Language::English) => {
                "Your best answer to your coworker asking you this, accounting for the context shared."
            }
            (DelegationKind::Question, Language::English) => {
                "Your best answer to your coworker's question, accounting for the context shared."
            }
            (DelegationKind::Work, _) => "동료의 요청에 대한 최선의 결과물. 공유된 맥락을 반영할 것.",
            (DelegationKind::Question, _) => "동료의 질문에 대한 최선의 답변. 공유된 맥락을 반영할 것.",
        };
        let context = [ContextEntry {
            role: &self.manager_role,
            text: &request.context,
        }];
        let context: &[ContextEntry<'_>] = if request.context.trim().is_empty() {
            &[]
        } else {
            &context
        };
        let prompt = task_prompt(&request.task, expected, context, &self.language);

        let mut ctx = self.base_context.clone();
        match worker.process(prompt, &mut ctx).await {
            Ok(output) => {
                self.log
                    .push(request.into_record(DelegationOutcome::Completed {
                        output: output.clone(),
                    }))
                    .await;
                Ok(output)
            }
            Err(e) => {
                let reason = e.to_string();
                warn!(coworker = %capability.role, error = %reason, "Coworker failed");
                let coworker = request.coworker.clone();
                self.log
                    .push(request.into_record(DelegationOutcome::Failed {
                        reason: reason.clone(),
                    }))
                    .await;
                Err(Error::DelegationFailed {
                    coworker,
                    message: reason,
                })
            }
        }
    }
}

struct Request {
    kind: DelegationKind,
    coworker: String,
    task: String,
    context: String,
}

impl Request {
    fn into_record(self, outcome: DelegationOutcome) -> DelegationRecord {
        DelegationRecord {
            kind: self.kind,
            coworker: self.coworker,
            task: self.task,
            context: self.context,
            outcome,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DelegateWorkParams {
    task: String,
    #[serde(default)]
    context: String,
    coworker: String,
}

#[derive(Debug, Deserialize)]
struct AskQuestionParams {
    question: String,
    #[serde(default)]
    context: String,
    coworker: String,
}

fn invalid_params(tool: &str, e: &serde_json::Error) -> Error {
    Error::tool(tool, format!("Invalid parameters: {e}"))
}

/// `delegate_work`: hand a subtask to a coworker
pub struct DelegateWorkTool {
    delegator: Arc<Delegator>,
}

#[async_trait]
impl Tool for DelegateWorkTool {
    async fn execute(&self, params: Value) -> crew_core::Result<Value> {
        let p: DelegateWorkParams =
            serde_json::from_value(params).map_err(|e| invalid_params(self.name(), &e))?;
        let output = self
            .delegator
            .dispatch(Request {
                kind: DelegationKind::Work,
                coworker: p.coworker,
                task: p.task,
                context: p.context,
            })
            .await?;
        Ok(Value::String(output))
    }

    fn name(&self) -> &'static str {
        "delegate_work"
    }

    fn description(&self) -> &'static str {
        "Delegate a specific task to one of your coworkers. Provide the task, all the context the coworker needs (they know nothing you do not tell them), and the coworker's exact role."
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({
                "task": schema::string("The task to delegate"),
                "context": schema::string("Everything the coworker needs to know"),
                "coworker": self.delegator.coworker_schema(),
            }),
            &["task", "context", "coworker"],
        )
    }
}

/// `ask_question`: ask a coworker something without consuming a plan step
pub struct AskQuestionTool {
    delegator: Arc<Delegator>,
}

#[async_trait]
impl Tool for AskQuestionTool {
    async fn execute(&self, params: Value) -> crew_core::Result<Value> {
        let p: AskQuestionParams =
            serde_json::from_value(params).map_err(|e| invalid_params(self.name(), &e))?;
        let output = self
            .delegator
            .dispatch(Request {
                kind: DelegationKind::Question,
                coworker: p.coworker,
                task: p.question,
                context: p.context,
            })
            .await?;
        Ok(Value::String(output))
    }

    fn name(&self) -> &'static str {
        "ask_question"
    }

    fn description(&self) -> &'static str {
        "Ask a specific question to one of your coworkers. Provide the question, the context behind it, and the coworker's exact role."
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({
                "question": schema::string("The question to ask"),
                "context": schema::string("Background for the question"),
                "coworker": self.delegator.coworker_schema(),
            }),
            &["question", "context", "coworker"],
        )
    }
}
