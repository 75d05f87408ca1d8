//! Crew assembly and kickoff

use crate::delegation::{Capability, CapabilityRegistry, DelegationKind, DelegationLog, DelegationRecord, Delegator};
use crate::{AgentRole, CrewError, DelegationPolicy, Process, Result, Task, TaskOutput};
use crew_core::{Agent, Context};
use crew_prompt::crew::{ContextEntry, agent_system_prompt, manager_addendum, task_prompt};
use crew_prompt::{Language, interpolate};
use crew_runtime::{AgentRuntime, RoleAgent, ToolErrorPolicy};
use crew_tools::{Tool, ToolRegistry};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};

/// Result of one kickoff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewOutput {
    /// Id shared by every log line of the run
    pub run_id: String,
    /// Output of the last task
    pub raw: String,
    /// One entry per crew task, in task order
    pub tasks_output: Vec<TaskOutput>,
    /// Manager delegations in call order; empty for sequential crews
    pub delegations: Vec<DelegationRecord>,
}

impl CrewOutput {
    /// Latest work delegation that reached `role`
    pub fn delegation_to(&self, role: &str) -> Option<&DelegationRecord> {
        self.delegations
            .iter()
            .rev()
            .find(|r| r.kind == DelegationKind::Work && r.reached_worker() && r.coworker == role)
    }
}

/// Planned roles no work delegation reached, in plan order
pub fn missing_planned(plan: &[String], records: &[DelegationRecord]) -> Vec<String> {
    let done = records
        .iter()
        .filter(|r| r.kind == DelegationKind::Work && r.reached_worker())
        .count();
    plan.iter().skip(done).cloned().collect()
}

/// A set of agents working through tasks under one process
pub struct Crew {
    agents: Vec<AgentRole>,
    tasks: Vec<Task>,
    process: Process,
    runtime: Arc<AgentRuntime>,
    language: Language,
}

impl std::fmt::Debug for Crew {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crew")
            .field("agents", &self.agents)
            .field("tasks", &self.tasks.len())
            .field("process", &self.process)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl Crew {
    /// Create a builder
    pub fn builder() -> CrewBuilder {
        CrewBuilder::new()
    }

    /// Run every task once
    ///
    /// `inputs` must be a JSON object. Its entries fill `{{ name }}`
    /// placeholders in goals, backstories, task descriptions and expected
    /// outputs, and are carried in the run [`Context`] for tools.
    pub async fn kickoff(&self, inputs: Value) -> Result<CrewOutput> {
        let Value::Object(map) = inputs else {
            return Err(CrewError::InvalidInputs);
        };

        let mut context = Context::for_run().with_language(self.language.code());
        for (name, value) in &map {
            context.set_input(name.clone(), value.clone());
        }
        let vars = Value::Object(map);
        let run_id = context.run_id().unwrap_or_default().to_string();

        info!(
            run_id = %run_id,
            process = self.process_name(),
            agents = self.agents.len(),
            tasks = self.tasks.len(),
            "Crew kickoff"
        );

        let (tasks_output, delegations) = match &self.process {
            Process::Sequential => (self.run_sequential(&vars, &mut context).await?, Vec::new()),
            Process::Hierarchical { manager, policy } => {
                self.run_hierarchical(manager, policy, &vars, &mut context)
                    .await?
            }
        };

        let raw = tasks_output
            .last()
            .map(|o| o.raw.clone())
            .unwrap_or_default();
        info!(run_id = %run_id, delegations = delegations.len(), "Crew finished");

        Ok(CrewOutput {
            run_id,
            raw,
            tasks_output,
            delegations,
        })
    }

    fn process_name(&self) -> &'static str {
        match self.process {
            Process::Sequential => "sequential",
            Process::Hierarchical { .. } => "hierarchical",
        }
    }

    async fn run_sequential(&self, vars: &Value, context: &mut Context) -> Result<Vec<TaskOutput>> {
        let mut agents: HashMap<&str, RoleAgent> = HashMap::new();
        for role in &self.agents {
            let system = self.system_prompt(role, vars)?;
            let agent = self.build_agent(role, system, role.tools().to_vec(), None);
            agents.insert(role.role(), agent);
        }

        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(self.tasks.len());
        for (index, task) in self.tasks.iter().enumerate() {
            let role = task
                .assigned_agent()
                .ok_or(CrewError::UnassignedTask(index))?;
            let agent = agents.get(role).ok_or_else(|| CrewError::MissingAgent {
                task: index,
                role: role.to_string(),
            })?;
            let output = self
                .run_task(index, task, agent, role, vars, &outputs, context)
                .await?;
            outputs.push(output);
        }
        Ok(outputs)
    }

    async fn run_hierarchical(
        &self,
        manager: &AgentRole,
        policy: &DelegationPolicy,
        vars: &Value,
        context: &mut Context,
    ) -> Result<(Vec<TaskOutput>, Vec<DelegationRecord>)> {
        let mut registry = CapabilityRegistry::new();
        for role in &self.agents {
            let goal = interpolate(&format!("{}.goal", role.role()), role.goal(), vars)?;
            let worker = self.build_agent(
                role,
                self.system_prompt(role, vars)?,
                role.tools().to_vec(),
                None,
            );
            let capability = Capability {
                role: role.role().to_string(),
                goal,
                tools: role.tool_names(),
            };
            registry.register(capability, Arc::new(worker))?;
        }
        let registry = Arc::new(registry);

        let coworkers: Vec<(&str, &str)> = registry
            .capabilities()
            .map(|c| (c.role.as_str(), c.goal.as_str()))
            .collect();
        let plan: Vec<&str> = policy.plan().iter().map(String::as_str).collect();
        let addendum = manager_addendum(&coworkers, &plan, &self.language);

        let log = DelegationLog::new();
        let delegator = Arc::new(Delegator::new(
            registry.clone(),
            policy.clone(),
            log.clone(),
            manager.role(),
            context.clone(),
            self.language.clone(),
        ));
        let mut tools = manager.tools().to_vec();
        tools.extend(delegator.tools());

        let system = format!("{}\n{addendum}", self.system_prompt(manager, vars)?);
        let manager_agent = self.build_agent(manager, system, tools, Some(plan.len() + 2));

        info!(
            manager = %manager.role(),
            workers = ?registry.roles(),
            plan = ?plan,
            "Manager ready"
        );

        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(self.tasks.len());
        for (index, task) in self.tasks.iter().enumerate() {
            let output = self
                .run_task(index, task, &manager_agent, manager.role(), vars, &outputs, context)
                .await?;
            outputs.push(output);
        }

        let records = log.records().await;
        let missing = missing_planned(policy.plan(), &records);
        if !missing.is_empty() {
            warn!(
                manager = %manager.role(),
                missing = ?missing,
                "Manager finished without every planned delegation"
            );
        }
        Ok((outputs, records))
    }

    /// Identity prompt with goal and backstory interpolated; the role string
    /// is never touched
    fn system_prompt(&self, role: &AgentRole, vars: &Value) -> Result<String> {
        let goal = interpolate(&format!("{}.goal", role.role()), role.goal(), vars)?;
        let backstory = interpolate(&format!("{}.backstory", role.role()), role.backstory(), vars)?;
        Ok(agent_system_prompt(role.role(), &goal, &backstory, &self.language))
    }

    /// Build a tool-loop agent for `role`
    ///
    /// `min_iterations` marks a manager: the limit is raised so it can finish
    /// its whole plan, and tool errors go back to the model.
    fn build_agent(
        &self,
        role: &AgentRole,
        system: String,
        tools: Vec<Arc<dyn Tool>>,
        min_iterations: Option<usize>,
    ) -> RoleAgent {
        let mut config = self.runtime.executor_config(system);
        if let Some(limit) = role.iteration_limit() {
            config.max_iterations = limit;
        }
        if let Some(min) = min_iterations {
            config.max_iterations = config.max_iterations.max(min);
            config.tool_error_policy = ToolErrorPolicy::ReportToModel;
        }
        self.runtime
            .create_role_agent(role.role(), config, Arc::new(ToolRegistry::from_tools(tools)))
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_task(
        &self,
        index: usize,
        task: &Task,
        agent: &RoleAgent,
        role: &str,
        vars: &Value,
        previous: &[TaskOutput],
        context: &mut Context,
    ) -> Result<TaskOutput> {
        let description = interpolate(&format!("task{index}.description"), task.description(), vars)?;
        let expected_output = interpolate(
            &format!("task{index}.expected_output"),
            task.expected_output(),
            vars,
        )?;

        let sources: Vec<&TaskOutput> = match task.context_tasks() {
            Some(indices) => indices.iter().filter_map(|&i| previous.get(i)).collect(),
            None => previous.iter().collect(),
        };
        let entries: Vec<ContextEntry<'_>> = sources
            .iter()
            .map(|o| ContextEntry {
                role: &o.agent,
                text: &o.raw,
            })
            .collect();
        let prompt = task_prompt(&description, &expected_output, &entries, &self.language);

        info!(task = index, agent = %role, context_tasks = entries.len(), "Task started");
        let raw = agent
            .process(prompt, context)
            .await
            .map_err(|source| CrewError::Execution {
                task: index,
                role: role.to_string(),
                source,
            })?;
        info!(task = index, agent = %role, output_length = raw.len(), "Task completed");

        Ok(TaskOutput {
            description,
            expected_output,
            agent: role.to_string(),
            raw,
        })
    }
}

/// Builder for [`Crew`]
#[derive(Default)]
pub struct CrewBuilder {
    agents: Vec<AgentRole>,
    tasks: Vec<Task>,
    process: Option<Process>,
    runtime: Option<Arc<AgentRuntime>>,
    language: Language,
}

impl CrewBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an agent; in hierarchical crews these are the workers
    pub fn agent(mut self, agent: AgentRole) -> Self {
        self.agents.push(agent);
        self
    }

    pub fn agents(mut self, agents: impl IntoIterator<Item = AgentRole>) -> Self {
        self.agents.extend(agents);
        self
    }

    pub fn task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn tasks(mut self, tasks: impl IntoIterator<Item = Task>) -> Self {
        self.tasks.extend(tasks);
        self
    }

    /// Defaults to [`Process::Sequential`]
    pub fn process(mut self, process: Process) -> Self {
        self.process = Some(process);
        self
    }

    /// Prompt language, Korean by default
    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn runtime(mut self, runtime: Arc<AgentRuntime>) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Validate and build
    pub fn build(self) -> Result<Crew> {
        let runtime = self.runtime.ok_or(CrewError::MissingRuntime)?;
        if self.tasks.is_empty() {
            return Err(CrewError::EmptyCrew);
        }

        let mut roles = HashSet::new();
        for agent in &self.agents {
            if !roles.insert(agent.role()) {
                return Err(CrewError::DuplicateRole(agent.role().to_string()));
            }
        }

        let process = self.process.unwrap_or(Process::Sequential);
        match &process {
            Process::Sequential => {
                for (index, task) in self.tasks.iter().enumerate() {
                    let role = task.assigned_agent().ok_or(CrewError::UnassignedTask(index))?;
                    if !roles.contains(role) {
                        return Err(CrewError::MissingAgent {
                            task: index,
                            role: role.to_string(),
                        });
                    }
                }
            }
            Process::Hierarchical { manager, policy } => {
                if roles.contains(manager.role()) {
                    return Err(CrewError::ManagerInWorkers(manager.role().to_string()));
                }
                if roles.is_empty() {
                    return Err(CrewError::NoWorkers);
                }
                if !manager.can_delegate() {
                    return Err(CrewError::ManagerCannotDelegate(manager.role().to_string()));
                }
                if let Some(unknown) = policy.plan().iter().find(|r| !roles.contains(r.as_str())) {
                    return Err(CrewError::UnknownPlanRole(unknown.clone()));
                }
                for (index, task) in self.tasks.iter().enumerate() {
                    if let Some(role) = task.assigned_agent() {
                        if role != manager.role() && !roles.contains(role) {
                            return Err(CrewError::MissingAgent {
                                task: index,
                                role: role.to_string(),
                            });
                        }
                    }
                }
            }
        }

        for (index, task) in self.tasks.iter().enumerate() {
            if let Some(&reference) = task.context_tasks().unwrap_or_default().iter().find(|&&r| r >= index) {
                return Err(CrewError::InvalidContext {
                    task: index,
                    reference,
                });
            }
        }

        Ok(Crew {
            agents: self.agents,
            tasks: self.tasks,
            process,
            runtime,
            language: self.language,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DelegationOutcome;

    fn record(coworker: &str, outcome: DelegationOutcome) -> DelegationRecord {
        DelegationRecord {
            kind: DelegationKind::Work,
            coworker: coworker.to_string(),
            task: "t".to_string(),
            context: String::new(),
            outcome,
        }
    }

    #[test]
    fn test_missing_planned() {
        let plan = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let records = vec![
            record("a", DelegationOutcome::Completed { output: "ok".to_string() }),
            record("x", DelegationOutcome::Rejected { reason: "unknown".to_string() }),
            record("b", DelegationOutcome::Failed { reason: "down".to_string() }),
        ];
        assert_eq!(missing_planned(&plan, &records), vec!["c".to_string()]);
        assert!(missing_planned(&[], &records).is_empty());
    }

    #[test]
    fn test_delegation_to_skips_rejected() {
        let output = CrewOutput {
            run_id: "r".to_string(),
            raw: String::new(),
            tasks_output: Vec::new(),
            delegations: vec![
                record("a", DelegationOutcome::Completed { output: "first".to_string() }),
                record("a", DelegationOutcome::Rejected { reason: "plan done".to_string() }),
            ],
        };
        assert_eq!(output.delegation_to("a").and_then(|r| r.output()), Some("first"));
        assert!(output.delegation_to("b").is_none());
    }
}
