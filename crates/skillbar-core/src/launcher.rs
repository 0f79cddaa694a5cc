//! Launcher session
//!
//! Ties parsing, filtering, ranking and the selection cursor together for
//! one launcher window. All methods except the gateway hand-off are
//! synchronous, so the caller can keep feeding keystrokes while a dispatch
//! started with [`Launcher::prepare_execute`] is still in flight.

use skillbar_types::{
    GatewayError, InputMode, Invocation, KeyAction, LauncherError, LauncherOutcome, ParsedInput,
    Skill,
};
use tracing::{debug, info};

use crate::gateway::ExecutionGateway;
use crate::navigation::{NavCommand, Navigator};
use crate::parser::{parse, COMMAND_PREFIX};
use crate::ranker::rank;
use crate::usage::UsageStore;

/// Build the canonical payload for `skill` under the current intent
///
/// Strips a leading `/` from the name and, in task mode, appends the task
/// text after a single space.
pub fn resolve_invocation(skill: &Skill, parsed: &ParsedInput) -> Invocation {
    let name = skill.name.strip_prefix(COMMAND_PREFIX).unwrap_or(&skill.name);

    let payload = match (parsed.mode, parsed.task.as_deref()) {
        (InputMode::Task, Some(task)) if !task.is_empty() => format!("{} {}", name, task),
        _ => name.to_string(),
    };

    Invocation {
        skill_name: skill.name.clone(),
        payload,
    }
}

/// Launcher state for one session
#[derive(Debug)]
pub struct Launcher {
    skills: Vec<Skill>,
    usage: UsageStore,
    raw_input: String,
    parsed: ParsedInput,
    ranked: Vec<Skill>,
    nav: Navigator,
}

impl Launcher {
    /// Session over an already loaded skill list
    pub fn new(skills: Vec<Skill>, usage: UsageStore) -> Self {
        let mut launcher = Self {
            skills,
            usage,
            raw_input: String::new(),
            parsed: ParsedInput::search(),
            ranked: Vec::new(),
            nav: Navigator::default(),
        };
        launcher.rerank();
        launcher.nav.reset(launcher.ranked.len());
        launcher
    }

    /// Replace the raw input text
    ///
    /// A different text is a new query and moves the cursor to the top;
    /// the same text only repairs the cursor bounds.
    pub fn set_input(&mut self, raw: impl Into<String>) {
        let raw = raw.into();
        let query_changed = raw != self.raw_input;

        self.raw_input = raw;
        self.parsed = parse(&self.raw_input);
        self.rerank();

        if query_changed {
            self.nav.reset(self.ranked.len());
        } else {
            self.nav.set_len(self.ranked.len());
        }
    }

    /// Empty the input
    pub fn clear_input(&mut self) {
        self.set_input(String::new());
    }

    /// Re-rank for the same query, e.g. after usage changed
    pub fn refresh(&mut self) {
        self.rerank();
        self.nav.set_len(self.ranked.len());
    }

    /// Swap in a freshly loaded skill list, keeping the current query
    pub fn replace_skills(&mut self, skills: Vec<Skill>) {
        self.skills = skills;
        self.refresh();
    }

    fn rerank(&mut self) {
        self.ranked = rank(&self.skills, &self.parsed, &self.raw_input, &self.usage)
            .into_iter()
            .cloned()
            .collect();
    }

    /// Current raw input
    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    /// Intent parsed from the current input
    pub fn parsed(&self) -> &ParsedInput {
        &self.parsed
    }

    /// Ranked candidates for the current input
    pub fn candidates(&self) -> &[Skill] {
        &self.ranked
    }

    /// Cursor position
    pub fn selected_index(&self) -> usize {
        self.nav.selected_index()
    }

    /// Highlighted skill, if any
    pub fn selected(&self) -> Option<&Skill> {
        self.ranked.get(self.nav.selected_index())
    }

    /// Usage history backing the ranking
    pub fn usage(&self) -> &UsageStore {
        &self.usage
    }

    /// Display emphasis for recently used skills
    pub fn is_recent(&self, name: &str) -> bool {
        self.usage.is_recent(name)
    }

    /// Input hint for the current mode
    pub fn placeholder(&self) -> String {
        match self.parsed.mode {
            InputMode::Search => "Search skills...".to_string(),
            InputMode::Direct => format!("Copy {}", self.parsed.skill_name),
            InputMode::Task => format!("Copy: {}", self.parsed.task.as_deref().unwrap_or_default()),
        }
    }

    /// Invocation for the candidate at `index`
    pub fn resolve(&self, index: usize) -> Option<Invocation> {
        self.ranked
            .get(index)
            .map(|skill| resolve_invocation(skill, &self.parsed))
    }

    /// Invocation for the highlighted candidate, to dispatch asynchronously
    pub fn prepare_execute(&self) -> Option<Invocation> {
        self.resolve(self.nav.selected_index())
    }

    /// Apply the gateway's verdict for `invocation`
    ///
    /// Usage is recorded only for a confirmed hand-off. A failure leaves the
    /// cursor and candidate list untouched.
    pub fn finish_execute(
        &mut self,
        invocation: Invocation,
        result: Result<(), GatewayError>,
    ) -> Result<Invocation, LauncherError> {
        if let Err(source) = result {
            return Err(LauncherError::ExecutionFailed {
                payload: invocation.payload,
                source,
            });
        }

        info!("Executed '{}'", invocation.payload);
        self.usage.record_usage(&invocation.skill_name);
        self.refresh();
        Ok(invocation)
    }

    /// Execute the highlighted candidate; `Ok(None)` for an empty list
    pub async fn execute(
        &mut self,
        gateway: &dyn ExecutionGateway,
    ) -> Result<Option<Invocation>, LauncherError> {
        let Some(invocation) = self.prepare_execute() else {
            debug!("No skill selected");
            return Ok(None);
        };

        let result = gateway.dispatch(&invocation.payload).await;
        self.finish_execute(invocation, result).map(Some)
    }

    /// Move the cursor to `index` and execute it (pointer click)
    pub async fn execute_index(
        &mut self,
        index: usize,
        gateway: &dyn ExecutionGateway,
    ) -> Result<Option<Invocation>, LauncherError> {
        if !self.nav.select(index) {
            debug!("No skill at index {}", index);
            return Ok(None);
        }
        self.execute(gateway).await
    }

    /// Replace the input with `/` + the first candidate's name
    pub fn auto_complete(&mut self) -> Option<String> {
        let first = self.ranked.first()?;
        let completed = format!("{}{}", COMMAND_PREFIX, first.name);
        self.set_input(completed.clone());
        Some(completed)
    }

    /// Feed one key to the session
    pub async fn handle_key(
        &mut self,
        action: KeyAction,
        gateway: &dyn ExecutionGateway,
    ) -> Result<LauncherOutcome, LauncherError> {
        let outcome = match self.nav.handle_key(action) {
            NavCommand::None => LauncherOutcome::Idle,
            NavCommand::Execute(_) => match self.execute(gateway).await? {
                Some(invocation) => LauncherOutcome::Executed(invocation),
                None => LauncherOutcome::Idle,
            },
            NavCommand::AutoComplete => self
                .auto_complete()
                .map_or(LauncherOutcome::Idle, LauncherOutcome::Completed),
            NavCommand::Dismiss => LauncherOutcome::Dismissed,
        };
        Ok(outcome)
    }
}
