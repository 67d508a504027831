//! The line-driven shell behind `chat` and `run`.
//!
//! One shell owns one session plus the working state of the prompt and
//! workflow panels. Each input line is parsed, executed, and then the shell
//! waits out any pending reply or deployment before reading the next line.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use jiff::Timestamp;
use tracing::debug;
use uuid::Uuid;

use crate::catalog::StaticCatalog;
use crate::clock::{SystemClock, Timing};
use crate::export::Exporter;
use crate::model::{AgentDraft, Panel, PromptKind, Sender, Step};
use crate::panel::{PROMPT_VARIABLES, PromptPanel, WorkflowPanel, knowledge};
use crate::session::{Event, Session};

use super::command::{HELP, ShellCommand, parse_line};
use super::format::{
    format_capabilities, format_knowledge_panel, format_message, format_notification,
    format_progress, format_prompt_panel, format_sources, format_step_header,
    format_workflow_panel,
};

/// Whether to keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Flow {
    Continue,
    Quit,
}

/// What a command produced, before anything is written.
enum Outcome {
    Print(String),
    Quiet,
    Quit,
}

pub(super) struct Shell {
    session: Session,
    prompts: PromptPanel,
    workflow: WorkflowPanel,
    /// Transcript messages already written out.
    shown_messages: usize,
    shown_step: Step,
}

impl Shell {
    pub(super) fn new(timing: Timing) -> Self {
        let session = Session::new(
            timing,
            Box::new(SystemClock),
            Box::new(StaticCatalog::default()),
        );
        let shown_step = session.step();
        Self {
            session,
            prompts: PromptPanel::default(),
            workflow: WorkflowPanel::default(),
            shown_messages: 0,
            shown_step,
        }
    }

    #[cfg(test)]
    pub(super) fn session(&self) -> &Session {
        &self.session
    }

    /// Writes the welcome and the first step heading.
    pub(super) fn start(&mut self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "{}", format_step_header(self.shown_step))?;
        self.show_new_messages(out)
    }

    /// Runs one input line to completion, including any deferred work it started.
    pub(super) fn handle_line(&mut self, line: &str, out: &mut impl Write) -> io::Result<Flow> {
        if self.session.is_closed() {
            return Ok(Flow::Quit);
        }
        let outcome = parse_line(line).and_then(|command| self.execute(command));
        match outcome {
            Ok(Outcome::Print(text)) => writeln!(out, "{text}")?,
            Ok(Outcome::Quiet) => {}
            Ok(Outcome::Quit) => return Ok(Flow::Quit),
            Err(reason) => writeln!(out, "! {reason}")?,
        }
        self.settle(out)?;
        Ok(Flow::Continue)
    }

    /// Exports the session if asked to, then closes it.
    pub(super) fn finish(&mut self, export: Option<&Path>) -> Result<Option<PathBuf>, String> {
        let exported = match export {
            Some(root) => {
                let exporter = Exporter::new(root)
                    .map_err(|e| format!("failed to prepare {}: {e}", root.display()))?;
                let dir = exporter
                    .export(
                        self.session.id(),
                        self.session.draft(),
                        self.session.transcript().messages(),
                    )
                    .map_err(|e| format!("failed to export session: {e}"))?;
                Some(dir)
            }
            None => None,
        };
        self.session.close();
        Ok(exported)
    }

    fn execute(&mut self, command: ShellCommand) -> Result<Outcome, String> {
        debug!(?command, "executing");
        let session = &mut self.session;
        let outcome = match command {
            ShellCommand::Say(text) => {
                session.submit(&text).map_err(|e| e.to_string())?;
                Outcome::Quiet
            }
            ShellCommand::Next => {
                session.advance().map_err(|e| e.to_string())?;
                Outcome::Quiet
            }
            ShellCommand::Back => {
                session.retreat().map_err(|e| e.to_string())?;
                Outcome::Quiet
            }
            ShellCommand::Do(n) => {
                let message_id = session
                    .transcript()
                    .latest_with_actions()
                    .map(|m| m.id)
                    .ok_or("nothing to do: no message offers actions")?;
                let index = n.checked_sub(1).ok_or("actions are numbered from 1")?;
                session
                    .invoke(message_id, index)
                    .map_err(|e| e.to_string())?;
                Outcome::Quiet
            }
            ShellCommand::Tools(query) => {
                let capabilities = session.catalog().list(query.as_deref());
                Outcome::Print(format_capabilities(&capabilities, session.draft()))
            }
            ShellCommand::Toggle(id) => {
                let selected = session.toggle_capability(id).map_err(|e| e.to_string())?;
                let name = session
                    .catalog()
                    .get(id)
                    .map(|c| c.name)
                    .unwrap_or_default();
                let verb = if selected { "Selected" } else { "Removed" };
                Outcome::Print(format!(
                    "{verb} {name} ({} selected)",
                    session.draft().selected_capabilities.len()
                ))
            }
            ShellCommand::File { name, size_bytes } => {
                let event = knowledge::add_file(&name, size_bytes).map_err(|e| e.to_string())?;
                session.apply_knowledge(event).map_err(|e| e.to_string())?;
                Outcome::Print(format_sources(session.draft()))
            }
            ShellCommand::Url(input) => {
                let event = knowledge::add_url(&input).map_err(|e| e.to_string())?;
                session.apply_knowledge(event).map_err(|e| e.to_string())?;
                Outcome::Print(format_sources(session.draft()))
            }
            ShellCommand::Remove(reference) => {
                let id = resolve_source(session.draft(), &reference)?;
                session
                    .apply_knowledge(knowledge::remove(id))
                    .map_err(|e| e.to_string())?;
                Outcome::Print(format_sources(session.draft()))
            }
            ShellCommand::Sources => Outcome::Print(format_sources(session.draft())),
            ShellCommand::SavePrompts => {
                session
                    .apply_prompts(self.prompts.save())
                    .map_err(|e| e.to_string())?;
                Outcome::Print("Prompts saved".to_string())
            }
            ShellCommand::SaveWorkflow => {
                session
                    .apply_workflow(self.workflow.save())
                    .map_err(|e| e.to_string())?;
                Outcome::Print("Workflow saved".to_string())
            }
            ShellCommand::Deploy => {
                session.deploy().map_err(|e| e.to_string())?;
                Outcome::Print("Deploying your agent...".to_string())
            }
            ShellCommand::Progress => {
                Outcome::Print(format_progress(session.step(), &session.progress()))
            }
            ShellCommand::Another => {
                session.build_another().map_err(|e| e.to_string())?;
                Outcome::Quiet
            }
            ShellCommand::Help => Outcome::Print(HELP.to_string()),
            ShellCommand::Quit => Outcome::Quit,
            edit => Outcome::Print(self.edit_panel(edit)?),
        };
        Ok(outcome)
    }

    /// Unsaved edits to the prompt and workflow panels.
    fn edit_panel(&mut self, command: ShellCommand) -> Result<String, String> {
        let text = match command {
            ShellCommand::Prompt { kind, text } => {
                self.prompts.set(kind, text);
                format!("{} prompt updated (unsaved)", kind_name(kind))
            }
            ShellCommand::PromptReset(kind) => {
                self.prompts.reset(kind);
                format!("{} prompt reset (unsaved)", kind_name(kind))
            }
            ShellCommand::Var { kind, variable } => {
                let variable = prompt_variable(&variable)?;
                self.prompts.insert_variable(kind, variable);
                format!("{} Prompt:\n  {}", kind_name(kind), self.prompts.text(kind))
            }
            ShellCommand::MaxSteps(input) => {
                let steps = self.workflow.set_max_steps_input(&input);
                format!("Maximum Steps: {steps} (unsaved)")
            }
            ShellCommand::Memory(strategy) => {
                self.workflow.set_memory_strategy(strategy);
                format!("Memory Strategy: {} (unsaved)", strategy.label())
            }
            ShellCommand::Advanced(on) => {
                self.workflow.set_advanced_mode(on);
                let state = if on { "on" } else { "off" };
                format!("Advanced Mode: {state} (unsaved)")
            }
            other => return Err(format!("not a panel command: {other:?}")),
        };
        Ok(text)
    }

    /// Waits for pending work, writing whatever it produces.
    fn settle(&mut self, out: &mut impl Write) -> io::Result<()> {
        loop {
            self.show_step_change(out)?;
            self.show_new_messages(out)?;

            let Some(due) = self.session.next_deadline() else {
                return Ok(());
            };
            let wait = Duration::try_from(due.duration_since(Timestamp::now()))
                .unwrap_or(Duration::ZERO);
            if !wait.is_zero() {
                if self.session.is_thinking() {
                    writeln!(out, "(thinking...)")?;
                } else if self.session.is_deploying() {
                    writeln!(out, "(deploying...)")?;
                }
                out.flush()?;
                thread::sleep(wait);
            }

            let events = self.session.poll();
            for event in &events {
                if let Event::Replied { message_id } = event {
                    debug!(message_id, "reply delivered");
                }
            }
            self.show_new_messages(out)?;
            if events.contains(&Event::Deployed)
                && let Some(notification) = self.session.notifications().last()
            {
                writeln!(out, "{}", format_notification(notification))?;
            }
        }
    }

    /// Prints the heading of a newly entered step and reopens the panels on
    /// the draft. Unsaved panel edits do not survive a step change.
    fn show_step_change(&mut self, out: &mut impl Write) -> io::Result<()> {
        let step = self.session.step();
        if step == self.shown_step {
            return Ok(());
        }
        self.shown_step = step;
        let draft = self.session.draft();
        self.prompts = PromptPanel::from_templates(&draft.prompt_templates);
        self.workflow = WorkflowPanel::from_params(&draft.workflow_params);
        writeln!(out, "{}", format_step_header(step))
    }

    /// Writes system messages (and their panels) not yet shown. User
    /// messages are the shell's own input and are not echoed.
    fn show_new_messages(&mut self, out: &mut impl Write) -> io::Result<()> {
        let messages = self.session.transcript().messages();
        for message in &messages[self.shown_messages.min(messages.len())..] {
            if message.sender == Sender::User {
                continue;
            }
            writeln!(out, "{}", format_message(message))?;
            for panel in &message.panels {
                writeln!(out, "{}", self.render_panel(panel))?;
            }
        }
        self.shown_messages = messages.len();
        Ok(())
    }

    fn render_panel(&self, panel: &Panel) -> String {
        let draft = self.session.draft();
        match panel {
            Panel::CapabilityPicker => {
                format_capabilities(&self.session.catalog().list(None), draft)
            }
            Panel::KnowledgeBase => format_knowledge_panel(draft),
            Panel::PromptBuilder => format_prompt_panel(&self.prompts),
            Panel::WorkflowBuilder { capability_ids } => {
                format_workflow_panel(capability_ids.len(), self.workflow.params())
            }
        }
    }
}

fn kind_name(kind: PromptKind) -> &'static str {
    match kind {
        PromptKind::Planner => "Planner",
        PromptKind::Generator => "Generator",
    }
}

/// Match a template variable with or without its braces, ignoring case.
fn prompt_variable(name: &str) -> Result<&'static str, String> {
    let bare = name.trim_start_matches("{{").trim_end_matches("}}");
    PROMPT_VARIABLES
        .iter()
        .map(|(variable, _)| *variable)
        .find(|variable| {
            variable
                .trim_start_matches("{{")
                .trim_end_matches("}}")
                .eq_ignore_ascii_case(bare)
        })
        .ok_or_else(|| format!("unknown variable: {name}"))
}

/// Resolve a knowledge source reference (full UUID or unambiguous prefix).
fn resolve_source(draft: &AgentDraft, reference: &str) -> Result<Uuid, String> {
    // Try full UUID first.
    if let Ok(id) = reference.parse::<Uuid>() {
        return Ok(id);
    }

    let matches: Vec<Uuid> = draft
        .knowledge_sources
        .iter()
        .map(|s| s.id)
        .filter(|id| id.to_string().starts_with(reference))
        .collect();

    match matches.as_slice() {
        [] => Err(format!("no source matching '{reference}'")),
        [id] => Ok(*id),
        _ => {
            let ids: Vec<String> = matches
                .iter()
                .map(|id| id.to_string()[..8].to_string())
                .collect();
            Err(format!(
                "'{reference}' is ambiguous, matches {} sources: {}",
                matches.len(),
                ids.join(", ")
            ))
        }
    }
}
