//! Output formatting for CLI display.

use std::fmt::Write;

use crate::deploy::Notification;
use crate::model::{
    AgentDraft, CapabilityRef, Message, PromptKind, Sender, SourceKind, Step, WorkflowParams,
};
use crate::panel::{PROMPT_VARIABLES, PromptPanel, format_bytes};
use crate::progress::Progress;

/// Width of the progress bar in characters.
const BAR_WIDTH: usize = 20;

pub(super) fn format_message(message: &Message) -> String {
    let who = match message.sender {
        Sender::User => "you",
        Sender::System => "assistant",
    };
    let mut out = format!("{who}: {}", message.content);
    for (i, button) in message.actions.iter().enumerate() {
        let _ = write!(out, "\n  [{}] {}", i + 1, button.label);
    }
    out
}

/// Heading printed whenever the wizard moves to another step.
pub(super) fn format_step_header(step: Step) -> String {
    let position = if step == Step::Deployed {
        String::new()
    } else {
        format!(" (step {} of {})", step.index() + 1, Step::TOTAL)
    };
    format!(
        "── {}{position} ──\n{}\n({})",
        step.title(),
        step.hint(),
        step.placeholder()
    )
}

/// The marketplace, with a mark on tools the draft already has.
pub(super) fn format_capabilities(capabilities: &[CapabilityRef], draft: &AgentDraft) -> String {
    if capabilities.is_empty() {
        return "No tools found".to_string();
    }
    let mut out = String::new();
    for cap in capabilities {
        let mark = if draft.is_selected(cap.id) { "x" } else { " " };
        let popular = if cap.popular { " *popular*" } else { "" };
        let _ = writeln!(
            out,
            "[{mark}] {:>2}  {} ({}){popular}\n        {}",
            cap.id, cap.name, cap.category, cap.description
        );
    }
    let count = draft.selected_capabilities.len();
    let _ = write!(
        out,
        "{count} tool{} selected",
        if count == 1 { "" } else { "s" }
    );
    out
}

pub(super) fn format_sources(draft: &AgentDraft) -> String {
    if draft.knowledge_sources.is_empty() {
        return "No sources added yet".to_string();
    }
    let mut out = String::from("Added Sources:");
    for source in &draft.knowledge_sources {
        let short_id = &source.id.to_string()[..8];
        let detail = match &source.kind {
            SourceKind::File { size_bytes, .. } => format_bytes(*size_bytes),
            SourceKind::Url { .. } => "Web URL".to_string(),
        };
        let _ = write!(out, "\n  {short_id}  {}  ({detail})", source.display_name());
    }
    out
}

pub(super) fn format_knowledge_panel(draft: &AgentDraft) -> String {
    format!(
        "Knowledge Base: add documents with /file <name> <bytes> \
         (PDF, DOC, DOCX, TXT, CSV) or web pages with /url <url>.\n{}",
        format_sources(draft)
    )
}

pub(super) fn format_prompt_panel(panel: &PromptPanel) -> String {
    let mut out = String::from("Prompt Templates (edit with /prompt, save with /save-prompts)");
    for (kind, name) in [
        (PromptKind::Planner, "Planner"),
        (PromptKind::Generator, "Generator"),
    ] {
        let _ = write!(out, "\n{name} Prompt:\n  {}", panel.text(kind));
    }
    out.push_str("\nAvailable Variables:");
    for (variable, meaning) in PROMPT_VARIABLES {
        let _ = write!(out, "\n  {variable:<18} {meaning}");
    }
    out
}

/// The execution flow diagram and the current workflow settings.
pub(super) fn format_workflow_panel(tool_count: usize, params: &WorkflowParams) -> String {
    let tools = if tool_count == 0 {
        "No tools configured yet".to_string()
    } else {
        format!("Uses selected tools ({tool_count} configured)")
    };
    let nodes = [
        "User Input".to_string(),
        "Plan Generation: Agent analyzes the request and creates a plan".to_string(),
        format!("Tool Execution: {tools}"),
        "Knowledge Integration: Combines tool results with knowledge base".to_string(),
        "Response Generation: Creates the final response to the user".to_string(),
    ];

    let mut out = String::from("Workflow (adjust with /max-steps, /memory, /advanced)");
    for (i, node) in nodes.iter().enumerate() {
        let _ = write!(out, "\n  {}. {node}", i + 1);
    }
    let _ = write!(
        out,
        "\nMaximum Steps: {}\nMemory Strategy: {}\nAdvanced Mode: {}",
        params.max_steps,
        params.memory_strategy.label(),
        if params.advanced_mode { "on" } else { "off" }
    );
    out
}

pub(super) fn format_progress(step: Step, progress: &Progress) -> String {
    let filled = usize::from(progress.percent) * BAR_WIDTH / 100;
    let mut out = format!(
        "Building Progress [{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        progress.percent
    );

    for s in Step::CONFIGURABLE {
        let mark = if s < step {
            "x"
        } else if s == step {
            ">"
        } else {
            " "
        };
        let _ = write!(out, "\n  [{mark}] {}", s.label());
    }

    let lines = [
        ("Agent Description", &progress.description),
        ("Tools", &progress.tools),
        ("Knowledge Base", &progress.sources),
        ("Prompts & Workflow", &progress.prompts),
    ];
    for ((name, value), done) in lines.iter().zip(progress.completed) {
        let mark = if done { "x" } else { " " };
        let _ = write!(out, "\n  [{mark}] {name}: {value}");
    }
    out
}

pub(super) fn format_notification(notification: &Notification) -> String {
    format!("*** {} ***\n{}", notification.title, notification.body)
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;

    use crate::catalog::{CapabilityCatalog, StaticCatalog};
    use crate::model::{Action, ActionButton, MemoryStrategy, SourceRecord};

    fn message(sender: Sender, content: &str, actions: Vec<ActionButton>) -> Message {
        Message {
            id: 1,
            sender,
            content: content.to_string(),
            actions,
            panels: Vec::new(),
            sent_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn message_lists_numbered_actions() {
        let msg = message(
            Sender::System,
            "Ready?",
            vec![ActionButton::new(
                "Continue",
                Action::Advance {
                    from: Step::Describe,
                },
            )],
        );
        assert_eq!(format_message(&msg), "assistant: Ready?\n  [1] Continue");

        let msg = message(Sender::User, "hello", Vec::new());
        assert_eq!(format_message(&msg), "you: hello");
    }

    #[test]
    fn step_header_shows_position() {
        let header = format_step_header(Step::KnowledgeBase);
        assert!(header.starts_with("── Build Knowledge Base (step 3 of 5) ──"));
        assert!(format_step_header(Step::Deployed).starts_with("── Your agent is ready to use! ──"));
    }

    #[test]
    fn capabilities_mark_selection() {
        let catalog = StaticCatalog::default();
        let mut draft = AgentDraft::default();
        draft.toggle_capability(catalog.get(1).unwrap());

        let out = format_capabilities(&catalog.list(Some("search")), &draft);
        assert!(out.contains("[x]  1  Web Search"));
        assert!(out.ends_with("1 tool selected"));

        assert_eq!(format_capabilities(&[], &draft), "No tools found");
    }

    #[test]
    fn sources_show_size_or_url() {
        let mut draft = AgentDraft::default();
        assert_eq!(format_sources(&draft), "No sources added yet");

        draft.add_source(SourceRecord::file("handbook.pdf", 2048, Timestamp::UNIX_EPOCH));
        draft.add_source(SourceRecord::url("https://example.com/faq", Timestamp::UNIX_EPOCH));
        let out = format_sources(&draft);
        assert!(out.contains("handbook.pdf  (2 KB)"));
        assert!(out.contains("https://example.com/faq  (Web URL)"));
    }

    #[test]
    fn prompt_panel_lists_variables() {
        let out = format_prompt_panel(&PromptPanel::default());
        assert!(out.contains("Planner Prompt:"));
        assert!(out.contains("{{KNOWLEDGE}}"));
    }

    #[test]
    fn workflow_panel_describes_tools_step() {
        let params = WorkflowParams {
            max_steps: 7,
            memory_strategy: MemoryStrategy::Recent,
            advanced_mode: true,
        };
        let out = format_workflow_panel(2, &params);
        assert!(out.contains("3. Tool Execution: Uses selected tools (2 configured)"));
        assert!(out.contains("Maximum Steps: 7"));
        assert!(out.contains("Memory Strategy: Recent History"));
        assert!(out.contains("Advanced Mode: on"));

        let out = format_workflow_panel(0, &WorkflowParams::default());
        assert!(out.contains("No tools configured yet"));
    }

    #[test]
    fn progress_marks_steps() {
        let draft = AgentDraft::default();
        let out = format_progress(
            Step::ConfigureTools,
            &Progress::of(Step::ConfigureTools, &draft),
        );
        assert!(out.starts_with("Building Progress [####----------------] 20%"));
        assert!(out.contains("[x] Describe Agent"));
        assert!(out.contains("[>] Configure Tools"));
        assert!(out.contains("[ ] Tools: No tools selected"));
    }
}
