//! Shell command language.
//!
//! Plain lines are chat messages. Lines starting with `/` drive the
//! controls and panels that a graphical front end would expose as buttons.

use crate::model::{MemoryStrategy, PromptKind};

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Send a chat message.
    Say(String),
    Next,
    Back,
    /// Invoke an action (1-based) of the latest message offering actions.
    Do(usize),
    Tools(Option<String>),
    Toggle(u32),
    File { name: String, size_bytes: u64 },
    Url(String),
    /// Remove a knowledge source by id or unambiguous id prefix.
    Remove(String),
    Sources,
    Prompt { kind: PromptKind, text: String },
    PromptReset(PromptKind),
    Var { kind: PromptKind, variable: String },
    SavePrompts,
    /// Raw max-steps input; the workflow panel decides what it means.
    MaxSteps(String),
    Memory(MemoryStrategy),
    Advanced(bool),
    SaveWorkflow,
    Deploy,
    Progress,
    Another,
    Help,
    Quit,
}

pub const HELP: &str = "\
Type a message to chat. Commands:
  /next, /back                    move between steps
  /do <n>                         use action n of the latest message
  /tools [query]                  list or search the tool marketplace
  /toggle <id>                    select or deselect a tool
  /file <name> <bytes>            add a document to the knowledge base
  /url <url>                      add a web page to the knowledge base
  /remove <id>                    remove a knowledge source (id prefix is fine)
  /sources                        list knowledge sources
  /prompt planner|generator <text>
  /prompt reset planner|generator
  /var planner|generator <NAME>   append a template variable, e.g. TOOLS
  /save-prompts                   save both templates to the agent
  /max-steps <n>                  1 to 10
  /memory summary|recent|full
  /advanced on|off
  /save-workflow                  save workflow settings to the agent
  /deploy                         deploy from the review step
  /progress                       show building progress
  /another                        build another agent after deploying
  /help, /quit";

/// Parse one line of input.
pub fn parse_line(line: &str) -> Result<ShellCommand, String> {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Ok(ShellCommand::Say(line.to_string()));
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    let no_args = |cmd: ShellCommand| {
        if args.is_empty() {
            Ok(cmd)
        } else {
            Err(format!("/{name} takes no arguments"))
        }
    };

    match name {
        "next" => no_args(ShellCommand::Next),
        "back" => no_args(ShellCommand::Back),
        "do" => parse_number(name, args).map(ShellCommand::Do),
        "tools" => Ok(ShellCommand::Tools(
            Some(args.to_string()).filter(|a| !a.is_empty()),
        )),
        "toggle" => parse_number(name, args).map(ShellCommand::Toggle),
        "file" => {
            let (file, size) = args
                .rsplit_once(char::is_whitespace)
                .ok_or("usage: /file <name> <bytes>")?;
            let size_bytes = size
                .parse()
                .map_err(|_| format!("not a byte count: {size}"))?;
            Ok(ShellCommand::File {
                name: file.trim().to_string(),
                size_bytes,
            })
        }
        "url" => Ok(ShellCommand::Url(args.to_string())),
        "remove" if !args.is_empty() => Ok(ShellCommand::Remove(args.to_string())),
        "remove" => Err("usage: /remove <id>".to_string()),
        "sources" => no_args(ShellCommand::Sources),
        "prompt" => parse_prompt(args),
        "var" => {
            let (kind, variable) = args
                .split_once(char::is_whitespace)
                .ok_or("usage: /var planner|generator <NAME>")?;
            Ok(ShellCommand::Var {
                kind: parse_kind(kind)?,
                variable: variable.trim().to_string(),
            })
        }
        "save-prompts" => no_args(ShellCommand::SavePrompts),
        "max-steps" => Ok(ShellCommand::MaxSteps(args.to_string())),
        "memory" => parse_memory(args).map(ShellCommand::Memory),
        "advanced" => match args {
            "on" => Ok(ShellCommand::Advanced(true)),
            "off" => Ok(ShellCommand::Advanced(false)),
            _ => Err("usage: /advanced on|off".to_string()),
        },
        "save-workflow" => no_args(ShellCommand::SaveWorkflow),
        "deploy" => no_args(ShellCommand::Deploy),
        "progress" => no_args(ShellCommand::Progress),
        "another" => no_args(ShellCommand::Another),
        "help" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        _ => Err(format!("unknown command: /{name} (try /help)")),
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, args: &str) -> Result<T, String> {
    args.parse()
        .map_err(|_| format!("usage: /{name} <number>"))
}

fn parse_kind(s: &str) -> Result<PromptKind, String> {
    match s {
        "planner" => Ok(PromptKind::Planner),
        "generator" => Ok(PromptKind::Generator),
        _ => Err(format!("expected planner or generator, got '{s}'")),
    }
}

fn parse_memory(s: &str) -> Result<MemoryStrategy, String> {
    match s {
        "summary" => Ok(MemoryStrategy::Summary),
        "recent" => Ok(MemoryStrategy::Recent),
        "full" => Ok(MemoryStrategy::Full),
        _ => Err("usage: /memory summary|recent|full".to_string()),
    }
}

fn parse_prompt(args: &str) -> Result<ShellCommand, String> {
    let (first, rest) = args
        .split_once(char::is_whitespace)
        .map_or((args, ""), |(a, b)| (a, b.trim()));

    if first == "reset" {
        return Ok(ShellCommand::PromptReset(parse_kind(rest)?));
    }
    if rest.is_empty() {
        return Err("usage: /prompt planner|generator <text>".to_string());
    }
    Ok(ShellCommand::Prompt {
        kind: parse_kind(first)?,
        text: rest.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_message() {
        assert_eq!(
            parse_line("Build a support bot"),
            Ok(ShellCommand::Say("Build a support bot".into()))
        );
        assert_eq!(parse_line("   "), Ok(ShellCommand::Say("   ".into())));
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse_line("/next"), Ok(ShellCommand::Next));
        assert_eq!(parse_line("  /back  "), Ok(ShellCommand::Back));
        assert_eq!(parse_line("/do 1"), Ok(ShellCommand::Do(1)));
        assert_eq!(parse_line("/toggle 3"), Ok(ShellCommand::Toggle(3)));
        assert_eq!(parse_line("/exit"), Ok(ShellCommand::Quit));
        assert!(parse_line("/next 2").is_err());
        assert!(parse_line("/do one").is_err());
        assert!(parse_line("/dance").is_err());
    }

    #[test]
    fn tools_query_is_optional() {
        assert_eq!(parse_line("/tools"), Ok(ShellCommand::Tools(None)));
        assert_eq!(
            parse_line("/tools web search"),
            Ok(ShellCommand::Tools(Some("web search".into())))
        );
    }

    #[test]
    fn file_name_may_contain_spaces() {
        assert_eq!(
            parse_line("/file Employee Handbook.pdf 20480"),
            Ok(ShellCommand::File {
                name: "Employee Handbook.pdf".into(),
                size_bytes: 20480
            })
        );
        assert!(parse_line("/file handbook.pdf").is_err());
        assert!(parse_line("/file handbook.pdf big").is_err());
    }

    #[test]
    fn url_is_passed_through_for_panel_validation() {
        assert_eq!(
            parse_line("/url not a url"),
            Ok(ShellCommand::Url("not a url".into()))
        );
    }

    #[test]
    fn prompt_commands() {
        assert_eq!(
            parse_line("/prompt planner Think step by step."),
            Ok(ShellCommand::Prompt {
                kind: PromptKind::Planner,
                text: "Think step by step.".into()
            })
        );
        assert_eq!(
            parse_line("/prompt reset generator"),
            Ok(ShellCommand::PromptReset(PromptKind::Generator))
        );
        assert_eq!(
            parse_line("/var generator TOOLS"),
            Ok(ShellCommand::Var {
                kind: PromptKind::Generator,
                variable: "TOOLS".into()
            })
        );
        assert!(parse_line("/prompt planner").is_err());
        assert!(parse_line("/prompt critic be harsh").is_err());
    }

    #[test]
    fn workflow_commands() {
        assert_eq!(
            parse_line("/max-steps 7"),
            Ok(ShellCommand::MaxSteps("7".into()))
        );
        assert_eq!(
            parse_line("/memory recent"),
            Ok(ShellCommand::Memory(MemoryStrategy::Recent))
        );
        assert_eq!(parse_line("/advanced on"), Ok(ShellCommand::Advanced(true)));
        assert!(parse_line("/memory everything").is_err());
        assert!(parse_line("/advanced maybe").is_err());
    }
}
