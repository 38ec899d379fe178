//! Interactive session commands.
//!
//! Requirements are addressed by their 1-based position in the list; the ids
//! behind them never reach the terminal.

use crate::advisory::{Completion, QUICK_PROMPTS};
use crate::phase::{ProjectPhase, UnknownPhase};
use crate::requirement::{RequirementId, RequirementKind, UnknownRequirementKind};
use crate::session::Session;
use crate::store::{ProjectStore, SelectionChange};
use std::str::FromStr;
use thiserror::Error;

pub const HELP: &str = "\
Comandos:
  phase <requirements|components|modeling|programming|report>
  next | prev                 cambiar de fase
  name <texto>                nombre del proyecto
  add <functional|economic|safety>
  describe <n> <texto>        describir el requerimiento n
  remove <n>                  eliminar el requerimiento n
  toggle <id>                 seleccionar/deseleccionar un componente
  ask <pregunta>              consultar al tutor
  quick <1-4>                 preguntas rápidas
  analyze <concepto>          modelo matemático
  code                        generar base de código
  code-set                    escribir el código (termina con una línea '.')
  show                        volver a mostrar la fase
  help | quit";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0} (type `help`)")]
    Unknown(String),

    #[error("`{command}` expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("No requirement at position {0}")]
    InvalidPosition(String),

    #[error("No quick prompt number {0}")]
    InvalidQuickPrompt(String),

    #[error("Unknown component: {0}")]
    UnknownComponent(String),

    #[error(transparent)]
    Phase(#[from] UnknownPhase),

    #[error(transparent)]
    Kind(#[from] UnknownRequirementKind),
}

pub type CommandResult<T> = Result<T, CommandError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Phase(ProjectPhase),
    Next,
    Prev,
    Name(String),
    Add(RequirementKind),
    Describe { position: usize, text: String },
    Remove(usize),
    Toggle(String),
    Ask(String),
    Quick(usize),
    Analyze(String),
    GenerateCode,
    EditCode,
    Show,
    Help,
    Quit,
}

/// What the input loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Collect a multi-line code draft from the user.
    ReadCode,
    Quit,
}

fn parse_position(raw: &str) -> CommandResult<usize> {
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::InvalidPosition(raw.to_string())),
    }
}

fn required<'a>(
    rest: &'a str,
    command: &'static str,
    expected: &'static str,
) -> CommandResult<&'a str> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument { command, expected })
    } else {
        Ok(rest)
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }

        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        match head.to_ascii_lowercase().as_str() {
            "phase" => Ok(Command::Phase(
                required(rest, "phase", "a phase name")?.parse()?,
            )),
            "next" => Ok(Command::Next),
            "prev" => Ok(Command::Prev),
            "name" => Ok(Command::Name(rest.to_string())),
            "add" => Ok(Command::Add(
                required(rest, "add", "a requirement type")?.parse()?,
            )),
            "describe" => {
                let rest = required(rest, "describe", "a position and text")?;
                let (position, text) = match rest.split_once(char::is_whitespace) {
                    Some((position, text)) => (position, text.trim()),
                    None => (rest, ""),
                };
                Ok(Command::Describe {
                    position: parse_position(position)?,
                    text: text.to_string(),
                })
            }
            "remove" => Ok(Command::Remove(parse_position(required(
                rest,
                "remove",
                "a position",
            )?)?)),
            "toggle" => Ok(Command::Toggle(
                required(rest, "toggle", "a component id")?.to_string(),
            )),
            "ask" => Ok(Command::Ask(
                required(rest, "ask", "a question")?.to_string(),
            )),
            "quick" => {
                let raw = required(rest, "quick", "a number from 1 to 4")?;
                match raw.parse::<usize>() {
                    Ok(n) if (1..=QUICK_PROMPTS.len()).contains(&n) => Ok(Command::Quick(n)),
                    _ => Err(CommandError::InvalidQuickPrompt(raw.to_string())),
                }
            }
            "analyze" => Ok(Command::Analyze(
                required(rest, "analyze", "a physics concept")?.to_string(),
            )),
            "code" => Ok(Command::GenerateCode),
            "code-set" => Ok(Command::EditCode),
            "show" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn requirement_at(store: &ProjectStore, position: usize) -> CommandResult<RequirementId> {
    position
        .checked_sub(1)
        .and_then(|index| store.data().requirements().get(index))
        .map(|req| req.id().clone())
        .ok_or_else(|| CommandError::InvalidPosition(position.to_string()))
}

/// Runs one command against the session.
pub async fn execute(session: &mut Session, command: Command) -> CommandResult<Flow> {
    let flow = match command {
        Command::Phase(phase) => {
            session.store_mut().set_phase(phase);
            Flow::Continue
        }
        Command::Next => {
            let next = session.store().phase().next();
            session.store_mut().set_phase(next);
            Flow::Continue
        }
        Command::Prev => {
            let previous = session.store().phase().previous();
            session.store_mut().set_phase(previous);
            Flow::Continue
        }
        Command::Name(name) => {
            session.store_mut().set_project_name(name);
            Flow::Continue
        }
        Command::Add(kind) => {
            session.store_mut().add_requirement(kind);
            Flow::Continue
        }
        Command::Describe { position, text } => {
            let id = requirement_at(session.store(), position)?;
            session.store_mut().update_requirement_description(&id, text);
            Flow::Continue
        }
        Command::Remove(position) => {
            let id = requirement_at(session.store(), position)?;
            session.store_mut().remove_requirement(&id);
            Flow::Continue
        }
        Command::Toggle(component_id) => {
            match session.store_mut().toggle_component_selection(&component_id) {
                SelectionChange::Unknown => {
                    return Err(CommandError::UnknownComponent(component_id))
                }
                SelectionChange::Selected | SelectionChange::Deselected => Flow::Continue,
            }
        }
        Command::Ask(question) => {
            log_completion(session.ask_tutor(&question).await);
            Flow::Continue
        }
        Command::Quick(number) => {
            let (_, prompt) = number
                .checked_sub(1)
                .and_then(|index| QUICK_PROMPTS.get(index))
                .ok_or_else(|| CommandError::InvalidQuickPrompt(number.to_string()))?;
            log_completion(session.ask_tutor(prompt).await);
            Flow::Continue
        }
        Command::Analyze(concept) => {
            log_completion(session.analyze_math_model(&concept).await);
            Flow::Continue
        }
        Command::GenerateCode => {
            log_completion(session.generate_control_code().await);
            Flow::Continue
        }
        Command::EditCode => Flow::ReadCode,
        Command::Show | Command::Help => Flow::Continue,
        Command::Quit => Flow::Quit,
    };
    Ok(flow)
}

fn log_completion(completion: Completion) {
    if completion == Completion::Stale {
        tracing::debug!("Advisory response superseded by a newer request");
    }
}
