use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, info};

use crate::actor::ActorRef;
use crate::command::{Command, CommandSpec, InvocationOutcome};
use crate::invocation::{InvocationContext, ResponseSink};
use crate::store::EntityStore;

const COMMAND_PREFIX: char = '/';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("command name cannot be empty")]
    EmptyName,
    #[error("command name '{0}' must not contain whitespace or quotes")]
    InvalidName(String),
    #[error("duplicate command registration: {0}")]
    Duplicate(String),
}

#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Box<dyn Command>>,
    lookup_by_lower_name: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Box<dyn Command>) -> Result<(), RegistryError> {
        let name = command.spec().name();
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if name
            .chars()
            .any(|ch| ch.is_whitespace() || ch == '"' || ch == COMMAND_PREFIX)
        {
            return Err(RegistryError::InvalidName(name.to_string()));
        }
        let lower = name.to_ascii_lowercase();
        if self.lookup_by_lower_name.contains_key(&lower) {
            return Err(RegistryError::Duplicate(name.to_string()));
        }

        self.commands.push(command);
        self.lookup_by_lower_name
            .insert(lower, self.commands.len() - 1);
        Ok(())
    }

    pub fn lookup(&self, input_name: &str) -> Option<&dyn Command> {
        let lower = input_name.to_ascii_lowercase();
        let index = self.lookup_by_lower_name.get(&lower)?;
        self.commands.get(*index).map(|command| &**command)
    }

    pub fn iter_specs_in_order(&self) -> impl Iterator<Item = &CommandSpec> {
        // Help output order is registration order.
        self.commands.iter().map(|command| command.spec())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Who issued a line, as known to the session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSender {
    pub actor: ActorRef,
    pub privileged: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("{0}")]
    Tokenize(String),
    #[error("empty command line")]
    Empty,
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("permission denied for '{0}'")]
    PermissionDenied(String),
    #[error("'{command}' takes no arguments, got {count}")]
    UnexpectedArguments { command: String, count: usize },
}

impl DispatchError {
    fn hint(&self) -> &'static str {
        match self {
            Self::UnknownCommand(_) | Self::Empty | Self::Tokenize(_) => " try: help",
            Self::PermissionDenied(_) | Self::UnexpectedArguments { .. } => "",
        }
    }
}

/// Turns raw command lines into exactly one handler invocation.
pub struct CommandDispatcher {
    registry: CommandRegistry,
}

impl CommandDispatcher {
    pub fn new(registry: CommandRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Rejections are reported to the sender as a single `error:` line and
    /// never reach a handler.
    pub fn dispatch(
        &self,
        sender: CommandSender,
        line: &str,
        store: &mut EntityStore,
        responses: &mut dyn ResponseSink,
    ) -> Result<InvocationOutcome, DispatchError> {
        let command = match self.check(sender, line) {
            Ok(command) => command,
            Err(error) => {
                debug!(actor = %sender.actor, error = %error, "dispatch_rejected");
                responses.send(&format!("error: {error}.{}", error.hint()));
                return Err(error);
            }
        };

        let name = command.spec().name();
        let outcome = {
            let mut ctx = InvocationContext::new(sender.actor, store, responses);
            command.execute(&mut ctx)
        };
        info!(command = name, actor = %sender.actor, outcome = ?outcome, "command_executed");
        Ok(outcome)
    }

    fn check(&self, sender: CommandSender, line: &str) -> Result<&dyn Command, DispatchError> {
        let trimmed = line.trim();
        let trimmed = trimmed.strip_prefix(COMMAND_PREFIX).unwrap_or(trimmed);
        let tokens = tokenize_line(trimmed).map_err(DispatchError::Tokenize)?;
        let Some((command_name, args)) = tokens.split_first() else {
            return Err(DispatchError::Empty);
        };

        let command = self
            .registry
            .lookup(command_name)
            .ok_or_else(|| DispatchError::UnknownCommand(command_name.clone()))?;
        let spec = command.spec();
        if spec.requires_privilege() && !sender.privileged {
            return Err(DispatchError::PermissionDenied(spec.name().to_string()));
        }
        if !args.is_empty() {
            return Err(DispatchError::UnexpectedArguments {
                command: spec.name().to_string(),
                count: args.len(),
            });
        }
        Ok(command)
    }

    pub fn help_lines(&self, privileged: bool) -> Vec<String> {
        self.registry
            .iter_specs_in_order()
            .filter(|spec| privileged || !spec.requires_privilege())
            .map(|spec| format!("/{} - {}", spec.name(), spec.description()))
            .collect()
    }
}

pub fn tokenize_line(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut seen_token_content = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                seen_token_content = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if seen_token_content {
                    tokens.push(std::mem::take(&mut current));
                    seen_token_content = false;
                }
            }
            _ => {
                current.push(ch);
                seen_token_content = true;
            }
        }
    }

    if in_quotes {
        return Err("unterminated quoted string".to_string());
    }
    if seen_token_content {
        tokens.push(current);
    }

    Ok(tokens)
}
