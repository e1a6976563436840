use std::path::PathBuf;

use command_ui::{
    ActorRef, CommandDispatcher, CommandRegistry, ConfigError, MessageCatalog, RegistryError,
};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::console::ServerConsole;
use super::solar_panel;

const MESSAGES_ENV_VAR: &str = "UICMD_MESSAGES";
const OPERATORS_ENV_VAR: &str = "UICMD_OPERATORS";

#[derive(Debug, Error)]
pub(crate) enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to register built-in command: {0}")]
    Registry(#[from] RegistryError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ServerConfig {
    pub(crate) messages_path: Option<PathBuf>,
    pub(crate) operators: Vec<ActorRef>,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self::from_values(
            std::env::var(MESSAGES_ENV_VAR).ok().as_deref(),
            std::env::var(OPERATORS_ENV_VAR).ok().as_deref(),
        )
    }

    fn from_values(messages_path: Option<&str>, operators: Option<&str>) -> Self {
        let messages_path = messages_path
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self {
            messages_path,
            operators: operators.map(parse_operators).unwrap_or_default(),
        }
    }

    fn load_messages(&self) -> Result<MessageCatalog, ConfigError> {
        match &self.messages_path {
            Some(path) => {
                let catalog = MessageCatalog::load_from_path(path)?;
                info!(path = %path.display(), "message_catalog_loaded");
                Ok(catalog)
            }
            None => Ok(MessageCatalog::default()),
        }
    }
}

fn parse_operators(raw: &str) -> Vec<ActorRef> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.parse::<u64>() {
            Ok(id) => Some(ActorRef(id)),
            Err(_) => {
                warn!(value = entry, "operator_id_invalid_ignored");
                None
            }
        })
        .collect()
}

pub(crate) fn build_app() -> Result<ServerConsole, StartupError> {
    init_tracing();
    info!("=== Command UI Server Startup ===");
    build_console(&ServerConfig::from_env())
}

pub(crate) fn build_console(config: &ServerConfig) -> Result<ServerConsole, StartupError> {
    let messages = config.load_messages()?;
    let mut registry = CommandRegistry::new();
    registry.register(Box::new(solar_panel::solar_panel_command(&messages)))?;
    info!(
        commands = registry.len(),
        operators = config.operators.len(),
        "commands_registered"
    );

    Ok(ServerConsole::new(
        CommandDispatcher::new(registry),
        config.operators.iter().copied(),
    ))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
