use std::collections::HashSet;

use command_ui::{ActorRef, CommandDispatcher, CommandSender, EntityStore};

const USAGE_LINES: [&str; 6] = [
    "join <actor:u64> <name> [op] - Connect a player",
    "leave <actor:u64> - Disconnect a player",
    "as <actor:u64> <command...> - Run a command as a player",
    "page <actor:u64> - Show a player's active page",
    "help - List console and player commands",
    "quit - Stop the server",
];

#[derive(Debug, Clone, PartialEq)]
struct ConsoleError {
    reason: String,
    usage: &'static str,
}

impl ConsoleError {
    fn new(reason: impl Into<String>, usage: &'static str) -> Self {
        Self {
            reason: reason.into(),
            usage,
        }
    }

    fn render(&self) -> String {
        format!("error: {}. usage: {}", self.reason, self.usage)
    }
}

/// Line-oriented host around the dispatcher and the player store.
pub(crate) struct ServerConsole {
    dispatcher: CommandDispatcher,
    store: EntityStore,
    operators: HashSet<ActorRef>,
    quit_requested: bool,
}

impl ServerConsole {
    pub(crate) fn new(
        dispatcher: CommandDispatcher,
        operators: impl IntoIterator<Item = ActorRef>,
    ) -> Self {
        Self {
            dispatcher,
            store: EntityStore::default(),
            operators: operators.into_iter().collect(),
            quit_requested: false,
        }
    }

    pub(crate) fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub(crate) fn connected_players(&self) -> usize {
        self.store.player_count()
    }

    pub(crate) fn process_line(&mut self, raw_line: &str) -> Vec<String> {
        let (word, rest) = split_word(raw_line);
        let result = match word.to_ascii_lowercase().as_str() {
            "" => Ok(Vec::new()),
            "join" => self.join(rest),
            "leave" => self.leave(rest),
            "as" => self.run_as(rest),
            "page" => self.show_page(rest),
            "help" => Ok(self.help()),
            "quit" => {
                self.quit_requested = true;
                Ok(vec!["bye".to_string()])
            }
            other => Err(ConsoleError::new(
                format!("unknown console command '{other}'"),
                "help",
            )),
        };
        result.unwrap_or_else(|error| vec![error.render()])
    }

    fn join(&mut self, args: &str) -> Result<Vec<String>, ConsoleError> {
        const USAGE: &str = "join <actor> <name> [op]";
        let parts: Vec<&str> = args.split_whitespace().collect();
        let (raw_actor, name, op) = match parts.as_slice() {
            [actor, name] => (*actor, *name, false),
            [actor, name, "op"] => (*actor, *name, true),
            _ => return Err(ConsoleError::new("expected <actor> <name> [op]", USAGE)),
        };
        let actor = parse_actor(raw_actor, USAGE)?;
        let privileged = op || self.operators.contains(&actor);

        let entity = self
            .store
            .spawn_player(actor, name, privileged)
            .map_err(|error| ConsoleError::new(error.to_string(), USAGE))?;
        Ok(vec![format!(
            "{actor} joined as '{name}' (entity {}{})",
            entity.0,
            if privileged { ", operator" } else { "" }
        )])
    }

    fn leave(&mut self, args: &str) -> Result<Vec<String>, ConsoleError> {
        const USAGE: &str = "leave <actor>";
        let actor = parse_single_actor(args, USAGE)?;
        match self.store.despawn_player(actor) {
            Some(_) => Ok(vec![format!("{actor} left")]),
            None => Err(ConsoleError::new(format!("{actor} is not connected"), USAGE)),
        }
    }

    fn run_as(&mut self, args: &str) -> Result<Vec<String>, ConsoleError> {
        const USAGE: &str = "as <actor> <command...>";
        let (raw_actor, command_line) = split_word(args);
        if raw_actor.is_empty() || command_line.is_empty() {
            return Err(ConsoleError::new("expected <actor> <command...>", USAGE));
        }
        let actor = parse_actor(raw_actor, USAGE)?;
        let sender = CommandSender {
            actor,
            privileged: self.is_privileged(actor),
        };

        let mut responses: Vec<String> = Vec::new();
        // Rejections and handler diagnostics both arrive through `responses`.
        let _ = self
            .dispatcher
            .dispatch(sender, command_line, &mut self.store, &mut responses);
        Ok(responses
            .into_iter()
            .map(|text| format!("[to {actor}] {text}"))
            .collect())
    }

    fn show_page(&self, args: &str) -> Result<Vec<String>, ConsoleError> {
        const USAGE: &str = "page <actor>";
        let actor = parse_single_actor(args, USAGE)?;
        let player = self
            .store
            .player_entity(actor)
            .and_then(|entity| self.store.player(entity))
            .ok_or_else(|| ConsoleError::new(format!("{actor} is not connected"), USAGE))?;

        let pages = player.pages();
        let line = match pages.active() {
            Some(page) => format!(
                "{actor} page: {} (opened {} total)",
                page.page_id(),
                pages.opened_total()
            ),
            None => format!("{actor} has no open page"),
        };
        Ok(vec![line])
    }

    fn help(&self) -> Vec<String> {
        let mut lines: Vec<String> = USAGE_LINES.iter().map(ToString::to_string).collect();
        lines.extend(self.dispatcher.help_lines(true));
        lines
    }

    fn is_privileged(&self, actor: ActorRef) -> bool {
        if self.operators.contains(&actor) {
            return true;
        }
        self.store
            .player_entity(actor)
            .and_then(|entity| self.store.player(entity))
            .is_some_and(|player| player.is_privileged())
    }
}

fn split_word(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (line, ""),
    }
}

fn parse_actor(raw: &str, usage: &'static str) -> Result<ActorRef, ConsoleError> {
    raw.parse::<u64>()
        .map(ActorRef)
        .map_err(|_| ConsoleError::new(format!("invalid actor id '{raw}' (expected u64)"), usage))
}

fn parse_single_actor(args: &str, usage: &'static str) -> Result<ActorRef, ConsoleError> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    match parts.as_slice() {
        [raw] => parse_actor(raw, usage),
        _ => Err(ConsoleError::new("expected exactly one argument <actor>", usage)),
    }
}

#[cfg(test)]
mod tests {
    use command_ui::{CommandRegistry, MessageCatalog};

    use super::*;
    use crate::app::solar_panel::solar_panel_command;

    fn console() -> ServerConsole {
        let mut registry = CommandRegistry::new();
        registry
            .register(Box::new(solar_panel_command(&MessageCatalog::default())))
            .expect("register");
        ServerConsole::new(CommandDispatcher::new(registry), [ActorRef(99)])
    }

    #[test]
    fn connected_player_opens_solar_panel_silently() {
        let mut console = console();
        assert_eq!(
            console.process_line("join 1 ada"),
            vec!["actor:1 joined as 'ada' (entity 0)".to_string()]
        );

        assert!(console.process_line("as 1 /solarPanel").is_empty());
        assert_eq!(
            console.process_line("page 1"),
            vec!["actor:1 page: solar_panel (opened 1 total)".to_string()]
        );
    }

    #[test]
    fn unknown_actor_gets_single_diagnostic() {
        let mut console = console();
        console.process_line("join 1 ada");

        assert_eq!(
            console.process_line("as 2 /solarPanel"),
            vec!["[to actor:2] Erreur: Impossible d'obtenir le joueur".to_string()]
        );
        assert_eq!(
            console.process_line("page 1"),
            vec!["actor:1 has no open page".to_string()]
        );
    }

    #[test]
    fn reopening_replaces_page_in_slot() {
        let mut console = console();
        console.process_line("join 1 ada");
        console.process_line("as 1 /solarPanel");
        console.process_line("as 1 /solarPanel");

        assert_eq!(
            console.process_line("page 1"),
            vec!["actor:1 page: solar_panel (opened 2 total)".to_string()]
        );
    }

    #[test]
    fn leaving_player_takes_unresolved_path_afterwards() {
        let mut console = console();
        console.process_line("join 1 ada");
        console.process_line("as 1 /solarPanel");

        assert_eq!(console.process_line("leave 1"), vec!["actor:1 left".to_string()]);
        assert_eq!(
            console.process_line("as 1 /solarPanel"),
            vec!["[to actor:1] Erreur: Impossible d'obtenir le joueur".to_string()]
        );
    }

    #[test]
    fn dispatch_errors_are_addressed_to_sender() {
        let mut console = console();
        console.process_line("join 1 ada");

        assert_eq!(
            console.process_line("as 1 /solarPanel extra"),
            vec!["[to actor:1] error: 'solarPanel' takes no arguments, got 1.".to_string()]
        );
        assert_eq!(
            console.process_line("as 1 /warp"),
            vec!["[to actor:1] error: unknown command 'warp'. try: help".to_string()]
        );
    }

    #[test]
    fn operators_from_config_join_privileged() {
        let mut console = console();
        assert_eq!(
            console.process_line("join 99 root"),
            vec!["actor:99 joined as 'root' (entity 0, operator)".to_string()]
        );
        assert!(console.is_privileged(ActorRef(99)));
        console.process_line("join 2 bob op");
        assert!(console.is_privileged(ActorRef(2)));
        console.process_line("join 3 eve");
        assert!(!console.is_privileged(ActorRef(3)));
    }

    #[test]
    fn console_argument_errors_report_usage() {
        let mut console = console();
        assert_eq!(
            console.process_line("join x ada"),
            vec!["error: invalid actor id 'x' (expected u64). usage: join <actor> <name> [op]"
                .to_string()]
        );
        assert_eq!(
            console.process_line("leave 5"),
            vec!["error: actor:5 is not connected. usage: leave <actor>".to_string()]
        );
        assert_eq!(
            console.process_line("as 1"),
            vec!["error: expected <actor> <command...>. usage: as <actor> <command...>".to_string()]
        );
        assert_eq!(
            console.process_line("teleport"),
            vec!["error: unknown console command 'teleport'. usage: help".to_string()]
        );
    }

    #[test]
    fn duplicate_join_is_rejected() {
        let mut console = console();
        console.process_line("join 1 ada");
        let lines = console.process_line("join 1 ada");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("error: actor:1 is already connected"));
    }

    #[test]
    fn help_lists_console_then_player_commands() {
        let mut console = console();
        let lines = console.process_line("help");
        assert_eq!(lines.len(), USAGE_LINES.len() + 1);
        assert_eq!(
            lines.last().map(String::as_str),
            Some("/solarPanel - Open Solar Panel UI")
        );
    }

    #[test]
    fn quit_sets_flag_and_blank_lines_are_ignored() {
        let mut console = console();
        assert!(console.process_line("   ").is_empty());
        assert!(!console.quit_requested());
        assert_eq!(console.process_line("quit"), vec!["bye".to_string()]);
        assert!(console.quit_requested());
    }
}
