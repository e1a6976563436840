use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use tracing::{error, info};

use super::bootstrap::StartupError;
use super::console::ServerConsole;

pub(crate) fn run(app: Result<ServerConsole, StartupError>) -> ExitCode {
    let mut console = match app {
        Ok(console) => console,
        Err(err) => {
            error!(error = %err, "startup_failed");
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    if let Err(err) = pump_lines(&mut console, stdin.lock(), &mut stdout) {
        error!(error = %err, "console_io_failed");
        return ExitCode::FAILURE;
    }

    info!(players = console.connected_players(), "console_shutdown");
    ExitCode::SUCCESS
}

fn pump_lines<R: BufRead, W: Write>(
    console: &mut ServerConsole,
    input: R,
    output: &mut W,
) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        for out in console.process_line(&line) {
            writeln!(output, "{out}")?;
        }
        output.flush()?;
        if console.quit_requested() {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::bootstrap::{build_console, ServerConfig};

    fn transcript(script: &str) -> String {
        let mut console = build_console(&ServerConfig::default()).expect("console");
        let mut output = Vec::new();
        pump_lines(&mut console, script.as_bytes(), &mut output).expect("pump");
        String::from_utf8(output).expect("utf8")
    }

    #[test]
    fn scripted_session_produces_expected_transcript() {
        let script = "join 1 ada\nas 1 /solarPanel\nas 2 /solarPanel\npage 1\nquit\n";

        assert_eq!(
            transcript(script),
            "actor:1 joined as 'ada' (entity 0)\n\
             [to actor:2] Erreur: Impossible d'obtenir le joueur\n\
             actor:1 page: solar_panel (opened 1 total)\n\
             bye\n"
        );
    }

    #[test]
    fn lines_after_quit_are_not_processed() {
        assert_eq!(transcript("quit\njoin 1 ada\n"), "bye\n");
    }

    #[test]
    fn end_of_input_stops_cleanly() {
        assert_eq!(transcript("join 1 ada"), "actor:1 joined as 'ada' (entity 0)\n");
    }
}
