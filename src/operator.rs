//! Operator-facing introspection: stdin console and periodic population log

use log::{debug, error, info};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::interval;

use crate::core::pairing::SharedEngine;
use crate::error::{Result, StrangerSocksError};

/// Console commands understood by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    ListClients,
    Waitings,
    Stats,
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "list clients" => Some(Self::ListClients),
            "waitings" => Some(Self::Waitings),
            "stats" => Some(Self::Stats),
            _ => None,
        }
    }

    /// Render the answer to this command from a fresh snapshot
    pub fn execute(self, engine: &SharedEngine) -> Result<String> {
        let snapshot = engine.stats()?;
        match self {
            Self::ListClients => Ok(snapshot.client_table()),
            Self::Waitings => Ok(snapshot.waiting_list()),
            Self::Stats => serde_json::to_string_pretty(&snapshot)
                .map_err(|e| StrangerSocksError::MessageParseError(e.to_string())),
        }
    }
}

/// Read commands from stdin until it closes
pub async fn run_console(engine: SharedEngine) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match ConsoleCommand::parse(&line) {
                Some(command) => match command.execute(&engine) {
                    Ok(output) => info!("{}", output),
                    Err(e) => error!("Console command failed: {}", e),
                },
                None => debug!("Unknown console command: {}", line.trim()),
            },
            Ok(None) => {
                debug!("Console input closed");
                break;
            }
            Err(e) => {
                error!("Failed to read console input: {}", e);
                break;
            }
        }
    }
}

/// Start logging connected and waiting counts at a fixed interval
pub fn start_population_reporter(engine: SharedEngine, every: Duration) {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        loop {
            ticker.tick().await;
            match engine.stats() {
                Ok(snapshot) => info!("{}", snapshot),
                Err(e) => error!("Failed to collect population stats: {}", e),
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pairing::create_pairing_engine;
    use crate::core::participant::Outbox;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            ConsoleCommand::parse("list clients\n"),
            Some(ConsoleCommand::ListClients)
        );
        assert_eq!(ConsoleCommand::parse(" waitings"), Some(ConsoleCommand::Waitings));
        assert_eq!(ConsoleCommand::parse("stats"), Some(ConsoleCommand::Stats));
        assert_eq!(ConsoleCommand::parse("list"), None);
    }

    #[test]
    fn test_execute_commands() {
        let engine = create_pairing_engine();
        let (outbox, _rx) = Outbox::channel(8);
        engine.connect("alice", outbox).unwrap();

        let clients = ConsoleCommand::ListClients.execute(&engine).unwrap();
        assert!(clients.contains("alice"));

        let waiting = ConsoleCommand::Waitings.execute(&engine).unwrap();
        assert!(waiting.starts_with("There are currently 1 clients waiting"));

        let json = ConsoleCommand::Stats.execute(&engine).unwrap();
        assert!(json.contains("\"connected\": 1"));
    }
}
