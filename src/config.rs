//! Binary configuration
//!
//! Command line flags with environment fallbacks. Only `main` reads this;
//! the relay core takes its settings as plain arguments.

use clap::Parser;

/// Room relay server
#[derive(Parser, Clone, Debug)]
#[command(name = "room_relay", version, about = "Room-based WebSocket message relay")]
pub struct Config {
    /// Address to listen on
    #[arg(env = "RELAY_ADDR", default_value = "127.0.0.1:8080")]
    pub addr: String,

    /// Capacity of the relay command channel
    #[arg(long, env = "RELAY_COMMAND_BUFFER", default_value_t = 256)]
    pub command_buffer: usize,

    /// Emit logs as JSON
    #[arg(long, env = "RELAY_JSON_LOGS")]
    pub json_logs: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["room_relay"]).unwrap();
        assert_eq!(config.addr, "127.0.0.1:8080");
        assert_eq!(config.command_buffer, 256);
        assert!(!config.json_logs);
    }

    #[test]
    fn test_overrides() {
        let config = Config::try_parse_from([
            "room_relay",
            "0.0.0.0:9000",
            "--command-buffer",
            "4",
            "--json-logs",
        ])
        .unwrap();
        assert_eq!(config.addr, "0.0.0.0:9000");
        assert_eq!(config.command_buffer, 4);
        assert!(config.json_logs);
    }

    #[test]
    fn test_cli_is_consistent() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}
