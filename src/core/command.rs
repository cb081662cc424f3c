//! Command parser for the : command system

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add collateral for the configured member (the fifth action, outside
    /// the four tabs)
    Collateral(Option<String>),

    // Connection management
    Connect,
    Disconnect,
    Endpoint(Option<usize>),

    // Unknown command
    Unknown(String),
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let args = parts.next().map(|s| s.trim().to_string());

    match cmd.to_lowercase().as_str() {
        "collateral" | "col" => Command::Collateral(args),
        "connect" | "conn" => Command::Connect,
        "disconnect" | "dc" => Command::Disconnect,
        "endpoint" | "ep" => Command::Endpoint(args.and_then(|s| s.parse().ok())),
        _ => Command::Unknown(input.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_collateral() {
        assert_eq!(parse_command("collateral"), Command::Collateral(None));
        assert_eq!(
            parse_command("collateral 2.5"),
            Command::Collateral(Some("2.5".to_string()))
        );
        assert_eq!(
            parse_command("col 1"),
            Command::Collateral(Some("1".to_string()))
        );
    }

    #[test]
    fn test_parse_connection_commands() {
        assert_eq!(parse_command("connect"), Command::Connect);
        assert_eq!(parse_command("dc"), Command::Disconnect);
        assert_eq!(parse_command("endpoint 1"), Command::Endpoint(Some(1)));
        assert_eq!(parse_command("endpoint"), Command::Endpoint(None));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse_command("notacommand"),
            Command::Unknown("notacommand".to_string())
        );
    }
}
