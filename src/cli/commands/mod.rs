use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("entrata")
        .about("Authentication and authorization core for the Entrata event platform")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("ENTRATA_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("dsn")
                .short('d')
                .long("dsn")
                .help("Database connection string")
                .env("ENTRATA_DSN")
                .required(true),
        )
        .arg(
            // No fallback value on purpose: serving traffic with a guessable
            // signing secret is worse than refusing to start.
            Arg::new("access-token-secret")
                .long("access-token-secret")
                .help("Signing secret for access tokens")
                .env("ENTRATA_ACCESS_TOKEN_SECRET")
                .required(true),
        )
        .arg(
            Arg::new("refresh-token-secret")
                .long("refresh-token-secret")
                .help("Signing secret for refresh tokens, must differ from the access secret")
                .env("ENTRATA_REFRESH_TOKEN_SECRET")
                .required(true),
        )
        .arg(
            Arg::new("frontend-url")
                .long("frontend-url")
                .help("Base URL of the frontend, used for CORS and email links")
                .default_value("http://localhost:3000")
                .env("ENTRATA_FRONTEND_URL"),
        )
        .arg(
            Arg::new("access-ttl")
                .long("access-ttl")
                .help("Access token lifetime in seconds")
                .default_value("900")
                .env("ENTRATA_ACCESS_TTL")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("refresh-ttl")
                .long("refresh-ttl")
                .help("Refresh token lifetime in seconds")
                .default_value("604800")
                .env("ENTRATA_REFRESH_TTL")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("ENTRATA_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Vec<&'static str> {
        vec![
            "entrata",
            "--dsn",
            "postgres://localhost/entrata",
            "--access-token-secret",
            "access-secret",
            "--refresh-token-secret",
            "refresh-secret",
        ]
    }

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "entrata");
        assert_eq!(
            command.get_version().unwrap().to_string(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_check_port_and_dsn() {
        let command = new();
        let matches = command.get_matches_from(base_args());

        assert_eq!(matches.get_one::<u16>("port").copied(), Some(8080));
        assert_eq!(
            matches.get_one::<String>("dsn").map(String::as_str),
            Some("postgres://localhost/entrata")
        );
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let command = new();
        let result = command.try_get_matches_from(vec![
            "entrata",
            "--dsn",
            "postgres://localhost/entrata",
            "--access-token-secret",
            "access-secret",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn test_ttl_defaults() {
        let command = new();
        let matches = command.get_matches_from(base_args());

        assert_eq!(matches.get_one::<i64>("access-ttl").copied(), Some(900));
        assert_eq!(
            matches.get_one::<i64>("refresh-ttl").copied(),
            Some(604_800)
        );
    }

    #[test]
    fn test_verbosity_count() {
        let command = new();
        let mut args = base_args();
        args.push("-vvv");
        let matches = command.get_matches_from(args);

        assert_eq!(matches.get_count("verbosity"), 3);
    }
}
