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

    Command::new("venu")
        .about("Event registration service")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("VENU_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("service-url")
                .short('s')
                .long("service-url")
                .help("Base URL of the hosted backend, example: https://<project>.supabase.co")
                .env("VENU_SERVICE_URL")
                .required(true),
        )
        .arg(
            Arg::new("anon-key")
                .short('k')
                .long("anon-key")
                .help("Public (anon) API key for the hosted backend")
                .env("VENU_ANON_KEY")
                .required(true),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("VENU_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "venu");
        assert_eq!(
            command.get_about().unwrap().to_string(),
            "Event registration service"
        );
        assert_eq!(
            command.get_version().unwrap().to_string(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_check_port_and_service_url() {
        let command = new();
        let matches = command.get_matches_from(vec![
            "venu",
            "--port",
            "8080",
            "--service-url",
            "https://project.supabase.co",
            "--anon-key",
            "anon-key",
        ]);

        assert_eq!(matches.get_one::<u16>("port").copied(), Some(8080));
        assert_eq!(
            matches.get_one::<String>("service-url").cloned(),
            Some("https://project.supabase.co".to_string())
        );
        assert_eq!(
            matches.get_one::<String>("anon-key").cloned(),
            Some("anon-key".to_string())
        );
    }

    #[test]
    fn test_missing_required_settings() {
        temp_env::with_vars(
            [
                ("VENU_SERVICE_URL", None::<&str>),
                ("VENU_ANON_KEY", None::<&str>),
            ],
            || {
                let command = new();
                let result = command.try_get_matches_from(vec!["venu"]);
                assert!(result.is_err());
            },
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("VENU_SERVICE_URL", Some("https://project.supabase.co")),
                ("VENU_ANON_KEY", Some("anon-key")),
                ("VENU_PORT", Some("443")),
                ("VENU_LOG_LEVEL", Some("info")),
            ],
            || {
                let command = new();
                let matches = command.get_matches_from(vec!["venu"]);
                assert_eq!(matches.get_one::<u16>("port").copied(), Some(443));
                assert_eq!(
                    matches.get_one::<String>("service-url").cloned(),
                    Some("https://project.supabase.co".to_string())
                );
                assert_eq!(matches.get_one::<u8>("verbosity").copied(), Some(2));
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars(
                [
                    ("VENU_LOG_LEVEL", Some(level)),
                    ("VENU_SERVICE_URL", Some("https://project.supabase.co")),
                    ("VENU_ANON_KEY", Some("anon-key")),
                ],
                || {
                    let command = new();
                    let matches = command.get_matches_from(vec!["venu"]);
                    assert_eq!(
                        matches.get_one::<u8>("verbosity").copied(),
                        Some(index as u8)
                    );
                },
            );
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            temp_env::with_vars([("VENU_LOG_LEVEL", None::<String>)], || {
                let mut args = vec![
                    "venu".to_string(),
                    "--service-url".to_string(),
                    "https://project.supabase.co".to_string(),
                    "--anon-key".to_string(),
                    "anon-key".to_string(),
                ];

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    let v = format!("-{}", "v".repeat(index));
                    args.push(v);
                }

                let command = new();

                let matches = command.get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>("verbosity").copied(),
                    Some(index as u8)
                );
            });
        }
    }
}
