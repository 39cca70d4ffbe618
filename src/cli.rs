use clap::{value_parser, Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("nexus-mods-api")
        .about("Query the Nexus Mods API")
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .num_args(1)
                .global(true)
                .help("Override RUST_LOG level (e.g., info, debug)"),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .help("Print version and exit")
                .action(ArgAction::SetTrue),
        )
        .subcommand(Command::new("rate-limits").about("Show current rate limits"))
        .subcommand(Command::new("validate").about("Validate the API key"))
        .subcommand(
            Command::new("game")
                .about("Show a game")
                .arg(Arg::new("domain").required(true).help("Game domain, e.g. stardewvalley")),
        )
        .subcommand(
            Command::new("mod")
                .about("Show a mod")
                .arg(Arg::new("domain").required(true))
                .arg(
                    Arg::new("id")
                        .required(true)
                        .value_parser(value_parser!(u32)),
                ),
        )
}

pub fn init_logging(level: Option<&str>) {
    // Explicit level wins, else RUST_LOG, else info. Logs go to stderr.
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(lvl) = level {
        builder.parse_filters(lvl);
    }
    builder.init();
}
