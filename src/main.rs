mod cli;

use log::debug;
use nexus_mods_api::{Config, NexusClient};
use serde_json::{json, Value};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches();
    let log_level = matches.get_one::<String>("log-level").cloned();
    cli::init_logging(log_level.as_deref());

    if matches.get_flag("version") {
        println!("nexus-mods-api {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let Some((command, args)) = matches.subcommand() else {
        cli::build_cli().print_help()?;
        return Ok(());
    };

    let cfg = Config::from_env().map_err(anyhow::Error::msg)?;
    debug!("using API at {}", cfg.api_url);
    let client = NexusClient::new(cfg)?;

    let output: Value = match command {
        "rate-limits" => {
            let limits = client.get_rate_limits().await?;
            json!({
                "rate_limits": limits,
                "blocked": limits.is_blocked(),
                "renews_in_secs": limits.time_until_renewal().as_secs(),
                "last_request": client.last_request_metadata(),
            })
        }
        "validate" => serde_json::to_value(client.users().validate().await?)?,
        "game" => {
            let domain = required(args, "domain")?;
            serde_json::to_value(client.games().get_game(domain).await?)?
        }
        "mod" => {
            let domain = required(args, "domain")?;
            let id = *args
                .get_one::<u32>("id")
                .ok_or_else(|| anyhow::anyhow!("missing mod id"))?;
            serde_json::to_value(client.mods().get_mod(domain, id).await?)?
        }
        other => anyhow::bail!("unknown command: {other}"),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn required<'a>(args: &'a clap::ArgMatches, name: &str) -> anyhow::Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("missing {name}"))
}
