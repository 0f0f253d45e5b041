use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use cycles_bot_utils::{Connection, JsonLinesConnection};
use distance_bot::BotClient;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Plays a round of cycles, keeping as far away from the other players as possible.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// The name to play under
    name: String,

    /// Address of the game server
    #[arg(long, env = "CYCLES_SERVER", default_value = "127.0.0.1:50051")]
    server: String,

    /// Talk to the server through stdin/stdout instead of TCP
    #[arg(long, default_value_t = false)]
    stdio: bool,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(usage_exit_status(&err));
        }
    };
    initialize_logging(args.log_level);

    // Seeded once; every tie-break of the round draws from the same generator
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let rng = StdRng::seed_from_u64(seed);

    let result = if args.stdio {
        play(JsonLinesConnection::stdio(), &args.name, rng)
    } else {
        match JsonLinesConnection::tcp(args.server.as_str()) {
            Ok(connection) => play(connection, &args.name, rng),
            Err(err) => Err(anyhow::Error::new(err).context(format!(
                "{}: Connection to {} failed",
                args.name, args.server
            ))),
        }
    };

    ExitCode::from(exit_status(result))
}

/// Usage errors exit with 1, not clap's default of 2.
fn usage_exit_status(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

/// Reports a fatal error before the process ends.
fn exit_status(result: anyhow::Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            error!("{:#}", err);
            1
        }
    }
}

fn play<C: Connection>(connection: C, name: &str, rng: StdRng) -> anyhow::Result<()> {
    let mut bot = BotClient::new(connection, name, rng)?;
    bot.run()?;
    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
