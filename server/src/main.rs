use clap::ArgAction;
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use log::{error, warn};
use trio_server::cli_error::CliError;
use trio_server::web::WebApp;

fn main() {
    let args = CliArgs::parse();
    let dotenv_result = dotenv();

    let env = env_logger::Env::new().filter_or(
        "RUST_LOG",
        match args.global_opts.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        },
    );
    env_logger::Builder::from_env(env).init();
    if let Err(e) = dotenv_result {
        warn!("Could not read .env file: {}", e);
    }

    let result = match args.command {
        Command::Serve { apps } => serve(apps),
        Command::MigrateDatabase => trio_server::cli::database_migration::run_migrations(),
        Command::ResetDrinks => trio_server::cli::reset_drinks(),
    };
    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(e.exit_code());
    }
}

fn serve(mut apps: Vec<WebApp>) -> Result<(), CliError> {
    if apps.is_empty() {
        apps = vec![WebApp::Fyyur, WebApp::Trivia, WebApp::CoffeeShop];
    }
    trio_server::cli::database_migration::check_migration_state()?;
    trio_server::web::serve(&apps)
}

/// Server for the Fyyur listing site, the trivia API and the coffee shop API
#[derive(Debug, Parser)]
#[clap(name = "trio_server", version)]
pub struct CliArgs {
    #[clap(flatten)]
    global_opts: GlobalOpts,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the web applications
    Serve {
        /// The application to serve (can be specified multiple times). All applications are
        /// served, if omitted.
        #[arg(long = "app", value_enum)]
        apps: Vec<WebApp>,
    },
    /// Apply all pending database schema migrations
    MigrateDatabase,
    /// Delete all drinks of the coffee shop and insert the sample drink
    ResetDrinks,
}

#[derive(Debug, Args)]
struct GlobalOpts {
    /// Verbosity level (can be specified multiple times)
    #[clap(long, short, global = true, action = ArgAction::Count)]
    verbose: u8,
}
