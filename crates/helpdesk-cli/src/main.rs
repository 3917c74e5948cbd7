mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    activity::ActivitySubcommand, config::ConfigSubcommand, product::ProductSubcommand,
    report::ReportSubcommand, ticket::TicketSubcommand, user::UserSubcommand, Ctx,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "helpdesk",
    about = "Support ticket desk: tickets, SLA deadlines, and monthly reports",
    version,
    propagate_version = true
)]
struct Cli {
    /// Helpdesk root (default: auto-detect from .helpdesk/)
    #[arg(long, global = true, env = "HELPDESK_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Act as this user: scopes listings and reports to their role and
    /// attributes activity entries to them
    #[arg(long = "as", global = true, env = "HELPDESK_USER")]
    as_user: Option<String>,

    /// Evaluate SLA state at this instant instead of the current time
    #[arg(long, global = true, env = "HELPDESK_NOW", hide = true)]
    now: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a helpdesk in the current directory
    Init {
        /// Display name (defaults to the directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Manage tickets
    Ticket {
        #[command(subcommand)]
        subcommand: TicketSubcommand,
    },

    /// Manage products (sub-brands)
    Product {
        #[command(subcommand)]
        subcommand: ProductSubcommand,
    },

    /// Manage dashboard users and their profiles
    User {
        #[command(subcommand)]
        subcommand: UserSubcommand,
    },

    /// Monthly rollups and summary statistics
    Report {
        #[command(subcommand)]
        subcommand: ReportSubcommand,
    },

    /// Show or clear the activity log
    Activity {
        #[command(subcommand)]
        subcommand: ActivitySubcommand,
    },

    /// Show and validate configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Rewrite stored tickets with canonical status/priority/source values
    Migrate,

    /// Serve the dashboard API
    Serve {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "3141")]
        port: u16,

        /// Don't open browser automatically
        #[arg(long)]
        no_open: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = Ctx::new(root, cli.json, cli.as_user, cli.now.as_deref()).and_then(|ctx| {
        match cli.command {
            Commands::Init { name } => cmd::init::run(&ctx, name.as_deref()),
            Commands::Ticket { subcommand } => cmd::ticket::run(&ctx, subcommand),
            Commands::Product { subcommand } => cmd::product::run(&ctx, subcommand),
            Commands::User { subcommand } => cmd::user::run(&ctx, subcommand),
            Commands::Report { subcommand } => cmd::report::run(&ctx, subcommand),
            Commands::Activity { subcommand } => cmd::activity::run(&ctx, subcommand),
            Commands::Config { subcommand } => cmd::config::run(&ctx, subcommand),
            Commands::Migrate => cmd::migrate::run(&ctx),
            Commands::Serve { port, no_open } => cmd::serve::run(&ctx, port, no_open),
        }
    });

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
