//! ripple CLI — assemble, edit and store exams from an item bank.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use ripple_core::prng::parse_seed;

mod commands;

use commands::common::{BankArgs, Context, FilterArgs, MetaArgs};

#[derive(Parser)]
#[command(name = "ripple", version, about = "Seeded exam generator over item banks")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Exam database, overriding the configured one
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a new exam and save it
    Generate {
        #[command(flatten)]
        bank: BankArgs,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        meta: MetaArgs,

        /// Exam title
        #[arg(long, default_value = "")]
        title: String,

        /// Number of items (default: config `default_item_count`)
        #[arg(long)]
        count: Option<usize>,

        /// Seed of the draw (default: fresh)
        #[arg(long, value_parser = parse_seed, allow_hyphen_values = true)]
        seed: Option<u32>,
    },

    /// Redraw the unlocked slots of an exam
    Regenerate {
        /// Exam id
        id: String,

        #[command(flatten)]
        bank: BankArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Drop the stored filters so every item of the bank is a candidate
        #[arg(long, conflicts_with = "FilterArgs")]
        clear_filters: bool,

        /// Seed of the draw (default: fresh)
        #[arg(long, value_parser = parse_seed, allow_hyphen_values = true)]
        seed: Option<u32>,
    },

    /// Swap the item in one slot for another
    Replace {
        /// Exam id
        id: String,

        /// Slot index, starting at 0
        slot: usize,

        #[command(flatten)]
        bank: BankArgs,
    },

    /// Lock or unlock one slot
    Lock {
        /// Exam id
        id: String,

        /// Slot index, starting at 0
        slot: usize,

        #[command(flatten)]
        bank: BankArgs,
    },

    /// Reorder the alternatives of one slot
    Shuffle {
        /// Exam id
        id: String,

        /// Slot index, starting at 0
        slot: usize,

        #[command(flatten)]
        bank: BankArgs,
    },

    /// Print the pedagogical summary of an exam
    Summary {
        /// Exam id
        id: String,

        #[command(flatten)]
        bank: BankArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List stored exams, most recently saved first
    List,

    /// Print the slots of an exam
    Show {
        /// Exam id
        id: String,

        #[command(flatten)]
        bank: BankArgs,

        /// Print the stored document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a stored exam
    Delete {
        /// Exam id
        id: String,
    },

    /// Write stored exams to a JSON file
    Export {
        /// Exam ids (default: all)
        ids: Vec<String>,

        /// Output file
        #[arg(long, short)]
        output: PathBuf,
    },

    /// Save the exams of a JSON file into the store
    Import {
        /// File holding one exam or an array of exams
        file: PathBuf,
    },

    /// List the filter values an item bank offers
    Options {
        #[command(flatten)]
        bank: BankArgs,
    },

    /// List the topic catalog of a route
    Topics {
        /// Catalog route id
        #[arg(long)]
        route: String,
    },

    /// Check an item bank for authoring problems
    Validate {
        #[command(flatten)]
        bank: BankArgs,
    },

    /// Create a starter config and sample catalog
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ripple=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        command => match Context::load(cli.config, cli.db) {
            Ok(ctx) => dispatch(&ctx, command).await,
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn dispatch(ctx: &Context, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Generate {
            bank,
            filters,
            meta,
            title,
            count,
            seed,
        } => commands::generate::execute(ctx, bank, filters, meta, title, count, seed).await,
        Commands::Regenerate {
            id,
            bank,
            filters,
            clear_filters,
            seed,
        } => commands::regenerate::execute(ctx, &id, bank, filters, clear_filters, seed).await,
        Commands::Replace { id, slot, bank } => {
            commands::edit::replace(ctx, &id, slot, bank).await
        }
        Commands::Lock { id, slot, bank } => commands::edit::lock(ctx, &id, slot, bank).await,
        Commands::Shuffle { id, slot, bank } => {
            commands::edit::shuffle(ctx, &id, slot, bank).await
        }
        Commands::Summary { id, bank, json } => {
            commands::summary::execute(ctx, &id, bank, json).await
        }
        Commands::List => commands::list::execute(ctx).await,
        Commands::Show { id, bank, json } => commands::show::execute(ctx, &id, bank, json).await,
        Commands::Delete { id } => commands::delete::execute(ctx, &id).await,
        Commands::Export { ids, output } => commands::transfer::export(ctx, ids, output).await,
        Commands::Import { file } => commands::transfer::import(ctx, file).await,
        Commands::Options { bank } => commands::options::execute(ctx, bank).await,
        Commands::Topics { route } => commands::topics::execute(ctx, &route).await,
        Commands::Validate { bank } => commands::validate::execute(ctx, bank).await,
        Commands::Init => commands::init::execute(),
    }
}
