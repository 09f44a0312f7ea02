use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::{Builder, Env};
use log::info;
use serde::Serialize;

use fyyur::forms::ShowForm;
use fyyur::{views, ConfigStore, DeletePolicy};

// logging constants
const FYYUR_LOG: &str = "FYYUR_LOG";
const FYYUR_LOG_STYLE: &str = "FYYUR_LOG_STYLE";

#[derive(Parser, Debug)]
#[clap(name = "fyyur", version, about = "Browse and book venues, artists and shows")]
struct Cli {
    /// Database file, overriding the configured path
    #[clap(short, long, global = true)]
    database: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Venues grouped by city and state
    Venues,
    /// All artists
    Artists,
    /// All booked shows
    Shows,
    /// One venue with its past and upcoming shows
    Venue { id: i64 },
    /// One artist with its past and upcoming shows
    Artist { id: i64 },
    /// Case-insensitive venue name search; no term lists everything
    SearchVenues { term: Option<String> },
    /// Case-insensitive artist name search; no term lists everything
    SearchArtists { term: Option<String> },
    /// Book an artist at a venue
    Book {
        artist_id: String,
        venue_id: String,
        start_time: String,
    },
    /// Delete a venue under the configured delete policy
    DeleteVenue { id: i64 },
    /// Show or change the stored configuration
    Config {
        #[clap(long, value_enum)]
        delete_policy: Option<PolicyArg>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PolicyArg {
    Restrict,
    Cascade,
}

impl From<PolicyArg> for DeletePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Restrict => DeletePolicy::Restrict,
            PolicyArg::Cascade => DeletePolicy::Cascade,
        }
    }
}

fn main() -> Result<()> {
    let config_store = ConfigStore::load().context("failed to load config")?;
    let mut config = config_store.read();

    let env = Env::default()
        .filter_or(FYYUR_LOG, config.log_level.as_deref().unwrap_or("info"))
        .write_style(FYYUR_LOG_STYLE);
    Builder::from_env(env).init();

    let cli = Cli::parse();
    if let Some(database) = cli.database {
        config.database_path = Some(database);
    }

    if let Command::Config { delete_policy } = cli.command {
        let updated = match delete_policy {
            Some(policy) => config_store
                .update(|config| config.delete_policy = policy.into())
                .context("failed to write config")?,
            None => config,
        };
        info!("config at {}", config_store.path().display());
        return print_json(&updated);
    }

    let mut store = fyyur::open_store(&config).context("failed to open store")?;
    let now = Utc::now();

    match cli.command {
        Command::Venues => print_json(&views::venue_directory(&store, now)?),
        Command::Artists => print_json(&views::artist_list(&store)?),
        Command::Shows => print_json(&views::show_board(&store)?),
        Command::Venue { id } => print_json(&views::venue_detail(&store, id, now)?),
        Command::Artist { id } => print_json(&views::artist_detail(&store, id, now)?),
        Command::SearchVenues { term } => print_json(&views::search_venues(
            &store,
            term.as_deref().unwrap_or_default(),
            now,
        )?),
        Command::SearchArtists { term } => print_json(&views::search_artists(
            &store,
            term.as_deref().unwrap_or_default(),
            now,
        )?),
        Command::Book {
            artist_id,
            venue_id,
            start_time,
        } => {
            let show = ShowForm {
                artist_id,
                venue_id,
                start_time,
            }
            .parse()?;
            let booked = store
                .create_show(&show)
                .context("show could not be listed")?;
            info!("show was successfully listed");
            print_json(&booked)
        }
        Command::DeleteVenue { id } => {
            let removed = store
                .delete_venue(id)
                .with_context(|| format!("venue {id} could not be deleted"))?;
            info!("venue {id} was successfully deleted ({removed} show(s) removed)");
            Ok(())
        }
        Command::Config { .. } => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
