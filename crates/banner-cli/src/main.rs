//! Banner history CLI
//!
//! Command-line tool for pulling banner histories from a game wiki and
//! writing them as JSON or YAML snapshots.

mod error;
mod images;
mod wiki;

use banner_core::{
    assemble_dataset, merge_pooled_events, sort_versions, to_ordinal, write_dataset,
    BannerDataset, ContentFetcher, OfflineFetcher, OutputFormat, PageCollection, QueryResponse,
    Rosters, VersionResolver, WikiProfile,
};
use clap::{Parser, Subcommand};
use error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use wiki::WikiClient;

#[derive(Parser)]
#[command(name = "banner-cli")]
#[command(about = "Wiki banner history snapshot generator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch everything from the wiki and write a snapshot
    Pull {
        /// Built-in wiki profile (genshin or star-rail)
        #[arg(short, long, default_value = "genshin")]
        game: String,

        /// Profile file (YAML or JSON) replacing the built-in one
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Output format (json or yaml); defaults from the output extension
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Refuse to write output smaller than this many bytes
        #[arg(long, default_value_t = 5000)]
        min_data_size: usize,

        /// Root directory for subject icons
        #[arg(long, default_value = "public/images")]
        image_dir: PathBuf,

        /// Re-download icons that already exist
        #[arg(long)]
        force: bool,

        /// Do not download icons
        #[arg(long)]
        skip_images: bool,
    },

    /// Build a snapshot from saved query responses
    Assemble {
        /// Event pages (query response JSON)
        #[arg(long)]
        events: PathBuf,

        /// Pooled event pages (query response JSON)
        #[arg(long)]
        pooled: Option<PathBuf>,

        /// 5-star character roster (query response JSON)
        #[arg(long = "roster-5c")]
        roster_5c: Option<PathBuf>,

        /// 4-star character roster (query response JSON)
        #[arg(long = "roster-4c")]
        roster_4c: Option<PathBuf>,

        /// 5-star weapon roster (query response JSON)
        #[arg(long = "roster-5w")]
        roster_5w: Option<PathBuf>,

        /// 4-star weapon roster (query response JSON)
        #[arg(long = "roster-4w")]
        roster_4w: Option<PathBuf>,

        /// Built-in wiki profile (genshin or star-rail)
        #[arg(short, long, default_value = "genshin")]
        game: String,

        /// Profile file (YAML or JSON) replacing the built-in one
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Output format (json or yaml); defaults from the output extension
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Refuse to write output smaller than this many bytes
        #[arg(long, default_value_t = 0)]
        min_data_size: usize,

        /// Never fetch page content; pages needing it are dropped
        #[arg(long)]
        offline: bool,
    },

    /// Print version labels in release order with their ordinals
    VersionOrder {
        /// Version labels, e.g. 4.2 "Luna I" 6.0
        #[arg(required = true)]
        labels: Vec<String>,
    },

    /// Print a wiki profile as YAML
    Profile {
        /// Built-in wiki profile (genshin or star-rail)
        #[arg(short, long, default_value = "genshin")]
        game: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Pull {
            game,
            profile,
            output,
            format,
            min_data_size,
            image_dir,
            force,
            skip_images,
        } => {
            let format = format.unwrap_or_else(|| OutputFormat::from_path(&output));
            let images = (!skip_images).then_some(image_dir.as_path());
            cmd_pull(&game, profile.as_deref(), &output, format, min_data_size, images, force)
        }
        Commands::Assemble {
            events,
            pooled,
            roster_5c,
            roster_4c,
            roster_5w,
            roster_4w,
            game,
            profile,
            output,
            format,
            min_data_size,
            offline,
        } => {
            let format = format.unwrap_or_else(|| OutputFormat::from_path(&output));
            let rosters = Rosters {
                five_star_characters: read_optional_collection(roster_5c.as_deref())?,
                four_star_characters: read_optional_collection(roster_4c.as_deref())?,
                five_star_weapons: read_optional_collection(roster_5w.as_deref())?,
                four_star_weapons: read_optional_collection(roster_4w.as_deref())?,
            };
            let events = read_collection(&events)?;
            let pooled = read_optional_collection(pooled.as_deref())?;
            cmd_assemble(
                &game,
                profile.as_deref(),
                events,
                pooled,
                rosters,
                &output,
                format,
                min_data_size,
                offline,
            )
        }
        Commands::VersionOrder { labels } => cmd_version_order(labels),
        Commands::Profile { game } => cmd_profile(&game),
    }
}

fn load_profile(game: &str, path: Option<&Path>) -> Result<WikiProfile> {
    match path {
        Some(path) => Ok(WikiProfile::load(path)?),
        None => WikiProfile::builtin(game).ok_or_else(|| Error::UnknownGame(game.to_string())),
    }
}

/// Read a saved `action=query` response into pages
fn read_collection(path: &Path) -> Result<PageCollection> {
    let body = fs::read_to_string(path).map_err(|source| banner_core::Error::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let response = QueryResponse::from_json(&body)?;
    response.check()?;
    Ok(response.into_pages())
}

fn read_optional_collection(path: Option<&Path>) -> Result<PageCollection> {
    path.map(read_collection)
        .transpose()
        .map(Option::unwrap_or_default)
}

/// Pool merge, reconciliation and output shared by `pull` and `assemble`
#[allow(clippy::too_many_arguments)]
fn reconcile_and_write<F: ContentFetcher>(
    profile: &WikiProfile,
    fetcher: F,
    events: &PageCollection,
    pooled: &PageCollection,
    rosters: &Rosters,
    output: &Path,
    format: OutputFormat,
    min_data_size: usize,
) -> Result<BannerDataset> {
    let events = merge_pooled_events(
        events,
        pooled,
        &rosters.five_star_characters,
        &rosters.five_star_weapons,
        profile,
    );

    let mut resolver = VersionResolver::new(profile, fetcher)?;
    let dataset = assemble_dataset(&mut resolver, &events, rosters, &profile.aliases);
    info!(
        subjects = dataset.total_entries(),
        content_fetches = resolver.cache().fetch_count(),
        "banner histories assembled"
    );

    let written = write_dataset(&dataset, output, format, min_data_size)?;
    println!("Wrote {} bytes to {}", written, output.display());

    Ok(dataset)
}

fn cmd_pull(
    game: &str,
    profile_path: Option<&Path>,
    output: &Path,
    format: OutputFormat,
    min_data_size: usize,
    image_dir: Option<&Path>,
    force: bool,
) -> Result<()> {
    let profile = load_profile(game, profile_path)?;
    info!(profile = %profile.name, api = %profile.api_url, "pulling banner data");

    let client = WikiClient::new(&profile.api_url)?;

    let events = client.category_members(&profile.event_category, true)?;
    let pooled = match &profile.pool {
        Some(pool) => client.category_members(&pool.category, true)?,
        None => PageCollection::new(),
    };
    let rosters = Rosters {
        five_star_characters: client.category_members(&profile.rosters.five_star_characters, false)?,
        four_star_characters: client.category_members(&profile.rosters.four_star_characters, false)?,
        five_star_weapons: client.category_members(&profile.rosters.five_star_weapons, false)?,
        four_star_weapons: client.category_members(&profile.rosters.four_star_weapons, false)?,
    };

    let fetcher = |page_id: i64| client.fetch_content(page_id);
    let dataset = reconcile_and_write(
        &profile,
        fetcher,
        &events,
        &pooled,
        &rosters,
        output,
        format,
        min_data_size,
    )?;

    if let Some(root) = image_dir {
        let summary = images::download_images(client.http(), &dataset, &profile.images, root, force);
        println!(
            "Images: {} downloaded, {} skipped, {} failed",
            summary.downloaded, summary.skipped, summary.failed
        );
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_assemble(
    game: &str,
    profile_path: Option<&Path>,
    events: PageCollection,
    pooled: PageCollection,
    rosters: Rosters,
    output: &Path,
    format: OutputFormat,
    min_data_size: usize,
    offline: bool,
) -> Result<()> {
    let profile = load_profile(game, profile_path)?;

    if offline {
        reconcile_and_write(
            &profile,
            OfflineFetcher,
            &events,
            &pooled,
            &rosters,
            output,
            format,
            min_data_size,
        )?;
    } else {
        let client = WikiClient::new(&profile.api_url)?;
        let fetcher = |page_id: i64| client.fetch_content(page_id);
        reconcile_and_write(
            &profile,
            fetcher,
            &events,
            &pooled,
            &rosters,
            output,
            format,
            min_data_size,
        )?;
    }

    Ok(())
}

fn cmd_version_order(mut labels: Vec<String>) -> Result<()> {
    sort_versions(&mut labels);

    for label in &labels {
        let ordinal = to_ordinal(label);
        let marker = if ordinal.is_sentinel() { "  (unparsed)" } else { "" };
        println!("{}\t{}{}", ordinal, label, marker);
    }

    Ok(())
}

fn cmd_profile(game: &str) -> Result<()> {
    let profile = WikiProfile::builtin(game).ok_or_else(|| Error::UnknownGame(game.to_string()))?;
    print!("{}", serde_yaml::to_string(&profile)?);
    Ok(())
}
