//! Command-line front end for shared event matching.
//!
//! Usage:
//!     eventmatch match --profile1 anna.json --profile2 jordan.json --catalog all_luma_events.json
//!     eventmatch match ... --search coffee --min-score 9 --city Toronto --format json
//!     eventmatch validate --profile anna.json
//!     eventmatch facets --catalog all_luma_events.json

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use eventmatch_catalog::{
    load_profile, CatalogSource, FileCatalog, HttpCatalog, HttpCatalogConfig,
};
use eventmatch_explain::{summarize_matches, MatchSummary};
use eventmatch_model::{Event, MatchedEvent, Profile, ScoreRange};
use eventmatch_query::{filter_events, FilterCriteria, FilterFacets};
use eventmatch_rerank::{
    match_and_rank, CatalogPolicy, FixedScore, MatchScorer, RandomScore, ScoreStrategy,
    ScorerConfig,
};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "eventmatch")]
#[command(about = "Find events two people would enjoy together")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Score, rank and filter a catalog for two profiles
    Match {
        /// First profile JSON file
        #[arg(long)]
        profile1: String,

        /// Second profile JSON file
        #[arg(long)]
        profile2: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Case-insensitive text matched against title, location and rationale
        #[arg(short, long, default_value = "")]
        search: String,

        /// Minimum score to keep
        #[arg(long, default_value = "0")]
        min_score: u8,

        /// Keep only these cities (repeatable)
        #[arg(long = "city")]
        cities: Vec<String>,

        /// Keep only these statuses (repeatable)
        #[arg(long = "status")]
        statuses: Vec<String>,

        /// Score only the first N catalog events
        #[arg(long, default_value = "6", conflicts_with = "all")]
        limit_catalog: usize,

        /// Score the whole catalog
        #[arg(long)]
        all: bool,

        /// Lowest score a match can get
        #[arg(long, default_value = "7")]
        min_range: u8,

        /// Highest score a match can get
        #[arg(long, default_value = "10")]
        max_range: u8,

        /// Give every event this score instead of a random draw
        #[arg(long)]
        fixed_score: Option<u8>,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Check whether a profile is ready for matching
    Validate {
        #[arg(short, long)]
        profile: String,
    },

    /// List the cities and statuses present in a catalog
    Facets {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Catalog JSON file
    #[arg(long, required_unless_present = "catalog_url")]
    catalog: Option<String>,

    /// Catalog JSON URL
    #[arg(long, conflicts_with = "catalog")]
    catalog_url: Option<String>,
}

#[derive(Serialize)]
struct MatchReport<'a> {
    summary: MatchSummary,
    events: Vec<&'a MatchedEvent>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("eventmatch=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Match {
            profile1,
            profile2,
            source,
            search,
            min_score,
            cities,
            statuses,
            limit_catalog,
            all,
            min_range,
            max_range,
            fixed_score,
            format,
        } => {
            let profile1 = load_ready_profile(&profile1).await?;
            let profile2 = load_ready_profile(&profile2).await?;
            let catalog = load_catalog(&source).await?;

            let config = ScorerConfig {
                range: ScoreRange::new(min_range, max_range)?,
                policy: if all {
                    CatalogPolicy::All
                } else {
                    CatalogPolicy::FirstN(limit_catalog)
                },
            };
            let criteria = FilterCriteria {
                search_term: search,
                min_score,
                cities: cities.into_iter().collect(),
                statuses: statuses.into_iter().collect(),
            };

            match fixed_score {
                Some(score) => run_match(
                    MatchScorer::new(config, FixedScore(score)),
                    &catalog,
                    &profile1,
                    &profile2,
                    &criteria,
                    format,
                )?,
                None => run_match(
                    MatchScorer::new(config, RandomScore),
                    &catalog,
                    &profile1,
                    &profile2,
                    &criteria,
                    format,
                )?,
            }
        }
        Commands::Validate { profile } => {
            run_validate(&profile).await?;
        }
        Commands::Facets { source } => {
            run_facets(&source).await?;
        }
    }

    Ok(())
}

async fn load_ready_profile(path: &str) -> Result<Profile> {
    let profile = load_profile(path)
        .await
        .with_context(|| format!("Could not load profile {}", path))?;
    profile
        .validate()
        .with_context(|| format!("Profile {} is not ready for matching", path))?;
    Ok(profile)
}

async fn load_catalog(source: &SourceArgs) -> Result<Vec<Event>> {
    let events = match (&source.catalog, &source.catalog_url) {
        (Some(path), _) => FileCatalog::new(path).load_events().await?,
        (None, Some(url)) => {
            let config = HttpCatalogConfig {
                url: url.clone(),
                ..Default::default()
            };
            HttpCatalog::new(config)?.load_events().await?
        }
        (None, None) => bail!("Either --catalog or --catalog-url is required"),
    };

    tracing::info!(events = events.len(), "Catalog loaded");
    Ok(events)
}

fn run_match<S: ScoreStrategy>(
    scorer: MatchScorer<S>,
    catalog: &[Event],
    profile1: &Profile,
    profile2: &Profile,
    criteria: &FilterCriteria,
    format: OutputFormat,
) -> Result<()> {
    let ranked = match_and_rank(&scorer, catalog, profile1, profile2);
    let visible = filter_events(&ranked, criteria);
    let summary = summarize_matches(&ranked, profile1, profile2);

    match format {
        OutputFormat::Json => {
            let report = MatchReport {
                summary,
                events: visible,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => print_matches(&summary, &visible, profile1, profile2),
    }

    Ok(())
}

fn print_matches(
    summary: &MatchSummary,
    events: &[&MatchedEvent],
    profile1: &Profile,
    profile2: &Profile,
) {
    println!("{}", summary.headline());
    println!("---");

    for event in events {
        let e = &event.event;
        println!("\n{}. {}", event.rank.unwrap_or_default(), e.title);
        print_field("Date", &e.date);
        print_field("Location", &e.location);
        print_field("City", e.city.as_deref().unwrap_or_default());
        print_field("Organizers", &e.organizers);
        print_field("Status", e.status.as_deref().unwrap_or_default());
        print_field("Attendees", &e.attendees);
        print_field("Link", &e.link);
        println!("   Match Score: {}/10", event.score);
        println!("   Why this matches: {}", event.rationale);
        print_field(
            &format!("{}'s Matching Interests", profile1.name),
            &event.profile1_matches.join(", "),
        );
        print_field(
            &format!("{}'s Matching Interests", profile2.name),
            &event.profile2_matches.join(", "),
        );
    }

    println!("\n---");
    println!("Showing {} of {} matched events", events.len(), summary.matched_events);
}

fn print_field(label: &str, value: &str) {
    if !value.is_empty() {
        println!("   {}: {}", label, value);
    }
}

async fn run_validate(path: &str) -> Result<()> {
    let profile = load_profile(path).await?;

    match profile.validate() {
        Ok(()) => {
            println!("{} is ready ({} interests)", profile.name, profile.interests.len());
            Ok(())
        }
        Err(e) => {
            println!("NOT READY: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run_facets(source: &SourceArgs) -> Result<()> {
    let events = load_catalog(source).await?;
    let facets = FilterFacets::from_events(&events);

    println!("Events: {}", events.len());
    println!("Cities: {}", facets.cities.join(", "));
    println!("Statuses: {}", facets.statuses.join(", "));

    Ok(())
}
