mod cli;

use reelqueue::{
    bootstrap::AppServices,
    config::{self, Config},
    metadata::{image_url, MetadataProvider},
    services::PersonSeed,
};
use reelqueue_common::{FilmId, PersonId, QueueId};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

async fn start(config: Config) -> Result<()> {
    tracing::info!("Starting reelqueue");
    let services = AppServices::from_config(&config).await?;

    let Some(handle) =
        services.spawn_enrichment(config.enrichment.films, config.enrichment.persons)
    else {
        println!("Database ready; no enrichment enabled");
        return Ok(());
    };

    tokio::select! {
        run = handle => {
            let run = run?;
            for report in run.films.iter().chain(run.persons.iter()) {
                println!("{}", report.summary);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted; stopping enrichment");
        }
    }

    Ok(())
}

async fn enrich(config: Config, films: bool, persons: bool) -> Result<()> {
    let (films, persons) = if films || persons {
        (films, persons)
    } else {
        (true, true)
    };
    if config.tmdb.api_key().is_none() {
        anyhow::bail!("Enrichment needs a TMDB API key (tmdb.api_key or TMDB_API_KEY)");
    }

    let services = AppServices::from_config(&config).await?;
    let run = reelqueue::enrichment::run_enrichment(
        films.then(|| services.film_enrichment()).as_ref(),
        persons.then(|| services.person_enrichment()).as_ref(),
    )
    .await;

    for (label, report) in [("Films", run.films), ("Persons", run.persons)] {
        if let Some(report) = report {
            println!(
                "{}: {} ({} candidates of {}, {} enriched, {} failed)",
                label,
                report.summary,
                report.candidate_count,
                report.total,
                report.enriched_count,
                report.failed_count
            );
        }
    }
    Ok(())
}

fn require_provider(services: &AppServices) -> Result<()> {
    if !services.provider.is_available() {
        anyhow::bail!("This command needs a TMDB API key (tmdb.api_key or TMDB_API_KEY)");
    }
    Ok(())
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    let services = AppServices::from_config(&config).await?;

    match command {
        Commands::SearchPerson { query } => {
            require_provider(&services)?;
            for person in services.provider.search_person(&query).await? {
                println!(
                    "{:>10}  {} [{}]",
                    person.id,
                    person.name,
                    person.known_for_department.as_deref().unwrap_or("-")
                );
            }
        }
        Commands::SearchMovie { query } => {
            require_provider(&services)?;
            for film in services.provider.search_movie(&query).await? {
                print_search_result(film.id, &film.title, film.release_date.as_deref());
            }
        }
        Commands::SearchTv { query } => {
            require_provider(&services)?;
            for film in services.provider.search_tv(&query).await? {
                print_search_result(film.id, &film.title, film.release_date.as_deref());
            }
        }
        Commands::SelectPerson {
            person_id,
            name,
            department,
        } => {
            let seed = name.map(|name| PersonSeed { name, department });
            let queue = services.queues.select_person(person_id, seed).await?;
            println!("{}", queue.id);
        }
        Commands::Filmography { person_id, json } => {
            show_filmography(&services, person_id, json).await?;
        }
        Commands::Queues { json } => {
            let queues = services.queues.list_queues().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&queues)?);
            } else {
                for overview in &queues {
                    let name = overview
                        .person
                        .as_ref()
                        .map(|p| p.name.as_str())
                        .unwrap_or("?");
                    println!(
                        "{:>3}  {}  {} ({} films)",
                        overview.queue.sort_order, overview.queue.id, name, overview.film_count
                    );
                }
            }
        }
        Commands::QueueFilms { queue_id, json } => {
            show_queue_films(&services, queue_id, json).await?;
        }
        Commands::AddFilm {
            queue_id,
            film_id,
            tv,
        } => {
            let association = services
                .queue_films
                .add_film_to_queue(queue_id, film_id, tv)
                .await?;
            println!(
                "Added {} at position {}",
                association.film_id, association.sort_order
            );
        }
        Commands::RemoveFilm { queue_id, film_id } => {
            if services
                .queue_films
                .remove_film_from_queue(queue_id, film_id)
                .await?
            {
                println!("Removed {}", film_id);
            } else {
                anyhow::bail!("Film {} is not in queue {}", film_id, queue_id);
            }
        }
        Commands::ReorderFilms { queue_id, film_ids } => {
            services
                .queue_films
                .reorder_queue_films(queue_id, &film_ids)
                .await?;
            show_queue_films(&services, queue_id, false).await?;
        }
        Commands::ReorderQueues { queue_ids } => {
            services.queues.reorder_queues(&queue_ids).await?;
        }
        Commands::DeleteQueue { queue_id } => {
            if !services.queues.delete_queue(queue_id).await? {
                anyhow::bail!("Queue {} not found", queue_id);
            }
        }
        Commands::DeletePerson { person_id } => {
            if !services.queues.delete_person(person_id).await? {
                anyhow::bail!("Person {} not found", person_id);
            }
        }
        Commands::Start
        | Commands::Enrich { .. }
        | Commands::Validate { .. }
        | Commands::Version => anyhow::bail!("Command does not operate on the store"),
    }

    Ok(())
}

fn print_search_result(id: FilmId, title: &str, date: Option<&str>) {
    let year = date.and_then(|d| d.get(..4)).unwrap_or("----");
    println!("{:>10}  {} ({})", id, title, year);
}

async fn show_filmography(services: &AppServices, person_id: PersonId, json: bool) -> Result<()> {
    require_provider(services)?;
    let entries = services.queues.filmography(person_id).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    for entry in &entries {
        let marker = if entry.in_queue { "*" } else { " " };
        let kind = if entry.credit.is_tv { "tv" } else { "movie" };
        let year = entry
            .credit
            .release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .unwrap_or("----");
        println!(
            "{} {:>10}  {:<5} {}  {}",
            marker, entry.credit.id, kind, year, entry.credit.title
        );
    }
    Ok(())
}

async fn show_queue_films(services: &AppServices, queue_id: QueueId, json: bool) -> Result<()> {
    services.queues.get_queue(queue_id).await?;
    let entries = services.queue_films.get_queue_films(queue_id).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    for entry in &entries {
        let runtime = entry
            .film
            .runtime_minutes
            .map(|m| format!("{} min", m))
            .unwrap_or_else(|| "? min".to_string());
        println!(
            "{:>3}  {:>10}  {}  [{}]  {}",
            entry.sort_order,
            entry.film.id,
            entry.film.title,
            runtime,
            entry
                .film
                .poster_path
                .as_deref()
                .map(image_url)
                .unwrap_or_default()
        );
    }
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => {
            println!("No config file specified, using defaults");
            config::load_config_or_default(None)?
        }
    };

    println!("✓ Configuration is valid");
    println!("  Database: {}", config.database.path.display());
    println!(
        "  Connect retries: {} ({} ms apart)",
        config.database.connect_retries, config.database.retry_backoff_ms
    );
    println!(
        "  TMDB API key: {}",
        if config.tmdb.api_key().is_some() {
            "set"
        } else {
            "not set"
        }
    );
    println!("  Language: {}", config.tmdb.language);
    println!("  Enrich films: {}", config.enrichment.films);
    println!("  Enrich persons: {}", config.enrichment.persons);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "reelqueue=trace,reelqueue_db=debug".to_string()
        } else {
            "reelqueue=info,reelqueue_db=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("reelqueue {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        command => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let rt = tokio::runtime::Runtime::new()?;
            match command {
                Commands::Start => rt.block_on(start(config)),
                Commands::Enrich { films, persons } => rt.block_on(enrich(config, films, persons)),
                command => rt.block_on(run_command(command, config)),
            }
        }
    }
}
