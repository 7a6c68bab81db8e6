use clap::{Parser, Subcommand};
use reelqueue_common::{Department, FilmId, PersonId, QueueId};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reelqueue")]
#[command(author, version, about = "Per-person film queues backed by TMDB metadata")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Connect to the database and run the enrichment passes enabled in the config
    Start,

    /// Run enrichment passes now (both when no flag is given)
    Enrich {
        /// Backfill runtime, genres and posters of stored films
        #[arg(long)]
        films: bool,

        /// Backfill profile images of stored persons
        #[arg(long)]
        persons: bool,
    },

    /// Search TMDB for a person
    SearchPerson {
        query: String,
    },

    /// Search TMDB for a movie
    SearchMovie {
        query: String,
    },

    /// Search TMDB for a TV show
    SearchTv {
        query: String,
    },

    /// Store a person and create their queue
    SelectPerson {
        person_id: PersonId,

        /// Name to store if TMDB cannot be reached
        #[arg(long)]
        name: Option<String>,

        /// Department to store if TMDB cannot be reached
        #[arg(long, default_value = "OTHER")]
        department: Department,
    },

    /// Show a person's filmography
    Filmography {
        person_id: PersonId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List queues in order
    Queues {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the films of a queue in order
    QueueFilms {
        queue_id: QueueId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Append a movie or TV show to a queue
    AddFilm {
        queue_id: QueueId,
        film_id: FilmId,

        /// The id refers to a TV show
        #[arg(long)]
        tv: bool,
    },

    /// Remove a film from a queue
    RemoveFilm {
        queue_id: QueueId,
        film_id: FilmId,
    },

    /// Move films to the front of a queue in the given order
    ReorderFilms {
        queue_id: QueueId,

        #[arg(required = true)]
        film_ids: Vec<FilmId>,
    },

    /// Move queues to the front of the list in the given order
    ReorderQueues {
        #[arg(required = true)]
        queue_ids: Vec<QueueId>,
    },

    /// Delete a queue and its films
    DeleteQueue {
        queue_id: QueueId,
    },

    /// Delete a person and their queue
    DeletePerson {
        person_id: PersonId,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_reorder() {
        let id = QueueId::new();
        let cli = Cli::parse_from([
            "reelqueue".to_string(),
            "reorder-films".to_string(),
            id.to_string(),
            "3".to_string(),
            "1".to_string(),
        ]);
        match cli.command {
            Commands::ReorderFilms { queue_id, film_ids } => {
                assert_eq!(queue_id, id);
                assert_eq!(film_ids, vec![3, 1]);
            }
            _ => panic!("expected reorder-films"),
        }
    }

    #[test]
    fn test_department_is_parsed() {
        let cli = Cli::parse_from(["reelqueue", "select-person", "7", "--department", "acting"]);
        match cli.command {
            Commands::SelectPerson { department, .. } => {
                assert_eq!(department, Department::Acting)
            }
            _ => panic!("expected select-person"),
        }
    }
}
