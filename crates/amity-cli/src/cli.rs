use std::num::NonZeroUsize;
use std::path::PathBuf;

use amity_graph::UserId;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "amity", version)]
#[command(about = "Friendship recommendations and network analysis over a social graph")]
pub struct Cli {
    /// Friendship file (overrides AMITY_EDGE_FILE)
    #[arg(long, global = true, value_name = "PATH")]
    pub edges: Option<PathBuf>,

    /// Tag file (overrides AMITY_TAG_FILE)
    #[arg(long, global = true, value_name = "PATH")]
    pub tags: Option<PathBuf>,

    /// Write the algorithm's trace events to this file as JSON
    #[arg(long, global = true, value_name = "PATH")]
    pub events: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Method {
    /// PageRank × tag similarity
    Influence,
    /// Adamic-Adar over mutual friends
    Proximity,
    /// Weighted sum of both
    Hybrid,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show user and friendship counts and the most connected user
    Stats,

    /// Suggest new friends for a user
    Recommend {
        user: UserId,

        /// How many suggestions to return
        #[arg(short, long, default_value = "5")]
        k: NonZeroUsize,

        #[arg(long, value_enum, default_value_t = Method::Hybrid)]
        method: Method,

        /// Hybrid influence weight (overrides AMITY_HYBRID_W_INFLUENCE)
        #[arg(long)]
        w_influence: Option<f64>,

        /// Hybrid proximity weight (overrides AMITY_HYBRID_W_PROXIMITY)
        #[arg(long)]
        w_proximity: Option<f64>,
    },

    /// Register a new user with optional tags, then save
    AddUser {
        id: UserId,

        /// Interest tags for the new user
        #[arg(id = "user_tags", value_name = "TAG")]
        tags: Vec<String>,
    },

    /// Add a friendship, then save
    Befriend { a: UserId, b: UserId },

    /// Remove a friendship, then save
    Unfriend { a: UserId, b: UserId },

    /// Degrees of separation between two users
    Path { from: UserId, to: UserId },

    /// Detect communities with label propagation
    Communities {
        /// Rounds to run (overrides AMITY_LPA_ITERATIONS)
        #[arg(long)]
        iterations: Option<usize>,

        /// Break vote ties randomly with this seed instead of by lowest label
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Most central user by closeness
    Central,

    /// Users that bridge communities, by betweenness
    Bridges {
        #[arg(long, default_value_t = 5)]
        top: usize,
    },

    /// Highest PageRank users
    Pagerank {
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "amity", "recommend", "7", "-k", "3", "--method", "proximity", "--edges", "e.txt",
        ])
        .unwrap();
        assert_eq!(cli.edges, Some(PathBuf::from("e.txt")));
        match cli.command {
            Command::Recommend { user, k, method, .. } => {
                assert_eq!(user, 7);
                assert_eq!(k.get(), 3);
                assert_eq!(method, Method::Proximity);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_zero_k() {
        assert!(Cli::try_parse_from(["amity", "recommend", "1", "-k", "0"]).is_err());
    }

    #[test]
    fn add_user_collects_tags() {
        let cli = Cli::try_parse_from(["amity", "add-user", "12", "chess", "jazz"]).unwrap();
        match cli.command {
            Command::AddUser { id, tags } => {
                assert_eq!(id, 12);
                assert_eq!(tags, vec!["chess", "jazz"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn add_user_tags_do_not_clash_with_tag_file_flag() {
        let cli = Cli::try_parse_from(["amity", "--tags", "t.txt", "add-user", "5", "chess"]).unwrap();
        assert_eq!(cli.tags, Some(PathBuf::from("t.txt")));
        match cli.command {
            Command::AddUser { id, tags } => {
                assert_eq!(id, 5);
                assert_eq!(tags, vec!["chess"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn add_user_without_tags() {
        let cli = Cli::try_parse_from(["amity", "add-user", "5"]).unwrap();
        assert_eq!(cli.tags, None);
        match cli.command {
            Command::AddUser { id, tags } => {
                assert_eq!(id, 5);
                assert!(tags.is_empty());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
