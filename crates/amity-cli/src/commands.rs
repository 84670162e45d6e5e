//! One handler per subcommand. Handlers print to `out` and return errors for
//! anything the user should see as a failure.

use std::io::Write;

use amity_algo::{
    betweenness_centrality, bfs_distances, closeness_centrality, degree_centrality,
    label_propagation, most_central_user, pagerank, recommend_by_hybrid, recommend_by_influence,
    recommend_by_proximity, shortest_path, HybridWeights, LabelPropConfig, Recommendation,
    TieBreak,
};
use amity_graph::{io, EventSink, SocialGraph, UserId};
use anyhow::{bail, Context, Result};
use tracing::info;

use crate::cli::{Command, Method};
use crate::config::Config;

const RULE: &str = "--------------------------------------------------";

pub fn execute(
    command: Command,
    graph: &mut SocialGraph,
    config: &Config,
    sink: &mut dyn EventSink,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Command::Stats => {
            writeln!(out, "Users:       {}", graph.user_count())?;
            writeln!(out, "Friendships: {}", graph.friendship_count())?;
            if let Some((user, score)) = most_central_user(&degree_centrality(graph)) {
                writeln!(
                    out,
                    "Most connected: User {user} ({} friends, degree centrality {score:.3})",
                    graph.degree(user)
                )?;
            }
        }

        Command::Recommend { user, k, method, w_influence, w_proximity } => {
            require_user(graph, user)?;
            let recs = match method {
                Method::Influence => recommend_by_influence(graph, user, k, sink),
                Method::Proximity => recommend_by_proximity(graph, user, k, sink),
                Method::Hybrid => {
                    let defaults = config.hybrid_weights();
                    let weights = HybridWeights {
                        influence: w_influence.unwrap_or(defaults.influence),
                        proximity: w_proximity.unwrap_or(defaults.proximity),
                    };
                    recommend_by_hybrid(graph, user, k, &weights, sink)?
                }
            };
            print_recommendations(out, user, method, &recs)?;
        }

        Command::AddUser { id, tags } => {
            if id == 0 {
                bail!("user ID must be a positive number");
            }
            if graph.user_exists(id) {
                bail!("user {id} already exists, pick another ID");
            }
            graph.add_user(id, tags);
            persist(graph, config)?;
            writeln!(out, "User {id} added. Total users in network: {}", graph.user_count())?;
        }

        Command::Befriend { a, b } => {
            require_pair(graph, a, b)?;
            if graph.add_friendship(a, b)? {
                persist(graph, config)?;
                writeln!(out, "Users {a} and {b} are now friends.")?;
            } else {
                writeln!(out, "Users {a} and {b} are already friends.")?;
            }
        }

        Command::Unfriend { a, b } => {
            require_pair(graph, a, b)?;
            if graph.remove_friendship(a, b)? {
                persist(graph, config)?;
                writeln!(out, "Users {a} and {b} are no longer friends.")?;
            } else {
                writeln!(out, "Users {a} and {b} were not friends.")?;
            }
        }

        Command::Path { from, to } => {
            require_user(graph, from)?;
            require_user(graph, to)?;
            let path = shortest_path(graph, from, to, sink);
            if path.is_empty() {
                writeln!(out, "No path found between user {from} and user {to}.")?;
            } else {
                let hops = path.len() - 1;
                let rendered: Vec<String> = path.iter().map(ToString::to_string).collect();
                writeln!(out, "{} ({hops} hops)", rendered.join(" -> "))?;
            }
        }

        Command::Communities { iterations, seed } => {
            let cfg = LabelPropConfig {
                iterations: iterations.unwrap_or(config.lpa_iterations),
                tie_break: match seed {
                    Some(s) => TieBreak::Random { seed: Some(s) },
                    None => TieBreak::LowestLabel,
                },
            };
            let result = label_propagation(graph, &cfg, sink);
            let groups = result.communities();

            writeln!(out, "Found {} communities:", groups.len())?;
            for (i, (label, members)) in groups.iter().enumerate() {
                let rendered: Vec<String> = members.iter().map(ToString::to_string).collect();
                writeln!(out, "Community {} (label {label}): [ {} ]", i + 1, rendered.join(" "))?;
            }
        }

        Command::Central => {
            let scores = closeness_centrality(graph, sink);
            match most_central_user(&scores) {
                Some((user, score)) if score > 0.0 => {
                    let dist = bfs_distances(graph, user);
                    let reachable = dist.len() - 1;
                    let total: usize = dist.values().sum();
                    let avg = if reachable > 0 { total as f64 / reachable as f64 } else { 0.0 };

                    writeln!(out, "{RULE}")?;
                    writeln!(out, "The most efficient broadcaster is: User {user}")?;
                    writeln!(out, "  Closeness score (higher is better): {score:.6}")?;
                    writeln!(out, "  Average path length (hops): {avg:.3}")?;
                    writeln!(out, "{RULE}")?;
                }
                _ => writeln!(out, "Network is empty or too small for analysis.")?,
            }
        }

        Command::Bridges { top } => {
            let result = betweenness_centrality(graph);
            writeln!(out, "Top {top} bridge users:")?;
            for (i, (user, score)) in result.top(top).into_iter().enumerate() {
                writeln!(out, "  {}. User {user} (score: {score:.4})", i + 1)?;
            }
        }

        Command::Pagerank { top } => {
            let result = pagerank(graph, &config.pagerank())?;
            writeln!(out, "Top {top} users by PageRank ({} iterations):", result.iterations)?;
            for (i, (user, score)) in result.ranked().into_iter().take(top).enumerate() {
                writeln!(out, "  {}. User {user} (score: {score:.6})", i + 1)?;
            }
        }
    }

    Ok(())
}

/// Save both files; either failing is an error.
pub fn persist(graph: &SocialGraph, config: &Config) -> Result<()> {
    let outcome = io::save_files(graph, &config.edge_file, &config.tag_file);
    let edges = outcome.edges.context("saving friendships")?;
    let tags = outcome.tags.context("saving tags")?;
    info!(edges, tags, "network saved");
    Ok(())
}

fn require_user(graph: &SocialGraph, user: UserId) -> Result<()> {
    if !graph.user_exists(user) {
        bail!("user {user} not found");
    }
    Ok(())
}

fn require_pair(graph: &SocialGraph, a: UserId, b: UserId) -> Result<()> {
    require_user(graph, a)?;
    require_user(graph, b)?;
    if a == b {
        bail!("cannot manage a friendship with yourself");
    }
    Ok(())
}

fn print_recommendations(
    out: &mut dyn Write,
    user: UserId,
    method: Method,
    recs: &[Recommendation],
) -> Result<()> {
    let label = match method {
        Method::Influence => "influence",
        Method::Proximity => "proximity",
        Method::Hybrid => "hybrid",
    };
    if recs.is_empty() {
        writeln!(out, "No recommendations found for user {user} ({label}).")?;
        return Ok(());
    }
    writeln!(out, "Top {} recommendations for user {user} ({label}):", recs.len())?;
    for (i, rec) in recs.iter().enumerate() {
        writeln!(out, "  {}. User {} (score: {:.6})", i + 1, rec.user, rec.score)?;
    }
    Ok(())
}
