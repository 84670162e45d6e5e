//! CLI configuration loaded from environment variables.
//!
//! Every setting has a default, and the file paths can also be overridden per
//! invocation with `--edges` / `--tags`.
//!
//! | Variable                     | Default                      | Description                          |
//! |------------------------------|------------------------------|--------------------------------------|
//! | `AMITY_EDGE_FILE`            | `data/synthetic_edges.txt`   | Friendship list, one `a b` per line  |
//! | `AMITY_TAG_FILE`             | `data/synthetic_tags.txt`    | Tag list, `id tag1 tag2 …` per line  |
//! | `AMITY_LOG_LEVEL`            | `warn`                       | tracing filter (trace/debug/info/warn/error) |
//! | `AMITY_PAGERANK_DAMPING`     | `0.85`                       | Damping factor for `pagerank`        |
//! | `AMITY_PAGERANK_ITERATIONS`  | `100`                        | Power-iteration rounds for `pagerank` |
//! | `AMITY_LPA_ITERATIONS`       | `10`                         | Label propagation rounds             |
//! | `AMITY_HYBRID_W_INFLUENCE`   | `0.5`                        | Hybrid ranker influence weight       |
//! | `AMITY_HYBRID_W_PROXIMITY`   | `0.5`                        | Hybrid ranker proximity weight       |

use std::path::PathBuf;

use amity_algo::{HybridWeights, PageRankConfig};

#[derive(Debug, Clone)]
pub struct Config {
    pub edge_file: PathBuf,
    pub tag_file: PathBuf,

    /// Tracing filter string, e.g. `"amity_algo=debug,warn"`.
    pub log_level: String,

    pub pagerank_damping: f64,
    pub pagerank_iterations: usize,

    pub lpa_iterations: usize,

    pub hybrid_w_influence: f64,
    pub hybrid_w_proximity: f64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            edge_file:           env_str("AMITY_EDGE_FILE", "data/synthetic_edges.txt").into(),
            tag_file:            env_str("AMITY_TAG_FILE", "data/synthetic_tags.txt").into(),
            log_level:           env_str("AMITY_LOG_LEVEL", "warn"),
            pagerank_damping:    env_parse("AMITY_PAGERANK_DAMPING", 0.85),
            pagerank_iterations: env_parse("AMITY_PAGERANK_ITERATIONS", 100),
            lpa_iterations:      env_parse("AMITY_LPA_ITERATIONS", 10),
            hybrid_w_influence:  env_parse("AMITY_HYBRID_W_INFLUENCE", 0.5),
            hybrid_w_proximity:  env_parse("AMITY_HYBRID_W_PROXIMITY", 0.5),
        }
    }

    pub fn pagerank(&self) -> PageRankConfig {
        PageRankConfig {
            damping_factor: self.pagerank_damping,
            iterations: self.pagerank_iterations,
        }
    }

    pub fn hybrid_weights(&self) -> HybridWeights {
        HybridWeights {
            influence: self.hybrid_w_influence,
            proximity: self.hybrid_w_proximity,
        }
    }
}

fn env_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
