pub mod config;
pub mod error;
pub mod graph;
pub mod kinship;
pub mod store;

pub use config::Config;
pub use error::{KingraphError, Result};
pub use graph::{find_shortest_path, rank_suggestions, ConnectionGraph, PathOutcome, Suggestion};
pub use kinship::{deduce, Deduction, RelationshipLabel};
