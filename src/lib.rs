//! Pattern search over biological pathway models, producing SIF interactions.

pub mod config;
pub mod error;
pub mod formatters;
pub mod graph_builder;
pub mod id_fetcher;
pub mod logging;
pub mod miner;
pub mod model;
pub mod pattern;
pub mod patterns;
pub mod search;
pub mod sif_searcher;
pub mod types;

pub use error::{Error, Result};
pub use graph_builder::Graph;
pub use id_fetcher::{HgncIdFetcher, HgncTable, IdFetcher, NameIdFetcher};
pub use miner::{MinerAdapter, MinerKind, SifInteraction, SifMiner, SifType};
pub use model::{Element, Model};
pub use pattern::{Constraint, Generator, Pattern};
pub use search::{Match, Searcher};
pub use sif_searcher::SifSearcher;
