use std::collections::{BTreeSet, HashMap};
use std::collections::hash_map::Entry;

use tracing::{debug, info};

use crate::error::Result;
use crate::graph_builder::Graph;
use crate::id_fetcher::{HgncIdFetcher, HgncTable, IdFetcher};
use crate::miner::{MinerAdapter, MinerKind, SifInteraction, SifKey, SifMiner, SifType};
use crate::model::Model;
use crate::search::Searcher;

const MIXED_HEADER: &str = "Source\ttype\tTarget";

/// Runs the miners for a set of SIF types over a model and merges the results.
pub struct SifSearcher {
    types: BTreeSet<SifType>,
    miners: Vec<MinerAdapter<MinerKind>>,
    fetcher: Box<dyn IdFetcher>,
}

impl SifSearcher {
    pub fn new(types: &[SifType], fetcher: Box<dyn IdFetcher>) -> Result<Self> {
        let types: BTreeSet<SifType> = types.iter().copied().collect();
        let mut miners = Vec::new();
        for t in &types {
            for kind in t.miners() {
                miners.push(MinerAdapter::new(kind)?);
            }
        }
        debug!(types = ?types, miners = miners.len(), "Configured SIF searcher");
        Ok(Self {
            types,
            miners,
            fetcher,
        })
    }

    /// Searcher resolving identifiers through HGNC cross-references.
    pub fn with_hgnc(types: &[SifType], table: HgncTable) -> Result<Self> {
        Self::new(types, Box::new(HgncIdFetcher::new(table)))
    }

    /// Like [`SifSearcher::new`] but from type names. Any unknown name is an error.
    pub fn from_names<S: AsRef<str>>(names: &[S], fetcher: Box<dyn IdFetcher>) -> Result<Self> {
        let types = names
            .iter()
            .map(|n| n.as_ref().parse())
            .collect::<Result<Vec<SifType>>>()?;
        Self::new(&types, fetcher)
    }

    pub fn types(&self) -> &BTreeSet<SifType> {
        &self.types
    }

    pub fn miners(&self) -> &[MinerAdapter<MinerKind>] {
        &self.miners
    }

    /// Header shared by all miners, or a generic one when they disagree.
    pub fn header(&self) -> &'static str {
        let mut headers = self.miners.iter().map(|m| m.header());
        match headers.next() {
            Some(first) if headers.all(|h| h == first) => first,
            _ => MIXED_HEADER,
        }
    }

    /// Merged interactions found in the model, in no particular order.
    pub fn search_sif(&self, model: &Model) -> Result<Vec<SifInteraction>> {
        let graph = Graph::build(model);
        let mut merged: HashMap<SifKey, SifInteraction> = HashMap::new();
        let mut dropped = 0usize;

        for miner in &self.miners {
            let matches = Searcher::search(&graph, miner.pattern());
            let mut kept = 0usize;

            for m in matches.values().flatten() {
                let Some(sif) = miner.create_sif_interaction(m, &graph, self.fetcher.as_ref())? else {
                    dropped += 1;
                    continue;
                };
                if !sif.has_ids() || !self.types.contains(&sif.sif_type) {
                    dropped += 1;
                    continue;
                }
                kept += 1;
                match merged.entry(sif.key.clone()) {
                    Entry::Occupied(mut existing) => existing.get_mut().merge_with(sif),
                    Entry::Vacant(slot) => {
                        slot.insert(sif);
                    }
                }
            }

            debug!(miner = miner.name(), kept, "Miner finished");
        }

        info!(interactions = merged.len(), dropped, "SIF search finished");
        Ok(merged.into_values().collect())
    }
}
