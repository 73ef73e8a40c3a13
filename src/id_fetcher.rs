//! Identifier resolution for mined interactions.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::Element;

static HGNC_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*hgnc\s*:?\s*").expect("valid regex"));

/// Maps an element to the identifier printed in the SIF output.
pub trait IdFetcher {
    fn fetch_id(&self, element: &Element) -> Option<String>;
}

/// Symbol service keyed by an accession string.
pub trait SymbolLookup {
    fn symbol(&self, accession: &str) -> Option<String>;
}

/// In-memory HGNC accession to symbol table.
#[derive(Debug, Clone, Default)]
pub struct HgncTable {
    symbols: HashMap<String, String>,
}

impl HgncTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, accession: &str, symbol: &str) {
        self.symbols
            .insert(normalize_accession(accession), symbol.to_string());
    }

    /// Parses `accession<TAB>symbol` lines. Blank lines and `#` comments are skipped.
    pub fn parse(content: &str) -> Result<Self> {
        let mut table = HgncTable::new();
        for (i, line) in content.lines().enumerate() {
            let line = line.trim_end();
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split('\t');
            match (fields.next(), fields.next()) {
                (Some(accession), Some(symbol)) if !accession.is_empty() && !symbol.is_empty() => {
                    table.insert(accession, symbol);
                }
                _ => {
                    return Err(Error::SymbolTable {
                        line: i + 1,
                        content: line.to_string(),
                    });
                }
            }
        }
        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let table = Self::parse(&fs::read_to_string(path)?)?;
        debug!(path = %path.display(), symbols = table.len(), "Loaded HGNC table");
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for HgncTable {
    fn from(entries: [(&str, &str); N]) -> Self {
        let mut table = HgncTable::new();
        for (accession, symbol) in entries {
            table.insert(accession, symbol);
        }
        table
    }
}

impl SymbolLookup for HgncTable {
    fn symbol(&self, accession: &str) -> Option<String> {
        self.symbols.get(&normalize_accession(accession)).cloned()
    }
}

// "HGNC:11998", "hgnc 11998" and "11998" share one key
fn normalize_accession(accession: &str) -> String {
    HGNC_PREFIX.replace(accession.trim(), "").into_owned()
}

/// Default fetcher: first HGNC cross-reference that resolves to a symbol.
#[derive(Debug, Clone)]
pub struct HgncIdFetcher<L> {
    lookup: L,
}

impl<L: SymbolLookup> HgncIdFetcher<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }
}

impl<L: SymbolLookup> IdFetcher for HgncIdFetcher<L> {
    fn fetch_id(&self, element: &Element) -> Option<String> {
        element
            .xrefs()
            .iter()
            .filter(|xr| xr.db.to_lowercase().starts_with("hgnc"))
            .filter_map(|xr| self.lookup.symbol(&xr.id))
            .find(|symbol| !symbol.is_empty())
    }
}

/// Uses the element's display name. For models without HGNC cross-references.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameIdFetcher;

impl IdFetcher for NameIdFetcher {
    fn fetch_id(&self, element: &Element) -> Option<String> {
        element.name().filter(|n| !n.is_empty()).map(str::to_string)
    }
}
