use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::miner::SifType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Sif,       // Plain triples
    Mediators, // Triples plus mediator ids
    Json,
    Dot,       // Wrapper graph, no mining
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sif" => Ok(OutputFormat::Sif),
            "mediators" | "sif-mediators" => Ok(OutputFormat::Mediators),
            "json" => Ok(OutputFormat::Json),
            "dot" => Ok(OutputFormat::Dot),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Sif => write!(f, "sif"),
            OutputFormat::Mediators => write!(f, "mediators"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Dot => write!(f, "dot"),
        }
    }
}

/// Validated settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub model: PathBuf,
    pub types: Vec<SifType>,
    pub hgnc_table: Option<PathBuf>,
    pub format: OutputFormat,
    pub header: bool,
    pub output: Option<PathBuf>,
}

impl Settings {
    pub fn new(model: PathBuf, type_names: &[String], format: &str) -> Result<Self> {
        // Comma separated lists are accepted as well as repeated flags
        let types = type_names
            .iter()
            .flat_map(|names| names.split(','))
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<SifType>>>()?;

        Ok(Self {
            model,
            types: if types.is_empty() { SifType::ALL.to_vec() } else { types },
            hgnc_table: None,
            format: format.parse()?,
            header: false,
            output: None,
        })
    }

    pub fn with_hgnc_table(mut self, path: Option<PathBuf>) -> Self {
        self.hgnc_table = path;
        self
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_every_type() {
        let settings = Settings::new(PathBuf::from("m.json"), &[], "sif").unwrap();
        assert_eq!(settings.types, SifType::ALL.to_vec());
        assert_eq!(settings.format, OutputFormat::Sif);
    }

    #[test]
    fn splits_comma_separated_types() {
        let names = vec!["controls-degradation-of, in-complex-with".to_string()];
        let settings = Settings::new(PathBuf::from("m.json"), &names, "JSON").unwrap();
        assert_eq!(settings.types, vec![SifType::ControlsDegradation, SifType::InSameComplex]);
        assert_eq!(settings.format, OutputFormat::Json);
    }

    #[test]
    fn unknown_type_or_format_fails_fast() {
        let names = vec!["neighbor-of".to_string()];
        assert!(matches!(
            Settings::new(PathBuf::from("m.json"), &names, "sif"),
            Err(Error::UnknownSifType(_))
        ));
        assert!(matches!(
            Settings::new(PathBuf::from("m.json"), &[], "xml"),
            Err(Error::UnknownFormat(_))
        ));
    }
}
