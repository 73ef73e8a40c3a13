use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use structopt::StructOpt;
use tracing::info;

use pathsif::config::{OutputFormat, Settings};
use pathsif::formatters::{format_graph_as_dot, format_sif, format_sif_as_json, format_sif_with_mediators};
use pathsif::id_fetcher::{HgncTable, NameIdFetcher};
use pathsif::{logging, Graph, Model, SifSearcher};

#[derive(Debug, StructOpt)]
#[structopt(name = "pathsif", about = "Mine binary SIF interactions from a pathway model")]
struct Opt {
    /// Input model (JSON)
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Output file
    #[structopt(parse(from_os_str), short, long)]
    output: Option<PathBuf>,

    /// Output format (sif, mediators, json or dot)
    #[structopt(short, long, default_value = "sif")]
    format: String,

    /// SIF types to mine, comma separated (default: all)
    #[structopt(short, long)]
    types: Vec<String>,

    /// HGNC accession to symbol table (TSV). Without it element names are used
    #[structopt(parse(from_os_str), long)]
    hgnc: Option<PathBuf>,

    /// Print a header line
    #[structopt(long)]
    header: bool,

    /// Verbosity (-v, -vv, -vvv)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
}

fn main() -> Result<()> {
    let opt = Opt::from_args();
    logging::init(opt.verbose)?;

    let settings = Settings::new(opt.input, &opt.types, &opt.format)?
        .with_hgnc_table(opt.hgnc)
        .with_header(opt.header)
        .with_output(opt.output);

    let model = Model::load(&settings.model)
        .with_context(|| format!("Failed to load model: {:?}", settings.model))?;
    info!(elements = model.len(), "Model loaded");

    let output = run(&settings, &model)?;

    if let Some(output_path) = &settings.output {
        fs::write(output_path, output)
            .with_context(|| format!("Failed to write to file: {:?}", output_path))?;
        info!(path = ?output_path, "Output written");
    } else {
        print!("{}", output);
    }

    Ok(())
}

fn run(settings: &Settings, model: &Model) -> Result<String> {
    if settings.format == OutputFormat::Dot {
        return Ok(format_graph_as_dot(&Graph::build(model)));
    }

    let searcher = match &settings.hgnc_table {
        Some(path) => {
            let table = HgncTable::load(path)
                .with_context(|| format!("Failed to load HGNC table: {:?}", path))?;
            SifSearcher::with_hgnc(&settings.types, table)?
        }
        None => SifSearcher::new(&settings.types, Box::new(NameIdFetcher))?,
    };
    let interactions = searcher.search_sif(model)?;
    let header = settings.header.then(|| searcher.header());

    Ok(match settings.format {
        OutputFormat::Sif => format_sif(&interactions, header),
        OutputFormat::Mediators => format_sif_with_mediators(&interactions, header),
        OutputFormat::Json => format_sif_as_json(&interactions)?,
        OutputFormat::Dot => unreachable!("handled above"),
    })
}
