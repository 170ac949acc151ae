use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use boardmesh::{
    build_board_artifacts, init_logging, load_font, BoardDocument, BuildConfig, VectorFont,
    BUILD_DATE, VERSION,
};

const USAGE: &str = "usage: boardmesh <input.json> [--out <dir>] [--config <config.json>]";

#[derive(Debug, PartialEq)]
struct CliArgs {
    input: PathBuf,
    out_dir: PathBuf,
    config: Option<PathBuf>,
}

impl CliArgs {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut input = None;
        let mut out_dir = None;
        let mut config = None;
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--out" | "-o" => {
                    out_dir = Some(PathBuf::from(args.next().context("--out needs a directory")?))
                }
                "--config" | "-c" => {
                    config = Some(PathBuf::from(args.next().context("--config needs a file")?))
                }
                flag if flag.starts_with('-') => bail!("unknown option {flag}\n{USAGE}"),
                _ if input.is_some() => bail!("more than one input file\n{USAGE}"),
                _ => input = Some(PathBuf::from(&arg)),
            }
        }

        let Some(input) = input else {
            bail!(USAGE);
        };
        Ok(Self {
            input,
            out_dir: out_dir.unwrap_or_else(|| PathBuf::from("boardmesh-out")),
            config,
        })
    }
}

fn main() -> Result<()> {
    init_logging()?;

    let args = CliArgs::parse(std::env::args().skip(1))?;
    tracing::info!("boardmesh {} (built {})", VERSION, BUILD_DATE);

    let config = match &args.config {
        Some(path) => BuildConfig::load_from_file(path)?,
        None => BuildConfig::default(),
    };
    let doc = BoardDocument::from_path(&args.input)
        .with_context(|| format!("Failed to read board document {}", args.input.display()))?;

    let font = load_font(&config);
    let artifacts =
        build_board_artifacts(&doc, &config, font.as_ref().map(|f| f as &dyn VectorFont))?;

    for diagnostic in artifacts.diagnostics() {
        tracing::warn!("{}", diagnostic);
    }
    let written = artifacts.write_to_dir(&args.out_dir)?;
    for path in &written {
        tracing::info!("wrote {}", path.display());
    }
    Ok(())
}
