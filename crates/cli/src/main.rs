//! `pss-letter`: compose Pre-Shipment Sample letters from the command line

mod sink;

use anyhow::Context;
use clap::{Parser, Subcommand};
use env_logger::Env;
use letter_core::{
    render_and_deliver, validate_containers, LayoutConfig, LetterComposer, LetterRequest,
    Letterhead, PrefillTable,
};
use log::LevelFilter;
use pdf_render::{PageSetup, PdfRenderer};
use sink::DirectorySink;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "pss-letter")]
#[command(about = "Generate Pre-Shipment Sample letters as PDF")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a letter from a JSON request and write the PDF
    Compose {
        /// Letter request (JSON)
        request: PathBuf,

        /// Prefill table to use instead of the built-in one (JSON array)
        #[arg(long)]
        prefill: Option<PathBuf>,

        /// Layout spacing overrides (JSON)
        #[arg(long)]
        layout: Option<PathBuf>,

        /// Page geometry overrides (JSON)
        #[arg(long)]
        page: Option<PathBuf>,

        /// Letterhead image (JPEG or PNG) drawn across the top of the page
        #[arg(long)]
        letterhead: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Print the output filename for a lookup code and purchase order
    Filename {
        #[arg(long)]
        code: Option<String>,

        #[arg(long)]
        po: String,

        #[arg(long, default_value_t = 1)]
        index: u32,

        #[arg(long, default_value_t = 1)]
        total: u32,

        #[arg(long)]
        prefill: Option<PathBuf>,
    },

    /// List prefill codes, or print one entry as JSON
    Prefill {
        code: Option<String>,

        #[arg(long)]
        prefill: Option<PathBuf>,
    },
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .format_timestamp(None)
        .parse_env(Env::new().filter("PSS_LETTER_LOG"))
        .init();
}

fn load_table(path: Option<&Path>) -> anyhow::Result<PrefillTable> {
    let table = match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading prefill table {}", path.display()))?;
            PrefillTable::from_json(&json)
                .with_context(|| format!("parsing prefill table {}", path.display()))?
        }
        None => PrefillTable::embedded()?,
    };
    log::debug!("prefill table with {} entries", table.len());
    Ok(table)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading {what} {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing {what} {}", path.display()))
}

fn compose(
    request: &Path,
    prefill: Option<&Path>,
    layout: Option<&Path>,
    page: Option<&Path>,
    letterhead: Option<PathBuf>,
    out: &Path,
) -> anyhow::Result<PathBuf> {
    let table = load_table(prefill)?;
    let request: LetterRequest = read_json(request, "letter request")?;

    let mut layout_config = match layout {
        Some(path) => read_json::<LayoutConfig>(path, "layout")?,
        None => LayoutConfig::default(),
    };
    if let Some(image) = letterhead {
        layout_config = layout_config.with_letterhead(Letterhead::full_width(image));
    }

    let setup = match page {
        Some(path) => read_json::<PageSetup>(path, "page setup")?,
        None => PageSetup::default(),
    };

    let document = LetterComposer::new(&table)
        .with_layout(layout_config)
        .compose(&request)?;

    let renderer = PdfRenderer::new().with_setup(setup);
    let mut sink = DirectorySink::new(out);
    render_and_deliver(&document, &renderer, &mut sink)?;

    sink.written()
        .last()
        .cloned()
        .context("no file was written")
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Compose {
            request,
            prefill,
            layout,
            page,
            letterhead,
            out,
        } => {
            let path = compose(
                &request,
                prefill.as_deref(),
                layout.as_deref(),
                page.as_deref(),
                letterhead,
                &out,
            )?;
            println!("{}", path.display());
        }
        Command::Filename {
            code,
            po,
            index,
            total,
            prefill,
        } => {
            validate_containers(index, total)?;
            let table = load_table(prefill.as_deref())?;
            let composer = LetterComposer::new(&table);
            println!(
                "{}",
                composer.derive_filename(code.as_deref(), &po, index, total)
            );
        }
        Command::Prefill { code, prefill } => {
            let table = load_table(prefill.as_deref())?;
            match code {
                Some(code) => {
                    let entry = table
                        .lookup(&code)
                        .with_context(|| format!("no prefill entry for code {code:?}"))?;
                    println!("{}", serde_json::to_string_pretty(entry)?);
                }
                None => {
                    for entry in table.entries() {
                        println!(
                            "{}\t{}\t{}",
                            entry.code, entry.material_suffix, entry.company_name
                        );
                    }
                }
            }
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logger();
    run(Cli::parse())
}
