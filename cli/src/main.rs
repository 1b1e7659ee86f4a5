//! redocx CLI - .docx text extraction with list labels
//!
//! A command-line tool for reading, labelling and rewriting Word documents.

use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use redocx::numbering::{NumberingOptions, RestartMode, TemplateMode};
use redocx::render::{to_json, HyperlinkStyle, JsonFormat, RenderOptions};
use redocx::{DecodeOptions, Docx};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Word document text, list labels and round-trip rewriting
#[derive(Parser)]
#[command(
    name = "redocx",
    version,
    about = "Read and rewrite .docx documents",
    long_about = "redocx - order-preserving .docx decoding.\n\n\
                  Extracts text with list numbering labels, dumps the decoded tree as JSON \
                  and rewrites packages with normalized empty elements."
)]
struct Cli {
    /// Log decoding details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract plain text with list labels
    Text {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Substitute every level placeholder in list labels
        #[arg(long)]
        all_levels: bool,

        /// Restart a list whenever another list interrupts it
        #[arg(long)]
        restart_per_list: bool,

        /// Print link text without targets
        #[arg(long)]
        plain_links: bool,
    },

    /// Print the label of every numbered paragraph
    Labels {
        /// Input file path
        input: PathBuf,

        /// Substitute every level placeholder in list labels
        #[arg(long)]
        all_levels: bool,

        /// Restart a list whenever another list interrupts it
        #[arg(long)]
        restart_per_list: bool,
    },

    /// Dump the decoded tree as JSON
    Json {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,

        /// Dump the numbering definitions instead of the document
        #[arg(long)]
        numbering: bool,
    },

    /// Rewrite a .docx (or a single .xml part) with empty elements collapsed
    Normalize {
        /// Input file path
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Keep unrecognized elements instead of dropping them
        #[arg(long)]
        preserve_unknown: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    use log::LevelFilter::*;

    let level = if verbose { Debug } else { Warn };
    let _ = env_logger::builder()
        .filter_level(Warn)
        .filter_module("redocx", level)
        .try_init();
}

fn numbering_options(all_levels: bool, restart_per_list: bool) -> NumberingOptions {
    let mut options = NumberingOptions::new();
    if all_levels {
        options = options.with_substitution(TemplateMode::AllLevels);
    }
    if restart_per_list {
        options = options.with_restart(RestartMode::PerListInstance);
    }
    options
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Text {
            input,
            output,
            all_levels,
            restart_per_list,
            plain_links,
        } => {
            let pb = create_spinner("Parsing document...");

            let docx = Docx::open(&input)?;
            pb.set_message("Rendering to text...");

            let mut options = RenderOptions::new()
                .with_numbering(numbering_options(all_levels, restart_per_list));
            if plain_links {
                options = options.with_hyperlinks(HyperlinkStyle::TextOnly);
            }
            let text = docx.plain_text(&options)?;

            pb.finish_and_clear();
            write_output(output.as_deref(), &text)?;

            if let Some(path) = output {
                println!("{} Converted to text: {}", "✓".green().bold(), path.display());
            }
        }

        Commands::Labels {
            input,
            all_levels,
            restart_per_list,
        } => {
            let pb = create_spinner("Parsing document...");

            let docx = Docx::open(&input)?;
            let options = RenderOptions::new()
                .with_numbering(numbering_options(all_levels, restart_per_list));
            let labels = docx.numbering_labels_with(&options)?;

            pb.finish_and_clear();

            if labels.is_empty() {
                println!("{} No numbered paragraphs found", "!".yellow().bold());
            }
            for label in labels {
                println!("{}", label);
            }
        }

        Commands::Json {
            input,
            output,
            compact,
            numbering,
        } => {
            let pb = create_spinner("Parsing document...");

            let docx = Docx::open(&input)?;
            pb.set_message("Rendering to JSON...");

            let format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            let json = if numbering {
                to_json(docx.numbering(), format)?
            } else {
                to_json(docx.document(), format)?
            };

            pb.finish_and_clear();
            write_output(output.as_deref(), &json)?;

            if let Some(path) = output {
                println!("{} Converted to JSON: {}", "✓".green().bold(), path.display());
            }
        }

        Commands::Normalize {
            input,
            output,
            preserve_unknown,
        } => {
            let pb = create_spinner("Rewriting...");

            let bytes = if is_xml_part(&input) {
                redocx::xml::normalize_self_closing(&fs::read(&input)?)?
            } else {
                let options = DecodeOptions::new().with_preserve_unknown(preserve_unknown);
                Docx::open_with(&input, options)?.to_bytes()?
            };
            fs::write(&output, bytes)?;

            pb.finish_and_clear();
            println!("{} Rewrote {}", "✓".green().bold(), output.display());
        }
    }

    Ok(())
}

fn is_xml_part(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => fs::write(p, content)?,
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}
