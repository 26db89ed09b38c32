use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfscan", about = "Turn photos and scans into a compact PDF", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize images to pages and write a size-limited PDF
    Scan {
        /// Input image file(s), one page each, in order
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// JSON options file; flags below override it
        #[arg(long)]
        options: Option<PathBuf>,

        /// Page size
        #[arg(long, value_enum)]
        paper: Option<PaperArg>,

        /// Page resolution in dots per inch
        #[arg(long)]
        dpi: Option<u32>,

        /// Maximum PDF size in bytes
        #[arg(long)]
        max_bytes: Option<u64>,

        /// Fail instead of writing a PDF that exceeds the size limit
        #[arg(long)]
        strict: bool,
    },

    /// Write the default options as JSON
    Options {
        /// Output JSON file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A4,
    A5,
    Letter,
    Legal,
}

impl From<PaperArg> for pdf_scan::PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            input,
            output,
            options,
            paper,
            dpi,
            max_bytes,
            strict,
        } => {
            let mut scan_options = match &options {
                Some(path) => pdf_scan::ScanOptions::load(path)
                    .await
                    .with_context(|| format!("Failed to load options from {}", path.display()))?,
                None => pdf_scan::ScanOptions::default(),
            };
            if let Some(paper) = paper {
                scan_options.paper_size = paper.into();
            }
            if let Some(dpi) = dpi {
                scan_options.dpi = dpi;
            }
            if let Some(max_bytes) = max_bytes {
                scan_options.max_pdf_bytes = max_bytes;
            }

            let images = pdf_scan::load_images(&input).await?;
            let pdf = pdf_scan::build_pdf(images, &scan_options).await?;

            if !pdf.within_budget {
                if strict {
                    bail!(
                        "PDF is {} bytes at quality {}, over the {} byte limit",
                        pdf.len(),
                        pdf.quality,
                        scan_options.max_pdf_bytes
                    );
                }
                eprintln!(
                    "Warning: PDF exceeds the {} byte limit even at quality {}",
                    scan_options.max_pdf_bytes, pdf.quality
                );
            }

            pdf_scan::save_pdf(&pdf, &output).await?;
            println!(
                "Scanned {} page(s) → {} ({} bytes, quality {})",
                input.len(),
                output.display(),
                pdf.len(),
                pdf.quality
            );
        }

        Commands::Options { output } => {
            pdf_scan::ScanOptions::default().save(&output).await?;
            println!("Default options → {}", output.display());
        }
    }

    Ok(())
}
