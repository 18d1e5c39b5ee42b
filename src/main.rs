//! # tspl-label CLI
//!
//! Command-line interface for label rendering.
//!
//! ## Usage
//!
//! ```bash
//! # Convert an image to a 1-bit PBM preview
//! tspl-label bitmap logo.png --width 200
//!
//! # Thicken thin strokes before printing
//! tspl-label bitmap logo.png --width 200 --dilate 1 -o logo.pbm
//!
//! # Render a JSON label to TSPL
//! tspl-label render label.json -o label.tspl
//!
//! # Show the generated commands instead of raw bytes
//! tspl-label render label.json --list
//!
//! # Preview on a printer with a screen
//! tspl-label render label.json --display > /dev/usb/lp0
//!
//! # Verbose logging
//! RUST_LOG=debug tspl-label render label.json > /dev/usb/lp0
//! ```

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use tspl_label::{
    LabelError,
    label::json::load_label,
    render::{
        BitOrder, ConvertOptions, ImageDecoder, ImageRef, load_bitmap,
        morphology::{dilate, save_pbm},
    },
};

/// tspl-label - TSPL label rendering utility
#[derive(Parser, Debug)]
#[command(name = "tspl-label")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert an image to a monochrome PBM file
    Bitmap {
        /// Input image (PNG, JPEG, ...)
        image: PathBuf,

        /// Output PBM file (defaults to the input name with .pbm)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Target width in dots
        #[arg(long)]
        width: Option<usize>,

        /// Target height in dots
        #[arg(long)]
        height: Option<usize>,

        /// Fixed threshold 0-255 (default: Otsu)
        #[arg(long)]
        threshold: Option<u8>,

        /// Dilation passes
        #[arg(long, default_value = "0")]
        dilate: usize,
    },

    /// Render a JSON label file to TSPL
    Render {
        /// Label description (JSON)
        label: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Number of label sets
        #[arg(long, default_value = "1")]
        sets: u32,

        /// Copies of each label
        #[arg(long, default_value = "1")]
        copies: u32,

        /// Print command lines instead of raw bytes
        #[arg(long)]
        list: bool,

        /// Show the label on the printer's screen instead of printing it
        #[arg(long, conflicts_with_all = ["sets", "copies"])]
        display: bool,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), LabelError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Bitmap {
            image,
            output,
            width,
            height,
            threshold,
            dilate: passes,
        } => {
            let options = ConvertOptions {
                width,
                height,
                threshold,
                bit_order: BitOrder::MsbFirst,
            };
            let bitmap = load_bitmap(&ImageDecoder, &ImageRef::Path(image.clone()), &options)?;
            let bitmap = dilate(&bitmap, passes);

            let output = output.unwrap_or_else(|| image.with_extension("pbm"));
            save_pbm(&bitmap, &output, None)?;
            println!(
                "Wrote {}x{} bitmap to {}",
                bitmap.width_dots(),
                bitmap.height(),
                output.display()
            );
        }

        Commands::Render {
            label,
            output,
            sets,
            copies,
            list,
            display,
        } => {
            let label = load_label(&label)?;
            let program = if display {
                label.display_commands()
            } else {
                label.print_commands(sets, copies)
            };

            if list {
                for line in program.lines() {
                    println!("{}", line);
                }
                return Ok(());
            }

            let bytes = program.to_bytes();
            match output {
                Some(path) => {
                    std::fs::write(&path, &bytes)?;
                    eprintln!("Wrote {} bytes to {}", bytes.len(), path.display());
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(&bytes)?;
                    stdout.flush()?;
                }
            }
        }
    }

    Ok(())
}
