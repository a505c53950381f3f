//! exampaper CLI - exam paper question extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use exampaper::source::{is_supported_extension, load_layouts};
use exampaper::{
    check_totals, export, ExamParser, ExportFormat, JsonFormat, PageSelection, Paper,
    ParseOptions, SegmentPreset,
};

#[derive(Parser)]
#[command(name = "exampaper")]
#[command(version)]
#[command(about = "Segment exam papers into question records (JSON, CSV)", long_about = None)]
struct Cli {
    /// Input file (PDF, JSON line dump or text)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Segmentation preset
    #[arg(long, value_enum, env = "EXAMPAPER_PRESET")]
    preset: Option<Preset>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write questions.json and questions.csv into a directory
    Convert {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Segmentation preset
        #[arg(long, value_enum, env = "EXAMPAPER_PRESET")]
        preset: Option<Preset>,
    },

    /// Export the paper as JSON
    Json {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Write only the question array
        #[arg(long)]
        questions_only: bool,

        /// Segmentation preset
        #[arg(long, value_enum, env = "EXAMPAPER_PRESET")]
        preset: Option<Preset>,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// JSON page layout dump with drawing primitives
        #[arg(long, value_name = "FILE")]
        layout: Option<PathBuf>,
    },

    /// Export the questions as CSV
    Csv {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Segmentation preset
        #[arg(long, value_enum, env = "EXAMPAPER_PRESET")]
        preset: Option<Preset>,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// Show paper information
    Info {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Segmentation preset
        #[arg(long, value_enum, env = "EXAMPAPER_PRESET")]
        preset: Option<Preset>,
    },

    /// Compare declared mark totals with extracted marks
    Check {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Segmentation preset
        #[arg(long, value_enum, env = "EXAMPAPER_PRESET")]
        preset: Option<Preset>,
    },

    /// Segment every supported file in a directory
    Batch {
        /// Input directory
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: Format,

        /// Segmentation preset
        #[arg(long, value_enum, env = "EXAMPAPER_PRESET")]
        preset: Option<Preset>,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Preset {
    /// Keep every line (whitespace normalization only)
    Minimal,
    /// Drop page furniture (default)
    Standard,
    /// Pearson Edexcel papers: margins, barcodes, "(N)" marks
    Edexcel,
}

impl From<Preset> for SegmentPreset {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Minimal => SegmentPreset::Minimal,
            Preset::Standard => SegmentPreset::Standard,
            Preset::Edexcel => SegmentPreset::Edexcel,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Csv,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => ExportFormat::Json,
            Format::Csv => ExportFormat::Csv,
        }
    }
}

type CmdResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            preset,
        }) => cmd_convert(&input, output.as_deref(), preset),
        Some(Commands::Json {
            input,
            output,
            compact,
            questions_only,
            preset,
            pages,
            layout,
        }) => cmd_json(
            &input,
            output.as_deref(),
            compact,
            questions_only,
            preset,
            pages.as_deref(),
            layout.as_deref(),
        ),
        Some(Commands::Csv {
            input,
            output,
            preset,
            pages,
        }) => cmd_csv(&input, output.as_deref(), preset, pages.as_deref()),
        Some(Commands::Info { input, preset }) => cmd_info(&input, preset),
        Some(Commands::Check { input, preset }) => cmd_check(&input, preset),
        Some(Commands::Batch {
            input,
            output,
            format,
            preset,
        }) => cmd_batch(&input, output.as_deref(), format, preset),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), cli.preset)
            } else {
                println!("{}", "Usage: exampaper <FILE> [OUTPUT]".yellow());
                println!("       exampaper --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_options(preset: Option<Preset>, pages: Option<&str>) -> Result<ParseOptions, exampaper::Error> {
    let mut options = ParseOptions::new().with_preset(preset.unwrap_or(Preset::Standard).into());
    if let Some(p) = pages {
        options = options.with_pages(PageSelection::parse(p)?);
    }
    Ok(options)
}

fn parse(input: &Path, options: ParseOptions) -> Result<Paper, exampaper::Error> {
    Ok(ExamParser::new().with_options(options).parse(input)?.into_paper())
}

fn default_output_dir(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    PathBuf::from(format!("{}_questions", stem))
}

fn write_or_print(output: Option<&Path>, content: &str) -> CmdResult {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_convert(input: &Path, output: Option<&Path>, preset: Option<Preset>) -> CmdResult {
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| default_output_dir(input));

    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Segmenting...");
    let paper = parse(input, build_options(preset, None)?)?;
    pb.inc(1);

    pb.set_message("Writing JSON...");
    let json = export::records_to_json(&paper.questions, JsonFormat::Pretty)?;
    fs::write(output_dir.join("questions.json"), &json)?;
    pb.inc(1);

    pb.set_message("Writing CSV...");
    export::write_csv(fs::File::create(output_dir.join("questions.csv"))?, &paper.questions)?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    println!(
        "\n{} {} questions in {}",
        "Found".green().bold(),
        paper.question_count(),
        output_dir.display()
    );
    println!("  {} questions.json", "├─".dimmed());
    println!("  {} questions.csv", "└─".dimmed());

    Ok(())
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    questions_only: bool,
    preset: Option<Preset>,
    pages: Option<&str>,
    layout: Option<&Path>,
) -> CmdResult {
    let mut parser = ExamParser::new().with_options(build_options(preset, pages)?);
    if let Some(path) = layout {
        parser = parser.with_layouts(load_layouts(&fs::read(path)?)?);
    }
    let parsed = parser.parse(input)?;

    if layout.is_some() && !parsed.paper.metadata.positioned {
        eprintln!(
            "{} {} has no line positions; figures are listed but not attached to questions",
            "warning:".yellow().bold(),
            input.display()
        );
    }

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = if questions_only {
        parsed.records_to_json(format)?
    } else {
        parsed.to_json(format)?
    };

    write_or_print(output, &json)
}

fn cmd_csv(input: &Path, output: Option<&Path>, preset: Option<Preset>, pages: Option<&str>) -> CmdResult {
    let paper = parse(input, build_options(preset, pages)?)?;
    let csv = export::to_csv(&paper.questions)?;
    write_or_print(output, csv.trim_end())
}

fn cmd_info(input: &Path, preset: Option<Preset>) -> CmdResult {
    let paper = parse(input, build_options(preset, None)?)?;
    let meta = &paper.metadata;

    println!("{}", "Paper Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if let Some(ref format) = meta.format {
        println!("{}: {}", "Format".bold(), format);
    }
    println!("{}: {}", "Pages".bold(), meta.page_count);

    let layer = &meta.text_layer;
    let text_layer = if layer.is_probably_scanned() {
        "None (scanned?)".red().to_string()
    } else {
        format!("{} of {} pages", layer.text_pages, layer.page_count)
    };
    println!("{}: {}", "Text layer".bold(), text_layer);
    if !layer.empty_pages.is_empty() && !layer.is_probably_scanned() {
        println!("{}: {:?}", "Empty pages".bold(), layer.empty_pages);
    }

    println!();
    println!("{}", "Questions".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Records".bold(), paper.question_count());
    println!("{}: {}", "Top-level questions".bold(), paper.top_level_count());
    println!(
        "{}: {} of {}",
        "With marks".bold(),
        paper.stats.records_with_marks,
        paper.question_count()
    );
    println!("{}: {}", "Total marks".bold(), paper.total_marks());
    if let Some(total) = paper.paper_total {
        println!("{}: {}", "Declared paper total".bold(), total);
    }
    if !paper.figures.is_empty() {
        println!("{}: {}", "Figures".bold(), paper.figures.len());
    }

    println!();
    println!("{}", "Segmentation".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let stats = &paper.stats;
    println!("{}: {}", "Lines".bold(), stats.lines_seen);
    println!("{}: {}", "Header lines".bold(), stats.header_lines);
    println!("{}: {}", "Furniture dropped".bold(), stats.noise_lines);
    println!("{}: {}", "Rejected starts".bold(), stats.rejected_tokens);
    println!("{}: {}", "Malformed marks".bold(), stats.malformed_marks);

    Ok(())
}

fn cmd_check(input: &Path, preset: Option<Preset>) -> CmdResult {
    let paper = parse(input, build_options(preset, None)?)?;

    if paper.totals.is_empty() && paper.paper_total.is_none() {
        println!("{}", "No declared totals found".yellow());
        return Ok(());
    }

    let issues = check_totals(&paper);
    if issues.is_empty() {
        println!(
            "{} {} question totals match",
            "OK".green().bold(),
            paper.totals.len()
        );
        return Ok(());
    }

    for issue in &issues {
        println!("{} {}", "✗".red(), issue);
    }
    Err(format!("{} mark total discrepancies", issues.len()).into())
}

/// Supported files directly inside `dir`, sorted by name.
fn collect_inputs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(is_supported_extension)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Keeps the input extension, so `paper1.pdf` and `paper1.txt` do not collide.
fn output_path(output_dir: &Path, input: &Path, format: ExportFormat) -> PathBuf {
    let name = input.file_name().unwrap_or_default().to_string_lossy();
    output_dir.join(format!("{}.{}", name, format.extension()))
}

fn cmd_batch(input: &Path, output: Option<&Path>, format: Format, preset: Option<Preset>) -> CmdResult {
    let files = collect_inputs(input)?;
    if files.is_empty() {
        println!("{}", "No supported files found".yellow());
        return Ok(());
    }

    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| input.join("questions"));
    fs::create_dir_all(&output_dir)?;
    log::debug!("Batch of {} files into {}", files.len(), output_dir.display());

    let options = build_options(preset, None)?;
    let format: ExportFormat = format.into();

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let failures: Vec<(PathBuf, String)> = files
        .par_iter()
        .filter_map(|file| {
            let result = parse(file, options.clone()).and_then(|paper| {
                let target = output_path(&output_dir, file, format);
                match format {
                    ExportFormat::Json => {
                        fs::write(target, export::records_to_json(&paper.questions, JsonFormat::Pretty)?)?
                    }
                    ExportFormat::Csv => export::write_csv(fs::File::create(target)?, &paper.questions)?,
                }
                Ok(())
            });
            pb.inc(1);
            result.err().map(|e| (file.clone(), e.to_string()))
        })
        .collect();

    pb.finish_with_message("Done!");

    let ok = files.len() - failures.len();
    println!("\n{} {} of {} files", "Converted".green().bold(), ok, files.len());
    for (file, error) in &failures {
        eprintln!("  {} {}: {}", "✗".red(), file.display(), error);
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(format!("{} files failed", failures.len()).into())
    }
}

fn cmd_version() {
    println!("{} {}", "exampaper".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Exam paper question extraction tool");
    println!();
    println!("License: MIT");
}
