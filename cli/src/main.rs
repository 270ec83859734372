//! pdfhtml CLI - styled HTML from PDF page snapshots

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfhtml::{
    convert_batch, BatchJob, ConvertOptions, ConvertResult, Converter, DocumentProvider,
    FixedLanguage, FlagLayout, GroupingOptions, JsonProvider, LanguageDetector, LayoutMode,
    PageSelection, RenderOptions, WhatlangDetector,
};

#[derive(Parser)]
#[command(name = "pdfhtml")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Rebuild styled HTML from PDF page snapshots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a JSON page snapshot to HTML
    Convert {
        /// Input snapshot
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (defaults to the input name with .html)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        args: ConvertArgs,
    },

    /// Show snapshot information
    Info {
        /// Input snapshot
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Snapshot flag bit layout
        #[arg(long, value_enum, default_value = "canonical")]
        flags: FlagMode,
    },

    /// Convert several snapshots in parallel
    Batch {
        /// Input snapshots
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short = 'd', long, value_name = "DIR")]
        dir: PathBuf,

        #[command(flatten)]
        args: ConvertArgs,
    },

    /// Show version information
    Version,
}

#[derive(clap::Args)]
struct ConvertArgs {
    /// Placement strategy
    #[arg(long, value_enum, default_value = "positioned")]
    layout: LayoutArg,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Snapshot flag bit layout
    #[arg(long, value_enum, default_value = "canonical")]
    flags: FlagMode,

    /// Fixed language code instead of detection
    #[arg(long, value_name = "CODE")]
    lang: Option<String>,

    /// Disable table detection
    #[arg(long)]
    no_tables: bool,

    /// Write a JSON dump next to each output
    #[arg(long)]
    dump_json: bool,

    /// Print extraction statistics
    #[arg(long)]
    stats: bool,

    /// Apply Unicode NFC normalization
    #[arg(long)]
    normalize: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum LayoutArg {
    /// Absolute positions and rotation
    Positioned,
    /// Document flow
    Flow,
}

impl From<LayoutArg> for LayoutMode {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Positioned => LayoutMode::Positioned,
            LayoutArg::Flow => LayoutMode::Flow,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FlagMode {
    /// Canonical bit table
    Canonical,
    /// MuPDF span flags
    Mupdf,
}

impl From<FlagMode> for FlagLayout {
    fn from(mode: FlagMode) -> Self {
        match mode {
            FlagMode::Canonical => FlagLayout::Canonical,
            FlagMode::Mupdf => FlagLayout::MuPdf,
        }
    }
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            args,
        } => cmd_convert(&input, output.as_deref(), &args),
        Commands::Info { input, flags } => cmd_info(&input, flags),
        Commands::Batch { inputs, dir, args } => cmd_batch(&inputs, &dir, &args),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

impl ConvertArgs {
    fn options(&self) -> CliResult<ConvertOptions> {
        let page_selection = match &self.pages {
            Some(p) => PageSelection::parse(p)?,
            None => PageSelection::All,
        };

        let render = RenderOptions::new()
            .with_layout(self.layout.into())
            .with_pages(page_selection)
            .with_grouping(GroupingOptions::default().with_tables(!self.no_tables))
            .with_normalization(self.normalize)
            .with_stats(self.stats);

        Ok(ConvertOptions::new()
            .with_render_options(render)
            .with_flag_layout(self.flags.into())
            .with_json_dump(self.dump_json))
    }

    fn detector(&self) -> Box<dyn LanguageDetector> {
        match &self.lang {
            Some(code) => Box::new(FixedLanguage::new(code.clone())),
            None => Box::new(WhatlangDetector::new()),
        }
    }
}

fn cmd_convert(input: &Path, output: Option<&Path>, args: &ConvertArgs) -> CliResult<()> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension("html"));
    let options = args.options()?;
    let detector = args.detector();

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Converting {}...", input.display()));

    let mut provider = options.json_provider(input);
    let result = Converter::new(detector.as_ref(), options).convert_to_file(&mut provider, &output);
    pb.finish_and_clear();
    let result = result?;

    println!("{} {}", "Saved to".green(), output.display());
    print_warnings(&result);
    if let Some(ref stats) = result.stats {
        println!();
        println!("{}", "Extraction Statistics".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        println!("{}", serde_json::to_string_pretty(stats)?);
    }

    Ok(())
}

fn cmd_batch(inputs: &[PathBuf], dir: &Path, args: &ConvertArgs) -> CliResult<()> {
    fs::create_dir_all(dir)?;
    let options = args.options()?;
    let detector = args.detector();
    let jobs: Vec<BatchJob> = inputs
        .iter()
        .map(|input| BatchJob::into_dir(input, dir))
        .collect();

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Converting {} documents...", jobs.len()));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let results = convert_batch(&jobs, detector.as_ref(), &options);
    pb.finish_and_clear();

    let mut failed = 0;
    for (job, result) in jobs.iter().zip(&results) {
        match result {
            Ok(result) => {
                println!("{} {}", "Converted".green(), job.output.display());
                print_warnings(result);
            }
            Err(e) => {
                failed += 1;
                println!("{} {}: {}", "Failed".red(), job.input.display(), e);
            }
        }
    }

    println!(
        "\n{} {} converted, {} failed",
        "Done!".green().bold(),
        results.len() - failed,
        failed
    );
    if failed > 0 {
        return Err(format!("{} of {} conversions failed", failed, results.len()).into());
    }
    Ok(())
}

fn print_warnings(result: &ConvertResult) {
    for warning in &result.warnings {
        println!("  {} {}", "warning:".yellow(), warning);
    }
}

fn cmd_info(input: &Path, flags: FlagMode) -> CliResult<()> {
    let doc = JsonProvider::from_path(input)
        .with_flag_layout(flags.into())
        .read_document()?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), doc.page_count());

    if let Some(ref title) = doc.metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    for (name, value) in doc.metadata.entries() {
        println!("{}: {}", capitalize(name).as_str().bold(), value);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let text = doc.plain_text();
    let blocks: usize = doc.pages.iter().map(|p| p.blocks.len()).sum();
    let spans: usize = doc.pages.iter().map(|p| p.span_count()).sum();
    let links: usize = doc.pages.iter().map(|p| p.links.len()).sum();
    let images: usize = doc.pages.iter().map(|p| p.images.len()).sum();

    println!("{}: {}", "Blocks".bold(), blocks);
    println!("{}: {}", "Spans".bold(), spans);
    println!("{}: {}", "Words".bold(), text.split_whitespace().count());
    println!("{}: {}", "Characters".bold(), text.chars().count());
    println!("{}: {}", "Links".bold(), links);
    println!("{}: {}", "Images".bold(), images);

    let (language, _) = WhatlangDetector::new().detect_or_unknown(&text);
    println!("{}: {}", "Language".bold(), language);

    Ok(())
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn cmd_version() {
    println!("{} {}", "pdfhtml".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Styled HTML reconstruction from PDF page snapshots");
    println!();
    println!("License: MIT");
}
