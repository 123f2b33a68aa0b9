//! plenar CLI - plenary protocol extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use plenar::render::{self, TextOptions};
use plenar::{parse_file_with_options, BoilerplateMode, JsonFormat, ParseOptions, SegmentMode};

#[derive(Parser)]
#[command(name = "plenar")]
#[command(version)]
#[command(about = "Turn plenary protocol PDFs into structured JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse protocols to JSON
    Parse {
        /// Input PDF files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (stdout if not specified)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        options: PipelineArgs,
    },

    /// Print a plain-text transcript
    Text {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Leave out the agenda
        #[arg(long)]
        no_agenda: bool,

        /// Leave out interjections
        #[arg(long)]
        no_interjections: bool,

        #[command(flatten)]
        options: PipelineArgs,
    },

    /// Show session metadata and counts
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the session metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

/// Flags mapped onto `ParseOptions`.
#[derive(Args, Clone)]
struct PipelineArgs {
    /// Capture per-line offsets and interjection positions
    #[arg(long)]
    offsets: bool,

    /// Attach pipeline diagnostics
    #[arg(long)]
    debug: bool,

    /// Only accept bold speaker headers
    #[arg(long)]
    require_bold: bool,

    /// Reject member headers without a party
    #[arg(long)]
    require_party: bool,

    /// Disable header detection inside running text
    #[arg(long)]
    no_inline_headers: bool,

    /// Embed interjection positions instead of a separate list
    #[arg(long)]
    embed_offsets: bool,

    /// Drop interjection categories
    #[arg(long)]
    no_categories: bool,

    /// Keep physical page numbers
    #[arg(long)]
    physical_pages: bool,

    /// Also emit the partitioned contents listing
    #[arg(long)]
    toc_partition: bool,

    /// Pages searched for the contents heading
    #[arg(long, default_value = "3")]
    toc_pages: u32,

    /// Reflow speeches into paragraphs
    #[arg(long)]
    paragraphs: bool,

    /// Segment derivation
    #[arg(long, value_enum, default_value = "off")]
    segments: SegmentArg,

    /// Header and footer removal
    #[arg(long, value_enum, default_value = "both")]
    boilerplate: BoilerplateArg,

    /// Process pages sequentially
    #[arg(long)]
    sequential: bool,
}

impl PipelineArgs {
    fn to_options(&self) -> ParseOptions {
        let mut options = ParseOptions::new()
            .with_offsets(self.offsets)
            .with_debug(self.debug)
            .with_inline_headers(!self.no_inline_headers)
            .with_categories(!self.no_categories)
            .with_printed_page_numbers(!self.physical_pages)
            .with_toc_partition(self.toc_partition)
            .with_toc_search_pages(self.toc_pages)
            .with_reflow(self.paragraphs)
            .with_segments(self.segments.into())
            .with_boilerplate(self.boilerplate.into())
            .with_parallel(!self.sequential);

        if self.embed_offsets {
            options = options
                .with_externalized_offsets(false)
                .with_compact_interjections(false);
        }
        if self.require_bold {
            options = options.require_bold();
        }
        if self.require_party {
            options = options.require_party();
        }
        options
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum SegmentArg {
    /// No segments
    Off,
    /// Segments without numbers
    Plain,
    /// Number every segment
    All,
    /// Number interjections only
    Interjections,
}

impl From<SegmentArg> for SegmentMode {
    fn from(arg: SegmentArg) -> Self {
        match arg {
            SegmentArg::Off => SegmentMode::Off,
            SegmentArg::Plain => SegmentMode::Plain,
            SegmentArg::All => SegmentMode::All,
            SegmentArg::Interjections => SegmentMode::InterjectionsOnly,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum BoilerplateArg {
    /// Keep every line
    Off,
    /// Repeated edge lines only
    Frequency,
    /// Header and closing patterns only
    Patterns,
    /// Both passes
    Both,
}

impl From<BoilerplateArg> for BoilerplateMode {
    fn from(arg: BoilerplateArg) -> Self {
        match arg {
            BoilerplateArg::Off => BoilerplateMode::Off,
            BoilerplateArg::Frequency => BoilerplateMode::Frequency,
            BoilerplateArg::Patterns => BoilerplateMode::Patterns,
            BoilerplateArg::Both => BoilerplateMode::Both,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse {
            inputs,
            output,
            compact,
            options,
        } => cmd_parse(&inputs, output.as_deref(), compact, &options),
        Commands::Text {
            input,
            output,
            no_agenda,
            no_interjections,
            options,
        } => cmd_text(&input, output.as_deref(), no_agenda, no_interjections, &options),
        Commands::Info { input, json } => cmd_info(&input, json),
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

fn json_path(output_dir: &Path, input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    output_dir.join(format!("{}.json", stem))
}

fn cmd_parse(
    inputs: &[PathBuf],
    output: Option<&Path>,
    compact: bool,
    args: &PipelineArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let Some(output_dir) = output else {
        // Without an output directory everything goes to stdout.
        for input in inputs {
            let protocol = parse_file_with_options(input, args.to_options())?;
            println!("{}", render::to_json(&protocol, format)?);
        }
        return Ok(());
    };

    fs::create_dir_all(output_dir)?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut failures = Vec::new();
    for input in inputs {
        pb.set_message(input.display().to_string());
        match parse_file_with_options(input, args.to_options()) {
            Ok(protocol) => {
                let json = render::to_json(&protocol, format)?;
                fs::write(json_path(output_dir, input), json)?;
            }
            Err(e) => {
                log::warn!("Skipping {}: {}", input.display(), e);
                failures.push((input.clone(), e));
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    println!(
        "\n{} {} of {} protocols written to {}",
        "Parsed".green().bold(),
        inputs.len() - failures.len(),
        inputs.len(),
        output_dir.display()
    );
    for (input, e) in &failures {
        println!("  {} {}: {}", "✗".red(), input.display(), e);
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(format!("{} of {} files failed", failures.len(), inputs.len()).into())
    }
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    no_agenda: bool,
    no_interjections: bool,
    args: &PipelineArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = args.to_options();
    let use_paragraphs = options.reflow_paragraphs;
    let protocol = parse_file_with_options(input, options)?;

    let text_options = TextOptions {
        include_agenda: !no_agenda,
        include_interjections: !no_interjections,
        use_paragraphs,
    };
    let text = render::to_text(&protocol, &text_options)?;

    if let Some(path) = output {
        fs::write(path, &text)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", text);
    }

    Ok(())
}

fn cmd_info(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let options = ParseOptions::new().with_debug(true);
    let protocol = parse_file_with_options(input, options)?;
    let session = &protocol.session;

    if json {
        println!("{}", serde_json::to_string_pretty(session)?);
        return Ok(());
    }

    println!("{}", "Session".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if let Some(period) = session.legislative_period {
        println!("{}: {}", "Legislative period".bold(), period);
    }
    if let Some(number) = session.number {
        println!("{}: {}", "Session".bold(), number);
    }
    if let Some(date) = session.date {
        println!("{}: {}", "Date".bold(), date);
    }
    if let Some(ref location) = session.location {
        println!("{}: {}", "Location".bold(), location);
    }
    if let Some(start) = session.start_time {
        println!("{}: {}", "Start".bold(), start);
    }
    if let Some(recess) = session.recess_interval {
        println!("{}: {}", "Recess".bold(), recess);
    }
    if let Some(end) = session.end_time {
        println!("{}: {}", "End".bold(), end);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let linked: usize = protocol
        .agenda_items
        .iter()
        .map(|item| item.linked_speech_indices.len())
        .sum();
    println!("{}: {}", "Agenda items".bold(), protocol.agenda_items.len());
    println!("{}: {}", "Speeches".bold(), protocol.speeches.len());
    println!("{}: {}", "Linked speeches".bold(), linked);
    println!("{}: {}", "Interjections".bold(), protocol.interjection_count());

    if let Some(ref diagnostics) = protocol.diagnostics {
        let two_column = diagnostics
            .pages
            .iter()
            .filter(|p| p.layout == plenar::model::LayoutKind::TwoColumn)
            .count();
        println!("{}: {}", "Pages".bold(), diagnostics.pages.len());
        println!("{}: {}", "Two-column pages".bold(), two_column);
        println!(
            "{}: {}",
            "Boilerplate lines removed".bold(),
            diagnostics.boilerplate.lines_removed
        );
        if let Some(offset) = diagnostics.page_offset {
            println!("{}: {:+}", "Printed page offset".bold(), offset);
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "plenar".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Plenary protocol extraction tool");
    println!();
    println!("License: MIT");
}
