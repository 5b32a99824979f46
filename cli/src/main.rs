//! cvdocx CLI - CV record to Word document export
//!
//! Reads a CV record as JSON, optionally with a photo file, and writes a
//! formatted `.docx`. Also renders previews and inspects exported files.

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use cvdocx::render::{JsonFormat, PreviewTheme, RenderOptions};
use cvdocx::{CvRecord, ExportOptions, HighlightMode, SectionKind};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "CVDOCX_LOG";

/// Export structured CV records to Word documents
#[derive(Parser)]
#[command(
    name = "cvdocx",
    author = "iyulab",
    version,
    about = "Export CV records to Word documents",
    long_about = "cvdocx - Export structured CV records to formatted Word (.docx) documents.\n\n\
                  Reads a CV record as JSON (use `cvdocx sample` for the shape) and an optional photo."
)]
struct Cli {
    /// Log debug output to stderr (overridden by CVDOCX_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a CV record to .docx
    Export {
        /// Record JSON file ("-" for stdin)
        input: PathBuf,

        /// Photo file (PNG, JPEG, GIF, BMP or WebP)
        #[arg(short, long)]
        photo: Option<PathBuf>,

        /// Output file path (default: <Name>_CV.docx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Leave the photo out
        #[arg(long)]
        no_photo: bool,

        /// Longer side of the photo in inches
        #[arg(long, default_value = "1.2")]
        photo_max_inches: f64,

        /// Separator between contact fields
        #[arg(long, default_value = " | ")]
        separator: String,

        /// Generate highlights for experience entries that have none
        #[arg(long, value_name = "MODE")]
        expand_highlights: Option<HighlightArg>,
    },

    /// Render an HTML preview of a CV record
    Preview {
        /// Record JSON file ("-" for stdin)
        input: PathBuf,

        /// Photo file
        #[arg(short, long)]
        photo: Option<PathBuf>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Preview theme
        #[arg(long, default_value = "modern")]
        theme: ThemeArg,

        /// Accent color for the modern theme (#rrggbb)
        #[arg(long)]
        accent: Option<String>,

        /// Generate highlights for experience entries that have none
        #[arg(long, value_name = "MODE")]
        expand_highlights: Option<HighlightArg>,
    },

    /// Render a CV record as plain text
    Text {
        /// Record JSON file ("-" for stdin)
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the sections of an exported .docx
    Inspect {
        /// Input .docx file
        input: PathBuf,

        /// Dump the document model as JSON
        #[arg(long)]
        json: bool,

        /// Output compact JSON (no indentation)
        #[arg(long, requires = "json")]
        compact: bool,
    },

    /// Print a sample record as JSON
    Sample {
        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

/// Preview theme
#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    /// Card layout with an accent color
    Modern,
    /// Black-on-white serif layout
    Classic,
}

impl From<ThemeArg> for PreviewTheme {
    fn from(theme: ThemeArg) -> Self {
        match theme {
            ThemeArg::Modern => PreviewTheme::Modern,
            ThemeArg::Classic => PreviewTheme::Classic,
        }
    }
}

/// Highlight generation mode
#[derive(Clone, Copy, ValueEnum)]
enum HighlightArg {
    /// One bullet per description line
    Raw,
    /// Achievement bullets built from the description
    Expanded,
}

impl From<HighlightArg> for HighlightMode {
    fn from(mode: HighlightArg) -> Self {
        match mode {
            HighlightArg::Raw => HighlightMode::Raw,
            HighlightArg::Expanded => HighlightMode::Expanded,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "cvdocx=debug" } else { "cvdocx=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    // Ignore a second init (tests run `run` repeatedly).
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Export {
            input,
            photo,
            output,
            no_photo,
            photo_max_inches,
            separator,
            expand_highlights,
        } => {
            let mut record = load_record(&input, photo.as_deref())?;
            if let Some(mode) = expand_highlights {
                record.fill_highlights(mode.into());
            }
            let options = ExportOptions::new()
                .with_photo(!no_photo)
                .with_photo_max_inches(photo_max_inches)
                .with_contact_separator(separator);

            let pb = create_spinner("Building document...");
            let result = cvdocx::export_with_options(&record, &options);
            pb.finish_and_clear();

            let bytes = match result {
                Ok(bytes) => bytes,
                Err(e) if e.is_photo_error() => {
                    return Err(format!("{} (use --no-photo to export without it)", e).into())
                }
                Err(e) => return Err(e.into()),
            };

            let path = output.unwrap_or_else(|| PathBuf::from(cvdocx::suggested_filename(&record)));
            fs::write(&path, &bytes)?;
            println!(
                "{} Exported {} ({} bytes)",
                "✓".green().bold(),
                path.display(),
                bytes.len()
            );
        }

        Commands::Preview {
            input,
            photo,
            output,
            theme,
            accent,
            expand_highlights,
        } => {
            let mut record = load_record(&input, photo.as_deref())?;
            if let Some(mode) = expand_highlights {
                record.fill_highlights(mode.into());
            }
            let doc = cvdocx::compose(&record, &ExportOptions::default())?;

            let mut options = RenderOptions::new().with_theme(theme.into());
            if let Some(ref accent) = accent {
                options = options.with_accent(accent);
                if options.accent != normalize_accent(accent) {
                    eprintln!(
                        "{} Ignoring invalid accent color: {}",
                        "!".yellow().bold(),
                        accent
                    );
                }
            }

            let html = cvdocx::render::to_html(&doc, &options)?;
            write_output(output.as_ref(), &html)?;

            if let Some(path) = output {
                println!("{} Wrote preview: {}", "✓".green().bold(), path.display());
            }
        }

        Commands::Text { input, output } => {
            let record = load_record(&input, None)?;
            let doc = cvdocx::compose(&record, &ExportOptions::default().with_photo(false))?;
            let text = cvdocx::render::to_text(&doc, &RenderOptions::default())?;
            write_output(output.as_ref(), &text)?;

            if let Some(path) = output {
                println!("{} Converted to text: {}", "✓".green().bold(), path.display());
            }
        }

        Commands::Inspect {
            input,
            json,
            compact,
        } => {
            let pb = create_spinner("Reading document...");
            let doc = cvdocx::DocxReader::open(&input)?.read()?;
            pb.finish_and_clear();

            if json {
                let format = if compact {
                    JsonFormat::Compact
                } else {
                    JsonFormat::Pretty
                };
                write_output(None, &cvdocx::render::to_json(&doc, format)?)?;
                return Ok(());
            }

            println!("{}", "Document Information".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "File".bold(),
                input.file_name().unwrap_or_default().to_string_lossy()
            );
            if let Some(ref title) = doc.metadata.title {
                println!("{}: {}", "Title".bold(), title);
            }
            if let Some(ref author) = doc.metadata.author {
                println!("{}: {}", "Author".bold(), author);
            }
            println!("{}: {}", "Resources".bold(), doc.resources.len());

            println!("\n{}", "Sections".cyan().bold());
            println!("{}", "─".repeat(40));
            for section in &doc.sections {
                println!(
                    "{:<12} {} blocks",
                    section_label(section.kind).bold(),
                    section.len()
                );
            }

            let text = doc.plain_text();
            println!("\n{}: {}", "Words".bold(), text.split_whitespace().count());
        }

        Commands::Sample { output } => {
            let json = CvRecord::sample().to_json()?;
            write_output(output.as_ref(), &json)?;
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

/// Read a record from a JSON file (or stdin) and attach the photo, if any.
fn load_record(input: &Path, photo: Option<&Path>) -> Result<CvRecord, Box<dyn std::error::Error>> {
    tracing::debug!(input = %input.display(), photo = photo.is_some(), "Loading record");
    let json = if input == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(input)
            .map_err(|e| format!("cannot read {}: {}", input.display(), e))?
    };

    let mut record = CvRecord::from_json(&json)?;
    if let Some(path) = photo {
        let data = fs::read(path).map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
        record = record.with_photo(data);
    }
    Ok(record)
}

fn normalize_accent(accent: &str) -> String {
    format!("#{}", accent.trim().trim_start_matches('#').to_lowercase())
}

fn section_label(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Header => "Header",
        SectionKind::Photo => "Photo",
        SectionKind::Summary => "Summary",
        SectionKind::Skills => "Skills",
        SectionKind::Experience => "Experience",
        SectionKind::Education => "Education",
    }
}

fn print_version() {
    println!("{} {}", "cvdocx".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Export structured CV records to Word documents");
    println!();
    println!("Output format: DOCX (Office Open XML)");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_sample(dir: &Path) -> PathBuf {
        let path = dir.join("record.json");
        fs::write(&path, CvRecord::sample().to_json().unwrap()).unwrap();
        path
    }

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_export_defaults() {
        let cli = Cli::parse_from(["cvdocx", "export", "record.json"]);
        match cli.command {
            Commands::Export {
                photo_max_inches,
                separator,
                no_photo,
                ..
            } => {
                assert_eq!(photo_max_inches, 1.2);
                assert_eq!(separator, " | ");
                assert!(!no_photo);
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn test_export_writes_docx() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path());
        let output = dir.path().join("out.docx");

        let cli = Cli::parse_from([
            "cvdocx",
            "export",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ]);
        run(cli).unwrap();

        let bytes = fs::read(&output).unwrap();
        assert_eq!(&bytes[..2], b"PK");
        let doc = cvdocx::inspect(&bytes).unwrap();
        assert!(doc.has_section(SectionKind::Experience));
    }

    #[test]
    fn test_export_expands_highlights() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("record.json");
        fs::write(
            &input,
            r#"{"full_name": "Ada", "experience": [{"role": "Engineer", "description": "Wrote the scheduler\nCut build times"}]}"#,
        )
        .unwrap();
        let output = dir.path().join("out.docx");

        let cli = Cli::parse_from([
            "cvdocx",
            "export",
            input.to_str().unwrap(),
            "--expand-highlights",
            "raw",
            "-o",
            output.to_str().unwrap(),
        ]);
        run(cli).unwrap();

        let doc = cvdocx::inspect(&fs::read(&output).unwrap()).unwrap();
        let bullets: Vec<String> = doc
            .section(SectionKind::Experience)
            .unwrap()
            .paragraphs()
            .filter(|p| p.is_list_item())
            .map(|p| p.plain_text())
            .collect();
        assert_eq!(bullets, vec!["Wrote the scheduler.", "Cut build times."]);
    }

    #[test]
    fn test_export_bad_photo_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path());
        let photo = dir.path().join("photo.png");
        fs::write(&photo, b"not a png").unwrap();
        let output = dir.path().join("out.docx");

        let cli = Cli::parse_from([
            "cvdocx",
            "export",
            input.to_str().unwrap(),
            "--photo",
            photo.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ]);
        let err = run(cli).unwrap_err();
        assert!(err.to_string().contains("--no-photo"));
        assert!(!output.exists());
    }

    #[test]
    fn test_preview_writes_html() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path());
        let output = dir.path().join("preview.html");

        let cli = Cli::parse_from([
            "cvdocx",
            "preview",
            input.to_str().unwrap(),
            "--theme",
            "classic",
            "-o",
            output.to_str().unwrap(),
        ]);
        run(cli).unwrap();

        let html = fs::read_to_string(&output).unwrap();
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("Jojo Montford"));
    }

    #[test]
    fn test_load_record_missing_file() {
        let err = load_record(Path::new("does-not-exist.json"), None).unwrap_err();
        assert!(err.to_string().contains("does-not-exist.json"));
    }
}
