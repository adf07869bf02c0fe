use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use recolor_core::package::parts::PRESENTATION_PART;
use recolor_core::package::{PresentationRels, SlideLayoutRels, SlideRels};
use recolor_core::{inspect_runs, ColorScheme, Converter, ConverterSettings, OoxmlPackage, RunFill};

#[derive(Parser)]
#[command(name = "recolor")]
#[command(version, about = "Replace PPTX theme color references with literal RGB values", long_about = None)]
struct Cli {
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a copy of the presentation with every theme color flattened
    Convert {
        input: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the conversion report as JSON
        #[arg(long)]
        json: bool,

        /// JSON file with converter settings
        #[arg(long)]
        settings: Option<PathBuf>,
    },
    /// Show the color scheme of every theme part
    Themes { input: PathBuf },
    /// Show slide, layout and master relationships
    Rels { input: PathBuf },
    /// Show the fill and text of every run on every slide
    Runs { input: PathBuf },
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            json,
            settings,
        } => run_convert(&input, output, json, settings.as_deref()),
        Commands::Themes { input } => run_themes(&input),
        Commands::Rels { input } => run_rels(&input),
        Commands::Runs { input } => run_runs(&input),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn has_pptx_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pptx"))
}

/// `deck.pptx` becomes `deck<suffix>.pptx` in the same directory.
fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}{}.pptx", stem, suffix))
}

fn open_presentation(input: &Path) -> Result<OoxmlPackage, Box<dyn std::error::Error>> {
    if !has_pptx_extension(input) {
        return Err(format!("'{}' is not a .pptx file", input.display()).into());
    }
    Ok(OoxmlPackage::from_file(input)?)
}

fn run_convert(input: &Path, output: Option<PathBuf>, json: bool, settings: Option<&Path>) -> CliResult {
    let settings = match settings {
        Some(path) => ConverterSettings::from_json_file(path)?,
        None => ConverterSettings::default(),
    };
    let output = output.unwrap_or_else(|| default_output_path(input, &settings.output_suffix));

    let package = open_presentation(input)?;
    let conversion = Converter::new(settings).convert_package(&package)?;

    if let Err(e) = std::fs::write(&output, &conversion.output) {
        let _ = std::fs::remove_file(&output);
        return Err(e.into());
    }

    let report = &conversion.report;
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("Theme: {} ({})", report.theme_part, report.scheme_name);
        for slide in &report.slides {
            println!(
                "  {}: {} colors, {} fills{}",
                slide.part,
                slide.colors_replaced,
                slide.fills_injected,
                if slide.modified { "" } else { " (unchanged)" }
            );
            for reference in &slide.unresolved {
                println!("    unresolved: {}", reference);
            }
        }
        println!(
            "Wrote {} ({} of {} slides modified)",
            output.display(),
            report.slides_modified(),
            report.slides.len()
        );
    }
    Ok(())
}

fn run_themes(input: &Path) -> CliResult {
    let package = open_presentation(input)?;
    for part in package.theme_parts() {
        let scheme = ColorScheme::from_theme_xml(package.read_part(part)?)?;
        println!("{} ({})", part, scheme.name);
        for (slot, value) in scheme.iter() {
            println!("  {:<9} {}", slot.name(), value);
        }
    }
    Ok(())
}

fn run_rels(input: &Path) -> CliResult {
    let package = open_presentation(input)?;

    let presentation_set = package.read_relationships(PRESENTATION_PART)?;
    println!("{}", PRESENTATION_PART);
    for rel in presentation_set.relationships() {
        println!("  {:<8} {:<16} {}", rel.id, rel.rel_type, rel.target);
    }

    let presentation = PresentationRels::decode(&presentation_set)?;
    for slide in &presentation.slides {
        let slide_rels = SlideRels::decode(&package.read_relationships(slide)?)?;
        let layout_rels = SlideLayoutRels::decode(&package.read_relationships(&slide_rels.slide_layout)?)?;
        println!("{}", slide);
        println!("  -> {}", slide_rels.slide_layout);
        println!("     -> {}", layout_rels.slide_master);
    }
    Ok(())
}

fn run_runs(input: &Path) -> CliResult {
    let package = open_presentation(input)?;
    for part in package.slide_parts() {
        println!("{}", part);
        for run in inspect_runs(package.read_part(part)?)? {
            let fill = match &run.fill {
                RunFill::Scheme(name) => format!("scheme:{}", name),
                RunFill::Rgb(hex) => format!("rgb:{}", hex),
                RunFill::Other(kind) => kind.clone(),
                RunFill::None => "-".to_string(),
            };
            println!("  {:<16} {}", fill, run.text.as_deref().unwrap_or(""));
        }
    }
    Ok(())
}
