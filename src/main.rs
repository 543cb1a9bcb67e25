//! Fitplan - personal-trainer wizard for your terminal.
//!
//! Asks three questions and turns the answers into a generated, validated
//! workout plan.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fitplan::core::{Choice, CompletePreferences, Config, ImageRef, Locale, WorkoutPlan};
use fitplan::tui::Theme;
use fitplan::{plan_once, tui, App, ExperienceLevel, FitnessGoal, GeminiGateway, MuscleGroup};

/// Personal-trainer wizard for your terminal
#[derive(Parser)]
#[command(name = "fitplan")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of the usual lookup
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Screen and plan language (pt-BR, en)
    #[arg(short, long, global = true)]
    locale: Option<Locale>,

    /// Write interactive-mode logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive wizard (default)
    Run,

    /// Generate one plan without the interactive wizard
    Plan {
        /// Experience level
        #[arg(long, value_enum)]
        level: ExperienceLevel,

        /// Training goal
        #[arg(long, value_enum)]
        goal: FitnessGoal,

        /// Target muscle group
        #[arg(long, value_enum)]
        muscle: MuscleGroup,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Also generate exercise illustrations
        #[arg(long)]
        images: bool,
    },

    /// List the accepted values for --level, --goal, --muscle and the themes
    Options,

    /// Show configuration
    Config {
        /// Show config file path
        #[arg(long)]
        path: bool,

        /// Write the current configuration to the config file
        #[arg(long, conflicts_with = "path")]
        init: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _ = dotenvy::dotenv();

    let interactive = matches!(cli.command, None | Some(Commands::Run));
    init_logging(cli.verbose, interactive, cli.log_file.as_deref());

    // `config --path` and `config --init` may name a file that does not exist yet
    let skip_load = match cli.command {
        Some(Commands::Config { path: true, .. }) => true,
        Some(Commands::Config { init: true, .. }) => {
            cli.config.as_deref().is_some_and(|path| !path.exists())
        }
        _ => false,
    };
    let mut config =
        if skip_load { Config::default() } else { Config::load(cli.config.as_deref())? };
    if let Some(locale) = cli.locale {
        config.general.locale = locale;
    }

    match cli.command {
        None | Some(Commands::Run) => {
            cmd_run(config)?;
        }
        Some(Commands::Plan { level, goal, muscle, format, images }) => {
            let preferences = CompletePreferences { level, goal, muscle_group: muscle };
            cmd_plan(&config, preferences, format, images)?;
        }
        Some(Commands::Options) => {
            cmd_options(config.general.locale);
        }
        Some(Commands::Config { path, init }) => {
            cmd_config(&config, cli.config.as_deref(), path, init)?;
        }
        Some(Commands::Completions { shell }) => {
            cmd_completions(shell);
        }
    }

    Ok(())
}

/// Setup logging.
///
/// The wizard owns the terminal, so interactive runs log to a file; every
/// other command logs to stderr.
fn init_logging(verbose: bool, interactive: bool, log_file: Option<&Path>) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let (stderr_layer, file_layer) = if interactive {
        let file = log_file
            .map(Path::to_path_buf)
            .or_else(|| Config::data_dir().map(|d| d.join("fitplan.log")))
            .and_then(|path| open_log_file(&path));
        let layer = file.map(|file| {
            fmt::layer().with_target(false).with_ansi(false).with_writer(Mutex::new(file))
        });
        (None, layer)
    } else {
        (Some(fmt::layer().with_target(false).with_writer(io::stderr)), None)
    };

    tracing_subscriber::registry().with(stderr_layer).with(file_layer).with(filter).init();
}

fn open_log_file(path: &Path) -> Option<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}

/// Run the interactive wizard.
fn cmd_run(config: Config) -> Result<()> {
    let gateway = GeminiGateway::from_config(&config)?;
    if !gateway.has_api_key() {
        tracing::warn!(env = %config.ai.api_key_env, "No API key found; generation will fail");
    }

    let runtime = tokio::runtime::Runtime::new()?;
    let app = App::new(config, Arc::new(gateway), runtime.handle().clone());
    tui::run_tui(app)?;

    // Abandon illustrations still in flight
    runtime.shutdown_background();
    Ok(())
}

/// Generate one plan and print it.
fn cmd_plan(
    config: &Config,
    preferences: CompletePreferences,
    format: OutputFormat,
    images: bool,
) -> Result<()> {
    let gateway = GeminiGateway::from_config(config)?;
    let runtime = tokio::runtime::Runtime::new()?;

    let plan =
        runtime.block_on(plan_once(&gateway, config.general.locale, preferences, images))?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&plan)?;
            println!("{json}");
        }
        OutputFormat::Text => print_plan(&plan, config.general.locale, images),
    }

    Ok(())
}

fn print_plan(plan: &WorkoutPlan, locale: Locale, images: bool) {
    use fitplan::core::Text;

    println!("{}", plan.title);
    println!("{}\n", plan.description);
    println!("⏱  {}", plan.estimated_duration);
    println!("📅 {}\n", plan.frequency_recommendation);

    println!("{}:", locale.text(Text::Warmup));
    for item in &plan.warmup {
        println!("  • {item}");
    }

    println!("\n{}:", locale.text(Text::MainWorkout));
    for (i, exercise) in plan.exercises.iter().enumerate() {
        println!("  {}. {}", i + 1, exercise.name);
        println!(
            "     {}: {}  {}: {}  {}: {}",
            locale.text(Text::Sets),
            exercise.sets,
            locale.text(Text::Reps),
            exercise.reps,
            locale.text(Text::Rest),
            exercise.rest
        );
        println!("     {}", exercise.notes);
        if images {
            let status = exercise
                .image
                .as_ref()
                .map_or_else(|| locale.text(Text::ImageUnavailable).to_string(), describe_image);
            println!("     🖼  {status}");
        }
    }

    println!("\n{}:", locale.text(Text::Cooldown));
    for item in &plan.cooldown {
        println!("  • {item}");
    }
}

fn describe_image(image: &ImageRef) -> String {
    format!("image/png, {} bytes", image.byte_len())
}

/// List option identifiers with their labels, and the built-in themes.
fn cmd_options(locale: Locale) {
    fn section<C: Choice + std::fmt::Display>(flag: &str, locale: Locale) {
        println!("--{flag}");
        for option in C::ALL {
            println!("  {:<14} {}", option.to_string(), option.label(locale));
        }
        println!();
    }

    section::<ExperienceLevel>("level", locale);
    section::<FitnessGoal>("goal", locale);
    section::<MuscleGroup>("muscle", locale);

    println!("[ui] theme");
    for name in Theme::available_themes() {
        println!("  {name}");
    }
}

/// Show configuration.
///
/// `--path` and `--init` use the file given with `--config` when there is
/// one, otherwise the global config file.
fn cmd_config(config: &Config, explicit: Option<&Path>, show_path: bool, init: bool) -> Result<()> {
    let target = explicit.map(Path::to_path_buf).or_else(Config::global_path);

    if show_path {
        if let Some(path) = target {
            println!("{}", path.display());
        }
        return Ok(());
    }

    if init {
        let path = match target {
            Some(path) => {
                config.save_to(&path)?;
                path
            }
            None => config.save()?,
        };
        println!("Wrote {}", path.display());
        return Ok(());
    }

    print!("{}", config.to_toml()?);
    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "fitplan", &mut io::stdout());
}
