//! Top-level CLI definition and dispatch.

use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell as CompletionShell, generate};
use colored::{Colorize, control};
use serde_json::{Value, json};
use thiserror::Error;

use app_drawer::catalog::file::CatalogFile;
use app_drawer::core::config::Config;
use app_drawer::core::errors::DrawerError;
use app_drawer::drawer::AppsList;
use app_drawer::sections::filter::TitleQueryFilter;
use app_drawer::sections::model::DisplayItem;

/// App Drawer: sectioned launcher list inspector.
#[derive(Debug, Parser)]
#[command(
    name = "app-drawer",
    author,
    version,
    about = "App Drawer - sectioned launcher list inspector",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Grid columns (overrides layout.columns).
    #[arg(long, global = true, value_name = "N")]
    columns: Option<usize>,
    /// Case-insensitive title query; hides headers and disables merging.
    #[arg(long, global = true, value_name = "QUERY")]
    filter: Option<String>,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Print the flat display list (headers and app slots).
    Layout(CatalogArgs),
    /// Print the fast-scroll anchors.
    FastScroll(FastScrollArgs),
    /// Print one summary line per section.
    Sections(CatalogArgs),
    /// View and validate configuration.
    Config(ConfigArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Args)]
struct CatalogArgs {
    /// JSON catalog file.
    #[arg(value_name = "CATALOG")]
    catalog: PathBuf,
}

#[derive(Debug, Clone, Args)]
struct FastScrollArgs {
    /// JSON catalog file.
    #[arg(value_name = "CATALOG")]
    catalog: PathBuf,
    /// Resolve a scrollbar touch (0.0 top, 1.0 bottom) to its anchor.
    #[arg(long, value_name = "FRACTION")]
    touch: Option<f32>,
}

#[derive(Debug, Clone, Args, Default)]
struct ConfigArgs {
    /// Config operation to run.
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Debug, Clone, Subcommand)]
enum ConfigCommand {
    /// Print resolved config file path.
    Path,
    /// Print effective merged configuration.
    Show,
    /// Validate configuration and exit.
    Validate,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input (bad flag value, bad catalog, bad config).
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Json(_) => 3,
        }
    }
}

impl From<DrawerError> for CliError {
    fn from(error: DrawerError) -> Self {
        if error.is_caller_error() {
            Self::User(error.to_string())
        } else {
            Self::Runtime(error.to_string())
        }
    }
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    match &cli.command {
        Command::Layout(args) => run_layout(cli, &args.catalog),
        Command::FastScroll(args) => run_fast_scroll(cli, args),
        Command::Sections(args) => run_sections(cli, &args.catalog),
        Command::Config(args) => run_config(cli, args),
        Command::Completions(args) => {
            let mut command = Cli::command();
            let binary_name = command.get_name().to_string();
            generate(args.shell, &mut command, binary_name, &mut io::stdout());
            Ok(())
        }
    }
}

/// Load config and catalog, apply global overrides, and build the list.
fn load_list(cli: &Cli, catalog_path: &Path) -> Result<AppsList, CliError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(columns) = cli.columns {
        config.layout.columns = columns;
        config.validate()?;
    }
    let catalog = CatalogFile::load(catalog_path)?;

    let mut list = AppsList::from_config(&config)?.with_ordering(catalog.ordering());
    list.set_apps(catalog.apps);
    if let Some(query) = cli.filter.as_deref() {
        list.set_filter(Some(Box::new(TitleQueryFilter::new(query)?)));
    }
    Ok(list)
}

fn run_layout(cli: &Cli, catalog_path: &Path) -> Result<(), CliError> {
    let list = load_list(cli, catalog_path)?;

    match output_mode(cli) {
        OutputMode::Human => {
            if list.has_empty_filtered_result() {
                println!("{}", "No apps match the filter.".dimmed());
                return Ok(());
            }
            let mut stdout = io::stdout().lock();
            for item in list.display_items() {
                match item {
                    DisplayItem::SectionHeader(header) => {
                        let name = list
                            .sections()
                            .get(header.section.0)
                            .map_or("", |section| section.name.as_str());
                        writeln!(stdout, "{:>4}  {}", header.position, name.bold().cyan())?;
                    }
                    DisplayItem::AppSlot(slot) => {
                        let Some(entry) = list.entry(slot) else {
                            continue;
                        };
                        writeln!(
                            stdout,
                            "{:>4}    {:<28} {} {}",
                            slot.position,
                            entry.title,
                            entry.component.to_string().dimmed(),
                            entry.user.to_string().dimmed(),
                        )?;
                    }
                }
            }
            writeln!(
                stdout,
                "{} apps, {} sections, {} columns",
                list.filtered_count(),
                list.sections().len(),
                list.columns()
            )?;
        }
        OutputMode::Json => {
            let mut items = Vec::with_capacity(list.display_items().len());
            for item in list.display_items() {
                let mut value = serde_json::to_value(item)?;
                if let DisplayItem::AppSlot(slot) = item
                    && let Some(entry) = list.entry(slot)
                    && let Value::Object(map) = &mut value
                {
                    map.insert("title".to_string(), json!(entry.title));
                    map.insert("component".to_string(), json!(entry.component));
                    map.insert("user".to_string(), json!(entry.user));
                }
                items.push(value);
            }
            let payload = json!({
                "command": "layout",
                "columns": list.columns(),
                "filtered": list.filtered_count(),
                "has_filter": list.has_filter(),
                "merged_sections": list.merged_sections(),
                "items": items,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

fn run_fast_scroll(cli: &Cli, args: &FastScrollArgs) -> Result<(), CliError> {
    if let Some(touch) = args.touch
        && !(0.0..=1.0).contains(&touch)
    {
        return Err(CliError::User(format!(
            "--touch must be within 0.0..=1.0, got {touch}"
        )));
    }
    let list = load_list(cli, &args.catalog)?;
    let index = list.fast_scroll_index();
    let target = args.touch.and_then(|touch| index.target_for(touch));

    match output_mode(cli) {
        OutputMode::Human => {
            for anchor in index.sections() {
                println!(
                    "{:>6.3}  {:<6} -> item {}",
                    anchor.fraction,
                    anchor.section_name.bold(),
                    anchor.target_item
                );
            }
            if let (Some(touch), Some(anchor)) = (args.touch, target) {
                println!(
                    "touch {touch:.3} jumps to {} (item {})",
                    anchor.section_name.green(),
                    anchor.target_item
                );
            }
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "fast-scroll",
                "sections": index.sections(),
                "touch": args.touch,
                "target": target,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

fn run_sections(cli: &Cli, catalog_path: &Path) -> Result<(), CliError> {
    let list = load_list(cli, catalog_path)?;

    match output_mode(cli) {
        OutputMode::Human => {
            for section in list.sections() {
                let header = section
                    .header_item
                    .map_or_else(|| "-".to_string(), |item| item.to_string());
                println!(
                    "{:<6} {:>4} apps  header {:>4}  first {:>4}  fraction {:.3}",
                    section.name.bold(),
                    section.num_apps,
                    header,
                    section
                        .first_app_item
                        .map_or_else(|| "-".to_string(), |item| item.to_string()),
                    section.fraction
                );
            }
            if list.merged_sections() > 0 {
                println!(
                    "{}",
                    format!("{} sections merged", list.merged_sections()).dimmed()
                );
            }
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "sections",
                "columns": list.columns(),
                "merged_sections": list.merged_sections(),
                "sections": list.sections(),
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

fn run_config(cli: &Cli, args: &ConfigArgs) -> Result<(), CliError> {
    match &args.command {
        None | Some(ConfigCommand::Path) => {
            let path = cli.config.clone().unwrap_or_else(Config::default_path);
            let exists = path.exists();

            match output_mode(cli) {
                OutputMode::Human => {
                    println!("{}", path.display());
                    if !exists {
                        println!("  (file does not exist; defaults will be used)");
                    }
                }
                OutputMode::Json => {
                    let payload = json!({
                        "command": "config path",
                        "path": path.to_string_lossy(),
                        "exists": exists,
                    });
                    write_json_line(&payload)?;
                }
            }
            Ok(())
        }
        Some(ConfigCommand::Show) => {
            let config = Config::load(cli.config.as_deref())?;

            match output_mode(cli) {
                OutputMode::Human => {
                    let toml_str = toml::to_string_pretty(&config)
                        .map_err(|e| CliError::Runtime(format!("serialize config: {e}")))?;
                    println!("{toml_str}");
                }
                OutputMode::Json => {
                    let payload = json!({
                        "command": "config show",
                        "config": serde_json::to_value(&config)?,
                    });
                    write_json_line(&payload)?;
                }
            }
            Ok(())
        }
        Some(ConfigCommand::Validate) => match Config::load(cli.config.as_deref()) {
            Ok(config) => {
                let hash = config.stable_hash()?;

                match output_mode(cli) {
                    OutputMode::Human => {
                        println!("{}", "Configuration is valid.".green());
                        println!("  Source: {}", config.paths.config_file.display());
                        println!("  Hash: {hash}");
                    }
                    OutputMode::Json => {
                        let payload = json!({
                            "command": "config validate",
                            "valid": true,
                            "path": config.paths.config_file.to_string_lossy(),
                            "hash": hash,
                        });
                        write_json_line(&payload)?;
                    }
                }
                Ok(())
            }
            Err(e) => {
                match output_mode(cli) {
                    OutputMode::Human => {
                        eprintln!("{} {e}", "Configuration is INVALID:".red());
                    }
                    OutputMode::Json => {
                        let payload = json!({
                            "command": "config validate",
                            "valid": false,
                            "code": e.code(),
                            "error": e.to_string(),
                        });
                        write_json_line(&payload)?;
                    }
                }
                Err(e.into())
            }
        },
    }
}

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("APP_DRAWER_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref(), io::stdout().is_terminal())
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>, stdout_is_tty: bool) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    let fallback = if stdout_is_tty {
        OutputMode::Human
    } else {
        OutputMode::Json
    };

    match env_mode
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => OutputMode::Json,
        Some("human") => OutputMode::Human,
        _ => fallback,
    }
}
