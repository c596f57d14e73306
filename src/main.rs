use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::Path;

use speclint_lib::config::{self as speclint_config, Config};
use speclint_lib::exit_codes::exit;
use speclint_lib::output::{self, OutputFormat};
use speclint_lib::rule::Rule;

mod file_processor;

#[derive(Parser)]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Control colored output: auto, always, never
    #[arg(long, global = true, default_value = "auto", value_parser = ["auto", "always", "never"])]
    color: String,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Ignore all configuration files and use built-in defaults
    #[arg(long, global = true)]
    no_config: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint Markdown spec documents
    Check(CheckArgs),
    /// Create a default .speclint.toml in the current directory
    Init,
    /// Show information about a rule or list all rules
    Rule {
        /// Rule code or alias (optional)
        rule: Option<String>,
    },
    /// Show the effective configuration
    Config {
        /// Show only the default configuration values
        #[arg(long)]
        defaults: bool,
    },
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Files or directories to lint
    #[arg(required = false)]
    paths: Vec<String>,

    /// Disable specific rules (comma-separated codes or aliases)
    #[arg(short, long)]
    disable: Option<String>,

    /// Enable only specific rules (comma-separated codes or aliases)
    #[arg(short, long)]
    enable: Option<String>,

    /// Exclude specific files or directories (comma-separated glob patterns)
    #[arg(long)]
    exclude: Option<String>,

    /// Disable all exclude patterns
    #[arg(long)]
    no_exclude: bool,

    /// Include only specific files or directories (comma-separated glob patterns)
    #[arg(long)]
    include: Option<String>,

    /// Respect .gitignore files when scanning directories
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    respect_gitignore: bool,

    /// Output format: text, json or github
    #[arg(long, short = 'o')]
    output_format: Option<String>,

    /// Read from stdin instead of files
    #[arg(long)]
    stdin: bool,

    /// Filename to use for stdin input (for per-file config and messages)
    #[arg(long)]
    stdin_filename: Option<String>,

    /// Print diagnostics, but nothing else
    #[arg(short, long)]
    quiet: bool,

    /// Show detailed output
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// Load configuration, exiting with a tool error on failure
fn load_config_or_exit(config_path: Option<&str>, no_config: bool, discovery_dir: &Path) -> (Config, Option<std::path::PathBuf>) {
    match speclint_config::load_config(config_path.map(Path::new), no_config, discovery_dir) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{}: {}", "Config error".red().bold(), e);
            exit::tool_error();
        }
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.color.as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => colored::control::unset_override(),
    }

    let verbose = matches!(&cli.command, Commands::Check(args) if args.verbose);
    init_logging(verbose);

    match cli.command {
        Commands::Check(args) => run_check(&args, cli.config.as_deref(), cli.no_config),
        Commands::Init => {
            let path = ".speclint.toml";
            match speclint_config::create_default_config(path) {
                Ok(()) => println!("Created default configuration file: {path}"),
                Err(e) => {
                    eprintln!("{}: {}", "Error".red().bold(), e);
                    exit::tool_error();
                }
            }
        }
        Commands::Rule { rule } => handle_rule_command(rule.as_deref()),
        Commands::Config { defaults } => {
            let rules = speclint_lib::rules::all_rules(&Config::default());
            let config = if defaults {
                Config::default()
            } else {
                let cwd = std::env::current_dir().unwrap_or_else(|_| ".".into());
                let (config, source) = load_config_or_exit(cli.config.as_deref(), cli.no_config, &cwd);
                if let Some(source) = source {
                    println!("# Loaded from {}\n", source.display());
                }
                config
            };

            match config.with_rule_defaults(&rules).to_toml_string() {
                Ok(toml) => print!("{toml}"),
                Err(e) => {
                    eprintln!("{}: {}", "Error".red().bold(), e);
                    exit::tool_error();
                }
            }
        }
    }
}

fn handle_rule_command(rule: Option<&str>) {
    let rules = speclint_lib::rules::all_rules(&Config::default());

    match rule {
        Some(query) => {
            let Some(code) = speclint_lib::rules::canonical_rule_name(query) else {
                eprintln!("{}: Rule '{}' not found", "Error".red().bold(), query);
                exit::tool_error();
            };
            if let Some(rule) = rules.iter().find(|r| r.name() == code) {
                print_rule(rule.as_ref());
                if let Some((_, toml::Value::Table(defaults))) = rule.default_config_section() {
                    println!("\nDefault configuration:");
                    for (key, value) in &defaults {
                        println!("  {key} = {value}");
                    }
                }
            }
        }
        None => {
            println!("{}", "Available rules:".bold());
            for rule in &rules {
                print_rule(rule.as_ref());
            }
        }
    }
}

fn print_rule(rule: &dyn Rule) {
    println!("  {} ({}) - {}", rule.name().green(), rule.alias().cyan(), rule.description());
}

fn run_check(args: &CheckArgs, config_path: Option<&str>, no_config: bool) {
    // Config is discovered from the first target path, falling back to the cwd
    let cwd = std::env::current_dir().unwrap_or_else(|_| ".".into());
    let discovery_dir = args
        .paths
        .first()
        .map(Path::new)
        .and_then(|first| {
            if first.is_dir() {
                Some(first.to_path_buf())
            } else {
                first.parent().filter(|p| p.is_dir()).map(Path::to_path_buf)
            }
        })
        .unwrap_or(cwd);
    let discovery_dir = discovery_dir.canonicalize().unwrap_or(discovery_dir);

    let (config, config_source) = load_config_or_exit(config_path, no_config, &discovery_dir);
    if let Some(source) = &config_source {
        log::debug!("Using config file {}", source.display());
    }

    let validation_warnings =
        speclint_config::validate_config(&config, &speclint_lib::rules::all_rules(&Config::default()));
    for warn in &validation_warnings {
        eprintln!("{} {}", "[config warning]".yellow(), warn.message);
    }

    let format_name = args.output_format.as_deref().or(config.global.output_format.as_deref());
    let format = match format_name.map(str::parse::<OutputFormat>) {
        None => OutputFormat::default(),
        Some(Ok(format)) => format,
        Some(Err(e)) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            exit::tool_error();
        }
    };

    let rules = file_processor::get_enabled_rules_from_checkargs(args, &config);

    let results = if args.stdin {
        match file_processor::process_stdin(args.stdin_filename.as_deref(), &rules, &config) {
            Ok(result) => vec![result],
            Err(e) => {
                eprintln!("{}: {:#}", "Error".red().bold(), e);
                exit::tool_error();
            }
        }
    } else {
        let files = match file_processor::find_markdown_files(&args.paths, args, &config) {
            Ok(files) => files,
            Err(e) => {
                eprintln!("{}: {:#}", "Error".red().bold(), e);
                exit::tool_error();
            }
        };

        if files.is_empty() {
            if !args.quiet && format == OutputFormat::Text {
                println!("No markdown files found to check.");
            }
            exit::success();
        }

        match file_processor::process_files(&files, &rules, &config) {
            Ok(results) => results,
            Err(e) => {
                eprintln!("{}: {:#}", "Error".red().bold(), e);
                exit::tool_error();
            }
        }
    };

    print!("{}", output::render(&results, format));

    let total_warnings: usize = results.iter().map(|r| r.warnings.len()).sum();
    let files_with_issues = results.iter().filter(|r| !r.warnings.is_empty()).count();

    if format == OutputFormat::Text && !args.quiet {
        println!("\n{}", output::summary(total_warnings, files_with_issues, results.len()));
    } else if format == OutputFormat::Json {
        println!();
    }

    if total_warnings > 0 {
        exit::violations_found();
    }
}
