//! favtoggle - product catalog with toggleable favorite icons
//!
//! This is the main entry point for the favtoggle application.

mod catalog;
mod css;
mod gtk_host;
mod simulate;
pub mod styles;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use gtk4::Application;
use gtk4::prelude::*;
use tracing::{debug, error, info, warn};

use favtoggle_core::{Config, logging};

/// favtoggle - product catalog with toggleable favorite icons
#[derive(Parser, Debug)]
#[command(name = "favtoggle", version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (uses XDG lookup if not specified)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print example configuration and exit
    #[arg(long)]
    print_example_config: bool,

    /// Validate configuration and exit (returns non-zero on errors)
    #[arg(long)]
    check_config: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Click a product's favorite icon on a headless page and report each change
    Simulate {
        /// Zero-based index of the product in the catalog
        #[arg(short, long, default_value_t = 0)]
        product: usize,
        /// Number of clicks
        #[arg(short = 'n', long, default_value_t = 2)]
        clicks: u32,
        /// Print the final page markup
        #[arg(long)]
        markup: bool,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    logging::init(args.verbose);

    // --print-example-config needs neither a config file nor GTK
    if args.print_example_config {
        print!("{}", favtoggle_core::config::DEFAULT_CONFIG_TOML);
        return ExitCode::SUCCESS;
    }

    // If --config is specified, it must exist and be valid (no fallback)
    let load_result = match Config::find_and_load(args.config.as_deref()) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(ref source) = load_result.source {
        info!("Loaded configuration from {:?}", source);
    } else if load_result.used_defaults {
        warn!("Using default configuration (no config file found)");
    }

    let config = load_result.config;

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    debug!("Configuration validated successfully");

    if args.check_config {
        if let Some(ref source) = load_result.source {
            println!("Configuration valid: {}", source.display());
        } else {
            println!("Configuration valid (using defaults)");
        }
        if args.verbose > 0 {
            println!("\n{}", config.summary());
        }
        return ExitCode::SUCCESS;
    }

    if let Some(command) = args.command {
        return handle_command(command, &config);
    }

    info!(
        "Catalog: {} product(s), {} column(s)",
        config.catalog.products.len(),
        config.window.columns
    );

    run_gtk_app(config)
}

/// Handle CLI subcommands (these don't need GTK).
fn handle_command(command: Command, config: &Config) -> ExitCode {
    match command {
        Command::Simulate {
            product,
            clicks,
            markup,
        } => match simulate::run(config, product, clicks) {
            Ok(report) => {
                for line in &report.lines {
                    println!("{}", line);
                }
                if markup {
                    print!("\n{}", report.markup);
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

/// Initialize and run the GTK4 application.
fn run_gtk_app(config: Config) -> ExitCode {
    let app = Application::builder()
        .application_id("io.github.favtoggle")
        .flags(gtk4::gio::ApplicationFlags::NON_UNIQUE)
        .build();

    app.connect_startup(|_| {
        info!("GTK application starting up");
    });

    app.connect_activate(move |app| {
        info!("GTK application activated");

        css::load_css(&config);

        let window = catalog::build_window(app, &config);
        window.present();
    });

    app.connect_shutdown(|_| {
        info!("GTK application shutting down");
    });

    // Run the application with empty args (we already parsed with clap)
    let empty_args: Vec<String> = vec![];
    let status = app.run_with_args(&empty_args);

    if status == gtk4::glib::ExitCode::SUCCESS {
        ExitCode::SUCCESS
    } else {
        error!("GTK application exited with error");
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_simulate_defaults() {
        let args = Args::try_parse_from(["favtoggle", "simulate"]).unwrap();
        match args.command {
            Some(Command::Simulate {
                product,
                clicks,
                markup,
            }) => {
                assert_eq!(product, 0);
                assert_eq!(clicks, 2);
                assert!(!markup);
            }
            None => panic!("expected simulate subcommand"),
        }
    }

    #[test]
    fn test_parse_verbosity_and_config() {
        let args = Args::try_parse_from(["favtoggle", "-vv", "--config", "/tmp/c.toml"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/c.toml")));
        assert!(args.command.is_none());
    }
}
