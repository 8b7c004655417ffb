// ABOUTME: Main entry point for the termpreview application
// ABOUTME: Shows images inline via Kitty, OSC-1337 or Sixel and reports terminal capabilities

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;
use termpreview::{EnvSnapshot, Protocol, RendererOutput};
use termpreview_cli::cli_output::CliOutput;
use termpreview_cli::commands::{self, ProbeReport, ShowOptions, ShowResult};
use termpreview_cli::config::Config;

#[derive(Parser)]
#[command(name = "termpreview")]
#[command(about = "Preview images inline in the terminal", long_about = None)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log protocol detection and fallback decisions (same as PREVIEW_DEBUG=1)
    #[arg(long, global = true)]
    debug: bool,

    /// Read configuration from this file instead of the standard locations
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display an image inline
    Show {
        /// Image file (any format the image crate decodes)
        file: PathBuf,

        /// Kitty placement width in cells
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        cols: Option<u32>,

        /// Kitty placement height in cells
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        rows: Option<u32>,

        /// Protocol to use; auto detects and falls back
        #[arg(long, value_enum, default_value = "auto")]
        protocol: ProtocolChoice,

        /// Write the PNG to a temporary file when the preview fails
        #[arg(long)]
        save_on_failure: bool,
    },
    /// Show which image protocols the terminal appears to support
    Probe {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Pretty print JSON output
        #[arg(long, requires = "json")]
        pretty: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProtocolChoice {
    Auto,
    Kitty,
    Inline,
    Sixel,
}

impl ProtocolChoice {
    fn forced(self) -> Option<Protocol> {
        match self {
            ProtocolChoice::Auto => None,
            ProtocolChoice::Kitty => Some(Protocol::Kitty),
            ProtocolChoice::Inline => Some(Protocol::Inline),
            ProtocolChoice::Sixel => Some(Protocol::Sixel),
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from_file(path),
        None => Config::load(),
    }
}

fn init_logging(debug: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if debug {
        builder.filter_module("termpreview", LevelFilter::Debug);
    }
    builder.init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config errors are reported after logging is up
    let config = load_config(cli.config.as_ref());
    let debug = match &config {
        Ok(config) => commands::trace_enabled(cli.debug, config),
        Err(_) => cli.debug || EnvSnapshot::capture().debug_enabled(),
    };
    init_logging(debug);

    let output = if cli.no_color {
        CliOutput::with_color(false)
    } else {
        CliOutput::new()
    };

    let config = match config {
        Ok(config) => config,
        Err(err) => {
            output.error(&format!("Failed to load configuration: {:#}", err));
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Show {
            file,
            cols,
            rows,
            protocol,
            save_on_failure,
        } => {
            let options = ShowOptions {
                file,
                cols,
                rows,
                protocol: protocol.forced(),
                save_on_failure,
                debug,
                // Renderers draw straight onto the terminal
                renderer_output: RendererOutput::Inherit,
            };

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            match commands::show(&options, &config, &mut out)? {
                ShowResult::Delivered(protocol) => {
                    log::debug!("delivered via {}", protocol);
                }
                ShowResult::Failed { error, saved_to } => {
                    // A failed preview is reported, never fatal
                    output.preview_failure(&error);
                    if let Some(path) = saved_to {
                        output.info(&format!("image written to {}", path.display()));
                    }
                }
            }
        }
        Commands::Probe { json, pretty } => {
            let report = ProbeReport::detect();
            if json {
                println!("{}", report.to_json(pretty)?);
            } else {
                println!("{}", report.to_text(output.use_color()));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "termpreview");
        assert!(cli.find_subcommand("show").is_some());
        assert!(cli.find_subcommand("probe").is_some());
    }

    #[test]
    fn test_parse_show_command() {
        let cli = Cli::try_parse_from(["termpreview", "show", "cat.png"]).unwrap();
        match cli.command {
            Commands::Show {
                file,
                cols,
                rows,
                protocol,
                save_on_failure,
            } => {
                assert_eq!(file, PathBuf::from("cat.png"));
                assert_eq!(cols, None);
                assert_eq!(rows, None);
                assert_eq!(protocol, ProtocolChoice::Auto);
                assert!(!save_on_failure);
            }
            _ => panic!("expected show"),
        }

        let cli = Cli::try_parse_from([
            "termpreview",
            "--debug",
            "show",
            "cat.png",
            "--cols",
            "80",
            "--rows",
            "24",
            "--protocol",
            "sixel",
            "--save-on-failure",
        ])
        .unwrap();
        assert!(cli.debug);
        match cli.command {
            Commands::Show {
                cols,
                rows,
                protocol,
                save_on_failure,
                ..
            } => {
                assert_eq!(cols, Some(80));
                assert_eq!(rows, Some(24));
                assert_eq!(protocol.forced(), Some(Protocol::Sixel));
                assert!(save_on_failure);
            }
            _ => panic!("expected show"),
        }
    }

    #[test]
    fn test_zero_cells_rejected() {
        assert!(Cli::try_parse_from(["termpreview", "show", "a.png", "--cols", "0"]).is_err());
        assert!(Cli::try_parse_from(["termpreview", "show", "a.png", "--rows", "-3"]).is_err());
    }

    #[test]
    fn test_parse_probe_command() {
        let cli = Cli::try_parse_from(["termpreview", "probe", "--json", "--pretty"]).unwrap();
        match cli.command {
            Commands::Probe { json, pretty } => {
                assert!(json);
                assert!(pretty);
            }
            _ => panic!("expected probe"),
        }

        // Pretty requires json
        assert!(Cli::try_parse_from(["termpreview", "probe", "--pretty"]).is_err());
    }
}
