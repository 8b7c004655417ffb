// ABOUTME: Implementations of the show and probe subcommands
// ABOUTME: Bridges CLI options and config into preview settings and reports outcomes

use crate::config::Config;
use crate::conversion;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use termpreview::{
    Bitmap, EnvSnapshot, LogTrace, PreviewError, PreviewOrchestrator, PreviewSettings, Protocol,
    RendererOutput, TerminalCapabilities,
};

#[derive(Debug, Clone, Default)]
pub struct ShowOptions {
    pub file: PathBuf,
    pub cols: Option<u32>,
    pub rows: Option<u32>,
    /// Skip detection and use only this protocol
    pub protocol: Option<Protocol>,
    pub save_on_failure: bool,
    pub debug: bool,
    /// `Inherit` only when the preview is written to the real stdout
    pub renderer_output: RendererOutput,
}

#[derive(Debug)]
pub enum ShowResult {
    Delivered(Protocol),
    Failed {
        error: PreviewError,
        saved_to: Option<PathBuf>,
    },
}

/// Flags beat the config file; env placement overrides are applied by the orchestrator
pub fn build_settings(options: &ShowOptions, config: &Config) -> PreviewSettings {
    let mut settings = config.preview().to_settings();
    if let Some(cols) = options.cols {
        settings.placement.cols = cols;
    }
    if let Some(rows) = options.rows {
        settings.placement.rows = rows;
    }
    settings.sixel.output = options.renderer_output;
    settings
}

pub fn trace_enabled(cli_debug: bool, config: &Config) -> bool {
    cli_debug || config.preview().debug.unwrap_or(false) || EnvSnapshot::capture().debug_enabled()
}

pub fn show(options: &ShowOptions, config: &Config, out: &mut dyn Write) -> Result<ShowResult> {
    let bitmap = conversion::load_bitmap(&options.file)?;
    log::debug!(
        "previewing {} ({:?}, {})",
        options.file.display(),
        bitmap.encoding(),
        conversion::format_size(bitmap.len())
    );

    let orchestrator = PreviewOrchestrator::new(
        build_settings(options, config),
        LogTrace::new(trace_enabled(options.debug, config)),
    );

    let outcome = match options.protocol {
        Some(protocol) => orchestrator.preview_with_capabilities(
            &TerminalCapabilities::forced(protocol),
            &bitmap,
            out,
        ),
        None => orchestrator.preview(&bitmap, out),
    };

    match outcome.into_result() {
        Ok(protocol) => Ok(ShowResult::Delivered(protocol)),
        Err(error) => {
            let save = options.save_on_failure || config.preview().save_on_failure.unwrap_or(false);
            let saved_to = if save {
                Some(save_fallback(&bitmap, &options.file)?)
            } else {
                None
            };
            Ok(ShowResult::Failed { error, saved_to })
        }
    }
}

/// Keep the rendered PNG around when it could not be shown inline
pub fn save_fallback(bitmap: &Bitmap, source: &Path) -> Result<PathBuf> {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    let mut file = tempfile::Builder::new()
        .prefix(&format!("termpreview-{}-", stem))
        .suffix(".png")
        .tempfile()
        .context("Failed to create temporary PNG file")?;
    file.write_all(bitmap.as_bytes())
        .context("Failed to write temporary PNG file")?;

    let (_, path) = file.keep().context("Failed to keep temporary PNG file")?;
    Ok(path)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    pub terminal: String,
    pub kitty: bool,
    pub inline: bool,
    pub sixel: bool,
    pub supported: bool,
    pub preferred: Option<Protocol>,
}

impl From<&TerminalCapabilities> for ProbeReport {
    fn from(caps: &TerminalCapabilities) -> Self {
        Self {
            terminal: caps.terminal_name.clone(),
            kitty: caps.kitty,
            inline: caps.inline,
            sixel: caps.sixel,
            supported: caps.supported(),
            preferred: caps.preferred_protocol(),
        }
    }
}

impl ProbeReport {
    pub fn detect() -> Self {
        Self::from(&TerminalCapabilities::detect())
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        if pretty {
            Ok(serde_json::to_string_pretty(self)?)
        } else {
            Ok(serde_json::to_string(self)?)
        }
    }

    pub fn to_text(&self, use_color: bool) -> String {
        let flag = |enabled: bool| -> String {
            match (enabled, use_color) {
                (true, true) => "yes".green().to_string(),
                (false, true) => "no".dimmed().to_string(),
                (true, false) => "yes".to_string(),
                (false, false) => "no".to_string(),
            }
        };

        let preferred = self
            .preferred
            .map(|p| p.to_string())
            .unwrap_or_else(|| "none".to_string());

        format!(
            "terminal:  {}\nkitty:     {}\ninline:    {}\nsixel:     {}\npreferred: {}",
            self.terminal,
            flag(self.kitty),
            flag(self.inline),
            flag(self.sixel),
            preferred
        )
    }
}
