// ABOUTME: Terminal capability detection for inline image protocol support
// ABOUTME: Classifies the terminal as Kitty, OSC-1337 inline and/or Sixel capable from env vars

use crate::constants::env_vars;
use crate::env::EnvSnapshot;
use crate::types::Protocol;
use serde::Serialize;

/// TERM_PROGRAM values of terminals implementing the iTerm2-style inline file OSC
const INLINE_TERM_PROGRAMS: &[&str] = &[
    "iTerm.app",
    "WezTerm",
    "Warp",
    "Hyper",
    "vscode",
    "VSCode",
    "Tabby",
    "Bobcat",
];

const KITTY_TERM_HINTS: &[&str] = &["kitty", "ghostty", "ghost"];
const INLINE_TERM_HINTS: &[&str] = &["wezterm", "warp", "tabby", "vscode", "wez"];
// "linux" and a bare "st" are loose matches; the Linux console has no Sixel
const SIXEL_TERM_HINTS: &[&str] = &["foot", "st", "linux"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerminalCapabilities {
    pub kitty: bool,
    pub inline: bool,
    pub sixel: bool,
    pub terminal_name: String,
}

impl TerminalCapabilities {
    /// Probe the current process environment
    pub fn detect() -> Self {
        Self::detect_from(&EnvSnapshot::capture())
    }

    pub fn detect_from(env: &EnvSnapshot) -> Self {
        let term = env.lower(env_vars::TERM);

        Self {
            kitty: detect_kitty_support(env, &term),
            inline: detect_inline_support(env, &term),
            sixel: detect_sixel_support(env, &term),
            terminal_name: determine_terminal_name(env),
        }
    }

    /// Capabilities with exactly one protocol enabled, bypassing detection
    pub fn forced(protocol: Protocol) -> Self {
        Self {
            kitty: protocol == Protocol::Kitty,
            inline: protocol == Protocol::Inline,
            sixel: protocol == Protocol::Sixel,
            terminal_name: format!("forced-{}", protocol),
        }
    }

    pub fn none() -> Self {
        Self {
            kitty: false,
            inline: false,
            sixel: false,
            terminal_name: "none".to_string(),
        }
    }

    pub fn supports(&self, protocol: Protocol) -> bool {
        match protocol {
            Protocol::Kitty => self.kitty,
            Protocol::Inline => self.inline,
            Protocol::Sixel => self.sixel,
        }
    }

    pub fn supported(&self) -> bool {
        self.kitty || self.inline || self.sixel
    }

    pub fn preferred_protocol(&self) -> Option<Protocol> {
        Protocol::PRIORITY.into_iter().find(|p| self.supports(*p))
    }
}

fn detect_kitty_support(env: &EnvSnapshot, term: &str) -> bool {
    if env.is_set(env_vars::KITTY_WINDOW_ID) {
        return true;
    }

    // Ghostty speaks the Kitty graphics protocol
    if KITTY_TERM_HINTS.iter().any(|hint| term.contains(hint)) {
        return true;
    }

    // Konsole has partial support
    env.is_set(env_vars::KONSOLE_VERSION)
}

fn detect_inline_support(env: &EnvSnapshot, term: &str) -> bool {
    if let Some(program) = env.get(env_vars::TERM_PROGRAM) {
        if INLINE_TERM_PROGRAMS.iter().any(|known| *known == program) {
            return true;
        }
    }

    if INLINE_TERM_HINTS.iter().any(|hint| term.contains(hint)) {
        return true;
    }

    env.is_set(env_vars::ITERM_SESSION_ID)
}

fn detect_sixel_support(env: &EnvSnapshot, term: &str) -> bool {
    if env.get(env_vars::SIXEL_PREVIEW) == Some("1") {
        return true;
    }

    if SIXEL_TERM_HINTS.iter().any(|hint| term.contains(hint)) {
        return true;
    }

    // Windows Terminal 1.22+
    env.is_set(env_vars::WT_SESSION)
}

fn determine_terminal_name(env: &EnvSnapshot) -> String {
    [env_vars::TERM_PROGRAM, env_vars::TERM]
        .iter()
        .filter_map(|name| env.get(name))
        .find(|value| !value.is_empty())
        .unwrap_or("unknown")
        .to_string()
}
