// ABOUTME: Centralized constants for the terminal preview library
// ABOUTME: Contains environment variable names, protocol framing and placement defaults

/// Environment variables read by the capability probe and transmitters
pub mod env_vars {
    /// Enables diagnostic trace logging ("1" or "true")
    pub const PREVIEW_DEBUG: &str = "PREVIEW_DEBUG";

    /// Forces Sixel capability when set to "1"
    pub const SIXEL_PREVIEW: &str = "SIXEL_PREVIEW";

    /// Kitty placement width override in cells
    pub const KITTY_PREVIEW_COLS: &str = "KITTY_PREVIEW_COLS";

    /// Kitty placement height override in cells
    pub const KITTY_PREVIEW_ROWS: &str = "KITTY_PREVIEW_ROWS";

    pub const KITTY_WINDOW_ID: &str = "KITTY_WINDOW_ID";
    pub const TERM: &str = "TERM";
    pub const TERM_PROGRAM: &str = "TERM_PROGRAM";
    pub const ITERM_SESSION_ID: &str = "ITERM_SESSION_ID";
    pub const KONSOLE_VERSION: &str = "KONSOLE_VERSION";
    pub const WT_SESSION: &str = "WT_SESSION";

    /// Every variable captured by an environment snapshot
    pub const ALL: &[&str] = &[
        PREVIEW_DEBUG,
        SIXEL_PREVIEW,
        KITTY_PREVIEW_COLS,
        KITTY_PREVIEW_ROWS,
        KITTY_WINDOW_ID,
        TERM,
        TERM_PROGRAM,
        ITERM_SESSION_ID,
        KONSOLE_VERSION,
        WT_SESSION,
    ];
}

/// Kitty graphics protocol framing
pub mod kitty {
    /// Maximum base64 characters per control sequence
    pub const CHUNK_SIZE: usize = 4096;

    /// APC opener for graphics commands
    pub const APC_START: &str = "\x1b_G";

    /// String terminator closing every graphics command
    pub const ST: &str = "\x1b\\";

    /// Default placement width in cells
    pub const DEFAULT_COLS: u32 = 40;

    /// Default placement height in cells
    pub const DEFAULT_ROWS: u32 = 20;
}

/// OSC-1337 inline file framing
pub mod inline {
    /// OSC opener for the inline file command
    pub const OSC_FILE_START: &str = "\x1b]1337;File=";

    /// BEL terminator
    pub const BEL: &str = "\x07";
}

/// Cursor handling after a preview
pub mod layout {
    /// Blank lines emitted after protocols that do not report their rendered height
    pub const TRAILING_BLANK_LINES: usize = 20;
}

/// External Sixel renderers tried in order
pub mod renderers {
    pub const IMG2SIXEL: &str = "img2sixel";
    pub const IMG2SIXEL_ARGS: &[&str] = &["-"];

    pub const CHAFA: &str = "chafa";
    pub const CHAFA_ARGS: &[&str] = &["--fill=block", "--symbols=block", "-s", "auto", "-"];
}
