//! Fixed ANSI escape sequences, bright variants for dark terminals.
//!
//! Applied unconditionally; there is no TTY capability negotiation.

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";

pub const CYAN: &str = "\x1b[96m";
pub const MAGENTA: &str = "\x1b[95m";
pub const YELLOW: &str = "\x1b[93m";
pub const GREEN: &str = "\x1b[92m";
pub const RED: &str = "\x1b[91m";
pub const WHITE: &str = "\x1b[97m";
