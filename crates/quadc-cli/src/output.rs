//! Colored diagnostic output for the command line.
//!
//! Uses `termcolor` for cross-platform colored terminal output.
//! Respects `NO_COLOR` environment variable and `--color` flag.

use quadc_engine::diagnostic::SimpleFiles;
use quadc_engine::Diagnostic;
use termcolor::{ColorChoice, StandardStream};

/// Resolve `ColorChoice` from CLI flag and environment.
///
/// Priority: `NO_COLOR` env > `--color` flag > auto-detect TTY.
pub fn resolve_color_choice(flag: Option<&str>) -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorChoice::Never;
    }
    match flag {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

/// Print diagnostics to stderr
pub fn emit_diagnostics(
    diagnostics: &[Diagnostic],
    files: &SimpleFiles<String, String>,
    choice: ColorChoice,
) -> anyhow::Result<()> {
    let mut stderr = StandardStream::stderr(choice);
    for diag in diagnostics {
        diag.emit(&mut stderr, files)?;
    }
    Ok(())
}
