//! Terminal output helpers: coloured notes and validation findings.

use bunwatch_config::ValidationReport;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

fn note(color: &str, symbol: &str, plain: &str, msg: &str) -> String {
    if supports_color() {
        format!("{color}{BOLD}{symbol}{RESET} {msg}")
    } else {
        format!("{plain}: {msg}")
    }
}

pub fn note_info(msg: &str) {
    println!("{}", note(CYAN, "ℹ", "INFO", msg));
}

pub fn note_warn(msg: &str) {
    println!("{}", note(YELLOW, "⚠", "WARN", msg));
}

pub fn note_error(msg: &str) {
    eprintln!("{}", note(RED, "✗", "ERROR", msg));
}

pub fn note_success(msg: &str) {
    println!("{}", note(GREEN, "✓", "OK", msg));
}

/// One line per finding, errors first.
pub fn render_findings(report: &ValidationReport) -> Vec<String> {
    let errors = report
        .errors
        .iter()
        .map(|e| format!("error   {}: {}", e.path, e.message));
    let warnings = report
        .warnings
        .iter()
        .map(|w| format!("warning {}: {}", w.path, w.message));
    errors.chain(warnings).collect()
}

/// Print a validation report with a closing verdict.
pub fn print_report(report: &ValidationReport) {
    for line in render_findings(report) {
        if line.starts_with("error") {
            note_error(&line);
        } else {
            note_warn(&line);
        }
    }
    if report.is_valid() {
        note_success("Configuration is valid");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bunwatch_config::ConfigValidationError;

    #[test]
    fn findings_list_errors_before_warnings() {
        let report = ValidationReport {
            errors: vec![ConfigValidationError {
                path: "stream.frameRate".into(),
                message: "must be greater than zero".into(),
            }],
            warnings: vec![ConfigValidationError {
                path: "snapshot.url".into(),
                message: "not configured".into(),
            }],
        };
        let lines = render_findings(&report);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("error   stream.frameRate"));
        assert!(lines[1].starts_with("warning snapshot.url"));
    }
}
