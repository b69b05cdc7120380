//! Sectioned, color-coded report rendering.
//!
//! Colors are fixed ANSI escapes applied unconditionally. Every section is a
//! title line with a dash underline of equal length, indented truncated
//! entries and a `None` placeholder when empty.

use fwrecon_core::ansi::{self, BOLD, RESET};
use fwrecon_core::signature::{LabelReport, ProbeOutcome, ProbeState};
use fwrecon_core::{truncate, KeywordHit, KeywordScanner, Section, MAX_WIDTH};
use std::path::{Path, PathBuf};

const NONE_PLACEHOLDER: &str = "None";

fn section_color(title: &str) -> &'static str {
    match title {
        "Web Files" => ansi::CYAN,
        "Common Sensitive Files" => ansi::MAGENTA,
        "Init.d Scripts" => ansi::YELLOW,
        "HTTPD Services" => ansi::WHITE,
        _ => ansi::GREEN,
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

/// Colored pass-boundary progress line.
pub fn progress(color: &str, message: &str) {
    println!("{color}[+] {message}{RESET}");
}

fn print_header(title: &str) {
    let color = section_color(title);
    println!("{BOLD}{color}{title}{RESET}");
    println!("{color}{}{RESET}", "-".repeat(title.len()));
}

fn print_section(title: &str, entries: &[String]) {
    print_header(title);
    let color = section_color(title);
    if entries.is_empty() {
        println!("  {color}{NONE_PLACEHOLDER}{RESET}");
    }
    for entry in entries {
        println!("  {color}{}{RESET}", truncate(entry, MAX_WIDTH));
    }
    println!();
}

fn print_keyword_hits(scanner: &KeywordScanner, hits: &[KeywordHit]) {
    print_header("Config Recon");
    println!(
        "  {}Keyword List: {}{RESET}\n",
        ansi::GREEN,
        scanner.keywords().join(", ")
    );
    if hits.is_empty() {
        println!("  {}{NONE_PLACEHOLDER}{RESET}", ansi::GREEN);
    }
    for hit in hits {
        println!(
            "  {}{}{RESET}:{}{}{RESET}: {}",
            ansi::YELLOW,
            truncate(&display(&hit.path), MAX_WIDTH),
            ansi::CYAN,
            hit.line,
            hit.snippet
        );
    }
    println!();
}

/// Closing summary: structure line, then per-probe results, each guarded by
/// its own presence check.
fn summary_lines(structure: &[LabelReport]) -> Vec<String> {
    let mut lines = Vec::new();

    let detected: Vec<&str> = structure
        .iter()
        .filter(|r| r.detected())
        .map(|r| r.label.as_str())
        .collect();
    if detected.is_empty() {
        return lines;
    }

    lines.push(format!(
        "{}This firmware is of {} structure{RESET}",
        ansi::GREEN,
        detected.join("+")
    ));

    for report in structure {
        if report.label != "nginx" {
            continue;
        }
        if let ProbeState::ProbeResult(ProbeOutcome::Files(files)) = &report.state {
            let joined = files
                .iter()
                .map(|f| display(f))
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!(
                "{}[+] nginx route files found: {joined}{RESET}",
                ansi::GREEN
            ));
        }
    }

    if let Some(report) = structure
        .iter()
        .find(|r| r.label == "lighttpd" && r.detected())
    {
        let title = "lighttpd Permission Files";
        lines.push(format!("{BOLD}{}{title}{RESET}", ansi::GREEN));
        lines.push(format!("{}{}{RESET}", ansi::GREEN, "-".repeat(title.len())));
        match &report.state {
            ProbeState::ProbeResult(ProbeOutcome::Files(files)) => {
                for file in files {
                    lines.push(format!(
                        "  {}{}{RESET}",
                        ansi::GREEN,
                        truncate(&display(file), MAX_WIDTH)
                    ));
                }
            }
            _ => lines.push(format!("  {}{NONE_PLACEHOLDER}{RESET}", ansi::GREEN)),
        }
        lines.push(String::new());
    }

    if let Some(report) = structure.iter().find(|r| r.label == "Goahead") {
        match &report.state {
            ProbeState::ProbeResult(ProbeOutcome::Version(version)) => lines.push(format!(
                "{}[+] Goahead version: {version}{RESET}",
                ansi::GREEN
            )),
            ProbeState::ProbeResult(ProbeOutcome::Absent) => lines.push(format!(
                "{}[!] Unable to extract Goahead version{RESET}",
                ansi::RED
            )),
            _ => {}
        }
    }

    lines
}

pub fn render(
    sections: &[Section],
    init_scripts: &[PathBuf],
    httpd_services: &[PathBuf],
    scanner: &KeywordScanner,
    keyword_hits: &[KeywordHit],
    structure: &[LabelReport],
) {
    println!();
    for section in sections {
        let entries: Vec<String> = section.paths.iter().map(|p| display(p)).collect();
        print_section(&section.label, &entries);
    }

    let entries: Vec<String> = init_scripts.iter().map(|p| display(p)).collect();
    print_section("Init.d Scripts", &entries);

    let entries: Vec<String> = httpd_services.iter().map(|p| display(p)).collect();
    print_section("HTTPD Services", &entries);

    print_keyword_hits(scanner, keyword_hits);

    for line in summary_lines(structure) {
        println!("{line}");
    }
}
