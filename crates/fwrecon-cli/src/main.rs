//! fwrecon — static reconnaissance over an extracted IoT firmware filesystem.

mod report;

use clap::Parser;
use fwrecon_core::{
    ansi, classify, default_classification_rules, default_signature_rules, find_httpd_services,
    find_init_scripts, KeywordScanner, PathFilter, SignatureResolver,
};
use fwrecon_tools::{search::GrepSearch, strings::Strings};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fwrecon")]
#[command(about = "IoT firmware filesystem reconnaissance")]
#[command(version)]
struct Cli {
    /// Root directory of the extracted firmware filesystem
    root: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    if !cli.root.is_dir() {
        tracing::error!("not a directory: {}", cli.root.display());
        std::process::exit(1);
    }
    let root = cli.root.as_path();

    let filter = PathFilter::universal();

    report::progress(ansi::CYAN, "Scanning Web files and sensitive files...");
    let sections = classify(root, &default_classification_rules(), &filter);

    report::progress(ansi::YELLOW, "Scanning init.d startup scripts...");
    let init_scripts = find_init_scripts(root, &filter);

    report::progress(ansi::WHITE, "Scanning HTTPD service files...");
    let httpd_services = find_httpd_services(root, &filter);

    report::progress(ansi::GREEN, "Detecting configuration keywords...");
    let scanner = KeywordScanner::with_defaults().expect("default keyword set must compile");
    let keyword_hits = scanner.scan(root, &PathFilter::for_keyword_scan());

    report::progress(ansi::MAGENTA, "Performing structural signature reconnaissance...");
    let search = GrepSearch::new();
    let strings = Strings::new();
    let resolver = SignatureResolver::new(&search, &strings);
    let structure = resolver.resolve(root, &default_signature_rules(), &filter);

    report::render(&sections, &init_scripts, &httpd_services, &scanner, &keyword_hits, &structure);
}
