use std::io;
use std::path::Path;

use miette::{miette, Report, Severity};

use crate::smoke::StepFailure;

// Catalog errors

pub fn catalog_unknown_topic(tag: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "catalog::topic",
        help = "available topics are `area`, `data`, `power` and `addTwo`",
        "Unknown sample topic '{tag}'",
    )
}

pub fn catalog_missing_dir(root: &Path) -> Report {
    miette!(
        severity = Severity::Error,
        code = "catalog::dir",
        help = "expected a directory containing `Intel/` and `MIPS_ASM/` sample folders",
        "Sample tree '{}' is not a directory",
        root.display(),
    )
}

pub fn catalog_pattern(e: glob::PatternError) -> Report {
    miette!(
        severity = Severity::Error,
        code = "catalog::pattern",
        "Could not build sample search pattern: {e}",
    )
}

pub fn catalog_glob(e: glob::GlobError) -> Report {
    miette!(
        severity = Severity::Error,
        code = "catalog::read",
        "Could not list '{}': {}",
        e.path().display(),
        e.error(),
    )
}

pub fn catalog_read(path: &Path, e: io::Error) -> Report {
    miette!(
        severity = Severity::Error,
        code = "catalog::read",
        "Could not read sample '{}': {e}",
        path.display(),
    )
}

// Export errors

pub fn export_write(path: &Path, e: io::Error) -> Report {
    miette!(
        severity = Severity::Error,
        code = "export::write",
        help = "check that the destination folder exists and is writable",
        "Could not write script '{}': {e}",
        path.display(),
    )
}

// Smoke test errors

pub fn smoke_connect(endpoint: &str, e: impl std::fmt::Display) -> Report {
    miette!(
        severity = Severity::Error,
        code = "smoke::connect",
        help = "start a WebDriver server (e.g. chromedriver --port=4444) or pass --webdriver",
        "Could not open a browser session at {endpoint}: {e}",
    )
}

pub fn smoke_step(failure: &StepFailure) -> Report {
    miette!(
        severity = Severity::Error,
        code = "smoke::step",
        help = "the page layout may have changed; check the link texts and element ids",
        "Smoke test aborted while trying to {}: {}",
        failure.step,
        failure.source,
    )
}

pub fn smoke_verdict(message: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "smoke::verdict",
        "{message}",
    )
}
