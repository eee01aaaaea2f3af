use crate::model::{AuditReport, Package};
use anyhow::Result;
use std::fmt::Write;
use tabled::{settings::Style, Table, Tabled};

const TITLE: &str = "Packagist Security Checker - Report";

#[derive(Tabled)]
struct PackageRow {
    #[tabled(rename = "Package")]
    package: String,
    #[tabled(rename = "Bugs")]
    bugs: &'static str,
    #[tabled(rename = "Current Version")]
    version: String,
    #[tabled(rename = "Enabled in Packagist")]
    in_packagist: &'static str,
    #[tabled(rename = "Semantic Versioning")]
    semver: &'static str,
    #[tabled(rename = "Url")]
    url: String,
}

impl From<&Package> for PackageRow {
    fn from(p: &Package) -> Self {
        Self {
            package: p.name.clone(),
            bugs: bug_column(p),
            version: p.version.clone(),
            in_packagist: yes_no(p.registry_known),
            semver: yes_no(p.follows_semver()),
            url: p.source_url.clone(),
        }
    }
}

fn bug_column(package: &Package) -> &'static str {
    if !package.registry_known {
        "-"
    } else if package.has_bug {
        "Yes"
    } else {
        "No"
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// Renders the report as the plain-text table shown on a terminal.
pub fn generate_text_string(report: &AuditReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", TITLE);
    let _ = writeln!(
        out,
        "Checked at: {}",
        report.checked_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out);

    let bugs = report.bug_count();
    if bugs == 0 {
        let _ = writeln!(out, "Congratulations, you do not have bugs");
        return out;
    }

    let rows: Vec<PackageRow> = report.packages.iter().map(PackageRow::from).collect();
    let table = Table::new(rows).with(Style::rounded()).to_string();
    let _ = writeln!(out, "{}", table);
    let _ = writeln!(
        out,
        "You have {} possible bugs, you should update those dependencies if affect your project",
        bugs
    );
    let _ = writeln!(
        out,
        "Example, if your current version is X.Y.Z, you should update at least to X.Y.(MAX-PATCH-VERSION)"
    );

    out
}

pub fn print_cli_table(report: &AuditReport) -> Result<()> {
    print!("{}", generate_text_string(report));
    Ok(())
}
