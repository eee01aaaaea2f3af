use crate::model::{AuditReport, Package};
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportRow<'a> {
    package: &'a str,
    bug: BugColumn,
    current_version: &'a str,
    enabled_in_packagist: bool,
    semantic_versioning: bool,
    url: &'a str,
}

/// `"-"` when Packagist does not know the package.
#[derive(Serialize)]
#[serde(untagged)]
enum BugColumn {
    Known(bool),
    Unknown(&'static str),
}

impl<'a> From<&'a Package> for ReportRow<'a> {
    fn from(package: &'a Package) -> Self {
        let bug = if package.registry_known {
            BugColumn::Known(package.has_bug)
        } else {
            BugColumn::Unknown("-")
        };

        Self {
            package: &package.name,
            bug,
            current_version: &package.version,
            enabled_in_packagist: package.registry_known,
            semantic_versioning: package.follows_semver(),
            url: &package.source_url,
        }
    }
}

pub fn generate_json_string(report: &AuditReport) -> Result<String> {
    let rows: Vec<ReportRow> = report.packages.iter().map(ReportRow::from).collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

pub fn print_json(report: &AuditReport) -> Result<()> {
    println!("{}", generate_json_string(report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_json_rows() {
        let mut flagged = Package::new("psr/log", "1.0.0").with_source_url("https://github.com/php-fig/log.git");
        flagged.registry_known = true;
        flagged.has_bug = true;
        let unknown = Package::new("doctrine/no-exist", "0.9");

        let report = AuditReport::new(vec![flagged, unknown]);
        let rendered: Value = serde_json::from_str(&generate_json_string(&report).unwrap()).unwrap();

        assert_eq!(
            rendered,
            json!([
                {
                    "package": "psr/log",
                    "bug": true,
                    "currentVersion": "1.0.0",
                    "enabledInPackagist": true,
                    "semanticVersioning": true,
                    "url": "https://github.com/php-fig/log.git"
                },
                {
                    "package": "doctrine/no-exist",
                    "bug": "-",
                    "currentVersion": "0.9",
                    "enabledInPackagist": false,
                    "semanticVersioning": false,
                    "url": ""
                }
            ])
        );
    }

    #[test]
    fn test_json_empty_report() {
        let report = AuditReport::new(Vec::new());
        assert_eq!(generate_json_string(&report).unwrap(), "[]");
    }
}
