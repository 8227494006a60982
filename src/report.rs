//! Output formatting for lint results.
//!
//! Supports three output formats:
//! - Pretty: colored terminal output, one `file:line:col CODE message` line
//!   per violation, grouped by file
//! - JSON: structured output for programmatic consumption
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration

use colored::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::detect::{DetectionResult, SuppressedViolation, Violation, ViolationCode};

// =============================================================================
// JSON Format
// =============================================================================

/// Top-level JSON report.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
    pub files_scanned: usize,
    pub passed: bool,
    pub violations: Vec<JsonViolation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suppressed: Vec<JsonSuppressedViolation>,
    pub suppressed_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<JsonFailure>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonViolation {
    pub code: String,
    pub file: String,
    pub line: usize,
    pub column: usize,
    /// Qualified name of the function, method or class.
    pub entity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub message: String,
}

/// Suppressed violation with the `noqa` comment that suppressed it.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonSuppressedViolation {
    pub violation: JsonViolation,
    pub suppression: JsonSuppression,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonSuppression {
    /// Listed codes; empty for a blanket `# noqa`.
    pub codes: Vec<String>,
    pub line: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonFailure {
    pub file: String,
    pub error: String,
}

/// Build the JSON report for a result.
pub fn build_json_report(
    path: &str,
    config_path: Option<&str>,
    result: &DetectionResult,
) -> JsonReport {
    let suppressed = result
        .suppressed
        .iter()
        .map(|sv| JsonSuppressedViolation {
            violation: violation_to_json(&sv.violation),
            suppression: JsonSuppression {
                codes: sv.suppression.codes.clone(),
                line: sv.suppression.line,
            },
        })
        .collect();

    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        path: path.to_string(),
        config: config_path.map(str::to_string),
        files_scanned: result.scanned,
        passed: !result.has_violations(),
        violations: result.violations.iter().map(violation_to_json).collect(),
        suppressed,
        suppressed_count: result.suppressed_count(),
        failed: result
            .failed
            .iter()
            .map(|f| JsonFailure {
                file: f.file.clone(),
                error: f.error.clone(),
            })
            .collect(),
    }
}

/// Write results in JSON format.
pub fn write_json(
    path: &str,
    config_path: Option<&str>,
    result: &DetectionResult,
) -> anyhow::Result<()> {
    let report = build_json_report(path, config_path, result);
    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    Ok(())
}

fn violation_to_json(v: &Violation) -> JsonViolation {
    JsonViolation {
        code: v.code.as_str().to_string(),
        file: v.file.clone(),
        line: v.line,
        column: v.column,
        entity: v.entity.name.clone(),
        identifier: v.identifier.clone(),
        message: v.message.clone(),
    }
}

// =============================================================================
// SARIF Format
// =============================================================================

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";
const TOOL_NAME: &str = "docstrings-complete";

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifReport {
    pub version: String,
    #[serde(rename = "$schema")]
    pub schema: String,
    pub runs: Vec<SarifRun>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifRun {
    pub tool: SarifTool,
    pub results: Vec<SarifResult>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifTool {
    pub driver: SarifDriver,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifDriver {
    pub name: String,
    pub version: String,
    #[serde(rename = "informationUri")]
    pub information_uri: String,
    pub rules: Vec<SarifRule>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifRule {
    pub id: String,
    pub name: String,
    #[serde(rename = "shortDescription")]
    pub short_description: SarifMessage,
    #[serde(rename = "helpUri")]
    pub help_uri: String,
    #[serde(rename = "defaultConfiguration")]
    pub default_config: SarifRuleConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifRuleConfig {
    pub level: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifResult {
    #[serde(rename = "ruleId")]
    pub rule_id: String,
    pub level: String,
    pub message: SarifMessage,
    pub locations: Vec<SarifLocation>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifMessage {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    pub physical_location: SarifPhysicalLocation,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    pub artifact_location: SarifArtifact,
    pub region: SarifRegion,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifArtifact {
    pub uri: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifRegion {
    #[serde(rename = "startLine")]
    pub start_line: usize,
    #[serde(rename = "startColumn")]
    pub start_column: usize,
}

/// PascalCase rule name, e.g. `ArgMissing`.
fn rule_name(code: ViolationCode) -> String {
    format!("{:?}", code)
}

fn make_relative_path(file_path: &str, base_path: &Path) -> String {
    if base_path.to_string_lossy().is_empty() {
        return file_path.to_string();
    }

    let file = Path::new(file_path);

    // If they're the same (single file scan), return just the filename
    if file == base_path {
        return file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.to_string());
    }

    file.strip_prefix(base_path)
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_else(|_| file_path.to_string())
}

/// Build the SARIF report. Only codes that were emitted get a rule entry.
pub fn build_sarif_report(
    base_path: &Path,
    docs_base_url: &str,
    result: &DetectionResult,
) -> SarifReport {
    let codes: BTreeSet<ViolationCode> = result.violations.iter().map(|v| v.code).collect();

    let rules: Vec<SarifRule> = codes
        .into_iter()
        .map(|code| SarifRule {
            id: code.as_str().to_string(),
            name: rule_name(code),
            short_description: SarifMessage {
                text: code.summary().to_string(),
            },
            help_uri: format!("{}#fix-{}", docs_base_url, code.as_str().to_lowercase()),
            default_config: SarifRuleConfig {
                level: "warning".to_string(),
            },
        })
        .collect();

    let results: Vec<SarifResult> = result
        .violations
        .iter()
        .map(|v| SarifResult {
            rule_id: v.code.as_str().to_string(),
            level: "warning".to_string(),
            message: SarifMessage {
                text: v.message.clone(),
            },
            locations: vec![SarifLocation {
                physical_location: SarifPhysicalLocation {
                    artifact_location: SarifArtifact {
                        uri: make_relative_path(&v.file, base_path),
                    },
                    region: SarifRegion {
                        start_line: v.line.max(1),
                        start_column: v.column.max(1),
                    },
                },
            }],
        })
        .collect();

    SarifReport {
        version: SARIF_VERSION.to_string(),
        schema: SARIF_SCHEMA.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: TOOL_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    information_uri: docs_base_url.to_string(),
                    rules,
                },
            },
            results,
        }],
    }
}

/// Write results in SARIF format.
pub fn write_sarif(
    base_path: &Path,
    docs_base_url: &str,
    result: &DetectionResult,
) -> anyhow::Result<()> {
    let report = build_sarif_report(base_path, docs_base_url, result);
    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// One violation as `file:line:col CODE message`, without color.
pub fn format_violation(v: &Violation) -> String {
    format!("{}:{}:{} {} {}", v.file, v.line, v.column, v.code, v.message)
}

/// Write results in pretty (human-readable) format.
pub fn write_pretty(path: &str, result: &DetectionResult, show_suppressed: bool) {
    // Header
    println!();
    print!("  ");
    print!("{}", "docstrings-complete".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Scanning: ".dimmed());
    println!("{}", path);
    println!();

    if !result.violations.is_empty() {
        write_violations(&result.violations);
    }

    if !result.suppressed.is_empty() {
        write_suppressed_summary(&result.suppressed, show_suppressed);
        println!();
    }

    if !result.failed.is_empty() {
        println!("  {} ({}):", "Skipped".yellow(), result.failed.len());
        for failure in &result.failed {
            println!("    {}: {}", failure.file.blue(), failure.error);
        }
        println!();
    }

    write_result_summary(result);
    println!();
}

fn write_violations(violations: &[Violation]) {
    let mut current: Option<&str> = None;

    for v in violations {
        if current != Some(v.file.as_str()) {
            if current.is_some() {
                println!();
            }
            println!("  {}", v.file.bold());
            current = Some(v.file.as_str());
        }

        print!("    {}", v.file.blue());
        print!("{}", format!(":{}:{}", v.line, v.column).dimmed());
        println!(" {} {}", v.code.as_str().red(), v.message);
    }
    println!();
}

fn write_result_summary(result: &DetectionResult) {
    let files: BTreeSet<&str> = result.violations.iter().map(|v| v.file.as_str()).collect();
    let count = result.violations.len();

    if count == 0 {
        print!("  {}", "✓ PASS".green());
        print!("  {} files scanned", result.scanned);
    } else {
        print!("  {}", "✗ FAIL".red());
        let plural = if count != 1 { "s" } else { "" };
        print!(
            "  {} violation{} in {} of {} files",
            count,
            plural,
            files.len(),
            result.scanned
        );
    }

    if !result.suppressed.is_empty() {
        print!(
            "  {}",
            format!("({} suppressed)", result.suppressed.len()).dimmed()
        );
    }

    println!();
}

fn write_suppressed_summary(suppressed: &[SuppressedViolation], show_details: bool) {
    println!("  {} ({}):", "Suppressed".dimmed(), suppressed.len());

    if !show_details {
        println!("    {}", "(use --show-suppressed to see details)".dimmed());
        return;
    }

    for sv in suppressed {
        let v = &sv.violation;
        print!("    {}", v.file.blue());
        print!("{}", format!(":{}:{}", v.line, v.column).dimmed());
        print!(" {}", v.code.as_str().dimmed());
        if sv.suppression.is_blanket() {
            println!(" {}", "(noqa)".dimmed());
        } else {
            println!(
                " {}",
                format!("(noqa: {})", sv.suppression.codes.join(",")).dimmed()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::EntityKind;
    use crate::detect::{EntityRef, FileFailure, Suppression};

    fn violation(code: ViolationCode, file: &str, line: usize) -> Violation {
        Violation {
            code,
            message: "message".to_string(),
            file: file.to_string(),
            line,
            column: 5,
            entity: EntityRef {
                name: "Foo.bar".to_string(),
                kind: EntityKind::Method,
                line,
                column: 5,
            },
            identifier: Some("baz".to_string()),
        }
    }

    fn sample() -> DetectionResult {
        DetectionResult {
            violations: vec![
                violation(ViolationCode::ArgMissing, "/repo/pkg/a.py", 3),
                violation(ViolationCode::ArgMissing, "/repo/pkg/b.py", 7),
                violation(ViolationCode::DocstringMissing, "/repo/pkg/b.py", 9),
            ],
            suppressed: vec![SuppressedViolation {
                violation: violation(ViolationCode::ReturnsSectionMissing, "/repo/pkg/a.py", 12),
                suppression: Suppression {
                    codes: vec![],
                    file: "/repo/pkg/a.py".to_string(),
                    line: 12,
                    first_line: 12,
                },
            }],
            scanned: 3,
            failed: vec![FileFailure {
                file: "/repo/pkg/c.py".to_string(),
                error: "failed to read".to_string(),
            }],
        }
    }

    #[test]
    fn test_format_violation() {
        let v = violation(ViolationCode::ArgMissing, "a.py", 3);
        assert_eq!(format_violation(&v), "a.py:3:5 DCO023 message");
    }

    #[test]
    fn test_json_report() {
        let report = build_json_report("/repo", Some("docstrings-complete.yaml"), &sample());
        assert!(!report.passed);
        assert_eq!(report.files_scanned, 3);
        assert_eq!(report.violations.len(), 3);
        assert_eq!(report.violations[0].code, "DCO023");
        assert_eq!(report.violations[0].entity, "Foo.bar");
        assert_eq!(report.suppressed_count, 1);
        assert_eq!(report.failed.len(), 1);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["violations"][0]["identifier"], "baz");
        assert_eq!(json["suppressed"][0]["suppression"]["line"], 12);
    }

    #[test]
    fn test_json_report_clean() {
        let report = build_json_report("/repo", None, &DetectionResult::new());
        assert!(report.passed);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("config").is_none());
        assert!(json.get("suppressed").is_none());
        assert!(json.get("failed").is_none());
    }

    #[test]
    fn test_sarif_one_rule_per_emitted_code() {
        let report = build_sarif_report(
            Path::new("/repo"),
            "https://docs.example/dco",
            &sample(),
        );
        let run = &report.runs[0];

        let ids: Vec<_> = run.tool.driver.rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["DCO010", "DCO023"]);
        assert_eq!(
            run.tool.driver.rules[1].help_uri,
            "https://docs.example/dco#fix-dco023"
        );

        assert_eq!(run.results.len(), 3);
        let location = &run.results[0].locations[0].physical_location;
        assert_eq!(location.artifact_location.uri, "pkg/a.py");
        assert_eq!(location.region.start_line, 3);
        assert_eq!(location.region.start_column, 5);
    }

    #[test]
    fn test_make_relative_path() {
        let base = Path::new("/repo/pkg/a.py");
        assert_eq!(make_relative_path("/repo/pkg/a.py", base), "a.py");
        assert_eq!(make_relative_path("/other/x.py", Path::new("/repo")), "/other/x.py");
    }
}
