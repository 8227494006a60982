//! Detection runner that lints a set of Python files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use rayon::prelude::*;

use crate::analysis::{extract_entities, get_analyzer};
use crate::config::{Config, ConfigError};

use super::{
    filter_suppressed, lint_entities, parse_suppressions, DetectionResult, FileFailure,
    SkipPolicy, ValidateOptions,
};

/// Lints files against a configuration.
pub struct Runner {
    policy: SkipPolicy,
    options: ValidateOptions,
    jobs: Option<usize>,
}

impl Runner {
    /// Create a runner, compiling the configured skip patterns.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            policy: SkipPolicy::new(config)?,
            options: ValidateOptions::from(config),
            jobs: None,
        })
    }

    /// Number of worker threads. `Some(1)` lints sequentially; `None` uses
    /// rayon's global pool.
    pub fn jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Lint one file's source text. `path` is what violations report; its
    /// base name drives the skip policy.
    pub fn lint_source(&self, path: &str, source: &[u8]) -> anyhow::Result<DetectionResult> {
        let analyzer = get_analyzer("py").context("no Python front-end registered")?;

        let parsed = analyzer.parse(Path::new(path), source)?;
        let module = analyzer.extract_module(&parsed)?;
        let comments = analyzer.extract_comments(&parsed)?;

        let file_name = Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(path);
        let entities = extract_entities(&module, file_name);
        tracing::debug!(file = path, entities = entities.len(), "extracted definitions");

        let mut violations = lint_entities(&entities, &self.policy, &self.options);
        for violation in &mut violations {
            violation.file = path.to_string();
        }

        let suppressions = parse_suppressions(path, &comments);
        let (active, suppressed) = filter_suppressed(violations, &suppressions);

        Ok(DetectionResult {
            violations: active,
            suppressed,
            scanned: 1,
            failed: Vec::new(),
        })
    }

    /// Lint one file from disk.
    pub fn lint_file(&self, path: &Path) -> anyhow::Result<DetectionResult> {
        let source =
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        self.lint_source(&path.display().to_string(), &source)
    }

    /// Lint every file. Unreadable or unparseable files are recorded as
    /// failures and never abort the run.
    pub fn run(&self, files: &[PathBuf]) -> DetectionResult {
        let results: Vec<DetectionResult> = match self.jobs {
            Some(1) => files.iter().map(|f| self.lint_or_record(f)).collect(),
            Some(n) => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
                Ok(pool) => pool.install(|| self.lint_parallel(files)),
                Err(e) => {
                    tracing::warn!(jobs = n, error = %e, "falling back to the global thread pool");
                    self.lint_parallel(files)
                }
            },
            None => self.lint_parallel(files),
        };

        let mut result = DetectionResult::new();
        for file_result in results {
            result.merge(file_result);
        }
        result.sort();

        tracing::info!(
            scanned = result.scanned,
            violations = result.violations.len(),
            suppressed = result.suppressed_count(),
            failed = result.failed.len(),
            "lint finished"
        );
        result
    }

    fn lint_parallel(&self, files: &[PathBuf]) -> Vec<DetectionResult> {
        files.par_iter().map(|f| self.lint_or_record(f)).collect()
    }

    fn lint_or_record(&self, path: &Path) -> DetectionResult {
        match self.lint_file(path) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "skipping file");
                DetectionResult {
                    failed: vec![FileFailure {
                        file: path.display().to_string(),
                        error: format!("{:#}", e),
                    }],
                    ..Default::default()
                }
            }
        }
    }
}
