//! TOML problem definition parser.
//!
//! Loads authored sorting problems from TOML files and directories, and
//! validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{
    ProblemDefinition, DEFAULT_DISPLAY_NAME, DEFAULT_ITEM_BACKGROUND_COLOR,
    DEFAULT_ITEM_TEXT_COLOR, DEFAULT_QUESTION_TEXT,
};

/// Intermediate TOML structure for parsing problem files.
#[derive(Debug, Deserialize)]
struct TomlProblemFile {
    problem: TomlProblem,
}

#[derive(Debug, Deserialize)]
struct TomlProblem {
    id: String,
    #[serde(default = "default_display_name")]
    display_name: String,
    #[serde(default = "default_question_text")]
    question_text: String,
    items: Vec<String>,
    /// Omitted means unlimited.
    #[serde(default)]
    max_attempts: u32,
    #[serde(default = "default_weight")]
    weight: f64,
    #[serde(default = "default_true")]
    graded: bool,
    #[serde(default)]
    style: Option<TomlStyle>,
}

#[derive(Debug, Deserialize)]
struct TomlStyle {
    #[serde(default = "default_background")]
    item_background_color: String,
    #[serde(default = "default_text_color")]
    item_text_color: String,
}

fn default_display_name() -> String {
    DEFAULT_DISPLAY_NAME.to_string()
}

fn default_question_text() -> String {
    DEFAULT_QUESTION_TEXT.to_string()
}

fn default_weight() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_background() -> String {
    DEFAULT_ITEM_BACKGROUND_COLOR.to_string()
}

fn default_text_color() -> String {
    DEFAULT_ITEM_TEXT_COLOR.to_string()
}

/// Parse a single TOML file into a `ProblemDefinition`.
pub fn parse_problem(path: &Path) -> Result<ProblemDefinition> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read problem file: {}", path.display()))?;

    parse_problem_str(&content, path)
}

/// Parse a TOML string into a `ProblemDefinition` (useful for testing).
pub fn parse_problem_str(content: &str, source_path: &Path) -> Result<ProblemDefinition> {
    let parsed: TomlProblemFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let p = parsed.problem;
    anyhow::ensure!(
        !p.id.trim().is_empty(),
        "problem id is empty: {}",
        source_path.display()
    );

    let (item_background_color, item_text_color) = match p.style {
        Some(style) => (style.item_background_color, style.item_text_color),
        None => (default_background(), default_text_color()),
    };

    let problem = ProblemDefinition {
        id: p.id,
        display_name: p.display_name,
        question_text: p.question_text,
        items: p.items,
        max_attempts: p.max_attempts,
        weight: p.weight,
        graded: p.graded,
        item_background_color,
        item_text_color,
    };
    problem
        .validate()
        .with_context(|| format!("rejected problem '{}': {}", problem.id, source_path.display()))?;
    Ok(problem)
}

/// Recursively load all `.toml` problem files from a directory.
pub fn load_problem_directory(dir: &Path) -> Result<Vec<ProblemDefinition>> {
    let mut problems = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            problems.extend(load_problem_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_problem(&path) {
                Ok(problem) => problems.push(problem),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    problems.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(problems)
}

/// A warning from problem validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The problem id.
    pub problem_id: String,
    /// Warning message.
    pub message: String,
}

/// Validate a problem for common authoring issues.
pub fn validate_problem(problem: &ProblemDefinition) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut warn = |message: String| {
        warnings.push(ValidationWarning {
            problem_id: problem.id.clone(),
            message,
        })
    };

    if problem.items.is_empty() {
        warn("item list is empty; submissions cannot be graded".into());
    } else if problem.items.len() == 1 {
        warn("only one item; every submission is correct".into());
    }

    let mut seen = HashSet::new();
    for item in &problem.items {
        if !seen.insert(item.as_str()) {
            warn(format!("duplicate item: {item}"));
        }
        if item.trim().is_empty() {
            warn("blank item label".into());
        }
    }

    if !problem.weight.is_finite() || problem.weight < 0.0 {
        warn(format!("weight must be a non-negative number, got {}", problem.weight));
    }

    if problem.question_text.trim().is_empty() {
        warn("question text is empty".into());
    }

    for (name, color) in [
        ("item_background_color", &problem.item_background_color),
        ("item_text_color", &problem.item_text_color),
    ] {
        if !is_hex_color(color) {
            warn(format!("{name} is not a #rrggbb color: {color}"));
        }
    }

    warnings
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}
