use std::fmt;

use similar::{ChangeTag, TextDiff};

pub mod format_error;
pub mod formatting;
pub mod render;

pub trait Scenario {
    fn run(self) -> Result<(), ScenarioError>;
}

/// Error type for scenario execution failures.
/// Each variant represents a specific failure mode that can occur during test scenario execution.
#[derive(Debug, Clone)]
pub enum ScenarioError {
    /// The case file has no field combination that forms a scenario
    NoScenario { path: String },
    /// Descriptor set or message value could not be loaded
    PreprocessingError { message: String },
    /// Rendered literal differs from the expected text
    RenderMismatch { expected: String, actual: String },
    /// Canonicalizer rejected the generated literal
    RenderError { message: String },
    /// Formatter output mismatch
    FormattingMismatch {
        input: String,
        expected: String,
        actual: String,
    },
    /// Formatting the expected output changed it
    NotIdempotent { expected: String, actual: String },
    /// Formatting error
    FormattingError { message: String },
    /// Expected the canonicalizer to reject the input but it succeeded
    ExpectedFormattingToFail { expected_error: String, output: String },
    /// The canonicalizer failed with a different error
    FormatErrorMismatch { expected: String, actual: String },
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::NoScenario { path } => {
                write!(f, "No scenario applies to {path}")
            }
            ScenarioError::PreprocessingError { message } => {
                write!(f, "Preprocessing error: {message}")
            }
            ScenarioError::RenderMismatch { expected, actual } => {
                writeln!(f, "Render mismatch.")?;
                write_diff(f, expected, actual)
            }
            ScenarioError::RenderError { message } => {
                write!(f, "Render error: {message}")
            }
            ScenarioError::FormattingMismatch {
                input,
                expected,
                actual,
            } => {
                writeln!(f, "Formatting mismatch.")?;
                writeln!(f, "\n--- Input ---")?;
                writeln!(f, "{input}")?;
                write_diff(f, expected, actual)
            }
            ScenarioError::NotIdempotent { expected, actual } => {
                writeln!(f, "Formatting the expected output changed it.")?;
                write_diff(f, expected, actual)
            }
            ScenarioError::FormattingError { message } => {
                write!(f, "Formatting error: {message}")
            }
            ScenarioError::ExpectedFormattingToFail {
                expected_error,
                output,
            } => {
                writeln!(f, "Expected formatting to fail with: {expected_error}")?;
                writeln!(f, "\n--- Output ---")?;
                write!(f, "{output}")
            }
            ScenarioError::FormatErrorMismatch { expected, actual } => {
                writeln!(f, "Format error mismatch.")?;
                writeln!(f, "  expected: {expected}")?;
                write!(f, "  actual:   {actual}")
            }
        }
    }
}

fn write_diff(f: &mut fmt::Formatter<'_>, expected: &str, actual: &str) -> fmt::Result {
    let diff = TextDiff::from_lines(expected, actual);
    let has_line_changes = diff
        .iter_all_changes()
        .any(|c| c.tag() != ChangeTag::Equal);
    if !has_line_changes {
        // Same lines, so the difference is in line endings or the final newline.
        writeln!(
            f,
            "No visible line differences. Expected length: {}, Actual length: {}",
            expected.len(),
            actual.len()
        )?;
        writeln!(f, "Expected: {expected:?}")?;
        return writeln!(f, "Actual:   {actual:?}");
    }
    writeln!(f, "Diff (expected → actual):")?;
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-",
            ChangeTag::Insert => "+",
            ChangeTag::Equal => " ",
        };
        write!(f, "{sign}{change}")?;
        if change.missing_newline() {
            writeln!(f)?;
        }
    }
    Ok(())
}
