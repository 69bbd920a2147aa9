use std::path::PathBuf;

use serde::Deserialize;

use crate::descriptors_dir;
use crate::scenarios::{
    Scenario, ScenarioError, format_error::FormatErrorScenario, formatting::FormattingScenario,
    render::RenderScenario,
};

/// Literal text, either as one string or as lines. Lines are joined with
/// `\n` and get a final newline.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Text {
    Whole(String),
    Lines(Vec<String>),
}

impl Text {
    pub fn to_text(&self) -> String {
        match self {
            Text::Whole(text) => text.clone(),
            Text::Lines(lines) => {
                let mut text = lines.join("\n");
                text.push('\n');
                text
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseData {
    #[serde(default)]
    pub description: Option<String>,
    /// File name under `descriptors/`.
    #[serde(default)]
    pub descriptors: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub input: Option<Text>,
    #[serde(default)]
    pub expected: Option<Text>,
    #[serde(default)]
    pub error: Option<String>,
}

pub struct Case {
    pub path: PathBuf,
    pub data: CaseData,
}

/// Result of running a single scenario
#[derive(Debug, Clone)]
pub enum ScenarioResult {
    Passed,
    Failed { error: String },
}

impl ScenarioResult {
    pub fn is_passed(&self) -> bool {
        matches!(self, ScenarioResult::Passed)
    }
}

/// Named scenario with its result
#[derive(Debug, Clone)]
pub struct NamedScenarioResult {
    pub name: String,
    pub result: ScenarioResult,
}

/// Result of running all scenarios in a case
#[derive(Debug, Clone)]
pub struct CaseResult {
    pub scenarios: Vec<NamedScenarioResult>,
}

impl CaseResult {
    pub fn passed_count(&self) -> usize {
        self.scenarios.iter().filter(|s| s.result.is_passed()).count()
    }

    pub fn total_count(&self) -> usize {
        self.scenarios.len()
    }

    pub fn all_passed(&self) -> bool {
        self.scenarios.iter().all(|s| s.result.is_passed())
    }

    pub fn failed_scenarios(&self) -> Vec<&NamedScenarioResult> {
        self.scenarios.iter().filter(|s| !s.result.is_passed()).collect()
    }
}

impl Case {
    pub fn run_all(&self) -> CaseResult {
        let mut scenarios = Vec::new();
        let data = &self.data;

        if let (Some(descriptors), Some(message), Some(value), Some(expected)) = (
            &data.descriptors,
            &data.message,
            &data.value,
            &data.expected,
        ) {
            let scenario = RenderScenario {
                descriptors: descriptors_dir().join(descriptors),
                message: message.clone(),
                value: value.clone(),
                expected: expected.to_text(),
            };
            scenarios.push(named("render", scenario.run()));
        }

        if let Some(input) = &data.input {
            if let Some(expected) = &data.expected {
                let scenario = FormattingScenario {
                    input: input.to_text(),
                    expected: expected.to_text(),
                };
                scenarios.push(named("formatting", scenario.run()));
            }
            if let Some(error) = &data.error {
                let scenario = FormatErrorScenario {
                    input: input.to_text(),
                    expected_error: error.clone(),
                };
                scenarios.push(named("format_error", scenario.run()));
            }
        }

        if scenarios.is_empty() {
            let error = ScenarioError::NoScenario {
                path: self.path.display().to_string(),
            };
            scenarios.push(named("case", Err(error)));
        }
        CaseResult { scenarios }
    }
}

fn named(name: &str, outcome: Result<(), ScenarioError>) -> NamedScenarioResult {
    let result = match outcome {
        Ok(()) => ScenarioResult::Passed,
        Err(error) => ScenarioResult::Failed {
            error: error.to_string(),
        },
    };
    NamedScenarioResult {
        name: name.to_string(),
        result,
    }
}
