use std::fs;
use std::path::PathBuf;

use protolit::try_render;
use protolit_fmt::canonicalize;
use protolit_reflect::{DescriptorPool, DynamicMessage};

use crate::scenarios::{Scenario, ScenarioError};

pub struct RenderScenario {
    pub descriptors: PathBuf,
    pub message: String,
    pub value: serde_json::Value,
    pub expected: String,
}

impl Scenario for RenderScenario {
    fn run(self) -> Result<(), ScenarioError> {
        let preprocessing = |message: String| ScenarioError::PreprocessingError { message };

        let text = fs::read_to_string(&self.descriptors)
            .map_err(|e| preprocessing(format!("{}: {e}", self.descriptors.display())))?;
        let pool = DescriptorPool::from_json(&text)
            .map_err(|e| preprocessing(format!("{}: {e}", self.descriptors.display())))?;
        let descriptor = pool
            .get_message_by_name(&self.message)
            .ok_or_else(|| preprocessing(format!("unknown message `{}`", self.message)))?;
        let message = DynamicMessage::from_json(&descriptor, &self.value)
            .map_err(|e| preprocessing(e.to_string()))?;

        let actual = try_render(&message).map_err(|e| ScenarioError::RenderError {
            message: e.to_string(),
        })?;
        if actual != self.expected {
            return Err(ScenarioError::RenderMismatch {
                expected: self.expected,
                actual,
            });
        }

        let again = canonicalize(&actual).map_err(|e| ScenarioError::RenderError {
            message: e.to_string(),
        })?;
        if again != actual {
            return Err(ScenarioError::NotIdempotent {
                expected: actual,
                actual: again,
            });
        }
        Ok(())
    }
}
