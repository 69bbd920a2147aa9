use protolit_fmt::canonicalize;

use crate::scenarios::{Scenario, ScenarioError};

pub struct FormattingScenario {
    pub input: String,
    pub expected: String,
}

impl Scenario for FormattingScenario {
    fn run(self) -> Result<(), ScenarioError> {
        let format = |text: &str| {
            canonicalize(text).map_err(|e| ScenarioError::FormattingError {
                message: e.to_string(),
            })
        };

        let actual = format(&self.input)?;
        if actual != self.expected {
            return Err(ScenarioError::FormattingMismatch {
                input: self.input,
                expected: self.expected,
                actual,
            });
        }

        let again = format(&actual)?;
        if again != actual {
            return Err(ScenarioError::NotIdempotent {
                expected: actual,
                actual: again,
            });
        }
        Ok(())
    }
}
