use protolit_fmt::canonicalize;

use crate::scenarios::{Scenario, ScenarioError};

pub struct FormatErrorScenario {
    pub input: String,
    /// Display form of the error, `line:column: message`.
    pub expected_error: String,
}

impl Scenario for FormatErrorScenario {
    fn run(self) -> Result<(), ScenarioError> {
        match canonicalize(&self.input) {
            Ok(output) => Err(ScenarioError::ExpectedFormattingToFail {
                expected_error: self.expected_error,
                output,
            }),
            Err(error) if error.to_string() == self.expected_error => Ok(()),
            Err(error) => Err(ScenarioError::FormatErrorMismatch {
                expected: self.expected_error,
                actual: error.to_string(),
            }),
        }
    }
}
