use test_suite::{ScenarioResult, collect_cases};

#[test]
fn run_all_test_cases() {
    let cases = collect_cases().expect("Failed to collect test cases");
    assert!(!cases.is_empty(), "no case files found");

    let mut failures = Vec::new();
    for case in &cases {
        let case = match case {
            Ok(case) => case,
            Err(error) => {
                failures.push(error.to_string());
                continue;
            }
        };
        for scenario in case.run_all().scenarios {
            if let ScenarioResult::Failed { error } = scenario.result {
                failures.push(format!(
                    "{} ({}):\n{}",
                    case.path.display(),
                    scenario.name,
                    error
                ));
            }
        }
    }

    for failure in &failures {
        println!("\n[FAIL] {failure}");
    }
    assert!(
        failures.is_empty(),
        "Test suite failed with {} failures",
        failures.len()
    );
}
