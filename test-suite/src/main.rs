//! Runs every case file and prints one line per case, then the failures.
//!
//! ```text
//!   PASS render/proposal 1/1
//!   FAIL format/alignment 1/2
//! ```

use std::path::Path;

use clap::Parser;
use rayon::prelude::*;
use test_suite::{Case, CaseResult, CollectCasesError, ScenarioResult, cases_dir, collect_cases};

#[derive(Parser)]
#[command(name = "test-suite", about = "protolit test suite runner")]
struct Args {
    /// Only run cases whose name contains this text
    #[arg(short, long)]
    filter: Option<String>,

    /// Print the first line of each failure only
    #[arg(short, long)]
    short: bool,
}

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const DIM: &str = "\x1b[2m";

fn paint(color: &str, text: impl std::fmt::Display) -> String {
    format!("\x1b[1m{color}{text}\x1b[0m")
}

/// Case name relative to `cases/`, without the extension.
fn case_name(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .with_extension("")
        .display()
        .to_string()
}

#[derive(Default)]
struct Report {
    cases_passed: usize,
    cases_failed: usize,
    scenarios_passed: usize,
    scenarios_total: usize,
    failures: Vec<(String, Vec<String>)>,
}

impl Report {
    fn record(&mut self, name: String, result: &CaseResult, short: bool) {
        self.scenarios_passed += result.passed_count();
        self.scenarios_total += result.total_count();
        let counts = format!("{DIM}{}/{}\x1b[0m", result.passed_count(), result.total_count());
        if result.all_passed() {
            println!("  {} {name} {counts}", paint(GREEN, "PASS"));
            self.cases_passed += 1;
            return;
        }
        println!("  {} {name} {counts}", paint(RED, "FAIL"));
        self.cases_failed += 1;
        let details = result
            .failed_scenarios()
            .into_iter()
            .filter_map(|scenario| match &scenario.result {
                ScenarioResult::Failed { error } if short => Some(format!(
                    "{}: {}",
                    scenario.name,
                    error.lines().next().unwrap_or_default()
                )),
                ScenarioResult::Failed { error } => Some(format!("{}: {error}", scenario.name)),
                ScenarioResult::Passed => None,
            })
            .collect();
        self.failures.push((name, details));
    }

    fn record_load_error(&mut self, name: String, error: &CollectCasesError) {
        println!("  {} {name}", paint(RED, "LOAD ERROR"));
        self.cases_failed += 1;
        self.failures.push((name, vec![error.to_string()]));
    }

    fn print_summary(&self) {
        println!("\n{}", paint(CYAN, "Summary"));
        println!(
            "  Cases:     {} passed, {} failed, {} total",
            self.cases_passed,
            self.cases_failed,
            self.cases_passed + self.cases_failed
        );
        println!(
            "  Scenarios: {} passed, {} failed, {} total",
            self.scenarios_passed,
            self.scenarios_total - self.scenarios_passed,
            self.scenarios_total
        );

        if !self.failures.is_empty() {
            println!("\n{}", paint(RED, "Failures"));
        }
        for (name, details) in &self.failures {
            println!("\n  {}", paint(RED, name));
            for line in details.iter().flat_map(|detail| detail.lines()) {
                println!("    {line}");
            }
        }
    }
}

fn main() {
    let args = Args::parse();
    std::process::exit(run(&args));
}

fn run(args: &Args) -> i32 {
    println!("\n{}\n", paint(CYAN, "protolit test suite"));

    let base = cases_dir();
    let cases = match collect_cases() {
        Ok(cases) => cases,
        Err(e) => {
            eprintln!("{} failed to collect test cases: {e}", paint(RED, "error:"));
            return 1;
        }
    };

    let name_of = |case: &Result<Case, CollectCasesError>| match case {
        Ok(case) => case_name(&case.path, &base),
        Err(error) => case_name(error.path(), &base),
    };
    let cases: Vec<_> = cases
        .into_iter()
        .filter(|case| {
            args.filter
                .as_deref()
                .is_none_or(|filter| name_of(case).contains(filter))
        })
        .collect();

    if cases.is_empty() {
        println!("{} no test cases found", paint(YELLOW, "warning:"));
        return 0;
    }

    // Collecting from par_iter keeps the input order.
    let results: Vec<Option<CaseResult>> = cases
        .par_iter()
        .map(|case| case.as_ref().ok().map(Case::run_all))
        .collect();

    let mut report = Report::default();
    for (case, result) in cases.iter().zip(&results) {
        match (case, result) {
            (Ok(_), Some(result)) => report.record(name_of(case), result, args.short),
            (Err(error), _) => report.record_load_error(name_of(case), error),
            (Ok(_), None) => {}
        }
    }
    report.print_summary();

    println!();
    if report.cases_failed == 0 {
        println!("{}", paint(GREEN, "All tests passed!"));
        0
    } else {
        println!("{}", paint(RED, format!("{} test(s) failed.", report.cases_failed)));
        1
    }
}
