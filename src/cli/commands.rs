use std::path::{Path, PathBuf};

use crate::dom::element::{InputElement, InputHandle, LayoutBox};
use crate::dom::page::PageDom;
use crate::dom::scanner::{DomFormScanner, FormScanner};
use crate::overlay::surface::OverlayConfig;
use crate::report::console::format_console_report;
use crate::report::report_model::SuiteReport;
use crate::scenario::model::ScenarioSpec;
use crate::scenario::runner::ScenarioRunner;
use crate::trace::logger::TraceLogger;

// ============================================================================
// run subcommand
// ============================================================================

/// Run one scenario file or every YAML file in a directory. Returns whether
/// all scenarios passed.
pub fn cmd_run(
    scenario_path: &str,
    config: &OverlayConfig,
    trace_path: Option<&str>,
    verbose: u8,
) -> Result<bool, Box<dyn std::error::Error>> {
    let files = gather_scenario_files(Path::new(scenario_path))?;
    if files.is_empty() {
        return Err(format!("No scenario YAML files found at '{}'", scenario_path).into());
    }

    let mut results = Vec::new();
    for file in &files {
        let spec = ScenarioSpec::from_yaml_file(file)?;

        if verbose > 0 {
            eprintln!("Running scenario '{}' ({})", spec.name, file.display());
        }

        let tracer = match trace_path {
            Some(path) => TraceLogger::new(path),
            None => TraceLogger::disabled(),
        };

        results.push(ScenarioRunner::run(&spec, config, tracer));
    }

    let report = SuiteReport::from_results(scenario_path, results);
    print!("{}", format_console_report(&report));

    Ok(report.all_passed())
}

// ============================================================================
// inspect subcommand
// ============================================================================

/// Build a scenario's initial page and print what the default scanner
/// detects on it.
pub fn cmd_inspect(scenario_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let spec = ScenarioSpec::from_yaml_file(Path::new(scenario_path))?;

    let mut page = PageDom::new(&spec.page.url);
    for form_inputs in &spec.page.forms {
        let form = page.add_form();
        for input_spec in form_inputs {
            let handle = InputHandle::new(
                InputElement::new(input_spec.kind, &input_spec.name)
                    .with_value(&input_spec.value)
                    .with_layout(LayoutBox::new(
                        input_spec.top,
                        input_spec.left,
                        input_spec.width,
                        input_spec.height,
                    )),
            );
            page.append_input(form, handle);
        }
    }

    let forms = DomFormScanner.scan(&page);
    println!(
        "{}: {} login form(s) detected on {}",
        spec.name,
        forms.len(),
        page.url()
    );

    for (i, form) in forms.iter().enumerate() {
        let username = form
            .username_input
            .as_ref()
            .map(|input| input.name())
            .unwrap_or_else(|| "(none)".to_string());
        println!(
            "  form {}: username={} password={}",
            i,
            username,
            form.password_input.name()
        );
    }

    Ok(())
}

/// A single YAML file, or every .yaml/.yml directly inside a directory,
/// sorted by name.
fn gather_scenario_files(path: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    if path.is_dir() {
        let mut files: Vec<PathBuf> = std::fs::read_dir(path)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| {
                matches!(
                    p.extension().and_then(|ext| ext.to_str()),
                    Some("yaml") | Some("yml")
                )
            })
            .collect();
        files.sort();
        Ok(files)
    } else {
        Ok(vec![path.to_path_buf()])
    }
}
