use std::collections::HashMap;
use std::time::Duration;

use crate::bridge::dispatch::BridgeError;
use crate::bridge::protocol::{FillOutcome, PageCommand};
use crate::dom::element::{InputElement, InputHandle, LayoutBox};
use crate::dom::page::PageDom;
use crate::dom::scanner::DomFormScanner;
use crate::engine::engine::Engine;
use crate::engine::events::DomEvent;
use crate::overlay::surface::OverlayConfig;
use crate::scenario::model::{
    AssertionOutcome, InputSpec, ScenarioAssertion, ScenarioError, ScenarioResult, ScenarioSpec,
    ScenarioStep,
};
use crate::trace::logger::TraceLogger;

/// Executes a ScenarioSpec step-by-step against a fresh engine.
pub struct ScenarioRunner;

struct RunState {
    engine: Engine,
    inputs: HashMap<String, InputHandle>,
    now: Duration,
    last_fill: Option<Result<FillOutcome, BridgeError>>,
    assertion_results: Vec<AssertionOutcome>,
}

impl ScenarioRunner {
    /// Run a complete scenario.
    ///
    /// Returns a ScenarioResult with pass/fail status, assertion outcomes,
    /// and any error that aborted execution.
    pub fn run(spec: &ScenarioSpec, config: &OverlayConfig, tracer: TraceLogger) -> ScenarioResult {
        let mut page = PageDom::new(&spec.page.url);
        let mut inputs = HashMap::new();

        for form_inputs in &spec.page.forms {
            let form = page.add_form();
            for input_spec in form_inputs {
                let handle = build_input(input_spec);
                inputs.insert(input_spec.name.clone(), handle.clone());
                page.append_input(form, handle);
            }
        }

        let engine = Engine::attach(page, Box::new(DomFormScanner), config.clone(), tracer);

        let mut state = RunState {
            engine,
            inputs,
            now: Duration::ZERO,
            last_fill: None,
            assertion_results: Vec::new(),
        };

        for (i, step) in spec.steps.iter().enumerate() {
            if let Err(e) = Self::execute_step(step, i, &mut state) {
                return ScenarioResult {
                    scenario_name: spec.name.clone(),
                    passed: false,
                    steps_run: i + 1,
                    assertion_results: state.assertion_results,
                    error: Some(format!("Step {} failed: {}", i, e)),
                };
            }
        }

        let passed = state.assertion_results.iter().all(|r| r.passed);
        ScenarioResult {
            scenario_name: spec.name.clone(),
            passed,
            steps_run: spec.steps.len(),
            assertion_results: state.assertion_results,
            error: None,
        }
    }

    fn execute_step(
        step: &ScenarioStep,
        step_index: usize,
        state: &mut RunState,
    ) -> Result<(), ScenarioError> {
        match step {
            ScenarioStep::Focus { input } => {
                let handle = lookup(&state.inputs, input, step_index)?;
                state.engine.dispatch(&handle, DomEvent::Focus);
                Ok(())
            }

            ScenarioStep::Blur { input } => {
                let handle = lookup(&state.inputs, input, step_index)?;
                state.engine.dispatch(&handle, DomEvent::Blur);
                Ok(())
            }

            ScenarioStep::TypeValue { input, value } => {
                let handle = lookup(&state.inputs, input, step_index)?;
                handle.set_value(value);
                state.engine.dispatch(&handle, DomEvent::Input);
                Ok(())
            }

            ScenarioStep::Key { input, key } => {
                let handle = lookup(&state.inputs, input, step_index)?;
                state
                    .engine
                    .dispatch(&handle, DomEvent::Keydown(key.clone()));
                Ok(())
            }

            ScenarioStep::LoadSurfaces => {
                let pending: Vec<_> = state
                    .engine
                    .page()
                    .surface_ids()
                    .into_iter()
                    .filter(|id| {
                        state
                            .engine
                            .page()
                            .surface(*id)
                            .is_some_and(|surface| !surface.loaded)
                    })
                    .collect();

                for id in pending {
                    state.engine.surface_loaded(id);
                }
                Ok(())
            }

            ScenarioStep::AddInput { form, input } => {
                let handle = build_input(input);
                if !state.engine.page_mut().append_input(*form, handle.clone()) {
                    return Err(ScenarioError::BadFormIndex {
                        index: *form,
                        step: step_index,
                    });
                }
                state.inputs.insert(input.name.clone(), handle);
                state.engine.notify_mutation(state.now);
                Ok(())
            }

            ScenarioStep::RemoveInput { input } => {
                let handle = lookup(&state.inputs, input, step_index)?;
                state.engine.page_mut().remove_input(&handle);
                state.engine.notify_mutation(state.now);
                Ok(())
            }

            ScenarioStep::Advance { ms } => {
                state.now += Duration::from_millis(*ms);
                state.engine.tick(state.now);
                Ok(())
            }

            ScenarioStep::Fill { username, password } => {
                let command = PageCommand::FillPassword {
                    username: username.clone(),
                    password: password.clone(),
                };
                state.last_fill = Some(state.engine.deliver(&command));
                Ok(())
            }

            ScenarioStep::Assert { assertions } => {
                for spec in assertions {
                    let outcome = Self::evaluate_one(spec, step_index, state);
                    state.assertion_results.push(outcome);
                }
                Ok(())
            }
        }
    }

    fn evaluate_one(
        spec: &ScenarioAssertion,
        step_index: usize,
        state: &RunState,
    ) -> AssertionOutcome {
        match spec {
            ScenarioAssertion::ObservedCount { expected } => {
                let actual = state.engine.registry().len();
                outcome(
                    step_index,
                    spec,
                    actual == *expected,
                    Some(actual.to_string()),
                    format!("Observed {} inputs but expected {}", actual, expected),
                )
            }

            ScenarioAssertion::SurfaceCount { expected } => {
                let actual = state.engine.page().surface_count();
                outcome(
                    step_index,
                    spec,
                    actual == *expected,
                    Some(actual.to_string()),
                    format!("{} surfaces in document but expected {}", actual, expected),
                )
            }

            ScenarioAssertion::InputObserved { input, expected } => {
                match state.inputs.get(input) {
                    Some(handle) => {
                        let actual = state.engine.registry().contains(handle);
                        outcome(
                            step_index,
                            spec,
                            actual == *expected,
                            Some(actual.to_string()),
                            format!("Input '{}' observed={} but expected {}", input, actual, expected),
                        )
                    }
                    None => missing_input(step_index, spec, input),
                }
            }

            ScenarioAssertion::OverlayState { input, expected } => {
                match state.inputs.get(input) {
                    Some(handle) => match state.engine.overlay_state(handle) {
                        Some(actual) => outcome(
                            step_index,
                            spec,
                            actual.as_str() == expected,
                            Some(actual.as_str().to_string()),
                            format!(
                                "Overlay for '{}' is {} but expected {}",
                                input,
                                actual.as_str(),
                                expected
                            ),
                        ),
                        None => outcome(
                            step_index,
                            spec,
                            false,
                            Some("unobserved".to_string()),
                            format!("Input '{}' is not observed", input),
                        ),
                    },
                    None => missing_input(step_index, spec, input),
                }
            }

            ScenarioAssertion::SurfaceSrcContains { input, expected } => {
                match state.inputs.get(input) {
                    Some(handle) => match state.engine.surface_src(handle) {
                        Some(src) => {
                            let passed = src.contains(expected.as_str());
                            outcome(
                                step_index,
                                spec,
                                passed,
                                Some(src),
                                format!("Surface src does not contain '{}'", expected),
                            )
                        }
                        None => outcome(
                            step_index,
                            spec,
                            false,
                            None,
                            format!("Input '{}' has no open surface", input),
                        ),
                    },
                    None => missing_input(step_index, spec, input),
                }
            }

            ScenarioAssertion::ValueEquals { input, expected } => {
                match state.inputs.get(input) {
                    Some(handle) => {
                        let actual = handle.value();
                        outcome(
                            step_index,
                            spec,
                            actual == *expected,
                            Some(actual.clone()),
                            format!("Input '{}' holds '{}' but expected '{}'", input, actual, expected),
                        )
                    }
                    None => missing_input(step_index, spec, input),
                }
            }

            ScenarioAssertion::FillResult { success, warnings } => match &state.last_fill {
                Some(Ok(fill)) => {
                    let mut passed = fill.success == *success;
                    if let Some(expected_warnings) = warnings {
                        passed = passed && fill.warnings == *expected_warnings;
                    }
                    outcome(
                        step_index,
                        spec,
                        passed,
                        Some(format!("success={} warnings={:?}", fill.success, fill.warnings)),
                        "Fill outcome did not match".to_string(),
                    )
                }
                Some(Err(error)) => outcome(
                    step_index,
                    spec,
                    !*success,
                    Some(error.to_string()),
                    format!("Fill failed: {}", error),
                ),
                None => outcome(
                    step_index,
                    spec,
                    false,
                    None,
                    "No fill step has run yet".to_string(),
                ),
            },
        }
    }
}

fn outcome(
    step_index: usize,
    spec: &ScenarioAssertion,
    passed: bool,
    actual: Option<String>,
    failure: String,
) -> AssertionOutcome {
    AssertionOutcome {
        step_index,
        spec: spec.clone(),
        passed,
        actual,
        message: if passed { None } else { Some(failure) },
    }
}

fn missing_input(step_index: usize, spec: &ScenarioAssertion, name: &str) -> AssertionOutcome {
    outcome(
        step_index,
        spec,
        false,
        None,
        format!("Unknown input '{}'", name),
    )
}

fn lookup(
    inputs: &HashMap<String, InputHandle>,
    name: &str,
    step: usize,
) -> Result<InputHandle, ScenarioError> {
    inputs
        .get(name)
        .cloned()
        .ok_or_else(|| ScenarioError::UnknownInput {
            name: name.to_string(),
            step,
        })
}

fn build_input(spec: &InputSpec) -> InputHandle {
    InputHandle::new(
        InputElement::new(spec.kind, &spec.name)
            .with_value(&spec.value)
            .with_layout(LayoutBox::new(spec.top, spec.left, spec.width, spec.height)),
    )
}
