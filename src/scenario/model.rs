use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dom::element::InputKind;
use crate::engine::events::Key;

/// A complete engine scenario: an initial page plus an ordered script of
/// host actions and assertions. Deserialized from YAML for human review
/// and execution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioSpec {
    /// Human-readable name for this scenario
    pub name: String,

    /// Initial page the engine attaches to
    pub page: PageSpec,

    /// Ordered list of steps to execute
    pub steps: Vec<ScenarioStep>,
}

impl ScenarioSpec {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ScenarioError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageSpec {
    pub url: String,

    /// Forms as ordered input lists
    #[serde(default)]
    pub forms: Vec<Vec<InputSpec>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputSpec {
    pub kind: InputKind,
    pub name: String,

    #[serde(default)]
    pub value: String,

    #[serde(default)]
    pub top: i32,
    #[serde(default)]
    pub left: i32,
    #[serde(default = "default_input_width")]
    pub width: i32,
    #[serde(default = "default_input_height")]
    pub height: i32,
}

// Serde default helpers
fn default_input_width() -> i32 {
    200
}
fn default_input_height() -> i32 {
    30
}

/// A single scripted host action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Focus an input by name
    Focus { input: String },

    /// Blur an input by name
    Blur { input: String },

    /// Set an input's value, then deliver the input event
    TypeValue { input: String, value: String },

    /// Deliver a keydown on an input
    Key { input: String, key: Key },

    /// Signal load on every surface still waiting for it
    LoadSurfaces,

    /// Append an input to an existing form, then notify a mutation
    AddInput { form: usize, input: InputSpec },

    /// Remove an input from the page, then notify a mutation
    RemoveInput { input: String },

    /// Advance the host clock and tick the engine
    Advance { ms: u64 },

    /// Deliver a fill command from the privileged UI context
    Fill { username: String, password: String },

    /// Run assertions against the current engine state
    Assert { assertions: Vec<ScenarioAssertion> },
}

/// A single assertion to evaluate against the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioAssertion {
    /// Number of currently observed inputs
    ObservedCount { expected: usize },

    /// Number of surfaces currently in the document
    SurfaceCount { expected: usize },

    /// Whether a named input is currently observed
    InputObserved { input: String, expected: bool },

    /// Overlay state (closed / open / visible) of an observed input
    OverlayState { input: String, expected: String },

    /// The input's surface source URL contains the expected substring
    SurfaceSrcContains { input: String, expected: String },

    /// An input's current value
    ValueEquals { input: String, expected: String },

    /// Outcome of the most recent fill step
    FillResult {
        success: bool,
        #[serde(default)]
        warnings: Option<Vec<String>>,
    },
}

/// Result of evaluating a single assertion.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AssertionOutcome {
    /// Which step this assertion belongs to (0-indexed)
    pub step_index: usize,

    /// The assertion that was evaluated
    pub spec: ScenarioAssertion,

    /// Whether the assertion passed
    pub passed: bool,

    /// Actual value found (for debugging failures)
    pub actual: Option<String>,

    /// Human-readable failure message
    pub message: Option<String>,
}

/// Result of running a complete scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub scenario_name: String,

    /// Whether all steps and assertions passed
    pub passed: bool,

    pub steps_run: usize,

    pub assertion_results: Vec<AssertionOutcome>,

    /// Error if the scenario aborted (not an assertion failure)
    pub error: Option<String>,
}

#[derive(Debug)]
pub enum ScenarioError {
    Read {
        path: String,
        source: std::io::Error,
    },
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
    UnknownInput {
        name: String,
        step: usize,
    },
    BadFormIndex {
        index: usize,
        step: usize,
    },
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::Read { path, source } => {
                write!(f, "Failed to read scenario '{}': {}", path, source)
            }
            ScenarioError::Parse { path, source } => {
                write!(f, "Failed to parse scenario '{}': {}", path, source)
            }
            ScenarioError::UnknownInput { name, step } => {
                write!(f, "Step {} references unknown input '{}'", step, name)
            }
            ScenarioError::BadFormIndex { index, step } => {
                write!(f, "Step {} references missing form index {}", step, index)
            }
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScenarioError::Read { source, .. } => Some(source),
            ScenarioError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}
