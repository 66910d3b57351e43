use serde::{Deserialize, Serialize};

/// Command arriving in the page context. Closed tagged union: payloads with
/// an unrecognized `cmd` tag fail to decode and are rejected explicitly
/// rather than falling through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd")]
pub enum PageCommand {
    #[serde(rename = "FILL_PASSWORD")]
    FillPassword { username: String, password: String },
}

/// Page-context reply to a fill command. Warnings carry non-fatal per-field
/// problems of an otherwise successful fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillOutcome {
    pub success: bool,
    pub warnings: Vec<String>,
}

impl FillOutcome {
    pub fn ok(warnings: Vec<String>) -> Self {
        Self {
            success: true,
            warnings,
        }
    }
}

/// A stored credential candidate, as supplied by the credential storage
/// collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginName {
    pub username: String,
    pub sites: Vec<String>,
}

/// Fill request sent from the overlay UI to the background relay, which
/// forwards it into the right page context (one JSON message).
#[derive(Debug, Serialize)]
pub struct RelayCommand {
    pub cmd: &'static str,
    pub url: String,
    #[serde(rename = "loginName")]
    pub login_name: LoginName,
    #[serde(rename = "forwardToContentScript")]
    pub forward_to_content_script: bool,
}

impl RelayCommand {
    pub fn fill_password(url: &str, login_name: LoginName) -> Self {
        Self {
            cmd: "FILL_PASSWORD",
            url: url.to_string(),
            login_name,
            forward_to_content_script: true,
        }
    }
}

/// Relay acknowledgement received back in the UI context.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayAck {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}
