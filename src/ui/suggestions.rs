use crate::bridge::protocol::{LoginName, RelayAck, RelayCommand};

/// Parameters the overlay surface receives through its URL fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelParams {
    pub url: String,
    pub is_password: bool,
    pub query: String,
}

impl PanelParams {
    /// Parse `u=<url>&p=<0|1>&q=<prefix>` (a leading `#` is tolerated).
    /// Missing `q` means an empty query; any `p` other than `"1"` means the
    /// anchor is not the password field. Unknown keys are ignored.
    pub fn from_fragment(fragment: &str) -> Self {
        let mut params = Self {
            url: String::new(),
            is_password: false,
            query: String::new(),
        };

        for pair in fragment.trim_start_matches('#').split('&') {
            let Some((key, raw)) = pair.split_once('=') else {
                continue;
            };
            let value = urlencoding::decode(raw)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_default();

            match key {
                "u" => params.url = value,
                "p" => params.is_password = value == "1",
                "q" => params.query = value,
                _ => {}
            }
        }

        params
    }
}

/// Credential storage boundary: candidates for a page URL, or an error
/// message to show the user.
pub trait CandidateStore {
    fn login_names(&self, url: &str) -> Result<Vec<LoginName>, String>;
}

/// Transport boundary toward the background relay. One request, one raw
/// JSON response; a transport failure is an error string.
pub trait FillRelay {
    fn send(&mut self, command: &RelayCommand) -> Result<serde_json::Value, String>;
}

/// UI-context suggestion logic for one overlay surface: candidate
/// filtering and fill dispatch. Rendering is the embedding UI's concern.
pub struct SuggestionsPanel {
    params: PanelParams,
}

impl SuggestionsPanel {
    pub fn new(params: PanelParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PanelParams {
        &self.params
    }

    /// Candidates whose username starts with the query prefix. Filtering
    /// happens client-side; the store only sees the page URL.
    pub fn matching(&self, store: &dyn CandidateStore) -> Result<Vec<LoginName>, String> {
        let names = store.login_names(&self.params.url)?;
        Ok(names
            .into_iter()
            .filter(|name| name.username.starts_with(&self.params.query))
            .collect())
    }

    /// Message shown when `matching` comes back empty.
    pub fn empty_message(&self) -> &'static str {
        if self.params.query.is_empty() {
            "No passwords saved on this website."
        } else {
            "No matching passwords found for this website."
        }
    }

    /// Ask the page context to fill with the chosen credential. Exactly one
    /// request per attempt; transport failures and malformed responses come
    /// back as a user-facing error string and must not be retried
    /// automatically (a retry risks double-submission into the page).
    pub fn request_fill(
        &self,
        relay: &mut dyn FillRelay,
        login_name: &LoginName,
    ) -> Result<(), String> {
        let command = RelayCommand::fill_password(&self.params.url, login_name.clone());
        let response = relay.send(&command)?;
        let ack = parse_ack(&response)?;

        if let Some(error) = ack.error {
            return Err(error);
        }
        if !ack.success {
            return Err("Fill request was not successful".to_string());
        }
        Ok(())
    }
}

/// Validate the relay response shape. Anything without a boolean `success`
/// field is a protocol error, treated as a failed fill.
fn parse_ack(response: &serde_json::Value) -> Result<RelayAck, String> {
    match response.get("success") {
        Some(serde_json::Value::Bool(_)) => serde_json::from_value(response.clone())
            .map_err(|e| format!("Malformed fill response: {}", e)),
        _ => Err("Malformed fill response: missing success flag".to_string()),
    }
}
