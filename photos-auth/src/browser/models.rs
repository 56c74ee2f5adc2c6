use serde::Deserialize;

/// Response of the provider's token-info endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenInfo {
    #[serde(default)]
    pub scope: String,
    pub expires_in: Option<String>,
    pub email: Option<String>,
}

/// Parameters the provider appends to the loopback redirect.
#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
pub struct RedirectParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

impl RedirectParams {
    pub fn is_complete(&self) -> bool {
        self.code.is_some() || self.error.is_some()
    }
}
