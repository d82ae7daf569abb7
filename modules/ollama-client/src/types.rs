use serde::{Deserialize, Serialize};

/// Body for `POST /api/generate`. `format: "json"` asks the model to emit a
/// JSON object; `stream: false` returns a single complete response.
#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub format: &'a str,
    pub stream: bool,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: String,
}
