//! Error types shared by the engine, the API layer and the browser shell.

use wasm_bindgen::JsValue;

/// Reasons a session cannot be started.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("the selected wordbook has no words")]
    EmptyWordList,

    #[error("no session to restart")]
    NoSession,

    #[error("playfield {width}x{height} is too small to play on")]
    InvalidPlayfield { width: f64, height: f64 },
}

/// Validation and decoding failures for the HTTP API payloads.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unsupported accent {0:?} (expected en-US or en-GB)")]
    InvalidAccent(String),

    #[error("invalid wordbook name {0:?}")]
    InvalidWordbookName(String),

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can go wrong inside the browser shell.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("missing DOM element: {0}")]
    MissingDom(&'static str),

    #[error("javascript error: {0}")]
    Js(String),

    #[error("request to {url} failed with status {status}")]
    Http { status: u16, url: String },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl From<JsValue> for AppError {
    fn from(value: JsValue) -> Self {
        let text = value
            .as_string()
            .or_else(|| js_sys::JSON::stringify(&value).ok().map(String::from))
            .unwrap_or_else(|| "unknown".to_string());
        AppError::Js(text)
    }
}

impl From<AppError> for JsValue {
    fn from(err: AppError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
