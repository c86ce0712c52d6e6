//! `fetch` client for the wordbook and settings endpoints.

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::api::{self, Accent, Settings};
use crate::error::AppError;

async fn send(method: &str, url: &str, body: Option<String>) -> Result<String, AppError> {
    let win = super::window()?;
    let init = RequestInit::new();
    init.set_method(method);
    if let Some(body) = &body {
        init.set_body(&JsValue::from_str(body));
    }
    let request = Request::new_with_str_and_init(url, &init)?;
    request.headers().set("Accept", "application/json")?;
    if body.is_some() {
        request.headers().set("Content-Type", "application/json")?;
    }

    let resp: Response = JsFuture::from(win.fetch_with_request(&request))
        .await?
        .dyn_into()?;
    if !resp.ok() {
        return Err(AppError::Http {
            status: resp.status(),
            url: url.to_string(),
        });
    }
    let text = JsFuture::from(resp.text()?).await?;
    text.as_string()
        .ok_or_else(|| AppError::Js(format!("{method} {url}: body is not text")))
}

pub async fn get_wordbooks() -> Result<Vec<String>, AppError> {
    let body = send("GET", api::WORDBOOKS_PATH, None).await?;
    Ok(api::decode_wordbook_list(&body)?)
}

/// Words of one wordbook, already normalised.
pub async fn get_words(name: &str) -> Result<Vec<String>, AppError> {
    let name = api::validate_wordbook_name(name)?;
    let url = format!(
        "{}/{}",
        api::WORDBOOKS_PATH,
        String::from(js_sys::encode_uri_component(name))
    );
    let body = send("GET", &url, None).await?;
    Ok(api::decode_wordbook_words(&body)?.words)
}

pub async fn get_settings() -> Result<Settings, AppError> {
    let body = send("GET", api::SETTINGS_PATH, None).await?;
    Ok(api::decode_settings(&body)?)
}

pub async fn put_accent(accent: Accent) -> Result<Settings, AppError> {
    let body = api::encode_accent(accent)?;
    let reply = send("PUT", api::SETTINGS_ACCENT_PATH, Some(body)).await?;
    Ok(api::decode_settings(&reply)?)
}

pub async fn put_wordbook(name: &str) -> Result<Settings, AppError> {
    let body = api::encode_wordbook(name)?;
    let reply = send("PUT", api::SETTINGS_WORDBOOK_PATH, Some(body)).await?;
    Ok(api::decode_settings(&reply)?)
}
