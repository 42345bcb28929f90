//! Minimal `fetch` wrapper for the remote collaborators

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

use crate::error::GameError;

/// Perform a request and return the body text of a 2xx response.
///
/// `call` names the operation in errors and logs.
pub async fn send(
    call: &'static str,
    method: &str,
    url: &str,
    bearer: Option<&str>,
    json_body: Option<String>,
) -> Result<String, GameError> {
    let js_err = |e: JsValue| GameError::remote(call, format!("{:?}", e));

    let headers = Headers::new().map_err(js_err)?;
    if let Some(token) = bearer {
        headers
            .set("Authorization", &format!("Bearer {}", token))
            .map_err(js_err)?;
    }

    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::Cors);
    if let Some(body) = json_body {
        headers
            .set("Content-Type", "application/json")
            .map_err(js_err)?;
        opts.set_body(&JsValue::from_str(&body));
    }
    opts.set_headers(&headers);

    let request = Request::new_with_str_and_init(url, &opts).map_err(js_err)?;
    let window = web_sys::window().ok_or_else(|| GameError::remote(call, "no window"))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;

    let text = JsFuture::from(response.text().map_err(js_err)?)
        .await
        .map_err(js_err)?
        .as_string()
        .unwrap_or_default();

    if !response.ok() {
        return Err(GameError::remote(
            call,
            format!("HTTP {}: {}", response.status(), text),
        ));
    }
    Ok(text)
}

/// Fire a request in the background, logging any failure
pub fn send_and_forget(
    call: &'static str,
    method: &'static str,
    url: String,
    bearer: Option<String>,
    json_body: Option<String>,
) {
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = send(call, method, &url, bearer.as_deref(), json_body).await {
            log::error!("{}", e);
        }
    });
}
