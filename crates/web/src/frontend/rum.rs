//! RUM forwarding to the browser SDK.
//!
//! The page loads the RUM browser SDK, which exposes itself as
//! `window.DD_RUM`; events are handed to its `addAction` / `addError`.

use serde::Serialize;
use shopfront_observability::{RumConfig, RumEvent, RumSink};
use wasm_bindgen::prelude::*;
use web_sys::window;

const SDK_GLOBAL: &str = "DD_RUM";

/// Options passed to the SDK's `init`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SdkInit<'a> {
    application_id: &'a str,
    client_token: &'a str,
    service: &'a str,
    env: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    proxy: Option<&'a str>,
}

/// Start the RUM browser SDK with the storefront's settings.
///
/// Without a client token the SDK cannot report, so it is left alone and
/// events are dropped. A configured collector URL is used as the SDK proxy.
pub fn init_sdk(config: &RumConfig) {
    let Some(client_token) = config.client_token.as_deref() else {
        tracing::warn!("no RUM client token configured; RUM reporting disabled");
        return;
    };

    let options = SdkInit {
        application_id: &config.application_id,
        client_token,
        service: &config.service,
        env: &config.env,
        proxy: config.collector_url.as_deref(),
    };

    match call_sdk("init", &options) {
        Ok(()) => tracing::info!("RUM SDK initialized for {}", config.application_id),
        Err(e) => tracing::warn!("RUM SDK not initialized: {}", e),
    }
}

/// Sink that forwards events to the RUM browser SDK.
///
/// Events are dropped (with a log line) if the SDK is not loaded.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserRumSink;

impl RumSink for BrowserRumSink {
    fn emit(&self, event: RumEvent) {
        if let Err(e) = forward(&event) {
            tracing::warn!("RUM event dropped: {}", e);
        }
    }
}

fn sdk() -> Result<JsValue, String> {
    let window = window().ok_or_else(|| "No window object".to_string())?;

    let sdk = js_sys::Reflect::get(&window, &JsValue::from_str(SDK_GLOBAL))
        .map_err(|e| format!("Failed to get {}: {:?}", SDK_GLOBAL, e))?;
    if sdk.is_undefined() || sdk.is_null() {
        return Err(format!("{} is not loaded", SDK_GLOBAL));
    }
    Ok(sdk)
}

fn sdk_function(sdk: &JsValue, method: &str) -> Result<js_sys::Function, String> {
    let function = js_sys::Reflect::get(sdk, &JsValue::from_str(method))
        .map_err(|e| format!("Failed to get {}: {:?}", method, e))?;
    Ok(js_sys::Function::from(function))
}

fn call_sdk(method: &str, arg: &impl Serialize) -> Result<(), String> {
    let sdk = sdk()?;
    let arg = arg
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| format!("Failed to serialize {} options: {:?}", method, e))?;

    sdk_function(&sdk, method)?
        .call1(&sdk, &arg)
        .map_err(|e| format!("{} failed: {:?}", method, e))?;
    Ok(())
}

fn forward(event: &RumEvent) -> Result<(), String> {
    let sdk = sdk()?;

    let (method, first_arg): (&str, JsValue) = match event {
        RumEvent::Action { name, .. } => ("addAction", JsValue::from_str(name)),
        RumEvent::Error { message, .. } => ("addError", js_sys::Error::new(message).into()),
    };

    // Plain JS objects, not `Map`s, so the SDK sees ordinary attributes.
    let context = event
        .context()
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| format!("Failed to serialize context: {:?}", e))?;

    sdk_function(&sdk, method)?
        .call2(&sdk, &first_arg, &context)
        .map_err(|e| format!("{} failed: {:?}", method, e))?;

    Ok(())
}
