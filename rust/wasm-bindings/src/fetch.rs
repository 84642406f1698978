// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP asset source backed by `window.fetch`

use crate::utils::{js_error_message, window};
use floorplan3d_scene::{AssetSource, LoadError};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// Fetches documents relative to a base URL
#[derive(Debug, Clone, Default)]
pub struct HttpSource {
    base: String,
}

impl HttpSource {
    /// Paths resolve against `base`; an empty base leaves them page-relative
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn url(&self, path: &str) -> String {
        let base = self.base.trim_end_matches('/');
        if base.is_empty() || path.contains("://") || path.starts_with('/') {
            path.to_string()
        } else {
            format!("{}/{}", base, path.trim_start_matches("./"))
        }
    }
}

/// Absolute URLs may point at another origin and need CORS
fn request_mode(url: &str) -> RequestMode {
    if url.contains("://") {
        RequestMode::Cors
    } else {
        RequestMode::SameOrigin
    }
}

fn transport(value: JsValue) -> LoadError {
    LoadError::Transport(js_error_message(&value))
}

impl AssetSource for HttpSource {
    async fn fetch_text(&self, path: &str) -> Result<String, LoadError> {
        let url = self.url(path);

        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(request_mode(&url));
        let request = Request::new_with_str_and_init(&url, &opts).map_err(transport)?;

        let window = window().map_err(transport)?;
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(transport)?
            .dyn_into()
            .map_err(transport)?;

        match response.status() {
            404 => return Err(LoadError::NotFound(url)),
            status if !response.ok() => return Err(LoadError::Status(status)),
            _ => {}
        }

        JsFuture::from(response.text().map_err(transport)?)
            .await
            .map_err(transport)?
            .as_string()
            .ok_or_else(|| LoadError::Transport(format!("Body of {} is not text", url)))
    }
}
