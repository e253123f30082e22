//! Request plumbing shared by the HTTP adapters.

use crate::{Result as SessionResult, SessionError};

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

pub(crate) async fn send(request: RequestBuilder) -> SessionResult<Response> {
    Ok(request.send().await?)
}

/// Status plus body; the body is read even for errors so adapters can
/// classify it.
pub(crate) async fn send_for_body(request: RequestBuilder) -> SessionResult<(StatusCode, String)> {
    let response = send(request).await?;
    let status = response.status();
    let body = response.text().await?;
    Ok((status, body))
}

pub(crate) fn parse_json<T: DeserializeOwned>(body: &str) -> SessionResult<T> {
    Ok(serde_json::from_str(body)?)
}

/// Query and fragment parameters of a callback URL, fragment taking
/// precedence (implicit-grant providers put tokens there).
pub(crate) fn callback_param(callback_url: &str, name: &str) -> SessionResult<Option<String>> {
    let url = Url::parse(callback_url).map_err(|e| {
        SessionError::invalid_input(format!("Invalid callback URL: {e}"), Some("callback_url"))
    })?;

    let from_fragment = url.fragment().and_then(|fragment| {
        url::form_urlencoded::parse(fragment.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    });

    Ok(from_fragment.or_else(|| {
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }))
}

pub(crate) fn trim_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
