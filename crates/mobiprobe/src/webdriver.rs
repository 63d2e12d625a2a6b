//! Blocking W3C WebDriver client for Appium and BrowserStack.
//!
//! Speaks the JSON-over-HTTP wire protocol directly. Responses from older
//! JSON Wire Protocol servers (numeric `status`, `ELEMENT` keys) are accepted
//! too, since some Appium 1.x grids still answer that way.

use crate::locator::Locator;
use crate::result::{ProbeError, ProbeResult};
use crate::session::{ElementHandle, MobileSession};
use base64::Engine;
use reqwest::blocking::Client;
use reqwest::Method;
use serde_json::{json, Map, Value};
use std::time::Duration;

/// W3C web element identifier key
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// JSON Wire Protocol element identifier key
pub const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

/// HTTP timeout for a single command. Session creation on a cloud grid can
/// take minutes while a device is provisioned.
const COMMAND_TIMEOUT: Duration = Duration::from_secs(300);

/// A session on a remote WebDriver end.
#[derive(Debug)]
pub struct RemoteSession {
    endpoint: String,
    session_id: String,
    capabilities: Value,
    client: Client,
}

impl RemoteSession {
    /// Create a new session with the given desired capabilities.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::SessionCreation`] when the endpoint is
    /// unreachable or rejects the capabilities.
    pub fn start(endpoint: &str, capabilities: &Map<String, Value>) -> ProbeResult<Self> {
        let endpoint = endpoint.trim_end_matches('/').to_string();
        let client = Client::builder().timeout(COMMAND_TIMEOUT).build()?;
        let body = json!({
            "capabilities": { "alwaysMatch": capabilities, "firstMatch": [{}] },
            "desiredCapabilities": capabilities,
        });

        tracing::info!(%endpoint, "creating remote session");
        let creation_error = |message: String| ProbeError::SessionCreation {
            endpoint: endpoint.clone(),
            message,
        };
        let resp = client
            .post(format!("{endpoint}/session"))
            .json(&body)
            .send()
            .map_err(|e| creation_error(e.to_string()))?;
        let status = resp.status().as_u16();
        let payload: Value = resp.json().map_err(|e| creation_error(e.to_string()))?;

        let (session_id, capabilities) =
            parse_new_session(status, &payload).map_err(|e| creation_error(e.to_string()))?;
        tracing::info!(%endpoint, %session_id, "remote session created");

        Ok(Self {
            endpoint,
            session_id,
            capabilities,
            client,
        })
    }

    /// Session id assigned by the remote end
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Capabilities the remote end reported for the session
    #[must_use]
    pub const fn capabilities(&self) -> &Value {
        &self.capabilities
    }

    fn url(&self, path: &str) -> String {
        if path.is_empty() {
            format!("{}/session/{}", self.endpoint, self.session_id)
        } else {
            format!("{}/session/{}/{path}", self.endpoint, self.session_id)
        }
    }

    fn command(&self, method: Method, path: &str, body: Option<Value>, subject: &str) -> ProbeResult<Value> {
        tracing::debug!(%method, path, "webdriver command");
        let mut request = self.client.request(method, self.url(path));
        if let Some(body) = body {
            request = request.json(&body);
        }
        let resp = request.send()?;
        let status = resp.status().as_u16();
        let text = resp.text()?;
        let payload: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };
        parse_response(status, payload, subject)
    }

    fn element_get(&self, element: &ElementHandle, what: &str) -> ProbeResult<Value> {
        self.command(
            Method::GET,
            &format!("element/{}/{what}", element.id),
            None,
            &element.id,
        )
    }

    fn element_post(&self, element: &ElementHandle, what: &str, body: Value) -> ProbeResult<()> {
        self.command(
            Method::POST,
            &format!("element/{}/{what}", element.id),
            Some(body),
            &element.id,
        )
        .map(drop)
    }
}

impl MobileSession for RemoteSession {
    fn find_element(&self, locator: &Locator) -> ProbeResult<ElementHandle> {
        let value = self.command(
            Method::POST,
            "element",
            Some(locator_body(locator)),
            locator.selector(),
        )?;
        element_id(&value)
            .map(ElementHandle::new)
            .ok_or_else(|| ProbeError::NoSuchElement {
                selector: locator.selector().to_string(),
            })
    }

    fn find_elements(&self, locator: &Locator) -> ProbeResult<Vec<ElementHandle>> {
        let value = self.command(
            Method::POST,
            "elements",
            Some(locator_body(locator)),
            locator.selector(),
        )?;
        Ok(value
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(element_id)
                    .map(ElementHandle::new)
                    .collect()
            })
            .unwrap_or_default())
    }

    fn is_displayed(&self, element: &ElementHandle) -> ProbeResult<bool> {
        Ok(self.element_get(element, "displayed")?.as_bool().unwrap_or(false))
    }

    fn is_enabled(&self, element: &ElementHandle) -> ProbeResult<bool> {
        Ok(self.element_get(element, "enabled")?.as_bool().unwrap_or(false))
    }

    fn is_selected(&self, element: &ElementHandle) -> ProbeResult<bool> {
        Ok(self.element_get(element, "selected")?.as_bool().unwrap_or(false))
    }

    fn click(&self, element: &ElementHandle) -> ProbeResult<()> {
        self.element_post(element, "click", json!({}))
    }

    fn move_to_and_click(&self, element: &ElementHandle) -> ProbeResult<()> {
        self.command(
            Method::POST,
            "actions",
            Some(tap_actions(element)),
            &element.id,
        )
        .map(drop)
    }

    fn clear(&self, element: &ElementHandle) -> ProbeResult<()> {
        self.element_post(element, "clear", json!({}))
    }

    fn send_keys(&self, element: &ElementHandle, text: &str) -> ProbeResult<()> {
        let chars: Vec<String> = text.chars().map(String::from).collect();
        self.element_post(element, "value", json!({ "text": text, "value": chars }))
    }

    fn text(&self, element: &ElementHandle) -> ProbeResult<String> {
        Ok(self
            .element_get(element, "text")?
            .as_str()
            .unwrap_or_default()
            .to_string())
    }

    fn attribute(&self, element: &ElementHandle, name: &str) -> ProbeResult<Option<String>> {
        let value = self.element_get(element, &format!("attribute/{name}"))?;
        Ok(match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        })
    }

    fn back(&self) -> ProbeResult<()> {
        self.command(Method::POST, "back", Some(json!({})), "back")
            .map(drop)
    }

    fn reset(&self) -> ProbeResult<()> {
        self.command(Method::POST, "appium/app/reset", Some(json!({})), "reset")
            .map(drop)
    }

    fn screenshot_png(&self) -> ProbeResult<Vec<u8>> {
        let value = self.command(Method::GET, "screenshot", None, "screenshot")?;
        let encoded = value.as_str().ok_or_else(|| ProbeError::ScreenshotError {
            message: "screenshot payload is not a string".to_string(),
        })?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded.replace(['\n', '\r'], ""))
            .map_err(|e| ProbeError::ScreenshotError {
                message: e.to_string(),
            })
    }

    fn quit(&self) -> ProbeResult<()> {
        tracing::info!(session_id = %self.session_id, "quitting remote session");
        self.command(Method::DELETE, "", None, "quit").map(drop)
    }
}

// =============================================================================
// WIRE HELPERS
// =============================================================================

fn locator_body(locator: &Locator) -> Value {
    json!({
        "using": locator.strategy().wire_name(),
        "value": locator.selector(),
    })
}

fn tap_actions(element: &ElementHandle) -> Value {
    json!({
        "actions": [{
            "type": "pointer",
            "id": "finger1",
            "parameters": { "pointerType": "touch" },
            "actions": [
                { "type": "pointerMove", "duration": 0, "origin": { ELEMENT_KEY: element.id }, "x": 0, "y": 0 },
                { "type": "pointerDown", "button": 0 },
                { "type": "pause", "duration": 100 },
                { "type": "pointerUp", "button": 0 },
            ],
        }],
    })
}

/// Extract an element reference id from a wire value.
#[must_use]
pub fn element_id(value: &Value) -> Option<String> {
    value
        .get(ELEMENT_KEY)
        .or_else(|| value.get(LEGACY_ELEMENT_KEY))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Map a JSON Wire Protocol numeric status to its W3C error code.
fn legacy_error_code(status: i64) -> &'static str {
    match status {
        7 => "no such element",
        10 => "stale element reference",
        11 => "element not visible",
        12 => "invalid element state",
        21 => "timeout",
        32 => "invalid selector",
        _ => "unknown error",
    }
}

/// Unwrap the `value` of a command response, mapping error payloads.
pub fn parse_response(http_status: u16, payload: Value, subject: &str) -> ProbeResult<Value> {
    if let Some(status) = payload.get("status").and_then(Value::as_i64) {
        if status != 0 {
            let message = payload
                .pointer("/value/message")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();
            return Err(ProbeError::from_w3c(legacy_error_code(status), message, subject));
        }
    }

    let value = match payload {
        Value::Object(mut map) => map.remove("value").unwrap_or(Value::Null),
        other => other,
    };

    if let Some(code) = value.get("error").and_then(Value::as_str) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        return Err(ProbeError::from_w3c(code, message, subject));
    }

    if !(200..300).contains(&http_status) {
        return Err(ProbeError::WebDriver {
            code: format!("http {http_status}"),
            message: value.to_string(),
        });
    }

    Ok(value)
}

/// Extract session id and capabilities from a new-session response.
pub fn parse_new_session(http_status: u16, payload: &Value) -> ProbeResult<(String, Value)> {
    // Legacy servers put sessionId at the top level.
    if let Some(id) = payload.get("sessionId").and_then(Value::as_str) {
        let value = parse_response(http_status, payload.clone(), "session")?;
        return Ok((id.to_string(), value));
    }

    let value = parse_response(http_status, payload.clone(), "session")?;
    let id = value
        .get("sessionId")
        .and_then(Value::as_str)
        .ok_or_else(|| ProbeError::WebDriver {
            code: "session not created".to_string(),
            message: "response carried no sessionId".to_string(),
        })?
        .to_string();
    let caps = value.get("capabilities").cloned().unwrap_or(Value::Null);
    Ok((id, caps))
}

#[cfg(test)]
mod tests {
    use super::*;

    mod response_tests {
        use super::*;

        #[test]
        fn test_success_unwraps_value() {
            let v = parse_response(200, json!({"value": true}), "x").unwrap();
            assert_eq!(v, json!(true));
        }

        #[test]
        fn test_w3c_no_such_element() {
            let payload = json!({"value": {"error": "no such element", "message": "nope"}});
            let err = parse_response(404, payload, "com.app:id/login").unwrap_err();
            assert!(matches!(err, ProbeError::NoSuchElement { ref selector } if selector == "com.app:id/login"));
        }

        #[test]
        fn test_w3c_stale() {
            let payload = json!({"value": {"error": "stale element reference", "message": ""}});
            let err = parse_response(404, payload, "el-1").unwrap_err();
            assert!(err.is_transient_lookup());
        }

        #[test]
        fn test_w3c_other_error() {
            let payload = json!({"value": {"error": "invalid session id", "message": "gone"}});
            let err = parse_response(404, payload, "x").unwrap_err();
            assert!(matches!(err, ProbeError::WebDriver { ref code, .. } if code == "invalid session id"));
        }

        #[test]
        fn test_legacy_status_codes() {
            let err = parse_response(500, json!({"status": 7, "value": {"message": "m"}}), "s")
                .unwrap_err();
            assert!(matches!(err, ProbeError::NoSuchElement { .. }));
            let err = parse_response(500, json!({"status": 10, "value": {}}), "s").unwrap_err();
            assert!(matches!(err, ProbeError::StaleElement { .. }));
            let ok = parse_response(200, json!({"status": 0, "value": "hi"}), "s").unwrap();
            assert_eq!(ok, json!("hi"));
        }

        #[test]
        fn test_http_error_without_payload() {
            let err = parse_response(502, json!("Bad Gateway"), "s").unwrap_err();
            assert!(err.to_string().contains("http 502"));
        }
    }

    mod element_tests {
        use super::*;

        #[test]
        fn test_element_id_w3c_and_legacy() {
            assert_eq!(element_id(&json!({ELEMENT_KEY: "abc"})).as_deref(), Some("abc"));
            assert_eq!(element_id(&json!({"ELEMENT": "def"})).as_deref(), Some("def"));
            assert!(element_id(&json!({})).is_none());
        }

        #[test]
        fn test_locator_body_uses_wire_name() {
            let body = locator_body(&Locator::accessibility_id("Sign up"));
            assert_eq!(body["using"], "accessibility id");
            assert_eq!(body["value"], "Sign up");
        }

        #[test]
        fn test_tap_actions_target_element() {
            let actions = tap_actions(&ElementHandle::new("42"));
            let origin = &actions["actions"][0]["actions"][0]["origin"][ELEMENT_KEY];
            assert_eq!(origin, "42");
        }
    }

    mod session_tests {
        use super::*;

        #[test]
        fn test_parse_w3c_new_session() {
            let payload = json!({"value": {"sessionId": "s-1", "capabilities": {"platformName": "Android"}}});
            let (id, caps) = parse_new_session(200, &payload).unwrap();
            assert_eq!(id, "s-1");
            assert_eq!(caps["platformName"], "Android");
        }

        #[test]
        fn test_parse_legacy_new_session() {
            let payload = json!({"sessionId": "s-2", "status": 0, "value": {"platformName": "iOS"}});
            let (id, caps) = parse_new_session(200, &payload).unwrap();
            assert_eq!(id, "s-2");
            assert_eq!(caps["platformName"], "iOS");
        }

        #[test]
        fn test_parse_new_session_error() {
            let payload = json!({"value": {"error": "session not created", "message": "no device"}});
            let err = parse_new_session(500, &payload).unwrap_err();
            assert!(err.to_string().contains("no device"));
        }

        #[test]
        fn test_start_unreachable_endpoint() {
            let err = RemoteSession::start("http://127.0.0.1:9/wd/hub", &Map::new()).unwrap_err();
            assert!(matches!(err, ProbeError::SessionCreation { .. }));
        }
    }
}
