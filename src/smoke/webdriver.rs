use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info, trace};

use super::browser::{AlertOutcome, Browser, ElementRef, Locator};

/// Key under which W3C drivers return element references.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum WebDriverError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{error}: {message}")]
    Command { error: String, message: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl WebDriverError {
    /// W3C error code, for errors reported by the driver itself.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Command { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_no_such_alert(&self) -> bool {
        self.code() == Some("no such alert")
    }
}

#[derive(Deserialize)]
struct Envelope {
    value: Value,
}

/// Session against a W3C WebDriver endpoint (chromedriver, geckodriver, a
/// Selenium server, ...).
#[derive(Debug)]
pub struct WebDriver {
    client: Client,
    endpoint: String,
    session: String,
}

impl WebDriver {
    /// Open a new browser session.
    pub async fn connect(endpoint: &str, browser_name: &str) -> Result<Self, WebDriverError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let endpoint = endpoint.trim_end_matches('/').to_string();
        let url = format!("{endpoint}/session");
        let value = send(&client, Method::POST, &url, Some(capabilities(browser_name))).await?;
        let session = session_id(&value)?;
        info!(%session, browser = browser_name, "opened browser session");
        Ok(WebDriver {
            client,
            endpoint,
            session,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session
    }

    async fn command(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, WebDriverError> {
        let url = format!("{}/session/{}{}", self.endpoint, self.session, path);
        send(&self.client, method, &url, body).await
    }
}

#[async_trait]
impl Browser for WebDriver {
    async fn goto(&mut self, url: &str) -> Result<(), WebDriverError> {
        self.command(Method::POST, "/url", Some(json!({ "url": url })))
            .await?;
        Ok(())
    }

    async fn find(&mut self, locator: Locator<'_>) -> Result<ElementRef, WebDriverError> {
        debug!(%locator, "finding element");
        let (using, value) = locator.strategy();
        let found = self
            .command(
                Method::POST,
                "/element",
                Some(json!({ "using": using, "value": value })),
            )
            .await?;
        element_ref(&found)
    }

    async fn click(&mut self, element: &ElementRef) -> Result<(), WebDriverError> {
        let path = format!("/element/{}/click", element.0);
        self.command(Method::POST, &path, Some(json!({}))).await?;
        Ok(())
    }

    async fn send_keys(&mut self, element: &ElementRef, text: &str) -> Result<(), WebDriverError> {
        let path = format!("/element/{}/value", element.0);
        self.command(Method::POST, &path, Some(keys_body(text)))
            .await?;
        Ok(())
    }

    async fn accept_alert(&mut self) -> Result<AlertOutcome, WebDriverError> {
        match self
            .command(Method::POST, "/alert/accept", Some(json!({})))
            .await
        {
            Ok(_) => Ok(AlertOutcome::Shown),
            Err(e) if e.is_no_such_alert() => Ok(AlertOutcome::NoAlert),
            Err(e) => Err(e),
        }
    }

    async fn quit(&mut self) -> Result<(), WebDriverError> {
        self.command(Method::DELETE, "", None).await?;
        info!(session = %self.session, "closed browser session");
        Ok(())
    }
}

async fn send(
    client: &Client,
    method: Method,
    url: &str,
    body: Option<Value>,
) -> Result<Value, WebDriverError> {
    debug!(%method, url, "webdriver request");
    let mut request = client.request(method, url);
    if let Some(body) = body {
        request = request.json(&body);
    }
    let response = request.send().await?;
    let status = response.status();
    // Drivers report failures as JSON bodies too, so status is informational
    let body: Value = response.json().await?;
    trace!(%status, %body, "webdriver response");
    unwrap_value(body)
}

fn capabilities(browser_name: &str) -> Value {
    json!({
        "capabilities": {
            "alwaysMatch": { "browserName": browser_name }
        }
    })
}

fn keys_body(text: &str) -> Value {
    let keys: Vec<String> = text.chars().map(String::from).collect();
    json!({ "text": text, "value": keys })
}

/// Extract `value` from a response body, turning driver errors into [`WebDriverError::Command`].
fn unwrap_value(body: Value) -> Result<Value, WebDriverError> {
    let Envelope { value } =
        serde_json::from_value(body).map_err(|e| WebDriverError::Malformed(e.to_string()))?;
    if let Some(error) = value.get("error").and_then(Value::as_str) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default();
        return Err(WebDriverError::Command {
            error: error.to_string(),
            message: message.to_string(),
        });
    }
    Ok(value)
}

fn session_id(value: &Value) -> Result<String, WebDriverError> {
    value
        .get("sessionId")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| WebDriverError::Malformed("new session response has no `sessionId`".into()))
}

fn element_ref(value: &Value) -> Result<ElementRef, WebDriverError> {
    value
        .get(ELEMENT_KEY)
        .and_then(Value::as_str)
        .map(|id| ElementRef(id.to_string()))
        .ok_or_else(|| WebDriverError::Malformed(format!("expected element reference, found {value}")))
}
