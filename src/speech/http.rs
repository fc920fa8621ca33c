use std::time::Duration;

use serde::Serialize;

use crate::error::SpeechError;
use crate::speech::backend::SpeechBackend;

pub const DEFAULT_BRIDGE_ENDPOINT: &str = "http://127.0.0.1:6832";

/// Screen-reader bridge reachable over local HTTP.
///
/// Protocol: `GET {base}/health` answers 2xx while the screen reader runs,
/// `POST {base}/speak` with `{"text": ...}`, `POST {base}/cancel`.
pub struct HttpBackend {
    name: String,
    base_url: String,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct SpeakRequest<'a> {
    text: &'a str,
}

impl HttpBackend {
    pub fn new(name: &str, base_url: &str, timeout: Duration) -> Result<Self, SpeechError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            name: name.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn check(&self, response: reqwest::blocking::Response) -> Result<(), SpeechError> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(SpeechError::Rejected {
                backend: self.name.clone(),
                reason: format!("HTTP {}", response.status()),
            })
        }
    }
}

impl SpeechBackend for HttpBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn probe(&mut self) -> bool {
        self.client
            .get(self.url("health"))
            .send()
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        let response = self
            .client
            .post(self.url("speak"))
            .json(&SpeakRequest { text })
            .send()?;
        self.check(response)
    }

    fn cancel(&mut self) -> Result<(), SpeechError> {
        let response = self.client.post(self.url("cancel")).send()?;
        self.check(response)
    }
}
