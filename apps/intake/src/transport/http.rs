use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::{Config, ConfigError};
use crate::errors::SubmitError;
use crate::models::candidate::CandidateFile;
use crate::transport::{
    Outcome, Receipt, SkipNotice, Transport, FILE_FIELD, IDENTIFIER_FIELD, SKIP_PATH, UPLOAD_PATH,
};

const MAX_SERVER_MESSAGE_CHARS: usize = 200;

/// `reqwest`-backed transport. One attempt per call, bounded by the configured
/// timeout; retrying is the user's decision.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    upload_url: Url,
    skip_url: Url,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    detail: Option<String>,
    error: Option<ErrorField>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Text(String),
    Nested { message: String },
}

impl HttpTransport {
    /// `base_url` must end with `/` so the endpoint paths join beneath it;
    /// [`Config`] normalizes this.
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, ConfigError> {
        let join = |path: &str| {
            base_url
                .join(path)
                .map_err(|e| ConfigError::InvalidBaseUrl {
                    value: base_url.to_string(),
                    reason: e.to_string(),
                })
        };

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            upload_url: join(UPLOAD_PATH)?,
            skip_url: join(SKIP_PATH)?,
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Self::new(&config.base_url, config.upload_timeout)
    }

    pub fn upload_url(&self) -> &Url {
        &self.upload_url
    }

    pub fn skip_url(&self) -> &Url {
        &self.skip_url
    }

    fn classify(&self, err: reqwest::Error) -> SubmitError {
        if err.is_timeout() {
            warn!("Request timed out after {}ms", self.timeout.as_millis());
            SubmitError::Timeout(self.timeout)
        } else {
            warn!("Transport failure: {err}");
            SubmitError::NetworkUnreachable(err.to_string())
        }
    }

    /// Turns an HTTP response into an outcome: any 2xx is success, everything
    /// else is a server error carrying the best message we can find.
    async fn settle(&self, response: Response) -> Outcome {
        let status = response.status();
        // A body that fails to arrive is not worth failing a 2xx over.
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            let body = serde_json::from_str::<serde_json::Value>(&body).ok();
            debug!("Endpoint accepted request with {status}");
            return Ok(Receipt {
                status: status.as_u16(),
                body,
            });
        }

        let message = server_message(&body);
        warn!("Endpoint responded with {status}: {message}");
        Err(SubmitError::ServerError {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn submit(&self, file: &CandidateFile, telegram_id: &str) -> Outcome {
        info!(
            "Uploading '{}' ({} bytes) to {}",
            file.name(),
            file.len(),
            self.upload_url
        );

        let form = Form::new()
            .part(FILE_FIELD, file_part(file))
            .text(IDENTIFIER_FIELD, telegram_id.to_string());

        let response = self
            .client
            .post(self.upload_url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        self.settle(response).await
    }

    async fn notify_skip(&self, telegram_id: &str) -> Outcome {
        info!("Sending skip notification to {}", self.skip_url);

        let notice = SkipNotice {
            telegram_user_id: telegram_id.to_string(),
        };

        let response = self
            .client
            .post(self.skip_url.clone())
            .json(&notice)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        self.settle(response).await
    }

    /// Any HTTP answer, whatever its status, proves the endpoint is there.
    async fn probe(&self) -> Result<(), SubmitError> {
        let response = self
            .client
            .head(self.upload_url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        debug!("Probe answered with {}", response.status());
        Ok(())
    }
}

fn file_part(file: &CandidateFile) -> Part {
    let bare = || {
        Part::stream_with_length(reqwest::Body::from(file.contents().clone()), file.len())
            .file_name(file.name().to_string())
    };

    if file.media_type().is_empty() {
        return bare();
    }
    bare().mime_str(file.media_type()).unwrap_or_else(|_| {
        debug!("Ignoring unparseable media type '{}'", file.media_type());
        bare()
    })
}

/// Best-effort human message from an error body: a JSON `message`, `detail` or
/// `error` field, otherwise the trimmed text, capped in length.
fn server_message(body: &str) -> String {
    let from_json = serde_json::from_str::<ErrorBody>(body).ok().and_then(|b| {
        b.message.or(b.detail).or(b.error.map(|e| match e {
            ErrorField::Text(s) => s,
            ErrorField::Nested { message } => message,
        }))
    });

    let text = from_json.unwrap_or_else(|| body.trim().to_string());
    text.chars().take(MAX_SERVER_MESSAGE_CHARS).collect()
}
