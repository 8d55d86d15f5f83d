//! Azure Speech REST backend: one fixed POST per utterance, SSML body,
//! binary audio back.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{SynthError, Synthesizer, UtteranceRequest};

/// Authentication header for the Azure Speech REST API.
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Output format header; the value is fixed to a 24kHz 16-bit mono PCM
/// RIFF container so the payload decodes as a plain WAV stream.
pub const OUTPUT_FORMAT_HEADER: &str = "X-Microsoft-OutputFormat";
pub const OUTPUT_FORMAT: &str = "riff-24khz-16bit-mono-pcm";

/// Credentials for the regional Speech endpoint. Read-only; no local
/// validation is performed, the service rejects bad values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub subscription_key: String,
    pub region: String,
}

impl Credentials {
    /// Regional synthesis endpoint:
    /// `https://{region}.tts.speech.microsoft.com/cognitiveservices/v1`
    pub fn endpoint(&self) -> String {
        format!(
            "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
            self.region
        )
    }
}

/// Escapes the XML special characters so arbitrary bound text cannot break
/// the SSML document.
pub fn escape_xml(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            _ => result.push(c),
        }
    }
    result
}

/// Builds the SSML document for one utterance. The voice gender is fixed to
/// "Male"; the service keys the actual voice off the name attribute.
pub fn build_ssml(text: &str, language: &str, voice: &str) -> String {
    let escaped = escape_xml(text);
    format!(
        "<speak version='1.0' xml:lang='{language}'>\
         <voice xml:lang='{language}' xml:gender='Male' name='{voice}'>\
         {escaped}\
         </voice></speak>"
    )
}

pub struct AzureSynthesizer {
    credentials: Credentials,
    endpoint: String,
    client: reqwest::Client,
}

impl AzureSynthesizer {
    pub fn new(credentials: Credentials) -> Self {
        let endpoint = credentials.endpoint();
        Self::with_endpoint(credentials, endpoint)
    }

    /// Points the backend at an explicit endpoint instead of the regional
    /// one. Tests use this to talk to a local server.
    pub fn with_endpoint(credentials: Credentials, endpoint: impl Into<String>) -> Self {
        Self {
            credentials,
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request(&self, request: &UtteranceRequest) -> reqwest::RequestBuilder {
        self.client
            .post(&self.endpoint)
            .header(SUBSCRIPTION_KEY_HEADER, &self.credentials.subscription_key)
            .header(OUTPUT_FORMAT_HEADER, OUTPUT_FORMAT)
            .header("Content-Type", "application/ssml+xml")
            .body(build_ssml(&request.text, &request.language, &request.voice))
    }
}

#[async_trait]
impl Synthesizer for AzureSynthesizer {
    async fn synthesize(&self, request: &UtteranceRequest) -> Result<Vec<u8>, SynthError> {
        debug!(
            endpoint = %self.endpoint,
            voice = %request.voice,
            chars = request.text.len(),
            "dispatching synthesis request"
        );

        let response = self.build_request(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SynthError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let audio = response.bytes().await?.to_vec();
        debug!(bytes = audio.len(), "synthesis response received");
        Ok(audio)
    }

    fn id(&self) -> &'static str {
        "azure-tts"
    }
}
