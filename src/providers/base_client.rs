use crate::core::error::AssistantError;
use futures::stream::{Stream, StreamExt};
use reqwest::{Client, Response};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use super::ResponseStream;

/// Thin JSON-over-HTTP client shared by the chat providers.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    extra_headers: HashMap<String, String>,
}

impl HttpClient {
    /// An empty or missing key sends no `Authorization` header (local Ollama).
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        extra_headers: Option<HashMap<String, String>>,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            extra_headers: extra_headers.unwrap_or_default(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Response, AssistantError> {
        let url = self.url(path);
        debug!(url = %url, "POST");

        let mut request = self.client.post(&url).json(payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        for (key, value) in &self.extra_headers {
            request = request.header(key, value);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Api(format!("{} returned {}: {}", url, status, body.trim())));
        }
        Ok(response)
    }

    /// Turn a server-sent-events body into a stream of text deltas.
    pub fn stream_response(
        &self,
        response: Response,
        parser: fn(&str) -> Result<Option<String>, AssistantError>,
    ) -> ResponseStream {
        decode_events(response.bytes_stream(), parser)
    }
}

/// Raw body bytes held back until a full line is available. Decoding happens
/// only on whole lines, so a character split across network reads survives.
#[derive(Debug, Default)]
struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    fn push(&mut self, chunk: &[u8]) -> Result<Option<String>, AssistantError> {
        self.pending.extend_from_slice(chunk);
        let Some(last_newline) = self.pending.iter().rposition(|b| *b == b'\n') else {
            return Ok(None);
        };
        let complete: Vec<u8> = self.pending.drain(..=last_newline).collect();
        String::from_utf8(complete)
            .map(Some)
            .map_err(|e| AssistantError::Serialization(format!("Invalid UTF-8 in stream: {}", e)))
    }
}

fn decode_events<S, B, E>(
    body: S,
    parser: fn(&str) -> Result<Option<String>, AssistantError>,
) -> ResponseStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + 'static,
    E: Into<AssistantError> + 'static,
{
    let mut lines = LineBuffer::default();
    body.map(move |chunk| -> Result<Option<String>, AssistantError> {
        let chunk = chunk.map_err(Into::into)?;
        match lines.push(chunk.as_ref())? {
            Some(complete) => parser(&complete),
            None => Ok(None),
        }
    })
    .filter_map(|res| async move { res.transpose() })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::openai_style::openai_stream_parser;

    #[test]
    fn blank_key_is_dropped() {
        let client = HttpClient::new("http://localhost:11434/v1/".into(), Some("  ".into()), None);
        assert!(client.api_key.is_none());
        assert_eq!(
            client.url("/chat/completions"),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn partial_lines_wait_for_newline() {
        let mut lines = LineBuffer::default();
        assert_eq!(lines.push(b"data: a\ndata: b").unwrap(), Some("data: a\n".to_string()));
        assert_eq!(lines.push(b"\n").unwrap(), Some("data: b\n".to_string()));
        assert_eq!(lines.push(b"").unwrap(), None);
    }

    #[test]
    fn invalid_utf8_line_is_an_error() {
        let mut lines = LineBuffer::default();
        assert!(matches!(
            lines.push(b"data: \xff\n"),
            Err(AssistantError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn character_split_across_reads_is_kept_whole() {
        let line = "data: {\"choices\":[{\"delta\":{\"content\":\"Привіт\"}}]}\n";
        let split = line.find('П').unwrap() + 1;
        let reads: Vec<Result<Vec<u8>, AssistantError>> = vec![
            Ok(line.as_bytes()[..split].to_vec()),
            Ok(line.as_bytes()[split..].to_vec()),
        ];

        let streamed: Vec<String> = decode_events(futures::stream::iter(reads), openai_stream_parser)
            .map(|delta| delta.unwrap())
            .collect()
            .await;
        assert_eq!(streamed, vec!["Привіт".to_string()]);
    }
}
