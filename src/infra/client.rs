//! Synchronous client for an OpenAI-compatible chat-completions endpoint
//! (LM Studio and friends).
//!
//! Two modes: a single blocking request, or SSE streaming where each
//! `data:` line carries one JSON chunk and `[DONE]` terminates the stream.
//! Malformed stream chunks are skipped, matching how lenient these local
//! servers are about their own framing.

use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Read};
use tracing::{debug, trace};

/// Connection and sampling parameters for one request.
#[derive(Debug, Clone)]
pub struct ChatParams {
    pub api_url: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Client error taxonomy. These are collaborator errors: the refinement
/// pipeline never sees them.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request to the model server failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("could not read the response body: {0}")]
    Body(#[from] std::io::Error),

    #[error("unexpected response shape: {0}")]
    Malformed(String),
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageBody,
}

#[derive(Deserialize)]
struct MessageBody {
    content: String,
}

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    delta: Delta,
}

#[derive(Deserialize)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

fn request<'a>(params: &ChatParams, prompt: &'a str, stream: bool) -> ChatRequest<'a> {
    ChatRequest {
        messages: vec![ChatMessage { role: "user", content: prompt }],
        temperature: params.temperature,
        max_tokens: params.max_tokens,
        stream,
    }
}

/// Single-shot completion.
pub fn complete(params: &ChatParams, prompt: &str) -> Result<String, ClientError> {
    debug!(url = %params.api_url, "sending chat completion request");

    let mut resp = ureq::post(params.api_url.as_str()).send_json(request(params, prompt, false))?;

    let mut body = String::new();
    resp.body_mut().as_reader().read_to_string(&mut body)?;

    let parsed: ChatResponse =
        serde_json::from_str(&body).map_err(|e| ClientError::Malformed(e.to_string()))?;

    parsed
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| ClientError::Malformed("no choices in response".into()))
}

/// Streaming completion. `on_delta` fires for every content fragment in
/// arrival order; the accumulated full text is returned at the end.
pub fn complete_streaming(
    params: &ChatParams,
    prompt: &str,
    on_delta: &mut dyn FnMut(&str),
) -> Result<String, ClientError> {
    debug!(url = %params.api_url, "opening chat completion stream");

    let mut resp = ureq::post(params.api_url.as_str()).send_json(request(params, prompt, true))?;
    let reader = BufReader::new(resp.body_mut().as_reader());

    let mut full = String::new();
    for line in reader.lines() {
        let line = line?;
        let Some(data) = line.strip_prefix("data: ") else {
            continue;
        };
        if data == "[DONE]" {
            break;
        }
        // Skip malformed chunks rather than aborting mid-stream
        let Ok(chunk) = serde_json::from_str::<StreamChunk>(data) else {
            trace!("skipping malformed stream chunk");
            continue;
        };
        if let Some(delta) = chunk.choices.into_iter().next().and_then(|c| c.delta.content) {
            on_delta(&delta);
            full.push_str(&delta);
        }
    }

    Ok(full)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_parsing_extracts_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"hello"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content, "hello");
    }

    #[test]
    fn stream_chunk_parsing_tolerates_missing_content() {
        let chunk: StreamChunk =
            serde_json::from_str(r#"{"choices":[{"delta":{}}]}"#).unwrap();
        assert!(chunk.choices[0].delta.content.is_none());

        let chunk: StreamChunk =
            serde_json::from_str(r#"{"choices":[{"delta":{"content":"hi"}}]}"#).unwrap();
        assert_eq!(chunk.choices[0].delta.content.as_deref(), Some("hi"));
    }

    #[test]
    fn request_payload_has_the_expected_shape() {
        let params = ChatParams {
            api_url: "http://localhost:1234/v1/chat/completions".into(),
            temperature: 0.7,
            max_tokens: 2000,
        };
        let json = serde_json::to_value(request(&params, "write code", true)).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "write code");
        assert_eq!(json["stream"], true);
        assert_eq!(json["max_tokens"], 2000);
    }
}
