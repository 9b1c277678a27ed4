#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use chrono::{FixedOffset, TimeZone, Utc};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use dailynews::models::{FeedItem, RunDate};
use dailynews::{ContentSource, Error, FeedSource, LLMProvider, ResponseMode, Result};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// 2024-01-02 09:00 at +09:00.
pub fn run_date() -> RunDate {
    RunDate::new(
        Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        FixedOffset::east_opt(9 * 3600).unwrap(),
    )
}

/// Serves the same canned response to every connection and returns the
/// base URL.
pub async fn serve(status_line: &'static str, content_type: &'static str, body: &str) -> String {
    serve_with_headers(status_line, content_type, &[], body).await
}

/// Like `serve`, with extra response headers.
pub async fn serve_with_headers(
    status_line: &'static str,
    content_type: &'static str,
    headers: &[(&str, &str)],
    body: &str,
) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let body = body.to_string();
    let extra: String = headers
        .iter()
        .map(|(name, value)| format!("{}: {}\r\n", name, value))
        .collect();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let body = body.clone();
            let extra = extra.clone();
            tokio::spawn(async move {
                read_request(&mut socket).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n{}",
                    status_line,
                    content_type,
                    body.len(),
                    extra,
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}", addr)
}

/// Drains the request head and any `Content-Length` body so closing the
/// socket never resets a client still sending.
async fn read_request(socket: &mut TcpStream) {
    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        request.extend_from_slice(&buf[..n]);

        let Some(head_end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&request[..head_end]).to_ascii_lowercase();
        let body_len = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if request.len() >= head_end + 4 + body_len {
            return;
        }
    }
}

pub struct StaticFeeds(pub Vec<FeedItem>);

#[async_trait]
impl FeedSource for StaticFeeds {
    async fn collect(&self, _run: &RunDate) -> Result<Vec<FeedItem>> {
        Ok(self.0.clone())
    }
}

/// Page text by link; unknown links are unavailable.
pub struct StaticContent(pub HashMap<String, String>);

#[async_trait]
impl ContentSource for StaticContent {
    async fn fetch_text(&self, url: &str) -> String {
        self.0.get(url).cloned().unwrap_or_default()
    }
}

#[derive(Default)]
struct Script {
    responses: VecDeque<Result<String>>,
    prompts: Vec<(String, ResponseMode)>,
}

/// Replays queued responses in order and records every prompt it receives.
#[derive(Clone, Default)]
pub struct ScriptedLlm {
    script: Arc<Mutex<Script>>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.script.lock().unwrap().responses.push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self, times: usize) -> Self {
        {
            let mut script = self.script.lock().unwrap();
            for _ in 0..times {
                script
                    .responses
                    .push_back(Err(Error::LLMApi("503 Service Unavailable".to_string())));
            }
        }
        self
    }

    pub fn calls(&self) -> usize {
        self.script.lock().unwrap().prompts.len()
    }

    pub fn prompts(&self) -> Vec<(String, ResponseMode)> {
        self.script.lock().unwrap().prompts.clone()
    }
}

#[async_trait]
impl LLMProvider for ScriptedLlm {
    async fn generate(&self, prompt: &str, mode: ResponseMode) -> Result<String> {
        let mut script = self.script.lock().unwrap();
        script.prompts.push((prompt.to_string(), mode));
        script
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(Error::LLMApi("no scripted response left".to_string())))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
