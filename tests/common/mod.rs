//! 結合テスト用ヘルパー
//!
//! tokio の TcpListener で1回だけ応答するHTTPサーバを立て、
//! Gemini API の代わりにする。

#![allow(dead_code)]

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub const LEGITIMATE_JSON: &str = r#"{"classification":"legitimate","confidenceScore":0.92,"riskLevel":"None","summary":"Well-known search engine.","featureAnalysis":[{"feature":"SSL","status":"Valid","risk":"None","details":"Certificate issued by a trusted CA"},{"feature":"Domain Age","status":"Over 20 years","risk":"None","details":"Long-established domain"}]}"#;

/// Gemini形式のレスポンスボディ
pub fn gemini_body(text: &str, grounding_uris: &[&str]) -> String {
    let chunks: Vec<serde_json::Value> = grounding_uris
        .iter()
        .map(|uri| serde_json::json!({ "web": { "uri": uri, "title": "source" } }))
        .collect();

    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP",
            "groundingMetadata": { "groundingChunks": chunks }
        }]
    })
    .to_string()
}

/// 1回だけ応答するモックサーバ
///
/// 戻り値: (ベースURL, 受信したリクエスト全文を返すハンドル)
pub async fn serve_once(status: u16, body: String) -> (String, JoinHandle<String>) {
    serve_once_with_delay(status, body, Duration::ZERO).await
}

pub async fn serve_once_with_delay(
    status: u16,
    body: String,
    delay: Duration,
) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind失敗");
    let addr = listener.local_addr().expect("アドレス取得失敗");

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept失敗");
        let request = read_request(&mut stream).await;

        tokio::time::sleep(delay).await;

        let response = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            reason(status),
            body.len(),
            body
        );
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
        request
    });

    (format!("http://{}", addr), handle)
}

/// 接続を拒否するベースURL（一度bindして閉じたポート）
pub async fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind失敗");
    let addr = listener.local_addr().expect("アドレス取得失敗");
    drop(listener);
    format!("http://{}", addr)
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
            let content_length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= pos + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
