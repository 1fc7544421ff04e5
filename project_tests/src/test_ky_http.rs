//! # `ky_http` Client Integration Tests
//!
//! Exercises `lib_delivery::retrieve::ApiClient` against `httpbin.org`: URL
//! joining, query encoding, headers, bearer auth, non-throwing failures, JSON
//! bodies and the plain-text variant.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use lib_delivery::retrieve::ApiClient;

/// Echo payload of `httpbin.org`.
#[derive(Debug, Deserialize, Serialize)]
struct HttpbinResponse {
    headers: Option<HashMap<String, String>>,
    args: Option<HashMap<String, String>>,
    url: Option<String>,
    json: Option<serde_json::Value>,
}

/// # Main Test Function
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let api = ApiClient::with_options("https://httpbin.org/", Some("test_secret_123".into()), 2, Duration::from_secs(15))?;

    println!("--- Starting API Module Tests ---");

    println!("\n[Test 1] URL joining & query encoding...");
    let res1 = api
        .request::<HttpbinResponse, ()>(Method::GET, "get", &[("query", "*[_type == \"property\"]")], None, None)
        .await?;
    assert!(res1.success);
    let echoed = res1.data.and_then(|d| d.args).unwrap_or_default();
    assert_eq!(echoed.get("query").map(String::as_str), Some("*[_type == \"property\"]"));
    println!("✅ Query survived encoding");

    println!("\n[Test 2] Custom headers & auth token...");
    let mut headers = HeaderMap::new();
    headers.insert("X-Custom-Client", HeaderValue::from_static("Rust-Test-Suite"));
    let res2 = api
        .request::<HttpbinResponse, ()>(Method::GET, "headers", &[], Some(headers), None)
        .await?;
    let echoed_headers = res2.data.and_then(|d| d.headers).unwrap_or_default();
    println!("✅ Custom Header: {:?}", echoed_headers.get("X-Custom-Client"));
    println!("✅ Auth Token: {:?}", echoed_headers.get("Authorization"));

    println!("\n[Test 3] 404 handling (Result::Ok with success: false)...");
    let res3 = api
        .request::<serde_json::Value, ()>(Method::GET, "status/404", &[], None, None)
        .await?;
    assert!(!res3.success);
    assert_eq!(res3.status, 404);
    assert!(res3.into_data().is_err());
    println!("✅ Non-throwing failure handled");

    println!("\n[Test 4] POST body serialization...");
    #[derive(Serialize)]
    struct MyBody {
        message: String,
    }
    let res4 = api
        .request::<HttpbinResponse, MyBody>(
            Method::POST,
            "post",
            &[],
            None,
            Some(MyBody {
                message: "Hello from Rust".into(),
            }),
        )
        .await?;
    println!("✅ POST Success. Server received: {:?}", res4.data.and_then(|d| d.json));

    println!("\n[Test 5] Plain-text GET...");
    let text = api.get_text("robots.txt").await?;
    assert!(text.contains("User-agent"));
    println!("✅ Plain text received ({} bytes)", text.len());

    println!("\n--- All Tests Passed Successfully ---");
    Ok(())
}
