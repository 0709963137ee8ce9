//! Shared fixtures for integration tests

use async_trait::async_trait;
use conformance_explorer::config::ExplorerConfig;
use conformance_explorer::results::{ResultFetcher, VersionItem};
use conformance_explorer::{Error, Result};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

#[allow(dead_code)]
pub const V1_URL: &str = "memory://v1.json";
#[allow(dead_code)]
pub const V2_URL: &str = "memory://v2.json";
#[allow(dead_code)]
pub const BROKEN_URL: &str = "memory://broken.json";

/// v1: test -> [built-ins -> [Array -> [from], Map], language -> [expressions]]
#[allow(dead_code)]
pub fn payload_v1() -> Value {
    json!({
        "c": "engine-v1",
        "u": "t262-v1",
        "r": {
            "n": "test",
            "a": { "t": 6, "o": 4, "i": 1, "p": 0 },
            "s": [
                {
                    "n": "built-ins",
                    "a": { "t": 5, "o": 4, "i": 0, "p": 0 },
                    "s": [
                        {
                            "n": "Array",
                            "a": { "t": 4, "o": 3, "i": 0, "p": 0 },
                            "s": [
                                {
                                    "n": "from",
                                    "a": { "t": 2, "o": 2, "i": 0, "p": 0 },
                                    "t": [
                                        { "n": "from-string.js", "v": 6, "r": "O" },
                                        { "n": "iter-map-fn.js", "v": 6, "s": true, "r": "O" }
                                    ]
                                }
                            ],
                            "t": [
                                { "n": "length.js", "v": 5, "r": "O" },
                                { "n": "proto-from-ctor-realm.js", "v": 255, "r": "F" }
                            ]
                        },
                        {
                            "n": "Map",
                            "a": { "t": 1, "o": 1, "i": 0, "p": 0 },
                            "t": [ { "n": "constructor.js", "v": 6, "r": "O" } ]
                        }
                    ]
                },
                {
                    "n": "language",
                    "a": { "t": 1, "o": 0, "i": 1, "p": 0 },
                    "s": [
                        {
                            "n": "expressions",
                            "a": { "t": 1, "o": 0, "i": 1, "p": 0 },
                            "t": [ { "n": "class-field.js", "v": 13, "r": "-" } ]
                        }
                    ]
                }
            ]
        }
    })
}

/// v2: same shape plus `intl402`, different test262 commit
#[allow(dead_code)]
pub fn payload_v2() -> Value {
    let mut payload = payload_v1();
    payload["c"] = json!("engine-v2");
    payload["u"] = json!("t262-v2");
    if let Some(suites) = payload["r"]["s"].as_array_mut() {
        suites.push(json!({ "n": "intl402", "a": { "t": 0, "o": 0, "i": 0, "p": 0 } }));
    }
    payload
}

#[allow(dead_code)]
pub fn versions() -> Vec<VersionItem> {
    vec![
        VersionItem::new("v1", V1_URL),
        VersionItem::new("v2", V2_URL),
        VersionItem::new("broken", BROKEN_URL),
    ]
}

#[allow(dead_code)]
pub fn config() -> ExplorerConfig {
    ExplorerConfig {
        versions: versions(),
        default_version: Some("v1".to_string()),
        history_file: None,
        ..ExplorerConfig::default()
    }
}

/// Serves fixed payloads from memory and counts requests
#[allow(dead_code)]
#[derive(Default)]
pub struct StaticFetcher {
    payloads: HashMap<String, Value>,
    requests: AtomicUsize,
}

impl StaticFetcher {
    #[allow(dead_code)]
    pub fn new() -> Self {
        let mut payloads = HashMap::new();
        payloads.insert(V1_URL.to_string(), payload_v1());
        payloads.insert(V2_URL.to_string(), payload_v2());
        Self {
            payloads,
            requests: AtomicUsize::new(0),
        }
    }

    #[allow(dead_code)]
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResultFetcher for StaticFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.payloads
            .get(url)
            .cloned()
            .ok_or_else(|| Error::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
    }
}
