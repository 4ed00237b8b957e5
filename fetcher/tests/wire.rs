//! Rendering a live session as newline-delimited JSON.

mod common;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use ledgerlens_fetcher::render::{forward, WireMessage};

use common::*;

fn parse(out: Vec<u8>) -> Vec<WireMessage> {
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_forward_successful_session() {
    let ledger = Arc::new(ledger_with(1000, &[("A", "abc"), ("B", "hello")]));
    let engine = Arc::new(ScriptedEngine::new(&["A", "B"], 34, &[]));
    let fetcher = fetcher(ledger, engine);

    let mut out = Vec::new();
    let rx = fetcher.fetch(TARGET, CancellationToken::new());
    let err = forward(rx, &mut out).await.unwrap();
    assert!(err.is_none());

    let messages = parse(out);
    assert_eq!(
        messages,
        vec![
            WireMessage::Block {
                block_height: "@ block height: 1000".to_string(),
            },
            WireMessage::Register {
                register_header: "41  |A|".to_string(),
                register: "00000000  61 62 63                                          |abc|\n"
                    .to_string(),
            },
            WireMessage::Register {
                register_header: "42  |B|".to_string(),
                register: "00000000  68 65 6c 6c 6f                                    |hello|\n"
                    .to_string(),
            },
            WireMessage::Storage {
                storage_message: "That is everything (34 bytes)".to_string(),
            },
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_forward_failed_session() {
    let engine = Arc::new(ScriptedEngine::new(&["A"], 16, &[]));
    let fetcher = fetcher(Arc::new(UnreachableLedger), engine);

    let mut out = Vec::new();
    let rx = fetcher.fetch(TARGET, CancellationToken::new());
    let err = forward(rx, &mut out).await.unwrap().expect("session error");
    assert!(err.to_string().starts_with("could not fetch a recent blockheight"));

    let messages = parse(out);
    assert_eq!(messages.len(), 1);
    assert!(matches!(&messages[0], WireMessage::Error { error } if *error == err.to_string()));
}
