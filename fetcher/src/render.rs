//! Rendering of fetch results for a line-oriented transport.
//!
//! Each `FetchResult` becomes one JSON object tagged by `"type"`. Register
//! values are shown as a classic hex dump so a human can eyeball them.

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::error::{FetchError, RenderError};
use crate::result::{AccountRegister, FetchResult};

/// One rendered message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WireMessage {
    Block {
        block_height: String,
    },
    Register {
        register_header: String,
        register: String,
    },
    Storage {
        storage_message: String,
    },
    Error {
        error: String,
    },
}

impl From<&FetchResult> for WireMessage {
    fn from(result: &FetchResult) -> Self {
        match result {
            FetchResult::BlockHeight(height) => Self::Block {
                block_height: format!("@ block height: {height}"),
            },
            FetchResult::Register(register) => Self::Register {
                register_header: register_header(register),
                register: hex_dump(&register.value),
            },
            FetchResult::StorageUsed {
                storage_used,
                computed_storage_used,
            } => Self::Storage {
                storage_message: storage_message(*storage_used, *computed_storage_used),
            },
            FetchResult::Error(err) => Self::Error {
                error: err.to_string(),
            },
        }
    }
}

/// `"<hex key>  |<key>|"`. Internal keys start with `$` followed by binary
/// data, so their tail is shown as hex instead.
pub fn register_header(register: &AccountRegister) -> String {
    let key = &register.key;
    let decoded = match key.split_first() {
        Some((b'$', rest)) => format!("|${}|", hex::encode(rest)),
        _ => format!("|{}|", String::from_utf8_lossy(key)),
    };
    format!("{}  {decoded}", hex::encode(key))
}

/// Compare declared storage with what was observed.
pub fn storage_message(storage_used: u64, computed_storage_used: u64) -> String {
    use std::cmp::Ordering;

    match storage_used.cmp(&computed_storage_used) {
        Ordering::Less => format!(
            "Some bytes are extra!? Expected {storage_used} bytes, but got \
             {computed_storage_used} bytes of registers.\n\
             Strange, better report this if you are consistently getting this \
             result for an account."
        ),
        Ordering::Greater => format!(
            "Some bytes are missing. Expected {storage_used} bytes, but only \
             {computed_storage_used} bytes of registers are available.\n\
             The script used to fetch registers was not thorough enough, sorry."
        ),
        Ordering::Equal => format!("That is everything ({storage_used} bytes)"),
    }
}

const DUMP_WIDTH: usize = 16;

/// Canonical hex dump: offset, sixteen bytes in two groups of eight, and an
/// ASCII gutter. Empty input renders as an empty string.
pub fn hex_dump(data: &[u8]) -> String {
    let mut out = String::new();
    for (line, chunk) in data.chunks(DUMP_WIDTH).enumerate() {
        out.push_str(&format!("{:08x}  ", line * DUMP_WIDTH));
        for slot in 0..DUMP_WIDTH {
            match chunk.get(slot) {
                Some(byte) => out.push_str(&format!("{byte:02x} ")),
                None => out.push_str("   "),
            }
            if slot == 7 || slot == 15 {
                out.push(' ');
            }
        }
        out.push('|');
        out.extend(chunk.iter().map(|&b| {
            if (0x20..=0x7e).contains(&b) {
                b as char
            } else {
                '.'
            }
        }));
        out.push_str("|\n");
    }
    out
}

/// Drain `results` into `writer` as newline-delimited JSON.
///
/// Stops after the first `Error` message and hands that error back, so the
/// caller can decide what to do with the connection.
pub async fn forward<W>(
    mut results: mpsc::Receiver<FetchResult>,
    writer: &mut W,
) -> Result<Option<FetchError>, RenderError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(result) = results.recv().await {
        let mut line = serde_json::to_vec(&WireMessage::from(&result))?;
        line.push(b'\n');
        writer.write_all(&line).await?;

        if let FetchResult::Error(err) = result {
            writer.flush().await?;
            return Ok(Some(err));
        }
    }
    writer.flush().await?;
    Ok(None)
}
