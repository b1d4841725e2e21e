//! Diagram id generation

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Produces `<prefix>-<millis>-<counter>` ids
///
/// The counter is process-wide, so two generators never hand out the same
/// id even within one millisecond.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: String,
}

impl IdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn next_id(&self) -> String {
        let counter = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}-{}", self.prefix, now_millis(), to_base36(counter))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new("mermaid")
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn now_millis() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

// No system clock on wasm32-unknown-unknown; the counter alone keeps ids unique.
#[cfg(target_arch = "wasm32")]
fn now_millis() -> u128 {
    0
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
