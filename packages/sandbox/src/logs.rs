// ABOUTME: Bounded session log for interleaved process output
// ABOUTME: Ring buffer of the 50 most recent chunks across all subscribed processes

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of entries retained per session
pub const MAX_LOG_ENTRIES: usize = 50;

/// Which process a log chunk came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSource {
    Install,
    DevServer,
    System,
}

impl LogSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogSource::Install => "install",
            LogSource::DevServer => "devserver",
            LogSource::System => "system",
        }
    }
}

/// One opaque output chunk, appended in arrival order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub source: LogSource,
    pub message: String,
}

/// Bounded, ordered session log.
///
/// Chunks from all subscribed processes are interleaved in arrival order with
/// no stdout/stderr separation and no cross-process reordering; the oldest
/// entry is evicted once capacity is reached. Nothing is persisted beyond the
/// session.
#[derive(Debug, Default)]
pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_LOG_ENTRIES),
        }
    }

    /// Append a chunk, evicting the oldest entry past capacity
    pub fn push(&mut self, source: LogSource, message: impl Into<String>) {
        self.entries.push_back(LogEntry {
            timestamp: Utc::now(),
            source,
            message: message.into(),
        });
        if self.entries.len() > MAX_LOG_ENTRIES {
            self.entries.pop_front();
        }
    }

    /// All retained entries, oldest first
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    /// The most recently appended entry
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    /// The most recent `n` messages, oldest first
    pub fn tail(&self, n: usize) -> Vec<String> {
        self.entries
            .iter()
            .rev()
            .take(n)
            .map(|e| e.message.clone())
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_capacity_is_enforced() {
        let mut buffer = LogBuffer::new();
        for i in 0..120 {
            buffer.push(LogSource::Install, format!("chunk {}", i));
        }

        assert_eq!(buffer.len(), MAX_LOG_ENTRIES);
        let messages: Vec<String> = buffer.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(messages[0], "chunk 70");
        assert_eq!(messages[MAX_LOG_ENTRIES - 1], "chunk 119");
    }

    #[test]
    fn test_arrival_order_is_preserved_across_sources() {
        let mut buffer = LogBuffer::new();
        buffer.push(LogSource::Install, "a");
        buffer.push(LogSource::DevServer, "b");
        buffer.push(LogSource::Install, "c");

        let messages: Vec<String> = buffer.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_tail_returns_most_recent_oldest_first() {
        let mut buffer = LogBuffer::new();
        for i in 0..10 {
            buffer.push(LogSource::System, format!("{}", i));
        }

        assert_eq!(buffer.tail(3), vec!["7", "8", "9"]);
        assert_eq!(buffer.tail(100).len(), 10);
    }

    #[test]
    fn test_chunks_are_opaque_not_line_aligned() {
        let mut buffer = LogBuffer::new();
        buffer.push(LogSource::Install, "npm WARN dep");
        buffer.push(LogSource::Install, "recated pack");

        assert_eq!(buffer.len(), 2);
    }
}
