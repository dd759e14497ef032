//! Messages pane contents

/// Message type for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub message_type: MessageType,
    pub text: String,
}

impl Message {
    pub fn new(message_type: MessageType, text: impl Into<String>) -> Self {
        Self {
            message_type,
            text: text.into(),
        }
    }

    pub fn icon(&self) -> &str {
        match self.message_type {
            MessageType::Info => "ℹ",
            MessageType::Success => "✓",
            MessageType::Warning => "⚠",
            MessageType::Error => "✗",
        }
    }
}

const MAX_MESSAGES: usize = 50;

/// Bounded message history; the pane shows the newest few
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    entries: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message_type: MessageType, text: impl Into<String>) {
        self.entries.push(Message::new(message_type, text));
        if self.entries.len() > MAX_MESSAGES {
            let excess = self.entries.len() - MAX_MESSAGES;
            self.entries.drain(..excess);
        }
    }

    /// One entry per line; the first keeps the type, the rest are details
    pub fn push_lines(&mut self, message_type: MessageType, text: &str) {
        for (i, line) in text.lines().filter(|l| !l.trim().is_empty()).enumerate() {
            let kind = if i == 0 { message_type } else { MessageType::Info };
            self.push(kind, line.trim());
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Newest `n`, oldest first
    pub fn recent(&self, n: usize) -> &[Message] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn last(&self) -> Option<&Message> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_lines_splits_conflict_text() {
        let mut log = MessageLog::new();
        log.push_lines(
            MessageType::Error,
            "El recurso no cuenta con disponibilidad:\nAgo_25:Sem 2 (actual 90%, nuevo 20%)\n",
        );

        assert_eq!(log.len(), 2);
        let recent = log.recent(5);
        assert_eq!(recent[0].message_type, MessageType::Error);
        assert_eq!(recent[1].message_type, MessageType::Info);
        assert_eq!(recent[1].text, "Ago_25:Sem 2 (actual 90%, nuevo 20%)");
    }

    #[test]
    fn test_log_is_bounded() {
        let mut log = MessageLog::new();
        for i in 0..(MAX_MESSAGES + 5) {
            log.push(MessageType::Info, format!("m{}", i));
        }
        assert_eq!(log.len(), MAX_MESSAGES);
        assert_eq!(log.recent(1)[0].text, format!("m{}", MAX_MESSAGES + 4));
        assert_eq!(log.recent(100).len(), MAX_MESSAGES);
    }
}
