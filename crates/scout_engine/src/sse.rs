//! Incremental decoder for `text/event-stream` bodies.
//!
//! Bytes arrive in arbitrary chunks. Lines end in `\n`, `\r\n` or `\r`, and a
//! line is only decoded once it is complete, so multi-byte characters split
//! across chunks survive. A blank line dispatches the pending event.

const DEFAULT_EVENT: &str = "message";

/// One dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    pub event: String,
    pub data: String,
}

#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    event: Option<String>,
    data: String,
    has_data: bool,
    last_event_id: Option<String>,
    // A chunk ended on `\r`; a `\n` opening the next chunk belongs to it.
    skip_lf: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent `id:` value seen on this connection.
    pub fn last_event_id(&self) -> Option<&str> {
        self.last_event_id.as_deref()
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        let chunk = if self.skip_lf && chunk.first() == Some(&b'\n') {
            &chunk[1..]
        } else {
            chunk
        };
        self.skip_lf = false;
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        let mut start = 0;
        let mut index = 0;
        while index < self.buffer.len() {
            let byte = self.buffer[index];
            if byte != b'\n' && byte != b'\r' {
                index += 1;
                continue;
            }

            let line = String::from_utf8_lossy(&self.buffer[start..index]).into_owned();
            let mut next = index + 1;
            if byte == b'\r' {
                match self.buffer.get(next) {
                    Some(b'\n') => next += 1,
                    Some(_) => {}
                    None => self.skip_lf = true,
                }
            }
            if let Some(frame) = self.process_line(&line) {
                frames.push(frame);
            }
            start = next;
            index = next;
        }
        self.buffer.drain(..start);
        frames
    }

    fn process_line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => {
                self.data.push_str(value);
                self.data.push('\n');
                self.has_data = true;
            }
            "id" if !value.contains('\0') => self.last_event_id = Some(value.to_string()),
            // `retry` and unknown fields do not affect decoding.
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = self.event.take();
        if !std::mem::replace(&mut self.has_data, false) {
            self.data.clear();
            return None;
        }
        let mut data = std::mem::take(&mut self.data);
        if data.ends_with('\n') {
            data.pop();
        }
        Some(SseFrame {
            event: event
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_EVENT.to_string()),
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(event: &str, data: &str) -> SseFrame {
        SseFrame {
            event: event.to_string(),
            data: data.to_string(),
        }
    }

    #[test]
    fn decodes_named_events_and_skips_comments() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(
            b": keep-alive\n\nevent: log\ndata: {\"message\":\"hi\"}\n\nevent: progress\ndata:{}\n\n",
        );
        assert_eq!(
            frames,
            vec![frame("log", "{\"message\":\"hi\"}"), frame("progress", "{}")]
        );
    }

    #[test]
    fn frames_split_across_chunks_and_line_endings() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"event: lo").is_empty());
        assert!(decoder.feed(b"g\r").is_empty());
        assert!(decoder.feed(b"\ndata: a\r\ndata: b\r").is_empty());
        let frames = decoder.feed(b"\n\r\n");
        assert_eq!(frames, vec![frame("log", "a\nb")]);
    }

    #[test]
    fn multibyte_characters_split_between_chunks() {
        let mut decoder = SseDecoder::new();
        let bytes = "data: héllo\n\n".as_bytes();
        let split = bytes.iter().position(|b| *b == 0xC3).unwrap() + 1;
        assert!(decoder.feed(&bytes[..split]).is_empty());
        let frames = decoder.feed(&bytes[split..]);
        assert_eq!(frames, vec![frame("message", "héllo")]);
    }

    #[test]
    fn events_without_data_are_not_dispatched() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b"event: progress\n\ndata: x\n\n");
        assert_eq!(frames, vec![frame("message", "x")]);
    }

    #[test]
    fn remembers_last_event_id() {
        let mut decoder = SseDecoder::new();
        decoder.feed(b"id: 7\nevent: log\ndata: {}\n\n");
        assert_eq!(decoder.last_event_id(), Some("7"));
        decoder.feed(b"event: log\ndata: {}\n\n");
        assert_eq!(decoder.last_event_id(), Some("7"));
    }
}
