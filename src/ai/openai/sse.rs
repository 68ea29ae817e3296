//! Server-sent event decoding for streamed chat completions.

use super::types::ChatCompletionChunk;
use crate::ai::TextStream;
use crate::{Error, Result};
use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::collections::VecDeque;
use std::fmt::Display;

const DONE_SENTINEL: &str = "[DONE]";

struct SseDecoder<E> {
    inner: BoxStream<'static, std::result::Result<Bytes, E>>,
    buffer: BytesMut,
    pending: VecDeque<Result<String>>,
    finished: bool,
    saw_done: bool,
}

impl<E> SseDecoder<E> {
    fn drain_lines(&mut self) {
        while !self.finished {
            let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') else {
                break;
            };
            let line = self.buffer.split_to(pos + 1);
            self.handle_line(&String::from_utf8_lossy(&line));
        }
    }

    fn handle_line(&mut self, line: &str) {
        let Some(data) = line.trim().strip_prefix("data:") else {
            return;
        };
        let data = data.trim();
        if data.is_empty() {
            return;
        }

        if data == DONE_SENTINEL {
            self.saw_done = true;
            self.finished = true;
            return;
        }

        match serde_json::from_str::<ChatCompletionChunk>(data) {
            Ok(ChatCompletionChunk {
                error: Some(error), ..
            }) => {
                tracing::error!("OpenAI reported an error mid-stream: {}", error.message);
                self.fail(error.message);
            }
            Ok(chunk) => {
                let content = chunk
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.delta.content)
                    .filter(|content| !content.is_empty());
                if let Some(content) = content {
                    self.pending.push_back(Ok(content));
                }
            }
            Err(e) => {
                tracing::error!("Failed to parse stream chunk: {}\nData: {}", e, data);
                self.fail(format!("Failed to parse stream chunk: {}", e));
            }
        }
    }

    fn fail(&mut self, message: String) {
        self.finished = true;
        self.pending.push_back(Err(Error::Generation(message)));
    }
}

/// Decode an OpenAI event stream into content fragments.
///
/// Lines may be split across reads. The stream ends at `data: [DONE]`; a
/// transport error, a malformed chunk, or end of input before `[DONE]` yields
/// one `Error::Generation` item and then ends.
pub fn content_fragments<S, E>(bytes: S) -> TextStream
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let decoder = SseDecoder {
        inner: bytes.boxed(),
        buffer: BytesMut::new(),
        pending: VecDeque::new(),
        finished: false,
        saw_done: false,
    };

    stream::unfold(decoder, |mut decoder| async move {
        loop {
            if let Some(item) = decoder.pending.pop_front() {
                return Some((item, decoder));
            }
            if decoder.finished {
                return None;
            }

            match decoder.inner.next().await {
                Some(Ok(chunk)) => {
                    decoder.buffer.extend_from_slice(&chunk);
                    decoder.drain_lines();
                }
                Some(Err(e)) => {
                    tracing::error!("Stream interrupted: {}", e);
                    decoder.fail(format!("Stream interrupted: {}", e));
                }
                None => {
                    let rest = decoder.buffer.split();
                    decoder.handle_line(&String::from_utf8_lossy(&rest));
                    if !decoder.saw_done && !decoder.finished {
                        decoder.fail("Stream ended before completion".to_string());
                    }
                    decoder.finished = true;
                }
            }
        }
    })
    .boxed()
}
