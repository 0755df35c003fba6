//! Line-delimited JSON event source.
//!
//! Each line is one host print event:
//!
//! ```json
//! {"event": "Channel Msg Hilight", "channel": "#rust", "word": ["alice", "hey you"]}
//! ```
//!
//! A small script on the chat client side can forward its hooks this way.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin},
    sync::Mutex,
};
use tracing::{debug, info, instrument, warn};

use crate::{
    base::types::{HookKind, Res, Void},
    interaction::hooks::{self, ChatHooks},
};

use super::GenericEventSource;

/// One event as written on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostEvent {
    /// Host print event name, e.g. `Quit`.
    pub event: String,
    /// Channel or query window the event was printed in.
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub word: Vec<String>,
}

/// Parse one line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Res<Option<HostEvent>> {
    let line = line.trim();

    if line.is_empty() {
        return Ok(None);
    }

    Ok(Some(serde_json::from_str(line)?))
}

/// Reads events from any buffered async reader.
pub struct LineEventSource<R> {
    reader: Mutex<R>,
}

impl<R> LineEventSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R) -> Self {
        Self { reader: Mutex::new(reader) }
    }
}

impl LineEventSource<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

#[async_trait]
impl<R> GenericEventSource for LineEventSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    #[instrument(name = "LineEventSource::run", skip_all)]
    async fn run(&self, hooks: Arc<dyn ChatHooks>) -> Void {
        let mut reader = self.reader.lock().await;
        let mut buf = Vec::new();
        let mut count = 0usize;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }

            // Chat text is not always UTF-8 (latin-1 clients); keep the line readable.
            let line = String::from_utf8_lossy(&buf);

            let event = match parse_line(&line) {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(err) => {
                    warn!("Skipping malformed event line: {}", err);
                    continue;
                }
            };

            let kind = match event.event.parse::<HookKind>() {
                Ok(kind) => kind,
                Err(err) => {
                    debug!("{}", err);
                    continue;
                }
            };

            hooks::route(hooks.as_ref(), kind, &event.channel, &event.word);
            count += 1;
        }

        info!("Event feed closed after {} events.", count);

        Ok(())
    }
}
