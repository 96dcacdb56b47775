// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{EventSource, KeyPress, PinnedInputStream, ReaderEvent};
use async_stream::stream;
use std::time::Duration;

/// Yields `events` one after another, each preceded by `delay`, then stays pending
/// forever (a terminal that has gone quiet, rather than one that was closed). Use
/// [`ReaderEvent::Eof`] in `events` to simulate a closed input.
pub fn gen_input_stream_with_delay(
    events: Vec<ReaderEvent>,
    delay: Duration,
) -> PinnedInputStream<ReaderEvent> {
    let it = stream! {
        for event in events {
            tokio::time::sleep(delay).await;
            yield event;
        }
        std::future::pending::<()>().await;
    };
    Box::pin(it)
}

/// Event source that plays back `events` every time it is started.
pub fn new_scripted_event_source(events: Vec<ReaderEvent>) -> EventSource {
    EventSource::new(Box::new(move || {
        gen_input_stream_with_delay(events.clone(), Duration::from_millis(1))
    }))
}

/// Event source that produces nothing on its own; drive it with
/// [`EventSource::injector()`].
pub fn new_silent_event_source() -> EventSource { new_scripted_event_source(vec![]) }

/// Shorthand for a stream of plain character key presses.
pub fn keys_for_text(text: &str) -> Vec<ReaderEvent> {
    text.chars()
        .map(|ch| ReaderEvent::Key(KeyPress::from_char(ch)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_gen_input_stream_yields_events_in_order() {
        let mut input_stream =
            gen_input_stream_with_delay(keys_for_text("ab"), Duration::from_millis(1));

        assert_eq!(
            input_stream.next().await,
            Some(ReaderEvent::Key(KeyPress::from_char('a')))
        );
        assert_eq!(
            input_stream.next().await,
            Some(ReaderEvent::Key(KeyPress::from_char('b')))
        );

        let pending =
            tokio::time::timeout(Duration::from_millis(20), input_stream.next()).await;
        assert!(pending.is_err());
    }
}
