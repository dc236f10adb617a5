//! Word-by-word emission paced over a target duration.
//!
//! The reply is split on whitespace and handed out as a forward-only
//! [`Stream`]. Between two fragments the stream parks on a tokio timer, so a
//! slow reply never holds up other connections served by the same runtime.
//! Dropping the stream mid-way abandons the pending timer and the remaining
//! words are never produced.

use std::time::Duration;

use async_stream::stream;
use futures::Stream;

/// A reply split into words together with the pause between them.
#[derive(Debug, Clone)]
pub struct PacedEmitter {
    words: Vec<String>,
    delay: Duration,
}

impl PacedEmitter {
    /// Prepare `text` to be spread over `duration_secs` seconds.
    ///
    /// The pause between fragments is `duration_secs / word_count`. Zero,
    /// negative or non-finite durations mean no pause at all.
    pub fn new(text: &str, duration_secs: f64) -> Self {
        let words: Vec<String> = text.split_whitespace().map(str::to_owned).collect();
        let delay = per_word_delay(duration_secs, words.len());
        Self { words, delay }
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Turn the emitter into its fragment stream.
    ///
    /// The first fragment is the bare first word, every later one carries a
    /// single leading space. No pause follows the last fragment.
    pub fn into_stream(self) -> impl Stream<Item = String> + Send + 'static {
        let Self { words, delay } = self;
        let last = words.len().saturating_sub(1);

        stream! {
            for (index, word) in words.into_iter().enumerate() {
                if index == 0 {
                    yield word;
                } else {
                    yield format!(" {word}");
                }

                if index < last && !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

/// Stream the words of `text` evenly over `duration_secs` seconds.
pub fn emit(text: &str, duration_secs: f64) -> impl Stream<Item = String> + Send + 'static {
    PacedEmitter::new(text, duration_secs).into_stream()
}

fn per_word_delay(duration_secs: f64, word_count: usize) -> Duration {
    if word_count == 0 {
        return Duration::ZERO;
    }

    let secs = duration_secs / word_count as f64;
    if !secs.is_finite() || secs <= 0.0 {
        return Duration::ZERO;
    }

    // Saturate instead of panicking on absurdly long durations
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use tokio::time::Instant;

    /// Drain a stream, recording when each fragment arrived relative to the start.
    async fn collect_timed(text: &str, duration_secs: f64) -> Vec<(String, Duration)> {
        let start = Instant::now();
        let stream = emit(text, duration_secs);
        futures::pin_mut!(stream);

        let mut out = Vec::new();
        while let Some(fragment) = stream.next().await {
            out.push((fragment, start.elapsed()));
        }
        out
    }

    fn assert_close(actual: Duration, expected: Duration) {
        let tolerance = Duration::from_millis(5);
        let diff = if actual > expected { actual - expected } else { expected - actual };
        assert!(diff <= tolerance, "expected ~{expected:?}, got {actual:?}");
    }

    #[test]
    fn test_delay_is_duration_over_word_count() {
        let emitter = PacedEmitter::new("one two three four", 2.0);
        assert_eq!(emitter.word_count(), 4);
        assert_eq!(emitter.delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_degenerate_durations_have_no_delay() {
        assert_eq!(PacedEmitter::new("a b", 0.0).delay(), Duration::ZERO);
        assert_eq!(PacedEmitter::new("a b", -4.0).delay(), Duration::ZERO);
        assert_eq!(PacedEmitter::new("a b", f64::NAN).delay(), Duration::ZERO);
        assert_eq!(PacedEmitter::new("", 10.0).delay(), Duration::ZERO);
    }

    #[test]
    fn test_huge_duration_saturates() {
        assert_eq!(PacedEmitter::new("a b", 1e300).delay(), Duration::MAX);
    }

    #[tokio::test(start_paused = true)]
    async fn test_emit_paces_fragments() {
        let fragments = collect_timed("Hi there friend", 3.0).await;

        let texts: Vec<&str> = fragments.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(texts, vec!["Hi", " there", " friend"]);

        assert_close(fragments[0].1, Duration::ZERO);
        assert_close(fragments[1].1, Duration::from_secs(1));
        assert_close(fragments[2].1, Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_pause_after_last_fragment() {
        let start = Instant::now();
        let fragments: Vec<String> = emit("alpha beta", 4.0).collect().await;
        assert_eq!(fragments.len(), 2);
        // Two words over four seconds: one pause of two seconds
        assert_close(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_emit_empty_text_completes_immediately() {
        for text in ["", "   ", "\n\t "] {
            let fragments = collect_timed(text, 5.0).await;
            assert!(fragments.is_empty());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fragments_reconstruct_normalized_text() {
        let text = "  The quick\tbrown   fox\njumps  ";
        let fragments: Vec<String> = emit(text, 1.0).collect().await;

        assert_eq!(fragments.len(), text.split_whitespace().count());
        assert_eq!(fragments.concat(), "The quick brown fox jumps");
    }

    #[tokio::test(start_paused = true)]
    async fn test_canned_text_round_trips_exactly() {
        let fragments: Vec<String> = emit(crate::FILLER_TEXT, 2.0).collect().await;
        assert_eq!(fragments.concat(), crate::FILLER_TEXT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_negative_duration_streams_without_delay() {
        let start = Instant::now();
        let fragments: Vec<String> = emit("one two three", -3.0).collect().await;
        assert_eq!(fragments.concat(), "one two three");
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_stream_stops_emission() {
        let start = Instant::now();
        let taken: Vec<String> = emit("a b c d e", 50.0).take(2).collect().await;
        assert_eq!(taken, vec!["a", " b"]);
        // Only the pause between the two taken fragments was waited
        assert_close(start.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_streams_do_not_block_each_other() {
        let start = Instant::now();
        let (first, second) = tokio::join!(
            emit("one two three", 3.0).collect::<Vec<_>>(),
            emit("four five six", 3.0).collect::<Vec<_>>(),
        );
        assert_eq!(first.len(), 3);
        assert_eq!(second.len(), 3);
        assert_close(start.elapsed(), Duration::from_secs(2));
    }
}
