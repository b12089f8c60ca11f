//! Typewriter reveal of an already-complete reply.
//!
//! [`Reveal`] is the lazy sequence of prefixes; [`RevealTicker`] paces how
//! fast a caller pulls from it. Keeping the two apart means the caller owns
//! the timer: once the ticker is dropped nothing keeps firing.

use std::iter::FusedIterator;
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Default pause between two frames.
pub const DEFAULT_CADENCE: Duration = Duration::from_millis(20);

/// One emission of the reveal: the prefix currently on display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealFrame {
    /// Prefix of the reply, cut on a `char` boundary.
    pub prefix: String,
    /// Whether this prefix is the whole reply.
    pub is_final: bool,
}

/// Generator over the prefixes of a reply.
///
/// For a reply of `N` characters this yields exactly `N + 1` frames, from
/// the empty prefix up to the full text, and then stays exhausted. An empty
/// reply still yields its single (final) empty frame.
#[derive(Debug, Clone)]
pub struct Reveal {
    text: String,
    /// Byte offset where the next prefix ends; `None` after the final frame.
    next_end: Option<usize>,
}

impl Reveal {
    /// Start revealing `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            next_end: Some(0),
        }
    }

    /// The full reply being revealed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Total number of frames this reveal produces from the start.
    pub fn frame_count(&self) -> usize {
        self.text.chars().count() + 1
    }

    /// Whether the final frame has already been emitted.
    pub fn is_finished(&self) -> bool {
        self.next_end.is_none()
    }
}

impl Iterator for Reveal {
    type Item = RevealFrame;

    fn next(&mut self) -> Option<RevealFrame> {
        let end = self.next_end?;
        let is_final = end == self.text.len();

        self.next_end = if is_final {
            None
        } else {
            let step = self.text[end..].chars().next().map_or(0, char::len_utf8);
            Some(end + step)
        };

        Some(RevealFrame {
            prefix: self.text[..end].to_string(),
            is_final,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .next_end
            .map_or(0, |end| self.text[end..].chars().count() + 1);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Reveal {}

impl FusedIterator for Reveal {}

/// Fixed-cadence pacing for a reveal.
///
/// The first tick completes one full cadence after creation, matching an
/// interval timer that fires only after its first period has elapsed.
#[derive(Debug)]
pub struct RevealTicker {
    interval: Interval,
}

impl RevealTicker {
    /// Create a ticker. A zero cadence is clamped to one millisecond.
    pub fn new(cadence: Duration) -> Self {
        let cadence = cadence.max(Duration::from_millis(1));
        let mut interval = interval_at(Instant::now() + cadence, cadence);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    pub fn cadence(&self) -> Duration {
        self.interval.period()
    }

    /// Wait for the next frame slot.
    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefixes(text: &str) -> Vec<String> {
        Reveal::new(text).map(|f| f.prefix).collect()
    }

    #[test]
    fn test_emits_n_plus_one_prefixes_in_order() {
        assert_eq!(prefixes("Hi!"), vec!["", "H", "Hi", "Hi!"]);

        let reveal = Reveal::new("Hi there");
        assert_eq!(reveal.frame_count(), 9);
        assert_eq!(reveal.len(), 9);
    }

    #[test]
    fn test_only_last_frame_is_final() {
        let frames: Vec<RevealFrame> = Reveal::new("abc").collect();
        let finals: Vec<bool> = frames.iter().map(|f| f.is_final).collect();
        assert_eq!(finals, vec![false, false, false, true]);
    }

    #[test]
    fn test_empty_reply_still_completes() {
        let frames: Vec<RevealFrame> = Reveal::new("").collect();
        assert_eq!(
            frames,
            vec![RevealFrame {
                prefix: String::new(),
                is_final: true
            }]
        );
    }

    #[test]
    fn test_is_not_restartable() {
        let mut reveal = Reveal::new("ok");
        assert_eq!(reveal.by_ref().count(), 3);
        assert!(reveal.is_finished());
        assert_eq!(reveal.next(), None);
        assert_eq!(reveal.next(), None);
    }

    #[test]
    fn test_cuts_on_char_boundaries() {
        assert_eq!(prefixes("❌ ok"), vec!["", "❌", "❌ ", "❌ o", "❌ ok"]);
        assert_eq!(Reveal::new("héllo").frame_count(), 6);
    }

    #[test]
    fn test_size_hint_tracks_progress() {
        let mut reveal = Reveal::new("abcd");
        assert_eq!(reveal.size_hint(), (5, Some(5)));
        reveal.next();
        reveal.next();
        assert_eq!(reveal.size_hint(), (3, Some(3)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_waits_one_cadence_per_tick() {
        let start = Instant::now();
        let mut ticker = RevealTicker::new(DEFAULT_CADENCE);

        ticker.tick().await;
        assert_eq!(start.elapsed(), Duration::from_millis(20));

        ticker.tick().await;
        ticker.tick().await;
        assert_eq!(start.elapsed(), Duration::from_millis(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_cadence_is_clamped() {
        let ticker = RevealTicker::new(Duration::ZERO);
        assert_eq!(ticker.cadence(), Duration::from_millis(1));
    }
}
