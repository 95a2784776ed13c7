//! Polled pattern sequencer
//!
//! Plays a [`Pattern`] on a [`ToneSink`] without ever blocking. The owner
//! of the control loop calls [`PatternSequencer::poll`] with the current
//! millisecond timestamp on every iteration; each call checks whether the
//! current step has run its course and, if so, moves on.
//!
//! ```ignore
//! let mut sequencer = PatternSequencer::new(buzzer);
//! sequencer.start(PatternId::Alarm.builtin()?, true, now_ms());
//!
//! loop {
//!     sequencer.poll(now_ms());
//!     // other periodic work
//! }
//! ```

use super::step::{Pattern, Step};
use crate::time::elapsed_ms;
use crate::traits::{Tone, ToneSink};

/// Externally visible sequencer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequencerState {
    /// Nothing playing
    Idle,
    /// Playing a pattern
    Playing {
        /// Index of the current step
        step_index: usize,
        /// Whether the pattern restarts after its last step
        looping: bool,
    },
}

/// Run-time record of the pattern being played
#[derive(Debug, Clone, Copy)]
struct Playback<'p> {
    pattern: Pattern<'p>,
    step_index: usize,
    /// Timestamp at which the current step began (ms)
    step_start_ms: u32,
    looping: bool,
}

impl<'p> Playback<'p> {
    fn current(&self) -> Option<&'p Step> {
        self.pattern.step(self.step_index)
    }
}

/// Non-blocking sequencer for one buzzer channel
///
/// Step boundaries are scheduled from the previous boundary, not from the
/// time `poll` happened to observe them, so a pattern keeps its rhythm
/// regardless of polling jitter. When polling lags behind by several steps,
/// every step is still emitted in order during the catching-up call.
pub struct PatternSequencer<'p, S> {
    sink: S,
    playback: Option<Playback<'p>>,
}

impl<'p, S: ToneSink> PatternSequencer<'p, S> {
    /// Create an idle sequencer bound to a sink
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            playback: None,
        }
    }

    /// Start playing a pattern
    ///
    /// The first step is applied immediately. Anything already playing is
    /// abandoned. A pattern with nothing to play leaves the sequencer idle
    /// and silences the output.
    pub fn start(&mut self, pattern: Pattern<'p>, looping: bool, now_ms: u32) {
        let Some(first) = pattern.step(0) else {
            self.stop();
            return;
        };

        // A zero-length cycle would restart forever within a single poll
        let looping = looping && pattern.total_duration_ms() > 0;

        self.playback = Some(Playback {
            pattern,
            step_index: 0,
            step_start_ms: now_ms,
            looping,
        });
        self.sink.apply(first.tone);
    }

    /// Stop playback and silence the output
    ///
    /// Safe to call when idle; the silence command is sent either way.
    pub fn stop(&mut self) {
        self.playback = None;
        self.sink.silence();
    }

    /// Advance playback to `now_ms`
    ///
    /// Returns immediately. A timestamp earlier than the start of the
    /// current step counts as no time elapsed.
    pub fn poll(&mut self, now_ms: u32) {
        let Some(mut playback) = self.playback else {
            return;
        };

        loop {
            let Some(step) = playback.current() else {
                // Cursor ran off the table
                self.stop();
                return;
            };

            if elapsed_ms(now_ms, playback.step_start_ms) < step.duration_ms {
                break;
            }

            playback.step_start_ms = playback.step_start_ms.wrapping_add(step.duration_ms);
            playback.step_index += 1;

            if playback.current().is_none() {
                if !playback.looping {
                    self.stop();
                    return;
                }
                playback.step_index = 0;
            }

            if let Some(next) = playback.current() {
                self.sink.apply(next.tone);
            }
        }

        self.playback = Some(playback);
    }

    /// Check if a pattern is playing
    pub fn is_active(&self) -> bool {
        self.playback.is_some()
    }

    /// Snapshot of the sequencer state, for status displays
    pub fn state(&self) -> SequencerState {
        match self.playback {
            None => SequencerState::Idle,
            Some(p) => SequencerState::Playing {
                step_index: p.step_index,
                looping: p.looping,
            },
        }
    }

    /// Tone of the current step, if playing
    pub fn current_tone(&self) -> Option<Tone> {
        self.playback.and_then(|p| p.current()).map(|s| s.tone)
    }

    /// Time left in the current step, if playing
    pub fn step_remaining_ms(&self, now_ms: u32) -> Option<u32> {
        let playback = self.playback?;
        let step = playback.current()?;
        Some(step.duration_ms.saturating_sub(elapsed_ms(now_ms, playback.step_start_ms)))
    }

    /// Get access to the sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Get mutable access to the sink
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Release the sink
    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;

    /// Sink that remembers every command
    #[derive(Default)]
    struct RecordingSink {
        tones: Vec<Tone, 64>,
    }

    impl RecordingSink {
        fn last(&self) -> Option<Tone> {
            self.tones.last().copied()
        }
    }

    impl ToneSink for RecordingSink {
        fn apply(&mut self, tone: Tone) {
            self.tones.push(tone).unwrap();
        }
    }

    const SIREN: [Step; 4] = [
        Step::tone(500, 100),
        Step::rest(50),
        Step::tone(900, 150),
        Step::END,
    ];

    fn sequencer<'p>() -> PatternSequencer<'p, RecordingSink> {
        PatternSequencer::new(RecordingSink::default())
    }

    #[test]
    fn test_initial_state() {
        let seq = sequencer();
        assert!(!seq.is_active());
        assert_eq!(seq.state(), SequencerState::Idle);
        assert_eq!(seq.current_tone(), None);
        assert!(seq.sink().tones.is_empty());
    }

    #[test]
    fn test_one_shot_playback() {
        let mut seq = sequencer();

        seq.start(Pattern::from(&SIREN), false, 0);
        assert_eq!(seq.sink().tones.as_slice(), &[Tone::full(500)]);

        seq.poll(99);
        assert_eq!(seq.sink().tones.len(), 1);

        seq.poll(100);
        assert_eq!(seq.sink().last(), Some(Tone::SILENT));
        assert_eq!(
            seq.state(),
            SequencerState::Playing {
                step_index: 1,
                looping: false
            }
        );

        seq.poll(150);
        assert_eq!(seq.sink().last(), Some(Tone::full(900)));

        seq.poll(299);
        assert!(seq.is_active());

        seq.poll(300);
        assert!(!seq.is_active());
        assert_eq!(seq.sink().last(), Some(Tone::SILENT));
        assert_eq!(seq.sink().tones.len(), 4);
    }

    #[test]
    fn test_looping_restarts() {
        let mut seq = sequencer();

        seq.start(Pattern::from(&SIREN), true, 0);
        seq.poll(100);
        seq.poll(150);
        seq.poll(300);

        assert!(seq.is_active());
        assert_eq!(seq.sink().last(), Some(Tone::full(500)));
        assert_eq!(
            seq.state(),
            SequencerState::Playing {
                step_index: 0,
                looping: true
            }
        );

        // Second cycle keeps the same rhythm
        seq.poll(400);
        assert_eq!(seq.sink().last(), Some(Tone::SILENT));
        seq.poll(450);
        assert_eq!(seq.sink().last(), Some(Tone::full(900)));
    }

    #[test]
    fn test_late_poll_emits_every_step() {
        let mut seq = sequencer();

        seq.start(Pattern::from(&SIREN), false, 0);
        seq.poll(1000);

        assert_eq!(
            seq.sink().tones.as_slice(),
            &[Tone::full(500), Tone::SILENT, Tone::full(900), Tone::SILENT]
        );
        assert!(!seq.is_active());
    }

    #[test]
    fn test_schedule_ignores_poll_jitter() {
        let mut seq = sequencer();

        seq.start(Pattern::from(&SIREN), false, 0);
        // Boundary at 100 observed late
        seq.poll(120);
        assert_eq!(seq.step_remaining_ms(120), Some(30));

        // Next boundary is still at 150
        seq.poll(150);
        assert_eq!(seq.sink().last(), Some(Tone::full(900)));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut seq = sequencer();

        seq.start(Pattern::from(&SIREN), true, 0);
        seq.stop();
        assert!(!seq.is_active());
        assert_eq!(seq.sink().last(), Some(Tone::SILENT));

        seq.stop();
        assert!(!seq.is_active());
        assert_eq!(seq.state(), SequencerState::Idle);
        assert_eq!(seq.sink().tones.len(), 3);
        assert_eq!(seq.sink().last(), Some(Tone::SILENT));
    }

    #[test]
    fn test_poll_when_idle_does_nothing() {
        let mut seq = sequencer();
        seq.poll(5000);
        assert!(seq.sink().tones.is_empty());
    }

    #[test]
    fn test_preemption() {
        const OTHER: [Step; 2] = [Step::tone(2000, 40), Step::END];
        let mut seq = sequencer();

        seq.start(Pattern::from(&SIREN), true, 0);
        seq.start(Pattern::from(&OTHER), false, 10);

        assert_eq!(seq.sink().last(), Some(Tone::full(2000)));
        assert_eq!(
            seq.state(),
            SequencerState::Playing {
                step_index: 0,
                looping: false
            }
        );

        // Timing follows the new pattern only
        seq.poll(49);
        assert!(seq.is_active());
        seq.poll(50);
        assert!(!seq.is_active());
    }

    #[test]
    fn test_empty_pattern_goes_idle() {
        let mut seq = sequencer();

        seq.start(Pattern::new(&[Step::END]), true, 0);
        assert!(!seq.is_active());
        assert_eq!(seq.sink().tones.as_slice(), &[Tone::SILENT]);

        seq.start(Pattern::new(&[]), false, 0);
        assert!(!seq.is_active());
    }

    #[test]
    fn test_missing_terminator_ends_at_table_end() {
        let steps = [Step::tone(700, 10), Step::tone(800, 10)];
        let mut seq = sequencer();

        seq.start(Pattern::new(&steps), false, 0);
        seq.poll(10);
        assert_eq!(seq.sink().last(), Some(Tone::full(800)));
        seq.poll(20);
        assert!(!seq.is_active());
        assert_eq!(seq.sink().last(), Some(Tone::SILENT));
    }

    #[test]
    fn test_stale_timestamp_does_not_advance() {
        let mut seq = sequencer();

        seq.start(Pattern::from(&SIREN), false, 1000);
        seq.poll(500);

        assert_eq!(seq.sink().tones.len(), 1);
        assert_eq!(seq.step_remaining_ms(500), Some(100));
    }

    #[test]
    fn test_clock_wraparound() {
        let mut seq = sequencer();
        let start = u32::MAX - 49;

        seq.start(Pattern::from(&SIREN), false, start);
        seq.poll(start.wrapping_add(99));
        assert_eq!(seq.sink().tones.len(), 1);

        seq.poll(start.wrapping_add(100));
        assert_eq!(seq.sink().last(), Some(Tone::SILENT));
        assert_eq!(seq.step_remaining_ms(start.wrapping_add(100)), Some(50));
    }

    #[test]
    fn test_zero_length_loop_plays_once() {
        let steps = [Step::tone(1000, 0), Step::tone(1200, 0), Step::END];
        let mut seq = sequencer();

        seq.start(Pattern::new(&steps), true, 0);
        assert_eq!(
            seq.state(),
            SequencerState::Playing {
                step_index: 0,
                looping: false
            }
        );

        seq.poll(0);
        assert!(!seq.is_active());
        assert_eq!(
            seq.sink().tones.as_slice(),
            &[Tone::full(1000), Tone::full(1200), Tone::SILENT]
        );
    }

    #[test]
    fn test_current_tone_tracks_step() {
        let mut seq = sequencer();

        seq.start(Pattern::from(&SIREN), false, 0);
        assert_eq!(seq.current_tone(), Some(Tone::full(500)));
        seq.poll(150);
        assert_eq!(seq.current_tone(), Some(Tone::full(900)));
        seq.stop();
        assert_eq!(seq.current_tone(), None);
        assert_eq!(seq.step_remaining_ms(0), None);
    }

    #[test]
    fn test_longest_step_finishes() {
        use crate::sequencer::step::MAX_STEP_DURATION_MS;

        let steps = [Step::tone(700, MAX_STEP_DURATION_MS), Step::END];
        let mut seq = sequencer();

        seq.start(Pattern::new(&steps), false, 0);
        seq.poll(MAX_STEP_DURATION_MS - 1);
        assert!(seq.is_active());

        seq.poll(MAX_STEP_DURATION_MS);
        assert!(!seq.is_active());
        assert_eq!(seq.sink().last(), Some(Tone::SILENT));
    }
}
