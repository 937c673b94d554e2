//! Per-session gesture progression
//!
//! Each client gets one `Session`. A session walks a gesture through its
//! four keyframes in order, with a timeout per stage and a cooldown after
//! every detection. The step function is synchronous and clock-free; the
//! caller supplies timestamps, which keeps the state machine testable.

use crate::landmarks::{self, Landmark};
use crate::library::{GestureLibrary, Stage};
use crate::matcher::StageMatcher;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Matching progress of a session
#[derive(Debug, Clone)]
enum Phase {
    /// Scanning every template's start keyframe
    Idle,
    /// A start keyframe matched; waiting on the named stage of one gesture
    Tracking {
        gesture: String,
        stage: Stage,
        deadline: Instant,
    },
}

/// What a step observed, in emit order
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A keyframe matched and the session advanced
    StageMatched { gesture: String, stage: Stage },
    /// The pending stage did not match in time; back to idle
    StageTimedOut { gesture: String },
    /// All four keyframes matched
    Detected {
        gesture: String,
        transcript: Vec<String>,
    },
}

/// Session tunables, taken from the `[matching]` config section
#[derive(Debug, Clone, Copy)]
pub struct SessionParams {
    /// DTW distance below which a keyframe matches
    pub threshold: f32,
    /// Dead time after a detection
    pub cooldown: Duration,
    /// How long one stage may wait for its keyframe
    pub stage_timeout: Duration,
    /// Process every Nth delivered frame
    pub frame_decimation: u32,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            threshold: 0.9,
            cooldown: Duration::from_secs(1),
            stage_timeout: Duration::from_secs(5),
            frame_decimation: 1,
        }
    }
}

/// One client's matcher state over a shared gesture library
pub struct Session {
    library: Arc<GestureLibrary>,
    matcher: StageMatcher,
    cooldown: Duration,
    stage_timeout: Duration,
    frame_decimation: u64,
    phase: Phase,
    cooldown_until: Option<Instant>,
    transcript: Vec<String>,
    frames_seen: u64,
}

impl Session {
    pub fn new(library: Arc<GestureLibrary>, params: SessionParams) -> Self {
        Self {
            library,
            matcher: StageMatcher::new(params.threshold),
            cooldown: params.cooldown,
            stage_timeout: params.stage_timeout,
            frame_decimation: u64::from(params.frame_decimation.max(1)),
            phase: Phase::Idle,
            cooldown_until: None,
            transcript: Vec::new(),
            frames_seen: 0,
        }
    }

    /// Words detected so far, oldest first
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Gesture currently being tracked, if any
    pub fn pending(&self) -> Option<&str> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Tracking { gesture, .. } => Some(gesture),
        }
    }

    /// Feed one raw hand frame.
    ///
    /// Applies the outer per-frame policy first: frame decimation counts
    /// every delivered frame, and incomplete detections are dropped.
    /// Complete frames are normalized, reduced to the signature subset and
    /// stepped through the state machine.
    pub fn offer(&mut self, raw: &[Landmark], now: Instant) -> Vec<SessionEvent> {
        self.frames_seen += 1;
        if self.frames_seen % self.frame_decimation != 0 {
            return Vec::new();
        }
        let Some(keypoints) = landmarks::signature_keypoints(raw) else {
            return Vec::new();
        };
        self.step(&keypoints, now)
    }

    /// Advance the state machine with an already-normalized keypoint set.
    pub fn step(&mut self, keypoints: &[Landmark], now: Instant) -> Vec<SessionEvent> {
        let mut events = Vec::new();

        // Cooldown swallows the whole frame, timeout checks included.
        if let Some(until) = self.cooldown_until {
            if now < until {
                return events;
            }
        }

        // A timed-out stage sends the session back to idle; the same frame
        // still gets the idle scan below.
        let timed_out = match &self.phase {
            Phase::Tracking { deadline, .. } => now > *deadline,
            Phase::Idle => false,
        };
        if timed_out {
            if let Phase::Tracking { gesture, .. } =
                std::mem::replace(&mut self.phase, Phase::Idle)
            {
                events.push(SessionEvent::StageTimedOut { gesture });
            }
        }

        match &self.phase {
            Phase::Idle => {
                // First start keyframe to match wins, in store order.
                for template in self.library.iter() {
                    if self
                        .matcher
                        .is_match(keypoints, template.keyframe(Stage::Start))
                    {
                        events.push(SessionEvent::StageMatched {
                            gesture: template.name.clone(),
                            stage: Stage::Start,
                        });
                        self.phase = Phase::Tracking {
                            gesture: template.name.clone(),
                            stage: Stage::Mid1,
                            deadline: now + self.stage_timeout,
                        };
                        break;
                    }
                }
            }
            Phase::Tracking { gesture, stage, .. } => {
                let gesture = gesture.clone();
                let stage = *stage;
                match self.library.get(&gesture) {
                    Some(template)
                        if self.matcher.is_match(keypoints, template.keyframe(stage)) =>
                    {
                        events.push(SessionEvent::StageMatched {
                            gesture: gesture.clone(),
                            stage,
                        });
                        match stage.next() {
                            Some(next) => {
                                self.phase = Phase::Tracking {
                                    gesture,
                                    stage: next,
                                    deadline: now + self.stage_timeout,
                                };
                            }
                            None => {
                                // The end keyframe completes the sequence.
                                let word = template.word().to_string();
                                if self.transcript.last() != Some(&word) {
                                    self.transcript.push(word);
                                }
                                events.push(SessionEvent::Detected {
                                    gesture,
                                    transcript: self.transcript.clone(),
                                });
                                self.cooldown_until = Some(now + self.cooldown);
                                self.phase = Phase::Idle;
                            }
                        }
                    }
                    // No match: keep waiting on the same stage.
                    Some(_) => {}
                    // Name not in this library; nothing left to wait for.
                    None => self.phase = Phase::Idle,
                }
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{HAND_LANDMARK_COUNT, signature_keypoints};
    use crate::library::GestureTemplate;

    fn raw_frame(bend: f32) -> Vec<Landmark> {
        // 21 points along a line with alternating lift; `bend` changes the
        // shape itself, so normalization keeps the stages distinct.
        (0..HAND_LANDMARK_COUNT)
            .map(|i| {
                let y = if i % 2 == 0 { 0.0 } else { bend };
                Landmark::new(i as f32, y, 0.0)
            })
            .collect()
    }

    fn recorded_library() -> Arc<GestureLibrary> {
        // Templates recorded the same way live frames are processed.
        let record = |bend: f32| signature_keypoints(&raw_frame(bend)).unwrap();
        Arc::new(GestureLibrary::from_templates(vec![GestureTemplate::new(
            "wave",
            [record(0.0), record(6.0), record(12.0), record(18.0)],
        )]))
    }

    #[test]
    fn test_offer_skips_incomplete_frames() {
        let mut session = Session::new(recorded_library(), SessionParams::default());
        let t0 = Instant::now();

        let short = raw_frame(0.0)[..20].to_vec();
        assert!(session.offer(&short, t0).is_empty());
        assert!(session.pending().is_none());

        let events = session.offer(&raw_frame(0.0), t0);
        assert_eq!(events.len(), 1);
        assert_eq!(session.pending(), Some("wave"));
    }

    #[test]
    fn test_decimation_counts_every_delivered_frame() {
        let params = SessionParams {
            frame_decimation: 3,
            ..SessionParams::default()
        };
        let mut session = Session::new(recorded_library(), params);
        let t0 = Instant::now();

        // The first two frames are dropped even though they would match.
        assert!(session.offer(&raw_frame(0.0), t0).is_empty());
        assert!(session.offer(&raw_frame(0.0), t0).is_empty());
        assert!(!session.offer(&raw_frame(0.0), t0).is_empty());
    }

    #[test]
    fn test_mismatched_keypoint_count_is_ignored() {
        let mut session = Session::new(recorded_library(), SessionParams::default());
        let t0 = Instant::now();

        let odd: Vec<Landmark> = (0..5).map(|i| Landmark::new(i as f32, 0.0, 0.0)).collect();
        assert!(session.step(&odd, t0).is_empty());
        assert!(session.step(&[], t0).is_empty());
        assert!(session.pending().is_none());
    }
}
