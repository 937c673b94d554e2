//! Detection delivery
//!
//! A sink receives every completed detection together with the session
//! transcript. Run mode dispatches the bound action; transcribe mode
//! pushes the transcript as one JSON array per detection.

use crate::actions::ActionRegistry;

/// Receives completed detections
pub trait DetectionSink {
    fn on_detection(&mut self, gesture: &str, transcript: &[String]);
}

/// Runs the bound action for each detection
pub struct ActionDispatchSink {
    registry: ActionRegistry,
}

impl ActionDispatchSink {
    pub fn new(registry: ActionRegistry) -> Self {
        Self { registry }
    }
}

impl DetectionSink for ActionDispatchSink {
    fn on_detection(&mut self, gesture: &str, _transcript: &[String]) {
        self.registry.dispatch(gesture);
    }
}

/// Serializes the transcript after every detection and hands it to a channel
pub struct TranscriptSink {
    tx: flume::Sender<String>,
}

impl TranscriptSink {
    pub fn new(tx: flume::Sender<String>) -> Self {
        Self { tx }
    }
}

impl DetectionSink for TranscriptSink {
    fn on_detection(&mut self, _gesture: &str, transcript: &[String]) {
        match serde_json::to_string(transcript) {
            Ok(json) => {
                let _ = self.tx.send(json);
            }
            Err(e) => eprintln!("Transcript serialization failed: {}", e),
        }
    }
}
