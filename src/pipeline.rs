use crate::landmarks::{HAND_LANDMARK_COUNT, Landmark};
use crate::session::{Session, SessionEvent};
use crate::sink::DetectionSink;
use flume::Receiver;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Drive one session from a frame channel until shutdown or feed EOF.
///
/// Runs on the caller's thread. Detections go to the sink; stage progress
/// and timeouts are reported on stderr so stdout stays free for output.
pub fn run_session(
    rx: Receiver<Vec<Landmark>>,
    mut session: Session,
    mut sink: Box<dyn DetectionSink>,
    running: Arc<AtomicBool>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    while running.load(Ordering::SeqCst) {
        match rx.recv_timeout(std::time::Duration::from_millis(100)) {
            Ok(frame) => handle_frame(&mut session, &frame, sink.as_mut(), verbose),
            Err(flume::RecvTimeoutError::Timeout) => continue,
            Err(flume::RecvTimeoutError::Disconnected) => break,
        }
    }

    // Drain remaining
    for frame in rx.drain() {
        handle_frame(&mut session, &frame, sink.as_mut(), verbose);
    }

    Ok(())
}

fn handle_frame(
    session: &mut Session,
    frame: &[Landmark],
    sink: &mut dyn DetectionSink,
    verbose: bool,
) {
    if verbose && frame.len() < HAND_LANDMARK_COUNT {
        eprintln!("Skipping incomplete frame ({} landmarks)", frame.len());
    }

    for event in session.offer(frame, Instant::now()) {
        match event {
            SessionEvent::StageMatched { gesture, stage } => {
                eprintln!("🟢 '{}' keyframe matched for '{}'", stage, gesture);
            }
            SessionEvent::StageTimedOut { gesture } => {
                eprintln!("⏰ Stage timed out for '{}'. Resetting sequence.", gesture);
            }
            SessionEvent::Detected {
                gesture,
                transcript,
            } => {
                eprintln!("✅ Detected sign: {}", gesture);
                sink.on_detection(&gesture, &transcript);
            }
        }
    }
}
