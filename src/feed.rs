//! Landmark frame input
//!
//! The pose estimator lives in another process and pipes frames in over
//! stdin, one JSON document per line. A line is either a bare array of
//! [x, y, z] triples or an object with a "landmarks" field holding the
//! same. Bad lines are skipped with a warning.

use crate::landmarks::Landmark;
use flume::Sender;
use serde::Deserialize;
use std::io::{self, BufRead};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Deserialize)]
struct FramePayload {
    landmarks: Vec<[f32; 3]>,
}

/// Parse one feed line into a landmark frame
pub fn parse_frame(line: &str) -> Option<Vec<Landmark>> {
    let coords: Vec<[f32; 3]> = match serde_json::from_str::<FramePayload>(line) {
        Ok(payload) => payload.landmarks,
        Err(_) => serde_json::from_str(line).ok()?,
    };
    Some(coords.into_iter().map(Landmark::from).collect())
}

/// Read frames from stdin until EOF or shutdown, pushing them to `tx`
pub fn run_stdin_feed(tx: Sender<Vec<Landmark>>, running: Arc<AtomicBool>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !running.load(Ordering::SeqCst) {
            break;
        }
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Frame feed read error: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match parse_frame(&line) {
            Some(frame) => {
                if tx.send(frame).is_err() {
                    break;
                }
            }
            None => eprintln!("Skipping malformed frame line"),
        }
    }
}
