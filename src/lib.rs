//! Sequential multi-stage hand gesture matching
//!
//! Landmark frames come from an external pose estimator. A gesture is
//! recognized by walking its four stored keyframes (start, mid1, mid2,
//! end) in order under a DTW similarity threshold, with per-stage
//! timeouts and a post-detection cooldown per session. Detections drive
//! bound actions or a running word transcript.

pub mod actions;
pub mod config;
pub mod feed;
pub mod landmarks;
pub mod library;
pub mod matcher;
pub mod pipeline;
pub mod session;
pub mod sink;
