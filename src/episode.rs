//! Last Unplugged Period Extraction
//!
//! This module selects the most recent discharge/recharge cycle from a
//! battery charge history.
//!
//! ## The Problem
//! The charge log is append-only and can span weeks. Most of it is a flat
//! fully-charged plateau with occasional dips where the machine ran on
//! battery. Plotting or summarizing always wants just the latest dip,
//! wherever it sits inside the examined window, plus a little fully-charged
//! context on each side so the cycle boundaries are visible.
//!
//! ## Algorithm
//! A single backward pass from the newest sample, as a two-state machine:
//! 1. `SeekingActive`: skip the trailing fully-charged plateau. The first
//!    sample below the full threshold is the chronological end of the
//!    episode; keep it together with the recharge-complete context that
//!    follows it.
//! 2. `Collecting`: keep every sample until a fully-charged one appears
//!    again. That sample bounds the chronological start; keep up to
//!    `margin` context samples ending there and stop.
//! 3. Reverse the accumulator back to chronological order.
//!
//! Running out of input while collecting is a valid terminal state (the
//! episode reaches the start of the examined window). Never leaving
//! `SeekingActive` means the window holds no unplugged period and the
//! result is empty, which is not an error.

use crate::config::FilterConfig;

/// One observation from the charge log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Unix timestamp, seconds.
    pub timestamp: i64,
    /// Charge as a percentage of capacity.
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Sample { timestamp, value }
    }
}

/// Scan state for the backward pass.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ScanState {
    /// Still inside the trailing plateau, looking for the newest sample
    /// below the full threshold.
    SeekingActive,
    /// Inside the episode, collecting until the bounding full sample.
    Collecting,
}

/// Select the most recent unplugged period plus margin context.
///
/// `samples` must be in chronological order (timestamps non-decreasing,
/// duplicates allowed); ordering is not validated here. The result is a
/// contiguous chronological sub-sequence of the input: up to
/// `config.margin` fully-charged samples before the period, the period
/// itself, and the fully-charged context after it. The sample that ends
/// the period (the first one back at full charge) is always kept when it
/// exists; `margin` widens that trailing context.
///
/// A window with no sample below the threshold yields an empty result.
pub fn last_episode(samples: &[Sample], config: &FilterConfig) -> Vec<Sample> {
    let full_value = config.full_value();
    let mut collected: Vec<Sample> = Vec::new();
    let mut state = ScanState::SeekingActive;

    let mut i = samples.len();
    while i > 0 {
        i -= 1;
        let sample = samples[i];
        match state {
            ScanState::SeekingActive => {
                if sample.value < full_value {
                    state = ScanState::Collecting;
                    // Chronological end of the period. The bounding
                    // recharge-complete sample after it is kept even at
                    // margin 0; the context never exceeds `margin` samples.
                    let pad_end = i.saturating_add(config.margin.max(1)).min(samples.len() - 1);
                    for j in (i..=pad_end).rev() {
                        collected.push(samples[j]);
                    }
                }
            }
            ScanState::Collecting => {
                if sample.value >= full_value {
                    // Chronological start of the period. Context is
                    // positional: up to `margin` samples ending at this
                    // one, clipped at the front of the window.
                    let pad_start = (i + 1).saturating_sub(config.margin);
                    for j in (pad_start..=i).rev() {
                        collected.push(samples[j]);
                    }
                    break;
                }
                collected.push(sample);
            }
        }
    }

    collected.reverse();
    collected
}

// ============================================================================
// TESTS
// ============================================================================
