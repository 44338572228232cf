//! Frame validity predicates
//!
//! Two predicates with deliberately different strictness:
//!
//! - [`is_live_valid`] judges the current tick's [`Frame`]. It accepts only
//!   coherent data with a finger present, or coherent silence without one.
//! - [`is_stored_valid`] judges a [`StoredFrame`] in history. It scores
//!   plausibility and accepts a frame that passes two of three checks, so
//!   recovery needs a plausible reading rather than a perfect one.

use crate::config::{ValidityLimits, MAX_OXYGEN};
use crate::frame::{Frame, StoredFrame};

/// Points a stored frame needs to count as valid
pub const STORED_PASS_SCORE: u8 = 2;

/// Strict validity of the current frame
pub fn is_live_valid(frame: &Frame) -> bool {
    if frame.is_corrupt() {
        return false;
    }

    if frame.finger_present() {
        frame.heart_rate > 0 && frame.confidence > 0 && frame.oxygen > 0
    } else {
        frame.heart_rate == 0 && frame.confidence == 0 && frame.oxygen == 0
    }
}

/// Plausibility score (0-3) of a stored frame
///
/// Returns `None` when the frame carries a corrupt marker on any channel.
pub fn stored_score(frame: &StoredFrame, limits: &ValidityLimits) -> Option<u8> {
    if frame.is_sentinel() {
        return None;
    }

    let heart_rate_ok =
        (limits.min_heart_rate..=limits.max_heart_rate).contains(&frame.heart_rate);
    let confidence_ok = frame.confidence >= limits.min_confidence;
    let oxygen_ok = (limits.min_oxygen..=MAX_OXYGEN).contains(&frame.oxygen);

    Some(heart_rate_ok as u8 + confidence_ok as u8 + oxygen_ok as u8)
}

/// Tolerant validity of a stored frame
pub fn is_stored_valid(frame: &StoredFrame, limits: &ValidityLimits) -> bool {
    matches!(stored_score(frame, limits), Some(score) if score >= STORED_PASS_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::SensorStatus;

    const LIMITS: ValidityLimits = ValidityLimits::DEFAULT;

    fn stored(heart_rate: u16, confidence: u8, oxygen: u16) -> StoredFrame {
        StoredFrame {
            heart_rate,
            confidence,
            oxygen,
            status: 3,
        }
    }

    #[test]
    fn test_live_valid_with_finger() {
        let frame = Frame::new(72, 95, 98, SensorStatus::Finger);
        assert!(is_live_valid(&frame));
    }

    #[test]
    fn test_live_valid_silence_without_finger() {
        assert!(is_live_valid(&Frame::silent()));
        assert!(is_live_valid(&Frame::new(0, 0, 0, SensorStatus::Object)));
    }

    #[test]
    fn test_live_invalid_partial_data() {
        // Finger present with a zero channel
        assert!(!is_live_valid(&Frame::new(0, 0, 97, SensorStatus::Finger)));
        assert!(!is_live_valid(&Frame::new(70, 90, 0, SensorStatus::NonFinger)));
        // Finger absent with leftover data
        assert!(!is_live_valid(&Frame::new(70, 0, 0, SensorStatus::NoObject)));
    }

    #[test]
    fn test_live_corrupt_always_invalid() {
        assert!(!is_live_valid(&Frame::new(u16::MAX, 90, 97, SensorStatus::Finger)));
        assert!(!is_live_valid(&Frame::new(0, u8::MAX, 0, SensorStatus::NoObject)));
    }

    #[test]
    fn test_stored_scoring() {
        assert_eq!(stored_score(&stored(72, 95, 98), &LIMITS), Some(3));
        assert_eq!(stored_score(&stored(0, 0, 98), &LIMITS), Some(1));
        assert_eq!(stored_score(&stored(250, 0, 0), &LIMITS), Some(0));
        assert_eq!(stored_score(&stored(72, 0, 98), &LIMITS), Some(2));
    }

    #[test]
    fn test_stored_range_edges() {
        assert!(is_stored_valid(&stored(30, 0, 100), &LIMITS));
        assert!(is_stored_valid(&stored(220, 1, 0), &LIMITS));
        assert!(!is_stored_valid(&stored(29, 0, 101), &LIMITS));
        assert!(!is_stored_valid(&stored(221, 0, 1), &LIMITS));
    }

    #[test]
    fn test_stored_sentinels_rejected() {
        assert!(!is_stored_valid(&StoredFrame::SENTINEL, &LIMITS));
        assert!(!is_stored_valid(&stored(72, 95, 255), &LIMITS));
        assert!(!is_stored_valid(&stored(u16::MAX, 95, 98), &LIMITS));
        assert!(!is_stored_valid(&stored(72, u8::MAX, 98), &LIMITS));
    }

    #[test]
    fn test_stored_is_looser_than_live() {
        // Live rejects the zero-confidence glitch, history still finds it plausible
        let frame = Frame::new(72, 0, 98, SensorStatus::Finger);
        assert!(!is_live_valid(&frame));
        assert!(is_stored_valid(&frame.reduce(), &LIMITS));
    }
}
