//! Property tests for the validity predicates and the tick pipeline

use proptest::prelude::*;

use pulsewatch_core::config::{HistoryConfig, ValidityLimits};
use pulsewatch_core::monitor::{ConnectionTracker, HistoryBuffer, Verdict};
use pulsewatch_core::validate::{is_live_valid, is_stored_valid};
use pulsewatch_core::{Frame, Monitor, MonitorConfig, SensorStatus, StoredFrame};

fn any_status() -> impl Strategy<Value = SensorStatus> {
    (0u8..=5).prop_map(SensorStatus::from_raw)
}

fn any_frame() -> impl Strategy<Value = Frame> {
    (any::<u16>(), any::<u8>(), any::<u16>(), any_status())
        .prop_map(|(hr, cfd, o2, status)| Frame::new(hr, cfd, o2, status))
}

/// Frames close to what the hub produces, with the corrupt markers mixed in
fn hub_frame() -> impl Strategy<Value = Frame> {
    (
        prop_oneof![Just(0u16), 20u16..240, Just(u16::MAX)],
        prop_oneof![Just(0u8), 1u8..100, Just(u8::MAX)],
        prop_oneof![Just(0u16), 80u16..101],
        any_status(),
    )
        .prop_map(|(hr, cfd, o2, status)| Frame::new(hr, cfd, o2, status))
}

proptest! {
    #[test]
    fn corrupt_heart_rate_is_never_valid(cfd in any::<u8>(), o2 in any::<u16>(), status in any_status()) {
        let frame = Frame::new(u16::MAX, cfd, o2, status);
        prop_assert!(!is_live_valid(&frame));
        prop_assert!(!is_stored_valid(&frame.reduce(), &ValidityLimits::DEFAULT));
    }

    #[test]
    fn corrupt_confidence_is_never_valid(hr in any::<u16>(), o2 in any::<u16>(), status in any_status()) {
        let frame = Frame::new(hr, u8::MAX, o2, status);
        prop_assert!(!is_live_valid(&frame));
        prop_assert!(!is_stored_valid(&frame.reduce(), &ValidityLimits::DEFAULT));
    }

    #[test]
    fn silent_frame_without_finger_is_live_valid(raw in 0u8..=1) {
        let frame = Frame::new(0, 0, 0, SensorStatus::from_raw(raw));
        prop_assert!(is_live_valid(&frame));
    }

    #[test]
    fn stored_validity_is_two_of_three(hr in 0u16..300, cfd in 0u8..255, o2 in 0u16..255, status in 0u8..4) {
        let stored = StoredFrame { heart_rate: hr, confidence: cfd, oxygen: o2, status };
        let score = (30..=220).contains(&hr) as u8
            + (cfd >= 1) as u8
            + (1..=100).contains(&o2) as u8;
        prop_assert_eq!(is_stored_valid(&stored, &ValidityLimits::DEFAULT), score >= 2);
    }

    #[test]
    fn live_valid_frames_are_always_accepted(frame in any_frame()) {
        if is_live_valid(&frame) {
            prop_assert!(ConnectionTracker::decide(&frame, true).is_accepted());
        }
    }

    #[test]
    fn history_length_never_changes(
        capacity in 1usize..=64,
        frames in proptest::collection::vec(hub_frame(), 0..200),
    ) {
        let config = HistoryConfig { capacity, valid_frame_threshold: 3 };
        let mut history = HistoryBuffer::new(&config, ValidityLimits::DEFAULT);

        for frame in &frames {
            let write = history.record(frame);
            prop_assert!(write.index < capacity);
            prop_assert_eq!(history.entries().len(), capacity);
            prop_assert!(history.write_index() < capacity);
        }
    }

    #[test]
    fn restart_is_reported_at_most_once(frames in proptest::collection::vec(hub_frame(), 1..150)) {
        let mut monitor = Monitor::new(MonitorConfig::default(), 0);
        let mut restarts = 0;

        for (tick, frame) in frames.iter().enumerate() {
            let report = monitor.tick((tick as u32 + 1) * 1_000, *frame);
            if let Verdict::Restart(_) = report.verdict {
                restarts += 1;
            }
        }

        prop_assert!(restarts <= 1);
    }

    #[test]
    fn absent_finger_never_restarts(frames in proptest::collection::vec(hub_frame(), 1..150)) {
        let mut monitor = Monitor::new(MonitorConfig::default(), 0);

        for (tick, frame) in frames.iter().enumerate() {
            let absent = Frame { status: SensorStatus::NoObject, ..*frame };
            let report = monitor.tick((tick as u32 + 1) * 1_000, absent);
            prop_assert_eq!(report.verdict, Verdict::Continue);
            prop_assert_eq!(report.view.heart_rate, 0);
        }
    }
}
