//! End-to-end tick scenarios with the default configuration

use pulsewatch_core::monitor::{MonitorEvent, Verdict};
use pulsewatch_core::{Frame, Monitor, MonitorConfig, MonitorPhase, RestartReason, SensorStatus};

const TICK_MS: u32 = 1_000;

fn finger(heart_rate: u16, confidence: u8, oxygen: u16) -> Frame {
    Frame::new(heart_rate, confidence, oxygen, SensorStatus::Finger)
}

/// Live-valid, stored score 3
const GOOD: Frame = Frame::new(72, 95, 98, SensorStatus::Finger);
/// Live-invalid, stored score 0
const DEAD: Frame = Frame::new(0, 0, 0, SensorStatus::Finger);
/// Live-invalid glitch, stored score 2
const GLITCH: Frame = Frame::new(70, 0, 98, SensorStatus::Finger);

#[test]
fn buffer_restart_fires_on_twentieth_bad_frame() {
    let mut monitor = Monitor::new(MonitorConfig::default(), 0);

    for tick in 1..20 {
        let report = monitor.tick(tick * TICK_MS, DEAD);
        assert_eq!(report.verdict, Verdict::Continue, "fired early at tick {}", tick);
    }

    let report = monitor.tick(20 * TICK_MS, DEAD);
    let reason = RestartReason::Buffer { frames: 20 };
    assert_eq!(report.verdict, Verdict::Restart(reason));
    assert!(report.events.contains(&MonitorEvent::Restart(reason)));

    // Exactly once
    for tick in 21..40 {
        assert_eq!(monitor.tick(tick * TICK_MS, DEAD).verdict, Verdict::Halted);
    }
}

#[test]
fn corrupt_frames_count_toward_buffer_restart() {
    let mut monitor = Monitor::new(MonitorConfig::default(), 0);
    let corrupt = finger(u16::MAX, 95, 98);

    let verdicts: Vec<Verdict> = (1..=20)
        .map(|tick| monitor.tick(tick * TICK_MS, corrupt).verdict)
        .collect();

    assert!(verdicts[..19].iter().all(|v| *v == Verdict::Continue));
    assert_eq!(
        verdicts[19],
        Verdict::Restart(RestartReason::Buffer { frames: 20 })
    );
}

#[test]
fn three_scattered_valid_frames_cancel_buffer_restart() {
    let mut monitor = Monitor::new(MonitorConfig::default(), 0);
    // Fast ticks keep the duration watchdog out of the way
    let mut tick = 0;
    let mut next = |monitor: &mut Monitor, frame: Frame| {
        tick += 1;
        monitor.tick(tick * 500, frame)
    };

    // Two plausible frames early, then bad data up to the wrap
    next(&mut monitor, GLITCH);
    for _ in 0..8 {
        next(&mut monitor, DEAD);
    }
    next(&mut monitor, GLITCH);
    for _ in 0..10 {
        assert_eq!(next(&mut monitor, DEAD).verdict, Verdict::Continue);
    }
    assert!(monitor.history().is_primed());
    assert_eq!(monitor.history().recovery_count(), 2);

    // Third one, not adjacent to the others
    let report = next(&mut monitor, GLITCH);
    assert!(report.events.contains(&MonitorEvent::Recovered { valid_frames: 3 }));
    assert!(!monitor.history().is_primed());
    assert_eq!(monitor.phase(), MonitorPhase::Armed);

    // The buffer has to fill again before it can fire
    for _ in 0..19 {
        assert_eq!(next(&mut monitor, DEAD).verdict, Verdict::Continue);
    }
    assert_eq!(
        next(&mut monitor, DEAD).verdict,
        Verdict::Restart(RestartReason::Buffer { frames: 20 })
    );
}

#[test]
fn duration_restart_after_thirty_invalid_seconds() {
    let mut monitor = Monitor::new(MonitorConfig::default(), 0);

    // Glitch frames keep recovering the buffer, so only the duration
    // watchdog can see the problem
    for tick in 1..=30 {
        let report = monitor.tick(tick * TICK_MS, GLITCH);
        assert_eq!(report.verdict, Verdict::Continue, "fired early at tick {}", tick);
    }

    let report = monitor.tick(31 * TICK_MS, GLITCH);
    assert_eq!(
        report.verdict,
        Verdict::Restart(RestartReason::Duration { invalid_ms: 30_000 })
    );
    assert_eq!(monitor.tick(32 * TICK_MS, GLITCH).verdict, Verdict::Halted);
}

#[test]
fn lifting_the_finger_restarts_the_duration_clock() {
    let mut monitor = Monitor::new(MonitorConfig::default(), 0);

    for tick in 1..=25 {
        monitor.tick(tick * TICK_MS, GLITCH);
    }
    // Silence leaves zeros on screen, so nothing freezes afterwards
    monitor.tick(26 * TICK_MS, Frame::silent());
    assert_eq!(monitor.supervisor().last_good_at(), 26 * TICK_MS);
    for tick in 27..=56 {
        let report = monitor.tick(tick * TICK_MS, GLITCH);
        assert_eq!(report.verdict, Verdict::Continue, "tick {}", tick);
    }
    assert!(matches!(
        monitor.tick(57 * TICK_MS, GLITCH).verdict,
        Verdict::Restart(RestartReason::Duration { .. })
    ));
}

#[test]
fn frozen_display_suppresses_both_watchdogs() {
    let mut monitor = Monitor::new(MonitorConfig::default(), 0);

    let report = monitor.tick(TICK_MS, GOOD);
    assert_eq!(report.view.heart_rate, 72);

    let mut held = 0;
    for tick in 2..=120 {
        let now = tick * TICK_MS;
        let report = monitor.tick(now, DEAD);
        assert_eq!(report.verdict, Verdict::Continue, "restart at tick {}", tick);

        held += report
            .events
            .iter()
            .filter(|e| matches!(e, MonitorEvent::FreezeHold(_)))
            .count();

        if monitor.is_frozen(now) {
            // Stale but real values stay on screen, marked as frozen
            assert_eq!(report.view.heart_rate, 72);
            assert!(report.view.show_freeze_marker);
            assert_eq!(monitor.supervisor().last_good_at(), now);
        }
    }

    assert!(monitor.connection().is_disconnected());
    assert!(monitor.history().is_exhausted());
    assert!(held > 0);
}

#[test]
fn frozen_display_with_zeros_does_not_suppress() {
    let mut monitor = Monitor::new(MonitorConfig::default(), 0);

    // Accepted finger-absent silence leaves zeros in the cache
    monitor.tick(TICK_MS, Frame::silent());

    let fired = (2..=40).find_map(|tick| match monitor.tick(tick * TICK_MS, DEAD).verdict {
        Verdict::Restart(reason) => Some((tick, reason)),
        _ => None,
    });

    assert_eq!(fired, Some((21, RestartReason::Buffer { frames: 20 })));
}

#[test]
fn first_rejection_disconnects_immediately() {
    let mut monitor = Monitor::new(MonitorConfig::default(), 0);

    let report = monitor.tick(TICK_MS, DEAD);
    assert!(monitor.connection().is_disconnected());
    assert!(report.view.show_freeze_marker);
    assert!(report.events.contains(&MonitorEvent::ConnectionLost));
}

#[test]
fn rejection_within_grace_keeps_connection() {
    let mut monitor = Monitor::new(MonitorConfig::default(), 0);
    monitor.tick(TICK_MS, GOOD);

    for tick in 2..=6 {
        let report = monitor.tick(tick * TICK_MS, DEAD);
        assert!(!report.view.show_freeze_marker, "tick {}", tick);
    }

    // 5001 ms after the last accepted frame
    let report = monitor.tick(6 * TICK_MS + 1, DEAD);
    assert!(report.view.show_freeze_marker);
    assert!(report.events.contains(&MonitorEvent::ConnectionLost));
}

#[test]
fn finger_removed_blanks_the_display() {
    let mut monitor = Monitor::new(MonitorConfig::default(), 0);
    monitor.tick(TICK_MS, GOOD);

    let report = monitor.tick(2 * TICK_MS, Frame::new(0, 0, 0, SensorStatus::Object));
    assert_eq!(report.view.heart_rate, 0);
    assert_eq!(report.view.confidence, 0);
    assert_eq!(report.view.status_message, "Searching");
    assert!(!report.view.show_heart_glyph);
}

#[test]
fn history_write_events_carry_the_entry() {
    let mut monitor = Monitor::new(MonitorConfig::default(), 0);
    monitor.tick(TICK_MS, GOOD);
    let report = monitor.tick(2 * TICK_MS, finger(80, 90, 97));

    assert!(report.events.contains(&MonitorEvent::HistoryWrite {
        index: 1,
        entry: finger(80, 90, 97).reduce(),
    }));
}
