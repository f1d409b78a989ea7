use super::*;

#[test]
fn fixed_step_is_deterministic_and_bounded() {
    let mut t = FixedStepTimer::new(16.0).unwrap().with_frame_limit(3);
    assert_eq!(t.now_ms(), 0.0);
    assert_eq!(t.next_frame(), Some(16.0));
    assert_eq!(t.next_frame(), Some(32.0));
    assert_eq!(t.next_frame(), Some(48.0));
    assert_eq!(t.now_ms(), 48.0);
    assert_eq!(t.next_frame(), None);
}

#[test]
fn fixed_step_from_fps() {
    let t = FixedStepTimer::from_fps(50.0).unwrap();
    assert_eq!(t.step_ms(), 20.0);
    assert!(FixedStepTimer::from_fps(0.0).is_err());
    assert!(FixedStepTimer::new(-1.0).is_err());
    assert!(FixedStepTimer::new(f64::INFINITY).is_err());
}

#[test]
fn interval_timer_produces_increasing_timestamps() {
    let mut t = IntervalTimer::new(1000.0).unwrap().with_frame_limit(3);
    let a = t.next_frame().unwrap();
    let b = t.next_frame().unwrap();
    let c = t.next_frame().unwrap();
    assert!(a >= 1.0);
    assert!(a <= b && b <= c);
    assert_eq!(t.next_frame(), None);
}

#[test]
fn interval_timer_rejects_bad_rates() {
    assert!(IntervalTimer::new(0.0).is_err());
    assert!(IntervalTimer::new(f64::NAN).is_err());
    assert_eq!(
        IntervalTimer::new(4.0).unwrap().interval(),
        Duration::from_millis(250)
    );
}
