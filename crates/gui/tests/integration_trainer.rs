//! Integration tests for the aim trainer, driven through TrainerHarness.

use std::time::Duration;

use glam::Vec3;
use proptest::prelude::*;
use scene_demos_lib::harness::TrainerHarness;
use scene_demos_lib::trainer::{ClickOutcome, Highlight, START_LABEL};
use shared::TrainerConfig;

#[test]
fn test_ten_hits_report_elapsed() {
    let mut h = TrainerHarness::new(42);

    for i in 0..10 {
        let outcome = h.hit();
        if i < 9 {
            assert_eq!(outcome, ClickOutcome::Hit { trial: i + 1 });
            assert_eq!(h.trial_index(), i + 1);
        }
        h.advance_ms(100);
    }

    assert_eq!(h.trial_index(), 0);
    assert!(h.label().contains("900"), "label was {:?}", h.label());
    assert_eq!(h.state().result_text, "Result\n900 ms");
}

#[test]
fn test_pointer_on_target_center_hits() {
    let mut h = TrainerHarness::new(7);
    for _ in 0..25 {
        h.aim_at_target();
        assert!(h.tick(), "centered pointer missed target at {:?}", h.target().position);
        assert_eq!(h.target().highlight, Highlight::Hovered);
        h.click();
    }
}

#[test]
fn test_miss_changes_nothing() {
    let mut h = TrainerHarness::new(3);
    h.hit();
    h.hit();
    let before = h.target().clone();
    let start = h.state().start;

    h.advance_ms(300);
    assert_eq!(h.miss(), ClickOutcome::Missed);

    assert_eq!(h.trial_index(), 2);
    assert_eq!(h.target().position, before.position);
    assert_eq!(h.target().scale, before.scale);
    assert_eq!(h.target().label, before.label);
    assert_eq!(h.target().highlight, Highlight::Idle);
    assert_eq!(h.state().start, start);
}

#[test]
fn test_click_before_first_frame_is_ignored() {
    let mut h = TrainerHarness::new(5);
    h.aim_at_target();
    // No frame tick yet: nothing is known to be under the pointer
    assert_eq!(h.click(), ClickOutcome::Missed);
    assert_eq!(h.label(), START_LABEL);
}

#[test]
fn test_index_cycles_over_several_sessions() {
    let mut h = TrainerHarness::new(11);
    let mut indices = Vec::new();
    for _ in 0..30 {
        h.hit();
        indices.push(h.trial_index());
        h.advance_ms(20);
    }

    let expected: Vec<u32> = (0..30).map(|i| (i + 1) % 10).collect();
    assert_eq!(indices, expected);
    assert_eq!(h.state().completed_cycles, 3);
    assert_eq!(h.state().best, Some(Duration::from_millis(180)));
}

#[test]
fn test_start_set_once_per_cycle() {
    let mut h = TrainerHarness::new(13);
    h.advance_ms(50);
    h.hit();
    let start = h.state().start;
    assert!(start.is_some());

    for _ in 0..8 {
        h.advance_ms(75);
        h.hit();
        assert_eq!(h.state().start, start);
    }
}

#[test]
fn test_elapsed_measured_from_first_hit() {
    let mut h = TrainerHarness::new(17);
    // Idle time before the first hit is not counted
    h.advance_ms(5_000);
    let mut last = ClickOutcome::Missed;
    for _ in 0..10 {
        last = h.hit();
        h.advance_ms(33);
    }
    assert_eq!(
        last,
        ClickOutcome::Completed {
            elapsed: Duration::from_millis(297)
        }
    );
}

#[test]
fn test_shorter_session_config() {
    let cfg = TrainerConfig {
        trials_per_session: 3,
        ..Default::default()
    };
    let mut h = TrainerHarness::with_config(cfg, 19).unwrap();
    h.hit();
    h.advance_ms(250);
    h.hit();
    h.advance_ms(250);
    assert!(matches!(h.hit(), ClickOutcome::Completed { elapsed } if elapsed == Duration::from_millis(500)));
    assert_eq!(h.trial_index(), 0);
}

#[test]
fn test_resize_changes_spawn_radius() {
    let mut h = TrainerHarness::new(23);
    h.resize(1000.0, 500.0).unwrap();
    assert!((h.session.spawn_radius() - 8.0).abs() < 1e-5);
    assert!(h.resize(0.0, 500.0).is_err());
    assert!((h.session.spawn_radius() - 8.0).abs() < 1e-5);
}

#[test]
fn test_pointer_near_rim() {
    let mut h = TrainerHarness::new(29);
    let target = h.target().clone();
    let radius = h.session.config().target_radius * target.scale;
    let aspect = h.session.aspect();

    let outside = h
        .camera()
        .project_ndc(target.position + Vec3::X * radius * 1.2, aspect)
        .unwrap();
    h.point_at(outside);
    assert!(!h.tick());
    assert_eq!(h.click(), ClickOutcome::Missed);

    let inside = h
        .camera()
        .project_ndc(target.position + Vec3::X * radius * 0.8, aspect)
        .unwrap();
    h.point_at(inside);
    assert!(h.tick());
    assert_eq!(h.click(), ClickOutcome::Hit { trial: 1 });
}

#[test]
fn test_result_excludes_time_after_last_hit() {
    let mut h = TrainerHarness::new(31);
    let before = h.elapsed();
    for _ in 0..10 {
        h.hit();
        h.advance_ms(40);
    }
    assert_eq!(h.elapsed() - before, Duration::from_millis(400));
    assert_eq!(h.state().result_text, "Result\n360 ms");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_relocation_within_bounds(seed in any::<u64>(), width in 200.0f32..3000.0, height in 200.0f32..2000.0) {
        let mut h = TrainerHarness::new(seed);
        h.resize(width, height).unwrap();
        let bound = h.session.spawn_radius();

        for _ in 0..12 {
            h.hit();
            let t = h.target();
            prop_assert!(t.position.truncate().length() <= bound * 1.0001);
            prop_assert_eq!(t.position.z, 0.0);
            prop_assert!((0.5..=1.5).contains(&t.scale));
        }
    }

    #[test]
    fn prop_index_counts_valid_hits_only(seed in any::<u64>(), clicks in prop::collection::vec(any::<bool>(), 1..60)) {
        let mut h = TrainerHarness::new(seed);
        let mut hits = 0u32;
        for on_target in clicks {
            if on_target {
                h.hit();
                hits += 1;
            } else {
                h.miss();
            }
            prop_assert_eq!(h.trial_index(), hits % 10);
        }
        prop_assert_eq!(h.state().completed_cycles, hits / 10);
    }
}
