use super::*;

use std::cell::Cell;
use swipedeck_core::Runtime;

const FRAME_NANOS: u64 = 16_666_667; // ~60 FPS

fn run_frames(runtime: &Runtime, frames: usize, frame_time: &mut u64) {
    let handle = runtime.handle();
    for _ in 0..frames {
        if !handle.has_frame_callbacks() {
            break;
        }
        *frame_time += FRAME_NANOS;
        handle.drain_frame_callbacks(*frame_time);
    }
}

#[test]
fn tween_interpolates_over_time_and_completes_once() {
    let runtime = Runtime::default();
    let animatable = Animatable::new(0.0f32, runtime.handle());
    let completions = Rc::new(Cell::new(0));

    {
        let completions = Rc::clone(&completions);
        animatable.animate_to(
            1.0,
            AnimationType::Tween(AnimationSpec::linear(250)),
            move || completions.set(completions.get() + 1),
        );
    }
    assert_eq!(animatable.value(), 0.0);
    assert!(animatable.is_running());

    let mut frame_time = 0u64;
    let mut saw_midpoint = false;
    for _ in 0..32 {
        if !animatable.is_running() {
            break;
        }
        frame_time += FRAME_NANOS;
        runtime.handle().drain_frame_callbacks(frame_time);
        let value = animatable.value();
        if value > 0.0 && value < 1.0 {
            saw_midpoint = true;
            assert_eq!(completions.get(), 0, "completion must wait for the target");
        }
    }

    assert!(saw_midpoint, "animation should report intermediate values");
    assert_eq!(animatable.value(), 1.0);
    assert_eq!(completions.get(), 1);
    assert!(!animatable.is_running());

    run_frames(&runtime, 4, &mut frame_time);
    assert_eq!(completions.get(), 1);
}

#[test]
fn tween_duration_is_respected() {
    let runtime = Runtime::default();
    let animatable = Animatable::new(0.0f32, runtime.handle());
    let done_at = Rc::new(Cell::new(None::<u64>));
    {
        let done_at = Rc::clone(&done_at);
        let handle = runtime.handle();
        animatable.animate_to(
            10.0,
            AnimationType::Tween(AnimationSpec::linear(250)),
            move || done_at.set(handle.last_frame_nanos()),
        );
    }

    // First frame pins the start time.
    runtime.handle().drain_frame_callbacks(1_000_000_000);
    runtime.handle().drain_frame_callbacks(1_125_000_000);
    assert!((animatable.value() - 5.0).abs() < 1e-3);
    assert!(done_at.get().is_none());

    runtime.handle().drain_frame_callbacks(1_250_000_000);
    assert_eq!(done_at.get(), Some(1_250_000_000));
    assert_eq!(animatable.value(), 10.0);
}

#[test]
fn delayed_tween_holds_start_value() {
    let runtime = Runtime::default();
    let animatable = Animatable::new(0.0f32, runtime.handle());
    animatable.animate_to(
        1.0,
        AnimationType::Tween(AnimationSpec::linear(100).with_delay(100)),
        || {},
    );

    runtime.handle().drain_frame_callbacks(0);
    runtime.handle().drain_frame_callbacks(50_000_000);
    assert_eq!(animatable.value(), 0.0);
    runtime.handle().drain_frame_callbacks(150_000_000);
    assert!((animatable.value() - 0.5).abs() < 1e-3);
}

#[test]
fn spring_settles_on_target_and_completes() {
    let runtime = Runtime::default();
    let animatable = Animatable::new(Point::new(80.0, -40.0), runtime.handle());
    let done = Rc::new(Cell::new(false));
    {
        let done = Rc::clone(&done);
        animatable.animate_to(
            Point::ZERO,
            AnimationType::Spring(SpringSpec::default()),
            move || done.set(true),
        );
    }

    let mut frame_time = 0u64;
    let mut previous_distance = f32::MAX;
    for _ in 0..240 {
        if done.get() {
            break;
        }
        frame_time += FRAME_NANOS;
        runtime.handle().drain_frame_callbacks(frame_time);
        let distance = animatable.value().distance_to(Point::ZERO);
        assert!(
            distance <= previous_distance + 1e-3,
            "critically damped spring should not move away from its target"
        );
        previous_distance = distance;
    }

    assert!(done.get(), "spring should settle within four seconds");
    assert_eq!(animatable.value(), Point::ZERO);
    assert!(!animatable.is_running());
}

#[test]
fn spring_moves_along_the_straight_line() {
    let runtime = Runtime::default();
    let animatable = Animatable::new(Point::new(100.0, 50.0), runtime.handle());
    animatable.animate_to(
        Point::ZERO,
        AnimationType::Spring(SpringSpec::default()),
        || {},
    );

    let mut frame_time = 0u64;
    run_frames(&runtime, 6, &mut frame_time);
    let value = animatable.value();
    assert!(value.x > 0.0 && value.x < 100.0);
    assert!((value.y - value.x / 2.0).abs() < 1e-2);
}

#[test]
fn new_animation_drops_previous_completion() {
    let runtime = Runtime::default();
    let animatable = Animatable::new(0.0f32, runtime.handle());
    let first = Rc::new(Cell::new(false));
    let second = Rc::new(Cell::new(false));

    {
        let first = Rc::clone(&first);
        animatable.animate_to(
            1.0,
            AnimationType::Tween(AnimationSpec::linear(100)),
            move || first.set(true),
        );
    }
    let mut frame_time = 0u64;
    run_frames(&runtime, 2, &mut frame_time);
    {
        let second = Rc::clone(&second);
        animatable.animate_to(
            -1.0,
            AnimationType::Tween(AnimationSpec::linear(100)),
            move || second.set(true),
        );
    }
    run_frames(&runtime, 20, &mut frame_time);

    assert!(!first.get());
    assert!(second.get());
    assert_eq!(animatable.value(), -1.0);
}

#[test]
fn snap_to_cancels_running_animation() {
    let runtime = Runtime::default();
    let animatable = Animatable::new(0.0f32, runtime.handle());
    let done = Rc::new(Cell::new(false));
    {
        let done = Rc::clone(&done);
        animatable.animate_to(
            1.0,
            AnimationType::Tween(AnimationSpec::linear(100)),
            move || done.set(true),
        );
    }
    animatable.snap_to(0.25);

    assert!(!animatable.is_running());
    assert!(!runtime.handle().has_frame_callbacks());
    assert!(runtime.handle().needs_frame());
    let mut frame_time = 0u64;
    run_frames(&runtime, 10, &mut frame_time);
    assert!(!done.get());
    assert_eq!(animatable.value(), 0.25);
    assert_eq!(animatable.target(), 0.25);
}

#[test]
fn stop_freezes_current_value() {
    let runtime = Runtime::default();
    let animatable = Animatable::new(0.0f32, runtime.handle());
    animatable.animate_to(1.0, AnimationType::Tween(AnimationSpec::linear(100)), || {});
    let mut frame_time = 0u64;
    run_frames(&runtime, 3, &mut frame_time);
    let frozen = animatable.value();

    assert!(animatable.stop());
    assert!(!animatable.stop());
    assert_eq!(animatable.target(), frozen);
}

#[test]
fn completion_may_restart_the_animatable() {
    let runtime = Runtime::default();
    let animatable = Animatable::new(0.0f32, runtime.handle());
    {
        let chained = animatable.clone();
        animatable.animate_to(
            1.0,
            AnimationType::Tween(AnimationSpec::linear(32)),
            move || chained.snap_to(0.0),
        );
    }
    let mut frame_time = 0u64;
    run_frames(&runtime, 10, &mut frame_time);
    assert_eq!(animatable.value(), 0.0);
}

#[test]
fn easing_linear_is_identity() {
    assert_eq!(Easing::LinearEasing.transform(0.0), 0.0);
    assert_eq!(Easing::LinearEasing.transform(0.5), 0.5);
    assert_eq!(Easing::LinearEasing.transform(1.0), 1.0);
}

#[test]
fn easing_bounds_are_correct() {
    let easings = [
        Easing::LinearEasing,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::FastOutSlowInEasing,
    ];

    for easing in easings {
        let start = easing.transform(0.0);
        let end = easing.transform(1.0);
        assert!((start - 0.0).abs() < 0.01, "Start should be ~0 for {:?}", easing);
        assert!((end - 1.0).abs() < 0.01, "End should be ~1 for {:?}", easing);
    }
}

#[test]
fn animation_spec_default_has_reasonable_values() {
    let spec = AnimationSpec::default();
    assert_eq!(spec.duration_millis, 300);
    assert_eq!(spec.easing, Easing::FastOutSlowInEasing);
    assert_eq!(spec.delay_millis, 0);
}

#[test]
fn spring_spec_presets() {
    assert_eq!(SpringSpec::default().damping_ratio, 1.0);
    assert!(SpringSpec::bouncy().damping_ratio < 1.0);
    assert!(SpringSpec::stiff().stiffness > SpringSpec::default().stiffness);
}

#[test]
fn point_spring_progress_projects_onto_path() {
    let start = Point::new(100.0, 0.0);
    let target = Point::ZERO;
    let halfway = Point::new(50.0, 10.0);
    assert!((Point::spring_progress(&start, &target, &halfway) - 0.5).abs() < 1e-6);
    assert_eq!(Point::spring_progress(&target, &target, &halfway), 1.0);
}
