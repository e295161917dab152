use std::cell::RefCell;
use std::rc::Rc;

use super::*;

#[derive(Default)]
struct Recorder {
    values: Vec<f64>,
    done: usize,
}

#[test]
fn linear_scalar_tween_reaches_end_value() {
    let mut anim = Animator::<Recorder>::new();
    let mut rec = Recorder::default();
    let handle = anim
        .animate_with_callback(
            0.0,
            100.0,
            |r: &mut Recorder, v: f64| r.values.push(v),
            1000.0,
            Ease::Linear,
            |r: &mut Recorder| r.done += 1,
        )
        .unwrap();

    anim.tick(0.0, &mut rec);
    anim.tick(500.0, &mut rec);
    assert_eq!(rec.values[0], 0.0);
    assert!((rec.values[1] - 50.0).abs() < 1e-9);
    assert!(handle.is_active());

    anim.tick(1000.0, &mut rec);
    anim.tick(1500.0, &mut rec);
    assert_eq!(rec.values.len(), 3);
    assert!((rec.values[2] - 100.0).abs() < 1e-9);
    assert_eq!(rec.done, 1);
    assert!(!handle.is_active());
    assert!(anim.is_idle());
}

#[test]
fn stop_freezes_setter_calls_and_skips_callback() {
    let mut anim = Animator::<Recorder>::new();
    let mut rec = Recorder::default();
    let handle = anim
        .animate_with_callback(
            0.0,
            100.0,
            |r: &mut Recorder, v: f64| r.values.push(v),
            1000.0,
            Ease::Linear,
            |r: &mut Recorder| r.done += 1,
        )
        .unwrap();

    anim.tick(100.0, &mut rec);
    anim.tick(200.0, &mut rec);
    handle.stop();
    anim.tick(300.0, &mut rec);
    anim.tick(5000.0, &mut rec);

    assert_eq!(rec.values.len(), 2);
    assert_eq!(rec.done, 0);
    assert_eq!(anim.active_count(), 0);
}

#[test]
fn vector_tween_interpolates_componentwise() {
    let mut anim = Animator::<Vec<[f64; 2]>>::new();
    let mut out = Vec::new();
    anim.animate(
        [0.0, 0.0],
        [100.0, 200.0],
        |o: &mut Vec<[f64; 2]>, v: [f64; 2]| o.push(v),
        400.0,
        Ease::EaseInOut,
    )
    .unwrap();

    anim.run_to_completion(&mut out, 16.0, 10_000.0);
    let last = out.last().copied().unwrap();
    assert!((last[0] - 100.0).abs() < 1e-9);
    assert!((last[1] - 200.0).abs() < 1e-9);
}

#[test]
fn mismatched_vec_lengths_are_rejected() {
    let mut anim = Animator::<()>::new();
    let err = anim
        .animate(vec![0.0, 1.0], vec![1.0], |_: &mut (), _: Vec<f64>| {}, 100.0, Ease::Linear)
        .unwrap_err();
    assert!(matches!(err, MenuError::Animation(_)));
    assert!(anim.is_idle());
}

#[test]
fn zero_duration_completes_on_first_tick() {
    let mut anim = Animator::<Recorder>::new();
    let mut rec = Recorder::default();
    anim.animate(3.0, 7.0, |r: &mut Recorder, v: f64| r.values.push(v), 0.0, Ease::Elastic)
        .unwrap();
    anim.tick(0.0, &mut rec);
    assert_eq!(rec.values, vec![7.0]);
    assert!(anim.is_idle());
}

#[test]
fn tweens_start_on_first_tick_after_scheduling() {
    let mut anim = Animator::<Recorder>::new();
    let mut rec = Recorder::default();
    anim.tick(1000.0, &mut rec);
    assert_eq!(anim.now(), 1000.0);

    // Long idle gap between the last tick and the next frame.
    let handle = anim
        .animate(0.0, 10.0, |r: &mut Recorder, v: f64| r.values.push(v), 100.0, Ease::Linear)
        .unwrap();
    anim.tick(31_000.0, &mut rec);
    assert_eq!(rec.values, vec![0.0]);
    assert!(handle.is_active());

    anim.tick(31_050.0, &mut rec);
    assert!((rec.values[1] - 5.0).abs() < 1e-9);
    assert!(handle.is_active());
}

#[test]
fn host_clock_far_from_zero_does_not_skip_tween() {
    let mut anim = Animator::<Recorder>::new();
    let mut rec = Recorder::default();
    let handle = anim
        .animate(0.0, 10.0, |r: &mut Recorder, v: f64| r.values.push(v), 100.0, Ease::Linear)
        .unwrap();

    anim.tick(123_456.0, &mut rec);
    assert_eq!(rec.values, vec![0.0]);
    assert!(handle.is_active());

    anim.tick(123_556.0, &mut rec);
    assert_eq!(rec.values[1], 10.0);
    assert!(!handle.is_active());
}

#[test]
fn clock_never_moves_backwards() {
    let mut anim = Animator::<Recorder>::new();
    let mut rec = Recorder::default();
    anim.animate(0.0, 10.0, |r: &mut Recorder, v: f64| r.values.push(v), 100.0, Ease::Linear)
        .unwrap();
    anim.tick(50.0, &mut rec);
    anim.tick(10.0, &mut rec);
    assert_eq!(anim.now(), 50.0);
    assert_eq!(rec.values[0], rec.values[1]);
}

#[test]
fn setter_may_stop_a_later_tween_in_the_same_tick() {
    let mut anim = Animator::<Recorder>::new();
    let mut rec = Recorder::default();
    let victim: Rc<RefCell<Option<AnimationHandle>>> = Rc::default();

    let slot = Rc::clone(&victim);
    anim.animate(
        0.0,
        1.0,
        move |_: &mut Recorder, _: f64| {
            if let Some(h) = slot.borrow().as_ref() {
                h.stop();
            }
        },
        100.0,
        Ease::Linear,
    )
    .unwrap();
    let second = anim
        .animate(0.0, 1.0, |r: &mut Recorder, v: f64| r.values.push(v), 100.0, Ease::Linear)
        .unwrap();
    *victim.borrow_mut() = Some(second.clone());

    anim.tick(10.0, &mut rec);
    assert!(rec.values.is_empty());
    assert!(!second.is_active());
}

#[test]
fn handles_get_distinct_ids() {
    let mut anim = Animator::<()>::new();
    let a = anim.animate(0.0, 1.0, |_: &mut (), _: f64| {}, 10.0, Ease::Linear).unwrap();
    let b = anim.animate(0.0, 1.0, |_: &mut (), _: f64| {}, 10.0, Ease::Linear).unwrap();
    assert_ne!(a.id(), b.id());
    assert_eq!(anim.active_count(), 2);
}
