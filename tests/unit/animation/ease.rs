use super::*;

const ALL: [Ease; 3] = [Ease::Linear, Ease::EaseInOut, Ease::Elastic];

#[test]
fn endpoints_are_exact() {
    for ease in ALL {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
    }
}

#[test]
fn ease_in_out_is_symmetric_and_monotonic() {
    assert!((Ease::EaseInOut.apply(0.5) - 0.5).abs() < 0.01);
    let a = Ease::EaseInOut.apply(0.25);
    let b = Ease::EaseInOut.apply(0.5);
    let c = Ease::EaseInOut.apply(0.75);
    assert!(a < b && b < c);
    assert!(a < 0.25, "slow start expected, got {a}");
    assert!(c > 0.75, "slow end expected, got {c}");
}

#[test]
fn elastic_overshoots_early() {
    let peak = (1..100)
        .map(|i| Ease::Elastic.apply(f64::from(i) / 100.0))
        .fold(f64::MIN, f64::max);
    assert!(peak > 1.0);
}

#[test]
fn input_is_clamped() {
    assert_eq!(Ease::Linear.apply(1.5), 1.0);
    assert_eq!(Ease::Linear.apply(-0.5), 0.0);
}

#[test]
fn serde_names_are_snake_case() {
    assert_eq!(
        serde_json::to_string(&Ease::EaseInOut).unwrap(),
        "\"ease_in_out\""
    );
    let e: Ease = serde_json::from_str("\"elastic\"").unwrap();
    assert_eq!(e, Ease::Elastic);
}
