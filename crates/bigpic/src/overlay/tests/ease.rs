use crate::overlay::ease::Easing;

const ALL: [Easing; 5] = [
    Easing::Linear,
    Easing::Ease,
    Easing::EaseIn,
    Easing::EaseOut,
    Easing::EaseInOut,
];

#[test]
fn fixed_endpoints() {
    for easing in ALL {
        assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
        assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
    }
}

#[test]
fn monotone_on_unit_interval() {
    for easing in ALL {
        let mut prev = 0.0;
        for step in 1..=100 {
            let value = easing.apply(step as f32 / 100.0);
            assert!(value >= prev, "{easing:?} decreased at step {step}");
            prev = value;
        }
    }
}

#[test]
fn input_is_clamped() {
    for easing in ALL {
        assert_eq!(easing.apply(-0.5), 0.0, "{easing:?}");
        assert_eq!(easing.apply(1.5), 1.0, "{easing:?}");
    }
}

#[test]
fn unknown_names_default_to_ease() {
    assert_eq!(Easing::from_name("bounce"), Easing::Ease);
    assert_eq!(Easing::from_name("ease-in-out"), Easing::EaseInOut);
    assert_eq!(Easing::from_name("linear"), Easing::Linear);
}
