use super::*;

#[test]
fn defaults() {
    let opts = GameOpts::default();
    assert_eq!(opts.clear_rgba, None);
    assert_eq!(opts.max_delta_ms, 250.0);
    opts.validate().unwrap();
}

#[test]
fn partial_json_keeps_defaults() {
    let opts: GameOpts = serde_json::from_str(r#"{ "clear_rgba": [1, 2, 3, 255] }"#).unwrap();
    assert_eq!(opts.clear_rgba, Some([1, 2, 3, 255]));
    assert_eq!(opts.max_delta_ms, 250.0);
}

#[test]
fn overrides_accept_only_positive_numbers() {
    let with = |v: &'static str| {
        GameOpts::default().with_overrides_from(move |k| (k == MAX_DELTA_ENV).then(|| v.to_owned()))
    };
    assert_eq!(with("100").max_delta_ms, 100.0);
    assert_eq!(with(" 33.5 ").max_delta_ms, 33.5);
    assert_eq!(with("-1").max_delta_ms, 250.0);
    assert_eq!(with("fast").max_delta_ms, 250.0);
    assert_eq!(
        GameOpts::default().with_overrides_from(|_| None).max_delta_ms,
        250.0
    );
}

#[test]
fn validate_rejects_non_positive_clamp() {
    let opts = GameOpts {
        max_delta_ms: 0.0,
        ..GameOpts::default()
    };
    assert!(matches!(
        opts.validate(),
        Err(TableauError::InvalidParameter(_))
    ));
}
