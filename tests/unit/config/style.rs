use super::*;

#[test]
fn defaults_match_stamp_layout() {
    let s = StampStyle::default();
    assert_eq!(s.font.as_deref(), Some(Path::new("arial.ttf")));
    assert_eq!(s.font_size_px, 30.0);
    assert_eq!(s.bottom_margin_px, 30);
    assert_eq!(s.padding_px, 10);
    assert_eq!(s.backing_rgba, Rgba8::new(0, 0, 0, 150));
    assert_eq!(s.text_rgba, Rgba8::WHITE);
    assert_eq!(s.overflow, OverflowPolicy::Clip);
    s.validate().unwrap();
}

#[test]
fn partial_json_keeps_defaults() {
    let s = StampStyle::from_json_str(r#"{ "padding_px": 4, "overflow": "reject" }"#).unwrap();
    assert_eq!(s.padding_px, 4);
    assert_eq!(s.overflow, OverflowPolicy::Reject);
    assert_eq!(s.bottom_margin_px, 30);
}

#[test]
fn null_font_selects_builtin() {
    let s = StampStyle::from_json_str(r#"{ "font": null }"#).unwrap();
    assert_eq!(s, StampStyle::builtin());
}

#[test]
fn unknown_field_is_serde_error() {
    let err = StampStyle::from_json_str(r#"{ "colour": [1,2,3,4] }"#).unwrap_err();
    assert!(err.to_string().contains("serialization error:"));
}

#[test]
fn zero_size_is_validation_error() {
    let err = StampStyle::from_json_str(r#"{ "font_size_px": 0 }"#).unwrap_err();
    assert!(err.to_string().contains("validation error:"));
}

#[test]
fn missing_file_reports_path() {
    let err = StampStyle::from_json_file(Path::new("target/no-such-style.json")).unwrap_err();
    assert!(err.to_string().contains("no-such-style.json"));
}

#[test]
fn oversized_builtin_scale_is_validation_error() {
    let style = StampStyle {
        builtin_font_scale: 100_000_000,
        ..StampStyle::builtin()
    };
    assert!(style.validate().is_err());

    let err = StampStyle::from_json_str(r#"{ "builtin_font_scale": 65 }"#).unwrap_err();
    assert!(err.to_string().contains("builtin_font_scale"));
    StampStyle::from_json_str(r#"{ "builtin_font_scale": 64 }"#).unwrap();
}
