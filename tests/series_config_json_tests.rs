use series_geometry::api::{
    CardinalConfig, SERIES_CONFIG_JSON_SCHEMA_V1, SeriesConfig, SeriesConfigJsonContractV1,
};
use series_geometry::core::{DateUnit, DrawKind, GroupTo, GroupToMode, SplineKind, StackingMode};
use series_geometry::ChartError;

#[test]
fn contract_envelope_carries_schema_version() {
    let config = SeriesConfig::new(DrawKind::Spline(SplineKind::Cardinal))
        .with_cardinal(CardinalConfig {
            date_unit: Some(DateUnit::Months),
        })
        .with_stacking(StackingMode::Normal)
        .with_group_name("sales");
    let json = config.to_json_contract_v1_pretty().expect("serialize");

    let envelope: SeriesConfigJsonContractV1 = serde_json::from_str(&json).expect("envelope");
    assert_eq!(envelope.schema_version, SERIES_CONFIG_JSON_SCHEMA_V1);
    assert_eq!(envelope.config, config);
}

#[test]
fn bare_config_fills_missing_sections_with_defaults() {
    let json = r#"{
        "draw_kind": "Doughnut",
        "circular": {
            "layout": { "start_angle": -90.0, "group_to": { "threshold": 3.0, "mode": "Percentage" } },
            "explode_all": true
        }
    }"#;
    let config = SeriesConfig::from_json_compat_str(json).expect("parse");

    assert_eq!(config.draw_kind, DrawKind::Doughnut);
    assert!(config.visible);
    assert_eq!(config.circular.layout.start_angle, -90.0);
    assert_eq!(config.circular.layout.end_angle, 360.0);
    assert_eq!(
        config.circular.layout.group_to,
        Some(GroupTo {
            threshold: 3.0,
            mode: GroupToMode::Percentage,
        })
    );
    assert!(config.circular.explode_all);
    assert_eq!(config.circular.outer_ratio, 0.8);
    assert_eq!(config.polar.start_angle, -90.0);
}

#[test]
fn malformed_payload_is_rejected() {
    assert!(matches!(
        SeriesConfig::from_json_compat_str("{\"stacking\": \"Normal\"}"),
        Err(ChartError::InvalidConfig(_))
    ));
    assert!(matches!(
        SeriesConfig::from_json_compat_str("not json"),
        Err(ChartError::InvalidConfig(_))
    ));
}

#[test]
fn plain_json_round_trips_through_compat_reader() {
    let config = SeriesConfig::new(DrawKind::Column).with_visible(false);
    let json = config.to_json_pretty().expect("serialize");
    assert_eq!(SeriesConfig::from_json_compat_str(&json).expect("parse"), config);
}
