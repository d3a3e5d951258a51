use super::*;

#[test]
fn test_default_config_is_valid() {
    let c = LayoutConfig::default();
    assert!(c.validate().is_ok());
    assert_eq!(c.direction, Direction::TB);
    assert_eq!(c.ranker, Ranker::Tight);
    assert_eq!(c.cycles, CyclePolicy::Reject);
    assert_eq!(c.origin, Origin::Center);
    assert!(c.seed.is_none());
}

#[test]
fn test_rejects_non_positive_separation() {
    for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
        let c = LayoutConfig {
            node_separation: bad,
            ..LayoutConfig::default()
        };
        match c.validate() {
            Err(LayoutError::InvalidParameter { name, .. }) => assert_eq!(name, "nodeSeparation"),
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }
    let c = LayoutConfig {
        rank_separation: 0.0,
        ..LayoutConfig::default()
    };
    assert!(matches!(
        c.validate(),
        Err(LayoutError::InvalidParameter { ref name, .. }) if name == "rankSeparation"
    ));
}

#[test]
fn test_rejects_zero_iterations() {
    let c = LayoutConfig {
        ordering_iterations: 0,
        ..LayoutConfig::default()
    };
    assert!(matches!(
        c.validate(),
        Err(LayoutError::InvalidParameter { ref name, .. }) if name == "orderingIterations"
    ));
    let c = LayoutConfig {
        alignment_iterations: 0,
        ..LayoutConfig::default()
    };
    assert!(c.validate().is_err());
}

#[test]
fn test_rejects_negative_margin() {
    let c = LayoutConfig {
        margin: -1.0,
        ..LayoutConfig::default()
    };
    assert!(c.validate().is_err());
}

#[test]
fn test_partial_json_uses_defaults() {
    let c: LayoutConfig =
        serde_json::from_str(r#"{"direction":"LR","nodeSeparation":20,"cycles":"reverse-edges"}"#)
            .unwrap();
    assert_eq!(c.direction, Direction::LR);
    assert_eq!(c.node_separation, 20.0);
    assert_eq!(c.cycles, CyclePolicy::ReverseEdges);
    assert_eq!(c.rank_separation, 50.0);
    assert_eq!(c.ordering_iterations, 4);
}

#[test]
fn test_enum_json_names() {
    let c: LayoutConfig =
        serde_json::from_str(r#"{"ranker":"longest-path","origin":"top-left","seed":7}"#).unwrap();
    assert_eq!(c.ranker, Ranker::LongestPath);
    assert_eq!(c.origin, Origin::TopLeft);
    assert_eq!(c.seed, Some(7));
}

#[test]
fn test_with_direction() {
    let c = LayoutConfig::default().with_direction(Direction::LR);
    assert_eq!(c.direction, Direction::LR);
}

#[test]
fn test_preserve_rank_gaps_json_name() {
    let c: LayoutConfig = serde_json::from_str(r#"{"preserveRankGaps":true}"#).unwrap();
    assert!(c.preserve_rank_gaps);
    assert!(!LayoutConfig::default().preserve_rank_gaps);
}
