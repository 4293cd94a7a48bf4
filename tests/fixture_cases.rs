use detpost::{PostProcessConfig, PostProcessor};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct Fixture {
    cases: Vec<Case>,
}

#[derive(Debug, Deserialize)]
struct Expected {
    class_name: String,
    confidence: f32,
}

#[derive(Debug, Deserialize)]
struct Case {
    name: String,
    num_channels: usize,
    num_elements: usize,
    labels: Vec<String>,
    tensor: Vec<f32>,
    #[serde(default)]
    confidence_threshold: Option<f32>,
    #[serde(default)]
    iou_threshold: Option<f32>,
    expected: Vec<Expected>,
}

fn load_fixture() -> Fixture {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/cases.json");
    let text = fs::read_to_string(&path).expect("Failed to read fixture");
    serde_json::from_str(&text).expect("Failed to parse fixture")
}

#[test]
fn fixture_cases_produce_expected_detections() {
    let fixture = load_fixture();
    assert!(!fixture.cases.is_empty());

    for case in fixture.cases {
        let defaults = PostProcessConfig::default();
        let cfg = PostProcessConfig {
            confidence_threshold: case
                .confidence_threshold
                .unwrap_or(defaults.confidence_threshold),
            iou_threshold: case.iou_threshold.unwrap_or(defaults.iou_threshold),
            ..defaults
        };
        let processor = PostProcessor::new(case.labels).with_config(cfg);
        let detections = processor
            .process(&case.tensor, case.num_channels, case.num_elements)
            .unwrap_or_else(|err| panic!("{}: {err}", case.name));

        assert_eq!(detections.len(), case.expected.len(), "{}", case.name);
        for (got, want) in detections.iter().zip(case.expected.iter()) {
            assert_eq!(got.class_name(), want.class_name, "{}", case.name);
            assert!(
                (got.confidence() - want.confidence).abs() < 1e-6,
                "{}: {} vs {}",
                case.name,
                got.confidence(),
                want.confidence
            );
        }
    }
}
