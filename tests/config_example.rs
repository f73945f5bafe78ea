use histmatch::{
    BoundingBox, HistMatchError, HistogramConfig, OverlayStyle, Pixel, MAX_BINS_PER_CHANNEL,
};
use serde::Deserialize;
use serde_json::Value;

const EXAMPLE_JSON: &str = include_str!("../histmatch-cli/config.example.json");
const SCHEMA_JSON: &str = include_str!("../histmatch-cli/config.schema.json");

#[derive(Debug, Deserialize)]
struct BoxJson {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

#[derive(Debug, Deserialize)]
struct TemplateJson {
    image_path: String,
    bbox: BoxJson,
}

#[derive(Debug, Deserialize)]
struct HistogramJson {
    bins_per_channel: usize,
}

#[derive(Debug, Deserialize)]
struct OverlayJson {
    color: [u8; 3],
}

#[derive(Debug, Deserialize)]
struct ExampleConfig {
    templates: Vec<TemplateJson>,
    query_path: String,
    output_path: String,
    report_path: Option<String>,
    histogram: HistogramJson,
    overlay: OverlayJson,
}

#[test]
fn example_config_builds_library_types() {
    let cfg: ExampleConfig = serde_json::from_str(EXAMPLE_JSON).unwrap();
    assert_eq!(cfg.templates.len(), 1);
    assert_eq!(cfg.templates[0].image_path, "example.ppm");
    assert_eq!(cfg.query_path, "test.ppm");
    assert_eq!(cfg.output_path, "result.ppm");
    assert!(cfg.report_path.is_none());

    let b = &cfg.templates[0].bbox;
    let bbox = BoundingBox::new(b.x, b.y, b.width, b.height).unwrap();
    assert_eq!((bbox.right(), bbox.bottom()), (160, 120));

    let hist = HistogramConfig::new(cfg.histogram.bins_per_channel).unwrap();
    assert_eq!(hist, HistogramConfig::default());

    let [r, g, b] = cfg.overlay.color;
    assert_eq!(Pixel::new(r, g, b), OverlayStyle::default().color);
}

#[test]
fn schema_bin_choices_match_validation() {
    let schema: Value = serde_json::from_str(SCHEMA_JSON).unwrap();
    let choices: Vec<usize> = schema["properties"]["histogram"]["properties"]["bins_per_channel"]
        ["enum"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_u64().unwrap() as usize)
        .collect();
    assert_eq!(choices.last(), Some(&MAX_BINS_PER_CHANNEL));
    for bins in &choices {
        assert!(HistogramConfig::new(*bins).is_ok(), "schema allows {bins}");
    }
    let above = MAX_BINS_PER_CHANNEL * 2;
    assert_eq!(
        HistogramConfig::new(above).unwrap_err(),
        HistMatchError::InvalidBinCount { bins: above }
    );
}
