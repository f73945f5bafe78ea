use clap::Parser;
use histmatch::io::{encode_for_path, load_rgb_image};
use histmatch::{
    encode_p3, load_ppm, BoundingBox, HistMatchResult, HistogramConfig, Localization, MatchConfig,
    OverlayStyle, Pipeline, Pixel, RgbImage, StagedFile, TemplateScope, TemplateStore,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "HistMatch CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
struct BoxJson {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

impl From<BoundingBox> for BoxJson {
    fn from(value: BoundingBox) -> Self {
        Self {
            x: value.x,
            y: value.y,
            width: value.width,
            height: value.height,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TemplateJson {
    image_path: String,
    bbox: BoxJson,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ScopeConfig {
    #[default]
    FullImage,
    BoxRegion,
}

impl From<ScopeConfig> for TemplateScope {
    fn from(value: ScopeConfig) -> Self {
        match value {
            ScopeConfig::FullImage => TemplateScope::FullImage,
            ScopeConfig::BoxRegion => TemplateScope::BoxRegion,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct HistogramConfigJson {
    bins_per_channel: usize,
}

impl Default for HistogramConfigJson {
    fn default() -> Self {
        Self {
            bins_per_channel: HistogramConfig::default().bins_per_channel,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MatchConfigJson {
    parallel: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct OverlayConfigJson {
    color: [u8; 3],
}

impl Default for OverlayConfigJson {
    fn default() -> Self {
        let color = OverlayStyle::default().color;
        Self {
            color: [color.r, color.g, color.b],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    templates: Vec<TemplateJson>,
    query_path: String,
    output_path: String,
    report_path: Option<String>,
    template_scope: ScopeConfig,
    histogram: HistogramConfigJson,
    #[serde(rename = "match")]
    match_cfg: MatchConfigJson,
    overlay: OverlayConfigJson,
}

#[derive(Debug, Serialize)]
struct Report {
    template_index: usize,
    distance: f64,
    bbox: BoxJson,
    output_path: String,
}

fn is_ppm(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm") || ext.eq_ignore_ascii_case("pnm"))
}

fn load_image(path: &str) -> HistMatchResult<RgbImage> {
    let path = Path::new(path);
    if is_ppm(path) {
        load_ppm(path)
    } else {
        load_rgb_image(path)
    }
}

fn encode_image(path: &Path, img: &RgbImage) -> HistMatchResult<Vec<u8>> {
    if is_ppm(path) {
        Ok(encode_p3(img).into_bytes())
    } else {
        encode_for_path(path, img)
    }
}

/// Publishes the overlay image and the report together.
///
/// Both files are staged before either is renamed into place. If the report
/// cannot be committed the already published image is removed again.
fn write_outputs(
    output_path: &Path,
    image: &[u8],
    report_path: Option<&Path>,
    report: &str,
) -> HistMatchResult<()> {
    let staged_image = StagedFile::write(output_path, image)?;
    let Some(report_path) = report_path else {
        staged_image.commit()?;
        println!("{report}");
        return Ok(());
    };
    let staged_report = StagedFile::write(report_path, report.as_bytes())?;
    staged_image.commit()?;
    if let Err(err) = staged_report.commit() {
        let _ = fs::remove_file(output_path);
        return Err(err);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("histmatch=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.templates.is_empty() {
        return Err("at least one template must be listed in the config".into());
    }
    if config.query_path.is_empty() || config.output_path.is_empty() {
        return Err("query_path and output_path must be set in the config".into());
    }

    let hist_cfg = HistogramConfig::new(config.histogram.bins_per_channel)?;
    let scope = TemplateScope::from(config.template_scope);
    let mut store = TemplateStore::new(hist_cfg)?;
    for tpl in &config.templates {
        let reference = load_image(&tpl.image_path)?;
        let bbox = BoundingBox::new(tpl.bbox.x, tpl.bbox.y, tpl.bbox.width, tpl.bbox.height)?;
        store.add_reference(&reference, bbox, scope)?;
    }

    let [r, g, b] = config.overlay.color;
    let pipeline = Pipeline::new(store)
        .with_match_config(MatchConfig {
            parallel: config.match_cfg.parallel,
        })
        .with_style(OverlayStyle {
            color: Pixel::new(r, g, b),
        });

    let query = load_image(&config.query_path)?;
    let Localization { matched, overlay } = pipeline.run(&query)?;

    let output_path = PathBuf::from(&config.output_path);
    let image = encode_image(&output_path, &overlay)?;
    let report = Report {
        template_index: matched.template_index,
        distance: matched.distance,
        bbox: matched.bbox.into(),
        output_path: config.output_path,
    };
    let json = serde_json::to_string_pretty(&report)?;
    write_outputs(&output_path, &image, config.report_path.as_deref().map(Path::new), &json)?;

    Ok(())
}
