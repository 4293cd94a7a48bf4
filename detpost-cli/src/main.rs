use clap::Parser;
use detpost::{
    BoundingBox, PixelRect, PostProcessConfig, PostProcessor, SuppressionMode, TensorLayout,
    GEOMETRY_CHANNELS,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Detection post-processing CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for the decode and suppression stages.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum LayoutConfig {
    ChannelMajor,
    ElementMajor,
}

impl From<LayoutConfig> for TensorLayout {
    fn from(value: LayoutConfig) -> Self {
        match value {
            LayoutConfig::ChannelMajor => TensorLayout::ChannelMajor,
            LayoutConfig::ElementMajor => TensorLayout::ElementMajor,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum SuppressionConfig {
    ClassAgnostic,
    PerClass,
}

impl From<SuppressionConfig> for SuppressionMode {
    fn from(value: SuppressionConfig) -> Self {
        match value {
            SuppressionConfig::ClassAgnostic => SuppressionMode::ClassAgnostic,
            SuppressionConfig::PerClass => SuppressionMode::PerClass,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct PostProcessJson {
    confidence_threshold: f32,
    iou_threshold: f32,
    layout: LayoutConfig,
    suppression: SuppressionConfig,
    parallel: bool,
}

impl Default for PostProcessJson {
    fn default() -> Self {
        let cfg = PostProcessConfig::default();
        Self {
            confidence_threshold: cfg.confidence_threshold,
            iou_threshold: cfg.iou_threshold,
            layout: LayoutConfig::ChannelMajor,
            suppression: SuppressionConfig::ClassAgnostic,
            parallel: cfg.parallel,
        }
    }
}

impl From<PostProcessJson> for PostProcessConfig {
    fn from(value: PostProcessJson) -> Self {
        Self {
            confidence_threshold: value.confidence_threshold,
            iou_threshold: value.iou_threshold,
            layout: value.layout.into(),
            suppression: value.suppression.into(),
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    tensor_path: String,
    labels_path: String,
    output_path: Option<String>,
    image_width: Option<u32>,
    image_height: Option<u32>,
    postprocess: PostProcessJson,
}

/// Tensor dump: either a bare flat array or a shaped object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TensorFile {
    Flat(Vec<f32>),
    Shaped { shape: Vec<usize>, data: Vec<f32> },
}

#[derive(Debug, Serialize)]
struct PixelRecord {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl From<PixelRect> for PixelRecord {
    fn from(value: PixelRect) -> Self {
        Self {
            left: value.left,
            top: value.top,
            right: value.right,
            bottom: value.bottom,
        }
    }
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    class_index: usize,
    class_name: String,
    confidence: f32,
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pixels: Option<PixelRecord>,
}

impl DetectionRecord {
    fn new(bbox: &BoundingBox, image_size: Option<(u32, u32)>) -> Self {
        Self {
            class_index: bbox.class_index(),
            class_name: bbox.class_name().to_string(),
            confidence: bbox.confidence(),
            x1: bbox.x1(),
            y1: bbox.y1(),
            x2: bbox.x2(),
            y2: bbox.y2(),
            pixels: image_size.map(|(w, h)| bbox.to_pixels(w, h).into()),
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    count: usize,
    detections: Vec<DetectionRecord>,
}

/// Reads one label per non-empty line.
fn parse_labels(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolves `(data, num_channels, num_elements)` from a tensor dump.
///
/// Flat dumps take their channel count from the label list. Shaped dumps
/// accept `[C, N]` or `[1, C, N]` (swapped for element-major layouts).
fn tensor_dims(
    file: TensorFile,
    num_labels: usize,
    layout: TensorLayout,
) -> Result<(Vec<f32>, usize, usize), Box<dyn std::error::Error>> {
    match file {
        TensorFile::Flat(data) => {
            let num_channels = num_labels + GEOMETRY_CHANNELS;
            let num_elements = data.len() / num_channels;
            Ok((data, num_channels, num_elements))
        }
        TensorFile::Shaped { shape, data } => {
            let dims = match shape.as_slice() {
                [1, a, b] | [a, b] => (*a, *b),
                _ => return Err(format!("unsupported tensor shape {shape:?}").into()),
            };
            let (num_channels, num_elements) = match layout {
                TensorLayout::ChannelMajor => dims,
                TensorLayout::ElementMajor => (dims.1, dims.0),
            };
            Ok((data, num_channels, num_elements))
        }
    }
}

/// Pairs the optional image dimensions; both or neither must be set.
fn image_size(
    width: Option<u32>,
    height: Option<u32>,
) -> Result<Option<(u32, u32)>, Box<dyn std::error::Error>> {
    match (width, height) {
        (Some(w), Some(h)) => Ok(Some((w, h))),
        (None, None) => Ok(None),
        _ => Err("image_width and image_height must be set together".into()),
    }
}

fn load_labels(path: &Path) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    Ok(parse_labels(&text))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env()
                    .add_directive("detpost=info".parse()?)
                    .add_directive("detpost_cli=debug".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.tensor_path.is_empty() || config.labels_path.is_empty() {
        return Err("tensor_path and labels_path must be set in the config".into());
    }
    let image_size = image_size(config.image_width, config.image_height)?;

    let labels = load_labels(Path::new(&config.labels_path))?;
    info!(count = labels.len(), "loaded labels");

    let cfg: PostProcessConfig = config.postprocess.into();
    cfg.validate()?;

    let tensor_text = fs::read_to_string(&config.tensor_path)?;
    let tensor_file: TensorFile = serde_json::from_str(&tensor_text)?;
    let (data, num_channels, num_elements) = tensor_dims(tensor_file, labels.len(), cfg.layout)?;
    debug!(num_channels, num_elements, "tensor dimensions");

    let processor = PostProcessor::new(labels).with_config(cfg);
    let detections = processor.process(&data, num_channels, num_elements)?;
    info!(count = detections.len(), "detections");

    let records: Vec<DetectionRecord> = detections
        .iter()
        .map(|bbox| DetectionRecord::new(bbox, image_size))
        .collect();
    let output = Output {
        count: records.len(),
        detections: records,
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
