use clap::Parser;
use numgrid::image::io::load_gray_image;
use numgrid::{
    load_template_set, recognize, recognize_in_rect, GridReading, LocateConfig, Rect,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Locate a numbered grid in a capture and print label coordinates"
)]
struct Cli {
    /// Grayscale scene capture. Repeat per pass, or give one shared scene.
    #[arg(short, long = "scene", value_name = "FILE", required = true)]
    scenes: Vec<PathBuf>,
    /// Template image for one pass. Repeat for follow-up grids that reuse
    /// the rectangle located in the first pass.
    #[arg(short, long = "template", value_name = "FILE", required = true)]
    templates: Vec<PathBuf>,
    /// Whitespace-separated integer label file matching each template.
    #[arg(short, long = "labels", value_name = "FILE", required = true)]
    labels: Vec<PathBuf>,
    /// Minimum correlation for the grid locator.
    #[arg(long, default_value_t = 0.95)]
    min_correlation: f32,
    /// Enable tracing output for profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Serialize)]
struct RectJson {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

impl From<Rect> for RectJson {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            w: rect.w,
            h: rect.h,
        }
    }
}

#[derive(Serialize)]
struct PassJson {
    rect: RectJson,
    /// Label centers in scene pixel coordinates.
    coords: BTreeMap<u32, [f32; 2]>,
}

fn pass_json(reading: &GridReading) -> PassJson {
    let coords = reading
        .coords
        .keys()
        .map(|&label| {
            let coord = reading
                .scene_coord(label)
                .expect("label came from the reading");
            (label, [coord.0, coord.1])
        })
        .collect();
    PassJson {
        rect: reading.rect.into(),
        coords,
    }
}

fn run(cli: &Cli) -> Result<Vec<PassJson>, Box<dyn std::error::Error>> {
    if cli.templates.len() != cli.labels.len() {
        return Err(format!(
            "{} template images but {} label files",
            cli.templates.len(),
            cli.labels.len()
        )
        .into());
    }
    if cli.scenes.len() != 1 && cli.scenes.len() != cli.templates.len() {
        return Err(format!(
            "{} scenes for {} passes; give one shared scene or one per pass",
            cli.scenes.len(),
            cli.templates.len()
        )
        .into());
    }

    let cfg = LocateConfig {
        min_correlation: cli.min_correlation,
        ..LocateConfig::default()
    };

    let mut passes = Vec::new();
    let mut rect: Option<Rect> = None;
    for (idx, (tpl_path, labels_path)) in cli.templates.iter().zip(cli.labels.iter()).enumerate()
    {
        let set = load_template_set(tpl_path, labels_path)?;
        let scene_path = if cli.scenes.len() == 1 {
            &cli.scenes[0]
        } else {
            &cli.scenes[idx]
        };
        let scene = load_gray_image(scene_path)?;

        let reading = match rect {
            None => recognize(scene.view(), &set, &cfg)?,
            Some(rect) => recognize_in_rect(scene.view(), &set, rect)?,
        };
        rect = Some(reading.rect);
        passes.push(pass_json(&reading));
    }
    Ok(passes)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    match run(&cli) {
        Ok(passes) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&passes).expect("serializable output")
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("ERROR: {err}");
            ExitCode::FAILURE
        }
    }
}
