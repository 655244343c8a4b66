use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use road_profile::{
    config::load_config,
    io::{
        mesh::{write_mesh_json, write_mesh_obj},
        project::{read_road_json, write_road_json},
    },
    CubicInterval, GeometryKind, Lane, LaneSection, LaneType, MarkColor, MarkConfig, MarkKind,
    ReferenceLine, Road, RoadMark, TriangleBuffer,
};

/// Command line interface to the road profile and mark geometry engine.
#[derive(Parser)]
#[command(name = "road_profile_cli", version)]
struct Cli {
    /// JSON file overriding mark tiling and mesh settings
    #[arg(long, global = true)]
    config: Option<String>,
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum MeshFormat {
    Json,
    Obj,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the inner and outer border offsets of a lane at arc length s.
    Width {
        road: String,
        #[arg(allow_negative_numbers = true)]
        lane: i32,
        s: f64,
    },
    /// List the mark placements of a lane as start,length,lateral lines.
    Placements {
        road: String,
        section: usize,
        #[arg(allow_negative_numbers = true)]
        lane: i32,
        #[arg(long)]
        from: Option<f64>,
        #[arg(long)]
        to: Option<f64>,
    },
    /// Generate the mark mesh of one lane, or of every lane.
    Mesh {
        road: String,
        output: String,
        #[arg(long, value_enum, default_value_t = MeshFormat::Json)]
        format: MeshFormat,
        #[arg(long, requires = "lane")]
        section: Option<usize>,
        #[arg(long, requires = "section", allow_negative_numbers = true)]
        lane: Option<i32>,
    },
    /// Report structural problems in a road file.
    Validate { road: String },
    /// Write a small sample road to start from.
    Sample { output: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Error reading {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => MarkConfig::default(),
    };

    match run(cli.command, &config) {
        Ok(code) => code,
        Err(msg) => {
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}

fn load_road(path: &str) -> Result<Road, String> {
    read_road_json(path).map_err(|e| format!("Error reading {}: {}", path, e))
}

fn run(command: Commands, config: &MarkConfig) -> Result<ExitCode, String> {
    match command {
        Commands::Width { road, lane, s } => {
            let road = load_road(&road)?;
            let inner = road.cumulative_width(lane, s).map_err(|e| e.to_string())?;
            let outer = road.outer_border(lane, s).map_err(|e| e.to_string())?;
            println!("inner: {:.3}", inner);
            println!("outer: {:.3}", outer);
        }
        Commands::Placements {
            road,
            section,
            lane,
            from,
            to,
        } => {
            let road = load_road(&road)?;
            let length = road
                .section(section)
                .map(|sec| sec.length())
                .ok_or_else(|| format!("no lane section with index {section}"))?;
            let tiles = road
                .placements(
                    section,
                    lane,
                    from.unwrap_or(0.0),
                    to.unwrap_or(length),
                    config,
                )
                .map_err(|e| e.to_string())?;
            for t in tiles {
                println!("{:.3},{:.3},{:.3}", t.s, t.length, t.lateral);
            }
        }
        Commands::Mesh {
            road,
            output,
            format,
            section,
            lane,
        } => {
            let road = load_road(&road)?;
            let buffer = match (section, lane) {
                (Some(section), Some(lane)) => road
                    .generate_mark_mesh(section, lane, &road.reference_line, config)
                    .map_err(|e| e.to_string())?,
                _ => {
                    let mut merged = TriangleBuffer::new();
                    let meshes = road
                        .generate_all_mark_meshes(&road.reference_line, config)
                        .map_err(|e| e.to_string())?;
                    for mesh in &meshes {
                        merged.append(&mesh.buffer);
                    }
                    merged
                }
            };
            let written = match format {
                MeshFormat::Json => write_mesh_json(&output, &buffer),
                MeshFormat::Obj => write_mesh_obj(&output, &buffer, &road.id),
            };
            written.map_err(|e| format!("Error writing {}: {}", output, e))?;
            info!("wrote {} to {}", road.id, output);
            println!(
                "Wrote {} triangles to {}",
                buffer.triangle_count(),
                output
            );
        }
        Commands::Validate { road } => {
            let road = load_road(&road)?;
            let problems = road.validate();
            if problems.is_empty() {
                println!("Road {} is valid", road.id);
            } else {
                for p in &problems {
                    println!("{p}");
                }
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Sample { output } => {
            let road = sample_road(config).map_err(|e| e.to_string())?;
            write_road_json(&output, &road)
                .map_err(|e| format!("Error writing {}: {}", output, e))?;
            println!("Wrote sample road to {}", output);
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Two-lane road: a straight followed by a left-hand arc, yellow center
/// line, white broken edge marks and a lane that narrows halfway.
fn sample_road(config: &MarkConfig) -> road_profile::Result<Road> {
    let mut line = ReferenceLine::new();
    line.push(60.0, GeometryKind::Line)?;
    line.push(40.0, GeometryKind::Arc { curvature: 0.01 })?;
    let mut road = Road::new("1", "sample", line);
    road.elevation
        .insert(CubicInterval::new(0.0, 0.0, 0.01, 0.0, 0.0))?;

    let mut section = LaneSection::new(0.0, 100.0)?;
    section
        .lane_mut(0)
        .ok_or(road_profile::ProfileError::UnknownLane(0))?
        .marks
        .insert(RoadMark::new(0.0, MarkKind::Solid, config).with_color(MarkColor::Yellow))?;
    for id in [-1, 1] {
        let mut lane = Lane::with_width(id, LaneType::Driving, 3.5);
        lane.marks
            .insert(RoadMark::new(0.0, MarkKind::Broken, config))?;
        section.add_lane(lane)?;
    }
    if let Some(lane) = section.lane_mut(1) {
        lane.width.insert(CubicInterval::linear(50.0, 20.0, 3.5, 3.0))?;
        lane.width.insert(CubicInterval::constant(70.0, 3.0))?;
    }
    road.add_section(section)?;
    Ok(road)
}
