//! scene-export: convert a glTF scene into a `.fs` scene file
//!
//! Usage:
//!   scene-export scene.gltf
//!   scene-export scene.glb -o level.fs --compact
//!   scene-export scene.gltf --selected-only --select Cube --select Lamp

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use log::info;

use scene_export::export::{with_default_extension, ColorSource};
use scene_export::{export_scene, ExportSettings, Scene};

struct Args {
    input: PathBuf,
    output: Option<PathBuf>,
    select: Vec<String>,
    settings: ExportSettings,
}

fn parse_args() -> Result<Option<Args>> {
    let mut args = std::env::args().skip(1);
    let mut input: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;
    let mut select = Vec::new();
    let mut settings = ExportSettings::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-o" | "--out" => {
                output = Some(PathBuf::from(args.next().context("Missing --out argument")?));
            }
            "--compact" => settings.human_readable = false,
            "--selected-only" => settings.selected_only = true,
            "--select" => select.push(args.next().context("Missing --select argument")?),
            "--color-source" => {
                let id = args.next().context("Missing --color-source argument")?;
                settings.color_source = ColorSource::from_option_id(&id).with_context(|| {
                    format!("Unknown color source {} (expected OPT_A, OPT_B or OPT_C)", id)
                })?;
            }
            "--help" | "-h" => {
                print_help();
                return Ok(None);
            }
            other if other.starts_with('-') => bail!("Unknown argument: {}", other),
            other => {
                if input.is_some() {
                    bail!("Only one input file can be exported at a time");
                }
                input = Some(PathBuf::from(other));
            }
        }
    }

    let Some(input) = input else {
        print_help();
        bail!("Missing input file");
    };

    Ok(Some(Args {
        input,
        output,
        select,
        settings,
    }))
}

fn print_help() {
    println!("Usage: scene-export <input.gltf|input.glb> [options]");
    println!();
    println!("Options:");
    println!("  -o, --out <path>         Output file (default: input with .fs extension)");
    println!("  --compact                Write compact JSON instead of indented JSON");
    println!("  --selected-only          Export only objects marked with --select");
    println!("  --select <name>          Mark an object as selected (repeatable)");
    println!("  --color-source <id>      OPT_A, OPT_B or OPT_C (reserved, no effect)");
    println!("  -h, --help               Print this help");
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let Some(args) = parse_args()? else {
        return Ok(());
    };

    let mut scene = Scene::from_gltf(&args.input)?;

    for name in &args.select {
        let object_id = scene
            .get_object_by_name(name)
            .with_context(|| format!("No object named {} in {}", name, args.input.display()))?;
        scene.set_selected(object_id, true);
    }

    let output = match args.output {
        Some(output) => with_default_extension(output),
        None => args.input.with_extension(scene_export::export::FILE_EXTENSION),
    };

    let summary = export_scene(&scene, &output, &args.settings)?;
    info!(
        "Exported {} objects to {}",
        summary.objects,
        summary.path.display()
    );

    Ok(())
}
