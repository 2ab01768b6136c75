use std::env;
use std::path::PathBuf;

use catalog::{ProjectConfig, load_catalog};
use foundation::ParticipantId;
use gateway::FilesystemGateway;
use streaming::{ParsedTileName, TileAddress};
use tools::{ReportSurface, parse_size};
use tracing_subscriber::EnvFilter;
use viewer::{Controller, NullSurface};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let mut args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let cmd = args[1].clone();
    args.drain(0..2);

    match cmd.as_str() {
        "layout" => cmd_layout(args),
        "urls" => cmd_urls(args),
        "tiles" => cmd_tiles(args),
        "parse" => cmd_parse(args),
        _ => Err(usage()),
    }
}

/// Options shared by the commands that read a project from a local storage mirror.
struct ProjectArgs {
    storage_root: PathBuf,
    config: PathBuf,
    participant: Option<ParticipantId>,
    public_base: String,
}

fn parse_project_args(args: Vec<String>) -> Result<ProjectArgs, String> {
    if args.len() < 2 {
        return Err(usage());
    }

    let mut parsed = ProjectArgs {
        storage_root: PathBuf::from(&args[0]),
        config: PathBuf::from(&args[1]),
        participant: None,
        public_base: String::new(),
    };

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--public-base" => {
                i += 1;
                if i >= args.len() {
                    return Err("--public-base requires a value".to_string());
                }
                parsed.public_base = args[i].clone();
            }
            s if s.starts_with('-') => {
                return Err(format!("unknown arg: {s}\n\n{}", usage()));
            }
            s => {
                if parsed.participant.is_some() {
                    return Err(format!("unexpected arg: {s}\n\n{}", usage()));
                }
                parsed.participant = Some(ParticipantId::new(s));
            }
        }
        i += 1;
    }

    if parsed.public_base.is_empty() {
        parsed.public_base = format!("file://{}", parsed.storage_root.display());
    }
    Ok(parsed)
}

fn runtime() -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .map_err(|e| format!("tokio runtime: {e}"))
}

fn cmd_layout(args: Vec<String>) -> Result<(), String> {
    // docview layout <storage_root> <config.json> [participant] [--public-base URL]
    let args = parse_project_args(args)?;
    let config = ProjectConfig::load(&args.config).map_err(|e| e.to_string())?;
    let project = config.current_project().map_err(|e| e.to_string())?.clone();
    let gateway = FilesystemGateway::new(&args.storage_root, args.public_base);

    let mut controller = Controller::new(ReportSurface::new(), gateway.clone());
    runtime()?
        .block_on(controller.load(&gateway, &project))
        .map_err(|e| e.to_string())?;
    if let Some(id) = &args.participant {
        controller.select(id).map_err(|e| e.to_string())?;
    }

    if let Some(catalog) = controller.catalog() {
        eprintln!(
            "project {} ({} participants)",
            catalog.project.id,
            catalog.metadata.participants.len()
        );
    }
    eprintln!("state: {:?}", controller.state());
    if let Some(grid) = controller.grid() {
        eprintln!(
            "grid {}x{}, {} pages",
            grid.layout.columns,
            grid.layout.rows,
            grid.placements.len()
        );
    }

    let payload = serde_json::to_string_pretty(controller.surface().report())
        .map_err(|e| format!("json: {e}"))?;
    println!("{payload}");
    Ok(())
}

fn cmd_urls(args: Vec<String>) -> Result<(), String> {
    // docview urls <storage_root> <config.json> [participant] [--public-base URL]
    let args = parse_project_args(args)?;
    let config = ProjectConfig::load(&args.config).map_err(|e| e.to_string())?;
    let project = config.current_project().map_err(|e| e.to_string())?.clone();
    let gateway = FilesystemGateway::new(&args.storage_root, args.public_base);

    let rt = runtime()?;
    let catalog = rt
        .block_on(load_catalog(&gateway, &project))
        .map_err(|e| e.to_string())?;
    let participant = match args.participant {
        Some(id) => id,
        None => catalog
            .metadata
            .first_participant()
            .map(|p| p.id.clone())
            .ok_or_else(|| "project has no participants".to_string())?,
    };

    let mut controller = Controller::new(NullSurface, gateway.clone());
    let ticket = controller
        .begin_load()
        .ok_or_else(|| "controller already loaded".to_string())?;
    controller
        .complete_load(ticket, Ok(catalog))
        .map_err(|e| e.to_string())?;
    controller.select(&participant).map_err(|e| e.to_string())?;

    for descriptor in controller.descriptors() {
        for level in descriptor.min_level..=descriptor.max_level {
            let scale = controller.level_scale(descriptor.id, level).unwrap_or(0.0);
            if let Some(url) = controller.tile_url(descriptor.id, level, 0, 0) {
                println!("{}\t{level}\t{scale}\t{url}", descriptor.id.0);
            }
        }
    }
    Ok(())
}

fn cmd_tiles(args: Vec<String>) -> Result<(), String> {
    // docview tiles <participant> <position> <WIDTHxHEIGHT> [--root PATH]
    if args.len() < 3 {
        return Err(usage());
    }

    let participant = ParticipantId::new(args[0].as_str());
    let position: i64 = args[1]
        .parse()
        .map_err(|_| format!("invalid position: {}", args[1]))?;
    let (width, height) =
        parse_size(&args[2]).ok_or_else(|| format!("invalid size: {}", args[2]))?;

    let mut root: Option<String> = None;
    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--root" => {
                i += 1;
                if i >= args.len() {
                    return Err("--root requires a path".to_string());
                }
                root = Some(args[i].clone());
            }
            s => {
                return Err(format!("unknown arg: {s}\n\n{}", usage()));
            }
        }
        i += 1;
    }

    let page = foundation::Page::new(position, width, height);
    let address = TileAddress::new(participant, &page);
    eprintln!(
        "max_level={} tile_size={} levels={}",
        address.max_level,
        address.tile_size,
        address.max_level + 1
    );
    for name in address.all_tile_names() {
        match &root {
            Some(root) => println!("{}/{name}", root.trim_end_matches('/')),
            None => println!("{name}"),
        }
    }
    Ok(())
}

fn cmd_parse(args: Vec<String>) -> Result<(), String> {
    // docview parse <tile_name> [tile_name ...]
    if args.is_empty() {
        return Err(usage());
    }

    for raw in &args {
        let name = raw.rsplit('/').next().unwrap_or(raw);
        let parsed =
            ParsedTileName::parse(name).ok_or_else(|| format!("not a tile name: {raw}"))?;
        let payload = serde_json::to_string(&parsed).map_err(|e| format!("json: {e}"))?;
        println!("{payload}");
    }
    Ok(())
}

fn usage() -> String {
    let exe = env::args().next().unwrap_or_else(|| "docview".to_string());
    format!(
        "Usage:\n  {exe} layout <storage_root> <config.json> [participant] [--public-base URL]\n  {exe} urls <storage_root> <config.json> [participant] [--public-base URL]\n  {exe} tiles <participant> <position> <WIDTHxHEIGHT> [--root PATH]\n  {exe} parse <tile_name> [tile_name ...]\n\nNotes:\n- `layout` prints what the viewer would draw for the default project.\n- `urls` prints one tile URL per descriptor and level.\n- Set RUST_LOG=debug for controller logs (written to stderr).\n"
    )
}
