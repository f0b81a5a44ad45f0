mod check;
mod config;
mod logger;
mod scene;
mod visualization;

use clap::{Parser, Subcommand};
use config::Config;
use routing_core::{build_graph, serialize, Graph};
use routing_router::{connect_nets, init_thread_pool, NetView, Vertex, WireView};
use scene::Scene;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit a random scene (anchors, boxes, nets) to a TOML file.
    Generate {
        #[arg(long, default_value_t = 40)]
        anchors: usize,
        #[arg(long, default_value_t = 15)]
        nets: usize,
        #[arg(long, default_value_t = 100)]
        span: i32,
        #[arg(long, default_value = "inputs/random.scene.toml")]
        output: String,
    },
    /// Build the routing graph from a scene and serialize it to disk.
    Build,
    /// Route a scene's nets against a previously built graph and render a PNG.
    Route,
    /// Re-verify §8's invariants against a built graph and a routed scene.
    Check,
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    let config = if args.config.exists() {
        log::info!("Loading configuration from {:?}", args.config);
        let text = std::fs::read_to_string(&args.config)
            .map_err(|e| anyhow::anyhow!("failed to read config file: {e}"))?;
        toml::from_str(&text).map_err(|e| anyhow::anyhow!("failed to parse config TOML: {e}"))?
    } else {
        log::warn!("Configuration file {:?} not found. Using internal defaults.", args.config);
        Config::default()
    };

    let command = args.command.unwrap_or(Commands::Build);

    match command {
        Commands::Generate { anchors, nets, span, output } => {
            scene::generate_random_scene(&output, anchors, nets, span)?;
        }
        Commands::Build => run_build(&config)?,
        Commands::Route => run_route(&config)?,
        Commands::Check => run_check(&config)?,
    }

    Ok(())
}

fn run_build(config: &Config) -> anyhow::Result<()> {
    let scene = Scene::load(&config.scene.scene_file)?;
    let anchors = scene.anchor_specs();
    let boxes = scene.boxes();

    log::info!(
        "Building graph from {} anchors and {} obstacle boxes (minimal={})",
        anchors.len(),
        boxes.len(),
        config.routing.minimal
    );
    let graph = build_graph(&anchors, &boxes, config.routing.minimal);
    log::info!("Graph built: {} nodes", graph.len());

    if let Some(parent) = Path::new(&config.scene.graph_file).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    serialize::save(&graph, &config.scene.graph_file)?;
    log::info!("Serialized graph to {}", config.scene.graph_file);
    Ok(())
}

fn run_route(config: &Config) -> anyhow::Result<()> {
    if init_thread_pool(config.routing.thread_count).is_err() {
        log::warn!("worker pool already initialized");
    }

    let graph: Graph = serialize::load(&config.scene.graph_file)?;
    let scene = Scene::load(&config.scene.scene_file)?;
    let (nets, endpoints, waypoints) = scene.flatten_nets();

    log::info!("Routing {} nets over a {}-node graph", nets.len(), graph.len());

    // No path can revisit a node, so each endpoint's routed chain holds at
    // most one vertex per graph node; this bounds the demo's output buffers
    // without needing a dry run.
    let vertex_capacity = endpoints.len().max(1) * graph.len().max(1);
    let mut vertices = vec![Vertex { x: 0.0, y: 0.0 }; vertex_capacity];
    let mut wire_views = vec![WireView::new(0, false, false); vertex_capacity];
    let mut net_views = vec![NetView { wire_offset: 0, wire_count: 0, vertex_offset: 0 }; nets.len()];

    connect_nets(
        &graph,
        &nets,
        &endpoints,
        &waypoints,
        &mut vertices,
        &mut wire_views,
        &mut net_views,
        config.routing.perform_centering,
    )?;

    for (i, view) in net_views.iter().enumerate() {
        log::info!(
            "net {i}: {} wires, {} vertices",
            view.wire_count,
            // each net's vertex run ends where the next one's begins, or at
            // the buffer's high-water mark for the last net
            net_views.get(i + 1).map(|n| n.vertex_offset).unwrap_or(vertex_capacity as u32) - view.vertex_offset
        );
    }

    log::info!("Generating routed visualization...");
    visualization::draw_routed_scene(&graph, &vertices, &net_views, &wire_views, &config.scene.output_png, 2000, 2000)?;
    log::info!("Wrote {}", config.scene.output_png);

    Ok(())
}

fn run_check(config: &Config) -> anyhow::Result<()> {
    if init_thread_pool(config.routing.thread_count).is_err() {
        log::warn!("worker pool already initialized");
    }

    let graph: Graph = serialize::load(&config.scene.graph_file)?;
    let scene = Scene::load(&config.scene.scene_file)?;
    let (nets, endpoints, waypoints) = scene.flatten_nets();

    let vertex_capacity = endpoints.len().max(1) * graph.len().max(1);
    let mut vertices = vec![Vertex { x: 0.0, y: 0.0 }; vertex_capacity];
    let mut wire_views = vec![WireView::new(0, false, false); vertex_capacity];
    let mut net_views = vec![NetView { wire_offset: 0, wire_count: 0, vertex_offset: 0 }; nets.len()];

    connect_nets(
        &graph,
        &nets,
        &endpoints,
        &waypoints,
        &mut vertices,
        &mut wire_views,
        &mut net_views,
        config.routing.perform_centering,
    )?;

    check::run(&graph, &vertices, &wire_views, &net_views).map_err(|e| anyhow::anyhow!("verification failed: {e}"))
}
