//! On-disk scene format: anchors, obstacle boxes and nets for the demo
//! binary, plus random scene generation (§1.7 `generate`), grounded in
//! `eda_common::util::generator::generate_random_def`.

use rand::Rng;
use routing_core::geom::{Direction, DirectionSet};
use routing_core::graph::AnchorSpec;
use routing_core::{BoundingBox, Point};
use routing_router::{Endpoint, Net};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
pub struct SceneAnchor {
    pub x: i32,
    pub y: i32,
    /// Subset of "+x", "-x", "+y", "-y".
    pub directions: Vec<String>,
    pub box_index: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SceneBox {
    pub cx: i32,
    pub cy: i32,
    pub half_width: u16,
    pub half_height: u16,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SceneWaypoint {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SceneEndpoint {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub waypoints: Vec<SceneWaypoint>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SceneNet {
    pub endpoints: Vec<SceneEndpoint>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Scene {
    pub anchors: Vec<SceneAnchor>,
    pub boxes: Vec<SceneBox>,
    pub nets: Vec<SceneNet>,
}

impl Scene {
    pub fn load(path: &str) -> anyhow::Result<Scene> {
        let text = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read scene file '{path}': {e}"))?;
        toml::from_str(&text).map_err(|e| anyhow::anyhow!("invalid scene TOML '{path}': {e}"))
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = toml::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    pub fn boxes(&self) -> Vec<BoundingBox> {
        self.boxes
            .iter()
            .map(|b| BoundingBox::new(Point::new(b.cx, b.cy), b.half_width, b.half_height))
            .collect()
    }

    pub fn anchor_specs(&self) -> Vec<AnchorSpec> {
        self.anchors
            .iter()
            .map(|a| {
                let dirs = parse_directions(&a.directions);
                let spec = AnchorSpec::new(Point::new(a.x, a.y), dirs);
                match a.box_index {
                    Some(i) => spec.with_box(routing_core::BoundingBoxIndex::new(i)),
                    None => spec,
                }
            })
            .collect()
    }

    /// Flattens every net's endpoints/waypoints into the three caller-owned
    /// arrays `graph_connect_nets` expects (§6).
    pub fn flatten_nets(&self) -> (Vec<Net>, Vec<Endpoint>, Vec<Point>) {
        let mut nets = Vec::with_capacity(self.nets.len());
        let mut endpoints = Vec::new();
        let mut waypoints = Vec::new();

        for net in &self.nets {
            let endpoint_offset = endpoints.len() as u32;
            for ep in &net.endpoints {
                let waypoint_offset = waypoints.len() as u32;
                for wp in &ep.waypoints {
                    waypoints.push(Point::new(wp.x, wp.y));
                }
                let waypoint_count = ep.waypoints.len() as u32;
                endpoints.push(if waypoint_count > 0 {
                    Endpoint::with_waypoints(Point::new(ep.x, ep.y), waypoint_offset, waypoint_count)
                } else {
                    Endpoint::new(Point::new(ep.x, ep.y))
                });
            }
            nets.push(Net::new(endpoint_offset, net.endpoints.len() as u32));
        }

        (nets, endpoints, waypoints)
    }
}

fn parse_directions(names: &[String]) -> DirectionSet {
    let mut set = DirectionSet::NONE;
    for name in names {
        set |= match name.as_str() {
            "+x" => DirectionSet::single(Direction::PosX),
            "-x" => DirectionSet::single(Direction::NegX),
            "+y" => DirectionSet::single(Direction::PosY),
            "-y" => DirectionSet::single(Direction::NegY),
            other => {
                log::warn!("ignoring unknown direction '{other}' in scene file");
                DirectionSet::NONE
            }
        };
    }
    set
}

fn direction_names(set: DirectionSet) -> Vec<String> {
    let mut names = Vec::new();
    if set.contains(Direction::PosX) {
        names.push("+x".to_string());
    }
    if set.contains(Direction::NegX) {
        names.push("-x".to_string());
    }
    if set.contains(Direction::PosY) {
        names.push("+y".to_string());
    }
    if set.contains(Direction::NegY) {
        names.push("-y".to_string());
    }
    names
}

/// Generates a random scene: a chain of anchors threaded by a box obstacle
/// every few anchors, each consecutive pair joined by one net. Mirrors the
/// chain-net-per-adjacent-cell shape of `generate_random_def`.
pub fn generate_random_scene(
    path: &str,
    num_anchors: usize,
    num_nets: usize,
    span: i32,
) -> anyhow::Result<()> {
    let mut rng = rand::thread_rng();
    let num_anchors = num_anchors.max(2);
    let num_nets = num_nets.max(1).min(num_anchors - 1);

    log::info!("Generating random scene: {num_anchors} anchors, {num_nets} nets, span {span}");

    let mut anchors = Vec::with_capacity(num_anchors);
    for _ in 0..num_anchors {
        let x = rng.gen_range(0..=span);
        let y = rng.gen_range(0..=span);
        anchors.push(SceneAnchor {
            x,
            y,
            directions: direction_names(DirectionSet::ALL),
            box_index: None,
        });
    }

    let mut boxes = Vec::new();
    for i in (2..num_anchors).step_by(3) {
        let cx = (anchors[i].x + anchors[i - 1].x) / 2;
        let cy = (anchors[i].y + anchors[i - 1].y) / 2 + 1;
        boxes.push(SceneBox {
            cx,
            cy,
            half_width: 1,
            half_height: 1,
        });
    }

    let mut nets = Vec::with_capacity(num_nets);
    for i in 0..num_nets {
        let a = &anchors[i];
        let b = &anchors[i + 1];
        nets.push(SceneNet {
            endpoints: vec![
                SceneEndpoint { x: a.x, y: a.y, waypoints: Vec::new() },
                SceneEndpoint { x: b.x, y: b.y, waypoints: Vec::new() },
            ],
        });
    }

    let scene = Scene { anchors, boxes, nets };
    scene.save(path)?;
    log::info!("Wrote scene to {path}");
    Ok(())
}
