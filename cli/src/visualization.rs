//! PNG rendering of a graph and its routed wires (§1.7 `route`), built on
//! `image`/`imageproc` exactly as `eda_common::util::visualization` draws
//! placement/routing.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect as ImageRect;
use routing_core::Graph;
use routing_router::{NetView, Vertex};
use std::path::Path;

const BACKGROUND: Rgba<u8> = Rgba([15, 15, 18, 255]);
const OBSTACLE_COLOR: Rgba<u8> = Rgba([90, 90, 100, 255]);
const NODE_COLOR: Rgba<u8> = Rgba([70, 70, 80, 180]);
const ANCHOR_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const WIRE_COLORS: [Rgba<u8>; 4] = [
    Rgba([0, 170, 255, 220]),
    Rgba([255, 80, 120, 220]),
    Rgba([80, 255, 140, 220]),
    Rgba([255, 210, 0, 220]),
];

pub fn draw_routed_scene(
    graph: &Graph,
    vertices: &[Vertex],
    net_views: &[NetView],
    wire_views: &[routing_router::WireView],
    filename: &str,
    width: u32,
    height: u32,
) -> anyhow::Result<()> {
    let mut img = RgbaImage::from_pixel(width, height, BACKGROUND);

    let (min_x, max_x, min_y, max_y) = bounds(graph);
    let span_x = (max_x - min_x).max(1) as f64;
    let span_y = (max_y - min_y).max(1) as f64;
    let margin = 20.0;
    let scale_x = (width as f64 - 2.0 * margin) / span_x;
    let scale_y = (height as f64 - 2.0 * margin) / span_y;

    let map = |x: f64, y: f64| {
        (
            margin + (x - min_x as f64) * scale_x,
            height as f64 - margin - (y - min_y as f64) * scale_y,
        )
    };

    for b in graph.obstacles() {
        let (x1, y1) = map(b.min_x() as f64, b.max_y() as f64);
        let (x2, y2) = map(b.max_x() as f64, b.min_y() as f64);
        let w = (x2 - x1).max(1.0) as u32;
        let h = (y2 - y1).max(1.0) as u32;
        draw_filled_rect_mut(&mut img, ImageRect::at(x1 as i32, y1 as i32).of_size(w, h), OBSTACLE_COLOR);
    }

    for node in graph.nodes() {
        let (x, y) = map(node.position.x as f64, node.position.y as f64);
        let color = if node.is_anchor { ANCHOR_COLOR } else { NODE_COLOR };
        let size = if node.is_anchor { 5 } else { 2 };
        draw_filled_rect_mut(
            &mut img,
            ImageRect::at(x as i32 - size / 2, y as i32 - size / 2).of_size(size as u32, size as u32),
            color,
        );
    }

    for (net_index, view) in net_views.iter().enumerate() {
        let color = WIRE_COLORS[net_index % WIRE_COLORS.len()];
        let mut vertex_cursor = view.vertex_offset as usize;
        for wire in &wire_views[view.wire_offset as usize..(view.wire_offset + view.wire_count) as usize] {
            let count = wire.vertex_count() as usize;
            let run = &vertices[vertex_cursor..vertex_cursor + count];
            for w in run.windows(2) {
                let (x1, y1) = map(w[0].x as f64, w[0].y as f64);
                let (x2, y2) = map(w[1].x as f64, w[1].y as f64);
                draw_line_segment_mut(&mut img, (x1 as f32, y1 as f32), (x2 as f32, y2 as f32), color);
            }
            vertex_cursor += count;
        }
    }

    if let Some(parent) = Path::new(filename).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    img.save(Path::new(filename))
        .map_err(|e| anyhow::anyhow!("failed to write PNG '{filename}': {e}"))
}

fn bounds(graph: &Graph) -> (i32, i32, i32, i32) {
    let mut min_x = i32::MAX;
    let mut max_x = i32::MIN;
    let mut min_y = i32::MAX;
    let mut max_y = i32::MIN;
    for node in graph.nodes() {
        min_x = min_x.min(node.position.x);
        max_x = max_x.max(node.position.x);
        min_y = min_y.min(node.position.y);
        max_y = max_y.max(node.position.y);
    }
    if graph.is_empty() {
        (0, 1, 0, 1)
    } else {
        (min_x, max_x, min_y, max_y)
    }
}
