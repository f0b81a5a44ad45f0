//! Demo-binary configuration (§1.4). `graph_build`/`connect_nets`
//! themselves take all parameters as explicit arguments; this struct only
//! holds the knobs the CLI needs to decide what to pass them.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub scene: SceneConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            routing: RoutingConfig::default(),
            scene: SceneConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RoutingConfig {
    #[serde(default = "default_minimal")]
    pub minimal: bool,
    #[serde(default = "default_perform_centering")]
    pub perform_centering: bool,
    /// 0 = use available hardware parallelism; otherwise forwarded to
    /// `init_thread_pool`'s `ThreadPoolBuilder::num_threads`.
    #[serde(default = "default_thread_count")]
    pub thread_count: usize,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            minimal: default_minimal(),
            perform_centering: default_perform_centering(),
            thread_count: default_thread_count(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "default_scene_file")]
    pub scene_file: String,
    #[serde(default = "default_graph_file")]
    pub graph_file: String,
    #[serde(default = "default_output_png")]
    pub output_png: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            scene_file: default_scene_file(),
            graph_file: default_graph_file(),
            output_png: default_output_png(),
        }
    }
}

fn default_minimal() -> bool {
    true
}

fn default_perform_centering() -> bool {
    true
}

fn default_thread_count() -> usize {
    0
}

fn default_scene_file() -> String {
    "inputs/random.scene.toml".to_string()
}

fn default_graph_file() -> String {
    "output/graph.bin".to_string()
}

fn default_output_png() -> String {
    "output/routed.png".to_string()
}
