use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use glam::Vec3;
use std::path::PathBuf;
use textscene_assets::{FontSource, Geometry, TextOptions, Typeface};
use textscene_input::KeyState;
use textscene_render::{
    DebugTextRenderer, LitParams, Material, MaterialStyle, Preset, Renderer, SceneBuilder,
    SceneConfig, lighting,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "textscene-cli", about = "Inspect and exercise the text scene without a window")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SceneArgs {
    /// Scene variation: basic, glow, glow-interactive, lit
    #[arg(short, long, default_value = "lit")]
    preset: Preset,

    /// JSON scene config; replaces the preset
    #[arg(long)]
    config: Option<PathBuf>,
}

impl SceneArgs {
    fn load(&self) -> anyhow::Result<SceneConfig> {
        match &self.config {
            Some(path) => SceneConfig::from_path(path)
                .with_context(|| format!("loading scene config {}", path.display())),
            None => Ok(SceneConfig::preset(self.preset)),
        }
    }
}

#[derive(Args)]
struct FontArgs {
    /// Fetch the typeface from this URL
    #[arg(long, conflicts_with = "font_path")]
    font_url: Option<String>,

    /// Read the typeface from a local file
    #[arg(long)]
    font_path: Option<PathBuf>,
}

impl FontArgs {
    fn source(&self) -> Option<FontSource> {
        match (&self.font_url, &self.font_path) {
            (Some(url), _) => Some(FontSource::Url(url.clone())),
            (None, Some(path)) => Some(FontSource::Path(path.clone())),
            (None, None) => None,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and defaults
    Info,
    /// List scene presets, or print one as JSON
    Presets {
        /// Preset to print as a JSON scene config
        #[arg(long)]
        show: Option<Preset>,
    },
    /// Evaluate the lighting model for one fragment (view space)
    Shade {
        /// Fragment position
        #[arg(long, value_parser = parse_vec3, default_value = "0,0,-5")]
        frag: Vec3,
        /// Surface normal
        #[arg(long, value_parser = parse_vec3, default_value = "0,0,1")]
        normal: Vec3,
        /// Light position
        #[arg(long, value_parser = parse_vec3, default_value = "0,0.5,-3.5")]
        light: Vec3,
    },
    /// Run the per-frame update with keys held and report positions
    Simulate {
        #[command(flatten)]
        scene: SceneArgs,
        /// Number of frames to advance
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Keys held for the whole run, e.g. "wd"
        #[arg(short, long, default_value = "")]
        keys: String,
        /// Print every frame instead of only the last
        #[arg(long)]
        trace: bool,
    },
    /// Build extruded text and report its geometry
    Geometry {
        #[command(flatten)]
        font: FontArgs,
        /// Text to extrude
        #[arg(default_value = "o8")]
        text: String,
        #[arg(long, default_value = "1.0")]
        size: f32,
        #[arg(long, default_value = "0.2")]
        depth: f32,
        #[arg(long, default_value = "12")]
        curve_segments: u32,
    },
    /// Load the typeface, build the scene and dump it as text
    Render {
        #[command(flatten)]
        scene: SceneArgs,
        #[command(flatten)]
        font: FontArgs,
        /// Frames to advance before the dump
        #[arg(short, long, default_value = "0")]
        frames: u64,
        /// Keys held while advancing
        #[arg(short, long, default_value = "")]
        keys: String,
    },
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<f32> = s
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected x,y,z, got {s:?}")),
    }
}

fn fmt_vec3(v: Vec3) -> String {
    format!("({:.3}, {:.3}, {:.3})", v.x, v.y, v.z)
}

/// Key state for `config` with every character of `keys` held.
fn held_keys(config: &SceneConfig, keys: &str) -> KeyState {
    let mut state = config
        .input
        .as_ref()
        .map(|bindings| bindings.key_state())
        .unwrap_or_default();
    for c in keys.chars() {
        if !state.key_down(c) {
            tracing::warn!(key = %c, "key is not bound in this scene, ignored");
        }
    }
    state
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let defaults = SceneConfig::default();
            println!("textscene-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("default typeface: {}", defaults.font);
            println!(
                "text: size={} depth={} curve_segments={}",
                defaults.text.size, defaults.text.depth, defaults.text.curve_segments
            );
            println!(
                "camera: fov={} near={} far={} pos={}",
                defaults.camera.fov_degrees,
                defaults.camera.near,
                defaults.camera.far,
                fmt_vec3(defaults.camera.position)
            );
            println!("ambient intensity: {}", lighting::DEFAULT_AMBIENT_INTENSITY);
            println!("presets: {}", Preset::ALL.len());
        }
        Commands::Presets { show } => match show {
            Some(preset) => println!("{}", SceneConfig::preset(preset).to_json()?),
            None => {
                for preset in Preset::ALL {
                    println!("{:<18} {}", preset.name(), preset.description());
                }
            }
        },
        Commands::Shade { frag, normal, light } => {
            println!(
                "frag={} normal={} light={}",
                fmt_vec3(frag),
                fmt_vec3(normal),
                fmt_vec3(light)
            );
            let lit = [("letter", LitParams::letter()), ("digit", LitParams::digit())];
            for (name, params) in lit {
                let terms = lighting::local_terms(&params, frag, normal, light);
                println!(
                    "{name:<6} {:<16} ambient={} diffuse={} specular={} total={}",
                    Material::Lit(params).label(),
                    fmt_vec3(terms.ambient),
                    fmt_vec3(terms.diffuse),
                    fmt_vec3(terms.specular),
                    fmt_vec3(terms.total())
                );
            }
            for (name, material) in [
                ("letter", MaterialStyle::Glow.letter_material()),
                ("digit", MaterialStyle::Glow.digit_material()),
            ] {
                let color = material.shade(frag, normal, light);
                println!(
                    "{name:<6} {:<16} total={}",
                    material.label(),
                    fmt_vec3(color.truncate())
                );
            }
        }
        Commands::Simulate {
            scene,
            frames,
            keys,
            trace,
        } => {
            let config = scene.load()?;
            let keys = held_keys(&config, &keys);
            let mut scene = SceneBuilder::new(config).build_empty();
            if scene.input().is_none() {
                println!("note: this scene ignores keyboard input");
            }
            let start_light = scene.light_position();
            let start_camera = scene.camera().position;
            for _ in 0..frames {
                scene.update(&keys);
                if trace {
                    println!(
                        "frame {:>5}: light={} camera={}",
                        scene.frame(),
                        fmt_vec3(scene.light_position()),
                        fmt_vec3(scene.camera().position)
                    );
                }
            }
            println!(
                "after {} frames: light={} (moved {}) camera={} (moved {})",
                scene.frame(),
                fmt_vec3(scene.light_position()),
                fmt_vec3(scene.light_position() - start_light),
                fmt_vec3(scene.camera().position),
                fmt_vec3(scene.camera().position - start_camera)
            );
            println!(
                "light in view space: {}",
                fmt_vec3(scene.light_position_view())
            );
        }
        Commands::Geometry {
            font,
            text,
            size,
            depth,
            curve_segments,
        } => {
            let source = font.source().unwrap_or_default();
            let typeface = Typeface::load(&source)
                .with_context(|| format!("loading typeface from {source}"))?;
            let options = TextOptions {
                size,
                depth,
                curve_segments,
            };
            let geometry = Geometry::text(&typeface, &text, &options)?;
            println!("typeface: {} ({} glyphs)", typeface.family_name, typeface.glyphs.len());
            println!("text: {text:?}");
            println!("vertices: {}", geometry.vertex_count());
            println!("triangles: {}", geometry.triangle_count());
            if let Some((lo, hi)) = geometry.bounds() {
                println!("bounds: {} .. {}", fmt_vec3(lo), fmt_vec3(hi));
            }
        }
        Commands::Render {
            scene,
            font,
            frames,
            keys,
        } => {
            let mut config = scene.load()?;
            if let Some(source) = font.source() {
                config.font = source;
            }
            let keys = held_keys(&config, &keys);
            let mut scene = SceneBuilder::new(config)
                .load_and_build()
                .context("building scene")?;
            if scene.objects().is_empty() {
                bail!("scene has no objects");
            }
            for _ in 0..frames {
                scene.update(&keys);
            }
            print!("{}", DebugTextRenderer::new().render(&scene));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_vectors() {
        assert_eq!(parse_vec3("1, 2.5,-3").unwrap(), Vec3::new(1.0, 2.5, -3.0));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("a,b,c").is_err());
    }

    #[test]
    fn held_keys_respect_bindings() {
        let config = SceneConfig::preset(Preset::Lit);
        let keys = held_keys(&config, "wx");
        assert!(keys.is_held('w'));
        assert!(!keys.is_held('x'));
    }

    #[test]
    fn font_args_prefer_url() {
        let font = FontArgs {
            font_url: Some("https://example.com/f.json".into()),
            font_path: None,
        };
        assert_eq!(
            font.source(),
            Some(FontSource::Url("https://example.com/f.json".into()))
        );
        let none = FontArgs {
            font_url: None,
            font_path: None,
        };
        assert_eq!(none.source(), None);
    }

    #[test]
    fn subcommands_parse() {
        let cli = Cli::parse_from(["textscene-cli", "simulate", "--preset", "glow", "-k", "ws"]);
        match cli.command {
            Commands::Simulate { scene, keys, .. } => {
                assert_eq!(scene.preset, Preset::Glow);
                assert_eq!(keys, "ws");
            }
            _ => panic!("expected simulate"),
        }
    }
}
