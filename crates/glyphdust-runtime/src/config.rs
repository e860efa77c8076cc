//! Animation configuration: validated snapshot, builder, and TOML file form

use glyphdust_core::{CanvasSize, GlyphError, Result};
use glyphdust_particles::{AnimationKind, AnimationTuning};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Called with the finished animation kind when a run completes
pub type AnimationEndCallback = Arc<dyn Fn(AnimationKind) + Send + Sync>;

/// Immutable snapshot of one animation run. A new snapshot fully replaces the old one.
#[derive(Clone)]
pub struct AnimationConfig {
    pub text: String,
    /// CSS hex colors; invalid entries degrade to the default particle color
    pub colors: Vec<String>,
    pub radius: f32,
    pub speed: f32,
    pub particle_count: usize,
    pub kind: AnimationKind,
    pub tuning: AnimationTuning,
    pub seed: u32,
    pub on_animation_end: Option<AnimationEndCallback>,
}

impl AnimationConfig {
    pub fn builder(text: impl Into<String>) -> AnimationConfigBuilder {
        AnimationConfigBuilder::new(text)
    }
}

impl fmt::Debug for AnimationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationConfig")
            .field("text", &self.text)
            .field("colors", &self.colors)
            .field("radius", &self.radius)
            .field("speed", &self.speed)
            .field("particle_count", &self.particle_count)
            .field("kind", &self.kind)
            .field("tuning", &self.tuning)
            .field("seed", &self.seed)
            .field("on_animation_end", &self.on_animation_end.is_some())
            .finish()
    }
}

pub struct AnimationConfigBuilder {
    config: AnimationConfig,
}

impl AnimationConfigBuilder {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            config: AnimationConfig {
                text: text.into(),
                colors: Vec::new(),
                radius: 5.0,
                speed: 5.0,
                particle_count: 3000,
                kind: AnimationKind::FadeIn,
                tuning: AnimationTuning::default(),
                seed: 0x5EED_1234,
                on_animation_end: None,
            },
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.config.text = text.into();
        self
    }

    pub fn colors<S: Into<String>>(mut self, colors: impl IntoIterator<Item = S>) -> Self {
        self.config.colors = colors.into_iter().map(Into::into).collect();
        self
    }

    pub fn radius(mut self, radius: f32) -> Self {
        self.config.radius = radius;
        self
    }

    pub fn speed(mut self, speed: f32) -> Self {
        self.config.speed = speed;
        self
    }

    pub fn particle_count(mut self, count: usize) -> Self {
        self.config.particle_count = count;
        self
    }

    pub fn kind(mut self, kind: AnimationKind) -> Self {
        self.config.kind = kind;
        self
    }

    pub fn tuning(mut self, tuning: AnimationTuning) -> Self {
        self.config.tuning = tuning;
        self
    }

    pub fn seed(mut self, seed: u32) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn on_animation_end<F>(mut self, callback: F) -> Self
    where
        F: Fn(AnimationKind) + Send + Sync + 'static,
    {
        self.config.on_animation_end = Some(Arc::new(callback));
        self
    }

    /// Validate and produce the snapshot
    pub fn build(self) -> Result<AnimationConfig> {
        let c = &self.config;
        if c.particle_count == 0 {
            return Err(GlyphError::InvalidConfig(
                "particle count must be at least 1".into(),
            ));
        }
        if !(c.radius.is_finite() && c.radius > 0.0) {
            return Err(GlyphError::InvalidConfig(format!(
                "radius must be a positive number, got {}",
                c.radius
            )));
        }
        if !c.speed.is_finite() {
            return Err(GlyphError::InvalidConfig(format!(
                "speed must be finite, got {}",
                c.speed
            )));
        }
        c.tuning.validate()?;
        Ok(self.config)
    }
}

/// One `{ color = "#rrggbb" }` palette entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorEntry {
    pub color: String,
}

fn default_radius() -> f32 {
    5.0
}
fn default_speed() -> f32 {
    5.0
}
fn default_particles() -> usize {
    3000
}
fn default_animation() -> AnimationKind {
    AnimationKind::FadeIn
}

/// On-disk form of an animation config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    pub text: String,
    #[serde(default)]
    pub colors: Vec<ColorEntry>,
    #[serde(default = "default_radius")]
    pub radius: f32,
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default = "default_particles", alias = "particle_count")]
    pub particles: usize,
    #[serde(default = "default_animation", alias = "animation_kind")]
    pub animation: AnimationKind,
    #[serde(default)]
    pub seed: Option<u32>,
    /// Canvas size used by headless rendering
    #[serde(default)]
    pub canvas: Option<CanvasSize>,
    #[serde(default)]
    pub tuning: AnimationTuning,
}

impl ConfigFile {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            GlyphError::TomlParseError(format!("{}: {e}", path.display()))
        })
    }

    /// Builder pre-filled from this file; add a callback before `build()`
    pub fn to_builder(&self) -> AnimationConfigBuilder {
        let mut builder = AnimationConfig::builder(self.text.clone())
            .colors(self.colors.iter().map(|c| c.color.clone()))
            .radius(self.radius)
            .speed(self.speed)
            .particle_count(self.particles)
            .kind(self.animation)
            .tuning(self.tuning);
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn defaults_build() {
        let config = AnimationConfig::builder("hello").build().unwrap();
        assert_eq!(config.particle_count, 3000);
        assert_eq!(config.kind, AnimationKind::FadeIn);
        assert!(config.colors.is_empty());
        assert!(config.on_animation_end.is_none());
    }

    #[test]
    fn rejects_non_positive_count_and_radius() {
        assert!(matches!(
            AnimationConfig::builder("x").particle_count(0).build(),
            Err(GlyphError::InvalidConfig(_))
        ));
        assert!(AnimationConfig::builder("x").radius(0.0).build().is_err());
        assert!(AnimationConfig::builder("x").radius(-2.0).build().is_err());
        assert!(AnimationConfig::builder("x").speed(f32::INFINITY).build().is_err());
    }

    #[test]
    fn invalid_tuning_is_rejected() {
        let tuning = AnimationTuning {
            completion_ratio: 1.5,
            ..Default::default()
        };
        assert!(AnimationConfig::builder("x").tuning(tuning).build().is_err());
    }

    #[test]
    fn callback_is_shared_by_clones() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let config = AnimationConfig::builder("x")
            .on_animation_end(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();
        let copy = config.clone();
        if let Some(cb) = &copy.on_animation_end {
            cb(AnimationKind::FadeOut);
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(format!("{config:?}").contains("on_animation_end: true"));
    }

    #[test]
    fn parses_config_file() {
        let file = ConfigFile::from_toml_str(
            r##"
text = "hello"
radius = 4.0
speed = 2.3
particles = 1200
animation = "fadeOut"
seed = 9
colors = [{ color = "#ff0000" }, { color = "#00ff00" }]

[canvas]
width = 640
height = 240

[tuning]
fade_frames = 30
"##,
        )
        .unwrap();
        assert_eq!(file.canvas, Some(CanvasSize::new(640, 240)));
        assert_eq!(file.tuning.fade_frames, 30);
        assert!((file.tuning.completion_ratio - 0.7).abs() < 1e-6);

        let config = file.to_builder().build().unwrap();
        assert_eq!(config.kind, AnimationKind::FadeOut);
        assert_eq!(config.particle_count, 1200);
        assert_eq!(config.seed, 9);
        assert_eq!(config.colors, vec!["#ff0000", "#00ff00"]);
    }

    #[test]
    fn minimal_file_uses_defaults() {
        let file = ConfigFile::from_toml_str(r#"text = "hi""#).unwrap();
        assert_eq!(file.particles, 3000);
        assert_eq!(file.animation, AnimationKind::FadeIn);
        assert!(file.canvas.is_none());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let err = ConfigFile::from_toml_str("text = ").unwrap_err();
        assert!(matches!(err, GlyphError::TomlParseError(_)));
    }

    #[test]
    fn bundled_demo_configs_parse() {
        let hello = ConfigFile::from_toml_str(include_str!("../../../demos/hello.toml")).unwrap();
        assert_eq!(hello.canvas, Some(CanvasSize::new(640, 240)));
        assert_eq!(hello.to_builder().build().unwrap().colors.len(), 2);

        let goodbye =
            ConfigFile::from_toml_str(include_str!("../../../demos/goodbye.toml")).unwrap();
        assert_eq!(goodbye.animation, AnimationKind::FadeOut);
        assert_eq!(goodbye.tuning.fade_frames, 45);
        assert_eq!(goodbye.tuning.completion_ratio, 0.7);
    }
}
