//! Headless animation-to-PNG render command

use anyhow::{bail, Context, Result};
use glyphdust_core::{CanvasSize, Color};
use glyphdust_particles::AnimationKind;
use glyphdust_raster::{BlockRasterizer, LoadMode, SvgRasterizer, TextRasterizer};
use glyphdust_runtime::{
    AnimationConfig, AnimationEvent, ConfigFile, Controller, ControllerOptions, ControllerState,
    IntervalScheduler, VirtualClock,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const DEFAULT_CANVAS: CanvasSize = CanvasSize::new(640, 240);

pub struct RenderArgs {
    pub config: Option<PathBuf>,
    pub text: Option<String>,
    pub animation: Option<String>,
    pub output: PathBuf,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub frames: u32,
    pub trigger_at: u32,
    pub reset_at: Option<u32>,
    pub every: u32,
    pub background: Option<String>,
    pub font: Option<String>,
    pub blocks: bool,
}

pub fn run(args: RenderArgs) -> Result<()> {
    let mut session = Session::start(args)?;
    session.render()?;
    Ok(())
}

/// A controller driven by a virtual clock, kept alive across re-renders
pub struct Session {
    args: RenderArgs,
    controller: Controller,
    clock: VirtualClock,
    size: CanvasSize,
    ended: Arc<AtomicUsize>,
}

impl Session {
    pub fn start(args: RenderArgs) -> Result<Self> {
        let ended = Arc::new(AtomicUsize::new(0));
        let (config, size) = load_config(&args, &ended)?;

        let background = match &args.background {
            Some(hex) => Some(
                Color::parse_hex(hex).with_context(|| format!("Invalid background '{hex}'"))?,
            ),
            None => None,
        };
        let options = ControllerOptions::new(make_rasterizer(&args))
            .load_mode(LoadMode::Deferred)
            .scheduler(Box::new(IntervalScheduler::default()))
            .background(background);

        let controller = Controller::initialize(config, options);
        let mut session = Self {
            args,
            controller,
            clock: VirtualClock::new(Instant::now()),
            size,
            ended,
        };
        session.controller.observe_resize(size, session.clock.now());
        session.settle()?;
        Ok(session)
    }

    /// Re-read the config file and rebuild the particle field in place
    pub fn reload(&mut self) -> Result<()> {
        let (config, size) = load_config(&self.args, &self.ended)?;
        if size != self.size {
            self.size = size;
            self.controller.observe_resize(size, self.clock.now());
        }
        self.controller.set_config(config);
        self.settle()
    }

    /// Run the configured number of frames and write the selected ones.
    /// Returns how many files were written.
    pub fn render(&mut self) -> Result<usize> {
        let output = self.args.output.clone();
        std::fs::create_dir_all(&output)
            .with_context(|| format!("Failed to create {}", output.display()))?;

        let every = self.args.every.max(1);
        let ended_before = self.ended.load(Ordering::Relaxed);
        let mut written = 0;
        for frame in 0..self.args.frames {
            if frame == self.args.trigger_at {
                self.controller.trigger();
            }
            if Some(frame) == self.args.reset_at {
                self.controller.reset();
            }
            let now = self.clock.tick();
            if self.controller.pump(now) == 0 {
                log::debug!("no frame delivered at tick {}", self.clock.ticks());
            }
            if frame % every == 0 {
                let path = frame_path(&output, frame);
                self.controller
                    .canvas()
                    .save_png(&path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                written += 1;
            }
        }

        let ended = self.ended.load(Ordering::Relaxed) - ended_before;
        let config = self.controller.config();
        println!(
            "Rendered {} frame(s) of \"{}\" ({}, {}x{}, font {:.1}px) to {}",
            written,
            config.text,
            config.kind,
            self.size.width,
            self.size.height,
            self.controller.font_size().unwrap_or(0.0),
            output.display()
        );
        if ended > 0 {
            println!("Animation ended {ended} time(s)");
        } else {
            println!("Animation still running after {} frame(s)", self.args.frames);
        }
        Ok(written)
    }

    /// Let the pending resize or rebuild go through, then check a field is live
    fn settle(&mut self) -> Result<()> {
        // Jump straight to the moment a pending resize settles
        let wait = self
            .controller
            .time_until_resize(self.clock.now())
            .unwrap_or(Duration::ZERO);
        let now = self.clock.advance(wait);
        self.controller.pump(now);

        let failure = self.controller.drain_events().into_iter().rev().find_map(|e| match e {
            AnimationEvent::RasterFailed { message, .. } => Some(message),
            _ => None,
        });
        match (self.controller.state(), failure) {
            (ControllerState::Running, _) => Ok(()),
            (_, Some(message)) => bail!("Could not build the particle field: {message}"),
            (state, None) => bail!("Could not build the particle field (controller {state})"),
        }
    }
}

fn load_config(
    args: &RenderArgs,
    ended: &Arc<AtomicUsize>,
) -> Result<(AnimationConfig, CanvasSize)> {
    let file = match &args.config {
        Some(path) => Some(
            ConfigFile::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
        ),
        None => None,
    };

    let mut builder = match (&file, &args.text) {
        (Some(file), _) => file.to_builder(),
        (None, Some(text)) => AnimationConfig::builder(text.clone()),
        (None, None) => bail!("Nothing to render: pass --config or --text"),
    };
    if let Some(text) = &args.text {
        builder = builder.text(text.clone());
    }
    if let Some(animation) = &args.animation {
        let kind: AnimationKind = animation.parse()?;
        builder = builder.kind(kind);
    }

    let counter = ended.clone();
    let config = builder
        .on_animation_end(move |kind| {
            counter.fetch_add(1, Ordering::Relaxed);
            log::info!("{kind} animation ended");
        })
        .build()
        .context("Invalid animation config")?;

    let base = file.and_then(|f| f.canvas).unwrap_or(DEFAULT_CANVAS);
    let size = CanvasSize::new(
        args.width.unwrap_or(base.width),
        args.height.unwrap_or(base.height),
    );
    Ok((config, size))
}

fn make_rasterizer(args: &RenderArgs) -> Arc<dyn TextRasterizer> {
    if args.blocks {
        return Arc::new(BlockRasterizer::default());
    }
    let mut rasterizer = SvgRasterizer::new();
    if let Some(family) = &args.font {
        rasterizer = rasterizer.with_font_family(family.clone());
    }
    if rasterizer.font_count() == 0 {
        println!("Warning: no system fonts found; use --blocks to render without fonts");
    }
    Arc::new(rasterizer)
}

fn frame_path(dir: &Path, frame: u32) -> PathBuf {
    dir.join(format!("frame_{frame:05}.png"))
}
