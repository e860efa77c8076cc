//! Reactive controller: sizing, rasterization, emitter generations and the frame loop

use crate::config::AnimationConfig;
use crate::debounce::{ResizeDebouncer, RESIZE_QUIET_PERIOD};
use crate::event_bus::{AnimationEvent, EventBus};
use crate::frame::{FrameLoop, FrameScheduler, IntervalScheduler};
use glyphdust_core::{CanvasSize, Color, Generation, Vec2};
use glyphdust_particles::{
    AnimationHandlers, AnimationKind, BehaviourParams, ColorBehaviour, Emitter, EmitterConfig,
    EmitterEvent, FadeIn, FadeOut, ParticleEngine, TextZone,
};
use glyphdust_raster::{
    ImageHandle, ImageStore, LoadMode, RasterOutput, RasterRequest, RasterTask, TextRasterizer,
};
use glyphdust_render::{Canvas, SpriteRenderer};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Where the controller is in its build cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Waiting for the first settled size
    Uninitialized,
    /// Canvas sized; rasterization not started (or the canvas has no area)
    Sizing,
    /// Waiting for the image-ready event
    Rasterizing,
    /// A particle field is live
    Running,
    /// Everything released; the controller does nothing more
    TornDown,
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControllerState::Uninitialized => "uninitialized",
            ControllerState::Sizing => "sizing",
            ControllerState::Rasterizing => "rasterizing",
            ControllerState::Running => "running",
            ControllerState::TornDown => "torn-down",
        };
        f.write_str(name)
    }
}

/// Host services the controller consumes
pub struct ControllerOptions {
    pub rasterizer: Arc<dyn TextRasterizer>,
    pub load_mode: LoadMode,
    pub scheduler: Box<dyn FrameScheduler>,
    pub resize_quiet: Duration,
    /// Canvas fill behind the particles; transparent when `None`
    pub background: Option<Color>,
}

impl ControllerOptions {
    pub fn new(rasterizer: Arc<dyn TextRasterizer>) -> Self {
        Self {
            rasterizer,
            load_mode: LoadMode::default(),
            scheduler: Box::new(IntervalScheduler::default()),
            resize_quiet: RESIZE_QUIET_PERIOD,
            background: None,
        }
    }

    pub fn load_mode(mut self, mode: LoadMode) -> Self {
        self.load_mode = mode;
        self
    }

    pub fn scheduler(mut self, scheduler: Box<dyn FrameScheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn resize_quiet(mut self, quiet: Duration) -> Self {
        self.resize_quiet = quiet;
        self
    }

    pub fn background(mut self, color: Option<Color>) -> Self {
        self.background = color;
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveField {
    generation: Generation,
    handlers: AnimationHandlers,
}

/// Control handle for one animated text canvas.
///
/// Single-threaded and cooperative: the host reports size changes through
/// [`Controller::observe_resize`] and calls [`Controller::pump`] regularly;
/// everything else (debounce, rasterization results, frames) happens there.
pub struct Controller {
    state: ControllerState,
    config: AnimationConfig,
    rasterizer: Arc<dyn TextRasterizer>,
    load_mode: LoadMode,
    scheduler: Box<dyn FrameScheduler>,
    frame_loop: FrameLoop,
    debouncer: ResizeDebouncer,
    canvas: Canvas,
    renderer: SpriteRenderer,
    engine: ParticleEngine,
    images: ImageStore,
    current_image: Option<ImageHandle>,
    /// Generation of the most recent rebuild
    latest: Generation,
    active: Option<ActiveField>,
    task: Option<RasterTask>,
    font_size: Option<f32>,
    initialized: bool,
    events: EventBus,
}

impl Controller {
    /// Create the control handle. Nothing is built until a size settles.
    pub fn initialize(config: AnimationConfig, options: ControllerOptions) -> Self {
        log::info!(
            "[runtime] controller created: {} \"{}\" x{}",
            config.kind,
            config.text,
            config.particle_count
        );
        Self {
            state: ControllerState::Uninitialized,
            config,
            rasterizer: options.rasterizer,
            load_mode: options.load_mode,
            scheduler: options.scheduler,
            frame_loop: FrameLoop::new(),
            debouncer: ResizeDebouncer::new(options.resize_quiet),
            canvas: Canvas::new(CanvasSize::default()),
            renderer: SpriteRenderer::new(options.background),
            engine: ParticleEngine::new(),
            images: ImageStore::new(),
            current_image: None,
            latest: Generation(0),
            active: None,
            task: None,
            font_size: None,
            initialized: false,
            events: EventBus::new(),
        }
    }

    /// Report a new container size. Applied once no further report arrives
    /// for the quiet period.
    pub fn observe_resize(&mut self, size: CanvasSize, now: Instant) {
        if self.debouncer.observe(size, now) {
            log::trace!("[runtime] resize to {}x{} pending", size.width, size.height);
        }
    }

    /// Replace the configuration. Once sized, this rebuilds like a resize.
    pub fn set_config(&mut self, config: AnimationConfig) {
        self.config = config;
        match self.state {
            ControllerState::Sizing | ControllerState::Rasterizing | ControllerState::Running => {
                log::debug!("[runtime] configuration changed, rebuilding");
                self.begin_rebuild();
            }
            ControllerState::Uninitialized | ControllerState::TornDown => {}
        }
    }

    /// Advance the controller to `now`: settle resizes, collect the raster
    /// result, run due frames. Returns how many frames were rendered.
    pub fn pump(&mut self, now: Instant) -> usize {
        if self.state == ControllerState::TornDown {
            return 0;
        }
        if let Some(size) = self.debouncer.poll(now) {
            self.canvas.resize(size);
            self.begin_rebuild();
        }
        self.poll_raster(now);
        self.run_due_frames(now)
    }

    /// Start the animation. No-op until the first build completes.
    pub fn trigger(&mut self) {
        let Some(active) = self.ready_field("trigger") else {
            return;
        };
        if let Some(emitter) = self.engine.emitter_mut(active.generation) {
            active.handlers.trigger(emitter);
        }
    }

    /// Return to the pre-trigger look without rebuilding. No-op until initialized.
    pub fn reset(&mut self) {
        let Some(active) = self.ready_field("reset") else {
            return;
        };
        if let Some(emitter) = self.engine.emitter_mut(active.generation) {
            active.handlers.reset(emitter);
        }
    }

    /// Release everything: frame loop, engine, size observer, image resource.
    /// Safe to call in any state, any number of times.
    pub fn teardown(&mut self) {
        if self.state == ControllerState::TornDown {
            return;
        }
        self.frame_loop.stop(self.scheduler.as_mut());
        self.engine.destroy();
        self.debouncer.disconnect();
        self.task = None;
        self.active = None;
        self.current_image = None;
        let released = self.images.clear();
        self.initialized = false;
        self.font_size = None;
        self.state = ControllerState::TornDown;
        log::info!("[runtime] torn down ({released} image(s) released)");
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// True once a field is live; enables `trigger` and `reset`
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Font size chosen by the last successful rasterization
    pub fn font_size(&self) -> Option<f32> {
        self.font_size
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn engine(&self) -> &ParticleEngine {
        &self.engine
    }

    /// Generation of the live field
    pub fn active_generation(&self) -> Option<Generation> {
        self.active.map(|a| a.generation)
    }

    /// Handle of the image backing the live (or last attempted) field
    pub fn current_image(&self) -> Option<ImageHandle> {
        self.current_image
    }

    /// Image resources not yet revoked
    pub fn live_images(&self) -> usize {
        self.images.live_count()
    }

    pub fn is_frame_loop_running(&self) -> bool {
        self.frame_loop.is_running()
    }

    /// Frames rendered since creation
    pub fn frames(&self) -> u64 {
        self.frame_loop.frames()
    }

    /// Pending debounced resize, if any, and how long until it settles
    pub fn time_until_resize(&self, now: Instant) -> Option<Duration> {
        self.debouncer.time_until_apply(now)
    }

    pub fn drain_events(&mut self) -> Vec<AnimationEvent> {
        self.events.drain()
    }

    fn ready_field(&self, op: &str) -> Option<ActiveField> {
        if !self.initialized {
            log::debug!("[runtime] {op} ignored: not initialized ({})", self.state);
            return None;
        }
        self.active
    }

    /// Tear down the current generation's particles and rasterize for the next one
    fn begin_rebuild(&mut self) {
        self.state = ControllerState::Sizing;
        // The old generation is gone before the next one is rasterized;
        // trigger and reset stay disabled until it goes live
        if let Some(previous) = self.active.take() {
            self.engine.remove_emitter(previous.generation);
            log::debug!("[runtime] {}: unregistered", previous.generation);
        }
        self.initialized = false;
        // Dropping an in-flight task cancels it
        self.task = None;
        self.latest = self.latest.next();

        let size = self.canvas.size();
        if size.is_empty() {
            log::warn!(
                "[runtime] {}: canvas {}x{} has no area, waiting for a resize",
                self.latest,
                size.width,
                size.height
            );
            return;
        }

        log::debug!(
            "[runtime] {}: rasterizing \"{}\" at {}x{}",
            self.latest,
            self.config.text,
            size.width,
            size.height
        );
        self.task = Some(RasterTask::spawn(
            self.latest,
            RasterRequest::new(self.config.text.clone(), size),
            self.rasterizer.clone(),
            self.load_mode,
        ));
        self.state = ControllerState::Rasterizing;
    }

    fn poll_raster(&mut self, now: Instant) {
        let Some(task) = self.task.as_mut() else {
            return;
        };
        let Some(result) = task.poll() else {
            return;
        };
        let generation = task.generation();
        self.task = None;

        if generation != self.latest {
            log::debug!("[runtime] dropping stale raster result for {generation}");
            return;
        }
        match result {
            Ok(output) => self.on_image_ready(generation, output, now),
            Err(e) => self.raster_failed(generation, e.to_string()),
        }
    }

    fn raster_failed(&mut self, generation: Generation, message: String) {
        log::warn!("[runtime] {generation}: rasterization failed: {message}");
        self.events.push(AnimationEvent::RasterFailed {
            generation,
            message,
        });
    }

    fn on_image_ready(&mut self, generation: Generation, output: RasterOutput, now: Instant) {
        if let Some(previous) = self.current_image.take() {
            self.images.revoke(previous);
        }
        let handle = self.images.insert(output.image);
        self.current_image = Some(handle);

        let Some(image) = self.images.get(handle) else {
            return;
        };
        let zone = match TextZone::from_image(&image, Vec2::ZERO, 0) {
            Ok(zone) => Arc::new(zone),
            Err(e) => {
                self.raster_failed(generation, e.to_string());
                return;
            }
        };

        let emitter = self.build_emitter(generation, zone);
        let handlers = AnimationHandlers::new(self.config.kind);
        self.engine.add_emitter(emitter);
        if let Some(emitter) = self.engine.emitter_mut(generation) {
            handlers.initialize(emitter);
        }
        self.active = Some(ActiveField {
            generation,
            handlers,
        });

        self.frame_loop.start(self.scheduler.as_mut(), now);
        self.initialized = true;
        self.font_size = Some(output.font_size);
        self.state = ControllerState::Running;

        let size = self.canvas.size();
        log::info!(
            "[runtime] {generation}: {} field live at {}x{}, font size {:.1}px",
            self.config.kind,
            size.width,
            size.height,
            output.font_size
        );
        self.events.push(AnimationEvent::Built {
            generation,
            size,
            font_size: output.font_size,
        });
    }

    fn build_emitter(&self, generation: Generation, zone: Arc<TextZone>) -> Emitter {
        let config = &self.config;
        let size = self.canvas.size();
        let params = BehaviourParams {
            canvas: size,
            radius: config.radius,
            speed: config.speed,
            particle_count: config.particle_count,
            tuning: config.tuning,
        };
        let mut emitter = Emitter::new(
            generation,
            EmitterConfig {
                rate: config.particle_count,
                spawn_zone: size.rect().expand(config.tuning.spawn_margin),
                seed: config.seed,
            },
        );
        emitter.add_behaviour(Box::new(ColorBehaviour::from_hex(&config.colors)));
        match config.kind {
            AnimationKind::FadeIn => emitter.add_behaviour(Box::new(FadeIn::new(zone, params))),
            AnimationKind::FadeOut => emitter.add_behaviour(Box::new(FadeOut::new(zone, params))),
        }
        emitter
    }

    fn run_due_frames(&mut self, now: Instant) -> usize {
        let mut rendered = 0;
        for request in self.scheduler.take_due(now) {
            if self
                .frame_loop
                .accept(request, self.scheduler.as_mut(), now)
            {
                self.render_frame();
                rendered += 1;
            }
        }
        rendered
    }

    fn render_frame(&mut self) {
        let active = self.active.map(|a| a.generation);
        for (generation, event) in self.engine.update() {
            if Some(generation) != active {
                continue;
            }
            let EmitterEvent::AnimationEnded(kind) = event;
            log::info!("[runtime] {generation}: {kind} animation ended");
            if let Some(callback) = &self.config.on_animation_end {
                callback(kind);
            }
            self.events.push(AnimationEvent::Ended { generation, kind });
        }
        let sprites = self.engine.pack_sprites();
        self.renderer.render(&mut self.canvas, sprites);
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.teardown();
    }
}
