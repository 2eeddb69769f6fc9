use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use sketch_common::{ConfigError, SketchConfig};
use sketch_render::{HostContainer, PerspectiveCamera, RenderSurface, Renderer};
use sketch_scene::Scene;

use crate::clock::{Clock, FrameTime, MonotonicTime, TimeSource};
use crate::stats::LoopStats;
use crate::ticker::{Subscription, Ticker};
use crate::timestep::FixedTimestep;

/// Frame callback: receives the frame's `(delta, elapsed)` and the scene.
pub type UpdateFn = Box<dyn FnMut(FrameTime, &mut Scene)>;

/// Optional variable-rate and fixed-rate callbacks, fixed at construction.
#[derive(Default)]
pub struct Callbacks {
    on_update: Option<UpdateFn>,
    on_fixed_update: Option<UpdateFn>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs once per tick, before fixed updates.
    pub fn on_update(mut self, f: impl FnMut(FrameTime, &mut Scene) + 'static) -> Self {
        self.on_update = Some(Box::new(f));
        self
    }

    /// Runs once per whole fixed interval accumulated. Every call within one
    /// tick receives that tick's `FrameTime`.
    pub fn on_fixed_update(mut self, f: impl FnMut(FrameTime, &mut Scene) + 'static) -> Self {
        self.on_fixed_update = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_update", &self.on_update.is_some())
            .field("on_fixed_update", &self.on_fixed_update.is_some())
            .finish()
    }
}

/// Lifecycle state of a sketch's loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub time: FrameTime,
    pub fixed_steps: u64,
    pub dropped_steps: u64,
}

/// Everything the tick closure touches.
struct Stage<R, T: TimeSource> {
    clock: Clock<T>,
    timestep: FixedTimestep,
    callbacks: Callbacks,
    scene: Scene,
    camera: PerspectiveCamera,
    surface: RenderSurface,
    renderer: R,
    stats: LoopStats,
    last_report: Option<TickReport>,
}

impl<R: Renderer, T: TimeSource> Stage<R, T> {
    fn tick(&mut self) -> TickReport {
        let time = self.clock.sample();

        if let Some(on_update) = self.callbacks.on_update.as_mut() {
            on_update(time, &mut self.scene);
        }

        let owed = self.timestep.advance(time.delta);
        if let Some(on_fixed_update) = self.callbacks.on_fixed_update.as_mut() {
            for _ in 0..owed.steps {
                on_fixed_update(time, &mut self.scene);
            }
        }
        if owed.dropped > 0 {
            tracing::warn!(
                dropped = owed.dropped,
                limit = ?self.timestep.max_steps(),
                delta = time.delta,
                "fixed update backlog exceeded per-frame limit; steps dropped"
            );
        }

        self.renderer
            .render(&self.scene, &self.camera, &self.surface);

        self.stats.record(time.delta, owed.steps, owed.dropped);
        tracing::trace!(
            delta = time.delta,
            elapsed = time.elapsed,
            steps = owed.steps,
            "tick"
        );

        let report = TickReport {
            time,
            fixed_steps: owed.steps,
            dropped_steps: owed.dropped,
        };
        self.last_report = Some(report);
        report
    }

    fn apply_size(&mut self) {
        let size = self.surface.size();
        self.camera.set_aspect_from(size.width, size.height);
        self.renderer.resize(&self.surface);
    }
}

/// A render sketch: surface, camera and scene driven by a fixed-timestep loop.
///
/// Starts `Stopped`. `resume` subscribes one tick callback to the ticker;
/// `pause` drops that subscription. Each tick samples the clock, runs
/// `on_update` once, runs `on_fixed_update` once per whole fixed interval
/// accumulated, then renders once.
///
/// The clock is never reset: the first tick after a pause sees the whole
/// paused duration as its delta.
pub struct Sketch<R: Renderer + 'static, T: TimeSource + 'static = MonotonicTime> {
    // Declared first so the subscription is released before the stage.
    subscription: Option<Subscription>,
    ticker: Ticker,
    stage: Rc<RefCell<Stage<R, T>>>,
}

impl<R: Renderer + 'static> Sketch<R, MonotonicTime> {
    /// Build a sketch on wall-clock time.
    pub fn new<C: HostContainer + ?Sized>(
        container: &mut C,
        config: &SketchConfig,
        renderer: R,
        ticker: Ticker,
        callbacks: Callbacks,
    ) -> Result<Self, ConfigError> {
        Self::with_time_source(
            container,
            config,
            renderer,
            ticker,
            callbacks,
            MonotonicTime::new(),
        )
    }
}

impl<R: Renderer + 'static, T: TimeSource + 'static> Sketch<R, T> {
    /// Build a sketch on an explicit time source.
    pub fn with_time_source<C: HostContainer + ?Sized>(
        container: &mut C,
        config: &SketchConfig,
        renderer: R,
        ticker: Ticker,
        callbacks: Callbacks,
        time: T,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let surface = RenderSurface::initialize(container, &config.surface);
        let camera = PerspectiveCamera::new(&config.camera, surface.width(), surface.height());

        let mut stage = Stage {
            clock: Clock::new(time),
            timestep: FixedTimestep::new(
                config.fixed_update_interval,
                config.max_fixed_steps_per_frame,
            ),
            callbacks,
            scene: Scene::new(),
            camera,
            surface,
            renderer,
            stats: LoopStats::default(),
            last_report: None,
        };
        stage.renderer.resize(&stage.surface);

        tracing::debug!(
            interval = config.fixed_update_interval,
            max_steps = ?config.max_fixed_steps_per_frame,
            "sketch created"
        );

        Ok(Self {
            subscription: None,
            ticker,
            stage: Rc::new(RefCell::new(stage)),
        })
    }

    /// Start receiving ticks. No effect if already running.
    pub fn resume(&mut self) {
        if self.subscription.is_some() {
            tracing::debug!("resume ignored: already running");
            return;
        }
        let stage = Rc::downgrade(&self.stage);
        self.subscription = Some(self.ticker.add(move || {
            if let Some(stage) = stage.upgrade() {
                stage.borrow_mut().tick();
            }
        }));
        tracing::debug!("sketch resumed");
    }

    /// Stop receiving ticks. No effect if already stopped. A tick already in
    /// progress completes.
    pub fn pause(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
            tracing::debug!("sketch paused");
        }
    }

    pub fn state(&self) -> LoopState {
        if self.subscription.is_some() {
            LoopState::Running
        } else {
            LoopState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == LoopState::Running
    }

    /// Re-read the container size; the camera aspect and the renderer follow.
    pub fn resize<C: HostContainer + ?Sized>(&mut self, container: &C) {
        let mut stage = self.stage.borrow_mut();
        if stage.surface.resize(container) {
            stage.apply_size();
        }
    }

    /// The scene, for adding and removing drawables between ticks.
    ///
    /// Panics if called from inside a tick callback; callbacks receive the
    /// scene directly.
    pub fn scene(&self) -> RefMut<'_, Scene> {
        RefMut::map(self.stage.borrow_mut(), |stage| &mut stage.scene)
    }

    pub fn camera(&self) -> RefMut<'_, PerspectiveCamera> {
        RefMut::map(self.stage.borrow_mut(), |stage| &mut stage.camera)
    }

    pub fn surface(&self) -> Ref<'_, RenderSurface> {
        Ref::map(self.stage.borrow(), |stage| &stage.surface)
    }

    pub fn renderer(&self) -> RefMut<'_, R> {
        RefMut::map(self.stage.borrow_mut(), |stage| &mut stage.renderer)
    }

    pub fn stats(&self) -> LoopStats {
        self.stage.borrow().stats.clone()
    }

    /// Report from the most recent tick.
    pub fn last_tick(&self) -> Option<TickReport> {
        self.stage.borrow().last_report
    }

    /// Elapsed seconds as of the last tick.
    pub fn elapsed(&self) -> f64 {
        self.stage.borrow().clock.elapsed()
    }

    pub fn fixed_update_interval(&self) -> f64 {
        self.stage.borrow().timestep.interval()
    }
}

impl<R: Renderer + 'static, T: TimeSource + 'static> std::fmt::Debug for Sketch<R, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sketch")
            .field("state", &self.state())
            .field("ticker", &self.ticker)
            .finish_non_exhaustive()
    }
}
