//! Effect lifecycle: creation, run state, ticking and teardown
//!
//! The [`EffectStage`] owns the viewport registry, the event bus and every
//! effect instance. Creation resolves a viewport by name; an unresolvable
//! name is a silent no-op by contract, returning `None` with nothing
//! attached. Every instance gets the same lifecycle regardless of variant:
//! a cancellable run state instead of an unconditional frame loop, and a
//! uniform `destroy` that releases event subscriptions, detaches the
//! renderer output and drops the scene.

use crate::effect::{Effect, EffectKind, FrameContext};
use crate::events::{EventBus, StageEvent, Subscription, Topic};
use crate::scene::{EffectCamera, Scene};
use crate::viewport::{Viewport, ViewportRegistry};
use cgmath::Vector2;
use log::{debug, info};
use std::time::Instant;

/// Whether an instance's frame task is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Stopped,
}

/// Handle to one effect instance inside a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectId(usize);

impl EffectId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// One live effect: its variant, scene, subscriptions and render target
pub struct EffectInstance {
    viewport: String,
    effect: Box<dyn Effect>,
    scene: Scene,
    state: RunState,
    resize_sub: Subscription,
    pointer_sub: Subscription,
    pointer: Option<Vector2<f32>>,
    target_size: (u32, u32),
}

impl EffectInstance {
    /// Name of the viewport this instance renders into
    pub fn viewport(&self) -> &str {
        &self.viewport
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn run_state(&self) -> RunState {
        self.state
    }

    /// Pixel size of the renderer output, updated on resize events
    pub fn target_size(&self) -> (u32, u32) {
        self.target_size
    }

    pub fn effect_name(&self) -> &str {
        self.effect.name()
    }
}

/// Owner of all effect instances and the services they share
pub struct EffectStage {
    viewports: ViewportRegistry,
    bus: EventBus,
    instances: Vec<Option<EffectInstance>>,
    started: Instant,
    last_tick: Instant,
}

impl Default for EffectStage {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectStage {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            viewports: ViewportRegistry::new(),
            bus: EventBus::new(),
            instances: Vec::new(),
            started: now,
            last_tick: now,
        }
    }

    /// Registers a viewport effects can attach to
    pub fn register_viewport(&mut self, viewport: Viewport) {
        self.viewports.register(viewport);
    }

    pub fn viewports(&self) -> &ViewportRegistry {
        &self.viewports
    }

    /// Creates an effect against a named viewport
    ///
    /// Returns `None` without side effects if the name does not resolve;
    /// decorative effects abort silently rather than failing the host. On
    /// success the instance's geometry is fully built before this returns,
    /// its renderer output is attached to the viewport, and it starts in
    /// [`RunState::Running`].
    pub fn create(&mut self, viewport_name: &str, kind: EffectKind) -> Option<EffectId> {
        let label = kind.label();
        let Some(viewport) = self.viewports.resolve_mut(viewport_name) else {
            debug!(
                "viewport '{}' not found; skipping {} effect",
                viewport_name, label
            );
            return None;
        };

        let pixel_size = viewport.pixel_size();
        let aspect = viewport.aspect();
        viewport.attach();

        let mut effect = kind.instantiate();
        let mut scene = Scene::new(EffectCamera::new(effect.camera_distance(), aspect));
        effect.initialize_geometry(&mut scene);
        scene.update();

        let instance = EffectInstance {
            viewport: viewport_name.to_string(),
            effect,
            scene,
            state: RunState::Running,
            resize_sub: self.bus.subscribe(Topic::Resize),
            pointer_sub: self.bus.subscribe(Topic::Pointer),
            pointer: None,
            target_size: pixel_size,
        };

        let id = EffectId(self.instances.len());
        info!("created {} effect on viewport '{}'", label, viewport_name);
        self.instances.push(Some(instance));
        Some(id)
    }

    pub fn instance(&self, id: EffectId) -> Option<&EffectInstance> {
        self.instances.get(id.0)?.as_ref()
    }

    /// Number of live (not destroyed) instances
    pub fn instance_count(&self) -> usize {
        self.instances.iter().flatten().count()
    }

    /// Schedules an instance's frame task
    pub fn start(&mut self, id: EffectId) {
        if let Some(instance) = self.instances.get_mut(id.0).and_then(Option::as_mut) {
            instance.state = RunState::Running;
        }
    }

    /// Cancels an instance's frame task; its scene freezes in place
    pub fn stop(&mut self, id: EffectId) {
        if let Some(instance) = self.instances.get_mut(id.0).and_then(Option::as_mut) {
            instance.state = RunState::Stopped;
        }
    }

    /// Tears an instance down: releases its event subscriptions, detaches
    /// its renderer output from the viewport and drops its scene
    ///
    /// Every variant gets this; teardown is uniform by design. Returns
    /// whether anything was destroyed.
    pub fn destroy(&mut self, id: EffectId) -> bool {
        let Some(slot) = self.instances.get_mut(id.0) else {
            return false;
        };
        let Some(instance) = slot.take() else {
            return false;
        };

        self.bus.release(instance.resize_sub);
        self.bus.release(instance.pointer_sub);
        if let Some(viewport) = self.viewports.resolve_mut(&instance.viewport) {
            viewport.detach();
        }
        info!(
            "destroyed {} effect on viewport '{}'",
            instance.effect.name(),
            instance.viewport
        );
        true
    }

    /// Fans a window resize out to viewports and subscribed instances
    ///
    /// Synchronous and undebounced: each event triggers an immediate O(1)
    /// recomputation per viewport.
    pub fn notify_resize(&mut self, window_width: u32, window_height: u32, scale_factor: f32) {
        for viewport in self.viewports.iter_mut() {
            viewport.resize_from_window(window_width, window_height, scale_factor);
        }
        self.bus.publish(
            Topic::Resize,
            StageEvent::Resized {
                width: window_width,
                height: window_height,
            },
        );
    }

    /// Publishes a pointer position in normalized device coordinates
    pub fn notify_pointer(&mut self, x: f32, y: f32) {
        self.bus
            .publish(Topic::Pointer, StageEvent::PointerMoved { x, y });
    }

    /// Advances all running instances using wall-clock time
    pub fn tick(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).as_secs_f32();
        let elapsed = now.duration_since(self.started).as_secs_f32();
        self.last_tick = now;
        self.advance(dt, elapsed);
    }

    /// Advances all running instances by an explicit time step
    ///
    /// Split out from [`tick`](Self::tick) so updates can be stepped
    /// deterministically.
    pub fn advance(&mut self, dt: f32, elapsed: f32) {
        for slot in &mut self.instances {
            let Some(instance) = slot.as_mut() else {
                continue;
            };

            // Drain this instance's mailboxes before updating
            while let Some(event) = self.bus.poll(&instance.resize_sub) {
                if let StageEvent::Resized { .. } = event {
                    if let Some(viewport) = self.viewports.resolve(&instance.viewport) {
                        let (width, height) = viewport.pixel_size();
                        instance.target_size = (width, height);
                        instance.scene.camera.resize_projection(width, height);
                    }
                }
            }
            while let Some(event) = self.bus.poll(&instance.pointer_sub) {
                if let StageEvent::PointerMoved { x, y } = event {
                    instance.pointer = Some(Vector2::new(x, y));
                }
            }

            if instance.state != RunState::Running {
                continue;
            }

            let ctx = FrameContext {
                dt,
                elapsed,
                pointer: instance.pointer,
            };
            instance.effect.update_per_frame(&ctx, &mut instance.scene);
            instance.scene.update();
        }
    }

    /// Iterates live instances with their ids, in creation order
    pub fn iter(&self) -> impl Iterator<Item = (EffectId, &EffectInstance)> {
        self.instances
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|inst| (EffectId(i), inst)))
    }
}
