/// The viewer component: an explicit mount/unmount state machine around a
/// load -> frame -> animate sequence.
///
/// `StlViewer::mount` parses the attribute surface, builds the camera,
/// controls and rasterizer, and starts the asynchronous model load. The
/// host drives `frame` once per tick and `draw` afterwards; the returned
/// `ViewerHandle` owns the connected flag that stops the loop.
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use nalgebra::{Point3, Vector3};
use stlview_core::{Camera, DirectionalLight, Mesh, OrbitControls, Scene};

use crate::config::{AutoRotate, ConfigError, ViewerConfig};
use crate::framing;
use crate::indicator::LoadIndicator;
use crate::loader::{spawn_load, LoadEvent, LoadTask};
use crate::renderer::AsciiRenderer;

const CAMERA_FOV: f32 = 70.0 * std::f32::consts::PI / 180.0;
const CAMERA_NEAR: f32 = 1.0;
const CAMERA_FAR: f32 = 1000.0;

/// Surface size used until the host can be measured
const FALLBACK_SIZE: (u16, u16) = (80, 24);

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    /// Model load in flight; the indicator is visible
    Loading,
    /// Model framed and rendering each frame
    Animating,
    /// Load failed; the indicator shows the error until unmount
    Failed,
}

/// Handle returned by `mount`. Unmounting clears the shared connected flag;
/// the frame loop observes it and stops. A stopped viewer cannot be
/// restarted, remounting builds a fresh instance.
#[derive(Clone)]
pub struct ViewerHandle {
    connected: Arc<AtomicBool>,
}

impl ViewerHandle {
    pub fn unmount(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

pub struct StlViewer {
    camera: Camera,
    controls: OrbitControls,
    renderer: AsciiRenderer,
    scene: Scene,
    indicator: LoadIndicator,
    load: Option<LoadTask>,
    phase: Phase,
    connected: Arc<AtomicBool>,
    auto_rotate: AutoRotate,
    interacted: bool,
}

impl StlViewer {
    /// Mount the viewer: parse attributes, build the camera and rasterizer
    /// for the measured surface, and start loading the model.
    ///
    /// Fails with `ConfigError::MissingModel` before any camera or renderer
    /// is constructed when the required `model` attribute is absent.
    pub fn mount<'a, I>(attrs: I, measured: (u16, u16)) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let config = ViewerConfig::from_attributes(attrs)?;
        Ok(Self::mount_with_config(config, measured))
    }

    fn mount_with_config(config: ViewerConfig, measured: (u16, u16)) -> Self {
        let measurable = measured.0 > 0 && measured.1 > 0;

        // Degenerate surfaces get a square aspect and a minimal framebuffer
        // until a real measurement arrives
        let aspect = if measurable {
            measured.0 as f32 / measured.1 as f32
        } else {
            1.0
        };
        let surface = if measurable { measured } else { FALLBACK_SIZE };

        let camera = Camera::perspective(CAMERA_FOV, aspect, CAMERA_NEAR, CAMERA_FAR);
        let renderer = AsciiRenderer::new(surface.0 as usize, surface.1 as usize);

        let mut scene = Scene::new();
        scene.add_light(DirectionalLight::new(Vector3::new(0.0, -0.4, -1.0), 1.0));

        let load = spawn_load(PathBuf::from(&config.model_source));

        Self {
            camera,
            controls: OrbitControls::new(),
            renderer,
            scene,
            indicator: LoadIndicator::new(),
            load: Some(load),
            phase: Phase::Loading,
            connected: Arc::new(AtomicBool::new(true)),
            auto_rotate: config.auto_rotate,
            interacted: false,
        }
    }

    pub fn handle(&self) -> ViewerHandle {
        ViewerHandle {
            connected: self.connected.clone(),
        }
    }

    pub fn is_animating(&self) -> bool {
        self.phase == Phase::Animating
    }

    pub fn is_failed(&self) -> bool {
        self.phase == Phase::Failed
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Resize the rendering surface. A zero measurement on either axis is
    /// skipped. Idempotent under duplicate delivery: state is recomputed
    /// from the measurement, not from deltas.
    pub fn resize(&mut self, width: u16, height: u16) {
        if width == 0 || height == 0 {
            return;
        }
        if self.renderer.size() != (width as usize, height as usize) {
            self.renderer.resize(width as usize, height as usize);
        }
        self.camera.set_aspect(width as f32 / height as f32);
    }

    /// Orbit input from the host. The first interaction while animating
    /// permanently disables initial-only auto-rotation.
    pub fn interaction_started(&mut self) {
        if self.phase != Phase::Animating || self.interacted {
            return;
        }
        self.interacted = true;
        if matches!(self.auto_rotate, AutoRotate::InitialOnly(_)) {
            self.controls.auto_rotate = false;
        }
    }

    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.controls.rotate(delta_yaw, delta_pitch);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.controls.zoom(delta);
    }

    /// Advance one frame. Returns false, doing nothing, once the viewer is
    /// unmounted; the loop must not continue past that.
    pub fn frame(&mut self, measured: (u16, u16)) -> bool {
        if !self.connected.load(Ordering::SeqCst) {
            return false;
        }

        // Window-resize path: re-applied from the current measurement every
        // frame, alongside the event-driven path
        self.resize(measured.0, measured.1);

        match self.phase {
            Phase::Loading => {
                self.poll_load(measured);
                self.indicator.tick();
            }
            Phase::Animating => {
                self.controls.update(&mut self.camera);
                self.renderer.clear();
                self.renderer.render(&self.scene, &self.camera);
            }
            Phase::Failed => {}
        }

        true
    }

    fn poll_load(&mut self, measured: (u16, u16)) {
        let Some(task) = self.load.take() else { return };

        let mut outcome = None;
        while let Some(event) = task.try_next() {
            match event {
                LoadEvent::Progress { loaded, total } => {
                    self.indicator.set_progress(loaded, total);
                }
                LoadEvent::Complete(mesh) => {
                    outcome = Some(Ok(mesh));
                    break;
                }
                LoadEvent::Failed(error) => {
                    outcome = Some(Err(error));
                    break;
                }
            }
        }

        match outcome {
            None => self.load = Some(task),
            Some(Ok(mesh)) => self.finish_load(mesh, measured),
            Some(Err(error)) => {
                self.indicator.fail(error.to_string());
                self.phase = Phase::Failed;
            }
        }
    }

    /// Success path: center the model, back the camera off to frame it,
    /// apply the auto-rotation policy, and start animating.
    fn finish_load(&mut self, mut mesh: Mesh, measured: (u16, u16)) {
        framing::center_at_origin(&mut mesh);

        if let Some(sphere) = mesh.bounding_sphere() {
            self.controls
                .set_distance(framing::fit_distance(sphere.radius, self.camera.fov));
        }
        self.controls.target = Point3::origin();

        match self.auto_rotate {
            AutoRotate::Off => self.controls.auto_rotate = false,
            AutoRotate::Continuous(speed) | AutoRotate::InitialOnly(speed) => {
                self.controls.auto_rotate = true;
                self.controls.auto_rotate_speed = speed;
            }
        }

        self.scene.add_mesh(mesh);

        // Forced resize pass: the host may have changed size while loading
        self.resize(measured.0, measured.1);

        // Place the camera before the first rendered frame
        self.controls.update(&mut self.camera);

        self.phase = Phase::Animating;
    }

    /// Draw the current state: the model when animating, the indicator
    /// while loading or after a failure.
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        match self.phase {
            Phase::Animating => self.renderer.draw(writer),
            Phase::Loading | Phase::Failed => {
                let (w, h) = self.renderer.size();
                self.indicator.draw(writer, w as u16, h as u16)
            }
        }
    }

    /// Cancel an in-flight load. The terminal host uses this for eager
    /// teardown on quit; plain unmounting leaves the task to finish idle.
    pub fn abort_load(&mut self) {
        if let Some(task) = &self.load {
            task.cancel();
        }
        self.load = None;
    }
}
