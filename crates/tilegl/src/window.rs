//! Windowed preview loop for the tile bank.
//!
//! Static tiles draw on demand: the initial frame, resizes, and whatever the
//! platform asks to repaint. The interactive tile additionally schedules
//! frames while its hover animator is active and goes back to waiting once
//! the rig settles. Left/Right arrows step through the bank; cycle mode
//! advances on a timer. A tile whose shaders fail to build is logged and
//! skipped; the rest of the bank keeps working.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

use crate::animate::HoverAnimator;
use crate::gpu::GpuState;
use crate::tiles::TileSpec;
use crate::types::{Antialiasing, PreviewConfig};

/// Spaces animated redraws when an FPS cap is configured. A small grace
/// window keeps near-deadline wakeups from slipping a whole frame.
struct FramePacer {
    interval: Option<Duration>,
    next: Instant,
}

const PACER_GRACE: Duration = Duration::from_micros(250);

impl FramePacer {
    fn new(target_fps: Option<f32>) -> Self {
        let interval = target_fps
            .filter(|fps| *fps > 0.0)
            .map(|fps| Duration::from_secs_f32(1.0 / fps));
        Self {
            interval,
            next: Instant::now(),
        }
    }

    fn ready(&mut self, now: Instant) -> bool {
        let Some(interval) = self.interval else {
            return true;
        };
        if now + PACER_GRACE >= self.next {
            self.next = now + interval;
            true
        } else {
            false
        }
    }

    fn deadline(&self) -> Option<Instant> {
        self.interval.map(|_| self.next)
    }
}

struct BankState {
    window: Arc<Window>,
    specs: Vec<TileSpec>,
    index: usize,
    gpu: Option<GpuState>,
    animator: Option<HoverAnimator>,
    antialiasing: Antialiasing,
}

impl BankState {
    /// Swaps the window over to the tile at `index`. Returns false when the
    /// tile's shaders fail to build; the tile stays disabled.
    fn activate(&mut self, index: usize) -> bool {
        self.index = index;
        let spec = self.specs[index].clone();

        // Drop the old surface before creating a new one on the same window.
        if let Some(old) = self.gpu.take() {
            drop(old);
        }
        self.animator = spec
            .light_rigs()
            .map(|(resting, hover)| HoverAnimator::new(resting, hover));

        match GpuState::new(
            self.window.as_ref(),
            self.window.inner_size(),
            &spec,
            self.antialiasing,
        ) {
            Ok(gpu) => {
                self.gpu = Some(gpu);
                self.window.set_title(&format!("tileshade: {}", spec.id));
                self.window.request_redraw();
                tracing::info!(tile = %spec.id, "tile activated");
                true
            }
            Err(err) => {
                tracing::warn!(tile = %spec.id, error = %format!("{err:#}"), "tile disabled");
                false
            }
        }
    }

    /// Steps through the bank, skipping tiles that fail to initialize.
    fn advance(&mut self, step: isize) {
        let len = self.specs.len() as isize;
        let mut candidate = self.index as isize;
        for _ in 0..self.specs.len() {
            candidate = (candidate + step).rem_euclid(len);
            if self.activate(candidate as usize) {
                return;
            }
        }
        tracing::error!("no tile in the bank could be initialized");
    }

    fn animating(&self) -> bool {
        self.animator.as_ref().is_some_and(HoverAnimator::active)
    }

    fn redraw(&mut self, elwt: &EventLoopWindowTarget<()>) {
        if let Some(animator) = self.animator.as_mut() {
            animator.tick();
        }
        let rig = self.animator.as_ref().map(|animator| *animator.current());
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        match gpu.render(self.window.inner_size(), rig.as_ref()) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.resize(self.window.inner_size());
                self.window.request_redraw();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("surface out of memory; exiting");
                elwt.exit();
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("surface timeout; retrying next frame");
            }
            Err(wgpu::SurfaceError::Other) => {
                tracing::warn!("surface error; retrying next frame");
            }
        }
    }
}

/// Opens a preview window over the given tiles and drives it until closed.
/// With more than one tile, arrow keys step through the bank and `cycle`
/// rotates it on a timer.
pub fn run_preview(config: PreviewConfig, specs: Vec<TileSpec>) -> Result<()> {
    if specs.is_empty() {
        anyhow::bail!("no tiles to preview");
    }

    let event_loop = EventLoop::new().context("failed to initialize event loop")?;
    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let window = WindowBuilder::new()
        .with_title("tileshade")
        .with_inner_size(window_size)
        .build(&event_loop)
        .context("failed to create preview window")?;
    let window = Arc::new(window);

    let mut bank = BankState {
        window: window.clone(),
        specs,
        index: 0,
        gpu: None,
        animator: None,
        antialiasing: config.antialiasing,
    };
    if !bank.activate(0) {
        bank.advance(1);
    }
    if bank.gpu.is_none() {
        // Every tile failed to build; nothing to show. The failures are
        // already logged, so leave quietly instead of erroring the process.
        return Ok(());
    }

    let mut pacer = FramePacer::new(config.target_fps);
    let mut next_switch = config.cycle.map(|interval| Instant::now() + interval);

    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Wait);

            match event {
                Event::WindowEvent { window_id, event } if window_id == window.id() => {
                    match event {
                        WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                            elwt.exit();
                        }
                        WindowEvent::CursorEntered { .. } => {
                            if let Some(animator) = bank.animator.as_mut() {
                                animator.pointer_enter();
                                window.request_redraw();
                            }
                        }
                        WindowEvent::CursorLeft { .. } => {
                            if let Some(animator) = bank.animator.as_mut() {
                                animator.pointer_leave();
                                window.request_redraw();
                            }
                        }
                        WindowEvent::KeyboardInput {
                            event:
                                KeyEvent {
                                    logical_key,
                                    state: ElementState::Pressed,
                                    ..
                                },
                            ..
                        } => match logical_key {
                            Key::Named(NamedKey::ArrowRight) => bank.advance(1),
                            Key::Named(NamedKey::ArrowLeft) => bank.advance(-1),
                            Key::Named(NamedKey::Escape) => elwt.exit(),
                            _ => {}
                        },
                        WindowEvent::Resized(new_size) => {
                            if let Some(gpu) = bank.gpu.as_mut() {
                                gpu.resize(new_size);
                            }
                            window.request_redraw();
                        }
                        WindowEvent::ScaleFactorChanged {
                            mut inner_size_writer,
                            ..
                        } => {
                            // Keep the current logical size when the scale factor changes.
                            if let Some(gpu) = bank.gpu.as_ref() {
                                let _ = inner_size_writer.request_inner_size(gpu.size());
                            }
                        }
                        WindowEvent::RedrawRequested => {
                            bank.redraw(elwt);
                        }
                        _ => {}
                    }
                }
                Event::AboutToWait => {
                    let now = Instant::now();
                    let mut wake: Option<Instant> = None;

                    if let Some(at) = next_switch {
                        if now >= at {
                            bank.advance(1);
                            let interval = config.cycle.expect("cycle interval set");
                            next_switch = Some(now + interval);
                        }
                        wake = next_switch;
                    }

                    // Only the interactive tile schedules frames, and only
                    // while its rig is away from the target.
                    if bank.animating() {
                        if pacer.ready(now) {
                            window.request_redraw();
                        } else if let Some(deadline) = pacer.deadline() {
                            wake = Some(wake.map_or(deadline, |at| at.min(deadline)));
                        }
                    }

                    if let Some(at) = wake {
                        elwt.set_control_flow(ControlFlow::WaitUntil(at));
                    }
                }
                _ => {}
            }
        })
        .map_err(|err| anyhow!("event loop error: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncapped_pacer_is_always_ready() {
        let mut pacer = FramePacer::new(None);
        let now = Instant::now();
        assert!(pacer.ready(now));
        assert!(pacer.ready(now));
        assert!(pacer.deadline().is_none());
    }

    #[test]
    fn capped_pacer_spaces_frames() {
        let mut pacer = FramePacer::new(Some(10.0));
        let start = Instant::now();
        assert!(pacer.ready(start));
        // Immediately after a frame the next one is not due yet.
        assert!(!pacer.ready(start + Duration::from_millis(1)));
        assert!(pacer.ready(start + Duration::from_millis(100)));
    }

    #[test]
    fn zero_fps_means_uncapped() {
        let mut pacer = FramePacer::new(Some(0.0));
        assert!(pacer.ready(Instant::now()));
        assert!(pacer.deadline().is_none());
    }
}
