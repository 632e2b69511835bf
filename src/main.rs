//! Main entry point for the geometry viewer.
//!
//! This module handles:
//! - Command-line argument parsing
//! - Window creation and event loop
//! - Per-frame time updates and graceful shutdown
//!
//! # Architecture
//! The main function follows a clear initialization-loop-cleanup pattern:
//! 1. Parse arguments and load the geometry file
//! 2. Initialize GPU context and renderer
//! 3. Drive the per-frame step through a tick scheduler from the event loop
//!
//! # Event Handling
//! - Q/Escape or window close: exit application
//! - Window resize: reconfigure the surface

use clap::Parser;
use geometry_renderer::{
    frame::FrameOutcome,
    geometry::load_geometry,
    gpu::{GpuContext, LogNotifications},
    scheduler::TickScheduler,
    Renderer,
};
use std::{path::PathBuf, sync::Arc, time::Instant};
use winit::{
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

const DEFAULT_WINDOW_WIDTH: u32 = 640;
const DEFAULT_WINDOW_HEIGHT: u32 = 640;

#[derive(Parser, Debug)]
#[command(name = "geometry_renderer")]
#[command(about = "Renders instances of a text-format geometry file via dynamic uniform offsets")]
struct Args {
    /// Path to the geometry file ([points] / [indices] sections)
    #[arg(default_value = "assets/triangles.geom")]
    geometry: PathBuf,

    /// Number of instances to draw from the shared uniform buffer
    #[arg(long, default_value = "2")]
    instances: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mesh = load_geometry(&args.geometry)?;

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Geometry Renderer")
        .with_inner_size(winit::dpi::PhysicalSize::new(
            DEFAULT_WINDOW_WIDTH,
            DEFAULT_WINDOW_HEIGHT,
        ))
        .build(&event_loop)?;

    let gpu = pollster::block_on(GpuContext::new())?;
    let notifications = Arc::new(LogNotifications);
    gpu.install_error_handler(notifications.clone());
    gpu.notify_when_idle(notifications);

    let mut renderer = Renderer::new(&window, &gpu, &mesh, args.instances)?;
    let mut scheduler = TickScheduler::new();
    let started = Instant::now();

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::Resized(physical_size) => {
                    renderer.resize(&gpu, physical_size);
                }
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key,
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                } => {
                    if let winit::keyboard::PhysicalKey::Code(code) = physical_key {
                        match code {
                            winit::keyboard::KeyCode::KeyQ | winit::keyboard::KeyCode::Escape => {
                                elwt.exit();
                            }
                            _ => {}
                        }
                    }
                }
                WindowEvent::RedrawRequested => {
                    let outcome = scheduler.tick(|| {
                        if let Err(err) = renderer.update_time(&gpu, started.elapsed().as_secs_f32())
                        {
                            log::error!("uniform update failed: {err}");
                            return FrameOutcome::Stopped;
                        }
                        match renderer.render_frame(&gpu) {
                            Ok(outcome) => outcome,
                            Err(err) => {
                                log::error!("render failed: {err}");
                                FrameOutcome::Stopped
                            }
                        }
                    });
                    if outcome == FrameOutcome::Stopped {
                        elwt.exit();
                    }
                }
                _ => {}
            },
            _ => {}
        }
    })?;

    Ok(())
}
