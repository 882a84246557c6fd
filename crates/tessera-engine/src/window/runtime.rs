use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub resizable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "tessera".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
            resizable: true,
        }
    }
}

/// Runtime requests from the application, applied after the current callback.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    exit: bool,
}

impl RuntimeCtx {
    pub fn exit(&mut self) {
        self.exit = true;
    }
}

/// Entry point: opens one window and drives `app` until it exits or the
/// window closes.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState {
            config,
            gpu_init,
            app,
            window: None,
            exit_requested: false,
            init_error: None,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.init_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    input_frame: InputFrame,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    exit_requested: bool,
    init_error: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_resizable(self.config.resizable);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        WindowEntryTryBuilder {
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init)).context("GPU initialization failed")
            },
        }
        .try_build()
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            self.app.on_exit();
        }
        self.window = None;
        self.exit_requested = true;
        event_loop.exit();
    }

    fn redraw(&mut self) -> AppControl {
        let Some(entry) = self.window.as_mut() else {
            return AppControl::Exit;
        };
        let app = &mut self.app;
        let mut runtime_ctx = RuntimeCtx::default();

        let control = entry.with_mut(|fields| {
            let time = fields.clock.tick();
            let control = {
                let mut ctx = FrameCtx {
                    window: WindowCtx { window: fields.window },
                    gpu: fields.gpu,
                    input: fields.input_state,
                    input_frame: fields.input_frame,
                    time,
                    runtime: &mut runtime_ctx,
                };
                app.on_frame(&mut ctx)
            };
            fields.input_frame.clear();
            control
        });

        if runtime_ctx.exit { AppControl::Exit } else { control }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.window = Some(entry);
            }
            Err(err) => {
                log::error!("failed to create window: {err:#}");
                self.init_error = Some(err);
                self.shutdown(event_loop);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Demos animate continuously.
        event_loop.set_control_flow(ControlFlow::Poll);
        if let Some(entry) = &self.window {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }
        let Some(entry) = self.window.as_mut() else { return };

        entry.with_mut(|fields| {
            if let Some(ev) = translate_window_event(fields.window, &event) {
                fields.input_state.apply_event(fields.input_frame, ev);
            }
        });

        match &event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),

            WindowEvent::Resized(new_size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::RedrawRequested => {
                if self.redraw() == AppControl::Exit {
                    self.shutdown(event_loop);
                }
            }

            _ => {}
        }
    }
}
