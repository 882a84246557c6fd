//! A squircle whose exponent sweeps from a four-pointed star (< 1) through an
//! ellipse (2) to a near-rectangle, driven by a fixed-step timer.

use std::f32::consts::TAU;

use tessera_demos::{get_or_create, run};
use tessera_engine::coords::{ColorRgba, Vec2};
use tessera_engine::core::{App, AppControl, FrameCtx};
use tessera_engine::input::Key;
use tessera_engine::render::ObjectBuffer;
use tessera_engine::scene::shapes::{Point, Squircle};
use tessera_engine::scene::{PrimitiveKind, Shape};
use tessera_engine::tessellate::Tessellation;
use tessera_engine::time::FixedTimer;

const BACKGROUND: ColorRgba = ColorRgba::rgb(0.02, 0.02, 0.06);
const PERIOD: f64 = 6.0; // seconds per sweep

struct SquircleStar {
    timer: FixedTimer,
    paused: bool,
    buffer: Option<ObjectBuffer>,
}

/// Exponent for phase `t` in [0, 1): 0.25 (star) up to 8 and back, log-spaced.
fn exponent_at(t: f32) -> f32 {
    let wave = 0.5 - 0.5 * (t * TAU).cos();
    (0.25f32.ln() + wave * (8.0f32.ln() - 0.25f32.ln())).exp()
}

fn shapes(width: f32, height: f32, exponent: f32, spin: f32) -> [Shape; 2] {
    let center = Point::at(width * 0.5, height * 0.5, ColorRgba::rgb(1.0, 0.85, 0.3));
    let halo = Point::at(width * 0.5, height * 0.5, ColorRgba::rgb(0.3, 0.4, 1.0).with_alpha(0.35));
    let size = width.min(height) * 0.6;
    [
        Squircle::new(halo, Vec2::splat(size * 1.15), 2.0).into(),
        Squircle::new(center, Vec2::splat(size), exponent).rotated(spin).into(),
    ]
}

impl App for SquircleStar {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }
        if ctx.input_frame.key_pressed(Key::Space) {
            self.paused = !self.paused;
        }
        if ctx.input_frame.key_pressed(Key::R) {
            self.timer.set(0.0);
        }
        if !self.paused {
            self.timer.tick();
        }

        let phase = (self.timer.get() / PERIOD).fract() as f32;
        let exponent = exponent_at(phase);
        let (w, h) = ctx.window.logical_size();
        let objects = shapes(w, h, exponent, phase * TAU * 0.25);
        let slot = &mut self.buffer;

        ctx.render(BACKGROUND, |rctx, target| {
            let quality = Tessellation { curve_segments: 256, ..Tessellation::default() };
            let Some(buffer) = get_or_create(slot, "squircle buffer", || {
                ObjectBuffer::with_tessellation(rctx, PrimitiveKind::Squircle, quality, &objects)
            }) else {
                return;
            };
            buffer.fill(rctx, &objects);
            buffer.render(rctx, target);
        })
    }

    fn on_exit(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            buffer.destroy();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let app = SquircleStar {
        timer: FixedTimer::from_hz(60.0),
        paused: false,
        buffer: None,
    };
    run("tessera · squircle star", app)
}
