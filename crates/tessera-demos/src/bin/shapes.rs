//! One object buffer per untextured kind, animated from a wall-clock timer.
//!
//! Keys: Space pauses, Escape quits.

use std::f32::consts::{PI, TAU};

use tessera_demos::{get_or_create, run};
use tessera_engine::coords::{ColorRgba, Vec2};
use tessera_engine::core::{App, AppControl, FrameCtx};
use tessera_engine::input::Key;
use tessera_engine::render::ObjectBuffer;
use tessera_engine::scene::shapes::{Line, Point, Rect, RoundRect, Triangle};
use tessera_engine::scene::{PrimitiveKind, Shape};
use tessera_engine::time::Timer;

const BACKGROUND: ColorRgba = ColorRgba::rgb(0.08, 0.08, 0.10);

const KINDS: [PrimitiveKind; 5] = [
    PrimitiveKind::RoundRect,
    PrimitiveKind::Rect,
    PrimitiveKind::Triangle,
    PrimitiveKind::Line,
    PrimitiveKind::Point,
];

struct Layer {
    kind: PrimitiveKind,
    buffer: Option<ObjectBuffer>,
}

struct Shapes {
    timer: Timer,
    paused_at: Option<f64>,
    layers: Vec<Layer>,
}

fn hue(t: f32) -> ColorRgba {
    let channel = |offset: f32| 0.5 + 0.5 * (TAU * (t + offset)).cos();
    ColorRgba::rgb(channel(0.0), channel(1.0 / 3.0), channel(2.0 / 3.0))
}

/// Object list for `kind` at time `t` seconds in a `w`x`h` window.
fn objects_for(kind: PrimitiveKind, t: f32, w: f32, h: f32) -> Vec<Shape> {
    match kind {
        PrimitiveKind::Point => (0..48)
            .map(|i| {
                let x = w * (i as f32 + 0.5) / 48.0;
                let y = h * 0.85 + 30.0 * (x * 0.02 + t * 2.0).sin();
                Point::at(x, y, ColorRgba::white()).into()
            })
            .collect(),
        PrimitiveKind::Line => (0..12)
            .map(|i| {
                let angle = t * 0.5 + i as f32 * TAU / 12.0;
                let center = Vec2::new(w * 0.8, h * 0.35);
                let tip = center + Vec2::new(90.0, 0.0).rotated(angle);
                let color = hue(i as f32 / 12.0);
                Line::new(
                    Point::at(center.x, center.y, color),
                    Point::at(tip.x, tip.y, color.with_alpha(0.0)),
                )
                .into()
            })
            .collect(),
        PrimitiveKind::Triangle => (0..3)
            .map(|i| {
                let c = Vec2::new(w * 0.2 + i as f32 * 70.0, h * 0.35);
                let spin = t + i as f32;
                let corner = |k: f32| {
                    let p = c + Vec2::new(0.0, -50.0).rotated(spin + k * TAU / 3.0);
                    Point::at(p.x, p.y, hue(k / 3.0 + i as f32 * 0.1).with_alpha(0.85))
                };
                Triangle::new(corner(0.0), corner(1.0), corner(2.0)).into()
            })
            .collect(),
        PrimitiveKind::Rect => (0..4)
            .map(|i| {
                let center = Point::at(w * 0.5, h * 0.35, hue(i as f32 * 0.25).with_alpha(0.5));
                Rect::new(center, Vec2::new(160.0 - i as f32 * 30.0, 90.0))
                    .rotated(t * (0.3 + i as f32 * 0.2))
                    .into()
            })
            .collect(),
        PrimitiveKind::RoundRect => (0..3)
            .map(|i| {
                let center = Point::at(w * (0.25 + i as f32 * 0.25), h * 0.65, hue(0.6 + i as f32 * 0.1));
                let radius = 6.0 + 20.0 * i as f32 * (0.5 + 0.5 * (t + i as f32 * PI / 3.0).sin());
                RoundRect::new(center, Vec2::new(140.0, 80.0), radius)
                    .rotated(-t * 0.2)
                    .into()
            })
            .collect(),
        _ => Vec::new(),
    }
}

impl App for Shapes {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }
        if ctx.input_frame.key_pressed(Key::Space) {
            match self.paused_at.take() {
                Some(t) => self.timer.set(t),
                None => self.paused_at = Some(self.timer.get()),
            }
        }

        let t = self.paused_at.unwrap_or_else(|| self.timer.get()) as f32;
        let (w, h) = ctx.window.logical_size();
        let scenes: Vec<Vec<Shape>> =
            self.layers.iter().map(|layer| objects_for(layer.kind, t, w, h)).collect();
        let layers = &mut self.layers;

        ctx.render(BACKGROUND, |rctx, target| {
            for (layer, objects) in layers.iter_mut().zip(&scenes) {
                let kind = layer.kind;
                let Some(buffer) = get_or_create(&mut layer.buffer, kind.label(), || {
                    ObjectBuffer::create(rctx, kind, objects)
                }) else {
                    continue;
                };
                buffer.fill(rctx, objects);
                buffer.render(rctx, target);
            }
        })
    }

    fn on_exit(&mut self) {
        for layer in &mut self.layers {
            if let Some(buffer) = layer.buffer.take() {
                buffer.destroy();
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let app = Shapes {
        timer: Timer::new(),
        paused_at: None,
        layers: KINDS.iter().map(|&kind| Layer { kind, buffer: None }).collect(),
    };
    run("tessera · shapes", app)
}
