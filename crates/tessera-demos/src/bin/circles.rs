//! Four circles in one buffer. Up/Down resize the first two through `subfill`;
//! Space toggles between drawing all four and `subrender` of the first two.

use tessera_demos::{Pending, get_or_create, run};
use tessera_engine::coords::ColorRgba;
use tessera_engine::core::{App, AppControl, FrameCtx};
use tessera_engine::input::Key;
use tessera_engine::render::ObjectBuffer;
use tessera_engine::scene::shapes::{Circle, Point};
use tessera_engine::scene::{PrimitiveKind, Shape};

const BACKGROUND: ColorRgba = ColorRgba::rgb(0.07, 0.07, 0.09);
const RADIUS_SPEED: f32 = 60.0; // px per second

struct Circles {
    objects: Vec<Shape>,
    radius: f32,
    show_all: bool,
    dirty: Pending,
    buffer: Option<ObjectBuffer>,
}

impl Circles {
    fn new() -> Self {
        let colors = [
            ColorRgba::rgb(0.95, 0.35, 0.30),
            ColorRgba::rgb(0.98, 0.78, 0.25),
            ColorRgba::rgb(0.30, 0.75, 0.55),
            ColorRgba::rgb(0.35, 0.55, 0.95).with_alpha(0.8),
        ];
        let objects = colors
            .iter()
            .enumerate()
            .map(|(i, &color)| {
                let x = 400.0 + (i as f32 - 1.5) * 120.0;
                Circle::new(Point::at(x, 300.0, color), 50.0).into()
            })
            .collect();

        Self {
            objects,
            radius: 50.0,
            show_all: true,
            dirty: Pending::default(),
            buffer: None,
        }
    }

    fn set_radius(&mut self, radius: f32) {
        let radius = radius.clamp(0.0, 200.0);
        if radius == self.radius {
            return;
        }
        self.radius = radius;
        for shape in &mut self.objects[..2] {
            if let Shape::Circle(c) = shape {
                c.radius = radius;
            }
        }
        self.dirty.mark();
    }
}

impl App for Circles {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }
        if ctx.input_frame.key_pressed(Key::Space) {
            self.show_all = !self.show_all;
            log::info!("drawing {}", if self.show_all { "all circles" } else { "first two" });
        }

        let step = RADIUS_SPEED * ctx.time.dt;
        if ctx.input.key_down(Key::ArrowDown) {
            self.set_radius(self.radius - step);
        }
        if ctx.input.key_down(Key::ArrowUp) {
            self.set_radius(self.radius + step);
        }

        let objects = &self.objects;
        let show_all = self.show_all;
        let dirty = &mut self.dirty;
        let slot = &mut self.buffer;

        ctx.render(BACKGROUND, |rctx, target| {
            let Some(buffer) = get_or_create(slot, "circle buffer", || {
                ObjectBuffer::create(rctx, PrimitiveKind::Circle, objects)
            }) else {
                return;
            };

            if dirty.take() {
                buffer.subfill(rctx, 0, &objects[..2]);
            }
            if show_all {
                buffer.render(rctx, target);
            } else {
                buffer.subrender(rctx, target, 0, 2);
            }
        })
    }

    fn on_exit(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            buffer.destroy();
        }
    }
}

fn main() -> anyhow::Result<()> {
    run("tessera · circles", Circles::new())
}
