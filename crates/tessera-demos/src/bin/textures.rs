//! Textured quads: a repeating checkerboard and a three-layer array texture.
//!
//! Keys: Space cycles array layers, R grows the array buffer by one quad,
//! Escape quits.

use tessera_demos::{checkerboard, get_or_create, run, tinted_layers};
use tessera_engine::coords::{ColorRgba, Vec2};
use tessera_engine::core::{App, AppControl, FrameCtx};
use tessera_engine::input::Key;
use tessera_engine::render::{Filter, ObjectBuffer, Texture, TextureDesc, TextureFormat, Wrap};
use tessera_engine::scene::shapes::{ArrayTexturedRect, Point, TexturedRect};
use tessera_engine::scene::{PrimitiveKind, Shape};

const BACKGROUND: ColorRgba = ColorRgba::rgb(0.12, 0.12, 0.14);
const LAYERS: u32 = 3;
const MAX_TILES: usize = 6;

#[derive(Default)]
struct Textures {
    layer_offset: u32,
    tiles: usize,
    grow: bool,
    relayer: bool,
    checker: Option<Texture>,
    layered: Option<Texture>,
    flat: Option<ObjectBuffer>,
    array: Option<ObjectBuffer>,
}

fn flat_objects(w: f32, h: f32) -> Vec<Shape> {
    let white = ColorRgba::white();
    vec![
        TexturedRect::new(Point::at(w * 0.3, h * 0.3, white), Vec2::splat(200.0)).into(),
        // Extent past 1.0 repeats the checkerboard.
        TexturedRect::new(Point::at(w * 0.7, h * 0.3, ColorRgba::rgb(1.0, 0.8, 0.6)), Vec2::splat(200.0))
            .with_region(Vec2::zero(), Vec2::splat(3.0))
            .rotated(0.3)
            .into(),
    ]
}

fn tile(index: usize, layer_offset: u32, w: f32, h: f32) -> Shape {
    let x = w * (index as f32 + 0.5) / MAX_TILES as f32;
    let layer = (index as u32 + layer_offset) % LAYERS;
    ArrayTexturedRect::new(Point::at(x, h * 0.75, ColorRgba::white()), Vec2::splat(100.0), layer).into()
}

fn tiles(count: usize, layer_offset: u32, w: f32, h: f32) -> Vec<Shape> {
    (0..count).map(|i| tile(i, layer_offset, w, h)).collect()
}

impl App for Textures {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }
        if ctx.input_frame.key_pressed(Key::Space) {
            self.layer_offset = (self.layer_offset + 1) % LAYERS;
            self.relayer = true;
        }
        if ctx.input_frame.key_pressed(Key::R) && self.tiles < MAX_TILES {
            self.grow = true;
        }

        let (w, h) = ctx.window.logical_size();
        let state = self;

        ctx.render(BACKGROUND, |rctx, target| {
            let Some(checker) = get_or_create(&mut state.checker, "checker texture", || {
                let pixels = checkerboard(64, 8, [40, 40, 48, 255], [230, 230, 220, 255]);
                let desc = TextureDesc::new(TextureFormat::Rgba8UnormSrgb, 64, 64)
                    .with_wrap(Wrap::Repeat, Wrap::Repeat);
                Texture::create(rctx, &desc, pixels.as_raw())
            }) else {
                return;
            };
            if let Some(flat) = get_or_create(&mut state.flat, "textured buffer", || {
                let mut buffer = ObjectBuffer::create(rctx, PrimitiveKind::Texture2D, &flat_objects(w, h))?;
                buffer.bind_texture(checker);
                Ok::<_, tessera_engine::Error>(buffer)
            }) {
                flat.render(rctx, target);
            }

            let Some(layered) = get_or_create(&mut state.layered, "array texture", || {
                let tints = [[220, 60, 60, 255], [60, 200, 90, 255], [70, 110, 230, 255]];
                let desc = TextureDesc::new(TextureFormat::Rgba8UnormSrgb, 32, 32)
                    .with_layers(LAYERS)
                    .with_filter(Filter::Nearest, Filter::Linear);
                Texture::create(rctx, &desc, &tinted_layers(32, &tints))
            }) else {
                return;
            };
            if state.array.is_none() {
                state.tiles = 2;
            }
            let (tiles_now, offset) = (state.tiles, state.layer_offset);
            let Some(array) = get_or_create(&mut state.array, "array buffer", || {
                let mut buffer = ObjectBuffer::create(
                    rctx,
                    PrimitiveKind::Texture2DArray,
                    &tiles(tiles_now, offset, w, h),
                )?;
                buffer.bind_texture(layered);
                Ok::<_, tessera_engine::Error>(buffer)
            }) else {
                return;
            };

            if std::mem::take(&mut state.grow) {
                let old = array.capacity();
                match array.resize(rctx, old + 1, true) {
                    Ok(()) => {
                        array.subfill(rctx, old, &[tile(old, offset, w, h)]);
                        state.tiles = old + 1;
                    }
                    Err(err) => log::error!("resize failed: {err}"),
                }
            }
            if std::mem::take(&mut state.relayer) {
                array.fill(rctx, &tiles(array.capacity(), offset, w, h));
            }
            array.render(rctx, target);
        })
    }

    fn on_exit(&mut self) {
        for buffer in [self.flat.take(), self.array.take()].into_iter().flatten() {
            buffer.destroy();
        }
        for texture in [self.checker.take(), self.layered.take()].into_iter().flatten() {
            texture.destroy();
        }
    }
}

fn main() -> anyhow::Result<()> {
    run("tessera · textures", Textures::default())
}
