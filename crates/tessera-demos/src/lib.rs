//! Helpers shared by the demo binaries.

use anyhow::Result;
use image::{Rgba, RgbaImage};
use tessera_engine::core::App;
use tessera_engine::device::GpuInit;
use tessera_engine::logging::{LoggingConfig, init_logging};
use tessera_engine::window::{Runtime, RuntimeConfig};

/// Initializes logging and runs `app` in an 800x600 window titled `title`.
pub fn run<A: App + 'static>(title: &str, app: A) -> Result<()> {
    init_logging(LoggingConfig::default());
    let config = RuntimeConfig {
        title: title.to_string(),
        ..RuntimeConfig::default()
    };
    Runtime::run(config, GpuInit::default(), app)
}

/// Returns the value in `slot`, creating it first if empty.
///
/// Creation failures are logged and leave the slot empty, so the next frame
/// retries.
pub fn get_or_create<'a, T, E: std::fmt::Display>(
    slot: &'a mut Option<T>,
    what: &str,
    create: impl FnOnce() -> std::result::Result<T, E>,
) -> Option<&'a mut T> {
    if slot.is_none() {
        match create() {
            Ok(value) => *slot = Some(value),
            Err(err) => {
                log::error!("failed to create {what}: {err}");
                return None;
            }
        }
    }
    slot.as_mut()
}

/// A change waiting for upload.
///
/// Taken from inside the draw callback, so it survives frames the surface skips.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Pending(bool);

impl Pending {
    pub fn mark(&mut self) {
        self.0 = true;
    }

    pub fn is_set(&self) -> bool {
        self.0
    }

    /// Returns whether a change was pending and clears it.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.0)
    }
}

/// A `size`x`size` checkerboard of `cells` squares per side.
pub fn checkerboard(size: u32, cells: u32, a: [u8; 4], b: [u8; 4]) -> RgbaImage {
    let cell = (size / cells.max(1)).max(1);
    RgbaImage::from_fn(size, size, |x, y| {
        if ((x / cell) + (y / cell)) % 2 == 0 { Rgba(a) } else { Rgba(b) }
    })
}

/// Concatenated RGBA layers for an array texture, one tint per layer.
pub fn tinted_layers(size: u32, tints: &[[u8; 4]]) -> Vec<u8> {
    tints
        .iter()
        .flat_map(|&tint| checkerboard(size, 8, tint, [255, 255, 255, 255]).into_raw())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_alternates() {
        let img = checkerboard(4, 2, [0, 0, 0, 255], [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(2, 0).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(2, 2).0, [0, 0, 0, 255]);
    }

    #[test]
    fn layers_are_tightly_packed() {
        let data = tinted_layers(16, &[[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255]]);
        assert_eq!(data.len(), 3 * 16 * 16 * 4);
    }

    #[test]
    fn pending_survives_until_taken() {
        let mut pending = Pending::default();
        assert!(!pending.take());

        pending.mark();
        // A skipped frame never reaches the draw callback.
        assert!(pending.is_set());
        assert!(pending.take());
        assert!(!pending.take());
    }

    #[test]
    fn get_or_create_retries_after_failure() {
        let mut slot: Option<u32> = None;
        assert!(get_or_create(&mut slot, "value", || Err::<u32, _>("boom")).is_none());
        assert_eq!(get_or_create(&mut slot, "value", || Ok::<_, String>(7)).copied(), Some(7));
        assert_eq!(get_or_create(&mut slot, "value", || Ok::<_, String>(9)).copied(), Some(7));
    }
}
