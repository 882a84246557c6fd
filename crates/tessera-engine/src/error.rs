//! Error taxonomy for object buffers and textures.
//!
//! Two classes:
//! - [`Error`]: recoverable failures (`Allocation`, `OutOfMemory`, `Format`)
//!   returned to the caller.
//! - [`ContractViolation`]: caller programming errors. These panic in debug builds;
//!   release builds log them and skip the offending operation.

use thiserror::Error;

use crate::scene::PrimitiveKind;

/// Recoverable object buffer / texture failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// GPU storage could not be obtained (request exceeds device limits or overflows).
    #[error("cannot allocate {what}: requested {requested}, device limit {limit}")]
    Allocation {
        what: &'static str,
        requested: u64,
        limit: u64,
    },

    /// The device ran out of memory while creating `what`.
    #[error("out of GPU memory allocating {what} ({requested} bytes)")]
    OutOfMemory { what: &'static str, requested: u64 },

    /// Unsupported texture format / filter / data combination.
    #[error("unsupported texture: {0}")]
    Format(#[from] FormatError),

    /// A constructor was called in violation of its contract (release builds only;
    /// debug builds panic instead).
    #[error("contract violation: {0}")]
    Contract(#[from] ContractViolation),
}

/// Reason a texture description was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("texture extent must be non-zero (got {width}x{height}x{layers})")]
    EmptyExtent { width: u32, height: u32, layers: u32 },

    #[error("pixel data is {actual} bytes, expected {expected}")]
    DataLength { expected: usize, actual: usize },

    #[error("{format:?} cannot be sampled with a filtering sampler on this device")]
    NotFilterable { format: wgpu::TextureFormat },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for both allocation failures: over a device limit, or out of memory.
    pub fn is_allocation(&self) -> bool {
        matches!(self, Error::Allocation { .. } | Error::OutOfMemory { .. })
    }
}

/// Caller programming error detected by an object buffer operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("object {index} is {found:?}, buffer holds {expected:?}")]
    KindMismatch {
        index: usize,
        expected: PrimitiveKind,
        found: PrimitiveKind,
    },

    #[error("range {start}..{end} is outside capacity {capacity}")]
    OutOfRange {
        start: usize,
        end: usize,
        capacity: usize,
    },

    #[error("fill needs exactly {expected} objects, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("object buffers must hold at least one object")]
    Empty,

    #[error("object {index} was never filled since the buffer grew")]
    Unfilled { index: usize },

    #[error("{kind:?} buffers take no texture")]
    NotTextured { kind: PrimitiveKind },

    #[error("{kind:?} buffer rendered without a live texture binding")]
    MissingTexture { kind: PrimitiveKind },

    #[error("{kind:?} buffer cannot bind a texture with layer count {layers:?}")]
    TextureDimension { kind: PrimitiveKind, layers: Option<u32> },
}

/// Applies the violation discipline: panic in debug, log and continue in release.
///
/// Callers return early afterwards so no GPU state is touched.
#[track_caller]
pub(crate) fn report(violation: ContractViolation) {
    if cfg!(debug_assertions) {
        panic!("contract violation: {violation}");
    }
    log::error!("contract violation: {violation}; operation skipped");
}

/// Rejects GPU allocations that the device cannot satisfy.
pub(crate) fn check_allocation(what: &'static str, requested: Option<u64>, limit: u64) -> Result<u64> {
    match requested {
        Some(bytes) if bytes <= limit => Ok(bytes),
        Some(bytes) => Err(Error::Allocation { what, requested: bytes, limit }),
        None => Err(Error::Allocation { what, requested: u64::MAX, limit }),
    }
}

/// Turns what an out-of-memory error scope captured into a result.
pub(crate) fn check_out_of_memory(
    what: &'static str,
    requested: u64,
    captured: Option<wgpu::Error>,
) -> Result<()> {
    match captured {
        None => Ok(()),
        Some(err) => {
            log::error!("{what} allocation of {requested} bytes failed: {err}");
            Err(Error::OutOfMemory { what, requested })
        }
    }
}

/// Runs `allocate` inside an out-of-memory error scope on `device`.
///
/// The scope is popped before returning, so a failed allocation surfaces here
/// instead of in the device's uncaptured-error handler.
pub(crate) fn scoped_allocation<T>(
    device: &wgpu::Device,
    what: &'static str,
    requested: u64,
    allocate: impl FnOnce() -> T,
) -> Result<T> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    let value = allocate();
    let captured = pollster::block_on(scope.pop());
    check_out_of_memory(what, requested, captured).map(|()| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_allocation_accepts_within_limit() {
        assert_eq!(check_allocation("vertex buffer", Some(256), 1024), Ok(256));
        assert_eq!(check_allocation("vertex buffer", Some(1024), 1024), Ok(1024));
    }

    #[test]
    fn check_allocation_rejects_over_limit() {
        let err = check_allocation("vertex buffer", Some(2048), 1024).unwrap_err();
        assert_eq!(
            err,
            Error::Allocation { what: "vertex buffer", requested: 2048, limit: 1024 }
        );
    }

    #[test]
    fn check_allocation_rejects_overflow() {
        assert!(matches!(
            check_allocation("index buffer", None, 1024),
            Err(Error::Allocation { requested: u64::MAX, .. })
        ));
    }

    #[test]
    fn empty_scope_is_success() {
        assert_eq!(check_out_of_memory("vertex buffer", 64, None), Ok(()));
    }

    #[test]
    fn captured_out_of_memory_is_recoverable() {
        let captured = wgpu::Error::OutOfMemory {
            source: Box::new(std::io::Error::other("device lost its heap")),
        };
        let err = check_out_of_memory("vertex buffer", 1 << 30, Some(captured)).unwrap_err();
        assert_eq!(err, Error::OutOfMemory { what: "vertex buffer", requested: 1 << 30 });
        assert!(err.is_allocation());
    }

    #[test]
    fn limit_and_memory_failures_are_both_allocation() {
        assert!(Error::Allocation { what: "index buffer", requested: 8, limit: 4 }.is_allocation());
        assert!(!Error::Format(FormatError::DataLength { expected: 4, actual: 3 }).is_allocation());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "contract violation")]
    fn report_panics_in_debug() {
        report(ContractViolation::Empty);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn report_returns_in_release() {
        report(ContractViolation::MissingTexture { kind: PrimitiveKind::Texture2D });
        report(ContractViolation::Unfilled { index: 3 });
    }
}
