//! Error types for the geometry and rendering engine.

use std::io;

/// Touch axis named in configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal device axis
    X,
    /// Vertical device axis
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::Y => write!(f, "Y"),
        }
    }
}

/// Invalid geometry or axis inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// Framebuffer width or height is zero
    DegenerateDimensions {
        /// Reported width
        width: u32,
        /// Reported height
        height: u32,
    },
    /// Touch axis maximum is not above its minimum
    DegenerateAxisRange {
        /// Offending axis
        axis: Axis,
        /// Reported minimum
        min: i32,
        /// Reported maximum
        max: i32,
    },
    /// Buffer sizes derived from the dimensions do not fit in memory
    Oversized {
        /// Reported width
        width: u32,
        /// Reported height
        height: u32,
    },
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DegenerateDimensions { width, height } => {
                write!(f, "framebuffer has degenerate dimensions {width}x{height}")
            }
            Self::DegenerateAxisRange { axis, min, max } => write!(
                f,
                "touch {axis} axis has degenerate range [{min}, {max}]"
            ),
            Self::Oversized { width, height } => {
                write!(f, "framebuffer dimensions {width}x{height} are too large")
            }
        }
    }
}

impl std::error::Error for GeometryError {}

/// Fatal engine failure, grouped the way the process reports them.
#[derive(Debug)]
pub enum EngineError {
    /// Degenerate geometry or axis configuration
    Configuration(GeometryError),
    /// Open, read, write or ioctl failure on a device
    DeviceIo {
        /// Device description (usually its path)
        device: String,
        /// What was being attempted
        operation: &'static str,
        /// Underlying failure
        source: io::Error,
    },
    /// A blit would write outside the framebuffer
    Blit {
        /// Byte offset of the rejected write
        offset: usize,
        /// Length of the rejected write
        len: usize,
        /// Framebuffer size in bytes
        capacity: usize,
    },
    /// Composition buffer allocation failed
    Allocation {
        /// Requested size in bytes
        bytes: usize,
    },
}

impl EngineError {
    /// Wraps an IO failure on `device`.
    pub fn device_io(device: impl Into<String>, operation: &'static str, source: io::Error) -> Self {
        Self::DeviceIo {
            device: device.into(),
            operation,
            source,
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(err) => write!(f, "configuration error: {err}"),
            Self::DeviceIo {
                device,
                operation,
                source,
            } => write!(f, "device error: failed to {operation} {device}: {source}"),
            Self::Blit {
                offset,
                len,
                capacity,
            } => write!(
                f,
                "device error: write of {len} bytes at offset {offset} exceeds framebuffer size {capacity}"
            ),
            Self::Allocation { bytes } => {
                write!(f, "allocation error: could not reserve {bytes} bytes for composition buffer")
            }
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Configuration(err) => Some(err),
            Self::DeviceIo { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<GeometryError> for EngineError {
    fn from(err: GeometryError) -> Self {
        Self::Configuration(err)
    }
}

/// Result alias used across the engine.
pub type EngineResult<T> = Result<T, EngineError>;
