//! In-memory framebuffer.

use crate::engine::{EngineError, EngineResult};
use crate::models::FramebufferGeometry;

use super::FramebufferSink;

/// Framebuffer backed by a plain byte vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryFramebuffer {
    geometry: FramebufferGeometry,
    bytes: Vec<u8>,
    writes: usize,
}

impl MemoryFramebuffer {
    /// Creates a zeroed framebuffer of `geometry.size_bytes()`.
    pub fn new(geometry: FramebufferGeometry) -> Self {
        Self {
            geometry,
            bytes: vec![0; geometry.size_bytes()],
            writes: 0,
        }
    }

    /// Current contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// One scanline of the current contents.
    pub fn scanline(&self, line: u32) -> &[u8] {
        let stride = self.geometry.stride_bytes as usize;
        let start = line as usize * stride;
        &self.bytes[start..start + stride]
    }

    /// Number of `write_at` calls so far.
    pub const fn writes(&self) -> usize {
        self.writes
    }
}

impl FramebufferSink for MemoryFramebuffer {
    fn geometry(&self) -> FramebufferGeometry {
        self.geometry
    }

    fn write_at(&mut self, offset: usize, bytes: &[u8]) -> EngineResult<()> {
        let capacity = self.bytes.len();
        let end = offset
            .checked_add(bytes.len())
            .filter(|&end| end <= capacity)
            .ok_or(EngineError::Blit {
                offset,
                len: bytes.len(),
                capacity,
            })?;
        self.bytes[offset..end].copy_from_slice(bytes);
        self.writes += 1;
        Ok(())
    }
}
