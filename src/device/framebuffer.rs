//! Linux fbdev framebuffer.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use linuxfb::Framebuffer;
use memmap::MmapMut;
use tracing::{debug, info};

use crate::constants::FB_SYSFS_DIR;
use crate::engine::{EngineError, EngineResult};
use crate::models::FramebufferGeometry;

use super::FramebufferSink;

/// Memory-mapped `/dev/fbN` device.
pub struct LinuxFramebuffer {
    path: PathBuf,
    geometry: FramebufferGeometry,
    map: MmapMut,
}

impl LinuxFramebuffer {
    /// Opens and maps the framebuffer at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let fb = Framebuffer::new(path)
            .map_err(|e| anyhow!("Failed to open framebuffer {}: {e:?}", path.display()))?;
        let geometry = query_geometry(&fb, path);
        let map = fb
            .map()
            .map_err(|e| anyhow!("Failed to map framebuffer {}: {e:?}", path.display()))?;
        info!(
            "Framebuffer {}: {}x{} {}bpp stride {} ({} bytes mapped)",
            path.display(),
            geometry.width_px,
            geometry.height_px,
            geometry.bits_per_pixel,
            geometry.stride_bytes,
            map.len()
        );
        Ok(Self {
            path: path.to_path_buf(),
            geometry,
            map,
        })
    }

    /// Device node this handle was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FramebufferSink for LinuxFramebuffer {
    fn geometry(&self) -> FramebufferGeometry {
        self.geometry
    }

    fn write_at(&mut self, offset: usize, bytes: &[u8]) -> EngineResult<()> {
        let capacity = self.map.len();
        let end = offset
            .checked_add(bytes.len())
            .filter(|&end| end <= capacity)
            .ok_or(EngineError::Blit {
                offset,
                len: bytes.len(),
                capacity,
            })?;
        self.map[offset..end].copy_from_slice(bytes);
        Ok(())
    }
}

/// Reads the geometry of an opened framebuffer. The stride comes from
/// sysfs when available; otherwise the virtual width is assumed unpadded.
fn query_geometry(fb: &Framebuffer, path: &Path) -> FramebufferGeometry {
    let (width, height) = fb.get_size();
    let (virtual_width, _) = fb.get_virtual_size();
    let bytes_per_pixel = fb.get_bytes_per_pixel();
    let stride = sysfs_name(path)
        .and_then(|name| read_sysfs_stride(Path::new(FB_SYSFS_DIR), &name))
        .unwrap_or_else(|| {
            debug!("No sysfs stride for {}, deriving it", path.display());
            virtual_width.max(width) * bytes_per_pixel
        });
    FramebufferGeometry::new(width, height, stride, bytes_per_pixel * 8)
}

/// `fbN` name of a device node, following symlinks.
pub fn sysfs_name(path: &Path) -> Option<String> {
    let resolved = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let name = resolved.file_name()?.to_str()?;
    let index = name.strip_prefix("fb")?;
    (!index.is_empty() && index.bytes().all(|b| b.is_ascii_digit())).then(|| name.to_string())
}

/// Reads `<sysfs_dir>/<name>/stride`.
pub fn read_sysfs_stride(sysfs_dir: &Path, name: &str) -> Option<u32> {
    let raw = fs::read_to_string(sysfs_dir.join(name).join("stride")).ok()?;
    raw.trim().parse().ok().filter(|&stride| stride > 0)
}
