//! Rasterized icon cache.
//!
//! Maps `(file, size, tint)` to a shared rendered image so toolbars asking
//! for the same icon repeatedly only pay for it once. The cache is a plain
//! value owned by the caller; wrap it in a lock to share it across threads.

use crate::color::Rgba8;
use crate::error::Result;
use crate::rendering_buffer::{RasterizedImage, PIXEL_SIZE};
use crate::svg_document::{rasterize_file, RenderOptions};
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Cache key: source file, square icon size in pixels, optional tint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconKey {
    pub path: PathBuf,
    pub size: u32,
    pub tint: Option<Rgba8>,
}

impl IconKey {
    pub fn new(path: impl Into<PathBuf>, size: u32, tint: Option<Rgba8>) -> Self {
        Self {
            path: path.into(),
            size,
            tint,
        }
    }
}

/// Recolor every pixel: RGB becomes the tint color, alpha is scaled by the
/// tint's alpha.
pub fn apply_tint(img: &mut RasterizedImage, tint: &Rgba8) {
    for px in img.data_mut().chunks_exact_mut(PIXEL_SIZE) {
        Rgba8::from_slice(px).tinted(tint).store(px);
    }
}

/// Cache of rendered icons.
#[derive(Debug, Default)]
pub struct IconCache {
    options: RenderOptions,
    entries: HashMap<IconKey, Arc<RasterizedImage>>,
}

impl IconCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache rendering with the given options on every miss.
    pub fn with_options(options: RenderOptions) -> Self {
        Self {
            options,
            entries: HashMap::new(),
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn get(&self, key: &IconKey) -> Option<Arc<RasterizedImage>> {
        self.entries.get(key).cloned()
    }

    /// Store a pre-rendered image, replacing any previous entry.
    pub fn insert(&mut self, key: IconKey, image: RasterizedImage) -> Arc<RasterizedImage> {
        let image = Arc::new(image);
        self.entries.insert(key, Arc::clone(&image));
        image
    }

    /// Return the cached icon, rasterizing (and tinting) it on a miss.
    ///
    /// Failures are returned to the caller and nothing is cached for them.
    pub fn get_or_load(
        &mut self,
        path: impl AsRef<Path>,
        size: u32,
        tint: Option<Rgba8>,
    ) -> Result<Arc<RasterizedImage>> {
        let key = IconKey::new(path.as_ref(), size, tint);
        if let Some(hit) = self.entries.get(&key) {
            return Ok(Arc::clone(hit));
        }
        debug!("icon cache miss: {} @ {}px", key.path.display(), size);
        let mut img = rasterize_file(&key.path, size, size, &self.options)?;
        if let Some(t) = &key.tint {
            apply_tint(&mut img, t);
        }
        Ok(self.insert(key, img))
    }

    /// Drop every entry rendered from `path`. Returns how many were removed.
    pub fn invalidate(&mut self, path: impl AsRef<Path>) -> usize {
        let path = path.as_ref();
        let before = self.entries.len();
        self.entries.retain(|k, _| k.path != path);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// ============================================================================
// Tests
// ============================================================================
