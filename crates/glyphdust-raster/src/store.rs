//! Revocable handles for rasterized images

use image::RgbaImage;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Opaque, URL-like reference to an image held by an [`ImageStore`]
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct ImageHandle(u64);

impl ImageHandle {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageHandle({})", self.0)
    }
}

impl fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blob:glyphdust/{}", self.0)
    }
}

/// Owns rasterized images until their handle is revoked.
///
/// Every `insert` must eventually be matched by a `revoke` (or `clear`);
/// `live_count` makes leaks observable.
#[derive(Default)]
pub struct ImageStore {
    next_id: u64,
    images: HashMap<ImageHandle, Arc<RgbaImage>>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image and return a handle to it
    pub fn insert(&mut self, image: RgbaImage) -> ImageHandle {
        self.next_id += 1;
        let handle = ImageHandle(self.next_id);
        self.images.insert(handle, Arc::new(image));
        handle
    }

    pub fn get(&self, handle: ImageHandle) -> Option<Arc<RgbaImage>> {
        self.images.get(&handle).cloned()
    }

    /// Release an image. Returns false if the handle was unknown or already revoked.
    pub fn revoke(&mut self, handle: ImageHandle) -> bool {
        self.images.remove(&handle).is_some()
    }

    /// Release every image, returning how many were live
    pub fn clear(&mut self) -> usize {
        let n = self.images.len();
        self.images.clear();
        n
    }

    pub fn live_count(&self) -> usize {
        self.images.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_revoke() {
        let mut store = ImageStore::new();
        let a = store.insert(RgbaImage::new(2, 2));
        let b = store.insert(RgbaImage::new(3, 3));
        assert_ne!(a, b);
        assert_eq!(store.live_count(), 2);
        assert_eq!(store.get(b).unwrap().dimensions(), (3, 3));

        assert!(store.revoke(a));
        assert!(!store.revoke(a));
        assert!(store.get(a).is_none());
        assert_eq!(store.live_count(), 1);
    }

    #[test]
    fn handles_are_never_reused() {
        let mut store = ImageStore::new();
        let a = store.insert(RgbaImage::new(1, 1));
        store.revoke(a);
        let b = store.insert(RgbaImage::new(1, 1));
        assert_ne!(a, b);
        assert_eq!(b.to_string(), "blob:glyphdust/2");
    }

    #[test]
    fn clear_reports_released_count() {
        let mut store = ImageStore::new();
        store.insert(RgbaImage::new(1, 1));
        store.insert(RgbaImage::new(1, 1));
        assert_eq!(store.clear(), 2);
        assert_eq!(store.live_count(), 0);
    }
}
