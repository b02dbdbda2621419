//! Ordered list of captures to stitch.
//!
//! Images are kept top to bottom. Each gets an id that is never reused, so
//! callers can keep referring to an image while the list is reordered.
//! Adjacent entries are the pairs handed to the overlap search.

use crate::image::RasterImage;
use crate::util::{StitchMatchError, StitchMatchResult};

/// Stable identifier of an image in an [`ImageStack`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(u64);

impl ImageId {
    /// Returns the raw id value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position change requested for one image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderChange {
    Top,
    Up,
    Down,
    Bottom,
}

/// Image held by the stack together with its display name.
#[derive(Clone, Debug)]
pub struct StackedImage {
    id: ImageId,
    name: String,
    image: RasterImage,
}

impl StackedImage {
    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image(&self) -> &RasterImage {
        &self.image
    }

    pub fn into_image(self) -> RasterImage {
        self.image
    }
}

/// Top-to-bottom list of images with stable ids.
#[derive(Clone, Debug, Default)]
pub struct ImageStack {
    next_id: u64,
    entries: Vec<StackedImage>,
}

impl ImageStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends an image at the bottom and returns its id.
    pub fn insert(&mut self, name: impl Into<String>, image: RasterImage) -> ImageId {
        let id = ImageId(self.next_id);
        self.next_id += 1;
        self.entries.push(StackedImage {
            id,
            name: name.into(),
            image,
        });
        id
    }

    /// Removes an image and returns it.
    pub fn remove(&mut self, id: ImageId) -> StitchMatchResult<StackedImage> {
        let idx = self.position(id)?;
        Ok(self.entries.remove(idx))
    }

    /// Moves an image. Moving past either end leaves the order unchanged.
    pub fn reorder(&mut self, id: ImageId, change: OrderChange) -> StitchMatchResult<()> {
        let idx = self.position(id)?;
        let last = self.entries.len() - 1;
        match change {
            OrderChange::Top => self.entries[..=idx].rotate_right(1),
            OrderChange::Bottom => self.entries[idx..].rotate_left(1),
            OrderChange::Up if idx > 0 => self.entries.swap(idx, idx - 1),
            OrderChange::Down if idx < last => self.entries.swap(idx, idx + 1),
            OrderChange::Up | OrderChange::Down => {}
        }
        Ok(())
    }

    pub fn get(&self, id: ImageId) -> Option<&StackedImage> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Returns the zero-based position of `id`, top first.
    pub fn position(&self, id: ImageId) -> StitchMatchResult<usize> {
        self.entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(StitchMatchError::UnknownImage { id: id.0 })
    }

    /// Iterates top to bottom.
    pub fn iter(&self) -> impl Iterator<Item = &StackedImage> + '_ {
        self.entries.iter()
    }

    /// Ids in stack order.
    pub fn ids(&self) -> Vec<ImageId> {
        self.entries.iter().map(StackedImage::id).collect()
    }

    /// Consecutive `(upper, lower)` pairs, top to bottom.
    pub fn adjacent_pairs(&self) -> impl Iterator<Item = (&StackedImage, &StackedImage)> + '_ {
        self.entries.windows(2).map(|pair| (&pair[0], &pair[1]))
    }
}
