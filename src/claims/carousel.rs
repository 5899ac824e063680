//! Photo carousel index math
//!
//! Steps through a group's photos with wraparound: advancing past the last
//! photo lands on the first, and stepping back from the first lands on the
//! last.

/// Wraparound cursor over a fixed number of photos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    index: usize,
    len: usize,
}

impl Carousel {
    /// Create a carousel over `len` photos, starting on the first
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    /// Number of photos
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if there are no photos
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current photo index, 0-based
    pub fn index(&self) -> usize {
        self.index
    }

    /// Step to the next photo, wrapping to the first after the last
    pub fn next(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
    }

    /// Step to the previous photo, wrapping to the last before the first
    pub fn prev(&mut self) {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
    }

    /// Human position, e.g. "2 / 5" ("0 / 0" when empty)
    pub fn position(&self) -> String {
        if self.len == 0 {
            return "0 / 0".to_string();
        }
        format!("{} / {}", self.index + 1, self.len)
    }
}
