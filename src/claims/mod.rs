//! Claims review module
//!
//! Transforms used by the claims review screens: collapsing the flat
//! evidence feed into one reviewable group per farmer, and the wraparound
//! photo carousel for stepping through a group's images.

mod carousel;
mod group;

pub use carousel::Carousel;
pub use group::{group_by_farmer, FarmerEvidenceGroup};
