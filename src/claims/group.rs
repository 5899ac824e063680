//! Evidence grouping
//!
//! The backend serves evidence as a flat list with farmer and schedule
//! records embedded per row. Claims review works farmer by farmer, so the
//! list is collapsed into one group per farmer.

use crate::models::{Evidence, Farmer, Schedule};
use std::collections::HashMap;
use tracing::debug;

/// All of one farmer's evidence, ready for review
#[derive(Debug, Clone, PartialEq)]
pub struct FarmerEvidenceGroup {
    pub farmer: Farmer,
    /// The farmer's photos, in feed order
    pub evidences: Vec<Evidence>,
    /// Inspection attached to the first evidence row, if any
    pub schedule: Option<Schedule>,
}

impl FarmerEvidenceGroup {
    /// Number of photos in the group
    pub fn photo_count(&self) -> usize {
        self.evidences.len()
    }

    fn sort_name(&self) -> String {
        format!("{} {}", self.farmer.fname, self.farmer.lname).to_lowercase()
    }
}

/// Collapse a flat evidence feed into one group per farmer
///
/// Rows without a farmer id or without the embedded farmer record are
/// dropped. Each group keeps its farmer and the schedule from the farmer's
/// first row; groups come back sorted by farmer name, case-insensitive.
pub fn group_by_farmer(evidences: Vec<Evidence>) -> Vec<FarmerEvidenceGroup> {
    let mut groups: Vec<FarmerEvidenceGroup> = Vec::new();
    let mut index_by_farmer: HashMap<String, usize> = HashMap::new();

    for evidence in evidences {
        let Some(farmer_id) = evidence.farmer_id.clone() else {
            debug!("skipping evidence {}: no farmer id", evidence.id);
            continue;
        };
        let Some(farmer) = evidence.farmer.clone() else {
            debug!("skipping evidence {}: no embedded farmer record", evidence.id);
            continue;
        };

        match index_by_farmer.get(&farmer_id) {
            Some(&i) => groups[i].evidences.push(evidence),
            None => {
                index_by_farmer.insert(farmer_id, groups.len());
                groups.push(FarmerEvidenceGroup {
                    farmer,
                    schedule: evidence.schedule.clone(),
                    evidences: vec![evidence],
                });
            }
        }
    }

    groups.sort_by_key(FarmerEvidenceGroup::sort_name);
    groups
}
