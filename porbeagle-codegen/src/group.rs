//! Action-row grouping and ordering.

use std::collections::BTreeMap;

use crate::error::GenerationError;
use crate::model::ActionRowGroup;

/// One member classified into an action row, in encounter order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRowSlot {
    pub index: u32,
    pub member: String,
}

/// Group slots by index. Groups come out ascending by index; members keep
/// the order they were encountered in. Indices need not be contiguous.
pub fn group_action_rows(slots: impl IntoIterator<Item = ActionRowSlot>) -> Vec<ActionRowGroup> {
    let mut by_index: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    for slot in slots {
        by_index.entry(slot.index).or_default().push(slot.member);
    }

    by_index
        .into_iter()
        .map(|(index, members)| ActionRowGroup { index, members })
        .collect()
}

pub fn enforce_row_limit(groups: &[ActionRowGroup], max: Option<usize>) -> Result<(), GenerationError> {
    match max {
        Some(max) if groups.len() > max => Err(GenerationError::TooManyActionRows {
            count: groups.len(),
            max,
        }),
        _ => Ok(()),
    }
}
