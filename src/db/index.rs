use super::image::{DatabaseImage, RECORD_COUNT};

/// Ascending slot numbers of every occupied record, captured at load time.
///
/// Renaming never changes occupancy (the editor cannot empty position zero),
/// so the index stays valid until the image is reloaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordIndex {
    slots: Vec<usize>,
}

impl RecordIndex {
    pub fn build(image: &DatabaseImage) -> Self {
        let slots: Vec<usize> = (0..RECORD_COUNT)
            .filter(|&slot| image.is_occupied(slot))
            .collect();
        tracing::debug!(occupied = slots.len(), "built record index");
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<usize> {
        self.slots.get(position).copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.slots
    }
}
