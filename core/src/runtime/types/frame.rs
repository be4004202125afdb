//! Activation records

use super::pc::ResumePoint;
use super::slot::VariableSlot;
use super::descriptor::TypeDescriptor;

/// Persistent storage for one activation of one resumable body
///
/// Slots are append-only and addressed by position. The whole frame is
/// retired at once; its slots are destroyed in reverse declaration order.
#[derive(Debug, Default)]
pub struct Frame {
    resume_point: ResumePoint,
    slots: Vec<VariableSlot>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_slot(&mut self, slot: VariableSlot) {
        self.slots.push(slot);
    }

    pub fn slot_at(&self, index: usize) -> Option<&VariableSlot> {
        self.slots.get(index)
    }

    pub fn slot_at_mut(&mut self, index: usize) -> Option<&mut VariableSlot> {
        self.slots.get_mut(index)
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn resume_point(&self) -> ResumePoint {
        self.resume_point
    }

    pub fn set_resume_point(&mut self, point: ResumePoint) {
        self.resume_point = point;
    }

    /// Types of the slots in declaration order
    pub fn layout(&self) -> Vec<TypeDescriptor> {
        self.slots.iter().map(VariableSlot::descriptor).collect()
    }

    /// Retire the frame, moving out the slot at `index`.
    ///
    /// The frame is consumed; its other slots are destroyed with it.
    pub fn into_slot(mut self, index: usize) -> Option<VariableSlot> {
        if index >= self.slots.len() {
            return None;
        }
        let kept = self.slots.remove(index);
        Some(kept)
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        while let Some(slot) = self.slots.pop() {
            slot.destroy();
        }
    }
}
