//! Erased variable storage
//!
//! A VariableSlot owns one value behind `Box<dyn Any>` together with the
//! descriptor of the type it was created with. Dropping the box runs the
//! value's destructor, so no layout assumptions are needed.

use super::descriptor::TypeDescriptor;
use crate::runtime::errors::SlotTypeError;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

/* ===================== Variable Slot ===================== */

/// One parameter or local of a resumable body
pub struct VariableSlot {
    descriptor: TypeDescriptor,
    value: Box<dyn Any>,
}

impl VariableSlot {
    /// Move `value` into a new slot. The slot's type is fixed from here on.
    pub fn new<T: Any>(value: T) -> Self {
        VariableSlot {
            descriptor: TypeDescriptor::of::<T>(),
            value: Box::new(value),
        }
    }

    pub fn descriptor(&self) -> TypeDescriptor {
        self.descriptor
    }

    pub fn read_as<T: Any>(&self) -> Result<&T, SlotTypeError> {
        let descriptor = self.descriptor;
        self.value
            .downcast_ref::<T>()
            .ok_or_else(|| SlotTypeError::new::<T>(descriptor))
    }

    pub fn read_as_mut<T: Any>(&mut self) -> Result<&mut T, SlotTypeError> {
        let descriptor = self.descriptor;
        self.value
            .downcast_mut::<T>()
            .ok_or_else(|| SlotTypeError::new::<T>(descriptor))
    }

    /// Consume the slot and hand back the stored value
    pub fn into_value<T: Any>(self) -> Result<T, SlotTypeError> {
        let descriptor = self.descriptor;
        self.value
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| SlotTypeError::new::<T>(descriptor))
    }

    /// Run the stored value's destructor.
    pub fn destroy(self) {
        drop(self.value);
    }
}

impl fmt::Debug for VariableSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableSlot")
            .field("type", &self.descriptor.name())
            .finish_non_exhaustive()
    }
}

/* ===================== Var Handle ===================== */

/// Typed handle to a slot, returned by the positional fetch operations.
///
/// The handle records where the slot lives (frame index and slot index); the
/// value itself stays in the frame and is reached through
/// [`CallStack::get`](crate::runtime::CallStack::get) /
/// [`CallStack::get_mut`](crate::runtime::CallStack::get_mut).
pub struct Var<T> {
    frame: usize,
    slot: usize,
    _ty: PhantomData<fn() -> T>,
}

impl<T> Var<T> {
    pub(crate) fn new(frame: usize, slot: usize) -> Self {
        Var {
            frame,
            slot,
            _ty: PhantomData,
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn slot(&self) -> usize {
        self.slot
    }
}

impl<T> Clone for Var<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Var<T> {}

impl<T> PartialEq for Var<T> {
    fn eq(&self, other: &Self) -> bool {
        self.frame == other.frame && self.slot == other.slot
    }
}

impl<T> Eq for Var<T> {}

impl<T> fmt::Debug for Var<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Var<{}>({}:{})",
            std::any::type_name::<T>(),
            self.frame,
            self.slot
        )
    }
}
