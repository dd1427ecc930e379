use crate::foundation::error::{HomeshotError, HomeshotResult};
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, PoisonError};

/// Single-occupancy arena for a shared rendering resource (offscreen view, renderer).
///
/// The resource leaves the slot while a [`SurfaceLease`] is alive and returns when the lease
/// drops, so at most one job or icon request can drive it at a time.
pub struct SurfaceSlot<T> {
    label: &'static str,
    item: Mutex<Option<T>>,
}

impl<T> std::fmt::Debug for SurfaceSlot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceSlot")
            .field("label", &self.label)
            .field("available", &self.is_available())
            .finish()
    }
}

impl<T> SurfaceSlot<T> {
    /// Slot holding `item`; `label` names the resource in error messages.
    pub fn new(label: &'static str, item: T) -> Arc<Self> {
        Arc::new(Self {
            label,
            item: Mutex::new(Some(item)),
        })
    }

    /// `true` when no lease is outstanding.
    pub fn is_available(&self) -> bool {
        self.item
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Take the resource, or fail with [`HomeshotError::IllegalState`] if already leased.
    pub fn acquire(self: &Arc<Self>) -> HomeshotResult<SurfaceLease<T>> {
        let item = self
            .item
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or_else(|| HomeshotError::illegal_state(format!("{} is in use", self.label)))?;
        Ok(SurfaceLease {
            slot: Arc::clone(self),
            item: Some(item),
        })
    }
}

/// Exclusive access to a resource taken from a [`SurfaceSlot`].
#[derive(Debug)]
pub struct SurfaceLease<T> {
    slot: Arc<SurfaceSlot<T>>,
    item: Option<T>,
}

impl<T> Deref for SurfaceLease<T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.item {
            Some(item) => item,
            None => unreachable!("lease is populated until drop"),
        }
    }
}

impl<T> DerefMut for SurfaceLease<T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.item {
            Some(item) => item,
            None => unreachable!("lease is populated until drop"),
        }
    }
}

impl<T> Drop for SurfaceLease<T> {
    fn drop(&mut self) {
        if let Some(item) = self.item.take() {
            *self
                .slot
                .item
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(item);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
