/// Reference-counted array with value semantics
///
/// Cloning a SharedArray shares the storage; the first write through a
/// clone copies it (`Arc::make_mut`), so holders never observe each other's
/// modifications. Indices run over the inclusive range `lower..=upper`,
/// 1-based unless another lower bound is given.

use std::sync::Arc;

use glam::{Vec3, Vec4};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct SharedArray<T> {
    lower: i32,
    items: Arc<Vec<T>>,
}

pub type Vec3Array = SharedArray<Vec3>;
pub type Vec4Array = SharedArray<Vec4>;
pub type IndexArray = SharedArray<u32>;

impl<T: Clone + Default> SharedArray<T> {
    /// Array of default values indexed `lower..=upper`
    ///
    /// `upper == lower - 1` gives an empty array.
    pub fn new(lower: i32, upper: i32) -> Result<Self> {
        let len = i64::from(upper) - i64::from(lower) + 1;
        if len < 0 {
            return Err(Error::InvalidResource(format!(
                "array bounds {}..={} are reversed",
                lower, upper
            )));
        }
        Ok(Self {
            lower,
            items: Arc::new(vec![T::default(); len as usize]),
        })
    }
}

impl<T: Clone> SharedArray<T> {
    /// Wrap `items`, the first one at index 1
    ///
    /// Items past index `i32::MAX` are stored but not addressable.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            lower: 1,
            items: Arc::new(items),
        }
    }

    /// Wrap `items`, the first one at index `lower`
    ///
    /// Fails when the last index would exceed `i32::MAX`.
    pub fn with_lower(lower: i32, items: Vec<T>) -> Result<Self> {
        let last = i64::from(lower) + items.len() as i64 - 1;
        if last > i64::from(i32::MAX) {
            return Err(Error::InvalidResource(format!(
                "array of {} items starting at {} overflows the index range",
                items.len(),
                lower
            )));
        }
        Ok(Self {
            lower,
            items: Arc::new(items),
        })
    }

    pub fn lower(&self) -> i32 {
        self.lower
    }

    /// Last valid index, `lower - 1` when empty
    ///
    /// Saturates at `i32::MAX` for storages longer than the index range.
    pub fn upper(&self) -> i32 {
        let last = i64::from(self.lower) + self.items.len() as i64 - 1;
        i32::try_from(last).unwrap_or(i32::MAX)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Value at `index`, `None` outside `lower..=upper`
    pub fn value(&self, index: i32) -> Option<&T> {
        self.position(index).map(|position| &self.items[position])
    }

    /// Replace the value at `index`, detaching from other holders first
    pub fn set_value(&mut self, index: i32, value: T) -> Result<()> {
        let position = self.position(index).ok_or(Error::OutOfRange {
            from: index as isize,
            count: 1,
            available: self.items.len(),
        })?;
        Arc::make_mut(&mut self.items)[position] = value;
        Ok(())
    }

    /// Read-only view of the whole storage
    pub fn array1(&self) -> &[T] {
        &self.items
    }

    /// Mutable view of the whole storage, detaching from other holders first
    pub fn change_array1(&mut self) -> &mut [T] {
        Arc::make_mut(&mut self.items).as_mut_slice()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Whether both arrays currently share the same storage
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }

    /// Number of holders of the storage
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.items)
    }

    fn position(&self, index: i32) -> Option<usize> {
        let offset = i64::from(index) - i64::from(self.lower);
        usize::try_from(offset).ok().filter(|position| *position < self.items.len())
    }
}

impl<T: Clone> From<Vec<T>> for SharedArray<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

#[cfg(test)]
#[path = "shared_array_tests.rs"]
mod tests;
