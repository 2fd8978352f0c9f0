//! Fixed-capacity arrays with a declared valid prefix.
//!
//! Marshal zones, forecast samples, lap history, tyre stints and the lap
//! position grid are always sent at full capacity; a count elsewhere in the
//! packet says how many leading entries carry data.

use core::slice;

use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::Result;
use crate::reader::ByteReader;

/// `N` wire slots of which the first `declared` are meaningful.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedSlots<T, const N: usize> {
    slots: Vec<T>,
    declared: usize,
}

impl<T, const N: usize> FixedSlots<T, N> {
    pub const CAPACITY: usize = N;

    /// Read all `N` slots at `stride` bytes each, regardless of `declared`.
    pub(crate) fn read(
        r: &mut ByteReader<'_>,
        stride: usize,
        declared: u8,
        mut decode_one: impl FnMut(&mut ByteReader<'_>) -> Result<T>,
    ) -> Result<Self> {
        let mut slots = Vec::with_capacity(N);
        for _ in 0..N {
            let mut element = r.sub(stride)?;
            slots.push(decode_one(&mut element)?);
        }
        Ok(Self {
            slots,
            declared: usize::from(declared),
        })
    }

    /// Build from already-decoded slots. Returns `None` unless exactly `N`
    /// slots are supplied.
    pub fn from_slots(slots: Vec<T>, declared: usize) -> Option<Self> {
        (slots.len() == N).then_some(Self { slots, declared })
    }

    /// The count as sent on the wire, which may exceed the capacity.
    pub fn declared_len(&self) -> usize {
        self.declared
    }

    /// Number of meaningful slots: the declared count clamped to capacity.
    pub fn valid_len(&self) -> usize {
        self.declared.min(N)
    }

    pub fn capacity(&self) -> usize {
        N
    }

    /// The meaningful prefix.
    pub fn valid(&self) -> &[T] {
        self.slots.get(..self.valid_len()).unwrap_or_default()
    }

    /// Every wire slot, including the meaningless tail.
    pub fn all(&self) -> &[T] {
        &self.slots
    }

    /// Slot `index` if it lies inside the meaningful prefix.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.valid().get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.valid().iter()
    }

    pub fn is_empty(&self) -> bool {
        self.valid_len() == 0
    }
}

impl<T: Default + Clone, const N: usize> Default for FixedSlots<T, N> {
    fn default() -> Self {
        Self {
            slots: vec![T::default(); N],
            declared: 0,
        }
    }
}

impl<'s, T, const N: usize> IntoIterator for &'s FixedSlots<T, N> {
    type Item = &'s T;
    type IntoIter = slice::Iter<'s, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Serializes only the meaningful prefix.
impl<T: Serialize, const N: usize> Serialize for FixedSlots<T, N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let valid = self.valid();
        let mut seq = serializer.serialize_seq(Some(valid.len()))?;
        for item in valid {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn read_consumes_full_capacity_even_with_small_declared_count() -> TestResult {
        let data = [1u8, 2, 3, 4, 0xEE];
        let mut r = ByteReader::new(&data);
        let slots: FixedSlots<u8, 4> = FixedSlots::read(&mut r, 1, 2, |e| e.u8())?;
        assert_eq!(slots.valid(), &[1, 2]);
        assert_eq!(slots.all(), &[1, 2, 3, 4]);
        assert_eq!(r.u8()?, 0xEE, "reader must sit after all four slots");
        Ok(())
    }

    #[test]
    fn declared_count_above_capacity_is_clamped() {
        let slots = FixedSlots::<u8, 3>::from_slots(vec![7, 8, 9], 200);
        let slots = slots.unwrap_or_default();
        assert_eq!(slots.declared_len(), 200);
        assert_eq!(slots.valid_len(), 3);
        assert_eq!(slots.get(2), Some(&9));
        assert_eq!(slots.get(3), None);
    }

    #[test]
    fn get_outside_valid_prefix_is_none() {
        let slots = FixedSlots::<u8, 3>::from_slots(vec![7, 8, 9], 1).unwrap_or_default();
        assert_eq!(slots.get(0), Some(&7));
        assert_eq!(slots.get(1), None);
        assert_eq!(slots.iter().count(), 1);
    }

    #[test]
    fn from_slots_rejects_wrong_length() {
        assert!(FixedSlots::<u8, 3>::from_slots(vec![1, 2], 2).is_none());
    }

    #[test]
    fn default_is_full_capacity_with_empty_prefix() {
        let slots = FixedSlots::<u16, 5>::default();
        assert_eq!(slots.all().len(), 5);
        assert!(slots.is_empty());
    }
}
