//! Cache-line padded storage.
//!
//! [`CachelineSlot<T>`] aligns its value to [`CACHELINE_SIZE`] and rounds its
//! size up to a whole multiple of it, so adjacent slots in an array never
//! share a cache line. Padding is derived from the alignment by the compiler,
//! which covers payloads smaller than, equal to, and larger than a line with
//! one wrapper.

use crossbeam_utils::CachePadded;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Size in bytes of the false-sharing unit on the target platform.
///
/// Taken from `crossbeam_utils::CachePadded`: 128 bytes on x86_64 and
/// aarch64 (adjacent-line prefetch pulls lines in pairs), 64 on most other
/// targets.
pub const CACHELINE_SIZE: usize = std::mem::align_of::<CachePadded<u8>>();

/// A value padded and aligned to occupy whole cache lines.
///
/// ```
/// use tickwire::{CachelineSlot, CACHELINE_SIZE};
///
/// let slot = CachelineSlot::new(7u32);
/// assert_eq!(*slot, 7);
/// assert_eq!(std::mem::size_of_val(&slot) % CACHELINE_SIZE, 0);
/// ```
#[repr(transparent)]
pub struct CachelineSlot<T> {
    value: CachePadded<T>,
}

impl<T> CachelineSlot<T> {
    /// Wraps `value` in its own cache line(s).
    #[inline]
    pub const fn new(value: T) -> Self {
        Self {
            value: CachePadded::new(value),
        }
    }

    /// Unwraps the padded value.
    #[inline]
    pub fn into_inner(self) -> T {
        CachePadded::into_inner(self.value)
    }
}

impl<T> Deref for CachelineSlot<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for CachelineSlot<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T> AsRef<T> for CachelineSlot<T> {
    fn as_ref(&self) -> &T {
        self
    }
}

impl<T> AsMut<T> for CachelineSlot<T> {
    fn as_mut(&mut self) -> &mut T {
        self
    }
}

impl<T> From<T> for CachelineSlot<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Default> Default for CachelineSlot<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone> Clone for CachelineSlot<T> {
    fn clone(&self) -> Self {
        Self::new((**self).clone())
    }
}

impl<T: Copy> Copy for CachelineSlot<T> {}

impl<T: PartialEq> PartialEq for CachelineSlot<T> {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl<T: Eq> Eq for CachelineSlot<T> {}

impl<T: fmt::Debug> fmt::Debug for CachelineSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachelineSlot")
            .field("value", &**self)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{align_of, size_of};

    #[repr(C, packed)]
    #[derive(Clone, Copy)]
    struct Unaligned {
        bits: u8,
        payload: u64,
    }

    type OneByteOver = [u8; CACHELINE_SIZE + 1];
    type ExactlyOne = [u8; CACHELINE_SIZE];
    type TwoLines = [u8; CACHELINE_SIZE * 2];

    #[test]
    fn test_pads_small_values_to_one_line() {
        assert_eq!(size_of::<CachelineSlot<Unaligned>>(), CACHELINE_SIZE);
        assert_eq!(size_of::<CachelineSlot<u8>>(), CACHELINE_SIZE);
    }

    #[test]
    fn test_pads_to_additional_line_when_larger() {
        assert_eq!(size_of::<CachelineSlot<OneByteOver>>(), CACHELINE_SIZE * 2);
    }

    #[test]
    fn test_exact_multiples_get_no_extra_padding() {
        assert_eq!(size_of::<CachelineSlot<ExactlyOne>>(), CACHELINE_SIZE);
        assert_eq!(size_of::<CachelineSlot<TwoLines>>(), CACHELINE_SIZE * 2);
    }

    #[test]
    fn test_alignment_is_one_line() {
        assert_eq!(align_of::<CachelineSlot<Unaligned>>(), CACHELINE_SIZE);
        assert_eq!(align_of::<CachelineSlot<OneByteOver>>(), CACHELINE_SIZE);
        assert_eq!(align_of::<CachelineSlot<ExactlyOne>>(), CACHELINE_SIZE);
        assert_eq!(align_of::<CachelineSlot<TwoLines>>(), CACHELINE_SIZE);
    }

    #[test]
    fn test_array_elements_never_share_a_line() {
        let slots = [CachelineSlot::new(1u64), CachelineSlot::new(2u64)];
        let first = std::ptr::addr_of!(slots[0]) as usize;
        let second = std::ptr::addr_of!(slots[1]) as usize;
        assert_eq!(first % CACHELINE_SIZE, 0);
        assert!(second - first >= CACHELINE_SIZE);
    }

    #[test]
    fn test_acts_like_underlying_value() {
        let slot = CachelineSlot::new(Unaligned {
            bits: 1,
            payload: 2,
        });
        assert_eq!(slot.bits, 1);
        let payload = slot.payload;
        assert_eq!(payload, 2);

        let inner: &Unaligned = slot.as_ref();
        assert_eq!(inner.bits, 1);
    }

    #[test]
    fn test_moves_value_in_and_out() {
        let mut slot: CachelineSlot<String> = String::from("120 / 80").into();
        slot.push_str(" mmHg");
        assert_eq!(slot.into_inner(), "120 / 80 mmHg");
    }
}
