use std::fmt;

const WORD_BITS: usize = 64;

/// Fixed-length set of bits backed by 64-bit words.
///
/// Used as membership set for features and as the survival mask of contacts.
/// Indices beyond `len()` are a programming error and panic in the underlying
/// slice access, matching how the rest of the crate treats dense indices.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct BitSet {
    words: Vec<u64>,
    len: usize,
}

impl BitSet {
    pub fn new(len: usize, set_all: bool) -> Self {
        let mut bits = Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        };
        if set_all {
            bits.set_all();
        }
        bits
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn locate(index: usize) -> (usize, u64) {
        (index / WORD_BITS, 1u64 << (index % WORD_BITS))
    }

    #[inline]
    pub fn get(&self, index: usize) -> bool {
        debug_assert!(index < self.len, "bit index {index} out of range");
        let (word, mask) = Self::locate(index);
        self.words[word] & mask != 0
    }

    #[inline]
    pub fn set(&mut self, index: usize) {
        debug_assert!(index < self.len, "bit index {index} out of range");
        let (word, mask) = Self::locate(index);
        self.words[word] |= mask;
    }

    #[inline]
    pub fn clear(&mut self, index: usize) {
        debug_assert!(index < self.len, "bit index {index} out of range");
        let (word, mask) = Self::locate(index);
        self.words[word] &= !mask;
    }

    #[inline]
    pub fn flip(&mut self, index: usize) {
        debug_assert!(index < self.len, "bit index {index} out of range");
        let (word, mask) = Self::locate(index);
        self.words[word] ^= mask;
    }

    /// Sets every listed bit.
    pub fn set_bits(&mut self, indices: &[usize]) {
        for &i in indices {
            self.set(i);
        }
    }

    pub fn set_range(&mut self, start: usize, end: usize) {
        for i in start..end.min(self.len) {
            self.set(i);
        }
    }

    pub fn clear_range(&mut self, start: usize, end: usize) {
        for i in start..end.min(self.len) {
            self.clear(i);
        }
    }

    pub fn is_range_set(&self, start: usize, end: usize) -> bool {
        (start..end.min(self.len)).all(|i| self.get(i))
    }

    pub fn is_range_clear(&self, start: usize, end: usize) -> bool {
        (start..end.min(self.len)).all(|i| !self.get(i))
    }

    pub fn set_all(&mut self) {
        self.words.fill(u64::MAX);
        self.mask_tail();
    }

    pub fn flip_all(&mut self) {
        for w in &mut self.words {
            *w = !*w;
        }
        self.mask_tail();
    }

    // Bits past `len` in the last word stay zero.
    fn mask_tail(&mut self) {
        let rem = self.len % WORD_BITS;
        if rem != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << rem) - 1;
            }
        }
    }

    pub fn is_all_set(&self) -> bool {
        self.size() == self.len
    }

    pub fn is_all_clear(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Number of set bits.
    pub fn size(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn union_with(&mut self, other: &BitSet) {
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a |= b;
        }
        self.mask_tail();
    }

    pub fn intersect_with(&mut self, other: &BitSet) {
        let shared = self.words.len().min(other.words.len());
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a &= b;
        }
        for a in &mut self.words[shared..] {
            *a = 0;
        }
    }

    pub fn difference_with(&mut self, other: &BitSet) {
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a &= !b;
        }
    }

    pub fn intersects(&self, other: &BitSet) -> bool {
        self.words
            .iter()
            .zip(&other.words)
            .any(|(a, b)| a & b != 0)
    }

    pub fn union(&self, other: &BitSet) -> BitSet {
        let mut out = self.clone();
        out.union_with(other);
        out
    }

    pub fn intersection(&self, other: &BitSet) -> BitSet {
        let mut out = self.clone();
        out.intersect_with(other);
        out
    }

    pub fn difference(&self, other: &BitSet) -> BitSet {
        let mut out = self.clone();
        out.difference_with(other);
        out
    }

    /// Iterates the indices of set bits in ascending order.
    pub fn iter(&self) -> Ones<'_> {
        Ones {
            words: &self.words,
            word_index: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    pub fn for_each(&self, mut f: impl FnMut(usize)) {
        for i in self.iter() {
            f(i);
        }
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }
}

pub struct Ones<'a> {
    words: &'a [u64],
    word_index: usize,
    current: u64,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.current == 0 {
            self.word_index += 1;
            self.current = *self.words.get(self.word_index)?;
        }
        let bit = self.current.trailing_zeros() as usize;
        self.current &= self.current - 1;
        Some(self.word_index * WORD_BITS + bit)
    }
}

impl<'a> IntoIterator for &'a BitSet {
    type Item = usize;
    type IntoIter = Ones<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitSet")
            .field("len", &self.len)
            .field("ones", &self.to_vec())
            .finish()
    }
}
