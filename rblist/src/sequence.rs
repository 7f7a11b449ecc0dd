use crate::iter::{Chars, Chunks};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::{
    cell::RefCell,
    collections::VecDeque,
    fmt,
    sync::{Arc, OnceLock},
};

/// Sequences shorter than this are always stored as a single flat leaf.
#[cfg(test)]
pub const MIN_NODE_LENGTH: usize = 8;
#[cfg(not(test))]
pub const MIN_NODE_LENGTH: usize = 64;

const COIN_SEED: u64 = 0x7162_6c69_7374;

thread_local! {
    static COIN: RefCell<SmallRng> = RefCell::new(SmallRng::seed_from_u64(COIN_SEED));
}

/// Draw a value in `0..total`.
fn flip(total: usize) -> usize {
    COIN.with(|rng| rng.borrow_mut().gen_range(0..total))
}

pub(crate) enum Repr {
    Leaf {
        chars: Box<[char]>,
        newlines: usize,
    },
    Node {
        len: usize,
        newlines: usize,
        left: Sequence,
        right: Sequence,
    },
}

/// An immutable, structurally shared sequence of characters.
///
/// Cloning is O(1). Length and newline count are cached at every level of the tree.
#[derive(Clone)]
pub struct Sequence(pub(crate) Arc<Repr>);

impl Sequence {
    /// The shared empty sequence.
    pub fn empty() -> Self {
        static EMPTY: OnceLock<Sequence> = OnceLock::new();
        EMPTY
            .get_or_init(|| {
                Sequence(Arc::new(Repr::Leaf {
                    chars: Box::default(),
                    newlines: 0,
                }))
            })
            .clone()
    }

    pub fn singleton(ch: char) -> Self {
        Self::leaf(vec![ch])
    }

    fn leaf(chars: Vec<char>) -> Self {
        if chars.is_empty() {
            return Self::empty();
        }
        debug_assert!(chars.len() < MIN_NODE_LENGTH);
        let newlines = chars.iter().filter(|&&ch| ch == '\n').count();
        Sequence(Arc::new(Repr::Leaf {
            chars: chars.into_boxed_slice(),
            newlines,
        }))
    }

    fn node(left: Sequence, right: Sequence) -> Self {
        Sequence(Arc::new(Repr::Node {
            len: left.len() + right.len(),
            newlines: left.newlines() + right.newlines(),
            left,
            right,
        }))
    }

    /// Build a sequence from a run of characters by recursive concatenation, so the
    /// result has the same shape distribution as one grown edit by edit.
    pub fn from_chars(chars: &[char]) -> Self {
        if chars.len() < MIN_NODE_LENGTH {
            return Self::leaf(chars.to_vec());
        }
        let (left, right) = chars.split_at(chars.len() / 2);
        Self::from_chars(left).concat(&Self::from_chars(right))
    }

    pub fn len(&self) -> usize {
        match &*self.0 {
            Repr::Leaf { chars, .. } => chars.len(),
            Repr::Node { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `'\n'` characters in the sequence.
    pub fn newlines(&self) -> usize {
        match &*self.0 {
            Repr::Leaf { newlines, .. } | Repr::Node { newlines, .. } => *newlines,
        }
    }

    /// Depth of the tree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        match &*self.0 {
            Repr::Leaf { .. } => 1,
            Repr::Node { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Concatenate two sequences.
    ///
    /// Small results are flattened into a single leaf. Otherwise a coin weighted by the
    /// operand lengths decides which side keeps its outer child: with probability
    /// `self.len() / total` the left operand's left child is kept and the merge recurses
    /// into its right child, otherwise the right operand's right child is kept and the
    /// merge recurses into its left child. A leaf chosen by the coin has no children to
    /// descend into and becomes a direct child of the new node.
    pub fn concat(&self, other: &Sequence) -> Sequence {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }

        let total = self.len() + other.len();
        if total < MIN_NODE_LENGTH {
            let mut chars = Vec::with_capacity(total);
            chars.extend(self.chars());
            chars.extend(other.chars());
            return Self::leaf(chars);
        }

        let keep_left = flip(total) < self.len();
        match (keep_left, &*self.0, &*other.0) {
            (true, Repr::Node { left, right, .. }, _) => {
                Self::node(left.clone(), right.concat(other))
            }
            (false, _, Repr::Node { left, right, .. }) => {
                Self::node(self.concat(left), right.clone())
            }
            _ => Self::node(self.clone(), other.clone()),
        }
    }

    /// The characters in `from..to`.
    ///
    /// Subtrees lying wholly inside the range are shared; only boundary leaves are
    /// copied.
    ///
    /// # Panics
    ///
    /// Panics if `from > to` or `to > self.len()`.
    pub fn substring(&self, from: usize, to: usize) -> Sequence {
        assert!(
            from <= to && to <= self.len(),
            "substring {from}..{to} out of range for sequence of length {}",
            self.len()
        );
        if from == to {
            return Self::empty();
        }
        if from == 0 && to == self.len() {
            return self.clone();
        }

        match &*self.0 {
            Repr::Leaf { chars, .. } => Self::leaf(chars[from..to].to_vec()),
            Repr::Node { left, right, .. } => {
                let mid = left.len();
                if to <= mid {
                    left.substring(from, to)
                } else if from >= mid {
                    right.substring(from - mid, to - mid)
                } else {
                    left.substring(from, mid).concat(&right.substring(0, to - mid))
                }
            }
        }
    }

    /// Replace `from..to` with `insert`, sharing everything outside the range.
    pub fn splice(&self, from: usize, to: usize, insert: &Sequence) -> Sequence {
        self.substring(0, from)
            .concat(insert)
            .concat(&self.substring(to, self.len()))
    }

    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn char_at(&self, index: usize) -> char {
        assert!(
            index < self.len(),
            "index {index} out of range for sequence of length {}",
            self.len()
        );
        let mut node = self;
        let mut index = index;
        loop {
            match &*node.0 {
                Repr::Leaf { chars, .. } => return chars[index],
                Repr::Node { left, right, .. } => {
                    if index < left.len() {
                        node = left;
                    } else {
                        index -= left.len();
                        node = right;
                    }
                }
            }
        }
    }

    /// Index of the `n`th (0-based) newline, if there are more than `n` of them.
    pub fn nth_newline(&self, n: usize) -> Option<usize> {
        if n >= self.newlines() {
            return None;
        }
        let mut node = self;
        let mut n = n;
        let mut base = 0;
        loop {
            match &*node.0 {
                Repr::Leaf { chars, .. } => {
                    let ix = chars
                        .iter()
                        .enumerate()
                        .filter(|&(_, &ch)| ch == '\n')
                        .nth(n)
                        .map(|(ix, _)| ix)?;
                    return Some(base + ix);
                }
                Repr::Node { left, right, .. } => {
                    if n < left.newlines() {
                        node = left;
                    } else {
                        n -= left.newlines();
                        base += left.len();
                        node = right;
                    }
                }
            }
        }
    }

    /// Number of newlines strictly before `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > self.len()`.
    pub fn newlines_before(&self, index: usize) -> usize {
        assert!(
            index <= self.len(),
            "index {index} out of range for sequence of length {}",
            self.len()
        );
        let mut node = self;
        let mut index = index;
        let mut count = 0;
        loop {
            match &*node.0 {
                Repr::Leaf { chars, .. } => {
                    return count + chars[..index].iter().filter(|&&ch| ch == '\n').count();
                }
                Repr::Node { left, right, .. } => {
                    if index <= left.len() {
                        node = left;
                    } else {
                        index -= left.len();
                        count += left.newlines();
                        node = right;
                    }
                }
            }
        }
    }

    pub fn chars(&self) -> Chars<'_> {
        Chars::new(self, 0)
    }

    /// Characters from `index` to the end.
    ///
    /// # Panics
    ///
    /// Panics if `index > self.len()`.
    pub fn chars_at(&self, index: usize) -> Chars<'_> {
        assert!(
            index <= self.len(),
            "index {index} out of range for sequence of length {}",
            self.len()
        );
        Chars::new(self, index)
    }

    /// The flat leaf slices of the sequence, in order.
    pub fn chunks(&self) -> Chunks<'_> {
        Chunks::new(self)
    }

    /// First occurrence of `needle` starting at or after `from`.
    pub fn find(&self, needle: &str, from: usize) -> Option<usize> {
        let needle: Vec<char> = needle.chars().collect();
        if from > self.len() || needle.len() > self.len() - from {
            return None;
        }
        if needle.is_empty() {
            return Some(from);
        }

        let mut window = VecDeque::with_capacity(needle.len());
        for (ix, ch) in self.chars_at(from).enumerate() {
            if window.len() == needle.len() {
                window.pop_front();
            }
            window.push_back(ch);
            if window == needle {
                return Some(from + ix + 1 - needle.len());
            }
        }
        None
    }

    /// Last occurrence of `needle` that ends at or before `before`.
    pub fn rfind(&self, needle: &str, before: usize) -> Option<usize> {
        let needle: Vec<char> = needle.chars().collect();
        let before = before.min(self.len());
        if needle.len() > before {
            return None;
        }
        if needle.is_empty() {
            return Some(before);
        }

        let mut window = VecDeque::with_capacity(needle.len());
        let mut found = None;
        for (ix, ch) in self.chars().take(before).enumerate() {
            if window.len() == needle.len() {
                window.pop_front();
            }
            window.push_back(ch);
            if window == needle {
                found = Some(ix + 1 - needle.len());
            }
        }
        found
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.len() == other.len() && self.chars().eq(other.chars()))
    }
}

impl Eq for Sequence {}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.chunks() {
            for &ch in chunk {
                fmt::Write::write_char(f, ch)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Sequence").field(&self.to_string()).finish()
    }
}

impl From<&str> for Sequence {
    fn from(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        Self::from_chars(&chars)
    }
}

impl From<String> for Sequence {
    fn from(text: String) -> Self {
        Self::from(text.as_str())
    }
}

impl From<char> for Sequence {
    fn from(ch: char) -> Self {
        Self::singleton(ch)
    }
}

impl FromIterator<char> for Sequence {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let chars: Vec<char> = iter.into_iter().collect();
        Self::from_chars(&chars)
    }
}
