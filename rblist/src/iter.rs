use crate::sequence::{Repr, Sequence};
use std::slice;

/// Iterator over the characters of a [`Sequence`].
///
/// Walks the tree with an explicit stack of pending right subtrees, so no part of the
/// text is copied.
pub struct Chars<'a> {
    pending: Vec<&'a Sequence>,
    leaf: slice::Iter<'a, char>,
}

impl<'a> Chars<'a> {
    pub(crate) fn new(seq: &'a Sequence, start: usize) -> Self {
        let mut pending = Vec::new();
        let mut node = seq;
        let mut start = start;
        loop {
            match &*node.0 {
                Repr::Leaf { chars, .. } => {
                    return Self {
                        pending,
                        leaf: chars[start..].iter(),
                    };
                }
                Repr::Node { left, right, .. } => {
                    if start < left.len() {
                        pending.push(right);
                        node = left;
                    } else {
                        start -= left.len();
                        node = right;
                    }
                }
            }
        }
    }
}

impl Iterator for Chars<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        loop {
            if let Some(&ch) = self.leaf.next() {
                return Some(ch);
            }
            let mut node = self.pending.pop()?;
            loop {
                match &*node.0 {
                    Repr::Leaf { chars, .. } => {
                        self.leaf = chars.iter();
                        break;
                    }
                    Repr::Node { left, right, .. } => {
                        self.pending.push(right);
                        node = left;
                    }
                }
            }
        }
    }
}

/// Iterator over the leaf slices of a [`Sequence`].
pub struct Chunks<'a> {
    pending: Vec<&'a Sequence>,
}

impl<'a> Chunks<'a> {
    pub(crate) fn new(seq: &'a Sequence) -> Self {
        Self {
            pending: vec![seq],
        }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a [char];

    fn next(&mut self) -> Option<&'a [char]> {
        while let Some(node) = self.pending.pop() {
            match &*node.0 {
                Repr::Leaf { chars, .. } if chars.is_empty() => continue,
                Repr::Leaf { chars, .. } => return Some(chars),
                Repr::Node { left, right, .. } => {
                    self.pending.push(right);
                    self.pending.push(left);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::Sequence;

    #[test]
    fn chars_from_every_start() {
        let text = "abcdefghijklmnopqrstuvwxyz\n0123456789";
        let seq = Sequence::from(text);
        for start in 0..=seq.len() {
            let expected: String = text.chars().skip(start).collect();
            assert_eq!(seq.chars_at(start).collect::<String>(), expected);
        }
    }

    #[test]
    fn chunks_cover_the_text() {
        let text = "a longer piece of text that spans several leaves";
        let seq = Sequence::from(text);
        let joined: String = seq.chunks().flatten().collect();
        assert_eq!(joined, text);
        assert!(seq.chunks().count() > 1);
    }

    #[test]
    fn empty_sequence_yields_nothing() {
        let seq = Sequence::empty();
        assert_eq!(seq.chars().next(), None);
        assert_eq!(seq.chunks().next(), None);
    }
}
