// Sliding-window match finder.
//
// Maintains the most recent 4096 consumed input bytes and, at each
// position, finds the longest back-reference into them. Comparison is
// cyclic: a candidate match may extend past its own source span, which
// mirrors the decoder's self-overlapping copies and lets a short seed
// encode a long run.

use std::collections::VecDeque;

use super::token::{MATCH_MIN, Token, WINDOW_SIZE};

// ---------------------------------------------------------------------------
// SlidingWindow
// ---------------------------------------------------------------------------

/// Longest-match search over the most recent [`WINDOW_SIZE`] input bytes.
///
/// Candidate positions are bucketed by their byte value, so only
/// positions whose byte equals the next input byte are compared.
pub struct SlidingWindow<'a> {
    data: &'a [u8],
    buckets: Vec<VecDeque<usize>>,
    /// Oldest position still inside the window.
    start: usize,
    /// One past the newest position inside the window; also the next
    /// input position to encode.
    stop: usize,
    full: bool,
    match_max: usize,
}

impl<'a> SlidingWindow<'a> {
    /// A window over `data` with matches capped at `match_max` bytes.
    pub fn new(data: &'a [u8], match_max: usize) -> Self {
        Self {
            data,
            buckets: (0..=u8::MAX as usize).map(|_| VecDeque::new()).collect(),
            start: 0,
            stop: 0,
            full: false,
            match_max: match_max.min(WINDOW_SIZE),
        }
    }

    /// Slide the window forward over one consumed byte.
    fn push(&mut self) {
        if self.full {
            let evicted = self.data[self.start];
            self.buckets[evicted as usize].pop_front();
            self.start += 1;
        }
        let entering = self.data[self.stop];
        self.buckets[entering as usize].push_back(self.stop);
        self.stop += 1;
        if !self.full && self.stop - self.start >= WINDOW_SIZE {
            self.full = true;
        }
    }

    /// Slide the window forward over `n` consumed bytes. Advancing past
    /// the end of the input clamps to the end.
    pub fn advance(&mut self, n: usize) {
        let n = n.min(self.data.len() - self.stop);
        for _ in 0..n {
            self.push();
        }
    }

    /// Longest match for the input at the window's leading edge, as
    /// `(length, displacement)`.
    ///
    /// Candidates are scanned newest-first, so ties resolve to the
    /// smallest displacement. Returns `None` when no candidate reaches
    /// [`MATCH_MIN`], or when the whole input has been consumed.
    pub fn search(&self) -> Option<(usize, usize)> {
        let here = self.stop;
        if here >= self.data.len() {
            return None;
        }

        let mut best: Option<(usize, usize)> = None;
        for &candidate in self.buckets[self.data[here] as usize].iter().rev() {
            let length = self.match_len(candidate, here);
            if length >= MATCH_MIN && best.is_none_or(|(l, _)| length > l) {
                best = Some((length, here - candidate));
                if length >= self.match_max {
                    break;
                }
            }
        }
        best
    }

    /// Cyclic comparison: the k-th byte ahead of `here` compares against
    /// `data[candidate + (k mod span)]`, `span` being the displacement.
    fn match_len(&self, candidate: usize, here: usize) -> usize {
        let span = here - candidate;
        if span == 0 {
            return 0;
        }
        let limit = (self.data.len() - here).min(self.match_max);
        let mut length = 0;
        while length < limit && self.data[candidate + length % span] == self.data[here + length] {
            length += 1;
        }
        length
    }
}

// ---------------------------------------------------------------------------
// MatchTokens
// ---------------------------------------------------------------------------

/// Greedy tokenization of raw input: one `Match` per accepted candidate,
/// one `Literal` per byte nothing matched.
pub struct MatchTokens<'a> {
    input: &'a [u8],
    window: SlidingWindow<'a>,
    pos: usize,
}

impl<'a> MatchTokens<'a> {
    pub fn new(input: &'a [u8], match_max: usize) -> Self {
        Self {
            input,
            window: SlidingWindow::new(input, match_max),
            pos: 0,
        }
    }
}

impl Iterator for MatchTokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.pos >= self.input.len() {
            return None;
        }
        match self.window.search() {
            Some((length, displacement)) => {
                self.window.advance(length);
                self.pos += length;
                Some(Token::Match {
                    length,
                    displacement,
                })
            }
            None => {
                let b = self.input[self.pos];
                self.window.advance(1);
                self.pos += 1;
                Some(Token::Literal(b))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
