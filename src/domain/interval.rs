//! Segmentation of a position sequence into holding intervals.
//!
//! A forward scan over positions driven by a two-state machine:
//!
//! - `Flat`: nothing held
//! - `Holding { kind, start }`: a long or short run opened at `start`
//!
//! Transitions:
//! - open:  Flat + non-flat position -> Holding
//! - close: Holding + flat position -> Flat, emits `[start, i-1]`
//! - flip:  Holding + opposite position -> Holding(new kind, i), emits `[start, i-1]`
//!
//! A run still open after the last index is closed at that index.

use crate::domain::signal::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntervalKind {
    Long,
    Short,
}

impl IntervalKind {
    pub fn from_position(position: Position) -> Option<Self> {
        match position {
            Position::Long => Some(IntervalKind::Long),
            Position::Short => Some(IntervalKind::Short),
            Position::Flat => None,
        }
    }

    pub fn position(self) -> Position {
        match self {
            IntervalKind::Long => Position::Long,
            IntervalKind::Short => Position::Short,
        }
    }
}

/// Inclusive index range `[start, end]` over which one non-flat position is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: usize,
    pub end: usize,
    pub kind: IntervalKind,
}

impl Interval {
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    pub fn bounds(&self) -> (usize, usize) {
        (self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmenterState {
    Flat,
    Holding { kind: IntervalKind, start: usize },
}

impl SegmenterState {
    /// Advance the machine by one index. Returns the next state and the
    /// interval completed by this step, if any.
    pub fn step(self, index: usize, position: Position) -> (SegmenterState, Option<Interval>) {
        let entered = IntervalKind::from_position(position);

        match (self, entered) {
            (SegmenterState::Flat, None) => (SegmenterState::Flat, None),
            (SegmenterState::Flat, Some(kind)) => (open(kind, index), None),
            (SegmenterState::Holding { kind, start }, None) => {
                (SegmenterState::Flat, Some(close(kind, start, index)))
            }
            (SegmenterState::Holding { kind, start }, Some(next)) if next != kind => {
                flip(kind, start, next, index)
            }
            (holding, Some(_)) => (holding, None),
        }
    }

    /// Close any run still open at the end of the sequence.
    pub fn finish(self, last_index: usize) -> Option<Interval> {
        match self {
            SegmenterState::Flat => None,
            SegmenterState::Holding { kind, start } => Some(Interval {
                start,
                end: last_index,
                kind,
            }),
        }
    }
}

fn open(kind: IntervalKind, index: usize) -> SegmenterState {
    SegmenterState::Holding { kind, start: index }
}

// `index` is the first index no longer held, always > start.
fn close(kind: IntervalKind, start: usize, index: usize) -> Interval {
    Interval {
        start,
        end: index - 1,
        kind,
    }
}

fn flip(
    kind: IntervalKind,
    start: usize,
    next: IntervalKind,
    index: usize,
) -> (SegmenterState, Option<Interval>) {
    (open(next, index), Some(close(kind, start, index)))
}

/// Long and short holding intervals, each ordered by start index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Intervals {
    pub long: Vec<Interval>,
    pub short: Vec<Interval>,
}

impl Intervals {
    fn push(&mut self, interval: Interval) {
        match interval.kind {
            IntervalKind::Long => self.long.push(interval),
            IntervalKind::Short => self.short.push(interval),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.long.is_empty() && self.short.is_empty()
    }

    pub fn count(&self) -> usize {
        self.long.len() + self.short.len()
    }

    /// Both lists merged and ordered by start index.
    pub fn all_sorted(&self) -> Vec<Interval> {
        let mut all: Vec<Interval> = self.long.iter().chain(&self.short).copied().collect();
        all.sort_by_key(|iv| iv.start);
        all
    }

    pub fn long_bounds(&self) -> Vec<(usize, usize)> {
        self.long.iter().map(Interval::bounds).collect()
    }

    pub fn short_bounds(&self) -> Vec<(usize, usize)> {
        self.short.iter().map(Interval::bounds).collect()
    }
}

pub fn segment(positions: &[Position]) -> Intervals {
    let mut intervals = Intervals::default();
    let mut state = SegmenterState::Flat;

    for (i, &position) in positions.iter().enumerate() {
        let (next, completed) = state.step(i, position);
        if let Some(interval) = completed {
            intervals.push(interval);
        }
        state = next;
    }

    if let Some(last) = positions.len().checked_sub(1) {
        if let Some(interval) = state.finish(last) {
            intervals.push(interval);
        }
    }

    intervals
}
