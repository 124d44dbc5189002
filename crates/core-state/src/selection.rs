//! Selection model: anchor/focus points over block keys.
//!
//! Direction (`is_backward`) is resolved once against a document at
//! construction and then carried as data, so the derived start/end accessors
//! never need the document again. Offsets are character indices and are not
//! validated here; the engine checks keys at its boundary and callers that
//! need exact clamping use `clamp_to`.

use core_model::{BlockKey, Document};
use std::cmp::Ordering;

/// A (block key, character offset) location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Point {
    pub key: BlockKey,
    pub offset: usize,
}

impl Point {
    pub fn new(key: impl Into<BlockKey>, offset: usize) -> Self {
        Self {
            key: key.into(),
            offset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    anchor: Point,
    focus: Point,
    is_backward: bool,
}

impl Selection {
    /// Caret at `offset` inside block `key`.
    pub fn collapsed(key: impl Into<BlockKey>, offset: usize) -> Self {
        let p = Point::new(key, offset);
        Self {
            anchor: p.clone(),
            focus: p,
            is_backward: false,
        }
    }

    /// Selection from `anchor` to `focus`, resolving direction in `document`.
    ///
    /// Points whose keys are missing from `document` compare as forward.
    pub fn new(document: &Document, anchor: Point, focus: Point) -> Self {
        let is_backward = match (document.position(&anchor.key), document.position(&focus.key)) {
            (Some(a), Some(f)) => match f.cmp(&a) {
                Ordering::Less => true,
                Ordering::Equal => focus.offset < anchor.offset,
                Ordering::Greater => false,
            },
            _ => false,
        };
        Self {
            anchor,
            focus,
            is_backward,
        }
    }

    /// Construct with an explicit direction flag. Caller guarantees it matches
    /// document order.
    pub fn from_parts(anchor: Point, focus: Point, is_backward: bool) -> Self {
        Self {
            anchor,
            focus,
            is_backward,
        }
    }

    pub fn anchor(&self) -> &Point {
        &self.anchor
    }
    pub fn focus(&self) -> &Point {
        &self.focus
    }
    pub fn anchor_key(&self) -> &BlockKey {
        &self.anchor.key
    }
    pub fn anchor_offset(&self) -> usize {
        self.anchor.offset
    }
    pub fn focus_key(&self) -> &BlockKey {
        &self.focus.key
    }
    pub fn focus_offset(&self) -> usize {
        self.focus.offset
    }

    pub fn is_backward(&self) -> bool {
        self.is_backward
    }

    /// True when anchor and focus coincide (a caret).
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Document-order first point.
    pub fn start(&self) -> &Point {
        if self.is_backward {
            &self.focus
        } else {
            &self.anchor
        }
    }

    /// Document-order last point.
    pub fn end(&self) -> &Point {
        if self.is_backward {
            &self.anchor
        } else {
            &self.focus
        }
    }

    pub fn start_key(&self) -> &BlockKey {
        &self.start().key
    }
    pub fn start_offset(&self) -> usize {
        self.start().offset
    }
    pub fn end_key(&self) -> &BlockKey {
        &self.end().key
    }
    pub fn end_offset(&self) -> usize {
        self.end().offset
    }

    pub fn spans_single_block(&self) -> bool {
        self.start_key() == self.end_key()
    }

    /// Same keys and direction with new anchor/focus offsets.
    pub fn with_offsets(&self, anchor_offset: usize, focus_offset: usize) -> Self {
        Self {
            anchor: Point::new(self.anchor.key.clone(), anchor_offset),
            focus: Point::new(self.focus.key.clone(), focus_offset),
            is_backward: self.is_backward,
        }
    }

    /// Clamp both offsets to their block's text length in `document`.
    /// Points on unknown keys are left unchanged.
    pub fn clamp_to(&self, document: &Document) -> Self {
        let clamp = |p: &Point| {
            document
                .block(&p.key)
                .map(|b| p.offset.min(b.char_len()))
                .unwrap_or(p.offset)
        };
        self.with_offsets(clamp(&self.anchor), clamp(&self.focus))
    }

    /// True when both keys exist in `document`.
    pub fn is_valid_in(&self, document: &Document) -> bool {
        document.contains(&self.anchor.key) && document.contains(&self.focus.key)
    }
}
