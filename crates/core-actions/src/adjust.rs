//! Selection adjustment after a one-character edit at the front of blocks.
//!
//! Indent inserts one `\t` at the start of each affected block; outdent
//! removes one. These transforms move the anchor/focus offsets so the range
//! keeps covering the same logical text. They are pure and ignore keys.

use core_state::Selection;

/// Selection after a tab was inserted at the front of the affected blocks.
///
/// A boundary sitting at column 0 stays at column 0 (the start of the first
/// row is kept), except the focus of a forward selection, which always
/// moves. A range starting at column 0 therefore grows to cover the tab.
pub fn merge_indent_selection(selection: &Selection) -> Selection {
    let mut anchor = selection.anchor_offset();
    let mut focus = selection.focus_offset();

    if selection.is_backward() {
        if focus != 0 {
            focus += 1;
        }
        if anchor != 0 {
            anchor += 1;
        }
    } else {
        focus += 1;
        if anchor != 0 {
            anchor += 1;
        }
    }

    selection.with_offsets(anchor, focus)
}

/// Selection after one leading tab was removed from the affected blocks.
///
/// Both offsets recede by one whether or not their block actually lost a
/// character. Offsets are unsigned, so a boundary already at column 0 stays
/// at 0.
pub fn merge_outdent_selection(selection: &Selection) -> Selection {
    selection.with_offsets(
        selection.anchor_offset().saturating_sub(1),
        selection.focus_offset().saturating_sub(1),
    )
}
