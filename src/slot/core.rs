use std::fmt;

use serde::Serialize;

/// Attribute vocabulary reported by anchors.
///
/// Wider than [`SlotKind`]: the margin-relative variants and
/// `NotAnAttribute` exist in the vocabulary but classify to no slot, so a
/// holder accepts them into any slot without a kind check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorAttribute {
    Left,
    Right,
    Top,
    Bottom,
    Leading,
    Trailing,
    Width,
    Height,
    CenterX,
    CenterY,
    FirstBaseline,
    LastBaseline,
    LeftMargin,
    RightMargin,
    TopMargin,
    BottomMargin,
    LeadingMargin,
    TrailingMargin,
    CenterXWithinMargins,
    CenterYWithinMargins,
    NotAnAttribute,
}

/// Slot categories a holder can file an anchor under.
///
/// Declaration order carries no layout meaning; it only fixes the iteration
/// order of [`SlotKind::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotKind {
    Left,
    Right,
    Top,
    Bottom,
    Leading,
    Trailing,
    CenterX,
    CenterY,
    Width,
    Height,
    Baseline,
}

impl SlotKind {
    /// Every slot kind in declaration order.
    pub const ALL: [SlotKind; 11] = [
        SlotKind::Left,
        SlotKind::Right,
        SlotKind::Top,
        SlotKind::Bottom,
        SlotKind::Leading,
        SlotKind::Trailing,
        SlotKind::CenterX,
        SlotKind::CenterY,
        SlotKind::Width,
        SlotKind::Height,
        SlotKind::Baseline,
    ];

    /// Partial classification from the attribute vocabulary. Both baseline
    /// attributes fold into [`SlotKind::Baseline`]; margin variants and
    /// `NotAnAttribute` are unclassifiable.
    pub fn from_attribute(attribute: AnchorAttribute) -> Option<Self> {
        match attribute {
            AnchorAttribute::Left => Some(SlotKind::Left),
            AnchorAttribute::Right => Some(SlotKind::Right),
            AnchorAttribute::Top => Some(SlotKind::Top),
            AnchorAttribute::Bottom => Some(SlotKind::Bottom),
            AnchorAttribute::Leading => Some(SlotKind::Leading),
            AnchorAttribute::Trailing => Some(SlotKind::Trailing),
            AnchorAttribute::Width => Some(SlotKind::Width),
            AnchorAttribute::Height => Some(SlotKind::Height),
            AnchorAttribute::CenterX => Some(SlotKind::CenterX),
            AnchorAttribute::CenterY => Some(SlotKind::CenterY),
            AnchorAttribute::FirstBaseline | AnchorAttribute::LastBaseline => {
                Some(SlotKind::Baseline)
            }
            _ => None,
        }
    }

    /// Wire name used in diagnostics and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotKind::Left => "left",
            SlotKind::Right => "right",
            SlotKind::Top => "top",
            SlotKind::Bottom => "bottom",
            SlotKind::Leading => "leading",
            SlotKind::Trailing => "trailing",
            SlotKind::CenterX => "centerX",
            SlotKind::CenterY => "centerY",
            SlotKind::Width => "width",
            SlotKind::Height => "height",
            SlotKind::Baseline => "baseline",
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
