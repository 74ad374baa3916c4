use crate::text::layout::OverflowOutcome;

/// Non-fatal corrections applied during composition.
///
/// These are returned to the caller rather than logged and discarded, so a
/// quality-review step can surface them per spread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Warning {
    /// An element intruded into the spine dead zone and was shifted.
    SpineShift { element_id: String, dx: i32 },
    /// An element was nudged back inside the safe zone.
    SafeZoneClamp { element_id: String, dx: i32, dy: i32 },
    /// Wrapped text exceeded its box height; trailing lines were dropped.
    TextTruncated {
        element_id: String,
        dropped_lines: usize,
    },
    /// Wrapped text exceeded its box height and draws past the bottom.
    TextOverflowed { element_id: String, extra_px: u32 },
    /// A single word was wider than the text box on its own.
    WideWord { element_id: String },
}

impl Warning {
    pub(crate) fn from_overflow(element_id: &str, outcome: OverflowOutcome) -> Option<Self> {
        match outcome {
            OverflowOutcome::Fit => None,
            OverflowOutcome::Truncated { dropped_lines } => Some(Self::TextTruncated {
                element_id: element_id.to_string(),
                dropped_lines,
            }),
            OverflowOutcome::Overflowed { extra_px } => Some(Self::TextOverflowed {
                element_id: element_id.to_string(),
                extra_px,
            }),
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SpineShift { element_id, dx } => {
                write!(f, "element '{element_id}' shifted {dx}px off the spine band")
            }
            Self::SafeZoneClamp { element_id, dx, dy } => {
                write!(
                    f,
                    "element '{element_id}' clamped into the safe zone by ({dx}, {dy})px"
                )
            }
            Self::TextTruncated {
                element_id,
                dropped_lines,
            } => write!(
                f,
                "element '{element_id}' text truncated ({dropped_lines} lines dropped)"
            ),
            Self::TextOverflowed {
                element_id,
                extra_px,
            } => write!(
                f,
                "element '{element_id}' text overflows its box by {extra_px}px"
            ),
            Self::WideWord { element_id } => {
                write!(f, "element '{element_id}' contains a word wider than its box")
            }
        }
    }
}
