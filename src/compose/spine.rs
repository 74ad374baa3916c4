use crate::foundation::core::{PageHalf, RectPx};
use crate::scene::model::PrintConfig;

/// Resolved horizontal extent of the spine dead zone, buffer included.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpineBand {
    /// Inclusive left edge of the forbidden band.
    pub start: f64,
    /// Inclusive right edge of the forbidden band.
    pub end: f64,
}

/// Outcome of guarding one candidate placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GuardOutcome {
    /// Placement already clears the band.
    Clear,
    /// Placement was shifted horizontally by the contained delta.
    Shifted { dx: i32 },
}

impl SpineBand {
    pub fn from_config(config: &PrintConfig) -> Self {
        let half = config.spine_width / 2.0;
        Self {
            start: config.spine_center - half - config.spine_buffer,
            end: config.spine_center + half + config.spine_buffer,
        }
    }

    fn intersects(&self, rect: RectPx) -> bool {
        f64::from(rect.x) < self.end && f64::from(rect.right()) > self.start
    }

    /// Detect intrusion into the dead zone and compute the minimal
    /// horizontal shift that clears it.
    ///
    /// Left-half elements escape further left, right-half elements further
    /// right; after a shift `x + width <= start` or `x >= end` respectively.
    /// The check is deliberately independent of any upstream content
    /// validation: geometric correctness holds even if nothing vetted the
    /// layout before us.
    pub fn guard(&self, rect: RectPx, half: PageHalf) -> (RectPx, GuardOutcome) {
        if !self.intersects(rect) {
            return (rect, GuardOutcome::Clear);
        }

        let new_x = match half {
            PageHalf::Left => self.start.floor() as i32 - rect.width as i32,
            PageHalf::Right => self.end.ceil() as i32,
        };
        let dx = new_x - rect.x;
        (
            RectPx {
                x: new_x,
                ..rect
            },
            GuardOutcome::Shifted { dx },
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/spine.rs"]
mod tests;
