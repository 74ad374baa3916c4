use crate::press::stage::PressStage;
use crate::scene::model::PrintConfig;

/// Dot gain: a monotonic gamma-style curve that darkens midtones,
/// emulating ink spread on absorbent paper.
///
/// The curve is deliberately not idempotent: running it twice compounds the
/// exponent, which the regression tests rely on to catch accidental double
/// application.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotGain {
    pub gamma: f32,
}

impl DotGain {
    pub fn from_config(config: &PrintConfig) -> Self {
        Self {
            gamma: config.dot_gain_gamma,
        }
    }

    fn lut(&self) -> [u8; 256] {
        let mut lut = [0u8; 256];
        if self.is_neutral() {
            for (i, v) in lut.iter_mut().enumerate() {
                *v = i as u8;
            }
            return lut;
        }
        for (i, v) in lut.iter_mut().enumerate() {
            let t = (i as f32) / 255.0;
            *v = (t.powf(self.gamma) * 255.0).round().clamp(0.0, 255.0) as u8;
        }
        lut
    }
}

impl PressStage for DotGain {
    fn name(&self) -> &'static str {
        "dot_gain"
    }

    fn is_neutral(&self) -> bool {
        self.gamma == 1.0
    }

    fn apply(&self, image: &mut image::RgbImage) {
        if self.is_neutral() {
            return;
        }
        let lut = self.lut();
        for px in image.pixels_mut() {
            for c in &mut px.0 {
                *c = lut[*c as usize];
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/press/dot_gain.rs"]
mod tests;
