use crate::press::stage::PressStage;
use crate::scene::model::PrintConfig;

/// Vignette: radial multiplicative falloff centered on the image.
///
/// The periphery darkens by up to `intensity`; the exact center is
/// untouched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vignette {
    pub intensity: f32,
}

impl Vignette {
    pub fn from_config(config: &PrintConfig) -> Self {
        Self {
            intensity: config.vignette_intensity,
        }
    }
}

impl PressStage for Vignette {
    fn name(&self) -> &'static str {
        "vignette"
    }

    fn is_neutral(&self) -> bool {
        self.intensity == 0.0
    }

    fn apply(&self, image: &mut image::RgbImage) {
        if self.is_neutral() {
            return;
        }
        let (w, h) = image.dimensions();
        let cx = f64::from(w) / 2.0;
        let cy = f64::from(h) / 2.0;
        let max_r2 = cx * cx + cy * cy;
        let intensity = f64::from(self.intensity.clamp(0.0, 1.0));

        for y in 0..h {
            let dy = (f64::from(y) + 0.5) - cy;
            for x in 0..w {
                let dx = (f64::from(x) + 0.5) - cx;
                let falloff = 1.0 - intensity * ((dx * dx + dy * dy) / max_r2);
                let px = image.get_pixel_mut(x, y);
                for c in &mut px.0 {
                    *c = (f64::from(*c) * falloff).round().clamp(0.0, 255.0) as u8;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/press/vignette.rs"]
mod tests;
