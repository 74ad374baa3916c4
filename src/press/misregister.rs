use crate::press::stage::PressStage;
use crate::scene::model::PrintConfig;

/// Channel misregistration: per-plate integer shifts, recombined.
///
/// Emulates press registration error; sampling clamps at the image edges so
/// no channel wraps around.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Misregister {
    pub shift_r: [i32; 2],
    pub shift_g: [i32; 2],
    pub shift_b: [i32; 2],
}

impl Misregister {
    pub fn from_config(config: &PrintConfig) -> Self {
        Self {
            shift_r: config.channel_shift_r,
            shift_g: config.channel_shift_g,
            shift_b: config.channel_shift_b,
        }
    }
}

impl PressStage for Misregister {
    fn name(&self) -> &'static str {
        "misregister"
    }

    fn is_neutral(&self) -> bool {
        self.shift_r == [0, 0] && self.shift_g == [0, 0] && self.shift_b == [0, 0]
    }

    fn apply(&self, image: &mut image::RgbImage) {
        if self.is_neutral() {
            return;
        }
        let (w, h) = image.dimensions();
        let src = image.clone();
        let shifts = [self.shift_r, self.shift_g, self.shift_b];

        for y in 0..h {
            for x in 0..w {
                let mut px = [0u8; 3];
                for (c, [dx, dy]) in shifts.iter().enumerate() {
                    let sx = (x as i64 - i64::from(*dx)).clamp(0, i64::from(w) - 1) as u32;
                    let sy = (y as i64 - i64::from(*dy)).clamp(0, i64::from(h) - 1) as u32;
                    px[c] = src.get_pixel(sx, sy).0[c];
                }
                image.put_pixel(x, y, image::Rgb(px));
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/press/misregister.rs"]
mod tests;
