use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{PlatenError, PlatenResult};

/// Row-major premultiplied RGBA8 pixel buffer.
///
/// Owned exclusively by one composition call; it is built up in place and
/// returned as the finished spread, never shared mid-flight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Allocate a transparent surface.
    pub fn new(width: u32, height: u32) -> PlatenResult<Self> {
        if width == 0 || height == 0 {
            return Err(PlatenError::invalid_layout(
                "surface dimensions must be > 0",
            ));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| PlatenError::invalid_layout("surface byte size overflow"))?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; len],
        })
    }

    /// Wrap an existing premultiplied RGBA8 buffer.
    pub fn from_premul_bytes(width: u32, height: u32, data: Vec<u8>) -> PlatenResult<Self> {
        if data.len()
            != (width as usize)
                .saturating_mul(height as usize)
                .saturating_mul(4)
        {
            return Err(PlatenError::render("surface byte len mismatch"));
        }
        if width == 0 || height == 0 {
            return Err(PlatenError::invalid_layout(
                "surface dimensions must be > 0",
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Fill the whole surface with one color.
    pub fn fill(&mut self, px: Rgba8Premul) {
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px.to_array());
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Rgba8Premul {
        debug_assert!(x < self.width && y < self.height);
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Rgba8Premul {
            r: self.data[i],
            g: self.data[i + 1],
            b: self.data[i + 2],
            a: self.data[i + 3],
        }
    }

    pub fn put(&mut self, x: u32, y: u32, px: Rgba8Premul) {
        debug_assert!(x < self.width && y < self.height);
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data[i..i + 4].copy_from_slice(&px.to_array());
    }

    /// Premul source-over blit of `src` at `(dst_x, dst_y)`, clipped to this
    /// surface's bounds.
    pub fn blit_over(&mut self, src: &Surface, dst_x: i32, dst_y: i32) {
        for sy in 0..src.height {
            let ty = dst_y + sy as i32;
            if ty < 0 || ty >= self.height as i32 {
                continue;
            }
            for sx in 0..src.width {
                let tx = dst_x + sx as i32;
                if tx < 0 || tx >= self.width as i32 {
                    continue;
                }
                let s = src.get(sx, sy);
                if s.a == 0 {
                    continue;
                }
                let d = self.get(tx as u32, ty as u32);
                self.put(tx as u32, ty as u32, over(d, s));
            }
        }
    }
}

/// Premultiplied source-over for a single pixel.
pub fn over(dst: Rgba8Premul, src: Rgba8Premul) -> Rgba8Premul {
    if src.a == 255 {
        return src;
    }
    if src.a == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(src.a);
    let blend = |s: u8, d: u8| -> u8 {
        let dc = ((u32::from(d) * u32::from(inv)) + 127) / 255;
        (u32::from(s) + dc).min(255) as u8
    };

    Rgba8Premul {
        r: blend(src.r, dst.r),
        g: blend(src.g, dst.g),
        b: blend(src.b, dst.b),
        a: blend(src.a, dst.a),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/surface.rs"]
mod tests;
