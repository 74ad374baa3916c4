use crate::canvas::surface::Surface;
use crate::foundation::error::{PlatenError, PlatenResult};
use crate::scene::model::OverflowPolicy;
use crate::text::wrap::wrap_greedy;

/// RGBA8 brush carried through Parley styling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// How a text block related to its box height after wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverflowOutcome {
    Fit,
    /// Trailing lines were dropped under [`OverflowPolicy::Truncate`].
    Truncated { dropped_lines: usize },
    /// Content draws past the box bottom under [`OverflowPolicy::Overflow`].
    Overflowed { extra_px: u32 },
}

/// A rasterized text block plus the non-fatal conditions met producing it.
#[derive(Clone, Debug)]
pub struct TextBlock {
    pub surface: Surface,
    pub overflow: OverflowOutcome,
    /// Some single word was wider than the box on its own; it occupies its
    /// own line and clips at the box edge.
    pub wide_word: bool,
}

/// Stateful Parley shaping engine plus `vello_cpu` glyph rasterization.
///
/// One engine lives for the duration of one composition call; nothing here is
/// shared across spreads, which keeps parallel composition race-free.
pub struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Wrap and rasterize a text block into its box.
    ///
    /// Lines stack top-down with baselines `leading_px` apart; the wrap is
    /// the greedy algorithm from [`wrap_greedy`] measured by real shaping.
    #[allow(clippy::too_many_arguments)]
    pub fn render_block(
        &mut self,
        content: &str,
        font_bytes: &[u8],
        size_px: f32,
        color: [u8; 4],
        box_width: u32,
        box_height: u32,
        leading_px: f32,
        policy: OverflowPolicy,
    ) -> PlatenResult<TextBlock> {
        if box_width == 0 || box_height == 0 {
            return Err(PlatenError::invalid_layout("text box must be > 0"));
        }
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PlatenError::invalid_layout(
                "text size_px must be finite and > 0",
            ));
        }
        if !leading_px.is_finite() || leading_px <= 0.0 {
            return Err(PlatenError::invalid_layout(
                "leading_px must be finite and > 0",
            ));
        }

        let family_name = self.register_family(font_bytes)?;
        let brush = TextBrushRgba8 {
            r: color[0],
            g: color[1],
            b: color[2],
            a: color[3],
        };

        // Greedy wrap measured by shaping each candidate line.
        let mut measure_err = None;
        let wrapped = wrap_greedy(content, box_width as f32, |candidate| {
            match self.shape_line(candidate, &family_name, size_px, brush) {
                Ok(layout) => layout.width(),
                Err(e) => {
                    measure_err.get_or_insert(e);
                    f32::INFINITY
                }
            }
        });
        if let Some(e) = measure_err {
            return Err(e);
        }

        let mut line_layouts = Vec::with_capacity(wrapped.lines.len());
        for line in &wrapped.lines {
            line_layouts.push(self.shape_line(line, &family_name, size_px, brush)?);
        }

        let line_height = line_layouts
            .first()
            .map(|l| l.height())
            .unwrap_or(size_px);
        let total = wrapped.lines.len();
        let content_height = |n: usize| -> f32 {
            if n == 0 {
                0.0
            } else {
                (n as f32 - 1.0) * leading_px + line_height
            }
        };

        let (kept, overflow) = if content_height(total) <= box_height as f32 {
            (total, OverflowOutcome::Fit)
        } else {
            match policy {
                OverflowPolicy::Error => {
                    return Err(PlatenError::geometry(format!(
                        "wrapped text ({total} lines) exceeds its {box_width}x{box_height} box"
                    )));
                }
                OverflowPolicy::Overflow => {
                    let extra = (content_height(total) - box_height as f32).ceil() as u32;
                    (total, OverflowOutcome::Overflowed { extra_px: extra })
                }
                OverflowPolicy::Truncate => {
                    let mut keep = total;
                    while keep > 1 && content_height(keep) > box_height as f32 {
                        keep -= 1;
                    }
                    (
                        keep,
                        OverflowOutcome::Truncated {
                            dropped_lines: total - keep,
                        },
                    )
                }
            }
        };

        let surface_height = (box_height as f32).max(content_height(kept)).ceil() as u32;
        let surface = self.rasterize_lines(
            &line_layouts[..kept],
            font_bytes,
            box_width,
            surface_height,
            leading_px,
        )?;

        Ok(TextBlock {
            surface,
            overflow,
            wide_word: wrapped.has_wide_word,
        })
    }

    fn register_family(&mut self, font_bytes: &[u8]) -> PlatenResult<String> {
        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font_bytes.to_vec()),
            None,
        );
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| PlatenError::font_not_found("no families in font data"))?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PlatenError::font_not_found("font family has no name"))?
            .to_string();
        Ok(name)
    }

    fn shape_line(
        &mut self,
        text: &str,
        family: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> PlatenResult<parley::Layout<TextBrushRgba8>> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family.to_string())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        // Wrap decisions are ours; each shaped layout is a single line.
        layout.break_all_lines(None);
        Ok(layout)
    }

    fn rasterize_lines(
        &mut self,
        lines: &[parley::Layout<TextBrushRgba8>],
        font_bytes: &[u8],
        width: u32,
        height: u32,
        leading_px: f32,
    ) -> PlatenResult<Surface> {
        let w16: u16 = width
            .try_into()
            .map_err(|_| PlatenError::geometry("text box width exceeds raster limit"))?;
        let h16: u16 = height
            .try_into()
            .map_err(|_| PlatenError::geometry("text box height exceeds raster limit"))?;

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font_bytes.to_vec()),
            0,
        );

        let mut ctx = vello_cpu::RenderContext::new(w16, h16);
        for (i, layout) in lines.iter().enumerate() {
            let line_top = (i as f64) * f64::from(leading_px);
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((0.0, line_top)));

            for line in layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    let brush = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        brush.r, brush.g, brush.b, brush.a,
                    ));
                    let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(&font)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut pixmap);
        Surface::from_premul_bytes(width, height, pixmap.data_as_u8_slice().to_vec())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
