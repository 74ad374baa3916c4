//! Platen composes fixed-size two-page spread rasters in the manner of an
//! era of offset-press publishing.
//!
//! Independently produced visual fragments and programmatically rendered
//! text are layered onto a procedurally generated paper surface under hard
//! geometric constraints (a forbidden spine band, safe margins, per-kind
//! tilt ceilings), then run through a fixed chain of print-artifact
//! transforms: channel misregistration, dot gain, vignette.
//!
//! The whole path is deterministic: identical layouts, configuration and
//! fragments yield byte-identical output, across processes and machines.
//!
//! - Describe a spread with a [`LayoutSpec`] and tune the press with a
//!   [`PrintConfig`]
//! - Warm a [`FragmentStore`] and [`FontStore`] once, up front
//! - [`produce_spread`] (or [`compose_batch`] for parallel runs) returns the
//!   finished raster plus the non-fatal corrections that were applied
#![forbid(unsafe_code)]

pub mod assets;
pub mod canvas;
pub mod compose;
pub mod encode;
pub mod press;
pub mod scene;
pub mod text;

mod foundation;

pub use crate::foundation::core::{PageHalf, RectPx, Rgba8Premul};
pub use crate::foundation::error::{PlatenError, PlatenResult};

pub use crate::assets::store::{FontStore, FragmentStore, PreparedFragment};
pub use crate::assets::transform::RenderedAsset;
pub use crate::canvas::surface::Surface;
pub use crate::compose::compositor::{
    ComposedSpread, FinishedSpread, compose_batch, compose_spread, flatten_to_rgb, produce_spread,
};
pub use crate::compose::fingerprint::{SpreadFingerprint, fingerprint_rgb};
pub use crate::compose::rotation::chaos_rotation;
pub use crate::compose::spine::{GuardOutcome, SpineBand};
pub use crate::compose::warning::Warning;
pub use crate::encode::png::write_png_atomic;
pub use crate::press::pipeline::PressPipeline;
pub use crate::scene::model::{
    BorderSpec, CanvasDef, Element, ElementKind, LayoutSpec, OverflowPolicy, PrintConfig,
    ShadowSpec,
};
pub use crate::text::layout::{OverflowOutcome, TextBlock, TextEngine};
pub use crate::text::wrap::{WrappedText, wrap_greedy};
