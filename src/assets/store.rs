use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use tracing::debug;

use crate::foundation::error::{PlatenError, PlatenResult};
use crate::scene::model::{ElementKind, LayoutSpec};

/// Decoded RGBA fragment in premultiplied form, ready to transform.
#[derive(Clone, Debug)]
pub struct PreparedFragment {
    pub width: u32,
    pub height: u32,
    /// Row-major premultiplied RGBA8 bytes.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Immutable store of decoded fragments keyed by element source.
///
/// `prepare` front-loads all IO and decoding so composition itself reads no
/// files; after warm-up the store is safe to share across parallel spreads
/// without coordination.
#[derive(Clone, Debug)]
pub struct FragmentStore {
    root: PathBuf,
    fragments: HashMap<String, PreparedFragment>,
}

impl FragmentStore {
    /// Decode every fragment referenced by `layouts` under `root`.
    ///
    /// A missing or undecodable file is fatal here rather than at layering
    /// time; there is no placeholder substitution.
    pub fn prepare(root: impl Into<PathBuf>, layouts: &[&LayoutSpec]) -> PlatenResult<Self> {
        let root = root.into();
        let mut fragments = HashMap::new();

        for layout in layouts {
            for el in &layout.elements {
                let ElementKind::Fragment { source } = &el.kind else {
                    continue;
                };
                if fragments.contains_key(source.as_str()) {
                    continue;
                }
                let norm = normalize_rel_path(source)?;
                let path = root.join(Path::new(&norm));
                let bytes = std::fs::read(&path).map_err(|e| {
                    PlatenError::asset_not_found(format!("'{}': {e}", path.display()))
                })?;
                let fragment = decode_fragment(&bytes)
                    .map_err(|e| PlatenError::asset_not_found(format!("'{norm}': {e}")))?;
                fragments.insert(source.clone(), fragment);
            }
        }

        debug!(count = fragments.len(), root = %root.display(), "fragment store prepared");
        Ok(Self { root, fragments })
    }

    /// Root directory fragments were resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get(&self, source: &str) -> PlatenResult<&PreparedFragment> {
        self.fragments
            .get(source)
            .ok_or_else(|| PlatenError::asset_not_found(format!("fragment '{source}' not prepared")))
    }
}

/// Immutable font-byte store keyed by logical font name.
#[derive(Clone, Debug, Default)]
pub struct FontStore {
    fonts: HashMap<String, Arc<Vec<u8>>>,
}

impl FontStore {
    /// Load every `.ttf`/`.otf`/`.ttc` under `dir`, keyed by file stem.
    pub fn prepare(dir: impl AsRef<Path>) -> PlatenResult<Self> {
        let dir = dir.as_ref();
        let mut fonts = HashMap::new();

        let rd = std::fs::read_dir(dir)
            .with_context(|| format!("read font directory '{}'", dir.display()))?;
        for entry in rd.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
                continue;
            };
            let ext = ext.to_ascii_lowercase();
            if ext != "ttf" && ext != "otf" && ext != "ttc" {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let bytes = std::fs::read(&path)
                .with_context(|| format!("read font '{}'", path.display()))?;
            fonts.insert(stem.to_string(), Arc::new(bytes));
        }

        debug!(count = fonts.len(), dir = %dir.display(), "font store prepared");
        Ok(Self { fonts })
    }

    /// Register font bytes under a logical name.
    pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.fonts.insert(name.into(), Arc::new(bytes));
    }

    pub fn get(&self, name: &str) -> PlatenResult<Arc<Vec<u8>>> {
        self.fonts
            .get(name)
            .cloned()
            .ok_or_else(|| PlatenError::font_not_found(format!("no font registered as '{name}'")))
    }
}

/// Decode encoded image bytes into premultiplied RGBA8.
pub fn decode_fragment(bytes: &[u8]) -> PlatenResult<PreparedFragment> {
    let dyn_img = image::load_from_memory(bytes).context("decode fragment from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedFragment {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

/// Normalize and validate store-relative paths.
///
/// Returns `/`-separated segments with `.` components dropped; absolute
/// paths and parent traversals are rejected.
pub fn normalize_rel_path(source: &str) -> PlatenResult<String> {
    use std::path::Component;

    if source.is_empty() {
        return Err(PlatenError::invalid_layout("asset path must be non-empty"));
    }
    let unified = source.replace('\\', "/");

    let mut segments: Vec<&str> = Vec::new();
    for component in Path::new(&unified).components() {
        match component {
            Component::Normal(seg) => {
                let seg = seg.to_str().ok_or_else(|| {
                    PlatenError::invalid_layout("asset path must be valid UTF-8")
                })?;
                segments.push(seg);
            }
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(PlatenError::invalid_layout(
                    "asset paths must not contain '..'",
                ));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(PlatenError::invalid_layout("asset paths must be relative"));
            }
        }
    }

    if segments.is_empty() {
        return Err(PlatenError::invalid_layout(
            "asset path must contain a file name",
        ));
    }

    Ok(segments.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
