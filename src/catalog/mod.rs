//! # Resource Catalog
//!
//! Discovers fonts and background images in a resource directory and maps
//! fonts onto logical roles (`body`, `title`, `dialogue`, ...).
//!
//! The catalog is built once and never mutated afterwards. Every lookup is
//! a pure function returning `Option`: a missing directory, an unreadable
//! entry, or an unknown extension shrinks the catalog, it never fails it.
//! Whether a font file actually parses is the renderer's concern.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

/// Font container formats the catalog recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFormat {
    TrueType,
    OpenType,
}

impl FontFormat {
    fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "ttf" => Some(FontFormat::TrueType),
            "otf" => Some(FontFormat::OpenType),
            _ => None,
        }
    }

    /// Lower wins. TrueType embeds as-is, so it beats OpenType of the same name.
    fn priority(self) -> u8 {
        match self {
            FontFormat::TrueType => 1,
            FontFormat::OpenType => 2,
        }
    }
}

/// A discovered font file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontHandle {
    /// Lower-cased file stem.
    pub name: String,
    pub path: PathBuf,
    pub format: FontFormat,
}

impl FontHandle {
    pub fn new(name: &str, path: PathBuf, format: FontFormat) -> Self {
        Self {
            name: name.to_string(),
            path,
            format,
        }
    }
}

/// A discovered background image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle {
    /// Lower-cased file stem with spaces replaced by underscores.
    pub name: String,
    pub path: PathBuf,
}

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// Name patterns checked in order; the first pattern a font matches assigns
/// it every listed role that is still free.
const ROLE_PATTERNS: &[(&[&str], &[&str])] = &[
    (&["dialogue"], &["dialogue"]),
    (&["cover", "title"], &["title", "cover"]),
    (&["body", "main", "hand"], &["body", "main"]),
];

/// Hand-drawn looking fonts commonly installed on desktop systems, in order
/// of preference.
pub const GENERIC_FALLBACKS: [&str; 4] = ["Comic Sans MS", "Marker Felt", "Chalkboard SE", "Bradley Hand"];

#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog {
    fonts: BTreeMap<String, FontHandle>,
    roles: BTreeMap<String, FontHandle>,
    images: BTreeMap<String, ImageHandle>,
    system: Vec<FontHandle>,
}

impl ResourceCatalog {
    /// A catalog with no resources at all. Everything falls back to the
    /// built-in font and the ruled background.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Scan `dir` recursively for fonts and images.
    pub fn load(dir: &Path) -> Self {
        let mut catalog = Self::empty();
        if !dir.is_dir() {
            warn!("resource directory '{}' not found, using built-in resources", dir.display());
            return catalog;
        }

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("skipping unreadable resource entry: {}", e);
                    continue;
                }
            };
            if entry.file_type().is_file() {
                catalog.add_file(entry.path());
            }
        }

        catalog.map_roles();
        info!(
            "catalog: {} fonts ({} roles), {} images from '{}'",
            catalog.fonts.len(),
            catalog.roles.len(),
            catalog.images.len(),
            dir.display()
        );
        catalog
    }

    /// Index generic fallback fonts found under the given system directories.
    pub fn with_system_fonts<P: AsRef<Path>>(mut self, dirs: &[P]) -> Self {
        let wanted: Vec<String> = GENERIC_FALLBACKS.iter().map(|n| squash(n)).collect();
        let mut found: Vec<Option<FontHandle>> = vec![None; wanted.len()];

        for dir in dirs.iter().map(AsRef::as_ref).filter(|d| d.is_dir()) {
            for entry in WalkDir::new(dir).max_depth(4).sort_by_file_name().into_iter().flatten() {
                let path = entry.path();
                let Some((stem, format)) = font_file(path) else {
                    continue;
                };
                if let Some(slot) = wanted.iter().position(|w| *w == squash(&stem)) {
                    if found[slot].is_none() {
                        debug!("generic fallback '{}' at {}", GENERIC_FALLBACKS[slot], path.display());
                        found[slot] = Some(FontHandle::new(&stem, path.to_path_buf(), format));
                    }
                }
            }
        }

        self.system = found.into_iter().flatten().collect();
        self
    }

    fn add_file(&mut self, path: &Path) {
        if let Some((name, format)) = font_file(path) {
            let replace = self
                .fonts
                .get(&name)
                .map_or(true, |existing| format.priority() < existing.format.priority());
            if replace {
                self.fonts.insert(name.clone(), FontHandle::new(&name, path.to_path_buf(), format));
            }
            return;
        }

        let Some(ext) = extension(path) else { return };
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                let name = stem.to_lowercase().replace(' ', "_");
                self.images.entry(name.clone()).or_insert_with(|| ImageHandle {
                    name,
                    path: path.to_path_buf(),
                });
            }
        } else {
            debug!("ignoring unsupported resource {}", path.display());
        }
    }

    fn map_roles(&mut self) {
        for font in self.fonts.values() {
            if font.format != FontFormat::TrueType {
                continue;
            }
            let Some((_, roles)) = ROLE_PATTERNS
                .iter()
                .find(|(needles, _)| needles.iter().any(|n| font.name.contains(n)))
            else {
                continue;
            };
            for role in roles.iter() {
                if !self.roles.contains_key(*role) {
                    debug!("role '{}' -> {}", role, font.name);
                    self.roles.insert(role.to_string(), font.clone());
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn insert_role(&mut self, role: &str, handle: FontHandle) {
        self.fonts.insert(handle.name.clone(), handle.clone());
        self.roles.insert(role.to_string(), handle);
    }

    /// Whether a font is mapped to exactly this role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains_key(role)
    }

    /// Resolve a role or font name: role map, then exact name, then the first
    /// TrueType font whose name contains the request, then any such font.
    pub fn get_font(&self, role: &str) -> Option<&FontHandle> {
        let needle = role.to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.roles
            .get(&needle)
            .or_else(|| self.fonts.get(&needle))
            .or_else(|| {
                self.fonts
                    .values()
                    .find(|f| f.format == FontFormat::TrueType && f.name.contains(&needle))
            })
            .or_else(|| self.fonts.values().find(|f| f.name.contains(&needle)))
    }

    /// Exact or partial lookup of a background image.
    pub fn get_image(&self, name: &str) -> Option<&ImageHandle> {
        let needle = name.to_lowercase().replace(' ', "_");
        if needle.is_empty() {
            return None;
        }
        self.images
            .get(&needle)
            .or_else(|| self.images.values().find(|img| img.name.contains(&needle)))
    }

    /// Generic system fallbacks that were found, most preferred first.
    pub fn system_fallbacks(&self) -> &[FontHandle] {
        &self.system
    }

    pub fn fonts(&self) -> impl Iterator<Item = &FontHandle> {
        self.fonts.values()
    }

    pub fn roles(&self) -> impl Iterator<Item = (&str, &FontHandle)> {
        self.roles.iter().map(|(role, handle)| (role.as_str(), handle))
    }

    pub fn images(&self) -> impl Iterator<Item = &ImageHandle> {
        self.images.values()
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// The lower-cased stem and format of a recognized font file.
fn font_file(path: &Path) -> Option<(String, FontFormat)> {
    let format = FontFormat::from_extension(&extension(path)?)?;
    let stem = path.file_stem()?.to_str()?.to_lowercase();
    Some((stem, format))
}

fn squash(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
