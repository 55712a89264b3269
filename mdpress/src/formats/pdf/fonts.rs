//! Fonts for paginated output.
//!
//! A [`FontSet`] gives every [`FontFace`] a primary font plus a fallback list
//! for characters the primary font lacks. The bundled set comes from
//! `typst-assets` (Libertinus Serif for text, DejaVu Sans Mono for code), so
//! output does not depend on what the host has installed. Hosts add font files
//! or installed families through [`FontOptions`] for scripts those fonts do not
//! cover, such as CJK.
//!
//! Layout measures with [`FontSet::glyph`] and the PDF writer encodes with the
//! same call, so every character is drawn with the font it was measured in.

use crate::error::FontError;
use fontdb::{Database, Family, Query, Style, Weight, ID};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::RwLock;
use tracing::{debug, warn};

const TEXT_FAMILY: &str = "Libertinus Serif";
const MONO_FAMILY: &str = "DejaVu Sans Mono";

static BUNDLED: Lazy<Result<FontSet, FontError>> =
    Lazy::new(|| FontSet::load(&FontOptions::default()));

/// Font faces used by the paginated renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFace {
    Regular,
    Bold,
    Italic,
    BoldItalic,
    Mono,
}

impl FontFace {
    pub const ALL: [FontFace; 5] = [
        FontFace::Regular,
        FontFace::Bold,
        FontFace::Italic,
        FontFace::BoldItalic,
        FontFace::Mono,
    ];

    /// Face for a combination of inline flags. Code wins over emphasis.
    pub fn for_style(bold: bool, italic: bool, code: bool) -> Self {
        if code {
            return FontFace::Mono;
        }
        match (bold, italic) {
            (false, false) => FontFace::Regular,
            (true, false) => FontFace::Bold,
            (false, true) => FontFace::Italic,
            (true, true) => FontFace::BoldItalic,
        }
    }

    fn slot(self) -> usize {
        self as usize
    }

    fn query(self) -> (&'static str, Weight, Style) {
        match self {
            FontFace::Regular => (TEXT_FAMILY, Weight::NORMAL, Style::Normal),
            FontFace::Bold => (TEXT_FAMILY, Weight::BOLD, Style::Normal),
            FontFace::Italic => (TEXT_FAMILY, Weight::NORMAL, Style::Italic),
            FontFace::BoldItalic => (TEXT_FAMILY, Weight::BOLD, Style::Italic),
            FontFace::Mono => (MONO_FAMILY, Weight::NORMAL, Style::Normal),
        }
    }
}

/// Fonts consulted after the bundled ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontOptions {
    /// Font files (TrueType, OpenType or collections), in fallback order.
    pub paths: Vec<PathBuf>,
    /// Installed font families, consulted after `paths`.
    pub system_families: Vec<String>,
}

/// One face of a font file, kept in memory for measuring and embedding.
pub struct LoadedFont {
    name: String,
    data: Vec<u8>,
    index: u32,
    units_per_em: f32,
}

impl LoadedFont {
    fn new(name: String, data: Vec<u8>, index: u32) -> Result<Self, FontError> {
        let units_per_em = ttf_parser::Face::parse(&data, index)
            .map(|face| f32::from(face.units_per_em()))
            .map_err(|err| FontError::Parse {
                name: name.clone(),
                message: err.to_string(),
            })?;
        Ok(Self {
            name,
            data,
            index,
            units_per_em,
        })
    }

    /// PostScript name of the face.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The whole font file the face lives in.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Index of the face within a collection, `0` for single fonts.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn units_per_em(&self) -> f32 {
        self.units_per_em
    }

    pub fn face(&self) -> Result<ttf_parser::Face<'_>, FontError> {
        ttf_parser::Face::parse(&self.data, self.index).map_err(|err| FontError::Parse {
            name: self.name.clone(),
            message: err.to_string(),
        })
    }

    /// Glyph id and advance (as a fraction of the font size) for `ch`.
    fn lookup(&self, ch: char) -> Option<(u16, f32)> {
        let face = self.face().ok()?;
        let id = face.glyph_index(ch)?;
        Some((id.0, self.advance_of(&face, id)))
    }

    fn notdef_advance(&self) -> f32 {
        self.face()
            .map(|face| self.advance_of(&face, ttf_parser::GlyphId(0)))
            .unwrap_or(0.5)
    }

    fn advance_of(&self, face: &ttf_parser::Face<'_>, id: ttf_parser::GlyphId) -> f32 {
        f32::from(face.glyph_hor_advance(id).unwrap_or(0)) / self.units_per_em
    }
}

impl fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedFont")
            .field("name", &self.name)
            .field("index", &self.index)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// The glyph chosen for one character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    /// Index of the font within its [`FontSet`].
    pub font: usize,
    pub id: u16,
    pub ch: char,
    /// Advance width as a fraction of the font size.
    pub advance: f32,
}

/// Consecutive glyphs drawn from one font.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRun {
    pub font: usize,
    pub glyphs: Vec<Glyph>,
}

impl GlyphRun {
    pub fn width(&self, size: f32) -> f32 {
        self.glyphs.iter().map(|glyph| glyph.advance * size).sum()
    }
}

/// Primary fonts per face plus fallbacks, in lookup order.
pub struct FontSet {
    fonts: Vec<LoadedFont>,
    primary: [usize; 5],
    fallback: Vec<usize>,
    cache: RwLock<HashMap<(FontFace, char), Glyph>>,
}

impl FontSet {
    /// The set built from bundled fonts only. Loaded once per process.
    pub fn bundled() -> Result<&'static FontSet, FontError> {
        BUNDLED.as_ref().map_err(Clone::clone)
    }

    /// Build a set from the bundled fonts plus the fallbacks in `options`.
    pub fn load(options: &FontOptions) -> Result<Self, FontError> {
        let mut bundled = Database::new();
        for data in typst_assets::fonts() {
            bundled.load_font_data(data.to_vec());
        }

        let mut collector = Collector::default();
        let mut primary = [0usize; 5];
        for face in FontFace::ALL {
            let id = query_face(&bundled, face).ok_or(FontError::NoFonts)?;
            primary[face.slot()] = collector.add(Source::Bundled, &bundled, id)?;
        }

        let mut fallback = Vec::new();

        let mut files = Database::new();
        for path in &options.paths {
            files
                .load_font_file(path)
                .map_err(|err| FontError::Load {
                    path: path.clone(),
                    message: err.to_string(),
                })?;
        }
        let file_faces: Vec<ID> = files.faces().map(|info| info.id).collect();
        for id in file_faces {
            fallback.push(collector.add(Source::Files, &files, id)?);
        }

        if !options.system_families.is_empty() {
            let mut system = Database::new();
            system.load_system_fonts();
            for family in &options.system_families {
                let ids: Vec<ID> = system
                    .faces()
                    .filter(|info| {
                        info.families
                            .iter()
                            .any(|(name, _)| name.eq_ignore_ascii_case(family))
                    })
                    .map(|info| info.id)
                    .collect();
                if ids.is_empty() {
                    warn!(family = family.as_str(), "font family is not installed");
                }
                for id in ids {
                    fallback.push(collector.add(Source::System, &system, id)?);
                }
            }
        }

        let bundled_faces: Vec<ID> = bundled.faces().map(|info| info.id).collect();
        for id in bundled_faces {
            fallback.push(collector.add(Source::Bundled, &bundled, id)?);
        }
        fallback.dedup();

        debug!(
            fonts = collector.fonts.len(),
            fallbacks = fallback.len(),
            "loaded font set"
        );

        Ok(Self {
            fonts: collector.fonts,
            primary,
            fallback,
            cache: RwLock::new(HashMap::new()),
        })
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn font(&self, index: usize) -> Option<&LoadedFont> {
        self.fonts.get(index)
    }

    /// Font used for `face` when it covers the character.
    pub fn primary(&self, face: FontFace) -> &LoadedFont {
        &self.fonts[self.primary[face.slot()]]
    }

    /// Pick the glyph for `ch`: the face's primary font first, then the
    /// fallbacks in order. A character no font covers gets the primary font's
    /// `.notdef` glyph.
    pub fn glyph(&self, face: FontFace, ch: char) -> Glyph {
        if let Ok(cache) = self.cache.read() {
            if let Some(glyph) = cache.get(&(face, ch)) {
                return *glyph;
            }
        }

        let glyph = self.resolve(face, ch);
        if let Ok(mut cache) = self.cache.write() {
            cache.insert((face, ch), glyph);
        }
        glyph
    }

    fn resolve(&self, face: FontFace, ch: char) -> Glyph {
        let primary = self.primary[face.slot()];
        let candidates = std::iter::once(primary).chain(self.fallback.iter().copied());
        for font in candidates {
            if let Some((id, advance)) = self.fonts[font].lookup(ch) {
                return Glyph {
                    font,
                    id,
                    ch,
                    advance,
                };
            }
        }

        debug!(%ch, ?face, "no font covers character");
        Glyph {
            font: primary,
            id: 0,
            ch,
            advance: self.fonts[primary].notdef_advance(),
        }
    }

    /// Split `text` into runs that share a font.
    pub fn runs(&self, face: FontFace, text: &str) -> Vec<GlyphRun> {
        let mut runs: Vec<GlyphRun> = Vec::new();
        for ch in text.chars() {
            let glyph = self.glyph(face, ch);
            match runs.last_mut() {
                Some(run) if run.font == glyph.font => run.glyphs.push(glyph),
                _ => runs.push(GlyphRun {
                    font: glyph.font,
                    glyphs: vec![glyph],
                }),
            }
        }
        runs
    }

    pub fn char_width(&self, face: FontFace, ch: char, size: f32) -> f32 {
        self.glyph(face, ch).advance * size
    }

    pub fn text_width(&self, face: FontFace, text: &str, size: f32) -> f32 {
        text.chars().map(|ch| self.char_width(face, ch, size)).sum()
    }
}

impl fmt::Debug for FontSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontSet")
            .field("fonts", &self.fonts)
            .field("primary", &self.primary)
            .field("fallback", &self.fallback)
            .finish()
    }
}

fn query_face(db: &Database, face: FontFace) -> Option<ID> {
    let (family, weight, style) = face.query();
    db.query(&Query {
        families: &[Family::Name(family)],
        weight,
        style,
        ..Query::default()
    })
    .or_else(|| db.faces().next().map(|info| info.id))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Source {
    Bundled,
    Files,
    System,
}

/// Copies faces out of font databases, once each.
#[derive(Default)]
struct Collector {
    fonts: Vec<LoadedFont>,
    seen: HashMap<(Source, ID), usize>,
}

impl Collector {
    fn add(&mut self, source: Source, db: &Database, id: ID) -> Result<usize, FontError> {
        if let Some(&index) = self.seen.get(&(source, id)) {
            return Ok(index);
        }

        let name = db
            .face(id)
            .map(|info| info.post_script_name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("Font{}", self.fonts.len()));
        let font = db
            .with_face_data(id, |data, index| LoadedFont::new(name, data.to_vec(), index))
            .ok_or(FontError::NoFonts)??;

        let index = self.fonts.len();
        self.fonts.push(font);
        self.seen.insert((source, id), index);
        Ok(index)
    }
}
