//! PDF writer for paginated documents.
//!
//! Every font a page draws with is embedded as a subset Type0 font with an
//! `Identity-H` encoding and a ToUnicode map, so any script the font set
//! covers renders and stays searchable. CFF-flavoured OpenType fonts embed
//! their bare CFF table; TrueType fonts embed the subset file with an
//! identity CID-to-GID map. Output carries no timestamps and fonts are
//! numbered in order of first use, so equal input gives equal bytes.

use super::fonts::{FontSet, Glyph, LoadedFont};
use super::paginate::{DrawCommand, Page, Pages};
use crate::error::FontError;
use pdf_writer::types::{CidFontType, FontFlags, SystemInfo, UnicodeCmap};
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use subsetter::GlyphRemapper;
use tracing::debug;

const SYSTEM_INFO: SystemInfo = SystemInfo {
    registry: Str(b"Adobe"),
    ordering: Str(b"Identity"),
    supplement: 0,
};

/// Serialize pages into a complete PDF file, embedding glyphs from `fonts`.
pub fn write_pdf(pages: &Pages, fonts: &FontSet) -> Result<Vec<u8>, FontError> {
    let mut alloc = Ref::new(1);
    let catalog_ref = alloc.bump();
    let tree_ref = alloc.bump();
    let info_ref = alloc.bump();

    let mut embedder = Embedder::new(fonts);
    let contents: Vec<Vec<u8>> = pages
        .iter()
        .map(|page| content_stream(page, pages.height, &mut embedder))
        .collect();
    let page_refs: Vec<(Ref, Ref)> = contents
        .iter()
        .map(|_| (alloc.bump(), alloc.bump()))
        .collect();
    let font_refs: Vec<Ref> = embedder.used.iter().map(|_| alloc.bump()).collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_ref).pages(tree_ref);
    pdf.document_info(info_ref)
        .producer(TextStr(concat!("mdpress ", env!("CARGO_PKG_VERSION"))));
    pdf.pages(tree_ref)
        .kids(page_refs.iter().map(|(page, _)| *page))
        .count(page_refs.len() as i32);

    for ((page_ref, content_ref), content) in page_refs.iter().zip(&contents) {
        let mut page = pdf.page(*page_ref);
        page.media_box(Rect::new(0.0, 0.0, pages.width, pages.height));
        page.parent(tree_ref);
        page.contents(*content_ref);
        let mut resources = page.resources();
        let mut font_dict = resources.fonts();
        for (slot, font_ref) in font_refs.iter().enumerate() {
            font_dict.pair(Name(resource_name(slot).as_bytes()), *font_ref);
        }
        font_dict.finish();
        resources.finish();
        page.finish();
        pdf.stream(*content_ref, content);
    }

    for (usage, type0_ref) in embedder.used.iter().zip(&font_refs) {
        let font = fonts.font(usage.font).ok_or(FontError::NoFonts)?;
        write_font(&mut pdf, &mut alloc, *type0_ref, font, usage)?;
    }

    debug!(
        pages = page_refs.len(),
        fonts = font_refs.len(),
        "wrote pdf"
    );
    Ok(pdf.finish())
}

/// Resource name of the font in `slot`.
fn resource_name(slot: usize) -> String {
    format!("F{}", slot + 1)
}

/// Glyphs drawn from one font, keyed by their CID in the subset.
struct FontUsage {
    font: usize,
    remapper: GlyphRemapper,
    widths: BTreeMap<u16, f32>,
    unicode: BTreeMap<u16, char>,
}

/// Assigns resource slots and CIDs to glyphs as pages are encoded.
struct Embedder<'f> {
    fonts: &'f FontSet,
    used: Vec<FontUsage>,
    slots: HashMap<usize, usize>,
}

impl<'f> Embedder<'f> {
    fn new(fonts: &'f FontSet) -> Self {
        Self {
            fonts,
            used: Vec::new(),
            slots: HashMap::new(),
        }
    }

    /// Slot of `font`, registering it on first use.
    fn slot(&mut self, font: usize) -> usize {
        if let Some(&slot) = self.slots.get(&font) {
            return slot;
        }
        let slot = self.used.len();
        self.used.push(FontUsage {
            font,
            remapper: GlyphRemapper::new(),
            widths: BTreeMap::new(),
            unicode: BTreeMap::new(),
        });
        self.slots.insert(font, slot);
        slot
    }

    /// Encode glyphs of one font as big-endian CIDs.
    fn encode(&mut self, slot: usize, glyphs: &[Glyph]) -> Vec<u8> {
        let usage = &mut self.used[slot];
        let mut bytes = Vec::with_capacity(glyphs.len() * 2);
        for glyph in glyphs {
            let cid = usage.remapper.remap(glyph.id);
            usage.widths.insert(cid, glyph.advance * 1000.0);
            if cid != 0 {
                usage.unicode.entry(cid).or_insert(glyph.ch);
            }
            bytes.extend_from_slice(&cid.to_be_bytes());
        }
        bytes
    }
}

/// Build the content stream for one page, flipping to PDF's bottom-up axis.
fn content_stream(page: &Page, page_height: f32, embedder: &mut Embedder<'_>) -> Vec<u8> {
    let mut content = Content::new();
    for command in &page.commands {
        match command {
            DrawCommand::Text {
                x,
                y,
                face,
                size,
                text,
            } => {
                let mut offset = 0.0;
                for run in embedder.fonts.runs(*face, text) {
                    let slot = embedder.slot(run.font);
                    let encoded = embedder.encode(slot, &run.glyphs);
                    content.begin_text();
                    content.set_font(Name(resource_name(slot).as_bytes()), *size);
                    content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x + offset, page_height - y]);
                    content.show(Str(&encoded));
                    content.end_text();
                    offset += run.width(*size);
                }
            }
            DrawCommand::Line {
                x1,
                y1,
                x2,
                y2,
                width,
            } => {
                content.save_state();
                content.set_line_width(*width);
                content.set_stroke_gray(0.0);
                content.move_to(*x1, page_height - y1);
                content.line_to(*x2, page_height - y2);
                content.stroke();
                content.restore_state();
            }
        }
    }
    content.finish()
}

fn write_font(
    pdf: &mut Pdf,
    alloc: &mut Ref,
    type0_ref: Ref,
    font: &LoadedFont,
    usage: &FontUsage,
) -> Result<(), FontError> {
    let cid_ref = alloc.bump();
    let descriptor_ref = alloc.bump();
    let cmap_ref = alloc.bump();
    let file_ref = alloc.bump();

    let face = font.face()?;
    let is_cff = face.tables().cff.is_some();
    let base_font = format!("{}+{}", subset_tag(font, usage), font.name());

    let subset = subsetter::subset(font.data(), font.index(), &usage.remapper).map_err(|err| {
        FontError::Subset {
            name: font.name().to_string(),
            message: err.to_string(),
        }
    })?;
    let file = if is_cff {
        cff_table(&subset).ok_or_else(|| FontError::Subset {
            name: font.name().to_string(),
            message: "subset has no CFF table".to_string(),
        })?
    } else {
        subset
    };

    pdf.type0_font(type0_ref)
        .base_font(Name(base_font.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_ref)
        .to_unicode(cmap_ref);

    let mut cid = pdf.cid_font(cid_ref);
    cid.subtype(if is_cff {
        CidFontType::Type0
    } else {
        CidFontType::Type2
    });
    cid.base_font(Name(base_font.as_bytes()));
    cid.system_info(SYSTEM_INFO);
    cid.font_descriptor(descriptor_ref);
    cid.default_width(0.0);
    if !is_cff {
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
    }
    let mut widths = cid.widths();
    for (glyph, width) in &usage.widths {
        widths.consecutive(*glyph, [*width]);
    }
    widths.finish();
    cid.finish();

    let scale = 1000.0 / font.units_per_em();
    let bbox = face.global_bounding_box();
    let ascent = f32::from(face.ascender()) * scale;
    let descent = f32::from(face.descender()) * scale;
    let cap_height = face
        .capital_height()
        .map_or(ascent, |height| f32::from(height) * scale);
    let weight = f32::from(face.weight().to_number());

    let mut flags = FontFlags::SYMBOLIC;
    if face.is_monospaced() {
        flags |= FontFlags::FIXED_PITCH;
    }
    if face.is_italic() {
        flags |= FontFlags::ITALIC;
    }

    let mut descriptor = pdf.font_descriptor(descriptor_ref);
    descriptor
        .name(Name(base_font.as_bytes()))
        .flags(flags)
        .bbox(Rect::new(
            f32::from(bbox.x_min) * scale,
            f32::from(bbox.y_min) * scale,
            f32::from(bbox.x_max) * scale,
            f32::from(bbox.y_max) * scale,
        ))
        .italic_angle(if face.is_italic() { -12.0 } else { 0.0 })
        .ascent(ascent)
        .descent(descent)
        .cap_height(cap_height)
        .stem_v(10.0 + 0.244 * (weight - 50.0));
    if is_cff {
        descriptor.font_file3(file_ref);
    } else {
        descriptor.font_file2(file_ref);
    }
    descriptor.finish();

    let mut cmap: UnicodeCmap = UnicodeCmap::new(Name(b"Custom"), SYSTEM_INFO);
    for (glyph, ch) in &usage.unicode {
        cmap.pair(*glyph, *ch);
    }
    let cmap_data = cmap.finish();
    pdf.cmap(cmap_ref, &cmap_data)
        .system_info(SYSTEM_INFO)
        .name(Name(b"Custom"));

    let mut stream = pdf.stream(file_ref, &file);
    if is_cff {
        stream.pair(Name(b"Subtype"), Name(b"CIDFontType0C"));
    } else {
        stream.pair(Name(b"Length1"), file.len() as i32);
    }
    stream.finish();

    debug!(
        font = font.name(),
        glyphs = usage.widths.len(),
        bytes = file.len(),
        "embedded font subset"
    );
    Ok(())
}

fn cff_table(data: &[u8]) -> Option<Vec<u8>> {
    let face = ttf_parser::RawFace::parse(data, 0).ok()?;
    face.table(ttf_parser::Tag::from_bytes(b"CFF "))
        .map(<[u8]>::to_vec)
}

/// Six-letter tag naming a subset, derived from the glyphs it holds.
fn subset_tag(font: &LoadedFont, usage: &FontUsage) -> String {
    let mut hasher = DefaultHasher::new();
    font.name().hash(&mut hasher);
    for (cid, ch) in &usage.unicode {
        (cid, ch).hash(&mut hasher);
    }
    let mut value = Hasher::finish(&hasher);
    (0..6)
        .map(|_| {
            let letter = b'A' + (value % 26) as u8;
            value /= 26;
            char::from(letter)
        })
        .collect()
}
