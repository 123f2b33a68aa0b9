//! Word extraction from PDF files using lopdf.
//!
//! Content streams are decoded into positioned text runs; each run is then
//! split into words whose horizontal extent is estimated from the font
//! size. Coordinates are flipped to top-down so that they match what the
//! layout reconstructor expects.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::Word;

use super::source::PageSource;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Approximate glyph advance as a fraction of the font size.
const CHAR_WIDTH_FACTOR: f32 = 0.5;

/// Approximate ascender height as a fraction of the font size.
const ASCENT_FACTOR: f32 = 0.8;

/// Check whether bytes start with the PDF magic.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    data.len() > PDF_MAGIC.len() && data.starts_with(PDF_MAGIC)
}

/// A page source backed by a PDF file.
///
/// Words and fallback text are extracted once when the document is opened.
pub struct PdfSource {
    pages: Vec<ExtractedPage>,
}

struct ExtractedPage {
    words: std::result::Result<Vec<Word>, String>,
    text: std::result::Result<String, String>,
}

impl PdfSource {
    /// Open a PDF file that has already been fetched to disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let data = std::fs::read(path)?;
        log::debug!("Loaded {} ({} bytes)", path.display(), data.len());
        Self::from_bytes(&data)
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if !is_pdf_bytes(data) {
            return Err(Error::UnknownFormat);
        }

        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        if doc.is_encrypted() {
            log::warn!("Document is encrypted; text extraction may be incomplete");
        }

        let extractor = SpanExtractor { doc: &doc };
        let pages = doc
            .get_pages()
            .into_iter()
            .map(|(page_num, page_id)| extractor.extract_page(page_num, page_id))
            .collect();

        Ok(Self { pages })
    }

    fn page(&self, page: u32) -> Result<&ExtractedPage> {
        if page == 0 {
            return Err(Error::PageOutOfRange(page, self.page_count()));
        }
        self.pages
            .get((page - 1) as usize)
            .ok_or(Error::PageOutOfRange(page, self.page_count()))
    }
}

impl PageSource for PdfSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn words(&self, page: u32) -> Result<Vec<Word>> {
        self.page(page)?
            .words
            .clone()
            .map_err(|e| Error::PdfParse(format!("Page {}: {}", page, e)))
    }

    fn plain_text(&self, page: u32) -> Result<String> {
        self.page(page)?
            .text
            .clone()
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page, e)))
    }
}

/// A decoded text run with position and font information.
#[derive(Debug, Clone)]
struct TextSpan {
    text: String,
    x: f32,
    y: f32,
    font_size: f32,
    font_name: String,
}

struct SpanExtractor<'a> {
    doc: &'a LopdfDocument,
}

impl<'a> SpanExtractor<'a> {
    fn extract_page(&self, page_num: u32, page_id: ObjectId) -> ExtractedPage {
        let words = self
            .page_words(page_id)
            .map_err(|e| e.to_string());

        // Plain text is only needed when the word path has nothing to offer.
        let needs_text = words.as_ref().map(|w| w.is_empty()).unwrap_or(true);
        let text = if needs_text {
            self.doc
                .extract_text(&[page_num])
                .map_err(|e| e.to_string())
        } else {
            Ok(String::new())
        };

        ExtractedPage { words, text }
    }

    fn page_words(&self, page_id: ObjectId) -> Result<Vec<Word>> {
        let height = self.page_height(page_id);
        let spans = self.extract_page_spans(page_id)?;
        Ok(spans
            .iter()
            .flat_map(|span| split_span(span, height))
            .collect())
    }

    fn page_height(&self, page_id: ObjectId) -> f32 {
        if let Ok(page_dict) = self.doc.get_dictionary(page_id) {
            if let Ok(media_box) = page_dict.get(b"MediaBox") {
                if let Ok(array) = media_box.as_array() {
                    if array.len() >= 4 {
                        return array[3].as_float().unwrap_or(842.0);
                    }
                }
            }
        }
        // A4
        842.0
    }

    fn extract_page_spans(&self, page_id: ObjectId) -> Result<Vec<TextSpan>> {
        let lopdf_fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut fonts = HashMap::new();
        for (name, font) in &lopdf_fonts {
            let base_font = font
                .get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            fonts.insert(name.clone(), base_font);
        }

        let content = self.page_content(page_id)?;
        self.parse_content_stream(&content, &fonts, &lopdf_fonts)
    }

    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = page_dict
            .get(b"Contents")
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        match contents {
            Object::Reference(r) => {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    return s
                        .decompressed_content()
                        .map_err(|e| Error::PdfParse(e.to_string()));
                }
                Err(Error::PdfParse("Invalid content stream".to_string()))
            }
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            if let Ok(data) = s.decompressed_content() {
                                content.extend_from_slice(&data);
                                content.push(b' ');
                            }
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn decode(&self, font: &[u8], fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>, bytes: &[u8]) -> String {
        let encoding = fonts
            .get(font)
            .and_then(|f| f.get_font_encoding(self.doc).ok());
        match encoding {
            Some(ref enc) => LopdfDocument::decode_text(enc, bytes).unwrap_or_default(),
            None => decode_text_simple(bytes),
        }
    }

    fn parse_content_stream(
        &self,
        content: &[u8],
        fonts: &HashMap<Vec<u8>, String>,
        lopdf_fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    ) -> Result<Vec<TextSpan>> {
        let content =
            lopdf::content::Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut spans = Vec::new();
        let mut current_font = String::new();
        let mut current_font_key: Vec<u8> = Vec::new();
        let mut current_font_size: f32 = 12.0;
        let mut matrix = TextMatrix::default();
        let mut in_text_block = false;

        for op in content.operations {
            let text = match op.operator.as_str() {
                "BT" => {
                    in_text_block = true;
                    matrix = TextMatrix::default();
                    None
                }
                "ET" => {
                    in_text_block = false;
                    None
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(key) = &op.operands[0] {
                            current_font_key = key.clone();
                            current_font = fonts
                                .get(key.as_slice())
                                .cloned()
                                .unwrap_or_else(|| String::from_utf8_lossy(key).to_string());
                        }
                        current_font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                    }
                    None
                }
                "TL" => {
                    if let Some(leading) = op.operands.first().and_then(get_number) {
                        matrix.leading = leading;
                    }
                    None
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                        if op.operator == "TD" {
                            matrix.leading = -ty;
                        }
                        matrix.translate(tx, ty);
                    }
                    None
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        let n = |i: usize, default: f32| get_number(&op.operands[i]).unwrap_or(default);
                        matrix.set(n(0, 1.0), n(1, 0.0), n(2, 0.0), n(3, 1.0), n(4, 0.0), n(5, 0.0));
                    }
                    None
                }
                "T*" => {
                    matrix.next_line();
                    None
                }
                "Tj" if in_text_block => match op.operands.first() {
                    Some(Object::String(bytes, _)) => {
                        Some(self.decode(&current_font_key, lopdf_fonts, bytes))
                    }
                    _ => None,
                },
                "TJ" if in_text_block => match op.operands.first() {
                    Some(Object::Array(arr)) => {
                        // Large negative adjustments (in 1/1000 em) act as word spaces.
                        let mut combined = String::new();
                        for item in arr {
                            match item {
                                Object::String(bytes, _) => combined.push_str(&self.decode(
                                    &current_font_key,
                                    lopdf_fonts,
                                    bytes,
                                )),
                                other => {
                                    if let Some(n) = get_number(other) {
                                        if -n > 200.0 && !combined.is_empty() && !combined.ends_with(' ') {
                                            combined.push(' ');
                                        }
                                    }
                                }
                            }
                        }
                        Some(combined)
                    }
                    _ => None,
                },
                "'" | "\"" => {
                    matrix.next_line();
                    let index = if op.operator == "\"" { 2 } else { 0 };
                    match op.operands.get(index) {
                        Some(Object::String(bytes, _)) if in_text_block => {
                            Some(self.decode(&current_font_key, lopdf_fonts, bytes))
                        }
                        _ => None,
                    }
                }
                _ => None,
            };

            if let Some(text) = text {
                if !text.trim().is_empty() {
                    let (x, y) = matrix.position();
                    spans.push(TextSpan {
                        text,
                        x,
                        y,
                        font_size: current_font_size * matrix.scale(),
                        font_name: current_font.clone(),
                    });
                }
            }
        }

        Ok(spans)
    }
}

/// Split a text run into words with estimated extents.
fn split_span(span: &TextSpan, page_height: f32) -> Vec<Word> {
    let char_width = span.font_size * CHAR_WIDTH_FACTOR;
    let top = page_height - (span.y + span.font_size * ASCENT_FACTOR);

    let mut words = Vec::new();
    let mut offset = 0usize;
    let mut current = String::new();
    let mut start = 0usize;

    for ch in span.text.chars().chain(std::iter::once(' ')) {
        if ch.is_whitespace() {
            if !current.is_empty() {
                let x0 = span.x + start as f32 * char_width;
                let x1 = x0 + current.chars().count() as f32 * char_width;
                words.push(
                    Word::new(std::mem::take(&mut current), x0, x1, top)
                        .with_font(span.font_name.clone()),
                );
            }
        } else {
            if current.is_empty() {
                start = offset;
            }
            current.push(ch);
        }
        offset += 1;
    }

    words
}

/// Text matrix for tracking position in a content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            leading: 12.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        self.f -= self.leading * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Text decoding fallback when a font has no usable encoding.
fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter(|c| c.len() == 2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}
