//! Parser for `pdftohtml -xml` output: page geometry, positioned text spans,
//! font specs and the nested outline.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};

use crate::layout::{BBox, Block, Line, OutlineEntry, PageLayout, TextSpan};

#[derive(Debug, Default)]
pub struct ParsedXml {
    pub pages: Vec<PageLayout>,
    pub outline: Vec<OutlineEntry>,
}

#[derive(Debug, Clone)]
struct FontSpec {
    size: f64,
    family: String,
}

#[derive(Debug, Default)]
struct PageDraft {
    index: usize,
    width: f64,
    height: f64,
    spans: Vec<TextSpan>,
}

/// Character content of the `<text>` or `<item>` element being read.
#[derive(Debug)]
struct OpenElement {
    attrs: HashMap<String, String>,
    text: String,
}

pub fn parse_pdftohtml_xml(xml: &str) -> Result<ParsedXml, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    // pdftohtml occasionally closes nested <b>/<i> out of order.
    reader.config_mut().check_end_names = false;

    let mut fonts = HashMap::<String, FontSpec>::new();
    let mut pages = Vec::<PageLayout>::new();
    let mut outline = Vec::<OutlineEntry>::new();
    let mut current: Option<PageDraft> = None;
    let mut text: Option<OpenElement> = None;
    let mut item: Option<OpenElement> = None;
    let mut outline_depth = 0u32;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"page" => {
                    if let Some(draft) = current.take() {
                        pages.push(finish_page(draft));
                    }
                    current = Some(start_page(&e, pages.len()));
                }
                b"fontspec" => register_font(&e, &mut fonts),
                b"text" => {
                    text = Some(OpenElement {
                        attrs: attributes(&e),
                        text: String::new(),
                    })
                }
                b"item" => {
                    item = Some(OpenElement {
                        attrs: attributes(&e),
                        text: String::new(),
                    })
                }
                b"outline" => outline_depth += 1,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"page" => {
                    if let Some(draft) = current.take() {
                        pages.push(finish_page(draft));
                    }
                    pages.push(finish_page(start_page(&e, pages.len())));
                }
                b"fontspec" => register_font(&e, &mut fonts),
                _ => {}
            },
            Event::Text(e) => {
                if let Some(open) = item.as_mut().or(text.as_mut()) {
                    open.text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::GeneralRef(e) => {
                if let Some(open) = item.as_mut().or(text.as_mut())
                    && let Some(resolved) = resolve_reference(&e)
                {
                    open.text.push_str(&resolved);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"page" => {
                    if let Some(draft) = current.take() {
                        pages.push(finish_page(draft));
                    }
                }
                b"text" => {
                    if let (Some(open), Some(draft)) = (text.take(), current.as_mut())
                        && let Some(span) = build_span(open, &fonts)
                    {
                        draft.spans.push(span);
                    }
                }
                b"item" => {
                    if let Some(open) = item.take() {
                        outline.push(OutlineEntry {
                            level: outline_depth.max(1),
                            title: clean_text(&open.text),
                            target_page: open
                                .attrs
                                .get("page")
                                .and_then(|value| value.trim().parse::<i64>().ok())
                                .unwrap_or(0),
                        });
                    }
                }
                b"outline" => outline_depth = outline_depth.saturating_sub(1),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(draft) = current.take() {
        pages.push(finish_page(draft));
    }

    Ok(ParsedXml { pages, outline })
}

fn start_page(e: &BytesStart<'_>, parsed: usize) -> PageDraft {
    let attrs = attributes(e);
    let number = attr_usize(&attrs, "number").unwrap_or(parsed + 1);
    PageDraft {
        index: number.saturating_sub(1),
        width: attr_f64(&attrs, "width").unwrap_or_default(),
        height: attr_f64(&attrs, "height").unwrap_or_default(),
        spans: Vec::new(),
    }
}

fn register_font(e: &BytesStart<'_>, fonts: &mut HashMap<String, FontSpec>) {
    let mut attrs = attributes(e);
    if let Some(id) = attrs.remove("id") {
        fonts.insert(
            id,
            FontSpec {
                size: attr_f64(&attrs, "size").unwrap_or_default(),
                family: attrs.remove("family").unwrap_or_default(),
            },
        );
    }
}

fn build_span(open: OpenElement, fonts: &HashMap<String, FontSpec>) -> Option<TextSpan> {
    let text = clean_text(&open.text);
    if text.is_empty() {
        return None;
    }

    let attrs = open.attrs;
    let top = attr_f64(&attrs, "top")?;
    let left = attr_f64(&attrs, "left")?;
    let width = attr_f64(&attrs, "width").unwrap_or_default();
    let height = attr_f64(&attrs, "height").unwrap_or_default();
    let font = attrs.get("font").and_then(|id| fonts.get(id));

    Some(TextSpan {
        text,
        size: font.map(|spec| spec.size).unwrap_or(height),
        font: font.map(|spec| spec.family.clone()).unwrap_or_default(),
        bbox: BBox::new(left, top, left + width, top + height),
    })
}

fn finish_page(draft: PageDraft) -> PageLayout {
    PageLayout {
        index: draft.index,
        width: draft.width,
        height: draft.height,
        blocks: group_blocks(group_lines(draft.spans)),
    }
}

/// Groups spans sharing a baseline band into lines, top to bottom.
fn group_lines(mut spans: Vec<TextSpan>) -> Vec<Line> {
    spans.sort_by(|a, b| {
        a.bbox
            .y0
            .total_cmp(&b.bbox.y0)
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });

    let mut lines = Vec::<Line>::new();
    let mut pending = Vec::<TextSpan>::new();
    let mut band_top = 0.0f64;
    let mut band_height = 0.0f64;

    for span in spans {
        let tolerance = (band_height.min(span.bbox.height()) * 0.25).max(1.0);
        if !pending.is_empty() && (span.bbox.y0 - band_top).abs() > tolerance {
            lines.push(Line::from_spans(std::mem::take(&mut pending)));
        }
        if pending.is_empty() {
            band_top = span.bbox.y0;
            band_height = span.bbox.height();
        }
        pending.push(span);
    }
    if !pending.is_empty() {
        lines.push(Line::from_spans(pending));
    }

    lines
}

fn group_blocks(lines: Vec<Line>) -> Vec<Block> {
    let mut blocks = Vec::<Block>::new();
    let mut current = Block::default();

    for line in lines {
        if let Some(previous) = current.lines.last() {
            let gap = line.bbox.y0 - previous.bbox.y1;
            if gap > previous.bbox.height() * 1.5 {
                blocks.push(std::mem::take(&mut current));
            }
        }
        current.lines.push(line);
    }
    if !current.lines.is_empty() {
        blocks.push(current);
    }

    blocks
}

fn attributes(e: &BytesStart<'_>) -> HashMap<String, String> {
    e.attributes()
        .flatten()
        .filter_map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().ok()?.into_owned();
            Some((key, value))
        })
        .collect()
}

fn resolve_reference(reference: &BytesRef<'_>) -> Option<String> {
    if let Ok(Some(character)) = reference.resolve_char_ref() {
        return Some(character.to_string());
    }
    let name = String::from_utf8_lossy(reference.as_ref());
    resolve_predefined_entity(&name).map(str::to_string)
}

fn attr_f64(attrs: &HashMap<String, String>, key: &str) -> Option<f64> {
    attrs.get(key).and_then(|value| value.trim().parse::<f64>().ok())
}

fn attr_usize(attrs: &HashMap<String, String>, key: &str) -> Option<usize> {
    attrs.get(key).and_then(|value| value.trim().parse::<usize>().ok())
}

/// Folds non-breaking spaces and collapses whitespace.
fn clean_text(raw: &str) -> String {
    raw.replace('\u{00a0}', " ")
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}
