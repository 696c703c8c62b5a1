use crate::error::QuizdigError;
use crate::extraction::{FragmentMarkup, PageMarkup, RunMarkup};
use quick_xml::escape::{resolve_html5_entity, unescape_with};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

static TOP_OFFSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|;)\s*top\s*:\s*(-?\d+(?:\.\d+)?)em").expect("top offset pattern")
});

static LEFT_OFFSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|;)\s*left\s*:\s*(-?\d+(?:\.\d+)?)em").expect("left offset pattern")
});

/// HTML elements that never have a closing tag.
const VOID_ELEMENTS: &[&[u8]] = &[
    b"area", b"base", b"br", b"col", b"embed", b"hr", b"img", b"input", b"link", b"meta",
    b"param", b"source", b"track", b"wbr",
];

/// Longest entity name looked up, `&CounterClockwiseContourIntegral;` included.
const MAX_ENTITY_LEN: usize = 34;

#[derive(Debug, Clone, Copy)]
enum Open {
    Page,
    Fragment { content_start: usize },
    Run(usize),
    Other,
}

/// An element still open on the scan stack.
#[derive(Debug)]
struct Frame {
    name: Vec<u8>,
    open: Open,
}

#[derive(Debug, Default)]
struct FragmentBuilder {
    top: Option<Decimal>,
    left: Decimal,
    style: String,
    runs: Vec<RunMarkup>,
    content: String,
}

/// Scan positional HTML into pages of fragments.
///
/// The reader runs in lenient mode. An end tag closes the nearest open
/// element with the same name, together with anything still open inside
/// it, so implicitly closed elements such as `<p>` do not swallow the rest
/// of the page. End tags matching no open element are ignored. Fragments
/// without a `top:<n>em` offset are skipped.
pub fn scan_pages(
    html: &str,
    page_class: &str,
    fragment_class: &str,
) -> Result<Vec<PageMarkup>, QuizdigError> {
    let mut reader = Reader::from_str(html);
    {
        let config = reader.config_mut();
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
        config.check_comments = false;
    }

    let mut pages = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut page: Option<Vec<FragmentMarkup>> = None;
    let mut fragment: Option<FragmentBuilder> = None;

    loop {
        let before = reader.buffer_position() as usize;
        let event = reader.read_event().map_err(|e| QuizdigError::Markup {
            position: reader.error_position() as u64,
            reason: e.to_string(),
        })?;

        match event {
            Event::Start(e) => {
                let name = e.name().as_ref().to_ascii_lowercase();
                if VOID_ELEMENTS.contains(&name.as_slice()) {
                    on_empty(&e, &name, fragment.as_mut());
                    continue;
                }

                let class = attr_value(&e, b"class");
                let open = if page.is_none() && has_class(&class, page_class) {
                    page = Some(Vec::new());
                    Open::Page
                } else if page.is_some() && fragment.is_none() && has_class(&class, fragment_class)
                {
                    fragment = Some(start_fragment(&attr_value(&e, b"style")));
                    Open::Fragment {
                        content_start: reader.buffer_position() as usize,
                    }
                } else if let (Some(builder), b"span") = (fragment.as_mut(), name.as_slice()) {
                    builder.runs.push(RunMarkup {
                        class,
                        style: attr_value(&e, b"style"),
                        text: String::new(),
                    });
                    Open::Run(builder.runs.len() - 1)
                } else {
                    Open::Other
                };
                stack.push(Frame { name, open });
            }
            Event::Empty(e) => {
                let name = e.name().as_ref().to_ascii_lowercase();
                on_empty(&e, &name, fragment.as_mut());
            }
            Event::End(e) => {
                let name = e.name().as_ref().to_ascii_lowercase();
                let Some(depth) = stack.iter().rposition(|f| f.name == name) else {
                    tracing::trace!(
                        tag = %String::from_utf8_lossy(&name),
                        position = before,
                        "ignoring end tag with no open element"
                    );
                    continue;
                };
                for frame in stack.drain(depth..).rev() {
                    match frame.open {
                        Open::Page => {
                            let fragments = page.take().unwrap_or_default();
                            pages.push(PageMarkup {
                                page_number: pages.len() + 1,
                                fragments,
                            });
                        }
                        Open::Fragment { content_start } => {
                            if let Some(builder) = fragment.take() {
                                let markup = html.get(content_start..before).unwrap_or_default();
                                if let (Some(done), Some(fragments)) =
                                    (finish_fragment(builder, markup), page.as_mut())
                                {
                                    fragments.push(done);
                                }
                            }
                        }
                        Open::Run(_) | Open::Other => {}
                    }
                }
            }
            Event::Text(t) => {
                if let Some(builder) = fragment.as_mut() {
                    let text = decode_entities(&String::from_utf8_lossy(&t));
                    push_text(builder, &stack, &text);
                }
            }
            Event::CData(t) => {
                if let Some(builder) = fragment.as_mut() {
                    push_text(builder, &stack, &String::from_utf8_lossy(&t));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    // A page left open at EOF still counts; its unfinished fragment does not.
    if let Some(fragments) = page.take() {
        pages.push(PageMarkup {
            page_number: pages.len() + 1,
            fragments,
        });
    }

    Ok(pages)
}

fn on_empty(e: &BytesStart<'_>, name: &[u8], fragment: Option<&mut FragmentBuilder>) {
    let Some(builder) = fragment else {
        return;
    };
    match name {
        b"br" => builder.content.push(' '),
        b"span" => builder.runs.push(RunMarkup {
            class: attr_value(e, b"class"),
            style: attr_value(e, b"style"),
            text: String::new(),
        }),
        _ => {}
    }
}

/// Text goes to the fragment content in document order and to every run
/// that encloses it.
fn push_text(builder: &mut FragmentBuilder, stack: &[Frame], text: &str) {
    builder.content.push_str(text);
    for frame in stack {
        if let Open::Run(i) = frame.open {
            if let Some(run) = builder.runs.get_mut(i) {
                run.text.push_str(text);
            }
        }
    }
}

fn start_fragment(style: &str) -> FragmentBuilder {
    FragmentBuilder {
        top: parse_offset(&TOP_OFFSET, style),
        left: parse_offset(&LEFT_OFFSET, style).unwrap_or_default(),
        style: style.to_string(),
        ..Default::default()
    }
}

fn finish_fragment(builder: FragmentBuilder, markup: &str) -> Option<FragmentMarkup> {
    let Some(top) = builder.top else {
        tracing::debug!(markup, "skipping fragment without top offset");
        return None;
    };
    Some(FragmentMarkup {
        top,
        left: builder.left,
        style: builder.style,
        runs: builder.runs,
        content: builder.content,
        markup: markup.to_string(),
    })
}

fn parse_offset(re: &Regex, style: &str) -> Option<Decimal> {
    let caps = re.captures(style)?;
    Decimal::from_str(&caps[1]).ok()
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> String {
    e.html_attributes()
        .with_checks(false)
        .flatten()
        .find(|a| a.key.as_ref().eq_ignore_ascii_case(key))
        .map(|a| decode_entities(&String::from_utf8_lossy(&a.value)))
        .unwrap_or_default()
}

pub(crate) fn has_class(class_attr: &str, class: &str) -> bool {
    class_attr.split_whitespace().any(|c| c == class)
}

/// Decode HTML5 named and numeric character references.
///
/// Each `&...;` is resolved on its own, so an unknown reference or a bare
/// `&` stays as-is without affecting the rest of the text.
fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        if let Some(semi) = tail.find(';').filter(|&i| i <= MAX_ENTITY_LEN) {
            if let Ok(decoded) = unescape_with(&tail[..=semi], resolve_html5_entity) {
                out.push_str(&decoded);
                rest = &tail[semi + 1..];
                continue;
            }
        }
        out.push('&');
        rest = &tail[1..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const DOC: &str = r#"<!DOCTYPE html>
<html><head><meta charset="utf-8"><style>.pdf24_16{color:#FF0000}</style></head>
<body>
<div class="pdf24_ pdf24_02">
  <div class="pdf24_01" style="left:5.0em;top:2.5em;"><span class="pdf24_10">12. Which port </span><span class="pdf24_10">does SSH use?</span></div>
  <div class="pdf24_01" style="left:6.2em;top:4.0em;"><span class="pdf24_16">A.</span><span class="pdf24_10"> 22</span></div>
  <div class="pdf24_01" style="left:6.2em;"><span>no offset</span></div>
  <div class="pdf24_01" style="left:6.2em;top:5.0em;"><span>Tom &amp; Jerry&nbsp;&#169;</span><br></div>
</div>
<div class="pdf24_02">
  <div class="pdf24_01" style="top:1em;">plain text</div>
</div>
</body></html>"#;

    #[test]
    fn test_scan_pages_finds_pages_and_fragments() {
        let pages = scan_pages(DOC, "pdf24_02", "pdf24_01").unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page_number, 1);
        // The fragment without a top offset is skipped.
        assert_eq!(pages[0].fragments.len(), 3);
        assert_eq!(pages[1].fragments.len(), 1);
    }

    #[test]
    fn test_scan_reads_offsets_and_runs() {
        let pages = scan_pages(DOC, "pdf24_02", "pdf24_01").unwrap();
        let first = &pages[0].fragments[0];
        assert_eq!(first.top, dec!(2.5));
        assert_eq!(first.left, dec!(5.0));
        assert_eq!(first.runs.len(), 2);
        assert_eq!(first.text(), "12. Which port does SSH use?");

        let option = &pages[0].fragments[1];
        assert_eq!(option.runs[0].class, "pdf24_16");
        assert_eq!(option.text(), "A. 22");
        assert!(option.markup.contains("<span class=\"pdf24_16\">A.</span>"));
    }

    #[test]
    fn test_scan_decodes_entities() {
        let pages = scan_pages(DOC, "pdf24_02", "pdf24_01").unwrap();
        assert_eq!(pages[0].fragments[2].text(), "Tom & Jerry ©");
    }

    #[test]
    fn test_text_without_runs() {
        let pages = scan_pages(DOC, "pdf24_02", "pdf24_01").unwrap();
        let f = &pages[1].fragments[0];
        assert_eq!(f.left, Decimal::ZERO);
        assert_eq!(f.text(), "plain text");
    }

    #[test]
    fn test_fragments_outside_pages_ignored() {
        let doc = r#"<div class="pdf24_01" style="top:1em;">orphan</div>"#;
        let pages = scan_pages(doc, "pdf24_02", "pdf24_01").unwrap();
        assert!(pages.is_empty());
    }

    #[test]
    fn test_margin_top_is_not_top() {
        let b = start_fragment("margin-top:9em; left:1em");
        assert!(b.top.is_none());
        let b = start_fragment("left:1em; top: 3.25em");
        assert_eq!(b.top, Some(dec!(3.25)));
    }

    #[test]
    fn test_has_class_matches_whole_tokens() {
        assert!(has_class("pdf24_ pdf24_02", "pdf24_02"));
        assert!(!has_class("pdf24_020", "pdf24_02"));
    }

    fn fragment_counts(pages: &[PageMarkup]) -> Vec<usize> {
        pages.iter().map(|p| p.fragments.len()).collect()
    }

    #[test]
    fn test_stray_end_tag_is_ignored() {
        let doc = r#"<div class="pdf24_02">
  <div class="pdf24_01" style="top:1em;"><span>1. Question</span></span></div>
  <div class="pdf24_01" style="top:2em;"><span>A. a</span></div>
</div>
<div class="pdf24_02">
  <div class="pdf24_01" style="top:1em;"><span>B. b</span></div>
</div>"#;
        let pages = scan_pages(doc, "pdf24_02", "pdf24_01").unwrap();
        assert_eq!(fragment_counts(&pages), vec![2, 1]);
        assert_eq!(pages[0].fragments[1].text(), "A. a");
    }

    #[test]
    fn test_implicitly_closed_element_does_not_merge_pages() {
        let doc = r#"<div class="pdf24_02">
  <p>page furniture
  <div class="pdf24_01" style="top:1em;"><span>1. First page</span></div>
</div>
<div class="pdf24_02">
  <div class="pdf24_01" style="top:1em;"><span>A. Second page</span></div>
</div>"#;
        let pages = scan_pages(doc, "pdf24_02", "pdf24_01").unwrap();
        assert_eq!(fragment_counts(&pages), vec![1, 1]);
        assert_eq!(pages[1].fragments[0].text(), "A. Second page");
    }

    #[test]
    fn test_nested_runs_keep_document_order() {
        let doc = r#"<div class="pdf24_02"><div class="pdf24_01" style="top:1em;"><span class="outer">a<span class="pdf24_16">b</span>c</span></div></div>"#;
        let pages = scan_pages(doc, "pdf24_02", "pdf24_01").unwrap();
        let f = &pages[0].fragments[0];
        assert_eq!(f.text(), "abc");
        assert_eq!(f.runs[0].text, "abc");
        assert_eq!(f.runs[1].text, "b");
    }

    #[test]
    fn test_decode_html5_entities() {
        assert_eq!(decode_entities("caf&eacute; &hellip;"), "café …");
        assert_eq!(decode_entities("Tom &amp; Jerry&nbsp;&copy;"), "Tom & Jerry\u{a0}©");
    }

    #[test]
    fn test_decode_numeric_and_unknown_entities() {
        assert_eq!(decode_entities("&#x41;&#66;"), "AB");
        assert_eq!(decode_entities("R&D &bogus; x"), "R&D &bogus; x");
    }
}
