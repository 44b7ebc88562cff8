//! Minimal paginating PDF writer on top of `lopdf`.
//!
//! Uses the standard Helvetica faces with WinAnsi encoding, so no fonts are
//! embedded. Characters outside Latin-1 are written as `?`.

use lopdf::{
  Dictionary, Document, Object, ObjectId, Stream, StringFormat,
  content::{Content, Operation},
  dictionary,
};

use crate::{
  Result,
  layout::{Block, Style},
};

// A4 in points.
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;

/// Average Helvetica glyph width as a fraction of the font size. Wrapping is
/// approximate.
const AVG_GLYPH_WIDTH: f32 = 0.5;

struct Face {
  font:    &'static str,
  size:    i64,
  leading: i64,
}

fn face(style: Style) -> Face {
  match style {
    Style::Title => Face { font: "F2", size: 22, leading: 30 },
    Style::Heading => Face { font: "F2", size: 16, leading: 24 },
    Style::Subheading => Face { font: "F2", size: 13, leading: 19 },
    Style::Body => Face { font: "F1", size: 11, leading: 15 },
  }
}

/// Encode `text` as WinAnsi bytes.
fn encode(text: &str) -> Vec<u8> {
  let mut out = Vec::with_capacity(text.len());
  for c in text.chars() {
    match c {
      '\u{2192}' => out.extend_from_slice(b"->"),
      '\u{2022}' => out.push(b'-'),
      _ => out.push(match u32::from(c) {
        n @ (0x20..=0x7e | 0xa0..=0xff) => n as u8,
        _ => b'?',
      }),
    }
  }
  out
}

/// Greedy word wrap to at most `max` characters per line. Words longer than
/// `max` are split.
fn wrap(text: &str, max: usize) -> Vec<String> {
  let indent: String = text.chars().take_while(|c| *c == ' ').collect();
  let room = max.saturating_sub(indent.len()).max(1);
  let mut lines = Vec::new();
  let mut current = indent.clone();

  for word in text.split_whitespace() {
    let mut word = word.to_owned();
    while word.chars().count() > room {
      if current.trim().is_empty() {
        let head: String = word.chars().take(room).collect();
        word = word.chars().skip(room).collect();
        lines.push(format!("{indent}{head}"));
      } else {
        lines.push(std::mem::replace(&mut current, indent.clone()));
      }
    }
    let sep = usize::from(!current.trim().is_empty());
    if current.chars().count() + sep + word.chars().count() > max
      && !current.trim().is_empty()
    {
      lines.push(std::mem::replace(&mut current, indent.clone()));
    }
    if !current.trim().is_empty() {
      current.push(' ');
    }
    current.push_str(&word);
  }
  if !current.trim().is_empty() || lines.is_empty() {
    lines.push(current);
  }
  lines
}

/// One page's worth of text operations.
struct PageBuilder {
  ops: Vec<Operation>,
  y:   i64,
}

impl PageBuilder {
  fn new() -> Self { Self { ops: Vec::new(), y: PAGE_HEIGHT - MARGIN } }

  fn fits(&self, height: i64) -> bool { self.y - height >= MARGIN }

  fn line(&mut self, face: &Face, text: &str) {
    self.y -= face.leading;
    self.ops.extend([
      Operation::new("BT", vec![]),
      Operation::new("Tf", vec![face.font.into(), face.size.into()]),
      Operation::new("Td", vec![MARGIN.into(), self.y.into()]),
      Operation::new(
        "Tj",
        vec![Object::String(encode(text), StringFormat::Literal)],
      ),
      Operation::new("ET", vec![]),
    ]);
  }
}

fn font(base: &str) -> Dictionary {
  dictionary! {
    "Type" => "Font",
    "Subtype" => "Type1",
    "BaseFont" => base,
    "Encoding" => "WinAnsiEncoding",
  }
}

/// Lay `blocks` out over as many A4 pages as needed and serialise the
/// document.
pub fn write(blocks: &[Block], title: &str) -> Result<Vec<u8>> {
  let mut pages = vec![PageBuilder::new()];

  for block in blocks {
    match block {
      Block::Space(pts) => {
        if let Some(page) = pages.last_mut() {
          page.y -= i64::from(*pts);
        }
      }
      Block::Text { style, text } => {
        let face = face(*style);
        let max = ((PAGE_WIDTH - 2 * MARGIN) as f32
          / (face.size as f32 * AVG_GLYPH_WIDTH)) as usize;
        for line in wrap(text, max.max(1)) {
          if !pages.last().is_some_and(|p| p.fits(face.leading)) {
            pages.push(PageBuilder::new());
          }
          if let Some(page) = pages.last_mut() {
            page.line(&face, &line);
          }
        }
      }
    }
  }

  let mut doc = Document::with_version("1.5");
  let pages_id = doc.new_object_id();
  let regular = doc.add_object(font("Helvetica"));
  let bold = doc.add_object(font("Helvetica-Bold"));
  let resources = doc.add_object(dictionary! {
    "Font" => dictionary! { "F1" => regular, "F2" => bold },
  });

  let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
  for page in pages {
    let content = Content { operations: page.ops };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    let page_id: ObjectId = doc.add_object(dictionary! {
      "Type" => "Page",
      "Parent" => pages_id,
      "Contents" => content_id,
    });
    kids.push(page_id.into());
  }

  let count = kids.len() as i64;
  doc.objects.insert(
    pages_id,
    Object::Dictionary(dictionary! {
      "Type" => "Pages",
      "Kids" => kids,
      "Count" => count,
      "Resources" => resources,
      "MediaBox" => vec![0_i64.into(), 0_i64.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    }),
  );
  let info = doc.add_object(dictionary! {
    "Title" => Object::string_literal(encode(title)),
    "Producer" => Object::string_literal("Object Design System"),
  });
  let catalog = doc.add_object(dictionary! {
    "Type" => "Catalog",
    "Pages" => pages_id,
  });
  doc.trailer.set("Root", catalog);
  doc.trailer.set("Info", info);

  let mut out = Vec::new();
  doc.save_to(&mut out)?;
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;

  /// All `Tj` strings of every page, in page order.
  fn extract(bytes: &[u8]) -> Vec<Vec<String>> {
    let doc = Document::load_mem(bytes).unwrap();
    doc
      .get_pages()
      .values()
      .map(|page_id| {
        let raw = doc.get_page_content(*page_id).unwrap();
        Content::decode(&raw)
          .unwrap()
          .operations
          .into_iter()
          .filter(|op| op.operator == "Tj")
          .flat_map(|op| op.operands)
          .filter_map(|operand| match operand {
            Object::String(s, _) => Some(String::from_utf8_lossy(&s).into_owned()),
            _ => None,
          })
          .collect()
      })
      .collect()
  }

  fn body(text: &str) -> Block { Block::Text { style: Style::Body, text: text.into() } }

  #[test]
  fn writes_a_loadable_single_page() {
    let bytes = write(&[body("Hello (world)"), Block::Space(10), body("second")], "T")
      .unwrap();
    assert!(bytes.starts_with(b"%PDF-1.5"));

    let pages = extract(&bytes);
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0], vec!["Hello (world)", "second"]);
  }

  #[test]
  fn long_content_spills_onto_more_pages() {
    let blocks: Vec<_> = (0..200).map(|i| body(&format!("line {i}"))).collect();
    let pages = extract(&write(&blocks, "T").unwrap());

    assert!(pages.len() > 1);
    let all: Vec<_> = pages.into_iter().flatten().collect();
    assert_eq!(all.len(), 200);
    assert_eq!(all[0], "line 0");
    assert_eq!(all[199], "line 199");
  }

  #[test]
  fn wrap_respects_width_and_indent() {
    let lines = wrap("  - alpha beta gamma delta", 12);
    assert!(lines.iter().all(|l| l.chars().count() <= 12));
    assert!(lines.iter().all(|l| l.starts_with("  ")));
    assert_eq!(lines.join(" ").split_whitespace().count(), 5);

    assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    assert_eq!(wrap("", 10), vec![""]);
  }

  #[test]
  fn encode_replaces_non_latin() {
    assert_eq!(encode("a \u{2192} b"), b"a -> b".to_vec());
    assert_eq!(encode("\u{2022} x"), b"- x".to_vec());
    assert_eq!(encode("caf\u{e9}"), vec![b'c', b'a', b'f', 0xe9]);
    assert_eq!(encode("\u{4e2d}"), b"?".to_vec());
  }
}
