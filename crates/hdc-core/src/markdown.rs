//! Block structure of documentation prose
//!
//! A small, line-based parser for the Markdown subset used in documentation
//! comments and articles: ATX headings, paragraphs, fenced code blocks, block
//! quotes, ordered and unordered lists (with nesting), and thematic breaks.
//! Inline markup is kept verbatim inside paragraph text.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

static RE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})(?:[ \t]+(.*?))?(?:[ \t]+#+)?[ \t]*$").unwrap());
static RE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(`{3,}|~{3,})[ \t]*([^`]*?)[ \t]*$").unwrap());
static RE_LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([ \t]*)([-+*]|\d{1,9}[.)])(?:([ \t]+)(.*))?$").unwrap());
static RE_THEMATIC_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(?:(?:\*[ \t]*){3,}|(?:-[ \t]*){3,}|(?:_[ \t]*){3,})$").unwrap()
});
static RE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").unwrap());

/// A parsed sequence of blocks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

/// One block of prose
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `# text`, with level 1 to 6
    Heading { level: u8, text: String },
    /// Consecutive text lines, joined with newlines
    Paragraph(String),
    List(List),
    /// A fenced code block with its optional info string
    CodeBlock { language: Option<String>, code: String },
    BlockQuote(Vec<Block>),
    ThematicBreak,
}

/// An ordered or unordered list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub ordered: bool,
    /// Number of the first item of an ordered list
    pub start: u32,
    pub items: Vec<ListItem>,
}

/// One item of a list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListItem {
    pub blocks: Vec<Block>,
}

impl ListItem {
    /// Text of the item's leading paragraph, if it starts with one
    #[must_use]
    pub fn leading_text(&self) -> Option<&str> {
        match self.blocks.first() {
            Some(Block::Paragraph(text)) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn plain_text(&self) -> String {
        join_plain(&self.blocks)
    }
}

impl Document {
    #[must_use]
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Parse `text` into blocks
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self::from_lines(text.lines())
    }

    /// Parse already split lines into blocks
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        Self::new(parse_blocks(&lines))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    /// Split into the first block and a document of the remaining blocks
    ///
    /// The remainder is `None` when there is nothing after the first block.
    #[must_use]
    pub fn split_summary(&self) -> (Option<Block>, Option<Document>) {
        match self.blocks.split_first() {
            None => (None, None),
            Some((first, [])) => (Some(first.clone()), None),
            Some((first, rest)) => (Some(first.clone()), Some(Document::new(rest.to_vec()))),
        }
    }

    /// Render back to Markdown, one blank line between blocks
    #[must_use]
    pub fn to_markdown(&self) -> String {
        self.blocks
            .iter()
            .map(Block::to_markdown)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Text content without markup, on one line
    #[must_use]
    pub fn plain_text(&self) -> String {
        join_plain(&self.blocks)
    }
}

impl From<Vec<Block>> for Document {
    fn from(blocks: Vec<Block>) -> Self {
        Self::new(blocks)
    }
}

impl Block {
    #[must_use]
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        match self {
            Self::Heading { level, text } => {
                out.push_str(&"#".repeat(usize::from(*level)));
                if !text.is_empty() {
                    out.push(' ');
                    out.push_str(text);
                }
            }
            Self::Paragraph(text) => out.push_str(text),
            Self::List(list) => {
                for (n, item) in list.items.iter().enumerate() {
                    if n > 0 {
                        out.push('\n');
                    }
                    let marker = if list.ordered {
                        format!("{}. ", list.start as usize + n)
                    } else {
                        "- ".to_string()
                    };
                    let body = item
                        .blocks
                        .iter()
                        .map(Block::to_markdown)
                        .collect::<Vec<_>>()
                        .join("\n");
                    out.push_str(&marker);
                    out.push_str(&indent_continuation(&body, marker.len()));
                }
            }
            Self::CodeBlock { language, code } => {
                let _ = write!(
                    out,
                    "```{}\n{code}\n```",
                    language.as_deref().unwrap_or_default()
                );
            }
            Self::BlockQuote(blocks) => {
                let inner = Document::new(blocks.clone()).to_markdown();
                let quoted: Vec<String> = inner
                    .lines()
                    .map(|line| {
                        if line.is_empty() {
                            ">".to_string()
                        } else {
                            format!("> {line}")
                        }
                    })
                    .collect();
                out.push_str(&quoted.join("\n"));
            }
            Self::ThematicBreak => out.push_str("---"),
        }
        out
    }

    /// Text content without markup, on one line
    #[must_use]
    pub fn plain_text(&self) -> String {
        match self {
            Self::Heading { text, .. } | Self::Paragraph(text) => strip_inline(text),
            Self::List(list) => list
                .items
                .iter()
                .map(ListItem::plain_text)
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
            Self::CodeBlock { code, .. } => code.split_whitespace().collect::<Vec<_>>().join(" "),
            Self::BlockQuote(blocks) => join_plain(blocks),
            Self::ThematicBreak => String::new(),
        }
    }
}

fn join_plain(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(Block::plain_text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drop code-span backticks and link targets and collapse whitespace
fn strip_inline(text: &str) -> String {
    let text = RE_LINK.replace_all(text, "$1");
    text.replace('`', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn indent_continuation(body: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    let mut out = String::new();
    for (n, line) in body.lines().enumerate() {
        if n > 0 {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(&pad);
            }
        }
        out.push_str(line);
    }
    out
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn leading_whitespace(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

fn dedent(line: &str, width: usize) -> String {
    line[leading_whitespace(line).min(width)..].to_string()
}

/// Returns true if `line` begins a block other than a paragraph
fn starts_block(line: &str) -> bool {
    let trimmed = line.trim_start();
    RE_HEADING.is_match(trimmed)
        || RE_FENCE.is_match(trimmed)
        || trimmed.starts_with('>')
        || RE_THEMATIC_BREAK.is_match(line)
        || ListMarker::parse(line).is_some()
}

fn parse_blocks(lines: &[String]) -> Vec<Block> {
    parse_located(lines).into_iter().map(|(_, block)| block).collect()
}

/// Parse `lines`, pairing each top-level block with the index of its first
/// line
pub(crate) fn parse_located(lines: &[String]) -> Vec<(usize, Block)> {
    let mut blocks = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].as_str();
        let trimmed = line.trim_start();
        if is_blank(line) {
            i += 1;
            continue;
        }

        let (block, next) = if let Some(fence) = Fence::open(line) {
            parse_code_block(lines, i, &fence)
        } else if RE_THEMATIC_BREAK.is_match(line) {
            (Block::ThematicBreak, i + 1)
        } else if let Some(caps) = RE_HEADING.captures(trimmed) {
            let level = u8::try_from(caps[1].len()).unwrap_or(6);
            let text = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
            (Block::Heading { level, text }, i + 1)
        } else if trimmed.starts_with('>') {
            parse_block_quote(lines, i)
        } else if let Some(marker) = ListMarker::parse(line) {
            parse_list(lines, i, marker)
        } else {
            parse_paragraph(lines, i)
        };
        blocks.push((i, block));
        i = next;
    }
    blocks
}

struct Fence {
    marker: char,
    len: usize,
    indent: usize,
    info: Option<String>,
}

impl Fence {
    fn open(line: &str) -> Option<Self> {
        let indent = leading_whitespace(line);
        let caps = RE_FENCE.captures(&line[indent..])?;
        let fence = &caps[1];
        let info = caps.get(2).map(|m| m.as_str().trim()).filter(|s| !s.is_empty());
        Some(Self {
            marker: fence.chars().next()?,
            len: fence.len(),
            indent,
            info: info.map(str::to_string),
        })
    }

    fn closes(&self, line: &str) -> bool {
        let trimmed = line.trim();
        let run = trimmed.chars().take_while(|&c| c == self.marker).count();
        run >= self.len && run == trimmed.chars().count()
    }
}

fn parse_code_block(lines: &[String], start: usize, fence: &Fence) -> (Block, usize) {
    let mut code = Vec::new();
    let mut i = start + 1;
    while i < lines.len() {
        if fence.closes(&lines[i]) {
            i += 1;
            break;
        }
        code.push(dedent(&lines[i], fence.indent));
        i += 1;
    }
    let block = Block::CodeBlock {
        language: fence.info.clone(),
        code: code.join("\n"),
    };
    (block, i)
}

fn parse_block_quote(lines: &[String], start: usize) -> (Block, usize) {
    let mut inner = Vec::new();
    let mut i = start;
    while let Some(rest) = lines.get(i).and_then(|l| l.trim_start().strip_prefix('>')) {
        inner.push(rest.strip_prefix(' ').unwrap_or(rest).to_string());
        i += 1;
    }
    (Block::BlockQuote(parse_blocks(&inner)), i)
}

fn parse_paragraph(lines: &[String], start: usize) -> (Block, usize) {
    let mut text = vec![lines[start].trim()];
    let mut i = start + 1;
    while let Some(line) = lines.get(i) {
        if is_blank(line) || starts_block(line) {
            break;
        }
        text.push(line.trim());
        i += 1;
    }
    (Block::Paragraph(text.join("\n")), i)
}

struct ListMarker {
    indent: usize,
    /// Bullet character, or the delimiter after an ordinal
    symbol: char,
    number: Option<u32>,
    content: String,
    content_indent: usize,
}

impl ListMarker {
    fn parse(line: &str) -> Option<Self> {
        let caps = RE_LIST_ITEM.captures(line)?;
        let indent = caps[1].len();
        let marker = &caps[2];
        let spacing = caps.get(3).map_or(1, |m| m.len());
        let content = caps.get(4).map_or("", |m| m.as_str());
        let symbol = marker.chars().last()?;
        let number = marker
            .strip_suffix(['.', ')'])
            .and_then(|digits| digits.parse().ok());
        Some(Self {
            indent,
            symbol,
            number,
            content: content.trim_end().to_string(),
            content_indent: indent + marker.len() + spacing,
        })
    }

    fn continues(&self, other: &Self) -> bool {
        self.symbol == other.symbol
            && self.number.is_some() == other.number.is_some()
            && other.indent < self.content_indent
    }
}

fn parse_list(lines: &[String], start: usize, first: ListMarker) -> (Block, usize) {
    let ordered = first.number.is_some();
    let mut list = List {
        ordered,
        start: first.number.unwrap_or(1),
        items: Vec::new(),
    };
    let mut marker = first;
    let mut i = start;
    loop {
        let mut item_lines = vec![marker.content.clone()];
        let mut j = i + 1;
        while let Some(line) = lines.get(j) {
            if is_blank(line) {
                let next = lines[j..].iter().find(|l| !is_blank(l));
                match next {
                    Some(next) if leading_whitespace(next) >= marker.content_indent => {
                        item_lines.push(String::new());
                        j += 1;
                        continue;
                    }
                    _ => break,
                }
            }
            if leading_whitespace(line) >= marker.content_indent {
                item_lines.push(dedent(line, marker.content_indent));
            } else if starts_block(line) {
                break;
            } else {
                item_lines.push(line.trim().to_string());
            }
            j += 1;
        }
        list.items.push(ListItem {
            blocks: parse_blocks(&item_lines),
        });

        let k = (j..lines.len()).find(|&k| !is_blank(&lines[k])).unwrap_or(lines.len());
        match lines.get(k).and_then(|l| ListMarker::parse(l)) {
            Some(next) if marker.continues(&next) => {
                marker = next;
                i = k;
            }
            _ => return (Block::List(list), j),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn paragraph(text: &str) -> Block {
        Block::Paragraph(text.to_string())
    }

    #[test]
    fn test_headings_and_paragraphs() {
        let doc = Document::parse("Summary line\ncontinues.\n\n# Parameters:\n## Details ##\n#\n#no");
        assert_eq!(
            doc.blocks,
            vec![
                paragraph("Summary line\ncontinues."),
                Block::Heading {
                    level: 1,
                    text: "Parameters:".into()
                },
                Block::Heading {
                    level: 2,
                    text: "Details".into()
                },
                Block::Heading {
                    level: 1,
                    text: String::new()
                },
                paragraph("#no"),
            ]
        );
    }

    #[test]
    fn test_code_block_hides_headings() {
        let doc = Document::parse("```hylo\n# not a heading\n  let x = 1\n```\nafter");
        assert_eq!(
            doc.blocks,
            vec![
                Block::CodeBlock {
                    language: Some("hylo".into()),
                    code: "# not a heading\n  let x = 1".into(),
                },
                paragraph("after"),
            ]
        );
    }

    #[test]
    fn test_unterminated_fence_runs_to_end() {
        let doc = Document::parse("~~~\ncode");
        assert_eq!(
            doc.blocks,
            vec![Block::CodeBlock {
                language: None,
                code: "code".into()
            }]
        );
    }

    #[test]
    fn test_nested_lists() {
        let doc = Document::parse("- x: The first.\n  - nested\n- y: The second\n  continued.\n\n1. one\n2. two");
        assert_eq!(doc.len(), 2);

        let outer = doc.blocks[0].as_list().unwrap();
        assert!(!outer.ordered);
        assert_eq!(outer.items.len(), 2);
        assert_eq!(outer.items[0].leading_text(), Some("x: The first."));
        let nested = outer.items[0].blocks[1].as_list().unwrap();
        assert_eq!(nested.items[0].leading_text(), Some("nested"));
        assert_eq!(outer.items[1].leading_text(), Some("y: The second\ncontinued."));

        let ordered = doc.blocks[1].as_list().unwrap();
        assert!(ordered.ordered);
        assert_eq!(ordered.start, 1);
        assert_eq!(ordered.items.len(), 2);
    }

    #[test]
    fn test_different_bullets_start_new_list() {
        let doc = Document::parse("- a\n* b");
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_block_quote_and_break() {
        let doc = Document::parse("> quoted\n> - item\n\n***");
        assert_eq!(
            doc.blocks[0],
            Block::BlockQuote(vec![
                paragraph("quoted"),
                Block::List(List {
                    ordered: false,
                    start: 1,
                    items: vec![ListItem {
                        blocks: vec![paragraph("item")]
                    }],
                }),
            ])
        );
        assert_eq!(doc.blocks[1], Block::ThematicBreak);
    }

    #[test]
    fn test_split_summary() {
        let doc = Document::new(vec![paragraph("P1"), paragraph("P2"), paragraph("P3")]);
        let (summary, description) = doc.split_summary();
        assert_eq!(summary, Some(paragraph("P1")));
        assert_eq!(
            description,
            Some(Document::new(vec![paragraph("P2"), paragraph("P3")]))
        );

        let single = Document::new(vec![paragraph("P1")]);
        assert_eq!(single.split_summary().1, None);
        assert_eq!(Document::default().split_summary(), (None, None));
    }

    #[test]
    fn test_markdown_rendering_reparses() {
        let source = "Intro `code`.\n\n- a\n  - b\n- c\n\n> note\n\n```hylo\nfun f() {}\n```";
        let doc = Document::parse(source);
        assert_eq!(Document::parse(&doc.to_markdown()), doc);
        assert_eq!(doc.blocks[1].to_markdown(), "- a\n  - b\n- c");
    }

    #[test]
    fn test_plain_text() {
        let doc = Document::parse("Adds `x` to\nthe [vector](vector.html).\n\n- one\n- two");
        assert_eq!(doc.plain_text(), "Adds x to the vector. one two");
    }
}
