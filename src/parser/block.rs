//! Line-level parser: classifies each line and grows the document tree

use once_cell::sync::Lazy;
use regex::Regex;

use super::ListKind;
use super::inline::InlineParser;
use super::machine::{MachineState, StateMachine};
use super::source::LineSource;
use crate::config::SamConfig;
use crate::document::DocTree;
use crate::error::{ParseError, ParseResult};

struct LinePatterns {
    comment: Regex,
    block: Regex,
    blank: Regex,
    codeblock_start: Regex,
    codeblock_end: Regex,
    paragraph: Regex,
    record: Regex,
    list_item: Regex,
    num_list_item: Regex,
}

static PATTERNS: Lazy<LinePatterns> = Lazy::new(|| LinePatterns {
    comment: Regex::new(r"^\s*#").unwrap(),
    block: Regex::new(r"^(\s*)([a-zA-Z0-9_-]+):(.*)").unwrap(),
    blank: Regex::new(r"^\s*$").unwrap(),
    codeblock_start: Regex::new(r"^(\s*)```(.*)").unwrap(),
    codeblock_end: Regex::new(r"^(\s*)```\s*$").unwrap(),
    paragraph: Regex::new(r"^\w*").unwrap(),
    record: Regex::new(r"^\s*[a-zA-Z0-9_-]+::(.*)").unwrap(),
    list_item: Regex::new(r"^(\s*)\*\s(.*)").unwrap(),
    num_list_item: Regex::new(r"^(\s*)[0-9]+\.\s(.*)").unwrap(),
});

impl ListKind {
    fn item_pattern(self) -> &'static Regex {
        match self {
            Self::Bullet => &PATTERNS.list_item,
            Self::Numbered => &PATTERNS.num_list_item,
        }
    }

    const fn body_state(self) -> LineState {
        match self {
            Self::Bullet => LineState::ListBody,
            Self::Numbered => LineState::NumListBody,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineState {
    Start,
    Scanning,
    BlockHeader,
    CodeblockHeader,
    CodeblockBody,
    ParagraphHeader,
    ParagraphBody,
    RecordHeader,
    RecordBody,
    ListHeader,
    ListBody,
    NumListHeader,
    NumListBody,
    Done,
}

impl MachineState for LineState {
    fn is_terminal(self) -> bool {
        self == Self::Done
    }
}

/// Header of a record set: each following row becomes one `element` node
#[derive(Debug, Clone, PartialEq, Eq)]
struct RecordSet {
    element: String,
    fields: Vec<String>,
    indent: usize,
}

pub struct LineContext<'a> {
    source: &'a mut dyn LineSource,
    inline: &'a InlineParser,
    config: &'a SamConfig,
    line: String,
    tree: DocTree,
    /// Paragraph text or codeblock body being accumulated
    buffer: String,
    record: Option<RecordSet>,
    codeblock_line: u64,
}

impl<'a> LineContext<'a> {
    fn new(
        source: &'a mut dyn LineSource,
        inline: &'a InlineParser,
        config: &'a SamConfig,
    ) -> Self {
        Self {
            source,
            inline,
            config,
            line: String::new(),
            tree: DocTree::new(),
            buffer: String::new(),
            record: None,
            codeblock_line: 0,
        }
    }

    fn advance(&mut self) -> ParseResult<()> {
        self.line = self.source.next_line()?;
        Ok(())
    }

    fn unrecognized(&self) -> ParseError {
        ParseError::UnrecognizedLine {
            line: self.source.line_number(),
            source_name: self.source.name().to_string(),
        }
    }
}

fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

fn start(ctx: &mut LineContext<'_>) -> ParseResult<LineState> {
    ctx.advance()?;
    let Some(declaration) = ctx.line.strip_prefix("sam:") else {
        return Err(ParseError::MissingDeclaration {
            source_name: ctx.source.name().to_string(),
        });
    };
    ctx.tree.new_root("sam", declaration.trim())?;
    Ok(LineState::Scanning)
}

fn scanning(ctx: &mut LineContext<'_>) -> ParseResult<LineState> {
    ctx.advance()?;
    let line = ctx.line.as_str();
    let patterns = &*PATTERNS;

    if line.is_empty() {
        return Ok(LineState::Done);
    }
    if patterns.comment.is_match(line) {
        let content = line.trim_start().strip_prefix('#').unwrap_or_default().trim();
        ctx.tree.new_comment(content)?;
        return Ok(LineState::Scanning);
    }

    let next = if patterns.block.is_match(line) {
        LineState::BlockHeader
    } else if patterns.blank.is_match(line) {
        LineState::Scanning
    } else if patterns.codeblock_start.is_match(line) {
        LineState::CodeblockHeader
    } else if patterns.list_item.is_match(line) {
        LineState::ListHeader
    } else if patterns.num_list_item.is_match(line) {
        LineState::NumListHeader
    } else if patterns.paragraph.is_match(line) {
        LineState::ParagraphHeader
    } else {
        return Err(ctx.unrecognized());
    };
    Ok(next)
}

fn block_header(ctx: &mut LineContext<'_>) -> ParseResult<LineState> {
    let Some(caps) = PATTERNS.block.captures(&ctx.line) else {
        return Err(ctx.unrecognized());
    };
    let content = caps[3].trim();
    if content.starts_with(':') {
        return Ok(LineState::RecordHeader);
    }
    ctx.tree.new_block(&caps[2], content, caps[1].len())?;
    Ok(LineState::Scanning)
}

fn codeblock_header(ctx: &mut LineContext<'_>) -> ParseResult<LineState> {
    let Some(caps) = PATTERNS.codeblock_start.captures(&ctx.line) else {
        return Err(ctx.unrecognized());
    };
    ctx.tree.new_block("codeblock", caps[2].trim(), leading_spaces(&ctx.line))?;
    ctx.buffer.clear();
    ctx.codeblock_line = ctx.source.line_number();
    Ok(LineState::CodeblockBody)
}

fn codeblock_body(ctx: &mut LineContext<'_>) -> ParseResult<LineState> {
    ctx.advance()?;
    if ctx.line.is_empty() {
        return Err(ParseError::UnterminatedCodeblock {
            line: ctx.codeblock_line,
            source_name: ctx.source.name().to_string(),
        });
    }
    if PATTERNS.codeblock_end.is_match(&ctx.line) {
        ctx.tree.new_pre(std::mem::take(&mut ctx.buffer))?;
        return Ok(LineState::Scanning);
    }
    ctx.buffer.push_str(&ctx.line);
    Ok(LineState::CodeblockBody)
}

fn paragraph_header(ctx: &mut LineContext<'_>) -> ParseResult<LineState> {
    ctx.tree.new_block("p", "", leading_spaces(&ctx.line))?;
    ctx.buffer.clear();
    ctx.buffer.push_str(ctx.line.trim());
    Ok(LineState::ParagraphBody)
}

fn paragraph_body(ctx: &mut LineContext<'_>) -> ParseResult<LineState> {
    ctx.advance()?;
    if PATTERNS.blank.is_match(&ctx.line) {
        let flow = ctx.inline.parse(&ctx.buffer)?;
        ctx.tree.new_flow(flow)?;
        return Ok(LineState::Scanning);
    }
    ctx.buffer.push(' ');
    ctx.buffer.push_str(ctx.line.trim());
    Ok(LineState::ParagraphBody)
}

/// Add the current line as an item; `false` if it is not an item of `kind`
fn add_item(ctx: &mut LineContext<'_>, kind: ListKind) -> ParseResult<bool> {
    let Some(caps) = kind.item_pattern().captures(&ctx.line) else {
        return Ok(false);
    };
    let indent = leading_spaces(&ctx.line) + ctx.config.item_indent as usize;
    ctx.tree.new_block(ctx.config.item_element.as_str(), caps[2].trim(), indent)?;
    Ok(true)
}

fn open_list(ctx: &mut LineContext<'_>, kind: ListKind) -> ParseResult<LineState> {
    let element = ctx.config.list_element_for(kind);
    ctx.tree.new_block(element, "", leading_spaces(&ctx.line))?;
    if !add_item(ctx, kind)? {
        return Err(ctx.unrecognized());
    }
    Ok(kind.body_state())
}

fn continue_list(ctx: &mut LineContext<'_>, kind: ListKind) -> ParseResult<LineState> {
    ctx.advance()?;
    if PATTERNS.blank.is_match(&ctx.line) {
        return Ok(LineState::Scanning);
    }
    if add_item(ctx, kind)? {
        Ok(kind.body_state())
    } else {
        Err(ParseError::broken_list(
            ctx.source.line_number(),
            ctx.source.name(),
            kind,
        ))
    }
}

fn list_header(ctx: &mut LineContext<'_>) -> ParseResult<LineState> {
    open_list(ctx, ListKind::Bullet)
}

fn list_body(ctx: &mut LineContext<'_>) -> ParseResult<LineState> {
    continue_list(ctx, ListKind::Bullet)
}

fn num_list_header(ctx: &mut LineContext<'_>) -> ParseResult<LineState> {
    open_list(ctx, ListKind::Numbered)
}

fn num_list_body(ctx: &mut LineContext<'_>) -> ParseResult<LineState> {
    continue_list(ctx, ListKind::Numbered)
}

fn record_header(ctx: &mut LineContext<'_>) -> ParseResult<LineState> {
    let (Some(block), Some(record)) = (
        PATTERNS.block.captures(&ctx.line),
        PATTERNS.record.captures(&ctx.line),
    ) else {
        return Err(ctx.unrecognized());
    };
    let fields = record[1].split(',').map(|f| f.trim().to_string()).collect();
    ctx.record = Some(RecordSet {
        element: block[2].to_string(),
        fields,
        indent: block[1].len(),
    });
    Ok(LineState::RecordBody)
}

fn record_body(ctx: &mut LineContext<'_>) -> ParseResult<LineState> {
    ctx.advance()?;
    if PATTERNS.blank.is_match(&ctx.line) {
        return Ok(LineState::Scanning);
    }
    let Some(record) = &ctx.record else {
        return Err(ctx.unrecognized());
    };
    let values = ctx.line.split(',').map(str::trim);
    let fields = record.fields.iter().map(String::as_str).zip(values);
    ctx.tree.new_record(
        &record.element,
        record.indent,
        ctx.config.field_indent as usize,
        fields,
    )?;
    Ok(LineState::RecordBody)
}

/// Read `source` to the end and build its document tree
///
/// # Errors
///
/// Returns the first structural error found; no partial tree is returned
pub fn parse(
    source: &mut dyn LineSource,
    inline: &InlineParser,
    config: &SamConfig,
) -> ParseResult<DocTree> {
    let machine: StateMachine<LineState, LineContext<'_>> = StateMachine::new(LineState::Start)
        .with_state(LineState::Start, start)
        .with_state(LineState::Scanning, scanning)
        .with_state(LineState::BlockHeader, block_header)
        .with_state(LineState::CodeblockHeader, codeblock_header)
        .with_state(LineState::CodeblockBody, codeblock_body)
        .with_state(LineState::ParagraphHeader, paragraph_header)
        .with_state(LineState::ParagraphBody, paragraph_body)
        .with_state(LineState::RecordHeader, record_header)
        .with_state(LineState::RecordBody, record_body)
        .with_state(LineState::ListHeader, list_header)
        .with_state(LineState::ListBody, list_body)
        .with_state(LineState::NumListHeader, num_list_header)
        .with_state(LineState::NumListBody, num_list_body);

    let mut ctx = LineContext::new(source, inline, config);
    machine.run(&mut ctx)?;
    log::debug!("parsed {} nodes from {}", ctx.tree.len(), ctx.source.name());
    Ok(ctx.tree)
}
