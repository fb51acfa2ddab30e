//! Character-level parser for paragraph text
//!
//! Recognizes escapes, `[text](type "canonical" (namespace))` annotations,
//! `*bold*` and `_italic_`. Scanning is left to right; once a trigger character is
//! consumed only its own construct is tried, and a failed attempt keeps the trigger
//! as literal text.

use once_cell::sync::Lazy;
use regex::Regex;

use super::machine::{MachineState, StateMachine};
use crate::error::ParseResult;
use crate::models::{Annotation, Decoration, DecorationKind, Flow, Inline};

/// Characters that lose their backslash when escaped
const ESCAPABLE: &[char] = &['\\', '[', '(', ']', '_'];

static ANNOTATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\[([^\[]*?[^\\])\]\(([^\(]\w*?\s*[^\\"'])(["'](.*?)["'])??\s*(\((\w+)\))?\)"#)
        .unwrap()
});
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\*(\S.+?\S)\*").unwrap());
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^_(\S.*?\S)_").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineState {
    Scan,
    Escape,
    AnnotationTry,
    BoldTry,
    ItalicTry,
    End,
}

impl MachineState for InlineState {
    fn is_terminal(self) -> bool {
        self == Self::End
    }
}

/// Cursor over one paragraph plus the flow being built
pub struct InlineContext {
    text: String,
    pos: usize,
    pending: String,
    flow: Flow,
}

impl InlineContext {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            pos: 0,
            pending: String::new(),
            flow: Flow::new(),
        }
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.text[self.pos..].chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Remaining text starting at the trigger character just consumed
    fn from_trigger(&self) -> &str {
        &self.text[self.pos - 1..]
    }

    fn flush(&mut self) {
        self.flow.push_text(std::mem::take(&mut self.pending));
    }

    /// Emit a matched construct spanning `len` bytes from the trigger
    fn accept(&mut self, item: Inline, len: usize) {
        self.flush();
        self.flow.push(item);
        self.pos += len - 1;
    }
}

fn scan(ctx: &mut InlineContext) -> ParseResult<InlineState> {
    let Some(c) = ctx.next_char() else {
        ctx.flush();
        return Ok(InlineState::End);
    };
    Ok(match c {
        '\\' => InlineState::Escape,
        '[' => InlineState::AnnotationTry,
        '*' => InlineState::BoldTry,
        '_' => InlineState::ItalicTry,
        c => {
            ctx.pending.push(c);
            InlineState::Scan
        }
    })
}

fn escape(ctx: &mut InlineContext) -> ParseResult<InlineState> {
    match ctx.next_char() {
        Some(c) if ESCAPABLE.contains(&c) => ctx.pending.push(c),
        Some(c) => {
            ctx.pending.push('\\');
            ctx.pending.push(c);
        }
        None => ctx.pending.push('\\'),
    }
    Ok(InlineState::Scan)
}

fn match_annotation(rest: &str) -> Option<(Annotation, usize)> {
    let caps = ANNOTATION.captures(rest)?;
    let mut annotation = Annotation::new(caps[2].trim(), &caps[1]);
    if let Some(canonical) = caps.get(4).filter(|m| !m.as_str().is_empty()) {
        annotation = annotation.with_canonical(canonical.as_str());
    }
    if let Some(namespace) = caps.get(6) {
        annotation = annotation.with_namespace(namespace.as_str());
    }
    Some((annotation, caps[0].len()))
}

fn annotation_try(ctx: &mut InlineContext) -> ParseResult<InlineState> {
    match match_annotation(ctx.from_trigger()) {
        Some((annotation, len)) => ctx.accept(Inline::Annotation(annotation), len),
        None => ctx.pending.push('['),
    }
    Ok(InlineState::Scan)
}

fn match_decoration(
    pattern: &Regex,
    rest: &str,
    kind: DecorationKind,
) -> Option<(Decoration, usize)> {
    let caps = pattern.captures(rest)?;
    Some((Decoration::new(kind, &caps[1]), caps[0].len()))
}

fn decoration_try(ctx: &mut InlineContext, pattern: &Regex, kind: DecorationKind, trigger: char) {
    match match_decoration(pattern, ctx.from_trigger(), kind) {
        Some((decoration, len)) => ctx.accept(Inline::Decoration(decoration), len),
        None => ctx.pending.push(trigger),
    }
}

fn bold_try(ctx: &mut InlineContext) -> ParseResult<InlineState> {
    decoration_try(ctx, &BOLD, DecorationKind::Bold, '*');
    Ok(InlineState::Scan)
}

fn italic_try(ctx: &mut InlineContext) -> ParseResult<InlineState> {
    decoration_try(ctx, &ITALIC, DecorationKind::Italic, '_');
    Ok(InlineState::Scan)
}

/// Turns accumulated paragraph text into a [`Flow`]
pub struct InlineParser {
    machine: StateMachine<InlineState, InlineContext>,
}

impl InlineParser {
    #[must_use]
    pub fn new() -> Self {
        let machine = StateMachine::<InlineState, InlineContext>::new(InlineState::Scan)
            .with_state(InlineState::Scan, scan)
            .with_state(InlineState::Escape, escape)
            .with_state(InlineState::AnnotationTry, annotation_try)
            .with_state(InlineState::BoldTry, bold_try)
            .with_state(InlineState::ItalicTry, italic_try);
        Self { machine }
    }

    /// Parse one paragraph
    ///
    /// # Errors
    ///
    /// Only fails if the state table is incomplete
    pub fn parse(&self, text: &str) -> ParseResult<Flow> {
        let mut ctx = InlineContext::new(text);
        self.machine.run(&mut ctx)?;
        Ok(ctx.flow)
    }
}

impl Default for InlineParser {
    fn default() -> Self {
        Self::new()
    }
}
