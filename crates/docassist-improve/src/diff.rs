//! Token alignment and diff-to-suggestion mapping
//!
//! [`opcodes`] aligns two token sequences with Myers' algorithm and reports
//! the edit blocks between them. [`suggestions_from_diff`] tokenizes original
//! and improved text into words, whitespace runs and punctuation, aligns them,
//! and turns every non-blank edit block into a [`Suggestion`].

use std::hash::Hash;

use similar::{capture_diff_slices, Algorithm, DiffTag};

use crate::suggestion::{Suggestion, SuggestionStatus};

pub const REASON_WORD_CHOICE: &str = "corrected potential typo or improved word choice";
pub const REASON_STYLE: &str = "improved clarity or style";
pub const REASON_REMOVED: &str = "removed redundant or unnecessary text";
pub const REASON_ADDED: &str = "added text for clarity or completeness";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTag {
    Equal,
    Replace,
    Delete,
    Insert,
}

impl From<DiffTag> for OpTag {
    fn from(tag: DiffTag) -> Self {
        match tag {
            DiffTag::Equal => OpTag::Equal,
            DiffTag::Replace => OpTag::Replace,
            DiffTag::Delete => OpTag::Delete,
            DiffTag::Insert => OpTag::Insert,
        }
    }
}

/// One aligned block: `a[a_start..a_end]` corresponds to `b[b_start..b_end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub a_start: usize,
    pub a_end: usize,
    pub b_start: usize,
    pub b_end: usize,
}

/// Edit opcodes transforming `a` into `b`, covering both sequences in order.
///
/// Adjacent deletes and inserts are merged into a single replace block.
pub fn opcodes<T: Eq + Hash + Ord>(a: &[T], b: &[T]) -> Vec<Opcode> {
    capture_diff_slices(Algorithm::Myers, a, b)
        .iter()
        .map(|op| {
            let (tag, old, new) = op.as_tag_tuple();
            Opcode {
                tag: tag.into(),
                a_start: old.start,
                a_end: old.end,
                b_start: new.start,
                b_end: new.end,
            }
        })
        .collect()
}

/// Text split into tokens, with byte and char offsets of every boundary
struct Tokenized<'a> {
    text: &'a str,
    tokens: Vec<&'a str>,
    /// `bytes[k]` is the byte offset where token `k` starts; one extra entry
    bytes: Vec<usize>,
    /// Same as `bytes`, counted in chars
    chars: Vec<usize>,
}

impl<'a> Tokenized<'a> {
    fn new(text: &'a str) -> Self {
        let tokens = tokenize(text);
        let mut bytes = Vec::with_capacity(tokens.len() + 1);
        let mut chars = Vec::with_capacity(tokens.len() + 1);
        let (mut byte_pos, mut char_pos) = (0, 0);
        for token in &tokens {
            bytes.push(byte_pos);
            chars.push(char_pos);
            byte_pos += token.len();
            char_pos += token.chars().count();
        }
        bytes.push(byte_pos);
        chars.push(char_pos);
        Self {
            text,
            tokens,
            bytes,
            chars,
        }
    }

    fn segment(&self, start: usize, end: usize) -> &'a str {
        &self.text[self.bytes[start]..self.bytes[end]]
    }
}

/// Split text into word runs, whitespace runs and single other characters.
///
/// Concatenating the tokens yields the input unchanged.
pub fn tokenize(text: &str) -> Vec<&str> {
    #[derive(PartialEq)]
    enum Class {
        Word,
        Space,
        Other,
    }
    let class = |c: char| {
        if c.is_alphanumeric() || c == '_' || c == '\'' {
            Class::Word
        } else if c.is_whitespace() {
            Class::Space
        } else {
            Class::Other
        }
    };

    let mut tokens = Vec::new();
    let mut start = 0;
    let mut current: Option<Class> = None;
    for (pos, c) in text.char_indices() {
        let next = class(c);
        let split = match &current {
            Some(prev) => *prev != next || next == Class::Other,
            None => false,
        };
        if split {
            tokens.push(&text[start..pos]);
            start = pos;
        }
        current = Some(next);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

/// Reason text for an edit block
pub fn reason_for(tag: OpTag, original: &str, improved: &str) -> &'static str {
    match tag {
        OpTag::Replace if original.chars().count() == improved.chars().count() => {
            REASON_WORD_CHOICE
        }
        OpTag::Replace => REASON_STYLE,
        OpTag::Delete => REASON_REMOVED,
        OpTag::Insert => REASON_ADDED,
        OpTag::Equal => "general improvement",
    }
}

/// Derive suggestions by aligning `original` against `improved`.
///
/// Blocks whose original and replacement are both blank are skipped. Ids run
/// from 1 in document order; offsets are char offsets into `original`.
pub fn suggestions_from_diff(original: &str, improved: &str) -> Vec<Suggestion> {
    let a = Tokenized::new(original);
    let b = Tokenized::new(improved);

    let mut suggestions = Vec::new();
    for op in opcodes(&a.tokens, &b.tokens) {
        if op.tag == OpTag::Equal {
            continue;
        }
        let original_segment = a.segment(op.a_start, op.a_end);
        let improved_segment = match op.tag {
            OpTag::Delete => "",
            _ => b.segment(op.b_start, op.b_end),
        };
        if original_segment.trim().is_empty() && improved_segment.trim().is_empty() {
            continue;
        }

        suggestions.push(Suggestion {
            id: suggestions.len() as u32 + 1,
            start: a.chars[op.a_start],
            end: a.chars[op.a_end],
            original_text: original_segment.to_string(),
            improved_text: improved_segment.to_string(),
            reason: reason_for(op.tag, original_segment, improved_segment).to_string(),
            status: SuggestionStatus::Pending,
        });
    }
    suggestions
}
