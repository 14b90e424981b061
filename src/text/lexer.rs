//! Lexer splitting localized text into inline math spans and plain text.

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_until},
    character::complete::anychar,
    combinator::{map, recognize, verify},
    sequence::delimited,
    IResult,
};

/// A piece of localized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// An inline math span including its `\(` `\)` markers
    Math(&'a str),
    /// A run of text without backslashes
    Text(&'a str),
    /// A backslash that does not open a math span
    Raw(&'a str),
}

/// Parse an inline math span: `\(` ... `\)` on a single line.
pub fn math_span(input: &str) -> IResult<&str, Segment> {
    map(
        recognize(delimited(
            tag(r"\("),
            verify(take_until(r"\)"), |s: &str| !s.is_empty() && !s.contains('\n')),
            tag(r"\)"),
        )),
        Segment::Math,
    )(input)
}

/// Parse a run of plain text.
pub fn text_run(input: &str) -> IResult<&str, Segment> {
    map(is_not("\\"), Segment::Text)(input)
}

fn raw_char(input: &str) -> IResult<&str, Segment> {
    map(recognize(anychar), Segment::Raw)(input)
}

/// Split localized text into segments.
pub fn segments(input: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut remaining = input;

    while !remaining.is_empty() {
        match alt((math_span, text_run, raw_char))(remaining) {
            Ok((rest, segment)) => {
                segments.push(segment);
                remaining = rest;
            }
            Err(_) => break,
        }
    }

    segments
}
