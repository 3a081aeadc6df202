// SPDX-License-Identifier: MIT OR Apache-2.0

//! The pattern string mini-language.
//!
//! `id` is a point node, `id+mark` / `id-mark` an interval start/end, and
//! consecutive nodes are joined with `<` (strict precedence) or `=`
//! (simultaneity): `b+0<a<b-0` is interval `b` opening, point `a`, interval
//! `b` closing. Ids containing reserved characters are double-quoted.
//! Printing (the `Display` impl on [`HybridTemporalPattern`]) is canonical
//! and round-trips: `parse(print(p)) == p`.

use super::pattern::HybridTemporalPattern;
use crate::core::error::{HtpmError, HtpmResult};
use crate::core::event::{EventNode, IdInterner, OrderRelation, RESERVED_ID_CHARS};

/// Parse a pattern string into a validated pattern
pub fn parse_pattern(input: &str) -> HtpmResult<HybridTemporalPattern> {
    let mut scanner = Scanner { input, pos: 0 };
    let mut nodes = vec![scanner.parse_node()?];
    let mut relations = Vec::new();
    while !scanner.at_end() {
        relations.push(scanner.parse_relation()?);
        nodes.push(scanner.parse_node()?);
    }
    HybridTemporalPattern::new(nodes, relations)
}

struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn parse_relation(&mut self) -> HtpmResult<OrderRelation> {
        match self.bump() {
            Some('<') => Ok(OrderRelation::Smaller),
            Some('=') => Ok(OrderRelation::Equal),
            other => Err(HtpmError::pattern_parse(
                format!("expected relation '<' or '=', found {other:?}"),
                self.pos.saturating_sub(1),
            )),
        }
    }

    fn parse_node(&mut self) -> HtpmResult<EventNode> {
        let id = if self.peek() == Some('"') {
            self.parse_quoted_id()?
        } else {
            self.parse_bare_id()?
        };
        let symbol = IdInterner::global().intern(&id);

        match self.peek() {
            Some(sign @ ('+' | '-')) => {
                self.bump();
                let mark = self.parse_mark(sign)?;
                if sign == '+' {
                    Ok(EventNode::interval_start(symbol, mark))
                } else {
                    Ok(EventNode::interval_end(symbol, mark))
                }
            }
            _ => Ok(EventNode::point(symbol)),
        }
    }

    fn parse_bare_id(&mut self) -> HtpmResult<String> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if RESERVED_ID_CHARS.contains(&c) || c.is_whitespace() {
                break;
            }
            self.bump();
        }
        if self.pos == start {
            return Err(HtpmError::pattern_parse(
                format!("expected event id, found {:?}", self.peek()),
                start,
            ));
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_quoted_id(&mut self) -> HtpmResult<String> {
        let open = self.pos;
        self.bump(); // opening quote
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == '"' {
                let id = self.input[start..self.pos].to_string();
                self.bump(); // closing quote
                if id.is_empty() {
                    return Err(HtpmError::pattern_parse("empty quoted id", open));
                }
                return Ok(id);
            }
            self.bump();
        }
        Err(HtpmError::pattern_parse("unterminated quoted id", open))
    }

    fn parse_mark(&mut self, sign: char) -> HtpmResult<u32> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        if self.pos == start {
            return Err(HtpmError::pattern_parse(
                format!("expected occurrence mark after {sign:?}"),
                start,
            ));
        }
        self.input[start..self.pos]
            .parse::<u32>()
            .map_err(|e| HtpmError::pattern_parse(format!("invalid occurrence mark: {e}"), start))
    }
}
