//! Random-access lookups over a program's ordered token stream.

use crate::types::{Span, Token};

/// A read-only view over a token slice, anchored by node spans.
///
/// The program owns the tokens; the store borrows them. Anchoring uses
/// binary search on token start offsets; the predicate forms then scan
/// outward sequentially until the predicate is satisfied.
#[derive(Debug, Clone, Copy)]
pub struct TokenStore<'a> {
    tokens: &'a [Token],
}

impl<'a> TokenStore<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens }
    }

    /// All tokens in source order.
    pub fn tokens(&self) -> &'a [Token] {
        self.tokens
    }

    /// Index of the first token starting at or after `offset`.
    fn lower_bound(&self, offset: usize) -> usize {
        self.tokens.partition_point(|t| t.span.start < offset)
    }

    /// The first token within `span`.
    pub fn first_token(&self, span: Span) -> Option<&'a Token> {
        let i = self.lower_bound(span.start);
        self.tokens.get(i).filter(|t| t.span.end <= span.end)
    }

    /// The first token within `span` satisfying `pred`.
    pub fn first_token_matching(
        &self,
        span: Span,
        pred: impl Fn(&Token) -> bool,
    ) -> Option<&'a Token> {
        let i = self.lower_bound(span.start);
        self.tokens[i..]
            .iter()
            .take_while(|t| t.span.end <= span.end)
            .find(|t| pred(t))
    }

    /// The last token within `span`.
    pub fn last_token(&self, span: Span) -> Option<&'a Token> {
        let i = self.lower_bound(span.end);
        self.tokens[..i].last().filter(|t| t.span.start >= span.start)
    }

    /// The last token within `span` satisfying `pred`.
    pub fn last_token_matching(
        &self,
        span: Span,
        pred: impl Fn(&Token) -> bool,
    ) -> Option<&'a Token> {
        let i = self.lower_bound(span.end);
        self.tokens[..i]
            .iter()
            .rev()
            .take_while(|t| t.span.start >= span.start)
            .find(|t| pred(t))
    }

    /// The nearest token before `span` satisfying `pred`.
    pub fn token_before(&self, span: Span, pred: impl Fn(&Token) -> bool) -> Option<&'a Token> {
        let i = self.lower_bound(span.start);
        self.tokens[..i].iter().rev().find(|t| pred(t))
    }

    /// The nearest token after `span` satisfying `pred`.
    pub fn token_after(&self, span: Span, pred: impl Fn(&Token) -> bool) -> Option<&'a Token> {
        let i = self.lower_bound(span.end);
        self.tokens[i..].iter().find(|t| pred(t))
    }
}
