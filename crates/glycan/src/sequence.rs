use std::fmt::{self, Display, Formatter};

use tracing::debug;

use crate::{
    errors::{NestingError, NestingErrorKind},
    BranchSymbol, BuilderState, Rejection, Sequence, Token, TokenKind,
};

impl<'c> Sequence<'c> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token<'c>] {
        &self.tokens
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Token<'c>> {
        self.tokens.last()
    }

    #[must_use]
    pub const fn state(&self) -> BuilderState {
        self.state
    }

    #[must_use]
    pub const fn can_append(&self, kind: TokenKind) -> bool {
        self.state.accepts(kind)
    }

    /// Returns a new sequence with `token` added to the end, leaving this one untouched
    pub fn append(&self, token: Token<'c>) -> Result<Self, Rejection> {
        let state = self.state.transition(&token).inspect_err(|rejection| {
            debug!(%token, state = ?self.state, %rejection, "rejected token");
        })?;

        let mut tokens = self.tokens.clone();
        tokens.push(token);
        debug!(%token, length = tokens.len(), "appended token");

        Ok(Self { tokens, state })
    }

    /// Concatenates every token, in order, without any separators
    ///
    /// Brackets aren't checked here (see [`Sequence::bracket_report()`]), so unbalanced branches are written as-is.
    #[must_use]
    pub fn serialize(&self) -> String {
        self.to_string()
    }

    /// Checks that every branch is closed by the matching bracket
    ///
    /// This is purely advisory: appending never looks at bracket nesting.
    pub fn bracket_report(&self) -> Result<(), NestingError> {
        // NOTE: Each open branch is recorded as (symbol, token position, byte offset in the serialized sequence)
        let mut open_branches: Vec<(BranchSymbol, usize, usize)> = Vec::new();
        let mut offset = 0;

        let kind = 'report: {
            for (i, token) in self.tokens.iter().enumerate() {
                let position = i + 1;
                let width = token.to_string().len();

                if let Token::Branch(symbol) = *token {
                    if symbol.is_opening() {
                        open_branches.push((symbol, position, offset));
                    } else {
                        match open_branches.pop() {
                            None => {
                                break 'report NestingErrorKind::StrayClose {
                                    symbol,
                                    position,
                                    span: (offset, width).into(),
                                };
                            }
                            Some((open, open_position, open_offset)) if open.partner() != symbol => {
                                break 'report NestingErrorKind::Mismatched {
                                    open,
                                    open_position,
                                    open_span: (open_offset, 1).into(),
                                    close: symbol,
                                    close_position: position,
                                    close_span: (offset, width).into(),
                                };
                            }
                            Some(_) => (),
                        }
                    }
                }

                offset += width;
            }

            match open_branches.pop() {
                Some((symbol, position, offset)) => NestingErrorKind::Unclosed {
                    symbol,
                    position,
                    span: (offset, 1).into(),
                },
                None => return Ok(()),
            }
        };

        Err(NestingError::new(self.serialize(), kind))
    }
}

impl Display for Sequence<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "{token}")?;
        }
        Ok(())
    }
}
