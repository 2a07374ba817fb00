use tracing::trace;

use crate::{BuilderState, Rejection, Token, TokenKind};

impl BuilderState {
    /// Whether a token of `kind` may be appended in this state
    ///
    /// Branch symbols are always accepted; sugars and bonds have to alternate, though a closed branch can be
    /// followed by either.
    #[must_use]
    pub const fn accepts(self, kind: TokenKind) -> bool {
        match kind {
            TokenKind::Sugar => !matches!(self, Self::AfterSugar),
            TokenKind::Bond => matches!(self, Self::AfterSugar | Self::AfterBranchEnd),
            TokenKind::Branch => true,
        }
    }

    /// The state after appending `token`, or why it can't be appended
    pub fn transition(self, token: &Token) -> Result<Self, Rejection> {
        let kind = token.kind();
        if !self.accepts(kind) {
            return Err(match kind {
                TokenKind::Sugar => Rejection::SugarOutOfTurn,
                // NOTE: Branch symbols are always accepted, so only a bond can end up here
                TokenKind::Bond | TokenKind::Branch => Rejection::BondOutOfTurn,
            });
        }

        let next = Self::after(token);
        trace!(from = ?self, to = ?next, %token, "builder state transition");
        Ok(next)
    }

    /// The state that a sequence ending with `last` must be in
    #[must_use]
    pub fn from_last(last: Option<&Token>) -> Self {
        last.map_or(Self::Empty, Self::after)
    }

    fn after(token: &Token) -> Self {
        match token {
            Token::Sugar(_) => Self::AfterSugar,
            Token::Bond(_) => Self::AfterLinkage,
            Token::Branch(symbol) if symbol.is_opening() => Self::AfterLinkage,
            Token::Branch(_) => Self::AfterBranchEnd,
        }
    }
}
