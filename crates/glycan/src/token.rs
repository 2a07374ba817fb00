use std::fmt::{self, Display, Formatter};

use nom::{combinator::all_consuming, Finish};
use tracing::trace;

use crate::{
    catalog::Catalog, errors::GlycanError, parser, Anomer, BranchSymbol, Linkage, Position, Result,
    Sugar, Token, TokenKind,
};

impl<'c> Token<'c> {
    /// Classifies a single user-supplied string as a sugar, a bond, or a branch symbol
    ///
    /// Bonds are accepted either wrapped in their parentheses, like `(a1-3)`, or bare, like `a1-3`, but are always
    /// normalised to the wrapped form. Only sugars and bonds present in the `catalog` are accepted.
    pub fn new(catalog: &'c Catalog, text: impl AsRef<str>) -> Result<Self> {
        let text = text.as_ref();

        let token = if let Some(sugar) = catalog.sugar(text) {
            Self::Sugar(sugar)
        } else if let Some(symbol) = BranchSymbol::from_text(text) {
            Self::Branch(symbol)
        } else {
            let descriptor = text
                .strip_prefix('(')
                .and_then(|t| t.strip_suffix(')'))
                .unwrap_or(text);
            let linkage = Linkage::from_descriptor(descriptor)
                .ok_or_else(|| GlycanError::unknown_token(text))?;
            if !catalog.contains_bond(&linkage) {
                return Err(GlycanError::unknown_linkage(linkage).into());
            }
            Self::Bond(linkage)
        };

        trace!(text, kind = %token.kind(), "classified token");
        Ok(token)
    }

    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        match self {
            Self::Sugar(_) => TokenKind::Sugar,
            Self::Bond(_) => TokenKind::Bond,
            Self::Branch(_) => TokenKind::Branch,
        }
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sugar(sugar) => write!(f, "{sugar}"),
            Self::Bond(linkage) => write!(f, "({linkage})"),
            Self::Branch(symbol) => write!(f, "{symbol}"),
        }
    }
}

// ---------------------------------------------------------------------------------------------------------------------

impl<'c> Sugar<'c> {
    #[must_use]
    pub const fn abbr(&self) -> &'c str {
        self.abbr
    }

    /// The SNFG class this sugar was listed under in its `Catalog`
    #[must_use]
    pub const fn class(&self) -> &'c str {
        self.class
    }
}

impl Display for Sugar<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbr)
    }
}

// ---------------------------------------------------------------------------------------------------------------------

impl Linkage {
    #[must_use]
    pub const fn new(anomer: Anomer, donor: Position, acceptor: Position) -> Self {
        Self {
            anomer,
            donor,
            acceptor,
        }
    }

    /// Parses a bare descriptor, like `b1-4`, without checking it against any `Catalog`
    #[must_use]
    pub fn from_descriptor(descriptor: &str) -> Option<Self> {
        all_consuming(parser::linkage_descriptor)(descriptor)
            .finish()
            .ok()
            .map(|(_, linkage)| linkage)
    }

    #[must_use]
    pub const fn anomer(&self) -> Anomer {
        self.anomer
    }

    #[must_use]
    pub const fn donor(&self) -> Position {
        self.donor
    }

    #[must_use]
    pub const fn acceptor(&self) -> Position {
        self.acceptor
    }
}

// NOTE: This is the bare descriptor, `Token::Bond` is responsible for wrapping it in parentheses
impl Display for Linkage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}-{}", self.anomer, self.donor, self.acceptor)
    }
}

impl Anomer {
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'a' => Some(Self::Alpha),
            'b' => Some(Self::Beta),
            _ => None,
        }
    }
}

impl Display for Anomer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Alpha => "a",
            Self::Beta => "b",
        })
    }
}

impl Position {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 9;

    #[must_use]
    pub const fn new(position: u8) -> Option<Self> {
        if Self::MIN <= position && position <= Self::MAX {
            Some(Self(position))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------------------------------------------------

impl BranchSymbol {
    pub const ALL: [Self; 4] = [
        Self::OpenParen,
        Self::CloseParen,
        Self::OpenBracket,
        Self::CloseBracket,
    ];

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '(' => Self::OpenParen,
            ')' => Self::CloseParen,
            '[' => Self::OpenBracket,
            ']' => Self::CloseBracket,
            _ => return None,
        })
    }

    // NOTE: Not `FromStr`, since a failed match isn't an error here: the text is just some other kind of token
    #[must_use]
    pub fn from_text(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::OpenParen => '(',
            Self::CloseParen => ')',
            Self::OpenBracket => '[',
            Self::CloseBracket => ']',
        }
    }

    #[must_use]
    pub const fn is_opening(self) -> bool {
        matches!(self, Self::OpenParen | Self::OpenBracket)
    }

    #[must_use]
    pub const fn is_closing(self) -> bool {
        !self.is_opening()
    }

    /// The symbol that closes (or opens) a branch started (or ended) by this one
    #[must_use]
    pub const fn partner(self) -> Self {
        match self {
            Self::OpenParen => Self::CloseParen,
            Self::CloseParen => Self::OpenParen,
            Self::OpenBracket => Self::CloseBracket,
            Self::CloseBracket => Self::OpenBracket,
        }
    }
}

impl Display for BranchSymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
