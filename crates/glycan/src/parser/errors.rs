use std::fmt;

use miette::{Diagnostic, LabeledSpan, SourceSpan};
use nom::{
    combinator::{all_consuming, complete, consumed},
    error::{ErrorKind, ParseError as NomParseError},
    Err, Finish, IResult, Offset, Parser,
};
use thiserror::Error;

pub(crate) type ParseResult<'a, O> = IResult<&'a str, O, ParseError<'a>>;

/// A serialized glycan sequence that couldn't be read back into tokens
#[derive(Clone, Eq, PartialEq, Debug, Error)]
#[error("{kind}")]
pub struct SequenceError {
    full_input: String,
    span: SourceSpan,
    kind: SequenceErrorKind,
}

impl SequenceError {
    #[must_use]
    pub const fn kind(&self) -> &SequenceErrorKind {
        &self.kind
    }

    #[must_use]
    pub const fn span(&self) -> SourceSpan {
        self.span
    }
}

impl Diagnostic for SequenceError {
    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.full_input)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.kind.help()
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::new_with_span(Some(self.kind.label().to_owned()), self.span);
        Some(Box::new(std::iter::once(label)))
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Diagnostic, Error)]
pub enum SequenceErrorKind {
    #[diagnostic(help(
        "each token must be a sugar from the catalog, a bond like (b1-4), or a branch symbol"
    ))]
    #[error("expected a sugar, a bond, or a branch symbol")]
    ExpectedToken,

    #[error("expected an anomeric configuration, 'a' or 'b'")]
    ExpectedAnomer,

    #[error("expected a linkage position, a digit from 1 to 9")]
    ExpectedPosition,

    #[error("expected '-' between the donor and acceptor positions")]
    ExpectedDash,

    #[diagnostic(help("bonds are written like (a1-3), with a single digit on either side of the '-'"))]
    #[error("expected ')' to close the bond")]
    ExpectedLinkageEnd,

    #[diagnostic(help("sugar names are case-sensitive, so double-check for typos"))]
    #[error("the sugar {0:?} could not be found in the catalog")]
    UnknownSugar(String),

    #[diagnostic(help("only the linkages listed in the bonds section of the catalog can be used"))]
    #[error("the linkage {0} could not be found in the bond catalog")]
    UnknownLinkage(String),

    #[diagnostic(help(
        "this is an internal error that you shouldn't ever see! If you have gotten this error, \
        then please report it as a bug!"
    ))]
    #[error("internal `nom` error: {0:?}")]
    NomError(ErrorKind),
}

impl SequenceErrorKind {
    const fn label(&self) -> &'static str {
        match self {
            Self::ExpectedToken => "unexpected character",
            Self::ExpectedAnomer => "expected 'a' or 'b'",
            Self::ExpectedPosition => "expected 1-9",
            Self::ExpectedDash => "expected '-'",
            Self::ExpectedLinkageEnd => "expected ')'",
            Self::UnknownSugar(_) => "unknown sugar",
            Self::UnknownLinkage(_) => "unknown linkage",
            Self::NomError(_) => "the region that triggered this bug!",
        }
    }
}

impl From<ErrorKind> for SequenceErrorKind {
    fn from(value: ErrorKind) -> Self {
        match value {
            ErrorKind::Eof => Self::ExpectedToken,
            kind => Self::NomError(kind),
        }
    }
}

// ---------------------------------------------------------------------------------------------------------------------

#[derive(Clone, Eq, PartialEq, Debug)]
pub(crate) struct ParseError<'a> {
    input: &'a str,
    length: usize,
    kind: SequenceErrorKind,
}

impl<'a> ParseError<'a> {
    pub(crate) const fn new(input: &'a str, kind: SequenceErrorKind) -> Self {
        Self {
            input,
            length: 0,
            kind,
        }
    }

    pub(crate) fn with_length(self, length: usize) -> Self {
        Self { length, ..self }
    }

    fn into_final_error(self, full_input: &str) -> SequenceError {
        let start = full_input.offset(self.input);
        SequenceError {
            // NOTE: The additional space is added so that Diagnostic labels can point to the end of an input
            full_input: format!("{full_input} "),
            span: (start, self.length).into(),
            kind: self.kind,
        }
    }
}

impl<'a> NomParseError<&'a str> for ParseError<'a> {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        Self::new(input, kind.into())
    }

    fn append(_input: &str, _kind: ErrorKind, other: Self) -> Self {
        other
    }

    // NOTE: Keeps whichever alternative made it furthest into the input, preferring the later one on a tie
    fn or(self, other: Self) -> Self {
        if self.input.len() < other.input.len() {
            self
        } else {
            other
        }
    }
}

// ---------------------------------------------------------------------------------------------------------------------

pub(crate) fn final_parser<'a, O, P>(parser: P) -> impl FnMut(&'a str) -> Result<O, SequenceError>
where
    P: Parser<&'a str, O, ParseError<'a>>,
{
    let mut parser = all_consuming(complete(parser));
    move |input| {
        parser(input)
            .finish()
            .map(|(_, o)| o)
            .map_err(|e| e.into_final_error(input))
    }
}

/// Runs `parser`, then checks its output with `f`; a rejected output is fatal and labels everything `parser` consumed
pub(crate) fn map_res<'a, O1, O2, P, F>(
    mut parser: P,
    mut f: F,
) -> impl FnMut(&'a str) -> ParseResult<'a, O2>
where
    P: Parser<&'a str, O1, ParseError<'a>>,
    F: FnMut(O1) -> Result<O2, SequenceErrorKind>,
{
    move |input| {
        let (rest, (consumed, o1)) = consumed(|i| parser.parse(i))(input)?;
        f(o1).map(|o2| (rest, o2)).map_err(|kind| {
            Err::Failure(ParseError::new(input, kind).with_length(consumed.len()))
        })
    }
}

/// Replaces any recoverable error from `parser` with one of `kind`, leaving failures untouched
pub(crate) fn expect<'a, O, P>(
    mut parser: P,
    kind: SequenceErrorKind,
) -> impl FnMut(&'a str) -> ParseResult<'a, O>
where
    P: Parser<&'a str, O, ParseError<'a>>,
{
    move |i| {
        parser.parse(i).map_err(|e| match e {
            Err::Error(_) => Err::Error(ParseError::new(i, kind.clone())),
            e => e,
        })
    }
}
