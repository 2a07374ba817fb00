use std::fmt;

use miette::{Diagnostic, LabeledSpan, SourceSpan};
use thiserror::Error;

use crate::{parser::errors::SequenceError, BranchSymbol, Linkage};

pub type Result<T, E = Box<GlycanError>> = std::result::Result<T, E>;

// FIXME: Check all of the errors returned from public API are wrapped in this!
#[derive(Clone, Eq, PartialEq, Debug, Diagnostic, Error)]
pub enum GlycanError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Rejected {
        #[from]
        rejection: Rejection,
    },

    #[diagnostic(help(
        "tokens are sugar names (like Glc), bonds (like (b1-4)), or one of the branch symbols ( ) [ ]"
    ))]
    #[error("the token {token:?} is not a known sugar, linkage, or branch symbol")]
    UnknownToken { token: String },

    #[diagnostic(help("only the linkages listed in the bonds section of the catalog can be used"))]
    #[error("the linkage {linkage} could not be found in the bond catalog")]
    UnknownLinkage { linkage: String },

    #[error("please build a glycan sequence first")]
    EmptySubmission,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse {
        #[from]
        error: SequenceError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Load {
        #[from]
        error: LoadError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Nesting {
        #[from]
        error: NestingError,
    },

    // NOTE: Whatever a collaborating service reports is shown to the user as-is
    #[error("{message}")]
    Collaborator { message: String },
}

impl GlycanError {
    pub(crate) fn unknown_token(token: &str) -> Self {
        let token = token.to_owned();

        Self::UnknownToken { token }
    }

    pub(crate) fn unknown_linkage(linkage: Linkage) -> Self {
        let linkage = format!("({linkage})");

        Self::UnknownLinkage { linkage }
    }
}

// ---------------------------------------------------------------------------------------------------------------------

/// Why the sugar-bond grammar refused to append a token
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Diagnostic, Error)]
pub enum Rejection {
    #[diagnostic(help(
        "link the last sugar with a bond, like (b1-4), or open a branch before adding another sugar"
    ))]
    #[error("a bond must precede another sugar")]
    SugarOutOfTurn,

    #[diagnostic(help(
        "add a sugar (or close a branch) before adding another bond; sequences can't start with a bond"
    ))]
    #[error("a sugar must precede another bond")]
    BondOutOfTurn,
}

impl Rejection {
    pub(crate) const fn label(self) -> &'static str {
        match self {
            Self::SugarOutOfTurn => "expected a bond before this sugar",
            Self::BondOutOfTurn => "expected a sugar before this bond",
        }
    }
}

// ---------------------------------------------------------------------------------------------------------------------

/// A serialized sequence whose tokens were all recognised, but that breaks the sugar-bond grammar
#[derive(Clone, Eq, PartialEq, Debug, Error)]
#[error("failed to load glycan sequence")]
pub struct LoadError {
    sequence: String,
    span: SourceSpan,
    #[source]
    rejection: Rejection,
}

impl LoadError {
    pub(crate) fn new(sequence: &str, span: impl Into<SourceSpan>, rejection: Rejection) -> Self {
        Self {
            sequence: sequence.to_owned(),
            span: span.into(),
            rejection,
        }
    }

    #[must_use]
    pub const fn rejection(&self) -> Rejection {
        self.rejection
    }

    #[must_use]
    pub const fn span(&self) -> SourceSpan {
        self.span
    }
}

impl Diagnostic for LoadError {
    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.sequence)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.rejection.help()
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::new_with_span(Some(self.rejection.label().to_owned()), self.span);
        Some(Box::new(std::iter::once(label)))
    }
}

// ---------------------------------------------------------------------------------------------------------------------

/// Reported by `Sequence::bracket_report()` when branches aren't properly nested
///
/// Appending never checks this, so this is advice for the user rather than a grammar violation.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
#[error("the branches of this glycan sequence are not properly nested")]
pub struct NestingError {
    sequence: String,
    #[source]
    kind: NestingErrorKind,
}

// NOTE: Token positions are counted from 1, since they're shown to users
#[derive(Clone, Eq, PartialEq, Debug, Diagnostic, Error)]
pub enum NestingErrorKind {
    #[diagnostic(help("remove the stray bracket, or open a branch before it"))]
    #[error("the closing '{symbol}' at token {position} has no matching opening bracket")]
    StrayClose {
        symbol: BranchSymbol,
        position: usize,
        span: SourceSpan,
    },

    #[diagnostic(help("'(' must be closed by ')' and '[' by ']'"))]
    #[error(
        "the '{open}' opened at token {open_position} is closed by a mismatched '{close}' at token {close_position}"
    )]
    Mismatched {
        open: BranchSymbol,
        open_position: usize,
        open_span: SourceSpan,
        close: BranchSymbol,
        close_position: usize,
        close_span: SourceSpan,
    },

    #[diagnostic(help("close the branch with a matching ')' or ']'"))]
    #[error("the '{symbol}' opened at token {position} is never closed")]
    Unclosed {
        symbol: BranchSymbol,
        position: usize,
        span: SourceSpan,
    },
}

impl NestingError {
    pub(crate) fn new(sequence: String, kind: NestingErrorKind) -> Self {
        Self { sequence, kind }
    }

    #[must_use]
    pub const fn kind(&self) -> &NestingErrorKind {
        &self.kind
    }
}

impl Diagnostic for NestingError {
    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.sequence)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.kind.help()
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(self.kind.labels().into_iter().map(|(s, l)| {
            LabeledSpan::new_with_span(Some(l.to_owned()), *s)
        })))
    }
}

impl NestingErrorKind {
    fn labels(&self) -> Vec<(&SourceSpan, &'static str)> {
        match self {
            Self::StrayClose { span, .. } => vec![(span, "nothing to close")],
            Self::Mismatched {
                open_span,
                close_span,
                ..
            } => vec![(open_span, "opened here"), (close_span, "closed here")],
            Self::Unclosed { span, .. } => vec![(span, "never closed")],
        }
    }
}
