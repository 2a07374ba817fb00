//! A grammar-checked builder for glycan sequences written in IUPAC-condensed notation

pub mod builder;
pub mod catalog;
pub mod errors;
pub mod parser;
pub mod sequence;
pub mod state;
pub mod submission;
pub mod token;

#[cfg(test)]
mod testing_tools;

// External Crate Imports
use derive_more::{Display, IsVariant};

// FIXME: Work on what's publicly exported / part of the API! Maybe create a prelude?
pub use builder::GlycanBuilder;
pub use catalog::Catalog;
pub use errors::{GlycanError, LoadError, NestingError, NestingErrorKind, Rejection, Result};
pub use parser::errors::{SequenceError, SequenceErrorKind};
pub use submission::{Reply, Submission};

// NOTE: For the types in this module, 'c lifetimes indicate references to the `Catalog` that the sugar names and
// classes were looked up in

#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Sequence<'c> {
    tokens: Vec<Token<'c>>,
    state: BuilderState,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, IsVariant)]
pub enum Token<'c> {
    Sugar(Sugar<'c>),
    Bond(Linkage),
    Branch(BranchSymbol),
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, IsVariant)]
pub enum TokenKind {
    #[display("sugar")]
    Sugar,
    #[display("bond")]
    Bond,
    #[display("branch symbol")]
    Branch,
}

// ---------------------------------------------------------------------------------------------------------------------

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Sugar<'c> {
    abbr: &'c str,
    class: &'c str,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Linkage {
    anomer: Anomer,
    donor: Position,
    acceptor: Position,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, IsVariant)]
pub enum Anomer {
    Alpha,
    Beta,
}

// NOTE: Always a single digit from 1 to 9, so construct with `Position::new()`
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Position(u8);

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, IsVariant)]
pub enum BranchSymbol {
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
}

// ---------------------------------------------------------------------------------------------------------------------

/// Which tokens the next append may legally add, decided entirely by the last token in a `Sequence`
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, IsVariant)]
pub enum BuilderState {
    /// Nothing has been added yet: only a sugar (or a branch symbol) may start the sequence
    #[default]
    Empty,
    /// Last token was a sugar: it must be linked by a bond before another sugar can follow
    AfterSugar,
    /// Last token was a bond or an opening bracket: a sugar must come next
    AfterLinkage,
    /// Last token was a closing bracket: either the branch point's sugar or its bond may follow
    AfterBranchEnd,
}
