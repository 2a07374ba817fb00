use tracing::debug;

use crate::{
    errors::{GlycanError, LoadError},
    parser, Catalog, Rejection, Result, Sequence, Submission, Token, TokenKind,
};

/// Builds up a glycan sequence one token at a time, refusing any token that breaks the sugar-bond grammar
///
/// The builder keeps the reason for the last rejected token around until the next successful append (or a
/// [`GlycanBuilder::clear()`]), so that it can be shown to the user alongside the current sequence.
#[derive(Clone, Debug)]
pub struct GlycanBuilder<'c> {
    catalog: &'c Catalog,
    sequence: Sequence<'c>,
    rejection: Option<Rejection>,
}

impl<'c> GlycanBuilder<'c> {
    #[must_use]
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            sequence: Sequence::new(),
            rejection: None,
        }
    }

    /// Rebuilds a sequence from its serialized form, replaying every token through the grammar
    pub fn load(catalog: &'c Catalog, text: impl AsRef<str>) -> Result<Self> {
        let text = text.as_ref();
        let mut builder = Self::new(catalog);

        for (token, span) in parser::parse_spanned(catalog, text)? {
            if let Err(rejection) = builder.append(token) {
                return Err(GlycanError::from(LoadError::new(text, span, rejection)).into());
            }
        }

        debug!(text, tokens = builder.sequence.len(), "loaded glycan sequence");
        Ok(builder)
    }

    #[must_use]
    pub const fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    /// Classifies `text` against the catalog, then appends it
    ///
    /// Text that isn't a known token is an error, but isn't a rejection, so any pending rejection is kept.
    pub fn add(&mut self, text: impl AsRef<str>) -> Result<()> {
        let token = Token::new(self.catalog, text)?;
        self.append(token).map_err(GlycanError::from)?;
        Ok(())
    }

    pub fn append(&mut self, token: Token<'c>) -> Result<(), Rejection> {
        match self.sequence.append(token) {
            Ok(sequence) => {
                self.sequence = sequence;
                self.rejection = None;
                Ok(())
            }
            Err(rejection) => {
                self.rejection = Some(rejection);
                Err(rejection)
            }
        }
    }

    pub fn clear(&mut self) {
        self.sequence = Sequence::new();
        self.rejection = None;
        debug!("cleared glycan sequence");
    }

    #[must_use]
    pub const fn can_add(&self, kind: TokenKind) -> bool {
        self.sequence.can_append(kind)
    }

    #[must_use]
    pub const fn sequence(&self) -> &Sequence<'c> {
        &self.sequence
    }

    /// Why the most recent token was refused, if it was
    #[must_use]
    pub const fn rejection(&self) -> Option<Rejection> {
        self.rejection
    }

    #[must_use]
    pub fn serialize(&self) -> String {
        self.sequence.serialize()
    }

    pub fn submission(&self) -> Result<Submission> {
        Submission::new(&self.sequence)
    }
}
