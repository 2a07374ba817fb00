// Standard Library Imports
use std::{collections::hash_map::Entry, fmt};

// External Crate Imports
use ahash::{HashMap, HashMapExt, HashSet};
use knuffel::{
    span::{Span, Spanned},
    Decode,
};
use miette::{Diagnostic, LabeledSpan, NamedSource, Result};
use thiserror::Error;
use tracing::debug;

// Local Crate Imports
use crate::{Anomer, Linkage, Position, Sugar};

/// The catalog bundled with this crate, listing the SNFG monosaccharides and common glycosidic linkages
pub const DEFAULT_KDL: &str = include_str!("../data/glycan_catalog.kdl");

// Public API ==========================================================================================================

/// Every sugar and bond a `GlycanBuilder` is allowed to add to a sequence
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Catalog {
    sugars: Vec<SugarDescription>,
    sugar_index: HashMap<String, usize>,
    bonds: Vec<Linkage>,
    bond_index: HashSet<Linkage>,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct SugarDescription {
    pub abbr: String,
    pub class: String,
}

impl Catalog {
    pub fn new(file_name: impl AsRef<str>, kdl_text: impl AsRef<str>) -> Result<Self> {
        let parsed_catalog: CatalogKdl = knuffel::parse(file_name.as_ref(), kdl_text.as_ref())?;
        let catalog = parsed_catalog
            .validate()
            .map_err(|e| e.finalize(file_name.as_ref(), kdl_text))?;

        debug!(
            file_name = file_name.as_ref(),
            sugars = catalog.sugars.len(),
            bonds = catalog.bonds.len(),
            "loaded glycan catalog"
        );
        Ok(catalog)
    }

    #[must_use]
    pub fn sugar(&self, abbr: &str) -> Option<Sugar<'_>> {
        self.sugar_index
            .get(abbr)
            .map(|&i| Sugar::from(&self.sugars[i]))
    }

    /// All sugars, in the order they were listed in the catalog file
    pub fn sugars(&self) -> impl Iterator<Item = Sugar<'_>> {
        self.sugars.iter().map(Sugar::from)
    }

    #[must_use]
    pub fn contains_bond(&self, linkage: &Linkage) -> bool {
        self.bond_index.contains(linkage)
    }

    /// All bonds, in the order they were listed in the catalog file
    #[must_use]
    pub fn bonds(&self) -> &[Linkage] {
        &self.bonds
    }
}

impl Default for Catalog {
    fn default() -> Self {
        // SAFETY: The bundled catalog is checked by the `build_default_catalog` test below, so `.unwrap()` is safe
        Self::new("glycan_catalog.kdl", DEFAULT_KDL).unwrap()
    }
}

impl<'c> From<&'c SugarDescription> for Sugar<'c> {
    fn from(value: &'c SugarDescription) -> Self {
        Self {
            abbr: &value.abbr,
            class: &value.class,
        }
    }
}

// KDL File Schema =====================================================================================================

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct CatalogKdl {
    #[knuffel(child, unwrap(children))]
    sugars: Vec<SugarClassKdl>,
    #[knuffel(child, unwrap(children))]
    bonds: Vec<DonorKdl>,
}

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct SugarClassKdl {
    #[knuffel(node_name)]
    class: String,
    #[knuffel(arguments)]
    sugars: Vec<Spanned<String, Span>>,
}

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct DonorKdl {
    #[knuffel(span)]
    span: Span,
    #[knuffel(node_name)]
    donor: String,
    #[knuffel(arguments)]
    acceptors: Vec<Spanned<u8, Span>>,
}

// Catalog Validation ==================================================================================================

type CatalogResult<T> = Result<T, CatalogErrorKind>;

impl CatalogKdl {
    fn validate(self) -> CatalogResult<Catalog> {
        let (sugars, sugar_index) = Self::validate_sugars(self.sugars)?;
        let (bonds, bond_index) = Self::validate_bonds(self.bonds)?;
        Ok(Catalog {
            sugars,
            sugar_index,
            bonds,
            bond_index,
        })
    }

    fn validate_sugars(
        classes: Vec<SugarClassKdl>,
    ) -> CatalogResult<(Vec<SugarDescription>, HashMap<String, usize>)> {
        let mut sugars = Vec::new();
        let mut seen_sugars: HashMap<String, (usize, Span)> = HashMap::new();

        for SugarClassKdl { class, sugars: abbrs } in classes {
            for abbr in abbrs {
                let span = abbr.span().clone();
                let abbr = String::clone(&abbr);

                // NOTE: Sugars are read back out of serialized sequences as runs of ASCII letters and digits, so any
                // other character would make them impossible to parse again
                if abbr.is_empty() || !abbr.chars().all(|c| c.is_ascii_alphanumeric()) {
                    return Err(CatalogErrorKind::InvalidSugar(span, abbr));
                }
                // NOTE: After a `(`, an anomer and a digit always start a bond, so a sugar can't begin that way
                if looks_like_linkage(&abbr) {
                    return Err(CatalogErrorKind::LinkageLikeSugar(span, abbr));
                }

                match seen_sugars.entry(abbr) {
                    Entry::Occupied(e) => {
                        let (abbr, (_, first_defined_at)) = e.remove_entry();
                        return Err(CatalogErrorKind::DuplicateSugar(first_defined_at, span, abbr));
                    }
                    Entry::Vacant(e) => {
                        sugars.push(SugarDescription {
                            abbr: e.key().clone(),
                            class: class.clone(),
                        });
                        e.insert((sugars.len() - 1, span));
                    }
                }
            }
        }

        let sugar_index = seen_sugars.into_iter().map(|(k, (i, _))| (k, i)).collect();
        Ok((sugars, sugar_index))
    }

    fn validate_bonds(donors: Vec<DonorKdl>) -> CatalogResult<(Vec<Linkage>, HashSet<Linkage>)> {
        let mut bonds = Vec::new();
        let mut seen_bonds: HashMap<Linkage, Span> = HashMap::new();

        for DonorKdl {
            span,
            donor,
            acceptors,
        } in donors
        {
            let (anomer, donor) =
                parse_donor(&donor).ok_or(CatalogErrorKind::InvalidDonor(span, donor))?;

            for acceptor in acceptors {
                let acceptor_span = acceptor.span().clone();
                let acceptor = Position::new(*acceptor)
                    .ok_or_else(|| {
                    CatalogErrorKind::InvalidPosition(acceptor_span.clone(), *acceptor)
                })?;
                let linkage = Linkage::new(anomer, donor, acceptor);

                match seen_bonds.entry(linkage) {
                    Entry::Occupied(e) => {
                        return Err(CatalogErrorKind::DuplicateBond(
                            e.get().clone(),
                            acceptor_span,
                            linkage.to_string(),
                        ));
                    }
                    Entry::Vacant(e) => {
                        e.insert(acceptor_span);
                        bonds.push(linkage);
                    }
                }
            }
        }

        let bond_index = seen_bonds.into_keys().collect();
        Ok((bonds, bond_index))
    }
}

fn looks_like_linkage(abbr: &str) -> bool {
    let mut chars = abbr.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(anomer), Some(position)) if Anomer::from_char(anomer).is_some() && matches!(position, '1'..='9')
    )
}

/// Donor = Anomer , Position ;
fn parse_donor(donor: &str) -> Option<(Anomer, Position)> {
    let mut chars = donor.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(anomer), Some(position), None) => {
            let anomer = Anomer::from_char(anomer)?;
            // NOTE: `to_digit()` is always < 10, so the cast can't truncate
            let position = Position::new(position.to_digit(10)? as u8)?;
            Some((anomer, position))
        }
        _ => None,
    }
}

// Validation Error Types and Trait Implementations  ===================================================================

#[derive(Debug, Error)]
#[error("failed to validate glycan catalog file")]
struct CatalogError {
    kdl: NamedSource,
    #[source]
    kind: CatalogErrorKind,
}

// NOTE: This is manually implemented because the list of labels is dynamic and needs to be extracted from `self.kind`
impl Diagnostic for CatalogError {
    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.kdl)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.kind.help()
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(self.kind.labels().into_iter().map(|(s, l)| {
            LabeledSpan::new_with_span(Some(l.to_owned()), s.clone())
        })))
    }
}

#[derive(Clone, Debug, Diagnostic, Error)]
enum CatalogErrorKind {
    #[error("the sugar {2:?} has already been defined")]
    #[diagnostic(help("remove the duplicate, or double-check the name for typos"))]
    DuplicateSugar(Span, Span, String),

    #[error("the sugar name {1:?} is invalid")]
    #[diagnostic(help("sugar names must be non-empty and contain only ASCII letters and digits"))]
    InvalidSugar(Span, String),

    #[error("the sugar name {1:?} starts like a linkage")]
    #[diagnostic(help(
        "sugar names can't begin with an anomer (a or b) followed by a position from 1 to 9"
    ))]
    LinkageLikeSugar(Span, String),

    #[error("the linkage {2} has already been defined")]
    #[diagnostic(help("remove the duplicate acceptor position"))]
    DuplicateBond(Span, Span, String),

    #[error("expected a linkage donor like a1 or b2, got {1:?}")]
    #[diagnostic(help(
        "donors are an anomeric configuration (a or b) followed by a single position from 1 to 9"
    ))]
    InvalidDonor(Span, String),

    #[error("the acceptor position {1} is out of range")]
    #[diagnostic(help("linkage positions must be between 1 and 9"))]
    InvalidPosition(Span, u8),
}

impl CatalogErrorKind {
    fn labels(&self) -> Vec<(&Span, &'static str)> {
        match self {
            Self::DuplicateSugar(s1, s2, _) | Self::DuplicateBond(s1, s2, _) => {
                vec![(s1, "first defined here"), (s2, "then again here")]
            }
            Self::InvalidSugar(s, _) | Self::LinkageLikeSugar(s, _) => {
                vec![(s, "invalid sugar name")]
            }
            Self::InvalidDonor(s, _) => vec![(s, "invalid donor")],
            Self::InvalidPosition(s, _) => vec![(s, "expected 1-9")],
        }
    }

    fn finalize(self, file_name: impl AsRef<str>, kdl: impl AsRef<str>) -> CatalogError {
        let kdl = NamedSource::new(file_name, kdl.as_ref().to_owned());
        CatalogError { kdl, kind: self }
    }
}

// Module Tests ========================================================================================================
