//! Reads serialized glycan sequences, like `Gal(b1-4)[Fuc(a1-3)]GlcNAc`, back into their tokens

pub mod errors;

use miette::SourceSpan;
use nom::{
    branch::alt,
    character::complete::{alphanumeric1, anychar, char, one_of, satisfy},
    combinator::{consumed, cut, map, map_opt, peek},
    multi::many0,
    sequence::{delimited, pair, terminated, tuple},
    Err, Offset,
};
use tracing::trace;

use crate::{
    errors::GlycanError, Anomer, BranchSymbol, Catalog, Linkage, Position, Result, Sugar, Token,
};

use self::errors::{expect, final_parser, map_res, ParseError, ParseResult, SequenceErrorKind};

/// Splits a serialized sequence into its tokens, without checking the sugar-bond grammar
///
/// At every position, a bond is tried first, then a branch symbol, and finally a sugar; so `(` is only read as a
/// branch when it isn't followed by an anomer and a linkage position.
pub fn parse<'c>(catalog: &'c Catalog, text: impl AsRef<str>) -> Result<Vec<Token<'c>>> {
    let tokens = parse_spanned(catalog, text.as_ref())?;
    Ok(tokens.into_iter().map(|(token, _)| token).collect())
}

pub(crate) fn parse_spanned<'c>(
    catalog: &'c Catalog,
    text: &str,
) -> Result<Vec<(Token<'c>, SourceSpan)>> {
    let tokens = final_parser(sequence(catalog))(text).map_err(GlycanError::from)?;
    trace!(text, tokens = tokens.len(), "tokenized glycan sequence");

    Ok(tokens
        .into_iter()
        .map(|(consumed, token)| (token, (text.offset(consumed), consumed.len()).into()))
        .collect())
}

// FIXME: Paste all of these EBNF comments into another file and make sure they are valid!
/// Sequence = { Token } ;
fn sequence<'c, 's>(
    catalog: &'c Catalog,
) -> impl FnMut(&'s str) -> ParseResult<'s, Vec<(&'s str, Token<'c>)>> {
    terminated(many0(consumed(token(catalog))), end_of_sequence)
}

/// Token = Bond | Branch Symbol | Sugar ;
fn token<'c, 's>(catalog: &'c Catalog) -> impl FnMut(&'s str) -> ParseResult<'s, Token<'c>> {
    alt((
        map(bond(catalog), Token::Bond),
        map(branch_symbol, Token::Branch),
        map(sugar(catalog), Token::Sugar),
    ))
}

// =

/// Bond = "(" , Linkage Descriptor , ")" ;
fn bond<'c, 's>(catalog: &'c Catalog) -> impl FnMut(&'s str) -> ParseResult<'s, Linkage> {
    // NOTE: Once a `(` is followed by an anomer and a digit, this can't be a branch, so any later error is fatal
    let opening = pair(char('('), peek(pair(anomer, position)));
    let parser = delimited(
        opening,
        cut(linkage_descriptor),
        cut(expect(char(')'), SequenceErrorKind::ExpectedLinkageEnd)),
    );
    map_res(parser, |linkage| {
        if catalog.contains_bond(&linkage) {
            Ok(linkage)
        } else {
            Err(SequenceErrorKind::UnknownLinkage(format!("({linkage})")))
        }
    })
}

/// Branch Symbol = "(" | ")" | "[" | "]" ;
fn branch_symbol(i: &str) -> ParseResult<'_, BranchSymbol> {
    map_opt(one_of("()[]"), BranchSymbol::from_char)(i)
}

/// Sugar = { letter | digit }- ;
fn sugar<'c, 's>(catalog: &'c Catalog) -> impl FnMut(&'s str) -> ParseResult<'s, Sugar<'c>> {
    map_res(alphanumeric1, |abbr: &str| {
        catalog
            .sugar(abbr)
            .ok_or_else(|| SequenceErrorKind::UnknownSugar(abbr.to_owned()))
    })
}

// =

/// Linkage Descriptor = Anomer , Position , "-" , Position ;
pub(crate) fn linkage_descriptor(i: &str) -> ParseResult<'_, Linkage> {
    let parser = tuple((
        expect(anomer, SequenceErrorKind::ExpectedAnomer),
        expect(position, SequenceErrorKind::ExpectedPosition),
        expect(char('-'), SequenceErrorKind::ExpectedDash),
        expect(position, SequenceErrorKind::ExpectedPosition),
    ));
    map(parser, |(anomer, donor, _, acceptor)| {
        Linkage::new(anomer, donor, acceptor)
    })(i)
}

/// Anomer = "a" | "b" ;
fn anomer(i: &str) -> ParseResult<'_, Anomer> {
    map_opt(one_of("ab"), Anomer::from_char)(i)
}

/// Position = digit - "0" ;
fn position(i: &str) -> ParseResult<'_, Position> {
    let digit = satisfy(|c| c.is_ascii_digit());
    // NOTE: `to_digit()` is always < 10, so the cast can't truncate
    map_opt(digit, |c| Position::new(c.to_digit(10)? as u8))(i)
}

// =

fn end_of_sequence(i: &str) -> ParseResult<'_, ()> {
    if i.is_empty() {
        return Ok((i, ()));
    }
    // NOTE: Labels the whole offending character, not just the point before it
    let (_, c) = peek(anychar)(i)?;
    Err(Err::Error(
        ParseError::new(i, SequenceErrorKind::ExpectedToken).with_length(c.len_utf8()),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use insta::assert_debug_snapshot;

    use crate::TokenKind;

    use super::*;

    static CATALOG: LazyLock<Catalog> = LazyLock::new(Catalog::default);

    fn kinds(text: &str) -> Vec<TokenKind> {
        parse(&CATALOG, text)
            .unwrap()
            .iter()
            .map(Token::kind)
            .collect()
    }

    fn reserialize(text: &str) -> String {
        parse(&CATALOG, text)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn error_kind(text: &str) -> SequenceErrorKind {
        match *parse(&CATALOG, text).unwrap_err() {
            GlycanError::Parse { error } => error.kind().clone(),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    fn error_span(text: &str) -> (usize, usize) {
        match *parse(&CATALOG, text).unwrap_err() {
            GlycanError::Parse { error } => (error.span().offset(), error.span().len()),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_anomer() {
        assert_eq!(anomer("a"), Ok(("", Anomer::Alpha)));
        assert_eq!(anomer("b1"), Ok(("1", Anomer::Beta)));
        assert!(anomer("c").is_err());
        assert!(anomer("A").is_err());
        assert!(anomer("").is_err());
    }

    #[test]
    fn test_position() {
        for (input, digit) in [("1", 1), ("5-", 5), ("9)", 9)] {
            let (_, position) = position(input).unwrap();
            assert_eq!(position.get(), digit);
        }
        assert!(position("0").is_err());
        assert!(position("a").is_err());
        assert!(position("").is_err());
        // Only ever a single digit
        assert_eq!(position("12").map(|(r, p)| (r, p.get())), Ok(("2", 1)));
    }

    #[test]
    fn test_linkage_descriptor() {
        macro_rules! assert_linkage {
            ($input:literal, $output:literal, $linkage:literal) => {
                let (rest, linkage) = linkage_descriptor($input).unwrap();
                assert_eq!(rest, $output);
                assert_eq!(linkage.to_string(), $linkage);
            };
        }
        // Valid Linkage Descriptors
        assert_linkage!("a1-3", "", "a1-3");
        assert_linkage!("b1-4", "", "b1-4");
        assert_linkage!("a2-9", "", "a2-9");
        // Invalid Linkage Descriptors
        assert!(linkage_descriptor("c1-3").is_err());
        assert!(linkage_descriptor("a0-3").is_err());
        assert!(linkage_descriptor("a1_3").is_err());
        assert!(linkage_descriptor("a1-").is_err());
        assert!(linkage_descriptor("1-3").is_err());
        // Multiple Linkage Descriptors
        assert_linkage!("b1-4)Gal", ")Gal", "b1-4");
        assert_linkage!("a2-36", "6", "a2-3");
    }

    #[test]
    fn test_branch_symbol() {
        assert_eq!(branch_symbol("("), Ok(("", BranchSymbol::OpenParen)));
        assert_eq!(branch_symbol(")Glc"), Ok(("Glc", BranchSymbol::CloseParen)));
        assert_eq!(branch_symbol("[["), Ok(("[", BranchSymbol::OpenBracket)));
        assert_eq!(branch_symbol("]"), Ok(("", BranchSymbol::CloseBracket)));
        assert!(branch_symbol("{").is_err());
        assert!(branch_symbol("Glc").is_err());
    }

    #[test]
    fn test_sugar() {
        let mut sugar = sugar(&CATALOG);
        macro_rules! assert_sugar {
            ($input:literal, $output:literal, $abbr:literal) => {
                let (rest, parsed) = sugar($input).unwrap();
                assert_eq!(rest, $output);
                assert_eq!(parsed.abbr(), $abbr);
            };
        }
        // Valid Sugars
        assert_sugar!("Glc", "", "Glc");
        assert_sugar!("Neu5Ac(a2-3)", "(a2-3)", "Neu5Ac");
        assert_sugar!("6dTal]", "]", "6dTal");
        // Unknown Sugars are fatal
        assert!(matches!(sugar("Blue"), Err(Err::Failure(_))));
        assert!(matches!(sugar("GlcGal"), Err(Err::Failure(_))));
        // Not Sugars at all
        assert!(matches!(sugar("(Glc"), Err(Err::Error(_))));
        assert!(matches!(sugar(""), Err(Err::Error(_))));
    }

    #[test]
    fn test_bond() {
        let mut bond = bond(&CATALOG);
        // Valid Bonds
        assert_eq!(bond("(a1-3)").map(|(r, l)| (r, l.to_string())), Ok(("", "a1-3".to_owned())));
        assert_eq!(
            bond("(b1-4)Gal").map(|(r, l)| (r, l.to_string())),
            Ok(("Gal", "b1-4".to_owned()))
        );
        // Not Bonds, so a branch symbol can be tried instead
        assert!(matches!(bond("(Glc"), Err(Err::Error(_))));
        assert!(matches!(bond("(a0-3)"), Err(Err::Error(_))));
        assert!(matches!(bond("[a1-3]"), Err(Err::Error(_))));
        // Broken Bonds
        assert!(matches!(bond("(a1-3"), Err(Err::Failure(_))));
        assert!(matches!(bond("(a13)"), Err(Err::Failure(_))));
        assert!(matches!(bond("(a1-10)"), Err(Err::Failure(_))));
        // Well-formed, but missing from the catalog
        assert!(matches!(bond("(a1-9)"), Err(Err::Failure(_))));
    }

    #[test]
    fn parse_sequences() {
        use TokenKind::{Bond, Branch, Sugar};

        assert!(kinds("").is_empty());
        assert_eq!(kinds("Glc"), [Sugar]);
        assert_eq!(kinds("Glc(a1-3)Gal"), [Sugar, Bond, Sugar]);
        assert_eq!(
            kinds("Gal(b1-4)[Fuc(a1-3)]GlcNAc"),
            [Sugar, Bond, Branch, Sugar, Bond, Branch, Sugar]
        );
        // A `(` not followed by a linkage is a branch symbol
        assert_eq!(
            kinds("Glc(Gal(a1-3))"),
            [Sugar, Branch, Sugar, Bond, Branch]
        );
        assert_eq!(kinds("(("), [Branch, Branch]);
        // ...but a `(` followed by an anomer with no position is read as a branch and an unknown sugar
        assert_eq!(error_kind("(a"), SequenceErrorKind::UnknownSugar("a".to_owned()));
    }

    #[test]
    fn parse_keeps_serialized_form() {
        for text in [
            "",
            "Glc",
            "Glc(a1-3)Gal",
            "Neu5Ac(a2-3)Gal(b1-4)[Fuc(a1-3)]GlcNAc",
            "Man(a1-6)(Man(a1-3))Man(b1-4)GlcNAc",
            "]](((",
        ] {
            assert_eq!(reserialize(text), text);
        }
    }

    #[test]
    fn parse_spans() {
        let tokens = parse_spanned(&CATALOG, "Glc(a1-3)[Gal").unwrap();
        let spans: Vec<_> = tokens
            .iter()
            .map(|(_, span)| (span.offset(), span.len()))
            .collect();
        assert_eq!(spans, [(0, 3), (3, 6), (9, 1), (10, 3)]);
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            error_kind("GlcBlue"),
            SequenceErrorKind::UnknownSugar("GlcBlue".to_owned())
        );
        assert_eq!(error_span("GlcBlue"), (0, 7));
        assert_eq!(
            error_kind("Glc(a1-9)Gal"),
            SequenceErrorKind::UnknownLinkage("(a1-9)".to_owned())
        );
        assert_eq!(error_span("Glc(a1-9)Gal"), (3, 6));
        assert_eq!(error_kind("Glc(a1-3"), SequenceErrorKind::ExpectedLinkageEnd);
        assert_eq!(error_span("Glc(a1-3"), (8, 0));
        assert_eq!(error_kind("Glc(a13)"), SequenceErrorKind::ExpectedDash);
        assert_eq!(error_span("Glc(a13)"), (6, 0));
        assert_eq!(error_kind("Glc(a1-)"), SequenceErrorKind::ExpectedPosition);
        assert_eq!(error_kind("Glc (a1-3)Gal"), SequenceErrorKind::ExpectedToken);
        assert_eq!(error_span("Glc (a1-3)Gal"), (3, 1));
        assert_eq!(error_kind("Glc{Gal}"), SequenceErrorKind::ExpectedToken);
        assert_eq!(error_span("Glcé"), (3, 2));
    }

    #[test]
    fn parse_error_messages() {
        let error = parse(&CATALOG, "Glc(a1-3)Gul(b1-4)Blue").unwrap_err();
        assert_eq!(
            error.to_string(),
            r#"the sugar "Blue" could not be found in the catalog"#
        );
        let error = parse(&CATALOG, "Glc(a1-3").unwrap_err();
        assert_debug_snapshot!(error.to_string(), @r#""expected ')' to close the bond""#);
    }
}
