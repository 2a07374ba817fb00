use std::sync::LazyLock;

use proptest::{prelude::*, sample::select};

use crate::{BranchSymbol, Catalog, Token};

pub(crate) static CATALOG: LazyLock<Catalog> = LazyLock::new(Catalog::default);

/// Any token from the bundled catalog, with sugars, bonds, and branch symbols drawn equally often
pub(crate) fn any_token() -> impl Strategy<Value = Token<'static>> {
    let sugars: Vec<_> = CATALOG.sugars().map(Token::Sugar).collect();
    let bonds: Vec<_> = CATALOG.bonds().iter().map(|&linkage| Token::Bond(linkage)).collect();
    let branches: Vec<_> = BranchSymbol::ALL.into_iter().map(Token::Branch).collect();
    prop_oneof![select(sugars), select(bonds), select(branches)]
}
