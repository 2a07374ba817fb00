use std::sync::LazyLock;

use divan::{black_box, AllocProfiler};
use glycan::{catalog::DEFAULT_KDL, parser, Catalog, GlycanBuilder, Sequence, Token};

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

const SEQUENCES: [&str; 5] = [
    "Glc(a1-3)Gal",
    "Gal(b1-4)[Fuc(a1-3)]GlcNAc",
    "Neu5Ac(a2-3)Gal(b1-4)[Fuc(a1-3)]GlcNAc",
    "Man(a1-3)[Man(a1-6)]Man(b1-4)GlcNAc(b1-4)GlcNAc",
    "Neu5Ac(a2-6)Gal(b1-4)GlcNAc(b1-2)Man(a1-3)[Neu5Ac(a2-6)Gal(b1-4)GlcNAc(b1-2)Man(a1-6)]Man(b1-4)GlcNAc",
];

static CATALOG: LazyLock<Catalog> = LazyLock::new(Catalog::default);

static TOKENS: LazyLock<Vec<Vec<Token>>> = LazyLock::new(|| {
    SEQUENCES
        .into_iter()
        .map(|sequence| parser::parse(&CATALOG, sequence).unwrap())
        .collect()
});

fn main() {
    LazyLock::force(&CATALOG);
    LazyLock::force(&TOKENS);
    divan::main();
}

mod catalog {
    use super::*;

    #[divan::bench]
    fn build_catalog() -> Catalog {
        Catalog::new("glycan_catalog.kdl", DEFAULT_KDL).unwrap()
    }

    #[divan::bench]
    fn classify_tokens() {
        for text in ["Glc", "Neu5Ac", "LDmanHep", "(a1-3)", "b2-8", "["] {
            black_box(Token::new(&CATALOG, text).unwrap());
        }
    }
}

mod sequences {
    use divan::Bencher;

    use super::*;

    #[divan::bench]
    fn parse_sequences() {
        for sequence in SEQUENCES {
            black_box(parser::parse(&CATALOG, sequence).unwrap());
        }
    }

    #[divan::bench]
    fn load_sequences() {
        for sequence in SEQUENCES {
            black_box(GlycanBuilder::load(&CATALOG, sequence).unwrap());
        }
    }

    #[divan::bench]
    fn append_tokens(bencher: Bencher) {
        bencher.bench_local(|| {
            for tokens in TOKENS.iter() {
                let mut sequence = Sequence::new();
                for &token in tokens {
                    sequence = sequence.append(token).unwrap();
                }
                black_box(sequence);
            }
        });
    }

    #[divan::bench]
    fn serialize_sequences(bencher: Bencher) {
        let builders: Vec<_> = SEQUENCES
            .into_iter()
            .map(|sequence| GlycanBuilder::load(&CATALOG, sequence).unwrap())
            .collect();
        bencher.bench_local(|| {
            for builder in &builders {
                black_box(builder.serialize());
            }
        });
    }

    #[divan::bench]
    fn check_brackets(bencher: Bencher) {
        let builders: Vec<_> = SEQUENCES
            .into_iter()
            .map(|sequence| GlycanBuilder::load(&CATALOG, sequence).unwrap())
            .collect();
        bencher.bench_local(|| {
            for builder in &builders {
                black_box(builder.sequence().bracket_report()).unwrap();
            }
        });
    }
}
