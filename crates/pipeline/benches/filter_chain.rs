//! Benchmarks for the filter chain and the sow pass
//!
//! Run with: cargo bench --package pipeline

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use model::{EntryOutcome, Fact, FactValue, Platform, RawCandidateFacts, Result};
use pipeline::{
    FilterChain, FilterContext, FilterPipeline, FilterRegistry, SelectionEngine, parse_tokens,
};
use sources::{Candidate, CandidateSource, EntryAttempter, FactResolver};

/// Answers every lookup immediately so only the pipeline is measured
struct InstantSite {
    page: Vec<RawCandidateFacts>,
}

impl InstantSite {
    fn new(size: usize) -> Self {
        let page = (0..size)
            .map(|i| {
                let cost = (i % 50) as u64;
                RawCandidateFacts::new(i.to_string(), format!("Game {}", i), "https://g", cost)
                    .with_level((i % 4) as u32)
            })
            .collect();
        Self { page }
    }
}

impl CandidateSource for InstantSite {
    fn fetch_page(&self, page: u32) -> Result<Vec<RawCandidateFacts>> {
        Ok(if page == 1 { self.page.clone() } else { Vec::new() })
    }
}

impl FactResolver for InstantSite {
    fn resolve_fact(&self, candidate: &RawCandidateFacts, fact: Fact) -> Result<FactValue> {
        let n = candidate.cost;
        Ok(match fact {
            Fact::Trust => FactValue::Score(n as i64 - 10),
            Fact::Platforms => FactValue::Platforms(
                if n % 2 == 0 {
                    [Platform::Windows, Platform::Linux].into_iter().collect()
                } else {
                    [Platform::Windows].into_iter().collect()
                },
            ),
            _ => FactValue::Flag(n % 3 == 0),
        })
    }
}

impl EntryAttempter for InstantSite {
    fn attempt_entry(&self, _candidate: &RawCandidateFacts) -> EntryOutcome {
        EntryOutcome::Entered
    }
}

fn build_pipeline() -> FilterPipeline {
    let chain = FilterChain::assemble(
        parse_tokens(&["entered", "level", "library"]).unwrap(),
        parse_tokens(&["dlc", "trust=0", "os=lin", "max_points=40"]).unwrap(),
        &[] as &[&str],
        &[] as &[&str],
    );
    FilterPipeline::from_chain(&chain, &FilterRegistry::with_defaults(), false).unwrap()
}

fn bench_filter_chain(c: &mut Criterion) {
    let site = InstantSite::new(500);
    let pipeline = build_pipeline();

    c.bench_function("filter_chain_500", |b| {
        b.iter(|| {
            let candidates: Vec<Candidate> =
                site.page.iter().cloned().map(Candidate::new).collect();
            let context = FilterContext::new(2, &site);
            let filtered = pipeline.apply(black_box(candidates), &context).unwrap();
            black_box(filtered)
        })
    });
}

fn bench_sow(c: &mut Criterion) {
    let site = InstantSite::new(500);
    let pipeline = build_pipeline();

    c.bench_function("sow_500", |b| {
        b.iter(|| {
            let outcome = SelectionEngine::new(&pipeline)
                .sow(&site, black_box(400), 2)
                .unwrap();
            black_box(outcome)
        })
    });
}

criterion_group!(benches, bench_filter_chain, bench_sow);
criterion_main!(benches);
