// Quote-path benchmarks for the sale engine.
//
// The quote function sits on the hot path of every purchase, so it should
// stay a handful of 256-bit operations with no allocation.

use criterion::{criterion_group, criterion_main, Criterion};

use alloy_primitives::U256;
use helio_engine::config::{to_wad, DEFAULT_TOKEN_PRICE_USD};
use helio_engine::sale::quote_tokens;

fn bench_quote_small_payment(c: &mut Criterion) {
    let price = U256::from(DEFAULT_TOKEN_PRICE_USD);
    let payment = to_wad(10);

    c.bench_function("sale/quote_10_usd", |b| {
        b.iter(|| quote_tokens(payment, price));
    });
}

fn bench_quote_large_payment(c: &mut Criterion) {
    let price = U256::from(DEFAULT_TOKEN_PRICE_USD);
    let payment = to_wad(18_000);

    c.bench_function("sale/quote_18k_usd", |b| {
        b.iter(|| quote_tokens(payment, price));
    });
}

criterion_group!(benches, bench_quote_small_payment, bench_quote_large_payment);
criterion_main!(benches);
