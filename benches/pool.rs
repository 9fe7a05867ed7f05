use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tinystl::allocator::{self, Alloc, PoolAlloc, SystemAlloc};

fn churn<A: Alloc>(alloc: &A) {
    let mut held = [None; 32];

    for round in 0..1000usize {
        let slot = round % held.len();
        let bytes = 8 + (round * 7) % 120;

        if let Some((ptr, size)) = held[slot].take() {
            unsafe { alloc.deallocate(ptr, size) };
        }
        if let Ok(ptr) = alloc.allocate(bytes) {
            held[slot] = Some((ptr, bytes));
        }
    }

    for (ptr, size) in held.iter_mut().filter_map(Option::take) {
        unsafe { alloc.deallocate(ptr, size) };
    }
}

fn bench_small(c: &mut Criterion) {
    c.bench_function("pool small", |b| {
        b.iter(|| {
            let small = allocator::alloc(16);
            let large = allocator::alloc(64);

            if let (Ok(small), Ok(large)) = (small, large) {
                black_box((small, large));
                unsafe {
                    allocator::free(large, 64);
                    allocator::free(small, 16);
                }
            }
        })
    });
}

fn bench_churn(c: &mut Criterion) {
    c.bench_function("pool churn", |b| b.iter(|| churn(&PoolAlloc)));
    c.bench_function("system churn", |b| b.iter(|| churn(&SystemAlloc)));
}

criterion_group!(benches, bench_small, bench_churn);
criterion_main!(benches);
