//! # Energy-Chain State Benchmarks
//!
//! | Area | What is measured |
//! |------|------------------|
//! | ec-01 Account State | storage read, cache hit vs. first fault-in |
//! | ec-01 Account State | commit of a block-sized write set |
//! | ec-02 Energy Ledger | growth computation, fee debit |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ec_01_account_state::{
    Account, AccountStateStore, FlatTrieBackend, InMemoryKvStore, StorageKey, EMPTY_TRIE_ROOT,
};
use ec_02_energy_ledger::{grown_energy, Energy, EnergyParams};
use rand::Rng;
use shared_types::{Address, Hash, U256};

fn slot(n: u32) -> StorageKey {
    let mut key = [0u8; 32];
    key[28..].copy_from_slice(&n.to_be_bytes());
    key
}

fn seeded_contract(kv: &InMemoryKvStore, slots: u32) -> (Address, Hash) {
    let address = [0xC0; 20];
    let mut state = AccountStateStore::new(EMPTY_TRIE_ROOT, kv, &FlatTrieBackend);
    for n in 0..slots {
        state
            .set_storage(&address, slot(n), n.to_be_bytes().to_vec())
            .unwrap();
    }
    let root = state.commit().unwrap();
    (address, root)
}

// ============================================================================
// EC-01: Account State
// ============================================================================

fn bench_storage_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("ec-01-storage-reads");

    for slots in [16u32, 256, 4_096] {
        let kv = InMemoryKvStore::new();
        let (address, root) = seeded_contract(&kv, slots);

        group.bench_with_input(BenchmarkId::new("fault_in", slots), &slots, |b, _| {
            b.iter(|| {
                let mut state = AccountStateStore::new(root, &kv, &FlatTrieBackend);
                black_box(state.storage(&address, &slot(0)).unwrap())
            })
        });

        let mut state = AccountStateStore::new(root, &kv, &FlatTrieBackend);
        state.storage(&address, &slot(0)).unwrap();
        group.bench_with_input(BenchmarkId::new("cache_hit", slots), &slots, |b, _| {
            b.iter(|| black_box(state.storage(&address, &slot(0)).unwrap()))
        });
    }

    group.finish();
}

fn bench_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("ec-01-commit");
    let mut rng = rand::thread_rng();

    for accounts in [10usize, 100, 1_000] {
        let updates: Vec<(Address, U256)> = (0..accounts)
            .map(|_| (rng.gen::<[u8; 20]>(), U256::from(rng.gen::<u64>())))
            .collect();

        group.throughput(Throughput::Elements(accounts as u64));
        group.bench_with_input(BenchmarkId::new("balances", accounts), &updates, |b, updates| {
            b.iter(|| {
                let kv = InMemoryKvStore::new();
                let mut state = AccountStateStore::new(EMPTY_TRIE_ROOT, &kv, &FlatTrieBackend);
                for (address, balance) in updates {
                    state.set_balance(address, *balance).unwrap();
                }
                black_box(state.commit().unwrap())
            })
        });
    }

    group.finish();
}

// ============================================================================
// EC-02: Energy Ledger
// ============================================================================

fn bench_energy(c: &mut Criterion) {
    let mut group = c.benchmark_group("ec-02-energy");
    let params = EnergyParams::default();

    let account = Account::new(U256::exp10(24)).with_energy(U256::exp10(20), 1_000);
    group.bench_function("grown_energy", |b| {
        b.iter(|| black_box(grown_energy(&account, black_box(86_400_000), &params)))
    });

    let kv = InMemoryKvStore::new();
    let payer = [0xAB; 20];
    let mut state = AccountStateStore::new(EMPTY_TRIE_ROOT, &kv, &FlatTrieBackend);
    state.set_balance(&payer, U256::exp10(24)).unwrap();
    let mut eng = Energy::new([0xEE; 20], &mut state);
    eng.add_balance(0, &payer, U256::exp10(30)).unwrap();

    let mut now = 0u64;
    group.bench_function("sub_balance", |b| {
        b.iter(|| {
            now += 1;
            black_box(eng.sub_balance(now, &payer, U256::from(21_000u64)).unwrap())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_storage_reads, bench_commit, bench_energy);
criterion_main!(benches);
