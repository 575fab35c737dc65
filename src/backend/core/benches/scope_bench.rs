//! Benchmarks for scope resolution, gating and selector level generation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use garrison_core::org::{OrgTree, Unit};
use garrison_core::rbac::{PageGate, Role, ScopeResolver};
use garrison_core::selector::CascadeSelector;

/// A balanced tree: one root, `fan` children per unit, `depth` levels below the root.
fn build_tree(fan: usize, depth: usize) -> (OrgTree, String) {
    let mut units = vec![Unit::new("u", "root")];
    let mut frontier = vec!["u".to_string()];
    for _ in 0..depth {
        let mut next = Vec::with_capacity(frontier.len() * fan);
        for parent in &frontier {
            for i in 0..fan {
                let id = format!("{parent}-{i}");
                units.push(Unit::new(id.clone(), id.clone()).with_parent(parent.clone()));
                next.push(id);
            }
        }
        frontier = next;
    }
    let deepest = frontier.last().cloned().unwrap_or_else(|| "u".to_string());
    (OrgTree::new(units).unwrap(), deepest)
}

fn bench_tree_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_construction");
    for (fan, depth) in [(4, 3), (6, 4), (8, 4)] {
        let (tree, _) = build_tree(fan, depth);
        let units: Vec<Unit> = tree.iter().cloned().collect();
        group.throughput(Throughput::Elements(units.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(units.len()), &units, |b, units| {
            b.iter(|| OrgTree::new(black_box(units.clone())).unwrap());
        });
    }
    group.finish();
}

fn bench_scope_resolution(c: &mut Criterion) {
    let (tree, deepest) = build_tree(8, 4);
    let resolver = ScopeResolver::new(&tree);
    let mut group = c.benchmark_group("scope_resolution");

    group.bench_function("headquarters", |b| {
        b.iter(|| resolver.resolve(black_box(Some(Role::Headquarters)), "u"));
    });
    group.bench_function("division_at_root", |b| {
        b.iter(|| resolver.resolve(black_box(Some(Role::Division)), "u"));
    });
    group.bench_function("division_at_branch", |b| {
        b.iter(|| resolver.resolve(black_box(Some(Role::Division)), "u-3"));
    });
    group.bench_function("can_access_deep_unit", |b| {
        b.iter(|| resolver.can_access_unit(Some(Role::Division), "u-7", black_box(&deepest)));
    });
    group.finish();
}

fn bench_page_gate(c: &mut Criterion) {
    let gate = PageGate::default();
    let mut group = c.benchmark_group("page_gate");
    for path in ["/dashboard", "/admin/settings/thresholds/edit", "/font-preview"] {
        group.bench_with_input(BenchmarkId::from_parameter(path), path, |b, path| {
            b.iter(|| gate.can_access(Some(Role::Division), black_box(path)));
        });
    }
    group.finish();
}

fn bench_selector_levels(c: &mut Criterion) {
    let (tree, deepest) = build_tree(8, 4);
    c.bench_function("selector_levels_deepest", |b| {
        b.iter(|| {
            let selector = CascadeSelector::new(&tree).with_value(black_box(&deepest));
            selector.levels().len()
        });
    });
}

criterion_group!(benches, bench_tree_construction, bench_scope_resolution, bench_page_gate, bench_selector_levels);
criterion_main!(benches);
