use criterion::{Criterion, criterion_group, criterion_main};
use newick_arena::newick::{NewickParser, parse_all};
use std::hint::black_box;

const CATERPILLAR_SIZES: &[usize] = &[100, 1_000, 10_000];
const BALANCED_DEPTHS: &[u32] = &[8, 12];

/// Generates a caterpillar tree `(((t0:0.1,t1:0.1):0.1,t2:0.1):0.1,...);`
/// with `num_leaves` leaves.
fn caterpillar_newick(num_leaves: usize) -> String {
    let mut newick = "(".repeat(num_leaves.saturating_sub(1));
    newick.push_str("t0:0.1");
    for i in 1..num_leaves {
        newick.push_str(&format!(",t{i}:0.1):0.1"));
    }
    newick.push(';');
    newick
}

/// Generates a complete binary tree of the given depth with labelled,
/// commented internal nodes.
fn balanced_newick(depth: u32) -> String {
    let mut newick = String::from("n");
    for level in 0..depth {
        newick = format!("({newick}:0.5,{newick}:0.5)i{level}[&height={level}]");
    }
    newick.push(';');
    newick
}

fn parsing(c: &mut Criterion) {
    for &size in CATERPILLAR_SIZES {
        let newick = caterpillar_newick(size);
        c.bench_function(&format!("parse caterpillar {size}"), |b| {
            b.iter(|| NewickParser::new().parse_str(black_box(&newick)).unwrap());
        });
    }

    for &depth in BALANCED_DEPTHS {
        let newick = balanced_newick(depth);
        c.bench_function(&format!("parse balanced depth {depth}"), |b| {
            b.iter(|| NewickParser::new().parse_str(black_box(&newick)).unwrap());
        });
    }

    let many = caterpillar_newick(50).repeat(1_000);
    c.bench_function("parse 1k trees", |b| {
        b.iter(|| parse_all(black_box(&many)).unwrap());
    });
}

fn rendering(c: &mut Criterion) {
    for &size in CATERPILLAR_SIZES {
        let tree = NewickParser::new().parse_str(&caterpillar_newick(size)).unwrap();
        c.bench_function(&format!("render caterpillar {size}"), |b| {
            b.iter(|| black_box(&tree).to_newick());
        });
    }
}

fn traversal(c: &mut Criterion) {
    let tree = NewickParser::new().parse_str(&balanced_newick(12)).unwrap();
    let root = tree.root_index().unwrap();
    c.bench_function("breadth-first balanced depth 12", |b| {
        b.iter(|| tree.breadth_first_iter(root).count());
    });
    c.bench_function("depth-first balanced depth 12", |b| {
        b.iter(|| tree.depth_first_iter(root).count());
    });
}

criterion_group!(regression, parsing, rendering);
criterion_group! {
    name = reporting;
    config = Criterion::default().sample_size(20);
    targets = traversal
}
criterion_main!(regression, reporting);
