use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use helium_core::Store;
use helium_renderer::{children, html};
use helium_template::parse_template;

const ROW: &[&str] = &[
    "<tr class=\"row\"><td>",
    "</td><td><a href=",
    " title=\"open\">",
    "</a></td><td><button onclick=",
    ">x</button></td></tr>",
];

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_row_template", |b| {
        b.iter(|| parse_template(ROW).expect("parse"));
    });
}

fn bench_cached_render(c: &mut Criterion) {
    c.bench_function("render_cached_row", |b| {
        b.iter(|| {
            html!(
                ["<tr><td>", "</td><td><a href=", ">", "</a></td></tr>"],
                42,
                "/item/42",
                "item"
            )
            .expect("render")
        });
    });
}

fn bench_keyed_reorder(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyed_children_reverse");
    group.sample_size(20);
    for &count in &[10usize, 100, 1000] {
        let items: Vec<usize> = (0..count).collect();
        let source = Store::new(items.clone());
        let list = children(&source, |n: &usize| {
            html!(["<li>", "</li>"], *n).expect("render item")
        });
        let root = html!(["<ul>", "</ul>"], list).expect("render list");
        let reversed: Vec<usize> = items.iter().rev().copied().collect();

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            let mut flip = false;
            b.iter(|| {
                flip = !flip;
                let next = if flip { reversed.clone() } else { items.clone() };
                source.update(next).expect("update");
            });
        });
        drop(root);
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_cached_render, bench_keyed_reorder);
criterion_main!(benches);
