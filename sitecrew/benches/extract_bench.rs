//! Benchmarks for fence extraction.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sitecrew::extract::extract;

const LABELS: [&str; 3] = ["html", "css", "javascript"];

fn transcript(stages: usize) -> String {
    let mut text = String::new();
    for i in 0..stages {
        text.push_str(&format!("## Stage {i}\nSome planning prose for stage {i}.\n\n"));
        text.push_str(&format!("```html\n<section id=\"s{i}\">content</section>\n```\n\n"));
        text.push_str(&format!("```css\n#s{i} {{ padding: {i}px; }}\n```\n\n"));
        text.push_str(&format!("```javascript\nconsole.log({i});\n```\n\n"));
    }
    text
}

fn unterminated(lines: usize) -> String {
    let mut text = String::from("```html\n");
    for i in 0..lines {
        text.push_str(&format!("<p>line {i}</p>\n"));
    }
    text
}

fn nested_openers(count: usize) -> String {
    (0..count).map(|i| format!("```css\nrule{i}\n")).collect()
}

fn extract_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");
    for size in [8, 128, 2048] {
        let text = transcript(size);
        group.bench_with_input(BenchmarkId::new("transcript", size), &text, |b, text| {
            b.iter(|| extract(black_box(text), LABELS));
        });
    }

    let text = unterminated(50_000);
    group.bench_function("unterminated", |b| b.iter(|| extract(black_box(&text), LABELS)));

    let text = nested_openers(20_000);
    group.bench_function("nested_openers", |b| b.iter(|| extract(black_box(&text), LABELS)));
    group.finish();
}

criterion_group!(benches, extract_benchmark);
criterion_main!(benches);
