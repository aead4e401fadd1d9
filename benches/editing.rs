//! Benchmarks for buffer editing and annotation handling.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use linerun::editor::{Buffer, Mode};

fn large_buffer() -> Buffer {
    let text = (0..10_000)
        .map(|i| format!("line_{i} = {i} * 2"))
        .collect::<Vec<_>>()
        .join("\n");
    Buffer::from_text(&text)
}

fn bench_insert_chars(c: &mut Criterion) {
    c.bench_function("insert_1k_chars", |b| {
        b.iter(|| {
            let mut buffer = Buffer::empty();
            for ch in "let x = 42; ".chars().cycle().take(1000) {
                buffer.insert_char(black_box(ch));
            }
            buffer
        });
    });
}

fn bench_move_through_buffer(c: &mut Criterion) {
    let mut buffer = large_buffer();
    c.bench_function("move_to_10k_rows", |b| {
        b.iter(|| {
            for row in 0..buffer.line_count() {
                buffer.move_to(black_box(row), 5, Mode::Normal);
            }
        });
    });
}

fn bench_annotate_and_strip(c: &mut Criterion) {
    let mut buffer = large_buffer();
    c.bench_function("annotate_strip_cycle", |b| {
        b.iter(|| {
            buffer.annotate(black_box(5000), "result");
            buffer.strip_annotation(black_box(5000));
        });
    });
}

fn bench_clean_text(c: &mut Criterion) {
    let mut buffer = large_buffer();
    for row in (0..10_000).step_by(10) {
        buffer.annotate(row, "42");
    }
    c.bench_function("clean_text_10k_lines", |b| {
        b.iter(|| black_box(&buffer).clean_text());
    });
}

criterion_group!(
    benches,
    bench_insert_chars,
    bench_move_through_buffer,
    bench_annotate_and_strip,
    bench_clean_text
);
criterion_main!(benches);
