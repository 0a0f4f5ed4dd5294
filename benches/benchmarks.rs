//! Benchmarks for commit-guard.

#![allow(missing_docs)]
#![allow(let_underscore_drop)]

use commit_guard::checks::lint::select_files;
use commit_guard::{Check, KeywordCheck, StagedChange};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// A large staged change mixing source and non-source files.
fn large_change() -> StagedChange {
    StagedChange::from_filenames((0..2_000).map(|i| match i % 4 {
        0 => format!("app/models/model_{i}.rb"),
        1 => format!("web/src/component_{i}.js"),
        2 => format!("docs/page_{i}.md"),
        _ => format!("spec/model_{i}_spec.rb"),
    }))
}

fn benchmark_select_files(c: &mut Criterion) {
    let change = large_change();

    c.bench_function("select_files", |b| {
        b.iter(|| black_box(select_files(black_box(change.filenames()), "rb")));
    });
}

fn benchmark_keyword_command(c: &mut Criterion) {
    let change = large_change();
    let keywords: Vec<String> = commit_guard::config::DEFAULT_KEYWORDS
        .iter()
        .map(|k| (*k).to_string())
        .collect();

    c.bench_function("keyword_command_render", |b| {
        b.iter(|| {
            let check = KeywordCheck::new(black_box(&change), &keywords);
            let command = check.command().expect("build command");
            black_box(command.to_string())
        });
    });
}

criterion_group!(benches, benchmark_select_files, benchmark_keyword_command);
criterion_main!(benches);
