use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tahsil_core::parser::{parse_mark, parse_sheet_str};

fn bench_parse_mark(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_mark");

    group.bench_function("decimal_point", |b| b.iter(|| parse_mark(black_box("13.75"))));
    group.bench_function("decimal_comma", |b| b.iter(|| parse_mark(black_box("13,75"))));
    group.bench_function("blank", |b| b.iter(|| parse_mark(black_box("   "))));

    group.finish();
}

fn bench_sheet_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("sheet_parsing");

    let small = generate_custom_sheet(5);
    let medium = generate_custom_sheet(50);
    let large = generate_custom_sheet(200);

    for (name, toml) in [("5_subjects", &small), ("50_subjects", &medium), ("200_subjects", &large)] {
        group.bench_function(name, |b| {
            b.iter(|| parse_sheet_str(black_box(toml), black_box("bench.toml".as_ref())))
        });
    }

    group.finish();
}

fn generate_custom_sheet(n: usize) -> String {
    let mut s = String::from(
        r#"[sheet]
mode = "custom_continuous"
activities_weight = 0.3
"#,
    );
    for i in 0..n {
        s.push_str(&format!(
            r#"
[[subjects]]
id = "s{i}"
name = "Subject {i}"
coefficient = {}
"#,
            1 + i % 4
        ));
    }
    for i in 0..n {
        s.push_str(&format!(
            r#"
[grades.s{i}]
tests = [12, "14,5", {}]
activity = 16
"#,
            i % 20
        ));
    }
    s
}

criterion_group!(benches, bench_parse_mark, bench_sheet_parsing);
criterion_main!(benches);
