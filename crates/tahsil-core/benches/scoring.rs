use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tahsil_core::aggregate::{evaluate, AggregateInput, CompletionSummary};
use tahsil_core::catalog::find_stream;
use tahsil_core::model::{GradeMap, ScoringMode, Subject, SubjectData};
use tahsil_core::projection::{project_pending, Slot, SubjectSimulation};
use tahsil_core::scoring::{subject_average, Weighting};

fn filled_grades(subjects: &[Subject], tests: usize) -> GradeMap {
    subjects.iter().enumerate().fold(GradeMap::new(), |map, (i, s)| {
        let marks: Vec<Option<f64>> = (0..tests).map(|t| Some(8.0 + ((i + t) % 12) as f64)).collect();
        map.with(s.id.clone(), SubjectData::from_marks(&marks, Some(15.0)))
    })
}

fn bench_subject_average(c: &mut Criterion) {
    let mut group = c.benchmark_group("subject_average");

    let two = SubjectData::from_marks(&[Some(14.0), Some(16.0)], Some(12.0));
    let many = SubjectData::from_marks(&[Some(11.5); 40], Some(17.0));

    group.bench_function("2_tests", |b| {
        b.iter(|| subject_average(black_box(&two), true, Weighting::Standard))
    });

    group.bench_function("40_tests", |b| {
        b.iter(|| subject_average(black_box(&many), true, Weighting::Standard))
    });

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    let stream = find_stream("pc").unwrap();
    let grades = filled_grades(&stream.subjects, 3);

    group.bench_function("pc_continuous", |b| {
        let input = AggregateInput::new(ScoringMode::Continuous, &stream.subjects, &grades);
        b.iter(|| evaluate(black_box(&input)))
    });

    let custom: Vec<Subject> = (0..100)
        .map(|i| Subject::new(format!("s{i}"), format!("Subject {i}"), 1.0 + (i % 5) as f64))
        .collect();
    let custom_grades = filled_grades(&custom, 4);

    group.bench_function("custom_100_subjects", |b| {
        let input = AggregateInput::new(ScoringMode::CustomContinuous, &custom, &custom_grades);
        b.iter(|| evaluate(black_box(&input)))
    });

    group.finish();
}

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection");

    let summary = CompletionSummary {
        completed_score: 64.0,
        completed_coefficients: 4.0,
        total_coefficients: 10.0,
    };
    group.bench_function("pending", |b| {
        b.iter(|| project_pending(black_box(10.0), black_box(&summary)))
    });

    let sim = SubjectSimulation {
        assessments: vec![Slot::Known(12.0), Slot::Known(9.0), Slot::Unknown],
        activity: Some(Slot::Known(14.0)),
        activities_weight: Default::default(),
    };
    group.bench_function("single_subject", |b| b.iter(|| black_box(&sim).project(14.0)));

    group.finish();
}

criterion_group!(benches, bench_subject_average, bench_evaluate, bench_projection);
criterion_main!(benches);
