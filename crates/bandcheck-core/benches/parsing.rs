use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bandcheck_core::answer::AnswerSheet;
use bandcheck_core::model::TestDefinition;
use bandcheck_core::normalize::normalize;

fn full_test_json() -> String {
    let mut sections = Vec::new();
    for s in 0..4 {
        let questions: Vec<String> = (0..10)
            .map(|q| {
                let n = s * 10 + q + 1;
                format!(
                    r#"{{"id": {n}, "questionNumber": {n}, "questionText": "Question {n}", "answers": ["answer {n}", "alt {n}"]}}"#
                )
            })
            .collect();
        sections.push(format!(
            r#"{{"sectionId": "part-{s}", "sectionTitle": "Part {s}", "questionType": "short-answer", "questions": [{}]}}"#,
            questions.join(",")
        ));
    }
    format!(
        r#"{{"id": "bench", "title": "Bench", "testType": "listening", "sections": [{}]}}"#,
        sections.join(",")
    )
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    group.bench_function("short", |b| b.iter(|| normalize(black_box("  Paris  "))));

    group.bench_function("sentence", |b| {
        b.iter(|| {
            normalize(black_box(
                "  The   Industrial\tRevolution began in   BRITAIN in the late 18th century ",
            ))
        })
    });

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    let definition = full_test_json();
    let answers: String = {
        let entries: Vec<String> = (1..=40)
            .map(|n| format!(r#""{n}": "answer {n}""#))
            .collect();
        format!("{{{}}}", entries.join(","))
    };

    group.bench_function("definition_40_questions", |b| {
        b.iter(|| serde_json::from_str::<TestDefinition>(black_box(&definition)).unwrap())
    });

    group.bench_function("answer_map_40", |b| {
        b.iter(|| serde_json::from_str::<AnswerSheet>(black_box(&answers)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_parse);
criterion_main!(benches);
