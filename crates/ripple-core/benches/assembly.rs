use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ripple_core::assembler::{assemble, replace_one};
use ripple_core::model::{BankMeta, FilterSet, Item, ItemBank};
use ripple_core::shuffle::shuffle_alternatives;

fn make_bank(n: usize) -> ItemBank {
    let themes = ["algebra", "geometry", "statistics", "numbers"];
    let items = (0..n)
        .map(|i| {
            serde_json::from_value::<Item>(serde_json::json!({
                "id": format!("item-{i}"),
                "subject": "math",
                "gradeLevel": "9",
                "curriculumCode": format!("EF09MA{:02}", i % 20),
                "theme": themes[i % themes.len()],
                "itemType": "multiple_choice",
                "difficultyLevel": (i % 5) as i64 + 1,
                "estimatedMinutes": 2.5,
                "bodyHtml": "<p>question</p>",
                "alternatives": [
                    {"letter": "A", "bodyHtml": "1"},
                    {"letter": "B", "bodyHtml": "2"},
                    {"letter": "C", "bodyHtml": "3"},
                    {"letter": "D", "bodyHtml": "4"},
                    {"letter": "E", "bodyHtml": "5"}
                ]
            }))
            .expect("valid bench item")
        })
        .collect();
    ItemBank::new(BankMeta::default(), items)
}

fn bench_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble");
    let bank = make_bank(5_000);
    let filters = FilterSet {
        themes: vec!["algebra".into(), "geometry".into()],
        difficulty_levels: vec![2, 3, 4],
        ..Default::default()
    };

    group.bench_function("5000 items, 20 slots, unconstrained", |b| {
        let unconstrained = FilterSet::default();
        b.iter(|| assemble(black_box(&bank), &unconstrained, &[], black_box(42), 20))
    });

    group.bench_function("5000 items, 20 slots, filtered", |b| {
        b.iter(|| assemble(black_box(&bank), &filters, &[], black_box(42), 20))
    });

    group.bench_function("5000 items, 20 slots, half locked", |b| {
        let mut previous = assemble(&bank, &filters, &[], 7, 20).slots;
        for slot in previous.iter_mut().step_by(2) {
            slot.locked = true;
        }
        b.iter(|| assemble(black_box(&bank), &filters, &previous, black_box(99), 20))
    });

    group.finish();
}

fn bench_replace(c: &mut Criterion) {
    let bank = make_bank(5_000);
    let filters = FilterSet {
        curriculum_codes: vec!["EF09MA01".into()],
        ..Default::default()
    };
    let slots = assemble(&bank, &FilterSet::default(), &[], 3, 30).slots;

    c.bench_function("replace_one relaxed", |b| {
        b.iter(|| replace_one(black_box(&bank), &filters, &slots, 4, black_box(11)))
    });
}

fn bench_shuffle(c: &mut Criterion) {
    let bank = make_bank(1);
    let alternatives = &bank.items[0].alternatives;
    c.bench_function("shuffle 5 alternatives", |b| {
        b.iter(|| shuffle_alternatives(black_box(alternatives), Some(black_box(1234))))
    });
}

criterion_group!(benches, bench_assemble, bench_replace, bench_shuffle);
criterion_main!(benches);
