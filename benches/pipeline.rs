use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tinysql::{Database, Parser, Tokenizer};

const SCRIPT: &str = "CREATE TABLE users (id INT, name TEXT, age INT); \
                      INSERT INTO users VALUES (1, 'Alice', 30); \
                      INSERT INTO users VALUES (2, 'it''s Bob', 41); \
                      SELECT name, age, id FROM users;";

fn setup_populated_db(n: usize) -> Database {
    let mut db = Database::new();
    db.run("CREATE TABLE users (id INT, name TEXT, age INT);")
        .unwrap();

    for i in 0..n {
        db.run(&format!(
            "INSERT INTO users VALUES ({i}, 'user{i}', {});",
            i % 100
        ))
        .unwrap();
    }
    db
}

fn bench_front_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("Front_End");
    group.bench_function("tokenize_script", |b| {
        b.iter(|| Tokenizer::new(black_box(SCRIPT)).tokenize().unwrap());
    });
    group.bench_function("parse_script", |b| {
        let tokens = Tokenizer::new(SCRIPT).tokenize().unwrap();
        b.iter(|| Parser::new(black_box(&tokens)).parse().unwrap());
    });
    group.finish();
}

fn bench_insert_sql(c: &mut Criterion) {
    let mut group = c.benchmark_group("Insert_SQL_Pipeline");
    group.bench_function("insert_single_row_sql", |b| {
        let mut db = Database::new();
        db.run("CREATE TABLE tests (id INT, label TEXT);").unwrap();
        b.iter(|| {
            db.run(black_box("INSERT INTO tests VALUES (42, 'answer');"))
                .unwrap();
        });
    });
    group.finish();
}

fn bench_select_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("Select_Projection");

    for n in [1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            let mut db = setup_populated_db(n);
            b.iter(|| {
                let res = db.run("SELECT name, age FROM users;").unwrap();
                black_box(res);
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_front_end,
    bench_insert_sql,
    bench_select_scaling
);
criterion_main!(benches);
