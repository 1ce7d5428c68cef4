use std::sync::Arc;
use std::thread;

use rulekit::{combine, Connective, Context, RuleEngine};

#[test]
fn evaluate_across_threads() {
    let rule = Arc::new(
        combine(
            ["age > 30 OR experience >= 5", "salary > 50000"],
            Connective::And,
        )
        .unwrap(),
    );

    let candidates = [
        // (age, experience, salary, expected)
        (35_i64, 1_i64, 60000_i64, true),
        (25, 6, 40000, false),
        (25, 6, 70000, true),
        (22, 1, 90000, false),
    ];

    let handles: Vec<_> = candidates
        .into_iter()
        .map(|(age, experience, salary, expected)| {
            let rule = Arc::clone(&rule);
            thread::spawn(move || {
                let ctx = Context::new()
                    .set("age", age)
                    .set("experience", experience)
                    .set("salary", salary);
                (rulekit::evaluate(&rule, &ctx), expected)
            })
        })
        .collect();

    for handle in handles {
        let (result, expected) = handle.join().unwrap();
        assert_eq!(result, Ok(expected));
    }
}

#[test]
fn shared_engine_parses_concurrently() {
    let engine = RuleEngine::new();
    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                s.spawn(move || {
                    let rule = engine.parse(&format!("score >= {i} AND tier = gold"))?;
                    let ctx = Context::new().set("score", 4_i64).set("tier", "gold");
                    Ok::<_, rulekit::RuleError>(engine.evaluate(&rule, &ctx)?)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (i, result) in results.into_iter().enumerate() {
        assert_eq!(result.unwrap(), i <= 4, "failed for threshold {i}");
    }
}
