use std::sync::Arc;
use std::thread;

use rulekit::{evaluate, parse, Context};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let rule = Arc::new(parse("age >= 18 AND status = active")?);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let rule = Arc::clone(&rule);
            thread::spawn(move || {
                let ctx = Context::new()
                    .set("age", 16_i64 + i64::from(i))
                    .set("status", "active");
                let result = evaluate(&rule, &ctx);
                println!("Thread {i}: {result:?}");
            })
        })
        .collect();

    for h in handles {
        if h.join().is_err() {
            eprintln!("worker thread panicked");
        }
    }

    Ok(())
}
