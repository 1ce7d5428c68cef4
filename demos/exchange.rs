use rulekit::{parse, Context, RuleEngine};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("rulekit=debug".parse()?),
        )
        .init();

    let engine = RuleEngine::new();

    // What an API layer would store.
    let rule = parse("age > 30 AND department = 'Sales'")?;
    let stored = serde_json::to_string_pretty(&rule)?;
    println!("{stored}");

    // What it would do with a request body later.
    let ctx = Context::from_json(r#"{"age": 42, "department": "Sales"}"#)?;
    println!("Matched: {}", engine.evaluate_json(&stored, &ctx)?);

    let decoded = engine.decode_json(&stored)?;
    println!("Decoded: {decoded}");

    Ok(())
}
