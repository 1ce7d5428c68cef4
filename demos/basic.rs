use rulekit::{evaluate, parse, Context};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("rulekit=debug".parse()?),
        )
        .init();

    let rule = parse("age > 30 AND department = 'Sales'")?;
    println!("Rule: {rule}");

    let candidates = [
        Context::new().set("age", 35_i64).set("department", "Sales"),
        Context::new().set("age", 20_i64).set("department", "Sales"),
        Context::new().set("age", 40_i64).set("department", "Marketing"),
        Context::new().set("age", 40_i64),
    ];

    for (i, ctx) in candidates.iter().enumerate() {
        match evaluate(&rule, ctx) {
            Ok(matched) => println!("Candidate {i}: {matched}"),
            Err(err) => println!("Candidate {i}: error: {err}"),
        }
    }

    Ok(())
}
