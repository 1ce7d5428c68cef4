use rulekit::{combine, evaluate, Connective, Context};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("rulekit=debug".parse()?),
        )
        .init();

    let rules = ["age > 30 OR experience >= 5", "salary > 50000"];

    for connective in [Connective::And, Connective::Or] {
        let rule = combine(rules, connective)?;
        println!("{connective}: {rule}");

        let ctx = Context::new()
            .set("age", 25_i64)
            .set("experience", 6_i64)
            .set("salary", 40000_i64);
        println!("  -> {}", evaluate(&rule, &ctx)?);
    }

    // Invalid inputs are reported with their position in the list.
    if let Err(err) = combine(["age > 30", "salary >< 5"], Connective::And) {
        println!("Rejected: {err}");
    }

    Ok(())
}
