use rulekit::{evaluate, field, parse, Context, EvalError, Value};

fn check(rule: &str, ctx: &Context) -> Result<bool, EvalError> {
    evaluate(&parse(rule).unwrap(), ctx)
}

fn employee(age: i64, department: &str) -> Context {
    Context::new().set("age", age).set("department", department)
}

#[test]
fn sales_rule() {
    let rule = "age > 30 AND department = 'Sales'";
    assert_eq!(check(rule, &employee(35, "Sales")), Ok(true));
    assert_eq!(check(rule, &employee(20, "Sales")), Ok(false));
    assert_eq!(check(rule, &employee(35, "Marketing")), Ok(false));
}

#[test]
fn n_ary_and_chain() {
    let rule = "a > 1 AND b > 2 AND c > 3";
    let ctx: Context = [("a", 2_i64), ("b", 3), ("c", 4)].into_iter().collect();
    assert_eq!(check(rule, &ctx), Ok(true));

    let ctx: Context = [("a", 2_i64), ("b", 3), ("c", 2)].into_iter().collect();
    assert_eq!(check(rule, &ctx), Ok(false));
}

#[test]
fn n_ary_or_chain() {
    let rule = "a = 1 OR b = 1 OR c = 1";
    let ctx: Context = [("a", 0_i64), ("b", 0), ("c", 1)].into_iter().collect();
    assert_eq!(check(rule, &ctx), Ok(true));

    let ctx: Context = [("a", 0_i64), ("b", 0), ("c", 0)].into_iter().collect();
    assert_eq!(check(rule, &ctx), Ok(false));
}

#[test]
fn and_binds_before_or() {
    // true OR (false AND false)
    let ctx: Context = [("a", 1_i64), ("b", 0), ("c", 0)].into_iter().collect();
    assert_eq!(check("a = 1 OR b = 1 AND c = 1", &ctx), Ok(true));
    // (false AND true) OR false
    let ctx: Context = [("a", 0_i64), ("b", 1), ("c", 0)].into_iter().collect();
    assert_eq!(check("a = 1 AND b = 1 OR c = 1", &ctx), Ok(false));
}

#[test]
fn missing_field_is_an_error() {
    let ctx = Context::new().set("age", 5_i64);
    assert_eq!(
        check("height > 10", &ctx),
        Err(EvalError::UnknownField {
            name: "height".into()
        })
    );
}

#[test]
fn missing_field_surfaces_even_when_result_is_decided() {
    let ctx = Context::new().set("age", 5_i64);
    assert_eq!(
        check("age > 30 AND height > 10", &ctx),
        Err(EvalError::UnknownField {
            name: "height".into()
        })
    );
}

#[test]
fn float_context_values() {
    let ctx = Context::new().set("salary", 50000.0_f64);
    assert_eq!(check("salary >= 50000", &ctx), Ok(true));
    assert_eq!(check("salary < 50000.01", &ctx), Ok(true));
    assert_eq!(check("salary != 50000", &ctx), Ok(false));
}

#[test]
fn numeric_text_literal_against_float_field() {
    let ctx = Context::new().set("ratio", 0.5_f64);
    assert_eq!(check("ratio = '0.5'", &ctx), Ok(true));
}

#[test]
fn text_against_number_is_a_mismatch() {
    let ctx = Context::new().set("salary", 1.5_f64);
    assert_eq!(
        check("salary > high", &ctx),
        Err(EvalError::TypeMismatch {
            field: "salary".into(),
            expected: "float",
            found: "'high'".into(),
        })
    );
}

#[test]
fn strings_compare_lexicographically() {
    let ctx = Context::new().set("name", "bob");
    assert_eq!(check("name > alice", &ctx), Ok(true));
    assert_eq!(check("name < carol", &ctx), Ok(true));
    assert_eq!(check("name >= bob", &ctx), Ok(true));
    // Case-sensitive.
    assert_eq!(check("name = Bob", &ctx), Ok(false));
}

#[test]
fn numbers_against_text_field_compare_as_text() {
    let ctx = Context::new().set("code", "10");
    // "10" < "9" as text.
    assert_eq!(check("code < 9", &ctx), Ok(true));
}

#[test]
fn contexts_from_json() {
    let ctx = Context::from_json(r#"{"age": 35, "department": "Sales", "bonus": 0.5}"#).unwrap();
    assert_eq!(ctx.get("bonus"), Some(&Value::Float(0.5)));
    assert_eq!(check("age > 30 AND department = 'Sales'", &ctx), Ok(true));
}

#[test]
fn evaluation_does_not_modify_inputs() {
    let rule = field("age").gt(30_i64).and(field("department").eq("Sales"));
    let before = rule.clone();
    let ctx = employee(35, "Sales");
    let ctx_before = ctx.clone();
    for _ in 0..3 {
        assert_eq!(evaluate(&rule, &ctx), Ok(true));
    }
    assert_eq!(rule, before);
    assert_eq!(ctx, ctx_before);
}
