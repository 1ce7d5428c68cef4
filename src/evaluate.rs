use crate::{CompareOp, Context, EvalError, Identifier, Literal, Node, Value};

/// Evaluate a rule against a context.
///
/// Both children of a logical node are always evaluated, left first, so an
/// error anywhere in the tree surfaces; the first error in tree order wins.
///
/// ```
/// use rulekit::{evaluate, parse, Context};
///
/// let rule = parse("age > 30 AND department = 'Sales'").unwrap();
/// let ctx = Context::new().set("age", 35_i64).set("department", "Sales");
/// assert!(evaluate(&rule, &ctx).unwrap());
/// ```
///
/// # Errors
///
/// Returns [`EvalError::UnknownField`] if the rule references a field the
/// context lacks, and [`EvalError::TypeMismatch`] if a literal cannot be
/// coerced to the numeric kind of the field it is compared with.
pub fn evaluate(node: &Node, ctx: &Context) -> Result<bool, EvalError> {
    let result = eval_node(node, ctx);
    tracing::trace!(?result, "evaluated rule");
    result
}

fn eval_node(node: &Node, ctx: &Context) -> Result<bool, EvalError> {
    match node {
        Node::Logical {
            connective,
            left,
            right,
        } => {
            let lhs = eval_node(left, ctx)?;
            let rhs = eval_node(right, ctx)?;
            Ok(connective.apply(lhs, rhs))
        }
        Node::Comparison {
            operator,
            field,
            literal,
        } => {
            let actual = resolve(field, ctx)?;
            compare(field, actual, *operator, literal)
        }
    }
}

fn resolve<'c>(field: &Identifier, ctx: &'c Context) -> Result<&'c Value, EvalError> {
    ctx.get(field.name()).ok_or_else(|| EvalError::UnknownField {
        name: field.name().to_owned(),
    })
}

/// A literal coerced for comparison with a numeric field.
enum Number {
    Int(i64),
    Float(f64),
}

fn to_number(literal: &Literal) -> Option<Number> {
    match literal {
        Literal::Int(v) => Some(Number::Int(*v)),
        Literal::Float(v) => Some(Number::Float(*v)),
        Literal::String(s) => {
            let s = s.trim();
            s.parse::<i64>().map(Number::Int).ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(Number::Float)
            })
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn compare(
    field: &Identifier,
    actual: &Value,
    op: CompareOp,
    literal: &Literal,
) -> Result<bool, EvalError> {
    let mismatch = || EvalError::TypeMismatch {
        field: field.name().to_owned(),
        expected: actual.kind(),
        found: literal.to_string(),
    };

    match actual {
        Value::Int(a) => match to_number(literal).ok_or_else(mismatch)? {
            Number::Int(b) => Ok(op.apply(a, &b)),
            // Widen instead of truncating the literal.
            Number::Float(b) => Ok(op.apply(&(*a as f64), &b)),
        },
        Value::Float(a) => match to_number(literal).ok_or_else(mismatch)? {
            Number::Int(b) => Ok(op.apply(a, &(b as f64))),
            Number::Float(b) => Ok(op.apply(a, &b)),
        },
        Value::String(a) => Ok(op.apply(a.as_str(), &*literal.as_text())),
    }
}
