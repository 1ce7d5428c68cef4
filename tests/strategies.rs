use proptest::prelude::*;
use rulekit::{field, CompareOp, Context, Node};

// --- Fixed field schema ---
// age        : i64 (0..=100)
// salary     : i64 (0..=200_000)
// experience : i64 (0..=40)
// department : string, one of DEPARTMENTS

pub const DEPARTMENTS: &[&str] = &["Sales", "Engineering", "Marketing", "Support"];

const NUMERIC_FIELDS: &[&str] = &["age", "salary", "experience"];

const OPS: &[CompareOp] = &[
    CompareOp::Eq,
    CompareOp::Neq,
    CompareOp::Gt,
    CompareOp::Gte,
    CompareOp::Lt,
    CompareOp::Lte,
];

/// Generate a context holding every field of the schema.
pub fn arb_context() -> impl Strategy<Value = Context> {
    (
        0_i64..=100,
        0_i64..=200_000,
        0_i64..=40,
        prop::sample::select(DEPARTMENTS),
    )
        .prop_map(|(age, salary, experience, department)| {
            Context::new()
                .set("age", age)
                .set("salary", salary)
                .set("experience", experience)
                .set("department", department)
        })
}

/// Generate a context where any field may be missing, so evaluation can fail.
pub fn arb_sparse_context() -> impl Strategy<Value = Context> {
    (arb_context(), prop::collection::vec(any::<bool>(), 4)).prop_map(|(full, keep)| {
        ["age", "salary", "experience", "department"]
            .iter()
            .zip(keep)
            .filter(|(_, keep)| *keep)
            .filter_map(|(name, _)| full.get(name).map(|v| (*name, v.clone())))
            .collect()
    })
}

/// Generate a single comparison on a random schema field.
pub fn arb_comparison() -> impl Strategy<Value = Node> {
    prop_oneof![
        (
            prop::sample::select(NUMERIC_FIELDS),
            prop::sample::select(OPS),
            0_i64..=200_000,
        )
            .prop_map(|(name, op, value)| Node::comparison(name, op, value)),
        // Half-step floats keep the rendered text exact.
        (
            prop::sample::select(NUMERIC_FIELDS),
            prop::sample::select(OPS),
            0_i64..=400_000,
        )
            .prop_map(|(name, op, halves)| {
                #[allow(clippy::cast_precision_loss)]
                let value = halves as f64 / 2.0;
                Node::comparison(name, op, value)
            }),
        (prop::sample::select(DEPARTMENTS), any::<bool>()).prop_map(|(dept, is_eq)| {
            if is_eq {
                field("department").eq(dept)
            } else {
                field("department").neq(dept)
            }
        }),
    ]
}

/// Generate an arbitrary tree of bounded depth, including shapes the rule
/// grammar cannot express without grouping.
pub fn arb_node(max_depth: u32) -> impl Strategy<Value = Node> {
    arb_comparison().prop_recursive(max_depth, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a.and(b)),
            (inner.clone(), inner).prop_map(|(a, b)| a.or(b)),
        ]
    })
}

/// Generate a flat rule string: comparisons joined by `AND`/`OR`, in mixed
/// keyword case.
pub fn arb_rule_text() -> impl Strategy<Value = String> {
    (
        arb_comparison(),
        prop::collection::vec(
            (
                prop::sample::select(&["AND", "OR", "and", "Or"][..]),
                arb_comparison(),
            ),
            0..6,
        ),
    )
        .prop_map(|(first, rest)| {
            let mut text = first.to_string();
            for (keyword, comparison) in rest {
                text.push(' ');
                text.push_str(keyword);
                text.push(' ');
                text.push_str(&comparison.to_string());
            }
            text
        })
}
