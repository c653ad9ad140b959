//! Property-based check of quantified invariant #4 from the design
//! document: `match(subst, p, d) = subst'` implies `apply(subst', p) ==
//! d`.

use proptest::prelude::*;
use prefixlog::term::{apply, match_pattern, Data, Pattern, Substitution};

fn ground_data() -> impl Strategy<Value = Data> {
    let leaf = prop_oneof![
        any::<i64>().prop_map(Data::Int),
        "[a-z]{1,5}".prop_map(Data::Str),
        Just(Data::Triv),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        ("[a-z]{1,4}", prop::collection::vec(inner, 0..3))
            .prop_map(|(name, args)| Data::Const(name, args))
    })
}

/// Builds a pattern that is guaranteed to match `data`: every other leaf
/// position is replaced with a fresh variable, the rest kept literal.
fn pattern_matching(data: &Data, var_every: usize, counter: &mut usize) -> Pattern {
    *counter += 1;
    if *counter % var_every == 0 {
        let name = format!("V{counter}");
        return Pattern::Var(name);
    }
    match data {
        Data::Const(name, args) => Pattern::Const(
            name.clone(),
            args.iter()
                .map(|a| pattern_matching(a, var_every, counter))
                .collect(),
        ),
        Data::Int(v) => Pattern::Int(*v),
        Data::Str(v) => Pattern::Str(v.clone()),
        Data::Triv => Pattern::Triv,
    }
}

proptest! {
    #[test]
    fn match_then_apply_reproduces_original_data(data in ground_data(), var_every in 2usize..5) {
        let mut counter = 0usize;
        let pattern = pattern_matching(&data, var_every, &mut counter);
        let subst = Substitution::new();
        if let Some(subst2) = match_pattern(&subst, &pattern, &data) {
            let rebuilt = apply(&subst2, &pattern).expect("every variable in a matched pattern is bound");
            prop_assert_eq!(rebuilt, data);
        }
    }
}
