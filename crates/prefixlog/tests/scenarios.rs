//! Integration tests for the six concrete scenarios from the design
//! document (edge/path, functional inconsistency, choice, choice with
//! constraint, open-world possibility, inequality pruning).

use prefixlog::driver::{run, SolverConfig};
use prefixlog::programs;
use prefixlog::term::Data;

fn model_contains(model: &prefixlog::Database, name: &str, args: &[Data], values: &[Data]) -> bool {
    model
        .lookup(name, args)
        .map(|v| v == values)
        .unwrap_or(false)
}

#[test]
fn edge_path_derives_transitive_closure() {
    let program = programs::edge_path();
    let models = run(&program, &SolverConfig::unbounded(), None).unwrap();
    assert_eq!(models.len(), 1);
    let model = &models[0];

    let c = |s: &str| Data::Const(s.to_string(), vec![]);
    let expected = [
        ("a", "b"),
        ("b", "c"),
        ("c", "d"),
        ("a", "c"),
        ("b", "d"),
        ("a", "d"),
    ];
    for (x, y) in expected {
        assert!(
            model_contains(model, "path", &[c(x), c(y)], &[]),
            "missing path {x} {y}"
        );
    }
    assert_eq!(model.facts_for("path").count(), 6);
}

#[test]
fn functional_inconsistency_has_no_models() {
    let program = programs::functional_inconsistency();
    let models = run(&program, &SolverConfig::unbounded(), None).unwrap();
    assert!(models.is_empty());
}

#[test]
fn choice_enumerates_four_models() {
    let program = programs::choice();
    let models = run(&program, &SolverConfig::unbounded(), None).unwrap();
    assert_eq!(models.len(), 4);

    let c = |s: &str| Data::Const(s.to_string(), vec![]);
    let mut combos: Vec<(Data, Data)> = models
        .iter()
        .map(|m| {
            let ca = m.lookup("color", &[c("a")]).unwrap()[0].clone();
            let cb = m.lookup("color", &[c("b")]).unwrap()[0].clone();
            (ca, cb)
        })
        .collect();
    combos.sort();
    let mut expected = vec![
        (c("red"), c("red")),
        (c("red"), c("blue")),
        (c("blue"), c("red")),
        (c("blue"), c("blue")),
    ];
    expected.sort();
    assert_eq!(combos, expected);
}

#[test]
fn choice_with_constraint_enumerates_two_models() {
    let program = programs::choice_with_constraint();
    let models = run(&program, &SolverConfig::unbounded(), None).unwrap();
    assert_eq!(models.len(), 2);

    let c = |s: &str| Data::Const(s.to_string(), vec![]);
    for model in &models {
        let ca = model.lookup("color", &[c("a")]).unwrap();
        let cb = model.lookup("color", &[c("b")]).unwrap();
        assert_ne!(ca, cb);
    }
}

#[test]
fn open_world_possibility_enumerates_two_models() {
    let program = programs::open_world_possibility();
    let models = run(&program, &SolverConfig::unbounded(), None).unwrap();
    assert_eq!(models.len(), 2);

    let with_p = models.iter().filter(|m| m.all_facts().count() == 1).count();
    let without_p = models.iter().filter(|m| m.all_facts().count() == 0).count();
    assert_eq!(with_p, 1);
    assert_eq!(without_p, 1);
}

#[test]
fn inequality_pruning_removes_the_only_model() {
    let program = programs::inequality_pruning();
    let models = run(&program, &SolverConfig::unbounded(), None).unwrap();
    assert!(models.is_empty());
}

#[test]
fn registry_lookup_covers_every_advertised_name() {
    for name in programs::NAMES {
        assert!(programs::lookup(name).is_some(), "missing program {name}");
    }
    assert!(programs::lookup("no-such-program").is_none());
}
