//! A small, fixed registry of built-in programs, hand-built directly
//! against the §3 data model. This stands in for the external
//! declaration-to-rule compiler (out of scope for this crate) so the
//! CLI and integration tests have runnable programs.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::database::Database;
use crate::database::InsertOutcome;
use crate::rules::{InternalConclusion, InternalPartialRule, Premise, Program, Proposition};
use crate::term::{Data, Pattern, Substitution};

fn c(name: &str) -> Pattern {
    Pattern::Const(name.to_string(), vec![])
}

fn cd(name: &str) -> Data {
    Data::Const(name.to_string(), vec![])
}

fn v(name: &str) -> Pattern {
    Pattern::Var(name.to_string())
}

fn shared(names: &[&str]) -> FxHashSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn seed_fact(db: Database, name: &str, args: Vec<Data>, values: Vec<Data>) -> Database {
    match db.insert_fact(name, args, values) {
        InsertOutcome::Inserted(next) => next,
        InsertOutcome::Redundant => db,
        InsertOutcome::Inconsistent(e) => panic!("seed fact conflict: {e}"),
    }
}

/// Scenario A: transitive path over a hand-seeded edge relation.
///
/// `path X Y :- edge X Y.`
/// `path X Z :- edge X Y, path Y Z.`
pub fn edge_path() -> Program {
    let db = Database::new();
    let db = seed_fact(db, "edge", vec![cd("a"), cd("b")], vec![]);
    let db = seed_fact(db, "edge", vec![cd("b"), cd("c")], vec![]);
    let db = seed_fact(db, "edge", vec![cd("c"), cd("d")], vec![]);

    let mut rules = FxHashMap::default();
    let mut conclusions = FxHashMap::default();

    rules.insert(
        "path_base_r0".to_string(),
        InternalPartialRule {
            premise: Premise::Proposition(Proposition::new(
                "edge",
                vec![v("X"), v("Y")],
                vec![],
            )),
            shared: shared(&[]),
            next: vec!["path_base_concl".to_string()],
        },
    );
    conclusions.insert(
        "path_base_concl".to_string(),
        InternalConclusion::NewFact {
            head_name: "path".to_string(),
            arg_patterns: vec![v("X"), v("Y")],
            value_patterns: vec![vec![]],
            exhaustive: true,
        },
    );

    rules.insert(
        "path_trans_r0".to_string(),
        InternalPartialRule {
            premise: Premise::Proposition(Proposition::new(
                "edge",
                vec![v("X"), v("Y")],
                vec![],
            )),
            shared: shared(&[]),
            next: vec!["path_trans_r1".to_string()],
        },
    );
    rules.insert(
        "path_trans_r1".to_string(),
        InternalPartialRule {
            premise: Premise::Proposition(Proposition::new(
                "path",
                vec![v("Y"), v("Z")],
                vec![],
            )),
            shared: shared(&["Y"]),
            next: vec!["path_trans_concl".to_string()],
        },
    );
    conclusions.insert(
        "path_trans_concl".to_string(),
        InternalConclusion::NewFact {
            head_name: "path".to_string(),
            arg_patterns: vec![v("X"), v("Z")],
            value_patterns: vec![vec![]],
            exhaustive: true,
        },
    );

    let db = db.extend_prefix("path_base_r0", Substitution::new());
    let db = db.extend_prefix("path_trans_r0", Substitution::new());

    Program::new(rules, conclusions, db)
}

/// Scenario B: two zero-premise rules assert conflicting values for the
/// same functional key. Expected: zero saturated models.
pub fn functional_inconsistency() -> Program {
    let mut conclusions = FxHashMap::default();
    conclusions.insert(
        "home_uplands".to_string(),
        InternalConclusion::NewFact {
            head_name: "home".to_string(),
            arg_patterns: vec![c("celeste")],
            value_patterns: vec![vec![c("uplands")]],
            exhaustive: true,
        },
    );
    conclusions.insert(
        "home_doghouse".to_string(),
        InternalConclusion::NewFact {
            head_name: "home".to_string(),
            arg_patterns: vec![c("celeste")],
            value_patterns: vec![vec![c("doghouse")]],
            exhaustive: true,
        },
    );

    let db = Database::new()
        .extend_prefix("home_uplands", Substitution::new())
        .extend_prefix("home_doghouse", Substitution::new());

    Program::new(FxHashMap::default(), conclusions, db)
}

/// Scenario C: exhaustive choice `color X = { red, blue }` for two
/// independent things. Expected: four saturated models.
pub fn choice() -> Program {
    let db = Database::new();
    let db = seed_fact(db, "thing", vec![cd("a")], vec![]);
    let db = seed_fact(db, "thing", vec![cd("b")], vec![]);

    let mut rules = FxHashMap::default();
    let mut conclusions = FxHashMap::default();

    rules.insert(
        "color_r0".to_string(),
        InternalPartialRule {
            premise: Premise::Proposition(Proposition::new("thing", vec![v("X")], vec![])),
            shared: shared(&[]),
            next: vec!["color_concl".to_string()],
        },
    );
    conclusions.insert(
        "color_concl".to_string(),
        InternalConclusion::NewFact {
            head_name: "color".to_string(),
            arg_patterns: vec![v("X")],
            value_patterns: vec![vec![c("red")], vec![c("blue")]],
            exhaustive: true,
        },
    );

    let db = db.extend_prefix("color_r0", Substitution::new());
    Program::new(rules, conclusions, db)
}

/// Scenario D: scenario C plus a constraint forbidding `color a = color
/// b`. Expected: two saturated models.
pub fn choice_with_constraint() -> Program {
    let mut program = choice();

    program.rules.insert(
        "distinct_r0".to_string(),
        InternalPartialRule {
            premise: Premise::Proposition(Proposition::new(
                "color",
                vec![c("a")],
                vec![v("V")],
            )),
            shared: shared(&[]),
            next: vec!["distinct_r1".to_string()],
        },
    );
    program.rules.insert(
        "distinct_r1".to_string(),
        InternalPartialRule {
            premise: Premise::Proposition(Proposition::new(
                "color",
                vec![c("b")],
                vec![v("V")],
            )),
            shared: shared(&["V"]),
            next: vec!["distinct_concl".to_string()],
        },
    );
    program
        .conclusions
        .insert("distinct_concl".to_string(), InternalConclusion::Contradiction);

    program.db = program.db.extend_prefix("distinct_r0", Substitution::new());
    program
}

/// Scenario E: a single non-exhaustive, zero-premise possibility.
/// Expected: two saturated models (`p = false` present or absent).
pub fn open_world_possibility() -> Program {
    let mut conclusions = FxHashMap::default();
    conclusions.insert(
        "p_possible".to_string(),
        InternalConclusion::NewFact {
            head_name: "p".to_string(),
            arg_patterns: vec![],
            value_patterns: vec![vec![c("false")]],
            exhaustive: false,
        },
    );
    let db = Database::new().extend_prefix("p_possible", Substitution::new());
    Program::new(FxHashMap::default(), conclusions, db)
}

/// Scenario F: two facts in the same functional relation with distinct
/// keys, plus a constraint comparing the two keys via `Inequality`.
/// Expected: the database is pruned.
pub fn inequality_pruning() -> Program {
    let db = Database::new();
    let db = seed_fact(db, "in", vec![cd("c1")], vec![cd("doghouse")]);
    let db = seed_fact(db, "in", vec![cd("c2")], vec![cd("doghouse")]);

    let mut rules = FxHashMap::default();
    let mut conclusions = FxHashMap::default();

    rules.insert(
        "r0".to_string(),
        InternalPartialRule {
            premise: Premise::Proposition(Proposition::new(
                "in",
                vec![v("X")],
                vec![c("doghouse")],
            )),
            shared: shared(&[]),
            next: vec!["r1".to_string()],
        },
    );
    rules.insert(
        "r1".to_string(),
        InternalPartialRule {
            premise: Premise::Proposition(Proposition::new(
                "in",
                vec![v("Y")],
                vec![c("doghouse")],
            )),
            shared: shared(&["X"]),
            next: vec!["r2".to_string()],
        },
    );
    rules.insert(
        "r2".to_string(),
        InternalPartialRule {
            premise: Premise::Inequality {
                a: v("X"),
                b: v("Y"),
            },
            shared: shared(&["X", "Y"]),
            next: vec!["r3".to_string()],
        },
    );
    conclusions.insert("r3".to_string(), InternalConclusion::Contradiction);

    let db = db.extend_prefix("r0", Substitution::new());
    Program::new(rules, conclusions, db)
}

/// Looks up a built-in program by name, for the CLI and for tests that
/// want to exercise the registry itself.
pub fn lookup(name: &str) -> Option<Program> {
    match name {
        "edge-path" => Some(edge_path()),
        "functional-inconsistency" => Some(functional_inconsistency()),
        "choice" => Some(choice()),
        "choice-with-constraint" => Some(choice_with_constraint()),
        "open-world-possibility" => Some(open_world_possibility()),
        "inequality-pruning" => Some(inequality_pruning()),
        _ => None,
    }
}

/// Names of every built-in program, in a stable order (used by the CLI
/// to print usage).
pub const NAMES: &[&str] = &[
    "edge-path",
    "functional-inconsistency",
    "choice",
    "choice-with-constraint",
    "open-world-possibility",
    "inequality-pruning",
];
