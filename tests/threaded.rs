use std::sync::Arc;
use std::thread;

use guardrail::{Compiler, Conditional, Record, RuleSpec};

fn phone_rules() -> Conditional {
    Conditional::builder()
        .when(RuleSpec::new("type", "compare").option("value", 1_i64))
        .then(RuleSpec::new("phone", "match").option("pattern", "^7"))
        .build()
}

#[test]
fn concurrent_compilation_shares_one_sequence() {
    let compiler = Arc::new(Compiler::new());
    let conditional = Arc::new(phone_rules());

    let mut handles = vec![];
    for _ in 0..8 {
        let compiler = Arc::clone(&compiler);
        let conditional = Arc::clone(&conditional);
        handles.push(thread::spawn(move || {
            let record = Record::new("Profile").set("type", 1_i64).set("phone", "8999");
            compiler.compile(&record, conditional.when_rules()).unwrap()
        }));
    }

    let compiled: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for other in &compiled[1..] {
        assert!(Arc::ptr_eq(&compiled[0], other));
    }
    assert_eq!(compiler.cached_sets(), 1);
}

#[test]
fn concurrent_evaluation_is_consistent() {
    let compiler = Arc::new(Compiler::new());
    let conditional = Arc::new(phone_rules());

    let mut handles = vec![];

    // Half the threads evaluate a record the guard accepts, half one it
    // rejects; each thread must see only its own record's outcome.
    for i in 0..8 {
        let compiler = Arc::clone(&compiler);
        let conditional = Arc::clone(&conditional);
        handles.push(thread::spawn(move || {
            let type_value = if i % 2 == 0 { 1_i64 } else { 2_i64 };
            let mut record = Record::new("Profile")
                .set("type", type_value)
                .set("phone", "8999");
            conditional.validate(&mut record, &compiler).unwrap();
            (type_value, record.has_errors("phone"))
        }));
    }

    for handle in handles {
        let (type_value, phone_flagged) = handle.join().unwrap();
        assert_eq!(phone_flagged, type_value == 1);
    }
}
