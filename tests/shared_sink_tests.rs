//! Checking and compiling on several threads into one shared sink

use std::thread;
use whiley_cfa::{
    Compiler, Declaration, Error, Expression, Program, SharedSink, SourceSpan, Statement, Type,
};

fn program_for(worker: usize) -> Program {
    let at = SourceSpan::at(worker + 1, 1);
    if worker % 2 == 0 {
        Program::new(
            vec![Declaration::new("x", Type::SI8)],
            Statement::assign("x", Expression::number(worker as i64, at), at),
        )
    } else {
        Program::new(
            Vec::new(),
            Statement::assign("missing", Expression::number(0, at), at),
        )
    }
}

#[test]
fn test_workers_share_one_sink() {
    let sink = SharedSink::new();

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let mut sink = sink.clone();
            thread::spawn(move || {
                let mut program = program_for(worker);
                Compiler::default().compile(&mut program, &mut sink)
            })
        })
        .collect();

    let mut compiled = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.join().unwrap() {
            Ok(output) => {
                assert_eq!(output.stats.edges, 1);
                compiled += 1;
            }
            Err(Error::TypeCheckFailed { diagnostics }) => {
                assert_eq!(diagnostics.len(), 1);
                rejected += 1;
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(compiled, 4);
    assert_eq!(rejected, 4);

    let mut messages = sink.messages();
    messages.sort();
    assert_eq!(messages.len(), 4);
    assert!(messages.iter().all(|m| m.ends_with("'missing' not declared")));
    assert!(messages.contains(&"@2:1: 'missing' not declared".to_string()));
}
