//! Builds a small counting loop with the program builder, compiles it and
//! prints the automaton as text and JSON.
//!
//! ```text
//! si8 i;
//! i = 0;
//! while (i < 10) {
//!   assert (i < 10);
//!   i = i + 1;
//! }
//! ```
//!
//! Run with `cargo run --example compile_loop`.

use whiley_cfa::messaging::StderrSink;
use whiley_cfa::{BinaryOp, CompileOptions, Compiler, ProgramBuilder, SourceSpan, Type};

fn main() -> whiley_cfa::Result<()> {
    let at = SourceSpan::at;
    let mut b = ProgramBuilder::new();
    b.declare("i", Type::SI8);

    b.number(0, at(2, 5)).assign("i", at(2, 1))?;

    b.identifier("i", at(4, 11))
        .number(10, at(4, 15))
        .binary(BinaryOp::Lt, at(4, 11))?
        .assert(at(4, 3))?;
    b.identifier("i", at(5, 7))
        .number(1, at(5, 11))
        .binary(BinaryOp::Add, at(5, 7))?
        .assign("i", at(5, 3))?
        .sequence(at(4, 3))?;
    b.identifier("i", at(3, 8))
        .number(10, at(3, 12))
        .binary(BinaryOp::Lt, at(3, 8))?
        .while_stmt(at(3, 1))?
        .sequence(at(2, 1))?;

    let mut program = b.finish()?;
    println!("{}", program);

    let compiler = Compiler::new(CompileOptions::default());
    let output = compiler.compile(&mut program, &mut StderrSink)?;

    println!("{}", output.cfa);
    println!(
        "{} locations, {} edges, {} error location(s)",
        output.stats.locations, output.stats.edges, output.stats.error_locations
    );
    println!("{}", output.cfa.to_json()?);
    Ok(())
}
