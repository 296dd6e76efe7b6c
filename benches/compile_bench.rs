use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use whiley_cfa::messaging::CapturingSink;
use whiley_cfa::{
    BinaryOp, CfaCompiler, Compiler, Declaration, Expression, Program, SourceSpan, Statement,
    Type, TypeChecker,
};

/// `depth` nested loops, each body an if/else with an assertion
fn nested_program(depth: usize) -> Program {
    let at = SourceSpan::at(1, 1);
    let i = || Expression::identifier("i", at);
    let cond = || Expression::binary(BinaryOp::Lt, i(), Expression::number(10, at), at);
    let step = || {
        Statement::assign(
            "i",
            Expression::binary(BinaryOp::Add, i(), Expression::number(1, at), at),
            at,
        )
    };

    let mut body = Statement::assert(cond(), at);
    for _ in 0..depth {
        let branch = Statement::if_else(cond(), body, Statement::skip(at), at);
        body = Statement::while_loop(cond(), Statement::sequence(branch, step(), at), at);
    }
    Program::new(vec![Declaration::new("i", Type::SI8)], body)
}

fn check_benchmark(c: &mut Criterion) {
    let program = nested_program(32);

    c.bench_function("type check nested program", |b| {
        b.iter(|| {
            let mut program = program.clone();
            let mut sink = CapturingSink::new();
            TypeChecker::new(&mut sink).check_program(black_box(&mut program))
        })
    });
}

fn lower_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("lower");
    for depth in [8, 32, 128] {
        let program = nested_program(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &program, |b, p| {
            b.iter(|| CfaCompiler::new().compile(black_box(p)).unwrap())
        });
    }
    group.finish();
}

fn pipeline_benchmark(c: &mut Criterion) {
    let program = nested_program(32);

    c.bench_function("check, lower and validate", |b| {
        b.iter(|| {
            let mut program = program.clone();
            let mut sink = CapturingSink::new();
            Compiler::default()
                .compile(black_box(&mut program), &mut sink)
                .unwrap()
        })
    });
}

criterion_group!(benches, check_benchmark, lower_benchmark, pipeline_benchmark);
criterion_main!(benches);
