use criterion::{black_box, criterion_group, criterion_main, Criterion};

use vpt::{Compiler, OptionState, RenderRequest};

fn compile_benchmark(c: &mut Criterion) {
    let mut state = OptionState::new();
    state.toggle("flipHorizontal");
    state.toggle("flipVertical");
    state.toggle("volumeUp50");
    state.toggle("volumeUp25");
    state.toggle("stereoToMono");
    state
        .arm_custom_rotation("12.5")
        .expect("valid angle");

    let compiler = Compiler::default();
    let request = RenderRequest::new("/videos/clip.mp4", state.snapshot());

    c.bench_function("compile_full_plan", |b| {
        b.iter(|| compiler.compile(black_box(&request)))
    });

    c.bench_function("command_line", |b| {
        let plan = compiler.compile(&request);
        b.iter(|| black_box(&plan).command_line())
    });
}

criterion_group!(benches, compile_benchmark);
criterion_main!(benches);
