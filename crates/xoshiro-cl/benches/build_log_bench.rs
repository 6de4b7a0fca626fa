use criterion::{Criterion, criterion_group, criterion_main};
use xoshiro_cl::{
    activate_first, find_compatible_platforms, format_log,
    kernels::program_sources,
    mock::{MockBackend, MockPlatform},
    BuildLog, ProgramBuilder,
};

fn bench_build(c: &mut Criterion) {
    let devices: Vec<String> = (0..16).map(|i| format!("dev{i}")).collect();
    let device_refs: Vec<&str> = devices.iter().map(String::as_str).collect();
    let backend = MockBackend::new()
        .with_platform(MockPlatform::new("gpu", "OpenCL 2.0").with_devices(&device_refs))
        .with_compiler(|_| Ok("warning: implicit conversion loses precision".to_owned()));
    let active = activate_first(&backend, find_compatible_platforms(&backend)).unwrap();
    let sources = program_sources();

    c.bench_function("build_embedded_sources_16_devices", |b| {
        b.iter(|| {
            let outcome = ProgramBuilder::new(&backend, &active).build(&sources);
            assert!(outcome.is_success());
        });
    });

    let log: BuildLog = devices
        .iter()
        .map(|d| (d.as_str(), "error: use of undeclared identifier 'x'"))
        .collect();
    c.bench_function("format_log_16_devices", |b| {
        b.iter(|| format_log(std::hint::black_box(&log)));
    });
}

criterion_group!(benches, bench_build);
criterion_main!(benches);
