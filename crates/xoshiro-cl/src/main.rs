use std::process::ExitCode;

use xoshiro_cl::{
    activate_first, describe_platforms, find_compatible_platforms, format_log,
    kernels::{program_sources, TEST_KERNEL},
    logger::{format_time, init_logger, utc_now},
    ClError, Config, OpenClBackend, ProgramBuilder,
};

#[cfg(feature = "metrics")]
use xoshiro_cl::summary;

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = init_logger(config.log_level) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let result = run(&config);

    #[cfg(feature = "metrics")]
    summary();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), ClError> {
    println!("Hello, world!! I'm xoshiro-opencl :) [{}]", format_time(&utc_now()));
    if config.show_kernels {
        println!("{TEST_KERNEL}");
    }

    /* ---------- 1. Plattform suchen ----------------------------- */
    let backend = OpenClBackend::new();
    let candidates = find_compatible_platforms(&backend);
    for line in describe_platforms(&candidates).lines() {
        println!("Found an OpenCL platform: {line}");
    }

    /* ---------- 2. Erste Plattform aktivieren ------------------- */
    let active = activate_first(&backend, candidates)?;
    let name = active
        .platform()
        .name()
        .unwrap_or_else(|_| "<unknown>".to_owned());
    println!("Now using {name} platform");

    /* ---------- 3. Kernel bauen --------------------------------- */
    let sources = program_sources();
    let (_program, log) = ProgramBuilder::new(&backend, &active)
        .options(config.build_options.as_str())
        .build(&sources)
        .into_result()?;

    if log.has_diagnostics() {
        println!("Build log:\n{}", format_log(&log));
    }
    println!("Built {} kernel source(s) with {:?}", sources.len(), config.build_options);

    // _program wird vor `active` freigegeben
    Ok(())
}
