use xoshiro_cl::{
    activate_first, find_compatible_platforms, format_log,
    mock::{MockBackend, MockPlatform},
    program::{DEFAULT_BUILD_OPTIONS, HOST_DEVICE},
    BuildOutcome, ClError, ProgramBuilder,
};

fn backend() -> MockBackend {
    MockBackend::new().with_platform(
        MockPlatform::new("gpu", "OpenCL 2.0").with_devices(&["dev1", "dev2"]),
    )
}

/// Scheitert, wenn `undefined_fn` aufgerufen, aber nirgends definiert wird.
fn symbol_checking_compiler(src: &str) -> Result<String, String> {
    if src.contains("undefined_fn(") && !src.contains("void undefined_fn(") {
        Err("error: implicit declaration of function 'undefined_fn'".to_owned())
    } else if src.contains("unused") {
        Ok("warning: unused variable 'x'".to_owned())
    } else {
        Ok(String::new())
    }
}

const GOOD: &str = "kernel void a(global int *x) { x[0] = 1; }\n";
const CALLS_UNDEFINED: &str = "kernel void b(global int *x) { x[0] = undefined_fn(); }\n";

#[test]
fn clean_source_builds() {
    let backend = backend();
    let active = activate_first(&backend, find_compatible_platforms(&backend)).unwrap();

    let outcome = ProgramBuilder::new(&backend, &active).build(&[GOOD]);
    assert!(outcome.is_success());
    let program = outcome.program().unwrap();
    assert!(program.is_built());
    assert_eq!(program.options(), DEFAULT_BUILD_OPTIONS);
    assert_eq!(outcome.log().len(), 2);
}

#[test]
fn fragments_are_compiled_as_one_unit_in_order() {
    let backend = backend();
    let active = activate_first(&backend, find_compatible_platforms(&backend)).unwrap();

    let outcome = ProgramBuilder::new(&backend, &active).build(&["first;", "second;"]);
    assert_eq!(outcome.program().unwrap().source(), "first;second;");
}

#[test]
fn undefined_symbol_in_second_fragment_fails_with_log() {
    let backend = backend().with_compiler(symbol_checking_compiler);
    let active = activate_first(&backend, find_compatible_platforms(&backend)).unwrap();

    let outcome = ProgramBuilder::new(&backend, &active).build(&[GOOD, CALLS_UNDEFINED]);
    assert!(!outcome.is_success());
    assert!(outcome.program().is_none());

    let text = format_log(outcome.log());
    assert!(!text.is_empty());
    assert_eq!(
        text,
        "error: implicit declaration of function 'undefined_fn'\n\
         error: implicit declaration of function 'undefined_fn'\n"
    );
}

#[test]
fn success_keeps_warnings_in_log() {
    let backend = backend().with_compiler(symbol_checking_compiler);
    let active = activate_first(&backend, find_compatible_platforms(&backend)).unwrap();

    let outcome = ProgramBuilder::new(&backend, &active).build(&["// unused\n", GOOD]);
    assert!(outcome.is_success());
    assert!(outcome.log().has_diagnostics());
    assert!(format_log(outcome.log()).starts_with("warning: unused"));
}

#[test]
fn failed_build_releases_program_exactly_once() {
    let backend = backend();
    let ledger = backend.ledger();
    let active = activate_first(&backend, find_compatible_platforms(&backend)).unwrap();

    let outcome = ProgramBuilder::new(&backend, &active).build(&["#error broken kernel\n"]);
    assert!(matches!(outcome, BuildOutcome::Failed { .. }));
    assert_eq!(ledger.created(), 1);
    assert_eq!(ledger.released(), 1);

    // kein Programm mehr da, Drop des Ergebnisses gibt nichts frei
    drop(outcome);
    assert_eq!(ledger.released(), 1);
    assert_eq!(ledger.live(), 0);
}

#[test]
fn successful_program_is_released_on_drop() {
    let backend = backend();
    let ledger = backend.ledger();
    let active = activate_first(&backend, find_compatible_platforms(&backend)).unwrap();

    let outcome = ProgramBuilder::new(&backend, &active).build(&[GOOD]);
    assert_eq!(ledger.live(), 1);

    let (program, _log) = outcome.into_result().unwrap();
    assert_eq!(ledger.live(), 1);
    drop(program);
    assert_eq!(ledger.released(), 1);
    assert_eq!(ledger.live(), 0);
}

#[test]
fn program_is_released_when_a_later_step_fails() {
    fn later_step_fails(backend: &MockBackend) -> Result<(), ClError> {
        let active = activate_first(backend, find_compatible_platforms(backend))?;
        let (_program, _log) = ProgramBuilder::new(backend, &active)
            .build(&[GOOD])
            .into_result()?;
        Err(ClError::Api(-48))
    }

    let backend = backend();
    let ledger = backend.ledger();
    assert!(later_step_fails(&backend).is_err());
    assert_eq!(ledger.created(), 1);
    assert_eq!(ledger.live(), 0);
}

#[test]
fn into_result_turns_failure_into_build_error() {
    let backend = backend();
    let active = activate_first(&backend, find_compatible_platforms(&backend)).unwrap();

    let err = ProgramBuilder::new(&backend, &active)
        .build(&["#error nope\n"])
        .into_result()
        .err()
        .unwrap();
    match err {
        ClError::Build(log) => assert_eq!(log, "error: nope\nerror: nope\n"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_fragment_list_is_a_failure_not_a_panic() {
    let backend = backend();
    let ledger = backend.ledger();
    let active = activate_first(&backend, find_compatible_platforms(&backend)).unwrap();

    let outcome = ProgramBuilder::new(&backend, &active).build(&[]);
    assert!(!outcome.is_success());
    let entry = outcome.log().iter().next().unwrap();
    assert_eq!(entry.device, HOST_DEVICE);
    assert!(entry.text.contains("-30"));
    assert_eq!(ledger.created(), 0);
}

#[test]
fn silent_failure_gets_host_diagnostic() {
    let backend = backend().with_compiler(|_| Err(String::new()));
    let active = activate_first(&backend, find_compatible_platforms(&backend)).unwrap();

    let outcome = ProgramBuilder::new(&backend, &active).build(&[GOOD]);
    assert!(!outcome.is_success());
    assert!(outcome.log().has_diagnostics());
    let last = outcome.log().iter().last().unwrap();
    assert_eq!(last.device, HOST_DEVICE);
    assert!(last.text.contains("-11"));
}

#[test]
fn custom_build_options_reach_the_backend() {
    let backend = backend();
    let active = activate_first(&backend, find_compatible_platforms(&backend)).unwrap();

    let builder = ProgramBuilder::new(&backend, &active).options("-cl-std=CL3.0 -Werror");
    assert_eq!(builder.build_options(), "-cl-std=CL3.0 -Werror");
    let outcome = builder.build(&[GOOD]);
    assert_eq!(outcome.program().unwrap().options(), "-cl-std=CL3.0 -Werror");
}
