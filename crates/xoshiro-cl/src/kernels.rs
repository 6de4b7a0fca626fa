//! Zur Compile‑Zeit eingebettete Kernel‑Quellen.

/// Setzt eine programmweite globale Variable, Kernel ohne Argumente
pub const UPDATE_GLOBAL: &str = r#"
    global int globalA;
    kernel void updateGlobal()
    {
        globalA = 75;
    }
"#;

pub const TEST_KERNEL: &str = include_str!("../resources/kernels/test_kernel.cl");

pub const XOSHIRO256SS: &str = include_str!("../resources/kernels/xoshiro256starstar.cl");

/// Alle Fragmente in Build‑Reihenfolge
pub fn program_sources() -> Vec<&'static str> {
    vec![UPDATE_GLOBAL, TEST_KERNEL, XOSHIRO256SS]
}
