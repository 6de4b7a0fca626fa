#![cfg(feature = "metrics")]

use once_cell::sync::Lazy;
use std::{collections::BTreeMap, sync::Mutex, time::Instant};

/* ───────────── Roh‑Latenzen ─────────────────────────── */

static TIMES: Lazy<Mutex<Vec<(&'static str, u128)>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Im Wrapper aufrufen: `record("build", Instant::now());`
pub fn record(name: &'static str, start: Instant) {
    let dur = start.elapsed().as_micros();
    if let Ok(mut times) = TIMES.lock() {
        times.push((name, dur));
    }
}

/// (Name, Anzahl, Mittelwert µs, p95 µs); leert den Puffer
pub fn drain_stats() -> Vec<(&'static str, usize, u128, u128)> {
    let mut map: BTreeMap<&'static str, Vec<u128>> = BTreeMap::new();
    if let Ok(mut times) = TIMES.lock() {
        for (name, us) in times.drain(..) {
            map.entry(name).or_default().push(us);
        }
    }

    map.into_iter()
        .map(|(name, mut v)| {
            v.sort_unstable();
            let mean = v.iter().sum::<u128>() / v.len() as u128;
            let p95 = v[((v.len() * 95) / 100).saturating_sub(1)];
            (name, v.len(), mean, p95)
        })
        .collect()
}

/* ───────────── Zusammenfassung ausgeben ─────────────── */

/// Am Programmende aufrufen, z. B. in `main()`
pub fn summary() {
    println!("── metrics summary ──");
    for (name, n, mean, p95) in drain_stats() {
        println!("{:<18} n={:>3} mean={:>7} µs   p95={:>7} µs", name, n, mean, p95);
    }
}
