//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `easel_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("easel_core ping={}", easel_core::ping());
    println!("easel_core version={}", easel_core::core_version());
}
