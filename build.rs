#![allow(clippy::exit, clippy::unwrap_used)]
fn main() {
    // Logging costs flash and SPI time; release images ship without it.
    if std::env::var("PROFILE").unwrap_or_default() == "release" {
        println!("cargo:rustc-env=DEFMT_LOG=off");
    }

    explain_link_errors();
    println!("cargo:rustc-link-arg=-Tdefmt.x");
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}

/// Registers this build script as the linker's error-handling script, so
/// common undefined symbols come with a hint instead of a bare name.
fn explain_link_errors() {
    let args: Vec<String> = std::env::args().collect();
    if let [_, kind, what, ..] = args.as_slice() {
        if kind != "undefined-symbol" {
            std::process::exit(1);
        }
        let hint = match what.as_str() {
            "_defmt_timestamp" => Some(
                "`defmt` not found - check that `defmt.x` is a linker script and `esp_println` is linked in",
            ),
            "_stack_start" => Some("Is the linker script `linkall.x` missing?"),
            "esp_rtos_initialized" | "esp_rtos_yield_task" | "esp_rtos_task_create" => {
                Some("No scheduler running - call `esp_rtos::start` before spawning tasks")
            }
            _ => None,
        };
        if let Some(hint) = hint {
            eprintln!();
            eprintln!("💡 {hint}");
            eprintln!();
        }
        std::process::exit(0);
    }

    println!(
        "cargo:rustc-link-arg=-Wl,--error-handling-script={}",
        std::env::current_exe().unwrap().display()
    );
}
