//! Compile fuzz target: feed arbitrary bytes to the parser and verifier.
//! Neither pass may panic; both return diagnostics for bad input. Type
//! resolution is also run directly on the raw token stream, which exercises
//! bracket handling on sequences the parser would never produce.
//! Build with: cargo fuzz run compile_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    let _ = objdsl::compile(s);
    if let Ok(tokens) = objdsl::lexer::tokenize(s) {
        let _ = objdsl::resolve(&tokens.tokens);
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run compile_fuzz");
}
