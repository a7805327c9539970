//! Generate a bcrypt hash for the admin password.
//!
//! The output line goes into .env as ADMIN_HASH_PASSWORD so the plain
//! password never has to be set in the environment.

use bcrypt::{hash, DEFAULT_COST};
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let Some(password) = env::args().nth(1) else {
        eprintln!("Usage: cargo run --bin hash-password <PASSWORD>");
        return ExitCode::FAILURE;
    };

    match hash(&password, DEFAULT_COST) {
        Ok(hashed) => {
            println!("# bcrypt cost {}", DEFAULT_COST);
            println!("ADMIN_HASH_PASSWORD={}", hashed);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error hashing password: {}", e);
            ExitCode::FAILURE
        }
    }
}
