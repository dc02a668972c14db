//! Generate a bcrypt hash for the bootstrap admin account.
//!
//! Usage:
//!     cargo run --bin generate_admin_hash
//!
//! Copy the output into `BOOTSTRAP_ADMIN_PASSWORD_HASH`.

use campus_voice_api::infrastructure::security::password::hash_password;
use std::io::{self, Write};

fn read_line(prompt: &str) -> io::Result<String> {
    print!("{}\n> ", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn main() -> anyhow::Result<()> {
    println!("\nCampus Voice admin password hash generator\n");

    let password = read_line("Enter the admin password:")?;
    if password.chars().count() < 6 {
        eprintln!("Error: password must be at least 6 characters");
        std::process::exit(1);
    }

    let confirm = read_line("Confirm password:")?;
    if password != confirm {
        eprintln!("Error: passwords do not match");
        std::process::exit(1);
    }

    println!("\nGenerating hash...\n");
    let hash = hash_password(&password)?;
    println!("BOOTSTRAP_ADMIN_PASSWORD_HASH=\"{}\"\n", hash);
    Ok(())
}
