//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `criminalintent_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use criminalintent_core::{CrimeLab, CrimeRepository, InMemoryCrimeRepository, RepoResult};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!(
        "criminalintent_core version={}",
        criminalintent_core::core_version()
    );

    match run_smoke(&CrimeLab::new(InMemoryCrimeRepository::new())) {
        Ok(count) => {
            println!("criminalintent_core smoke=ok crimes={count}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("criminalintent_core smoke=error error={err}");
            ExitCode::FAILURE
        }
    }
}

fn run_smoke<R: CrimeRepository>(lab: &CrimeLab<R>) -> RepoResult<usize> {
    let mut crime = lab.new_crime()?;
    crime.title = Some("Crime #0".to_string());
    crime.solved = true;
    lab.update_crime(&crime)?;
    lab.delete_crime(crime.id)?;
    lab.crime_count()
}
