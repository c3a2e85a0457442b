//! Implementation of the `keylock list` command.

use keylock::config::Config;
use keylock::error::Result;
use keylock::exit_codes;
use keylock::LockKey;

/// Execute the `keylock list` command.
pub fn cmd_list(config: &Config) -> Result<i32> {
    let store = config.file_store()?;
    let claims = store.list()?;

    if claims.is_empty() {
        println!("No held locks in {}.", store.dir().display());
        return Ok(exit_codes::SUCCESS);
    }

    println!("Held locks ({}):", claims.len());
    println!();

    for claim in &claims {
        let name = LockKey::from_store_key(&claim.key)
            .map(|key| key.name().to_string())
            .unwrap_or_else(|| claim.key.clone());

        println!("  {}:", name);
        println!("    Owner:      {}", claim.record.owner);
        if let Some(pid) = claim.record.pid {
            println!("    PID:        {}", pid);
        }
        println!("    Created:    {}", claim.record.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
        println!("    Age:        {}", claim.record.age_string());
        if claim.is_expired {
            println!("    Status:     EXPIRED (reclaimed by the next acquirer)");
        } else {
            println!("    Expires in: {}", claim.record.remaining_string());
        }
        println!("    Path:       {}", claim.path.display());
        println!();
    }

    let expired = claims.iter().filter(|c| c.is_expired).count();
    if expired > 0 {
        println!(
            "Note: {} lock(s) have expired. Use `keylock release <KEY> --force` to remove them now.",
            expired
        );
    }

    Ok(exit_codes::SUCCESS)
}
