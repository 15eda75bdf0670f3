//! Bank Ledger CLI
//!
//! Command-line interface for opening and operating bank accounts stored in
//! a CSV file.
//!
//! # Usage
//!
//! ```bash
//! bank-ledger create "John Smith"
//! bank-ledger deposit 100001 1000
//! bank-ledger apply-overdraft 100001
//! bank-ledger withdraw 100001 1500
//! bank-ledger balance 100001
//! bank-ledger close 100001
//! bank-ledger --store /var/lib/bank/accounts.csv balance 100001
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (unknown or closed account, rejected operation, unreadable store, etc.)

use bank_ledger::cli;
use std::process;

fn main() {
    let args = cli::parse_args();
    cli::logging::init(&args.log_level);

    let mut output = std::io::stdout();
    if let Err(e) = cli::run(&args, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
