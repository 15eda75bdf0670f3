//! End-to-end integration tests
//!
//! These tests drive the command layer the way the binary does: each step
//! parses a command line, opens the CSV store from disk, runs one command and
//! drops everything, so state only carries over through the store file.

#[cfg(test)]
mod tests {
    use bank_ledger::cli::{self, CliArgs, CommandError};
    use bank_ledger::{AccountStore, CsvFileStore, LedgerError};
    use clap::Parser;
    use rstest::{fixture, rstest};
    use rust_decimal_macros::dec;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct Workspace {
        _dir: TempDir,
        store: PathBuf,
    }

    #[fixture]
    fn workspace() -> Workspace {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = dir.path().join("accounts.csv");
        Workspace { _dir: dir, store }
    }

    /// Run one command line against the workspace store
    fn invoke(workspace: &Workspace, command: &[&str]) -> Result<String, CommandError> {
        let store = workspace.store.to_string_lossy().to_string();
        let mut argv = vec!["bank-ledger", "--store", store.as_str()];
        argv.extend_from_slice(command);

        let args = CliArgs::try_parse_from(argv).expect("Failed to parse arguments");
        let mut output = Vec::new();
        cli::run(&args, &mut output)?;
        Ok(String::from_utf8(output).expect("Output is not UTF-8"))
    }

    fn reopen(workspace: &Workspace) -> CsvFileStore {
        CsvFileStore::open(&workspace.store).expect("Failed to reopen store")
    }

    #[rstest]
    fn test_create_assigns_sequential_numbers(workspace: Workspace) {
        let first = invoke(&workspace, &["create", "Alice"]).unwrap();
        let second = invoke(&workspace, &["create", "Bob Smith"]).unwrap();

        assert!(first.contains("Your account number is : 100001"));
        assert!(second.contains("Your account number is : 100002"));

        let account = reopen(&workspace).find_by_number(100_001).unwrap().unwrap();
        assert_eq!(account.user_name, "Alice");
        assert_eq!(account.balance, dec!(0));
        assert_eq!(account.overdraft, dec!(0));
        assert!(account.is_active());
    }

    #[rstest]
    fn test_overdrawn_withdrawal_leaves_balance(workspace: Workspace) {
        invoke(&workspace, &["create", "Alice"]).unwrap();
        invoke(&workspace, &["deposit", "100001", "1000"]).unwrap();

        let error = invoke(&workspace, &["withdraw", "100001", "1200"]).unwrap_err();

        assert!(matches!(
            error.ledger_error(),
            Some(LedgerError::InsufficientFunds { .. })
        ));
        let account = reopen(&workspace).find_by_number(100_001).unwrap().unwrap();
        assert_eq!(account.balance, dec!(1000));
    }

    #[rstest]
    fn test_overdraft_funds_withdrawal(workspace: Workspace) {
        invoke(&workspace, &["create", "Alice"]).unwrap();
        invoke(&workspace, &["deposit", "100001", "1000"]).unwrap();
        invoke(&workspace, &["apply-overdraft", "100001"]).unwrap();

        let output = invoke(&workspace, &["withdraw", "100001", "1500"]).unwrap();

        assert!(output.contains("You withdrawn 1500"));
        let account = reopen(&workspace).find_by_number(100_001).unwrap().unwrap();
        assert_eq!(account.balance, dec!(0));
        assert_eq!(account.overdraft, dec!(500));
    }

    #[rstest]
    fn test_closed_account_stays_closed(workspace: Workspace) {
        invoke(&workspace, &["create", "Alice"]).unwrap();
        invoke(&workspace, &["deposit", "100001", "500"]).unwrap();

        let output = invoke(&workspace, &["close", "100001"]).unwrap();
        assert_eq!(output, "Alice, Your account has been closed.\n");

        let error = invoke(&workspace, &["deposit", "100001", "100"]).unwrap_err();
        assert_eq!(
            error.to_string(),
            "This account is closed! Not active anymore."
        );

        let account = reopen(&workspace).find_by_number(100_001).unwrap().unwrap();
        assert!(!account.is_active());
        assert_eq!(account.balance, dec!(500));
    }

    #[rstest]
    fn test_balance_report(workspace: Workspace) {
        invoke(&workspace, &["create", "Alice"]).unwrap();
        invoke(&workspace, &["deposit", "100001", "500"]).unwrap();
        invoke(&workspace, &["apply-overdraft", "100001"]).unwrap();
        invoke(&workspace, &["withdraw", "100001", "700"]).unwrap();

        let output = invoke(&workspace, &["balance", "100001"]).unwrap();

        assert_eq!(
            output,
            "Alice has\n  Balance : 0.00\n  Overdraft limit : 800.00\n  Total Balance : 800.00\n"
        );
    }

    #[rstest]
    #[case::balance(&["balance", "9999"])]
    #[case::deposit(&["deposit", "9999", "1000"])]
    #[case::apply_overdraft(&["apply-overdraft", "9999"])]
    #[case::withdraw(&["withdraw", "9999", "600"])]
    #[case::close(&["close", "9999"])]
    fn test_unknown_account(workspace: Workspace, #[case] command: &[&str]) {
        invoke(&workspace, &["create", "Alice"]).unwrap();

        let error = invoke(&workspace, command).unwrap_err();

        assert_eq!(error.to_string(), "Error! Can't find this account!");
    }

    #[rstest]
    fn test_rejected_name_creates_nothing(workspace: Workspace) {
        let long_name = "testrecord1".repeat(30);

        assert!(invoke(&workspace, &["create", ""]).is_err());
        assert!(invoke(&workspace, &["create", long_name.as_str()]).is_err());

        assert!(reopen(&workspace).all_accounts().is_empty());
    }

    #[rstest]
    fn test_custom_configuration(workspace: Workspace) {
        invoke(&workspace, &["--number-base", "500", "create", "Alice"]).unwrap();
        invoke(&workspace, &["deposit", "501", "10"]).unwrap();

        let output = invoke(
            &workspace,
            &["--overdraft-grant", "250", "apply-overdraft", "501"],
        )
        .unwrap();

        assert!(output.contains("Overdraft limit : 250.00"));
    }

    /// Run the compiled binary against the workspace store
    fn run_binary(workspace: &Workspace, command: &[&str]) -> std::process::Output {
        std::process::Command::new(env!("CARGO_BIN_EXE_bank-ledger"))
            .arg("--store")
            .arg(&workspace.store)
            .args(["--log-level", "off"])
            .args(command)
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to run bank-ledger")
    }

    #[rstest]
    fn test_binary_reports_errors_on_stderr(workspace: Workspace) {
        let created = run_binary(&workspace, &["create", "Alice"]);
        assert!(created.status.success());
        assert!(String::from_utf8_lossy(&created.stdout).contains("100001"));

        let missing = run_binary(&workspace, &["balance", "9999"]);

        assert_eq!(missing.status.code(), Some(1));
        assert!(missing.stdout.is_empty());
        assert_eq!(
            String::from_utf8_lossy(&missing.stderr),
            "Error: Error! Can't find this account!\n"
        );
    }

    #[rstest]
    fn test_corrupt_store_is_refused(workspace: Workspace) {
        std::fs::write(
            &workspace.store,
            "id,number,user_name,balance,overdraft,active,created,updated,version\n\
             1,100001,Alice,-50,0,true,,,1\n",
        )
        .unwrap();

        let error = invoke(&workspace, &["balance", "100001"]).unwrap_err();

        assert!(matches!(error, CommandError::Store(_)));
        assert!(error.to_string().contains("at line 2"));
    }
}
