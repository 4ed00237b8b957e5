//! Script and transaction payloads run by the fetcher.
//!
//! Both payloads are Cadence sources embedded at build time. The
//! enumeration script forces every register of the account to be read; the
//! cleanup transaction then removes the account's contracts so the reads
//! they trigger (code, capability links) are observed as well.

use std::collections::BTreeSet;

use ledgerlens_primitives::{Address, Value, ValueError};

use crate::engine::{Script, TransactionBody};

const ACCOUNT_INFO_SCRIPT: &str = include_str!("cadence/account_info.cdc");
const REMOVE_CONTRACTS_TRANSACTION: &str = include_str!("cadence/remove_contracts.cdc");

/// Build the account enumeration script for `address`.
pub fn account_info_script(address: Address) -> Result<Script, ValueError> {
    Ok(Script {
        code: ACCOUNT_INFO_SCRIPT.to_string(),
        arguments: vec![Value::Address(address).encode()?],
    })
}

/// Build the transaction that removes every contract of `address`.
///
/// Each distinct contract is imported first, in sorted order, so the
/// engine loads its code before removal.
pub fn remove_contracts_transaction(address: Address, contracts: &[String]) -> TransactionBody {
    let names: BTreeSet<&str> = contracts.iter().map(String::as_str).collect();
    let from = address.hex_with_prefix();

    let mut script = String::new();
    for name in names {
        script.push_str(&format!("import {name} from {from}\n"));
    }
    script.push_str(REMOVE_CONTRACTS_TRANSACTION);

    TransactionBody {
        script,
        arguments: Vec::new(),
        authorizers: vec![address],
    }
}
