//! Portal operations against the in-memory chain.

mod common;

use alloy::primitives::{Address, Bytes, U256};
use std::time::Duration;

use common::*;
use ether_portal::chain::Wallet;
use ether_portal::portal::types::TxStatus;
use ether_portal::portal::ErrorKind;

#[tokio::test]
async fn test_listing_reports_balances() {
    let chain = MockChain::new();
    let portal = portal_over(&chain).await;

    let accounts = portal.accounts_with_balances().await.unwrap();
    assert_eq!(accounts.len(), 3);
    assert_eq!(accounts[0].address, funding_address());
    assert_eq!(accounts[0].balance_ether, "100");
    assert_eq!(accounts[0].balance_wei, ether(100).to_string());
}

#[tokio::test]
async fn test_failed_balance_degrades_to_zero() {
    let chain = MockChain::new();
    let portal = portal_over(&chain).await;
    chain.fail_balance_of(Address::repeat_byte(0x33));

    let accounts = portal.accounts_with_balances().await.unwrap();
    assert_eq!(accounts.len(), 3);
    assert_eq!(accounts[2].balance_wei, "0");
    assert_eq!(accounts[1].balance_ether, "100");
}

#[tokio::test]
async fn test_failed_listing_is_unavailable() {
    let chain = MockChain::new();
    let portal = portal_over(&chain).await;
    chain.set_reachable(false);

    let err = portal.accounts_with_balances().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unavailable);
}

#[tokio::test]
async fn test_register_credits_default_amount() {
    let chain = MockChain::new();
    let portal = portal_over(&chain).await;
    let target = Address::repeat_byte(0x44);

    let registration = portal
        .register(&format!("{:#x}", target), None)
        .await
        .unwrap();

    assert_eq!(registration.address, target);
    assert_eq!(registration.credited_ether, "10");
    assert_eq!(registration.block_number, Some(1));
    assert_eq!(chain.balance_of(target), ether(10));
    assert_eq!(
        chain.balance_of(funding_address()),
        ether(90) - transfer_fee()
    );
}

#[tokio::test]
async fn test_register_twice_is_rejected() {
    let chain = MockChain::new();
    let portal = portal_over(&chain).await;
    let target = format!("{:#x}", Address::repeat_byte(0x44));

    portal.register(&target, Some("1")).await.unwrap();
    let err = portal.register(&target, Some("1")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AlreadyRegistered);
    assert_eq!(chain.sends(), 1);
}

#[tokio::test]
async fn test_register_validation_makes_no_chain_calls() {
    let chain = MockChain::new();
    let portal = portal_over(&chain).await;
    let valid = format!("{:#x}", Address::repeat_byte(0x44));

    for (address, amount) in [
        ("0x1234", None),
        ("not-an-address", Some("1")),
        (valid.as_str(), Some("0")),
        (valid.as_str(), Some("-5")),
        (valid.as_str(), Some("abc")),
        (valid.as_str(), Some("5000")),
    ] {
        let err = portal.register(address, amount).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "{address} {amount:?}");
    }

    assert!(chain.calls().is_empty(), "calls: {:?}", chain.calls());
}

#[tokio::test]
async fn test_register_underfunded_never_broadcasts() {
    let chain = MockChain::new();
    let portal = portal_over(&chain).await;
    chain.set_balance(funding_address(), ether(5));

    let err = portal
        .register(&format!("{:#x}", Address::repeat_byte(0x44)), Some("10"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
    assert_eq!(chain.sends(), 0);
}

#[tokio::test]
async fn test_login_reports_account_state() {
    let chain = MockChain::new();
    let portal = portal_over(&chain).await;
    let contract = Address::repeat_byte(0x55);
    chain.set_code(contract, Bytes::from_static(&[0x60, 0x80]));

    let info = portal.login(&format!("{:#x}", funding_address())).await.unwrap();
    assert_eq!(info.balance_ether, "100");
    assert_eq!(info.nonce, 0);
    assert!(!info.is_contract);

    let info = portal.login(&format!("{:#x}", contract)).await.unwrap();
    assert!(info.is_contract);
    assert_eq!(info.balance_wei, "0");
}

#[tokio::test]
async fn test_login_rejects_malformed_address() {
    let chain = MockChain::new();
    let portal = portal_over(&chain).await;

    let err = portal.login("0xnothex").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(chain.calls().is_empty());
}

#[tokio::test]
async fn test_transfer_moves_value() {
    let chain = MockChain::new();
    let portal = portal_over(&chain).await;
    let sender = address_of(SECOND_KEY);
    let recipient = Address::repeat_byte(0x66);

    let receipt = portal
        .transfer(SECOND_KEY, &format!("{:#x}", recipient), "2.5")
        .await
        .unwrap();

    assert_eq!(receipt.status, TxStatus::Success);
    assert_eq!(receipt.from, sender);
    assert_eq!(receipt.to, recipient);
    assert_eq!(receipt.value_ether, "2.5");
    assert_eq!(receipt.gas_used, TRANSFER_GAS);
    assert_eq!(receipt.transaction_index, Some(0));

    let value = ether(5) / U256::from(2);
    assert_eq!(chain.balance_of(recipient), value);
    assert_eq!(chain.balance_of(sender), ether(100) - value - transfer_fee());
}

#[tokio::test]
async fn test_transfer_uses_fresh_nonces() {
    let chain = MockChain::new();
    let portal = portal_over(&chain).await;
    let recipient = format!("{:#x}", Address::repeat_byte(0x66));

    portal.transfer(SECOND_KEY, &recipient, "1").await.unwrap();
    portal.transfer(SECOND_KEY, &recipient, "1").await.unwrap();

    let info = portal.login(&format!("{:#x}", address_of(SECOND_KEY))).await.unwrap();
    assert_eq!(info.nonce, 2);
    assert_eq!(chain.balance_of(Address::repeat_byte(0x66)), ether(2));
}

#[tokio::test]
async fn test_transfer_exceeding_balance_plus_fee_never_broadcasts() {
    let chain = MockChain::new();
    let portal = portal_over(&chain).await;

    // Exactly the balance: the fee pushes it over.
    let err = portal
        .transfer(SECOND_KEY, &format!("{:#x}", Address::repeat_byte(0x66)), "100")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
    assert_eq!(chain.sends(), 0);
    assert_eq!(chain.balance_of(address_of(SECOND_KEY)), ether(100));
}

#[tokio::test]
async fn test_transfer_validation_order_and_no_calls() {
    let chain = MockChain::new();
    let portal = portal_over(&chain).await;
    let recipient = format!("{:#x}", Address::repeat_byte(0x66));

    let bad_recipient = portal.transfer("garbage", "0x12", "abc").await.unwrap_err();
    assert!(bad_recipient.to_string().contains("address"));

    let bad_key = portal.transfer("garbage", &recipient, "abc").await.unwrap_err();
    assert!(bad_key.to_string().contains("private key"));
    assert!(!bad_key.to_string().contains("garbage"));

    let bad_amount = portal.transfer(SECOND_KEY, &recipient, "0").await.unwrap_err();
    assert_eq!(bad_amount.kind(), ErrorKind::Validation);

    assert!(chain.calls().is_empty());
}

#[tokio::test]
async fn test_create_account_funds_new_key() {
    let chain = MockChain::new();
    let portal = portal_over(&chain).await;

    let account = portal.create_account().await.unwrap();

    assert_eq!(account.balance_ether, "10");
    assert_eq!(chain.balance_of(account.address), ether(10));
    let restored = Wallet::from_private_key(&account.private_key).unwrap();
    assert_eq!(restored.address(), account.address);

    let login = portal.login(&format!("{:#x}", account.address)).await.unwrap();
    assert_eq!(login.balance_ether, "10");
    assert!(!serde_json::to_string(&login).unwrap().contains(&account.private_key[2..]));
}

#[tokio::test]
async fn test_created_account_can_transfer() {
    let chain = MockChain::new();
    let portal = portal_over(&chain).await;
    let account = portal.create_account().await.unwrap();

    let receipt = portal
        .transfer(&account.private_key, &format!("{:#x}", funding_address()), "1")
        .await
        .unwrap();
    assert_eq!(receipt.from, account.address);
}

#[tokio::test]
async fn test_block_lookup() {
    let chain = MockChain::new();
    let portal = portal_over(&chain).await;
    portal.create_account().await.unwrap();

    let latest = portal.block("latest").await.unwrap();
    assert_eq!(latest.number, 1);
    assert_eq!(latest.transaction_count, 1);
    assert_eq!(latest.gas_used, TRANSFER_GAS);

    let genesis = portal.block("0").await.unwrap();
    assert_eq!(genesis.number, 0);
    assert_eq!(latest.parent_hash, genesis.hash);
    assert_eq!(portal.block("0x1").await.unwrap(), latest);

    let serialized = serde_json::to_value(&genesis).unwrap();
    assert!(serialized["hash"].as_str().unwrap().starts_with("0x"));

    let missing = portal.block("99").await.unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::NotFound);

    let invalid = portal.block("tomorrow").await.unwrap_err();
    assert_eq!(invalid.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_transaction_lookup() {
    let chain = MockChain::new();
    let portal = portal_over(&chain).await;
    let account = portal.create_account().await.unwrap();
    let hash = format!("{:#x}", account.funding_transaction_hash);

    let info = portal.transaction(&hash).await.unwrap();
    assert_eq!(info.from, funding_address());
    assert_eq!(info.to, Some(account.address));
    assert_eq!(info.value_ether, "10");
    assert_eq!(info.status, TxStatus::Success);
    assert_eq!(info.gas_used, Some(TRANSFER_GAS));
    assert_eq!(info.nonce, 0);

    let unknown = format!("0x{}", "11".repeat(32));
    assert_eq!(
        portal.transaction(&unknown).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        portal.transaction("0xabc").await.unwrap_err().kind(),
        ErrorKind::Validation
    );
}

#[tokio::test]
async fn test_network_stats() {
    let chain = MockChain::new();
    let portal = portal_over(&chain).await;

    let stats = portal.network_stats().await.unwrap();
    assert_eq!(stats.block_number, 0);
    assert_eq!(stats.total_accounts, 3);
    assert_eq!(stats.chain_id, CHAIN_ID);
    assert_eq!(stats.gas_price_gwei, "20");
    assert_eq!(stats.gas_limit, 6_721_975);

    let overview = portal.overview().await.unwrap();
    assert_eq!(overview.stats, stats);
    assert_eq!(overview.accounts.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_unmined_transfer_times_out() {
    let chain = MockChain::new();
    let portal = portal_over(&chain).await;
    chain.set_mining(false);
    let start = tokio::time::Instant::now();

    let err = portal
        .transfer(SECOND_KEY, &format!("{:#x}", Address::repeat_byte(0x66)), "1")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert_eq!(chain.sends(), 1);
    assert!(start.elapsed() >= Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn test_pending_transaction_reports_pending() {
    let chain = MockChain::new();
    let portal = portal_over(&chain).await;
    chain.set_mining(false);

    let _ = portal
        .transfer(SECOND_KEY, &format!("{:#x}", Address::repeat_byte(0x66)), "1")
        .await;
    assert_eq!(chain.sends(), 1);

    let signer = Wallet::from_private_key(SECOND_KEY).unwrap();
    let signed = signer
        .sign_transfer(ether_portal::chain::wallet::TransferParams {
            to: Address::repeat_byte(0x66),
            value: ether(1),
            nonce: 0,
            gas_limit: TRANSFER_GAS,
            gas_price: GAS_PRICE,
            chain_id: CHAIN_ID,
        })
        .await
        .unwrap();

    let info = portal.transaction(&format!("{:#x}", signed.hash)).await.unwrap();
    assert_eq!(info.status, TxStatus::Pending);
    assert_eq!(info.block_number, None);
    assert_eq!(info.gas_used, None);
}
