//! Trading account walkthrough
//!
//! Run with `RUST_LOG=debug cargo run --example trading_account` to see every
//! applied and rejected operation. Pass a TOML file path as the first
//! argument to trade against configured quotes instead of the defaults.

use bigdecimal::BigDecimal;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use trading_ledger::{Account, PricingConfig, StaticPriceTable};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();

    println!("📈 Trading Ledger - Account Walkthrough\n");

    let prices = match std::env::args().nth(1) {
        Some(path) => Arc::new(PricingConfig::from_file(path)?.into_price_table()?),
        None => Arc::new(StaticPriceTable::default()),
    };
    println!("Quoted symbols: {}\n", prices.symbols().join(", "));

    let mut account = Account::new("test123", Some("Demo User".to_string()), Arc::clone(&prices));

    // 1. Fund the account and trade
    println!("💰 Recording operations...");
    account.deposit(BigDecimal::from(10000))?;
    println!("  ✓ Deposited 10000");

    for (symbol, quantity) in [("AAPL", 20), ("TSLA", 3)] {
        match account.buy(symbol, quantity) {
            Ok(txn) => println!("  ✓ Bought {quantity} {symbol} for {}", txn.amount),
            Err(err) => println!("  ✗ Buy {quantity} {symbol} rejected: {err}"),
        }
    }

    match account.sell("AAPL", 5) {
        Ok(txn) => println!("  ✓ Sold 5 AAPL for {}", txn.amount),
        Err(err) => println!("  ✗ Sell rejected: {err}"),
    }
    account.withdraw(BigDecimal::from(2000))?;
    println!("  ✓ Withdrew 2000");

    // 2. Rejected operations leave the account untouched
    println!("\n🚫 Attempting invalid operations...");
    if let Err(err) = account.withdraw(BigDecimal::from(1_000_000)) {
        println!("  ✗ {err}");
    }
    if let Err(err) = account.sell("GOOGL", 1) {
        println!("  ✗ {err}");
    }
    if let Err(err) = account.buy("UNKNOWN", 1) {
        println!("  ✗ {err}");
    }

    // 3. Valuation
    let summary = account.summary()?;
    println!("\n📊 {account}");
    println!("  Cash Balance:  {}", summary.cash_balance.with_scale(2));
    for holding in &summary.holdings {
        println!(
            "  {}: {} shares @ {} = {}",
            holding.symbol,
            holding.quantity,
            holding.price.with_scale(2),
            holding.market_value.with_scale(2)
        );
    }
    println!("  Total Equity:  {}", summary.total_equity.with_scale(2));
    println!("  Profit/Loss:   {}", summary.profit_loss.with_scale(2));

    // 4. Move the market; recorded prices stay as executed
    if prices.set_price("AAPL", BigDecimal::from(175)).is_ok() {
        println!("\n📉 AAPL re-quoted at 175");
        println!("  Portfolio Value: {}", account.portfolio_value()?.with_scale(2));
        println!("  Profit/Loss:     {}", account.profit_loss()?.with_scale(2));
    }

    // 5. Transaction log, newest first
    println!("\n🧾 Transaction Log:");
    for txn in account.list_transactions(None, None).iter().rev() {
        println!(
            "  {} | {:<8} | {:<5} | {:>4} | {:>8} | {}",
            txn.timestamp.format("%Y-%m-%d %H:%M:%S"),
            txn.kind,
            txn.symbol.as_deref().unwrap_or("-"),
            txn.quantity.map(|q| q.to_string()).unwrap_or_else(|| "-".to_string()),
            txn.price_per_share
                .as_ref()
                .map(|p| p.with_scale(2).to_string())
                .unwrap_or_else(|| "-".to_string()),
            txn.amount.with_scale(2)
        );
    }

    let report = account.validate_integrity();
    println!(
        "\n🔍 Ledger integrity: {}",
        if report.is_valid { "✅ Valid" } else { "❌ Invalid" }
    );
    for issue in &report.issues {
        println!("  - {issue}");
    }

    Ok(())
}
