//! Example usage of the alpha detection engine
//!
//! This example demonstrates:
//! 1. Building a coordinator from the default configuration
//! 2. Describing a market and its traders
//! 3. Running one decision cycle
//! 4. Example output format

use alpha_agents::{AlphaConfig, AlphaCoordinator};
use anyhow::Result;
use common::{MarketData, PositionData, TraderData};
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("🧭 Alpha Detection Engine - Example");
    info!("===================================");

    // Step 1: Create the coordinator
    let coordinator = AlphaCoordinator::new(AlphaConfig::default())?;
    let summary = coordinator.engine_summary();
    for analyzer in &summary.analyzers {
        info!("✅ {} registered (weight {:.1})", analyzer.name, analyzer.weight);
    }

    // Step 2: Example market and traders
    let market = create_example_market();
    let traders = create_example_traders();
    info!("📊 Market {:?} with {} traders", market.title, traders.len());

    // Step 3: Run the cycle
    let verdict = coordinator.analyze_market(market, traders, None).await?;

    // Step 4: Show the result
    info!("📋 Verdict");
    info!("  has_alpha:        {}", verdict.has_alpha);
    info!("  confidence:       {:.3}", verdict.confidence_score);
    info!("  strength:         {:?}", verdict.strength);
    info!("  recommended side: {:?}", verdict.recommended_side);
    for analysis in &verdict.agent_analyses {
        info!(
            "  {} → {} ({:.2}): {}",
            analysis.agent_name, analysis.vote, analysis.confidence, analysis.reasoning
        );
    }
    info!("  key traders:      {:?}", verdict.key_traders);
    info!("  risk factors:     {:?}", verdict.risk_factors);

    println!("{}", serde_json::to_string_pretty(&verdict)?);

    Ok(())
}

fn create_example_market() -> MarketData {
    MarketData {
        id: Some("fed-rate-cut-march".to_string()),
        title: Some("Will the Fed cut rates in March?".to_string()),
        category: Some("Economics".to_string()),
        status: Some("active".to_string()),
        total_volume: Some(2_400_000.0),
        total_liquidity: Some(380_000.0),
        end_date: Some("2026-12-20T19:00:00Z".to_string()),
    }
}

fn position(market_id: &str, outcome: &str, size: f64, entry: f64, value: f64) -> PositionData {
    PositionData {
        market_id: Some(market_id.to_string()),
        outcome_id: Some(outcome.to_string()),
        position_size_usd: Some(size),
        entry_price: Some(entry),
        current_value_usd: Some(value),
    }
}

fn trader(
    address: &str,
    portfolio: f64,
    success_rate: f64,
    resolved: u32,
    positions: Vec<PositionData>,
) -> TraderData {
    TraderData {
        address: Some(address.to_string()),
        total_portfolio_value_usd: Some(portfolio),
        positions,
        overall_success_rate: Some(success_rate),
        total_markets_traded: Some(resolved + 5),
        markets_resolved: Some(resolved),
    }
}

fn create_example_traders() -> Vec<TraderData> {
    let market = "fed-rate-cut-march";
    vec![
        trader(
            "0x7a16fa2c0d9f4b1e8c3b5d21e6f0a9c4b7d2e813",
            250_000.0,
            0.78,
            64,
            vec![
                position(market, "Yes", 45_000.0, 0.41, 52_000.0),
                position("eth-above-5k", "No", 12_000.0, 0.63, 10_500.0),
            ],
        ),
        trader(
            "0x3be0c41f5a8e2d7b9c6a1f0e4d3b2a1c9e8f7d6a",
            90_000.0,
            0.81,
            37,
            vec![position(market, "Yes", 18_000.0, 0.38, 21_400.0)],
        ),
        trader(
            "0xc29d8e7f6a5b4c3d2e1f0a9b8c7d6e5f4a3b2c1d",
            140_000.0,
            0.74,
            52,
            vec![
                position(market, "Yes", 21_000.0, 0.44, 23_100.0),
                position("nba-finals-game-7", "No", 6_000.0, 0.55, 4_800.0),
            ],
        ),
        trader(
            "0x91ab34cd56ef78a9b0c1d2e3f4a5b6c7d8e9f0a1",
            60_000.0,
            0.52,
            18,
            vec![position(market, "No", 4_000.0, 0.58, 3_600.0)],
        ),
    ]
}
