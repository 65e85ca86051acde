// src/services/screener.rs
use anyhow::{bail, Result};
use log::debug;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::{Candidate, Holding, OptionChain, RawPosition};

/// Contracts expiring outside this window are never written against.
pub const DTE_MIN: i64 = 1;
pub const DTE_MAX: i64 = 14;

#[derive(Debug, Clone)]
pub struct ScreenerConfig {
    /// Inclusive bounds on |delta|.
    pub delta_min: f64,
    pub delta_max: f64,
    /// How many ranked candidates to keep per symbol.
    pub max_candidates: usize,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        ScreenerConfig {
            delta_min: 0.10,
            delta_max: 0.30,
            max_candidates: 5,
        }
    }
}

/// Reduce raw account positions to coverable equity holdings: equities
/// with at least one round lot, share counts floored to the lot boundary.
/// Keyed by symbol; a duplicate symbol overwrites the earlier record.
pub fn extract_holdings(positions: &[RawPosition]) -> BTreeMap<String, Holding> {
    let mut holdings = BTreeMap::new();
    for pos in positions {
        if pos.instrument.asset_type != "EQUITY" {
            continue;
        }
        let quantity = pos.long_quantity as i64;
        if quantity < 100 {
            continue;
        }
        holdings.insert(
            pos.instrument.symbol.clone(),
            Holding {
                shares: (quantity / 100) * 100,
                avg_price: pos.average_price,
                market_value: pos.market_value,
                gain_loss: pos.long_open_profit_loss,
            },
        );
    }
    holdings
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Walk the call side of an option chain and rank short-call candidates
/// for a holding of `shares` (already a round-lot multiple).
///
/// Expiration keys and strike keys are visited in ascending order so the
/// result is deterministic regardless of upstream JSON key order. Only the
/// first contract listed under each strike is considered; later variants
/// (non-standard option classes) are ignored.
pub fn screen_chain(chain: &OptionChain, shares: i64, cfg: &ScreenerConfig) -> Result<Vec<Candidate>> {
    let price = chain.underlying_price;
    if price <= 0.0 {
        bail!("invalid underlying price {}", price);
    }
    let contracts = shares / 100;

    let mut exp_keys: Vec<&String> = chain.call_exp_date_map.keys().collect();
    exp_keys.sort();

    let mut candidates = Vec::new();
    for exp_key in exp_keys {
        let strikes = &chain.call_exp_date_map[exp_key];
        let mut strike_keys: Vec<&String> = strikes.keys().collect();
        strike_keys.sort_by(|a, b| match (a.parse::<f64>(), b.parse::<f64>()) {
            (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => a.cmp(b),
        });

        for strike_key in strike_keys {
            let contract = match strikes[strike_key].first() {
                Some(c) => c,
                None => continue,
            };

            let delta = contract.delta.abs();
            let dte = contract.days_to_expiration;
            let bid = contract.bid;
            let strike = contract.strike_price;

            if delta < cfg.delta_min || delta > cfg.delta_max {
                continue;
            }
            // The DTE window starts at 1, so the ratios below never divide by zero.
            if !(DTE_MIN..=DTE_MAX).contains(&dte) {
                continue;
            }
            if bid <= 0.0 {
                continue;
            }

            let weekly_return = (bid / price) * (7.0 / dte as f64) * 100.0;
            let annualized_return = (bid / price) * (365.0 / dte as f64) * 100.0;
            let total_premium = bid * contracts as f64 * 100.0;
            let otm_dollar = strike - price;
            let otm_pct = (otm_dollar / price) * 100.0;

            candidates.push(Candidate {
                strike,
                exp: exp_key.split(':').next().unwrap_or(exp_key).to_string(),
                dte,
                delta: round_to(delta, 3),
                bid,
                weekly_pct: round_to(weekly_return, 2),
                annualized_pct: round_to(annualized_return, 2),
                total_premium: round_to(total_premium, 0),
                otm_dollar: round_to(otm_dollar, 2),
                otm_pct: round_to(otm_pct, 2),
            });
        }
    }

    debug!("{} contracts passed the screen before truncation", candidates.len());

    // Best weekly yield first; equal yields order by strike ascending.
    candidates.sort_by(|a, b| {
        b.weekly_pct
            .partial_cmp(&a.weekly_pct)
            .unwrap_or(Ordering::Equal)
            .then(a.strike.partial_cmp(&b.strike).unwrap_or(Ordering::Equal))
    });
    candidates.truncate(cfg.max_candidates);

    Ok(candidates)
}
