// src/services/prompt.rs
use crate::models::{Candidate, Holding};

/// Render the covered-call advice prompt: a position summary, one line per
/// ranked candidate, and the verdict instruction.
pub fn build_prompt(symbol: &str, holding: &Holding, price: f64, candidates: &[Candidate]) -> String {
    let contracts = holding.shares / 100;

    let mut prompt = format!(
        "You are a covered call advisor reviewing a single stock position.\n\n\
         Position: {} shares of {} at ${:.2} cost basis, trading at ${:.2}, \
         unrealized P/L ${:.0}. Up to {} contracts can be written.\n\n\
         Candidate short calls, best weekly yield first:\n",
        holding.shares, symbol, holding.avg_price, price, holding.gain_loss, contracts
    );

    for c in candidates {
        prompt.push_str(&format!(
            "- {} strike, exp {} ({} DTE), delta {:.3}, bid ${:.2}, weekly yield {:.2}%, OTM {:.1}%\n",
            c.strike, c.exp, c.dte, c.delta, c.bid, c.weekly_pct, c.otm_pct
        ));
    }

    prompt.push_str(
        "\nShould the holder SELL one of these calls or HOLD and wait? \
         Answer with SELL (naming the strike and expiration) or HOLD, \
         then justify in under 150 words.\n",
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding() -> Holding {
        Holding {
            shares: 900,
            avg_price: 512.3456,
            market_value: 569_700.0,
            gain_loss: 51_858.9,
        }
    }

    fn candidate() -> Candidate {
        Candidate {
            strike: 650.0,
            exp: "2026-08-14".to_string(),
            dte: 7,
            delta: 0.204,
            bid: 3.80,
            weekly_pct: 0.60,
            annualized_pct: 31.30,
            total_premium: 3420.0,
            otm_dollar: 17.0,
            otm_pct: 2.69,
        }
    }

    #[test]
    fn prompt_summarizes_the_position() {
        let prompt = build_prompt("NVDA", &holding(), 633.0, &[candidate()]);
        assert!(prompt.contains("900 shares of NVDA"));
        assert!(prompt.contains("$512.35 cost basis"));
        assert!(prompt.contains("trading at $633.00"));
        assert!(prompt.contains("unrealized P/L $51859"));
        assert!(prompt.contains("Up to 9 contracts"));
    }

    #[test]
    fn prompt_lists_each_candidate_once() {
        let prompt = build_prompt("NVDA", &holding(), 633.0, &[candidate(), candidate()]);
        assert_eq!(prompt.matches("650 strike").count(), 2);
        assert!(prompt.contains("exp 2026-08-14 (7 DTE)"));
        assert!(prompt.contains("delta 0.204"));
        assert!(prompt.contains("bid $3.80"));
        assert!(prompt.contains("weekly yield 0.60%"));
        assert!(prompt.contains("OTM 2.7%"));
    }

    #[test]
    fn prompt_asks_for_a_verdict() {
        let prompt = build_prompt("NVDA", &holding(), 633.0, &[]);
        assert!(prompt.contains("SELL"));
        assert!(prompt.contains("HOLD"));
        assert!(prompt.contains("under 150 words"));
    }
}
