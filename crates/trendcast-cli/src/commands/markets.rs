use std::fmt::Write as _;

use serde::Serialize;

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Clone, Copy, Serialize)]
struct Market {
    exchange: &'static str,
    suffix: &'static str,
    examples: &'static [&'static str],
}

const MARKETS: [Market; 5] = [
    Market {
        exchange: "US Markets",
        suffix: "",
        examples: &["AAPL", "TSLA"],
    },
    Market {
        exchange: "London (LSE)",
        suffix: ".L",
        examples: &["BP.L", "VOD.L"],
    },
    Market {
        exchange: "Frankfurt (XETRA)",
        suffix: ".DE",
        examples: &["SAP.DE", "BMW.DE"],
    },
    Market {
        exchange: "Tokyo (TSE)",
        suffix: ".T",
        examples: &["7203.T"],
    },
    Market {
        exchange: "Crypto",
        suffix: "-USD",
        examples: &["BTC-USD", "ETH-USD"],
    },
];

pub fn run() -> Result<CommandResult, CliError> {
    let mut text = String::from("Global market search tips (Yahoo Finance tickers)\n\n");
    let _ = writeln!(text, "{:<18} {:<12} {}", "Exchange", "Suffix", "Example");
    for market in &MARKETS {
        let suffix = if market.suffix.is_empty() {
            "(No suffix)"
        } else {
            market.suffix
        };
        let _ = writeln!(
            text,
            "{:<18} {:<12} {}",
            market.exchange,
            suffix,
            market.examples.join(", ")
        );
    }

    Ok(CommandResult::ok(serde_json::to_value(MARKETS)?, text))
}
