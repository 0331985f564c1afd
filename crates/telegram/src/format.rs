//! Plain-text rendering of alerts and status replies.

use std::time::Duration;

use common::{Alert, Direction, TradeSignal, Trend};
use engine::{Health, StatusReport};

const RULE: &str = "━━━━━━━━━━━━━━━";

pub fn alert_text(alert: &Alert) -> String {
    match alert {
        Alert::Signal {
            symbol,
            signal,
            risk_reward,
        } => signal_text(symbol, signal, *risk_reward),
        Alert::Heartbeat {
            symbol,
            price,
            trend,
            rsi,
        } => format!(
            "💓 HOURLY HEARTBEAT\n\
             💰 {symbol}: {}\n\
             🌊 Trend: {}\n\
             📉 RSI: {rsi:.1}",
            format_usd(*price),
            trend_label(*trend),
        ),
    }
}

fn signal_text(symbol: &str, signal: &TradeSignal, risk_reward: f64) -> String {
    format!(
        "⚡ TRIPLE-CHECK SIGNAL ⚡\n\
         🧭 Trade: {} {symbol}\n\
         💰 Entry: {}\n\
         🛑 SL: {}\n\
         🎯 TP: {}\n\
         ⚖️ Ratio: 1:{}\n\
         📉 RSI: {:.1}",
        direction_label(signal.direction),
        format_usd(signal.entry),
        format_usd(signal.stop_loss),
        format_usd(signal.take_profit),
        format_ratio(risk_reward),
        signal.rsi,
    )
}

pub fn status_text(report: &StatusReport) -> String {
    let price = report.price.map(format_usd).unwrap_or_else(|| "unknown".into());
    let trend = report
        .trend
        .map(|t| trend_label(t).to_string())
        .unwrap_or_else(|| "unknown".into());
    let rsi = report
        .rsi
        .map(|r| format!("{r:.1}"))
        .unwrap_or_else(|| "unknown".into());
    let health = match &report.health {
        Health::Operational => "✅ Operational".to_string(),
        Health::Degraded(reason) => format!("🛑 API connection issue: {reason}"),
    };

    format!(
        "🤖 LIVE BOT STATUS\n\
         {RULE}\n\
         💰 {} Price: {price}\n\
         🌊 Trend: {trend}\n\
         📉 RSI: {rsi}\n\
         \n\
         ⚙️ System Stats:\n\
         • Health: {health}\n\
         • Uptime: {}\n\
         {RULE}",
        report.symbol,
        format_uptime(report.uptime),
    )
}

fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::Long => "🟢 LONG",
        Direction::Short => "🔴 SHORT",
    }
}

fn trend_label(trend: Trend) -> &'static str {
    match trend {
        Trend::Bullish => "📈 BULLISH",
        Trend::Bearish => "📉 BEARISH",
    }
}

/// `1234567.891` → `$1,234,567.89`.
pub fn format_usd(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

/// Whole ratios print without decimals: `2` not `2.0`.
fn format_ratio(ratio: f64) -> String {
    if ratio.fract() == 0.0 {
        format!("{ratio:.0}")
    } else {
        format!("{ratio}")
    }
}

/// `H:MM:SS`, prefixed with days once past 24h: `1 day, 2:03:04`.
pub fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    let days = secs / 86_400;
    let clock = format!(
        "{}:{:02}:{:02}",
        (secs % 86_400) / 3_600,
        (secs % 3_600) / 60,
        secs % 60
    );
    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        n => format!("{n} days, {clock}"),
    }
}
