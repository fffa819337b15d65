//! Plain-text rendering of the deck.
//!
//! Every source cell renders through the same three-way shape: a
//! `loading...` marker, an `error: <reason>` line, or the ready payload.

use std::fmt::Write;

use chrono::{DateTime, Local};
use deck_core::types::{Account, Order, Position, PricePoint, SourceState};
use deck_ctl::{Notice, NoticeLevel};
use deck_feed::DeckSnapshot;

/// Console help text.
pub fn help() -> &'static str {
    "commands: start | stop | symbol <TICKER> | refresh <bot-status|account|positions|orders|history> | help | quit"
}

/// Render one full deck snapshot.
pub fn deck(snapshot: &DeckSnapshot, now: DateTime<Local>) -> String {
    let mut out = String::new();
    let busy = if snapshot.critical_loading {
        " (loading)"
    } else {
        ""
    };
    let _ = writeln!(
        out,
        "== deck @ {} [symbol {}]{}",
        now.format("%H:%M:%S"),
        snapshot.symbol,
        busy,
    );
    let _ = writeln!(
        out,
        "bot:       {}",
        source_line(&snapshot.bot_status, |status| format!(
            "{} {}",
            status.state.to_string().to_uppercase(),
            status.message,
        )),
    );
    let _ = writeln!(
        out,
        "account:   {}",
        source_line(&snapshot.account, account_line),
    );
    let _ = writeln!(
        out,
        "positions: {}",
        source_line(&snapshot.positions, |positions| positions_block(positions)),
    );
    let _ = writeln!(
        out,
        "orders:    {}",
        source_line(&snapshot.orders, |orders| orders_block(orders)),
    );
    let _ = write!(
        out,
        "history:   {}",
        source_line(&snapshot.history, |points| history_line(points)),
    );
    out
}

/// Render one control notice with its local timestamp.
pub fn notice(notice: &Notice) -> String {
    let level = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Error => "error",
    };
    format!(
        ">> [{} {}] {}",
        notice.at.with_timezone(&Local).format("%H:%M:%S"),
        level,
        notice.text,
    )
}

fn source_line<T>(state: &SourceState<T>, ready: impl Fn(&T) -> String) -> String {
    match state {
        SourceState::Loading => "loading...".to_string(),
        SourceState::Error(reason) => format!("error: {reason}"),
        SourceState::Ready(data) => ready(data),
    }
}

fn account_line(account: &Account) -> String {
    format!(
        "{} cash {}, portfolio {}, equity {} ({})",
        account.currency, account.cash, account.portfolio_value, account.equity, account.status,
    )
}

fn positions_block(positions: &[Position]) -> String {
    if positions.is_empty() {
        return "none open".to_string();
    }
    let mut block = format!("{} open", positions.len());
    for position in positions {
        let _ = write!(
            block,
            "\n           {} {} {} @ {}, now {} (P/L {})",
            position.symbol,
            position.side,
            position.qty,
            position.avg_entry_price,
            position.current_price,
            position.unrealized_pl,
        );
    }
    block
}

fn orders_block(orders: &[Order]) -> String {
    if orders.is_empty() {
        return "none".to_string();
    }
    let mut block = format!("{} recent", orders.len());
    for order in orders {
        let price = order
            .filled_avg_price
            .map(|price| price.to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = write!(
            block,
            "\n           {} {} {} @ {} ({})",
            order.side, order.filled_qty, order.symbol, price, order.status,
        );
    }
    block
}

fn history_line(points: &[PricePoint]) -> String {
    match (points.first(), points.last()) {
        (Some(newest), Some(oldest)) => format!(
            "{} points, close {} on {}, back to {}",
            points.len(),
            newest.close,
            newest.date,
            oldest.date,
        ),
        _ => "empty series".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};
    use deck_core::types::{BotState, BotStatus, OrderSide, PositionSide};
    use rust_decimal::Decimal;

    fn dec(text: &str) -> Decimal {
        text.parse().unwrap()
    }

    fn snapshot() -> DeckSnapshot {
        DeckSnapshot {
            bot_status: SourceState::Ready(BotStatus {
                state: BotState::Active,
                message: "Trading Bot ist aktiv. Überwacht: MSFT".to_string(),
            }),
            account: SourceState::Ready(Account {
                id: "acct-1".to_string(),
                account_number: "PA123".to_string(),
                status: "ACTIVE".to_string(),
                currency: "USD".to_string(),
                cash: dec("25000.50"),
                portfolio_value: dec("31450.75"),
                equity: dec("31450.75"),
            }),
            positions: SourceState::Ready(vec![Position {
                symbol: "AAPL".to_string(),
                side: PositionSide::Long,
                qty: dec("10"),
                avg_entry_price: dec("150.25"),
                current_price: dec("155.10"),
                market_value: dec("1551.00"),
                unrealized_pl: dec("48.50"),
                unrealized_plpc: dec("0.0323"),
            }]),
            orders: SourceState::Loading,
            history: SourceState::Error("HTTP 503: history backend down".to_string()),
            symbol: "MSFT".to_string(),
            critical_loading: true,
        }
    }

    #[test]
    fn deck_renders_every_cell_state() {
        let now = Local.with_ymd_and_hms(2024, 3, 1, 14, 30, 12).unwrap();
        let text = deck(&snapshot(), now);

        assert!(text.contains("== deck @ 14:30:12 [symbol MSFT] (loading)"));
        assert!(text.contains("ACTIVE Trading Bot ist aktiv. Überwacht: MSFT"));
        assert!(text.contains("USD cash 25000.50, portfolio 31450.75, equity 31450.75 (ACTIVE)"));
        assert!(text.contains("1 open"));
        assert!(text.contains("AAPL long 10 @ 150.25, now 155.10 (P/L 48.50)"));
        assert!(text.contains("orders:    loading..."));
        assert!(text.contains("history:   error: HTTP 503: history backend down"));
    }

    #[test]
    fn empty_collections_render_placeholders() {
        let mut snapshot = snapshot();
        snapshot.positions = SourceState::Ready(Vec::new());
        snapshot.orders = SourceState::Ready(Vec::new());
        snapshot.history = SourceState::Ready(Vec::new());
        snapshot.critical_loading = false;

        let now = Local.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let text = deck(&snapshot, now);

        assert!(!text.contains("(loading)"));
        assert!(text.contains("positions: none open"));
        assert!(text.contains("orders:    none"));
        assert!(text.contains("history:   empty series"));
    }

    #[test]
    fn orders_without_fill_price_render_a_dash() {
        let mut snapshot = snapshot();
        snapshot.orders = SourceState::Ready(vec![Order {
            id: "ord-1".to_string(),
            client_order_id: "client-1".to_string(),
            symbol: "AAPL".to_string(),
            side: OrderSide::Buy,
            order_type: "market".to_string(),
            status: "new".to_string(),
            qty: Some(dec("10")),
            filled_qty: dec("0"),
            filled_avg_price: None,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 14, 0, 0).unwrap(),
            filled_at: None,
        }]);

        let now = Local.with_ymd_and_hms(2024, 3, 1, 14, 30, 12).unwrap();
        let text = deck(&snapshot, now);

        assert!(text.contains("buy 0 AAPL @ - (new)"));
    }

    #[test]
    fn history_reports_newest_and_oldest_dates() {
        let mut snapshot = snapshot();
        snapshot.history = SourceState::Ready(vec![
            PricePoint {
                date: "2024-03-01".parse().unwrap(),
                open: dec("184.00"),
                high: dec("186.00"),
                low: dec("183.50"),
                close: dec("185.85"),
                adj_close: None,
                volume: None,
                change_percent: None,
                vwap: None,
                label: None,
            },
            PricePoint {
                date: "2024-02-29".parse().unwrap(),
                open: dec("182.00"),
                high: dec("184.50"),
                low: dec("181.75"),
                close: dec("184.10"),
                adj_close: None,
                volume: None,
                change_percent: None,
                vwap: None,
                label: None,
            },
        ]);

        let now = Local.with_ymd_and_hms(2024, 3, 1, 16, 0, 0).unwrap();
        let text = deck(&snapshot, now);

        assert!(text.contains("2 points, close 185.85 on 2024-03-01, back to 2024-02-29"));
    }

    #[test]
    fn notices_carry_level_and_text() {
        let info = Notice::info("Bot erfolgreich gestartet. Überwacht: MSFT");
        let error = Notice::error("HTTP 400: Bot läuft bereits.");

        assert!(notice(&info).contains("info] Bot erfolgreich gestartet. Überwacht: MSFT"));
        assert!(notice(&error).contains("error] HTTP 400: Bot läuft bereits."));
    }
}
