//! The aggregator: five source trackers behind one coordination task.
//!
//! # Architecture
//!
//! ```text
//! RefreshHandle ──mpsc──►┐
//!                        ├──► coordination task ──trigger──► SourceTracker ×5
//! SymbolSelector ─watch─►┘                                        │
//!                                                                 ▼
//! Aggregator::snapshot() ◄──────────── watch<SourceState<T>> per source
//! ```
//!
//! The coordination task is the only writer: it owns the trackers and turns
//! refresh requests and symbol changes into dispatches. Everything else holds
//! watch receivers and reads. On startup all five sources are dispatched at
//! once; a symbol change re-dispatches history and nothing else.

use std::sync::Arc;

use deck_core::api::{Backend, HistoryQuery, OrdersQuery};
use deck_core::refresh::{RefreshHandle, RefreshReceiver, refresh_channel};
use deck_core::types::{
    Account, BotStatus, HISTORY_POINTS, Order, Position, PricePoint, SourceId, SourceState,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::symbol::SymbolSelector;
use crate::tracker::SourceTracker;

// ---------------------------------------------------------------------------
// DeckSnapshot
// ---------------------------------------------------------------------------

/// Point-in-time copy of every source cell, for rendering.
#[derive(Debug, Clone)]
pub struct DeckSnapshot {
    pub bot_status: SourceState<BotStatus>,
    pub account: SourceState<Account>,
    pub positions: SourceState<Vec<Position>>,
    pub orders: SourceState<Vec<Order>>,
    pub history: SourceState<Vec<PricePoint>>,
    /// Symbol the history series is for.
    pub symbol: String,
    /// True while any source except history is loading.
    pub critical_loading: bool,
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Read-side facade over the five dashboard sources.
///
/// Constructed with [`Aggregator::start`], which spawns the coordination task
/// and dispatches the initial round of fetches. Dropping the aggregator (or
/// calling [`stop`](Aggregator::stop)) aborts the task and every in-flight
/// fetch with it.
pub struct Aggregator {
    bot_status: watch::Receiver<SourceState<BotStatus>>,
    account: watch::Receiver<SourceState<Account>>,
    positions: watch::Receiver<SourceState<Vec<Position>>>,
    orders: watch::Receiver<SourceState<Vec<Order>>>,
    history: watch::Receiver<SourceState<Vec<PricePoint>>>,
    symbol: SymbolSelector,
    refresh: RefreshHandle,
    task: Option<JoinHandle<()>>,
}

impl Aggregator {
    /// Spawn the coordination task and dispatch the initial round of fetches.
    pub fn start(backend: Arc<dyn Backend>, symbol: SymbolSelector) -> Self {
        let (refresh, refresh_rx) = refresh_channel();

        let core = FeedCore {
            backend,
            symbol: symbol.get(),
            bot_status: SourceTracker::new(SourceId::BotStatus),
            account: SourceTracker::new(SourceId::Account),
            positions: SourceTracker::new(SourceId::Positions),
            orders: SourceTracker::new(SourceId::Orders),
            history: SourceTracker::new(SourceId::History),
        };

        let aggregator = Self {
            bot_status: core.bot_status.subscribe(),
            account: core.account.subscribe(),
            positions: core.positions.subscribe(),
            orders: core.orders.subscribe(),
            history: core.history.subscribe(),
            symbol: symbol.clone(),
            refresh: refresh.clone(),
            task: Some(tokio::spawn(coordinate(core, symbol.subscribe(), refresh_rx))),
        };
        info!("[deck] feed started for symbol {}", aggregator.symbol.get());
        aggregator
    }

    /// Cloneable handle for requesting refetches.
    pub fn refresh_handle(&self) -> RefreshHandle {
        self.refresh.clone()
    }

    /// Refetch one source on demand.
    pub fn refresh(&self, source: SourceId) {
        self.refresh.invalidate(source);
    }

    /// True while any source except history is loading.
    pub fn critical_loading(&self) -> bool {
        self.bot_status.borrow().is_loading()
            || self.account.borrow().is_loading()
            || self.positions.borrow().is_loading()
            || self.orders.borrow().is_loading()
    }

    /// Point-in-time copy of all cells.
    pub fn snapshot(&self) -> DeckSnapshot {
        DeckSnapshot {
            bot_status: self.bot_status.borrow().clone(),
            account: self.account.borrow().clone(),
            positions: self.positions.borrow().clone(),
            orders: self.orders.borrow().clone(),
            history: self.history.borrow().clone(),
            symbol: self.symbol.get(),
            critical_loading: self.critical_loading(),
        }
    }

    /// Wait until any cell changes. Returns `false` once the feed has shut
    /// down and nothing can change anymore.
    pub async fn changed(&mut self) -> bool {
        tokio::select! {
            r = self.bot_status.changed() => r.is_ok(),
            r = self.account.changed() => r.is_ok(),
            r = self.positions.changed() => r.is_ok(),
            r = self.orders.changed() => r.is_ok(),
            r = self.history.changed() => r.is_ok(),
        }
    }

    /// Abort the coordination task and every in-flight fetch.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("[deck] feed stopped");
        }
    }
}

impl Drop for Aggregator {
    fn drop(&mut self) {
        self.stop();
    }
}

// ---------------------------------------------------------------------------
// Coordination task
// ---------------------------------------------------------------------------

// The trackers and their dispatch inputs, owned by the coordination task.
// Dropping this aborts every in-flight fetch via the tracker Drop impls.
struct FeedCore {
    backend: Arc<dyn Backend>,
    symbol: String,
    bot_status: SourceTracker<BotStatus>,
    account: SourceTracker<Account>,
    positions: SourceTracker<Vec<Position>>,
    orders: SourceTracker<Vec<Order>>,
    history: SourceTracker<Vec<PricePoint>>,
}

impl FeedCore {
    fn dispatch(&mut self, source: SourceId) {
        let backend = Arc::clone(&self.backend);
        match source {
            SourceId::BotStatus => self
                .bot_status
                .trigger(async move { backend.bot_status().await }),
            SourceId::Account => self.account.trigger(async move { backend.account().await }),
            SourceId::Positions => self
                .positions
                .trigger(async move { backend.positions().await }),
            SourceId::Orders => self
                .orders
                .trigger(async move { backend.orders(&OrdersQuery::default()).await }),
            SourceId::History => {
                let query = HistoryQuery::for_symbol(self.symbol.clone());
                self.history
                    .trigger(async move { backend.history(&query).await.map(clamp_history) });
            }
        }
    }

    fn dispatch_all(&mut self) {
        for source in SourceId::ALL {
            self.dispatch(source);
        }
    }
}

/// Keep only the newest points the chart can show. The backend returns the
/// series newest-first.
fn clamp_history(mut points: Vec<PricePoint>) -> Vec<PricePoint> {
    points.truncate(HISTORY_POINTS);
    points
}

async fn coordinate(
    mut core: FeedCore,
    mut symbol_rx: watch::Receiver<String>,
    mut refresh_rx: RefreshReceiver,
) {
    core.dispatch_all();

    loop {
        tokio::select! {
            Some(source) = refresh_rx.recv() => {
                core.dispatch(source);
            }
            changed = symbol_rx.changed() => {
                if changed.is_err() {
                    break; // every selector handle is gone
                }
                core.symbol = symbol_rx.borrow_and_update().clone();
                info!("[deck] symbol changed to {}, refreshing history", core.symbol);
                core.dispatch(SourceId::History);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Days, NaiveDate};
    use deck_core::error::FetchError;
    use deck_core::types::{ActionReceipt, BotState, OrderSide, PositionSide};
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::timeout;

    // -----------------------------------------------------------------------
    // Scripted backend
    // -----------------------------------------------------------------------

    // A gate each endpoint must pass before answering. Opens stay open.
    struct Gate(watch::Sender<bool>);

    impl Gate {
        fn new(open: bool) -> Self {
            let (tx, _) = watch::channel(open);
            Self(tx)
        }

        fn open(&self) {
            self.0.send_replace(true);
        }

        async fn pass(&self) {
            let mut rx = self.0.subscribe();
            let _ = rx.wait_for(|open| *open).await;
        }
    }

    struct StubBackend {
        bot_gate: Gate,
        account_gate: Gate,
        positions_gate: Gate,
        orders_gate: Gate,
        history_gate: Gate,
        bot_calls: AtomicUsize,
        account_calls: AtomicUsize,
        positions_calls: AtomicUsize,
        orders_calls: AtomicUsize,
        history_calls: AtomicUsize,
        history_points: AtomicUsize,
        fail_account: AtomicBool,
    }

    impl StubBackend {
        fn new(open: bool) -> Arc<Self> {
            Arc::new(Self {
                bot_gate: Gate::new(open),
                account_gate: Gate::new(open),
                positions_gate: Gate::new(open),
                orders_gate: Gate::new(open),
                history_gate: Gate::new(open),
                bot_calls: AtomicUsize::new(0),
                account_calls: AtomicUsize::new(0),
                positions_calls: AtomicUsize::new(0),
                orders_calls: AtomicUsize::new(0),
                history_calls: AtomicUsize::new(0),
                history_points: AtomicUsize::new(3),
                fail_account: AtomicBool::new(false),
            })
        }

        fn open_critical(&self) {
            self.bot_gate.open();
            self.account_gate.open();
            self.positions_gate.open();
            self.orders_gate.open();
        }

        fn open_all(&self) {
            self.open_critical();
            self.history_gate.open();
        }

        fn total_calls(&self) -> usize {
            self.bot_calls.load(Ordering::SeqCst)
                + self.account_calls.load(Ordering::SeqCst)
                + self.positions_calls.load(Ordering::SeqCst)
                + self.orders_calls.load(Ordering::SeqCst)
                + self.history_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Backend for StubBackend {
        async fn bot_status(&self) -> Result<BotStatus, FetchError> {
            self.bot_calls.fetch_add(1, Ordering::SeqCst);
            self.bot_gate.pass().await;
            Ok(BotStatus {
                state: BotState::Inactive,
                message: "Trading Bot ist inaktiv. Nicht aktiv.".into(),
            })
        }

        async fn account(&self) -> Result<Account, FetchError> {
            self.account_calls.fetch_add(1, Ordering::SeqCst);
            self.account_gate.pass().await;
            if self.fail_account.load(Ordering::SeqCst) {
                return Err(FetchError::Http {
                    status: 503,
                    message: "Alpaca API Client nicht initialisiert.".into(),
                });
            }
            Ok(sample_account())
        }

        async fn positions(&self) -> Result<Vec<Position>, FetchError> {
            self.positions_calls.fetch_add(1, Ordering::SeqCst);
            self.positions_gate.pass().await;
            Ok(vec![sample_position()])
        }

        async fn orders(&self, query: &OrdersQuery) -> Result<Vec<Order>, FetchError> {
            self.orders_calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(query.status, "filled");
            assert_eq!(query.limit, 10);
            self.orders_gate.pass().await;
            Ok(vec![sample_order()])
        }

        async fn history(&self, query: &HistoryQuery) -> Result<Vec<PricePoint>, FetchError> {
            self.history_calls.fetch_add(1, Ordering::SeqCst);
            self.history_gate.pass().await;
            let points = self.history_points.load(Ordering::SeqCst);
            Ok(sample_history(&query.symbol, points))
        }

        async fn start_bot(&self, symbol: &str) -> Result<ActionReceipt, FetchError> {
            Ok(ActionReceipt {
                message: format!("Bot erfolgreich gestartet. Überwacht: {symbol}"),
            })
        }

        async fn stop_bot(&self) -> Result<ActionReceipt, FetchError> {
            Ok(ActionReceipt {
                message: "Bot erfolgreich gestoppt.".into(),
            })
        }
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn sample_account() -> Account {
        Account {
            id: "7c6b4e2a-1f3d-4f7e-9b2a-0c8d5e6f1a2b".into(),
            account_number: "PA3ABC12DEF4".into(),
            status: "ACTIVE".into(),
            currency: "USD".into(),
            cash: dec("25000.50"),
            portfolio_value: dec("31450.75"),
            equity: dec("31450.75"),
        }
    }

    fn sample_position() -> Position {
        Position {
            symbol: "AAPL".into(),
            side: PositionSide::Long,
            qty: dec("10"),
            avg_entry_price: dec("150.25"),
            current_price: dec("155.10"),
            market_value: dec("1551.00"),
            unrealized_pl: dec("48.50"),
            unrealized_plpc: dec("0.0323"),
        }
    }

    fn sample_order() -> Order {
        Order {
            id: "904837e3-3b76-47ec-b432-046db621571b".into(),
            client_order_id: "deck-1".into(),
            symbol: "AAPL".into(),
            side: OrderSide::Buy,
            order_type: "market".into(),
            status: "filled".into(),
            qty: Some(dec("10")),
            filled_qty: dec("10"),
            filled_avg_price: Some(dec("150.25")),
            created_at: "2024-01-05T14:30:12Z".parse().unwrap(),
            filled_at: Some("2024-01-05T14:30:13Z".parse().unwrap()),
        }
    }

    // Newest first, every point labeled with the symbol it was fetched for.
    fn sample_history(symbol: &str, points: usize) -> Vec<PricePoint> {
        let newest = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        (0..points)
            .map(|i| PricePoint {
                date: newest.checked_sub_days(Days::new(i as u64)).unwrap(),
                open: dec("1"),
                high: dec("2"),
                low: dec("0.5"),
                close: dec("1.5"),
                adj_close: None,
                volume: None,
                change_percent: None,
                vwap: None,
                label: Some(symbol.to_string()),
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn wait_until(agg: &mut Aggregator, what: &str, pred: impl Fn(&DeckSnapshot) -> bool) {
        timeout(Duration::from_secs(5), async {
            loop {
                if pred(&agg.snapshot()) {
                    return;
                }
                assert!(agg.changed().await, "feed closed while waiting for {what}");
            }
        })
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for {what}"));
    }

    async fn wait_for_calls(count: &AtomicUsize, at_least: usize) {
        timeout(Duration::from_secs(5), async {
            while count.load(Ordering::SeqCst) < at_least {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("expected call count never reached");
    }

    fn all_ready(s: &DeckSnapshot) -> bool {
        s.bot_status.is_ready()
            && s.account.is_ready()
            && s.positions.is_ready()
            && s.orders.is_ready()
            && s.history.is_ready()
    }

    fn history_label(s: &DeckSnapshot) -> Option<String> {
        s.history
            .ready()
            .and_then(|points| points.first())
            .and_then(|point| point.label.clone())
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn initial_round_dispatches_all_sources_at_once() {
        let stub = StubBackend::new(false);
        let mut agg = Aggregator::start(stub.clone(), SymbolSelector::default());

        // all five requests go out before any of them answers
        timeout(Duration::from_secs(5), async {
            while stub.total_calls() < 5 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();

        let snap = agg.snapshot();
        assert!(snap.bot_status.is_loading());
        assert!(snap.account.is_loading());
        assert!(snap.positions.is_loading());
        assert!(snap.orders.is_loading());
        assert!(snap.history.is_loading());
        assert!(snap.critical_loading);

        stub.open_all();
        wait_until(&mut agg, "all sources ready", all_ready).await;
        assert!(!agg.critical_loading());
        assert_eq!(agg.snapshot().symbol, "AAPL");
    }

    #[tokio::test]
    async fn critical_loading_excludes_history() {
        let stub = StubBackend::new(false);
        let mut agg = Aggregator::start(stub.clone(), SymbolSelector::default());

        stub.open_critical();
        wait_until(&mut agg, "critical sources ready", |s| !s.critical_loading).await;

        let snap = agg.snapshot();
        assert!(snap.history.is_loading()); // chart still filling in
        assert!(snap.bot_status.is_ready());

        stub.history_gate.open();
        wait_until(&mut agg, "history ready", |s| s.history.is_ready()).await;
    }

    #[tokio::test]
    async fn failed_source_reports_error_and_others_proceed() {
        let stub = StubBackend::new(true);
        stub.fail_account.store(true, Ordering::SeqCst);
        let mut agg = Aggregator::start(stub.clone(), SymbolSelector::default());

        wait_until(&mut agg, "account error", |s| s.account.is_error()).await;
        wait_until(&mut agg, "other sources ready", |s| {
            s.bot_status.is_ready() && s.positions.is_ready() && s.orders.is_ready()
        })
        .await;

        let snap = agg.snapshot();
        assert_eq!(
            snap.account.error(),
            Some("HTTP 503: Alpaca API Client nicht initialisiert.")
        );
        assert!(!snap.critical_loading);
    }

    #[tokio::test]
    async fn symbol_change_refetches_only_history() {
        let stub = StubBackend::new(true);
        let selector = SymbolSelector::default();
        let mut agg = Aggregator::start(stub.clone(), selector.clone());

        wait_until(&mut agg, "initial round", all_ready).await;
        assert_eq!(stub.history_calls.load(Ordering::SeqCst), 1);

        assert!(selector.set("msft"));
        wait_until(&mut agg, "MSFT history", |s| {
            history_label(s).as_deref() == Some("MSFT")
        })
        .await;

        assert_eq!(agg.snapshot().symbol, "MSFT");
        assert_eq!(stub.history_calls.load(Ordering::SeqCst), 2);
        assert_eq!(stub.bot_calls.load(Ordering::SeqCst), 1);
        assert_eq!(stub.account_calls.load(Ordering::SeqCst), 1);
        assert_eq!(stub.positions_calls.load(Ordering::SeqCst), 1);
        assert_eq!(stub.orders_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn reselecting_same_symbol_refetches_nothing() {
        let stub = StubBackend::new(true);
        let selector = SymbolSelector::default();
        let mut agg = Aggregator::start(stub.clone(), selector.clone());

        wait_until(&mut agg, "initial round", all_ready).await;
        assert!(!selector.set("aapl")); // already selected

        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
        assert_eq!(stub.history_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn on_demand_refresh_hits_one_source() {
        let stub = StubBackend::new(true);
        let mut agg = Aggregator::start(stub.clone(), SymbolSelector::default());
        wait_until(&mut agg, "initial round", all_ready).await;

        agg.refresh(SourceId::BotStatus);
        wait_for_calls(&stub.bot_calls, 2).await;
        wait_until(&mut agg, "bot status ready again", |s| s.bot_status.is_ready()).await;

        assert_eq!(stub.account_calls.load(Ordering::SeqCst), 1);
        assert_eq!(stub.positions_calls.load(Ordering::SeqCst), 1);
        assert_eq!(stub.orders_calls.load(Ordering::SeqCst), 1);
        assert_eq!(stub.history_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn history_is_clamped_to_chart_window() {
        let stub = StubBackend::new(true);
        stub.history_points
            .store(HISTORY_POINTS + 15, Ordering::SeqCst);
        let mut agg = Aggregator::start(stub.clone(), SymbolSelector::default());

        wait_until(&mut agg, "history ready", |s| s.history.is_ready()).await;
        let snap = agg.snapshot();
        let points = snap.history.ready().unwrap();
        assert_eq!(points.len(), HISTORY_POINTS);
        // newest-first order preserved, so the cutoff drops the oldest points
        assert_eq!(
            points[0].date,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[tokio::test]
    async fn newest_history_dispatch_wins() {
        let stub = StubBackend::new(false);
        stub.open_critical();
        let selector = SymbolSelector::default();
        let mut agg = Aggregator::start(stub.clone(), selector.clone());

        // AAPL fetch is parked at the gate
        wait_for_calls(&stub.history_calls, 1).await;
        selector.set("msft");
        wait_for_calls(&stub.history_calls, 2).await;

        stub.history_gate.open();
        wait_until(&mut agg, "MSFT history", |s| {
            history_label(s).as_deref() == Some("MSFT")
        })
        .await;

        // the superseded AAPL dispatch was aborted, not retried
        assert_eq!(stub.history_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn stop_tears_down_the_feed() {
        let stub = StubBackend::new(false);
        let mut agg = Aggregator::start(stub.clone(), SymbolSelector::default());
        wait_for_calls(&stub.bot_calls, 1).await;

        agg.stop();
        let closed = timeout(Duration::from_secs(5), async {
            while agg.changed().await {}
        })
        .await;
        assert!(closed.is_ok(), "cells kept changing after stop");

        // refreshing after shutdown is a silent no-op
        agg.refresh(SourceId::Account);
    }
}
