//! The page runtime: owns the document, runs every initializer once when the
//! page is ready, and routes host events to the components.

use crate::chart::{self, ChartLibrary};
use crate::clock::{Clock, SystemClock};
use crate::config::UiConfig;
use crate::counter::{self, CounterAnimation, Step};
use crate::dom::Dom;
use crate::events::{route_click, ClickEvent, ClickRoute, EventOutcome};
use crate::loader;
use crate::notifications::{self, MarkReadTransport};
use crate::search;
use crate::sla::{self, SlaCountdown};
use crate::validation;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub type SharedChartLibrary<N> = Arc<dyn ChartLibrary<N> + Send + Sync>;

/// Which components found their elements at ready time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadySummary {
    pub chart: bool,
    pub loader: bool,
    pub sla: bool,
    pub search: bool,
    pub counters: usize,
    pub forms: usize,
}

struct Wiring<N> {
    ready: Option<ReadySummary>,
    loader: Option<N>,
    search: Option<N>,
    forms: Vec<N>,
}

impl<N> Default for Wiring<N> {
    fn default() -> Self {
        Self {
            ready: None,
            loader: None,
            search: None,
            forms: Vec::new(),
        }
    }
}

pub struct Page<D: Dom, T, C = SystemClock> {
    dom: Arc<Mutex<D>>,
    transport: Arc<T>,
    clock: Arc<C>,
    chart: Option<SharedChartLibrary<D::Node>>,
    config: UiConfig,
    shutdown: CancellationToken,
    wiring: Mutex<Wiring<D::Node>>,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
}

impl<D: Dom, T> Page<D, T, SystemClock> {
    pub fn new(dom: D, transport: T) -> Self {
        Self {
            dom: Arc::new(Mutex::new(dom)),
            transport: Arc::new(transport),
            clock: Arc::new(SystemClock),
            chart: None,
            config: UiConfig::default(),
            shutdown: CancellationToken::new(),
            wiring: Mutex::new(Wiring::default()),
            in_flight: Mutex::new(Vec::new()),
        }
    }
}

impl<D: Dom, T, C> Page<D, T, C> {
    pub fn with_clock<C2: Clock>(self, clock: Arc<C2>) -> Page<D, T, C2> {
        Page {
            dom: self.dom,
            transport: self.transport,
            clock,
            chart: self.chart,
            config: self.config,
            shutdown: self.shutdown,
            wiring: self.wiring,
            in_flight: self.in_flight,
        }
    }

    pub fn with_chart_library(mut self, library: SharedChartLibrary<D::Node>) -> Self {
        self.chart = Some(library);
        self
    }

    pub fn with_config(mut self, config: UiConfig) -> Self {
        self.config = config;
        self
    }

    pub fn dom(&self) -> Arc<Mutex<D>> {
        Arc::clone(&self.dom)
    }

    /// Stops the SLA ticker and any unfinished counter animations. Nothing
    /// calls this by default; timers otherwise live as long as the runtime.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl<D, T, C> Page<D, T, C>
where
    D: Dom + Send + 'static,
    D::Node: Send + Sync + 'static,
    T: MarkReadTransport + Send + Sync + 'static,
    C: Clock,
{
    /// Runs every initializer. Repeated calls return the first summary
    /// without wiring anything twice.
    pub async fn ready(&self) -> ReadySummary {
        let mut wiring = self.wiring.lock().await;
        if let Some(summary) = wiring.ready {
            warn!("page already initialized");
            return summary;
        }

        let mut dom = self.dom.lock().await;
        let mut summary = ReadySummary {
            chart: chart::render_chart(&*dom, self.chart.as_deref()),
            ..ReadySummary::default()
        };

        wiring.loader = loader::locate(&*dom);
        summary.loader = wiring.loader.is_some();

        if let Some(countdown) = SlaCountdown::locate(&*dom) {
            let first = countdown.tick(self.clock.now());
            dom.apply_all(first);
            self.spawn_sla(countdown);
            summary.sla = true;
        }

        wiring.search = dom.element_by_id(search::INPUT_ID);
        summary.search = wiring.search.is_some();

        for (node, animation) in counter::collect(&*dom) {
            self.spawn_counter(node, animation);
            summary.counters += 1;
        }

        wiring.forms = validation::collect(&*dom);
        summary.forms = wiring.forms.len();

        wiring.ready = Some(summary);
        info!(
            chart = summary.chart,
            loader = summary.loader,
            sla = summary.sla,
            search = summary.search,
            counters = summary.counters,
            forms = summary.forms,
            "page ready"
        );
        summary
    }

    /// Window `load`: fade the overlay now, drop it from layout shortly after.
    pub async fn window_loaded(&self) {
        let Some(overlay) = self.wiring.lock().await.loader.clone() else {
            return;
        };
        self.dom.lock().await.apply_all(loader::fade_out(&overlay));

        let dom = Arc::clone(&self.dom);
        tokio::spawn(async move {
            sleep(loader::FADE_OUT).await;
            dom.lock().await.apply_all(loader::hide(&overlay));
        });
    }

    pub async fn click(&self, event: ClickEvent<D::Node>) -> EventOutcome {
        let wiring = self.wiring.lock().await;
        let mut outcome = EventOutcome::default();
        if wiring.ready.is_none() {
            return outcome;
        }

        let mut dom = self.dom.lock().await;
        for (route, node) in route_click(&*dom, &event.target) {
            match route {
                ClickRoute::Navigation => {
                    if let Some(overlay) = &wiring.loader {
                        let mutations = loader::plan_click(&*dom, overlay, &event);
                        dom.apply_all(mutations);
                    }
                }
                ClickRoute::MarkRead => {
                    outcome.default_prevented = true;
                    self.dispatch_mark_read(&*dom, &node).await;
                }
            }
        }
        outcome
    }

    /// `input` event on any element; only the dashboard search box reacts.
    pub async fn input(&self, target: &D::Node) {
        let wiring = self.wiring.lock().await;
        if wiring.search.as_ref() != Some(target) {
            return;
        }
        let mut dom = self.dom.lock().await;
        let query = dom.value(target);
        let mutations = search::plan_filter(&*dom, &query);
        dom.apply_all(mutations);
    }

    pub async fn submit(&self, form: &D::Node) -> EventOutcome {
        let wiring = self.wiring.lock().await;
        if !wiring.forms.contains(form) {
            return EventOutcome::default();
        }
        let mut dom = self.dom.lock().await;
        let (outcome, mutations) = validation::plan_submit(&*dom, form);
        dom.apply_all(mutations);
        outcome
    }

    /// Waits for every mark-read request issued so far.
    pub async fn settle(&self) {
        let handles = std::mem::take(&mut *self.in_flight.lock().await);
        for handle in handles {
            if let Err(err) = handle.await {
                error!("mark-read task failed: {err}");
            }
        }
    }

    async fn dispatch_mark_read(&self, dom: &D, control: &D::Node) {
        let Some(target) = notifications::resolve_target(dom, control) else {
            return;
        };
        let Some(request) = notifications::build_request(dom, &target, &self.config.csrf_cookie)
        else {
            warn!(id = ?target.notification_id, "mark-read control has no data-url");
            return;
        };

        let transport = Arc::clone(&self.transport);
        let shared_dom = Arc::clone(&self.dom);
        let handle = tokio::spawn(async move {
            match transport.mark_read(request).await {
                Ok(response) if response.success => {
                    debug!(
                        id = ?target.notification_id,
                        unread = ?response.unread_count,
                        "notification marked read"
                    );
                    shared_dom
                        .lock()
                        .await
                        .apply_all(notifications::plan_marked_read(&target));
                }
                Ok(_) => {
                    debug!(id = ?target.notification_id, "mark-read not acknowledged");
                }
                Err(err) => error!("Notification error: {err}"),
            }
        });
        self.in_flight.lock().await.push(handle);
    }

    fn spawn_sla(&self, countdown: SlaCountdown<D::Node>) {
        let dom = Arc::clone(&self.dom);
        let clock = Arc::clone(&self.clock);
        let token = self.shutdown.clone();
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + sla::TICK, sla::TICK);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => return,
                    _ = ticker.tick() => {
                        let mutations = countdown.tick(clock.now());
                        dom.lock().await.apply_all(mutations);
                    }
                }
            }
        });
    }

    fn spawn_counter(&self, node: D::Node, mut animation: CounterAnimation) {
        let dom = Arc::clone(&self.dom);
        let token = self.shutdown.clone();
        tokio::spawn(async move {
            let mut delay = counter::STAGGER;
            loop {
                tokio::select! {
                    _ = token.cancelled() => return,
                    _ = sleep(delay) => {}
                }
                let step = animation.step();
                dom.lock().await.apply(counter::render(node.clone(), step));
                match step {
                    Step::Continue { next, .. } => delay = next,
                    Step::Done { .. } => return,
                }
            }
        });
    }
}
