// SPDX-License-Identifier: AGPL-3.0
// Colis CLI - Subcommand handlers

use crate::view;
use crate::{RangeArgs, SessionArgs, SettingsCommand};
use anyhow::{anyhow, Result};
use chrono::{Datelike, Local, NaiveDate};
use colis_core::dashboard::{
    monthly_delivery_counts, monthly_order_amounts, DeliveryDashboard, FinanceSummary,
    HistoryView, HomeSummary,
};
use colis_core::display::selector_label;
use colis_core::range::{end_of_day, start_of_day};
use colis_core::zones::{find_commune, COMMUNES};
use colis_core::{
    estimate_fee, ApiClient, AppError, AppSettings, AppState, ParcelCategory, RangeSelector,
    SettingsStore, Synchronizer,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

pub struct Context {
    store: SettingsStore,
    settings: AppSettings,
    json: bool,
}

impl Context {
    /// Open the settings file and apply one-run overrides
    pub fn load(config: Option<PathBuf>, api_url: Option<String>, json: bool) -> Result<Self> {
        let store = match config {
            Some(path) => SettingsStore::open(path),
            None => SettingsStore::new(),
        }
        .map_err(screen_error)?;

        let mut settings = store.get();
        if let Some(url) = api_url {
            settings.api_base_url = url;
        }

        Ok(Self {
            store,
            settings,
            json,
        })
    }

    fn print<T: Serialize>(&self, value: &T, text: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            text(value);
        }
        Ok(())
    }

    async fn session(&self, session: &SessionArgs) -> Result<Synchronizer<ApiClient>> {
        let client = ApiClient::new(&self.settings).map_err(screen_error)?;
        let sync = Synchronizer::new(client, Arc::new(AppState::new()));
        sync.sign_in(&session.phone).await.map_err(screen_error)?;
        Ok(sync)
    }

    fn resolve_range(&self, args: &RangeArgs) -> ResolvedRange {
        let today = Local::now().date_naive();
        let anchor = args.anchor.unwrap_or(today);

        let selector = match (args.from, args.to) {
            (Some(from), Some(to)) => RangeSelector::Custom {
                start: start_of_day(from),
                end: end_of_day(to),
            },
            _ => args
                .range
                .unwrap_or(self.settings.default_range)
                .selector(),
        };

        ResolvedRange {
            selector,
            anchor,
            label: selector_label(selector, anchor, today),
        }
    }
}

struct ResolvedRange {
    selector: RangeSelector,
    anchor: NaiveDate,
    label: String,
}

/// Log the detailed error and surface the message a screen would show
fn screen_error(err: AppError) -> anyhow::Error {
    tracing::error!("{}", err);
    anyhow!(err.user_message())
}

pub fn fee(ctx: &Context, origin: &str, destination: &str, category: ParcelCategory) -> Result<()> {
    for commune in [origin, destination] {
        if find_commune(commune).is_none() {
            tracing::warn!("{} is not a served commune; using the distant rate", commune);
        }
    }

    let fee = estimate_fee(origin, destination, category);
    ctx.print(&fee, |fee| {
        println!("{} -> {} ({}): {}", origin, destination, category, fee)
    })
}

pub fn zones(ctx: &Context, commune: Option<&str>) -> Result<()> {
    let communes: Vec<_> = match commune {
        Some(name) => {
            vec![find_commune(name).ok_or_else(|| anyhow!("Commune inconnue: {}", name))?]
        }
        None => COMMUNES.iter().collect(),
    };

    let listing: Vec<(&str, &[&str])> = communes.iter().map(|c| (c.name, c.quartiers)).collect();
    ctx.print(&listing, |listing| view::zones(listing))
}

pub async fn home(ctx: &Context, session: &SessionArgs) -> Result<()> {
    let sync = ctx.session(session).await?;
    sync.refresh_parcels().await.map_err(screen_error)?;

    let summary = HomeSummary::new(&sync.state().parcels.items());
    ctx.print(&summary, view::home)
}

pub async fn history(ctx: &Context, session: &SessionArgs, range: &RangeArgs) -> Result<()> {
    let range = ctx.resolve_range(range);
    let sync = ctx.session(session).await?;
    sync.refresh_parcels().await.map_err(screen_error)?;

    let history = HistoryView::new(&sync.state().parcels.items(), range.selector, range.anchor);
    ctx.print(&history, |history| view::history(&range.label, history))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FinanceReport {
    year: i32,
    summary: FinanceSummary,
    monthly_amounts: [colis_core::Money; 12],
}

pub async fn finances(
    ctx: &Context,
    session: &SessionArgs,
    range: &RangeArgs,
    year: Option<i32>,
) -> Result<()> {
    let range = ctx.resolve_range(range);
    let sync = ctx.session(session).await?;
    sync.refresh_finances().await.map_err(screen_error)?;

    let state = sync.state();
    let orders = state.orders.items();
    let year = year.unwrap_or(range.anchor.year());
    let report = FinanceReport {
        year,
        summary: FinanceSummary::new(
            &orders,
            &state.deliveries.items(),
            range.selector,
            range.anchor,
        ),
        monthly_amounts: monthly_order_amounts(&orders, year),
    };

    ctx.print(&report, |report| {
        view::finances(&range.label, &report.summary);
        view::monthly_chart(report.year, &report.monthly_amounts);
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardReport {
    year: i32,
    dashboard: DeliveryDashboard,
    monthly_counts: [usize; 12],
}

pub async fn dashboard(
    ctx: &Context,
    session: &SessionArgs,
    range: &RangeArgs,
    year: Option<i32>,
) -> Result<()> {
    let range = ctx.resolve_range(range);
    let sync = ctx.session(session).await?;
    sync.refresh_deliveries().await.map_err(screen_error)?;

    let deliveries = sync.state().deliveries.items();
    let year = year.unwrap_or(range.anchor.year());
    let report = DashboardReport {
        year,
        dashboard: DeliveryDashboard::new(&deliveries, range.selector, range.anchor),
        monthly_counts: monthly_delivery_counts(&deliveries, year),
    };

    ctx.print(&report, |report| {
        view::dashboard(&range.label, &report.dashboard);
        view::monthly_chart(report.year, &report.monthly_counts);
    })
}

pub async fn parcel(ctx: &Context, session: &SessionArgs, id: &str) -> Result<()> {
    let sync = ctx.session(session).await?;
    let parcel = sync.parcel_details(id).await.map_err(screen_error)?;
    ctx.print(&parcel, view::parcel)
}

pub fn settings(ctx: &Context, cmd: SettingsCommand) -> Result<()> {
    match cmd {
        SettingsCommand::Show => {}
        SettingsCommand::SetApiUrl { url } => {
            ctx.store.set_api_base_url(&url)?;
        }
        SettingsCommand::SetRange { range } => {
            let settings = AppSettings {
                default_range: range,
                ..ctx.store.get()
            };
            ctx.store.update(settings)?;
        }
    }

    let settings = ctx.store.get();
    ctx.print(&settings, |settings| {
        view::settings(settings, &ctx.store.path().display().to_string())
    })
}
