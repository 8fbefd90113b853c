//! dash-runner: headless driver for the subscription dashboard core.
//!
//! Usage:
//!   dash-runner --start 2026-01-17 --end 2026-02-16 --platforms ios --plans monthly,annual
//!   dash-runner --data-start 2025-01-01 --days 420 --config data/segments/segment_params.json --json
//!   dash-runner --ipc-mode

use anyhow::Result;
use chrono::NaiveDate;
use subdash_core::{
    calendar::{parse_iso_date, SimWindow},
    config::GeneratorConfig,
    dashboard::{self, Dashboard, DEMO_DATA_DAYS, DEMO_VIEW_DAYS},
    error::DashResult,
    filter::Filters,
    kpi::{ChangeUnit, KpiCard, Trend},
    snapshot::DashboardSnapshot,
    types::{Plan, Platform},
};
use std::env;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetView,
    SetFilters {
        start: NaiveDate,
        end: NaiveDate,
        #[serde(default)]
        platforms: Option<Vec<Platform>>,
        #[serde(default)]
        plans: Option<Vec<Plan>>,
    },
    TogglePlatform {
        platform: Platform,
    },
    TogglePlan {
        plan: Plan,
    },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let json = args.iter().any(|a| a == "--json");

    let data_start = match flag_value(&args, "--data-start") {
        Some(s) => parse_iso_date(s)?,
        None => dashboard::demo_data_start(),
    };
    let days = parse_arg(&args, "--days", DEMO_DATA_DAYS);
    let config = match flag_value(&args, "--config") {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };

    let end = match flag_value(&args, "--end") {
        Some(s) => parse_iso_date(s)?,
        None => dashboard::demo_view_end(),
    };
    let mut filters = match flag_value(&args, "--start") {
        Some(s) => Filters::new(parse_iso_date(s)?, end),
        None => Filters::trailing(end, DEMO_VIEW_DAYS),
    };
    if let Some(list) = flag_value(&args, "--platforms") {
        filters = filters.with_platforms(parse_list::<Platform>(list)?)?;
    }
    if let Some(list) = flag_value(&args, "--plans") {
        filters = filters.with_plans(parse_list::<Plan>(list)?)?;
    }

    let mut dashboard = Dashboard::new(config, SimWindow::new(data_start, days), filters);

    if ipc_mode {
        run_ipc_loop(&mut dashboard)?;
    } else {
        let view = dashboard.view();
        if json {
            println!("{}", view.to_json_pretty()?);
        } else {
            print_summary(&view);
        }
    }

    Ok(())
}

fn run_ipc_loop(dashboard: &mut Dashboard) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Ignoring malformed command: {e}");
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetView => {}
            IpcCommand::SetFilters { start, end, platforms, plans } => {
                let applied = apply_filters(
                    dashboard.filters().clone(),
                    start,
                    end,
                    platforms,
                    plans,
                );
                match applied {
                    Ok(filters) => dashboard.set_filters(filters),
                    Err(e) => {
                        log::warn!("Rejected filters: {e}");
                        write_error(&mut stdout, &e.to_string())?;
                        continue;
                    }
                }
            }
            IpcCommand::TogglePlatform { platform } => {
                if !dashboard.toggle_platform(platform) {
                    log::warn!("Kept {platform}: at least one platform must stay selected");
                }
            }
            IpcCommand::TogglePlan { plan } => {
                if !dashboard.toggle_plan(plan) {
                    log::warn!("Kept {plan}: at least one plan must stay selected");
                }
            }
        }

        let view = dashboard.view();
        writeln!(stdout, "{}", view.to_json()?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn apply_filters(
    base: Filters,
    start: NaiveDate,
    end: NaiveDate,
    platforms: Option<Vec<Platform>>,
    plans: Option<Vec<Plan>>,
) -> DashResult<Filters> {
    let mut filters = base.with_date_range(start, end);
    if let Some(platforms) = platforms {
        filters = filters.with_platforms(platforms)?;
    }
    if let Some(plans) = plans {
        filters = filters.with_plans(plans)?;
    }
    Ok(filters)
}

fn write_error(stdout: &mut io::Stdout, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(stdout, "{}", err_json)?;
    stdout.flush()?;
    Ok(())
}

fn print_summary(view: &DashboardSnapshot) {
    let platforms: Vec<_> = view.filters.platforms().iter().map(|p| p.name()).collect();
    let plans: Vec<_> = view.filters.plans().iter().map(|p| p.name()).collect();

    println!("Subscription Analytics (demo data)");
    println!("  data:       {} days from {}", view.window.days, view.window.start);
    println!("  period:     {} .. {}", view.filters.start_date, view.filters.end_date);
    println!("  platforms:  {}", platforms.join(","));
    println!("  plans:      {}", plans.join(","));
    println!();

    println!("=== KPI SUMMARY (vs previous period) ===");
    for card in &view.cards {
        println!("  {:<28} {:>14}  {}", card.metric.label(), format_value(card), format_change(card));
    }
    println!();

    println!("=== DAILY (last 7 days) ===");
    if view.daily.is_empty() {
        println!("  (No matching days)");
        return;
    }
    let start = view.daily.len().saturating_sub(7);
    for day in &view.daily[start..] {
        println!(
            "  {} | active {:>7} | new {:>4} | cancel {:>4} | MRR ¥{:>11} | trial {:>4}/{:<4} ({:.1}%)",
            day.date,
            day.active_subs,
            day.new_subs,
            day.cancellations,
            day.mrr,
            day.trial_conversions,
            day.trial_starts,
            day.trial_conversion_rate(),
        );
    }
}

fn format_value(card: &KpiCard) -> String {
    match card.unit {
        ChangeUnit::Points => format!("{:.1}%", card.value),
        ChangeUnit::Percent => format!("{:.0}", card.value),
    }
}

fn format_change(card: &KpiCard) -> String {
    let sign = if card.change >= 0.0 { "+" } else { "" };
    let unit = match card.unit {
        ChangeUnit::Points => "pt",
        ChangeUnit::Percent => "%",
    };
    let marker = match card.trend {
        Trend::Flat => "=",
        Trend::Favorable => "▲",
        Trend::Unfavorable => "▼",
    };
    format!("{marker} {sign}{:.1}{unit}", card.change)
}

fn parse_list<T: FromStr>(list: &str) -> Result<Vec<T>, T::Err> {
    list.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(T::from_str)
        .collect()
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
