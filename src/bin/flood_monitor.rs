use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use dialoguer::Select;
use flood_monitor::utils::{init_from_config, Config};
use flood_monitor::{AccumulationStrategy, AlertSeverity, MonitorContext, SeriesExport, TextChart};
use std::path::PathBuf;
use tracing::{error, info};

/// Flood-risk monitor for a modelled water inflow
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (overrides FLOOD_MONITOR_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Volume accumulation strategy
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Log level filter (RUST_LOG still takes precedence)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Derivative of the flow rate at t = 10 min
    Derivative,
    /// Final net volume against the critical limit
    Volume,
    /// Flow, derivative and net-volume charts
    Chart,
    /// Charted series as JSON on stdout
    Export,
    /// Menu with all three actions (default)
    Interactive,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum StrategyArg {
    Direct,
    Segmented,
}

impl From<StrategyArg> for AccumulationStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Direct => AccumulationStrategy::Direct,
            StrategyArg::Segmented => AccumulationStrategy::Segmented,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    if let Some(strategy) = args.strategy {
        config.integration.strategy = strategy.into();
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }

    init_from_config(&config.logging)?;
    info!(?config, "Starting flood monitor");

    // All series are computed here, before any action is offered
    let ctx = MonitorContext::standard(&config.integration.aggregator())
        .inspect_err(|err| error!(%err, "Monitoring series could not be computed"))
        .context("computing the monitoring series")?;
    let chart = config.chart.chart();

    match args.command.unwrap_or(Command::Interactive) {
        Command::Derivative => show_derivative(&ctx),
        Command::Volume => show_volume(&ctx),
        Command::Chart => show_charts(&ctx, &chart),
        Command::Export => {
            let export = SeriesExport::from_context(&ctx, config.integration.strategy)?;
            println!("{}", export.to_json(config.export.pretty)?);
        }
        Command::Interactive => run_menu(&ctx, &chart)?,
    }

    Ok(())
}

fn show_derivative(ctx: &MonitorContext) {
    let report = ctx.report_derivative();
    print_dialog(&report.title(), &report.body(), report.severity());
}

fn show_volume(ctx: &MonitorContext) {
    let report = ctx.report_volume();
    print_dialog(report.title(), &report.body(), report.severity());
}

fn show_charts(ctx: &MonitorContext, chart: &TextChart) {
    print!("{}", chart.render(&ctx.get_series(), &ctx.exceedance_intervals()));
}

fn print_dialog(title: &str, body: &str, severity: AlertSeverity) {
    let marker = match severity {
        AlertSeverity::Critical => "⚠ ",
        AlertSeverity::Info => "",
    };

    println!("╔════════════════════════════════════════════════╗");
    println!("  {marker}{title}");
    println!("╚════════════════════════════════════════════════╝");
    println!("{body}");
    println!();
}

/// Entries of the interactive menu, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Derivative,
    Volume,
    Charts,
    Quit,
}

impl MenuAction {
    const ALL: [MenuAction; 4] = [
        MenuAction::Derivative,
        MenuAction::Volume,
        MenuAction::Charts,
        MenuAction::Quit,
    ];

    fn label(&self) -> &'static str {
        match self {
            MenuAction::Derivative => "Compute derivative at t = 10 min",
            MenuAction::Volume => "Check accumulated volume",
            MenuAction::Charts => "Show charts",
            MenuAction::Quit => "Quit",
        }
    }

    /// Escape / Ctrl-C (`None`) quits like the explicit entry
    fn from_selection(selection: Option<usize>) -> MenuAction {
        selection
            .and_then(|i| Self::ALL.get(i).copied())
            .unwrap_or(MenuAction::Quit)
    }
}

fn run_menu(ctx: &MonitorContext, chart: &TextChart) -> anyhow::Result<()> {
    let labels: Vec<&str> = MenuAction::ALL.iter().map(MenuAction::label).collect();
    let mut last = 0;

    loop {
        let selection = Select::new()
            .with_prompt("Flow monitoring")
            .items(&labels)
            .default(last)
            .interact_opt()?;

        match MenuAction::from_selection(selection) {
            MenuAction::Derivative => show_derivative(ctx),
            MenuAction::Volume => show_volume(ctx),
            MenuAction::Charts => show_charts(ctx, chart),
            MenuAction::Quit => break,
        }
        last = selection.unwrap_or(0);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_order_matches_original_buttons() {
        assert_eq!(MenuAction::from_selection(Some(0)), MenuAction::Derivative);
        assert_eq!(MenuAction::from_selection(Some(1)), MenuAction::Volume);
        assert_eq!(MenuAction::from_selection(Some(2)), MenuAction::Charts);
        assert_eq!(MenuAction::from_selection(Some(3)), MenuAction::Quit);
    }

    #[test]
    fn test_cancelled_or_unknown_selection_quits() {
        assert_eq!(MenuAction::from_selection(None), MenuAction::Quit);
        assert_eq!(MenuAction::from_selection(Some(9)), MenuAction::Quit);
    }

    #[test]
    fn test_menu_labels() {
        let labels: Vec<&str> = MenuAction::ALL.iter().map(MenuAction::label).collect();
        assert_eq!(labels[0], "Compute derivative at t = 10 min");
        assert_eq!(labels[3], "Quit");
    }
}
