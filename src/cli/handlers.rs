//! Command table and handlers for the savings shell.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::core::services::{LedgerReport, ReportService, SavingsService};
use crate::core::ReplacePolicy;
use crate::currency::{self, format_date, format_number, format_rupiah, LocaleConfig};

use super::context::{CommandError, CommandResult, ShellContext};
use super::output::{self, Alignment, Table};

const BAR_WIDTH: u32 = 30;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

pub(crate) static COMMANDS: &[CommandEntry] = &[
    CommandEntry {
        name: "goal",
        description: "Save a savings goal and make it active",
        usage: "goal <name> <target> [months] [start YYYY-MM-DD]",
        handler: cmd_goal,
    },
    CommandEntry {
        name: "use",
        description: "Switch the active goal",
        usage: "use <name>",
        handler: cmd_use,
    },
    CommandEntry {
        name: "goals",
        description: "List saved goals",
        usage: "goals",
        handler: cmd_goals,
    },
    CommandEntry {
        name: "deposit",
        description: "Add money to a goal",
        usage: "deposit <amount> [goal]",
        handler: cmd_deposit,
    },
    CommandEntry {
        name: "withdraw",
        description: "Take money out of a goal",
        usage: "withdraw <amount> [goal]",
        handler: cmd_withdraw,
    },
    CommandEntry {
        name: "balance",
        description: "Show the current balance",
        usage: "balance [goal]",
        handler: cmd_balance,
    },
    CommandEntry {
        name: "report",
        description: "Show progress, transactions and totals",
        usage: "report [goal]",
        handler: cmd_report,
    },
    CommandEntry {
        name: "policy",
        description: "Show or set what re-saving an existing goal does",
        usage: "policy [replace|update]",
        handler: cmd_policy,
    },
    CommandEntry {
        name: "help",
        description: "Show available commands",
        usage: "help [command]",
        handler: cmd_help,
    },
    CommandEntry {
        name: "version",
        description: "Show build metadata",
        usage: "version",
        handler: cmd_version,
    },
    CommandEntry {
        name: "exit",
        description: "Exit the shell",
        usage: "exit",
        handler: cmd_exit,
    },
];

pub(crate) fn find(name: &str) -> Option<&'static CommandEntry> {
    COMMANDS
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(name))
}

fn usage_error(name: &str) -> CommandError {
    let usage = find(name).map(|entry| entry.usage).unwrap_or(name);
    CommandError::InvalidArguments(format!("usage: {}", usage))
}

pub(crate) fn parse_amount(input: &str, locale: &LocaleConfig) -> Result<Decimal, CommandError> {
    currency::parse_amount(input, locale).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "invalid amount `{}` (e.g. 150000 or {})",
            input,
            format_number(locale, Decimal::from(150_000))
        ))
    })
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

fn parse_months(input: &str) -> Result<u32, CommandError> {
    input.parse::<u32>().map_err(|_| {
        CommandError::InvalidArguments(format!("invalid duration `{}` (whole months)", input))
    })
}

fn cmd_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (name, target) = match args {
        [name, target, ..] => (*name, parse_amount(target, context.session.locale())?),
        _ => return Err(usage_error("goal")),
    };
    let months = match args.get(2) {
        Some(raw) => parse_months(raw)?,
        None => context.session.config().default_duration_months,
    };
    let start = match args.get(3) {
        Some(raw) => parse_date(raw)?,
        None => context.session.today(),
    };

    let outcome = SavingsService::save_goal(&mut context.session, name, target, months, start);
    context.report_outcome(&outcome);
    if outcome.is_success() {
        context.active_goal = Some(name.to_string());
    }
    Ok(())
}

fn cmd_use(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = args.first().ok_or_else(|| usage_error("use"))?;
    match SavingsService::lookup(&context.session, name) {
        Ok(ledger) => {
            output::info(format!("Active goal: {}", ledger.goal_name()));
            context.active_goal = Some(name.to_string());
        }
        Err(err) => output::error(err),
    }
    Ok(())
}

fn cmd_goals(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let registry = context.session.registry();
    if registry.is_empty() {
        output::info("No goals saved yet.");
        return Ok(());
    }
    let locale = context.session.locale();
    let mut table = Table::new(&[
        ("Goal", Alignment::Left),
        ("Balance", Alignment::Right),
        ("Target", Alignment::Right),
        ("Months", Alignment::Right),
        ("Progress", Alignment::Right),
    ]);
    for ledger in registry.ledgers() {
        let marker = if context.active_goal.as_deref() == Some(ledger.goal_name()) {
            "*"
        } else {
            ""
        };
        table.push(vec![
            format!("{}{}", ledger.goal_name(), marker),
            format_rupiah(ledger.balance(), locale),
            format_rupiah(ledger.target_amount(), locale),
            ledger.duration_months().to_string(),
            ledger
                .progress_percent()
                .map(|p| format!("{}%", format_number(locale, p)))
                .unwrap_or_else(|| "-".into()),
        ]);
    }
    output::render_table(&table);
    Ok(())
}

fn cmd_deposit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args.first().ok_or_else(|| usage_error("deposit"))?;
    let amount = parse_amount(raw, context.session.locale())?;
    let goal = context.target_goal(args.get(1).copied())?;
    let outcome = SavingsService::deposit(&mut context.session, &goal, amount);
    context.report_outcome(&outcome);
    Ok(())
}

fn cmd_withdraw(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args.first().ok_or_else(|| usage_error("withdraw"))?;
    let amount = parse_amount(raw, context.session.locale())?;
    let goal = context.target_goal(args.get(1).copied())?;
    let outcome = SavingsService::withdraw(&mut context.session, &goal, amount);
    context.report_outcome(&outcome);
    Ok(())
}

fn cmd_balance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let goal = context.target_goal(args.first().copied())?;
    match SavingsService::lookup(&context.session, &goal) {
        Ok(ledger) => output::info(format!(
            "Current balance: {}",
            format_rupiah(ledger.balance(), context.session.locale())
        )),
        Err(err) => output::error(err),
    }
    Ok(())
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let goal = context.target_goal(args.first().copied())?;
    let report = match SavingsService::lookup(&context.session, &goal) {
        Ok(ledger) => ReportService::report(ledger, context.session.today()),
        Err(err) => {
            output::error(err);
            return Ok(());
        }
    };
    render_report(context, &report);
    Ok(())
}

fn render_report(context: &ShellContext, report: &LedgerReport) {
    let locale = context.session.locale();
    output::section(format!("Report: {}", report.goal_name));
    for line in report.summary_lines(locale) {
        output::info(line);
    }

    if !report.has_transactions() {
        output::info("No transactions yet.");
        return;
    }

    let mut table = Table::new(&[
        ("Type", Alignment::Left),
        ("Amount", Alignment::Right),
        ("Date", Alignment::Left),
    ]);
    for row in &report.rows {
        table.push(vec![
            row.kind.label().to_string(),
            format_rupiah(row.amount, locale),
            format_date(row.date),
        ]);
    }
    output::render_table(&table);

    let Some(totals) = report.totals else {
        output::warning("Totals are too large to chart.");
        return;
    };
    output::section("Transaction summary");
    let bars = totals.bars();
    let peak = bars
        .iter()
        .map(|(_, value)| *value)
        .max()
        .unwrap_or(Decimal::ZERO);
    for (kind, value) in bars {
        println!(
            "{:<10}  {:<width$}  {}",
            kind.label(),
            bar(value, peak),
            format_rupiah(value, locale),
            width = BAR_WIDTH as usize
        );
    }
}

fn bar(value: Decimal, peak: Decimal) -> String {
    if peak <= Decimal::ZERO {
        return String::new();
    }
    let length = value
        .checked_div(peak)
        .and_then(|share| share.checked_mul(Decimal::from(BAR_WIDTH)))
        .and_then(|scaled| scaled.round().to_usize())
        .unwrap_or(0)
        .min(BAR_WIDTH as usize);
    "#".repeat(length)
}

fn cmd_policy(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        output::info(format!(
            "Re-saving a goal uses policy `{}`.",
            context.session.replace_policy().label()
        ));
        return Ok(());
    };
    let policy = ReplacePolicy::parse(raw).ok_or_else(|| usage_error("policy"))?;
    context.session.set_replace_policy(policy);
    context
        .config_manager
        .save(context.session.config())?;
    if policy == ReplacePolicy::Replace {
        output::warning("Re-saving an existing goal will discard its balance and history.");
    }
    output::success(format!("Policy set to `{}`.", policy.label()));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.command(name) {
            Some(entry) => {
                output::section(format!("Help: {}", entry.name));
                output::info(format!("  Description: {}", entry.description));
                output::info(format!("  Usage: {}", entry.usage));
            }
            None => context.suggest_command(name),
        }
        return Ok(());
    }

    output::section("Available commands");
    for entry in COMMANDS {
        output::info(format!("  {:<10} {}", entry.name, entry.description));
    }
    output::info("Use `help <command>` for details.");
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section(format!("Savings Core {}", env!("CARGO_PKG_VERSION")));
    let rows = [
        (
            "Build hash",
            format!(
                "{} ({})",
                env!("SAVINGS_CORE_BUILD_HASH"),
                env!("SAVINGS_CORE_BUILD_STATUS")
            ),
        ),
        ("Built at", env!("SAVINGS_CORE_BUILD_TIMESTAMP").to_string()),
        ("Target", env!("SAVINGS_CORE_BUILD_TARGET").to_string()),
        ("Profile", env!("SAVINGS_CORE_BUILD_PROFILE").to_string()),
    ];
    for (label, value) in rows {
        output::info(format!("{:<12} {}", label, value));
    }
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn amounts_accept_grouped_and_underscored_digits() {
        let locale = LocaleConfig::default();
        assert_eq!(parse_amount("150000", &locale).unwrap(), dec!(150000));
        assert_eq!(parse_amount("100.000", &locale).unwrap(), dec!(100000));
        assert_eq!(parse_amount("1_500_000", &locale).unwrap(), dec!(1500000));
        assert_eq!(parse_amount("-20", &locale).unwrap(), dec!(-20));
        assert!(matches!(
            parse_amount("lots", &locale),
            Err(CommandError::InvalidArguments(_))
        ));
    }

    #[test]
    fn bars_scale_to_peak() {
        assert_eq!(bar(dec!(750000), dec!(750000)).len(), 30);
        assert_eq!(bar(dec!(100000), dec!(750000)).len(), 4);
        assert_eq!(bar(dec!(0), dec!(0)), "");
    }

    #[test]
    fn bars_near_decimal_max_do_not_overflow() {
        assert_eq!(bar(Decimal::MAX, Decimal::MAX).len(), 30);
        assert_eq!(bar(dec!(3000000000000000000000000000), Decimal::MAX).len(), 1);
        assert_eq!(bar(dec!(1), Decimal::MAX), "");
    }

    #[test]
    fn command_lookup_ignores_case() {
        assert_eq!(find("DEPOSIT").map(|entry| entry.name), Some("deposit"));
        assert!(find("deposits").is_none());
    }
}
