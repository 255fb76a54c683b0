//! Command table and handlers. Handlers stay thin: parse arguments, call the
//! tracker, render the outcome.

use std::collections::HashMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    ledger::{CategoryDraft, CategoryEdit, CategoryStatus, PayoffProjection, PaymentDraft},
    sync::SyncStatus,
};

use super::{
    context::{CommandError, CommandResult, LoopControl, ShellContext},
    output,
    registry::{CommandEntry, CommandRegistry},
};

pub fn build_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(CommandEntry::new(
        "summary",
        "Show balances, costs, and the payoff projection",
        "summary",
        cmd_summary,
    ));
    registry.register(CommandEntry::new(
        "categories",
        "List categories with payment progress",
        "categories",
        cmd_categories,
    ));
    registry.register(CommandEntry::new(
        "payments",
        "List payments, newest first",
        "payments [count]",
        cmd_payments,
    ));
    registry.register(CommandEntry::new(
        "pay",
        "Record a payment against a category",
        "pay <category-id> <amount> [date] [--method <name>] [--notes <text>]",
        cmd_pay,
    ));
    registry.register(CommandEntry::new(
        "unpay",
        "Delete a payment, reversing its effects",
        "unpay <payment-id>",
        cmd_unpay,
    ));
    registry.register(CommandEntry::new(
        "add-category",
        "Add a fixed or recurring category",
        "add-category <name> (--total <amount> | --rate <amount> --months <count>) [--due <date>] [--notes <text>]",
        cmd_add_category,
    ));
    registry.register(CommandEntry::new(
        "remove-category",
        "Delete a category; its payments become unattributed",
        "remove-category <category-id>",
        cmd_remove_category,
    ));
    registry.register(CommandEntry::new(
        "edit",
        "Edit a category field",
        "edit <category-id> <total|rate|months|due|notes> <value>",
        cmd_edit,
    ));
    registry.register(CommandEntry::new(
        "set",
        "Set a ledger figure",
        "set <balance|budget|income|savings> <amount>",
        cmd_set,
    ));
    registry.register(CommandEntry::new(
        "status",
        "Show sync status and ledger diagnostics",
        "status",
        cmd_status,
    ));
    registry.register(CommandEntry::new(
        "sync",
        "Push pending changes to the remote now",
        "sync",
        cmd_sync,
    ));
    registry.register(CommandEntry::new(
        "help",
        "Show available commands",
        "help",
        cmd_help,
    ));
    registry.register(CommandEntry::new(
        "version",
        "Show the application version",
        "version",
        cmd_version,
    ));
    registry.register(CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit));
    registry
}

fn cmd_help(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Commands");
    for entry in context.registry().list() {
        output::plain(format!("  {:<16} {}", entry.name, entry.description));
        output::plain(format!("  {:<16} usage: {}", "", entry.usage));
    }
    Ok(LoopControl::Continue)
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::info(format!("trousseau {}", env!("CARGO_PKG_VERSION")));
    Ok(LoopControl::Continue)
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::info("Goodbye.");
    Ok(LoopControl::Exit)
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ledger = context.tracker.ledger();
    let metrics = context.tracker.metrics();

    output::section("Budget summary");
    output::plain(format!(
        "Balance:          {}",
        output::format_amount(ledger.balance)
    ));
    output::plain(format!(
        "Budget ceiling:   {}",
        output::format_amount(ledger.total_budget)
    ));
    output::plain(format!(
        "Monthly income:   {}",
        output::format_amount(ledger.monthly_income)
    ));
    output::plain(format!(
        "Monthly savings:  {}",
        output::format_amount(ledger.monthly_savings)
    ));
    output::plain(format!(
        "Total cost:       {}",
        output::format_amount(metrics.total_cost)
    ));
    output::plain(format!(
        "Total paid:       {}  {}",
        output::format_amount(metrics.total_paid),
        output::progress_bar(metrics.percent_paid, 20)
    ));
    output::plain(format!(
        "Remaining:        {}",
        output::format_amount(metrics.total_remaining)
    ));
    if metrics.budget_exceeded {
        output::warning("Planned costs exceed the budget ceiling.");
    }
    if metrics.is_insufficient {
        output::warning(format!(
            "Balance is short by {}.",
            output::format_amount(metrics.deficit)
        ));
    }
    match metrics.projection {
        PayoffProjection::Covered => {
            output::success("Remaining costs are covered by the current balance.")
        }
        PayoffProjection::Months(months) => output::info(format!(
            "About {months} month(s) of saving to cover the rest."
        )),
        PayoffProjection::NoSavingsPlan => {
            output::warning("There is a deficit but no monthly savings are configured.")
        }
    }
    output::plain(format!(
        "Sync:             {}",
        context.tracker.status().as_str()
    ));
    Ok(LoopControl::Continue)
}

fn cmd_categories(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ledger = context.tracker.ledger();
    if ledger.categories.is_empty() {
        output::info("No categories yet. Try `add-category`.");
        return Ok(LoopControl::Continue);
    }
    output::section("Categories");
    for category in &ledger.categories {
        let model = if category.is_recurring {
            format!(
                "{}/month x {}",
                output::format_amount(category.monthly_rate),
                category.months_total
            )
        } else {
            format!("fixed {}", output::format_amount(category.total))
        };
        output::plain(format!(
            "  {:<12} {:<20} {:<22} paid {} of {}  [{}]",
            category.id,
            category.name,
            model,
            output::format_amount(category.paid),
            output::format_amount(category.effective_cost()),
            CategoryStatus::of(category).as_str()
        ));
        if category.is_recurring && category.months_total > 0 {
            output::plain(format!(
                "  {:<12} months covered: {}/{}",
                "", category.months_paid, category.months_total
            ));
        }
        if let Some(due) = category.due_date {
            output::plain(format!("  {:<12} due {}", "", due));
        }
    }
    Ok(LoopControl::Continue)
}

fn cmd_payments(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "payments [count]";
    let limit = match args {
        [] => 10,
        [raw] => parse_count(raw)?,
        _ => return Err(CommandError::Usage(USAGE)),
    };
    let ledger = context.tracker.ledger();
    if ledger.payments.is_empty() {
        output::info("No payments recorded.");
        return Ok(LoopControl::Continue);
    }
    output::section("Payments");
    for payment in ledger.payments.iter().take(limit) {
        let attribution = ledger
            .category(&payment.category_id)
            .map(|category| category.name.as_str())
            .unwrap_or("(unattributed)");
        output::plain(format!(
            "  {}  {}  {:>12}  {:<20}  {}",
            payment.id,
            payment.date,
            output::format_amount(payment.amount),
            attribution,
            payment.method.as_deref().unwrap_or("-")
        ));
    }
    if ledger.payments.len() > limit {
        output::info(format!("... and {} more", ledger.payments.len() - limit));
    }
    Ok(LoopControl::Continue)
}

fn cmd_pay(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "pay <category-id> <amount> [date] [--method <name>] [--notes <text>]";
    let mut parsed = parse_args(args, &["--method", "--notes"], USAGE)?;
    let (category_id, amount, date) = match parsed.positional.as_slice() {
        [category, amount] => (*category, parse_amount(amount)?, context.tracker.today()),
        [category, amount, date] => (*category, parse_amount(amount)?, parse_date(date)?),
        _ => return Err(CommandError::Usage(USAGE)),
    };

    if context.tracker.ledger().category(category_id).is_none() {
        output::warning(format!(
            "No category `{category_id}`; the payment will be unattributed."
        ));
    }

    let mut draft = PaymentDraft::new(category_id, amount, date);
    draft.method = parsed.flags.remove("--method");
    draft.notes = parsed.flags.remove("--notes");

    let id = context.tracker.add_payment(draft)?;
    output::success(format!(
        "Recorded payment {} of {}.",
        id,
        output::format_amount(amount)
    ));
    Ok(LoopControl::Continue)
}

fn cmd_unpay(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "unpay <payment-id>";
    let raw = match args {
        [raw] => *raw,
        _ => return Err(CommandError::Usage(USAGE)),
    };
    let id = Uuid::parse_str(raw)
        .map_err(|_| CommandError::Failed(format!("`{raw}` is not a payment id")))?;

    let (amount, date) = match context.tracker.ledger().payment(id) {
        Some(payment) => (payment.amount, payment.date),
        None => {
            output::warning(format!("No payment with id {id}."));
            return Ok(LoopControl::Continue);
        }
    };

    let prompt = format!(
        "Delete the payment of {} made on {}?",
        output::format_amount(amount),
        date
    );
    if !context.confirm(&prompt)? {
        output::info("Kept the payment.");
        return Ok(LoopControl::Continue);
    }

    context.tracker.delete_payment(id);
    output::success("Payment deleted; balance and category progress restored.");
    Ok(LoopControl::Continue)
}

fn cmd_add_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str =
        "add-category <name> (--total <amount> | --rate <amount> --months <count>) [--due <date>] [--notes <text>]";
    let mut parsed = parse_args(args, &["--total", "--rate", "--months", "--due", "--notes"], USAGE)?;
    let name = match parsed.positional.as_slice() {
        [name] => name.to_string(),
        _ => return Err(CommandError::Usage(USAGE)),
    };

    let total = parsed.flags.remove("--total");
    let rate = parsed.flags.remove("--rate");
    let months = parsed.flags.remove("--months");
    let mut draft = match (total, rate, months) {
        (Some(total), None, None) => CategoryDraft::fixed(name, parse_amount(&total)?),
        (None, Some(rate), Some(months)) => {
            CategoryDraft::recurring(name, parse_amount(&rate)?, parse_months(&months)?)
        }
        _ => return Err(CommandError::Usage(USAGE)),
    };
    if let Some(due) = parsed.flags.remove("--due") {
        draft.due_date = Some(parse_date(&due)?);
    }
    draft.notes = parsed.flags.remove("--notes");

    let id = context.tracker.add_category(draft);
    output::success(format!("Added category `{id}`."));
    Ok(LoopControl::Continue)
}

fn cmd_remove_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "remove-category <category-id>";
    let id = match args {
        [id] => *id,
        _ => return Err(CommandError::Usage(USAGE)),
    };

    let name = match context.tracker.ledger().category(id) {
        Some(category) => category.name.clone(),
        None => {
            output::warning(format!("No category `{id}`."));
            return Ok(LoopControl::Continue);
        }
    };
    let references = context
        .tracker
        .ledger()
        .payments
        .iter()
        .filter(|payment| payment.category_id == id)
        .count();

    if !context.confirm(&format!("Delete category `{name}`?"))? {
        output::info("Kept the category.");
        return Ok(LoopControl::Continue);
    }

    context.tracker.delete_category(id);
    output::success(format!("Deleted category `{name}`."));
    if references > 0 {
        output::info(format!("{references} payment(s) are now unattributed."));
    }
    Ok(LoopControl::Continue)
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "edit <category-id> <total|rate|months|due|notes> <value>";
    let (id, field, value) = match args {
        [id, field, rest @ ..] if !rest.is_empty() => (*id, *field, rest.join(" ")),
        _ => return Err(CommandError::Usage(USAGE)),
    };

    let edit = match field {
        "total" => CategoryEdit::Total(parse_amount(&value)?),
        "rate" => CategoryEdit::MonthlyRate(parse_amount(&value)?),
        "months" => CategoryEdit::MonthsTotal(parse_months(&value)?),
        "due" => CategoryEdit::DueDate(if value == "none" {
            None
        } else {
            Some(parse_date(&value)?)
        }),
        "notes" => CategoryEdit::Notes(if value == "none" { None } else { Some(value) }),
        _ => return Err(CommandError::Usage(USAGE)),
    };

    context.tracker.edit_category(id, edit)?;
    output::success(format!("Updated `{id}`."));
    Ok(LoopControl::Continue)
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "set <balance|budget|income|savings> <amount>";
    let (field, raw) = match args {
        [field, raw] => (*field, *raw),
        _ => return Err(CommandError::Usage(USAGE)),
    };
    let value = parse_amount(raw)?;
    match field {
        "balance" => context.tracker.set_balance(value),
        "budget" => context.tracker.set_total_budget(value),
        "income" => context.tracker.set_monthly_income(value),
        "savings" => context.tracker.set_monthly_savings(value),
        _ => return Err(CommandError::Usage(USAGE)),
    }
    output::success(format!("Set {field} to {}.", output::format_amount(value)));
    Ok(LoopControl::Continue)
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Sync status");
    output::plain(format!(
        "Status: {}",
        context.tracker.status().as_str()
    ));
    output::plain(format!(
        "Remote: {}",
        if context.tracker.is_remote_enabled() {
            "configured"
        } else {
            "disabled"
        }
    ));
    if let Some(detail) = context.tracker.last_error() {
        output::error(format!("Last error: {detail}"));
    }
    if context.tracker.has_pending_upsert() {
        output::info("A remote push is pending.");
    }
    let warnings = context.tracker.warnings();
    if warnings.is_empty() {
        output::plain("No dangling payment references.");
    }
    for warning in warnings {
        output::warning(warning);
    }
    Ok(LoopControl::Continue)
}

fn cmd_sync(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.tracker.is_remote_enabled() {
        output::info("Remote sync is disabled this session.");
        return Ok(LoopControl::Continue);
    }
    if !context.tracker.has_pending_upsert() {
        output::info("Nothing pending to push.");
        return Ok(LoopControl::Continue);
    }
    context.tracker.flush();
    match context.tracker.status() {
        SyncStatus::Online => output::success("Pushed the latest state to the remote."),
        _ => output::error(
            context
                .tracker
                .last_error()
                .unwrap_or("push did not complete")
                .to_string(),
        ),
    }
    Ok(LoopControl::Continue)
}

struct ParsedArgs<'a> {
    positional: Vec<&'a str>,
    flags: HashMap<&'static str, String>,
}

fn parse_args<'a>(
    args: &[&'a str],
    allowed: &[&'static str],
    usage: &'static str,
) -> Result<ParsedArgs<'a>, CommandError> {
    let mut positional = Vec::new();
    let mut flags = HashMap::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if let Some(name) = allowed.iter().find(|flag| **flag == *arg) {
            let value = iter.next().ok_or(CommandError::Usage(usage))?;
            flags.insert(*name, value.to_string());
        } else if arg.starts_with("--") {
            return Err(CommandError::Usage(usage));
        } else {
            positional.push(*arg);
        }
    }
    Ok(ParsedArgs { positional, flags })
}

fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CommandError::Failed(format!("`{raw}` is not an amount")))
}

fn parse_count(raw: &str) -> Result<usize, CommandError> {
    raw.parse()
        .map_err(|_| CommandError::Failed(format!("`{raw}` is not a count")))
}

fn parse_months(raw: &str) -> Result<u32, CommandError> {
    raw.parse()
        .map_err(|_| CommandError::Failed(format!("`{raw}` is not a month count")))
}

fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| CommandError::Failed(format!("`{raw}` is not a date (expected YYYY-MM-DD)")))
}
