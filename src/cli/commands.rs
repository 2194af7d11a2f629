use chrono::NaiveDate;
use sbudget_config::SettingsPatch;
use sbudget_core::{DraftKind, TransactionDraft};
use sbudget_domain::{DistributionEntry, Month};

use super::{
    core::{CommandError, CommandResult, ShellContext},
    output, render,
    registry::{CommandEntry, CommandRegistry},
};
use crate::{
    app::{parse_transaction_id, BudgetMode, View},
    errors::AppError,
    utils::build_info,
};

const DEFAULT_LIST_LIMIT: usize = 20;

pub fn register_all(registry: &mut CommandRegistry) {
    let entries = [
        CommandEntry::new("help", "Show available commands", "help [command]", cmd_help),
        CommandEntry::new("version", "Show build information", "version", cmd_version),
        CommandEntry::new(
            "add",
            "Record an expense or a savings contribution",
            "add <expense|savings> <amount> [category] [--sub <text>] [--note <text>] [--date YYYY-MM-DD] [--goal <savings goal>]",
            cmd_add,
        ),
        CommandEntry::new(
            "edit",
            "Change fields of a recorded transaction",
            "edit <id> [--amount <n>] [--category <name>] [--sub <text>] [--note <text>] [--date YYYY-MM-DD] [--goal <name> | --no-goal]",
            cmd_edit,
        ),
        CommandEntry::new("delete", "Delete a transaction", "delete <id>", cmd_delete),
        CommandEntry::new("list", "List the most recent transactions", "list [count]", cmd_list),
        CommandEntry::new(
            "dashboard",
            "Spend per category against the monthly goals",
            "dashboard [YYYY-MM]",
            cmd_dashboard,
        ),
        CommandEntry::new("savings", "Savings balance per goal", "savings", cmd_savings),
        CommandEntry::new(
            "history",
            "Monthly totals and transactions",
            "history [YYYY-MM]",
            cmd_history,
        ),
        CommandEntry::new("months", "Months available in the history", "months", cmd_months),
        CommandEntry::new("goals", "Monthly goal per category", "goals", cmd_goals),
        CommandEntry::new("goal", "Set the monthly goal of a category", "goal <category> <amount>", cmd_goal),
        CommandEntry::new(
            "distribution",
            "Show or replace the savings distribution",
            "distribution [<goal>=<percent> ...]",
            cmd_distribution,
        ),
        CommandEntry::new("settings", "Show preferences", "settings", cmd_settings),
        CommandEntry::new(
            "set",
            "Change a preference",
            "set <language|currency|dark-mode|retention> <value>",
            cmd_set,
        ),
        CommandEntry::new("export", "Write a JSON copy of all records", "export [note]", cmd_export),
        CommandEntry::new("exports", "List previous exports", "exports", cmd_exports),
        CommandEntry::new(
            "view",
            "Show or switch the current screen",
            "view [dashboard|budget [goals|distribution]|history [YYYY-MM]|add|edit <id>|savings|settings]",
            cmd_view,
        ),
        CommandEntry::new("exit", "Leave the shell", "exit", cmd_exit),
    ];
    for entry in entries {
        registry.register(entry);
    }
    registry.alias("quit", "exit");
    registry.alias("ls", "list");
    registry.alias("rm", "delete");
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        let entry = context
            .registry
            .get(&name.to_lowercase())
            .ok_or_else(|| CommandError::InvalidArguments(format!("unknown command `{name}`")))?;
        output::section(entry.name);
        output::line(entry.description);
        output::line(format!("usage: {}", entry.usage));
        return Ok(());
    }
    output::section("Commands");
    for entry in context.registry.list() {
        output::line(format!("{:<14}{}", entry.name, entry.description));
    }
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::line(format!("simple_budget {}", meta.version));
    output::line(format!("commit  {} ({})", meta.git_hash, meta.git_status));
    output::line(format!("built   {} [{} / {}]", meta.timestamp, meta.target, meta.profile));
    output::line(format!("rustc   {}", meta.rustc));
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["--sub", "--note", "--date", "--goal", "--category"], &[])?;
    let (kind, amount) = match parsed.positional.as_slice() {
        [kind, amount] | [kind, amount, _] => (kind.to_ascii_lowercase(), *amount),
        _ => {
            return Err(usage(
                "add <expense|savings> <amount> [category] (quote names with spaces)",
            ))
        }
    };
    let date = match parsed.value("--date") {
        Some(raw) => parse_date(raw)?,
        None => context.session.today(),
    };
    let category = parsed
        .value("--category")
        .or_else(|| parsed.positional.get(2).copied());

    let mut draft = match kind.as_str() {
        "expense" | "gasto" => TransactionDraft::expense(amount, date),
        "savings" | "ahorro" => {
            if parsed.value("--goal").is_some() {
                return Err(CommandError::InvalidArguments(
                    "a savings contribution cannot be charged to a savings goal".into(),
                ));
            }
            TransactionDraft::savings(amount, date)
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown transaction type `{other}` (use expense or savings)"
            )))
        }
    };
    if let Some(category) = category {
        draft = draft.category(category);
    }
    if let Some(sub) = parsed.value("--sub") {
        draft = draft.subcategory(sub);
    }
    if let Some(note) = parsed.value("--note") {
        draft = draft.note(note);
    }
    if let Some(goal) = parsed.value("--goal") {
        draft = draft.from_savings(goal);
    }

    let id = context.session.add_transaction(draft)?;
    output::success(format!("Recorded transaction #{id}."));
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(
        args,
        &["--amount", "--category", "--sub", "--note", "--date", "--goal"],
        &["--no-goal"],
    )?;
    let id = match parsed.positional.as_slice() {
        [id] => parse_transaction_id(id)?,
        _ => return Err(usage("edit <id> [options]")),
    };
    let existing = context
        .session
        .state()
        .snapshot()
        .transaction(id)
        .cloned()
        .ok_or(AppError::TransactionNotFound(id))?;

    let mut draft = TransactionDraft::from_existing(&existing);
    if let Some(amount) = parsed.value("--amount") {
        draft.amount = amount.to_string();
    }
    if let Some(category) = parsed.value("--category") {
        draft = draft.category(category);
    }
    if let Some(sub) = parsed.value("--sub") {
        draft.subcategory = Some(sub.to_string());
    }
    if let Some(note) = parsed.value("--note") {
        draft.note = Some(note.to_string());
    }
    if let Some(raw) = parsed.value("--date") {
        draft.date = parse_date(raw)?;
    }
    match (parsed.value("--goal"), parsed.flag("--no-goal")) {
        (Some(_), true) => {
            return Err(CommandError::InvalidArguments(
                "use either --goal or --no-goal".into(),
            ))
        }
        (Some(_), false) if draft.kind == DraftKind::Savings => {
            return Err(CommandError::InvalidArguments(
                "a savings contribution cannot be charged to a savings goal".into(),
            ))
        }
        (Some(goal), false) => draft = draft.from_savings(goal),
        (None, true) => {
            if let DraftKind::SavingsExpenditure { .. } = draft.kind {
                draft.kind = DraftKind::Expense;
            }
        }
        (None, false) => {}
    }

    context.session.edit_transaction(id, draft)?;
    output::success(format!("Updated transaction #{id}."));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = match args {
        [id] => parse_transaction_id(id)?,
        _ => return Err(usage("delete <id>")),
    };
    if !context.confirm(&format!("Delete transaction #{id}?"))? {
        output::info("Nothing deleted.");
        return Ok(());
    }
    if context.session.delete_transaction(id)? {
        output::success(format!("Deleted transaction #{id}."));
    } else {
        output::warning(format!("Transaction #{id} does not exist."));
    }
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let limit = match args {
        [] => DEFAULT_LIST_LIMIT,
        [raw] => raw
            .parse()
            .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a count")))?,
        _ => return Err(usage("list [count]")),
    };
    let state = context.session.state();
    let shown = state.snapshot().transactions.len().min(limit);
    render::transactions(state.settings(), &state.snapshot().transactions[..shown]);
    Ok(())
}

fn cmd_dashboard(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let month = optional_month(args, "dashboard [YYYY-MM]")?;
    context.session.navigate(View::Dashboard)?;
    render::dashboard(
        context.session.state().settings(),
        &context.session.dashboard(month),
    );
    Ok(())
}

fn cmd_savings(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    show(context, View::Savings)
}

fn cmd_history(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let month = optional_month(args, "history [YYYY-MM]")?;
    show(context, View::History { month })
}

fn cmd_months(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let transactions = &context.session.state().snapshot().transactions;
    let rows: Vec<(Month, usize)> = context
        .session
        .history_months()
        .into_iter()
        .map(|month| {
            let count = transactions.iter().filter(|txn| month.contains(txn.date)).count();
            (month, count)
        })
        .collect();
    render::months(context.session.current_month(), &rows);
    Ok(())
}

fn cmd_goals(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    show(context, View::Budget(BudgetMode::Goals))
}

fn cmd_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (category, raw) = match args {
        [category, amount] => (*category, *amount),
        _ => return Err(usage("goal <category> <amount>")),
    };
    let amount: f64 = raw
        .trim()
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a number")))?;
    context.session.set_goal(category, amount)?;
    output::success(format!("Monthly goal for {category} saved."));
    Ok(())
}

fn cmd_distribution(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return show(context, View::Budget(BudgetMode::Distribution));
    }
    let entries = args
        .iter()
        .map(|arg| parse_distribution_entry(arg))
        .collect::<Result<Vec<_>, _>>()?;
    context.session.save_distribution(entries)?;
    output::success("Savings distribution saved.");
    Ok(())
}

fn cmd_settings(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    show(context, View::Settings)
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (field, value) = match args {
        [field, rest @ ..] if !rest.is_empty() => (*field, rest.join(" ")),
        _ => return Err(usage("set <field> <value>")),
    };
    let patch = SettingsPatch::parse_field(field, &value)?;
    context.session.update_settings(&patch)?;
    context.apply_preferences();
    output::success(format!("Setting `{field}` updated."));
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = (!args.is_empty()).then(|| args.join(" "));
    let info = context.session.export(note.as_deref())?;
    output::success(format!("Exported to {}", info.path.display()));
    Ok(())
}

fn cmd_exports(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let exports = context.session.exports()?;
    output::section("Exports");
    if exports.is_empty() {
        output::info("No exports yet.");
    }
    for export in exports {
        output::line(format!("{}  {} bytes", export.id, export.size_bytes));
    }
    Ok(())
}

fn cmd_view(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        output::info(format!("Current view: {}", context.session.state().view()));
        output::hint(format!("Views: {}", View::NAMES.join(", ")));
        return Ok(());
    }
    let view: View = args.join(" ").parse()?;
    show(context, view)
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}

fn show(context: &mut ShellContext, view: View) -> CommandResult {
    context.session.navigate(view)?;
    render::view(&context.session, view);
    Ok(())
}

fn usage(text: &str) -> CommandError {
    CommandError::InvalidArguments(format!("usage: {text}"))
}

fn optional_month(args: &[&str], usage_text: &str) -> Result<Option<Month>, CommandError> {
    match args {
        [] => Ok(None),
        [raw] => raw
            .parse()
            .map(Some)
            .map_err(|err: sbudget_domain::MonthParseError| CommandError::InvalidArguments(err.to_string())),
        _ => Err(usage(usage_text)),
    }
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{input}` (use YYYY-MM-DD)"))
    })
}

/// Parses `Goal=50`.
fn parse_distribution_entry(arg: &str) -> Result<DistributionEntry, CommandError> {
    let (name, raw) = arg.rsplit_once('=').ok_or_else(|| {
        CommandError::InvalidArguments(format!("`{arg}` should look like <goal>=<percent>"))
    })?;
    let percentage: u8 = raw
        .trim()
        .trim_end_matches('%')
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a percentage")))?;
    Ok(DistributionEntry::new(name.trim(), percentage))
}

/// Positional arguments plus `--option value` pairs and bare `--flag`s.
struct ParsedArgs<'a> {
    positional: Vec<&'a str>,
    options: Vec<(&'a str, &'a str)>,
    flags: Vec<&'a str>,
}

impl<'a> ParsedArgs<'a> {
    fn parse(args: &[&'a str], options: &[&str], flags: &[&str]) -> Result<Self, CommandError> {
        let mut parsed = ParsedArgs {
            positional: Vec::new(),
            options: Vec::new(),
            flags: Vec::new(),
        };
        let mut iter = args.iter().copied();
        while let Some(arg) = iter.next() {
            if let Some(name) = options.iter().find(|name| **name == arg) {
                let value = iter.next().ok_or_else(|| {
                    CommandError::InvalidArguments(format!("{name} needs a value"))
                })?;
                parsed.options.push((arg, value));
            } else if flags.contains(&arg) {
                parsed.flags.push(arg);
            } else if arg.starts_with("--") {
                return Err(CommandError::InvalidArguments(format!("unknown option `{arg}`")));
            } else {
                parsed.positional.push(arg);
            }
        }
        Ok(parsed)
    }

    fn value(&self, name: &str) -> Option<&'a str> {
        self.options
            .iter()
            .rev()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }

    fn flag(&self, name: &str) -> bool {
        self.flags.contains(&name)
    }
}
