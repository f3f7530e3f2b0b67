//! Message bodies for report notifications and error alerts.
//!
//! Output is Discord-flavored Markdown: a header, optional role mentions and report link,
//! then a fenced block holding fixed-width tables, then per-item detail lines.

use crate::domain::{
    try_project, AmountError, AttentionLine, Balances, ChainMeta, FixedPointAmount, Projection,
    Report, Settled, Severity, DISPLAY_DIGITS, UNAVAILABLE,
};
use crate::engine::redact::SecretRedactor;
use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Padding, Style};

/// Hard cap on message content imposed by the chat service.
pub const CONTENT_LIMIT: usize = 2000;

const MESSAGE_LIMIT: usize = 300;

/// Inputs to a report message besides the report itself.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub chain: &'a ChainMeta,
    pub level: Severity,
    pub report_url: Option<&'a str>,
    pub mention: Option<&'a str>,
    /// Applied to every piece before it counts against the content limit.
    pub redactor: &'a SecretRedactor,
}

/// Fixed-width text: first column left-aligned, the rest right-aligned, two spaces between.
fn render_table(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::blank())
        .with(Padding::new(0, 1, 0, 0))
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()));

    let mut out = String::new();
    for line in table.to_string().lines() {
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

pub fn render_report(report: &Report, ctx: &RenderContext<'_>) -> Result<String, AmountError> {
    let mut head = format!(
        "### [{}] {} report for {}\n",
        ctx.level,
        report.kind_label(),
        ctx.chain.display_name
    );
    if let Some(mention) = ctx.mention {
        head.push_str(mention);
        head.push('\n');
    }
    if let Some(url) = ctx.report_url {
        head.push_str(&format!("[Full report]({})\n", url));
    }

    head.push_str("```\n");
    head.push_str(&render_table(summary_table(report, ctx.chain)?));
    head.push('\n');
    head.push_str(&render_table(balance_table(report, ctx.chain)?));
    head.push_str("```\n");

    let details: Vec<String> = report
        .attention_lines()
        .iter()
        .map(|line| ctx.redactor.redact(&detail_line(line, ctx.chain)))
        .collect();

    Ok(append_within_limit(ctx.redactor.redact(&head), &details))
}

fn summary_table(report: &Report, chain: &ChainMeta) -> Result<Builder, AmountError> {
    let mut builder = Builder::default();
    let totals = report.totals();

    match report {
        Report::Harvest(r) => {
            builder.push_record([
                "Strategies".to_string(),
                r.summary.total_strategies.to_string(),
            ]);
            builder.push_record(["Harvested".to_string(), r.summary.harvested.to_string()]);
            builder.push_record(["Skipped".to_string(), r.summary.skipped.to_string()]);
        }
        Report::Unwrap(r) => {
            builder.push_record(["Success", yes_no(r.summary.success)]);
            let unwrapped = match (&r.summary.unwrapped_amount, r.summary.unwrapped) {
                (Some(amount), true) => {
                    format!("{} {}", amount.format(DISPLAY_DIGITS)?, chain.wrapped_symbol)
                }
                (_, unwrapped) => yes_no(unwrapped).to_string(),
            };
            builder.push_record(["Unwrapped".to_string(), unwrapped]);
        }
    }

    builder.push_record(["Errors".to_string(), totals.statuses.error.to_string()]);
    builder.push_record(["Warnings".to_string(), totals.statuses.warning.to_string()]);
    builder.push_record(["Notices".to_string(), totals.statuses.notice.to_string()]);
    builder.push_record(["Infos".to_string(), totals.statuses.info.to_string()]);
    builder.push_record([
        "Gas used".to_string(),
        format!(
            "{} {}",
            totals.gas_used.format(DISPLAY_DIGITS)?,
            chain.native_symbol
        ),
    ]);
    Ok(builder)
}

fn balance_table(report: &Report, chain: &ChainMeta) -> Result<Builder, AmountError> {
    let mut builder = Builder::default();
    builder.push_record([
        String::new(),
        format!("Native ({})", chain.native_symbol),
        format!("Wrapped ({})", chain.wrapped_symbol),
        "Total".to_string(),
    ]);
    builder.push_record(balance_row("Before", report.balance_before())?);
    builder.push_record(balance_row("After", report.balance_after())?);

    let totals = report.totals();
    builder.push_record([
        "Profit".to_string(),
        amount_cell(totals.profit_native.as_ref())?,
        amount_cell(totals.profit_wrapped.as_ref())?,
        amount_cell(totals.aggregated_profit.as_ref())?,
    ]);
    Ok(builder)
}

fn balance_row(
    label: &str,
    outcome: Option<&Settled<Balances>>,
) -> Result<Vec<String>, AmountError> {
    let cells = try_project(outcome, |b| -> Result<Vec<String>, AmountError> {
        Ok(vec![
            b.native.format(DISPLAY_DIGITS)?,
            b.wrapped.format(DISPLAY_DIGITS)?,
            b.total()?.format(DISPLAY_DIGITS)?,
        ])
    })?;

    let mut row = vec![label.to_string()];
    match cells {
        Projection::Available(values) => row.extend(values),
        Projection::Unavailable => row.extend(std::iter::repeat(UNAVAILABLE.to_string()).take(3)),
    }
    Ok(row)
}

fn amount_cell(amount: Option<&FixedPointAmount>) -> Result<String, AmountError> {
    let formatted = amount.map(|a| a.format(DISPLAY_DIGITS)).transpose()?;
    Ok(Projection::from(formatted).to_string())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn detail_line(line: &AttentionLine, chain: &ChainMeta) -> String {
    let mut out = format!("- **{}** `{}`", line.status.label(), line.subject);
    if let Some(address) = &line.address {
        match chain.address_link(address) {
            Some(link) => out.push_str(&format!(" [{}](<{}>)", address.short(), link)),
            None => out.push_str(&format!(" `{}`", address.short())),
        }
    }
    if let Some(message) = &line.message {
        let flat = message.split_whitespace().collect::<Vec<_>>().join(" ");
        out.push_str(": ");
        out.push_str(&truncate_chars(&flat, MESSAGE_LIMIT));
    }
    out.push('\n');
    out
}

/// Append detail lines while they fit, then a count of what was left out.
fn append_within_limit(mut body: String, lines: &[String]) -> String {
    let mut used = body.chars().count();
    for (idx, line) in lines.iter().enumerate() {
        let remaining = lines.len() - idx;
        let overflow_note = format!("… and {} more (see attachment)\n", remaining);
        let len = line.chars().count();
        let reserve = if remaining > 1 {
            overflow_note.chars().count()
        } else {
            0
        };

        if used + len + reserve > CONTENT_LIMIT {
            if used + overflow_note.chars().count() <= CONTENT_LIMIT {
                body.push_str(&overflow_note);
            }
            return body;
        }
        body.push_str(line);
        used += len;
    }
    body
}

/// Body of an error alert: header, error chain, pretty-printed context.
pub fn render_error(
    doing: &str,
    data: &serde_json::Value,
    error: &(dyn std::error::Error + 'static),
    mention: Option<&str>,
    redactor: &SecretRedactor,
) -> String {
    let mut head = format!("### [{}] {}\n", Severity::Error, doing);
    if let Some(mention) = mention {
        head.push_str(mention);
        head.push('\n');
    }
    head.push_str("```\n");
    head.push_str(&error_chain(error));
    head.push_str("\n```\n");
    let head = redactor.redact(&head);

    let data = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
    let data = redactor.redact(&data);
    let fence_open = "```json\n";
    let fence_close = "\n```\n";
    let budget = CONTENT_LIMIT
        .saturating_sub(head.chars().count())
        .saturating_sub(fence_open.len() + fence_close.len());

    if budget == 0 {
        return cap_content(&head);
    }
    format!(
        "{}{}{}{}",
        head,
        fence_open,
        truncate_chars(&data, budget),
        fence_close
    )
}

fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut out = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        out.push_str("\ncaused by: ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

/// Trim text to the content limit.
pub fn cap_content(text: &str) -> String {
    truncate_chars(text, CONTENT_LIMIT)
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
