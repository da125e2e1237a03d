use std::io::Write;

use storefront_core::{AutoApprove, GateTicket, ListView, Resource, ResourceClient, SessionError};
use tokio::io::AsyncBufRead;

use crate::commands::{print_list, print_record, report};
use crate::console::Console;

const HELP: &str = "commands: list | show <id> | edit <id> <field> | delete <id> | reload | help | quit \
(while editing, an empty line is a blank value and :cancel abandons the edit)";

/// Draft line that abandons the edit instead of becoming the new value.
const CANCEL: &str = ":cancel";

/// Line-driven list view. While editing, `:cancel` or end of input abandons
/// the edit; any other line, blank included, is the draft.
pub async fn run<R, C, I, W>(
    view: &mut ListView<R, C>,
    console: &mut Console<I>,
    auto_approve: bool,
    out: &mut W,
) -> anyhow::Result<()>
where
    R: Resource,
    C: ResourceClient<R>,
    I: AsyncBufRead + Unpin + Send,
    W: Write,
{
    writeln!(out, "{} shell; {}", R::COLLECTION, HELP)?;
    reload(view, out).await?;

    let prompt = format!("{}> ", R::COLLECTION);
    while let Some(line) = console.read_line(&prompt).await? {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => {}
            ["list"] => print_list(out, view.items())?,
            ["reload"] => reload(view, out).await?,
            ["show", id] => match view.find(id) {
                Some(record) => print_record(out, record)?,
                None => writeln!(out, "No {} with id {id}", R::COLLECTION)?,
            },
            ["edit", id, field] => edit(view, console, auto_approve, id, field, out).await?,
            ["delete", id] => match view.request_delete(id) {
                Ok(ticket) => confirm(view, ticket, console, auto_approve, out).await?,
                Err(e) => writeln!(out, "❌ {e}")?,
            },
            ["help"] => writeln!(out, "{HELP}")?,
            ["quit"] | ["exit"] => break,
            _ => writeln!(out, "Unknown command '{}'; {HELP}", line.trim())?,
        }
    }
    Ok(())
}

async fn reload<R, C, W>(view: &mut ListView<R, C>, out: &mut W) -> anyhow::Result<()>
where
    R: Resource,
    C: ResourceClient<R>,
    W: Write,
{
    match view.load().await {
        Ok(count) => writeln!(out, "{count} {} loaded", R::COLLECTION)?,
        Err(e) => writeln!(out, "❌ Could not load {}: {e}", R::COLLECTION)?,
    }
    Ok(())
}

async fn edit<R, C, I, W>(
    view: &mut ListView<R, C>,
    console: &mut Console<I>,
    auto_approve: bool,
    id: &str,
    field: &str,
    out: &mut W,
) -> anyhow::Result<()>
where
    R: Resource,
    C: ResourceClient<R>,
    I: AsyncBufRead + Unpin + Send,
    W: Write,
{
    let field: R::Field = match field.parse() {
        Ok(field) => field,
        Err(e) => {
            writeln!(out, "❌ {e}")?;
            return Ok(());
        }
    };
    let current = match view.begin_edit(id, field) {
        Ok(current) => current,
        Err(e) => {
            writeln!(out, "❌ {e}")?;
            return Ok(());
        }
    };
    writeln!(out, "{id}.{field}: {current}")?;

    loop {
        let text = match console.read_line("new value (:cancel to abandon)> ").await? {
            Some(text) if text.trim() != CANCEL => text,
            _ => {
                view.focus_lost_outside();
                writeln!(out, "Edit abandoned")?;
                return Ok(());
            }
        };
        view.change_draft(text)?;

        match view.request_commit() {
            Ok(ticket) => return confirm(view, ticket, console, auto_approve, out).await,
            Err(SessionError::Validation(e)) => writeln!(out, "❌ {e}")?,
            Err(e) => {
                view.focus_lost_outside();
                writeln!(out, "❌ {e}")?;
                return Ok(());
            }
        }
    }
}

async fn confirm<R, C, I, W>(
    view: &mut ListView<R, C>,
    ticket: GateTicket,
    console: &mut Console<I>,
    auto_approve: bool,
    out: &mut W,
) -> anyhow::Result<()>
where
    R: Resource,
    C: ResourceClient<R>,
    I: AsyncBufRead + Unpin + Send,
    W: Write,
{
    let outcome = if auto_approve {
        view.confirm_with(ticket, &mut AutoApprove).await?
    } else {
        view.confirm_with(ticket, console).await?
    };
    report(out, &outcome)?;
    Ok(())
}
