use std::io::{self, Write};

use anyhow::bail;
use storefront_core::{
    CommitOutcome, EditableField, ListView, NewProduct, Product, Prompt, Resource,
    ResourceClient, UpiConfig,
};
use tracing::info;

pub fn print_list<R: Resource, W: Write>(out: &mut W, items: &[R]) -> io::Result<()> {
    if items.is_empty() {
        writeln!(out, "No {} found.", R::COLLECTION)?;
    }
    for item in items {
        writeln!(out, "{}", item.summary())?;
    }
    Ok(())
}

pub fn print_record<R: Resource, W: Write>(out: &mut W, record: &R) -> anyhow::Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(record)?)?;
    Ok(())
}

pub fn report<F: EditableField, W: Write>(out: &mut W, outcome: &CommitOutcome<F>) -> io::Result<()> {
    match outcome {
        CommitOutcome::Rejected { target_id } => writeln!(out, "↩️ Discarded change to {target_id}"),
        CommitOutcome::Updated { target_id, field } => {
            writeln!(out, "✅ Updated {target_id}.{field}")
        }
        CommitOutcome::RolledBack {
            target_id,
            field,
            error,
        } => writeln!(out, "❌ Update of {target_id}.{field} failed: {error}; value restored"),
        CommitOutcome::Deleted { target_id } => writeln!(out, "🗑️ Deleted {target_id}"),
        CommitOutcome::DeleteFailed { target_id, error } => {
            writeln!(out, "❌ Delete of {target_id} failed: {error}")
        }
    }
}

/// Turns a failed remote commit into an error for the process exit code.
pub fn ensure_settled<F: EditableField>(outcome: CommitOutcome<F>) -> anyhow::Result<()> {
    match outcome {
        CommitOutcome::RolledBack { error, .. } | CommitOutcome::DeleteFailed { error, .. } => {
            Err(error.into())
        }
        _ => Ok(()),
    }
}

pub async fn list<R, C, W>(view: &mut ListView<R, C>, out: &mut W) -> anyhow::Result<()>
where
    R: Resource,
    C: ResourceClient<R>,
    W: Write,
{
    view.load().await?;
    print_list(out, view.items())?;
    Ok(())
}

pub async fn show<R, C, W>(client: &C, id: &str, out: &mut W) -> anyhow::Result<()>
where
    R: Resource,
    C: ResourceClient<R>,
    W: Write,
{
    let record = client.get(id).await?;
    print_record(out, &record)
}

/// Loads the list, then runs one edit through the confirmation gate.
pub async fn edit<R, C, P, W>(
    view: &mut ListView<R, C>,
    id: &str,
    field: R::Field,
    value: &str,
    prompt: &mut P,
    out: &mut W,
) -> anyhow::Result<CommitOutcome<R::Field>>
where
    R: Resource,
    C: ResourceClient<R>,
    P: Prompt + ?Sized,
    W: Write,
{
    view.load().await?;
    let current = view.begin_edit(id, field)?;
    writeln!(out, "{id}.{field}: {current}")?;
    view.change_draft(value)?;

    let ticket = match view.request_commit() {
        Ok(ticket) => ticket,
        Err(e) => {
            view.focus_lost_outside();
            return Err(e.into());
        }
    };
    let outcome = view.confirm_with(ticket, prompt).await?;
    report(out, &outcome)?;
    Ok(outcome)
}

pub async fn delete<R, C, P, W>(
    view: &mut ListView<R, C>,
    id: &str,
    prompt: &mut P,
    out: &mut W,
) -> anyhow::Result<CommitOutcome<R::Field>>
where
    R: Resource,
    C: ResourceClient<R>,
    P: Prompt + ?Sized,
    W: Write,
{
    view.load().await?;
    let ticket = view.request_delete(id)?;
    let outcome = view.confirm_with(ticket, prompt).await?;
    report(out, &outcome)?;
    Ok(outcome)
}

pub async fn add_product<C, W>(client: &C, form: NewProduct, out: &mut W) -> anyhow::Result<Product>
where
    C: ResourceClient<Product>,
    W: Write,
{
    let product = form.validate()?;
    info!("➕ Adding product {}", product.id);
    let created = client.create(&product).await?;
    writeln!(out, "✅ Added {}", created.summary())?;
    Ok(created)
}

/// Prints the payee and enabled providers of the first UPI record, which is
/// what the checkout page shows.
pub async fn payment_options<C, W>(client: &C, out: &mut W) -> anyhow::Result<()>
where
    C: ResourceClient<UpiConfig>,
    W: Write,
{
    let configs = client.list_all().await?;
    let Some(upi) = configs.first() else {
        bail!("no UPI configuration found");
    };

    writeln!(out, "Pay to {} <{}>", upi.upi_name, upi.upi_id)?;
    let providers = upi.enabled_providers();
    if providers.is_empty() {
        writeln!(out, "  (no payment options enabled)")?;
    }
    for provider in providers {
        writeln!(out, "  - {} ({})", provider.label(), provider.key())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{client, serve, shirt, shop_upi, FixedAnswer};
    use storefront_core::{AutoApprove, ColorOption, Decision, ProductField, UpiField};
    use storefront_server::AppState;

    fn text(out: Vec<u8>) -> String {
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn edit_sizes_end_to_end() {
        let state = AppState::in_memory(vec![shirt()], Vec::new());
        let base = serve(state.clone()).await;
        let mut view = ListView::<Product, _>::new(client::<Product>(&base));
        let mut out = Vec::new();

        let outcome = edit(&mut view, "p1", ProductField::Sizes, "S, L, XL", &mut AutoApprove, &mut out)
            .await
            .unwrap();

        assert!(matches!(outcome, CommitOutcome::Updated { .. }));
        assert_eq!(state.products.get("p1").await.unwrap().sizes, vec!["S", "L", "XL"]);
        let out = text(out);
        assert!(out.contains("p1.sizes: S, M"));
        assert!(out.contains("✅ Updated p1.sizes"));
    }

    #[tokio::test]
    async fn invalid_price_never_reaches_the_gate() {
        let state = AppState::in_memory(vec![shirt()], Vec::new());
        let base = serve(state.clone()).await;
        let mut view = ListView::<Product, _>::new(client::<Product>(&base));

        let result = edit(&mut view, "p1", ProductField::Mrp, "lots", &mut AutoApprove, &mut Vec::new()).await;

        assert!(result.is_err());
        assert!(view.session().is_viewing());
        assert!(!view.gate().is_open());
        assert_eq!(state.products.get("p1").await.unwrap().mrp, 999.0);
    }

    #[tokio::test]
    async fn rejected_delete_keeps_the_product() {
        let state = AppState::in_memory(vec![shirt()], Vec::new());
        let base = serve(state.clone()).await;
        let mut view = ListView::<Product, _>::new(client::<Product>(&base));
        let mut out = Vec::new();

        let mut refuse = FixedAnswer(Some(Decision::Reject));
        let outcome = delete(&mut view, "p1", &mut refuse, &mut out).await.unwrap();

        assert!(matches!(outcome, CommitOutcome::Rejected { .. }));
        assert_eq!(state.products.list().await.len(), 1);
        assert!(text(out).contains("Discarded"));
    }

    #[tokio::test]
    async fn failed_commits_become_errors() {
        let state = AppState::in_memory(vec![shirt()], Vec::new());
        let base = serve(state.clone()).await;
        let mut view = ListView::<Product, _>::new(client::<Product>(&base));
        view.load().await.unwrap();
        state.products.remove("p1").await.unwrap();

        let ticket = view.request_delete("p1").unwrap();
        let outcome = view.confirm_with(ticket, &mut AutoApprove).await.unwrap();
        assert!(matches!(outcome, CommitOutcome::DeleteFailed { .. }));
        assert!(ensure_settled(outcome).is_err());
        assert_eq!(view.items().len(), 1);
    }

    #[tokio::test]
    async fn add_product_posts_the_validated_form() {
        let state = AppState::in_memory(Vec::new(), Vec::new());
        let base = serve(state.clone()).await;
        let form = NewProduct {
            id: " p3 ".into(),
            image: "cap.png".into(),
            name: "Cap".into(),
            mrp: "299".into(),
            selling_price: "199".into(),
            sizes: "Free".into(),
            colors: vec![ColorOption { name: "Red".into(), image: "red.png".into() }],
            ..Default::default()
        };

        let created = add_product(&client::<Product>(&base), form, &mut Vec::new()).await.unwrap();

        assert_eq!(created.id, "p3");
        assert_eq!(state.products.get("p3").await.unwrap().sizes, vec!["Free"]);
    }

    #[tokio::test]
    async fn payment_options_lists_enabled_providers_of_the_first_payee() {
        let state = AppState::in_memory(Vec::new(), vec![shop_upi()]);
        let base = serve(state.clone()).await;
        let upi = client::<UpiConfig>(&base);

        let mut view = ListView::<UpiConfig, _>::new(upi.clone());
        edit(&mut view, "u1", UpiField::PaymentOptions, "divphonepe, divupi", &mut AutoApprove, &mut Vec::new())
            .await
            .unwrap();

        let mut out = Vec::new();
        payment_options(&upi, &mut out).await.unwrap();
        let out = text(out);
        assert!(out.contains("Pay to Shop <shop@upi>"));
        assert!(out.contains("PhonePe"));
        assert!(out.contains("UPI (divupi)"));
        assert!(!out.contains("Google Pay"));
    }

    #[tokio::test]
    async fn payment_options_without_payee_is_an_error() {
        let state = AppState::in_memory(Vec::new(), Vec::new());
        let base = serve(state).await;
        assert!(payment_options(&client::<UpiConfig>(&base), &mut Vec::new()).await.is_err());
    }
}
