use proptest::prelude::*;
use storefront_core::field::{join_list, parse_draft, split_list};
use storefront_core::{FieldValue, ProductField};

proptest! {
    /// Sequences of trimmed, comma-free strings survive the editor's text form.
    #[test]
    fn lists_survive_join_then_split(items in prop::collection::vec("[A-Za-z0-9]([A-Za-z0-9 ]{0,8}[A-Za-z0-9])?", 1..8)) {
        let text = join_list(&items);
        prop_assert_eq!(split_list(&text), items);
    }

    #[test]
    fn price_text_round_trips(value in 0.0f64..1_000_000.0) {
        let current = FieldValue::Number(value);
        let parsed = parse_draft(ProductField::Mrp, &current.edit_text(), &current).unwrap();
        prop_assert_eq!(parsed, current);
    }
}

#[test]
fn sizes_scenario_from_the_admin_panel() {
    let current = FieldValue::List(vec!["S".into(), "M".into()]);
    assert_eq!(
        parse_draft(ProductField::Sizes, "S, L, XL", &current).unwrap(),
        FieldValue::List(vec!["S".into(), "L".into(), "XL".into()])
    );
}
