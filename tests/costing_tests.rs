#[cfg(test)]
mod tests {
    use recipe_costing::costing::{line_item_cost, summarize, CostValue};
    use recipe_costing::recipe_model::{Purchase, RawAmount, RecipeLineItem};

    fn flour() -> Purchase {
        Purchase::new("p-flour", "flour").with_price(64.0).with_weight(1024.0)
    }

    fn butter() -> Purchase {
        Purchase::new("p-butter", "butter").with_price(32.0).with_weight(128.0)
    }

    #[test]
    fn test_line_cost_needs_purchase_and_weight() {
        let priced = RecipeLineItem::new("flour").with_weight(512.0).with_purchase(flour());
        assert_eq!(line_item_cost(&priced), CostValue::Amount(32.0));

        let unpriced = RecipeLineItem::new("water").with_weight(300.0);
        assert_eq!(line_item_cost(&unpriced), CostValue::Undefined);

        let unweighed = RecipeLineItem::new("flour").with_purchase(flour());
        assert_eq!(line_item_cost(&unweighed), CostValue::Undefined);
    }

    #[test]
    fn test_purchase_without_usable_price_is_undefined() {
        let mut free = flour();
        free.price = RawAmount::parse("n/a");
        let item = RecipeLineItem::new("flour").with_weight(100.0).with_purchase(free);
        assert_eq!(line_item_cost(&item), CostValue::Undefined);

        let mut empty_package = butter();
        empty_package.weight = RawAmount::Valid(0.0);
        let item = RecipeLineItem::new("butter").with_weight(100.0).with_purchase(empty_package);
        assert_eq!(line_item_cost(&item), CostValue::Undefined);
    }

    #[test]
    fn test_summary_labels() {
        let items = vec![
            RecipeLineItem::new("flour").with_weight(512.0).with_purchase(flour()),
            RecipeLineItem::new("butter").with_weight(8.0).with_purchase(butter()),
            RecipeLineItem::new("water").with_weight(300.0),
        ];
        let summary = summarize(&items, &RawAmount::parse("8"));

        assert_eq!(summary.line_cost_labels(), vec!["32", "2", "--"]);
        assert_eq!(summary.total_label(), "34.00");
        assert_eq!(summary.per_portion_label(), "4.25");

        let no_portion = summarize(&items, &RawAmount::Empty);
        assert_eq!(no_portion.per_portion_label(), "--");
    }

    #[test]
    fn test_empty_recipe_costs_nothing() {
        let items = vec![RecipeLineItem::default()];
        let summary = summarize(&items, &RawAmount::parse("2"));

        assert!(summary.total_cost.is_sign_positive());
        assert_eq!(summary.total_label(), "0.00");
        assert_eq!(summary.per_portion_label(), "0.00");
    }
}
