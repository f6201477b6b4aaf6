//! # Recipe Costing Walkthrough
//!
//! Builds a small bread recipe in a [`RecipeForm`], shows how ratios follow
//! free weight edits, how a locked ratio table rescales the batch, and what
//! the batch costs once purchases are attached. Ends with the keypad
//! calculator.

use recipe_costing::calculator::Operator;
use recipe_costing::calculator_pad::{CalculatorPad, Key};
use recipe_costing::catalog::PurchaseCatalog;
use recipe_costing::recipe_form::RecipeForm;
use recipe_costing::recipe_model::Purchase;

fn print_form(form: &RecipeForm) {
    let ratios = form.ratio_labels();
    let summary = form.cost_summary();
    let costs = summary.line_cost_labels();
    for (index, item) in form.items().iter().enumerate() {
        println!(
            "  {}. {:<8} {:>6} {:>5} {:>6}",
            index + 1,
            item.name,
            item.original_weight.to_string(),
            ratios[index],
            costs[index]
        );
    }
    println!(
        "  total {} / per portion {}\n",
        summary.total_label(),
        summary.per_portion_label()
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🍞 Recipe Costing Example");
    println!("=========================\n");

    // Example 1: free weights, ratios follow
    println!("📖 Example 1: Unlocked ratios");
    println!("-----------------------------");

    let mut form = RecipeForm::new("Country loaf");
    form.set_item_name(0, "flour")?;
    let water = form.add_item();
    form.set_item_name(water, "water")?;
    let starter = form.add_item();
    form.set_item_name(starter, "starter")?;

    form.commit_weight(0, "200")?;
    form.commit_weight(water, "300")?;
    let outcome = form.commit_weight(starter, "500")?;
    println!("Last edit: {:?}", outcome);
    print_form(&form);

    // Example 2: hold the ratios and scale the batch from one row
    println!("🔒 Example 2: Locked ratios");
    println!("---------------------------");

    form.set_locked(true);
    let outcome = form.commit_weight(0, "400")?;
    println!("Flour to 400: {:?}", outcome);
    print_form(&form);

    // Example 3: price the batch
    println!("💶 Example 3: Costs");
    println!("-------------------");

    let catalog = PurchaseCatalog::new(vec![
        Purchase::new("p-flour", "flour")
            .with_brand("Moulin")
            .with_price(128.0)
            .with_weight(1024.0),
        Purchase::new("p-starter", "starter")
            .with_price(5.0)
            .with_weight(1000.0),
    ]);
    form.attach_purchase(0, catalog.require("p-flour")?.clone())?;
    form.attach_purchase(starter, catalog.require("p-starter")?.clone())?;
    form.set_portion("4");
    print_form(&form);

    match catalog.require("p-salt") {
        Ok(_) => println!("Unexpected salt purchase"),
        Err(err) => println!("Lookup failed as expected: {} ({})\n", err, err.code),
    }

    // Example 4: keypad calculator
    println!("🧮 Example 4: Calculator");
    println!("------------------------");

    let mut pad = CalculatorPad::new();
    for key in [
        Key::Digit(1),
        Key::Digit(2),
        Key::Operator(Operator::Add),
        Key::Digit(3),
        Key::Operator(Operator::Multiply),
        Key::Digit(4),
        Key::Equals,
    ] {
        pad.press(key);
    }
    println!("{} = {}", pad.input(), pad.display());

    pad.press(Key::Operator(Operator::Divide));
    pad.press(Key::Digit(0));
    pad.press(Key::Equals);
    println!("{} = {}", pad.input(), pad.display());

    Ok(())
}
