//! One-shot snapshot: assemble a single refresh cycle and print it.

pub fn run(store_path: &str, json: bool) {
    let aggregator = super::make_aggregator(store_path);
    let snapshot = aggregator.assemble();
    if json {
        super::print_json(&snapshot);
    } else {
        super::print_summary(&snapshot);
    }
}
