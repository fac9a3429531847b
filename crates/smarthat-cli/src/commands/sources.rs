//! List the telemetry sources the engine aggregates.

use smarthat_core::SourceKind;

pub fn run() {
    println!("{} telemetry sources:\n", SourceKind::ALL.len());
    println!("{:<16} {:<22} {}", "Source", "Collection", "Shape");
    println!("{}", "-".repeat(52));
    for kind in SourceKind::ALL {
        let shape = if kind.keyed() {
            "key-value (epoch key)"
        } else {
            "documents"
        };
        println!("{:<16} {:<22} {}", kind.to_string(), kind.collection(), shape);
    }
}
