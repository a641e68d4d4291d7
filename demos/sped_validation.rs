//! Validate a SPED filing and print every finding.
//!
//! Run with: `cargo run --example sped_validation`

use fisco::sped;

const FILING: &str = "\
|0000|017|0|01012026|31012026|EMPRESA TESTE LTDA|12345678000195|SP|
|0001|0|
|0990|3|
|C001|0|
|C100|0|1|55|00|001|000000042|45152026|3250.00|
|9001|0|
|9990|3|
|9999|9|
";

fn main() {
    let report = sped::validate(FILING);

    println!("valid: {}", report.is_valid());
    println!(
        "{} records, {} registers, blocks: {:?}",
        report.stats.record_count,
        report.stats.register_counts.len(),
        report.stats.blocks
    );

    for finding in &report.findings {
        println!("  {finding}");
    }
}
