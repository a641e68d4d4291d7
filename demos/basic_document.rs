//! Build a fiscal document end to end: lines, tax assessment, lifecycle.
//!
//! Run with: `cargo run --example basic_document`

use chrono::NaiveDate;
use fisco::core::{AccessKeyParts, Cfop, Ncm, Rate};
use fisco::document::*;
use fisco::taxes::{cbs, icms, icms::Cst};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let issue = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
    let mut doc = FiscalDocument::new("NF-2026-000042", DocumentKind::Invoice, 1, 42, issue);

    // Line 1: fully taxed merchandise
    let situation = Cst::FullyTaxed {
        rate: Rate::new(dec!(18))?,
    };
    let line = DocumentLine::new(
        "Cimento CP-II 50kg",
        Ncm::parse("25232910")?,
        Cfop::parse("5102")?,
        dec!(100),
        dec!(32.50),
        TaxSituation::Standard(situation.clone()),
    )?;
    let base = line.net_amount();
    doc.add_line(line)?;

    let icms_result = icms::calculate(base, &situation)?;
    let cbs_result = cbs::calculate(base, Rate::new(dec!(0.9))?, None, None)?;
    doc.attach_taxes(
        0,
        LineTaxes {
            icms: Some(icms_result),
            cbs: Some(cbs_result),
            ..Default::default()
        },
    )?;

    println!("merchandise total: {}", doc.totals().merchandise_total);
    println!("ICMS total:        {}", doc.totals().icms_total);
    println!("CBS total:         {}", doc.totals().cbs_total);

    // Submit and simulate the authority's answer
    doc.submit()?;
    let key = AccessKeyParts {
        uf_code: 35,
        issued: issue,
        issuer: "12345678000195".into(),
        model: doc.kind().model_code().into(),
        series: doc.series(),
        number: doc.number(),
        emission_type: 1,
        random_code: 87654321,
    }
    .compose()?;

    doc.apply_outcome(AuthorityOutcome::Authorized {
        access_key: key,
        protocol: "135260001234567".into(),
    })?;

    println!("status:            {:?}", doc.status());
    println!("access key:        {}", doc.access_key().unwrap());

    Ok(())
}
