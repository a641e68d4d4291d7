use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal_macros::dec;

use fisco::core::{Ncm, Rate};
use fisco::sped;
use fisco::taxes::{cbs, icms, icms::Cst};

fn substitution_situation() -> Cst {
    Cst::TaxedWithSubstitution {
        rate: Rate::new(dec!(18)).unwrap(),
        st_rate: Rate::new(dec!(18)).unwrap(),
        markup: Rate::new(dec!(30)).unwrap(),
    }
}

fn build_filing(data_records: usize) -> String {
    let mut filing = String::from("|0000|017|0|01012026|31012026|EMPRESA|12345678000195|SP|\n");
    filing.push_str("|0001|0|\n|0990|3|\n|C001|0|\n");
    for i in 0..data_records {
        filing.push_str(&format!(
            "|C100|0|1|55|00|001|{:09}|15012026|100.00|\n",
            i + 1
        ));
    }
    filing.push_str(&format!("|C990|{}|\n", data_records + 2));
    let total = 9 + data_records;
    filing.push_str(&format!("|9001|0|\n|9990|3|\n|9999|{total}|\n"));
    filing
}

fn bench_calculators(c: &mut Criterion) {
    let situation = substitution_situation();
    c.bench_function("icms_substitution", |b| {
        b.iter(|| icms::calculate(black_box(dec!(1000)), black_box(&situation)))
    });

    let rate = Rate::new(dec!(8.8)).unwrap();
    let reduction = Rate::new(dec!(50)).unwrap();
    let deferral = Rate::new(dec!(100)).unwrap();
    c.bench_function("cbs_reduction_deferral", |b| {
        b.iter(|| {
            cbs::calculate(
                black_box(dec!(1000)),
                black_box(rate),
                Some(reduction),
                Some(deferral),
            )
        })
    });

    let tobacco = Ncm::parse("24021000").unwrap();
    c.bench_function("excise_category_lookup", |b| {
        b.iter(|| fisco::taxes::seletivo::excise_category(black_box(&tobacco)))
    });
}

fn bench_sped_validator(c: &mut Criterion) {
    let small = build_filing(100);
    let large = build_filing(10_000);

    c.bench_function("sped_validate_100_records", |b| {
        b.iter(|| sped::validate(black_box(&small)))
    });
    c.bench_function("sped_validate_10000_records", |b| {
        b.iter(|| sped::validate(black_box(&large)))
    });
}

criterion_group!(benches, bench_calculators, bench_sped_validator);
criterion_main!(benches);
