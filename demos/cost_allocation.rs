use std::collections::HashMap;

use chrono::NaiveDate;
use kontierung::core::*;
use kontierung::datev::*;
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("kontierung=debug".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    // Per sales channel settings, as stored by the shop
    let settings = InMemorySettings::from_json(
        r#"{
            "storefront": {
                "companyCodesActive": true,
                "defaultCompanyCode": 1,
                "costCentersActive": true,
                "salesChannelCostCenter": "ONLINE SHOP"
            }
        }"#,
    )?;

    // Product cost centers, as read from product custom fields
    let products: HashMap<String, ProductCostCenter> = [
        ("p-1", "SW-10001", serde_json::json!({ "datev_cost_center": "WAREHOUSE1" })),
        ("p-2", "SW-10002", serde_json::json!({})),
        ("p-3", "SW-10003", serde_json::json!({ "datev_cost_center": "Lager-Süd" })),
    ]
    .into_iter()
    .map(|(id, number, fields)| {
        let fields = CustomFields::from_value(fields);
        (id.to_string(), ProductCostCenter::from_custom_fields(number, &fields))
    })
    .collect();

    let order = OrderBuilder::new("10001", "storefront", "Storefront")
        .customer("K-1", "Kunde AG")
        .customer_group("Händler")
        .add_line(
            OrderLineBuilder::new("1", "Regal", 2, dec!(119))
                .product("p-1")
                .tax(dec!(19))
                .build(),
        )
        .add_line(
            OrderLineBuilder::new("2", "Schrauben", 10, dec!(1.19))
                .product("p-2")
                .tax(dec!(19))
                .build(),
        )
        .add_line(
            OrderLineBuilder::new("3", "Handbuch", 1, dec!(21.40))
                .product("p-3")
                .tax(dec!(7))
                .build(),
        )
        .add_line(OrderLineBuilder::new("4", "Versand", 1, dec!(5.95)).tax(dec!(19)).build())
        .build();

    let customer_fields = CustomFields::from_value(serde_json::json!({ "datev_company_code": "7" }));
    let group_fields = CustomFields::from_value(serde_json::json!({ "datev_company_code": "12" }));
    let overrides = CompanyCodeOverrides::from_custom_fields(Some(&customer_fields), Some(&group_fields));

    let flags = StaticFeatureFlags::all();
    let document = AccountingDocumentGenerator::new(&flags, &products).generate(
        &order,
        &DocumentReference::new("invoice", "RE-2024-001", NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()),
        &settings.settings_or_default(&order.sales_channel.id),
        &overrides,
    );

    println!("=== Revenue postings ===");
    for posting in &document.postings {
        println!(
            "  {:>8} @ {:>3}% -> {} KOST1={} KOST2={}",
            posting.amount,
            posting
                .tax_rate
                .map(|r| r.to_string())
                .unwrap_or_else(|| "-".into()),
            posting.revenue_account,
            posting.cost_center_1.as_ref().map_or("", CostCenter::as_str),
            posting.cost_center_2.as_ref().map_or("", CostCenter::as_str),
        );
    }

    println!("\n=== Messages ===");
    for message in &document.messages {
        println!("  {message}");
    }

    let config = ExtfConfig::new(12345, 99999, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        .with_exported_by("kontierung")
        .with_label("Erlöse Juni 2024");
    let csv = to_extf(&[document], &config)?;

    println!("\n=== DATEV EXTF Buchungsstapel ===");
    for (i, line) in csv.lines().enumerate() {
        println!("Line {}: {}", i + 1, &line[..100.min(line.len())]);
    }

    Ok(())
}
