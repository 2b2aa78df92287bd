use super::config;
use super::fake::{FakeItem, FakePage, View};
use crate::engine::DetailExtractor;
use crate::results::{Field, NO_NAME};

fn open(item: FakeItem) -> FakePage {
    let page = FakePage::new(vec![item]);
    page.state().view = View::Detail(0);
    page
}

#[tokio::test]
async fn test_all_fields_present() {
    let page = open(
        FakeItem::named("Cafe A")
            .with(Field::Address, "123 St")
            .with(Field::Phone, "0265 123 4567")
            .with(Field::Website, "https://cafe-a.example/")
            .with(Field::Rating, "4.5")
            .with(Field::Reviews, "(120)"),
    );
    let config = config();

    let record = DetailExtractor::new(&page, &config)
        .extract(Some("Cafe A".to_string()))
        .await;

    assert_eq!(record.name, "Cafe A");
    assert_eq!(record.address, "123 St");
    assert_eq!(record.phone, "0265 123 4567");
    assert_eq!(record.website, "https://cafe-a.example/");
    assert_eq!(record.rating, "4.5");
    assert_eq!(record.reviews, "(120)");
}

#[tokio::test]
async fn test_missing_fields_get_their_own_sentinels() {
    let page = open(
        FakeItem::named("Cafe A")
            .with(Field::Address, "123 St")
            .with(Field::Rating, "4.5"),
    );
    let config = config();

    let record = DetailExtractor::new(&page, &config)
        .extract(Some("Cafe A".to_string()))
        .await;

    assert_eq!(record.address, "123 St");
    assert_eq!(record.rating, "4.5");
    assert_eq!(record.phone, "No phone found");
    assert_eq!(record.website, "No website found");
    assert_eq!(record.reviews, "No reviews found");
}

#[tokio::test]
async fn test_every_absent_subset_is_isolated() {
    let values = [
        (Field::Address, "123 St"),
        (Field::Phone, "0265 123 4567"),
        (Field::Website, "https://cafe-a.example/"),
        (Field::Rating, "4.5"),
        (Field::Reviews, "(120)"),
    ];
    let config = config();

    for mask in 0u32..32 {
        let mut item = FakeItem::named("Cafe A");
        for (bit, (field, value)) in values.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                item = item.with(*field, value);
            }
        }
        let page = open(item);
        let record = DetailExtractor::new(&page, &config)
            .extract(Some("Cafe A".to_string()))
            .await;

        for (bit, (field, value)) in values.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                assert_eq!(record.get(*field), *value, "mask {:05b}", mask);
            } else {
                assert_eq!(record.get(*field), field.sentinel(), "mask {:05b}", mask);
            }
        }
    }
}

#[tokio::test]
async fn test_row_name_preferred_over_heading() {
    let page = open(FakeItem::named("Row Name").heading("Heading Name"));
    let config = config();

    let record = DetailExtractor::new(&page, &config)
        .extract(Some("Row Name".to_string()))
        .await;
    assert_eq!(record.name, "Row Name");
}

#[tokio::test]
async fn test_heading_used_when_row_name_unknown() {
    let page = open(FakeItem::unnamed().heading("Cafe Z"));
    let config = config();

    let record = DetailExtractor::new(&page, &config).extract(None).await;
    assert_eq!(record.name, "Cafe Z");
}

#[tokio::test]
async fn test_no_name_anywhere_uses_sentinel() {
    let page = open(FakeItem::unnamed().with(Field::Phone, "0265 123 4567"));
    let config = config();

    let record = DetailExtractor::new(&page, &config).extract(None).await;
    assert_eq!(record.name, NO_NAME);
    assert_eq!(record.phone, "0265 123 4567");
}

#[tokio::test]
async fn test_field_text_is_cleaned() {
    let page = open(
        FakeItem::named("Cafe A")
            .with(Field::Address, "\u{e0c8}\n  123 St,\n Vadodara ")
            .with(Field::Phone, "   "),
    );
    let config = config();

    let record = DetailExtractor::new(&page, &config)
        .extract(Some("Cafe A".to_string()))
        .await;
    assert_eq!(record.address, "123 St, Vadodara");
    assert_eq!(record.phone, "No phone found");
}

#[tokio::test]
async fn test_lookup_reports_absence() {
    let page = open(FakeItem::named("Cafe A").with(Field::Website, "https://a.example/"));
    let config = config();
    let extractor = DetailExtractor::new(&page, &config);

    assert_eq!(
        extractor.lookup(Field::Website).await,
        Some("https://a.example/".to_string())
    );
    assert_eq!(extractor.lookup(Field::Address).await, None);
}
