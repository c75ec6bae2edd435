//! Parsers run against stored site pages.

use animesubinfo::{CatalogParser, SearchResultsParser, decode_page};

fn page(bytes: &[u8]) -> String {
    decode_page(bytes, Some("text/html"))
}

#[test]
fn test_catalog_prefers_season_entry() {
    let html = page(include_bytes!("fixtures/catalog_y.html"));
    assert_eq!(
        CatalogParser::new("Yuru Camp")
            .with_season("3")
            .parse(&html)
            .as_deref(),
        Some("szukaj_old.php?pTitle=jp&szukane=Yuru+Camp+Season+3")
    );
    assert_eq!(
        CatalogParser::new("Yuru Camp").parse(&html).as_deref(),
        Some("szukaj_old.php?pTitle=jp&szukane=Yuru+Camp")
    );
}

#[test]
fn test_catalog_fuzzy_movie_title() {
    let html = page(include_bytes!("fixtures/catalog_y.html"));
    assert_eq!(
        CatalogParser::new("Yuru Camp Movie").parse(&html).as_deref(),
        Some("szukaj_old.php?pTitle=jp&szukane=Yuru+Camp+The+Movie")
    );
}

#[test]
fn test_catalog_matches_polish_alt_title() {
    let html = page(include_bytes!("fixtures/catalog_b.html"));
    assert_eq!(
        CatalogParser::new("Opowieść o potworach")
            .parse(&html)
            .as_deref(),
        Some("szukaj_old.php?pTitle=jp&szukane=Bakemonogatari")
    );
}

#[test]
fn test_catalog_roman_numeral_sequel() {
    let html = page(include_bytes!("fixtures/catalog_b.html"));
    assert_eq!(
        CatalogParser::new("Bakuman").parse(&html).as_deref(),
        Some("szukaj_old.php?pTitle=en&szukane=Bakuman_")
    );
    assert_eq!(
        CatalogParser::new("Bakuman II").parse(&html).as_deref(),
        Some("szukaj_old.php?pTitle=pl&szukane=Bakuman_+2")
    );
}

#[test]
fn test_search_page_fields_and_pages() {
    let html = page(include_bytes!("fixtures/search_page1.html"));
    let page = SearchResultsParser::parse(&html);

    assert_eq!(page.number_of_pages, 3);
    assert_eq!(page.subtitles.len(), 2);
    let first = &page.subtitles[0];
    assert_eq!(first.id, 201);
    assert_eq!(first.original_title, "Yuru Camp");
    assert_eq!(first.episode, 1);
    assert_eq!(first.english_title, "Laid-Back Camp");
    assert_eq!(first.author, "Kasumi");
    assert_eq!(first.downloaded_times, 1534);
    assert_eq!(first.comment_count, 12);
    assert_eq!(first.rating.average, 4);
    assert_eq!(page.sh_for(202), Some("sh202"));
}

#[test]
fn test_search_pack_range() {
    let html = page(include_bytes!("fixtures/search_yuru_camp_s3.html"));
    let page = SearchResultsParser::parse(&html);

    assert_eq!(page.number_of_pages, 1);
    let pack = &page.subtitles[0];
    assert!(pack.is_pack());
    assert_eq!((pack.episode, pack.to_episode), (1, 12));
    assert_eq!(pack.description, "Komplet odcinków");
}

#[test]
fn test_search_empty_page() {
    let html = page(include_bytes!("fixtures/search_empty.html"));
    let page = SearchResultsParser::parse(&html);
    assert!(page.subtitles.is_empty());
    assert_eq!(page.number_of_pages, 0);
}
