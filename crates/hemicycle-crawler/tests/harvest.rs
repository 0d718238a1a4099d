mod common;

use common::{document, toc_page, MockClient};
use hemicycle_crawler::extract::{ExtractError, Format, XmlDialect};
use hemicycle_crawler::{
    anyhow, fetch_document, CleanedRecord, HarvestConfig, HarvestError, Harvester, ItemLocator,
    OnError, Publish, SourceProfile,
};

const TOC_A: &str = "https://x.eu/doceo/document/TA-5-1999-07-21-TOC_NL.html";
const TOC_B: &str = "https://x.eu/doceo/document/TA-5-1999-07-22-TOC_NL.html";
const DOC_A: &str = "https://x.eu/doceo/document/TA-5-1999-07-21_NL.html";
const DOC_A_XML: &str = "https://x.eu/doceo/document/TA-5-1999-07-21_NL.xml";
const DOC_B: &str = "https://x.eu/doceo/document/TA-5-1999-07-22_NL.html";

const LONG_TEXT: &str = "Het Parlement neemt de resolutie aan over de toekomst van de interne markt.";

fn config(min_text_length: usize) -> HarvestConfig {
    HarvestConfig {
        profile: SourceProfile {
            min_text_length,
            ..SourceProfile::adopted_texts()
        },
        ..Default::default()
    }
}

fn locator() -> ItemLocator {
    ItemLocator {
        page: TOC_A.into(),
        primary: DOC_A.into(),
        fallback: Some(DOC_A_XML.into()),
    }
}

#[tokio::test]
async fn two_page_chain() {
    let client = MockClient::new()
        .html(TOC_A, &toc_page(Some(TOC_B)))
        .html(TOC_B, &toc_page(None))
        .html(DOC_A, &document("Dit is een test."))
        .html(DOC_B, &document("Dit is een test."));
    let harvester = Harvester::with_client(client, config(10)).unwrap();

    let report = harvester.run(TOC_A).await.unwrap();

    assert_eq!(report.attempted, 2);
    assert!(report.failures.is_empty());
    assert_eq!(
        report.records,
        vec![
            CleanedRecord {
                url: DOC_A.into(),
                text: "Dit is een test.".into(),
                source: "European Parliament Adopted Text".into(),
            },
            CleanedRecord {
                url: DOC_B.into(),
                text: "Dit is een test.".into(),
                source: "European Parliament Adopted Text".into(),
            },
        ]
    );
}

#[tokio::test]
async fn two_page_chain_of_xml_documents() {
    let body = r#"<text><p xml:lang="nl">  Dit is een   test.  (Stemming: ja) </p><p xml:lang="en">This is a test.</p></text>"#;
    let client = MockClient::new()
        .html(TOC_A, &toc_page(Some(TOC_B)))
        .html(TOC_B, &toc_page(None))
        .xml(DOC_A, body)
        .xml(DOC_B, body);
    let harvester = Harvester::with_client(client, config(10)).unwrap();

    let report = harvester.run(TOC_A).await.unwrap();

    let records = report
        .records
        .iter()
        .map(|r| (r.url.as_str(), r.text.as_str(), r.source.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(
        records,
        vec![
            (DOC_A, "Dit is een test.", "European Parliament Adopted Text"),
            (DOC_B, "Dit is een test.", "European Parliament Adopted Text"),
        ]
    );
}

#[tokio::test]
async fn short_text_is_skipped() {
    let client = MockClient::new()
        .html(TOC_A, &toc_page(Some(TOC_B)))
        .html(TOC_B, &toc_page(None))
        .html(DOC_A, &document("Kort."))
        .html(DOC_B, &document("Dit is een test."));
    let harvester = Harvester::with_client(client, config(10)).unwrap();

    let report = harvester.run(TOC_A).await.unwrap();

    assert_eq!(report.attempted, 2);
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].url, DOC_B);
    assert_eq!(report.failures.len(), 1);
    let (page, err) = &report.failures[0];
    assert_eq!(page, TOC_A);
    assert!(matches!(
        err,
        HarvestError::Extract(ExtractError::TooShort { len: 5, min: 10 })
    ));
}

#[tokio::test]
async fn default_length_gate() {
    let client = MockClient::new()
        .html(TOC_A, &toc_page(Some(TOC_B)))
        .html(TOC_B, &toc_page(None))
        .html(DOC_A, &document("Dit is een test."))
        .html(DOC_B, &document(LONG_TEXT));
    let harvester = Harvester::with_client(client, HarvestConfig::default()).unwrap();

    let report = harvester.run(TOC_A).await.unwrap();

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].text, LONG_TEXT);
}

#[tokio::test]
async fn boilerplate_is_removed() {
    let text = format!("{LONG_TEXT} (debat) Het debat wordt gesloten.");
    let client = MockClient::new()
        .html(TOC_A, &toc_page(None))
        .html(DOC_A, &document(&text));
    let harvester = Harvester::with_client(client, HarvestConfig::default()).unwrap();

    let report = harvester.run(TOC_A).await.unwrap();

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].text, LONG_TEXT);
}

#[tokio::test]
async fn fallback_on_not_found() {
    let client = MockClient::new().xml(
        DOC_A_XML,
        r#"<doc><text xml:lang="nl">Dit is een test.</text><text xml:lang="en">This is a test.</text></doc>"#,
    );

    let document = fetch_document(&client, &locator(), XmlDialect::Generic)
        .await
        .unwrap();

    assert_eq!(document.url, DOC_A_XML);
    assert_eq!(document.format, Format::Xml(XmlDialect::Generic));
    assert_eq!(client.requests(), vec![DOC_A.to_string(), DOC_A_XML.to_string()]);
}

#[tokio::test]
async fn fallback_error_is_returned() {
    let client = MockClient::new().status(DOC_A_XML, 503);

    let res = fetch_document(&client, &locator(), XmlDialect::Generic).await;

    assert!(matches!(res, Err(HarvestError::Status { url, status: 503 }) if url == DOC_A_XML));
    assert_eq!(client.count(DOC_A), 1);
    assert_eq!(client.count(DOC_A_XML), 1);
}

#[tokio::test]
async fn no_fallback_on_other_status() {
    let client = MockClient::new()
        .status(DOC_A, 500)
        .xml(DOC_A_XML, "<doc>unused</doc>");

    let res = fetch_document(&client, &locator(), XmlDialect::Generic).await;

    assert!(matches!(res, Err(HarvestError::Status { status: 500, .. })));
    assert_eq!(client.count(DOC_A_XML), 0);
}

#[tokio::test]
async fn structured_dialect_from_profile() {
    let minutes = r#"<PV><PV.Debate.Text><PARA>Het Parlement keurt de notulen van de vorige vergadering goed.</PARA></PV.Debate.Text></PV>"#;
    let client = MockClient::new()
        .html(TOC_A, &toc_page(None))
        .xml(DOC_A_XML, minutes);
    let config = HarvestConfig {
        profile: SourceProfile::minutes(),
        ..Default::default()
    };
    let harvester = Harvester::with_client(client, config).unwrap();
    assert_eq!(harvester.config().profile.xml_dialect, XmlDialect::Structured);

    let report = harvester.run(TOC_A).await.unwrap();

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].url, DOC_A_XML);
    assert_eq!(report.records[0].source, "European Parliament Minutes");
    assert_eq!(
        report.records[0].text,
        "Het Parlement keurt de notulen van de vorige vergadering goed."
    );
}

#[tokio::test]
async fn item_failures_never_abort() {
    let client = MockClient::new()
        .html(TOC_A, &toc_page(Some(TOC_B)))
        .html(TOC_B, &toc_page(None))
        .unreachable(DOC_A)
        .html(DOC_B, &document(LONG_TEXT));
    let config = HarvestConfig {
        on_page_error: OnError::Fail,
        ..Default::default()
    };
    let harvester = Harvester::with_client(client, config).unwrap();

    let report = harvester.run(TOC_A).await.unwrap();

    assert_eq!(report.records.len(), 1);
    assert!(matches!(
        report.failures[0].1,
        HarvestError::Network { .. }
    ));
    assert_eq!(harvester.client().count(DOC_A_XML), 0);
}

#[tokio::test]
async fn page_failure_aborts_when_configured() {
    let client = MockClient::new()
        .html(TOC_A, &toc_page(Some(TOC_B)))
        .status(TOC_B, 502)
        .html(DOC_A, &document(LONG_TEXT));
    let config = HarvestConfig {
        on_page_error: OnError::Fail,
        ..Default::default()
    };
    let harvester = Harvester::with_client(client, config).unwrap();

    let res = harvester.run(TOC_A).await;

    assert!(matches!(res, Err(HarvestError::Status { status: 502, .. })));
    assert_eq!(harvester.client().count(DOC_A), 0);
}

#[tokio::test]
async fn page_failure_keeps_harvested_records() {
    let client = MockClient::new()
        .html(TOC_A, &toc_page(Some(TOC_B)))
        .status(TOC_B, 502)
        .html(DOC_A, &document(LONG_TEXT))
        .html(DOC_B, &document(LONG_TEXT));
    let harvester = Harvester::with_client(client, HarvestConfig::default()).unwrap();

    let report = harvester.run(TOC_A).await.unwrap();

    assert_eq!(report.attempted, 2);
    assert_eq!(report.records.len(), 2);
    assert!(report.interrupted.is_some());
}

#[tokio::test]
async fn concurrent_downloads_keep_order() {
    let tocs = (1..=5)
        .map(|i| format!("https://x.eu/doceo/document/TA-{i}-TOC_NL.html"))
        .collect::<Vec<_>>();
    let mut client = MockClient::new();
    for (i, toc) in tocs.iter().enumerate() {
        client = client
            .html(toc, &toc_page(tocs.get(i + 1).map(String::as_str)))
            .html(
                &format!("https://x.eu/doceo/document/TA-{}_NL.html", i + 1),
                &document(&format!("{LONG_TEXT} Document {}.", i + 1)),
            );
    }
    let config = HarvestConfig {
        concurrent_downloads: 3,
        ..Default::default()
    };
    let harvester = Harvester::with_client(client, config).unwrap();

    let report = harvester.run(&tocs[0]).await.unwrap();

    let urls = report.records.iter().map(|r| r.url.as_str()).collect::<Vec<_>>();
    assert_eq!(
        urls,
        (1..=5)
            .map(|i| format!("https://x.eu/doceo/document/TA-{i}_NL.html"))
            .collect::<Vec<_>>()
    );
}

#[derive(Default)]
struct CountingPublisher {
    calls: usize,
    records: Vec<CleanedRecord>,
}

impl Publish for CountingPublisher {
    fn publish(&mut self, records: &[CleanedRecord]) -> anyhow::Result<()> {
        self.calls += 1;
        self.records.extend_from_slice(records);
        Ok(())
    }
}

#[tokio::test]
async fn publishes_records() {
    let client = MockClient::new()
        .html(TOC_A, &toc_page(None))
        .html(DOC_A, &document(LONG_TEXT));
    let harvester = Harvester::with_client(client, HarvestConfig::default()).unwrap();
    let mut publisher = CountingPublisher::default();

    harvester.run_and_publish(TOC_A, &mut publisher).await.unwrap();

    assert_eq!(publisher.calls, 1);
    assert_eq!(publisher.records[0].url, DOC_A);
}

#[tokio::test]
async fn nothing_to_publish() {
    let client = MockClient::new()
        .html(TOC_A, &toc_page(None))
        .html(DOC_A, &document("Kort."));
    let harvester = Harvester::with_client(client, HarvestConfig::default()).unwrap();
    let mut publisher = CountingPublisher::default();

    let report = harvester.run_and_publish(TOC_A, &mut publisher).await.unwrap();

    assert!(report.is_empty());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(publisher.calls, 0);
}
