use chrono::{Duration, TimeZone, Utc};

use linker_client::models::{Link, ShortCode};
use linker_client::utils::formatting::{escape_html, format_file_size, short_url};
use linker_client::utils::helpers::{FilterType, filter_items};
use linker_client::utils::time_parser::{TimeParser, format_date_for_input, is_expired};
use linker_client::utils::validation::{
    RESERVED_SHORT_CODES, validate_email, validate_password, validate_short_code, validate_url,
    validate_username,
};

fn link(id: &str, title: &str, url: &str, code: &str, expired: bool) -> Link {
    let now = Utc::now();
    Link {
        id: id.to_string(),
        original_url: url.to_string(),
        title: Some(title.to_string()),
        description: None,
        analytics: true,
        expires_at: Some(if expired {
            now - Duration::hours(1)
        } else {
            now + Duration::days(3)
        }),
        clicks: 0,
        created_at: now,
        short_codes: vec![ShortCode::new(code, true)],
    }
}

#[test]
fn test_format_file_size() {
    assert_eq!(format_file_size(0), "0 B");
    assert_eq!(format_file_size(512), "512.0 B");
    assert_eq!(format_file_size(1536), "1.5 KB");
    assert_eq!(format_file_size(1024 * 1024), "1.0 MB");
    assert_eq!(format_file_size(1_073_741_824), "1.0 GB");
    // GB 是最大单位
    assert_eq!(format_file_size(2048 * 1_073_741_824), "2048.0 GB");
}

#[test]
fn test_validate_url() {
    assert!(validate_url("https://example.com/a?b=c").is_ok());
    assert!(validate_url("http://localhost:8080").is_ok());
    assert!(validate_url("not a url").is_err());
    assert!(validate_url("example.com").is_err());
    assert!(validate_url("").is_err());
}

#[test]
fn test_validate_short_code() {
    for code in ["a", "abc-123", "Q3_report", "x".repeat(100).as_str()] {
        assert!(validate_short_code(code).is_ok(), "should accept {}", code);
    }
    for code in ["has space", "slash/", "ümlaut", "dot.code", "x".repeat(101).as_str()] {
        assert!(validate_short_code(code).is_err(), "should reject {}", code);
    }
    for reserved in RESERVED_SHORT_CODES {
        assert!(validate_short_code(reserved).is_err());
        assert!(validate_short_code(&reserved.to_uppercase()).is_err());
    }
}

#[test]
fn test_account_validators() {
    assert!(validate_username("bob").is_ok());
    assert!(validate_username("ab").is_err());
    assert!(validate_email("bob@example.com").is_ok());
    assert!(validate_email("bob@example").is_err());
    assert!(validate_password("secret1").is_ok());
    assert!(validate_password("123").is_err());
}

#[test]
fn test_is_expired() {
    let now = Utc::now();
    assert!(!is_expired(None));
    assert!(is_expired(Some(now - Duration::seconds(5))));
    assert!(!is_expired(Some(now + Duration::minutes(5))));
}

#[test]
fn test_filter_items_search_and_status() {
    let links = vec![
        link("1", "Quarterly Report", "https://example.com/a", "q3", false),
        link("2", "Old report", "https://example.com/b", "old", true),
        link("3", "Slides", "https://example.com/REPORT.pdf", "deck", false),
        link("4", "Misc", "https://example.com/c", "report-code", false),
        link("5", "Unrelated", "https://example.com/d", "zzz", false),
    ];

    let ids: Vec<&str> = filter_items(&links, "report", FilterType::Active)
        .into_iter()
        .map(|l| l.id.as_str())
        .collect();
    assert_eq!(ids, vec!["1", "3", "4"]);

    let expired: Vec<&str> = filter_items(&links, "REPORT", FilterType::Expired)
        .into_iter()
        .map(|l| l.id.as_str())
        .collect();
    assert_eq!(expired, vec!["2"]);

    assert_eq!(filter_items(&links, "", FilterType::All).len(), 5);
    // 链接没有可见性字段，按公开处理
    assert_eq!(filter_items(&links, "", FilterType::Private).len(), 0);
    assert_eq!(filter_items(&links, "", FilterType::Public).len(), 5);
}

#[test]
fn test_filter_type_parse_and_cycle() {
    assert_eq!("active".parse::<FilterType>().unwrap(), FilterType::Active);
    assert_eq!("PRIVATE".parse::<FilterType>().unwrap(), FilterType::Private);
    assert!("bogus".parse::<FilterType>().is_err());

    let mut filter = FilterType::All;
    for _ in 0..5 {
        filter = filter.next();
    }
    assert_eq!(filter, FilterType::All);
}

#[test]
fn test_input_datetime_round_trip() {
    let t = Utc.with_ymd_and_hms(2030, 6, 15, 9, 45, 0).unwrap();
    let text = format_date_for_input(Some(t));
    assert_eq!(TimeParser::parse_expire_time(&text).unwrap(), t);
    assert_eq!(format_date_for_input(None), "");
}

#[test]
fn test_relative_expiry() {
    let before = Utc::now();
    let parsed = TimeParser::parse_expire_time("1d").unwrap();
    assert!(parsed >= before + Duration::days(1) - Duration::seconds(1));
    assert!(parsed <= Utc::now() + Duration::days(1));
}

#[test]
fn test_short_url_and_escape() {
    assert_eq!(
        short_url("http://localhost:8080/", "/s/", "abc"),
        "http://localhost:8080/s/abc"
    );
    assert_eq!(
        escape_html("<a href=\"x\">&'</a>"),
        "&lt;a href=&quot;x&quot;&gt;&amp;&#039;&lt;/a&gt;"
    );
}
