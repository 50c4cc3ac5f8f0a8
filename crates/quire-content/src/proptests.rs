//! Property-based tests for decoding and validation.

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;
    use proptest::prelude::*;

    use crate::{Document, parse, parse_at, validate};

    fn single_quoted(s: &str) -> String {
        format!("'{}'", s.replace('\'', "''"))
    }

    fn render(title: &str, date: NaiveDate, tags: &[String], body: &str) -> String {
        let tags: Vec<String> = tags.iter().map(|t| single_quoted(t)).collect();
        format!(
            "---\ntitle: {}\ndate: {}\ntags: [{}]\n---\n{}",
            single_quoted(title),
            date.format("%Y-%m-%d"),
            tags.join(", "),
            body
        )
    }

    fn arb_date() -> impl Strategy<Value = NaiveDate> {
        (1970i32..2100, 1u32..=12, 1u32..=28)
            .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn arb_title() -> impl Strategy<Value = String> {
        "[A-Za-z0-9][A-Za-z0-9 ,.!?'#:-]{0,40}"
    }

    fn arb_tags() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-z][a-z0-9-]{0,12}", 0..6)
    }

    fn arb_body() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9 .\n]{0,80}"
    }

    proptest! {
        #[test]
        fn test_written_fields_read_back(
            title in arb_title(),
            date in arb_date(),
            tags in arb_tags(),
            body in arb_body(),
        ) {
            let doc = validate(parse(&render(&title, date, &tags, &body)).unwrap()).unwrap();

            let expected_tags: BTreeSet<String> = tags.into_iter().collect();
            prop_assert_eq!(doc.title(), title.as_str());
            prop_assert_eq!(doc.date(), date);
            prop_assert_eq!(doc.tags(), &expected_tags);
            prop_assert_eq!(doc.body(), body.as_str());
        }

        #[test]
        fn test_parse_is_deterministic(
            title in arb_title(),
            date in arb_date(),
            tags in arb_tags(),
        ) {
            let text = render(&title, date, &tags, "Body");
            let first: Document = validate(parse_at("a.md", &text).unwrap()).unwrap();
            let second: Document = validate(parse_at("a.md", &text).unwrap()).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn test_numeric_looking_text_kept_verbatim(
            title in "[0-9]{1,4}\\.[0-9]{1,3}0",
            tags in prop::collection::vec("[0-9]{1,3}(\\.[0-9]{0,2})?", 1..6),
        ) {
            let quoted = render(&title, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), &tags, "Body");
            let doc = parse(&quoted).unwrap();
            prop_assert_eq!(doc.title.as_deref(), Some(title.as_str()));
            let expected: BTreeSet<String> = tags.into_iter().collect();
            prop_assert_eq!(&doc.tags, &expected);

            let unquoted = format!("---\ntitle: {title}\ndate: 2020-01-01\n---\n");
            prop_assert!(parse(&unquoted).is_err());
        }

        #[test]
        fn test_unfenced_text_never_parses(text in "[^-+\u{feff}][^\n]{0,60}") {
            prop_assert!(parse(&text).is_err());
        }

        #[test]
        fn test_date_layouts_agree(date in arb_date(), h in 0u32..24, m in 0u32..60) {
            let plain = date.format("%Y-%m-%d").to_string();
            let spaced = format!("{plain} {h:02}:{m:02}:00");
            let rfc = format!("{plain}T{h:02}:{m:02}:00Z");
            prop_assert_eq!(crate::parse_date(&plain), Some(date));
            prop_assert_eq!(crate::parse_date(&spaced), Some(date));
            prop_assert_eq!(crate::parse_date(&rfc), Some(date));
        }
    }
}
