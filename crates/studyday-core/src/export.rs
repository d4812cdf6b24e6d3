//! iCalendar export of a day plan.
//!
//! Only study blocks are exported. Times are floating local times on the
//! plan date; `DTSTAMP` is UTC.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::model::{BlockKind, PlanBlock};

const PRODID: &str = "-//studyday//studyday//EN";

/// Render the study blocks of `blocks` on `date` as an iCalendar document.
pub fn render_ics(date: NaiveDate, blocks: &[PlanBlock], now: DateTime<Utc>) -> String {
    let stamp = now.format("%Y%m%dT%H%M%SZ").to_string();
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{PRODID}"),
    ];

    for block in blocks.iter().filter(|b| b.kind == BlockKind::Study) {
        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:{}@studyday", uuid::Uuid::new_v4().simple()));
        lines.push(format!("DTSTAMP:{stamp}"));
        lines.push(format!("DTSTART:{}", local_stamp(date, block.start_min)));
        lines.push(format!("DTEND:{}", local_stamp(date, block.end_min)));
        lines.push(format!("SUMMARY:{}", escape_text(&block.label)));
        lines.push("END:VEVENT".to_string());
    }

    lines.push("END:VCALENDAR".to_string());
    let mut out = lines.join("\r\n");
    out.push_str("\r\n");
    out
}

fn local_stamp(date: NaiveDate, minutes: i32) -> String {
    let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    (midnight + Duration::minutes(i64::from(minutes)))
        .format("%Y%m%dT%H%M%S")
        .to_string()
}

fn escape_text(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WorkItem;
    use chrono::TimeZone;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    #[test]
    fn exports_only_study_blocks() {
        let item = WorkItem::new("CS", "Lab", date(), 900, 60);
        let blocks = vec![
            PlanBlock::study(540, 600, &item),
            PlanBlock::rest(520, 540),
            PlanBlock::lecture(600, 700, "Lecture: CS"),
        ];
        let now = Utc.with_ymd_and_hms(2024, 3, 4, 7, 30, 0).unwrap();
        let ics = render_ics(date(), &blocks, now);

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 1);
        assert!(ics.contains("DTSTART:20240304T090000\r\n"));
        assert!(ics.contains("DTEND:20240304T100000\r\n"));
        assert!(ics.contains("DTSTAMP:20240304T073000Z\r\n"));
        assert!(ics.contains("SUMMARY:Study: CS — Lab\r\n"));
        assert!(ics.contains("@studyday\r\n"));
    }

    #[test]
    fn empty_plan_is_an_empty_calendar() {
        let ics = render_ics(date(), &[], Utc::now());
        assert_eq!(ics.matches("VEVENT").count(), 0);
        assert!(ics.contains("PRODID:-//studyday//studyday//EN"));
    }

    #[test]
    fn summary_escapes_separators() {
        assert_eq!(escape_text("a, b; c"), "a\\, b\\; c");
    }
}
