use super::localtime::{shift_by_fixed_offset, LOCAL_OFFSET_HOURS};
use crate::db::models::JobWithRefs;

const HEADER: &str = "Date,Title,Location,Start Time,End Time,Duration (hours),Tags,Notes";

/// Quote a CSV field when it contains a delimiter, quote, or line break.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn push_row(out: &mut String, fields: &[String]) {
    let row: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
    out.push_str(&row.join(","));
    out.push('\n');
}

/// Render jobs as a CSV document with a trailing totals block. Dates and
/// times are shown in the fixed local offset.
pub fn build_csv(jobs: &[JobWithRefs]) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');

    let mut total_minutes: i64 = 0;
    for job in jobs {
        total_minutes += i64::from(job.duration);

        let date = job
            .date
            .map(|d| {
                shift_by_fixed_offset(d, LOCAL_OFFSET_HOURS)
                    .format("%d/%m/%Y")
                    .to_string()
            })
            .unwrap_or_default();
        let start = shift_by_fixed_offset(job.start_time, LOCAL_OFFSET_HOURS)
            .format("%H:%M")
            .to_string();
        let end = shift_by_fixed_offset(job.end_time, LOCAL_OFFSET_HOURS)
            .format("%H:%M")
            .to_string();

        push_row(
            &mut out,
            &[
                date,
                job.title.clone(),
                job.location_name.clone().unwrap_or_default(),
                start,
                end,
                format!("{:.2}", f64::from(job.duration) / 60.0),
                job.tags.join(", "),
                job.notes.clone().unwrap_or_default(),
            ],
        );
    }

    out.push('\n');
    out.push_str(&format!(
        "Total Hours:,,,,,{:.2},,\n",
        total_minutes as f64 / 60.0
    ));
    out.push_str(&format!("Total Jobs:,,,,,{},,\n", jobs.len()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use sqlx::types::Json;
    use uuid::Uuid;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn row(title: &str, notes: Option<&str>) -> JobWithRefs {
        JobWithRefs {
            id: Uuid::from_u128(1),
            user_id: Uuid::from_u128(2),
            title: title.to_string(),
            description: None,
            notes: notes.map(|n| n.to_string()),
            date: Some(utc(2024, 1, 15, 20, 0)),
            start_time: utc(2024, 1, 15, 21, 0),
            end_time: utc(2024, 1, 15, 22, 30),
            duration: 90,
            tags: vec!["cleanup".into(), "planting".into()],
            location_id: Uuid::from_u128(3),
            organization_id: Uuid::from_u128(4),
            photos: Json(Vec::new()),
            created_at: utc(2024, 1, 15, 22, 31),
            updated_at: utc(2024, 1, 15, 22, 31),
            location_name: Some("Town Belt".into()),
            location_address: None,
            organization_name: Some("Trees Trust".into()),
        }
    }

    #[test]
    fn plain_fields_pass_through_and_risky_fields_are_quoted() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn document_has_header_rows_and_totals() {
        let csv = build_csv(&[row("Beach cleanup", Some("gloves, bags"))]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], HEADER);
        // Stored 20:00/21:00/22:30 UTC renders as the next local day,
        // 09:00-10:30.
        assert_eq!(
            lines[1],
            "16/01/2024,Beach cleanup,Town Belt,09:00,10:30,1.50,\"cleanup, planting\",\"gloves, bags\""
        );
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Total Hours:,,,,,1.50,,");
        assert_eq!(lines[4], "Total Jobs:,,,,,1,,");
    }

    #[test]
    fn dateless_job_renders_empty_date_cell() {
        let mut r = row("Weeding", None);
        r.date = None;

        let csv = build_csv(&[r]);
        let lines: Vec<&str> = csv.lines().collect();

        assert!(lines[1].starts_with(",Weeding,"));
    }

    #[test]
    fn totals_accumulate_across_jobs() {
        let csv = build_csv(&[row("a", None), row("b", None)]);

        assert!(csv.ends_with("Total Hours:,,,,,3.00,,\nTotal Jobs:,,,,,2,,\n"));
    }
}
