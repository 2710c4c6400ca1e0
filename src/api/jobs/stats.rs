use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::localtime::local_day_key;
use crate::db::models::JobStatRow;

/// How many jobs the dashboard shows under "recent".
pub const RECENT_JOBS_LIMIT: usize = 8;

/// Bucket for jobs carrying no tags at all.
pub const UNTAGGED_BUCKET: &str = "Untagged";

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationHours {
    pub location_id: Uuid,
    pub hours: f64,
    pub count: usize,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TagHours {
    pub tag: String,
    pub hours: f64,
    pub count: usize,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecentJobLocation {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecentJob {
    pub id: Uuid,
    pub title: String,
    pub date: Option<DateTime<Utc>>,
    pub duration: i32,
    pub location: Option<RecentJobLocation>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyHours {
    pub year_month: String,
    pub hours: f64,
    pub count: usize,
}

/// Dashboard summary over one user's complete job collection. Every field is
/// always present; an empty collection yields zeros and empty lists.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobStatistics {
    pub total_jobs: usize,
    pub total_hours: f64,
    pub unique_days: usize,
    pub hours_by_location: Vec<LocationHours>,
    pub hours_by_tag: Vec<TagHours>,
    pub recent_jobs: Vec<RecentJob>,
    pub monthly_stats: Vec<MonthlyHours>,
}

/// Summarize a snapshot of one user's jobs.
///
/// Pure and single-pass per grouping dimension: no I/O, no shared state,
/// identical input always yields identical output. Grouping rules:
///
/// - unique days come from the fixed-offset local day key; jobs without a
///   date are skipped by day- and month-bucketing but still count toward
///   `total_jobs` and `total_hours`;
/// - a job contributes its full duration to every tag it carries (a job
///   with N tags lands in N buckets, not split N ways); tagless jobs go to
///   the `"Untagged"` bucket;
/// - location and tag buckets keep first-seen order, recent jobs are date
///   descending (id as tiebreak) capped at `RECENT_JOBS_LIMIT`, monthly
///   buckets sort descending by (year, month).
pub fn summarize(jobs: &[JobStatRow]) -> JobStatistics {
    let total_jobs = jobs.len();

    let total_minutes: i64 = jobs.iter().map(|j| i64::from(j.duration)).sum();
    let total_hours = if total_jobs == 0 {
        0.0
    } else {
        total_minutes as f64 / 60.0
    };

    let mut days: HashSet<String> = HashSet::new();
    for job in jobs {
        if let Some(key) = local_day_key(job.date) {
            days.insert(key);
        }
    }

    let mut hours_by_location: Vec<LocationHours> = Vec::new();
    let mut location_index: HashMap<Uuid, usize> = HashMap::new();
    for job in jobs {
        let idx = *location_index.entry(job.location_id).or_insert_with(|| {
            hours_by_location.push(LocationHours {
                location_id: job.location_id,
                hours: 0.0,
                count: 0,
            });
            hours_by_location.len() - 1
        });
        hours_by_location[idx].hours += f64::from(job.duration) / 60.0;
        hours_by_location[idx].count += 1;
    }

    let mut hours_by_tag: Vec<TagHours> = Vec::new();
    let mut tag_index: HashMap<String, usize> = HashMap::new();
    for job in jobs {
        let mut bump = |tag: &str| {
            let idx = *tag_index.entry(tag.to_string()).or_insert_with(|| {
                hours_by_tag.push(TagHours {
                    tag: tag.to_string(),
                    hours: 0.0,
                    count: 0,
                });
                hours_by_tag.len() - 1
            });
            hours_by_tag[idx].hours += f64::from(job.duration) / 60.0;
            hours_by_tag[idx].count += 1;
        };

        if job.tags.is_empty() {
            bump(UNTAGGED_BUCKET);
        } else {
            for tag in &job.tags {
                bump(tag);
            }
        }
    }

    let mut by_recency: Vec<&JobStatRow> = jobs.iter().collect();
    by_recency.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
    let recent_jobs = by_recency
        .into_iter()
        .take(RECENT_JOBS_LIMIT)
        .map(|job| RecentJob {
            id: job.id,
            title: job.title.clone(),
            date: job.date,
            duration: job.duration,
            location: job.location_name.as_ref().map(|name| RecentJobLocation {
                id: job.location_id,
                name: name.clone(),
            }),
        })
        .collect();

    let mut monthly: BTreeMap<(i32, u32), (f64, usize)> = BTreeMap::new();
    for job in jobs {
        if let Some(date) = job.date {
            let entry = monthly.entry((date.year(), date.month())).or_insert((0.0, 0));
            entry.0 += f64::from(job.duration) / 60.0;
            entry.1 += 1;
        }
    }
    let monthly_stats = monthly
        .iter()
        .rev()
        .map(|(&(year, month), &(hours, count))| MonthlyHours {
            year_month: format!("{}-{:02}", year, month),
            hours,
            count,
        })
        .collect();

    JobStatistics {
        total_jobs,
        total_hours,
        unique_days: days.len(),
        hours_by_location,
        hours_by_tag,
        recent_jobs,
        monthly_stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn job(
        n: u128,
        duration: i32,
        date: Option<DateTime<Utc>>,
        tags: &[&str],
        location: Uuid,
    ) -> JobStatRow {
        JobStatRow {
            id: Uuid::from_u128(n),
            title: format!("job {}", n),
            date,
            duration,
            location_id: location,
            location_name: Some(format!("location {}", location.as_u128())),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn empty_collection_yields_fully_populated_zero_summary() {
        let stats = summarize(&[]);

        assert_eq!(stats.total_jobs, 0);
        assert_eq!(stats.total_hours, 0.0);
        assert_eq!(stats.unique_days, 0);
        assert!(stats.hours_by_location.is_empty());
        assert!(stats.hours_by_tag.is_empty());
        assert!(stats.recent_jobs.is_empty());
        assert!(stats.monthly_stats.is_empty());
    }

    #[test]
    fn three_job_dashboard_scenario() {
        let loc_a = Uuid::from_u128(0xA);
        let loc_b = Uuid::from_u128(0xB);
        let jobs = vec![
            job(1, 60, Some(utc(2024, 1, 15, 23, 0, 0)), &["cleanup"], loc_a),
            job(
                2,
                30,
                Some(utc(2024, 1, 16, 1, 0, 0)),
                &["cleanup", "planting"],
                loc_a,
            ),
            job(3, 90, Some(utc(2024, 2, 1, 0, 0, 0)), &[], loc_b),
        ];

        let stats = summarize(&jobs);

        assert_eq!(stats.total_jobs, 3);
        assert_eq!(stats.total_hours, 3.0);
        // Jobs 1 and 2 shift into the same local day (2024-01-16); job 3
        // lands on 2024-02-01.
        assert_eq!(stats.unique_days, 2);

        assert_eq!(
            stats.hours_by_location,
            vec![
                LocationHours {
                    location_id: loc_a,
                    hours: 1.5,
                    count: 2
                },
                LocationHours {
                    location_id: loc_b,
                    hours: 1.5,
                    count: 1
                },
            ]
        );

        assert_eq!(
            stats.hours_by_tag,
            vec![
                TagHours {
                    tag: "cleanup".into(),
                    hours: 1.5,
                    count: 2
                },
                TagHours {
                    tag: "planting".into(),
                    hours: 0.5,
                    count: 1
                },
                TagHours {
                    tag: UNTAGGED_BUCKET.into(),
                    hours: 1.5,
                    count: 1
                },
            ]
        );

        let recent_ids: Vec<Uuid> = stats.recent_jobs.iter().map(|j| j.id).collect();
        assert_eq!(
            recent_ids,
            vec![Uuid::from_u128(3), Uuid::from_u128(2), Uuid::from_u128(1)]
        );

        assert_eq!(
            stats.monthly_stats,
            vec![
                MonthlyHours {
                    year_month: "2024-02".into(),
                    hours: 1.5,
                    count: 1
                },
                MonthlyHours {
                    year_month: "2024-01".into(),
                    hours: 1.5,
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn multi_tag_job_contributes_full_duration_to_each_tag() {
        let loc = Uuid::from_u128(1);
        let jobs = vec![job(
            1,
            120,
            Some(utc(2024, 5, 1, 0, 0, 0)),
            &["a", "b", "c"],
            loc,
        )];

        let stats = summarize(&jobs);

        // Full two hours in every bucket, never split three ways.
        assert_eq!(stats.hours_by_tag.len(), 3);
        for bucket in &stats.hours_by_tag {
            assert_eq!(bucket.hours, 2.0);
            assert_eq!(bucket.count, 1);
        }
    }

    #[test]
    fn location_counts_sum_to_total_jobs_and_tag_counts_exceed_it() {
        let loc_a = Uuid::from_u128(1);
        let loc_b = Uuid::from_u128(2);
        let jobs = vec![
            job(1, 60, Some(utc(2024, 1, 1, 0, 0, 0)), &["x", "y"], loc_a),
            job(2, 60, Some(utc(2024, 1, 2, 0, 0, 0)), &["x"], loc_a),
            job(3, 60, Some(utc(2024, 1, 3, 0, 0, 0)), &[], loc_b),
        ];

        let stats = summarize(&jobs);

        let location_count: usize = stats.hours_by_location.iter().map(|l| l.count).sum();
        assert_eq!(location_count, stats.total_jobs);

        // One job has two tags, so tag counts strictly exceed the job count
        // (the tagless job still contributes 1 via Untagged).
        let tag_count: usize = stats.hours_by_tag.iter().map(|t| t.count).sum();
        assert_eq!(tag_count, 4);
        assert!(tag_count > stats.total_jobs);
    }

    #[test]
    fn jobs_sharing_a_local_day_count_once() {
        let loc = Uuid::from_u128(1);
        let jobs = vec![
            job(1, 60, Some(utc(2024, 1, 15, 23, 0, 0)), &[], loc),
            job(2, 60, Some(utc(2024, 1, 16, 1, 0, 0)), &[], loc),
            job(3, 60, Some(utc(2024, 1, 16, 13, 0, 0)), &[], loc),
        ];

        let stats = summarize(&jobs);

        // First two share 2024-01-16 local; third lands on 2024-01-17.
        assert_eq!(stats.unique_days, 2);
        assert!(stats.unique_days <= stats.total_jobs);
    }

    #[test]
    fn dateless_jobs_count_toward_totals_but_not_day_or_month_buckets() {
        let loc = Uuid::from_u128(1);
        let jobs = vec![
            job(1, 60, None, &[], loc),
            job(2, 60, Some(utc(2024, 1, 1, 0, 0, 0)), &[], loc),
        ];

        let stats = summarize(&jobs);

        assert_eq!(stats.total_jobs, 2);
        assert_eq!(stats.total_hours, 2.0);
        assert_eq!(stats.unique_days, 1);
        assert_eq!(stats.monthly_stats.len(), 1);
        assert_eq!(stats.monthly_stats[0].count, 1);
    }

    #[test]
    fn monthly_stats_sort_descending_with_padded_keys() {
        let loc = Uuid::from_u128(1);
        let jobs = vec![
            job(1, 60, Some(utc(2023, 11, 5, 0, 0, 0)), &[], loc),
            job(2, 60, Some(utc(2024, 2, 5, 0, 0, 0)), &[], loc),
            job(3, 60, Some(utc(2023, 12, 5, 0, 0, 0)), &[], loc),
            job(4, 60, Some(utc(2024, 2, 20, 0, 0, 0)), &[], loc),
        ];

        let stats = summarize(&jobs);

        let keys: Vec<&str> = stats
            .monthly_stats
            .iter()
            .map(|m| m.year_month.as_str())
            .collect();
        assert_eq!(keys, vec!["2024-02", "2023-12", "2023-11"]);
        assert_eq!(stats.monthly_stats[0].count, 2);
    }

    #[test]
    fn recent_jobs_capped_and_date_descending() {
        let loc = Uuid::from_u128(1);
        let jobs: Vec<JobStatRow> = (1..=10)
            .map(|n| {
                job(
                    n as u128,
                    30,
                    Some(utc(2024, 1, n, 12, 0, 0)),
                    &[],
                    loc,
                )
            })
            .collect();

        let stats = summarize(&jobs);

        assert_eq!(stats.recent_jobs.len(), RECENT_JOBS_LIMIT);
        assert_eq!(stats.recent_jobs[0].id, Uuid::from_u128(10));
        assert_eq!(stats.recent_jobs[7].id, Uuid::from_u128(3));
    }

    #[test]
    fn recent_jobs_break_date_ties_by_id() {
        let loc = Uuid::from_u128(1);
        let date = Some(utc(2024, 1, 1, 12, 0, 0));
        let jobs = vec![job(2, 30, date, &[], loc), job(1, 30, date, &[], loc)];

        let stats = summarize(&jobs);

        assert_eq!(stats.recent_jobs[0].id, Uuid::from_u128(1));
        assert_eq!(stats.recent_jobs[1].id, Uuid::from_u128(2));
    }

    #[test]
    fn orphaned_location_renders_as_missing_reference_in_recent_jobs() {
        let mut row = job(1, 30, Some(utc(2024, 1, 1, 0, 0, 0)), &[], Uuid::from_u128(9));
        row.location_name = None;

        let stats = summarize(&[row]);

        assert!(stats.recent_jobs[0].location.is_none());
    }

    #[test]
    fn summarizing_twice_yields_identical_serialized_output() {
        let loc = Uuid::from_u128(1);
        let jobs = vec![
            job(1, 45, Some(utc(2024, 1, 15, 23, 0, 0)), &["a", "b"], loc),
            job(2, 75, None, &[], loc),
            job(3, 15, Some(utc(2024, 2, 1, 3, 0, 0)), &["a"], loc),
        ];

        let first = serde_json::to_string(&summarize(&jobs)).unwrap();
        let second = serde_json::to_string(&summarize(&jobs)).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn total_hours_is_exact_minute_sum_over_sixty() {
        let loc = Uuid::from_u128(1);
        let jobs = vec![
            job(1, 90, Some(utc(2024, 1, 1, 0, 0, 0)), &[], loc),
            job(2, 45, Some(utc(2024, 1, 2, 0, 0, 0)), &[], loc),
        ];

        let stats = summarize(&jobs);

        assert_eq!(stats.total_hours, 135.0 / 60.0);
    }
}
