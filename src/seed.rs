use crate::models::{NewShiftRecord, RecordError, ShiftRecord, ShiftType};
use chrono::NaiveDate;
use std::path::Path;
use tokio::fs;
use tracing::{error, info};

/// Records the dashboard starts with, newest first.
pub async fn load_seed(path: Option<&Path>) -> Vec<ShiftRecord> {
    let Some(path) = path else {
        return sample_records();
    };

    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) => {
            error!("failed to read seed file {}: {err}", path.display());
            return sample_records();
        }
    };

    let entries: Vec<NewShiftRecord> = match serde_json::from_slice(&bytes) {
        Ok(entries) => entries,
        Err(err) => {
            error!("failed to parse seed file {}: {err}", path.display());
            return sample_records();
        }
    };

    match build_records(entries) {
        Ok(records) => {
            info!("seeded {} records from {}", records.len(), path.display());
            records
        }
        Err(err) => {
            error!("invalid record in seed file {}: {err}", path.display());
            sample_records()
        }
    }
}

fn build_records(entries: Vec<NewShiftRecord>) -> Result<Vec<ShiftRecord>, RecordError> {
    let mut records = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| entry.validate(format!("seed-{index}")))
        .collect::<Result<Vec<_>, _>>()?;
    records.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(records)
}

pub fn sample_records() -> Vec<ShiftRecord> {
    const SAMPLE: [(&str, (i32, u32, u32), ShiftType, f64, u32, u32, u32); 10] = [
        ("w4b", (2025, 2, 2), ShiftType::Dinner, 1210.0, 2, 55, 35),
        ("w4a", (2025, 2, 2), ShiftType::Lunch, 520.0, 2, 28, 18),
        ("w5b", (2025, 1, 31), ShiftType::Dinner, 2150.0, 3, 98, 72),
        ("w5a", (2025, 1, 31), ShiftType::Lunch, 260.0, 1, 11, 5),
        ("w3b", (2025, 1, 27), ShiftType::Dinner, 1320.0, 2, 60, 40),
        ("w3a", (2025, 1, 27), ShiftType::Lunch, 180.0, 1, 8, 4),
        ("w2b", (2025, 1, 25), ShiftType::Dinner, 2420.0, 3, 110, 85),
        ("w2a", (2025, 1, 25), ShiftType::Lunch, 350.0, 1, 18, 10),
        ("w1b", (2025, 1, 24), ShiftType::Dinner, 2090.0, 3, 95, 70),
        ("w1a", (2025, 1, 24), ShiftType::Lunch, 280.0, 1, 12, 6),
    ];

    SAMPLE
        .iter()
        .filter_map(|&(id, (y, m, d), shift, sales, staff, covers, reservations)| {
            let entry = NewShiftRecord {
                date: NaiveDate::from_ymd_opt(y, m, d)?,
                shift,
                sales: Some(sales),
                staff_count: Some(staff),
                covers: Some(covers),
                reservations: Some(reservations),
            };
            entry.validate(id.to_string()).ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("shift_planner_{}_{name}.json", std::process::id()));
        path
    }

    #[test]
    fn sample_is_complete_and_consistent() {
        let records = sample_records();
        assert_eq!(records.len(), 10);
        for record in &records {
            assert_eq!(record.walkins, record.covers - record.reservations);
        }
        assert_eq!(records.iter().filter(|r| r.shift == ShiftType::Lunch).count(), 5);
        assert!(records.windows(2).all(|pair| pair[0].date >= pair[1].date));
    }

    #[tokio::test]
    async fn missing_path_uses_sample() {
        let records = load_seed(None).await;
        assert_eq!(records.len(), 10);

        let records = load_seed(Some(temp_path("does_not_exist").as_path())).await;
        assert_eq!(records.len(), 10);
    }

    #[tokio::test]
    async fn seed_file_is_loaded_newest_first() {
        let path = temp_path("valid");
        let payload = serde_json::json!([
            { "date": "2025-03-01", "shift": "Lunch", "sales": 300.0, "staff_count": 1, "covers": 14, "reservations": 8 },
            { "date": "2025-03-08", "shift": "Dinner", "sales": 1900.0, "staff_count": 3, "covers": 90, "reservations": 60 }
        ]);
        fs::write(&path, serde_json::to_vec(&payload).unwrap()).await.unwrap();

        let records = load_seed(Some(path.as_path())).await;
        let _ = fs::remove_file(&path).await;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date.to_string(), "2025-03-08");
        assert_eq!(records[0].walkins, 30);
    }

    #[tokio::test]
    async fn invalid_seed_file_falls_back() {
        let path = temp_path("invalid");
        let payload = serde_json::json!([
            { "date": "2025-03-01", "shift": "Lunch", "sales": 300.0, "staff_count": 1, "covers": 4, "reservations": 8 }
        ]);
        fs::write(&path, serde_json::to_vec(&payload).unwrap()).await.unwrap();

        let records = load_seed(Some(path.as_path())).await;
        let _ = fs::remove_file(&path).await;

        assert_eq!(records.len(), 10);
    }
}
