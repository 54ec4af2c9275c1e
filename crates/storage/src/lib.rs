#![warn(clippy::pedantic)]

use repvoice_domain::WorkoutRecord;

pub mod json_file;
pub mod memory;

/// Order by timestamp, newest first, and keep at most `limit` records.
fn newest_first(mut workouts: Vec<WorkoutRecord>, limit: Option<usize>) -> Vec<WorkoutRecord> {
    workouts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    if let Some(limit) = limit {
        workouts.truncate(limit);
    }
    workouts
}

#[cfg(test)]
mod tests {
    pub mod data;
}
