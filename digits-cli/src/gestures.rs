use anyhow::{Context, Result, ensure};
use sketch::Point;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Recorded gestures: one array of `[x, y]` pairs per pointer-down..up.
pub fn load_gestures(path: &Path) -> Result<Vec<Vec<Point>>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open gesture file {}", path.display()))?;
    parse_gestures(BufReader::new(file))
        .with_context(|| format!("failed to parse gesture file {}", path.display()))
}

pub fn parse_gestures(reader: impl std::io::Read) -> Result<Vec<Vec<Point>>> {
    let raw: Vec<Vec<[f32; 2]>> = serde_json::from_reader(reader)?;
    for (index, stroke) in raw.iter().enumerate() {
        ensure!(
            stroke.iter().flatten().all(|v| v.is_finite()),
            "gesture {index} has a coordinate outside the f32 range"
        );
    }
    Ok(raw
        .into_iter()
        .map(|stroke| stroke.into_iter().map(Point::from).collect())
        .collect())
}
