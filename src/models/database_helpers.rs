#[derive(serde::Deserialize)]
pub struct CountResult {
    pub total: u64,
}

impl CountResult {
    /// `GROUP ALL` counts yield no row at all when nothing matched.
    pub fn total_or_zero(row: Option<CountResult>) -> u64 {
        row.map(|r| r.total).unwrap_or(0)
    }
}
